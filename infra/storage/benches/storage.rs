use certchain_storage::{Compression, FileStore, KeyValueStore, MemoryStore, WriteBatch};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Duration;
use tempfile::TempDir;

// ============================================================================
// Benchmark: Path Resolution & Security Validation
// ============================================================================

fn bench_path_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("path_resolution");

    let temp = TempDir::new().unwrap();
    let store = FileStore::builder().root(temp.path()).open().unwrap();

    group.bench_function("short_key", |b| {
        b.iter(|| black_box(store.resolve("registry_admin", b"admin").unwrap()));
    });

    group.bench_function("principal_key", |b| {
        b.iter(|| {
            black_box(
                store.resolve("registry_institutions", b"ST2UNIVERSITY0000000000000001").unwrap(),
            )
        });
    });

    group.finish();
}

// ============================================================================
// Benchmark: Batch Commit
// ============================================================================

fn bench_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply");
    group.measurement_time(Duration::from_secs(10));
    group.throughput(Throughput::Elements(1));

    let memory = MemoryStore::new();
    let temp = TempDir::new().unwrap();
    let plain = FileStore::builder().root(temp.path().join("plain")).open().unwrap();
    let lz4 = FileStore::builder()
        .root(temp.path().join("lz4"))
        .compression(Compression::Lz4)
        .open()
        .unwrap();

    let stores: [(&str, &dyn KeyValueStore); 3] =
        [("memory", &memory), ("file", &plain), ("file_lz4", &lz4)];

    for (name, store) in stores {
        let mut id = 0u64;
        group.bench_with_input(BenchmarkId::new("issue_like_batch", name), &store, |b, store| {
            b.iter(|| {
                id += 1;
                let mut batch = WriteBatch::new();
                batch.put("issuer_counter", b"counter", (id + 1).to_be_bytes().to_vec());
                batch.put("issuer_credentials", id.to_be_bytes(), vec![0u8; 96]);
                store.apply(black_box(batch)).unwrap();
            });
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: Point Reads
// ============================================================================

fn bench_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("get");

    let temp = TempDir::new().unwrap();
    let store = FileStore::builder().root(temp.path()).open().unwrap();
    let mut batch = WriteBatch::new();
    batch.put("t", b"present", vec![1u8; 256]);
    store.apply(batch).unwrap();

    group.bench_function("hit", |b| b.iter(|| black_box(store.get("t", b"present").unwrap())));
    group.bench_function("miss", |b| b.iter(|| black_box(store.get("t", b"absent").unwrap())));

    group.finish();
}

criterion_group!(benches, bench_path_resolution, bench_apply, bench_get);
criterion_main!(benches);
