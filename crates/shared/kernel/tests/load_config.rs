use certchain_kernel::config::{ConfigError, load_config};
use certchain_kernel::domain::config::{LedgerConfig, StorageBackend, StorageCompression};
use std::fs;
use std::path::PathBuf;

#[test]
fn defaults_without_file() {
    let cfg: LedgerConfig = load_config(None::<&str>).unwrap();
    assert_eq!(cfg.genesis.admin, "ST1ADMIN1234567890ADMINADDRESS");
    assert_eq!(cfg.storage.backend, StorageBackend::File);
    assert_eq!(cfg.storage.data_dir, PathBuf::from("data"));
    assert!(cfg.logging.console);
}

#[test]
fn toml_file_overrides_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("certchain.toml");
    fs::write(
        &path,
        r#"
[genesis]
admin = "ST1GOVERNOR"

[storage]
backend = "memory"
compression = "lz4"

[logging]
level = "debug"
json = true
"#,
    )
    .unwrap();

    let cfg: LedgerConfig = load_config(Some(&path)).unwrap();
    assert_eq!(cfg.genesis.admin, "ST1GOVERNOR");
    assert_eq!(cfg.storage.backend, StorageBackend::Memory);
    assert_eq!(cfg.storage.compression, StorageCompression::Lz4);
    assert_eq!(cfg.storage.data_dir, PathBuf::from("data"));
    assert_eq!(cfg.logging.level, "debug");
    assert!(cfg.logging.json);
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let result: Result<LedgerConfig, _> = load_config(Some(dir.path().join("absent.toml")));
    assert!(matches!(result, Err(ConfigError::Config { .. })));
}

#[test]
fn unknown_enum_value_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "[storage]\nbackend = \"tape\"\n").unwrap();

    let result: Result<LedgerConfig, _> = load_config(Some(&path));
    assert!(result.is_err());
}
