use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::Path;
use tracing::info;

/// Prefix of environment overrides, e.g. `CERTCHAIN__STORAGE__DATA_DIR`.
pub const ENV_PREFIX: &str = "CERTCHAIN";
pub const ENV_SEPARATOR: &str = "__";

/// Custom error type for config loading.
#[certchain_derive::certchain_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// A reusable configuration loader that combines file-based settings with environment overrides.
///
/// Layers, lowest precedence first:
/// 1. **Defaults**: whatever `T`'s serde defaults provide.
/// 2. **Base File**: the file at `path`, if one is given. Its format follows the extension
///    (`.toml`, `.json`, `.yaml`, ...). A given file must exist.
/// 3. **Environment Overrides**: variables prefixed with `CERTCHAIN__`. Nested structures are
///    addressed with double underscores (e.g., `CERTCHAIN__GENESIS__ADMIN` maps to `genesis.admin`).
///
/// # Errors
/// This function will return an error if:
/// * The specified configuration file cannot be found or parsed.
/// * The merged settings do not match the structure of type `T`.
///
/// # Example
/// ```rust
/// use certchain_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// #[serde(default)]
/// struct AppConfig {
///     retries: u16,
/// }
///
/// let cfg: AppConfig = load_config(None::<&str>).unwrap();
/// assert_eq!(cfg.retries, 0);
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let mut builder = Config::builder();

    if let Some(path) = &path {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading config file");
        builder = builder.add_source(File::from(path).required(true));
    }

    let config = builder
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator(ENV_SEPARATOR)
                .convert_case(config::Case::Snake),
        )
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
