//! Configuration for the classifieds backend.
//!
//! Configuration is layered with the `config` crate: `config/default`, then
//! `config/{RUN_ENV}`, then `CLASSIFIEDS__*` environment variables. Secrets are
//! written as `"secret_from_env"` in the files and resolved from the
//! environment after loading (see [`env_vars`]).

use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::env;
use std::path::PathBuf;
use tracing::debug;

pub mod env_vars;
pub mod models;

pub use models::*;

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures that the dotenv file is loaded into the process environment.
///
/// The file is `DOTENV_OVERRIDE` if set, otherwise `.env`. Loading happens
/// at most once per process; a missing file is not an error. Returns the path
/// that was (or would have been) loaded.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path = env::var("DOTENV_OVERRIDE").unwrap_or_else(|_| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}

/// Loads the application configuration from files and environment.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let prefix = env_vars::get_config_prefix();
    let config_dir = PathBuf::from(env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string()));

    let default_path = config_dir.join("default");
    let env_path = config_dir.join(&run_env);
    debug!(
        "Loading config from {} and {}",
        default_path.display(),
        env_path.display()
    );

    let builder = Config::builder()
        .add_source(File::from(default_path).required(false))
        .add_source(File::from(env_path).required(false))
        .add_source(
            Environment::with_prefix(&prefix)
                .separator(env_vars::CONFIG_SEPARATOR)
                .try_parsing(true),
        );

    let mut raw: serde_json::Value = builder.build()?.try_deserialize()?;
    let resolved = env_vars::inject_env_vars(&mut raw);
    debug!("Resolved {} secrets from the environment", resolved);

    serde_json::from_value(raw)
        .map_err(|err| ConfigError::Message(format!("failed to parse config: {err}")))
}
