//! Environment variable handling for the classifieds backend.
//!
//! Plain values are overridden with `CLASSIFIEDS__SECTION__KEY`. Secrets are
//! written as the literal `"secret_from_env"` in the config files and looked
//! up as `CLASSIFIEDS_SECRET_SECTION_KEY`, then as the short `SECTION_KEY`.

use std::env;

use serde_json::Value;
use tracing::{debug, warn};

/// Prefix for plain override variables, unless `PREFIX` says otherwise
pub const DEFAULT_PREFIX: &str = "CLASSIFIEDS";

/// Prefix for secret variables
pub const SECRET_PREFIX: &str = "CLASSIFIEDS_SECRET";

/// Nesting separator of plain override variables
pub const CONFIG_SEPARATOR: &str = "__";

/// Placeholder replaced by a secret variable at load time
pub const SECRET_MARKER: &str = "secret_from_env";

pub fn get_config_prefix() -> String {
    env::var("PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string())
}

/// Candidate variable names for a secret, most specific first.
///
/// `["firebase", "api_key"]` gives `CLASSIFIEDS_SECRET_FIREBASE_API_KEY`
/// and `FIREBASE_API_KEY`.
pub fn secret_env_names(path: &[String]) -> Vec<String> {
    let joined = path.join("_").to_uppercase();
    vec![format!("{}_{}", SECRET_PREFIX, joined), joined]
}

fn lookup_secret(path: &[String]) -> Option<String> {
    secret_env_names(path)
        .into_iter()
        .find_map(|name| env::var(&name).ok())
}

/// Replace every secret marker in the raw config tree.
///
/// Returns how many markers were resolved. Markers without a variable stay
/// in place and are reported with a warning.
pub fn inject_env_vars(value: &mut Value) -> usize {
    let mut path = Vec::new();
    resolve(value, &mut path)
}

fn resolve(value: &mut Value, path: &mut Vec<String>) -> usize {
    match value {
        Value::Object(map) => map
            .iter_mut()
            .map(|(key, child)| {
                path.push(key.clone());
                let resolved = resolve(child, path);
                path.pop();
                resolved
            })
            .sum(),
        Value::String(text) if text == SECRET_MARKER => match lookup_secret(path) {
            Some(secret) => {
                debug!("Resolved secret {}", path.join("."));
                *text = secret;
                1
            }
            None => {
                warn!("No environment variable for secret {}", path.join("."));
                0
            }
        },
        _ => 0,
    }
}
