//! Configuration resolution
//!
//! Settings resolve in priority order:
//! 1. Command-line argument / environment variable (handled by clap in the
//!    service binary; arrives here as `Some(..)`)
//! 2. User TOML config file
//! 3. Compiled default (fallback)

use std::path::PathBuf;

use tracing::debug;

/// Default HTTP port for the analysis service
pub const DEFAULT_PORT: u16 = 5730;

/// Default document store location, relative to the working directory
pub const DEFAULT_DB_PATH: &str = "data/restwell.json";

/// Default allowed CORS origin (local frontend dev server)
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

/// Resolved service configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub cors_origin: String,
}

impl Config {
    /// Resolve configuration from CLI/env overrides, the user config file,
    /// and compiled defaults, in that order.
    pub fn resolve(db_path: Option<PathBuf>, cors_origin: Option<String>) -> Self {
        let file = load_config_file();

        let db_path = db_path
            .or_else(|| {
                file.as_ref()
                    .and_then(|c| c.get("db_path").and_then(|v| v.as_str()))
                    .map(PathBuf::from)
            })
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));

        let cors_origin = cors_origin
            .or_else(|| {
                file.as_ref()
                    .and_then(|c| c.get("cors_origin").and_then(|v| v.as_str()))
                    .map(str::to_string)
            })
            .unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string());

        Self {
            db_path,
            cors_origin,
        }
    }
}

/// Load `restwell/config.toml` from the platform config directory, if present
fn load_config_file() -> Option<toml::Value> {
    let path = dirs::config_dir()?.join("restwell").join("config.toml");
    if !path.exists() {
        return None;
    }

    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) => {
            debug!("Could not read config file {}: {}", path.display(), e);
            return None;
        }
    };

    match toml::from_str::<toml::Value>(&content) {
        Ok(value) => {
            debug!("Loaded config file {}", path.display());
            Some(value)
        }
        Err(e) => {
            debug!("Ignoring malformed config file {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_overrides_win() {
        let config = Config::resolve(
            Some(PathBuf::from("/tmp/override.json")),
            Some("http://example.test".to_string()),
        );
        assert_eq!(config.db_path, PathBuf::from("/tmp/override.json"));
        assert_eq!(config.cors_origin, "http://example.test");
    }

    #[test]
    fn test_defaults_apply_when_nothing_is_set() {
        let config = Config::resolve(None, None);
        // The user config file tier may shadow defaults on developer machines;
        // both outcomes are valid resolutions here.
        assert!(!config.cors_origin.is_empty());
        assert!(!config.db_path.as_os_str().is_empty());
    }
}
