//! Process configuration, read once from the environment at start-up.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::tfl::{DEFAULT_BASE_URL, TflConfig};

/// Default file holding the TfL application key.
pub const DEFAULT_APP_KEY_FILE: &str = "app_key.txt";

/// Default listen address.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Default upstream request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no TfL app key: set TFL_APP_KEY or put the key in {}", .path.display())]
    MissingAppKey { path: PathBuf },

    #[error("failed to read app key file {}: {source}", .path.display())]
    KeyFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid BIND_ADDR {value:?}: {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("invalid TFL_TIMEOUT_SECS {value:?}")]
    InvalidTimeout { value: String },
}

/// Everything the binary needs to start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Upstream client settings; fixed for the process lifetime
    pub tfl: TflConfig,
    /// Address the HTTP server listens on
    pub bind_addr: SocketAddr,
}

impl AppConfig {
    /// Load from the process environment.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `TFL_APP_KEY` | contents of `TFL_APP_KEY_FILE` |
    /// | `TFL_APP_KEY_FILE` | `app_key.txt` |
    /// | `TFL_BASE_URL` | `https://api.tfl.gov.uk` |
    /// | `BIND_ADDR` | `0.0.0.0:8080` |
    /// | `TFL_TIMEOUT_SECS` | 30 |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let app_key = match var("TFL_APP_KEY") {
            Some(key) => key.trim().to_string(),
            None => {
                let path = PathBuf::from(
                    var("TFL_APP_KEY_FILE").unwrap_or_else(|| DEFAULT_APP_KEY_FILE.to_string()),
                );
                read_key_file(path)?
            }
        };

        let base_url = var("TFL_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let bind_value = var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_value
            .trim()
            .parse()
            .map_err(|source| ConfigError::InvalidBindAddr {
                value: bind_value.clone(),
                source,
            })?;

        let timeout_secs = match var("TFL_TIMEOUT_SECS") {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout { value })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            tfl: TflConfig::new(app_key)
                .with_base_url(base_url)
                .with_timeout(timeout_secs),
            bind_addr,
        })
    }
}

fn read_key_file(path: PathBuf) -> Result<String, ConfigError> {
    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::MissingAppKey { path });
        }
        Err(source) => return Err(ConfigError::KeyFile { path, source }),
    };

    let key = contents.trim();
    if key.is_empty() {
        return Err(ConfigError::MissingAppKey { path });
    }
    Ok(key.to_string())
}
