//! CLI configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `TAMARIND_CART_DIR` - Directory for the persisted cart
//!   (default: `.tamarind`)
//! - `RUST_LOG` - Tracing filter (e.g. `tamarind_client=debug`)

use std::env;
use std::path::PathBuf;

use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Directory holding the persisted cart document.
    pub cart_dir: PathBuf,
}

impl CliConfig {
    /// Load configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is present but not valid
    /// Unicode.
    pub fn from_env() -> Result<Self, ConfigError> {
        let cart_dir = match env::var("TAMARIND_CART_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(env::VarError::NotPresent) => PathBuf::from(".tamarind"),
            Err(err) => {
                return Err(ConfigError::InvalidEnvVar(
                    "TAMARIND_CART_DIR".to_owned(),
                    err.to_string(),
                ));
            }
        };

        Ok(Self { cart_dir })
    }
}
