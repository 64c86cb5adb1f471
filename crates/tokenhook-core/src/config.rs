//! Connection configuration.
//!
//! Loads `tokenhook.yaml` files describing which RPC endpoint and token
//! contract to bind, and where signing material comes from. Secrets are
//! never stored in the file itself, only the names of env vars holding them.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("environment variable {0} is not set")]
    MissingEnv(String),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Where the signing key for write calls comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SignerConfig {
    /// Hex private key read from an env var.
    PrivateKey { env: String },
    /// Encrypted V3 keystore file, password read from an env var.
    Keystore { path: PathBuf, password_env: String },
}

impl SignerConfig {
    /// Reads the secret (private key or keystore password) from the env.
    pub fn secret(&self) -> Result<String, ConfigError> {
        let var = match self {
            Self::PrivateKey { env } => env,
            Self::Keystore { password_env, .. } => password_env,
        };
        std::env::var(var).map_err(|_| ConfigError::MissingEnv(var.clone()))
    }
}

/// Parsed connection configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,
    /// ERC-20 contract address.
    pub token: String,
    /// Signing key source; absent means read-only.
    #[serde(default)]
    pub signer: Option<SignerConfig>,
    /// Optional JSONL audit log of settled writes.
    #[serde(default)]
    pub audit_log: Option<PathBuf>,
}

impl ConnectionConfig {
    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rpc_url.trim().is_empty() {
            return Err(ConfigError::Invalid("rpc_url must not be empty".into()));
        }
        if self.token.trim().is_empty() {
            return Err(ConfigError::Invalid("token must not be empty".into()));
        }
        Ok(())
    }

    pub fn is_read_only(&self) -> bool {
        self.signer.is_none()
    }
}
