//! CLI subcommand implementations.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tokenhook_core::audit::AuditLogger;
use tokenhook_core::config::{ConnectionConfig, SignerConfig};
use tokenhook_evm::{connect, use_token, ConnectionParams, TokenHooks};

pub mod read;
pub mod write;

/// Connection settings given on the command line.
#[derive(Debug, Default)]
pub struct Overrides {
    pub config: Option<PathBuf>,
    pub rpc_url: Option<String>,
    pub token: Option<String>,
    pub private_key_env: Option<String>,
}

/// Loads the config file, if any, and applies command-line overrides.
pub(crate) fn resolve_config(
    overrides: Overrides,
) -> Result<ConnectionConfig, Box<dyn std::error::Error>> {
    let mut config = match &overrides.config {
        Some(path) => {
            tracing::info!("loading config from {}", path.display());
            ConnectionConfig::from_file(path)?
        }
        None => ConnectionConfig {
            rpc_url: String::new(),
            token: String::new(),
            signer: None,
            audit_log: None,
        },
    };

    if let Some(rpc_url) = overrides.rpc_url {
        config.rpc_url = rpc_url;
    }
    if let Some(token) = overrides.token {
        config.token = token;
    }
    if let Some(env) = overrides.private_key_env {
        config.signer = Some(SignerConfig::PrivateKey { env });
    }

    config
        .validate()
        .map_err(|e| format!("{e} (pass --config, or --rpc-url and --token)"))?;
    Ok(config)
}

/// Connects, binds the token and attaches the audit log when configured.
pub(crate) fn open_hooks(config: &ConnectionConfig) -> Result<TokenHooks, Box<dyn std::error::Error>> {
    let connection = connect(config)?;
    let hooks = use_token(ConnectionParams::new(connection, config.token.clone()))?;

    if let Some(path) = &config.audit_log {
        let logger = AuditLogger::new(path)
            .map_err(|e| format!("failed to open audit log {}: {e}", path.display()))?;
        hooks.attach_audit(Arc::new(Mutex::new(logger)));
    }

    Ok(hooks)
}
