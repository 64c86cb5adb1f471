//! Chain adapter implementation.
//!
//! Connects to an EVM-compatible JSON-RPC endpoint through alloy and
//! implements the query and signing capabilities on top of it. Nonce, gas
//! and chain id filling are left to alloy's recommended fillers.

use alloy::network::{Ethereum, EthereumWallet};
use alloy::primitives::{Address, Bytes, TxHash};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::http::reqwest::Url;
use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use tokenhook_core::config::{ConfigError, ConnectionConfig, SignerConfig};

use crate::capability::{CapabilityError, Connection, QueryCapability, SignerCapability};

/// Errors from EVM adapter construction.
#[derive(Debug, Error)]
pub enum EvmAdapterError {
    #[error("URL parse error: {0}")]
    UrlParse(String),
    #[error("signer error: {0}")]
    Signer(String),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result alias for adapter operations.
pub type Result<T> = std::result::Result<T, EvmAdapterError>;

fn parse_url(rpc_url: &str) -> Result<Url> {
    rpc_url
        .parse()
        .map_err(|e| EvmAdapterError::UrlParse(format!("{e}")))
}

/// A read-only adapter connected to a specific RPC endpoint.
pub struct EvmAdapter {
    provider: DynProvider<Ethereum>,
    rpc_url: String,
}

impl std::fmt::Debug for EvmAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvmAdapter")
            .field("rpc_url", &self.rpc_url)
            .finish()
    }
}

impl EvmAdapter {
    /// Creates a new adapter for the given RPC URL.
    pub fn new(rpc_url: &str) -> Result<Self> {
        let url = parse_url(rpc_url)?;
        let provider = ProviderBuilder::new().connect_http(url).erased();

        Ok(Self {
            provider,
            rpc_url: rpc_url.to_string(),
        })
    }

    /// Returns a reference to the underlying provider.
    pub fn provider(&self) -> &DynProvider<Ethereum> {
        &self.provider
    }

    /// Returns the RPC URL.
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }
}

#[async_trait]
impl QueryCapability for EvmAdapter {
    async fn call(&self, tx: TransactionRequest) -> std::result::Result<Bytes, CapabilityError> {
        Ok(self.provider.call(tx).await?)
    }
}

/// An adapter whose provider carries a local wallet, so it can submit
/// transactions as well as query.
pub struct SigningEvmAdapter {
    provider: DynProvider<Ethereum>,
    sender: Address,
    rpc_url: String,
}

impl std::fmt::Debug for SigningEvmAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningEvmAdapter")
            .field("rpc_url", &self.rpc_url)
            .field("sender", &self.sender)
            .finish()
    }
}

impl SigningEvmAdapter {
    pub fn new(rpc_url: &str, signer: PrivateKeySigner) -> Result<Self> {
        let url = parse_url(rpc_url)?;
        let sender = signer.address();
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(url)
            .erased();

        Ok(Self {
            provider,
            sender,
            rpc_url: rpc_url.to_string(),
        })
    }

    pub fn provider(&self) -> &DynProvider<Ethereum> {
        &self.provider
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }
}

#[async_trait]
impl QueryCapability for SigningEvmAdapter {
    async fn call(&self, tx: TransactionRequest) -> std::result::Result<Bytes, CapabilityError> {
        Ok(self.provider.call(tx).await?)
    }
}

#[async_trait]
impl SignerCapability for SigningEvmAdapter {
    fn sender(&self) -> Address {
        self.sender
    }

    async fn send(&self, tx: TransactionRequest) -> std::result::Result<TxHash, CapabilityError> {
        let pending = self.provider.send_transaction(tx.from(self.sender)).await?;
        Ok(*pending.tx_hash())
    }
}

/// Loads the signing key described by `config`.
pub fn load_signer(config: &SignerConfig) -> Result<PrivateKeySigner> {
    let secret = config.secret()?;
    match config {
        SignerConfig::PrivateKey { .. } => secret
            .trim()
            .parse::<PrivateKeySigner>()
            .map_err(|e| EvmAdapterError::Signer(e.to_string())),
        SignerConfig::Keystore { path, .. } => {
            PrivateKeySigner::decrypt_keystore(path, secret)
                .map_err(|e| EvmAdapterError::Signer(format!("{}: {e}", path.display())))
        }
    }
}

/// Builds the connection described by `config`: signing when a signer is
/// configured, read-only otherwise.
pub fn connect(config: &ConnectionConfig) -> Result<Connection> {
    match &config.signer {
        None => {
            debug!(rpc_url = %config.rpc_url, "connecting read-only");
            Ok(Connection::read_only(EvmAdapter::new(&config.rpc_url)?))
        }
        Some(signer_config) => {
            let signer = load_signer(signer_config)?;
            let adapter = SigningEvmAdapter::new(&config.rpc_url, signer)?;
            debug!(rpc_url = %config.rpc_url, sender = %adapter.sender, "connecting with signer");
            Ok(Connection::signing(adapter))
        }
    }
}
