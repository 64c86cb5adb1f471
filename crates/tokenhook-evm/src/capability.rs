//! Connection capabilities.
//!
//! A [`Connection`] is either read-only or signing-capable. The binder and
//! the write hooks inspect which one they were given instead of guessing
//! from the shape of the handle.

use std::fmt;
use std::sync::Arc;

use alloy::primitives::{Address, Bytes, TxHash};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;

/// Raw failure value returned by a capability.
pub type CapabilityError = Box<dyn std::error::Error + Send + Sync>;

/// Read-only access to contract state.
#[async_trait]
pub trait QueryCapability: Send + Sync {
    /// Executes an `eth_call` and returns the raw return data.
    async fn call(&self, tx: TransactionRequest) -> Result<Bytes, CapabilityError>;
}

/// Access that can also submit signed transactions.
#[async_trait]
pub trait SignerCapability: QueryCapability {
    /// Address transactions are sent from.
    fn sender(&self) -> Address;

    /// Signs and submits a transaction, returning its hash once the network
    /// accepted it.
    async fn send(&self, tx: TransactionRequest) -> Result<TxHash, CapabilityError>;
}

/// The handle a token is bound over.
#[derive(Clone)]
pub enum Connection {
    ReadOnly(Arc<dyn QueryCapability>),
    Signing(Arc<dyn SignerCapability>),
}

impl Connection {
    pub fn read_only(query: impl QueryCapability + 'static) -> Self {
        Self::ReadOnly(Arc::new(query))
    }

    pub fn signing(signer: impl SignerCapability + 'static) -> Self {
        Self::Signing(Arc::new(signer))
    }

    /// Executes a read-only call through whichever capability is present.
    pub async fn call(&self, tx: TransactionRequest) -> Result<Bytes, CapabilityError> {
        match self {
            Self::ReadOnly(query) => query.call(tx).await,
            Self::Signing(signer) => signer.call(tx).await,
        }
    }

    /// The signing capability, if this connection has one.
    pub fn signer(&self) -> Option<&Arc<dyn SignerCapability>> {
        match self {
            Self::ReadOnly(_) => None,
            Self::Signing(signer) => Some(signer),
        }
    }

    pub fn can_sign(&self) -> bool {
        self.signer().is_some()
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadOnly(_) => f.write_str("Connection::ReadOnly"),
            Self::Signing(signer) => f
                .debug_struct("Connection::Signing")
                .field("sender", &signer.sender())
                .finish(),
        }
    }
}
