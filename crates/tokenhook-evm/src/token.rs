//! ERC-20 write submissions and the shared token error type.

use alloy::primitives::{Address, TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use thiserror::Error;
use tracing::debug;

use tokenhook_core::normalize::{normalize, NormalizedError};

use crate::binder::BoundToken;
use crate::capability::CapabilityError;
use crate::tx;

/// Errors from token operations.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("invalid contract address {input:?}: {reason}")]
    InvalidAddress { input: String, reason: String },
    #[error("call error: {0}")]
    Call(#[source] CapabilityError),
    #[error("ABI decode error: {0}")]
    AbiDecode(String),
    #[error("connection cannot sign transactions")]
    MissingSigner,
    #[error("send error: {0}")]
    Send(#[source] CapabilityError),
}

impl TokenError {
    /// Normalizes this error for a write outcome.
    ///
    /// Submission failures are normalized from the capability's raw value, so
    /// a capability that already rejects with a `NormalizedError` keeps it.
    pub fn into_normalized(self) -> NormalizedError {
        match self {
            Self::Send(raw) => normalize(raw),
            other => normalize(other),
        }
    }
}

impl BoundToken {
    async fn submit(&self, tx: TransactionRequest) -> Result<TxHash, TokenError> {
        let signer = self.signer().ok_or(TokenError::MissingSigner)?;
        debug!(token = %self.address(), sender = %signer.sender(), "submitting transaction");
        signer.send(tx).await.map_err(TokenError::Send)
    }

    /// Submits `approve(spender, amount)`.
    pub async fn submit_approve(&self, spender: Address, amount: U256) -> Result<TxHash, TokenError> {
        self.submit(tx::build_erc20_approve(self.address(), spender, amount))
            .await
    }

    /// Submits `transfer(to, amount)`.
    pub async fn submit_transfer(&self, to: Address, amount: U256) -> Result<TxHash, TokenError> {
        self.submit(tx::build_erc20_transfer(self.address(), to, amount))
            .await
    }

    /// Submits `transferFrom(from, to, amount)`.
    pub async fn submit_transfer_from(
        &self,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<TxHash, TokenError> {
        self.submit(tx::build_erc20_transfer_from(self.address(), from, to, amount))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokenhook_core::normalize::Payload;

    #[test]
    fn send_failure_normalizes_raw_value() {
        let raw = NormalizedError::new("user denied signature");
        let err = TokenError::Send(Box::new(raw.clone()));
        assert_eq!(err.into_normalized(), raw);
    }

    #[test]
    fn other_failures_wrap_token_error() {
        let normalized = TokenError::MissingSigner.into_normalized();
        assert_eq!(normalized.message(), "connection cannot sign transactions");
        assert!(matches!(normalized.payload(), Payload::Error(_)));
    }
}
