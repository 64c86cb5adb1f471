//! # tokenhook
//!
//! Observable ERC-20 hooks. Bind a token contract to a JSON-RPC connection,
//! read it directly, and fire `approve`, `transfer` and `transferFrom` calls
//! whose outcomes land in a watchable result cell instead of being returned.
//!
//! ```no_run
//! # async fn demo(connection: tokenhook::Connection) -> Result<(), Box<dyn std::error::Error>> {
//! use tokenhook::{use_token, Approve, ConnectionParams, U256};
//!
//! let hooks = use_token(ConnectionParams::new(
//!     connection,
//!     "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48",
//! ))?;
//! println!("decimals: {}", hooks.token.decimals().await?);
//!
//! let mut settled = hooks.approve.subscribe();
//! hooks.approve.trigger(Approve {
//!     spender: tokenhook::Address::ZERO,
//!     amount: U256::from(1u64),
//! });
//! settled.changed().await?;
//! println!("{:?}", hooks.approve.result());
//! # Ok(())
//! # }
//! ```

pub use tokenhook_core::{
    normalize, normalize_any, CallResult, NormalizedError, Observer, Payload, ResultCell,
    ResultReader,
};
pub use tokenhook_evm::*;

/// Returns the library version string.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!version().is_empty());
    }
}
