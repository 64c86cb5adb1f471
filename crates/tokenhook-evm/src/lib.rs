//! # tokenhook-evm
//!
//! ERC-20 hooks over alloy: bind a token, read it, and fire write calls
//! whose outcomes are observable.
//!
//! ## Modules
//!
//! - [`abi`]: ERC-20 ABI definitions using alloy's `sol!` macro
//! - [`capability`]: query / signing capability traits and [`Connection`]
//! - [`adapter`]: alloy-backed capabilities connected to a JSON-RPC endpoint
//! - [`binder`]: binding a connection to a token address
//! - [`reads`]: read accessors
//! - [`token`]: write submissions and [`TokenError`]
//! - [`tx`]: transaction request builders
//! - [`hooks`]: write hooks with observable results
//! - [`amount`]: decimal amount conversion

pub mod abi;
pub mod adapter;
pub mod amount;
pub mod binder;
pub mod capability;
pub mod hooks;
pub mod reads;
pub mod token;
pub mod tx;

// Re-export key types for convenience.
pub use adapter::{connect, EvmAdapter, EvmAdapterError, SigningEvmAdapter};
pub use binder::{bind, BoundToken, ConnectionParams};
pub use capability::{CapabilityError, Connection, QueryCapability, SignerCapability};
pub use hooks::{
    use_approve, use_token, use_transfer, use_transfer_from, Approve, TokenHooks, Transfer,
    TransferFrom, Trigger, TxResult, WriteCall, WriteOp,
};
pub use reads::TokenInfo;
pub use token::TokenError;

// Re-export alloy primitives used in the public API.
pub use alloy::primitives::{Address, TxHash, U256};
