//! Transaction building for ERC-20 write calls.
//!
//! Builds unsigned requests addressed to the token contract. Sender, nonce,
//! gas and chain id are filled in by the signing provider.

use alloy::primitives::{Address, Bytes, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::SolCall;

use crate::abi::IERC20;

/// Builds a request calling `call` on `token` with no ETH value.
pub fn build_contract_call(token: Address, call: &impl SolCall) -> TransactionRequest {
    TransactionRequest::default()
        .to(token)
        .input(Bytes::from(call.abi_encode()).into())
}

/// Builds an ERC-20 `approve(spender, amount)` transaction request.
pub fn build_erc20_approve(token: Address, spender: Address, amount: U256) -> TransactionRequest {
    build_contract_call(token, &IERC20::approveCall { spender, amount })
}

/// Builds an ERC-20 `transfer(to, amount)` transaction request.
pub fn build_erc20_transfer(token: Address, to: Address, amount: U256) -> TransactionRequest {
    build_contract_call(token, &IERC20::transferCall { to, amount })
}

/// Builds an ERC-20 `transferFrom(from, to, amount)` transaction request.
pub fn build_erc20_transfer_from(
    token: Address,
    from: Address,
    to: Address,
    amount: U256,
) -> TransactionRequest {
    build_contract_call(token, &IERC20::transferFromCall { from, to, amount })
}
