//! Read accessors.
//!
//! Each accessor issues a fresh `eth_call` through the bound connection.
//! Nothing is cached and errors are returned to the caller as-is.

use alloy::primitives::{Address, U256};
use alloy::sol_types::SolCall;
use serde::{Deserialize, Serialize};

use crate::abi::IERC20;
use crate::binder::BoundToken;
use crate::token::TokenError;
use crate::tx;

/// Information about an ERC-20 token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    /// Token name (e.g., "USD Coin").
    pub name: String,
    /// Token symbol (e.g., "USDC").
    pub symbol: String,
    /// Number of decimals.
    pub decimals: u8,
    /// Total supply in base units.
    pub total_supply: U256,
}

impl BoundToken {
    async fn query<C>(&self, call: C) -> Result<C::Return, TokenError>
    where
        C: SolCall + Send,
    {
        let request = tx::build_contract_call(self.address(), &call);
        let data = self
            .connection()
            .call(request)
            .await
            .map_err(TokenError::Call)?;
        C::abi_decode_returns(&data).map_err(|e| TokenError::AbiDecode(e.to_string()))
    }

    pub async fn name(&self) -> Result<String, TokenError> {
        self.query(IERC20::nameCall {}).await
    }

    pub async fn symbol(&self) -> Result<String, TokenError> {
        self.query(IERC20::symbolCall {}).await
    }

    pub async fn decimals(&self) -> Result<u8, TokenError> {
        self.query(IERC20::decimalsCall {}).await
    }

    pub async fn total_supply(&self) -> Result<U256, TokenError> {
        self.query(IERC20::totalSupplyCall {}).await
    }

    /// Token balance of `owner` in base units.
    pub async fn balance_of(&self, owner: Address) -> Result<U256, TokenError> {
        self.query(IERC20::balanceOfCall { owner }).await
    }

    /// Amount `spender` may still transfer on behalf of `owner`.
    pub async fn allowance(&self, owner: Address, spender: Address) -> Result<U256, TokenError> {
        self.query(IERC20::allowanceCall { owner, spender }).await
    }

    /// Fetches name, symbol, decimals and total supply concurrently.
    pub async fn info(&self) -> Result<TokenInfo, TokenError> {
        let (name, symbol, decimals, total_supply) = futures::try_join!(
            self.name(),
            self.symbol(),
            self.decimals(),
            self.total_supply()
        )?;
        Ok(TokenInfo {
            name,
            symbol,
            decimals,
            total_supply,
        })
    }
}
