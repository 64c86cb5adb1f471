//! Binding a connection to a deployed token contract.

use alloy::primitives::Address;
use tracing::debug;

use crate::capability::{Connection, SignerCapability};
use crate::token::TokenError;

/// What a caller supplies to bind a token.
#[derive(Debug, Clone)]
pub struct ConnectionParams {
    pub connection: Connection,
    /// Contract address, `0x`-prefixed hex. Mixed-case input must carry a
    /// valid EIP-55 checksum.
    pub contract_address: String,
}

impl ConnectionParams {
    pub fn new(connection: Connection, contract_address: impl Into<String>) -> Self {
        Self {
            connection,
            contract_address: contract_address.into(),
        }
    }
}

/// A token contract at a fixed address, bound to a connection.
///
/// Cheap to clone; clones share the connection. Holds no mutable state.
#[derive(Debug, Clone)]
pub struct BoundToken {
    address: Address,
    connection: Connection,
}

impl BoundToken {
    pub fn new(connection: Connection, address: Address) -> Self {
        Self {
            address,
            connection,
        }
    }

    /// Contract address.
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// The signing capability, if the connection has one.
    pub fn signer(&self) -> Option<&dyn SignerCapability> {
        self.connection.signer().map(|s| &**s)
    }
}

/// Binds a token. Performs no I/O; fails only on a malformed address.
pub fn bind(params: ConnectionParams) -> Result<BoundToken, TokenError> {
    let address = parse_address(&params.contract_address)?;
    debug!(
        token = %address,
        signing = params.connection.can_sign(),
        "bound token contract"
    );
    Ok(BoundToken::new(params.connection, address))
}

/// Parses a contract address. All-lowercase and all-uppercase hex is
/// accepted as-is; mixed case is checked against its EIP-55 checksum.
pub fn parse_address(input: &str) -> Result<Address, TokenError> {
    let trimmed = input.trim();
    let invalid = |reason: String| TokenError::InvalidAddress {
        input: input.to_string(),
        reason,
    };

    let Some(hex) = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) else {
        return Err(invalid("missing 0x prefix".into()));
    };
    if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid(format!("expected 40 hex digits after 0x, got {hex:?}")));
    }
    let has_upper = hex.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = hex.chars().any(|c| c.is_ascii_lowercase());

    if has_upper && has_lower {
        let normalized = format!("0x{hex}");
        Address::parse_checksummed(&normalized, None).map_err(|e| invalid(e.to_string()))
    } else {
        hex.parse::<Address>().map_err(|e| invalid(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{CapabilityError, QueryCapability};
    use alloy::primitives::Bytes;
    use alloy::rpc::types::TransactionRequest;
    use async_trait::async_trait;

    struct NoNetwork;

    #[async_trait]
    impl QueryCapability for NoNetwork {
        async fn call(&self, _tx: TransactionRequest) -> Result<Bytes, CapabilityError> {
            Err("no network in unit tests".into())
        }
    }

    const USDC: &str = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48";

    #[test]
    fn binds_checksummed_address() {
        let token = bind(ConnectionParams::new(Connection::read_only(NoNetwork), USDC)).unwrap();
        assert_eq!(token.address(), USDC.parse::<Address>().unwrap());
        assert!(token.signer().is_none());
    }

    #[test]
    fn binds_lowercase_address() {
        let lower = USDC.to_lowercase();
        let token = bind(ConnectionParams::new(Connection::read_only(NoNetwork), lower)).unwrap();
        assert_eq!(token.address(), USDC.parse::<Address>().unwrap());
    }

    #[test]
    fn rejects_bad_checksum() {
        let err = parse_address("0xa0B86991c6218b36c1d19D4a2e9Eb0cE3606eB48").unwrap_err();
        assert!(matches!(err, TokenError::InvalidAddress { .. }));
    }

    #[test]
    fn rejects_wrong_length_and_prefix() {
        assert!(parse_address("0x1234").is_err());
        assert!(parse_address("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48").is_err());
        assert!(parse_address("").is_err());
        assert!(parse_address("0xzz00000000000000000000000000000000000000").is_err());
        assert!(parse_address("0x0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48").is_err());
        assert!(parse_address("0x0Xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48").is_err());
        assert!(parse_address("0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48ff").is_err());
    }

    #[test]
    fn invalid_address_message_names_input() {
        let err = parse_address("0x1234").unwrap_err();
        assert!(err.to_string().contains("0x1234"));
    }
}
