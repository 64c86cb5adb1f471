//! ERC-20 ABI definitions using alloy's `sol!` macro.

use alloy::sol;

sol! {
    /// ERC-20 token interface.
    #[sol(rpc)]
    interface IERC20 {
        function name() external view returns (string);
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
        function totalSupply() external view returns (uint256);
        function balanceOf(address owner) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
        function transfer(address to, uint256 amount) external returns (bool);
        function transferFrom(address from, address to, uint256 amount) external returns (bool);

        event Transfer(address indexed from, address indexed to, uint256 value);
        event Approval(address indexed owner, address indexed spender, uint256 value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{Address, U256};
    use alloy::sol_types::{SolCall, SolEvent};

    #[test]
    fn encode_balance_of() {
        let call = IERC20::balanceOfCall { owner: Address::ZERO };
        let encoded = call.abi_encode();
        // 4 bytes selector + 32 bytes address
        assert_eq!(encoded.len(), 36);
        assert_eq!(&encoded[..4], &[0x70, 0xa0, 0x82, 0x31]);
    }

    #[test]
    fn encode_transfer_from() {
        let call = IERC20::transferFromCall {
            from: Address::with_last_byte(1),
            to: Address::with_last_byte(2),
            amount: U256::from(5u64),
        };
        let encoded = call.abi_encode();
        assert_eq!(encoded.len(), 100);
        // transferFrom(address,address,uint256) selector = 0x23b872dd
        assert_eq!(&encoded[..4], &[0x23, 0xb8, 0x72, 0xdd]);
    }

    #[test]
    fn encode_total_supply() {
        let encoded = IERC20::totalSupplyCall {}.abi_encode();
        // totalSupply() selector = 0x18160ddd
        assert_eq!(encoded, vec![0x18, 0x16, 0x0d, 0xdd]);
    }

    #[test]
    fn encode_allowance() {
        let call = IERC20::allowanceCall {
            owner: Address::ZERO,
            spender: Address::ZERO,
        };
        let encoded = call.abi_encode();
        assert_eq!(encoded.len(), 68);
        // allowance(address,address) selector = 0xdd62ed3e
        assert_eq!(&encoded[..4], &[0xdd, 0x62, 0xed, 0x3e]);
    }

    #[test]
    fn decode_decimals_return() {
        let mut data = vec![0u8; 32];
        data[31] = 18;
        let decoded: u8 = <IERC20::decimalsCall as SolCall>::abi_decode_returns(&data).unwrap();
        assert_eq!(decoded, 18);
    }

    #[test]
    fn transfer_event_signature() {
        assert_eq!(
            IERC20::Transfer::SIGNATURE,
            "Transfer(address,address,uint256)"
        );
    }
}
