//! ABI bindings for the contracts the deployment talks to.
//!
//! Only the functions actually called are declared; bytecode comes from
//! the build artifacts.

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol;
use alloy::sol_types::SolValue;

sol! {
    #[derive(Debug)]
    interface IERC20 {
        function approve(address spender, uint256 amount) external returns (bool);
    }

    #[derive(Debug)]
    interface IUniswapV2Factory {
        function getPair(address tokenA, address tokenB) external view returns (address pair);
    }

    #[derive(Debug)]
    interface IUniswapV2Router02 {
        function addLiquidity(
            address tokenA,
            address tokenB,
            uint256 amountADesired,
            uint256 amountBDesired,
            uint256 amountAMin,
            uint256 amountBMin,
            address to,
            uint256 deadline
        ) external returns (uint256 amountA, uint256 amountB, uint256 liquidity);
    }

    #[derive(Debug)]
    interface IUniswapV2Pair {
        function getReserves() external view returns (uint112 reserve0, uint112 reserve1, uint32 blockTimestampLast);
    }
}

/// `UniswapV2Factory(address feeToSetter)`
pub fn factory_args(fee_to_setter: Address) -> Bytes {
    (fee_to_setter,).abi_encode_params().into()
}

/// `UniswapV2Router02(address factory, address WETH)`
pub fn router_args(factory: Address, weth: Address) -> Bytes {
    (factory, weth).abi_encode_params().into()
}

/// `ERC20PresetFixedSupply(string name, string symbol, uint256 initialSupply, address owner)`
pub fn token_args(name: &str, symbol: &str, initial_supply: U256, owner: Address) -> Bytes {
    (name.to_string(), symbol.to_string(), initial_supply, owner)
        .abi_encode_params()
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::sol_types::SolCall;

    #[test]
    fn test_address_args_are_words() {
        let fee_to_setter = Address::with_last_byte(0xaa);
        let encoded = factory_args(fee_to_setter);
        assert_eq!(encoded.len(), 32);
        assert_eq!(encoded[31], 0xaa);

        let encoded = router_args(Address::with_last_byte(1), Address::with_last_byte(2));
        assert_eq!(encoded.len(), 64);
        assert_eq!(encoded[63], 2);
    }

    #[test]
    fn test_token_args_decode_back() {
        let owner = Address::with_last_byte(7);
        let encoded = token_args("Mehmet", "MEM", U256::from(1000u64), owner);
        let (name, symbol, supply, decoded_owner) =
            <(String, String, U256, Address)>::abi_decode_params(&encoded).unwrap();
        assert_eq!(name, "Mehmet");
        assert_eq!(symbol, "MEM");
        assert_eq!(supply, U256::from(1000u64));
        assert_eq!(decoded_owner, owner);
    }

    #[test]
    fn test_selectors() {
        assert_eq!(IERC20::approveCall::SELECTOR, [0x09, 0x5e, 0xa7, 0xb3]);
        assert_eq!(IUniswapV2Factory::getPairCall::SELECTOR, [0xe6, 0xa4, 0x39, 0x05]);
        assert_eq!(IUniswapV2Pair::getReservesCall::SELECTOR, [0x09, 0x02, 0xf1, 0xac]);
        assert_eq!(IUniswapV2Router02::addLiquidityCall::SELECTOR, [0xe8, 0xe3, 0x37, 0x00]);
    }
}
