// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use alloy::primitives::{Address, U256, address};
use lazy_static::lazy_static;
use std::collections::HashMap;

// Common assets
pub const WETH_MAINNET: Address = address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");
pub const WETH_OPTIMISM: Address = address!("4200000000000000000000000000000000000006");
pub const WETH_ARBITRUM: Address = address!("82aF49447D8a07e3bd95BD0d56f35241523fBab1");
pub const WETH_POLYGON: Address = address!("7ceB23fD6bC0adD59E62ac25578270cFf1b9f619");
pub const WBNB_BSC: Address = address!("BB4CdB9CBd36B01bD1cBaEBF2De08d9173bc095c");
pub const WETH_BASE: Address = address!("4200000000000000000000000000000000000006");

// =============================================================================
// NETWORK CONSTANTS
// =============================================================================

pub const CHAIN_ETHEREUM: u64 = 1;
pub const CHAIN_OPTIMISM: u64 = 10;
pub const CHAIN_BSC: u64 = 56;
pub const CHAIN_POLYGON: u64 = 137;
pub const CHAIN_BASE: u64 = 8453;
pub const CHAIN_ARBITRUM: u64 = 42161;

pub const MULTICALL3: Address = address!("cA11bde05977b3631167028862bE2a173976CA11");

// =============================================================================
// INTERPRETER SENTINELS
// =============================================================================
// Shared bit-for-bit with the on-chain interpreter; substituted at execution time.

/// Recipient meaning "the account that called the router".
pub const MSG_SENDER: Address = address!("0000000000000000000000000000000000000001");
/// Recipient meaning "the router contract itself".
pub const ADDRESS_THIS: Address = address!("0000000000000000000000000000000000000002");
/// Token address used by `SWEEP` for the native currency.
pub const ETH_ADDRESS: Address = Address::ZERO;
/// Amount meaning "the router's entire balance of the token", i.e. `1 << 255`.
pub const CONTRACT_BALANCE: U256 = U256::from_limbs([0, 0, 0, 0x8000_0000_0000_0000]);

// =============================================================================
// ENCODING DEFAULTS
// =============================================================================

pub const BPS_DENOMINATOR: u64 = 10_000;
pub const DEFAULT_SLIPPAGE_BPS: u64 = 50;
pub const DEFAULT_DEADLINE_SECS: u64 = 1_800;
/// Downward margin on minimums derived from vault previews (floor-rounding noise).
pub const DEFAULT_ROUNDING_BUFFER_BPS: u16 = 5;
/// Fee reported for constant-product hops (0.3%, in hundredths of a bip).
pub const V2_FEE_PIPS: u32 = 3_000;

lazy_static! {
    pub static ref WRAPPED_NATIVE_BY_CHAIN: HashMap<u64, Address> = {
        let mut m = HashMap::new();
        m.insert(CHAIN_ETHEREUM, WETH_MAINNET);
        m.insert(CHAIN_OPTIMISM, WETH_OPTIMISM);
        m.insert(CHAIN_ARBITRUM, WETH_ARBITRUM);
        m.insert(CHAIN_POLYGON, WETH_POLYGON);
        m.insert(CHAIN_BSC, WBNB_BSC);
        m.insert(CHAIN_BASE, WETH_BASE);
        m
    };
}

// =============================================================================
// LOGGING DEFAULTS
// =============================================================================

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Wrapped-native contract of a supported chain.
pub fn wrapped_native_for_chain(chain_id: u64) -> Option<Address> {
    WRAPPED_NATIVE_BY_CHAIN.get(&chain_id).copied()
}
