// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::constants::V2_FEE_PIPS;
use crate::domain::currency::Currency;
use alloy::primitives::{Address, U160, U256};
use serde::{Deserialize, Serialize};

/// Constant-product pair snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct V2Pool {
    pub token0: Currency,
    pub token1: Currency,
    #[serde(default)]
    pub reserve0: U256,
    #[serde(default)]
    pub reserve1: U256,
}

/// Concentrated-liquidity pool identified by its fee tier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct V3Pool {
    pub token0: Currency,
    pub token1: Currency,
    pub fee: u32,
    #[serde(default)]
    pub sqrt_price_x96: U160,
    #[serde(default)]
    pub liquidity: U256,
    #[serde(default)]
    pub tick: i32,
}

/// Integral pool identified by its deployer; `Address::ZERO` is the base deployer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegralPool {
    pub token0: Currency,
    pub token1: Currency,
    #[serde(default)]
    pub deployer: Address,
    /// Dynamic fee at snapshot time, hundredths of a bip.
    #[serde(default)]
    pub fee: u32,
    #[serde(default)]
    pub sqrt_price_x96: U160,
    #[serde(default)]
    pub liquidity: U256,
    #[serde(default)]
    pub tick: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Protocol {
    V2,
    V3,
    Integral,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "protocol", rename_all = "snake_case")]
pub enum Pool {
    V2(V2Pool),
    V3(V3Pool),
    Integral(IntegralPool),
}

impl Pool {
    pub fn protocol(&self) -> Protocol {
        match self {
            Pool::V2(_) => Protocol::V2,
            Pool::V3(_) => Protocol::V3,
            Pool::Integral(_) => Protocol::Integral,
        }
    }

    pub fn tokens(&self) -> (&Currency, &Currency) {
        match self {
            Pool::V2(p) => (&p.token0, &p.token1),
            Pool::V3(p) => (&p.token0, &p.token1),
            Pool::Integral(p) => (&p.token0, &p.token1),
        }
    }

    pub fn involves(&self, currency: &Currency) -> bool {
        let (t0, t1) = self.tokens();
        t0.wraps_to(currency) || t1.wraps_to(currency)
    }

    /// The token on the other side of `currency`, if the pool holds it.
    pub fn other(&self, currency: &Currency) -> Option<&Currency> {
        let (t0, t1) = self.tokens();
        if t0.wraps_to(currency) {
            Some(t1)
        } else if t1.wraps_to(currency) {
            Some(t0)
        } else {
            None
        }
    }

    /// Swap fee in hundredths of a bip.
    pub fn fee(&self) -> u32 {
        match self {
            Pool::V2(_) => V2_FEE_PIPS,
            Pool::V3(p) => p.fee,
            Pool::Integral(p) => p.fee,
        }
    }

    pub fn chain_id(&self) -> u64 {
        self.tokens().0.chain_id()
    }
}
