// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::amount::{CurrencyAmount, Percent, RoundingBuffer};
use crate::domain::currency::Currency;
use crate::domain::error::AppError;
use crate::domain::route::Route;
use alloy::primitives::{Address, Bytes, U160, U256};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeType {
    ExactInput,
    ExactOutput,
}

/// One route of a trade with its quoted amounts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeSwap {
    pub route: Route,
    pub input_amount: U256,
    pub output_amount: U256,
    /// Exact output of every step, computed backwards by the quoter. Required
    /// for exact-output boosted routes.
    #[serde(default)]
    pub step_amounts_out: Option<Vec<U256>>,
}

impl TradeSwap {
    pub fn new(route: Route, input_amount: U256, output_amount: U256) -> Self {
        Self {
            route,
            input_amount,
            output_amount,
            step_amounts_out: None,
        }
    }

    pub fn with_step_amounts_out(mut self, amounts: Vec<U256>) -> Self {
        self.step_amounts_out = Some(amounts);
        self
    }

    pub fn minimum_amount_out(&self, trade_type: TradeType, slippage: &Percent) -> Result<U256, AppError> {
        match trade_type {
            TradeType::ExactOutput => Ok(self.output_amount),
            TradeType::ExactInput => slippage.discount(self.output_amount),
        }
    }

    pub fn maximum_amount_in(&self, trade_type: TradeType, slippage: &Percent) -> Result<U256, AppError> {
        match trade_type {
            TradeType::ExactInput => Ok(self.input_amount),
            TradeType::ExactOutput => slippage.premium(self.input_amount),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trade {
    trade_type: TradeType,
    swaps: Vec<TradeSwap>,
}

impl Trade {
    pub fn new(swaps: Vec<TradeSwap>, trade_type: TradeType) -> Result<Self, AppError> {
        let Some(first) = swaps.first() else {
            return Err(AppError::validation("swaps", "trade has no routes"));
        };
        let input = first.route.input().clone();
        let output = first.route.output().clone();
        let (mut total_in, mut total_out) = (U256::ZERO, U256::ZERO);
        for (idx, swap) in swaps.iter().enumerate() {
            total_in = total_in
                .checked_add(swap.input_amount)
                .ok_or_else(|| AppError::validation("swaps", "total input overflows uint256"))?;
            total_out = total_out
                .checked_add(swap.output_amount)
                .ok_or_else(|| AppError::validation("swaps", "total output overflows uint256"))?;
            if swap.route.input() != &input {
                return Err(AppError::validation(
                    "swaps",
                    format!("route {idx} starts from a different currency"),
                ));
            }
            if swap.route.output() != &output {
                return Err(AppError::validation(
                    "swaps",
                    format!("route {idx} ends in a different currency"),
                ));
            }
        }
        Ok(Self { trade_type, swaps })
    }

    pub fn single(route: Route, input_amount: U256, output_amount: U256, trade_type: TradeType) -> Result<Self, AppError> {
        Self::new(vec![TradeSwap::new(route, input_amount, output_amount)], trade_type)
    }

    pub fn trade_type(&self) -> TradeType {
        self.trade_type
    }

    pub fn swaps(&self) -> &[TradeSwap] {
        &self.swaps
    }

    pub fn input_currency(&self) -> &Currency {
        self.swaps[0].route.input()
    }

    pub fn output_currency(&self) -> &Currency {
        self.swaps[0].route.output()
    }

    pub fn input_amount(&self) -> CurrencyAmount {
        let raw = self
            .swaps
            .iter()
            .fold(U256::ZERO, |acc, s| acc.saturating_add(s.input_amount));
        CurrencyAmount::new(self.input_currency().clone(), raw)
    }

    pub fn output_amount(&self) -> CurrencyAmount {
        let raw = self
            .swaps
            .iter()
            .fold(U256::ZERO, |acc, s| acc.saturating_add(s.output_amount));
        CurrencyAmount::new(self.output_currency().clone(), raw)
    }

    pub fn minimum_amount_out(&self, slippage: &Percent) -> Result<U256, AppError> {
        let out = self.output_amount().raw;
        match self.trade_type {
            TradeType::ExactOutput => Ok(out),
            TradeType::ExactInput => slippage.discount(out),
        }
    }

    pub fn maximum_amount_in(&self, slippage: &Percent) -> Result<U256, AppError> {
        let input = self.input_amount().raw;
        match self.trade_type {
            TradeType::ExactInput => Ok(input),
            TradeType::ExactOutput => slippage.premium(input),
        }
    }
}

/// Pre-signed Permit2 single-token allowance, consumed as-is.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputPermit {
    pub token: Address,
    pub amount: U160,
    pub expiration: u64,
    pub nonce: u64,
    pub spender: Address,
    pub sig_deadline: U256,
    pub signature: Bytes,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwapOptions {
    pub recipient: Address,
    pub slippage: Percent,
    /// Unix timestamp; selects the deadline-checked `execute` overload.
    pub deadline: Option<U256>,
    pub input_permit: Option<InputPermit>,
    /// Sweep any native balance to the recipient at the end of the plan.
    pub safe_mode: bool,
    pub rounding_buffer: RoundingBuffer,
}

impl SwapOptions {
    pub fn new(recipient: Address, slippage: Percent) -> Self {
        Self {
            recipient,
            slippage,
            deadline: None,
            input_permit: None,
            safe_mode: false,
            rounding_buffer: RoundingBuffer::default(),
        }
    }

    pub fn with_deadline(mut self, deadline: U256) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_permit(mut self, permit: InputPermit) -> Self {
        self.input_permit = Some(permit);
        self
    }

    pub fn with_safe_mode(mut self, safe_mode: bool) -> Self {
        self.safe_mode = safe_mode;
        self
    }

    pub fn with_rounding_buffer(mut self, buffer: RoundingBuffer) -> Self {
        self.rounding_buffer = buffer;
        self
    }
}

/// Calldata and native value for the router's `execute` entry point.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MethodParameters {
    pub calldata: Bytes,
    pub value: U256,
}
