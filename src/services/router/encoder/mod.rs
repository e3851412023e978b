// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

//! Per-protocol route encoders.
//!
//! Every encoder reads its input from router custody and writes the route's
//! output to [`RouteContext::recipient`]. Routes are encoded into a scratch
//! planner and only merged on success, so a failing route never leaves
//! commands behind.

pub mod boosted;
pub mod pool;

use crate::domain::amount::RoundingBuffer;
use crate::domain::error::AppError;
use crate::domain::pool::Protocol;
use crate::domain::route::Route;
use crate::domain::trade::TradeType;
use crate::services::router::commands::Command;
use crate::services::router::path::SwapPath;
use crate::services::router::planner::RoutePlanner;
use alloy::primitives::{Address, U256};

/// Amounts and destination for encoding one route.
#[derive(Clone, Debug)]
pub struct RouteContext<'a> {
    pub trade_type: TradeType,
    /// Final destination of this route's output.
    pub recipient: Address,
    /// Exact input (exact-in) or maximum input (exact-out).
    pub amount_in: U256,
    /// Minimum output (exact-in) or exact output (exact-out).
    pub amount_out: U256,
    /// Quoted input before slippage. Exact-output routes without a swap
    /// spend exactly this.
    pub quoted_amount_in: U256,
    pub step_amounts_out: Option<&'a [U256]>,
    pub rounding_buffer: RoundingBuffer,
}

impl<'a> RouteContext<'a> {
    pub fn new(trade_type: TradeType, recipient: Address, amount_in: U256, amount_out: U256) -> Self {
        Self {
            trade_type,
            recipient,
            amount_in,
            amount_out,
            quoted_amount_in: amount_in,
            step_amounts_out: None,
            rounding_buffer: RoundingBuffer::default(),
        }
    }

    pub fn with_quoted_amount_in(mut self, amount: U256) -> Self {
        self.quoted_amount_in = amount;
        self
    }

    pub fn with_step_amounts_out(mut self, amounts: Option<&'a [U256]>) -> Self {
        self.step_amounts_out = amounts;
        self
    }

    pub fn with_rounding_buffer(mut self, buffer: RoundingBuffer) -> Self {
        self.rounding_buffer = buffer;
        self
    }
}

/// Encodes `route` and returns the least output it delivers to
/// `ctx.recipient` without reverting.
pub fn encode_route(planner: &mut RoutePlanner, route: &Route, ctx: &RouteContext<'_>) -> Result<U256, AppError> {
    let mut scratch = RoutePlanner::new();
    let delivered = match route {
        Route::V2(r) | Route::V3(r) | Route::Integral(r) => pool::encode(&mut scratch, r, ctx)?,
        Route::Boosted(r) => boosted::encode(&mut scratch, r, ctx)?,
    };
    tracing::trace!(
        target: "router",
        commands = ?scratch.command_types(),
        delivered = %delivered,
        "Route encoded"
    );
    planner.extend(scratch);
    Ok(delivered)
}

/// Swap primitive for `protocol` in `trade_type` direction.
///
/// `amount` is the exact side and `bound` the slippage side of the trade.
pub(crate) fn swap_command(
    protocol: Protocol,
    path: SwapPath,
    trade_type: TradeType,
    recipient: Address,
    amount: U256,
    bound: U256,
) -> Result<Command, AppError> {
    let command = match (protocol, path, trade_type) {
        (Protocol::V2, SwapPath::Addresses(path), TradeType::ExactInput) => Command::V2SwapExactIn {
            recipient,
            amount_in: amount,
            amount_out_min: bound,
            path,
        },
        (Protocol::V2, SwapPath::Addresses(path), TradeType::ExactOutput) => Command::V2SwapExactOut {
            recipient,
            amount_out: amount,
            amount_in_max: bound,
            path,
        },
        (Protocol::V3, SwapPath::Packed(path), TradeType::ExactInput) => Command::V3SwapExactIn {
            recipient,
            amount_in: amount,
            amount_out_min: bound,
            path,
        },
        (Protocol::V3, SwapPath::Packed(path), TradeType::ExactOutput) => Command::V3SwapExactOut {
            recipient,
            amount_out: amount,
            amount_in_max: bound,
            path,
        },
        (Protocol::Integral, SwapPath::Packed(path), TradeType::ExactInput) => {
            Command::IntegralSwapExactIn {
                recipient,
                amount_in: amount,
                amount_out_min: bound,
                path,
            }
        }
        (Protocol::Integral, SwapPath::Packed(path), TradeType::ExactOutput) => {
            Command::IntegralSwapExactOut {
                recipient,
                amount_out: amount,
                amount_in_max: bound,
                path,
            }
        }
        (protocol, path, _) => {
            return Err(AppError::UnsupportedRoute(format!(
                "{protocol:?} swap cannot take a {} path",
                match path {
                    SwapPath::Addresses(_) => "address[]",
                    SwapPath::Packed(_) => "packed",
                }
            )));
        }
    };
    Ok(command)
}
