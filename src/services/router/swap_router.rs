// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::constants::{ADDRESS_THIS, ETH_ADDRESS};
use crate::domain::error::AppError;
use crate::domain::trade::{InputPermit, MethodParameters, SwapOptions, Trade, TradeType};
use crate::services::router::abi::{UniversalRouter, UniversalRouterDeadline};
use crate::services::router::commands::Command;
use crate::services::router::encoder::{RouteContext, encode_route};
use crate::services::router::planner::RoutePlanner;
use alloy::primitives::{Address, Bytes, U160, U256};
use alloy::sol_types::SolCall;

/// Largest value the interpreter accepts for a Permit2 `uint48` field.
const MAX_UINT48: u64 = (1 << 48) - 1;

/// Encodes trades into calldata for the router's `execute` entry point.
pub struct SwapRouter;

impl SwapRouter {
    pub fn swap_call_parameters(trade: &Trade, options: &SwapOptions) -> Result<MethodParameters, AppError> {
        let (planner, value) = Self::plan(trade, options)?;
        let (commands, inputs) = planner.into_parts();
        let calldata = encode_execute(commands, inputs, options.deadline);
        tracing::debug!(
            target: "router",
            routes = trade.swaps().len(),
            trade_type = ?trade.trade_type(),
            calldata_len = calldata.len(),
            value = %value,
            "Swap calldata encoded"
        );
        Ok(MethodParameters { calldata, value })
    }

    /// Builds the full plan and the native value to attach.
    pub fn plan(trade: &Trade, options: &SwapOptions) -> Result<(RoutePlanner, U256), AppError> {
        let input = trade.input_currency();
        let output = trade.output_currency();
        let input_native = input.is_native();
        let output_native = output.is_native();

        if input_native && options.input_permit.is_some() {
            return Err(AppError::NativeInputWithPermit);
        }
        if let Some(permit) = &options.input_permit {
            check_permit(permit, input.wrapped_address())?;
        }

        let trade_type = trade.trade_type();
        let slippage = &options.slippage;
        let min_out = trade.minimum_amount_out(slippage)?;
        let max_in = trade.maximum_amount_in(slippage)?;
        let aggregated = trade_type == TradeType::ExactInput && trade.swaps().len() > 1;
        let router_must_custody = output_native || aggregated;

        let mut planner = RoutePlanner::new();
        let mut value = U256::ZERO;

        if let Some(permit) = &options.input_permit {
            planner.add_command(Command::Permit2Permit(permit.clone()));
        }
        if input_native {
            planner.add_command(Command::WrapEth {
                recipient: ADDRESS_THIS,
                amount: max_in,
            });
            value = max_in;
        } else {
            let amount = U160::checked_from_uint(max_in).ok_or_else(|| {
                AppError::validation("input_amount", format!("{max_in} exceeds the Permit2 uint160 range"))
            })?;
            planner.add_command(Command::Permit2TransferFrom {
                token: input.wrapped_address(),
                recipient: ADDRESS_THIS,
                amount,
            });
        }

        let route_recipient = if router_must_custody {
            ADDRESS_THIS
        } else {
            options.recipient
        };
        // Least total output the routes guarantee to deliver.
        let mut delivered = U256::ZERO;
        for (idx, swap) in trade.swaps().iter().enumerate() {
            let ctx = match trade_type {
                TradeType::ExactInput => {
                    let amount_out = if aggregated {
                        U256::ZERO
                    } else {
                        swap.minimum_amount_out(trade_type, slippage)?
                    };
                    RouteContext::new(trade_type, route_recipient, swap.input_amount, amount_out)
                }
                TradeType::ExactOutput => RouteContext::new(
                    trade_type,
                    route_recipient,
                    swap.maximum_amount_in(trade_type, slippage)?,
                    swap.output_amount,
                )
                .with_quoted_amount_in(swap.input_amount),
            }
            .with_step_amounts_out(swap.step_amounts_out.as_deref())
            .with_rounding_buffer(options.rounding_buffer);

            let route_out = encode_route(&mut planner, &swap.route, &ctx).inspect_err(|err| {
                tracing::warn!(target: "router", route = idx, error = %err, "Route encoding failed");
            })?;
            delivered = delivered
                .checked_add(route_out)
                .ok_or_else(|| AppError::validation("swaps", "delivered output overflows uint256"))?;
        }

        if router_must_custody {
            // Exact-output routes may land inside their rounding buffer, so the
            // payout checks what they guarantee rather than the quoted target.
            let payout = match trade_type {
                TradeType::ExactInput => min_out,
                TradeType::ExactOutput => delivered,
            };
            if output_native {
                planner.add_command(Command::UnwrapWeth {
                    recipient: options.recipient,
                    amount_min: payout,
                });
            } else {
                planner.add_command(Command::Sweep {
                    token: output.wrapped_address(),
                    recipient: options.recipient,
                    amount_min: payout,
                });
            }
        }

        if trade_type == TradeType::ExactOutput {
            if input_native {
                planner.add_command(Command::UnwrapWeth {
                    recipient: options.recipient,
                    amount_min: U256::ZERO,
                });
            } else {
                planner.add_command(Command::Sweep {
                    token: input.wrapped_address(),
                    recipient: options.recipient,
                    amount_min: U256::ZERO,
                });
            }
        }

        if options.safe_mode {
            planner.add_command(Command::Sweep {
                token: ETH_ADDRESS,
                recipient: options.recipient,
                amount_min: U256::ZERO,
            });
        }

        Ok((planner, value))
    }
}

fn check_permit(permit: &InputPermit, input_token: Address) -> Result<(), AppError> {
    if permit.token != input_token {
        return Err(AppError::validation(
            "input_permit.token",
            format!("permit covers {} but the trade spends {input_token}", permit.token),
        ));
    }
    if permit.expiration > MAX_UINT48 || permit.nonce > MAX_UINT48 {
        return Err(AppError::validation(
            "input_permit",
            "expiration and nonce must fit in uint48",
        ));
    }
    Ok(())
}

/// ABI-encodes `execute`, choosing the deadline overload when one is set.
pub fn encode_execute(commands: Bytes, inputs: Vec<Bytes>, deadline: Option<U256>) -> Bytes {
    match deadline {
        Some(deadline) => UniversalRouterDeadline::executeCall {
            commands,
            inputs,
            deadline,
        }
        .abi_encode()
        .into(),
        None => UniversalRouter::executeCall { commands, inputs }.abi_encode().into(),
    }
}

/// Splits router calldata back into `(commands, inputs, deadline)`.
pub fn decode_execute(calldata: &[u8]) -> Result<(Bytes, Vec<Bytes>, Option<U256>), AppError> {
    if let Ok(call) = UniversalRouterDeadline::executeCall::abi_decode(calldata) {
        return Ok((call.commands, call.inputs, Some(call.deadline)));
    }
    UniversalRouter::executeCall::abi_decode(calldata)
        .map(|call| (call.commands, call.inputs, None))
        .map_err(|err| AppError::validation("calldata", format!("not an execute call: {err}")))
}
