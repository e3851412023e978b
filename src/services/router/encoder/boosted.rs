// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

//! Step-driven encoder for routes mixing pool swaps with ERC4626 vault steps.
//!
//! Only the first step spends an exact amount; every later step spends
//! `CONTRACT_BALANCE` so vault rounding is never miscounted. Intermediate
//! outputs stay in router custody and slippage is enforced once, on the
//! final step.

use crate::domain::constants::{ADDRESS_THIS, CONTRACT_BALANCE};
use crate::domain::currency::VaultToken;
use crate::domain::error::AppError;
use crate::domain::route::{BoostedRoute, Step};
use crate::domain::trade::TradeType;
use crate::services::router::commands::Command;
use crate::services::router::encoder::{RouteContext, swap_command};
use crate::services::router::path::swap_step_path;
use crate::services::router::planner::RoutePlanner;
use alloy::primitives::{Address, U256};

/// Encodes the route and returns the least output delivered to the recipient.
pub fn encode(planner: &mut RoutePlanner, route: &BoostedRoute, ctx: &RouteContext<'_>) -> Result<U256, AppError> {
    match ctx.trade_type {
        TradeType::ExactInput => encode_exact_input(planner, route, ctx),
        TradeType::ExactOutput => encode_exact_output(planner, route, ctx),
    }
}

pub(crate) fn wrap(vault: &VaultToken, recipient: Address, amount: U256, min_amount_out: U256) -> Command {
    Command::Erc4626Wrap {
        wrapper: vault.address(),
        underlying: vault.underlying.address,
        recipient,
        amount,
        min_amount_out,
    }
}

pub(crate) fn unwrap(vault: &VaultToken, recipient: Address, amount: U256, min_amount_out: U256) -> Command {
    Command::Erc4626Unwrap {
        wrapper: vault.address(),
        recipient,
        amount,
        min_amount_out,
    }
}

/// Vault command for a non-swap step; `None` for swaps.
pub(crate) fn vault_command(step: &Step, recipient: Address, amount: U256, min_amount_out: U256) -> Option<Command> {
    match step {
        Step::Wrap { vault } => Some(wrap(vault, recipient, amount, min_amount_out)),
        Step::Unwrap { vault } => Some(unwrap(vault, recipient, amount, min_amount_out)),
        Step::Swap { .. } => None,
    }
}

fn step_swap(
    step: &Step,
    trade_type: TradeType,
    recipient: Address,
    amount: U256,
    bound: U256,
) -> Result<Command, AppError> {
    let Step::Swap {
        token_in,
        token_out,
        pool,
    } = step
    else {
        return Err(AppError::InvalidPath("vault step used as swap".into()));
    };
    let path = swap_step_path(token_in, token_out, pool, trade_type)?;
    swap_command(pool.protocol(), path, trade_type, recipient, amount, bound)
}

fn encode_exact_input(planner: &mut RoutePlanner, route: &BoostedRoute, ctx: &RouteContext<'_>) -> Result<U256, AppError> {
    let steps = route.steps();
    let last = steps.len() - 1;
    for (i, step) in steps.iter().enumerate() {
        let amount = if i == 0 { ctx.amount_in } else { CONTRACT_BALANCE };
        let (recipient, min_out) = if i == last {
            (ctx.recipient, ctx.amount_out)
        } else {
            (ADDRESS_THIS, U256::ZERO)
        };
        let command = match vault_command(step, recipient, amount, min_out) {
            Some(command) => command,
            None => step_swap(step, TradeType::ExactInput, recipient, amount, min_out)?,
        };
        planner.add_command(command);
    }
    Ok(ctx.amount_out)
}

/// Validates the exact-output preconditions before anything is appended.
fn exact_output_amounts<'a>(route: &BoostedRoute, ctx: &RouteContext<'a>) -> Result<&'a [U256], AppError> {
    let swaps = route.swap_count();
    if swaps > 1 {
        return Err(AppError::validation(
            "route.steps",
            format!("exact-output boosted route has {swaps} swap steps; at most one is supported"),
        ));
    }
    let Some(amounts) = ctx.step_amounts_out else {
        return Err(AppError::validation(
            "step_amounts_out",
            "required for exact-output boosted routes",
        ));
    };
    if amounts.len() != route.steps().len() {
        return Err(AppError::validation(
            "step_amounts_out",
            format!(
                "{} amounts for {} steps",
                amounts.len(),
                route.steps().len()
            ),
        ));
    }
    Ok(amounts)
}

/// Exact-output walk: vault steps before the swap convert the whole budget,
/// the swap buys exactly `step_amounts_out[k]`, later vault steps convert that
/// output, then every pre-swap vault step is undone in reverse so unspent
/// budget returns to the route's input token.
///
/// Without a swap nothing can be undone, so the first step spends only the
/// quoted input and the budget headroom stays with the trade-level refund.
fn encode_exact_output(planner: &mut RoutePlanner, route: &BoostedRoute, ctx: &RouteContext<'_>) -> Result<U256, AppError> {
    let amounts = exact_output_amounts(route, ctx)?;
    let steps = route.steps();
    let last = steps.len() - 1;
    // With no swap every step is treated as post-swap.
    let swap_at = steps.iter().position(Step::is_swap);
    let pre_swap = swap_at.unwrap_or(0);
    let first_amount = if swap_at.is_some() {
        ctx.amount_in
    } else {
        ctx.quoted_amount_in
    };
    let delivered = if Some(last) == swap_at {
        amounts[last]
    } else {
        ctx.rounding_buffer.apply(amounts[last])?
    };

    let mut scratch = RoutePlanner::new();
    for (i, step) in steps.iter().enumerate() {
        let amount = if i == 0 { first_amount } else { CONTRACT_BALANCE };
        let recipient = if i == last { ctx.recipient } else { ADDRESS_THIS };

        if Some(i) == swap_at {
            scratch.add_command(step_swap(
                step,
                TradeType::ExactOutput,
                recipient,
                amounts[i],
                amount,
            )?);
            continue;
        }

        let min_out = if i == last { delivered } else { U256::ZERO };
        if let Some(command) = vault_command(step, recipient, amount, min_out) {
            scratch.add_command(command);
        }
    }

    for step in steps[..pre_swap].iter().rev() {
        let command = match step {
            Step::Wrap { vault } => unwrap(vault, ADDRESS_THIS, CONTRACT_BALANCE, U256::ZERO),
            Step::Unwrap { vault } => wrap(vault, ADDRESS_THIS, CONTRACT_BALANCE, U256::ZERO),
            Step::Swap { .. } => continue,
        };
        scratch.add_command(command);
    }

    planner.extend(scratch);
    Ok(delivered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::amount::RoundingBuffer;
    use crate::domain::commands::CommandType;
    use crate::services::router::encoder::fixtures::*;

    fn recipient() -> Address {
        Address::from([0x77; 20])
    }

    fn ctx(trade_type: TradeType, amount_in: u64, amount_out: u64, steps: Option<&[U256]>) -> RouteContext<'_> {
        RouteContext::new(trade_type, recipient(), U256::from(amount_in), U256::from(amount_out))
            .with_step_amounts_out(steps)
            .with_rounding_buffer(RoundingBuffer::new(5).expect("buffer"))
    }

    fn underlying_to_underlying() -> BoostedRoute {
        let va = vault(0xa1, 1);
        let vb = vault(0xb1, 2);
        BoostedRoute::new(
            vec![currency(1), va.clone(), vb.clone(), currency(2)],
            vec![integral(va, vb)],
        )
        .expect("route")
    }

    #[test]
    fn exact_input_threads_balance_sentinel() {
        let route = underlying_to_underlying();
        let mut planner = RoutePlanner::new();
        encode(&mut planner, &route, &ctx(TradeType::ExactInput, 100, 95, None)).expect("encode");
        assert_eq!(
            planner.command_types(),
            vec![
                CommandType::Erc4626Wrap,
                CommandType::IntegralSwapExactIn,
                CommandType::Erc4626Unwrap
            ]
        );

        let decoded: Vec<Command> = planner.entries().iter().map(|e| e.decode().expect("decode")).collect();
        assert_eq!(decoded[0], wrap(route.steps()[0].token_out().as_vault().expect("vault"), ADDRESS_THIS, U256::from(100u64), U256::ZERO));
        let Command::IntegralSwapExactIn {
            recipient: swap_recipient,
            amount_in,
            amount_out_min,
            ..
        } = &decoded[1]
        else {
            panic!("expected swap");
        };
        assert_eq!(*swap_recipient, ADDRESS_THIS);
        assert_eq!(*amount_in, CONTRACT_BALANCE);
        assert_eq!(*amount_out_min, U256::ZERO);
        let Command::Erc4626Unwrap {
            recipient: last_recipient,
            amount,
            min_amount_out,
            ..
        } = &decoded[2]
        else {
            panic!("expected unwrap");
        };
        assert_eq!(*last_recipient, recipient());
        assert_eq!(*amount, CONTRACT_BALANCE);
        assert_eq!(*min_amount_out, U256::from(95u64));
    }

    #[test]
    fn exact_output_unwinds_pre_swap_vault_steps() {
        let route = underlying_to_underlying();
        let steps = [U256::from(110u64), U256::from(100u64), U256::from(100_000u64)];
        let mut planner = RoutePlanner::new();
        encode(&mut planner, &route, &ctx(TradeType::ExactOutput, 120, 100_000, Some(&steps))).expect("encode");
        assert_eq!(
            planner.command_types(),
            vec![
                CommandType::Erc4626Wrap,
                CommandType::IntegralSwapExactOut,
                CommandType::Erc4626Unwrap,
                CommandType::Erc4626Unwrap,
            ]
        );

        let decoded: Vec<Command> = planner.entries().iter().map(|e| e.decode().expect("decode")).collect();
        let Command::IntegralSwapExactOut {
            amount_out,
            amount_in_max,
            ..
        } = &decoded[1]
        else {
            panic!("expected swap");
        };
        assert_eq!(*amount_out, U256::from(100u64));
        assert_eq!(*amount_in_max, CONTRACT_BALANCE);

        let Command::Erc4626Unwrap {
            wrapper,
            recipient: final_recipient,
            min_amount_out,
            ..
        } = &decoded[2]
        else {
            panic!("expected final unwrap");
        };
        assert_eq!(*wrapper, Address::from([0xb1; 20]));
        assert_eq!(*final_recipient, recipient());
        // 5 bps under the expected 100_000
        assert_eq!(*min_amount_out, U256::from(99_950u64));

        // Unwind returns leftover vA shares to A inside the router.
        assert_eq!(
            decoded[3],
            unwrap(
                route.steps()[0].token_out().as_vault().expect("vault"),
                ADDRESS_THIS,
                CONTRACT_BALANCE,
                U256::ZERO
            )
        );
    }

    #[test]
    fn exact_output_rejects_two_swaps_before_appending() {
        let a = currency(1);
        let b = currency(2);
        let c = currency(3);
        let route = BoostedRoute::new(
            vec![a.clone(), b.clone(), c.clone()],
            vec![integral(a, b.clone()), integral(b, c)],
        )
        .expect("route");
        let mut planner = RoutePlanner::new();
        let err = encode(&mut planner, &route, &ctx(TradeType::ExactOutput, 10, 5, None)).unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "route.steps"));
        assert!(planner.is_empty());
    }

    #[test]
    fn exact_output_requires_matching_step_amounts() {
        let route = underlying_to_underlying();
        let mut planner = RoutePlanner::new();
        let err = encode(&mut planner, &route, &ctx(TradeType::ExactOutput, 10, 5, None)).unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "step_amounts_out"));

        let short = [U256::from(1u8)];
        let err = encode(&mut planner, &route, &ctx(TradeType::ExactOutput, 10, 5, Some(&short))).unwrap_err();
        assert!(matches!(err, AppError::Validation { ref message, .. } if message.contains("1 amounts for 3 steps")));
        assert!(planner.is_empty());
    }

    #[test]
    fn exact_output_swap_first_uses_budget_as_max_in() {
        // vA -swap-> vB -> B
        let va = vault(0xa1, 1);
        let vb = vault(0xb1, 2);
        let route = BoostedRoute::new(vec![va.clone(), vb.clone(), currency(2)], vec![integral(va, vb)]).expect("route");
        let steps = [U256::from(50u64), U256::from(49u64)];
        let mut planner = RoutePlanner::new();
        encode(&mut planner, &route, &ctx(TradeType::ExactOutput, 60, 49, Some(&steps))).expect("encode");
        assert_eq!(
            planner.command_types(),
            vec![CommandType::IntegralSwapExactOut, CommandType::Erc4626Unwrap]
        );
        let Command::IntegralSwapExactOut {
            amount_in_max,
            amount_out,
            recipient: swap_recipient,
            ..
        } = planner.entries()[0].decode().expect("decode")
        else {
            panic!("expected swap");
        };
        assert_eq!(amount_in_max, U256::from(60u64));
        assert_eq!(amount_out, U256::from(50u64));
        assert_eq!(swap_recipient, ADDRESS_THIS);
    }

    #[test]
    fn exact_output_unwrap_then_swap_rewraps_leftover() {
        // vA -> A -swap-> B
        let va = vault(0xa1, 1);
        let route = BoostedRoute::new(
            vec![va.clone(), currency(1), currency(2)],
            vec![v3(currency(1), currency(2), 500)],
        )
        .expect("route");
        let steps = [U256::from(80u64), U256::from(70u64)];
        let mut planner = RoutePlanner::new();
        encode(&mut planner, &route, &ctx(TradeType::ExactOutput, 90, 70, Some(&steps))).expect("encode");
        assert_eq!(
            planner.command_types(),
            vec![
                CommandType::Erc4626Unwrap,
                CommandType::V3SwapExactOut,
                CommandType::Erc4626Wrap
            ]
        );
        assert_eq!(
            planner.entries()[2].decode().expect("decode"),
            wrap(va.as_vault().expect("vault"), ADDRESS_THIS, CONTRACT_BALANCE, U256::ZERO)
        );
    }

    #[test]
    fn vault_only_exact_output_spends_quoted_input() {
        let va = vault(0xa1, 1);
        let route = BoostedRoute::new(vec![currency(1), va.clone()], Vec::new()).expect("route");
        let steps = [U256::from(2_000u64)];
        let context = ctx(TradeType::ExactOutput, 1_005, 2_000, Some(&steps)).with_quoted_amount_in(U256::from(1_000u64));
        let mut planner = RoutePlanner::new();
        let delivered = encode(&mut planner, &route, &context).expect("encode");
        assert_eq!(delivered, U256::from(1_999u64));
        assert_eq!(
            planner.entries()[0].decode().expect("decode"),
            wrap(va.as_vault().expect("vault"), recipient(), U256::from(1_000u64), U256::from(1_999u64))
        );
        assert_eq!(planner.len(), 1);
    }

    #[test]
    fn exact_output_reports_buffered_delivery() {
        let route = underlying_to_underlying();
        let steps = [U256::from(110u64), U256::from(100u64), U256::from(100_000u64)];
        let mut planner = RoutePlanner::new();
        let delivered =
            encode(&mut planner, &route, &ctx(TradeType::ExactOutput, 120, 100_000, Some(&steps))).expect("encode");
        assert_eq!(delivered, U256::from(99_950u64));

        // A route ending in its swap delivers the exact amount.
        let va = vault(0xa1, 1);
        let swap_last = BoostedRoute::new(
            vec![currency(1), va.clone(), currency(3)],
            vec![v3(va, currency(3), 500)],
        )
        .expect("route");
        let steps = [U256::from(60u64), U256::from(50u64)];
        let delivered =
            encode(&mut RoutePlanner::new(), &swap_last, &ctx(TradeType::ExactOutput, 40, 50, Some(&steps))).expect("encode");
        assert_eq!(delivered, U256::from(50u64));
    }
}
