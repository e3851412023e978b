// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

//! V2, V3 and Integral routes: one swap primitive over the whole path.
//! V2 paths are `address[]`; V3 and Integral paths are packed and encoded
//! output first for exact-output swaps.

use crate::domain::error::AppError;
use crate::domain::route::PoolRoute;
use crate::domain::trade::TradeType;
use crate::services::router::encoder::{RouteContext, swap_command};
use crate::services::router::path::pool_route_path;
use crate::services::router::planner::RoutePlanner;
use alloy::primitives::U256;

pub fn encode(planner: &mut RoutePlanner, route: &PoolRoute, ctx: &RouteContext<'_>) -> Result<U256, AppError> {
    let path = pool_route_path(route, ctx.trade_type)?;
    let (amount, bound) = match ctx.trade_type {
        TradeType::ExactInput => (ctx.amount_in, ctx.amount_out),
        TradeType::ExactOutput => (ctx.amount_out, ctx.amount_in),
    };
    planner.add_command(swap_command(
        route.protocol(),
        path,
        ctx.trade_type,
        ctx.recipient,
        amount,
        bound,
    )?);
    Ok(ctx.amount_out)
}
