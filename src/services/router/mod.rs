// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

//! Router-side plan construction and its quote-side mirror.

pub mod abi;
pub mod classify;
pub mod commands;
pub mod encoder;
pub mod path;
pub mod planner;
pub mod quoter;
pub mod swap_router;

pub use planner::RoutePlanner;
pub use quoter::{QuoteResult, Quoter};
pub use swap_router::SwapRouter;
