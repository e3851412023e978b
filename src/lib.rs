// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

pub mod app;
pub mod common;
pub mod domain;
pub mod infrastructure;
pub mod services;

pub use domain::error::AppError;
pub use services::router::{QuoteResult, Quoter, RoutePlanner, SwapRouter};
