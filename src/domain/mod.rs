// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

pub mod amount;
pub mod commands;
pub mod constants;
pub mod currency;
pub mod error;
pub mod pool;
pub mod route;
pub mod trade;
