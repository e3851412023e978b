// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::error::AppError;
use alloy::primitives::Bytes;

pub fn strip_0x(s: &str) -> &str {
    s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s)
}

pub fn parse_hex_bytes(s: &str) -> Option<Vec<u8>> {
    hex::decode(strip_0x(s.trim())).ok()
}

/// Hex calldata as read from a file or argument; surrounding whitespace is ignored.
pub fn parse_calldata(s: &str) -> Result<Bytes, AppError> {
    parse_hex_bytes(s)
        .map(Bytes::from)
        .ok_or_else(|| AppError::validation("calldata", "not valid hex"))
}
