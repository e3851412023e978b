// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

//! Opcode table shared with the on-chain interpreter.
//!
//! Values are a wire contract: the interpreter dispatches on nested opcode
//! ranges, so renumbering an entry silently reroutes funds. Any change here
//! must bump [`COMMAND_TABLE_VERSION`].

use crate::domain::error::AppError;
use alloy::primitives::{B256, keccak256};
use std::collections::HashSet;

pub const COMMAND_TABLE_VERSION: u32 = 3;

/// Set on a command byte when the interpreter may continue past its failure.
pub const FLAG_ALLOW_REVERT: u8 = 0x80;
/// Bits of a command byte that carry the opcode.
pub const COMMAND_TYPE_MASK: u8 = 0x3f;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CommandType {
    V3SwapExactIn = 0x00,
    V3SwapExactOut = 0x01,
    Permit2TransferFrom = 0x02,
    Permit2PermitBatch = 0x03,
    Sweep = 0x04,
    Transfer = 0x05,
    PayPortion = 0x06,
    V2SwapExactIn = 0x08,
    V2SwapExactOut = 0x09,
    Permit2Permit = 0x0a,
    WrapEth = 0x0b,
    UnwrapWeth = 0x0c,
    Permit2TransferFromBatch = 0x0d,
    BalanceCheckErc20 = 0x0e,
    IntegralSwapExactIn = 0x10,
    IntegralSwapExactOut = 0x11,
    IntegralPositionManagerPermit = 0x12,
    IntegralPositionManagerCall = 0x13,
    Erc4626Wrap = 0x14,
    Erc4626Unwrap = 0x15,
    BoostedSwapExactOut = 0x16,
    ExecuteSubPlan = 0x21,
}

pub const ALL_COMMANDS: [CommandType; 22] = [
    CommandType::V3SwapExactIn,
    CommandType::V3SwapExactOut,
    CommandType::Permit2TransferFrom,
    CommandType::Permit2PermitBatch,
    CommandType::Sweep,
    CommandType::Transfer,
    CommandType::PayPortion,
    CommandType::V2SwapExactIn,
    CommandType::V2SwapExactOut,
    CommandType::Permit2Permit,
    CommandType::WrapEth,
    CommandType::UnwrapWeth,
    CommandType::Permit2TransferFromBatch,
    CommandType::BalanceCheckErc20,
    CommandType::IntegralSwapExactIn,
    CommandType::IntegralSwapExactOut,
    CommandType::IntegralPositionManagerPermit,
    CommandType::IntegralPositionManagerCall,
    CommandType::Erc4626Wrap,
    CommandType::Erc4626Unwrap,
    CommandType::BoostedSwapExactOut,
    CommandType::ExecuteSubPlan,
];

const REVERTIBLE_COMMANDS: [CommandType; 1] = [CommandType::ExecuteSubPlan];

impl CommandType {
    pub fn opcode(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            CommandType::V3SwapExactIn => "V3_SWAP_EXACT_IN",
            CommandType::V3SwapExactOut => "V3_SWAP_EXACT_OUT",
            CommandType::Permit2TransferFrom => "PERMIT2_TRANSFER_FROM",
            CommandType::Permit2PermitBatch => "PERMIT2_PERMIT_BATCH",
            CommandType::Sweep => "SWEEP",
            CommandType::Transfer => "TRANSFER",
            CommandType::PayPortion => "PAY_PORTION",
            CommandType::V2SwapExactIn => "V2_SWAP_EXACT_IN",
            CommandType::V2SwapExactOut => "V2_SWAP_EXACT_OUT",
            CommandType::Permit2Permit => "PERMIT2_PERMIT",
            CommandType::WrapEth => "WRAP_ETH",
            CommandType::UnwrapWeth => "UNWRAP_WETH",
            CommandType::Permit2TransferFromBatch => "PERMIT2_TRANSFER_FROM_BATCH",
            CommandType::BalanceCheckErc20 => "BALANCE_CHECK_ERC20",
            CommandType::IntegralSwapExactIn => "INTEGRAL_SWAP_EXACT_IN",
            CommandType::IntegralSwapExactOut => "INTEGRAL_SWAP_EXACT_OUT",
            CommandType::IntegralPositionManagerPermit => "INTEGRAL_POSITION_MANAGER_PERMIT",
            CommandType::IntegralPositionManagerCall => "INTEGRAL_POSITION_MANAGER_CALL",
            CommandType::Erc4626Wrap => "ERC4626_WRAP",
            CommandType::Erc4626Unwrap => "ERC4626_UNWRAP",
            CommandType::BoostedSwapExactOut => "BOOSTED_SWAP_EXACT_OUT",
            CommandType::ExecuteSubPlan => "EXECUTE_SUB_PLAN",
        }
    }

    pub fn is_revertible(self) -> bool {
        REVERTIBLE_COMMANDS.contains(&self)
    }

    /// Inverse of [`CommandType::opcode`]; flag bits are masked off first.
    pub fn from_byte(byte: u8) -> Option<Self> {
        let opcode = byte & COMMAND_TYPE_MASK;
        ALL_COMMANDS.iter().copied().find(|c| c.opcode() == opcode)
    }
}

/// keccak256 over `opcode || name` for every table entry, in table order.
pub fn command_table_fingerprint() -> B256 {
    let mut material = Vec::new();
    for command in ALL_COMMANDS {
        material.push(command.opcode());
        material.extend_from_slice(command.name().as_bytes());
    }
    keccak256(material)
}

/// Startup self-check of the opcode table.
///
/// `expected_version` is the interpreter ABI version the deployment was
/// configured against; `None` skips the version comparison but still checks
/// the table's internal consistency.
pub fn verify_command_table(expected_version: Option<u32>) -> Result<(), AppError> {
    if let Some(expected) = expected_version
        && expected != COMMAND_TABLE_VERSION
    {
        return Err(AppError::CommandTable(format!(
            "interpreter expects table v{expected}, encoder ships v{COMMAND_TABLE_VERSION}"
        )));
    }

    let mut seen = HashSet::new();
    for command in ALL_COMMANDS {
        if command.opcode() & !COMMAND_TYPE_MASK != 0 {
            return Err(AppError::CommandTable(format!(
                "{} opcode {:#04x} overlaps flag bits",
                command.name(),
                command.opcode()
            )));
        }
        if !seen.insert(command.opcode()) {
            return Err(AppError::CommandTable(format!(
                "duplicate opcode {:#04x}",
                command.opcode()
            )));
        }
    }
    if REVERTIBLE_COMMANDS
        .iter()
        .any(|c| !ALL_COMMANDS.contains(c))
    {
        return Err(AppError::CommandTable(
            "revertible whitelist references unknown command".into(),
        ));
    }

    tracing::debug!(
        target: "config",
        version = COMMAND_TABLE_VERSION,
        fingerprint = %command_table_fingerprint(),
        "Command table verified"
    );
    Ok(())
}
