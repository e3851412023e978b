// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::commands::{CommandType, FLAG_ALLOW_REVERT};
use crate::domain::error::AppError;
use crate::services::router::commands::Command;
use alloy::primitives::Bytes;

/// One entry of a plan: the command byte and its input are stored together so
/// `commands[i]` and `inputs[i]` cannot drift apart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannedCommand {
    pub command_type: CommandType,
    pub allow_revert: bool,
    pub input: Bytes,
}

impl PlannedCommand {
    pub fn command_byte(&self) -> u8 {
        let flag = if self.allow_revert { FLAG_ALLOW_REVERT } else { 0 };
        self.command_type.opcode() | flag
    }

    pub fn decode(&self) -> Result<Command, AppError> {
        Command::decode(self.command_type, &self.input)
    }
}

/// Append-only plan builder for a single encode call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoutePlanner {
    entries: Vec<PlannedCommand>,
}

impl RoutePlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_command(&mut self, command: Command) {
        self.entries.push(PlannedCommand {
            command_type: command.command_type(),
            allow_revert: false,
            input: command.encode(),
        });
    }

    pub fn add_command_with_revert(&mut self, command: Command, allow_revert: bool) -> Result<(), AppError> {
        let command_type = command.command_type();
        if allow_revert && !command_type.is_revertible() {
            return Err(AppError::InvalidRevertFlag(command_type));
        }
        self.entries.push(PlannedCommand {
            command_type,
            allow_revert,
            input: command.encode(),
        });
        Ok(())
    }

    /// Nests `sub` as one `EXECUTE_SUB_PLAN` command.
    pub fn add_sub_plan(&mut self, sub: &RoutePlanner, allow_revert: bool) -> Result<(), AppError> {
        self.add_command_with_revert(
            Command::ExecuteSubPlan {
                commands: sub.commands(),
                inputs: sub.inputs(),
            },
            allow_revert,
        )
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[PlannedCommand] {
        &self.entries
    }

    pub fn command_types(&self) -> Vec<CommandType> {
        self.entries.iter().map(|e| e.command_type).collect()
    }

    pub fn commands(&self) -> Bytes {
        self.entries.iter().map(PlannedCommand::command_byte).collect::<Vec<u8>>().into()
    }

    pub fn inputs(&self) -> Vec<Bytes> {
        self.entries.iter().map(|e| e.input.clone()).collect()
    }

    pub fn into_parts(self) -> (Bytes, Vec<Bytes>) {
        let commands = self.commands();
        let inputs = self.entries.into_iter().map(|e| e.input).collect();
        (commands, inputs)
    }

    /// Appends every entry of `other`, keeping order.
    pub fn extend(&mut self, other: RoutePlanner) {
        self.entries.extend(other.entries);
    }

    /// Rebuilds a planner from raw `(commands, inputs)`, e.g. to inspect calldata.
    pub fn from_parts(commands: &[u8], inputs: &[Bytes]) -> Result<Self, AppError> {
        if commands.len() != inputs.len() {
            return Err(AppError::validation(
                "inputs",
                format!("{} commands for {} inputs", commands.len(), inputs.len()),
            ));
        }
        let mut entries = Vec::with_capacity(commands.len());
        for (byte, input) in commands.iter().zip(inputs) {
            let command_type = CommandType::from_byte(*byte).ok_or_else(|| {
                AppError::validation("commands", format!("unknown command byte {byte:#04x}"))
            })?;
            entries.push(PlannedCommand {
                command_type,
                allow_revert: byte & FLAG_ALLOW_REVERT != 0,
                input: input.clone(),
            });
        }
        Ok(Self { entries })
    }
}
