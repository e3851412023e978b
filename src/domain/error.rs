// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::commands::CommandType;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Connection failed to endpoint: {0}")]
    Connection(String),

    #[error("Validation failed for field {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Unsupported route: {0}")]
    UnsupportedRoute(String),

    #[error("Command {0:?} cannot be marked as revertible")]
    InvalidRevertFlag(CommandType),

    #[error("Native input cannot be combined with a Permit2 permit")]
    NativeInputWithPermit,

    #[error("Quote failed: {0}")]
    Quote(String),

    #[error("Command table mismatch: {0}")]
    CommandTable(String),

    #[error(transparent)]
    Unknown(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}
