// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::amount::{Percent, RoundingBuffer};
use crate::domain::constants;
use crate::domain::error::AppError;
use crate::domain::trade::SwapOptions;
use alloy::primitives::{Address, U256};
use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use serde::Deserialize;
use std::path::Path;
use url::Url;

#[derive(Debug, Deserialize, Clone)]
pub struct EncoderSettings {
    // General
    #[serde(default = "default_false")]
    pub debug: bool,
    #[serde(default = "default_false")]
    pub json_logs: bool,
    pub log_level: Option<String>,
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,

    // Endpoints
    pub rpc_url: Option<String>,
    pub router_address: Option<Address>,
    /// Interpreter answering quote plans.
    pub quoter_address: Option<Address>,
    #[serde(default = "default_multicall")]
    pub multicall_address: Address,

    // Encoding
    #[serde(default = "default_slippage_bps")]
    pub slippage_bps: u64,
    /// Seconds added to "now" for the router deadline; 0 omits the deadline.
    #[serde(default = "default_deadline_secs")]
    pub deadline_secs: u64,
    #[serde(default = "default_rounding_buffer_bps")]
    pub rounding_buffer_bps: u16,
    #[serde(default = "default_false")]
    pub safe_mode: bool,
    /// Command table version the deployed interpreter implements.
    pub command_table_version: Option<u32>,
}

fn default_false() -> bool {
    false
}
fn default_chain_id() -> u64 {
    constants::CHAIN_ETHEREUM
}
fn default_multicall() -> Address {
    constants::MULTICALL3
}
fn default_slippage_bps() -> u64 {
    constants::DEFAULT_SLIPPAGE_BPS
}
fn default_deadline_secs() -> u64 {
    constants::DEFAULT_DEADLINE_SECS
}
fn default_rounding_buffer_bps() -> u16 {
    constants::DEFAULT_ROUNDING_BUFFER_BPS
}

impl EncoderSettings {
    /// Loads `path` (or an optional `router.toml` in the working directory),
    /// then `ROUTER_*` environment variables, which win.
    pub fn load_with_path(path: Option<&str>) -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(Path::new(path)).required(true));
        } else {
            builder = builder.add_source(File::with_name("router").required(false));
        }
        Self::from_builder(builder)
    }

    /// Parses settings from an inline TOML document plus the environment.
    pub fn from_toml_str(raw: &str) -> Result<Self, AppError> {
        Self::from_builder(Config::builder().add_source(File::from_str(raw, FileFormat::Toml)))
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, AppError> {
        let settings: EncoderSettings = builder
            .add_source(Environment::with_prefix("ROUTER").try_parsing(true))
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        tracing::debug!(
            target: "config",
            chain_id = settings.chain_id,
            slippage_bps = settings.slippage_bps,
            rounding_buffer_bps = settings.rounding_buffer_bps,
            "Encoder settings loaded"
        );
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.chain_id == 0 {
            return Err(AppError::Config("chain_id must be non-zero".into()));
        }
        if self.slippage_bps > constants::BPS_DENOMINATOR {
            return Err(AppError::Config(format!(
                "slippage_bps {} exceeds {}",
                self.slippage_bps,
                constants::BPS_DENOMINATOR
            )));
        }
        if u64::from(self.rounding_buffer_bps) >= constants::BPS_DENOMINATOR {
            return Err(AppError::Config(format!(
                "rounding_buffer_bps {} must stay below {}",
                self.rounding_buffer_bps,
                constants::BPS_DENOMINATOR
            )));
        }
        if let Some(raw) = &self.rpc_url {
            Url::parse(raw).map_err(|e| AppError::Config(format!("Invalid RPC URL: {e}")))?;
        }
        Ok(())
    }

    pub fn log_level(&self) -> &str {
        match &self.log_level {
            Some(level) => level,
            None if self.debug => "debug",
            None => constants::DEFAULT_LOG_LEVEL,
        }
    }

    pub fn slippage(&self) -> Result<Percent, AppError> {
        Percent::from_bps(self.slippage_bps)
    }

    pub fn rounding_buffer(&self) -> Result<RoundingBuffer, AppError> {
        RoundingBuffer::new(self.rounding_buffer_bps)
    }

    pub fn rpc_url(&self) -> Result<Url, AppError> {
        let raw = self
            .rpc_url
            .as_deref()
            .ok_or_else(|| AppError::Config("rpc_url is required for quoting".into()))?;
        Url::parse(raw).map_err(|e| AppError::Config(format!("Invalid RPC URL: {e}")))
    }

    pub fn quoter_address(&self) -> Result<Address, AppError> {
        self.quoter_address
            .ok_or_else(|| AppError::Config("quoter_address is required for quoting".into()))
    }

    /// Absolute deadline for a transaction built at `now` (unix seconds).
    pub fn deadline_from(&self, now: u64) -> Option<U256> {
        (self.deadline_secs > 0).then(|| U256::from(now.saturating_add(self.deadline_secs)))
    }

    /// Default swap options for `recipient`; request fields override them.
    pub fn swap_options(&self, recipient: Address, now: u64) -> Result<SwapOptions, AppError> {
        let mut options = SwapOptions::new(recipient, self.slippage()?)
            .with_safe_mode(self.safe_mode)
            .with_rounding_buffer(self.rounding_buffer()?);
        if let Some(deadline) = self.deadline_from(now) {
            options = options.with_deadline(deadline);
        }
        Ok(options)
    }
}
