// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

//! JSON request documents accepted by the binary.

use crate::app::config::EncoderSettings;
use crate::domain::amount::{Percent, RoundingBuffer};
use crate::domain::error::AppError;
use crate::domain::trade::{InputPermit, SwapOptions, Trade, TradeSwap, TradeType};
use crate::services::router::quoter::QuoteRequest;
use alloy::primitives::{Address, U256};
use serde::Deserialize;
use serde::de::DeserializeOwned;

fn parse_json<T: DeserializeOwned>(raw: &str) -> Result<T, AppError> {
    serde_json::from_str(raw).map_err(|e| AppError::validation("request", e.to_string()))
}

/// A trade to encode. Optional fields fall back to [`EncoderSettings`].
#[derive(Clone, Debug, Deserialize)]
pub struct EncodeRequest {
    pub trade_type: TradeType,
    pub swaps: Vec<TradeSwap>,
    pub recipient: Address,
    pub slippage_bps: Option<u64>,
    /// Absolute unix deadline; overrides `deadline_secs`.
    pub deadline: Option<U256>,
    pub permit: Option<InputPermit>,
    pub safe_mode: Option<bool>,
    pub rounding_buffer_bps: Option<u16>,
}

impl EncodeRequest {
    pub fn from_json(raw: &str) -> Result<Self, AppError> {
        parse_json(raw)
    }

    pub fn into_parts(self, settings: &EncoderSettings, now: u64) -> Result<(Trade, SwapOptions), AppError> {
        let mut options = settings.swap_options(self.recipient, now)?;
        if let Some(bps) = self.slippage_bps {
            options.slippage = Percent::from_bps(bps)?;
        }
        if let Some(deadline) = self.deadline {
            options.deadline = Some(deadline);
        }
        if let Some(permit) = self.permit {
            options.input_permit = Some(permit);
        }
        if let Some(safe_mode) = self.safe_mode {
            options.safe_mode = safe_mode;
        }
        if let Some(bps) = self.rounding_buffer_bps {
            options.rounding_buffer = RoundingBuffer::new(bps)?;
        }
        let trade = Trade::new(self.swaps, self.trade_type)?;
        Ok((trade, options))
    }
}

/// One quote or a batch of them.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum QuoteInput {
    Single(QuoteRequest),
    Batch(Vec<QuoteRequest>),
}

impl QuoteInput {
    pub fn from_json(raw: &str) -> Result<Self, AppError> {
        parse_json(raw)
    }
}
