// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::error::AppError;
use alloy::network::Ethereum;
use alloy::providers::RootProvider;
use url::Url;

pub type HttpProvider = RootProvider<Ethereum>;

pub struct ConnectionFactory;

impl ConnectionFactory {
    pub fn http(rpc_url: &str) -> Result<HttpProvider, AppError> {
        let url = Url::parse(rpc_url).map_err(|e| AppError::Config(format!("Invalid RPC URL: {e}")))?;
        Ok(Self::http_url(url))
    }

    pub fn http_url(url: Url) -> HttpProvider {
        tracing::debug!(target: "config", rpc = %url, "HTTP provider created");
        RootProvider::new_http(url)
    }
}
