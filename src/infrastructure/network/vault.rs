// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::error::AppError;
use crate::infrastructure::network::provider::HttpProvider;
use crate::services::router::abi::IERC4626;
use crate::services::router::quoter::VaultPreview;
use alloy::primitives::{Address, U256};
use async_trait::async_trait;

/// ERC4626 previews read with `eth_call` at the latest block.
#[derive(Clone)]
pub struct RpcVaultPreview {
    provider: HttpProvider,
}

impl RpcVaultPreview {
    pub fn new(provider: HttpProvider) -> Self {
        Self { provider }
    }

    fn vault(&self, vault: Address) -> IERC4626::IERC4626Instance<HttpProvider> {
        IERC4626::new(vault, self.provider.clone())
    }
}

fn preview_error(method: &str, vault: Address, err: impl std::fmt::Display) -> AppError {
    AppError::Quote(format!("{method} on vault {vault} failed: {err}"))
}

#[async_trait]
impl VaultPreview for RpcVaultPreview {
    async fn preview_deposit(&self, vault: Address, assets: U256) -> Result<U256, AppError> {
        self.vault(vault)
            .previewDeposit(assets)
            .call()
            .await
            .map_err(|e| preview_error("previewDeposit", vault, e))
    }

    async fn preview_mint(&self, vault: Address, shares: U256) -> Result<U256, AppError> {
        self.vault(vault)
            .previewMint(shares)
            .call()
            .await
            .map_err(|e| preview_error("previewMint", vault, e))
    }

    async fn preview_withdraw(&self, vault: Address, assets: U256) -> Result<U256, AppError> {
        self.vault(vault)
            .previewWithdraw(assets)
            .call()
            .await
            .map_err(|e| preview_error("previewWithdraw", vault, e))
    }

    async fn preview_redeem(&self, vault: Address, shares: U256) -> Result<U256, AppError> {
        self.vault(vault)
            .previewRedeem(shares)
            .call()
            .await
            .map_err(|e| preview_error("previewRedeem", vault, e))
    }
}
