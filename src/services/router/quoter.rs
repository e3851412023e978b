// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

//! Quote-side mirror of the route encoders.
//!
//! Plans target the simulate-only interpreter: no transfer-in, every
//! recipient is router custody and every bound is zero. Outputs are decoded
//! back into per-step amounts.

use crate::domain::constants::{ADDRESS_THIS, CONTRACT_BALANCE};
use crate::domain::error::AppError;
use crate::domain::pool::Pool;
use crate::domain::route::{BoostedRoute, Route, Step};
use crate::domain::trade::TradeType;
use crate::services::router::abi::{SwapQuoteOutput, VaultQuoteOutput};
use crate::services::router::commands::Command;
use crate::services::router::encoder::boosted::vault_command;
use crate::services::router::encoder::swap_command;
use crate::services::router::path::{boosted_route_path, pool_route_path, swap_step_path};
use crate::services::router::planner::RoutePlanner;
use alloy::primitives::{Address, Bytes, U160, U256};
use alloy::sol_types::SolValue;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Transport to the quoter interpreter.
#[async_trait]
pub trait QuoterBackend: Send + Sync {
    /// Runs one plan; returns one output blob per command.
    async fn execute(&self, commands: Bytes, inputs: Vec<Bytes>) -> Result<Vec<Bytes>, AppError>;

    /// Runs independent plans in one round-trip. A failing plan yields `None`
    /// without affecting the others; `Err` means the round-trip itself failed.
    async fn execute_batch(&self, calls: Vec<(Bytes, Vec<Bytes>)>) -> Result<Vec<Option<Vec<Bytes>>>, AppError>;
}

/// Live ERC4626 conversion previews.
#[async_trait]
pub trait VaultPreview: Send + Sync {
    async fn preview_deposit(&self, vault: Address, assets: U256) -> Result<U256, AppError>;

    async fn preview_mint(&self, vault: Address, shares: U256) -> Result<U256, AppError>;

    async fn preview_withdraw(&self, vault: Address, assets: U256) -> Result<U256, AppError>;

    async fn preview_redeem(&self, vault: Address, shares: U256) -> Result<U256, AppError>;
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct QuoteRequest {
    pub route: Route,
    pub amount: U256,
    pub trade_type: TradeType,
}

/// Per-command amounts folded from quoter outputs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct QuoteResult {
    pub amounts_out: Vec<U256>,
    pub amounts_in: Vec<U256>,
    pub sqrt_prices: Vec<Vec<U160>>,
    pub gas_estimate: U256,
    /// Pool fee of every swap hop, hundredths of a bip.
    pub fees: Vec<u32>,
}

impl QuoteResult {
    pub fn amount_in(&self) -> U256 {
        self.amounts_in.first().copied().unwrap_or_default()
    }

    pub fn amount_out(&self) -> U256 {
        self.amounts_out.last().copied().unwrap_or_default()
    }
}

/// Exact amounts for each step of a boosted route, computed from the output
/// backwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StepAmounts {
    pub amounts_in: Vec<U256>,
    pub amounts_out: Vec<U256>,
}

impl StepAmounts {
    pub fn amount_in(&self) -> U256 {
        self.amounts_in.first().copied().unwrap_or_default()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OutputKind {
    Swap,
    Vault,
}

/// A quoter plan plus what is needed to decode its outputs.
#[derive(Clone, Debug)]
pub struct QuotePlan {
    planner: RoutePlanner,
    outputs: Vec<OutputKind>,
    fees: Vec<u32>,
    trade_type: TradeType,
    amount: U256,
}

impl QuotePlan {
    pub fn planner(&self) -> &RoutePlanner {
        &self.planner
    }

    fn call(&self) -> (Bytes, Vec<Bytes>) {
        (self.planner.commands(), self.planner.inputs())
    }

    pub fn decode(&self, outputs: &[Bytes]) -> Result<QuoteResult, AppError> {
        if outputs.len() != self.outputs.len() {
            return Err(AppError::Quote(format!(
                "{} outputs for {} commands",
                outputs.len(),
                self.outputs.len()
            )));
        }

        let mut result = QuoteResult {
            fees: self.fees.clone(),
            ..QuoteResult::default()
        };
        let mut running = self.amount;
        for (kind, raw) in self.outputs.iter().zip(outputs) {
            let (amount, sqrt_prices) = match kind {
                OutputKind::Swap => {
                    let out = decode_swap_output(raw)?;
                    result.gas_estimate = result.gas_estimate.saturating_add(out.gasEstimate);
                    (out.amount, out.sqrtPriceX96AfterList)
                }
                OutputKind::Vault => (decode_vault_output(raw)?, Vec::new()),
            };
            result.sqrt_prices.push(sqrt_prices);
            match self.trade_type {
                TradeType::ExactInput => {
                    result.amounts_in.push(running);
                    result.amounts_out.push(amount);
                    running = amount;
                }
                TradeType::ExactOutput => {
                    result.amounts_in.push(amount);
                    result.amounts_out.push(self.amount);
                }
            }
        }
        Ok(result)
    }
}

fn decode_swap_output(raw: &[u8]) -> Result<SwapQuoteOutput, AppError> {
    <SwapQuoteOutput as SolValue>::abi_decode_params(raw)
        .map_err(|err| AppError::Quote(format!("swap output does not decode: {err}")))
}

fn decode_vault_output(raw: &[u8]) -> Result<U256, AppError> {
    <VaultQuoteOutput as SolValue>::abi_decode_params(raw)
        .map(|out| out.amount)
        .map_err(|err| AppError::Quote(format!("vault output does not decode: {err}")))
}

fn swap_fees(pools: &[Pool]) -> Vec<u32> {
    pools.iter().map(Pool::fee).collect()
}

/// Builds the quoter plan for quoting `amount` through `route`.
///
/// Exact-output boosted routes use a single `BOOSTED_SWAP_EXACT_OUT` over the
/// boosted path, which needs at least one swap.
pub fn build_quote_plan(route: &Route, amount: U256, trade_type: TradeType) -> Result<QuotePlan, AppError> {
    let mut planner = RoutePlanner::new();
    let mut outputs = Vec::new();
    match route {
        Route::V2(r) | Route::V3(r) | Route::Integral(r) => {
            let path = pool_route_path(r, trade_type)?;
            planner.add_command(swap_command(
                r.protocol(),
                path,
                trade_type,
                ADDRESS_THIS,
                amount,
                U256::ZERO,
            )?);
            outputs.push(OutputKind::Swap);
        }
        Route::Boosted(r) if trade_type == TradeType::ExactInput => {
            for (i, step) in r.steps().iter().enumerate() {
                let step_amount = if i == 0 { amount } else { CONTRACT_BALANCE };
                if let Some(command) = vault_command(step, ADDRESS_THIS, step_amount, U256::ZERO) {
                    planner.add_command(command);
                    outputs.push(OutputKind::Vault);
                } else if let Step::Swap {
                    token_in,
                    token_out,
                    pool,
                } = step
                {
                    let path = swap_step_path(token_in, token_out, pool, trade_type)?;
                    planner.add_command(swap_command(
                        pool.protocol(),
                        path,
                        trade_type,
                        ADDRESS_THIS,
                        step_amount,
                        U256::ZERO,
                    )?);
                    outputs.push(OutputKind::Swap);
                }
            }
        }
        Route::Boosted(r) => {
            if r.swap_count() == 0 {
                return Err(AppError::UnsupportedRoute(
                    "vault-only exact-output routes are quoted from vault previews".into(),
                ));
            }
            planner.add_command(Command::BoostedSwapExactOut {
                recipient: ADDRESS_THIS,
                amount_out: amount,
                amount_in_max: U256::ZERO,
                path: boosted_route_path(r)?,
            });
            outputs.push(OutputKind::Swap);
        }
    }
    Ok(QuotePlan {
        planner,
        outputs,
        fees: swap_fees(route.pools()),
        trade_type,
        amount,
    })
}

pub struct Quoter<B, V> {
    backend: B,
    vaults: V,
}

impl<B: QuoterBackend, V: VaultPreview> Quoter<B, V> {
    pub fn new(backend: B, vaults: V) -> Self {
        Self { backend, vaults }
    }

    pub async fn quote(&self, route: &Route, amount: U256, trade_type: TradeType) -> Result<QuoteResult, AppError> {
        if let Route::Boosted(r) = route
            && trade_type == TradeType::ExactOutput
            && r.swap_count() == 0
        {
            let steps = self.boosted_step_amounts_out(r, amount).await?;
            return Ok(QuoteResult {
                sqrt_prices: vec![Vec::new(); steps.amounts_out.len()],
                amounts_out: steps.amounts_out,
                amounts_in: steps.amounts_in,
                gas_estimate: U256::ZERO,
                fees: Vec::new(),
            });
        }

        let plan = build_quote_plan(route, amount, trade_type)?;
        let (commands, inputs) = plan.call();
        let outputs = self.backend.execute(commands, inputs).await?;
        let result = plan.decode(&outputs)?;
        tracing::debug!(
            target: "quoter",
            trade_type = ?trade_type,
            amount_in = %result.amount_in(),
            amount_out = %result.amount_out(),
            gas = %result.gas_estimate,
            "Route quoted"
        );
        Ok(result)
    }

    /// Quotes every request in one round-trip. Entries that fail to encode,
    /// revert or fail to decode come back as `None`.
    pub async fn quote_batch(&self, requests: &[QuoteRequest]) -> Vec<Option<QuoteResult>> {
        let plans: Vec<Option<QuotePlan>> = requests
            .iter()
            .enumerate()
            .map(|(idx, req)| {
                build_quote_plan(&req.route, req.amount, req.trade_type)
                    .inspect_err(|err| {
                        tracing::debug!(target: "quoter", entry = idx, error = %err, "Skipping unencodable quote");
                    })
                    .ok()
            })
            .collect();

        let calls: Vec<(Bytes, Vec<Bytes>)> = plans.iter().flatten().map(QuotePlan::call).collect();
        if calls.is_empty() {
            return vec![None; requests.len()];
        }
        let expected = calls.len();
        let mut outputs = match self.backend.execute_batch(calls).await {
            Ok(outputs) if outputs.len() == expected => outputs.into_iter(),
            Ok(outputs) => {
                tracing::warn!(
                    target: "quoter",
                    expected,
                    got = outputs.len(),
                    "Batch quote returned a different number of results"
                );
                return vec![None; requests.len()];
            }
            Err(err) => {
                tracing::warn!(target: "quoter", error = %err, "Batch quote round-trip failed");
                return vec![None; requests.len()];
            }
        };

        plans
            .iter()
            .enumerate()
            .map(|(idx, plan)| {
                let plan = plan.as_ref()?;
                let raw = outputs.next().flatten()?;
                plan.decode(&raw)
                    .inspect_err(|err| {
                        tracing::debug!(target: "quoter", entry = idx, error = %err, "Quote output rejected");
                    })
                    .ok()
            })
            .collect()
    }

    /// Exact output of every step of `route` such that the last step yields
    /// `amount_out`, walking backwards through vault previews and single-pool
    /// exact-output quotes.
    pub async fn boosted_step_amounts_out(&self, route: &BoostedRoute, amount_out: U256) -> Result<StepAmounts, AppError> {
        let steps = route.steps();
        let mut amounts_out = vec![U256::ZERO; steps.len()];
        let mut amounts_in = vec![U256::ZERO; steps.len()];
        let mut needed = amount_out;
        for (i, step) in steps.iter().enumerate().rev() {
            amounts_out[i] = needed;
            needed = match step {
                Step::Unwrap { vault } => self.vaults.preview_withdraw(vault.address(), needed).await?,
                Step::Wrap { vault } => self.vaults.preview_mint(vault.address(), needed).await?,
                Step::Swap {
                    token_in,
                    token_out,
                    pool,
                } => {
                    let path = swap_step_path(token_in, token_out, pool, TradeType::ExactOutput)?;
                    let mut planner = RoutePlanner::new();
                    planner.add_command(swap_command(
                        pool.protocol(),
                        path,
                        TradeType::ExactOutput,
                        ADDRESS_THIS,
                        needed,
                        U256::ZERO,
                    )?);
                    let (commands, inputs) = planner.into_parts();
                    let outputs = self.backend.execute(commands, inputs).await?;
                    let raw = outputs
                        .first()
                        .ok_or_else(|| AppError::Quote("quoter returned no output".into()))?;
                    decode_swap_output(raw)?.amount
                }
            };
            amounts_in[i] = needed;
        }
        Ok(StepAmounts {
            amounts_in,
            amounts_out,
        })
    }

    pub async fn boosted_step_amounts_out_batch(&self, requests: &[(BoostedRoute, U256)]) -> Vec<Option<StepAmounts>> {
        let futures = requests.iter().enumerate().map(|(idx, (route, amount_out))| async move {
            self.boosted_step_amounts_out(route, *amount_out)
                .await
                .inspect_err(|err| {
                    tracing::debug!(target: "quoter", entry = idx, error = %err, "Step amounts unavailable");
                })
                .ok()
        });
        futures::future::join_all(futures).await
    }
}
