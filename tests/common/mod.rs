// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>
// Shared fixtures for the integration tests: token/pool builders, a model
// ledger that executes decoded plans at fixed rates, and in-memory quoter
// backends.
#![allow(dead_code)]

use alloy::primitives::{Address, Bytes, U160, U256};
use alloy::sol_types::SolValue;
use async_trait::async_trait;
use mitander_router::domain::constants::{ADDRESS_THIS, CONTRACT_BALANCE, ETH_ADDRESS, MSG_SENDER};
use mitander_router::domain::currency::{Currency, Token, VaultToken};
use mitander_router::domain::error::AppError;
use mitander_router::domain::pool::{IntegralPool, Pool, V2Pool, V3Pool};
use mitander_router::services::router::abi::{SwapQuoteOutput, VaultQuoteOutput};
use mitander_router::services::router::commands::Command;
use mitander_router::services::router::planner::RoutePlanner;
use mitander_router::services::router::quoter::{QuoterBackend, VaultPreview};
use std::collections::HashMap;
use std::sync::Mutex;

pub const CHAIN: u64 = 1;

pub fn token(byte: u8, decimals: u8) -> Token {
    Token::new(CHAIN, Address::from([byte; 20]), decimals)
}

pub fn weth() -> Token {
    token(0xee, 18)
}

pub fn eth() -> Currency {
    Currency::native(weth())
}

pub fn usdc() -> Currency {
    token(0x11, 6).into()
}

pub fn erc20(byte: u8) -> Currency {
    token(byte, 18).into()
}

/// Vault share `share` over the 18-decimal token `underlying`.
pub fn vault(share: u8, underlying: u8) -> Currency {
    Currency::Vault(VaultToken::new(token(share, 18), token(underlying, 18)))
}

pub fn v2(a: Currency, b: Currency) -> Pool {
    Pool::V2(V2Pool {
        token0: a,
        token1: b,
        reserve0: U256::ZERO,
        reserve1: U256::ZERO,
    })
}

pub fn v3(a: Currency, b: Currency, fee: u32) -> Pool {
    Pool::V3(V3Pool {
        token0: a,
        token1: b,
        fee,
        sqrt_price_x96: U160::ZERO,
        liquidity: U256::ZERO,
        tick: 0,
    })
}

pub fn integral(a: Currency, b: Currency) -> Pool {
    Pool::Integral(IntegralPool {
        token0: a,
        token1: b,
        deployer: Address::from([0xde; 20]),
        fee: 100,
        sqrt_price_x96: U160::ZERO,
        liquidity: U256::ZERO,
        tick: 0,
    })
}

pub fn recipient() -> Address {
    Address::from([0x77; 20])
}

pub fn u(v: u64) -> U256 {
    U256::from(v)
}

pub fn decoded(planner: &RoutePlanner) -> Vec<Command> {
    planner
        .entries()
        .iter()
        .map(|entry| entry.decode().expect("decode"))
        .collect()
}

/// Shares minted per unit of underlying, by vault share address.
#[derive(Clone, Default)]
pub struct VaultRates(HashMap<Address, (Address, u64)>);

impl VaultRates {
    pub fn with(mut self, vault: &Currency, rate: u64) -> Self {
        let v = vault.as_vault().expect("vault");
        self.0.insert(v.address(), (v.underlying.address, rate));
        self
    }

    pub fn rate(&self, vault: Address) -> u64 {
        self.0.get(&vault).map(|(_, r)| *r).unwrap_or(1)
    }

    pub fn underlying(&self, vault: Address) -> Option<Address> {
        self.0.get(&vault).map(|(u, _)| *u)
    }

    pub fn to_shares(&self, vault: Address, assets: U256) -> U256 {
        assets * u(self.rate(vault))
    }

    pub fn to_assets(&self, vault: Address, shares: U256) -> U256 {
        shares / u(self.rate(vault))
    }

    /// Assets needed to mint `shares`, rounding up.
    pub fn assets_for_shares(&self, vault: Address, shares: U256) -> U256 {
        let rate = u(self.rate(vault));
        (shares + rate - U256::from(1u8)) / rate
    }
}

/// Model of the interpreter's token movements. Pools trade 1:1, vaults at
/// their configured rate, and every bound the plan carries is enforced.
pub struct Ledger {
    balances: HashMap<(Address, Address), U256>,
    rates: VaultRates,
    weth: Address,
    pub user: Address,
    pub router: Address,
}

impl Ledger {
    pub fn new(rates: VaultRates) -> Self {
        Self {
            balances: HashMap::new(),
            rates,
            weth: weth().address,
            user: Address::from([0x55; 20]),
            router: Address::from([0x90; 20]),
        }
    }

    pub fn fund_user(&mut self, token: Address, amount: U256) {
        self.credit(self.user, token, amount);
    }

    pub fn balance(&self, holder: Address, token: Address) -> U256 {
        self.balances.get(&(holder, token)).copied().unwrap_or_default()
    }

    /// Tokens the router still holds, with their balances.
    pub fn router_leftovers(&self) -> Vec<(Address, U256)> {
        let mut out: Vec<(Address, U256)> = self
            .balances
            .iter()
            .filter(|((holder, _), bal)| *holder == self.router && !bal.is_zero())
            .map(|((_, token), bal)| (*token, *bal))
            .collect();
        out.sort();
        out
    }

    fn credit(&mut self, holder: Address, token: Address, amount: U256) {
        *self.balances.entry((holder, token)).or_default() += amount;
    }

    fn debit(&mut self, holder: Address, token: Address, amount: U256) -> Result<(), String> {
        let bal = self.balance(holder, token);
        if bal < amount {
            return Err(format!("{holder} holds {bal} of {token}, needs {amount}"));
        }
        self.balances.insert((holder, token), bal - amount);
        Ok(())
    }

    fn holder(&self, recipient: Address) -> Address {
        if recipient == ADDRESS_THIS {
            self.router
        } else if recipient == MSG_SENDER {
            self.user
        } else {
            recipient
        }
    }

    fn amount(&self, amount: U256, token: Address) -> U256 {
        if amount == CONTRACT_BALANCE {
            self.balance(self.router, token)
        } else {
            amount
        }
    }

    fn swap_in(&mut self, token_in: Address, token_out: Address, recipient: Address, amount_in: U256, min: U256) -> Result<(), String> {
        let amount = self.amount(amount_in, token_in);
        self.debit(self.router, token_in, amount)?;
        if amount < min {
            return Err(format!("swap out {amount} below minimum {min}"));
        }
        let to = self.holder(recipient);
        self.credit(to, token_out, amount);
        Ok(())
    }

    fn swap_out(&mut self, token_in: Address, token_out: Address, recipient: Address, amount_out: U256, max: U256) -> Result<(), String> {
        let max = self.amount(max, token_in);
        if amount_out > max {
            return Err(format!("swap needs {amount_out} above maximum {max}"));
        }
        self.debit(self.router, token_in, amount_out)?;
        let to = self.holder(recipient);
        self.credit(to, token_out, amount_out);
        Ok(())
    }

    pub fn execute(&mut self, planner: &RoutePlanner, value: U256) -> Result<(), String> {
        self.debit(self.user, ETH_ADDRESS, value)?;
        self.credit(self.router, ETH_ADDRESS, value);
        for (idx, command) in decoded(planner).into_iter().enumerate() {
            self.apply(command).map_err(|err| format!("command {idx}: {err}"))?;
        }
        Ok(())
    }

    fn apply(&mut self, command: Command) -> Result<(), String> {
        match command {
            Command::Permit2Permit(_) => Ok(()),
            Command::Permit2TransferFrom { token, recipient, amount } => {
                let amount = U256::from(amount);
                self.debit(self.user, token, amount)?;
                let to = self.holder(recipient);
                self.credit(to, token, amount);
                Ok(())
            }
            Command::WrapEth { recipient, amount } => {
                let amount = self.amount(amount, ETH_ADDRESS);
                self.debit(self.router, ETH_ADDRESS, amount)?;
                let to = self.holder(recipient);
                self.credit(to, self.weth, amount);
                Ok(())
            }
            Command::UnwrapWeth { recipient, amount_min } => {
                let amount = self.balance(self.router, self.weth);
                if amount < amount_min {
                    return Err(format!("unwrap {amount} below minimum {amount_min}"));
                }
                self.debit(self.router, self.weth, amount)?;
                let to = self.holder(recipient);
                self.credit(to, ETH_ADDRESS, amount);
                Ok(())
            }
            Command::Sweep { token, recipient, amount_min } => {
                let amount = self.balance(self.router, token);
                if amount < amount_min {
                    return Err(format!("sweep {amount} below minimum {amount_min}"));
                }
                self.debit(self.router, token, amount)?;
                let to = self.holder(recipient);
                self.credit(to, token, amount);
                Ok(())
            }
            Command::V2SwapExactIn { recipient, amount_in, amount_out_min, path } => {
                let (first, last) = (path[0], path[path.len() - 1]);
                self.swap_in(first, last, recipient, amount_in, amount_out_min)
            }
            Command::V2SwapExactOut { recipient, amount_out, amount_in_max, path } => {
                let (first, last) = (path[0], path[path.len() - 1]);
                self.swap_out(first, last, recipient, amount_out, amount_in_max)
            }
            Command::V3SwapExactIn { recipient, amount_in, amount_out_min, path }
            | Command::IntegralSwapExactIn { recipient, amount_in, amount_out_min, path } => {
                let (first, last) = packed_ends(&path);
                self.swap_in(first, last, recipient, amount_in, amount_out_min)
            }
            // Exact-output packed paths are output-first.
            Command::V3SwapExactOut { recipient, amount_out, amount_in_max, path }
            | Command::IntegralSwapExactOut { recipient, amount_out, amount_in_max, path } => {
                let (first, last) = packed_ends(&path);
                self.swap_out(last, first, recipient, amount_out, amount_in_max)
            }
            Command::Erc4626Wrap { wrapper, underlying, recipient, amount, min_amount_out } => {
                let assets = self.amount(amount, underlying);
                self.debit(self.router, underlying, assets)?;
                let shares = self.rates.to_shares(wrapper, assets);
                if shares < min_amount_out {
                    return Err(format!("wrap {shares} below minimum {min_amount_out}"));
                }
                let to = self.holder(recipient);
                self.credit(to, wrapper, shares);
                Ok(())
            }
            Command::Erc4626Unwrap { wrapper, recipient, amount, min_amount_out } => {
                let underlying = self
                    .rates
                    .underlying(wrapper)
                    .ok_or_else(|| format!("unknown vault {wrapper}"))?;
                let shares = self.amount(amount, wrapper);
                self.debit(self.router, wrapper, shares)?;
                let assets = self.rates.to_assets(wrapper, shares);
                if assets < min_amount_out {
                    return Err(format!("unwrap {assets} below minimum {min_amount_out}"));
                }
                let to = self.holder(recipient);
                self.credit(to, underlying, assets);
                Ok(())
            }
            other => Err(format!("router plans never carry {other:?}")),
        }
    }
}

fn packed_ends(path: &Bytes) -> (Address, Address) {
    (
        Address::from_slice(&path[..20]),
        Address::from_slice(&path[path.len() - 20..]),
    )
}

/// Quoter interpreter stand-in: pools trade 1:1 and vaults use `rates`.
/// A plan reverts when any step touches an amount in `revert_amounts`.
pub struct MockQuoterBackend {
    pub rates: VaultRates,
    pub calls: Mutex<usize>,
    pub batch_fails: bool,
    pub revert_amounts: Vec<U256>,
}

impl MockQuoterBackend {
    pub fn new(rates: VaultRates) -> Self {
        Self {
            rates,
            calls: Mutex::new(0),
            batch_fails: false,
            revert_amounts: Vec::new(),
        }
    }

    fn swap_output(amount: U256) -> Bytes {
        SwapQuoteOutput {
            amount,
            sqrtPriceX96AfterList: vec![U160::from(1u64) << 96],
            gasEstimate: U256::from(90_000u64),
        }
        .abi_encode_params()
        .into()
    }

    fn vault_output(amount: U256) -> Bytes {
        VaultQuoteOutput { amount }.abi_encode_params().into()
    }

    fn simulate(&self, commands: &[u8], inputs: &[Bytes]) -> Result<Vec<Bytes>, AppError> {
        let planner = RoutePlanner::from_parts(commands, inputs)?;
        let mut running = U256::ZERO;
        let mut outputs = Vec::new();
        for entry in planner.entries() {
            let resolve = |amount: U256| if amount == CONTRACT_BALANCE { running } else { amount };
            let (out, raw) = match entry.decode()? {
                Command::V2SwapExactIn { amount_in, .. }
                | Command::V3SwapExactIn { amount_in, .. }
                | Command::IntegralSwapExactIn { amount_in, .. } => {
                    let amount = resolve(amount_in);
                    (amount, Self::swap_output(amount))
                }
                Command::V2SwapExactOut { amount_out, .. }
                | Command::V3SwapExactOut { amount_out, .. }
                | Command::IntegralSwapExactOut { amount_out, .. }
                | Command::BoostedSwapExactOut { amount_out, .. } => {
                    if self.revert_amounts.contains(&amount_out) {
                        return Err(AppError::Quote("execution reverted".into()));
                    }
                    (amount_out, Self::swap_output(amount_out))
                }
                Command::Erc4626Wrap { wrapper, amount, .. } => {
                    let shares = self.rates.to_shares(wrapper, resolve(amount));
                    (shares, Self::vault_output(shares))
                }
                Command::Erc4626Unwrap { wrapper, amount, .. } => {
                    let assets = self.rates.to_assets(wrapper, resolve(amount));
                    (assets, Self::vault_output(assets))
                }
                other => return Err(AppError::Quote(format!("quoter cannot run {other:?}"))),
            };
            if self.revert_amounts.contains(&out) {
                return Err(AppError::Quote("execution reverted".into()));
            }
            running = out;
            outputs.push(raw);
        }
        Ok(outputs)
    }
}

#[async_trait]
impl QuoterBackend for MockQuoterBackend {
    async fn execute(&self, commands: Bytes, inputs: Vec<Bytes>) -> Result<Vec<Bytes>, AppError> {
        *self.calls.lock().expect("lock") += 1;
        self.simulate(&commands, &inputs)
    }

    async fn execute_batch(&self, calls: Vec<(Bytes, Vec<Bytes>)>) -> Result<Vec<Option<Vec<Bytes>>>, AppError> {
        *self.calls.lock().expect("lock") += 1;
        if self.batch_fails {
            return Err(AppError::Connection("multicall unreachable".into()));
        }
        Ok(calls
            .iter()
            .map(|(commands, inputs)| self.simulate(commands, inputs).ok())
            .collect())
    }
}

pub struct MockVaults(pub VaultRates);

#[async_trait]
impl VaultPreview for MockVaults {
    async fn preview_deposit(&self, vault: Address, assets: U256) -> Result<U256, AppError> {
        Ok(self.0.to_shares(vault, assets))
    }

    async fn preview_mint(&self, vault: Address, shares: U256) -> Result<U256, AppError> {
        Ok(self.0.assets_for_shares(vault, shares))
    }

    async fn preview_withdraw(&self, vault: Address, assets: U256) -> Result<U256, AppError> {
        if self.0.underlying(vault).is_none() {
            return Err(AppError::Quote(format!("{vault} is not a vault")));
        }
        Ok(self.0.to_shares(vault, assets))
    }

    async fn preview_redeem(&self, vault: Address, shares: U256) -> Result<U256, AppError> {
        Ok(self.0.to_assets(vault, shares))
    }
}
