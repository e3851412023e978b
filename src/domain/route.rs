// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::currency::{Currency, VaultToken};
use crate::domain::error::AppError;
use crate::domain::pool::{Pool, Protocol};
use crate::services::router::classify::{SwapType, classify, pool_supports_type};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A path through pools of a single protocol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolRoute {
    protocol: Protocol,
    path: Vec<Currency>,
    pools: Vec<Pool>,
}

impl PoolRoute {
    pub fn new(protocol: Protocol, path: Vec<Currency>, pools: Vec<Pool>) -> Result<Self, AppError> {
        if pools.is_empty() {
            return Err(AppError::InvalidPath("route has no pools".into()));
        }
        if path.len() != pools.len() + 1 {
            return Err(AppError::InvalidPath(format!(
                "path has {} tokens for {} pools",
                path.len(),
                pools.len()
            )));
        }
        if let Some(pool) = pools.iter().find(|p| p.protocol() != protocol) {
            return Err(AppError::UnsupportedRoute(format!(
                "{:?} pool inside a {:?} route",
                pool.protocol(),
                protocol
            )));
        }
        check_endpoints(&path)?;
        for (hop, pool) in pools.iter().enumerate() {
            check_hop(hop, pool, &path[hop], &path[hop + 1])?;
        }
        Ok(Self {
            protocol,
            path,
            pools,
        })
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    pub fn path(&self) -> &[Currency] {
        &self.path
    }

    pub fn pools(&self) -> &[Pool] {
        &self.pools
    }

    pub fn input(&self) -> &Currency {
        &self.path[0]
    }

    pub fn output(&self) -> &Currency {
        &self.path[self.path.len() - 1]
    }
}

/// One transition of a boosted route.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// Deposit `vault.underlying` into the vault.
    Wrap { vault: VaultToken },
    /// Redeem vault shares for `vault.underlying`.
    Unwrap { vault: VaultToken },
    Swap {
        token_in: Currency,
        token_out: Currency,
        pool: Pool,
    },
}

impl Step {
    pub fn token_in(&self) -> Currency {
        match self {
            Step::Wrap { vault } => Currency::Token(vault.underlying.clone()),
            Step::Unwrap { vault } => Currency::Vault(vault.clone()),
            Step::Swap { token_in, .. } => token_in.clone(),
        }
    }

    pub fn token_out(&self) -> Currency {
        match self {
            Step::Wrap { vault } => Currency::Vault(vault.clone()),
            Step::Unwrap { vault } => Currency::Token(vault.underlying.clone()),
            Step::Swap { token_out, .. } => token_out.clone(),
        }
    }

    pub fn is_swap(&self) -> bool {
        matches!(self, Step::Swap { .. })
    }
}

/// A path mixing pool swaps with vault deposits/redemptions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoostedRoute {
    path: Vec<Currency>,
    pools: Vec<Pool>,
    steps: Vec<Step>,
}

impl BoostedRoute {
    /// Flattens `path` into steps. Adjacent pairs related by a vault become
    /// wrap/unwrap steps and consume no pool; every other pair consumes the
    /// next pool in order.
    pub fn new(path: Vec<Currency>, pools: Vec<Pool>) -> Result<Self, AppError> {
        if path.len() < 2 {
            return Err(AppError::InvalidPath("boosted route needs two tokens".into()));
        }
        check_endpoints(&path)?;

        let mut seen = HashSet::new();
        for currency in &path {
            if !seen.insert(currency.wrapped_address()) {
                return Err(AppError::InvalidPath(format!(
                    "token {} visited twice",
                    currency.wrapped_address()
                )));
            }
        }

        let mut remaining = pools.iter();
        let mut steps = Vec::with_capacity(path.len() - 1);
        for (hop, pair) in path.windows(2).enumerate() {
            let (token_in, token_out) = (&pair[0], &pair[1]);
            let step = match classify(token_in, token_out) {
                SwapType::WrapOnly => Step::Wrap {
                    vault: vault_of(token_out)?,
                },
                SwapType::UnwrapOnly => Step::Unwrap {
                    vault: vault_of(token_in)?,
                },
                _ => {
                    let pool = remaining.next().ok_or_else(|| {
                        AppError::InvalidPath(format!("hop {hop}: swap step has no pool"))
                    })?;
                    check_hop(hop, pool, token_in, token_out)?;
                    Step::Swap {
                        token_in: token_in.clone(),
                        token_out: token_out.clone(),
                        pool: pool.clone(),
                    }
                }
            };
            steps.push(step);
        }
        if remaining.next().is_some() {
            return Err(AppError::InvalidPath(format!(
                "{} pools supplied, {} used",
                pools.len(),
                steps.iter().filter(|s| s.is_swap()).count()
            )));
        }

        Ok(Self { path, pools, steps })
    }

    /// Canonical route between two tokens through at most one pool, shaped by
    /// the pair's swap type.
    pub fn single_pool(
        token_in: Currency,
        token_out: Currency,
        pool: Option<Pool>,
    ) -> Result<Self, AppError> {
        let swap_type = classify(&token_in, &token_out);
        let Some(pool) = pool else {
            return match swap_type {
                SwapType::WrapOnly | SwapType::UnwrapOnly => {
                    Self::new(vec![token_in, token_out], Vec::new())
                }
                other => Err(AppError::UnsupportedRoute(format!(
                    "{other:?} route requires a pool"
                ))),
            };
        };
        if !pool_supports_type(&pool, &token_in, &token_out, swap_type) {
            return Err(AppError::UnsupportedRoute(format!(
                "pool cannot realize a {swap_type:?} swap"
            )));
        }

        let path = match swap_type {
            SwapType::WrapOnly | SwapType::UnwrapOnly => {
                return Err(AppError::UnsupportedRoute(format!(
                    "{swap_type:?} route takes no pool"
                )));
            }
            SwapType::UnderlyingToUnderlying if pool.involves(&token_in) && pool.involves(&token_out) => {
                vec![token_in, token_out]
            }
            SwapType::UnderlyingToUnderlying => {
                let vault_in = pool_vault_over(&pool, &token_in)?;
                let vault_out = pool_vault_over(&pool, &token_out)?;
                vec![token_in, vault_in, vault_out, token_out]
            }
            SwapType::UnderlyingToBoosted => {
                let vault_in = pool_vault_over(&pool, &token_in)?;
                vec![token_in, vault_in, token_out]
            }
            SwapType::BoostedToUnderlying => {
                let vault_out = pool_vault_over(&pool, &token_out)?;
                vec![token_in, vault_out, token_out]
            }
            SwapType::BoostedToBoosted => vec![token_in, token_out],
        };
        Self::new(path, vec![pool])
    }

    pub fn path(&self) -> &[Currency] {
        &self.path
    }

    pub fn pools(&self) -> &[Pool] {
        &self.pools
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn swap_count(&self) -> usize {
        self.steps.iter().filter(|s| s.is_swap()).count()
    }

    pub fn input(&self) -> &Currency {
        &self.path[0]
    }

    pub fn output(&self) -> &Currency {
        &self.path[self.path.len() - 1]
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RouteSpec", into = "RouteSpec")]
pub enum Route {
    V2(PoolRoute),
    V3(PoolRoute),
    Integral(PoolRoute),
    Boosted(BoostedRoute),
}

impl Route {
    pub fn v2(path: Vec<Currency>, pools: Vec<Pool>) -> Result<Self, AppError> {
        PoolRoute::new(Protocol::V2, path, pools).map(Route::V2)
    }

    pub fn v3(path: Vec<Currency>, pools: Vec<Pool>) -> Result<Self, AppError> {
        PoolRoute::new(Protocol::V3, path, pools).map(Route::V3)
    }

    pub fn integral(path: Vec<Currency>, pools: Vec<Pool>) -> Result<Self, AppError> {
        PoolRoute::new(Protocol::Integral, path, pools).map(Route::Integral)
    }

    pub fn boosted(path: Vec<Currency>, pools: Vec<Pool>) -> Result<Self, AppError> {
        BoostedRoute::new(path, pools).map(Route::Boosted)
    }

    pub fn path(&self) -> &[Currency] {
        match self {
            Route::V2(r) | Route::V3(r) | Route::Integral(r) => r.path(),
            Route::Boosted(r) => r.path(),
        }
    }

    pub fn pools(&self) -> &[Pool] {
        match self {
            Route::V2(r) | Route::V3(r) | Route::Integral(r) => r.pools(),
            Route::Boosted(r) => r.pools(),
        }
    }

    pub fn input(&self) -> &Currency {
        &self.path()[0]
    }

    pub fn output(&self) -> &Currency {
        let path = self.path();
        &path[path.len() - 1]
    }

    pub fn is_boosted(&self) -> bool {
        matches!(self, Route::Boosted(_))
    }
}

/// Wire shape of a route; validated into [`Route`] on deserialization.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "protocol", rename_all = "snake_case")]
pub enum RouteSpec {
    V2 { path: Vec<Currency>, pools: Vec<Pool> },
    V3 { path: Vec<Currency>, pools: Vec<Pool> },
    Integral { path: Vec<Currency>, pools: Vec<Pool> },
    Boosted { path: Vec<Currency>, pools: Vec<Pool> },
}

impl TryFrom<RouteSpec> for Route {
    type Error = AppError;

    fn try_from(spec: RouteSpec) -> Result<Self, Self::Error> {
        match spec {
            RouteSpec::V2 { path, pools } => Route::v2(path, pools),
            RouteSpec::V3 { path, pools } => Route::v3(path, pools),
            RouteSpec::Integral { path, pools } => Route::integral(path, pools),
            RouteSpec::Boosted { path, pools } => Route::boosted(path, pools),
        }
    }
}

impl From<Route> for RouteSpec {
    fn from(route: Route) -> Self {
        let path = route.path().to_vec();
        let pools = route.pools().to_vec();
        match route {
            Route::V2(_) => RouteSpec::V2 { path, pools },
            Route::V3(_) => RouteSpec::V3 { path, pools },
            Route::Integral(_) => RouteSpec::Integral { path, pools },
            Route::Boosted(_) => RouteSpec::Boosted { path, pools },
        }
    }
}

fn check_endpoints(path: &[Currency]) -> Result<(), AppError> {
    let chain_id = path[0].chain_id();
    for (idx, currency) in path.iter().enumerate() {
        if currency.chain_id() != chain_id {
            return Err(AppError::InvalidPath(format!("token {idx} is on another chain")));
        }
        if currency.is_native() && idx != 0 && idx != path.len() - 1 {
            return Err(AppError::InvalidPath(format!(
                "native currency at intermediate position {idx}"
            )));
        }
    }
    Ok(())
}

fn check_hop(hop: usize, pool: &Pool, token_in: &Currency, token_out: &Currency) -> Result<(), AppError> {
    if token_in.wraps_to(token_out) {
        return Err(AppError::InvalidPath(format!("hop {hop} swaps a token for itself")));
    }
    match pool.other(token_in) {
        Some(other) if other.wraps_to(token_out) => Ok(()),
        _ => Err(AppError::InvalidPath(format!(
            "hop {hop}: pool does not connect {} -> {}",
            token_in.wrapped_address(),
            token_out.wrapped_address()
        ))),
    }
}

fn vault_of(currency: &Currency) -> Result<VaultToken, AppError> {
    currency
        .as_vault()
        .cloned()
        .ok_or_else(|| AppError::InvalidPath(format!("{} is not a vault", currency.wrapped_address())))
}

fn pool_vault_over(pool: &Pool, underlying: &Currency) -> Result<Currency, AppError> {
    let (t0, t1) = pool.tokens();
    [t0, t1]
        .into_iter()
        .find(|t| {
            t.as_vault()
                .is_some_and(|v| &v.underlying == underlying.wrapped())
        })
        .cloned()
        .ok_or_else(|| {
            AppError::UnsupportedRoute(format!(
                "pool holds no vault over {}",
                underlying.wrapped_address()
            ))
        })
}
