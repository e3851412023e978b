// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::currency::Currency;
use crate::domain::pool::Pool;

/// Operation set required to move between two currencies on a boosted route.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SwapType {
    WrapOnly,
    UnwrapOnly,
    UnderlyingToUnderlying,
    UnderlyingToBoosted,
    BoostedToUnderlying,
    BoostedToBoosted,
}

pub fn classify(token_in: &Currency, token_out: &Currency) -> SwapType {
    match (token_in.as_vault(), token_out.as_vault()) {
        (None, Some(out)) if &out.underlying == token_in.wrapped() => SwapType::WrapOnly,
        (None, Some(_)) => SwapType::UnderlyingToBoosted,
        (Some(vin), None) if &vin.underlying == token_out.wrapped() => SwapType::UnwrapOnly,
        (Some(_), None) => SwapType::BoostedToUnderlying,
        (None, None) => SwapType::UnderlyingToUnderlying,
        (Some(_), Some(_)) => SwapType::BoostedToBoosted,
    }
}

/// Whether `pool` can realize the `swap_type` leg between `token_in` and
/// `token_out`. Vault-only types never consult a pool.
pub fn pool_supports_type(pool: &Pool, token_in: &Currency, token_out: &Currency, swap_type: SwapType) -> bool {
    let (t0, t1) = pool.tokens();
    let holds = |c: &Currency| t0.wraps_to(c) || t1.wraps_to(c);
    let holds_vault_over = |c: &Currency| {
        [t0, t1]
            .into_iter()
            .any(|t| t.as_vault().is_some_and(|v| &v.underlying == c.wrapped()))
    };
    match swap_type {
        SwapType::WrapOnly | SwapType::UnwrapOnly => false,
        SwapType::UnderlyingToUnderlying => {
            (holds(token_in) && holds(token_out)) || (holds_vault_over(token_in) && holds_vault_over(token_out))
        }
        SwapType::UnderlyingToBoosted => holds_vault_over(token_in) && holds(token_out),
        SwapType::BoostedToUnderlying => holds(token_in) && holds_vault_over(token_out),
        SwapType::BoostedToBoosted => holds(token_in) && holds(token_out),
    }
}
