// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

//! Byte layouts parsed by the interpreter's swap primitives.

use crate::domain::currency::Currency;
use crate::domain::error::AppError;
use crate::domain::pool::Pool;
use crate::domain::route::{BoostedRoute, PoolRoute, Step};
use crate::domain::trade::TradeType;
use alloy::primitives::{Address, Bytes};
use alloy::primitives::aliases::U24;

const ADDRESS_BYTES: usize = 20;

/// Fixed-width pool identifier interleaved between tokens of a packed path.
pub trait PathIdentifier: Sized + Copy + PartialEq + std::fmt::Debug {
    const WIDTH: usize;

    fn write(&self, out: &mut Vec<u8>) -> Result<(), AppError>;

    fn read(bytes: &[u8]) -> Result<Self, AppError>;
}

/// Concentrated-liquidity fee tier, 3 bytes big-endian.
impl PathIdentifier for u32 {
    const WIDTH: usize = 3;

    fn write(&self, out: &mut Vec<u8>) -> Result<(), AppError> {
        let fee = U24::try_from(*self)
            .map_err(|_| AppError::InvalidPath(format!("fee {self} does not fit in 24 bits")))?;
        out.extend_from_slice(&fee.to_be_bytes::<3>());
        Ok(())
    }

    fn read(bytes: &[u8]) -> Result<Self, AppError> {
        U24::try_from_be_slice(bytes)
            .map(|v| v.to::<u32>())
            .ok_or_else(|| AppError::InvalidPath("truncated fee".into()))
    }
}

/// Integral pool deployer, 20 bytes.
impl PathIdentifier for Address {
    const WIDTH: usize = ADDRESS_BYTES;

    fn write(&self, out: &mut Vec<u8>) -> Result<(), AppError> {
        out.extend_from_slice(self.as_slice());
        Ok(())
    }

    fn read(bytes: &[u8]) -> Result<Self, AppError> {
        if bytes.len() != ADDRESS_BYTES {
            return Err(AppError::InvalidPath("truncated deployer".into()));
        }
        Ok(Address::from_slice(bytes))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackedPath<I> {
    pub tokens: Vec<Address>,
    pub idents: Vec<I>,
}

/// `token0 || ident0 || token1 || ... || tokenN`
pub fn encode_packed_path<I: PathIdentifier>(tokens: &[Address], idents: &[I]) -> Result<Bytes, AppError> {
    if tokens.len() < 2 || idents.len() + 1 != tokens.len() {
        return Err(AppError::InvalidPath(format!(
            "{} tokens for {} pools",
            tokens.len(),
            idents.len()
        )));
    }
    let mut out = Vec::with_capacity(tokens.len() * ADDRESS_BYTES + idents.len() * I::WIDTH);
    out.extend_from_slice(tokens[0].as_slice());
    for (ident, token) in idents.iter().zip(&tokens[1..]) {
        ident.write(&mut out)?;
        out.extend_from_slice(token.as_slice());
    }
    Ok(out.into())
}

pub fn decode_packed_path<I: PathIdentifier>(path: &[u8]) -> Result<PackedPath<I>, AppError> {
    let hop_bytes = I::WIDTH + ADDRESS_BYTES;
    if path.len() < ADDRESS_BYTES + hop_bytes || (path.len() - ADDRESS_BYTES) % hop_bytes != 0 {
        return Err(AppError::InvalidPath(format!(
            "packed path of {} bytes is not 20 + k*{hop_bytes}",
            path.len()
        )));
    }

    let mut tokens = vec![Address::from_slice(&path[..ADDRESS_BYTES])];
    let mut idents = Vec::new();
    for hop in path[ADDRESS_BYTES..].chunks_exact(hop_bytes) {
        idents.push(I::read(&hop[..I::WIDTH])?);
        tokens.push(Address::from_slice(&hop[I::WIDTH..]));
    }
    Ok(PackedPath { tokens, idents })
}

/// Same hops, output first. Exact-output primitives walk the path backwards.
pub fn reverse_packed_path<I: PathIdentifier>(tokens: &[Address], idents: &[I]) -> Result<Bytes, AppError> {
    let tokens: Vec<Address> = tokens.iter().rev().copied().collect();
    let idents: Vec<I> = idents.iter().rev().copied().collect();
    encode_packed_path(&tokens, &idents)
}

/// Constant-product `address[]` path; input first in both directions.
pub fn v2_path(path: &[Currency]) -> Vec<Address> {
    path.iter().map(Currency::wrapped_address).collect()
}

/// Path payload for one of the three pool protocols.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SwapPath {
    Addresses(Vec<Address>),
    Packed(Bytes),
}

fn pool_fee(pool: &Pool) -> Result<u32, AppError> {
    match pool {
        Pool::V3(p) => Ok(p.fee),
        other => Err(AppError::UnsupportedRoute(format!(
            "{:?} pool in a fee path",
            other.protocol()
        ))),
    }
}

fn pool_deployer(pool: &Pool) -> Result<Address, AppError> {
    match pool {
        Pool::Integral(p) => Ok(p.deployer),
        other => Err(AppError::UnsupportedRoute(format!(
            "{:?} pool in a deployer path",
            other.protocol()
        ))),
    }
}

fn packed_for_pools(
    tokens: &[Address],
    pools: &[Pool],
    trade_type: TradeType,
) -> Result<Bytes, AppError> {
    let exact_output = trade_type == TradeType::ExactOutput;
    match pools.first() {
        Some(Pool::V3(_)) => {
            let fees = pools.iter().map(pool_fee).collect::<Result<Vec<_>, _>>()?;
            if exact_output {
                reverse_packed_path(tokens, &fees)
            } else {
                encode_packed_path(tokens, &fees)
            }
        }
        Some(Pool::Integral(_)) => {
            let deployers = pools.iter().map(pool_deployer).collect::<Result<Vec<_>, _>>()?;
            if exact_output {
                reverse_packed_path(tokens, &deployers)
            } else {
                encode_packed_path(tokens, &deployers)
            }
        }
        Some(Pool::V2(_)) => Ok(Bytes::new()),
        None => Err(AppError::InvalidPath("path has no pools".into())),
    }
}

/// Encodes a single-protocol route for `trade_type`.
pub fn pool_route_path(route: &PoolRoute, trade_type: TradeType) -> Result<SwapPath, AppError> {
    let tokens = v2_path(route.path());
    match route.pools().first() {
        Some(Pool::V2(_)) => Ok(SwapPath::Addresses(tokens)),
        _ => packed_for_pools(&tokens, route.pools(), trade_type).map(SwapPath::Packed),
    }
}

/// Encodes the one-pool path of a boosted swap step.
pub fn swap_step_path(
    token_in: &Currency,
    token_out: &Currency,
    pool: &Pool,
    trade_type: TradeType,
) -> Result<SwapPath, AppError> {
    let tokens = [token_in.wrapped_address(), token_out.wrapped_address()];
    match pool {
        Pool::V2(_) => Ok(SwapPath::Addresses(tokens.to_vec())),
        _ => packed_for_pools(&tokens, std::slice::from_ref(pool), trade_type).map(SwapPath::Packed),
    }
}

/// Vault action applied next to a swap in a boosted path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WrapAction {
    None = 0,
    Wrap = 1,
    Unwrap = 2,
}

impl WrapAction {
    fn of(step: &Step) -> Self {
        match step {
            Step::Wrap { .. } => WrapAction::Wrap,
            Step::Unwrap { .. } => WrapAction::Unwrap,
            Step::Swap { .. } => WrapAction::None,
        }
    }

    fn from_byte(byte: u8) -> Result<Self, AppError> {
        match byte {
            0 => Ok(WrapAction::None),
            1 => Ok(WrapAction::Wrap),
            2 => Ok(WrapAction::Unwrap),
            other => Err(AppError::InvalidPath(format!("unknown wrap action {other}"))),
        }
    }
}

/// One swap of a boosted path as seen by the quoter, output side first.
///
/// `token_out`/`token_in` are the externally visible tokens; the pool tokens
/// differ from them exactly when the matching wrap action is not `None`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoostedPathHop {
    pub token_out: Address,
    pub wrap_out: WrapAction,
    pub pool_token_out: Address,
    pub deployer: Address,
    pub pool_token_in: Address,
    pub wrap_in: WrapAction,
    pub token_in: Address,
}

const BOOSTED_RECORD_BYTES: usize = 1 + ADDRESS_BYTES * 3 + 1 + ADDRESS_BYTES;

/// Builds the hop records for `route` by walking its swaps in reverse.
///
/// A vault step directly before a swap becomes that swap's `wrap_in`; only
/// the vault step after the last swap becomes a `wrap_out`. Two vault steps in
/// a row cannot be expressed.
pub fn boosted_path_hops(route: &BoostedRoute) -> Result<Vec<BoostedPathHop>, AppError> {
    let steps = route.steps();
    let swap_positions: Vec<usize> = steps
        .iter()
        .enumerate()
        .filter(|(_, s)| s.is_swap())
        .map(|(i, _)| i)
        .collect();
    let (Some(&first_swap), Some(&last_swap)) = (swap_positions.first(), swap_positions.last()) else {
        return Err(AppError::InvalidPath("boosted path needs a swap step".into()));
    };
    if first_swap > 1 || steps.len() - last_swap > 2 {
        return Err(AppError::InvalidPath(
            "more than one vault step at a route end".into(),
        ));
    }
    for pair in swap_positions.windows(2) {
        if pair[1] - pair[0] > 2 {
            return Err(AppError::InvalidPath(
                "more than one vault step between swaps".into(),
            ));
        }
    }

    let mut hops = Vec::with_capacity(swap_positions.len());
    for (n, &pos) in swap_positions.iter().enumerate().rev() {
        let Step::Swap {
            token_in,
            token_out,
            pool,
        } = &steps[pos]
        else {
            continue;
        };
        let deployer = pool_deployer(pool)?;

        let (ext_out, wrap_out) = match steps.get(pos + 1) {
            Some(next) if n + 1 == swap_positions.len() => {
                (next.token_out().wrapped_address(), WrapAction::of(next))
            }
            _ => (token_out.wrapped_address(), WrapAction::None),
        };
        let (ext_in, wrap_in) = match pos.checked_sub(1).map(|i| &steps[i]) {
            Some(prev) if !prev.is_swap() => (prev.token_in().wrapped_address(), WrapAction::of(prev)),
            _ => (token_in.wrapped_address(), WrapAction::None),
        };

        hops.push(BoostedPathHop {
            token_out: ext_out,
            wrap_out,
            pool_token_out: token_out.wrapped_address(),
            deployer,
            pool_token_in: token_in.wrapped_address(),
            wrap_in,
            token_in: ext_in,
        });
    }
    Ok(hops)
}

/// `tokenOut || (wrapOut poolOut deployer poolIn wrapIn tokenIn)*`
///
/// Each record's `token_in` doubles as the next record's `token_out`.
pub fn encode_boosted_path(hops: &[BoostedPathHop]) -> Result<Bytes, AppError> {
    let Some(first) = hops.first() else {
        return Err(AppError::InvalidPath("boosted path has no hops".into()));
    };
    for (idx, pair) in hops.windows(2).enumerate() {
        if pair[0].token_in != pair[1].token_out {
            return Err(AppError::InvalidPath(format!(
                "boosted hop {idx} ends at {} but hop {} starts at {}",
                pair[0].token_in,
                idx + 1,
                pair[1].token_out
            )));
        }
    }

    let mut out = Vec::with_capacity(ADDRESS_BYTES + hops.len() * BOOSTED_RECORD_BYTES);
    out.extend_from_slice(first.token_out.as_slice());
    for hop in hops {
        out.push(hop.wrap_out as u8);
        out.extend_from_slice(hop.pool_token_out.as_slice());
        out.extend_from_slice(hop.deployer.as_slice());
        out.extend_from_slice(hop.pool_token_in.as_slice());
        out.push(hop.wrap_in as u8);
        out.extend_from_slice(hop.token_in.as_slice());
    }
    Ok(out.into())
}

pub fn decode_boosted_path(path: &[u8]) -> Result<Vec<BoostedPathHop>, AppError> {
    if path.len() < ADDRESS_BYTES + BOOSTED_RECORD_BYTES
        || (path.len() - ADDRESS_BYTES) % BOOSTED_RECORD_BYTES != 0
    {
        return Err(AppError::InvalidPath(format!(
            "boosted path of {} bytes is not 20 + k*{BOOSTED_RECORD_BYTES}",
            path.len()
        )));
    }

    let mut token_out = Address::from_slice(&path[..ADDRESS_BYTES]);
    let mut hops = Vec::new();
    for record in path[ADDRESS_BYTES..].chunks_exact(BOOSTED_RECORD_BYTES) {
        let addr = |at: usize| Address::from_slice(&record[at..at + ADDRESS_BYTES]);
        let hop = BoostedPathHop {
            token_out,
            wrap_out: WrapAction::from_byte(record[0])?,
            pool_token_out: addr(1),
            deployer: addr(21),
            pool_token_in: addr(41),
            wrap_in: WrapAction::from_byte(record[61])?,
            token_in: addr(62),
        };
        token_out = hop.token_in;
        hops.push(hop);
    }
    Ok(hops)
}

pub fn boosted_route_path(route: &BoostedRoute) -> Result<Bytes, AppError> {
    encode_boosted_path(&boosted_path_hops(route)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::currency::{Token, VaultToken};
    use crate::domain::pool::{IntegralPool, V3Pool};
    use alloy::primitives::{U160, U256};

    fn addr(byte: u8) -> Address {
        Address::from([byte; 20])
    }

    fn token(byte: u8) -> Token {
        Token::new(1, addr(byte), 18)
    }

    fn vault(share: u8, underlying: u8) -> Currency {
        Currency::Vault(VaultToken::new(token(share), token(underlying)))
    }

    fn integral(a: Currency, b: Currency, deployer: u8) -> Pool {
        Pool::Integral(IntegralPool {
            token0: a,
            token1: b,
            deployer: addr(deployer),
            fee: 0,
            sqrt_price_x96: U160::ZERO,
            liquidity: U256::ZERO,
            tick: 0,
        })
    }

    fn v3(a: Currency, b: Currency, fee: u32) -> Pool {
        Pool::V3(V3Pool {
            token0: a,
            token1: b,
            fee,
            sqrt_price_x96: U160::ZERO,
            liquidity: U256::ZERO,
            tick: 0,
        })
    }

    #[test]
    fn fee_path_round_trips_in_both_directions() {
        let tokens = [addr(1), addr(2), addr(3)];
        let fees = [500u32, 3000];
        let forward = encode_packed_path(&tokens, &fees).expect("encode");
        assert_eq!(forward.len(), 20 * 3 + 3 * 2);
        assert_eq!(&forward[20..23], &[0x00, 0x01, 0xf4]);
        let parsed = decode_packed_path::<u32>(&forward).expect("decode");
        assert_eq!(parsed.tokens, tokens);
        assert_eq!(parsed.idents, fees);

        let reversed = reverse_packed_path(&tokens, &fees).expect("reverse");
        let parsed = decode_packed_path::<u32>(&reversed).expect("decode");
        assert_eq!(parsed.tokens, vec![addr(3), addr(2), addr(1)]);
        assert_eq!(parsed.idents, vec![3000, 500]);
    }

    #[test]
    fn deployer_path_round_trips() {
        let tokens = [addr(1), addr(2)];
        let deployers = [addr(0xde)];
        let encoded = encode_packed_path(&tokens, &deployers).expect("encode");
        assert_eq!(encoded.len(), 60);
        let parsed = decode_packed_path::<Address>(&encoded).expect("decode");
        assert_eq!(parsed.tokens, tokens);
        assert_eq!(parsed.idents, deployers);
    }

    #[test]
    fn rejects_malformed_packed_paths() {
        assert!(encode_packed_path(&[addr(1)], &[] as &[u32]).is_err());
        assert!(encode_packed_path(&[addr(1), addr(2)], &[1u32 << 24]).is_err());
        assert!(decode_packed_path::<u32>(&[0u8; 42]).is_err());
        assert!(decode_packed_path::<u32>(&[0u8; 20]).is_err());
    }

    #[test]
    fn exact_output_reverses_route_path() {
        let a: Currency = token(1).into();
        let b: Currency = token(2).into();
        let c: Currency = token(3).into();
        let route = PoolRoute::new(
            crate::domain::pool::Protocol::V3,
            vec![a.clone(), b.clone(), c.clone()],
            vec![v3(a, b.clone(), 100), v3(b, c, 10_000)],
        )
        .expect("route");
        let SwapPath::Packed(bytes) = pool_route_path(&route, TradeType::ExactOutput).expect("path") else {
            panic!("expected packed path");
        };
        let parsed = decode_packed_path::<u32>(&bytes).expect("decode");
        assert_eq!(parsed.tokens, vec![addr(3), addr(2), addr(1)]);
        assert_eq!(parsed.idents, vec![10_000, 100]);
    }

    #[test]
    fn boosted_path_marks_wrap_actions() {
        let va = vault(0xa1, 1);
        let vb = vault(0xb1, 2);
        let route = BoostedRoute::new(
            vec![token(1).into(), va.clone(), vb.clone(), token(2).into()],
            vec![integral(va, vb, 0xde)],
        )
        .expect("route");
        let hops = boosted_path_hops(&route).expect("hops");
        assert_eq!(
            hops,
            vec![BoostedPathHop {
                token_out: addr(2),
                wrap_out: WrapAction::Unwrap,
                pool_token_out: addr(0xb1),
                deployer: addr(0xde),
                pool_token_in: addr(0xa1),
                wrap_in: WrapAction::Wrap,
                token_in: addr(1),
            }]
        );
        let encoded = encode_boosted_path(&hops).expect("encode");
        assert_eq!(encoded.len(), 20 + 82);
        assert_eq!(decode_boosted_path(&encoded).expect("decode"), hops);
    }

    #[test]
    fn boosted_path_chains_multiple_swaps() {
        // A -> vA -swap-> vB -> B -swap-> C
        let a: Currency = token(1).into();
        let b: Currency = token(2).into();
        let c: Currency = token(3).into();
        let va = vault(0xa1, 1);
        let vb = vault(0xb1, 2);
        let route = BoostedRoute::new(
            vec![a, va.clone(), vb.clone(), b.clone(), c.clone()],
            vec![integral(va, vb, 0xd1), integral(b, c, 0xd2)],
        )
        .expect("route");
        let hops = boosted_path_hops(&route).expect("hops");
        assert_eq!(hops.len(), 2);
        assert_eq!(hops[0].token_out, addr(3));
        assert_eq!(hops[0].wrap_out, WrapAction::None);
        assert_eq!(hops[0].wrap_in, WrapAction::Unwrap);
        assert_eq!(hops[0].token_in, addr(0xb1));
        assert_eq!(hops[1].token_out, addr(0xb1));
        assert_eq!(hops[1].wrap_in, WrapAction::Wrap);
        assert_eq!(hops[1].token_in, addr(1));

        let encoded = encode_boosted_path(&hops).expect("encode");
        assert_eq!(encoded.len(), 20 + 2 * 82);
        assert_eq!(decode_boosted_path(&encoded).expect("decode"), hops);
    }

    #[test]
    fn boosted_path_rejects_broken_chain_and_unknown_flags() {
        let hop = BoostedPathHop {
            token_out: addr(2),
            wrap_out: WrapAction::None,
            pool_token_out: addr(2),
            deployer: Address::ZERO,
            pool_token_in: addr(1),
            wrap_in: WrapAction::None,
            token_in: addr(1),
        };
        let mut broken = hop.clone();
        broken.token_out = addr(9);
        assert!(encode_boosted_path(&[hop.clone(), broken]).is_err());

        let mut bytes = encode_boosted_path(&[hop]).expect("encode").to_vec();
        bytes[20] = 7;
        assert!(matches!(decode_boosted_path(&bytes), Err(AppError::InvalidPath(_))));
    }

    #[test]
    fn boosted_path_requires_integral_swaps() {
        let va = vault(0xa1, 1);
        let vb = vault(0xb1, 2);
        let route = BoostedRoute::new(vec![va.clone(), vb.clone()], vec![v3(va, vb, 500)]).expect("route");
        assert!(matches!(boosted_route_path(&route), Err(AppError::UnsupportedRoute(_))));
    }
}
