// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::constants::wrapped_native_for_chain;
use crate::domain::error::AppError;
use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// An ERC20 asset. Identity is `(chain_id, address)`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Token {
    pub chain_id: u64,
    pub address: Address,
    pub decimals: u8,
    #[serde(default)]
    pub symbol: Option<String>,
}

impl Token {
    pub fn new(chain_id: u64, address: Address, decimals: u8) -> Self {
        Self {
            chain_id,
            address,
            decimals,
            symbol: None,
        }
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.chain_id == other.chain_id && self.address == other.address
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.chain_id.hash(state);
        self.address.hash(state);
    }
}

/// Share token of an ERC4626 vault. Conversion rates live on-chain and are
/// only reachable through the async preview calls.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VaultToken {
    pub token: Token,
    pub underlying: Token,
}

impl VaultToken {
    pub fn new(token: Token, underlying: Token) -> Self {
        Self { token, underlying }
    }

    pub fn address(&self) -> Address {
        self.token.address
    }
}

/// The chain's native currency together with its wrapped ERC20.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "NativeSpec")]
pub struct NativeCurrency {
    pub chain_id: u64,
    pub wrapped: Token,
}

impl NativeCurrency {
    /// Native currency of a chain with a known wrapped-native contract.
    pub fn for_chain(chain_id: u64) -> Result<Self, AppError> {
        let address = wrapped_native_for_chain(chain_id).ok_or_else(|| {
            AppError::validation("wrapped", format!("no wrapped native token known for chain {chain_id}"))
        })?;
        Ok(Self {
            chain_id,
            wrapped: Token::new(chain_id, address, 18),
        })
    }
}

/// Wire form of [`NativeCurrency`]; `wrapped` may be omitted on known chains.
#[derive(Deserialize)]
struct NativeSpec {
    chain_id: u64,
    #[serde(default)]
    wrapped: Option<Token>,
}

impl TryFrom<NativeSpec> for NativeCurrency {
    type Error = AppError;

    fn try_from(spec: NativeSpec) -> Result<Self, Self::Error> {
        match spec.wrapped {
            Some(wrapped) if wrapped.chain_id != spec.chain_id => Err(AppError::validation(
                "wrapped",
                format!("wrapped token is on chain {}, native on {}", wrapped.chain_id, spec.chain_id),
            )),
            Some(wrapped) => Ok(Self {
                chain_id: spec.chain_id,
                wrapped,
            }),
            None => Self::for_chain(spec.chain_id),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Currency {
    Native(NativeCurrency),
    Token(Token),
    Vault(VaultToken),
}

impl Currency {
    pub fn native(wrapped: Token) -> Self {
        Currency::Native(NativeCurrency {
            chain_id: wrapped.chain_id,
            wrapped,
        })
    }

    pub fn chain_id(&self) -> u64 {
        match self {
            Currency::Native(n) => n.chain_id,
            Currency::Token(t) => t.chain_id,
            Currency::Vault(v) => v.token.chain_id,
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Currency::Native(_))
    }

    pub fn as_vault(&self) -> Option<&VaultToken> {
        match self {
            Currency::Vault(v) => Some(v),
            _ => None,
        }
    }

    /// The ERC20 that represents this currency inside pools and vaults.
    pub fn wrapped(&self) -> &Token {
        match self {
            Currency::Native(n) => &n.wrapped,
            Currency::Token(t) => t,
            Currency::Vault(v) => &v.token,
        }
    }

    pub fn wrapped_address(&self) -> Address {
        self.wrapped().address
    }

    /// Same on-chain asset once native is wrapped.
    pub fn wraps_to(&self, other: &Currency) -> bool {
        self.wrapped() == other.wrapped()
    }

    pub fn decimals(&self) -> u8 {
        self.wrapped().decimals
    }
}

impl From<Token> for Currency {
    fn from(token: Token) -> Self {
        Currency::Token(token)
    }
}

impl From<VaultToken> for Currency {
    fn from(vault: VaultToken) -> Self {
        Currency::Vault(vault)
    }
}
