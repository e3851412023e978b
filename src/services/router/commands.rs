// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::commands::CommandType;
use crate::domain::error::AppError;
use crate::domain::trade::InputPermit;
use crate::services::router::abi::{
    Erc4626UnwrapParams, Erc4626WrapParams, PackedSwapExactInParams, PackedSwapExactOutParams,
    Permit2PermitParams, Permit2TransferFromParams, PermitDetails, PermitSingle, SubPlanParams,
    SweepParams, UnwrapWethParams, V2SwapExactInParams, V2SwapExactOutParams, WrapEthParams,
};
use alloy::primitives::aliases::U48;
use alloy::primitives::{Address, Bytes, U160, U256};
use alloy::sol_types::SolValue;

/// A typed interpreter command. Every swap is paid from router custody, so
/// `payerIsUser` is always encoded as `false`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    V2SwapExactIn {
        recipient: Address,
        amount_in: U256,
        amount_out_min: U256,
        path: Vec<Address>,
    },
    V2SwapExactOut {
        recipient: Address,
        amount_out: U256,
        amount_in_max: U256,
        path: Vec<Address>,
    },
    V3SwapExactIn {
        recipient: Address,
        amount_in: U256,
        amount_out_min: U256,
        path: Bytes,
    },
    V3SwapExactOut {
        recipient: Address,
        amount_out: U256,
        amount_in_max: U256,
        path: Bytes,
    },
    IntegralSwapExactIn {
        recipient: Address,
        amount_in: U256,
        amount_out_min: U256,
        path: Bytes,
    },
    IntegralSwapExactOut {
        recipient: Address,
        amount_out: U256,
        amount_in_max: U256,
        path: Bytes,
    },
    BoostedSwapExactOut {
        recipient: Address,
        amount_out: U256,
        amount_in_max: U256,
        path: Bytes,
    },
    Permit2Permit(InputPermit),
    Permit2TransferFrom {
        token: Address,
        recipient: Address,
        amount: U160,
    },
    Sweep {
        token: Address,
        recipient: Address,
        amount_min: U256,
    },
    WrapEth {
        recipient: Address,
        amount: U256,
    },
    UnwrapWeth {
        recipient: Address,
        amount_min: U256,
    },
    Erc4626Wrap {
        wrapper: Address,
        underlying: Address,
        recipient: Address,
        amount: U256,
        min_amount_out: U256,
    },
    Erc4626Unwrap {
        wrapper: Address,
        recipient: Address,
        amount: U256,
        min_amount_out: U256,
    },
    ExecuteSubPlan {
        commands: Bytes,
        inputs: Vec<Bytes>,
    },
}

fn packed_in(recipient: Address, amount_in: U256, amount_out_min: U256, path: &Bytes) -> Vec<u8> {
    PackedSwapExactInParams {
        recipient,
        amountIn: amount_in,
        amountOutMin: amount_out_min,
        path: path.clone(),
        payerIsUser: false,
    }
    .abi_encode_params()
}

fn packed_out(recipient: Address, amount_out: U256, amount_in_max: U256, path: &Bytes) -> Vec<u8> {
    PackedSwapExactOutParams {
        recipient,
        amountOut: amount_out,
        amountInMax: amount_in_max,
        path: path.clone(),
        payerIsUser: false,
    }
    .abi_encode_params()
}

fn decode_err(command: CommandType, err: alloy::sol_types::Error) -> AppError {
    AppError::validation("inputs", format!("{} input does not decode: {err}", command.name()))
}

impl Command {
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::V2SwapExactIn { .. } => CommandType::V2SwapExactIn,
            Command::V2SwapExactOut { .. } => CommandType::V2SwapExactOut,
            Command::V3SwapExactIn { .. } => CommandType::V3SwapExactIn,
            Command::V3SwapExactOut { .. } => CommandType::V3SwapExactOut,
            Command::IntegralSwapExactIn { .. } => CommandType::IntegralSwapExactIn,
            Command::IntegralSwapExactOut { .. } => CommandType::IntegralSwapExactOut,
            Command::BoostedSwapExactOut { .. } => CommandType::BoostedSwapExactOut,
            Command::Permit2Permit(_) => CommandType::Permit2Permit,
            Command::Permit2TransferFrom { .. } => CommandType::Permit2TransferFrom,
            Command::Sweep { .. } => CommandType::Sweep,
            Command::WrapEth { .. } => CommandType::WrapEth,
            Command::UnwrapWeth { .. } => CommandType::UnwrapWeth,
            Command::Erc4626Wrap { .. } => CommandType::Erc4626Wrap,
            Command::Erc4626Unwrap { .. } => CommandType::Erc4626Unwrap,
            Command::ExecuteSubPlan { .. } => CommandType::ExecuteSubPlan,
        }
    }

    /// ABI parameter blob for this command.
    pub fn encode(&self) -> Bytes {
        let raw = match self {
            Command::V2SwapExactIn {
                recipient,
                amount_in,
                amount_out_min,
                path,
            } => V2SwapExactInParams {
                recipient: *recipient,
                amountIn: *amount_in,
                amountOutMin: *amount_out_min,
                path: path.clone(),
                payerIsUser: false,
            }
            .abi_encode_params(),
            Command::V2SwapExactOut {
                recipient,
                amount_out,
                amount_in_max,
                path,
            } => V2SwapExactOutParams {
                recipient: *recipient,
                amountOut: *amount_out,
                amountInMax: *amount_in_max,
                path: path.clone(),
                payerIsUser: false,
            }
            .abi_encode_params(),
            Command::V3SwapExactIn {
                recipient,
                amount_in,
                amount_out_min,
                path,
            }
            | Command::IntegralSwapExactIn {
                recipient,
                amount_in,
                amount_out_min,
                path,
            } => packed_in(*recipient, *amount_in, *amount_out_min, path),
            Command::V3SwapExactOut {
                recipient,
                amount_out,
                amount_in_max,
                path,
            }
            | Command::IntegralSwapExactOut {
                recipient,
                amount_out,
                amount_in_max,
                path,
            }
            | Command::BoostedSwapExactOut {
                recipient,
                amount_out,
                amount_in_max,
                path,
            } => packed_out(*recipient, *amount_out, *amount_in_max, path),
            Command::Permit2Permit(permit) => Permit2PermitParams {
                permitSingle: PermitSingle {
                    details: PermitDetails {
                        token: permit.token,
                        amount: permit.amount,
                        expiration: U48::saturating_from(permit.expiration),
                        nonce: U48::saturating_from(permit.nonce),
                    },
                    spender: permit.spender,
                    sigDeadline: permit.sig_deadline,
                },
                signature: permit.signature.clone(),
            }
            .abi_encode_params(),
            Command::Permit2TransferFrom {
                token,
                recipient,
                amount,
            } => Permit2TransferFromParams {
                token: *token,
                recipient: *recipient,
                amount: *amount,
            }
            .abi_encode_params(),
            Command::Sweep {
                token,
                recipient,
                amount_min,
            } => SweepParams {
                token: *token,
                recipient: *recipient,
                amountMin: *amount_min,
            }
            .abi_encode_params(),
            Command::WrapEth { recipient, amount } => WrapEthParams {
                recipient: *recipient,
                amount: *amount,
            }
            .abi_encode_params(),
            Command::UnwrapWeth {
                recipient,
                amount_min,
            } => UnwrapWethParams {
                recipient: *recipient,
                amountMin: *amount_min,
            }
            .abi_encode_params(),
            Command::Erc4626Wrap {
                wrapper,
                underlying,
                recipient,
                amount,
                min_amount_out,
            } => Erc4626WrapParams {
                wrapper: *wrapper,
                underlying: *underlying,
                recipient: *recipient,
                amount: *amount,
                minAmountOut: *min_amount_out,
            }
            .abi_encode_params(),
            Command::Erc4626Unwrap {
                wrapper,
                recipient,
                amount,
                min_amount_out,
            } => Erc4626UnwrapParams {
                wrapper: *wrapper,
                recipient: *recipient,
                amount: *amount,
                minAmountOut: *min_amount_out,
            }
            .abi_encode_params(),
            Command::ExecuteSubPlan { commands, inputs } => SubPlanParams {
                commands: commands.clone(),
                inputs: inputs.clone(),
            }
            .abi_encode_params(),
        };
        raw.into()
    }

    /// Inverse of [`Command::encode`] for commands this crate emits.
    pub fn decode(command_type: CommandType, input: &[u8]) -> Result<Self, AppError> {
        let err = |e| decode_err(command_type, e);
        let command = match command_type {
            CommandType::V2SwapExactIn => {
                let p = <V2SwapExactInParams as SolValue>::abi_decode_params(input).map_err(err)?;
                Command::V2SwapExactIn {
                    recipient: p.recipient,
                    amount_in: p.amountIn,
                    amount_out_min: p.amountOutMin,
                    path: p.path,
                }
            }
            CommandType::V2SwapExactOut => {
                let p = <V2SwapExactOutParams as SolValue>::abi_decode_params(input).map_err(err)?;
                Command::V2SwapExactOut {
                    recipient: p.recipient,
                    amount_out: p.amountOut,
                    amount_in_max: p.amountInMax,
                    path: p.path,
                }
            }
            CommandType::V3SwapExactIn | CommandType::IntegralSwapExactIn => {
                let p = <PackedSwapExactInParams as SolValue>::abi_decode_params(input).map_err(err)?;
                let (recipient, amount_in, amount_out_min, path) =
                    (p.recipient, p.amountIn, p.amountOutMin, p.path);
                if command_type == CommandType::V3SwapExactIn {
                    Command::V3SwapExactIn {
                        recipient,
                        amount_in,
                        amount_out_min,
                        path,
                    }
                } else {
                    Command::IntegralSwapExactIn {
                        recipient,
                        amount_in,
                        amount_out_min,
                        path,
                    }
                }
            }
            CommandType::V3SwapExactOut
            | CommandType::IntegralSwapExactOut
            | CommandType::BoostedSwapExactOut => {
                let p = <PackedSwapExactOutParams as SolValue>::abi_decode_params(input).map_err(err)?;
                let (recipient, amount_out, amount_in_max, path) =
                    (p.recipient, p.amountOut, p.amountInMax, p.path);
                match command_type {
                    CommandType::V3SwapExactOut => Command::V3SwapExactOut {
                        recipient,
                        amount_out,
                        amount_in_max,
                        path,
                    },
                    CommandType::IntegralSwapExactOut => Command::IntegralSwapExactOut {
                        recipient,
                        amount_out,
                        amount_in_max,
                        path,
                    },
                    _ => Command::BoostedSwapExactOut {
                        recipient,
                        amount_out,
                        amount_in_max,
                        path,
                    },
                }
            }
            CommandType::Permit2Permit => {
                let p = <Permit2PermitParams as SolValue>::abi_decode_params(input).map_err(err)?;
                Command::Permit2Permit(InputPermit {
                    token: p.permitSingle.details.token,
                    amount: p.permitSingle.details.amount,
                    expiration: p.permitSingle.details.expiration.to::<u64>(),
                    nonce: p.permitSingle.details.nonce.to::<u64>(),
                    spender: p.permitSingle.spender,
                    sig_deadline: p.permitSingle.sigDeadline,
                    signature: p.signature,
                })
            }
            CommandType::Permit2TransferFrom => {
                let p = <Permit2TransferFromParams as SolValue>::abi_decode_params(input).map_err(err)?;
                Command::Permit2TransferFrom {
                    token: p.token,
                    recipient: p.recipient,
                    amount: p.amount,
                }
            }
            CommandType::Sweep => {
                let p = <SweepParams as SolValue>::abi_decode_params(input).map_err(err)?;
                Command::Sweep {
                    token: p.token,
                    recipient: p.recipient,
                    amount_min: p.amountMin,
                }
            }
            CommandType::WrapEth => {
                let p = <WrapEthParams as SolValue>::abi_decode_params(input).map_err(err)?;
                Command::WrapEth {
                    recipient: p.recipient,
                    amount: p.amount,
                }
            }
            CommandType::UnwrapWeth => {
                let p = <UnwrapWethParams as SolValue>::abi_decode_params(input).map_err(err)?;
                Command::UnwrapWeth {
                    recipient: p.recipient,
                    amount_min: p.amountMin,
                }
            }
            CommandType::Erc4626Wrap => {
                let p = <Erc4626WrapParams as SolValue>::abi_decode_params(input).map_err(err)?;
                Command::Erc4626Wrap {
                    wrapper: p.wrapper,
                    underlying: p.underlying,
                    recipient: p.recipient,
                    amount: p.amount,
                    min_amount_out: p.minAmountOut,
                }
            }
            CommandType::Erc4626Unwrap => {
                let p = <Erc4626UnwrapParams as SolValue>::abi_decode_params(input).map_err(err)?;
                Command::Erc4626Unwrap {
                    wrapper: p.wrapper,
                    recipient: p.recipient,
                    amount: p.amount,
                    min_amount_out: p.minAmountOut,
                }
            }
            CommandType::ExecuteSubPlan => {
                let p = <SubPlanParams as SolValue>::abi_decode_params(input).map_err(err)?;
                Command::ExecuteSubPlan {
                    commands: p.commands,
                    inputs: p.inputs,
                }
            }
            other => {
                return Err(AppError::validation(
                    "commands",
                    format!("{} is not emitted by this encoder", other.name()),
                ));
            }
        };
        Ok(command)
    }
}
