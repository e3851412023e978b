// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use clap::{Parser, Subcommand};
use mitander_router::app::config::EncoderSettings;
use mitander_router::app::logging::setup_logging;
use mitander_router::app::request::{EncodeRequest, QuoteInput};
use mitander_router::common::parsing::parse_calldata;
use mitander_router::domain::commands::verify_command_table;
use mitander_router::domain::error::AppError;
use mitander_router::infrastructure::network::provider::ConnectionFactory;
use mitander_router::infrastructure::network::quoter::RpcQuoterBackend;
use mitander_router::infrastructure::network::vault::RpcVaultPreview;
use mitander_router::services::router::swap_router::decode_execute;
use mitander_router::services::router::{Quoter, RoutePlanner, SwapRouter};
use alloy::primitives::{Address, Bytes, U256};
use serde::Serialize;
use std::io::Read;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Parser, Debug)]
#[command(author, version, about = "mitander router encoder")]
struct Cli {
    /// Path to config file (default: router.{toml,yaml,...} if present)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Emit JSON logs (overrides config/env)
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encode a trade request into router calldata and value
    Encode {
        /// JSON request file, or `-` for stdin
        #[arg(long, default_value = "-")]
        input: String,
    },
    /// Quote one route or a batch of routes against the quoter interpreter
    Quote {
        /// JSON request file, or `-` for stdin
        #[arg(long, default_value = "-")]
        input: String,
    },
    /// Print the command plan contained in router calldata
    Decode {
        /// Hex calldata, or `@path` to read it from a file
        calldata: String,
    },
}

fn read_input(input: &str) -> Result<String, AppError> {
    if input == "-" {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .map_err(|e| AppError::validation("input", format!("stdin: {e}")))?;
        return Ok(raw);
    }
    std::fs::read_to_string(input).map_err(|e| AppError::validation("input", format!("{input}: {e}")))
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let out = serde_json::to_string_pretty(value).map_err(|e| AppError::Unknown(e.into()))?;
    println!("{out}");
    Ok(())
}

/// Transaction fields for submitting an encoded plan.
#[derive(Serialize)]
struct EncodedCall {
    #[serde(skip_serializing_if = "Option::is_none")]
    to: Option<Address>,
    calldata: Bytes,
    value: U256,
}

fn encode(settings: &EncoderSettings, input: &str) -> Result<(), AppError> {
    let request = EncodeRequest::from_json(&read_input(input)?)?;
    let (trade, options) = request.into_parts(settings, unix_now())?;
    let params = SwapRouter::swap_call_parameters(&trade, &options)?;
    print_json(&EncodedCall {
        to: settings.router_address,
        calldata: params.calldata,
        value: params.value,
    })
}

async fn quote(settings: &EncoderSettings, input: &str) -> Result<(), AppError> {
    let request = QuoteInput::from_json(&read_input(input)?)?;
    let provider = ConnectionFactory::http_url(settings.rpc_url()?);
    let backend = RpcQuoterBackend::new(provider.clone(), settings.quoter_address()?, settings.multicall_address);
    let quoter = Quoter::new(backend, RpcVaultPreview::new(provider));
    match request {
        QuoteInput::Single(req) => {
            let result = quoter.quote(&req.route, req.amount, req.trade_type).await?;
            print_json(&result)
        }
        QuoteInput::Batch(reqs) => {
            let results = quoter.quote_batch(&reqs).await;
            let failed = results.iter().filter(|r| r.is_none()).count();
            if failed > 0 {
                tracing::warn!(target: "quoter", failed, total = results.len(), "Some quotes failed");
            }
            print_json(&results)
        }
    }
}

fn decode(calldata: &str) -> Result<(), AppError> {
    let raw = match calldata.strip_prefix('@') {
        Some(path) => read_input(path)?,
        None => calldata.to_string(),
    };
    let (commands, inputs, deadline) = decode_execute(&parse_calldata(&raw)?)?;
    let planner = RoutePlanner::from_parts(&commands, &inputs)?;
    if let Some(deadline) = deadline {
        println!("deadline {deadline}");
    }
    for (idx, entry) in planner.entries().iter().enumerate() {
        let revert = if entry.allow_revert { " (allow revert)" } else { "" };
        println!("{idx:>2} {}{revert}: {:?}", entry.command_type.name(), entry.decode()?);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let cli = Cli::parse();

    let settings = EncoderSettings::load_with_path(cli.config.as_deref())?;
    setup_logging(settings.log_level(), cli.json_logs || settings.json_logs);

    verify_command_table(settings.command_table_version)?;

    let result = match &cli.command {
        Command::Encode { input } => encode(&settings, input),
        Command::Quote { input } => quote(&settings, input).await,
        Command::Decode { calldata } => decode(calldata),
    };
    if let Err(err) = &result {
        tracing::error!(target: "router", error = %err, "Command failed");
    }
    result
}
