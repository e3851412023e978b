// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use std::str::FromStr;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const QUIET_TRANSPORT: &str = "h2=info,hyper=info,hyper_util=info,alloy_transport_http=info,alloy_rpc_client=info";

/// Filter directives for `log_level`. A bare level gets the transport crates
/// pinned to `info`; full directive strings pass through untouched.
pub fn filter_directives(log_level: &str) -> String {
    let normalized = log_level.trim();
    if normalized.is_empty() {
        return format!("info,{QUIET_TRANSPORT}");
    }
    if normalized.contains(',') || normalized.contains('=') {
        normalized.to_string()
    } else {
        format!("{normalized},{QUIET_TRANSPORT}")
    }
}

/// Installs the global subscriber. Logs go to stderr so stdout stays clean for
/// encoded output.
pub fn setup_logging(log_level: &str, json_format: bool) {
    let filter_spec = filter_directives(log_level);
    let filter = EnvFilter::from_str(&filter_spec).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::registry().with(filter);

    let installed = if json_format {
        let json_layer = fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_current_span(false);
        subscriber.with(json_layer).try_init()
    } else {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .compact();
        subscriber.with(fmt_layer).try_init()
    };
    if installed.is_err() {
        // Already initialized (tests, embedding binaries).
        return;
    }

    tracing::debug!(
        target: "config",
        filter = %filter_spec,
        format = if json_format { "json" } else { "compact" },
        "Logging initialized"
    );
}
