// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Logging setup and helpers for user-supplied text in log lines.

use tracing_subscriber::EnvFilter;

/// Longest query text written to the log, in characters
const MAX_LOGGED_QUERY_CHARS: usize = 64;

/// Install the global `tracing` subscriber.
/// `RUST_LOG` wins over `default_level` when set.
pub fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Prepare user query text for logging.
/// Control characters become spaces and long input is cut: "robotics for begi…"
pub fn query_for_log(query: &str) -> String {
    let cleaned: String = query
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();

    if cleaned.chars().count() <= MAX_LOGGED_QUERY_CHARS {
        return cleaned;
    }

    let mut truncated: String = cleaned.chars().take(MAX_LOGGED_QUERY_CHARS).collect();
    truncated.push('…');
    truncated
}
