// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use std::str::FromStr;

/// Search backend the service runs against.
///
/// Elasticsearch: the production index, reached over HTTP.
///
/// Memory: an in-process index for local runs and tests. Its contents live only as long
/// as the process, so it is normally combined with `--sample-data`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchBackend {
    Elasticsearch,
    Memory,
}

impl SearchBackend {
    pub fn is_memory(&self) -> bool {
        matches!(self, SearchBackend::Memory)
    }
}

impl FromStr for SearchBackend {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "elasticsearch" => Ok(SearchBackend::Elasticsearch),
            "memory" => Ok(SearchBackend::Memory),
            _ => Err(format!(
                "SEARCH_BACKEND must be 'elasticsearch' or 'memory', got: {}",
                value
            )),
        }
    }
}

impl std::fmt::Display for SearchBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchBackend::Elasticsearch => write!(f, "elasticsearch"),
            SearchBackend::Memory => write!(f, "memory"),
        }
    }
}
