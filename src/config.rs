// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Runtime configuration. Every option can be given as a flag or an environment variable.

use crate::models::backend::SearchBackend;
use crate::services::elasticsearch::ElasticsearchConfig;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Course search HTTP service
#[derive(Debug, Clone, Parser)]
#[command(name = "skillseek", version = env!("SKILLSEEK_VERSION"), about)]
pub struct Config {
    /// Address the HTTP server listens on
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub bind_addr: SocketAddr,

    /// Search backend: `elasticsearch` or `memory`
    #[arg(long, env = "SEARCH_BACKEND", default_value = "elasticsearch")]
    pub backend: SearchBackend,

    #[arg(long, env = "ELASTICSEARCH_URL", default_value = "http://localhost:9200")]
    pub elasticsearch_url: String,

    /// Name of the course index
    #[arg(long, env = "COURSE_INDEX", default_value = "courses")]
    pub index_name: String,

    #[arg(long, env = "ES_CONNECT_TIMEOUT_MS", default_value_t = 5_000)]
    pub connect_timeout_ms: u64,

    #[arg(long, env = "ES_REQUEST_TIMEOUT_MS", default_value_t = 30_000)]
    pub request_timeout_ms: u64,

    /// JSON file loaded into the index at startup when the index is empty
    #[arg(long, env = "SAMPLE_DATA_PATH")]
    pub sample_data: Option<PathBuf>,

    /// Log filter, same syntax as `RUST_LOG`
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

impl Config {
    pub fn elasticsearch(&self) -> ElasticsearchConfig {
        ElasticsearchConfig {
            host: self.elasticsearch_url.clone(),
            index_name: self.index_name.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
        }
    }
}
