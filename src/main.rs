// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use skillseek::app::{create_router, AppState, VERSION};
use skillseek::config::Config;
use skillseek::models::backend::SearchBackend;
use skillseek::models::schema::IndexSchema;
use skillseek::services::course_index::CourseIndex;
use skillseek::services::elasticsearch::ElasticsearchClient;
use skillseek::services::index::IndexClient;
use skillseek::services::loader::{load_sample_data, LoadReport};
use skillseek::services::logging::init_tracing;
use skillseek::services::memory_index::MemoryIndex;
use skillseek::services::search::CourseService;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();
    init_tracing(&config.log_level);

    tracing::info!(version = VERSION, backend = %config.backend, "Starting skillseek");

    let index: CourseIndex = match config.backend {
        SearchBackend::Elasticsearch => ElasticsearchClient::new(&config.elasticsearch())?.into(),
        SearchBackend::Memory => MemoryIndex::new().into(),
    };

    index
        .ensure_index(&IndexSchema::courses())
        .await
        .map_err(|e| anyhow!("Failed to prepare course index: {}", e))?;

    if let Some(path) = &config.sample_data {
        match load_sample_data(&index, path).await? {
            LoadReport::Skipped { existing } => {
                tracing::info!(existing, "Index already populated");
            }
            LoadReport::Loaded { loaded, rejected } => {
                tracing::info!(loaded, rejected, "Sample courses indexed");
            }
        }
    } else if config.backend.is_memory() {
        tracing::warn!("Memory backend started without --sample-data, index is empty");
    }

    let state = AppState::new(CourseService::with_index(index));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    tracing::info!(addr = %config.bind_addr, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
