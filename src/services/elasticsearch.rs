// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::error::IndexError;
use crate::models::course::CourseDocument;
use crate::models::schema::IndexSchema;
use crate::services::index::{IndexClient, RawHit, SearchHits, SuggestionBlock, SuggestionEntry};
use crate::services::query::BoolQuery;
use crate::services::sort::SortSpec;
use crate::services::suggest::SuggesterSpec;
use anyhow::{anyhow, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

/// Connection settings for an Elasticsearch cluster
#[derive(Debug, Clone)]
pub struct ElasticsearchConfig {
    /// Base URL or bare `host:port`
    pub host: String,
    pub index_name: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

/// Elasticsearch client speaking the JSON query DSL over HTTP
pub struct ElasticsearchClient {
    http: reqwest::Client,
    base_url: String,
    index_name: String,
}

impl ElasticsearchClient {
    /// Create a new Elasticsearch client. No request is made until first use.
    pub fn new(config: &ElasticsearchConfig) -> Result<Self> {
        let base_url = normalize_base_url(&config.host)?;

        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| anyhow!("Failed to build HTTP client: {}", e))?;

        tracing::info!(url = %base_url, index = %config.index_name, "Elasticsearch client configured");

        Ok(Self {
            http,
            base_url,
            index_name: config.index_name.clone(),
        })
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send a request and return the raw body of a successful response
    async fn send(
        &self,
        method: Method,
        path: &str,
        content_type: &str,
        body: Option<String>,
    ) -> Result<Vec<u8>, IndexError> {
        let mut request = self.http.request(method, self.url(path));
        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, content_type).body(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(IndexError::Rejected {
                status: status.as_u16(),
                reason: error_reason(&bytes),
            });
        }

        Ok(bytes.to_vec())
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T, IndexError> {
        let bytes = self
            .send(method, path, "application/json", body.map(Value::to_string))
            .await?;
        decode(&bytes)
    }

    fn search_path(&self) -> String {
        format!("{}/_search", self.index_name)
    }
}

impl IndexClient for ElasticsearchClient {
    async fn execute_query(
        &self,
        query: &BoolQuery,
        sort: &SortSpec,
        page: u32,
        size: u32,
    ) -> Result<SearchHits, IndexError> {
        let body = json!({
            "query": query.to_dsl(),
            "sort": sort.to_dsl(),
            "from": u64::from(page) * u64::from(size),
            "size": size,
            "track_total_hits": true,
        });

        let response: EsSearchResponse = self
            .send_json(Method::POST, &self.search_path(), Some(&body))
            .await?;

        let total = response
            .hits
            .total
            .map_or(response.hits.hits.len() as u64, |t| t.value);
        let hits = response
            .hits
            .hits
            .into_iter()
            .map(|hit| RawHit {
                id: hit.id,
                source: hit.source,
            })
            .collect();

        Ok(SearchHits { total, hits })
    }

    async fn execute_suggest(
        &self,
        suggester: &SuggesterSpec,
    ) -> Result<Option<SuggestionBlock>, IndexError> {
        let body = json!({
            "size": 0,
            "_source": false,
            "suggest": suggester.to_dsl(),
        });

        let response: EsSearchResponse = self
            .send_json(Method::POST, &self.search_path(), Some(&body))
            .await?;

        Ok(response
            .suggest
            .and_then(|mut blocks| blocks.remove(suggester.name))
            .map(|entries| SuggestionBlock { entries }))
    }

    async fn ensure_index(&self, schema: &IndexSchema) -> Result<(), IndexError> {
        match self.send(Method::HEAD, &self.index_name, "", None).await {
            Ok(_) => {
                tracing::info!(index = %self.index_name, "Index already exists");
                return Ok(());
            }
            Err(IndexError::Rejected { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {}
            Err(e) => return Err(e),
        }

        let _: Value = self
            .send_json(Method::PUT, &self.index_name, Some(&schema.to_mappings()))
            .await?;

        tracing::info!(index = %self.index_name, "Created index");
        Ok(())
    }

    async fn count(&self) -> Result<u64, IndexError> {
        let response: EsCountResponse = self
            .send_json(Method::GET, &format!("{}/_count", self.index_name), None)
            .await?;
        Ok(response.count)
    }

    async fn index_documents(&self, docs: &[CourseDocument]) -> Result<(), IndexError> {
        if docs.is_empty() {
            return Ok(());
        }

        let body = bulk_body(&self.index_name, docs)?;
        let bytes = self
            .send(
                Method::POST,
                "_bulk?refresh=wait_for",
                "application/x-ndjson",
                Some(body),
            )
            .await?;
        let response: EsBulkResponse = decode(&bytes)?;

        if let Some(failure) = response.first_failure() {
            return Err(failure);
        }

        tracing::info!(count = docs.len(), index = %self.index_name, "Indexed documents");
        Ok(())
    }
}

/// Accept either a full URL or a bare `host:port`
fn normalize_base_url(host: &str) -> Result<String> {
    let url = if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("http://{}", host)
    };

    let parsed = Url::parse(&url).map_err(|e| anyhow!("Invalid Elasticsearch URL {}: {}", url, e))?;
    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

/// NDJSON body for the `_bulk` endpoint
fn bulk_body(index_name: &str, docs: &[CourseDocument]) -> Result<String, IndexError> {
    let mut body = String::new();
    for doc in docs {
        let action = json!({ "index": { "_index": index_name, "_id": doc.course.id } });
        let source = serde_json::to_string(doc)
            .map_err(|e| IndexError::MalformedResponse(format!("unencodable document: {e}")))?;
        body.push_str(&action.to_string());
        body.push('\n');
        body.push_str(&source);
        body.push('\n');
    }
    Ok(body)
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, IndexError> {
    serde_json::from_slice(bytes).map_err(|e| IndexError::MalformedResponse(e.to_string()))
}

/// Best-effort human readable reason from an Elasticsearch error body
fn error_reason(body: &[u8]) -> String {
    let parsed: Option<Value> = serde_json::from_slice(body).ok();
    let reason = parsed.as_ref().and_then(|v| {
        v.pointer("/error/root_cause/0/reason")
            .or_else(|| v.pointer("/error/reason"))
            .or_else(|| v.get("error"))
            .and_then(Value::as_str)
            .map(str::to_string)
    });

    reason.unwrap_or_else(|| {
        let text = String::from_utf8_lossy(body);
        let text = text.trim();
        if text.is_empty() {
            "no response body".to_string()
        } else {
            text.chars().take(200).collect()
        }
    })
}

#[derive(Debug, Deserialize)]
struct EsSearchResponse {
    #[serde(default)]
    hits: EsHits,
    #[serde(default)]
    suggest: Option<HashMap<String, Vec<SuggestionEntry>>>,
}

#[derive(Debug, Default, Deserialize)]
struct EsHits {
    total: Option<EsTotal>,
    #[serde(default)]
    hits: Vec<EsHit>,
}

#[derive(Debug, Deserialize)]
struct EsTotal {
    value: u64,
}

#[derive(Debug, Deserialize)]
struct EsHit {
    #[serde(rename = "_id")]
    id: Option<String>,
    #[serde(rename = "_source", default)]
    source: Value,
}

#[derive(Debug, Deserialize)]
struct EsCountResponse {
    count: u64,
}

#[derive(Debug, Deserialize)]
struct EsBulkResponse {
    errors: bool,
    #[serde(default)]
    items: Vec<HashMap<String, EsBulkItem>>,
}

#[derive(Debug, Deserialize)]
struct EsBulkItem {
    status: u16,
    #[serde(default)]
    error: Option<Value>,
}

impl EsBulkResponse {
    fn first_failure(&self) -> Option<IndexError> {
        if !self.errors {
            return None;
        }

        let failed = self
            .items
            .iter()
            .flat_map(|item| item.values())
            .find(|item| item.error.is_some());

        Some(match failed {
            Some(item) => IndexError::Rejected {
                status: item.status,
                reason: item
                    .error
                    .as_ref()
                    .and_then(|e| e.get("reason"))
                    .and_then(Value::as_str)
                    .unwrap_or("bulk item failed")
                    .to_string(),
            },
            None => IndexError::Rejected {
                status: 500,
                reason: "bulk request reported errors".to_string(),
            },
        })
    }
}
