// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Contract between the course search service and the search index.

use crate::error::IndexError;
use crate::models::course::CourseDocument;
use crate::models::schema::IndexSchema;
use crate::services::query::BoolQuery;
use crate::services::sort::SortSpec;
use crate::services::suggest::SuggesterSpec;
use serde::Deserialize;
use serde_json::Value;
use std::future::Future;

/// A single hit as returned by the index, before mapping
#[derive(Debug, Clone, PartialEq)]
pub struct RawHit {
    /// Engine-level document id
    pub id: Option<String>,
    /// Stored document body
    pub source: Value,
}

/// One page of hits plus the total match count
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchHits {
    pub total: u64,
    pub hits: Vec<RawHit>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SuggestionOption {
    pub text: String,
}

/// Completions for one analyzed piece of the input prefix
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SuggestionEntry {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub options: Vec<SuggestionOption>,
}

/// Everything the index returned for one named suggester
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SuggestionBlock {
    pub entries: Vec<SuggestionEntry>,
}

/// Search index operations used by the service and the data loader.
///
/// Each call is a single round trip; retries, pooling and timeouts belong to the
/// implementation.
pub trait IndexClient: Send + Sync {
    /// Run a boolean query and return one sorted page of hits.
    fn execute_query(
        &self,
        query: &BoolQuery,
        sort: &SortSpec,
        page: u32,
        size: u32,
    ) -> impl Future<Output = Result<SearchHits, IndexError>> + Send;

    /// Run a completion suggester. `None` when the index returned no block for it.
    fn execute_suggest(
        &self,
        suggester: &SuggesterSpec,
    ) -> impl Future<Output = Result<Option<SuggestionBlock>, IndexError>> + Send;

    /// Create the index with the given layout unless it already exists.
    fn ensure_index(
        &self,
        schema: &IndexSchema,
    ) -> impl Future<Output = Result<(), IndexError>> + Send;

    /// Number of documents in the index.
    fn count(&self) -> impl Future<Output = Result<u64, IndexError>> + Send;

    /// Add or replace documents, keyed by course id.
    fn index_documents(
        &self,
        docs: &[CourseDocument],
    ) -> impl Future<Output = Result<(), IndexError>> + Send;
}
