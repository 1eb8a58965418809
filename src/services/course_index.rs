// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::error::IndexError;
use crate::models::backend::SearchBackend;
use crate::models::course::CourseDocument;
use crate::models::schema::IndexSchema;
use crate::services::elasticsearch::ElasticsearchClient;
use crate::services::index::{IndexClient, SearchHits, SuggestionBlock};
use crate::services::memory_index::MemoryIndex;
use crate::services::query::BoolQuery;
use crate::services::sort::SortSpec;
use crate::services::suggest::SuggesterSpec;

/// The index the running service was configured with
pub enum CourseIndex {
    Elasticsearch(ElasticsearchClient),
    Memory(MemoryIndex),
}

impl CourseIndex {
    pub fn backend(&self) -> SearchBackend {
        match self {
            CourseIndex::Elasticsearch(_) => SearchBackend::Elasticsearch,
            CourseIndex::Memory(_) => SearchBackend::Memory,
        }
    }
}

impl From<ElasticsearchClient> for CourseIndex {
    fn from(client: ElasticsearchClient) -> Self {
        CourseIndex::Elasticsearch(client)
    }
}

impl From<MemoryIndex> for CourseIndex {
    fn from(index: MemoryIndex) -> Self {
        CourseIndex::Memory(index)
    }
}

impl IndexClient for CourseIndex {
    async fn execute_query(
        &self,
        query: &BoolQuery,
        sort: &SortSpec,
        page: u32,
        size: u32,
    ) -> Result<SearchHits, IndexError> {
        match self {
            CourseIndex::Elasticsearch(c) => c.execute_query(query, sort, page, size).await,
            CourseIndex::Memory(m) => m.execute_query(query, sort, page, size).await,
        }
    }

    async fn execute_suggest(
        &self,
        suggester: &SuggesterSpec,
    ) -> Result<Option<SuggestionBlock>, IndexError> {
        match self {
            CourseIndex::Elasticsearch(c) => c.execute_suggest(suggester).await,
            CourseIndex::Memory(m) => m.execute_suggest(suggester).await,
        }
    }

    async fn ensure_index(&self, schema: &IndexSchema) -> Result<(), IndexError> {
        match self {
            CourseIndex::Elasticsearch(c) => c.ensure_index(schema).await,
            CourseIndex::Memory(m) => m.ensure_index(schema).await,
        }
    }

    async fn count(&self) -> Result<u64, IndexError> {
        match self {
            CourseIndex::Elasticsearch(c) => c.count().await,
            CourseIndex::Memory(m) => m.count().await,
        }
    }

    async fn index_documents(&self, docs: &[CourseDocument]) -> Result<(), IndexError> {
        match self {
            CourseIndex::Elasticsearch(c) => c.index_documents(docs).await,
            CourseIndex::Memory(m) => m.index_documents(docs).await,
        }
    }
}
