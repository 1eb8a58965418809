// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::error::{CourseSearchError, FailureCause};
use crate::models::search::{SearchRequest, SearchResponse};
use crate::services::index::IndexClient;
use crate::services::logging::query_for_log;
use crate::services::mapper::ResultMapper;
use crate::services::query::QueryBuilder;
use crate::services::sort::SortResolver;
use crate::services::suggest::SuggestionResolver;

pub const MIN_PAGE_SIZE: i32 = 1;
pub const MAX_PAGE_SIZE: i32 = 100;

/// Course search and autocomplete over a search index.
///
/// Stateless apart from its collaborators; every call is one round trip to the index
/// and either returns a complete result or an error.
pub struct CourseService<C> {
    index: C,
    query_builder: QueryBuilder,
    sort_resolver: SortResolver,
    mapper: ResultMapper,
    suggestions: SuggestionResolver,
}

impl<C: IndexClient> CourseService<C> {
    pub fn new(
        index: C,
        query_builder: QueryBuilder,
        sort_resolver: SortResolver,
        mapper: ResultMapper,
        suggestions: SuggestionResolver,
    ) -> Self {
        Self {
            index,
            query_builder,
            sort_resolver,
            mapper,
            suggestions,
        }
    }

    /// Service over `index` with the standard builder, resolvers and mapper
    pub fn with_index(index: C) -> Self {
        Self::new(
            index,
            QueryBuilder::new(),
            SortResolver::new(),
            ResultMapper::new(),
            SuggestionResolver::new(),
        )
    }

    pub fn index(&self) -> &C {
        &self.index
    }

    /// Run a filtered, sorted, paginated course search
    pub async fn search(&self, request: SearchRequest) -> Result<SearchResponse, CourseSearchError> {
        self.run_search(&request).await.map_err(|cause| {
            tracing::error!(
                q = %query_for_log(request.q.as_deref().unwrap_or_default()),
                error = %cause,
                "Search failed"
            );
            CourseSearchError::SearchFailed(cause)
        })
    }

    async fn run_search(&self, request: &SearchRequest) -> Result<SearchResponse, FailureCause> {
        validate(request)?;

        let (page, size) = clamp_pagination(request.page, request.size);
        let query = self.query_builder.build(request);
        let sort = self.sort_resolver.resolve(&request.sort);

        tracing::debug!(
            should = query.should.len(),
            filters = query.filter.len(),
            sort = sort.primary.field,
            page,
            size,
            "Executing course search"
        );

        let hits = self
            .index
            .execute_query(&query, &sort, page, size)
            .await
            .map_err(FailureCause::QueryExecutionFailed)?;
        let courses = self.mapper.map(hits.hits)?;

        Ok(SearchResponse {
            total: hits.total,
            courses,
            page,
            size,
        })
    }

    /// Distinct course titles starting with `prefix`, at most ten
    pub async fn suggest(&self, prefix: &str) -> Result<Vec<String>, CourseSearchError> {
        if prefix.trim().is_empty() {
            return Ok(Vec::new());
        }

        let spec = self.suggestions.spec(prefix);
        let block = self.index.execute_suggest(&spec).await.map_err(|e| {
            tracing::error!(prefix = %query_for_log(prefix), error = %e, "Suggestion fetch failed");
            CourseSearchError::SuggestFailed(FailureCause::QueryExecutionFailed(e))
        })?;

        Ok(self.suggestions.extract(block))
    }

    /// Number of courses in the index
    pub async fn total_courses(&self) -> Result<u64, CourseSearchError> {
        self.index.count().await.map_err(|e| {
            tracing::error!(error = %e, "Course count failed");
            CourseSearchError::SearchFailed(FailureCause::QueryExecutionFailed(e))
        })
    }
}

/// Clamp page to `>= 0` and size to `1..=100`
pub fn clamp_pagination(page: i32, size: i32) -> (u32, u32) {
    let page = page.max(0) as u32;
    let size = size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE) as u32;
    (page, size)
}

/// Price bounds must be finite and non-negative. Inverted bounds are allowed and
/// simply match nothing.
fn validate(request: &SearchRequest) -> Result<(), FailureCause> {
    for (name, bound) in [
        ("minPrice", request.min_price),
        ("maxPrice", request.max_price),
    ] {
        if let Some(value) = bound {
            if !value.is_finite() || value < 0.0 {
                return Err(FailureCause::InvalidRequest(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
    }
    Ok(())
}
