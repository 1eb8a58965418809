// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Error types for course search.
//!
//! Index and mapping failures are caught by [`crate::services::search::CourseService`]
//! and surfaced as one of the two [`CourseSearchError`] outcomes, with the original
//! failure kept as the error source.

use thiserror::Error;

/// Failure talking to the search index
#[derive(Debug, Error)]
pub enum IndexError {
    /// Network error, timeout or connection refusal
    #[error("search index unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    /// The index answered with a non-success status
    #[error("search index rejected the request (status {status}): {reason}")]
    Rejected { status: u16, reason: String },
    /// The index answered with a body we could not decode
    #[error("malformed response from search index: {0}")]
    MalformedResponse(String),
}

/// A search hit that cannot be projected into a course
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MappingError {
    #[error("search hit is missing required field `{0}`")]
    MissingField(&'static str),
    #[error("search hit {id} has an invalid `{field}`: {reason}")]
    InvalidField {
        id: String,
        field: String,
        reason: String,
    },
}

/// Originating cause of a failed search or suggestion
#[derive(Debug, Error)]
pub enum FailureCause {
    /// Rejected before any query was built
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("query execution failed: {0}")]
    QueryExecutionFailed(#[source] IndexError),
    #[error("result mapping failed: {0}")]
    Mapping(#[from] MappingError),
}

/// Outcome of a failed call into the course search service
#[derive(Debug, Error)]
pub enum CourseSearchError {
    #[error("search failed: {0}")]
    SearchFailed(#[source] FailureCause),
    #[error("suggest failed: {0}")]
    SuggestFailed(#[source] FailureCause),
}

impl CourseSearchError {
    pub fn cause(&self) -> &FailureCause {
        match self {
            CourseSearchError::SearchFailed(cause) | CourseSearchError::SuggestFailed(cause) => {
                cause
            }
        }
    }

    /// Whether the caller sent something we refused to run
    pub fn is_invalid_request(&self) -> bool {
        matches!(self.cause(), FailureCause::InvalidRequest(_))
    }
}
