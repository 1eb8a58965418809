// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::schema::fields;
use crate::services::index::SuggestionBlock;
use serde_json::{json, Value};
use std::collections::HashSet;

/// Name under which the course completion suggester is registered
pub const COURSE_SUGGESTER: &str = "course_suggest";
/// Maximum number of suggestions returned
pub const MAX_SUGGESTIONS: usize = 10;

/// Completion suggester request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggesterSpec {
    pub name: &'static str,
    pub field: &'static str,
    pub prefix: String,
    pub size: usize,
    pub skip_duplicates: bool,
}

impl SuggesterSpec {
    /// Course title completion for the given prefix
    pub fn for_prefix(prefix: &str) -> Self {
        Self {
            name: COURSE_SUGGESTER,
            field: fields::SUGGEST,
            prefix: prefix.to_string(),
            size: MAX_SUGGESTIONS,
            skip_duplicates: true,
        }
    }

    /// Render as an Elasticsearch `suggest` body
    pub fn to_dsl(&self) -> Value {
        json!({
            self.name: {
                "prefix": self.prefix,
                "completion": {
                    "field": self.field,
                    "skip_duplicates": self.skip_duplicates,
                    "size": self.size,
                }
            }
        })
    }
}

/// Builds completion requests and extracts distinct suggestion texts
#[derive(Debug, Clone, Copy, Default)]
pub struct SuggestionResolver;

impl SuggestionResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn spec(&self, prefix: &str) -> SuggesterSpec {
        SuggesterSpec::for_prefix(prefix.trim())
    }

    /// Flatten a suggestion block into distinct texts, in index order, capped at
    /// [`MAX_SUGGESTIONS`]. A missing block yields no suggestions.
    pub fn extract(&self, block: Option<SuggestionBlock>) -> Vec<String> {
        let Some(block) = block else {
            return Vec::new();
        };

        let mut seen = HashSet::new();
        block
            .entries
            .into_iter()
            .flat_map(|entry| entry.options)
            .map(|option| option.text)
            .filter(|text| seen.insert(text.clone()))
            .take(MAX_SUGGESTIONS)
            .collect()
    }
}
