// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::schema::fields;
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Sort key: field plus direction. Documents without the field sort last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: &'static str,
    pub order: SortOrder,
}

/// Primary sort key followed by the `id` tie-break
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub primary: SortKey,
    pub tie_break: SortKey,
}

impl SortSpec {
    fn by(field: &'static str, order: SortOrder) -> Self {
        Self {
            primary: SortKey { field, order },
            tie_break: SortKey {
                field: fields::ID,
                order: SortOrder::Asc,
            },
        }
    }

    pub fn keys(&self) -> [SortKey; 2] {
        [self.primary, self.tie_break]
    }

    /// Render as an Elasticsearch `sort` array
    pub fn to_dsl(&self) -> Value {
        Value::Array(
            self.keys()
                .iter()
                .map(|key| json!({ key.field: { "order": key.order.as_str(), "missing": "_last" } }))
                .collect(),
        )
    }
}

/// Maps sort keywords to sort specs
#[derive(Debug, Clone, Copy, Default)]
pub struct SortResolver;

impl SortResolver {
    pub fn new() -> Self {
        Self
    }

    /// Case-insensitive. Unknown or blank keywords fall back to `upcoming`.
    pub fn resolve(&self, keyword: &str) -> SortSpec {
        match keyword.trim().to_lowercase().as_str() {
            "priceasc" => SortSpec::by(fields::PRICE, SortOrder::Asc),
            "pricedesc" => SortSpec::by(fields::PRICE, SortOrder::Desc),
            _ => SortSpec::by(fields::NEXT_SESSION_DATE, SortOrder::Asc),
        }
    }
}
