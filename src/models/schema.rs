// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Explicit description of the course index layout.
//!
//! The schema is a plain value handed to the index client at setup time, so the
//! domain record types carry no indexing annotations.

use serde_json::{json, Map, Value};

/// Field names of the course index
pub mod fields {
    pub const ID: &str = "id";
    pub const TITLE: &str = "title";
    pub const DESCRIPTION: &str = "description";
    pub const CATEGORY: &str = "category";
    pub const TYPE: &str = "type";
    pub const GRADE_RANGE: &str = "gradeRange";
    pub const MIN_AGE: &str = "minAge";
    pub const MAX_AGE: &str = "maxAge";
    pub const PRICE: &str = "price";
    pub const NEXT_SESSION_DATE: &str = "nextSessionDate";
    pub const SUGGEST: &str = "suggest";
}

/// Storage type of an indexed field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Analyzed full text
    Text,
    /// Exact-match token
    Keyword,
    Integer,
    Double,
    /// Calendar date, `YYYY-MM-DD`
    Date,
    /// Prefix completion input
    Completion,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Keyword => "keyword",
            FieldType::Integer => "integer",
            FieldType::Double => "double",
            FieldType::Date => "date",
            FieldType::Completion => "completion",
        }
    }
}

/// Analysis applied to a text or completion field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Analyzer {
    Standard,
    Simple,
}

impl Analyzer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Analyzer::Standard => "standard",
            Analyzer::Simple => "simple",
        }
    }
}

/// One field of the index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub field_type: FieldType,
    pub analyzer: Option<Analyzer>,
}

impl FieldSpec {
    const fn new(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            analyzer: None,
        }
    }

    const fn analyzed(name: &'static str, field_type: FieldType, analyzer: Analyzer) -> Self {
        Self {
            name,
            field_type,
            analyzer: Some(analyzer),
        }
    }
}

/// Field layout of an index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSchema {
    pub fields: Vec<FieldSpec>,
}

impl IndexSchema {
    /// Layout of the course catalog index
    pub fn courses() -> Self {
        Self {
            fields: vec![
                FieldSpec::new(fields::ID, FieldType::Keyword),
                FieldSpec::analyzed(fields::TITLE, FieldType::Text, Analyzer::Standard),
                FieldSpec::analyzed(fields::DESCRIPTION, FieldType::Text, Analyzer::Standard),
                FieldSpec::new(fields::CATEGORY, FieldType::Keyword),
                FieldSpec::new(fields::TYPE, FieldType::Keyword),
                FieldSpec::new(fields::GRADE_RANGE, FieldType::Keyword),
                FieldSpec::new(fields::MIN_AGE, FieldType::Integer),
                FieldSpec::new(fields::MAX_AGE, FieldType::Integer),
                FieldSpec::new(fields::PRICE, FieldType::Double),
                FieldSpec::new(fields::NEXT_SESSION_DATE, FieldType::Date),
                FieldSpec::analyzed(fields::SUGGEST, FieldType::Completion, Analyzer::Simple),
            ],
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Render as an Elasticsearch `mappings` body
    pub fn to_mappings(&self) -> Value {
        let mut properties = Map::new();
        for field in &self.fields {
            let mut spec = Map::new();
            spec.insert("type".to_string(), json!(field.field_type.as_str()));
            if let Some(analyzer) = field.analyzer {
                spec.insert("analyzer".to_string(), json!(analyzer.as_str()));
            }
            if field.field_type == FieldType::Date {
                spec.insert("format".to_string(), json!("date"));
            }
            properties.insert(field.name.to_string(), Value::Object(spec));
        }

        json!({ "mappings": { "properties": properties } })
    }
}
