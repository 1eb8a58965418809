// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! One-time sample data loading.
//!
//! Rows are decoded into a typed [`CourseRecord`], validated, and only then turned
//! into index documents. Bad rows are reported and skipped; the rest are indexed.

use crate::models::course::{Course, CourseDocument};
use crate::services::index::IndexClient;
use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use thiserror::Error;

/// A course row as it appears in the sample dataset
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRecord {
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub course_type: Option<String>,
    pub grade_range: Option<String>,
    pub min_age: Option<Numeric>,
    pub max_age: Option<Numeric>,
    pub price: Option<Numeric>,
    pub next_session_date: Option<String>,
}

/// Numbers may arrive as JSON numbers or as numeric strings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    fn value(&self, field: &'static str) -> Result<f64, RecordError> {
        let value = match self {
            Numeric::Number(n) => *n,
            Numeric::Text(s) => s.trim().parse().map_err(|_| RecordError::NotANumber {
                field,
                value: s.clone(),
            })?,
        };
        if !value.is_finite() || value < 0.0 {
            return Err(RecordError::Negative { field, value });
        }
        Ok(value)
    }

    fn whole(&self, field: &'static str) -> Result<u32, RecordError> {
        let value = self.value(field)?;
        if value.fract() != 0.0 || value > f64::from(u32::MAX) {
            return Err(RecordError::NotAWholeNumber { field, value });
        }
        Ok(value as u32)
    }
}

/// Why a row was rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("row is not a course object: {0}")]
    Malformed(String),
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("`{field}` is not a number: {value:?}")]
    NotANumber { field: &'static str, value: String },
    #[error("`{field}` must be a non-negative number, got {value}")]
    Negative { field: &'static str, value: f64 },
    #[error("`{field}` must be a whole number, got {value}")]
    NotAWholeNumber { field: &'static str, value: f64 },
    #[error("minAge {min} is greater than maxAge {max}")]
    AgeRange { min: u32, max: u32 },
    #[error("nextSessionDate is not a date: {0:?}")]
    InvalidDate(String),
}

impl CourseRecord {
    /// Validate and convert into a course
    pub fn into_course(self) -> Result<Course, RecordError> {
        let id = required(self.id, "id")?;
        let title = required(self.title, "title")?;

        let min_age = self.min_age.map(|n| n.whole("minAge")).transpose()?;
        let max_age = self.max_age.map(|n| n.whole("maxAge")).transpose()?;
        if let (Some(min), Some(max)) = (min_age, max_age) {
            if min > max {
                return Err(RecordError::AgeRange { min, max });
            }
        }

        Ok(Course {
            id,
            title,
            description: self.description,
            category: self.category,
            course_type: self.course_type,
            grade_range: self.grade_range,
            min_age,
            max_age,
            price: self.price.map(|n| n.value("price")).transpose()?,
            next_session_date: self
                .next_session_date
                .as_deref()
                .map(parse_session_date)
                .transpose()?,
        })
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, RecordError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(RecordError::MissingField(field))
}

/// `YYYY-MM-DD`, or an ISO date-time (optionally `Z`-suffixed) truncated to its date
fn parse_session_date(raw: &str) -> Result<NaiveDate, RecordError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| {
            raw.trim_end_matches('Z')
                .parse::<NaiveDateTime>()
                .map(|dt| dt.date())
        })
        .map_err(|_| RecordError::InvalidDate(raw.to_string()))
}

/// A row that failed to parse or validate
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRow {
    /// Zero-based position in the source array
    pub row: usize,
    pub id: Option<String>,
    pub error: RecordError,
}

/// Result of parsing a dataset
#[derive(Debug, Clone, Default)]
pub struct ParsedCourses {
    pub courses: Vec<Course>,
    pub rejected: Vec<RejectedRow>,
}

/// Outcome of a load attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadReport {
    /// The index already held this many documents, nothing was loaded
    Skipped { existing: u64 },
    Loaded { loaded: usize, rejected: usize },
}

/// Parse a JSON array of course rows. Only a non-array document is an error.
pub fn parse_courses(json: &str) -> Result<ParsedCourses> {
    let rows: Vec<Value> =
        serde_json::from_str(json).context("Sample data must be a JSON array of courses")?;

    let mut parsed = ParsedCourses::default();
    for (row, value) in rows.into_iter().enumerate() {
        let id = value.get("id").and_then(Value::as_str).map(str::to_string);
        let result = serde_json::from_value::<CourseRecord>(value)
            .map_err(|e| RecordError::Malformed(e.to_string()))
            .and_then(CourseRecord::into_course);

        match result {
            Ok(course) => parsed.courses.push(course),
            Err(error) => parsed.rejected.push(RejectedRow { row, id, error }),
        }
    }

    Ok(parsed)
}

/// Load the dataset at `path` into an empty index.
///
/// An index that already holds any document is left untouched.
pub async fn load_sample_data<C: IndexClient>(index: &C, path: &Path) -> Result<LoadReport> {
    let existing = index
        .count()
        .await
        .map_err(|e| anyhow!("Failed to count existing courses: {}", e))?;
    if existing > 0 {
        tracing::info!(existing, "Courses already indexed, skipping sample data");
        return Ok(LoadReport::Skipped { existing });
    }

    tracing::info!(path = %path.display(), "Loading sample data");
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read sample data from {}", path.display()))?;
    let parsed = parse_courses(&json)?;

    for rejected in &parsed.rejected {
        tracing::warn!(
            row = rejected.row,
            id = rejected.id.as_deref().unwrap_or("-"),
            error = %rejected.error,
            "Skipping invalid course row"
        );
    }

    let docs: Vec<CourseDocument> = parsed
        .courses
        .into_iter()
        .map(CourseDocument::from_course)
        .collect();
    index
        .index_documents(&docs)
        .await
        .map_err(|e| anyhow!("Failed to index sample data: {}", e))?;

    tracing::info!(
        loaded = docs.len(),
        rejected = parsed.rejected.len(),
        "Sample data loaded"
    );

    Ok(LoadReport::Loaded {
        loaded: docs.len(),
        rejected: parsed.rejected.len(),
    })
}
