// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::course::Course;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Default sort keyword when the caller does not pick one
pub const DEFAULT_SORT: &str = "upcoming";
/// Default page size
pub const DEFAULT_PAGE_SIZE: i32 = 10;

/// Course search request. Every filter is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SearchRequest {
    /// Free-text query matched against title and description
    pub q: Option<String>,
    /// Youngest age the course must accept
    pub min_age: Option<u32>,
    /// Oldest age the course must accept
    pub max_age: Option<u32>,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub course_type: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// Earliest acceptable next session (date or date-time)
    #[param(value_type = Option<String>)]
    pub start_date: Option<StartDate>,
    /// One of `upcoming`, `priceAsc`, `priceDesc` (case-insensitive)
    #[serde(default = "default_sort")]
    pub sort: String,
    /// Zero-based page index
    #[serde(default)]
    pub page: i32,
    /// Page size, clamped to 1..=100
    #[serde(default = "default_size")]
    pub size: i32,
}

fn default_sort() -> String {
    DEFAULT_SORT.to_string()
}

fn default_size() -> i32 {
    DEFAULT_PAGE_SIZE
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            q: None,
            min_age: None,
            max_age: None,
            category: None,
            course_type: None,
            min_price: None,
            max_price: None,
            start_date: None,
            sort: default_sort(),
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl SearchRequest {
    /// Trimmed query text, `None` when absent or blank
    pub fn text_query(&self) -> Option<&str> {
        non_blank(self.q.as_deref())
    }

    pub fn category_filter(&self) -> Option<&str> {
        non_blank(self.category.as_deref())
    }

    pub fn type_filter(&self) -> Option<&str> {
        non_blank(self.course_type.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Requested earliest start, in whatever form the caller sent it.
///
/// Anything that parses as a date or date-time is compared at day precision.
/// Unrecognised strings are kept verbatim and handed to the index as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StartDate {
    /// Date-time with an explicit offset, e.g. `2025-07-01T09:00:00Z`
    Zoned(DateTime<FixedOffset>),
    /// Local date-time, e.g. `2025-07-01T09:00:00`
    Local(NaiveDateTime),
    /// Plain calendar date, e.g. `2025-07-01`
    Date(NaiveDate),
    /// Anything else
    Other(String),
}

impl StartDate {
    /// Calendar date of this start, if it is a recognised temporal value
    pub fn day(&self) -> Option<NaiveDate> {
        match self {
            StartDate::Zoned(dt) => Some(dt.date_naive()),
            StartDate::Local(dt) => Some(dt.date()),
            StartDate::Date(d) => Some(*d),
            StartDate::Other(_) => None,
        }
    }
}

impl std::fmt::Display for StartDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StartDate::Zoned(dt) => write!(f, "{}", dt.to_rfc3339()),
            StartDate::Local(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S")),
            StartDate::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            StartDate::Other(raw) => write!(f, "{}", raw),
        }
    }
}

/// One page of search results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SearchResponse {
    /// Total number of matching courses across all pages
    pub total: u64,
    pub courses: Vec<Course>,
    /// Page index actually used after clamping
    pub page: u32,
    /// Page size actually used after clamping
    pub size: u32,
}

/// Query parameters for the autocomplete endpoint
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SuggestParams {
    /// Title prefix typed so far
    #[serde(default)]
    pub q: String,
}

/// Autocomplete suggestions
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SuggestResponse {
    pub suggestions: Vec<String>,
}

/// Number of courses currently in the index
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CourseCountResponse {
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_fields_missing() {
        let request: SearchRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request, SearchRequest::default());
        assert_eq!(request.sort, "upcoming");
        assert_eq!(request.page, 0);
        assert_eq!(request.size, 10);
    }

    #[test]
    fn test_camel_case_field_names() {
        let request: SearchRequest = serde_json::from_str(
            r#"{"q":"art","minAge":6,"maxAge":9,"type":"CLUB","minPrice":10.5,"sort":"priceAsc"}"#,
        )
        .unwrap();

        assert_eq!(request.min_age, Some(6));
        assert_eq!(request.max_age, Some(9));
        assert_eq!(request.course_type.as_deref(), Some("CLUB"));
        assert_eq!(request.min_price, Some(10.5));
        assert_eq!(request.sort, "priceAsc");
    }

    #[test]
    fn test_blank_text_query_is_absent() {
        let request = SearchRequest {
            q: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(request.text_query(), None);

        let request = SearchRequest {
            q: Some("  chess ".to_string()),
            ..Default::default()
        };
        assert_eq!(request.text_query(), Some("chess"));
    }

    #[test]
    fn test_blank_category_and_type_are_absent() {
        let request = SearchRequest {
            category: Some(String::new()),
            course_type: Some(" ".to_string()),
            ..Default::default()
        };
        assert_eq!(request.category_filter(), None);
        assert_eq!(request.type_filter(), None);
    }

    #[test]
    fn test_start_date_variants() {
        let zoned: StartDate = serde_json::from_str(r#""2025-07-01T23:30:00+02:00""#).unwrap();
        assert!(matches!(zoned, StartDate::Zoned(_)));
        assert_eq!(zoned.day(), NaiveDate::from_ymd_opt(2025, 7, 1));

        let local: StartDate = serde_json::from_str(r#""2025-07-01T09:15:00""#).unwrap();
        assert!(matches!(local, StartDate::Local(_)));
        assert_eq!(local.day(), NaiveDate::from_ymd_opt(2025, 7, 1));

        let date: StartDate = serde_json::from_str(r#""2025-07-01""#).unwrap();
        assert_eq!(date, StartDate::Date(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()));

        let other: StartDate = serde_json::from_str(r#""next tuesday""#).unwrap();
        assert_eq!(other, StartDate::Other("next tuesday".to_string()));
        assert_eq!(other.day(), None);
        assert_eq!(other.to_string(), "next tuesday");
    }
}
