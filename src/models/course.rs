// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Course record returned to API callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    /// Unique course identifier
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    /// Exact-match category token, e.g. "Science"
    pub category: Option<String>,
    /// Exact-match course type, e.g. "COURSE" or "CLUB"
    #[serde(rename = "type")]
    pub course_type: Option<String>,
    /// Free-form grade range label, e.g. "3rd-5th"
    pub grade_range: Option<String>,
    pub min_age: Option<u32>,
    pub max_age: Option<u32>,
    pub price: Option<f64>,
    /// Date of the next scheduled session
    pub next_session_date: Option<NaiveDate>,
}

/// Completion input stored alongside each course for the autocomplete suggester
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionInput {
    pub input: Vec<String>,
}

/// Course document as stored in the search index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseDocument {
    #[serde(flatten)]
    pub course: Course,
    /// Derived from the title at index time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggest: Option<CompletionInput>,
}

impl CourseDocument {
    /// Wrap a course and populate its suggestion input from the title
    pub fn from_course(course: Course) -> Self {
        let suggest = if course.title.trim().is_empty() {
            None
        } else {
            Some(CompletionInput {
                input: vec![course.title.clone()],
            })
        };

        Self { course, suggest }
    }
}
