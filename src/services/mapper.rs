// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::error::MappingError;
use crate::models::course::Course;
use crate::models::schema::fields;
use crate::services::index::RawHit;
use chrono::{NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Projects raw index hits onto [`Course`] records
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultMapper;

impl ResultMapper {
    pub fn new() -> Self {
        Self
    }

    /// Map every hit in order. The first unmappable hit fails the whole page.
    pub fn map(&self, hits: Vec<RawHit>) -> Result<Vec<Course>, MappingError> {
        hits.into_iter().map(|hit| self.map_hit(hit)).collect()
    }

    pub fn map_hit(&self, hit: RawHit) -> Result<Course, MappingError> {
        let empty = Map::new();
        let source = hit.source.as_object().unwrap_or(&empty);

        let id = match source.get(fields::ID).and_then(Value::as_str) {
            Some(id) => id.to_string(),
            None => hit.id.ok_or(MappingError::MissingField(fields::ID))?,
        };
        let title = source
            .get(fields::TITLE)
            .and_then(Value::as_str)
            .ok_or(MappingError::MissingField(fields::TITLE))?
            .to_string();

        let field = FieldReader { source, id: &id };

        Ok(Course {
            description: field.optional(fields::DESCRIPTION)?,
            category: field.optional(fields::CATEGORY)?,
            course_type: field.optional(fields::TYPE)?,
            grade_range: field.optional(fields::GRADE_RANGE)?,
            min_age: field.optional(fields::MIN_AGE)?,
            max_age: field.optional(fields::MAX_AGE)?,
            price: field.optional(fields::PRICE)?,
            next_session_date: field.date(fields::NEXT_SESSION_DATE)?,
            title,
            id,
        })
    }
}

struct FieldReader<'a> {
    source: &'a Map<String, Value>,
    id: &'a str,
}

impl FieldReader<'_> {
    fn present(&self, field: &str) -> Option<&Value> {
        self.source.get(field).filter(|v| !v.is_null())
    }

    fn invalid(&self, field: &str, reason: impl ToString) -> MappingError {
        MappingError::InvalidField {
            id: self.id.to_string(),
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }

    fn optional<T: DeserializeOwned>(&self, field: &str) -> Result<Option<T>, MappingError> {
        self.present(field)
            .map(|value| serde_json::from_value(value.clone()).map_err(|e| self.invalid(field, e)))
            .transpose()
    }

    /// Dates are stored as `YYYY-MM-DD`; older documents may carry a full date-time.
    fn date(&self, field: &str) -> Result<Option<NaiveDate>, MappingError> {
        let Some(value) = self.present(field) else {
            return Ok(None);
        };
        let raw = value
            .as_str()
            .ok_or_else(|| self.invalid(field, "expected a date string"))?;

        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .or_else(|_| {
                raw.trim_end_matches('Z')
                    .parse::<NaiveDateTime>()
                    .map(|dt| dt.date())
            })
            .map(Some)
            .map_err(|e| self.invalid(field, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hit(source: Value) -> RawHit {
        RawHit {
            id: Some("engine-id".to_string()),
            source,
        }
    }

    #[test]
    fn test_maps_all_fields() {
        let course = ResultMapper::new()
            .map_hit(hit(json!({
                "id": "c-7",
                "title": "Robotics 101",
                "description": "Build a robot",
                "category": "Science",
                "type": "COURSE",
                "gradeRange": "3rd-5th",
                "minAge": 7,
                "maxAge": 14,
                "price": 49.99,
                "nextSessionDate": "2025-07-01",
                "suggest": { "input": ["Robotics 101"] }
            })))
            .unwrap();

        assert_eq!(course.id, "c-7");
        assert_eq!(course.title, "Robotics 101");
        assert_eq!(course.course_type.as_deref(), Some("COURSE"));
        assert_eq!(course.grade_range.as_deref(), Some("3rd-5th"));
        assert_eq!(course.min_age, Some(7));
        assert_eq!(course.max_age, Some(14));
        assert_eq!(course.price, Some(49.99));
        assert_eq!(course.next_session_date, NaiveDate::from_ymd_opt(2025, 7, 1));
    }

    #[test]
    fn test_optional_fields_may_be_absent_or_null() {
        let course = ResultMapper::new()
            .map_hit(hit(json!({ "id": "c-1", "title": "Chess", "price": null })))
            .unwrap();
        assert_eq!(course.price, None);
        assert_eq!(course.description, None);
        assert_eq!(course.next_session_date, None);
    }

    #[test]
    fn test_engine_id_used_when_source_has_none() {
        let course = ResultMapper::new()
            .map_hit(hit(json!({ "title": "Chess" })))
            .unwrap();
        assert_eq!(course.id, "engine-id");
    }

    #[test]
    fn test_missing_id_is_error() {
        let err = ResultMapper::new()
            .map_hit(RawHit {
                id: None,
                source: json!({ "title": "Chess" }),
            })
            .unwrap_err();
        assert_eq!(err, MappingError::MissingField("id"));
    }

    #[test]
    fn test_missing_title_is_error() {
        let err = ResultMapper::new()
            .map_hit(hit(json!({ "id": "c-1" })))
            .unwrap_err();
        assert_eq!(err, MappingError::MissingField("title"));
    }

    #[test]
    fn test_mistyped_field_is_error() {
        let err = ResultMapper::new()
            .map_hit(hit(json!({ "id": "c-1", "title": "Chess", "minAge": "seven" })))
            .unwrap_err();
        assert!(matches!(
            err,
            MappingError::InvalidField { ref id, ref field, .. } if id == "c-1" && field == "minAge"
        ));
    }

    #[test]
    fn test_date_time_values_truncated_to_date() {
        let course = ResultMapper::new()
            .map_hit(hit(json!({
                "id": "c-1",
                "title": "Chess",
                "nextSessionDate": "2025-07-01T15:00:00Z"
            })))
            .unwrap();
        assert_eq!(course.next_session_date, NaiveDate::from_ymd_opt(2025, 7, 1));
    }

    #[test]
    fn test_map_fails_whole_page_on_bad_hit() {
        let hits = vec![
            hit(json!({ "id": "a", "title": "A" })),
            hit(json!({ "id": "b" })),
        ];
        assert!(ResultMapper::new().map(hits).is_err());
    }

    #[test]
    fn test_map_preserves_order() {
        let hits = vec![
            hit(json!({ "id": "b", "title": "B" })),
            hit(json!({ "id": "a", "title": "A" })),
        ];
        let courses = ResultMapper::new().map(hits).unwrap();
        let ids: Vec<&str> = courses.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }
}
