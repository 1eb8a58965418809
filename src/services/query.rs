// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Boolean query tree and the builder that derives it from a [`SearchRequest`].

use crate::models::schema::fields;
use crate::models::search::{SearchRequest, StartDate};
use serde_json::{json, Map, Value};

/// Edit-distance policy for fuzzy text matching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fuzziness {
    /// Tolerance grows with term length: 0 edits up to 2 chars, 1 up to 5, 2 beyond
    Auto,
}

impl Fuzziness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Fuzziness::Auto => "AUTO",
        }
    }

    /// Maximum edits allowed for a term of `term_len` characters
    pub fn max_edits(&self, term_len: usize) -> usize {
        match self {
            Fuzziness::Auto => match term_len {
                0..=2 => 0,
                3..=5 => 1,
                _ => 2,
            },
        }
    }
}

/// Analyzed full-text match over one or more fields
#[derive(Debug, Clone, PartialEq)]
pub struct MultiMatchQuery {
    pub fields: Vec<&'static str>,
    pub query: String,
    pub fuzziness: Fuzziness,
    pub boost: f32,
}

/// Exact token equality
#[derive(Debug, Clone, PartialEq)]
pub struct TermQuery {
    pub field: &'static str,
    pub value: String,
}

/// Inclusive bound of a range clause
#[derive(Debug, Clone, PartialEq)]
pub enum RangeBound {
    Integer(i64),
    Decimal(f64),
    /// Date string as sent to the index, normally `YYYY-MM-DD`
    Date(String),
}

impl RangeBound {
    fn to_json(&self) -> Value {
        match self {
            RangeBound::Integer(v) => json!(v),
            RangeBound::Decimal(v) => json!(v),
            RangeBound::Date(v) => json!(v),
        }
    }
}

/// Range over a single field; an absent bound leaves that side open
#[derive(Debug, Clone, PartialEq)]
pub struct RangeQuery {
    pub field: &'static str,
    pub gte: Option<RangeBound>,
    pub lte: Option<RangeBound>,
}

/// Leaf clause of a boolean query
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    MultiMatch(MultiMatchQuery),
    Term(TermQuery),
    Range(RangeQuery),
}

impl Clause {
    /// Render as Elasticsearch query DSL
    pub fn to_dsl(&self) -> Value {
        match self {
            Clause::MultiMatch(mm) => json!({
                "multi_match": {
                    "query": mm.query,
                    "fields": mm.fields,
                    "fuzziness": mm.fuzziness.as_str(),
                    "boost": mm.boost,
                }
            }),
            Clause::Term(term) => json!({
                "term": { term.field: { "value": term.value } }
            }),
            Clause::Range(range) => {
                let mut bounds = Map::new();
                if let Some(gte) = &range.gte {
                    bounds.insert("gte".to_string(), gte.to_json());
                }
                if let Some(lte) = &range.lte {
                    bounds.insert("lte".to_string(), lte.to_json());
                }
                json!({ "range": { range.field: bounds } })
            }
        }
    }
}

/// Filter clauses gate eligibility without scoring; should clauses score and,
/// when `minimum_should_match` is set, must match at least that many times.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoolQuery {
    pub should: Vec<Clause>,
    pub filter: Vec<Clause>,
    pub minimum_should_match: Option<u32>,
}

impl BoolQuery {
    /// Render as Elasticsearch query DSL
    pub fn to_dsl(&self) -> Value {
        let mut body = Map::new();
        if !self.should.is_empty() {
            body.insert(
                "should".to_string(),
                Value::Array(self.should.iter().map(Clause::to_dsl).collect()),
            );
        }
        if !self.filter.is_empty() {
            body.insert(
                "filter".to_string(),
                Value::Array(self.filter.iter().map(Clause::to_dsl).collect()),
            );
        }
        if let Some(msm) = self.minimum_should_match {
            body.insert("minimum_should_match".to_string(), json!(msm));
        }
        json!({ "bool": body })
    }
}

/// Translates search requests into boolean queries over the course index
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryBuilder;

impl QueryBuilder {
    pub const TITLE_BOOST: f32 = 2.0;
    pub const DESCRIPTION_BOOST: f32 = 1.0;

    pub fn new() -> Self {
        Self
    }

    pub fn build(&self, request: &SearchRequest) -> BoolQuery {
        let mut query = BoolQuery::default();

        if let Some(text) = request.text_query() {
            query.should.push(fuzzy_match(fields::TITLE, text, Self::TITLE_BOOST));
            query.should.push(fuzzy_match(
                fields::DESCRIPTION,
                text,
                Self::DESCRIPTION_BOOST,
            ));
            query.minimum_should_match = Some(1);
        }

        if let Some(category) = request.category_filter() {
            query.filter.push(term(fields::CATEGORY, category));
        }
        if let Some(course_type) = request.type_filter() {
            query.filter.push(term(fields::TYPE, course_type));
        }

        // Age band overlap: the course must still accept the youngest requested age
        // and must already accept the oldest one.
        if let Some(min_age) = request.min_age {
            query.filter.push(Clause::Range(RangeQuery {
                field: fields::MAX_AGE,
                gte: Some(RangeBound::Integer(i64::from(min_age))),
                lte: None,
            }));
        }
        if let Some(max_age) = request.max_age {
            query.filter.push(Clause::Range(RangeQuery {
                field: fields::MIN_AGE,
                gte: None,
                lte: Some(RangeBound::Integer(i64::from(max_age))),
            }));
        }

        if request.min_price.is_some() || request.max_price.is_some() {
            query.filter.push(Clause::Range(RangeQuery {
                field: fields::PRICE,
                gte: request.min_price.map(RangeBound::Decimal),
                lte: request.max_price.map(RangeBound::Decimal),
            }));
        }

        if let Some(start) = &request.start_date {
            query.filter.push(Clause::Range(RangeQuery {
                field: fields::NEXT_SESSION_DATE,
                gte: Some(start_date_bound(start)),
                lte: None,
            }));
        }

        query
    }
}

fn fuzzy_match(field: &'static str, text: &str, boost: f32) -> Clause {
    Clause::MultiMatch(MultiMatchQuery {
        fields: vec![field],
        query: text.to_string(),
        fuzziness: Fuzziness::Auto,
        boost,
    })
}

fn term(field: &'static str, value: &str) -> Clause {
    Clause::Term(TermQuery {
        field,
        value: value.to_string(),
    })
}

fn start_date_bound(start: &StartDate) -> RangeBound {
    match start.day() {
        Some(day) => RangeBound::Date(day.format("%Y-%m-%d").to_string()),
        None => {
            tracing::warn!(
                start_date = %start,
                "Unrecognised startDate format, passing it to the index unchanged"
            );
            RangeBound::Date(start.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn build(request: SearchRequest) -> BoolQuery {
        QueryBuilder::new().build(&request)
    }

    fn range_on<'a>(query: &'a BoolQuery, field: &str) -> Option<&'a RangeQuery> {
        query.filter.iter().find_map(|c| match c {
            Clause::Range(r) if r.field == field => Some(r),
            _ => None,
        })
    }

    #[test]
    fn test_empty_request_is_filter_only_match_all() {
        let query = build(SearchRequest::default());
        assert!(query.should.is_empty());
        assert!(query.filter.is_empty());
        assert_eq!(query.minimum_should_match, None);
        assert_eq!(query.to_dsl(), json!({ "bool": {} }));
    }

    #[test]
    fn test_blank_text_adds_no_should_clauses() {
        for q in ["", "   ", "\t\n"] {
            let query = build(SearchRequest {
                q: Some(q.to_string()),
                category: Some("Art".to_string()),
                ..Default::default()
            });
            assert!(query.should.is_empty(), "q={q:?} produced should clauses");
            assert_eq!(query.minimum_should_match, None);
            assert_eq!(query.filter.len(), 1);
        }
    }

    #[test]
    fn test_text_adds_boosted_fuzzy_clauses() {
        let query = build(SearchRequest {
            q: Some("  robot ".to_string()),
            ..Default::default()
        });

        assert_eq!(query.minimum_should_match, Some(1));
        assert_eq!(query.should.len(), 2);

        let (title, description) = match (&query.should[0], &query.should[1]) {
            (Clause::MultiMatch(t), Clause::MultiMatch(d)) => (t, d),
            other => panic!("unexpected clauses: {other:?}"),
        };
        assert_eq!(title.fields, vec!["title"]);
        assert_eq!(description.fields, vec!["description"]);
        assert_eq!(title.query, "robot");
        assert_eq!(title.fuzziness, Fuzziness::Auto);
        assert_eq!(description.fuzziness, Fuzziness::Auto);
        assert_eq!(title.boost, 2.0 * description.boost);
    }

    #[test]
    fn test_category_and_type_are_term_filters() {
        let query = build(SearchRequest {
            category: Some("Science".to_string()),
            course_type: Some("CLUB".to_string()),
            ..Default::default()
        });

        assert_eq!(
            query.filter,
            vec![
                Clause::Term(TermQuery {
                    field: "category",
                    value: "Science".to_string()
                }),
                Clause::Term(TermQuery {
                    field: "type",
                    value: "CLUB".to_string()
                }),
            ]
        );
        assert!(query.should.is_empty());
    }

    #[test]
    fn test_age_filters_target_opposite_bounds() {
        let query = build(SearchRequest {
            min_age: Some(8),
            max_age: Some(12),
            ..Default::default()
        });

        let upper = range_on(&query, "maxAge").expect("maxAge filter");
        assert_eq!(upper.gte, Some(RangeBound::Integer(8)));
        assert_eq!(upper.lte, None);

        let lower = range_on(&query, "minAge").expect("minAge filter");
        assert_eq!(lower.gte, None);
        assert_eq!(lower.lte, Some(RangeBound::Integer(12)));
    }

    #[test]
    fn test_single_age_bound_adds_single_filter() {
        let query = build(SearchRequest {
            max_age: Some(6),
            ..Default::default()
        });
        assert_eq!(query.filter.len(), 1);
        assert!(range_on(&query, "maxAge").is_none());
        assert!(range_on(&query, "minAge").is_some());
    }

    #[test]
    fn test_price_bounds_combine_into_one_range() {
        let query = build(SearchRequest {
            min_price: Some(10.0),
            max_price: Some(50.0),
            ..Default::default()
        });
        assert_eq!(query.filter.len(), 1);
        let price = range_on(&query, "price").unwrap();
        assert_eq!(price.gte, Some(RangeBound::Decimal(10.0)));
        assert_eq!(price.lte, Some(RangeBound::Decimal(50.0)));
    }

    #[test]
    fn test_open_ended_price_range() {
        let query = build(SearchRequest {
            max_price: Some(25.0),
            ..Default::default()
        });
        let price = range_on(&query, "price").unwrap();
        assert_eq!(price.gte, None);
        assert_eq!(price.lte, Some(RangeBound::Decimal(25.0)));
        assert_eq!(
            Clause::Range(price.clone()).to_dsl(),
            json!({ "range": { "price": { "lte": 25.0 } } })
        );
    }

    #[test]
    fn test_inverted_price_bounds_are_kept_as_given() {
        let query = build(SearchRequest {
            min_price: Some(100.0),
            max_price: Some(50.0),
            ..Default::default()
        });
        let price = range_on(&query, "price").unwrap();
        assert_eq!(price.gte, Some(RangeBound::Decimal(100.0)));
        assert_eq!(price.lte, Some(RangeBound::Decimal(50.0)));
    }

    #[test]
    fn test_start_date_truncated_to_day() {
        let start = NaiveDate::from_ymd_opt(2025, 9, 3)
            .unwrap()
            .and_hms_opt(17, 45, 12)
            .unwrap();
        let query = build(SearchRequest {
            start_date: Some(StartDate::Local(start)),
            ..Default::default()
        });
        let range = range_on(&query, "nextSessionDate").unwrap();
        assert_eq!(range.gte, Some(RangeBound::Date("2025-09-03".to_string())));
        assert_eq!(range.lte, None);
    }

    #[test]
    fn test_unrecognised_start_date_passes_through() {
        let query = build(SearchRequest {
            start_date: Some(StartDate::Other("now-1d".to_string())),
            ..Default::default()
        });
        let range = range_on(&query, "nextSessionDate").unwrap();
        assert_eq!(range.gte, Some(RangeBound::Date("now-1d".to_string())));
    }

    #[test]
    fn test_full_request_dsl() {
        let query = build(SearchRequest {
            q: Some("chess".to_string()),
            category: Some("Games".to_string()),
            min_age: Some(9),
            ..Default::default()
        });

        assert_eq!(
            query.to_dsl(),
            json!({
                "bool": {
                    "should": [
                        { "multi_match": { "query": "chess", "fields": ["title"], "fuzziness": "AUTO", "boost": 2.0 } },
                        { "multi_match": { "query": "chess", "fields": ["description"], "fuzziness": "AUTO", "boost": 1.0 } }
                    ],
                    "filter": [
                        { "term": { "category": { "value": "Games" } } },
                        { "range": { "maxAge": { "gte": 9 } } }
                    ],
                    "minimum_should_match": 1
                }
            })
        );
    }

    #[test]
    fn test_auto_fuzziness_scales_with_length() {
        assert_eq!(Fuzziness::Auto.max_edits(2), 0);
        assert_eq!(Fuzziness::Auto.max_edits(3), 1);
        assert_eq!(Fuzziness::Auto.max_edits(5), 1);
        assert_eq!(Fuzziness::Auto.max_edits(6), 2);
    }
}
