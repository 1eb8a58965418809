// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! In-process course index.
//!
//! Evaluates the same boolean query trees that are sent to Elasticsearch: standard
//! analysis (lowercase, split on non-alphanumerics), AUTO fuzzy term matching, term,
//! range and bool semantics, field sorting with missing values last, and prefix
//! completion over the `suggest` inputs. Relevance scores are not computed since
//! results are always field-sorted.
//!
//! Completion options come back in alphabetical order of their input text, with no
//! notion of weight. Elasticsearch orders options by weight first and only then by
//! input, so the two orders match only while every input carries the same weight.

use crate::error::IndexError;
use crate::models::course::{Course, CourseDocument};
use crate::models::schema::{fields, IndexSchema};
use crate::services::index::{
    IndexClient, RawHit, SearchHits, SuggestionBlock, SuggestionEntry, SuggestionOption,
};
use crate::services::query::{BoolQuery, Clause, MultiMatchQuery, RangeBound, RangeQuery};
use crate::services::sort::{SortKey, SortOrder, SortSpec};
use crate::services::suggest::SuggesterSpec;
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use tokio::sync::RwLock;

/// Course index held in memory, keyed by course id
#[derive(Debug, Default)]
pub struct MemoryIndex {
    docs: RwLock<BTreeMap<String, CourseDocument>>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index pre-filled with documents
    pub fn with_documents(docs: impl IntoIterator<Item = CourseDocument>) -> Self {
        let docs = docs
            .into_iter()
            .map(|doc| (doc.course.id.clone(), doc))
            .collect();
        Self {
            docs: RwLock::new(docs),
        }
    }
}

impl IndexClient for MemoryIndex {
    async fn execute_query(
        &self,
        query: &BoolQuery,
        sort: &SortSpec,
        page: u32,
        size: u32,
    ) -> Result<SearchHits, IndexError> {
        let docs = self.docs.read().await;

        let mut matched = Vec::new();
        for doc in docs.values() {
            if matches_query(&doc.course, query)? {
                matched.push(doc);
            }
        }
        matched.sort_by(|a, b| compare_docs(&a.course, &b.course, sort));

        let from = (page as usize).saturating_mul(size as usize);
        let hits = matched
            .iter()
            .skip(from)
            .take(size as usize)
            .map(|doc| to_raw_hit(doc))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SearchHits {
            total: matched.len() as u64,
            hits,
        })
    }

    async fn execute_suggest(
        &self,
        suggester: &SuggesterSpec,
    ) -> Result<Option<SuggestionBlock>, IndexError> {
        let docs = self.docs.read().await;
        let prefix = suggester.prefix.to_lowercase();

        let mut texts: Vec<&str> = docs
            .values()
            .filter_map(|doc| doc.suggest.as_ref())
            .flat_map(|suggest| suggest.input.iter())
            .filter(|input| input.to_lowercase().starts_with(&prefix))
            .map(String::as_str)
            .collect();
        texts.sort_unstable();

        let mut seen = HashSet::new();
        let options = texts
            .into_iter()
            .filter(|text| !suggester.skip_duplicates || seen.insert(*text))
            .take(suggester.size)
            .map(|text| SuggestionOption {
                text: text.to_string(),
            })
            .collect();

        Ok(Some(SuggestionBlock {
            entries: vec![SuggestionEntry {
                text: suggester.prefix.clone(),
                options,
            }],
        }))
    }

    async fn ensure_index(&self, schema: &IndexSchema) -> Result<(), IndexError> {
        tracing::debug!(fields = schema.fields.len(), "In-memory index ready");
        Ok(())
    }

    async fn count(&self) -> Result<u64, IndexError> {
        Ok(self.docs.read().await.len() as u64)
    }

    async fn index_documents(&self, docs: &[CourseDocument]) -> Result<(), IndexError> {
        let mut stored = self.docs.write().await;
        for doc in docs {
            stored.insert(doc.course.id.clone(), doc.clone());
        }
        Ok(())
    }
}

fn to_raw_hit(doc: &CourseDocument) -> Result<RawHit, IndexError> {
    let source =
        serde_json::to_value(doc).map_err(|e| IndexError::MalformedResponse(e.to_string()))?;
    Ok(RawHit {
        id: Some(doc.course.id.clone()),
        source,
    })
}

// ---------------------------------------------------------------------------
// Query evaluation
// ---------------------------------------------------------------------------

/// Typed view of one stored field
#[derive(Debug, Clone, PartialEq)]
enum FieldValue<'a> {
    Text(&'a str),
    Keyword(&'a str),
    Number(f64),
    Date(NaiveDate),
    Missing,
}

fn field_value<'a>(course: &'a Course, field: &str) -> FieldValue<'a> {
    let text = |v: &'a Option<String>| v.as_deref().map_or(FieldValue::Missing, FieldValue::Text);
    let keyword =
        |v: &'a Option<String>| v.as_deref().map_or(FieldValue::Missing, FieldValue::Keyword);
    let number = |v: Option<f64>| v.map_or(FieldValue::Missing, FieldValue::Number);

    match field {
        fields::ID => FieldValue::Keyword(&course.id),
        fields::TITLE => FieldValue::Text(&course.title),
        fields::DESCRIPTION => text(&course.description),
        fields::CATEGORY => keyword(&course.category),
        fields::TYPE => keyword(&course.course_type),
        fields::GRADE_RANGE => keyword(&course.grade_range),
        fields::MIN_AGE => number(course.min_age.map(f64::from)),
        fields::MAX_AGE => number(course.max_age.map(f64::from)),
        fields::PRICE => number(course.price),
        fields::NEXT_SESSION_DATE => course
            .next_session_date
            .map_or(FieldValue::Missing, FieldValue::Date),
        _ => FieldValue::Missing,
    }
}

fn matches_query(course: &Course, query: &BoolQuery) -> Result<bool, IndexError> {
    for clause in &query.filter {
        if !matches_clause(course, clause)? {
            return Ok(false);
        }
    }

    // Without filters a bare should list behaves like minimum_should_match = 1.
    let implicit = usize::from(query.filter.is_empty() && !query.should.is_empty());
    let required = query
        .minimum_should_match
        .map_or(implicit, |msm| msm as usize);
    if required == 0 {
        return Ok(true);
    }

    let mut matched = 0;
    for clause in &query.should {
        if matches_clause(course, clause)? {
            matched += 1;
        }
    }
    Ok(matched >= required)
}

fn matches_clause(course: &Course, clause: &Clause) -> Result<bool, IndexError> {
    match clause {
        Clause::MultiMatch(mm) => Ok(matches_text(course, mm)),
        Clause::Term(term) => Ok(match field_value(course, term.field) {
            FieldValue::Keyword(v) => v == term.value,
            FieldValue::Text(v) => analyze(v).contains(&term.value),
            _ => false,
        }),
        Clause::Range(range) => matches_range(course, range),
    }
}

fn matches_text(course: &Course, mm: &MultiMatchQuery) -> bool {
    let query_terms = analyze(&mm.query);
    mm.fields.iter().any(|field| {
        let FieldValue::Text(text) = field_value(course, field) else {
            return false;
        };
        let doc_terms = analyze(text);
        query_terms.iter().any(|q| {
            let max_edits = mm.fuzziness.max_edits(q.chars().count());
            doc_terms.iter().any(|d| edit_distance(q, d) <= max_edits)
        })
    })
}

fn matches_range(course: &Course, range: &RangeQuery) -> Result<bool, IndexError> {
    let value = field_value(course, range.field);
    if value == FieldValue::Missing {
        return Ok(false);
    }

    let within = |bound: &RangeBound, accept: fn(Ordering) -> bool| -> Result<bool, IndexError> {
        compare_to_bound(&value, bound, range.field).map(accept)
    };

    if let Some(gte) = &range.gte {
        if !within(gte, |o| o != Ordering::Less)? {
            return Ok(false);
        }
    }
    if let Some(lte) = &range.lte {
        if !within(lte, |o| o != Ordering::Greater)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Ordering of a stored value relative to a range bound
fn compare_to_bound(
    value: &FieldValue<'_>,
    bound: &RangeBound,
    field: &str,
) -> Result<Ordering, IndexError> {
    match (value, bound) {
        (FieldValue::Number(v), RangeBound::Integer(b)) => Ok(cmp_f64(*v, *b as f64)),
        (FieldValue::Number(v), RangeBound::Decimal(b)) => Ok(cmp_f64(*v, *b)),
        (FieldValue::Date(v), RangeBound::Date(raw)) => {
            let bound = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| {
                IndexError::Rejected {
                    status: 400,
                    reason: format!("failed to parse date field [{raw}] for [{field}]: {e}"),
                }
            })?;
            Ok(v.cmp(&bound))
        }
        _ => Err(IndexError::Rejected {
            status: 400,
            reason: format!("range bound {bound:?} does not fit field [{field}]"),
        }),
    }
}

fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Standard analysis: lowercase and split on anything that is not alphanumeric
fn analyze(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Edit distance over chars where an adjacent transposition counts as one edit
/// (optimal string alignment), matching `fuzzy_transpositions: true`
fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut before: Vec<usize> = vec![0; b.len() + 1];
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 0..a.len() {
        curr[0] = i + 1;
        for j in 0..b.len() {
            let substitution = prev[j] + usize::from(a[i] != b[j]);
            let mut best = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
            if i > 0 && j > 0 && a[i] == b[j - 1] && a[i - 1] == b[j] {
                best = best.min(before[j - 1] + 1);
            }
            curr[j + 1] = best;
        }
        std::mem::swap(&mut before, &mut prev);
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

fn compare_docs(a: &Course, b: &Course, sort: &SortSpec) -> Ordering {
    sort.keys()
        .iter()
        .map(|key| compare_by_key(a, b, key))
        .find(|o| *o != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

fn compare_by_key(a: &Course, b: &Course, key: &SortKey) -> Ordering {
    let (va, vb) = (field_value(a, key.field), field_value(b, key.field));
    let ordering = match (&va, &vb) {
        (FieldValue::Missing, FieldValue::Missing) => return Ordering::Equal,
        // Missing values sort last in both directions.
        (FieldValue::Missing, _) => return Ordering::Greater,
        (_, FieldValue::Missing) => return Ordering::Less,
        (FieldValue::Number(x), FieldValue::Number(y)) => cmp_f64(*x, *y),
        (FieldValue::Date(x), FieldValue::Date(y)) => x.cmp(y),
        (FieldValue::Keyword(x), FieldValue::Keyword(y))
        | (FieldValue::Text(x), FieldValue::Text(y)) => x.cmp(y),
        _ => Ordering::Equal,
    };

    match key.order {
        SortOrder::Asc => ordering,
        SortOrder::Desc => ordering.reverse(),
    }
}
