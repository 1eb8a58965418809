// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use chrono::NaiveDate;
use skillseek::models::course::{Course, CourseDocument};
use skillseek::models::search::{SearchRequest, StartDate};
use skillseek::services::index::IndexClient;
use skillseek::services::loader::{load_sample_data, LoadReport};
use skillseek::services::memory_index::MemoryIndex;
use skillseek::services::search::CourseService;
use std::path::Path;
use std::sync::Arc;

// End-to-end search over the bundled dataset loaded into the in-memory index.

async fn sample_service() -> CourseService<MemoryIndex> {
    let index = MemoryIndex::new();
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/sample-courses.json");
    let report = load_sample_data(&index, &path)
        .await
        .expect("Failed to load sample data");
    assert_eq!(
        report,
        LoadReport::Loaded {
            loaded: 13,
            rejected: 0
        }
    );
    CourseService::with_index(index)
}

fn ids(response: &skillseek::models::search::SearchResponse) -> Vec<&str> {
    response.courses.iter().map(|c| c.id.as_str()).collect()
}

#[tokio::test]
async fn test_fuzzy_text_with_age_and_price_filters() {
    let service = sample_service().await;

    let response = service
        .search(SearchRequest {
            q: Some("robot".to_string()),
            min_age: Some(8),
            max_age: Some(12),
            max_price: Some(60.0),
            sort: "priceAsc".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(response.total, 2);
    assert_eq!(ids(&response), vec!["c-008", "c-001"]);
}

#[tokio::test]
async fn test_typo_still_matches() {
    let service = sample_service().await;

    let response = service
        .search(SearchRequest {
            q: Some("chees".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(ids(&response), vec!["c-003"]);
}

#[tokio::test]
async fn test_swapped_letters_still_match() {
    let service = sample_service().await;

    let response = service
        .search(SearchRequest {
            q: Some("chses".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(ids(&response), vec!["c-003"]);
}

#[tokio::test]
async fn test_whole_word_prefix_is_not_a_fuzzy_match() {
    // "robot" is three edits from "robotics", beyond AUTO fuzziness for a five
    // letter term, so a title-only match on "Robotics 101" does not qualify.
    let index = MemoryIndex::new();
    let robotics = Course {
        id: "r".to_string(),
        title: "Robotics 101".to_string(),
        description: None,
        category: None,
        course_type: None,
        grade_range: None,
        min_age: Some(7),
        max_age: Some(14),
        price: Some(49.99),
        next_session_date: None,
    };
    let painting = Course {
        id: "p".to_string(),
        title: "Painting".to_string(),
        min_age: Some(5),
        max_age: Some(10),
        price: Some(20.0),
        ..robotics.clone()
    };
    index
        .index_documents(&[
            CourseDocument::from_course(robotics),
            CourseDocument::from_course(painting),
        ])
        .await
        .unwrap();
    let service = CourseService::with_index(index);

    let request = SearchRequest {
        q: Some("robot".to_string()),
        min_age: Some(8),
        max_age: Some(12),
        sort: "priceasc".to_string(),
        ..Default::default()
    };
    let response = service.search(request.clone()).await.unwrap();
    assert_eq!(response.total, 0);

    let response = service
        .search(SearchRequest {
            q: Some("robotcs".to_string()),
            ..request
        })
        .await
        .unwrap();
    assert_eq!(ids(&response), vec!["r"]);
}

#[tokio::test]
async fn test_age_overlap_filter() {
    let service = sample_service().await;

    let response = service
        .search(SearchRequest {
            min_age: Some(5),
            max_age: Some(5),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(ids(&response), vec!["c-002"]);
}

#[tokio::test]
async fn test_inverted_price_range_matches_nothing() {
    let service = sample_service().await;

    let response = service
        .search(SearchRequest {
            min_price: Some(100.0),
            max_price: Some(50.0),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(response.total, 0);
    assert!(response.courses.is_empty());
}

#[tokio::test]
async fn test_default_sort_is_upcoming_with_undated_last() {
    let service = sample_service().await;

    let response = service
        .search(SearchRequest {
            size: 100,
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(response.total, 13);
    let order = ids(&response);
    assert_eq!(order.first(), Some(&"c-003"));
    assert_eq!(order.last(), Some(&"c-008"));
}

#[tokio::test]
async fn test_price_desc_puts_unpriced_last() {
    let service = sample_service().await;

    let response = service
        .search(SearchRequest {
            sort: "PRICEDESC".to_string(),
            size: 100,
            ..Default::default()
        })
        .await
        .unwrap();

    let order = ids(&response);
    assert_eq!(order.first(), Some(&"c-012"));
    assert_eq!(order.last(), Some(&"c-013"));
}

#[tokio::test]
async fn test_last_page_is_short() {
    let service = sample_service().await;

    let response = service
        .search(SearchRequest {
            page: 2,
            size: 5,
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(response.total, 13);
    assert_eq!(response.courses.len(), 3);
    assert_eq!((response.page, response.size), (2, 5));
}

#[tokio::test]
async fn test_category_type_and_start_date_filters() {
    let service = sample_service().await;

    let science = service
        .search(SearchRequest {
            category: Some("Science".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(science.total, 4);

    let camps = service
        .search(SearchRequest {
            course_type: Some("CAMP".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(ids(&camps), vec!["c-006", "c-012"]);

    let late_summer = service
        .search(SearchRequest {
            start_date: NaiveDate::from_ymd_opt(2025, 8, 1).map(StartDate::Date),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(ids(&late_summer), vec!["c-005", "c-011", "c-009"]);
}

#[tokio::test]
async fn test_suggestions_are_prefix_matches() {
    let service = sample_service().await;

    assert_eq!(
        service.suggest("rob").await.unwrap(),
        vec!["Robotics Explorers", "Robotics Summer Camp"]
    );
    assert_eq!(
        service.suggest("Ro").await.unwrap(),
        vec![
            "Robotics Explorers",
            "Robotics Summer Camp",
            "Rock Climbing Basics"
        ]
    );
    assert!(service.suggest("zzz").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_concurrent_searches_are_independent() {
    let service = Arc::new(sample_service().await);

    let requests = (0..8).map(|page| {
        let service = Arc::clone(&service);
        async move {
            service
                .search(SearchRequest {
                    page,
                    size: 2,
                    ..Default::default()
                })
                .await
        }
    });
    let results = futures::future::join_all(requests).await;

    let mut seen = Vec::new();
    for (page, result) in results.into_iter().enumerate() {
        let response = result.unwrap();
        assert_eq!(response.page, page as u32);
        assert_eq!(response.total, 13);
        seen.extend(response.courses.into_iter().map(|c| c.id));
    }
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 13);
}

#[tokio::test]
async fn test_reload_is_skipped() {
    let service = sample_service().await;
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/sample-courses.json");

    let report = load_sample_data(service.index(), &path).await.unwrap();
    assert_eq!(report, LoadReport::Skipped { existing: 13 });
    assert_eq!(service.index().count().await.unwrap(), 13);
}
