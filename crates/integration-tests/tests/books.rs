//! Integration tests for the book catalog and health endpoints.

#![allow(clippy::unwrap_used)]

use axum::http::{StatusCode, header::CACHE_CONTROL};
use bookstore_integration_tests::TestContext;

#[tokio::test]
async fn test_books_lists_whole_catalog() {
    let ctx = TestContext::new();
    let resp = ctx.get("/books").await;

    assert_eq!(resp.status, StatusCode::OK);
    let books = resp.body.as_array().unwrap();
    assert_eq!(books.len(), ctx.state.catalog().len());
    assert!(books.iter().all(|b| b["id"].is_string() && b["title"].is_string()));
}

#[tokio::test]
async fn test_books_genre_lists_are_joined() {
    let ctx = TestContext::new();
    let resp = ctx.get("/books").await;

    let books = resp.body.as_array().unwrap();
    let first = books.iter().find(|b| b["id"] == "b1").unwrap();
    assert_eq!(first["genre"], "Science Fiction, Literary Fiction");

    let scalar = books.iter().find(|b| b["id"] == "b3").unwrap();
    assert_eq!(scalar["genre"], "Literary Fiction");

    assert!(books.iter().all(|b| !b["genre"].is_array()));
}

#[tokio::test]
async fn test_books_keep_extra_attributes() {
    let ctx = TestContext::with_catalog(
        r#"[{"id": "x1", "title": "Dune", "genre": ["SF"], "price": 9.5, "isbn": "0441013597"}]"#,
    );
    let resp = ctx.get("/books").await;

    let book = &resp.body[0];
    assert_eq!(book["genre"], "SF");
    assert_eq!(book["isbn"], "0441013597");
    assert!((book["price"].as_f64().unwrap() - 9.5).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_numeric_ids_are_served_unchanged() {
    let ctx = TestContext::with_catalog(
        r#"[{"id": 1, "title": "Dune", "genre": ["SF", "Classic"]}, {"id": "b2", "title": "Emma"}]"#,
    );
    let resp = ctx.get("/books").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body[0]["id"], 1);
    assert_eq!(resp.body[0]["genre"], "SF, Classic");
    assert_eq!(resp.body[1]["id"], "b2");
}

#[tokio::test]
async fn test_books_are_cacheable() {
    let ctx = TestContext::new();
    let resp = ctx.get("/books").await;

    assert_eq!(resp.headers[CACHE_CONTROL], "public, max-age=300");
}

#[tokio::test]
async fn test_health_endpoints() {
    let ctx = TestContext::new();

    let resp = ctx.get("/health").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, "ok");

    let resp = ctx.get("/health/ready").await;
    assert_eq!(resp.status, StatusCode::OK);
}

#[tokio::test]
async fn test_readiness_fails_with_empty_catalog() {
    let ctx = TestContext::with_catalog("[]");
    let resp = ctx.get("/health/ready").await;

    assert_eq!(resp.status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let ctx = TestContext::new();
    let resp = ctx.get("/authors").await;

    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}
