//! HTTP-level integration tests for the `/api/v1/movies` endpoints.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router
//! without an actual TCP listener, over an in-memory store.

mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use async_trait::async_trait;
use axum::http::header::LOCATION;
use axum::http::{Method, StatusCode};
use cinedex_core::filters::Metadata;
use cinedex_core::memory::InMemoryMovieStore;
use cinedex_core::movie::Movie;
use cinedex_core::store::{MovieQuery, MovieStore, StoreError};
use cinedex_core::types::DbId;
use common::{body_json, create_movie, delete, get, patch_json, post_json, send_raw};
use serde_json::json;

fn arrival() -> serde_json::Value {
    json!({
        "title": "Arrival",
        "year": 2016,
        "runtime": "116 mins",
        "genres": ["sci-fi", "drama"]
    })
}

// ---------------------------------------------------------------------------
// Create / show
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_returns_201_with_location_and_envelope() {
    let app = common::build_test_app();
    let response = post_json(app, "/api/v1/movies", arrival()).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response.headers().get(LOCATION).unwrap().to_str().unwrap().to_string();

    let json = body_json(response).await;
    let movie = &json["data"];
    assert_eq!(location, format!("/api/v1/movies/{}", movie["id"]));
    assert_eq!(movie["title"], "Arrival");
    assert_eq!(movie["year"], 2016);
    assert_eq!(movie["runtime"], "116 mins");
    assert_eq!(movie["genres"], json!(["sci-fi", "drama"]));
    assert_eq!(movie["version"], 1);
    assert!(movie.get("created_at").is_none());
}

#[tokio::test]
async fn show_returns_the_created_movie() {
    let app = common::build_test_app();
    let created = create_movie(app.clone(), arrival()).await;
    let id = created["id"].as_i64().unwrap();

    let response = get(app, &format!("/api/v1/movies/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"], created);
}

#[tokio::test]
async fn show_missing_or_malformed_id_returns_404() {
    let app = common::build_test_app();

    let response = get(app.clone(), "/api/v1/movies/999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Movie with id 999 not found");

    for bad in ["0", "-3", "abc"] {
        let response = get(app.clone(), &format!("/api/v1/movies/{bad}")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "id {bad}");
    }
}

// ---------------------------------------------------------------------------
// Create: body decoding and validation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_rejects_unknown_key() {
    let app = common::build_test_app();
    let mut body = arrival();
    body["rating"] = json!(5);

    let response = post_json(app, "/api/v1/movies", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "body contains unknown key \"rating\""
    );
}

#[tokio::test]
async fn create_rejects_bad_bodies_with_400() {
    let app = common::build_test_app();
    let cases = [
        ("", "body must not be empty"),
        ("{\"title\": \"Arrival\"", "body contains badly-formed JSON"),
        ("{} {}", "body must contain a single JSON value"),
        (
            "{\"year\": \"2016\"}",
            "body contains incorrect JSON type for field \"year\"",
        ),
        ("{\"runtime\": \"116 minutes\"}", "invalid runtime format"),
        ("{\"runtime\": 116}", "invalid runtime format"),
        ("[]", "body contains incorrect JSON type (at character 1)"),
        (
            "[\"Arrival\", 2016, \"116 mins\", [\"sci-fi\"]]",
            "body contains incorrect JSON type (at character 1)",
        ),
        ("{\"title\": \"A\",}", "body contains badly formatted JSON (at character 15)"),
    ];

    for (body, message) in cases {
        let response = send_raw(app.clone(), Method::POST, "/api/v1/movies", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {body:?}");
        assert_eq!(body_json(response).await["error"], message, "body {body:?}");
    }
}

#[tokio::test]
async fn create_rejects_oversized_body() {
    let app = common::build_test_app();
    let title = "a".repeat(1_048_576);
    let body = json!({ "title": title }).to_string();

    let response = send_raw(app, Method::POST, "/api/v1/movies", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "body must not be larger than 1048576 bytes"
    );
}

#[tokio::test]
async fn create_reports_every_invalid_field_with_422() {
    let app = common::build_test_app();
    let body = json!({
        "title": "",
        "year": 1700,
        "runtime": "-5 mins",
        "genres": ["drama", "drama"]
    });

    let response = post_json(app, "/api/v1/movies", body).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = body_json(response).await;
    assert_eq!(json["code"], "FAILED_VALIDATION");
    assert_eq!(
        json["error"],
        json!({
            "title": "must be provided",
            "year": "must be greater than 1888",
            "runtime": "must be a positive integer",
            "genres": "must not contain duplicate values"
        })
    );
}

#[tokio::test]
async fn create_with_empty_object_reports_missing_fields() {
    let app = common::build_test_app();
    let response = post_json(app, "/api/v1/movies", json!({})).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = body_json(response).await;
    assert_eq!(json["error"]["title"], "must be provided");
    assert_eq!(json["error"]["year"], "must be provided");
    assert_eq!(json["error"]["runtime"], "must be provided");
    assert_eq!(json["error"]["genres"], "must contain at least 1 genre");
}

// ---------------------------------------------------------------------------
// Partial update
// ---------------------------------------------------------------------------

#[tokio::test]
async fn partial_update_changes_only_supplied_fields() {
    let app = common::build_test_app();
    let created = create_movie(app.clone(), arrival()).await;
    let id = created["id"].as_i64().unwrap();

    let response = patch_json(app.clone(), &format!("/api/v1/movies/{id}"), json!({"year": 2017})).await;
    assert_eq!(response.status(), StatusCode::OK);

    let updated = body_json(response).await["data"].clone();
    assert_eq!(updated["year"], 2017);
    assert_eq!(updated["version"], 2);
    assert_eq!(updated["title"], created["title"]);
    assert_eq!(updated["runtime"], created["runtime"]);
    assert_eq!(updated["genres"], created["genres"]);

    let response = patch_json(
        app,
        &format!("/api/v1/movies/{id}"),
        json!({"genres": ["sci-fi"], "runtime": null}),
    )
    .await;
    let updated = body_json(response).await["data"].clone();
    assert_eq!(updated["genres"], json!(["sci-fi"]));
    assert_eq!(updated["runtime"], "116 mins");
    assert_eq!(updated["version"], 3);
}

#[tokio::test]
async fn invalid_update_writes_nothing() {
    let app = common::build_test_app();
    let created = create_movie(app.clone(), arrival()).await;
    let id = created["id"].as_i64().unwrap();
    let uri = format!("/api/v1/movies/{id}");

    let response = patch_json(app.clone(), &uri, json!({"title": ""})).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["error"]["title"], "must be provided");

    let response = patch_json(app.clone(), &uri, json!({"rating": 5})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(app, &uri).await;
    assert_eq!(body_json(response).await["data"], created);
}

#[tokio::test]
async fn update_checks_id_before_body() {
    let app = common::build_test_app();

    let response = send_raw(app.clone(), Method::PATCH, "/api/v1/movies/42", "not json").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = patch_json(app, "/api/v1/movies/abc", json!({"year": 2017})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "invalid id parameter");
}

#[tokio::test]
async fn update_rejects_array_body_and_writes_nothing() {
    let app = common::build_test_app();
    let created = create_movie(app.clone(), arrival()).await;
    let uri = format!("/api/v1/movies/{}", created["id"]);

    let response = send_raw(app.clone(), Method::PATCH, &uri, "[null, 2017, null, null]").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "body contains incorrect JSON type (at character 1)"
    );

    let response = get(app, &uri).await;
    assert_eq!(body_json(response).await["data"], created);
}

/// Store that lets a rival writer bump the version between the handler's
/// load and its conditional write.
struct RacingStore {
    inner: InMemoryMovieStore,
}

#[async_trait]
impl MovieStore for RacingStore {
    async fn get(&self, id: DbId) -> Result<Movie, StoreError> {
        self.inner.get(id).await
    }

    async fn create(&self, movie: &mut Movie) -> Result<(), StoreError> {
        self.inner.create(movie).await
    }

    async fn update(&self, movie: &mut Movie) -> Result<(), StoreError> {
        let mut rival = self.inner.get(movie.id).await?;
        rival.title = "Story of Your Life".into();
        self.inner.update(&mut rival).await?;

        self.inner.update(movie).await
    }

    async fn delete(&self, id: DbId) -> Result<(), StoreError> {
        self.inner.delete(id).await
    }

    async fn get_all(&self, query: &MovieQuery) -> Result<(Vec<Movie>, Metadata), StoreError> {
        self.inner.get_all(query).await
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.inner.health_check().await
    }
}

#[tokio::test]
async fn concurrent_update_returns_409_and_keeps_the_winner() {
    let app = common::build_test_app_with_store(Arc::new(RacingStore {
        inner: InMemoryMovieStore::new(),
    }));
    let created = create_movie(app.clone(), arrival()).await;
    let id = created["id"].as_i64().unwrap();
    let uri = format!("/api/v1/movies/{id}");

    let response = patch_json(app.clone(), &uri, json!({"year": 2017})).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "EDIT_CONFLICT");

    let stored = body_json(get(app, &uri).await).await["data"].clone();
    assert_eq!(stored["title"], "Story of Your Life");
    assert_eq!(stored["year"], 2016);
    assert_eq!(stored["version"], 2);
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_returns_204_then_404() {
    let app = common::build_test_app();
    let created = create_movie(app.clone(), arrival()).await;
    let uri = format!("/api/v1/movies/{}", created["id"]);

    let response = delete(app.clone(), &uri).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = delete(app.clone(), &uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(app, &uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_with_malformed_id_returns_400() {
    let app = common::build_test_app();
    let response = delete(app, "/api/v1/movies/0").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

async fn seed(app: &axum::Router) {
    for body in [
        json!({"title": "The Breakfast Club", "year": 1985, "runtime": "97 mins", "genres": ["comedy", "drama"]}),
        json!({"title": "Black Panther", "year": 2018, "runtime": "134 mins", "genres": ["action", "adventure"]}),
        json!({"title": "Moana", "year": 2016, "runtime": "107 mins", "genres": ["animation", "adventure"]}),
    ] {
        create_movie(app.clone(), body).await;
    }
}

#[tokio::test]
async fn list_filters_sorts_and_paginates() {
    let app = common::build_test_app();
    seed(&app).await;

    let response = get(app.clone(), "/api/v1/movies?genres=adventure&sort=-year&page_size=1").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["title"], "Black Panther");
    assert_eq!(
        json["metadata"],
        json!({
            "current_page": 1,
            "page_size": 1,
            "first_page": 1,
            "last_page": 2,
            "total_records": 2
        })
    );

    let json = body_json(get(app, "/api/v1/movies?title=breakfast%20club").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["year"], 1985);
}

#[tokio::test]
async fn list_with_no_matches_has_zero_metadata() {
    let app = common::build_test_app();
    let json = body_json(get(app, "/api/v1/movies").await).await;

    assert_eq!(json["data"], json!([]));
    assert_eq!(json["metadata"]["total_records"], 0);
    assert_eq!(json["metadata"]["last_page"], 0);
}

#[tokio::test]
async fn list_ignores_malformed_integers() {
    let app = common::build_test_app();
    seed(&app).await;

    let json = body_json(get(app, "/api/v1/movies?page=two&page_size=lots").await).await;
    assert_eq!(json["metadata"]["current_page"], 1);
    assert_eq!(json["metadata"]["page_size"], 20);
    assert_eq!(json["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn list_rejects_out_of_range_paging_and_unsafe_sort() {
    let app = common::build_test_app();

    let response = get(app, "/api/v1/movies?page=0&page_size=101&sort=created_at").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = body_json(response).await;
    assert_eq!(
        json["error"],
        json!({
            "page": "must be greater than zero",
            "page_size": "must be a maximum of 100",
            "sort": "invalid sort value"
        })
    );
}

// ---------------------------------------------------------------------------
// End-to-end
// ---------------------------------------------------------------------------

#[tokio::test]
async fn arrival_lifecycle() {
    let store = Arc::new(InMemoryMovieStore::new());
    let app = common::build_test_app_with_store(store.clone());

    let created = create_movie(app.clone(), arrival()).await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["version"], 1);

    let stale = store.get(id).await.unwrap();

    let response = patch_json(app.clone(), &format!("/api/v1/movies/{id}"), json!({"year": 2017})).await;
    let updated = body_json(response).await["data"].clone();
    assert_eq!(updated["version"], 2);
    assert_eq!(updated["year"], 2017);

    let mut replay = stale;
    replay.year = 2017;
    assert_matches!(store.update(&mut replay).await, Err(StoreError::EditConflict));
}
