//! End-to-end tests: the router is served on an ephemeral port over a throwaway SQLite
//! file and driven with `reqwest`.

use book_tracker::{transport, BookService, SqliteBookStore};
use serde_json::{json, Value};
use std::sync::Arc;

struct TestApp {
    base_url: String,
    client: reqwest::Client,
    // Keeps the database file alive for the duration of the test.
    _dir: tempfile::TempDir,
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn create(&self, body: Value) -> Result<(u16, Value), Box<dyn std::error::Error>> {
        let resp = self.client.post(self.url("/books")).json(&body).send().await?;
        let status = resp.status().as_u16();
        Ok((status, resp.json().await?))
    }

    async fn post_empty(&self, path: &str) -> Result<(u16, Value), Box<dyn std::error::Error>> {
        let resp = self.client.post(self.url(path)).send().await?;
        let status = resp.status().as_u16();
        Ok((status, resp.json().await?))
    }

    async fn get(&self, path: &str) -> Result<(u16, Value), Box<dyn std::error::Error>> {
        let resp = self.client.get(self.url(path)).send().await?;
        let status = resp.status().as_u16();
        Ok((status, resp.json().await?))
    }
}

async fn spawn_app() -> Result<TestApp, Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let db_path = dir.path().join("books.db");
    let store = SqliteBookStore::connect(&db_path.to_string_lossy(), 2).await?;
    let state = transport::http::AppState::new(BookService::new(Arc::new(store)));
    let router = transport::http::create_router(state).layer(transport::http::cors_layer());

    // Bind to an ephemeral port so parallel tests never collide.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    Ok(TestApp {
        base_url: format!("http://127.0.0.1:{}{}", port, transport::http::API_PREFIX),
        client: reqwest::Client::new(),
        _dir: dir,
    })
}

fn book_body(title: &str, author: &str) -> Value {
    json!({ "title": title, "author": author, "purchase_date": "2024-01-15T00:00:00Z" })
}

#[tokio::test]
async fn test_reading_lifecycle_scenario() -> Result<(), Box<dyn std::error::Error>> {
    let app = spawn_app().await?;

    let (status, created) = app.create(book_body("A", "B")).await?;
    assert_eq!(status, 201);
    assert_eq!(created["data"]["status"], "not_started");
    assert!(created["data"]["start_read_date"].is_null());
    assert!(created["data"]["end_read_date"].is_null());
    let id = created["data"]["id"].as_i64().expect("id");

    let (status, started) = app.post_empty(&format!("/books/{id}/start-reading")).await?;
    assert_eq!(status, 200);
    assert_eq!(started["data"]["status"], "reading");
    assert!(started["data"]["start_read_date"].is_string());

    let resp = app
        .client
        .post(app.url(&format!("/books/{id}/finish-reading")))
        .json(&json!({ "rating": 5 }))
        .send()
        .await?;
    assert_eq!(resp.status().as_u16(), 200);
    let finished: Value = resp.json().await?;
    assert_eq!(finished["data"]["status"], "completed");
    assert_eq!(finished["data"]["rating"], 5);
    assert!(finished["data"]["end_read_date"].is_string());

    let (status, stats) = app.get("/statistics").await?;
    assert_eq!(status, 200);
    assert!(stats["data"]["completed_books"].as_i64().unwrap_or(0) >= 1);
    assert_eq!(stats["data"]["average_rating"].as_f64(), Some(5.0));
    assert_eq!(stats["data"]["total_books"], 1);
    assert_eq!(stats["data"]["completed_this_month"], 1);
    // Purchased in January 2024.
    assert_eq!(stats["data"]["books_this_month"], 0);
    Ok(())
}

#[tokio::test]
async fn test_future_purchase_date_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let app = spawn_app().await?;
    let future = (chrono::Utc::now() + chrono::Duration::days(30)).to_rfc3339();

    let (status, body) = app
        .create(json!({ "title": "A", "author": "B", "purchase_date": future }))
        .await?;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "failed to create book");
    assert!(body["message"].as_str().unwrap_or("").contains("future"));

    let (_, list) = app.get("/books").await?;
    assert_eq!(list["data"]["total"], 0);
    Ok(())
}

#[tokio::test]
async fn test_missing_fields_and_malformed_json() -> Result<(), Box<dyn std::error::Error>> {
    let app = spawn_app().await?;

    let (status, body) = app.create(json!({ "title": "only a title" })).await?;
    assert_eq!(status, 400);
    assert!(body["message"].as_str().unwrap_or("").contains("validation"));

    let resp = app
        .client
        .post(app.url("/books"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = resp.json().await?;
    assert_eq!(body["error"], "failed to create book");
    assert!(body["message"].as_str().unwrap_or("").contains("malformed"));
    Ok(())
}

#[tokio::test]
async fn test_unknown_and_invalid_ids() -> Result<(), Box<dyn std::error::Error>> {
    let app = spawn_app().await?;

    let (status, body) = app.get("/books/999999").await?;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "failed to get book");

    let (status, _) = app.get("/books/abc").await?;
    assert_eq!(status, 400);

    let (status, _) = app.get("/books/0").await?;
    assert_eq!(status, 400);

    let resp = app.client.delete(app.url("/books/999999")).send().await?;
    assert_eq!(resp.status().as_u16(), 404);
    Ok(())
}

#[tokio::test]
async fn test_list_filters_and_pagination() -> Result<(), Box<dyn std::error::Error>> {
    let app = spawn_app().await?;

    for i in 0..5 {
        let mut body = book_body(&format!("Rust Book {i}"), "Steve Klabnik");
        body["tags"] = json!("rust,programming");
        app.create(body).await?;
    }
    for i in 0..3 {
        let mut body = book_body(&format!("Dune {i}"), "Frank Herbert");
        body["publisher"] = json!("Chilton");
        app.create(body).await?;
    }

    let (status, page) = app.get("/books?limit=3&page=2").await?;
    assert_eq!(status, 200);
    assert_eq!(page["data"]["total"], 8);
    assert_eq!(page["data"]["page"], 2);
    assert_eq!(page["data"]["limit"], 3);
    assert_eq!(page["data"]["total_pages"], 3);
    assert_eq!(page["data"]["books"].as_array().map(Vec::len), Some(3));

    let (_, by_tag) = app.get("/books?tag=RUST").await?;
    assert_eq!(by_tag["data"]["total"], 5);

    let (_, by_publisher) = app.get("/books?publisher=Chilton&search=dune").await?;
    assert_eq!(by_publisher["data"]["total"], 3);

    let (_, by_author) = app.get("/books?author=Frank%20Herbert&limit=500").await?;
    // Out-of-range limit falls back to the default page size.
    assert_eq!(by_author["data"]["limit"], 20);
    assert_eq!(by_author["data"]["books"].as_array().map(Vec::len), Some(3));

    let (_, ignored) = app.get("/books?rating=banana&page=x").await?;
    assert_eq!(ignored["data"]["total"], 8);
    assert_eq!(ignored["data"]["page"], 1);

    let (status, bad) = app.get("/books?status=finished").await?;
    assert_eq!(status, 400);
    assert_eq!(bad["error"], "failed to list books");
    Ok(())
}

#[tokio::test]
async fn test_list_is_newest_first() -> Result<(), Box<dyn std::error::Error>> {
    let app = spawn_app().await?;
    let mut ids = Vec::new();
    for title in ["first", "second", "third"] {
        let (_, created) = app.create(book_body(title, "X")).await?;
        ids.push(created["data"]["id"].as_i64().expect("id"));
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let (_, list) = app.get("/books").await?;
    let listed: Vec<i64> = list["data"]["books"]
        .as_array()
        .expect("books")
        .iter()
        .filter_map(|b| b["id"].as_i64())
        .collect();
    ids.reverse();
    assert_eq!(listed, ids);
    Ok(())
}

#[tokio::test]
async fn test_transition_guards() -> Result<(), Box<dyn std::error::Error>> {
    let app = spawn_app().await?;
    let (_, created) = app.create(book_body("Guarded", "Author")).await?;
    let id = created["data"]["id"].as_i64().expect("id");

    // Not reading yet.
    let (status, body) = app.post_empty(&format!("/books/{id}/finish-reading")).await?;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "failed to finish reading");

    let (status, _) = app.post_empty(&format!("/books/{id}/start-reading")).await?;
    assert_eq!(status, 200);
    let (status, again) = app.post_empty(&format!("/books/{id}/start-reading")).await?;
    assert_eq!(status, 400);
    assert!(again["message"].as_str().unwrap_or("").contains("already"));

    let resp = app
        .client
        .post(app.url(&format!("/books/{id}/finish-reading")))
        .json(&json!({ "rating": 6 }))
        .send()
        .await?;
    assert_eq!(resp.status().as_u16(), 400);

    // Empty body: finish without a rating.
    let (status, finished) = app.post_empty(&format!("/books/{id}/finish-reading")).await?;
    assert_eq!(status, 200);
    assert_eq!(finished["data"]["status"], "completed");
    assert!(finished["data"]["rating"].is_null());

    let (status, _) = app.post_empty(&format!("/books/{id}/start-reading")).await?;
    assert_eq!(status, 400);
    Ok(())
}

#[tokio::test]
async fn test_update_bypasses_transition_guards() -> Result<(), Box<dyn std::error::Error>> {
    let app = spawn_app().await?;
    let (_, created) = app.create(book_body("Bypass", "Author")).await?;
    let id = created["data"]["id"].as_i64().expect("id");

    let resp = app
        .client
        .put(app.url(&format!("/books/{id}")))
        .json(&json!({ "status": "completed", "rating": 4 }))
        .send()
        .await?;
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = resp.json().await?;
    assert_eq!(body["message"], "book updated");
    assert_eq!(body["data"]["status"], "completed");
    assert!(body["data"]["end_read_date"].is_string());

    // start-reading refuses a completed book, a direct update does not.
    let resp = app
        .client
        .put(app.url(&format!("/books/{id}")))
        .json(&json!({ "status": "reading" }))
        .send()
        .await?;
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = resp.json().await?;
    assert_eq!(body["data"]["status"], "reading");
    assert!(body["data"]["start_read_date"].is_string());
    Ok(())
}

#[tokio::test]
async fn test_update_rejects_bad_rating_and_keeps_state() -> Result<(), Box<dyn std::error::Error>> {
    let app = spawn_app().await?;
    let (_, created) = app.create(book_body("Rated", "Author")).await?;
    let id = created["data"]["id"].as_i64().expect("id");

    for bad in [0, 6, -1] {
        let resp = app
            .client
            .put(app.url(&format!("/books/{id}")))
            .json(&json!({ "rating": bad, "title": "changed" }))
            .send()
            .await?;
        assert_eq!(resp.status().as_u16(), 400);
    }

    let (_, book) = app.get(&format!("/books/{id}")).await?;
    assert!(book["data"]["rating"].is_null());
    assert_eq!(book["data"]["title"], "Rated");

    let resp = app
        .client
        .put(app.url(&format!("/books/{id}")))
        .body("[1,2")
        .header("content-type", "application/json")
        .send()
        .await?;
    assert_eq!(resp.status().as_u16(), 400);
    Ok(())
}

#[tokio::test]
async fn test_delete_is_permanent() -> Result<(), Box<dyn std::error::Error>> {
    let app = spawn_app().await?;
    let (_, created) = app.create(book_body("Gone", "Author")).await?;
    let id = created["data"]["id"].as_i64().expect("id");

    let resp = app.client.delete(app.url(&format!("/books/{id}"))).send().await?;
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = resp.json().await?;
    assert_eq!(body["message"], "book deleted");
    assert!(body.get("data").is_none());

    let (status, _) = app.get(&format!("/books/{id}")).await?;
    assert_eq!(status, 404);
    let resp = app.client.delete(app.url(&format!("/books/{id}"))).send().await?;
    assert_eq!(resp.status().as_u16(), 404);
    Ok(())
}

#[tokio::test]
async fn test_health() -> Result<(), Box<dyn std::error::Error>> {
    let app = spawn_app().await?;
    let (status, body) = app.get("/health").await?;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["status"], "healthy");
    assert_eq!(body["data"]["service"], "book-tracker");
    Ok(())
}

#[tokio::test]
async fn test_undecodable_query_uses_error_envelope() -> Result<(), Box<dyn std::error::Error>> {
    let app = spawn_app().await?;

    for query in ["page=1&page=2", "status=reading&status=completed"] {
        let resp = app.client.get(app.url(&format!("/books?{query}"))).send().await?;
        assert_eq!(resp.status().as_u16(), 400, "query {query}");
        let content_type = resp
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(content_type.starts_with("application/json"), "query {query}: {content_type}");
        let body: Value = resp.json().await?;
        assert_eq!(body["error"], "failed to list books");
        assert!(body["message"].as_str().unwrap_or("").contains("malformed"));
    }
    Ok(())
}

#[tokio::test]
async fn test_null_optional_fields_are_defaulted() -> Result<(), Box<dyn std::error::Error>> {
    let app = spawn_app().await?;

    let (status, created) = app
        .create(json!({
            "title": "A",
            "author": "B",
            "purchase_date": "2024-01-15T00:00:00Z",
            "purchase_price": null,
            "isbn": null,
            "tags": null
        }))
        .await?;
    assert_eq!(status, 201);
    assert_eq!(created["data"]["purchase_price"], 0);
    assert_eq!(created["data"]["isbn"], "");
    assert_eq!(created["data"]["tags"], "");

    // A null required field is still missing.
    let (status, body) = app
        .create(json!({ "title": null, "author": "B", "purchase_date": "2024-01-15T00:00:00Z" }))
        .await?;
    assert_eq!(status, 400);
    assert!(body["message"].as_str().unwrap_or("").contains("title"));
    Ok(())
}

#[tokio::test]
async fn test_cors_preflight_lists_served_methods() -> Result<(), Box<dyn std::error::Error>> {
    let app = spawn_app().await?;

    let resp = app
        .client
        .request(reqwest::Method::OPTIONS, app.url("/books"))
        .header("origin", "http://localhost:3000")
        .header("access-control-request-method", "PUT")
        .send()
        .await?;
    assert!(resp.status().is_success());

    let headers = resp.headers();
    assert_eq!(
        headers.get("access-control-allow-origin").and_then(|v| v.to_str().ok()),
        Some("*")
    );
    let methods = headers
        .get("access-control-allow-methods")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    for method in ["GET", "POST", "PUT", "DELETE", "OPTIONS"] {
        assert!(methods.contains(method), "missing {method} in {methods}");
    }
    assert!(!methods.contains("PATCH"), "unexpected PATCH in {methods}");
    Ok(())
}
