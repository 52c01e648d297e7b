//! End-to-end tests for the user API.
//!
//! Each test boots the full router on an OS-assigned port against a fresh
//! in-memory store and drives it over HTTP:
//! - create/get round-trips
//! - 404 envelopes naming the requested id
//! - duplicate email handling (exactly one winner)
//! - batch create all-or-nothing visibility
//! - validation of bodies, ids, and batch shapes

use roster::db::UserStore;
use roster::http::{HttpServer, HttpServerConfig};
use serde_json::{json, Value};

/// Spin up the HTTP server on an OS-assigned port, returning the base URL.
async fn spawn_test_server() -> String {
    let store = UserStore::open_in_memory().unwrap();
    let app = HttpServer::new(HttpServerConfig::default(), store).router();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://127.0.0.1:{}", port)
}

async fn create_user(client: &reqwest::Client, base: &str, name: &str, email: &str) -> Value {
    let resp = client
        .post(format!("{}/users", base))
        .json(&json!({"name": name, "email": email}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    resp.json().await.unwrap()
}

async fn list_users(client: &reqwest::Client, base: &str) -> Value {
    let resp = client
        .get(format!("{}/users", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    resp.json().await.unwrap()
}

// ==================
// Create + Get
// ==================

#[tokio::test]
async fn create_then_get_round_trip() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();

    let created = create_user(&client, &base, "Ana", "ana@x.com").await;
    assert_eq!(created["success"], true);
    let id = created["data"]["id"].as_i64().unwrap();
    assert!(id > 0);
    assert_eq!(created["data"]["email"], "ana@x.com");

    let resp = client
        .get(format!("{}/users/{}", base, id))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["id"], id);
    assert_eq!(body["data"]["name"], "Ana");
    assert_eq!(body["data"]["email"], "ana@x.com");
}

#[tokio::test]
async fn get_missing_user_is_not_found() {
    let base = spawn_test_server().await;
    let resp = reqwest::get(format!("{}/users/9999", base)).await.unwrap();
    assert_eq!(resp.status(), 404);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("9999"));
}

#[tokio::test]
async fn non_numeric_id_is_rejected() {
    let base = spawn_test_server().await;
    let resp = reqwest::get(format!("{}/users/abc", base)).await.unwrap();
    assert_eq!(resp.status(), 400);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
}

// ==================
// Validation
// ==================

#[tokio::test]
async fn create_with_missing_field_is_rejected() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/users", base))
        .json(&json!({"name": "Ana"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Validation failed");
}

#[tokio::test]
async fn create_with_empty_field_is_rejected() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/users", base))
        .json(&json!({"name": "", "email": "ana@x.com"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    // Nothing reached storage.
    let listing = list_users(&client, &base).await;
    assert_eq!(listing["count"], 0);
}

#[tokio::test]
async fn malformed_json_body_is_rejected() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/users", base))
        .header("content-type", "application/json")
        .body("{ definitely not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
}

// ==================
// Uniqueness
// ==================

#[tokio::test]
async fn duplicate_email_returns_conflict() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();

    create_user(&client, &base, "Ana", "ana@x.com").await;

    let resp = client
        .post(format!("{}/users", base))
        .json(&json!({"name": "Impostor", "email": "ana@x.com"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Email already exists");
    assert!(body["message"].as_str().unwrap().contains("ana@x.com"));

    // Exactly one row with that email persists.
    let listing = list_users(&client, &base).await;
    assert_eq!(listing["count"], 1);
    assert_eq!(listing["data"][0]["name"], "Ana");
}

#[tokio::test]
async fn update_to_taken_email_returns_conflict() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();

    create_user(&client, &base, "Ana", "ana@x.com").await;
    let bob = create_user(&client, &base, "Bob", "bob@x.com").await;
    let bob_id = bob["data"]["id"].as_i64().unwrap();

    let resp = client
        .put(format!("{}/users/{}", base, bob_id))
        .json(&json!({"name": "Bob", "email": "ana@x.com"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);
}

// ==================
// Update
// ==================

#[tokio::test]
async fn update_changes_fields_but_never_id() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();

    let created = create_user(&client, &base, "Ana", "ana@x.com").await;
    let id = created["data"]["id"].as_i64().unwrap();

    let resp = client
        .put(format!("{}/users/{}", base, id))
        .json(&json!({"name": "Ana B", "email": "anab@x.com"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["id"], id);
    assert_eq!(body["data"]["name"], "Ana B");

    let fetched: Value = reqwest::get(format!("{}/users/{}", base, id))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["data"]["id"], id);
    assert_eq!(fetched["data"]["email"], "anab@x.com");
}

#[tokio::test]
async fn update_missing_user_is_not_found_and_changes_nothing() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .put(format!("{}/users/1234", base))
        .json(&json!({"name": "Ghost", "email": "ghost@x.com"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let body: Value = resp.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().contains("1234"));

    let listing = list_users(&client, &base).await;
    assert_eq!(listing["count"], 0);
}

// ==================
// Delete
// ==================

#[tokio::test]
async fn delete_removes_exactly_the_targeted_row() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();

    let ana = create_user(&client, &base, "Ana", "ana@x.com").await;
    create_user(&client, &base, "Bob", "bob@x.com").await;
    let ana_id = ana["data"]["id"].as_i64().unwrap();

    let listing = list_users(&client, &base).await;
    assert_eq!(listing["count"], 2);

    let resp = client
        .delete(format!("{}/users/{}", base, ana_id))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["id"], ana_id);
    assert_eq!(body["data"]["deletedRows"], 1);

    let listing = list_users(&client, &base).await;
    assert_eq!(listing["count"], 1);
    assert_eq!(listing["data"][0]["name"], "Bob");

    let resp = reqwest::get(format!("{}/users/{}", base, ana_id))
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn delete_missing_user_is_not_found() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .delete(format!("{}/users/42", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let body: Value = resp.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().contains("42"));
}

// ==================
// Batch create
// ==================

#[tokio::test]
async fn batch_create_returns_rows_in_input_order() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/users/multiple", base))
        .json(&json!([
            {"name": "Ana", "email": "ana@x.com"},
            {"name": "Bob", "email": "bob@x.com"}
        ]))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["email"], "ana@x.com");
    assert_eq!(data[1]["email"], "bob@x.com");
    assert!(data[0]["id"].as_i64().unwrap() < data[1]["id"].as_i64().unwrap());

    let listing = list_users(&client, &base).await;
    assert_eq!(listing["count"], 2);
}

#[tokio::test]
async fn batch_create_is_all_or_nothing() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();

    create_user(&client, &base, "Seed", "seed@x.com").await;

    // Second element collides with the seeded row; the valid first
    // element must not survive either.
    let resp = client
        .post(format!("{}/users/multiple", base))
        .json(&json!([
            {"name": "Fresh", "email": "fresh@x.com"},
            {"name": "Dup", "email": "seed@x.com"}
        ]))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Database error");

    let listing = list_users(&client, &base).await;
    assert_eq!(listing["count"], 1);
    assert_eq!(listing["data"][0]["email"], "seed@x.com");
}

#[tokio::test]
async fn batch_create_rejects_empty_array() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/users/multiple", base))
        .json(&json!([]))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn batch_create_rejects_empty_fields_before_storage() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/users/multiple", base))
        .json(&json!([
            {"name": "Ok", "email": "ok@x.com"},
            {"name": "", "email": "empty@x.com"}
        ]))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let listing = list_users(&client, &base).await;
    assert_eq!(listing["count"], 0);
}

// ==================
// Listing
// ==================

#[tokio::test]
async fn list_agrees_with_get_for_every_row() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();

    create_user(&client, &base, "Ana", "ana@x.com").await;
    create_user(&client, &base, "Bob", "bob@x.com").await;
    create_user(&client, &base, "Cid", "cid@x.com").await;

    let listing = list_users(&client, &base).await;
    assert_eq!(listing["count"], 3);

    for user in listing["data"].as_array().unwrap() {
        let id = user["id"].as_i64().unwrap();
        let fetched: Value = reqwest::get(format!("{}/users/{}", base, id))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(&fetched["data"], user);
    }
}

// ==================
// Health
// ==================

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let base = spawn_test_server().await;
    let resp = reqwest::get(format!("{}/health", base)).await.unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}
