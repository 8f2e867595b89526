//! CRUD service tests over a real socket.

use axum::http::StatusCode;
use employee_gateway::config::Config;
use serde_json::{json, Value};

mod common;

fn ada() -> Value {
    json!({
        "firstName": "Ada",
        "lastName": "Lovelace",
        "email": "ada@example.com",
        "password": "s3cret",
        "role": "engineer",
    })
}

#[tokio::test]
async fn create_get_update_delete_flow() {
    let (addr, shutdown) = common::start_service(Config::default()).await;
    let client = common::client();
    let base = format!("http://{}/employees", addr);

    let res = client.post(&base).json(&ada()).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Employee created successfully");
    let id = body["id"].as_i64().unwrap();
    assert_eq!(id, 1);

    let res = client.get(format!("{}/{}", base, id)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let fetched: Value = res.json().await.unwrap();
    assert_eq!(fetched["firstName"], "Ada");
    assert_eq!(fetched["id"], id);
    assert!(fetched.get("password").is_none());

    let mut changed = ada();
    changed["role"] = json!("manager");
    changed["id"] = json!(999);
    let res = client
        .put(format!("{}/{}", base, id))
        .json(&changed)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = res.json().await.unwrap();
    assert_eq!(updated["role"], "manager");
    assert_eq!(updated["id"], id);

    let res = client.delete(format!("{}/{}", base, id)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Employee deleted successfully");

    let res = client.get(format!("{}/{}", base, id)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Employee not found");

    shutdown.trigger();
}

#[tokio::test]
async fn list_returns_every_employee() {
    let (addr, shutdown) = common::start_service(Config::default()).await;
    let client = common::client();
    let base = format!("http://{}/employees", addr);

    let empty: Vec<Value> = client.get(&base).send().await.unwrap().json().await.unwrap();
    assert!(empty.is_empty());

    for _ in 0..3 {
        let res = client.post(&base).json(&ada()).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let all: Vec<Value> = client.get(&base).send().await.unwrap().json().await.unwrap();
    let ids: Vec<_> = all.iter().map(|e| e["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, [1, 2, 3]);

    shutdown.trigger();
}

#[tokio::test]
async fn malformed_ids_and_missing_records() {
    let (addr, shutdown) = common::start_service(Config::default()).await;
    let client = common::client();
    let base = format!("http://{}/employees", addr);

    let res = client.get(format!("{}/abc", base)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Invalid employee ID");

    let res = client
        .put(format!("{}/7", base))
        .json(&ada())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client.delete(format!("{}/7", base)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    shutdown.trigger();
}

#[tokio::test]
async fn invalid_payloads_are_rejected() {
    let (addr, shutdown) = common::start_service(Config::default()).await;
    let client = common::client();
    let base = format!("http://{}/employees", addr);

    let res = client
        .post(&base)
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Invalid request payload");

    let mut no_email = ada();
    no_email["email"] = json!("");
    let res = client.post(&base).json(&no_email).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("email"));

    let all: Vec<Value> = client.get(&base).send().await.unwrap().json().await.unwrap();
    assert!(all.is_empty());

    shutdown.trigger();
}

#[tokio::test]
async fn search_by_field() {
    let (addr, shutdown) = common::start_service(Config::default()).await;
    let client = common::client();
    let base = format!("http://{}/employees", addr);

    client.post(&base).json(&ada()).send().await.unwrap();
    let mut grace = ada();
    grace["firstName"] = json!("Grace");
    grace["role"] = json!("admiral");
    client.post(&base).json(&grace).send().await.unwrap();

    let found: Vec<Value> = client
        .get(format!("{}/search/role/admiral", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["firstName"], "Grace");

    let none: Vec<Value> = client
        .get(format!("{}/search/firstName/Nobody", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(none.is_empty());

    let res = client
        .get(format!("{}/search/salary/10", base))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    shutdown.trigger();
}

#[tokio::test]
async fn health_reports_version() {
    let (addr, shutdown) = common::start_service(Config::default()).await;

    let res = common::client()
        .get(format!("http://{}/health", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));

    shutdown.trigger();
}

#[tokio::test]
async fn serves_openapi_document() {
    let (addr, shutdown) = common::start_service(Config::default()).await;

    let doc: Value = common::client()
        .get(format!("http://{}/swagger/doc.json", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(doc["info"]["title"], "Employee service");
    assert!(doc["paths"]["/employees/{id}"]["delete"].is_object());
    assert!(doc["components"]["schemas"]["Employee"].is_object());

    shutdown.trigger();
}
