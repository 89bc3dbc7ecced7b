//! Integration tests for colony-server API endpoints
//!
//! Each test runs the router against a fresh in-memory database.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use colony_common::config::WechatConfig;
use colony_common::db::{init_memory_database, laboratories};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::util::ServiceExt; // for `oneshot` method
use colony_server::{build_router, AppState};

async fn setup_app() -> (Router, SqlitePool) {
    let db = init_memory_database().await.expect("Should create database");
    let app = build_router(AppState::new(db.clone(), WechatConfig::default()));
    (app, db)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder().method(method).uri(uri).body(Body::empty()).unwrap()
}

async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, extract_json(response.into_body()).await)
}

async fn create_lab(db: &SqlitePool) -> String {
    laboratories::create_laboratory(db, "Lab", None)
        .await
        .unwrap()
        .id
        .to_string()
}

async fn create_strain(app: &Router, lab_id: &str, name: &str) -> String {
    let (status, body) = send(
        app,
        json_request("POST", "/api/strains", json!({"name": name, "laboratoryId": lab_id})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

async fn create_cage(app: &Router, strain_id: &str, number: &str) -> String {
    let (status, body) = send(
        app,
        json_request("POST", &format!("/api/strains/{}/cages", strain_id), json!({"cageNumber": number})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _db) = setup_app().await;
    let (status, body) = send(&app, empty_request("GET", "/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "colony-server");
    assert!(body["version"].is_string());
}

// =============================================================================
// Auth
// =============================================================================

#[tokio::test]
async fn test_register_then_login() {
    let (app, _db) = setup_app().await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/auth/register",
            json!({"email": "a@lab.com", "password": "pw", "name": "张三"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["email"], "a@lab.com");
    assert_eq!(body["user"]["role"], "USER");
    assert!(body["user"].get("password").is_none());

    let (status, body) = send(
        &app,
        json_request("POST", "/api/auth/login", json!({"email": "a@lab.com", "password": "pw"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["name"], "张三");
    assert_eq!(body["user"]["laboratoryName"], "张三的实验室");
    assert!(body["user"]["laboratoryId"].is_string());
}

#[tokio::test]
async fn test_register_validation_and_conflict() {
    let (app, _db) = setup_app().await;

    let (status, _) = send(
        &app,
        json_request("POST", "/api/auth/register", json!({"email": "a@lab.com", "password": "pw"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let body = json!({"email": "a@lab.com", "password": "pw", "name": "A"});
    let (status, _) = send(&app, json_request("POST", "/api/auth/register", body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, json_request("POST", "/api/auth/register", body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_login_failures_are_unauthorized() {
    let (app, _db) = setup_app().await;
    send(
        &app,
        json_request("POST", "/api/auth/register", json!({"email": "a@lab.com", "password": "pw", "name": "A"})),
    )
    .await;

    let (status, _) = send(
        &app,
        json_request("POST", "/api/auth/login", json!({"email": "nobody@lab.com", "password": "pw"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        json_request("POST", "/api/auth/login", json!({"email": "a@lab.com", "password": "wrong"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_wechat_login_creates_user_once() {
    let (app, _db) = setup_app().await;

    let (status, first) = send(&app, json_request("POST", "/api/auth/wechat-login", json!({"openid": "o-123"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["user"]["name"], "微信用户");
    assert_eq!(first["user"]["role"], "USER");
    assert!(first["user"]["email"].is_null());

    let (_, second) = send(&app, json_request("POST", "/api/auth/wechat-login", json!({"openid": "o-123"}))).await;
    assert_eq!(first["user"]["id"], second["user"]["id"]);
}

#[tokio::test]
async fn test_wechat_login_requires_openid() {
    let (app, _db) = setup_app().await;

    let (status, _) = send(&app, json_request("POST", "/api/auth/wechat-login", json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Code without configured credentials cannot be exchanged
    let (status, _) = send(&app, json_request("POST", "/api/auth/wechat-login", json!({"code": "abc"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Strains
// =============================================================================

#[tokio::test]
async fn test_create_strain_requires_existing_lab() {
    let (app, _db) = setup_app().await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/strains",
            json!({"name": "NAT10", "laboratoryId": uuid::Uuid::new_v4().to_string()}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_strain_list_ordered_with_counts() {
    let (app, db) = setup_app().await;
    let lab_id = create_lab(&db).await;

    let zeta = create_strain(&app, &lab_id, "Zeta").await;
    create_strain(&app, &lab_id, "Alpha").await;
    create_cage(&app, &zeta, "Z1").await;
    create_cage(&app, &zeta, "Z2").await;

    let (status, body) = send(&app, empty_request("GET", "/api/strains")).await;
    assert_eq!(status, StatusCode::OK);

    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["name"], "Alpha");
    assert_eq!(list[0]["cageCount"], 0);
    assert_eq!(list[1]["name"], "Zeta");
    assert_eq!(list[1]["cageCount"], 2);
    assert_eq!(list[1]["laboratory"]["name"], "Lab");
}

#[tokio::test]
async fn test_duplicate_strain_name_conflicts() {
    let (app, db) = setup_app().await;
    let lab_id = create_lab(&db).await;
    create_strain(&app, &lab_id, "NAT10").await;

    let (status, _) = send(
        &app,
        json_request("POST", "/api/strains", json!({"name": "NAT10", "laboratoryId": lab_id})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_strain_detail_and_delete() {
    let (app, db) = setup_app().await;
    let lab_id = create_lab(&db).await;
    let strain_id = create_strain(&app, &lab_id, "NAT10").await;
    create_cage(&app, &strain_id, "B2").await;
    let a1 = create_cage(&app, &strain_id, "A1").await;

    let (status, mouse) = send(
        &app,
        json_request(
            "POST",
            &format!("/api/cages/{}/mice", a1),
            json!({"sex": "MALE", "quantity": 2, "genotype": "+/+", "dob": "2023-03-15"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(mouse["dob"], "2023-03-15");

    let (status, detail) = send(&app, empty_request("GET", &format!("/api/strains/{}", strain_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["cages"][0]["cageNumber"], "A1");
    assert_eq!(detail["cages"][1]["cageNumber"], "B2");
    assert_eq!(detail["cages"][0]["mice"][0]["quantity"], 2);
    assert_eq!(detail["laboratory"]["name"], "Lab");

    let (status, body) = send(&app, empty_request("DELETE", &format!("/api/strains/{}", strain_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, _) = send(&app, empty_request("GET", &format!("/api/strains/{}", strain_id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let mice: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM mice")
        .fetch_one(&db)
        .await
        .unwrap();
    assert_eq!(mice, 0);
}

#[tokio::test]
async fn test_unknown_ids_are_not_found() {
    let (app, _db) = setup_app().await;
    let missing = uuid::Uuid::new_v4();

    for request in [
        empty_request("GET", &format!("/api/strains/{}", missing)),
        empty_request("DELETE", &format!("/api/strains/{}", missing)),
        empty_request("DELETE", &format!("/api/cages/{}", missing)),
        empty_request("GET", "/api/strains/not-a-uuid"),
        json_request("POST", &format!("/api/cages/{}/mice", missing), json!({})),
        json_request("POST", &format!("/api/strains/{}/cages", missing), json!({"cageNumber": "A1"})),
    ] {
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

// =============================================================================
// Cages and mice
// =============================================================================

#[tokio::test]
async fn test_cage_validation_and_conflict() {
    let (app, db) = setup_app().await;
    let lab_id = create_lab(&db).await;
    let strain_id = create_strain(&app, &lab_id, "NAT10").await;
    let uri = format!("/api/strains/{}/cages", strain_id);

    let (status, _) = send(&app, json_request("POST", &uri, json!({"cageNumber": "  "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, cage) = send(
        &app,
        json_request("POST", &uri, json!({"cageNumber": "A1", "matingDate": "2024-01-02T09:00:00+08:00"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(cage["matingDate"], "2024-01-02");
    assert_eq!(cage["mice"], json!([]));

    let (status, _) = send(&app, json_request("POST", &uri, json!({"cageNumber": "A1"}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_mouse_defaults_and_validation() {
    let (app, db) = setup_app().await;
    let lab_id = create_lab(&db).await;
    let strain_id = create_strain(&app, &lab_id, "NAT10").await;
    let cage_id = create_cage(&app, &strain_id, "A1").await;
    let uri = format!("/api/cages/{}/mice", cage_id);

    let (status, mouse) = send(&app, json_request("POST", &uri, json!({"genotype": ""}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(mouse["sex"], "UNKNOWN");
    assert_eq!(mouse["quantity"], 1);
    assert!(mouse["genotype"].is_null());

    let (status, _) = send(&app, json_request("POST", &uri, json!({"quantity": 0}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, json_request("POST", &uri, json!({"dob": "yesterday"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_cage_cascades_mice() {
    let (app, db) = setup_app().await;
    let lab_id = create_lab(&db).await;
    let strain_id = create_strain(&app, &lab_id, "NAT10").await;
    let cage_id = create_cage(&app, &strain_id, "A1").await;
    send(&app, json_request("POST", &format!("/api/cages/{}/mice", cage_id), json!({}))).await;

    let (status, body) = send(&app, empty_request("DELETE", &format!("/api/cages/{}", cage_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let mice: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM mice")
        .fetch_one(&db)
        .await
        .unwrap();
    assert_eq!(mice, 0);
}
