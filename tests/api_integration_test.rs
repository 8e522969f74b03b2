use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
    response::Response,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use serde_json::{Value, json};
use tower::util::ServiceExt; // for `oneshot`

use vertragscontrolling::config::Config;
use vertragscontrolling::db;
use vertragscontrolling::domain::CreateContractInput;
use vertragscontrolling::infrastructure::auth::{create_jwt, hash_password};
use vertragscontrolling::models::{Role, contract_type, user};
use vertragscontrolling::server::build_router;
use vertragscontrolling::services::contract_service::create_contract;
use vertragscontrolling::services::Actor;

const CRON_SECRET: &str = "test-cron-secret";

fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        port: 0,
        cors_allowed_origins: Vec::new(),
        cron_secret: Some(CRON_SECRET.to_string()),
        seed_demo: false,
    }
}

async fn setup() -> (DatabaseConnection, Router) {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    let app = build_router(db.clone(), &test_config());
    (db, app)
}

async fn create_user(db: &DatabaseConnection, email: &str, password: &str, role: Role) -> (Actor, String) {
    let now = Utc::now();
    let user = user::ActiveModel {
        email: Set(email.to_string()),
        name: Set(None),
        password_hash: Set(hash_password(password).unwrap()),
        role: Set(role.as_str().to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create user");

    let token = create_jwt(user.id, email, role).unwrap();
    (Actor::new(user.id, role), token)
}

async fn create_type(db: &DatabaseConnection) -> i32 {
    contract_type::ActiveModel {
        name: Set("Mietvertrag".to_string()),
        color: Set("#3b82f6".to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
    .id
}

async fn create_test_contract(db: &DatabaseConnection, owner: Actor, type_id: i32) -> i32 {
    let input: CreateContractInput = serde_json::from_value(json!({
        "contract_number": "VT-2025-0001",
        "title": "Büroräume",
        "partner": "Stadt Köln",
        "type_id": type_id,
        "start_date": "2025-01-01",
        "checklist_items": []
    }))
    .unwrap();
    create_contract(db, owner, input).await.unwrap().contract.id
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri).method(method);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health() {
    let (_db, app) = setup().await;

    let response = app.oneshot(request("GET", "/api/health", None, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "vertragscontrolling");
}

#[tokio::test]
async fn test_contracts_require_token() {
    let (_db, app) = setup().await;

    let response = app
        .oneshot(request("GET", "/api/contracts", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = json_body(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_login_flow() {
    let (db, app) = setup().await;
    create_user(&db, "admin@example.com", "demo123", Role::Admin).await;

    let ok = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": "Admin@Example.com", "password": "demo123" })),
        ))
        .await
        .unwrap();
    assert_eq!(ok.status(), StatusCode::OK);
    let body = json_body(ok).await;
    let token = body["data"]["token"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["user"]["role"], "ADMIN");

    let me = app
        .clone()
        .oneshot(request("GET", "/api/auth/me", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(me.status(), StatusCode::OK);
    assert_eq!(json_body(me).await["data"]["email"], "admin@example.com");

    let bad = app
        .oneshot(request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": "admin@example.com", "password": "falsch" })),
        ))
        .await
        .unwrap();
    assert_eq!(bad.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_projektleitung_sees_only_own_contracts() {
    let (db, app) = setup().await;
    let (owner, owner_token) =
        create_user(&db, "owner@example.org", "pw", Role::Projektleitung).await;
    let (_, other_token) = create_user(&db, "other@example.org", "pw", Role::Projektleitung).await;
    let (_, manager_token) = create_user(&db, "manager@example.org", "pw", Role::Manager).await;
    let type_id = create_type(&db).await;
    let id = create_test_contract(&db, owner, type_id).await;

    let uri = format!("/api/contracts/{}", id);
    let forbidden = app
        .clone()
        .oneshot(request("GET", &uri, Some(&other_token), None))
        .await
        .unwrap();
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let history_uri = format!("/api/contracts/{}/history", id);
    let forbidden_history = app
        .clone()
        .oneshot(request("GET", &history_uri, Some(&other_token), None))
        .await
        .unwrap();
    assert_eq!(forbidden_history.status(), StatusCode::FORBIDDEN);

    let own = app
        .clone()
        .oneshot(request("GET", &uri, Some(&owner_token), None))
        .await
        .unwrap();
    assert_eq!(own.status(), StatusCode::OK);

    let list = app
        .clone()
        .oneshot(request("GET", "/api/contracts", Some(&other_token), None))
        .await
        .unwrap();
    assert_eq!(json_body(list).await["data"].as_array().unwrap().len(), 0);

    let manager_list = app
        .clone()
        .oneshot(request("GET", "/api/contracts", Some(&manager_token), None))
        .await
        .unwrap();
    assert_eq!(json_body(manager_list).await["data"].as_array().unwrap().len(), 1);

    let missing = app
        .oneshot(request("GET", "/api/contracts/9999", Some(&owner_token), None))
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_then_read_history() {
    let (db, app) = setup().await;
    let (owner, token) = create_user(&db, "pl@example.org", "pw", Role::Projektleitung).await;
    let type_id = create_type(&db).await;
    let id = create_test_contract(&db, owner, type_id).await;

    let update = app
        .clone()
        .oneshot(request(
            "PUT",
            &format!("/api/contracts/{}", id),
            Some(&token),
            Some(json!({ "value": 1234.5, "auto_renewal": true })),
        ))
        .await
        .unwrap();
    assert_eq!(update.status(), StatusCode::OK);

    let response = app
        .oneshot(request(
            "GET",
            &format!("/api/contracts/{}/history", id),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let entries = body["data"].as_array().unwrap();
    assert_eq!(entries.len(), 2);

    // Tracked field order: value before auto_renewal
    assert_eq!(entries[0]["field_name"], "value");
    assert_eq!(entries[0]["change_type"], "CREATE");
    assert_eq!(entries[0]["display"]["old_value"], "(leer)");
    assert_eq!(entries[0]["display"]["new_value"], "1.234,50\u{a0}€");
    assert_eq!(entries[1]["field_name"], "auto_renewal");
    assert_eq!(entries[1]["display"]["old_value"], "Nein");
    assert_eq!(entries[1]["display"]["new_value"], "Ja");
    assert_eq!(entries[1]["changed_by"]["email"], "pl@example.org");
}

#[tokio::test]
async fn test_create_contract_validation_and_conflict() {
    let (db, app) = setup().await;
    let (_, token) = create_user(&db, "pl@example.org", "pw", Role::Projektleitung).await;
    let type_id = create_type(&db).await;

    let payload = json!({
        "contract_number": "VT-2025-0100",
        "title": "Leasing Kopierer",
        "partner": "Druck GmbH",
        "type_id": type_id,
        "start_date": "01.02.2025"
    });

    let created = app
        .clone()
        .oneshot(request("POST", "/api/contracts", Some(&token), Some(payload.clone())))
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);

    let duplicate = app
        .clone()
        .oneshot(request("POST", "/api/contracts", Some(&token), Some(payload)))
        .await
        .unwrap();
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);

    let invalid = app
        .oneshot(request(
            "POST",
            "/api/contracts",
            Some(&token),
            Some(json!({
                "contract_number": "VT-2025-0101",
                "title": "",
                "partner": "Druck GmbH",
                "type_id": type_id,
                "start_date": "2025-02-01"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cron_requires_secret() {
    let (_db, app) = setup().await;

    let wrong = app
        .clone()
        .oneshot(request("POST", "/api/cron/check-deadlines?secret=nope", None, None))
        .await
        .unwrap();
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

    let missing = app
        .clone()
        .oneshot(request("POST", "/api/cron/check-deadlines", None, None))
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    let ok = app
        .oneshot(request(
            "POST",
            &format!("/api/cron/check-deadlines?secret={}", CRON_SECRET),
            None,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(ok.status(), StatusCode::OK);
    assert_eq!(json_body(ok).await["message"], "0 Erinnerungen verarbeitet");
}

#[tokio::test]
async fn test_lookup_tables() {
    let (db, app) = setup().await;
    let (_, token) = create_user(&db, "admin@example.org", "pw", Role::Admin).await;

    let created = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/kpi-types",
            Some(&token),
            Some(json!({ "name": "Bindung", "data_type": "PERCENT", "unit": "%" })),
        ))
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);

    let duplicate = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/kpi-types",
            Some(&token),
            Some(json!({ "name": "Bindung", "data_type": "PERCENT" })),
        ))
        .await
        .unwrap();
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);

    let list = app
        .oneshot(request("GET", "/api/kpi-types", Some(&token), None))
        .await
        .unwrap();
    let body = json_body(list).await;
    assert_eq!(body["data"][0]["name"], "Bindung");
    assert_eq!(body["data"][0]["usage_count"], 0);
}
