use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use configs::AppConfig;
use server::routes::{build_router, ServerState};
use service::auth::domain::BootstrapInput;
use service::notify::mock::RecordingSender;
use service::storage::Stores;

const PASSWORD: &str = "operator-secret";

async fn app() -> (Router, Arc<RecordingSender>) {
    let mut cfg = AppConfig::default();
    cfg.auth.jwt_secret = "integration-test-secret".into();
    let sender = Arc::new(RecordingSender::failing_for(["bounce@x.com"]));
    let state = ServerState::build(&Stores::in_memory(), sender.clone(), &cfg);
    state
        .auth
        .bootstrap(BootstrapInput { username: "admin".into(), password: PASSWORD.into(), reset: false })
        .await
        .unwrap();
    (build_router(state, tower_http::cors::CorsLayer::very_permissive()), sender)
}

async fn call(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    let req = match body {
        Some(b) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(b.to_string()))
            .unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap_or(Value::Null) };
    (status, value)
}

async fn login(app: &Router) -> String {
    let (status, body) = call(
        app,
        Method::POST,
        "/api/admin/login",
        None,
        Some(json!({"username": "admin", "password": PASSWORD})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn probes_are_public_and_api_is_guarded() {
    let (app, _) = app().await;
    assert_eq!(call(&app, Method::GET, "/health", None, None).await.0, StatusCode::OK);
    assert_eq!(call(&app, Method::GET, "/metrics", None, None).await.0, StatusCode::OK);

    let (status, body) = call(&app, Method::GET, "/api/customers", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");

    let (status, _) = call(&app, Method::GET, "/api/customers", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/admin/login",
        None,
        Some(json!({"username": "admin", "password": "wrong-password"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_sets_cookie_that_authorizes() {
    let (app, _) = app().await;
    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/admin/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"username": "admin", "password": PASSWORD}).to_string()))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = resp.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap().to_string();
    assert!(cookie.starts_with("auth_token="));

    let pair = cookie.split(';').next().unwrap().to_string();
    let req = Request::builder().uri("/api/customers").header(header::COOKIE, pair).body(Body::empty()).unwrap();
    assert_eq!(app.clone().oneshot(req).await.unwrap().status(), StatusCode::OK);
}

#[tokio::test]
async fn crud_report_and_reminder_flow() {
    let (app, sender) = app().await;
    let token = login(&app).await;
    let t = Some(token.as_str());

    let (status, customer) = call(
        &app,
        Method::POST,
        "/api/customers",
        t,
        Some(json!({
            "customerName": "Acme", "address": "12 Main St", "location": "Colombo",
            "phone": "0771234567", "email": "a@x.com"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let customer_id = customer["id"].as_str().unwrap().to_string();

    let (status, machine) = call(
        &app,
        Method::POST,
        "/api/machines",
        t,
        Some(json!({
            "customerId": customer_id, "model": "WL-200", "serialNumber": "SN1",
            "capacity": "15kg", "regNo": "R1", "idNo": "ID1"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let machine_id = machine["id"].as_str().unwrap().to_string();

    let (status, record) = call(
        &app,
        Method::POST,
        "/api/service-records",
        t,
        Some(json!({
            "customerId": customer_id, "machineId": machine_id,
            "serviceDate": "2024-06-01", "nextServiceDate": "2025-06-01",
            "technicianName": "Nimal", "serviceCost": "2500.00", "visitNo": 1, "invoiceNo": "INV-1"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(record["serviceCost"], "2500.00");

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/service-records",
        t,
        Some(json!({"customerId": customer_id, "machineId": machine_id, "serviceDate": "2024-06-01", "serviceCost": -1})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, machines) = call(&app, Method::GET, &format!("/api/machines/customer/{customer_id}"), t, None).await;
    assert_eq!(machines.as_array().unwrap().len(), 1);
    let (_, history) = call(&app, Method::GET, &format!("/api/service-records/machine/{machine_id}"), t, None).await;
    assert_eq!(history.as_array().unwrap().len(), 1);

    let (status, rows) = call(&app, Method::GET, "/api/service-records/report?date=2024-06-01", t, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rows.as_array().unwrap().len(), 1);
    assert_eq!(rows[0]["nameAndAddress"], "Acme, 12 Main St");
    assert_eq!(rows[0]["serialNo"], "SN1");
    assert_eq!(rows[0]["servicedBy"], "Nimal");

    assert_eq!(
        call(&app, Method::GET, "/api/service-records/report?date=01-06-2024", t, None).await.0,
        StatusCode::BAD_REQUEST
    );
    assert_eq!(call(&app, Method::GET, "/api/service-records/report", t, None).await.0, StatusCode::BAD_REQUEST);

    let (_, due) = call(&app, Method::GET, "/api/reminders/due?date=2025-06-01", t, None).await;
    assert_eq!(due["reminders"].as_array().unwrap().len(), 1);
    assert!(sender.sent().is_empty());

    let (status, outcome) = call(&app, Method::POST, "/api/reminders/run?date=2025-06-01", t, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome, json!({"date": "2025-06-01", "matched": 1, "sent": 1, "skipped": 0}));
    let sent = sender.sent();
    assert_eq!(sent[0].to, "a@x.com");
    assert!(sent[0].body.contains(&machine_id));

    // deleting the customer leaves the record; the report degrades instead of dropping the row
    assert_eq!(
        call(&app, Method::DELETE, &format!("/api/customers/{customer_id}"), t, None).await.0,
        StatusCode::NO_CONTENT
    );
    assert_eq!(
        call(&app, Method::DELETE, &format!("/api/customers/{customer_id}"), t, None).await.0,
        StatusCode::NOT_FOUND
    );
    let (_, rows) = call(&app, Method::GET, "/api/service-records/report?date=2024-06-01", t, None).await;
    assert_eq!(rows[0]["nameAndAddress"], "");
    assert_eq!(rows[0]["model"], "WL-200");
}

#[tokio::test]
async fn unknown_ids_and_test_email() {
    let (app, sender) = app().await;
    let token = login(&app).await;
    let t = Some(token.as_str());

    let (status, body) = call(&app, Method::GET, "/api/customers/missing", t, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
    let (status, _) = call(&app, Method::PUT, "/api/machines/missing", t, Some(json!({"model": "WL-200"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, Method::POST, "/api/email/test", t, Some(json!({"to": "ops@x.com"}))).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(sender.sent().len(), 1);

    let (status, _) = call(&app, Method::POST, "/api/email/test", t, Some(json!({"to": "bounce@x.com"}))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn password_reset_changes_login() {
    let (app, _) = app().await;
    let token = login(&app).await;

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/admin/reset-password",
        None,
        Some(json!({"username": "admin", "currentPassword": PASSWORD, "newPassword": "rotated-secret"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/admin/reset-password",
        Some(&token),
        Some(json!({"username": "admin", "currentPassword": PASSWORD, "newPassword": "short"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/admin/reset-password",
        Some(&token),
        Some(json!({"username": "admin", "currentPassword": PASSWORD, "newPassword": "rotated-secret"})),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/admin/login",
        None,
        Some(json!({"username": "admin", "password": "rotated-secret"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}
