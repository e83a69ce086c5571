use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;
use configs::AppConfig;
use service::{
    auth::AdminAuthService,
    engine::{Engine, ReminderDispatcher, ReminderTemplate},
    notify::NotificationSender,
    scheduler::RunGuard,
    services::{CustomerService, MachineService, ServiceRecordService},
    storage::Stores,
};

use crate::errors::JsonApiError;
use crate::openapi::ApiDoc;

pub mod auth;
pub mod customers;
pub mod email;
pub mod machines;
pub mod reminders;
pub mod service_records;

/// Everything the handlers need, cloned per request.
#[derive(Clone)]
pub struct ServerState {
    pub customers: CustomerService,
    pub machines: MachineService,
    pub records: ServiceRecordService,
    pub engine: Engine,
    pub reminders: ReminderDispatcher,
    pub run_guard: Arc<RunGuard>,
    pub auth: Arc<AdminAuthService>,
}

impl ServerState {
    pub fn build(stores: &Stores, sender: Arc<dyn NotificationSender>, cfg: &AppConfig) -> Self {
        let engine = Engine::new(stores);
        let reminders = ReminderDispatcher::new(
            engine.clone(),
            sender,
            ReminderTemplate::new(cfg.mail.company_name.clone()),
            cfg.mail.send_timeout(),
        );
        Self {
            customers: CustomerService::new(stores.customers.clone()),
            machines: MachineService::new(stores.machines.clone()),
            records: ServiceRecordService::new(stores.records.clone()),
            engine,
            reminders,
            run_guard: Arc::new(RunGuard::default()),
            auth: Arc::new(AdminAuthService::new(stores.admins.clone(), cfg.auth.clone())),
        }
    }
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

pub async fn metrics() -> (StatusCode, String) {
    match service::metrics::encode_metrics() {
        Ok(text) => (StatusCode::OK, text),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("metrics encode error: {e}")),
    }
}

/// Parse a `YYYY-MM-DD` query value; absent means `default`.
pub(crate) fn parse_date(raw: Option<&str>, default: impl FnOnce() -> NaiveDate) -> Result<NaiveDate, JsonApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(default()),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| JsonApiError::bad_request(format!("invalid date '{s}', expected YYYY-MM-DD"))),
    }
}

pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Build the full application router: public probes, docs and the protected `/api` surface.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route("/api/admin/login", post(auth::login))
        .route("/api/admin/reset-password", post(auth::reset_password))
        .route("/api/customers", get(customers::list).post(customers::create))
        .route(
            "/api/customers/:id",
            get(customers::get).put(customers::update).delete(customers::delete),
        )
        .route("/api/machines", get(machines::list).post(machines::create))
        .route(
            "/api/machines/:id",
            get(machines::get).put(machines::update).delete(machines::delete),
        )
        .route("/api/machines/customer/:customer_id", get(machines::by_customer))
        .route("/api/service-records", get(service_records::list).post(service_records::create))
        .route("/api/service-records/report", get(service_records::report))
        .route(
            "/api/service-records/:id",
            get(service_records::get).put(service_records::update).delete(service_records::delete),
        )
        .route("/api/service-records/customer/:customer_id", get(service_records::by_customer))
        .route("/api/service-records/machine/:machine_id", get(service_records::by_machine))
        .route("/api/reminders/due", get(reminders::due))
        .route("/api/reminders/run", post(reminders::run))
        .route("/api/email/test", post(email::send_test));

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .merge(api)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn_with_state(state.clone(), auth::require_bearer_token_state))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_parse_or_default() {
        let fallback = || NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        assert_eq!(parse_date(None, fallback).unwrap(), fallback());
        assert_eq!(parse_date(Some(" "), fallback).unwrap(), fallback());
        assert_eq!(
            parse_date(Some("2024-06-01"), fallback).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
        );
        let err = parse_date(Some("06/01/2024"), fallback).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
