use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use models::{ReportRow, ServiceRecord, ServiceRecordInput};
use serde::Deserialize;

use crate::{
    errors::JsonApiError,
    routes::{parse_date, ServerState},
};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DateQuery {
    /// Calendar date, `YYYY-MM-DD`.
    pub date: Option<String>,
}

#[utoipa::path(get, path = "/api/service-records", tag = "service-records", responses((status = 200, description = "List OK", body = [crate::openapi::ServiceRecordDoc])))]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<ServiceRecord>>, JsonApiError> {
    Ok(Json(state.records.list().await?))
}

#[utoipa::path(
    post, path = "/api/service-records", tag = "service-records",
    request_body = crate::openapi::ServiceRecordInputDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::ServiceRecordDoc),
        (status = 400, description = "Validation Error")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<ServiceRecordInput>,
) -> Result<(StatusCode, Json<ServiceRecord>), JsonApiError> {
    let created = state.records.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get, path = "/api/service-records/{id}", tag = "service-records",
    params(("id" = String, Path, description = "Service record id")),
    responses((status = 200, description = "OK", body = crate::openapi::ServiceRecordDoc), (status = 404, description = "Not Found"))
)]
pub async fn get(State(state): State<ServerState>, Path(id): Path<String>) -> Result<Json<ServiceRecord>, JsonApiError> {
    Ok(Json(state.records.get(&id).await?))
}

#[utoipa::path(
    get, path = "/api/service-records/customer/{customer_id}", tag = "service-records",
    params(("customer_id" = String, Path, description = "Customer id")),
    responses((status = 200, description = "List OK", body = [crate::openapi::ServiceRecordDoc]))
)]
pub async fn by_customer(
    State(state): State<ServerState>,
    Path(customer_id): Path<String>,
) -> Result<Json<Vec<ServiceRecord>>, JsonApiError> {
    Ok(Json(state.records.by_customer(&customer_id).await?))
}

#[utoipa::path(
    get, path = "/api/service-records/machine/{machine_id}", tag = "service-records",
    params(("machine_id" = String, Path, description = "Machine id")),
    responses((status = 200, description = "List OK", body = [crate::openapi::ServiceRecordDoc]))
)]
pub async fn by_machine(
    State(state): State<ServerState>,
    Path(machine_id): Path<String>,
) -> Result<Json<Vec<ServiceRecord>>, JsonApiError> {
    Ok(Json(state.records.by_machine(&machine_id).await?))
}

#[utoipa::path(
    put, path = "/api/service-records/{id}", tag = "service-records",
    params(("id" = String, Path, description = "Service record id")),
    request_body = crate::openapi::ServiceRecordInputDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::ServiceRecordDoc),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(input): Json<ServiceRecordInput>,
) -> Result<Json<ServiceRecord>, JsonApiError> {
    Ok(Json(state.records.update(&id, input).await?))
}

#[utoipa::path(
    delete, path = "/api/service-records/{id}", tag = "service-records",
    params(("id" = String, Path, description = "Service record id")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found"))
)]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<String>) -> Result<StatusCode, JsonApiError> {
    state.records.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Daily report for the visits on `date`. The date is required here.
#[utoipa::path(
    get, path = "/api/service-records/report", tag = "service-records",
    params(DateQuery),
    responses(
        (status = 200, description = "Report rows", body = [crate::openapi::ReportRowDoc]),
        (status = 400, description = "Missing or malformed date")
    )
)]
pub async fn report(
    State(state): State<ServerState>,
    Query(q): Query<DateQuery>,
) -> Result<Json<Vec<ReportRow>>, JsonApiError> {
    let raw = q.date.as_deref().filter(|s| !s.trim().is_empty());
    let Some(raw) = raw else {
        return Err(JsonApiError::bad_request("query parameter 'date' is required"));
    };
    let date = parse_date(Some(raw), crate::routes::today)?;
    Ok(Json(state.engine.daily_report(date).await?))
}
