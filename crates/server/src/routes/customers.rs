use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use models::{Customer, CustomerInput};

use crate::{errors::JsonApiError, routes::ServerState};

#[utoipa::path(get, path = "/api/customers", tag = "customers", responses((status = 200, description = "List OK", body = [crate::openapi::CustomerDoc])))]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<Customer>>, JsonApiError> {
    Ok(Json(state.customers.list().await?))
}

#[utoipa::path(
    post, path = "/api/customers", tag = "customers",
    request_body = crate::openapi::CustomerInputDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::CustomerDoc),
        (status = 400, description = "Validation Error")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<CustomerInput>,
) -> Result<(StatusCode, Json<Customer>), JsonApiError> {
    let created = state.customers.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get, path = "/api/customers/{id}", tag = "customers",
    params(("id" = String, Path, description = "Customer id")),
    responses((status = 200, description = "OK", body = crate::openapi::CustomerDoc), (status = 404, description = "Not Found"))
)]
pub async fn get(State(state): State<ServerState>, Path(id): Path<String>) -> Result<Json<Customer>, JsonApiError> {
    Ok(Json(state.customers.get(&id).await?))
}

#[utoipa::path(
    put, path = "/api/customers/{id}", tag = "customers",
    params(("id" = String, Path, description = "Customer id")),
    request_body = crate::openapi::CustomerInputDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::CustomerDoc),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(input): Json<CustomerInput>,
) -> Result<Json<Customer>, JsonApiError> {
    Ok(Json(state.customers.update(&id, input).await?))
}

#[utoipa::path(
    delete, path = "/api/customers/{id}", tag = "customers",
    params(("id" = String, Path, description = "Customer id")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found"))
)]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<String>) -> Result<StatusCode, JsonApiError> {
    state.customers.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
