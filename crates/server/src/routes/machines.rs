use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use models::{Machine, MachineInput};

use crate::{errors::JsonApiError, routes::ServerState};

#[utoipa::path(get, path = "/api/machines", tag = "machines", responses((status = 200, description = "List OK", body = [crate::openapi::MachineDoc])))]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<Machine>>, JsonApiError> {
    Ok(Json(state.machines.list().await?))
}

#[utoipa::path(
    post, path = "/api/machines", tag = "machines",
    request_body = crate::openapi::MachineInputDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::MachineDoc),
        (status = 400, description = "Validation Error")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<MachineInput>,
) -> Result<(StatusCode, Json<Machine>), JsonApiError> {
    let created = state.machines.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get, path = "/api/machines/{id}", tag = "machines",
    params(("id" = String, Path, description = "Machine id")),
    responses((status = 200, description = "OK", body = crate::openapi::MachineDoc), (status = 404, description = "Not Found"))
)]
pub async fn get(State(state): State<ServerState>, Path(id): Path<String>) -> Result<Json<Machine>, JsonApiError> {
    Ok(Json(state.machines.get(&id).await?))
}

#[utoipa::path(
    get, path = "/api/machines/customer/{customer_id}", tag = "machines",
    params(("customer_id" = String, Path, description = "Owning customer id")),
    responses((status = 200, description = "List OK", body = [crate::openapi::MachineDoc]))
)]
pub async fn by_customer(
    State(state): State<ServerState>,
    Path(customer_id): Path<String>,
) -> Result<Json<Vec<Machine>>, JsonApiError> {
    Ok(Json(state.machines.by_customer(&customer_id).await?))
}

#[utoipa::path(
    put, path = "/api/machines/{id}", tag = "machines",
    params(("id" = String, Path, description = "Machine id")),
    request_body = crate::openapi::MachineInputDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::MachineDoc),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(input): Json<MachineInput>,
) -> Result<Json<Machine>, JsonApiError> {
    Ok(Json(state.machines.update(&id, input).await?))
}

#[utoipa::path(
    delete, path = "/api/machines/{id}", tag = "machines",
    params(("id" = String, Path, description = "Machine id")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found"))
)]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<String>) -> Result<StatusCode, JsonApiError> {
    state.machines.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
