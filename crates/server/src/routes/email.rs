use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

use crate::{errors::JsonApiError, routes::ServerState};

#[derive(Debug, Deserialize)]
pub struct TestEmailInput {
    pub to: String,
}

/// Push a fixed message through the configured mail transport.
#[utoipa::path(
    post, path = "/api/email/test", tag = "email",
    request_body = crate::openapi::TestEmailRequest,
    responses(
        (status = 202, description = "Handed to the transport"),
        (status = 400, description = "Missing or invalid recipient"),
        (status = 500, description = "Transport failure")
    )
)]
pub async fn send_test(
    State(state): State<ServerState>,
    Json(input): Json<TestEmailInput>,
) -> Result<StatusCode, JsonApiError> {
    state.reminders.send_test(&input.to).await?;
    Ok(StatusCode::ACCEPTED)
}
