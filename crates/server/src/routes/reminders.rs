use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use service::engine::{DueReminder, ReminderOutcome};
use tracing::info;

use crate::{
    errors::JsonApiError,
    routes::{parse_date, service_records::DateQuery, today, ServerState},
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DueResponse {
    pub date: chrono::NaiveDate,
    pub reminders: Vec<DueReminder>,
}

/// Reminders that would go out for `date` (default today), without sending.
#[utoipa::path(
    get, path = "/api/reminders/due", tag = "reminders",
    params(DateQuery),
    responses((status = 200, description = "Due reminders"), (status = 400, description = "Malformed date"))
)]
pub async fn due(State(state): State<ServerState>, Query(q): Query<DateQuery>) -> Result<Json<DueResponse>, JsonApiError> {
    let date = parse_date(q.date.as_deref(), today)?;
    let reminders = state.reminders.due(date).await?;
    Ok(Json(DueResponse { date, reminders }))
}

/// Run the reminder batch for `date` (default today) now.
#[utoipa::path(
    post, path = "/api/reminders/run", tag = "reminders",
    params(DateQuery),
    responses(
        (status = 200, description = "Run outcome"),
        (status = 400, description = "Malformed date"),
        (status = 409, description = "A run is already in progress")
    )
)]
pub async fn run(State(state): State<ServerState>, Query(q): Query<DateQuery>) -> Result<Json<ReminderOutcome>, JsonApiError> {
    let date = parse_date(q.date.as_deref(), today)?;
    let Some(_permit) = state.run_guard.try_acquire() else {
        return Err(JsonApiError::new(
            StatusCode::CONFLICT,
            "Run In Progress",
            Some("a reminder run is already in progress".into()),
        ));
    };
    info!(event = "reminder_run_requested", %date, "on-demand reminder run");
    Ok(Json(state.reminders.run(date).await?))
}
