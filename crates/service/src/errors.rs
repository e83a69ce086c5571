use thiserror::Error;

use crate::auth::errors::AuthError;
use crate::notify::NotifyError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
    #[error("scheduler error: {0}")]
    Scheduler(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    pub fn storage(err: impl std::fmt::Display) -> Self { Self::Storage(err.to_string()) }
}

impl From<tokio_cron_scheduler::JobSchedulerError> for ServiceError {
    fn from(e: tokio_cron_scheduler::JobSchedulerError) -> Self {
        Self::Scheduler(e.to_string())
    }
}
