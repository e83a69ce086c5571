//! Daily reminder trigger.
//!
//! A cron job fires the reminder batch for the current local date. At most
//! one batch runs at a time; a tick that finds the previous batch still
//! running is dropped, and missed ticks are not replayed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info, warn};

use crate::engine::{ReminderDispatcher, ReminderOutcome};
use crate::errors::ServiceError;
use crate::metrics::REMINDER_RUNS_OVERLAPPED_TOTAL;

/// Skip-if-already-running flag.
#[derive(Debug, Default)]
pub struct RunGuard {
    running: AtomicBool,
}

/// Held for the duration of a run; releases the guard on drop.
#[derive(Debug)]
pub struct RunPermit<'a> {
    guard: &'a RunGuard,
}

impl RunGuard {
    pub fn try_acquire(&self) -> Option<RunPermit<'_>> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RunPermit { guard: self })
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

impl Drop for RunPermit<'_> {
    fn drop(&mut self) {
        self.guard.running.store(false, Ordering::Release);
    }
}

/// One guarded reminder run. Returns `None` when another run holds the guard
/// or when the batch itself failed (already logged).
pub async fn run_scheduled(
    dispatcher: &ReminderDispatcher,
    guard: &RunGuard,
    date: NaiveDate,
) -> Option<ReminderOutcome> {
    let Some(_permit) = guard.try_acquire() else {
        REMINDER_RUNS_OVERLAPPED_TOTAL.inc();
        warn!(event = "reminder_run_overlap", %date, "previous reminder run still active; skipping");
        return None;
    };
    match dispatcher.run(date).await {
        Ok(outcome) => Some(outcome),
        Err(e) => {
            error!(event = "reminder_run_failed", %date, error = %e, "reminder run failed");
            None
        }
    }
}

/// Register the daily job and start the scheduler. The returned handle can
/// be used to shut it down.
pub async fn start_reminder_scheduler(
    dispatcher: ReminderDispatcher,
    guard: Arc<RunGuard>,
    cron: &str,
) -> Result<JobScheduler, ServiceError> {
    let scheduler = JobScheduler::new().await?;
    let dispatcher = Arc::new(dispatcher);

    let job = Job::new_async_tz(cron, Local, move |_uuid, _lock| {
        let dispatcher = dispatcher.clone();
        let guard = guard.clone();
        Box::pin(async move {
            let today = Local::now().date_naive();
            run_scheduled(&dispatcher, &guard, today).await;
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;
    info!(event = "scheduler_started", %cron, "reminder scheduler started");
    Ok(scheduler)
}
