use once_cell::sync::Lazy;
use prometheus::{register_histogram, register_int_counter, Encoder, Histogram, IntCounter, TextEncoder};

// Prometheus metrics (default registry)
pub static REMINDER_RUNS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "weighlanka_reminder_runs_total",
        "Reminder batches executed (scheduled and on demand)"
    )
    .expect("register reminder_runs_total")
});

pub static REMINDERS_SENT_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "weighlanka_reminders_sent_total",
        "Reminder emails handed to the transport successfully"
    )
    .expect("register reminders_sent_total")
});

pub static REMINDERS_SKIPPED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "weighlanka_reminders_skipped_total",
        "Matching records that produced no reminder"
    )
    .expect("register reminders_skipped_total")
});

pub static REMINDER_RUNS_OVERLAPPED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "weighlanka_reminder_runs_overlapped_total",
        "Scheduled runs skipped because a previous run was still active"
    )
    .expect("register reminder_runs_overlapped_total")
});

pub static REPORT_REQUESTS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "weighlanka_report_requests_total",
        "Daily reports assembled"
    )
    .expect("register report_requests_total")
});

pub static REMINDER_RUN_DURATION: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "weighlanka_reminder_run_duration_seconds",
        "Reminder batch duration in seconds",
        vec![0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 15.0, 60.0, 300.0]
    )
    .expect("register reminder_run_duration")
});

/// Text exposition of the default registry.
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}
