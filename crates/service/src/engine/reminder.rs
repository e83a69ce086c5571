use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, instrument, warn};

use super::{Engine, Mode, ResolvedVisit};
use crate::errors::ServiceError;
use crate::metrics::{REMINDERS_SENT_TOTAL, REMINDERS_SKIPPED_TOTAL, REMINDER_RUNS_TOTAL, REMINDER_RUN_DURATION};
use crate::notify::{send_with_timeout, NotificationSender};

/// Subject and body of the annual service reminder.
#[derive(Debug, Clone)]
pub struct ReminderTemplate {
    company: String,
}

impl ReminderTemplate {
    pub fn new(company: impl Into<String>) -> Self {
        Self { company: company.into() }
    }

    pub fn company(&self) -> &str {
        &self.company
    }

    pub fn subject(&self) -> String {
        format!("Annual Service Reminder - {}", self.company)
    }

    pub fn body(&self, customer_name: &str, machine_id: &str) -> String {
        format!(
            "Dear {customer_name},\n\n\
             This is a kind reminder that your scale/machine (ID: {machine_id}) is due for annual calibration/service.\n\
             Please contact {company} to schedule the service.\n\n\
             Thank you,\n\
             {company} Service Team.",
            company = self.company,
        )
    }
}

/// Totals for one reminder batch. `matched == sent + skipped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderOutcome {
    pub date: NaiveDate,
    pub matched: usize,
    pub sent: usize,
    pub skipped: usize,
}

/// A reminder that would be sent for the given date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DueReminder {
    pub record_id: String,
    pub customer_id: String,
    pub customer_name: String,
    pub email: String,
    pub machine_id: String,
    pub model: String,
    pub serial_number: String,
    pub next_service_date: NaiveDate,
}

enum Delivery {
    Sent,
    Skipped,
}

/// Runs the engine in reminder mode and hands each resolvable visit to the
/// notification sender. Records are processed one after another.
#[derive(Clone)]
pub struct ReminderDispatcher {
    engine: Engine,
    sender: Arc<dyn NotificationSender>,
    template: ReminderTemplate,
    send_timeout: Duration,
}

impl ReminderDispatcher {
    pub fn new(
        engine: Engine,
        sender: Arc<dyn NotificationSender>,
        template: ReminderTemplate,
        send_timeout: Duration,
    ) -> Self {
        Self { engine, sender, template, send_timeout }
    }

    /// Send one reminder per due record whose customer and machine resolve.
    ///
    /// # Examples
    /// ```
    /// use std::{sync::Arc, time::Duration};
    /// use service::engine::{Engine, ReminderDispatcher, ReminderTemplate};
    /// use service::notify::mock::RecordingSender;
    /// use service::storage::Stores;
    /// let stores = Stores::in_memory();
    /// let dispatcher = ReminderDispatcher::new(
    ///     Engine::new(&stores),
    ///     Arc::new(RecordingSender::default()),
    ///     ReminderTemplate::new("Weigh Lanka"),
    ///     Duration::from_secs(5),
    /// );
    /// let date = chrono::NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    /// let outcome = tokio_test::block_on(dispatcher.run(date)).unwrap();
    /// assert_eq!((outcome.matched, outcome.sent, outcome.skipped), (0, 0, 0));
    /// ```
    #[instrument(skip(self))]
    pub async fn run(&self, date: NaiveDate) -> Result<ReminderOutcome, ServiceError> {
        let timer = REMINDER_RUN_DURATION.start_timer();
        REMINDER_RUNS_TOTAL.inc();

        let visits = self.engine.resolve(Mode::Reminder, date).await?;
        let mut outcome = ReminderOutcome { date, matched: visits.len(), sent: 0, skipped: 0 };
        for visit in &visits {
            match self.deliver(visit).await {
                Delivery::Sent => outcome.sent += 1,
                Delivery::Skipped => outcome.skipped += 1,
            }
        }

        REMINDERS_SENT_TOTAL.inc_by(outcome.sent as u64);
        REMINDERS_SKIPPED_TOTAL.inc_by(outcome.skipped as u64);
        timer.observe_duration();
        info!(
            event = "reminder_run_finished",
            %date,
            matched = outcome.matched,
            sent = outcome.sent,
            skipped = outcome.skipped,
            "reminder run finished"
        );
        Ok(outcome)
    }

    async fn deliver(&self, visit: &ResolvedVisit) -> Delivery {
        let (Some(customer), Some(machine)) = (&visit.customer, &visit.machine) else {
            return Delivery::Skipped;
        };
        let email = customer.email.trim();
        if email.is_empty() {
            warn!(
                event = "reminder_skipped",
                reason = "blank_email",
                record_id = %visit.record.id,
                customer_id = %customer.id,
                "customer has no email address"
            );
            return Delivery::Skipped;
        }

        let subject = self.template.subject();
        let body = self.template.body(&customer.customer_name, &machine.id);
        match send_with_timeout(self.sender.as_ref(), self.send_timeout, email, &subject, &body).await {
            Ok(()) => {
                info!(event = "reminder_sent", record_id = %visit.record.id, to = %email, machine_id = %machine.id);
                Delivery::Sent
            }
            Err(e) => {
                warn!(
                    event = "reminder_failed",
                    record_id = %visit.record.id,
                    to = %email,
                    error = %e,
                    "reminder could not be delivered"
                );
                Delivery::Skipped
            }
        }
    }

    /// Reminders that `run(date)` would attempt, without sending anything.
    #[instrument(skip(self))]
    pub async fn due(&self, date: NaiveDate) -> Result<Vec<DueReminder>, ServiceError> {
        let visits = self.engine.resolve(Mode::Reminder, date).await?;
        let mut due: Vec<DueReminder> = visits
            .into_iter()
            .filter_map(|v| {
                let customer = v.customer?;
                let machine = v.machine?;
                if customer.email.trim().is_empty() {
                    return None;
                }
                Some(DueReminder {
                    record_id: v.record.id,
                    customer_id: customer.id,
                    customer_name: customer.customer_name,
                    email: customer.email.trim().to_string(),
                    machine_id: machine.id,
                    model: machine.model,
                    serial_number: machine.serial_number,
                    next_service_date: date,
                })
            })
            .collect();
        due.sort_by(|a, b| a.customer_name.cmp(&b.customer_name).then_with(|| a.record_id.cmp(&b.record_id)));
        Ok(due)
    }

    /// Deliver a fixed test message through the configured transport.
    #[instrument(skip(self))]
    pub async fn send_test(&self, to: &str) -> Result<(), ServiceError> {
        let to = to.trim();
        if to.is_empty() {
            return Err(ServiceError::Validation("recipient address is required".into()));
        }
        let subject = format!("Test Email - {}", self.template.company());
        let body = format!("This is a test message from the {} service backend.", self.template.company());
        send_with_timeout(self.sender.as_ref(), self.send_timeout, to, &subject, &body).await?;
        info!(event = "test_email_sent", %to);
        Ok(())
    }
}
