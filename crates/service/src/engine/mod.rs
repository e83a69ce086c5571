//! Date-driven join of service records with their customer and machine.
//!
//! Reminder and report modes share one resolution pass; they differ only in
//! which date field is matched and in what happens to each resolved visit.
//! Foreign keys are advisory, so a missing customer or machine is a
//! per-record diagnostic and never fails the batch.

pub mod reminder;
pub mod report;

use std::sync::Arc;

use chrono::NaiveDate;
use models::{Customer, Lookup, Machine, ServiceRecord};
use tracing::{debug, instrument, warn};

use crate::errors::ServiceError;
use crate::storage::{document_store::DocumentStore, Stores};

pub use reminder::{DueReminder, ReminderDispatcher, ReminderOutcome, ReminderTemplate};
pub use report::assemble_row;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Match on `nextServiceDate`.
    Reminder,
    /// Match on `serviceDate`.
    Report,
}

impl Mode {
    pub fn lookup(self, date: NaiveDate) -> Lookup {
        match self {
            Mode::Reminder => Lookup::NextServiceDate(date),
            Mode::Report => Lookup::ServiceDate(date),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Reminder => "reminder",
            Mode::Report => "report",
        }
    }
}

/// A matching record with whatever its references resolved to.
#[derive(Debug, Clone)]
pub struct ResolvedVisit {
    pub record: ServiceRecord,
    pub customer: Option<Customer>,
    pub machine: Option<Machine>,
}

impl ResolvedVisit {
    pub fn is_complete(&self) -> bool {
        self.customer.is_some() && self.machine.is_some()
    }
}

#[derive(Clone)]
pub struct Engine {
    customers: Arc<dyn DocumentStore<Customer>>,
    machines: Arc<dyn DocumentStore<Machine>>,
    records: Arc<dyn DocumentStore<ServiceRecord>>,
}

impl Engine {
    pub fn new(stores: &Stores) -> Self {
        Self {
            customers: stores.customers.clone(),
            machines: stores.machines.clone(),
            records: stores.records.clone(),
        }
    }

    /// Every record matching `date` under `mode`, with both references looked
    /// up independently. Only the initial record query can fail.
    #[instrument(skip(self))]
    pub async fn resolve(&self, mode: Mode, date: NaiveDate) -> Result<Vec<ResolvedVisit>, ServiceError> {
        let records = self.records.find_by(&mode.lookup(date)).await?;
        debug!(event = "records_matched", matched = records.len());

        let mut visits = Vec::with_capacity(records.len());
        for record in records {
            let customer = self.customer_of(&record).await;
            let machine = self.machine_of(&record).await;

            if customer.is_none() {
                warn!(
                    event = "unresolved_customer",
                    mode = mode.as_str(),
                    record_id = %record.id,
                    customer_id = %record.customer_id,
                    "customer not found for service record"
                );
            }
            if machine.is_none() {
                warn!(
                    event = "unresolved_machine",
                    mode = mode.as_str(),
                    record_id = %record.id,
                    machine_id = %record.machine_id,
                    "machine not found for service record"
                );
            }
            visits.push(ResolvedVisit { record, customer, machine });
        }
        Ok(visits)
    }

    async fn customer_of(&self, record: &ServiceRecord) -> Option<Customer> {
        match self.customers.get(&record.customer_id).await {
            Ok(found) => found,
            Err(e) => {
                warn!(event = "lookup_failed", kind = "customer", record_id = %record.id, error = %e);
                None
            }
        }
    }

    async fn machine_of(&self, record: &ServiceRecord) -> Option<Machine> {
        match self.machines.get(&record.machine_id).await {
            Ok(found) => found,
            Err(e) => {
                warn!(event = "lookup_failed", kind = "machine", record_id = %record.id, error = %e);
                None
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[tokio::test]
    async fn modes_match_different_date_fields() {
        let (stores, customer, machine, _) = seeded().await;
        stores
            .records
            .create(visit(&customer.id, &machine.id, "2023-06-01", "2024-07-01", 2))
            .await
            .unwrap();
        let engine = Engine::new(&stores);

        let due = engine.resolve(Mode::Reminder, date("2024-07-01")).await.unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].record.visit_no, 2);

        let serviced = engine.resolve(Mode::Report, date("2023-06-01")).await.unwrap();
        assert_eq!(serviced.len(), 1);
        assert!(engine.resolve(Mode::Report, date("2024-07-01")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_references_are_kept_unresolved() {
        let (stores, customer, _, _) = seeded().await;
        stores
            .records
            .create(visit(&customer.id, "gone", "2024-06-01", "2024-06-01", 2))
            .await
            .unwrap();
        stores
            .records
            .create(visit("gone", "gone", "2024-06-01", "2024-06-01", 3))
            .await
            .unwrap();
        let engine = Engine::new(&stores);

        let mut visits = engine.resolve(Mode::Report, date("2024-06-01")).await.unwrap();
        visits.sort_by_key(|v| v.record.visit_no);
        assert_eq!(visits.len(), 3);
        assert!(visits[0].is_complete());
        assert!(visits[1].customer.is_some() && visits[1].machine.is_none());
        assert!(visits[2].customer.is_none() && visits[2].machine.is_none());
    }
}
