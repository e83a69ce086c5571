use std::sync::Arc;

use models::{Document, Lookup, ServiceRecord, ServiceRecordInput};
use tracing::{info, instrument};

use crate::errors::ServiceError;
use crate::storage::document_store::DocumentStore;

#[derive(Clone)]
pub struct ServiceRecordService {
    store: Arc<dyn DocumentStore<ServiceRecord>>,
}

fn newest_first(records: &mut [ServiceRecord]) {
    records.sort_by(|a, b| b.service_date.cmp(&a.service_date).then_with(|| b.visit_no.cmp(&a.visit_no)));
}

impl ServiceRecordService {
    pub fn new(store: Arc<dyn DocumentStore<ServiceRecord>>) -> Self { Self { store } }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: ServiceRecordInput) -> Result<ServiceRecord, ServiceError> {
        let created = self.store.create(input.into_record()?).await?;
        info!(
            event = "service_record_created",
            record_id = %created.id,
            machine_id = %created.machine_id,
            next_service_date = ?created.next_service_date
        );
        Ok(created)
    }

    pub async fn get(&self, id: &str) -> Result<ServiceRecord, ServiceError> {
        self.store.get(id).await?.ok_or_else(|| ServiceError::not_found(ServiceRecord::KIND))
    }

    pub async fn list(&self) -> Result<Vec<ServiceRecord>, ServiceError> {
        let mut all = self.store.list().await?;
        newest_first(&mut all);
        Ok(all)
    }

    pub async fn by_customer(&self, customer_id: &str) -> Result<Vec<ServiceRecord>, ServiceError> {
        let mut found = self.store.find_by(&Lookup::CustomerId(customer_id.to_string())).await?;
        newest_first(&mut found);
        Ok(found)
    }

    pub async fn by_machine(&self, machine_id: &str) -> Result<Vec<ServiceRecord>, ServiceError> {
        let mut found = self.store.find_by(&Lookup::MachineId(machine_id.to_string())).await?;
        newest_first(&mut found);
        Ok(found)
    }

    /// Corrective edit of a past visit.
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: &str, input: ServiceRecordInput) -> Result<ServiceRecord, ServiceError> {
        let updated = self.store.update(id, input.into_record()?).await?;
        info!(event = "service_record_updated", record_id = %id);
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        if !self.store.delete(id).await? {
            return Err(ServiceError::not_found(ServiceRecord::KIND));
        }
        info!(event = "service_record_deleted", record_id = %id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Stores;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn input(machine: &str, service: &str, visit_no: u32) -> ServiceRecordInput {
        let service_date = NaiveDate::parse_from_str(service, "%Y-%m-%d").unwrap();
        ServiceRecordInput {
            customer_id: "C1".into(),
            machine_id: machine.into(),
            service_date,
            next_service_date: service_date.checked_add_signed(chrono::Duration::days(365)),
            technician_name: "Nimal".into(),
            remarks: String::new(),
            service_cost: Decimal::new(1500, 0),
            visit_no,
            invoice_no: format!("INV-{visit_no}"),
        }
    }

    #[tokio::test]
    async fn history_is_newest_first() {
        let svc = ServiceRecordService::new(Stores::in_memory().records);
        svc.create(input("M1", "2022-06-01", 1)).await.unwrap();
        svc.create(input("M1", "2023-06-01", 2)).await.unwrap();
        svc.create(input("M2", "2023-01-10", 1)).await.unwrap();

        let visits: Vec<u32> = svc.by_machine("M1").await.unwrap().iter().map(|r| r.visit_no).collect();
        assert_eq!(visits, vec![2, 1]);
        assert_eq!(svc.by_customer("C1").await.unwrap().len(), 3);
        assert!(svc.by_customer("C2").await.unwrap().is_empty());
        assert_eq!(svc.list().await.unwrap()[0].service_date, NaiveDate::from_ymd_opt(2023, 6, 1).unwrap());
    }

    #[tokio::test]
    async fn rejects_invalid_and_unknown() {
        let svc = ServiceRecordService::new(Stores::in_memory().records);
        let mut bad = input("M1", "2023-06-01", 1);
        bad.service_cost = Decimal::new(-5, 0);
        assert!(matches!(svc.create(bad).await, Err(ServiceError::Model(_))));

        let r = svc.create(input("M1", "2023-06-01", 1)).await.unwrap();
        let mut fix = input("M1", "2023-06-01", 1);
        fix.remarks = "recalibrated".into();
        assert_eq!(svc.update(&r.id, fix).await.unwrap().remarks, "recalibrated");
        assert!(matches!(svc.update("nope", input("M1", "2023-06-01", 1)).await, Err(ServiceError::NotFound(_))));
        svc.delete(&r.id).await.unwrap();
        assert!(matches!(svc.delete(&r.id).await, Err(ServiceError::NotFound(_))));
    }
}
