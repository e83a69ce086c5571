use std::sync::Arc;

use models::{Document, Lookup, Machine, MachineInput};
use tracing::{info, instrument};

use crate::errors::ServiceError;
use crate::storage::document_store::DocumentStore;

#[derive(Clone)]
pub struct MachineService {
    store: Arc<dyn DocumentStore<Machine>>,
}

impl MachineService {
    pub fn new(store: Arc<dyn DocumentStore<Machine>>) -> Self { Self { store } }

    /// The owning customer is not checked; the reference is advisory.
    #[instrument(skip(self, input))]
    pub async fn create(&self, input: MachineInput) -> Result<Machine, ServiceError> {
        let created = self.store.create(input.into_machine()?).await?;
        info!(event = "machine_created", machine_id = %created.id, customer_id = ?created.customer_id);
        Ok(created)
    }

    pub async fn get(&self, id: &str) -> Result<Machine, ServiceError> {
        self.store.get(id).await?.ok_or_else(|| ServiceError::not_found(Machine::KIND))
    }

    pub async fn list(&self) -> Result<Vec<Machine>, ServiceError> {
        let mut all = self.store.list().await?;
        all.sort_by(|a, b| a.model.cmp(&b.model).then_with(|| a.serial_number.cmp(&b.serial_number)));
        Ok(all)
    }

    pub async fn by_customer(&self, customer_id: &str) -> Result<Vec<Machine>, ServiceError> {
        let mut found = self.store.find_by(&Lookup::CustomerId(customer_id.to_string())).await?;
        found.sort_by(|a, b| a.serial_number.cmp(&b.serial_number));
        Ok(found)
    }

    #[instrument(skip(self, input))]
    pub async fn update(&self, id: &str, input: MachineInput) -> Result<Machine, ServiceError> {
        let updated = self.store.update(id, input.into_machine()?).await?;
        info!(event = "machine_updated", machine_id = %id);
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        if !self.store.delete(id).await? {
            return Err(ServiceError::not_found(Machine::KIND));
        }
        info!(event = "machine_deleted", machine_id = %id);
        Ok(())
    }
}
