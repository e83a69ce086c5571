use std::sync::Arc;

use models::{Customer, CustomerInput, Document};
use tracing::{info, instrument};

use crate::errors::ServiceError;
use crate::storage::document_store::DocumentStore;

#[derive(Clone)]
pub struct CustomerService {
    store: Arc<dyn DocumentStore<Customer>>,
}

impl CustomerService {
    pub fn new(store: Arc<dyn DocumentStore<Customer>>) -> Self { Self { store } }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: CustomerInput) -> Result<Customer, ServiceError> {
        let created = self.store.create(input.into_customer()?).await?;
        info!(event = "customer_created", customer_id = %created.id);
        Ok(created)
    }

    pub async fn get(&self, id: &str) -> Result<Customer, ServiceError> {
        self.store.get(id).await?.ok_or_else(|| ServiceError::not_found(Customer::KIND))
    }

    pub async fn list(&self) -> Result<Vec<Customer>, ServiceError> {
        let mut all = self.store.list().await?;
        all.sort_by(|a, b| a.customer_name.cmp(&b.customer_name));
        Ok(all)
    }

    /// Replace every field of an existing customer.
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: &str, input: CustomerInput) -> Result<Customer, ServiceError> {
        let updated = self.store.update(id, input.into_customer()?).await?;
        info!(event = "customer_updated", customer_id = %id);
        Ok(updated)
    }

    /// Machines and records pointing at this customer are left in place.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        if !self.store.delete(id).await? {
            return Err(ServiceError::not_found(Customer::KIND));
        }
        info!(event = "customer_deleted", customer_id = %id);
        Ok(())
    }
}
