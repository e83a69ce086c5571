//! Storage abstractions for service layer
//!
//! `JsonMapStore` persists a single map as a JSON file; `document_store`
//! builds the per-kind collections on top of it.

pub mod json_map_store;
pub mod document_store;

use std::path::Path;
use std::sync::Arc;

use models::{Admin, Customer, Machine, ServiceRecord};

use crate::errors::ServiceError;
use document_store::{mock::MemoryStore, DocumentStore, JsonDocumentStore};

/// The four collections, one per record kind.
#[derive(Clone)]
pub struct Stores {
    pub customers: Arc<dyn DocumentStore<Customer>>,
    pub machines: Arc<dyn DocumentStore<Machine>>,
    pub records: Arc<dyn DocumentStore<ServiceRecord>>,
    pub admins: Arc<dyn DocumentStore<Admin>>,
}

impl Stores {
    /// Open (or create) `<data_dir>/<collection>.json` for every kind.
    pub async fn open_json<P: AsRef<Path>>(data_dir: P) -> Result<Self, ServiceError> {
        let dir = data_dir.as_ref();
        Ok(Self {
            customers: JsonDocumentStore::<Customer>::open_in(dir).await?,
            machines: JsonDocumentStore::<Machine>::open_in(dir).await?,
            records: JsonDocumentStore::<ServiceRecord>::open_in(dir).await?,
            admins: JsonDocumentStore::<Admin>::open_in(dir).await?,
        })
    }

    /// Volatile collections for tests and dry runs.
    pub fn in_memory() -> Self {
        Self {
            customers: Arc::new(MemoryStore::<Customer>::default()),
            machines: Arc::new(MemoryStore::<Machine>::default()),
            records: Arc::new(MemoryStore::<ServiceRecord>::default()),
            admins: Arc::new(MemoryStore::<Admin>::default()),
        }
    }
}
