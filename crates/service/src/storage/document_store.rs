use std::marker::PhantomData;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use models::{Document, Lookup};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::storage::json_map_store::JsonMapStore;

/// Persistence contract for one record kind.
///
/// The store assigns identifiers and knows nothing about business rules.
/// `delete` is idempotent here (`Ok(false)` for an unknown id); callers that
/// need a not-found failure decide that themselves.
#[async_trait]
pub trait DocumentStore<D: Document>: Send + Sync {
    async fn create(&self, doc: D) -> Result<D, ServiceError>;
    async fn get(&self, id: &str) -> Result<Option<D>, ServiceError>;
    async fn list(&self) -> Result<Vec<D>, ServiceError>;
    async fn find_by(&self, lookup: &Lookup) -> Result<Vec<D>, ServiceError>;
    /// Replace every mutable field of the stored document. Fails with
    /// `NotFound` when `id` is absent.
    async fn update(&self, id: &str, doc: D) -> Result<D, ServiceError>;
    async fn delete(&self, id: &str) -> Result<bool, ServiceError>;
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// File-backed collection: `<dir>/<COLLECTION>.json` holding `id -> document`.
pub struct JsonDocumentStore<D> {
    map: Arc<JsonMapStore<String, D>>,
    _kind: PhantomData<fn() -> D>,
}

impl<D: Document> JsonDocumentStore<D> {
    pub async fn open<P: Into<std::path::PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let map = JsonMapStore::<String, D>::new(path).await?;
        Ok(Arc::new(Self { map, _kind: PhantomData }))
    }

    /// Open the collection file for `D` inside `dir`.
    pub async fn open_in(dir: &Path) -> Result<Arc<Self>, ServiceError> {
        Self::open(dir.join(format!("{}.json", D::COLLECTION))).await
    }
}

#[async_trait]
impl<D: Document> DocumentStore<D> for JsonDocumentStore<D> {
    async fn create(&self, mut doc: D) -> Result<D, ServiceError> {
        doc.set_id(new_id());
        self.map.insert(doc.id().to_string(), doc.clone()).await?;
        Ok(doc)
    }

    async fn get(&self, id: &str) -> Result<Option<D>, ServiceError> {
        Ok(self.map.get(id).await)
    }

    async fn list(&self) -> Result<Vec<D>, ServiceError> {
        Ok(self.map.list().await.into_iter().map(|(_, v)| v).collect())
    }

    async fn find_by(&self, lookup: &Lookup) -> Result<Vec<D>, ServiceError> {
        Ok(self.map.values_where(|d| d.matches(lookup)).await)
    }

    async fn update(&self, id: &str, mut doc: D) -> Result<D, ServiceError> {
        doc.set_id(id.to_string());
        let stored = doc.clone();
        self.map
            .update_map(move |map| {
                let existing = map.get_mut(id).ok_or_else(|| ServiceError::not_found(D::KIND))?;
                *existing = stored;
                Ok(())
            })
            .await?;
        Ok(doc)
    }

    async fn delete(&self, id: &str) -> Result<bool, ServiceError> {
        self.map.remove(id).await
    }
}

/// In-memory implementation for tests, doc examples and benches.
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use tokio::sync::RwLock;

    pub struct MemoryStore<D> {
        docs: RwLock<HashMap<String, D>>,
    }

    impl<D> Default for MemoryStore<D> {
        fn default() -> Self {
            Self { docs: RwLock::new(HashMap::new()) }
        }
    }

    #[async_trait]
    impl<D: Document> DocumentStore<D> for MemoryStore<D> {
        async fn create(&self, mut doc: D) -> Result<D, ServiceError> {
            doc.set_id(new_id());
            self.docs.write().await.insert(doc.id().to_string(), doc.clone());
            Ok(doc)
        }

        async fn get(&self, id: &str) -> Result<Option<D>, ServiceError> {
            Ok(self.docs.read().await.get(id).cloned())
        }

        async fn list(&self) -> Result<Vec<D>, ServiceError> {
            Ok(self.docs.read().await.values().cloned().collect())
        }

        async fn find_by(&self, lookup: &Lookup) -> Result<Vec<D>, ServiceError> {
            Ok(self.docs.read().await.values().filter(|d| d.matches(lookup)).cloned().collect())
        }

        async fn update(&self, id: &str, mut doc: D) -> Result<D, ServiceError> {
            let mut docs = self.docs.write().await;
            let existing = docs.get_mut(id).ok_or_else(|| ServiceError::not_found(D::KIND))?;
            doc.set_id(id.to_string());
            *existing = doc.clone();
            Ok(doc)
        }

        async fn delete(&self, id: &str) -> Result<bool, ServiceError> {
            Ok(self.docs.write().await.remove(id).is_some())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use models::{Admin, CustomerInput, ServiceRecord, ServiceRecordInput};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn record(machine: &str, service: &str, next: &str) -> ServiceRecord {
        ServiceRecordInput {
            customer_id: "C1".into(),
            machine_id: machine.into(),
            service_date: date(service),
            next_service_date: Some(date(next)),
            technician_name: "Nimal".into(),
            remarks: String::new(),
            service_cost: Default::default(),
            visit_no: 1,
            invoice_no: "INV-1".into(),
        }
        .into_record()
        .unwrap()
    }

    async fn exercise(store: &dyn DocumentStore<ServiceRecord>) -> Result<(), anyhow::Error> {
        let a = store.create(record("M1", "2023-06-01", "2024-06-01")).await?;
        let b = store.create(record("M2", "2023-06-01", "2024-07-01")).await?;
        assert!(!a.id.is_empty());
        assert_ne!(a.id, b.id);
        assert_eq!(store.list().await?.len(), 2);

        let due = store.find_by(&Lookup::NextServiceDate(date("2024-06-01"))).await?;
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id, a.id);
        assert_eq!(store.find_by(&Lookup::ServiceDate(date("2023-06-01"))).await?.len(), 2);
        assert!(store.find_by(&Lookup::ServiceDate(date("2023-06-02"))).await?.is_empty());

        let mut changed = a.clone();
        changed.id = "ignored".into();
        changed.technician_name = "Kamal".into();
        let updated = store.update(&a.id, changed).await?;
        assert_eq!(updated.id, a.id);
        assert_eq!(store.get(&a.id).await?.map(|r| r.technician_name), Some("Kamal".to_string()));
        assert!(store.get("ignored").await?.is_none());

        let missing = store.update("nope", a.clone()).await;
        assert!(matches!(missing, Err(ServiceError::NotFound(_))));

        assert!(store.delete(&b.id).await?);
        assert!(!store.delete(&b.id).await?);
        assert!(store.get(&b.id).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn json_store_contract() -> Result<(), anyhow::Error> {
        let dir = std::env::temp_dir().join(format!("docstore_{}", Uuid::new_v4()));
        let store = JsonDocumentStore::<ServiceRecord>::open_in(&dir).await?;
        exercise(&*store).await?;

        // survives reopening
        let reopened = JsonDocumentStore::<ServiceRecord>::open_in(&dir).await?;
        let all = reopened.list().await?;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].technician_name, "Kamal");
        assert!(dir.join("service_records.json").exists());

        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }

    #[tokio::test]
    async fn memory_store_contract() -> Result<(), anyhow::Error> {
        let store = mock::MemoryStore::<ServiceRecord>::default();
        exercise(&store).await
    }

    #[tokio::test]
    async fn username_lookup() -> Result<(), anyhow::Error> {
        let store = mock::MemoryStore::<Admin>::default();
        store
            .create(Admin { id: String::new(), username: "admin".into(), password_hash: "h".into() })
            .await?;
        assert_eq!(store.find_by(&Lookup::Username("admin".into())).await?.len(), 1);
        assert!(store.find_by(&Lookup::Username("root".into())).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn failed_create_is_not_listed() -> Result<(), anyhow::Error> {
        let dir = std::env::temp_dir().join(format!("docstore_{}", Uuid::new_v4()));
        let store = JsonDocumentStore::<models::Customer>::open_in(&dir).await?;

        let path = dir.join("customers.json");
        tokio::fs::remove_file(&path).await?;
        tokio::fs::create_dir_all(path.join("blocker")).await?;

        let customer = CustomerInput { customer_name: "Acme".into(), ..Default::default() }.into_customer()?;
        assert!(store.create(customer).await.is_err());
        assert!(store.list().await?.is_empty());

        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }
}
