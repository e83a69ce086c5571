//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` so binary crates can prepare storage
//! through `service::runtime` without depending directly on `common`.

use crate::storage::Stores;

/// Make sure `data_dir` exists and open every collection inside it.
pub async fn prepare_storage(data_dir: &str) -> anyhow::Result<Stores> {
    common::env::ensure_data_dir(data_dir).await?;
    let stores = Stores::open_json(data_dir).await?;
    Ok(stores)
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::{CustomerInput, Lookup};

    #[tokio::test]
    async fn prepared_storage_persists_between_opens() -> anyhow::Result<()> {
        let dir = std::env::temp_dir().join(format!("weighlanka_rt_{}", uuid::Uuid::new_v4()));
        let dir_str = dir.to_string_lossy().to_string();

        let stores = prepare_storage(&dir_str).await?;
        let input = CustomerInput { customer_name: "Acme".into(), ..Default::default() };
        stores.customers.create(input.into_customer()?).await?;
        assert!(stores.admins.find_by(&Lookup::Username("admin".into())).await?.is_empty());

        let reopened = prepare_storage(&dir_str).await?;
        assert_eq!(reopened.customers.list().await?.len(), 1);
        for file in ["customers.json", "machines.json", "service_records.json", "admins.json"] {
            assert!(dir.join(file).exists(), "{file} missing");
        }
        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }
}
