use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Serialize};

/// Secondary lookups the store answers besides by-id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    CustomerId(String),
    MachineId(String),
    ServiceDate(NaiveDate),
    NextServiceDate(NaiveDate),
    Username(String),
}

/// A record kind persisted as one collection, keyed by a store-generated id.
pub trait Document: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection name; also the file stem for file-backed stores.
    const COLLECTION: &'static str;
    /// Human readable kind used in error messages.
    const KIND: &'static str;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);

    /// Whether the document satisfies `lookup`. A kind never matches a lookup
    /// on a field it does not carry.
    fn matches(&self, lookup: &Lookup) -> bool;
}
