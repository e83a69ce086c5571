use serde::{Deserialize, Serialize};

use crate::document::{Document, Lookup};

/// The shared administrator credential. `password_hash` is an argon2 PHC
/// string; the record never leaves the service layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    #[serde(default)]
    pub id: String,
    pub username: String,
    pub password_hash: String,
}

impl Document for Admin {
    const COLLECTION: &'static str = "admins";
    const KIND: &'static str = "admin";

    fn id(&self) -> &str { &self.id }
    fn set_id(&mut self, id: String) { self.id = id; }

    fn matches(&self, lookup: &Lookup) -> bool {
        matches!(lookup, Lookup::Username(name) if *name == self.username)
    }
}
