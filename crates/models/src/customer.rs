use serde::{Deserialize, Serialize};

use crate::document::{Document, Lookup};
use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(default)]
    pub id: String,
    pub customer_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

impl Document for Customer {
    const COLLECTION: &'static str = "customers";
    const KIND: &'static str = "customer";

    fn id(&self) -> &str { &self.id }
    fn set_id(&mut self, id: String) { self.id = id; }

    fn matches(&self, _lookup: &Lookup) -> bool {
        false
    }
}

/// Create/update payload; the id is assigned by the store.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInput {
    pub customer_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

impl CustomerInput {
    /// Validate and normalise into a customer document with an unassigned id.
    pub fn into_customer(self) -> Result<Customer, ModelError> {
        let customer_name = crate::required("customerName", &self.customer_name)?;
        let email = self.email.trim().to_string();
        if !email.is_empty() && !is_plausible_email(&email) {
            return Err(ModelError::Validation(format!("invalid email address: {email}")));
        }
        Ok(Customer {
            id: String::new(),
            customer_name,
            address: self.address.trim().to_string(),
            location: self.location.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email,
        })
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> CustomerInput {
        CustomerInput {
            customer_name: " Acme ".into(),
            address: "12 Main St".into(),
            location: "Colombo".into(),
            phone: "0771234567".into(),
            email: "a@x.com".into(),
        }
    }

    #[test]
    fn input_is_trimmed() {
        let c = input().into_customer().unwrap();
        assert_eq!(c.customer_name, "Acme");
        assert!(c.id.is_empty());
    }

    #[test]
    fn name_required() {
        let mut i = input();
        i.customer_name = "   ".into();
        assert!(matches!(i.into_customer(), Err(ModelError::Validation(_))));
    }

    #[test]
    fn email_optional_but_checked() {
        let mut i = input();
        i.email = String::new();
        assert!(i.clone().into_customer().is_ok());
        i.email = "not-an-address".into();
        assert!(i.clone().into_customer().is_err());
        i.email = "x@localhost".into();
        assert!(i.into_customer().is_err());
    }

    #[test]
    fn json_uses_camel_case() {
        let c = input().into_customer().unwrap();
        let v = serde_json::to_value(&c).unwrap();
        assert_eq!(v["customerName"], "Acme");
        let parsed: CustomerInput = serde_json::from_str(r#"{"customerName":"B"}"#).unwrap();
        assert_eq!(parsed.customer_name, "B");
        assert!(parsed.email.is_empty());
    }
}
