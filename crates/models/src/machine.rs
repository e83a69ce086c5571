use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::document::{Document, Lookup};
use crate::errors::ModelError;

/// A scale or weighbridge installed at a customer site.
///
/// `customer_id` is advisory: it may point at a customer that was deleted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Machine {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub customer_id: Option<String>,
    pub model: String,
    #[serde(default)]
    pub serial_number: String,
    #[serde(default)]
    pub installed_date: Option<NaiveDate>,
    #[serde(default)]
    pub warranty: String,
    #[serde(default)]
    pub last_service_date: Option<NaiveDate>,
    #[serde(default)]
    pub next_service_date: Option<NaiveDate>,
    #[serde(default)]
    pub capacity: String,
    #[serde(default)]
    pub reg_no: String,
    #[serde(default)]
    pub id_no: String,
}

impl Document for Machine {
    const COLLECTION: &'static str = "machines";
    const KIND: &'static str = "machine";

    fn id(&self) -> &str { &self.id }
    fn set_id(&mut self, id: String) { self.id = id; }

    fn matches(&self, lookup: &Lookup) -> bool {
        match lookup {
            Lookup::CustomerId(id) => self.customer_id.as_deref() == Some(id.as_str()),
            _ => false,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineInput {
    #[serde(default)]
    pub customer_id: Option<String>,
    pub model: String,
    #[serde(default)]
    pub serial_number: String,
    #[serde(default)]
    pub installed_date: Option<NaiveDate>,
    #[serde(default)]
    pub warranty: String,
    #[serde(default)]
    pub last_service_date: Option<NaiveDate>,
    #[serde(default)]
    pub next_service_date: Option<NaiveDate>,
    #[serde(default)]
    pub capacity: String,
    #[serde(default)]
    pub reg_no: String,
    #[serde(default)]
    pub id_no: String,
}

impl MachineInput {
    pub fn into_machine(self) -> Result<Machine, ModelError> {
        let model = crate::required("model", &self.model)?;
        if let (Some(last), Some(next)) = (self.last_service_date, self.next_service_date) {
            if next < last {
                return Err(ModelError::Validation(
                    "nextServiceDate must not be before lastServiceDate".into(),
                ));
            }
        }
        Ok(Machine {
            id: String::new(),
            customer_id: crate::optional_ref(self.customer_id),
            model,
            serial_number: self.serial_number.trim().to_string(),
            installed_date: self.installed_date,
            warranty: self.warranty.trim().to_string(),
            last_service_date: self.last_service_date,
            next_service_date: self.next_service_date,
            capacity: self.capacity.trim().to_string(),
            reg_no: self.reg_no.trim().to_string(),
            id_no: self.id_no.trim().to_string(),
        })
    }
}
