use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::document::{Document, Lookup};
use crate::errors::ModelError;

/// One service/calibration visit.
///
/// Both foreign keys are advisory; nothing guarantees the customer or machine
/// still exists when the record is read back.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRecord {
    #[serde(default)]
    pub id: String,
    pub customer_id: String,
    pub machine_id: String,
    pub service_date: NaiveDate,
    #[serde(default)]
    pub next_service_date: Option<NaiveDate>,
    #[serde(default)]
    pub technician_name: String,
    #[serde(default)]
    pub remarks: String,
    #[serde(default)]
    pub service_cost: Decimal,
    #[serde(default)]
    pub visit_no: u32,
    #[serde(default)]
    pub invoice_no: String,
}

impl Document for ServiceRecord {
    const COLLECTION: &'static str = "service_records";
    const KIND: &'static str = "service record";

    fn id(&self) -> &str { &self.id }
    fn set_id(&mut self, id: String) { self.id = id; }

    fn matches(&self, lookup: &Lookup) -> bool {
        match lookup {
            Lookup::CustomerId(id) => self.customer_id == *id,
            Lookup::MachineId(id) => self.machine_id == *id,
            Lookup::ServiceDate(d) => self.service_date == *d,
            Lookup::NextServiceDate(d) => self.next_service_date == Some(*d),
            Lookup::Username(_) => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRecordInput {
    pub customer_id: String,
    pub machine_id: String,
    pub service_date: NaiveDate,
    #[serde(default)]
    pub next_service_date: Option<NaiveDate>,
    #[serde(default)]
    pub technician_name: String,
    #[serde(default)]
    pub remarks: String,
    #[serde(default)]
    pub service_cost: Decimal,
    #[serde(default)]
    pub visit_no: u32,
    #[serde(default)]
    pub invoice_no: String,
}

impl ServiceRecordInput {
    pub fn into_record(self) -> Result<ServiceRecord, ModelError> {
        let customer_id = crate::required("customerId", &self.customer_id)?;
        let machine_id = crate::required("machineId", &self.machine_id)?;
        if self.service_cost < Decimal::ZERO {
            return Err(ModelError::Validation("serviceCost must not be negative".into()));
        }
        if let Some(next) = self.next_service_date {
            if next < self.service_date {
                return Err(ModelError::Validation(
                    "nextServiceDate must not be before serviceDate".into(),
                ));
            }
        }
        Ok(ServiceRecord {
            id: String::new(),
            customer_id,
            machine_id,
            service_date: self.service_date,
            next_service_date: self.next_service_date,
            technician_name: self.technician_name.trim().to_string(),
            remarks: self.remarks.trim().to_string(),
            service_cost: self.service_cost,
            visit_no: self.visit_no,
            invoice_no: self.invoice_no.trim().to_string(),
        })
    }
}
