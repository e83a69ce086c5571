use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One line of the daily service report, flattened from a
/// service record, its customer and its machine.
///
/// Columns the join could not resolve are empty strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    pub date: NaiveDate,
    pub no: u32,
    pub invoice_no: String,
    pub name_and_address: String,
    pub location: String,
    pub tel: String,
    pub model: String,
    pub serial_no: String,
    pub cap: String,
    pub reg_no: String,
    pub id_no: String,
    pub serviced_by: String,
}
