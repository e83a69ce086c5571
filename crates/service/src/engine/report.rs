use chrono::NaiveDate;
use models::ReportRow;
use tracing::{info, instrument};

use super::{Engine, Mode, ResolvedVisit};
use crate::errors::ServiceError;
use crate::metrics::REPORT_REQUESTS_TOTAL;

/// Flatten a visit into a report row. An unresolved side leaves its
/// columns empty rather than dropping the row.
pub fn assemble_row(visit: &ResolvedVisit) -> ReportRow {
    let record = &visit.record;
    let (name_and_address, location, tel) = match &visit.customer {
        Some(c) if c.address.is_empty() => (c.customer_name.clone(), c.location.clone(), c.phone.clone()),
        Some(c) => (format!("{}, {}", c.customer_name, c.address), c.location.clone(), c.phone.clone()),
        None => Default::default(),
    };
    let (model, serial_no, cap, reg_no, id_no) = match &visit.machine {
        Some(m) => (
            m.model.clone(),
            m.serial_number.clone(),
            m.capacity.clone(),
            m.reg_no.clone(),
            m.id_no.clone(),
        ),
        None => Default::default(),
    };

    ReportRow {
        date: record.service_date,
        no: record.visit_no,
        invoice_no: record.invoice_no.clone(),
        name_and_address,
        location,
        tel,
        model,
        serial_no,
        cap,
        reg_no,
        id_no,
        serviced_by: record.technician_name.clone(),
    }
}

impl Engine {
    /// One row per record serviced on `date`, ordered by visit number then invoice.
    #[instrument(skip(self))]
    pub async fn daily_report(&self, date: NaiveDate) -> Result<Vec<ReportRow>, ServiceError> {
        let visits = self.resolve(Mode::Report, date).await?;
        let incomplete = visits.iter().filter(|v| !v.is_complete()).count();

        let mut rows: Vec<ReportRow> = visits.iter().map(assemble_row).collect();
        rows.sort_by(|a, b| a.no.cmp(&b.no).then_with(|| a.invoice_no.cmp(&b.invoice_no)));

        REPORT_REQUESTS_TOTAL.inc();
        info!(event = "report_assembled", %date, rows = rows.len(), incomplete, "daily report assembled");
        Ok(rows)
    }
}
