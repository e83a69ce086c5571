//! OpenAPI document served under `/api-docs/openapi.json` and rendered at `/docs`.
//!
//! The schema structs mirror the JSON shapes of the `models` types; they exist
//! only for documentation.

use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct LoginRequest { pub username: String, pub password: String }

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct ResetPasswordRequest { pub username: String, pub current_password: String, pub new_password: String }

#[derive(ToSchema)]
pub struct TestEmailRequest { pub to: String }

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct CustomerInputDoc {
    pub customer_name: String,
    pub address: Option<String>,
    pub location: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct CustomerDoc {
    pub id: String,
    pub customer_name: String,
    pub address: String,
    pub location: String,
    pub phone: String,
    pub email: String,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct MachineInputDoc {
    pub customer_id: Option<String>,
    pub model: String,
    pub serial_number: Option<String>,
    /// YYYY-MM-DD
    pub installed_date: Option<String>,
    pub warranty: Option<String>,
    pub last_service_date: Option<String>,
    pub next_service_date: Option<String>,
    pub capacity: Option<String>,
    pub reg_no: Option<String>,
    pub id_no: Option<String>,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct MachineDoc {
    pub id: String,
    pub customer_id: Option<String>,
    pub model: String,
    pub serial_number: String,
    pub installed_date: Option<String>,
    pub warranty: String,
    pub last_service_date: Option<String>,
    pub next_service_date: Option<String>,
    pub capacity: String,
    pub reg_no: String,
    pub id_no: String,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct ServiceRecordInputDoc {
    pub customer_id: String,
    pub machine_id: String,
    /// YYYY-MM-DD
    pub service_date: String,
    pub next_service_date: Option<String>,
    pub technician_name: Option<String>,
    pub remarks: Option<String>,
    /// Non-negative decimal, as a number or a string.
    pub service_cost: Option<String>,
    pub visit_no: Option<u32>,
    pub invoice_no: Option<String>,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct ServiceRecordDoc {
    pub id: String,
    pub customer_id: String,
    pub machine_id: String,
    pub service_date: String,
    pub next_service_date: Option<String>,
    pub technician_name: String,
    pub remarks: String,
    pub service_cost: String,
    pub visit_no: u32,
    pub invoice_no: String,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct ReportRowDoc {
    pub date: String,
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

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::login,
        crate::routes::auth::reset_password,
        crate::routes::customers::list,
        crate::routes::customers::create,
        crate::routes::customers::get,
        crate::routes::customers::update,
        crate::routes::customers::delete,
        crate::routes::machines::list,
        crate::routes::machines::create,
        crate::routes::machines::get,
        crate::routes::machines::by_customer,
        crate::routes::machines::update,
        crate::routes::machines::delete,
        crate::routes::service_records::list,
        crate::routes::service_records::create,
        crate::routes::service_records::get,
        crate::routes::service_records::by_customer,
        crate::routes::service_records::by_machine,
        crate::routes::service_records::update,
        crate::routes::service_records::delete,
        crate::routes::service_records::report,
        crate::routes::reminders::due,
        crate::routes::reminders::run,
        crate::routes::email::send_test,
    ),
    components(
        schemas(
            HealthResponse,
            LoginRequest,
            ResetPasswordRequest,
            TestEmailRequest,
            CustomerInputDoc,
            CustomerDoc,
            MachineInputDoc,
            MachineDoc,
            ServiceRecordInputDoc,
            ServiceRecordDoc,
            ReportRowDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "customers"),
        (name = "machines"),
        (name = "service-records"),
        (name = "reminders"),
        (name = "email")
    )
)]
pub struct ApiDoc;
