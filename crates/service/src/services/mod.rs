//! CRUD services over the document store.
//!
//! Input is validated by the `models` input types before it reaches the
//! store; unknown ids surface as `ServiceError::NotFound`.

pub mod customer_service;
pub mod machine_service;
pub mod service_record_service;

pub use customer_service::CustomerService;
pub use machine_service::MachineService;
pub use service_record_service::ServiceRecordService;
