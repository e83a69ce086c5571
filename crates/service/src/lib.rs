//! Service layer for the weighbridge service backend.
//! - CRUD services over a generic document store.
//! - The reminder/report engine joining service records with customers and machines.
//! - Outbound notifications, the daily scheduler and admin authentication.

pub mod errors;
pub mod storage;
pub mod services;
pub mod engine;
pub mod notify;
pub mod scheduler;
pub mod auth;
pub mod metrics;
pub mod runtime;
