//! Admin credential: bootstrap, login, password reset and token verification.

pub mod domain;
pub mod errors;
pub mod service;

pub use service::AdminAuthService;
