//! Typed client for the Centro Médico del ASMA API: the data layer the
//! role-specific dashboards are built on. Request and response shapes
//! mirror the backend handlers; visual rendering stays out of scope.

pub mod api_client;

pub use api_client::{ApiClient, ClientError};
