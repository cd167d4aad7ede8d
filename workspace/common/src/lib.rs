//! Domain rules and transport types shared between the API service and
//! the typed client. The intake submission shape lives here because both
//! sides speak it, and because its derived values (humidity fallback,
//! allergic index) belong to the submission itself rather than to any
//! single handler.

mod districts;
mod intake;

pub use districts::{DISTRICT_HUMIDITY, humidity_for_district, resolve_humidity};
pub use intake::{HIGH_RISK_PET_TYPE, IntakeSubmission, allergic_index};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Response wrapper for the listing endpoints: `{success, data}`. Shared
/// so the service builds it and the typed client unwraps it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}
