//! Response DTOs for the contact API.

use serde::Serialize;

/// Success response for a dispatched submission.
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    /// Fixed confirmation message.
    pub message: String,
}
