//! Request DTOs for the contact API.

use serde::Deserialize;
use validator::Validate;

use crate::contact::ContactSubmission;

use super::validation::text_field;

/// Contact form submission payload.
///
/// Fields are optional at the serde level so a missing field is reported
/// in the validation map rather than failing the parse outright.
#[derive(Debug, Deserialize, Validate)]
pub struct ContactRequest {
    /// First name.
    #[serde(default)]
    #[validate(
        required(message = "This field is required."),
        custom(function = "text_field")
    )]
    pub name: Option<String>,
    /// Last name.
    #[serde(default)]
    #[validate(
        required(message = "This field is required."),
        custom(function = "text_field")
    )]
    pub apellido: Option<String>,
    /// Sender email address.
    #[serde(default)]
    #[validate(
        required(message = "This field is required."),
        email(message = "Enter a valid email address.")
    )]
    pub email: Option<String>,
    /// Phone number.
    #[serde(default)]
    #[validate(
        required(message = "This field is required."),
        custom(function = "text_field")
    )]
    pub phone: Option<String>,
    /// Message body.
    #[serde(default)]
    #[validate(
        required(message = "This field is required."),
        custom(function = "text_field")
    )]
    pub message: Option<String>,
}

impl ContactRequest {
    /// Convert a validated request into a submission.
    ///
    /// Call only after `validate()` passed; absent fields fold to empty
    /// strings rather than panicking.
    pub fn into_submission(self) -> ContactSubmission {
        ContactSubmission {
            name: self.name.unwrap_or_default(),
            apellido: self.apellido.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            phone: self.phone.unwrap_or_default(),
            message: self.message.unwrap_or_default(),
        }
    }
}
