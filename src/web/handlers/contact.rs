//! Contact form handler.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::contact::ContactService;
use crate::web::dto::{ContactRequest, ContactResponse, ValidatedJson};
use crate::web::error::ApiError;

/// Fixed body returned when both notifications were dispatched.
const SENT_MESSAGE: &str = "Correo(s) enviado(s) con éxito";

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Notification dispatch service.
    pub contact: Arc<ContactService>,
}

/// POST /contact/ - validate a submission and dispatch both notifications.
///
/// The rate-limit gate has already run as a route layer; validation
/// happens in the extractor. Send failures map to a 500 carrying the
/// transport detail under a fixed prefix.
pub async fn submit_contact(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<ContactRequest>,
) -> Result<(StatusCode, Json<ContactResponse>), ApiError> {
    let submission = request.into_submission();

    state.contact.submit(&submission).await.map_err(|e| {
        tracing::error!(error = %e, "contact dispatch failed");
        ApiError::send_failed(e.to_string())
    })?;

    Ok((
        StatusCode::CREATED,
        Json(ContactResponse {
            message: SENT_MESSAGE.to_string(),
        }),
    ))
}
