//! Contact submissions and notification dispatch.
//!
//! A validated submission fans out into two emails: a plain-text notice
//! for the administrator and an HTML confirmation for the sender. Both
//! are sent on the request path; either failure surfaces to the caller
//! as one send failure with no partial-success state.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::mail::{Mailer, OutgoingEmail, SendError};
use crate::template::{self, TemplateEngine, TemplateError};

/// Subject of the administrator notice.
const ADMIN_SUBJECT: &str = "Nuevo mensaje de contacto";

/// Subject of the sender confirmation.
const CONFIRMATION_SUBJECT: &str = "Confirmación de recepción de mensaje";

/// Name of the template rendered into the confirmation body.
pub const CONFIRMATION_TEMPLATE: &str = "confirmation_email";

/// Built-in confirmation body used when the templates directory does not
/// provide one.
pub const DEFAULT_CONFIRMATION_TEMPLATE: &str = "\
<html>
  <body>
    <p>Hola {{name}} {{apellido}},</p>
    <p>Hemos recibido tu mensaje y te responderemos lo antes posible.</p>
    <p>Gracias por ponerte en contacto.</p>
  </body>
</html>
";

/// A validated contact-form submission.
///
/// Constructed fresh per request and discarded once both notifications
/// are dispatched. Never persisted.
#[derive(Debug, Clone)]
pub struct ContactSubmission {
    /// First name.
    pub name: String,
    /// Last name.
    pub apellido: String,
    /// Sender email address. Already checked against the email grammar.
    pub email: String,
    /// Phone number.
    pub phone: String,
    /// Message body.
    pub message: String,
}

/// Error raised while dispatching the notification pair.
#[derive(Debug, thiserror::Error)]
pub enum ContactError {
    /// The confirmation template failed to render.
    #[error("{0}")]
    Template(#[from] TemplateError),

    /// A send failed at the transport.
    #[error("{0}")]
    Send(#[from] SendError),
}

/// Composes and dispatches the two notification emails per submission.
pub struct ContactService {
    mailer: Arc<dyn Mailer>,
    templates: Arc<TemplateEngine>,
    admin_address: String,
}

impl ContactService {
    /// Create a new contact service.
    pub fn new(
        mailer: Arc<dyn Mailer>,
        templates: Arc<TemplateEngine>,
        admin_address: String,
    ) -> Self {
        Self {
            mailer,
            templates,
            admin_address,
        }
    }

    /// Plain-text notice carrying the submission verbatim.
    fn admin_notice(&self, submission: &ContactSubmission) -> OutgoingEmail {
        let body = format!(
            "Nombre: {} {}\nEmail: {}\nTeléfono: {}\n\nMensaje:\n{}",
            submission.name,
            submission.apellido,
            submission.email,
            submission.phone,
            submission.message
        );
        OutgoingEmail::text(ADMIN_SUBJECT, body, vec![self.admin_address.clone()])
    }

    /// HTML confirmation addressed to the sender.
    fn sender_confirmation(
        &self,
        submission: &ContactSubmission,
    ) -> Result<OutgoingEmail, ContactError> {
        let mut vars = HashMap::new();
        vars.insert("name".to_string(), template::html_escape(&submission.name));
        vars.insert(
            "apellido".to_string(),
            template::html_escape(&submission.apellido),
        );
        let body = self.templates.render(CONFIRMATION_TEMPLATE, &vars)?;
        Ok(OutgoingEmail::html(
            CONFIRMATION_SUBJECT,
            body,
            vec![submission.email.clone()],
        ))
    }

    /// Send the administrator notice, then the sender confirmation.
    ///
    /// Stops at the first failure. The caller learns only fully-sent or
    /// failed even though two sends occur.
    pub async fn submit(&self, submission: &ContactSubmission) -> Result<(), ContactError> {
        let id = Uuid::new_v4();

        self.mailer.send(&self.admin_notice(submission)).await?;
        info!(submission = %id, to = %self.admin_address, "admin notice sent");

        let confirmation = self.sender_confirmation(submission)?;
        self.mailer.send(&confirmation).await?;
        info!(submission = %id, to = %submission.email, "sender confirmation sent");

        Ok(())
    }
}

/// Load the template engine for confirmation emails.
///
/// Reads the configured directory and falls back to the built-in
/// confirmation template when the directory does not provide one.
pub fn load_templates(path: &str) -> TemplateEngine {
    let mut engine = TemplateEngine::new();

    match engine.load_dir(path) {
        Ok(count) => info!(path, count, "templates loaded"),
        Err(e) => warn!(path, error = %e, "templates directory not loaded"),
    }

    if !engine.has_template(CONFIRMATION_TEMPLATE) {
        warn!(
            "no {CONFIRMATION_TEMPLATE} template found, using the built-in default"
        );
        engine
            .load(CONFIRMATION_TEMPLATE, DEFAULT_CONFIRMATION_TEMPLATE)
            .expect("built-in confirmation template must parse");
    }

    engine
}
