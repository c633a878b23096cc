use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use htmlescape::encode_minimal;

use crate::configuration::EmailSettings;
use crate::domain::Submission;
use crate::email_client::{EmailClient, SendEmailError};

// The form is served from another origin, so every response (pre-flight
// included) must carry these headers or the browser discards it.
const CORS_ALLOW_ORIGIN: (&str, &str) = ("Access-Control-Allow-Origin", "*");
const CORS_ALLOW_HEADERS: (&str, &str) = (
    "Access-Control-Allow-Headers",
    "authorization, x-client-info, apikey, content-type",
);

#[derive(serde::Serialize)]
struct SuccessBody {
    success: bool,
}

#[derive(serde::Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(thiserror::Error)]
pub enum ContactError {
    #[error("RESEND_API_KEY is not configured")]
    MissingApiKey,
    // Deliberately vague: the caller gets this message, the raw email API
    // response only shows up in the logs through the source chain.
    #[error("Failed to send notification email")]
    OwnerNotification(#[source] SendEmailError),
}

impl std::fmt::Debug for ContactError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for ContactError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(CORS_ALLOW_ORIGIN)
            .insert_header(CORS_ALLOW_HEADERS)
            .json(ErrorBody {
                error: self.to_string(),
            })
    }
}

/// Answers the browser's cross-origin pre-flight. It never reaches the
/// delivery logic.
pub async fn contact_preflight() -> HttpResponse {
    HttpResponse::Ok()
        .insert_header(CORS_ALLOW_ORIGIN)
        .insert_header(CORS_ALLOW_HEADERS)
        .finish()
}

/// Turns a submission into two outbound emails: a mandatory notification to
/// the site owner and a best-effort acknowledgement to the sender.
#[tracing::instrument(
    name = "Handling a contact form submission",
    skip(submission, email_client, settings),
    fields(
        sender_name = %submission.name,
        sender_email = %submission.email
    )
)]
pub async fn send_contact_email(
    submission: web::Json<Submission>,
    email_client: web::Data<EmailClient>,
    settings: web::Data<EmailSettings>,
) -> Result<HttpResponse, ContactError> {
    let submission = submission.into_inner();

    // Owner notification first. A missed lead fails the whole request; a
    // missed courtesy reply below does not.
    tracing::info!("Sending notification email to {}", settings.owner_address);
    email_client
        .send_email(
            &settings.notification_from,
            &settings.owner_address,
            &format!("New Portfolio Message from {}", submission.name),
            &owner_notification_html(&submission),
        )
        .await
        .map_err(|error| match error {
            SendEmailError::MissingApiKey => ContactError::MissingApiKey,
            other => ContactError::OwnerNotification(other),
        })?;
    tracing::info!("Notification email sent successfully");

    tracing::info!("Sending confirmation email to {}", submission.email);
    match email_client
        .send_email(
            &settings.acknowledgement_from,
            &submission.email,
            "Thanks for reaching out!",
            &acknowledgement_html(&submission.name),
        )
        .await
    {
        Ok(()) => tracing::info!("Confirmation email sent successfully"),
        Err(error) => {
            // The lead is already captured, so the request still succeeds.
            tracing::error!(error.cause_chain = ?error, "Failed to send confirmation email");
        }
    }

    Ok(HttpResponse::Ok()
        .insert_header(CORS_ALLOW_ORIGIN)
        .insert_header(CORS_ALLOW_HEADERS)
        .json(SuccessBody { success: true }))
}

// Field values are interpolated as plain text: escape them first, then turn
// the message's newlines into `<br>` so multi-line messages keep their shape.
fn owner_notification_html(submission: &Submission) -> String {
    let name = encode_minimal(&submission.name);
    let email = encode_minimal(&submission.email);
    let message = encode_minimal(&submission.message).replace('\n', "<br>");
    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
  <h2 style="color: #8B5CF6;">New Contact Form Submission</h2>
  <div style="background: #1a1a2e; padding: 20px; border-radius: 10px; color: #fff;">
    <p><strong style="color: #8B5CF6;">Name:</strong> {name}</p>
    <p><strong style="color: #8B5CF6;">Email:</strong> {email}</p>
    <p><strong style="color: #8B5CF6;">Message:</strong></p>
    <p style="background: rgba(139, 92, 246, 0.1); padding: 15px; border-radius: 8px; border-left: 3px solid #8B5CF6;">{message}</p>
  </div>
  <p style="color: #666; font-size: 12px; margin-top: 20px;">This message was sent from your portfolio contact form.</p>
</div>"#
    )
}

fn acknowledgement_html(name: &str) -> String {
    let name = encode_minimal(name);
    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
  <h2 style="color: #8B5CF6;">Hi {name}!</h2>
  <p>Thank you for getting in touch. I've received your message and will get back to you as soon as possible.</p>
  <p>In the meantime, feel free to check out my work on <a href="https://github.com/Prateek-com" style="color: #8B5CF6;">GitHub</a>.</p>
  <br>
  <p>Best regards,</p>
  <p><strong style="color: #8B5CF6;">Prateek Chaudhary</strong></p>
</div>"#
    )
}

pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}
