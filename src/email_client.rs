use reqwest::Client;
use secrecy::{ExposeSecret, Secret};

use crate::configuration::EmailSettings;

/// HTTP client for the email-sending API.
///
/// The API takes one JSON request per email: `from`, `to` (a one-element
/// list), `subject` and `html`, authenticated with a bearer token.
pub struct EmailClient {
    http_client: Client,
    base_url: String,
    api_key: Option<Secret<String>>,
}

#[derive(thiserror::Error, Debug)]
pub enum SendEmailError {
    // Checked before anything goes on the wire.
    #[error("RESEND_API_KEY is not configured")]
    MissingApiKey,
    #[error("Failed to execute the send request")]
    Transport(#[from] reqwest::Error),
    // The raw body is carried here so it ends up in the logs through the
    // error chain; it must never reach the caller of the HTTP endpoint.
    #[error("The email API returned {status}: {body}")]
    Rejected {
        status: reqwest::StatusCode,
        body: String,
    },
}

impl EmailClient {
    pub fn from_settings(settings: &EmailSettings) -> Self {
        let http_client = Client::builder()
            .timeout(settings.timeout())
            .build()
            .expect("Failed to build the HTTP client for the email API");

        Self {
            http_client,
            base_url: settings.base_url.clone(),
            api_key: settings.api_key.clone(),
        }
    }

    pub async fn send_email(
        &self,
        from: &str,
        recipient: &str,
        subject: &str,
        html_body: &str,
    ) -> Result<(), SendEmailError> {
        let api_key = self.api_key.as_ref().ok_or(SendEmailError::MissingApiKey)?;

        let url = format!("{}/emails", self.base_url);
        let request_body = SendEmailRequest {
            from,
            to: vec![recipient],
            subject,
            html: html_body,
        };

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(api_key.expose_secret())
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SendEmailError::Rejected { status, body });
        }

        Ok(())
    }
}

#[derive(serde::Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    subject: &'a str,
    html: &'a str,
}
