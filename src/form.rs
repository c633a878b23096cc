use anyhow::Context;

use crate::domain::Submission;

/// Which contact-form field a change event targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Message,
}

/// A non-blocking notification surfaced to the user once a submission
/// settles. The description is always generic copy, never a raw error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub kind: NoticeKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(thiserror::Error, Debug)]
pub enum FormError {
    #[error("a submission is already in flight")]
    SubmissionInFlight,
    #[error("all fields are required")]
    IncompleteDraft,
}

/// Client-side controller for the contact form.
///
/// Owns the draft submission and the busy-state guard; its only remote
/// interaction is one POST to the contact endpoint per accepted submit.
pub struct ContactForm {
    draft: Submission,
    in_flight: bool,
    http_client: reqwest::Client,
    endpoint: String,
}

impl ContactForm {
    pub fn new(endpoint: String) -> Self {
        Self {
            draft: Submission::default(),
            in_flight: false,
            http_client: reqwest::Client::new(),
            endpoint,
        }
    }

    /// Replaces a single field of the draft, leaving the others untouched.
    pub fn update(&mut self, field: Field, value: String) {
        match field {
            Field::Name => self.draft.name = value,
            Field::Email => self.draft.email = value,
            Field::Message => self.draft.message = value,
        }
    }

    pub fn draft(&self) -> &Submission {
        &self.draft
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight
    }

    /// Sends the current draft to the contact endpoint and reports exactly
    /// one outcome.
    ///
    /// While a submission is in flight the control is disabled, so a second
    /// call is rejected rather than queued. A successful submission clears
    /// the draft; a failed one leaves it untouched so nothing the user typed
    /// is lost. There is no automatic retry.
    pub async fn submit(&mut self) -> Result<Notice, FormError> {
        if self.in_flight {
            return Err(FormError::SubmissionInFlight);
        }
        if !self.draft.is_complete() {
            return Err(FormError::IncompleteDraft);
        }

        self.in_flight = true;
        let outcome = self.send().await;
        self.in_flight = false;

        match outcome {
            Ok(()) => {
                self.draft = Submission::default();
                Ok(Notice {
                    title: "Message Sent!".into(),
                    description: "Thanks for reaching out. I'll get back to you soon!".into(),
                    kind: NoticeKind::Success,
                })
            }
            Err(error) => {
                // The diagnostic goes to the logs, never into the notice.
                tracing::error!(error.cause_chain = ?error, "Error sending message");
                Ok(Notice {
                    title: "Error".into(),
                    description: "Failed to send message. Please try again.".into(),
                    kind: NoticeKind::Error,
                })
            }
        }
    }

    async fn send(&self) -> Result<(), anyhow::Error> {
        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&self.draft)
            .send()
            .await
            .context("Failed to reach the contact endpoint")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("the contact endpoint returned {}: {}", status, body);
        }

        Ok(())
    }
}
