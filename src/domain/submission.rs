/// The name/email/message triple captured from the contact form.
///
/// A submission is transient: drafted on the client, consumed by a single
/// handler invocation and then discarded. Newlines in `message` are
/// meaningful and must survive until the email body is rendered.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl Submission {
    /// The browser equivalent is the `required` attribute on every field:
    /// a draft only ever leaves the form once all three are filled in.
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.email.is_empty() && !self.message.is_empty()
    }
}
