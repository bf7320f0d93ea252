//! Contact form on the marketing site.

#[cfg(test)]
#[path = "contact_test.rs"]
mod contact_test;

use crate::net::ApiClient;
use crate::net::error::describe;
use crate::net::types::ContactRequest;

pub const SEND_FAILED: &str = "Failed to send message";
pub const NAME_REQUIRED: &str = "Please enter your name.";
pub const EMAIL_INVALID: &str = "Please enter a valid email address.";
pub const MESSAGE_REQUIRED: &str = "Please enter a message.";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ContactStatus {
    #[default]
    Idle,
    Sending,
    Sent,
    Failed(String),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub product: String,
    pub message: String,
    pub status: ContactStatus,
}

impl ContactForm {
    /// Trimmed request, or the first validation message. `product` is optional.
    ///
    /// # Errors
    ///
    /// Returns a user-facing message naming the first missing field.
    pub fn validate(&self) -> Result<ContactRequest, &'static str> {
        let name = self.name.trim();
        let email = self.email.trim();
        let message = self.message.trim();
        if name.is_empty() {
            return Err(NAME_REQUIRED);
        }
        if !email.contains('@') {
            return Err(EMAIL_INVALID);
        }
        if message.is_empty() {
            return Err(MESSAGE_REQUIRED);
        }
        Ok(ContactRequest {
            name: name.to_owned(),
            email: email.to_owned(),
            product: self.product.trim().to_owned(),
            message: message.to_owned(),
        })
    }

    /// Validate and post the form. Fields are cleared only on success.
    pub async fn submit(&mut self, api: &ApiClient) -> &ContactStatus {
        let request = match self.validate() {
            Ok(request) => request,
            Err(message) => {
                self.status = ContactStatus::Failed(message.to_owned());
                return &self.status;
            }
        };

        self.status = ContactStatus::Sending;
        self.status = match api.send_contact(&request).await {
            Ok(_) => {
                tracing::info!("contact message sent");
                self.name.clear();
                self.email.clear();
                self.product.clear();
                self.message.clear();
                ContactStatus::Sent
            }
            Err(err) => {
                tracing::warn!(code = err.error_code(), error = %err, "contact message failed");
                ContactStatus::Failed(describe(&err, SEND_FAILED))
            }
        };
        &self.status
    }
}
