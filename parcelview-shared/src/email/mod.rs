/// Invitation email delivery
///
/// Sends transactional email through a provider's HTTP API. Delivery is a
/// side effect of invitation creation: a failure must not fail the HTTP
/// request that triggered it, but it must be reported: the route layer
/// logs a warning and includes one in the response body instead of
/// pretending the email went out.
///
/// # Example
///
/// ```no_run
/// use parcelview_shared::email::{EmailClient, EmailConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = EmailClient::new(EmailConfig {
///     api_url: "https://api.resend.com/emails".to_string(),
///     api_key: std::env::var("EMAIL_API_KEY")?,
///     from_address: "invites@parcelview.dev".to_string(),
///     signup_base_url: "https://app.parcelview.dev/signup".to_string(),
/// });
///
/// client
///     .send_invitation("new@x.com", "pvi_abc123", "Harborline Capital")
///     .await?;
/// # Ok(())
/// # }
/// ```

use serde_json::json;
use tracing::{debug, warn};

/// Error type for email delivery
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// The HTTP request to the provider failed
    #[error("Email request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The provider rejected the send
    #[error("Email provider returned {status}: {body}")]
    ProviderRejected { status: u16, body: String },
}

/// Email provider configuration
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// Provider endpoint for sending, e.g. "https://api.resend.com/emails"
    pub api_url: String,

    /// Provider API key (bearer token)
    pub api_key: String,

    /// From address for outgoing mail
    pub from_address: String,

    /// Base URL of the signup page; the token is appended as a query param
    pub signup_base_url: String,
}

/// HTTP client for the email provider
#[derive(Debug, Clone)]
pub struct EmailClient {
    http: reqwest::Client,
    config: EmailConfig,
}

impl EmailClient {
    /// Creates a new email client
    pub fn new(config: EmailConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Sends an invitation email with the single-use signup link
    ///
    /// The plaintext token appears only here; everywhere else the system
    /// works with its hash.
    ///
    /// # Errors
    ///
    /// Returns an error when the provider is unreachable or rejects the
    /// send. Callers treat this as a reportable warning, not a failure of
    /// the invitation itself.
    pub async fn send_invitation(
        &self,
        to: &str,
        token: &str,
        company_name: &str,
    ) -> Result<(), EmailError> {
        let signup_link = format!("{}?token={}", self.config.signup_base_url, token);

        let body = json!({
            "from": self.config.from_address,
            "to": [to],
            "subject": format!("You're invited to join {} on Parcelview", company_name),
            "html": format!(
                "<p>You've been invited to join <strong>{}</strong> on Parcelview.</p>\
                 <p><a href=\"{}\">Accept your invitation</a></p>\
                 <p>This link expires in 7 days.</p>",
                company_name, signup_link,
            ),
        });

        debug!(to, "Sending invitation email");

        let response = self
            .http
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(to, status = status.as_u16(), "Email provider rejected send");
            return Err(EmailError::ProviderRejected {
                status: status.as_u16(),
                body,
            });
        }

        debug!(to, "Invitation email accepted by provider");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_construction() {
        let client = EmailClient::new(EmailConfig {
            api_url: "https://api.example.com/emails".to_string(),
            api_key: "key".to_string(),
            from_address: "invites@parcelview.dev".to_string(),
            signup_base_url: "https://app.parcelview.dev/signup".to_string(),
        });

        assert_eq!(client.config.from_address, "invites@parcelview.dev");
    }
}
