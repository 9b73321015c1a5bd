use crate::config::MailerConfig;
use crate::error::{AppError, AppResult};
use reqwest::Client;
use serde::Serialize;
use serde_json::json;

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionEmailKind {
    Approval,
    Rejection,
}

/// Bridge to the mailer service that renders and delivers the actual emails.
/// The wire contract is `{type, email, data}`; delivery is fire-and-forget
/// and failures are logged, never returned to the caller.
#[derive(Clone)]
pub struct MailerService {
    client: Client,
    config: MailerConfig,
}

impl MailerService {
    pub fn new(config: MailerConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.config.endpoint.is_empty()
    }

    /// Send a payment-decision email. Spawns the request and returns
    /// immediately; the payment flow never waits on the mailer.
    pub fn send_decision_email(
        &self,
        kind: DecisionEmailKind,
        email: &str,
        data: serde_json::Value,
    ) {
        if !self.is_enabled() {
            log::debug!("Mailer disabled, skipping {kind:?} email to {email}");
            return;
        }

        let client = self.client.clone();
        let endpoint = self.config.endpoint.clone();
        let email = email.to_string();

        tokio::spawn(async move {
            let result = Self::post_email(&client, &endpoint, kind, &email, data).await;
            if let Err(e) = result {
                log::error!("Failed to send {kind:?} email to {email}: {e}");
            }
        });
    }

    async fn post_email(
        client: &Client,
        endpoint: &str,
        kind: DecisionEmailKind,
        email: &str,
        data: serde_json::Value,
    ) -> AppResult<()> {
        let response = client
            .post(endpoint)
            .json(&json!({
                "type": kind,
                "email": email,
                "data": data,
            }))
            .send()
            .await?;

        if response.status().is_success() {
            log::info!("Decision email sent: {kind:?} -> {email}");
            Ok(())
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(AppError::ExternalApiError(format!(
                "Mailer rejected request: {error_text}"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mailer_disabled_with_empty_endpoint() {
        let mailer = MailerService::new(MailerConfig {
            endpoint: String::new(),
        });
        assert!(!mailer.is_enabled());
    }

    #[test]
    fn test_decision_kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&DecisionEmailKind::Approval).unwrap(),
            "\"approval\""
        );
        assert_eq!(
            serde_json::to_string(&DecisionEmailKind::Rejection).unwrap(),
            "\"rejection\""
        );
    }
}
