//! Webhook delivery of watchdog alerts.
//!
//! Alerts go out as Discord-style embeds. The async client is wrapped by
//! a blocking client owning its own current-thread runtime so the main
//! loop can stay synchronous.

use crate::alert::{AlertDetails, AlertType};
use serde::Serialize;
use thiserror::Error;

/// Marker every valid webhook URL must carry.
const WEBHOOK_URL_MARKER: &str = "discord.com/api/webhooks";

/// Check that a URL points at a webhook endpoint.
pub fn is_valid_webhook_url(url: &str) -> bool {
    let url = url.trim();
    !url.is_empty() && url.contains(WEBHOOK_URL_MARKER)
}

/// Notifier error types.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Notifier config error: {0}")]
    Config(String),

    #[error("Notifier network error: {0}")]
    Network(String),

    #[error("Webhook server error ({status}): {message}")]
    Server { status: u16, message: String },
}

/// Webhook request body.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookPayload {
    pub embeds: Vec<Embed>,
}

/// One embed card in the webhook body.
#[derive(Debug, Clone, Serialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
    /// RFC 3339 timestamp
    pub timestamp: String,
    pub fields: Vec<EmbedField>,
}

/// Name/value pair rendered inside an embed.
#[derive(Debug, Clone, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

fn alert_color(alert_type: AlertType) -> u32 {
    match alert_type {
        AlertType::Phone => 0xFF6B6B,
        AlertType::Sleep => 0xFFD93D,
        AlertType::Inactive => 0x6BCB77,
        AlertType::Process => 0xFF8C42,
        AlertType::General => 0x4A90D9,
        AlertType::Start => 0x4CAF50,
        AlertType::Stop => 0x4A90D9,
        AlertType::ForcedStop => 0xF44336,
    }
}

fn alert_title(alert_type: AlertType) -> &'static str {
    match alert_type {
        AlertType::Phone => "Phone Detected!",
        AlertType::Sleep => "Sleep Detected!",
        AlertType::Inactive => "User Inactive!",
        AlertType::Process => "Suspicious Process!",
        AlertType::General => "Distraction Detected!",
        AlertType::Start => "Surveillance Started",
        AlertType::Stop => "Surveillance Stopped",
        AlertType::ForcedStop => "Surveillance Forcefully Stopped!",
    }
}

fn alert_type_label(alert_type: AlertType) -> &'static str {
    match alert_type {
        AlertType::Phone => "Phone Detection",
        AlertType::Sleep => "Sleep Detection",
        AlertType::Inactive => "Inactivity",
        AlertType::Process => "Suspicious Process",
        AlertType::General => "Distraction Alert",
        AlertType::Start => "Surveillance Start",
        AlertType::Stop => "Surveillance Stop",
        AlertType::ForcedStop => "Forced Termination",
    }
}

/// Build the webhook body for an alert.
pub fn build_payload(alert: &AlertDetails, source_id: &str) -> WebhookPayload {
    WebhookPayload {
        embeds: vec![Embed {
            title: alert_title(alert.alert_type).to_string(),
            description: alert.message.clone(),
            color: alert_color(alert.alert_type),
            timestamp: alert.timestamp.to_rfc3339(),
            fields: vec![
                EmbedField {
                    name: "Time".to_string(),
                    value: alert.timestamp.format("%H:%M:%S UTC").to_string(),
                    inline: true,
                },
                EmbedField {
                    name: "Type".to_string(),
                    value: alert_type_label(alert.alert_type).to_string(),
                    inline: true,
                },
                EmbedField {
                    name: "Source".to_string(),
                    value: source_id.to_string(),
                    inline: true,
                },
            ],
        }],
    }
}

/// Delivery seam so hosts can swap in a recording notifier in tests.
pub trait Notify {
    /// Deliver an alert; returns whether the endpoint accepted it.
    fn send_alert(&mut self, alert: &AlertDetails) -> Result<bool, NotifyError>;
}

/// Async webhook client.
pub struct WebhookNotifier {
    url: String,
    client: reqwest::Client,
    source_id: String,
}

impl WebhookNotifier {
    /// Create a client for the given webhook URL.
    pub fn new(url: impl Into<String>) -> Result<Self, NotifyError> {
        let url = url.into().trim().to_string();
        if !is_valid_webhook_url(&url) {
            return Err(NotifyError::Config(format!(
                "not a webhook URL (expected {WEBHOOK_URL_MARKER}): {url}"
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| NotifyError::Config(format!("Failed to create HTTP client: {e}")))?;

        // Source ID from hostname + instance
        let hostname = hostname::get()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|_| "unknown".to_string());
        let source_id = format!(
            "watchdog-{}-{}",
            hostname,
            &uuid::Uuid::new_v4().to_string()[..8]
        );

        Ok(Self {
            url,
            client,
            source_id,
        })
    }

    /// Deliver an alert embed.
    pub async fn send_alert(&self, alert: &AlertDetails) -> Result<bool, NotifyError> {
        let payload = build_payload(alert, &self.source_id);
        self.post(&payload).await
    }

    /// Send a fixed test embed to verify the webhook works.
    pub async fn test_connection(&self) -> Result<bool, NotifyError> {
        let payload = WebhookPayload {
            embeds: vec![Embed {
                title: "Test Notification".to_string(),
                description: "Focus watchdog notification test successful!".to_string(),
                color: 0x4CAF50,
                timestamp: chrono::Utc::now().to_rfc3339(),
                fields: Vec::new(),
            }],
        };
        self.post(&payload).await
    }

    async fn post(&self, payload: &WebhookPayload) -> Result<bool, NotifyError> {
        let response = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .await
            .map_err(|e| NotifyError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(NotifyError::Server {
                status: status.as_u16(),
                message,
            });
        }

        Ok(true)
    }

    /// Get the source ID.
    pub fn source_id(&self) -> &str {
        &self.source_id
    }
}

/// Blocking webhook client for use in synchronous contexts.
pub struct BlockingNotifier {
    inner: WebhookNotifier,
    runtime: tokio::runtime::Runtime,
}

impl BlockingNotifier {
    /// Create a new blocking webhook client.
    pub fn new(url: impl Into<String>) -> Result<Self, NotifyError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| NotifyError::Config(format!("Failed to create runtime: {e}")))?;

        Ok(Self {
            inner: WebhookNotifier::new(url)?,
            runtime,
        })
    }

    /// Send a fixed test embed to verify the webhook works.
    pub fn test_connection(&self) -> Result<bool, NotifyError> {
        self.runtime.block_on(self.inner.test_connection())
    }

    /// Get the source ID.
    pub fn source_id(&self) -> &str {
        self.inner.source_id()
    }
}

impl Notify for BlockingNotifier {
    fn send_alert(&mut self, alert: &AlertDetails) -> Result<bool, NotifyError> {
        self.runtime.block_on(self.inner.send_alert(alert))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_webhook_url_validation() {
        assert!(is_valid_webhook_url(
            "https://discord.com/api/webhooks/123/token"
        ));
        assert!(is_valid_webhook_url(
            "  https://discord.com/api/webhooks/123/token  "
        ));
        assert!(!is_valid_webhook_url(""));
        assert!(!is_valid_webhook_url("https://example.com/hook"));
    }

    #[test]
    fn test_invalid_url_rejected_at_construction() {
        assert!(matches!(
            WebhookNotifier::new("https://example.com/hook"),
            Err(NotifyError::Config(_))
        ));
    }

    #[test]
    fn test_payload_shape_for_general_alert() {
        let alert = AlertDetails::new(AlertType::General, "Phone detected in view");
        let payload = build_payload(&alert, "watchdog-host-abcd1234");

        assert_eq!(payload.embeds.len(), 1);
        let embed = &payload.embeds[0];
        assert_eq!(embed.title, "Distraction Detected!");
        assert_eq!(embed.description, "Phone detected in view");
        assert_eq!(embed.color, 0x4A90D9);
        assert_eq!(embed.fields.len(), 3);
        assert_eq!(embed.fields[1].value, "Distraction Alert");
        assert_eq!(embed.fields[2].value, "watchdog-host-abcd1234");
    }

    #[test]
    fn test_colors_follow_alert_type() {
        assert_eq!(alert_color(AlertType::Phone), 0xFF6B6B);
        assert_eq!(alert_color(AlertType::Sleep), 0xFFD93D);
        assert_eq!(alert_color(AlertType::Inactive), 0x6BCB77);
        assert_eq!(alert_color(AlertType::ForcedStop), 0xF44336);
    }

    #[test]
    fn test_alert_type_serializes_snake_case() {
        let alert = AlertDetails::new(AlertType::ForcedStop, "bye");
        let json = serde_json::to_value(&alert).unwrap();
        assert_eq!(json["type"], "forced_stop");
    }
}
