//! Telegram Bot API notification client

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::io::HttpClient;
use crate::notifier::NotificationSink;

/// Subset of the Bot API response envelope
#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Sends messages to one Telegram chat
pub struct TelegramNotifier {
    send_url: String,
    chat_id: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

impl TelegramNotifier {
    pub fn new(api_url: &str, token: &str, chat_id: &str, http: Arc<dyn HttpClient>) -> Self {
        let send_url = format!("{}/bot{}/sendMessage", api_url.trim_end_matches('/'), token);

        tracing::debug!("Created TelegramNotifier for chat {}", chat_id);

        Self {
            send_url,
            chat_id: chat_id.to_string(),
            http,
        }
    }
}

#[async_trait]
impl NotificationSink for TelegramNotifier {
    fn type_name(&self) -> &str {
        "telegram"
    }

    async fn send(&self, message: &str) -> crate::Result<()> {
        let params = [("chat_id", self.chat_id.as_str()), ("text", message)];

        tracing::debug!("Sending Telegram message to chat {}", self.chat_id);

        let response = self
            .http
            .post_form(&self.send_url, &params)
            .await
            .map_err(|e| crate::ReviewError::Delivery(e.to_string()))?;

        if response.status != 200 {
            return Err(crate::ReviewError::Delivery(format!(
                "Telegram API returned status {}: {}",
                response.status, response.body
            )));
        }

        // A 200 without a parseable envelope still counts as delivered.
        if let Ok(parsed) = serde_json::from_str::<TelegramResponse>(&response.body) {
            if !parsed.ok {
                return Err(crate::ReviewError::Delivery(format!(
                    "Telegram API rejected message: {}",
                    parsed.description.unwrap_or_default()
                )));
            }
        }

        tracing::info!("Message sent to Telegram chat {}", self.chat_id);
        Ok(())
    }
}
