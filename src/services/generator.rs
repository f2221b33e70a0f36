//! Remote reminder message generation
//!
//! Calls the Claude proxy with the task attributes under a hard timeout.
//! Every failure here is soft: the caller falls back to its deterministic
//! template, and nothing is surfaced to the user.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::ClaudeSettings;
use crate::models::{PriorityLevel, UrgentTask};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationRequest<'a> {
    board_name: Option<&'a str>,
    task_name: &'a str,
    priority: PriorityLevel,
    is_overdue: bool,
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    message: Option<String>,
}

/// Client for the reminder-generation proxy
#[derive(Clone)]
pub struct ReminderGenerator {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl ReminderGenerator {
    /// Builds the generator from settings; None when disabled or when the
    /// HTTP client cannot be constructed (logged, never fatal)
    pub fn new(settings: &ClaudeSettings) -> Option<Self> {
        if !settings.enabled {
            return None;
        }

        let client = match Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                tracing::error!("failed to create reminder generation client: {}", e);
                return None;
            }
        };

        tracing::info!(
            "reminder generation enabled via {} (timeout {}s)",
            settings.endpoint,
            settings.timeout_seconds
        );

        Some(Self {
            client,
            endpoint: settings.endpoint.clone(),
            api_key: settings.api_key.clone(),
        })
    }

    /// Asks the backend for a short reminder phrase. None on timeout,
    /// non-2xx, or an empty message field.
    pub async fn generate(&self, task: &UrgentTask) -> Option<String> {
        let request = GenerationRequest {
            board_name: task.board_name.as_deref(),
            task_name: &task.name,
            priority: task.priority,
            is_overdue: task.overdue,
        };

        let mut builder = self.client.post(&self.endpoint).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.header("x-api-key", key);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("reminder generation request failed: {}", e);
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::warn!("reminder generation returned status {}", response.status());
            return None;
        }

        let body: GenerationResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("reminder generation response unreadable: {}", e);
                return None;
            }
        };

        body.message
            .map(|message| message.trim().to_string())
            .filter(|message| !message.is_empty())
    }
}
