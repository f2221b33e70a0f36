//! Spoken reminder pipeline
//!
//! Turns urgent tasks into reminder text (generated remotely when a
//! backend is configured, deterministic template otherwise) and drives
//! the utterance player one task at a time.

use std::sync::Arc;
use std::time::Duration;

use crate::models::UrgentTask;
use crate::services::generator::ReminderGenerator;
use crate::services::speech::{SpeechError, UtterancePlayer};

/// Deadline phrase for a task due today
pub const PHRASE_DUE_TODAY: &str = "今日が期限です。";

/// Deadline phrase for a task past its deadline
pub const PHRASE_OVERDUE: &str = "期限が過ぎています。";

pub struct Notifier {
    player: Arc<dyn UtterancePlayer>,
    generator: Option<ReminderGenerator>,
    pause: Duration,
}

impl Notifier {
    pub fn new(
        player: Arc<dyn UtterancePlayer>,
        generator: Option<ReminderGenerator>,
        pause: Duration,
    ) -> Self {
        Self {
            player,
            generator,
            pause,
        }
    }

    /// Builds the reminder text: generated when a backend is configured
    /// and answers in time, template otherwise
    async fn message_for(&self, task: &UrgentTask) -> String {
        if let Some(generator) = &self.generator {
            if let Some(message) = generator.generate(task).await {
                return message;
            }
        }
        fallback_message(task)
    }

    /// Speaks one reminder, suspending until playback finishes or fails
    pub async fn announce(&self, task: &UrgentTask) -> Result<(), SpeechError> {
        let text = self.message_for(task).await;
        tracing::info!("📢 {} ({})", task.name, task.priority.label());
        self.player.speak(&text).await
    }

    /// Speaks reminders strictly in the order given, one at a time, with
    /// a pause between utterances so the previous audio tail clears.
    /// A failed utterance does not stop the batch; returns how many failed.
    pub async fn announce_all(&self, tasks: &[UrgentTask]) -> usize {
        let mut failed = 0;

        for (index, task) in tasks.iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(self.pause).await;
            }
            if let Err(e) = self.announce(task).await {
                tracing::warn!("utterance for '{}' failed, continuing: {}", task.name, e);
                failed += 1;
            }
        }

        failed
    }
}

/// "<board> — <name>, <deadline phrase>", with the board segment omitted
/// when the origin board is unknown
pub fn fallback_message(task: &UrgentTask) -> String {
    let phrase = if task.overdue {
        PHRASE_OVERDUE
    } else {
        PHRASE_DUE_TODAY
    };

    match &task.board_name {
        Some(board) => format!("{} — {}, {}", board, task.name, phrase),
        None => format!("{}, {}", task.name, phrase),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClaudeSettings;
    use crate::models::PriorityLevel;
    use async_trait::async_trait;
    use httpmock::prelude::*;
    use std::sync::Mutex;

    /// Records spoken texts; fails on texts listed in `failing`
    #[derive(Default)]
    struct RecordingPlayer {
        spoken: Mutex<Vec<String>>,
        failing: Vec<String>,
    }

    #[async_trait]
    impl UtterancePlayer for RecordingPlayer {
        async fn speak(&self, text: &str) -> Result<(), SpeechError> {
            self.spoken.lock().unwrap().push(text.to_string());
            if self.failing.iter().any(|f| text.contains(f)) {
                return Err(SpeechError::Playback("synthesis interrupted".to_string()));
            }
            Ok(())
        }
    }

    fn urgent(name: &str, board: Option<&str>, overdue: bool) -> UrgentTask {
        UrgentTask {
            id: name.to_string(),
            name: name.to_string(),
            board_name: board.map(|b| b.to_string()),
            priority: PriorityLevel::High,
            overdue,
        }
    }

    #[test]
    fn test_fallback_message_due_today() {
        let message = fallback_message(&urgent("Ship deck", Some("Launch"), false));
        assert_eq!(message, "Launch — Ship deck, 今日が期限です。");
    }

    #[test]
    fn test_fallback_message_overdue() {
        let message = fallback_message(&urgent("Ship deck", Some("Launch"), true));
        assert_eq!(message, "Launch — Ship deck, 期限が過ぎています。");
    }

    #[test]
    fn test_fallback_message_without_board() {
        let message = fallback_message(&urgent("Ship deck", None, false));
        assert_eq!(message, "Ship deck, 今日が期限です。");
    }

    #[tokio::test]
    async fn test_announce_all_keeps_input_order() {
        let player = Arc::new(RecordingPlayer::default());
        let notifier = Notifier::new(player.clone(), None, Duration::from_millis(1));

        let tasks = vec![
            urgent("first", Some("A"), false),
            urgent("second", Some("B"), true),
            urgent("third", None, false),
        ];
        let failed = notifier.announce_all(&tasks).await;

        assert_eq!(failed, 0);
        let spoken = player.spoken.lock().unwrap();
        assert_eq!(
            *spoken,
            vec![
                "A — first, 今日が期限です。".to_string(),
                "B — second, 期限が過ぎています。".to_string(),
                "third, 今日が期限です。".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_utterance_does_not_stop_the_batch() {
        let player = Arc::new(RecordingPlayer {
            spoken: Mutex::new(Vec::new()),
            failing: vec!["second".to_string()],
        });
        let notifier = Notifier::new(player.clone(), None, Duration::from_millis(1));

        let tasks = vec![
            urgent("first", None, false),
            urgent("second", None, false),
            urgent("third", None, false),
        ];
        let failed = notifier.announce_all(&tasks).await;

        assert_eq!(failed, 1);
        assert_eq!(player.spoken.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_generated_message_is_preferred() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/claude");
                then.status(200)
                    .json_body(serde_json::json!({ "message": "Launchの資料、今日中ですよ！" }));
            })
            .await;

        let generator = ReminderGenerator::new(&ClaudeSettings {
            enabled: true,
            endpoint: server.url("/api/claude"),
            api_key: None,
            timeout_seconds: 5,
        });

        let player = Arc::new(RecordingPlayer::default());
        let notifier = Notifier::new(player.clone(), generator, Duration::from_millis(1));

        notifier
            .announce(&urgent("Ship deck", Some("Launch"), false))
            .await
            .unwrap();

        let spoken = player.spoken.lock().unwrap();
        assert_eq!(*spoken, vec!["Launchの資料、今日中ですよ！".to_string()]);
    }

    #[tokio::test]
    async fn test_generation_timeout_falls_back_to_template() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/claude");
                then.status(200)
                    .delay(Duration::from_millis(1500))
                    .json_body(serde_json::json!({ "message": "too late" }));
            })
            .await;

        let generator = ReminderGenerator::new(&ClaudeSettings {
            enabled: true,
            endpoint: server.url("/api/claude"),
            api_key: None,
            timeout_seconds: 1,
        });

        let player = Arc::new(RecordingPlayer::default());
        let notifier = Notifier::new(player.clone(), generator, Duration::from_millis(1));

        notifier
            .announce(&urgent("Ship deck", Some("Launch"), false))
            .await
            .unwrap();

        let spoken = player.spoken.lock().unwrap();
        assert_eq!(*spoken, vec!["Launch — Ship deck, 今日が期限です。".to_string()]);
    }
}
