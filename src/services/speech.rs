//! Utterance playback seam
//!
//! The actual synthesis capability lives outside this crate (a browser
//! speech engine, an OS voice, a smart speaker bridge). The monitor only
//! needs "enqueue text, wait for completion or error".

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpeechError {
    /// The platform player reported a failure mid-utterance
    #[error("utterance playback failed: {0}")]
    Playback(String),

    /// No synthesis capability is available at all
    #[error("音声合成がサポートされていません: {0}")]
    Unavailable(String),
}

/// Enqueue text and suspend until the utterance completes or fails
#[async_trait]
pub trait UtterancePlayer: Send + Sync {
    async fn speak(&self, text: &str) -> Result<(), SpeechError>;
}

/// Headless player that writes utterances to the log. Used for server
/// deployments and manual runs where no audio device exists.
#[derive(Debug, Default, Clone)]
pub struct ConsoleAnnouncer;

#[async_trait]
impl UtterancePlayer for ConsoleAnnouncer {
    async fn speak(&self, text: &str) -> Result<(), SpeechError> {
        tracing::info!("🔊 {}", text);
        Ok(())
    }
}
