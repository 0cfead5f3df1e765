use anyhow::Result;
use async_trait::async_trait;

/// Seam for the text-to-speech relay (`espeak` or similar in the field).
#[async_trait]
pub(crate) trait SpeechSink: Send + Sync {
    async fn say(&self, text: &str) -> Result<()>;
}

/// Logs announcements when no TTS backend is wired up.
pub(crate) struct LogSpeechSink;

#[async_trait]
impl SpeechSink for LogSpeechSink {
    async fn say(&self, text: &str) -> Result<()> {
        tracing::info!(text, "speak");
        Ok(())
    }
}
