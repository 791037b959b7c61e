//! Contract with the hosted generative-AI provider.
//!
//! The session only talks to [`GenerativeClient`]; [`crate::gemini::GeminiClient`]
//! is the production implementation.

use async_trait::async_trait;

use crate::error::Result;

/// An encoded audio clip sent inline with a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl AudioClip {
    pub fn wav(bytes: Vec<u8>) -> Self {
        Self {
            mime_type: "audio/wav".to_string(),
            bytes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRequest {
    pub aspect_ratio: String,
    pub resolution: String,
}

impl Default for VideoRequest {
    fn default() -> Self {
        Self {
            aspect_ratio: "16:9".to_string(),
            resolution: "720p".to_string(),
        }
    }
}

/// Handle on a long-running video generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoOperation {
    pub name: String,
    pub done: bool,
    pub video_uri: Option<String>,
    pub error: Option<String>,
}

#[async_trait]
pub trait GenerativeClient: Send + Sync {
    /// Prompt in, text out.
    async fn generate_text(&self, prompt: &str) -> Result<String>;

    /// Multimodal call: an inline audio clip plus a text instruction.
    async fn generate_text_with_audio(&self, instruction: &str, clip: &AudioClip)
    -> Result<String>;

    async fn start_video(&self, prompt: &str, request: &VideoRequest) -> Result<VideoOperation>;

    /// Refreshes an operation handle.
    async fn poll_video(&self, operation: &VideoOperation) -> Result<VideoOperation>;

    async fn download_video(&self, uri: &str) -> Result<Vec<u8>>;

    /// Returns raw signed 16-bit mono PCM at 24 kHz.
    async fn synthesize_speech(&self, text: &str, voice: &str) -> Result<Vec<u8>>;
}
