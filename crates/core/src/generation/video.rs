//! Lecture video synthesis: start a long-running operation, poll it to
//! completion, then fetch the bytes.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{
    client::{GenerativeClient, VideoRequest},
    config::DEFAULT_POLL_INTERVAL,
    error::{AcademyError, Result},
};

pub const VIDEO_STYLE_PREFIX: &str = "Cinematic, professional documentary style: ";
pub const VIDEO_MISSING_KEY: &str = "Could not retrieve video content. Please check your API key.";
pub const VIDEO_STREAM_ERROR: &str = "An error occurred while loading the video stream.";

#[derive(Debug, Clone)]
pub struct VideoSettings {
    pub request: VideoRequest,
    pub poll_interval: Duration,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            request: VideoRequest::default(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

pub fn video_prompt(visual_guidance: &str) -> String {
    format!("{VIDEO_STYLE_PREFIX}{visual_guidance}")
}

/// Runs one video generation to completion. There is no timeout; the only way
/// out of the poll loop early is `cancel`.
pub async fn generate_lesson_video(
    client: &dyn GenerativeClient,
    visual_guidance: &str,
    settings: &VideoSettings,
    cancel: &CancellationToken,
) -> Result<Vec<u8>> {
    let prompt = video_prompt(visual_guidance);

    let mut operation = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(AcademyError::Cancelled),
        op = client.start_video(&prompt, &settings.request) => op?,
    };
    debug!(operation = %operation.name, "video generation started");

    while !operation.done {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(AcademyError::Cancelled),
            _ = tokio::time::sleep(settings.poll_interval) => {}
        }
        operation = client.poll_video(&operation).await?;
    }

    if let Some(message) = operation.error {
        return Err(AcademyError::InvalidResponse {
            reason: format!("video generation failed: {message}"),
        });
    }
    let uri = operation
        .video_uri
        .ok_or_else(|| AcademyError::InvalidResponse {
            reason: "video operation finished without a video".to_string(),
        })?;

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(AcademyError::Cancelled),
        bytes = client.download_video(&uri) => bytes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::testing::MockClient;

    fn fast() -> VideoSettings {
        VideoSettings {
            poll_interval: Duration::from_millis(1),
            ..VideoSettings::default()
        }
    }

    #[tokio::test]
    async fn polls_until_done_then_downloads() {
        let client = MockClient::default().with_polls(3);
        let cancel = CancellationToken::new();
        let bytes = generate_lesson_video(&client, "wind turbines", &fast(), &cancel)
            .await
            .unwrap();
        assert_eq!(bytes, MockClient::VIDEO_BYTES);
        assert_eq!(client.video_starts(), 1);
        assert_eq!(client.polls(), 3);
        assert_eq!(client.downloads(), 1);
        assert_eq!(
            client.last_prompt().unwrap(),
            "Cinematic, professional documentary style: wind turbines"
        );
    }

    #[tokio::test]
    async fn operation_without_video_is_an_error() {
        let client = MockClient::default().with_polls(1).without_video();
        let result = generate_lesson_video(&client, "x", &fast(), &CancellationToken::new()).await;
        assert!(matches!(result, Err(AcademyError::InvalidResponse { .. })));
        assert_eq!(client.downloads(), 0);
    }

    #[tokio::test]
    async fn cancellation_stops_polling() {
        let client = MockClient::default().with_polls(usize::MAX);
        let cancel = CancellationToken::new();
        let settings = VideoSettings {
            poll_interval: Duration::from_secs(3600),
            ..VideoSettings::default()
        };
        let canceller = cancel.clone();
        let handle = tokio::spawn(async move {
            generate_lesson_video(&client, "x", &settings, &canceller).await
        });
        cancel.cancel();
        assert!(matches!(handle.await.unwrap(), Err(AcademyError::Cancelled)));
    }
}
