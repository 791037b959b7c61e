//! Counting stand-in for the provider, used by unit tests.

use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::{
    client::{AudioClip, GenerativeClient, VideoOperation, VideoRequest},
    error::{AcademyError, Result},
};

pub struct MockClient {
    text: String,
    fail: bool,
    polls_until_done: usize,
    produce_video: bool,
    hold: Option<Notify>,
    text_calls: AtomicUsize,
    audio_calls: AtomicUsize,
    video_starts: AtomicUsize,
    polls: AtomicUsize,
    downloads: AtomicUsize,
    speech_calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
    last_speech_text: Mutex<Option<String>>,
}

impl Default for MockClient {
    fn default() -> Self {
        Self {
            text: "mock answer".to_string(),
            fail: false,
            polls_until_done: 1,
            produce_video: true,
            hold: None,
            text_calls: AtomicUsize::new(0),
            audio_calls: AtomicUsize::new(0),
            video_starts: AtomicUsize::new(0),
            polls: AtomicUsize::new(0),
            downloads: AtomicUsize::new(0),
            speech_calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
            last_speech_text: Mutex::new(None),
        }
    }
}

impl MockClient {
    pub const VIDEO_BYTES: &'static [u8] = b"\x00\x00\x00\x18ftypmp42";
    pub const PCM: &'static [u8] = &[0, 0, 16, 0, 240, 255];

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn with_polls(mut self, polls: usize) -> Self {
        self.polls_until_done = polls;
        self
    }

    pub fn without_video(mut self) -> Self {
        self.produce_video = false;
        self
    }

    /// `start_video` blocks until [`MockClient::release`] is called.
    pub fn held(mut self) -> Self {
        self.hold = Some(Notify::new());
        self
    }

    pub fn release(&self) {
        if let Some(hold) = &self.hold {
            hold.notify_one();
        }
    }

    pub fn text_calls(&self) -> usize {
        self.text_calls.load(Ordering::SeqCst)
    }

    pub fn audio_calls(&self) -> usize {
        self.audio_calls.load(Ordering::SeqCst)
    }

    pub fn video_starts(&self) -> usize {
        self.video_starts.load(Ordering::SeqCst)
    }

    pub fn polls(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }

    pub fn downloads(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }

    pub fn speech_calls(&self) -> usize {
        self.speech_calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }

    pub fn last_speech_text(&self) -> Option<String> {
        self.last_speech_text.lock().unwrap().clone()
    }

    fn outcome<T>(&self, value: T) -> Result<T> {
        if self.fail {
            return Err(AcademyError::Provider {
                status: 503,
                message: "unavailable".to_string(),
            });
        }
        Ok(value)
    }
}

#[async_trait]
impl GenerativeClient for MockClient {
    async fn generate_text(&self, prompt: &str) -> Result<String> {
        self.text_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
        self.outcome(self.text.clone())
    }

    async fn generate_text_with_audio(
        &self,
        instruction: &str,
        _clip: &AudioClip,
    ) -> Result<String> {
        self.audio_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(instruction.to_string());
        self.outcome(self.text.clone())
    }

    async fn start_video(&self, prompt: &str, _request: &VideoRequest) -> Result<VideoOperation> {
        self.video_starts.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
        if let Some(hold) = &self.hold {
            hold.notified().await;
        }
        self.outcome(VideoOperation {
            name: "operations/mock".to_string(),
            done: self.polls_until_done == 0,
            video_uri: None,
            error: None,
        })
    }

    async fn poll_video(&self, operation: &VideoOperation) -> Result<VideoOperation> {
        let polls = self.polls.fetch_add(1, Ordering::SeqCst) + 1;
        let done = polls >= self.polls_until_done;
        Ok(VideoOperation {
            name: operation.name.clone(),
            done,
            video_uri: (done && self.produce_video).then(|| "mock://video".to_string()),
            error: None,
        })
    }

    async fn download_video(&self, _uri: &str) -> Result<Vec<u8>> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        self.outcome(Self::VIDEO_BYTES.to_vec())
    }

    async fn synthesize_speech(&self, text: &str, _voice: &str) -> Result<Vec<u8>> {
        self.speech_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_speech_text.lock().unwrap() = Some(text.to_string());
        self.outcome(Self::PCM.to_vec())
    }
}
