//! Spawns generation jobs and reports their results back to the session.
//!
//! Jobs never touch session state. They write their asset to disk and send a
//! [`GenerationEvent`]; the session applies it as the single writer.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use tokio::{fs, sync::mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span};
use uuid::Uuid;

use crate::{
    cache::{get_lecture_audio_path, get_transcript_path, get_video_path},
    client::GenerativeClient,
    error::{AcademyError, Result},
    generation::{
        guard::AssetKind,
        lecture::generate_lecture,
        video::{VideoSettings, generate_lesson_video},
    },
    types::Lesson,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutput {
    Video { path: PathBuf },
    Audio { path: PathBuf, transcript: String },
}

#[derive(Debug)]
pub struct GenerationEvent {
    pub job: Uuid,
    pub lesson_id: String,
    pub kind: AssetKind,
    pub result: std::result::Result<GenerationOutput, String>,
}

pub type GenerationEvents = mpsc::UnboundedReceiver<GenerationEvent>;

#[derive(Clone)]
pub struct GenerationDispatcher {
    client: Arc<dyn GenerativeClient>,
    media_dir: PathBuf,
    video: VideoSettings,
    voice: String,
    tx: mpsc::UnboundedSender<GenerationEvent>,
}

impl GenerationDispatcher {
    pub fn new(
        client: Arc<dyn GenerativeClient>,
        media_dir: PathBuf,
        video: VideoSettings,
        voice: String,
        tx: mpsc::UnboundedSender<GenerationEvent>,
    ) -> Self {
        Self {
            client,
            media_dir,
            video,
            voice,
            tx,
        }
    }

    pub fn dispatch_video(&self, job: Uuid, cancel: CancellationToken, lesson: &Lesson) {
        let this = self.clone();
        let lesson_id = lesson.id.clone();
        let guidance = lesson.visual_guidance.clone();
        let span = info_span!("video_job", lesson = %lesson_id, %job);

        debug!(lesson = %lesson_id, %job, "dispatching video generation");
        tokio::spawn(
            async move {
                let result = async {
                    let bytes =
                        generate_lesson_video(this.client.as_ref(), &guidance, &this.video, &cancel)
                            .await?;
                    let path = get_video_path(&this.media_dir, &lesson_id);
                    write_asset(&path, &bytes).await?;
                    Ok::<_, AcademyError>(GenerationOutput::Video { path })
                }
                .await;
                this.report(job, lesson_id, AssetKind::Video, result);
            }
            .instrument(span),
        );
    }

    pub fn dispatch_audio(&self, job: Uuid, cancel: CancellationToken, lesson: &Lesson) {
        let this = self.clone();
        let lesson = lesson.clone();
        let span = info_span!("lecture_job", lesson = %lesson.id, %job);

        debug!(lesson = %lesson.id, %job, "dispatching lecture generation");
        tokio::spawn(
            async move {
                let result = async {
                    let lecture =
                        generate_lecture(this.client.as_ref(), &lesson, &this.voice, &cancel)
                            .await?;
                    let path = get_lecture_audio_path(&this.media_dir, &lesson.id);
                    write_asset(&path, &lecture.wav).await?;
                    write_asset(
                        &get_transcript_path(&this.media_dir, &lesson.id),
                        lecture.transcript.as_bytes(),
                    )
                    .await?;
                    Ok::<_, AcademyError>(GenerationOutput::Audio {
                        path,
                        transcript: lecture.transcript,
                    })
                }
                .await;
                this.report(job, lesson.id.clone(), AssetKind::Audio, result);
            }
            .instrument(span),
        );
    }

    fn report(
        &self,
        job: Uuid,
        lesson_id: String,
        kind: AssetKind,
        result: Result<GenerationOutput>,
    ) {
        let result = match result {
            Ok(output) => {
                info!("generation finished");
                Ok(output)
            }
            Err(AcademyError::Cancelled) => {
                debug!("generation cancelled");
                return;
            }
            Err(e) => Err(e.to_string()),
        };
        // receiver gone means the session ended
        let _ = self.tx.send(GenerationEvent {
            job,
            lesson_id,
            kind,
            result,
        });
    }
}

async fn write_asset(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, bytes).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{
        content::Course,
        generation::{guard::GenerationGuard, testing::MockClient},
    };

    fn dispatcher(
        client: Arc<MockClient>,
        media_dir: &Path,
    ) -> (GenerationDispatcher, GenerationEvents) {
        let (tx, rx) = mpsc::unbounded_channel();
        let settings = VideoSettings {
            poll_interval: Duration::from_millis(1),
            ..VideoSettings::default()
        };
        (
            GenerationDispatcher::new(
                client,
                media_dir.to_path_buf(),
                settings,
                "Kore".into(),
                tx,
            ),
            rx,
        )
    }

    #[tokio::test]
    async fn repeated_triggers_dispatch_once() {
        let dir = tempfile::tempdir().unwrap();
        let client = Arc::new(MockClient::default().held());
        let (dispatcher, mut events) = dispatcher(client.clone(), dir.path());
        let lesson = Course::builtin().unwrap().first_lesson().clone();
        let mut guard = GenerationGuard::new();

        for _ in 0..5 {
            if let Some((job, cancel)) = guard.try_begin(&lesson.id, AssetKind::Video) {
                dispatcher.dispatch_video(job, cancel, &lesson);
            }
        }
        client.release();

        let event = events.recv().await.unwrap();
        assert!(guard.finish(&event.lesson_id, event.kind, event.job));
        assert_eq!(client.video_starts(), 1);

        let Ok(GenerationOutput::Video { path }) = event.result else {
            panic!("expected video output");
        };
        assert_eq!(std::fs::read(path).unwrap(), MockClient::VIDEO_BYTES);
    }

    #[tokio::test]
    async fn lecture_writes_audio_and_transcript() {
        let dir = tempfile::tempdir().unwrap();
        let client = Arc::new(MockClient::default().with_text("# Notes\n- point"));
        let (dispatcher, mut events) = dispatcher(client, dir.path());
        let lesson = Course::builtin().unwrap().first_lesson().clone();

        dispatcher.dispatch_audio(Uuid::new_v4(), CancellationToken::new(), &lesson);
        let event = events.recv().await.unwrap();
        let Ok(GenerationOutput::Audio { path, transcript }) = event.result else {
            panic!("expected audio output");
        };
        assert_eq!(transcript, "# Notes\n- point");
        assert!(path.ends_with("l1/lecture.wav"));
        assert_eq!(
            std::fs::read_to_string(dir.path().join("l1/transcript.md")).unwrap(),
            "# Notes\n- point"
        );
    }

    #[tokio::test]
    async fn failures_are_reported_as_messages() {
        let dir = tempfile::tempdir().unwrap();
        let client = Arc::new(MockClient::default().failing());
        let (dispatcher, mut events) = dispatcher(client, dir.path());
        let lesson = Course::builtin().unwrap().first_lesson().clone();

        dispatcher.dispatch_video(Uuid::new_v4(), CancellationToken::new(), &lesson);
        let event = events.recv().await.unwrap();
        assert_eq!(event.kind, AssetKind::Video);
        assert!(event.result.is_err());
    }
}
