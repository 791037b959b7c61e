//! The course session: owns progress and all per-lesson view state.
//!
//! `Academy` is the single writer. Generation jobs report back through
//! [`GenerationEvent`]s, which the caller feeds to [`Academy::apply`].

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use chrono::{Local, NaiveDate};
use tokio::{fs, sync::mpsc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    cache::get_voice_reply_path,
    client::{AudioClip, GenerativeClient},
    config::AcademyConfig,
    content::Course,
    document::{Canvas, certificate, notes},
    error::{AcademyError, Result},
    generation::{
        AssetKind, GenerationCache, GenerationDispatcher, GenerationEvent, GenerationEvents,
        GenerationGuard, GenerationOutput, LectureAsset, SlotState, VideoSettings, tutor,
        video::{VIDEO_MISSING_KEY, VIDEO_STREAM_ERROR},
    },
    navigation::{self, Outline},
    progress::{Position, ProgressEvent, UserProgress, reduce, validate_name},
    quiz::{QuizEngine, QuizOutcome, QuizPhase},
    store::ProgressStore,
    types::Lesson,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Video,
    Summary,
}

/// State that lives only while a lesson is on screen.
#[derive(Debug, Default)]
pub struct LessonView {
    pub tab: Tab,
    pub quiz: Option<QuizEngine>,
    pub tutor_answer: Option<String>,
}

/// Generated asset availability for the current lesson.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetStatus {
    Idle,
    Generating,
    Ready(PathBuf),
    Failed(String),
}

/// Something the learner should hear about after a generation event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    VideoReady { lesson_id: String, path: PathBuf },
    VideoFailed { lesson_id: String, message: String },
    LectureReady { lesson_id: String, path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceAnswer {
    pub text: String,
    /// The spoken reply, written under the media dir.
    pub reply_path: Option<PathBuf>,
}

pub struct Academy {
    session_id: Uuid,
    course: Course,
    progress: UserProgress,
    store: ProgressStore,
    media_dir: PathBuf,
    voice: String,
    client: Option<Arc<dyn GenerativeClient>>,
    dispatcher: Option<GenerationDispatcher>,
    events: Option<GenerationEvents>,
    guard: GenerationGuard,
    cache: GenerationCache,
    view: LessonView,
    drawer_open: bool,
}

impl Academy {
    /// Loads saved progress and wires the generation dispatcher when a client is given.
    pub async fn open(
        course: Course,
        config: AcademyConfig,
        client: Option<Arc<dyn GenerativeClient>>,
    ) -> Result<Self> {
        let store = ProgressStore::in_data_dir(&config.data_dir);
        let progress = store.load(&course).await?;
        let (tx, rx) = mpsc::unbounded_channel();

        let dispatcher = client.clone().map(|client| {
            GenerationDispatcher::new(
                client,
                config.media_dir.clone(),
                VideoSettings {
                    poll_interval: config.poll_interval,
                    ..VideoSettings::default()
                },
                config.provider.voice.clone(),
                tx,
            )
        });

        let session_id = Uuid::new_v4();
        info!(
            session = %session_id,
            started = progress.started,
            completed = progress.completed_lesson_ids.len(),
            ai = client.is_some(),
            "session opened"
        );

        Ok(Self {
            session_id,
            course,
            progress,
            store,
            media_dir: config.media_dir,
            voice: config.provider.voice,
            client,
            dispatcher,
            events: Some(rx),
            guard: GenerationGuard::new(),
            cache: GenerationCache::new(),
            view: LessonView::default(),
            drawer_open: false,
        })
    }

    pub fn course(&self) -> &Course {
        &self.course
    }

    pub fn progress(&self) -> &UserProgress {
        &self.progress
    }

    pub fn view(&self) -> &LessonView {
        &self.view
    }

    pub fn media_dir(&self) -> &Path {
        &self.media_dir
    }

    /// Hands the generation event stream to the caller's event loop. Only once.
    pub fn take_events(&mut self) -> Option<GenerationEvents> {
        self.events.take()
    }

    pub fn position(&self) -> &Position {
        &self.progress.current_lesson_id
    }

    /// The lesson on screen, `None` on the certificate view.
    pub fn current_lesson(&self) -> Option<&Lesson> {
        self.progress
            .current_lesson_id
            .lesson_id()
            .and_then(|id| self.course.lesson(id))
    }

    fn require_lesson(&self) -> Result<Lesson> {
        self.current_lesson()
            .cloned()
            .ok_or(AcademyError::NoLessonOpen)
    }

    pub fn outline(&self) -> Outline {
        navigation::outline(&self.course, &self.progress)
    }

    /// Opens the outline drawer; any navigation closes it again.
    pub fn open_outline(&mut self) -> Outline {
        self.drawer_open = true;
        self.outline()
    }

    pub fn drawer_open(&self) -> bool {
        self.drawer_open
    }

    pub fn has_next(&self) -> bool {
        navigation::has_next(&self.course, &self.progress)
    }

    pub fn is_course_complete(&self) -> bool {
        navigation::is_course_complete(&self.course, &self.progress)
    }

    async fn dispatch(&mut self, event: ProgressEvent) -> Result<()> {
        let state = std::mem::replace(&mut self.progress, UserProgress::fresh(&self.course));
        self.progress = reduce(&self.course, state, event);
        self.store.save(&self.progress).await
    }

    /// Leaves the landing page.
    pub async fn start(&mut self, name: &str) -> Result<()> {
        let name = validate_name(name)?;
        info!(session = %self.session_id, "course started");
        self.dispatch(ProgressEvent::Started { name }).await?;
        self.enter_lesson();
        Ok(())
    }

    /// Re-enters the saved position of a started course.
    pub fn resume(&mut self) -> Result<()> {
        if !self.progress.started {
            return Err(AcademyError::NotStarted);
        }
        self.enter_lesson();
        Ok(())
    }

    pub async fn navigate(&mut self, target: Position) -> Result<()> {
        if !self.progress.started {
            return Err(AcademyError::NotStarted);
        }
        navigation::can_navigate(&self.course, &self.progress, &target)?;
        self.drawer_open = false;
        if target == self.progress.current_lesson_id {
            return Ok(());
        }

        if let Some(leaving) = self.progress.current_lesson_id.lesson_id() {
            self.guard.leave_lesson(leaving);
        }
        info!(to = %String::from(target.clone()), "navigating");
        self.dispatch(ProgressEvent::Navigated { to: target }).await?;
        self.enter_lesson();
        Ok(())
    }

    pub async fn next(&mut self) -> Result<Position> {
        let target = navigation::next_position(&self.course, &self.progress)
            .ok_or(AcademyError::NoNextLesson)?;
        self.navigate(target.clone()).await?;
        Ok(target)
    }

    /// Fresh view state. The video tab is the default, so both the video and
    /// the lecture start generating unless they are cached.
    fn enter_lesson(&mut self) {
        self.view = LessonView::default();
        if self.current_lesson().is_some() {
            self.ensure_video();
            self.ensure_audio();
        }
    }

    pub fn view_tab(&mut self, tab: Tab) -> Result<()> {
        self.require_lesson()?;
        self.view.tab = tab;
        if tab == Tab::Video {
            self.ensure_video();
        }
        Ok(())
    }

    /// Starts video generation for the current lesson unless it is cached or
    /// already attempted. Returns whether a job was claimed.
    pub fn ensure_video(&mut self) -> bool {
        let Some(lesson) = self.current_lesson().cloned() else {
            return false;
        };
        if self.cache.video(&lesson.id).is_some() {
            return false;
        }
        let Some((job, cancel)) = self.guard.try_begin(&lesson.id, AssetKind::Video) else {
            return false;
        };
        match &self.dispatcher {
            Some(dispatcher) => dispatcher.dispatch_video(job, cancel, &lesson),
            None => {
                self.guard
                    .fail(&lesson.id, AssetKind::Video, job, VIDEO_MISSING_KEY.to_string());
            }
        }
        true
    }

    /// Starts lecture generation for the current lesson. Failures stay silent.
    pub fn ensure_audio(&mut self) -> bool {
        let Some(lesson) = self.current_lesson().cloned() else {
            return false;
        };
        if self.cache.audio(&lesson.id).is_some() {
            return false;
        }
        let Some((job, cancel)) = self.guard.try_begin(&lesson.id, AssetKind::Audio) else {
            return false;
        };
        match &self.dispatcher {
            Some(dispatcher) => dispatcher.dispatch_audio(job, cancel, &lesson),
            None => {
                debug!(lesson = %lesson.id, "lecture unavailable without a client");
                self.guard
                    .fail(&lesson.id, AssetKind::Audio, job, "no client".to_string());
            }
        }
        true
    }

    /// Clears a video failure and lets the automatic trigger fire again.
    pub fn retry_video(&mut self) -> Result<bool> {
        let lesson = self.require_lesson()?;
        if !self.guard.retry(&lesson.id, AssetKind::Video) {
            return Ok(false);
        }
        self.view.tab = Tab::Video;
        Ok(self.ensure_video())
    }

    fn status(&self, kind: AssetKind) -> AssetStatus {
        let Some(lesson) = self.current_lesson() else {
            return AssetStatus::Idle;
        };
        let cached = match kind {
            AssetKind::Video => self.cache.video(&lesson.id).cloned(),
            AssetKind::Audio => self.cache.audio(&lesson.id).map(|a| a.audio_path.clone()),
        };
        if let Some(path) = cached {
            return AssetStatus::Ready(path);
        }
        match self.guard.state(&lesson.id, kind) {
            SlotState::Idle | SlotState::Done => AssetStatus::Idle,
            SlotState::Pending => AssetStatus::Generating,
            SlotState::Failed(message) => AssetStatus::Failed(message),
        }
    }

    pub fn video_status(&self) -> AssetStatus {
        self.status(AssetKind::Video)
    }

    pub fn audio_status(&self) -> AssetStatus {
        self.status(AssetKind::Audio)
    }

    pub fn lecture(&self) -> Option<&LectureAsset> {
        self.current_lesson()
            .and_then(|lesson| self.cache.audio(&lesson.id))
    }

    /// Applies a finished generation job. Results for other lessons are
    /// cached without a notice; results of jobs dropped by a reset are ignored.
    pub fn apply(&mut self, event: GenerationEvent) -> Option<Notice> {
        let GenerationEvent {
            job,
            lesson_id,
            kind,
            result,
        } = event;
        if !self.guard.accept(&lesson_id, kind, job) {
            debug!(lesson = %lesson_id, %job, "ignoring result of a cleared job");
            return None;
        }
        let current = self.progress.current_lesson_id.lesson_id() == Some(lesson_id.as_str());

        let notice = match (kind, result) {
            (AssetKind::Video, Ok(GenerationOutput::Video { path })) => {
                self.cache.insert_video(&lesson_id, path.clone());
                self.guard.finish(&lesson_id, kind, job);
                info!(lesson = %lesson_id, path = %path.display(), "lesson video ready");
                Some(Notice::VideoReady {
                    lesson_id: lesson_id.clone(),
                    path,
                })
            }
            (AssetKind::Audio, Ok(GenerationOutput::Audio { path, transcript })) => {
                self.cache.insert_audio(
                    &lesson_id,
                    LectureAsset {
                        audio_path: path.clone(),
                        transcript,
                    },
                );
                self.guard.finish(&lesson_id, kind, job);
                info!(lesson = %lesson_id, path = %path.display(), "lecture audio ready");
                Some(Notice::LectureReady {
                    lesson_id: lesson_id.clone(),
                    path,
                })
            }
            (AssetKind::Video, Err(error)) => {
                warn!(lesson = %lesson_id, %error, "video generation failed");
                self.guard
                    .fail(&lesson_id, kind, job, VIDEO_STREAM_ERROR.to_string())
                    .then(|| Notice::VideoFailed {
                        lesson_id: lesson_id.clone(),
                        message: VIDEO_STREAM_ERROR.to_string(),
                    })
            }
            (AssetKind::Audio, Err(error)) => {
                debug!(lesson = %lesson_id, %error, "lecture generation failed");
                self.guard.fail(&lesson_id, kind, job, error);
                None
            }
            (kind, Ok(output)) => {
                warn!(lesson = %lesson_id, ?kind, ?output, "mismatched generation output");
                None
            }
        };
        notice.filter(|_| current)
    }

    pub fn quiz(&self) -> Option<&QuizEngine> {
        self.view.quiz.as_ref()
    }

    fn quiz_mut(&mut self) -> Result<&mut QuizEngine> {
        self.view.quiz.as_mut().ok_or(AcademyError::QuizState {
            reason: "no quiz in progress",
        })
    }

    /// Opens the current lesson's quiz. Also used to review a completed lesson.
    pub async fn start_quiz(&mut self) -> Result<QuizPhase> {
        let lesson = self.require_lesson()?;
        let engine = QuizEngine::new(lesson.quiz.clone());
        let phase = engine.phase();
        let outcome = engine.outcome();
        self.view.quiz = Some(engine);
        if let Some(outcome) = outcome {
            self.record(&lesson.id, outcome).await?;
        }
        Ok(phase)
    }

    pub fn select(&mut self, option: usize) -> Result<()> {
        self.quiz_mut()?.select(option)
    }

    pub fn submit(&mut self) -> Result<bool> {
        self.quiz_mut()?.submit()
    }

    /// Moves past feedback; a passing finish marks the lesson complete.
    pub async fn advance(&mut self) -> Result<Option<QuizOutcome>> {
        let lesson = self.require_lesson()?;
        let outcome = self.quiz_mut()?.advance()?;
        if let Some(outcome) = outcome {
            self.record(&lesson.id, outcome).await?;
        }
        Ok(outcome)
    }

    pub fn retry_quiz(&mut self) -> Result<()> {
        self.quiz_mut()?.retry()
    }

    async fn record(&mut self, lesson_id: &str, outcome: QuizOutcome) -> Result<()> {
        if !outcome.passed {
            info!(lesson = %lesson_id, percent = outcome.percent, "quiz failed");
            return Ok(());
        }
        info!(lesson = %lesson_id, percent = outcome.percent, "lesson completed");
        self.dispatch(ProgressEvent::QuizFinished {
            lesson_id: lesson_id.to_string(),
            score: outcome.percent,
        })
        .await
    }

    /// Asks the tutor about the current lesson. `None` for a blank question.
    pub async fn ask_tutor(&mut self, question: &str) -> Result<Option<String>> {
        let lesson = self.require_lesson()?;
        let answer = tutor::ask(self.client.as_deref(), &lesson, question).await;
        if answer.is_some() {
            self.view.tutor_answer.clone_from(&answer);
        }
        Ok(answer)
    }

    pub async fn ask_by_voice(&mut self, clip: &AudioClip) -> Result<VoiceAnswer> {
        let lesson = self.require_lesson()?;
        let reply = tutor::ask_by_voice(self.client.as_deref(), &lesson, clip, &self.voice).await;

        let reply_path = match &reply.speech_wav {
            Some(wav) => {
                let path = get_voice_reply_path(&self.media_dir);
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent).await?;
                }
                fs::write(&path, wav).await?;
                Some(path)
            }
            None => None,
        };
        self.view.tutor_answer = Some(reply.text.clone());
        Ok(VoiceAnswer {
            text: reply.text,
            reply_path,
        })
    }

    fn require_complete(&self) -> Result<()> {
        if self.is_course_complete() {
            Ok(())
        } else {
            Err(AcademyError::CertificateLocked)
        }
    }

    /// Certificate body with the learner's name filled in.
    pub fn certificate_text(&self) -> Result<String> {
        self.require_complete()?;
        Ok(certificate::render_text(
            self.course.certificate(),
            &self.progress.name,
        ))
    }

    pub fn certificate(&self, issued_on: NaiveDate) -> Result<Canvas> {
        self.require_complete()?;
        Ok(certificate::build(
            self.course.certificate(),
            &self.progress.name,
            issued_on,
        ))
    }

    pub fn share_message(&self) -> Result<&str> {
        self.require_complete()?;
        Ok(&self.course.certificate().shareable_message)
    }

    /// Writes today's certificate as a one-page PDF.
    pub async fn export_certificate(&self, path: &Path) -> Result<()> {
        let canvas = self.certificate(Local::now().date_naive())?;
        write_file(path, &canvas.to_pdf(&self.course.certificate().certificate_title)?).await?;
        info!(path = %path.display(), "certificate exported");
        Ok(())
    }

    /// Writes paginated notes for the current lesson's generated lecture.
    pub async fn export_notes(&self, path: &Path) -> Result<()> {
        let lesson = self.require_lesson()?;
        let lecture = self
            .cache
            .audio(&lesson.id)
            .ok_or_else(|| AcademyError::NotesUnavailable {
                lesson_id: lesson.id.clone(),
            })?;
        let text = notes::render_text(&lesson.title, &lecture.transcript);
        write_file(path, text.as_bytes()).await?;
        info!(path = %path.display(), "lesson notes exported");
        Ok(())
    }

    /// Back to the landing page with a fresh document and no generated media.
    pub async fn reset(&mut self) -> Result<()> {
        self.guard.clear();
        self.cache.clear();
        self.view = LessonView::default();
        self.drawer_open = false;
        info!(session = %self.session_id, "progress reset");
        self.dispatch(ProgressEvent::Reset).await
    }
}

async fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, bytes).await?;
    Ok(())
}
