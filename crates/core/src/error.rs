use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AcademyError {
    #[error("Course content is invalid: {reason}")]
    InvalidContent { reason: String },

    #[error("Unknown lesson: {lesson_id}")]
    UnknownLesson { lesson_id: String },

    #[error("Lesson {lesson_id} is locked until the previous lesson is completed")]
    LessonLocked { lesson_id: String },

    #[error("The certificate is locked until every lesson is completed")]
    CertificateLocked,

    #[error("Course has not been started")]
    NotStarted,

    #[error("No lesson is open")]
    NoLessonOpen,

    #[error("There is no next lesson yet")]
    NoNextLesson,

    #[error("Name must be at least {min} characters")]
    InvalidName { min: usize },

    #[error("Quiz action not allowed: {reason}")]
    QuizState { reason: &'static str },

    #[error("No lecture notes available for lesson {lesson_id}")]
    NotesUnavailable { lesson_id: String },

    #[error("Missing API key: set {env_var} (or {fallback_env_var})")]
    MissingApiKey {
        env_var: String,
        fallback_env_var: String,
    },

    #[error("Provider returned {status}: {message}")]
    Provider { status: u16, message: String },

    #[error("Invalid provider response: {reason}")]
    InvalidResponse { reason: String },

    #[error("Generation cancelled")]
    Cancelled,

    #[error("Media command failed for {path}: {reason}")]
    Media { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("WAV encoding failed: {0}")]
    WavError(#[from] hound::Error),

    #[error("PDF rendering failed: {reason}")]
    PdfError { reason: String },

    #[error("Base64 decode failed: {0}")]
    Base64Error(#[from] base64::DecodeError),
}

pub type Result<T> = std::result::Result<T, AcademyError>;
