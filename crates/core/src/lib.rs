//! ESG Academy Core Library
//!
//! Course content, progress and unlock rules, the quiz engine, AI-generated
//! lesson media, certificate and notes export, and the session that ties
//! them together.

pub mod cache;
pub mod client;
pub mod config;
pub mod content;
pub mod document;
pub mod error;
pub mod format;
pub mod gemini;
pub mod generation;
pub mod media;
pub mod navigation;
pub mod progress;
pub mod provider;
pub mod quiz;
pub mod session;
pub mod store;
pub mod types;
pub mod wav;

// Re-export commonly used items at crate root
pub use cache::{get_progress_path, get_recording_path, get_root_cache_dir};
pub use client::{AudioClip, GenerativeClient};
pub use config::AcademyConfig;
pub use content::Course;
pub use error::{AcademyError, Result};
pub use format::{format_landing_page, format_lesson_summary, format_outline, format_quiz};
pub use gemini::GeminiClient;
pub use generation::{GenerationEvent, GenerationEvents};
pub use navigation::Outline;
pub use progress::{Position, UserProgress};
pub use provider::ProviderConfig;
pub use quiz::{PASS_THRESHOLD, QuizEngine, QuizOutcome, QuizPhase};
pub use session::{Academy, AssetStatus, Notice, Tab, VoiceAnswer};
pub use types::{CertificateTemplate, LandingPage, Lesson, QuizQuestion};
