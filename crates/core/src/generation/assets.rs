use std::{collections::HashMap, path::PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LectureAsset {
    pub audio_path: PathBuf,
    pub transcript: String,
}

/// Session-scoped generated media, keyed by lesson id. Never persisted.
#[derive(Debug, Default)]
pub struct GenerationCache {
    video: HashMap<String, PathBuf>,
    audio: HashMap<String, LectureAsset>,
}

impl GenerationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn video(&self, lesson_id: &str) -> Option<&PathBuf> {
        self.video.get(lesson_id)
    }

    pub fn audio(&self, lesson_id: &str) -> Option<&LectureAsset> {
        self.audio.get(lesson_id)
    }

    /// Append-only: the first asset for a lesson is kept.
    pub fn insert_video(&mut self, lesson_id: &str, path: PathBuf) -> bool {
        if self.video.contains_key(lesson_id) {
            return false;
        }
        self.video.insert(lesson_id.to_string(), path);
        true
    }

    pub fn insert_audio(&mut self, lesson_id: &str, asset: LectureAsset) -> bool {
        if self.audio.contains_key(lesson_id) {
            return false;
        }
        self.audio.insert(lesson_id.to_string(), asset);
        true
    }

    pub fn clear(&mut self) {
        self.video.clear();
        self.audio.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.video.is_empty() && self.audio.is_empty()
    }
}
