use std::path::{Path, PathBuf};

pub fn get_root_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("esg-academy")
}

/// Directory holding generated assets for one lesson
pub fn get_lesson_dir(media_dir: &Path, lesson_id: &str) -> PathBuf {
    media_dir.join(lesson_id)
}

/// Get the path for a generated lecture video
pub fn get_video_path(media_dir: &Path, lesson_id: &str) -> PathBuf {
    get_lesson_dir(media_dir, lesson_id).join("video.mp4")
}

/// Get the path for a synthesized audio lecture
pub fn get_lecture_audio_path(media_dir: &Path, lesson_id: &str) -> PathBuf {
    get_lesson_dir(media_dir, lesson_id).join("lecture.wav")
}

/// Get the path for the lecture script that was read aloud
pub fn get_transcript_path(media_dir: &Path, lesson_id: &str) -> PathBuf {
    get_lesson_dir(media_dir, lesson_id).join("transcript.md")
}

/// Scratch path for a microphone recording
pub fn get_recording_path(media_dir: &Path) -> PathBuf {
    media_dir.join("voice").join("question.wav")
}

/// Path for the tutor's spoken reply
pub fn get_voice_reply_path(media_dir: &Path) -> PathBuf {
    media_dir.join("voice").join("reply.wav")
}

/// Get the path for the persisted progress document
pub fn get_progress_path(data_dir: &Path) -> PathBuf {
    data_dir.join("progress.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lesson_assets_share_a_directory() {
        let media = Path::new("/m");
        assert_eq!(get_video_path(media, "l1"), PathBuf::from("/m/l1/video.mp4"));
        assert_eq!(
            get_lecture_audio_path(media, "l1").parent(),
            get_transcript_path(media, "l1").parent()
        );
    }
}
