//! Microphone capture and audio playback through ffmpeg / ffplay.

use std::{
    path::{Path, PathBuf},
    process::Stdio,
};

use tokio::{
    fs,
    io::AsyncWriteExt,
    process::{Child, Command},
};
use tracing::{debug, info};

use crate::{
    client::AudioClip,
    error::{AcademyError, Result},
};

fn input_device() -> (&'static str, &'static str) {
    if cfg!(target_os = "macos") {
        ("avfoundation", ":0")
    } else if cfg!(target_os = "windows") {
        ("dshow", "audio=default")
    } else {
        ("pulse", "default")
    }
}

fn media_error(path: &Path, reason: impl Into<String>) -> AcademyError {
    AcademyError::Media {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

/// A running microphone capture. Dropping it kills ffmpeg.
pub struct Recorder {
    child: Child,
    path: PathBuf,
}

impl Recorder {
    /// Starts capturing the default input device into a 16 kHz mono WAV at `path`.
    pub async fn start(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let (format, device) = input_device();
        let child = Command::new("ffmpeg")
            .arg("-y")
            .arg("-loglevel")
            .arg("error")
            .arg("-f")
            .arg(format)
            .arg("-i")
            .arg(device)
            .arg("-ar")
            .arg("16000")
            .arg("-ac")
            .arg("1")
            .arg("-acodec")
            .arg("pcm_s16le")
            .arg(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| media_error(path, format!("failed to start ffmpeg: {e}")))?;

        info!(path = %path.display(), "recording started");
        Ok(Self {
            child,
            path: path.to_path_buf(),
        })
    }

    /// Asks ffmpeg to finish the file and returns the recording.
    pub async fn stop(mut self) -> Result<AudioClip> {
        if let Some(mut stdin) = self.child.stdin.take() {
            stdin.write_all(b"q").await?;
            stdin.flush().await?;
        }
        let output = self.child.wait_with_output().await?;
        if !output.status.success() {
            return Err(media_error(
                &self.path,
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        let bytes = fs::read(&self.path).await?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "recording finished");
        Ok(AudioClip::wav(bytes))
    }
}

/// Plays an audio file in the background. Returns once the player is running.
pub async fn play(path: &Path) -> Result<()> {
    if !fs::try_exists(path).await? {
        return Err(media_error(path, "file does not exist"));
    }
    let mut child = Command::new("ffplay")
        .arg("-nodisp")
        .arg("-autoexit")
        .arg("-loglevel")
        .arg("quiet")
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| media_error(path, format!("failed to start ffplay: {e}")))?;

    let shown = path.display().to_string();
    tokio::spawn(async move {
        match child.wait().await {
            Ok(status) => debug!(path = %shown, %status, "playback finished"),
            Err(e) => debug!(path = %shown, error = %e, "playback wait failed"),
        }
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn playing_a_missing_file_is_a_media_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = play(&dir.path().join("absent.wav")).await;
        assert!(matches!(result, Err(AcademyError::Media { .. })));
    }
}
