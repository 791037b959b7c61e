//! Persistence of the progress document as a single JSON file.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, warn};

use crate::{cache::get_progress_path, content::Course, error::Result, progress::UserProgress};

#[derive(Debug, Clone)]
pub struct ProgressStore {
    path: PathBuf,
}

impl ProgressStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn in_data_dir(data_dir: &Path) -> Self {
        Self::new(get_progress_path(data_dir))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the saved document. A missing or unreadable document yields a fresh one.
    pub async fn load(&self, course: &Course) -> Result<UserProgress> {
        let json = match fs::read_to_string(&self.path).await {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no saved progress");
                return Ok(UserProgress::fresh(course));
            }
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str::<UserProgress>(&json) {
            Ok(progress) => Ok(progress.normalize(course)),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "saved progress is corrupt, starting fresh"
                );
                Ok(UserProgress::fresh(course))
            }
        }
    }

    /// Writes the whole document through a temporary sibling and a rename.
    pub async fn save(&self, progress: &UserProgress) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(progress)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), "progress saved");
        Ok(())
    }
}
