//! Runtime configuration: defaults, then environment, then explicit overrides.

use std::{path::PathBuf, time::Duration};

use crate::{cache::get_root_cache_dir, provider::ProviderConfig};

pub const DATA_DIR_ENV: &str = "ACADEMY_DATA_DIR";
pub const MEDIA_DIR_ENV: &str = "ACADEMY_MEDIA_DIR";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Clone, Debug)]
pub struct AcademyConfig {
    /// Where `progress.json` lives.
    pub data_dir: PathBuf,
    /// Where generated videos, lectures and voice replies are written.
    pub media_dir: PathBuf,
    pub provider: ProviderConfig,
    pub poll_interval: Duration,
}

impl Default for AcademyConfig {
    fn default() -> Self {
        Self {
            data_dir: get_root_data_dir(),
            media_dir: get_root_cache_dir(),
            provider: ProviderConfig::default(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl AcademyConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = std::env::var_os(MEDIA_DIR_ENV) {
            config.media_dir = PathBuf::from(dir);
        }
        config
    }

    pub fn with_data_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            self.data_dir = dir;
        }
        self
    }

    pub fn with_media_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            self.media_dir = dir;
        }
        self
    }

    pub fn with_poll_interval(mut self, secs: Option<u64>) -> Self {
        if let Some(secs) = secs {
            self.poll_interval = Duration::from_secs(secs.max(1));
        }
        self
    }
}

pub fn get_root_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("esg-academy")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_win_over_defaults() {
        let config = AcademyConfig::default()
            .with_data_dir(Some(PathBuf::from("/x/data")))
            .with_media_dir(None)
            .with_poll_interval(Some(0));
        assert_eq!(config.data_dir, PathBuf::from("/x/data"));
        assert_eq!(config.media_dir, get_root_cache_dir());
        assert_eq!(config.poll_interval, Duration::from_secs(1));
    }
}
