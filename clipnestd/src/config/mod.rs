mod error;
mod ocr;
mod watcher;

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use resolve_path::PathResolveExt;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

pub use self::error::Error;
use self::{ocr::OcrConfig, watcher::WatcherConfig};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "Config::default_max_history")]
    pub max_history: usize,

    #[serde(default = "Config::default_history_file_path")]
    pub history_file_path: PathBuf,

    #[serde(default)]
    pub log: clipnest_cli::config::LogConfig,

    #[serde(default)]
    pub watcher: WatcherConfig,

    #[serde(default)]
    pub ocr: OcrConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_history: Self::default_max_history(),
            history_file_path: Self::default_history_file_path(),
            log: clipnest_cli::config::LogConfig::default(),
            watcher: WatcherConfig::default(),
            ocr: OcrConfig::default(),
        }
    }
}

impl Config {
    #[inline]
    pub fn default_path() -> PathBuf {
        [
            clipnest_base::PROJECT_CONFIG_DIR.to_path_buf(),
            PathBuf::from(clipnest_base::DAEMON_CONFIG_NAME),
        ]
        .into_iter()
        .collect()
    }

    #[inline]
    pub fn default_history_file_path() -> PathBuf {
        clipnest_base::config::default_history_file_path()
    }

    #[inline]
    pub const fn default_max_history() -> usize { clipnest_base::DEFAULT_MAX_HISTORY }

    /// Reads the config file, a missing file yields the default config.
    #[inline]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let config = match std::fs::read_to_string(path) {
            Ok(data) => toml::from_str(&data)
                .context(error::ParseConfigSnafu { filename: path.to_path_buf() })?,
            Err(err) if err.kind() == ErrorKind::NotFound => Self::default(),
            Err(source) => {
                return Err(Error::OpenConfig { filename: path.to_path_buf(), source });
            }
        };
        config.resolve()
    }

    fn resolve(mut self) -> Result<Self, Error> {
        self.log.file_path = self.log.file_path.map(resolve_path).transpose()?;

        self.max_history =
            if self.max_history == 0 { Self::default_max_history() } else { self.max_history };

        self.history_file_path = resolve_path(&self.history_file_path)?;

        Ok(self)
    }
}

impl From<Config> for clipnest_server::Config {
    fn from(Config { max_history, history_file_path, watcher, ocr, .. }: Config) -> Self {
        Self {
            max_history,
            history_file_path,
            watcher: clipnest_server::ClipboardWatcherOptions::from(watcher),
            ocr: ocr.into(),
        }
    }
}

fn resolve_path<P>(path: P) -> Result<PathBuf, Error>
where
    P: AsRef<Path>,
{
    path.as_ref()
        .try_resolve()
        .map(|path| path.to_path_buf())
        .with_context(|_| error::ResolveFilePathSnafu { file_path: path.as_ref().to_path_buf() })
}

#[cfg(test)]
mod tests {
    use super::Config;

    #[test]
    fn test_default_config_is_serializable() {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        let config: Config = toml::from_str(&text).unwrap();
        assert_eq!(config.max_history, 25);
        assert_eq!(config.watcher.poll_interval_ms, 500);
        assert!(config.ocr.enable);
        assert_eq!(config.ocr.program, "tesseract");
    }

    #[test]
    fn test_load() {
        let dir = tempfile::tempdir().unwrap();
        let missing = Config::load(dir.path().join("missing.toml")).unwrap();
        assert_eq!(missing.max_history, 25);

        let file_path = dir.path().join("clipnestd.toml");
        std::fs::write(
            &file_path,
            "max_history = 0\nhistory_file_path = \"/tmp/history.json\"\n\n[watcher]\n\
             poll_interval_ms = 250\ncapture_image = false\n\n[ocr]\nenable = false\n",
        )
        .unwrap();
        let config = Config::load(&file_path).unwrap();
        assert_eq!(config.max_history, 25);
        assert_eq!(config.history_file_path.to_str(), Some("/tmp/history.json"));
        assert_eq!(config.watcher.poll_interval_ms, 250);
        assert!(!config.watcher.capture_image);

        let server_config = clipnest_server::Config::from(config);
        assert!(server_config.ocr.is_none());
        assert_eq!(server_config.watcher.poll_interval.as_millis(), 250);

        std::fs::write(&file_path, "max_history = \"many\"").unwrap();
        assert!(Config::load(&file_path).is_err());
    }
}
