use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    time::Duration,
};

use resolve_path::PathResolveExt;
use serde::{Deserialize, Serialize};
use snafu::{ResultExt, Snafu};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "Config::default_history_file_path")]
    pub history_file_path: PathBuf,

    #[serde(default = "Config::default_max_history")]
    pub max_history: usize,

    #[serde(default = "Config::default_settings_file_path")]
    pub settings_file_path: PathBuf,

    #[serde(default = "Config::default_screenshot_cache_dir")]
    pub screenshot_cache_dir: PathBuf,

    #[serde(default = "Config::default_preview_length")]
    pub preview_length: usize,

    #[serde(default = "Config::default_opener_program")]
    pub opener_program: String,

    /// Keep serving copied content until another application replaces it.
    #[serde(default = "Config::default_serve_until_replaced")]
    pub serve_until_replaced: bool,

    #[serde(default)]
    pub preview: PreviewConfig,

    #[serde(default)]
    pub log: clipnest_cli::config::LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            history_file_path: Self::default_history_file_path(),
            max_history: Self::default_max_history(),
            settings_file_path: Self::default_settings_file_path(),
            screenshot_cache_dir: Self::default_screenshot_cache_dir(),
            preview_length: Self::default_preview_length(),
            opener_program: Self::default_opener_program(),
            serve_until_replaced: Self::default_serve_until_replaced(),
            preview: PreviewConfig::default(),
            log: clipnest_cli::config::LogConfig::default(),
        }
    }
}

impl Config {
    #[inline]
    pub fn default_path() -> PathBuf {
        [
            clipnest_base::PROJECT_CONFIG_DIR.to_path_buf(),
            PathBuf::from(clipnest_base::CTL_CONFIG_NAME),
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

    #[inline]
    pub fn default_settings_file_path() -> PathBuf {
        clipnest_base::config::default_settings_file_path()
    }

    #[inline]
    pub fn default_screenshot_cache_dir() -> PathBuf {
        clipnest_base::config::default_screenshot_cache_dir()
    }

    #[inline]
    pub const fn default_preview_length() -> usize { clipnest_base::DEFAULT_PREVIEW_LENGTH }

    #[inline]
    pub fn default_opener_program() -> String { "xdg-open".to_string() }

    #[inline]
    pub const fn default_serve_until_replaced() -> bool { true }

    #[inline]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)
            .context(OpenConfigSnafu { filename: path.to_path_buf() })?;

        let mut config: Self =
            toml::from_str(&data).context(ParseConfigSnafu { filename: path.to_path_buf() })?;

        config.history_file_path = resolve_path(&config.history_file_path)?;
        config.settings_file_path = resolve_path(&config.settings_file_path)?;
        config.screenshot_cache_dir = resolve_path(&config.screenshot_cache_dir)?;
        config.log.file_path = config.log.file_path.map(resolve_path).transpose()?;
        if config.max_history == 0 {
            config.max_history = Self::default_max_history();
        }

        Ok(config)
    }

    /// Falls back to the default config if the file is missing, other
    /// failures are reported on stderr.
    #[inline]
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(Error::OpenConfig { source, .. }) if source.kind() == ErrorKind::NotFound => {
                Self::default()
            }
            Err(err) => {
                eprintln!("{err}, fall back to default config");
                Self::default()
            }
        }
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PreviewConfig {
    #[serde(default = "PreviewConfig::default_browser_program")]
    pub browser_program: String,

    #[serde(default = "PreviewConfig::default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "PreviewConfig::default_favicon_timeout_secs")]
    pub favicon_timeout_secs: u64,

    #[serde(default = "PreviewConfig::default_screenshot_timeout_secs")]
    pub screenshot_timeout_secs: u64,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            browser_program: Self::default_browser_program(),
            request_timeout_secs: Self::default_request_timeout_secs(),
            favicon_timeout_secs: Self::default_favicon_timeout_secs(),
            screenshot_timeout_secs: Self::default_screenshot_timeout_secs(),
        }
    }
}

impl PreviewConfig {
    pub fn default_browser_program() -> String {
        clipnest_preview::ScreenshotCapturer::DEFAULT_BROWSER_PROGRAM.to_string()
    }

    pub const fn default_request_timeout_secs() -> u64 { 5 }

    pub const fn default_favicon_timeout_secs() -> u64 { 3 }

    pub const fn default_screenshot_timeout_secs() -> u64 { 30 }

    pub const fn request_timeout(&self) -> Duration { Duration::from_secs(self.request_timeout_secs) }

    pub const fn favicon_timeout(&self) -> Duration { Duration::from_secs(self.favicon_timeout_secs) }

    pub const fn screenshot_timeout(&self) -> Duration {
        Duration::from_secs(self.screenshot_timeout_secs)
    }
}

fn resolve_path<P>(path: P) -> Result<PathBuf, Error>
where
    P: AsRef<Path>,
{
    path.as_ref()
        .try_resolve()
        .map(|path| path.to_path_buf())
        .with_context(|_| ResolveFilePathSnafu { file_path: path.as_ref().to_path_buf() })
}

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("Could not open config from {}: {source}", filename.display()))]
    OpenConfig { filename: PathBuf, source: std::io::Error },

    #[snafu(display("Count not parse config from {}: {source}", filename.display()))]
    ParseConfig { filename: PathBuf, source: toml::de::Error },

    #[snafu(display("Could not resolve file path {}: {source}", file_path.display()))]
    ResolveFilePath { file_path: PathBuf, source: std::io::Error },
}

#[cfg(test)]
mod tests {
    use super::Config;

    #[test]
    fn test_load() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("clipnestctl.toml");
        std::fs::write(
            &file_path,
            "preview_length = 80\nopener_program = \"open\"\n\n[preview]\nbrowser_program = \
             \"google-chrome\"\n",
        )
        .unwrap();

        let config = Config::load(&file_path).unwrap();
        assert_eq!(config.preview_length, 80);
        assert_eq!(config.opener_program, "open");
        assert_eq!(config.preview.browser_program, "google-chrome");
        assert_eq!(config.preview.request_timeout_secs, 5);
        assert_eq!(config.preview.screenshot_timeout_secs, 30);
        assert_eq!(config.max_history, 25);
    }

    #[test]
    fn test_load_or_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(dir.path().join("missing.toml"));
        assert_eq!(config.preview_length, 50);
        assert!(config.history_file_path.ends_with("clipboard_history.json"));
        assert!(config.settings_file_path.ends_with("window_settings.json"));
    }
}
