use std::{
    path::{Path, PathBuf},
    process::Stdio,
    time::Duration,
};

use snafu::ResultExt;
use tokio::process::Command;

use crate::{error, url, Error};

const WINDOW_SIZE: &str = "1280,720";

/// Renders web pages to PNG files with a headless browser and caches them by
/// the hash of the normalized URL.
#[derive(Clone, Debug)]
pub struct ScreenshotCapturer {
    cache_dir: PathBuf,

    browser_program: String,

    timeout: Duration,
}

impl ScreenshotCapturer {
    pub const DEFAULT_BROWSER_PROGRAM: &'static str = "chromium";

    pub fn new<P, S>(cache_dir: P, browser_program: S, timeout: Duration) -> Self
    where
        P: AsRef<Path>,
        S: Into<String>,
    {
        Self {
            cache_dir: cache_dir.as_ref().to_path_buf(),
            browser_program: browser_program.into(),
            timeout,
        }
    }

    #[must_use]
    pub fn cache_path(&self, url: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.png", url::cache_key(url)))
    }

    /// Returns the cached screenshot of `url` or renders a new one.
    ///
    /// # Errors
    /// Returns an error if the browser fails, times out or writes no file.
    pub async fn try_capture(&self, url: &str) -> Result<PathBuf, Error> {
        let cache_path = self.cache_path(url);
        if tokio::fs::try_exists(&cache_path).await.unwrap_or(false) {
            tracing::debug!("Use cached screenshot `{}`", cache_path.display());
            return Ok(cache_path);
        }

        tokio::fs::create_dir_all(&self.cache_dir)
            .await
            .context(error::CreateDirectorySnafu { path: self.cache_dir.clone() })?;

        let mut child = Command::new(&self.browser_program)
            .arg("--headless")
            .arg("--disable-gpu")
            .arg("--hide-scrollbars")
            .arg(format!("--window-size={WINDOW_SIZE}"))
            .arg(format!("--screenshot={}", cache_path.display()))
            .arg(url::normalize_url(url))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .context(error::CallExternalProgramSnafu { program: self.browser_program.clone() })?;

        let status = tokio::time::timeout(self.timeout, child.wait())
            .await
            .map_err(|_| Error::ExternalProgramTimeout {
                program: self.browser_program.clone(),
                timeout: self.timeout,
            })?
            .context(error::CallExternalProgramSnafu { program: self.browser_program.clone() })?;
        if !status.success() {
            return Err(Error::ExternalProgramFailed {
                program: self.browser_program.clone(),
                status,
            });
        }

        if tokio::fs::try_exists(&cache_path).await.unwrap_or(false) {
            Ok(cache_path)
        } else {
            Err(Error::ScreenshotNotProduced { path: cache_path })
        }
    }

    /// Like [`ScreenshotCapturer::try_capture`], but a failure yields `None`.
    pub async fn capture(&self, url: &str) -> Option<PathBuf> {
        self.try_capture(url)
            .await
            .map_err(|err| tracing::warn!("Could not capture screenshot of {url}, {err}"))
            .ok()
    }
}
