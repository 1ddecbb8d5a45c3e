use std::{fmt, process::Stdio};

use snafu::ResultExt;
use tokio::process::Command;

use crate::{error, Error};

/// Recognizes text in images with an external OCR program, `tesseract` by
/// default.
#[derive(Clone, Debug)]
pub struct OcrEngine {
    program: String,

    language: Option<String>,
}

impl Default for OcrEngine {
    fn default() -> Self { Self::new(Self::DEFAULT_PROGRAM, None::<String>) }
}

impl OcrEngine {
    pub const DEFAULT_PROGRAM: &'static str = "tesseract";

    pub fn new<P, L>(program: P, language: Option<L>) -> Self
    where
        P: fmt::Display,
        L: fmt::Display,
    {
        Self { program: program.to_string(), language: language.map(|l| l.to_string()) }
    }

    #[inline]
    #[must_use]
    pub fn program(&self) -> &str { &self.program }

    /// Runs the OCR program on a PNG image and returns the trimmed text.
    ///
    /// # Errors
    /// Returns an error if the program can not be run or fails.
    pub async fn try_extract_text(&self, png: &[u8]) -> Result<String, Error> {
        let tmp_file = tempfile::Builder::new()
            .prefix(&format!(".{}-ocr-", clipnest_base::PROJECT_NAME))
            .suffix(".png")
            .tempfile()
            .context(error::CreateTemporaryFileSnafu)?;
        tokio::fs::write(tmp_file.path(), png)
            .await
            .context(error::WriteTemporaryFileSnafu { filename: tmp_file.path().to_path_buf() })?;

        let mut command = Command::new(&self.program);
        let _ = command.arg(tmp_file.path()).arg("stdout");
        if let Some(language) = &self.language {
            let _ = command.arg("-l").arg(language);
        }

        let output = command
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .context(error::CallExternalProgramSnafu { program: self.program.clone() })?;
        if !output.status.success() {
            return Err(Error::ExternalProgramFailed {
                program: self.program.clone(),
                status: output.status,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Like [`OcrEngine::try_extract_text`], but any failure yields an empty
    /// string.
    pub async fn extract_text(&self, png: &[u8]) -> String {
        match self.try_extract_text(png).await {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!("OCR failed, {err}");
                String::new()
            }
        }
    }
}
