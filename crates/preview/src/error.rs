use std::{path::PathBuf, process::ExitStatus, time::Duration};

use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Could not build HTTP client, error: {source}"))]
    BuildHttpClient { source: reqwest::Error },

    #[snafu(display("Could not fetch {url}, error: {source}"))]
    FetchUrl { url: String, source: reqwest::Error },

    #[snafu(display("Could not create temporary file, error: {source}"))]
    CreateTemporaryFile { source: std::io::Error },

    #[snafu(display("Could not write temporary file: {}, error: {source}", filename.display()))]
    WriteTemporaryFile { filename: PathBuf, source: std::io::Error },

    #[snafu(display("Could not create directory: {}, error: {source}", path.display()))]
    CreateDirectory { path: PathBuf, source: std::io::Error },

    #[snafu(display("Could not call external program: {program}, error: {source}"))]
    CallExternalProgram { program: String, source: std::io::Error },

    #[snafu(display("External program {program} exited with {status}"))]
    ExternalProgramFailed { program: String, status: ExitStatus },

    #[snafu(display("External program {program} did not finish within {timeout:?}"))]
    ExternalProgramTimeout { program: String, timeout: Duration },

    #[snafu(display("Screenshot {} was not produced", path.display()))]
    ScreenshotNotProduced { path: PathBuf },
}
