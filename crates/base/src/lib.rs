pub mod config;
mod image;
mod kind;
pub mod serde;

use std::{path::PathBuf, time::Duration};

use bytes::Bytes;
use directories::ProjectDirs;
use once_cell::sync::Lazy;

pub use self::{
    image::{decode_png, encode_png, Error as ImageError},
    kind::{Error as EntryKindError, Kind as EntryKind},
};

pub const PROJECT_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const PROJECT_NAME: &str = "clipnest";
pub const PROJECT_NAME_WITH_INITIAL_CAPITAL: &str = "Clipnest";

pub const DAEMON_PROGRAM_NAME: &str = "clipnestd";
pub const DAEMON_CONFIG_NAME: &str = "clipnestd.toml";

pub const CTL_PROGRAM_NAME: &str = "clipnestctl";
pub const CTL_CONFIG_NAME: &str = "clipnestctl.toml";

pub const HISTORY_FILE_NAME: &str = "clipboard_history.json";
pub const SETTINGS_FILE_NAME: &str = "window_settings.json";
pub const SCREENSHOT_CACHE_DIR_NAME: &str = "url_screenshots";

/// Upper bound of unpinned entries kept in history.
pub const DEFAULT_MAX_HISTORY: usize = 25;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

pub const DEFAULT_PREVIEW_LENGTH: usize = 50;

static PROJECT_DIRS: Lazy<Option<ProjectDirs>> =
    Lazy::new(|| ProjectDirs::from("", PROJECT_NAME, PROJECT_NAME));

pub static PROJECT_CONFIG_DIR: Lazy<PathBuf> = Lazy::new(|| {
    PROJECT_DIRS
        .as_ref()
        .map_or_else(|| std::env::temp_dir().join(PROJECT_NAME), |dirs| dirs.config_dir().to_path_buf())
});

pub static PROJECT_DATA_DIR: Lazy<PathBuf> = Lazy::new(|| {
    PROJECT_DIRS
        .as_ref()
        .map_or_else(|| std::env::temp_dir().join(PROJECT_NAME), |dirs| dirs.data_dir().to_path_buf())
});

pub static PROJECT_CACHE_DIR: Lazy<PathBuf> = Lazy::new(|| {
    PROJECT_DIRS
        .as_ref()
        .map_or_else(|| std::env::temp_dir().join(PROJECT_NAME), |dirs| dirs.cache_dir().to_path_buf())
});

/// Raw content read from or written to the system clipboard.
///
/// Images are kept as RGBA8 pixels so they can be handed to the clipboard
/// without another conversion.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum ClipboardContent {
    Plaintext(String),
    Image { width: usize, height: usize, bytes: Bytes },
}

impl Default for ClipboardContent {
    fn default() -> Self { Self::Plaintext(String::new()) }
}

impl ClipboardContent {
    #[inline]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Plaintext(s) => s.is_empty(),
            Self::Image { bytes, .. } => bytes.is_empty(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Self::Plaintext(s) => s.len(),
            Self::Image { bytes, .. } => bytes.len(),
        }
    }

    #[inline]
    pub const fn is_plaintext(&self) -> bool { matches!(&self, Self::Plaintext(_)) }

    #[inline]
    pub const fn is_image(&self) -> bool { matches!(&self, Self::Image { .. }) }

    #[inline]
    pub const fn kind(&self) -> EntryKind {
        match self {
            Self::Plaintext(_) => EntryKind::Text,
            Self::Image { .. } => EntryKind::Image,
        }
    }

    #[inline]
    pub fn basic_information(&self) -> String {
        let size = humansize::format_size(self.len(), humansize::BINARY);
        match self {
            Self::Plaintext(_) => format!("text, {size}"),
            Self::Image { width, height, .. } => format!("image {width}x{height}, {size}"),
        }
    }

    /// Encodes the content as PNG when it is an image.
    ///
    /// # Errors
    /// Returns an error if the content is not an image or encoding fails.
    pub fn to_png(&self) -> Result<Bytes, ImageError> {
        match self {
            Self::Image { width, height, bytes } => encode_png(*width, *height, bytes),
            Self::Plaintext(_) => Err(ImageError::NotAnImage),
        }
    }

    /// # Errors
    /// Returns an error if `png` is not a decodable PNG image.
    pub fn from_png(png: &[u8]) -> Result<Self, ImageError> {
        let (width, height, bytes) = decode_png(png)?;
        Ok(Self::Image { width, height, bytes })
    }
}

impl AsRef<Self> for ClipboardContent {
    fn as_ref(&self) -> &Self { self }
}
