use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct WatcherConfig {
    #[serde(default = "WatcherConfig::default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default = "WatcherConfig::default_capture_image")]
    pub capture_image: bool,

    #[serde(default = "WatcherConfig::default_filter_text_max_length")]
    pub filter_text_max_length: usize,

    #[serde(default = "WatcherConfig::default_filter_image_max_size")]
    pub filter_image_max_size: usize,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: Self::default_poll_interval_ms(),
            capture_image: Self::default_capture_image(),
            filter_text_max_length: Self::default_filter_text_max_length(),
            filter_image_max_size: Self::default_filter_image_max_size(),
        }
    }
}

impl From<WatcherConfig> for clipnest_server::ClipboardWatcherOptions {
    fn from(
        WatcherConfig {
            poll_interval_ms,
            capture_image,
            filter_text_max_length,
            filter_image_max_size,
        }: WatcherConfig,
    ) -> Self {
        Self {
            poll_interval: Duration::from_millis(poll_interval_ms.max(1)),
            capture_image,
            filter_text_max_length,
            filter_image_max_size,
        }
    }
}

impl WatcherConfig {
    #[allow(clippy::cast_possible_truncation)]
    pub const fn default_poll_interval_ms() -> u64 {
        clipnest_base::DEFAULT_POLL_INTERVAL.as_millis() as u64
    }

    pub const fn default_capture_image() -> bool { true }

    pub const fn default_filter_text_max_length() -> usize { 20_000_000 }

    pub const fn default_filter_image_max_size() -> usize {
        // 5 MiB
        5 * (1 << 20)
    }
}
