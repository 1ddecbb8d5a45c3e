use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Options {
    pub poll_interval: Duration,

    pub capture_image: bool,

    /// Longer text, counted in characters, is not captured.
    pub filter_text_max_length: usize,

    /// Images whose PNG encoding is larger than this, in bytes, are not
    /// captured.
    pub filter_image_max_size: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            poll_interval: clipnest_base::DEFAULT_POLL_INTERVAL,
            capture_image: true,
            filter_text_max_length: 5 * (1 << 20),
            // 5 MiB
            filter_image_max_size: 5 * (1 << 20),
        }
    }
}
