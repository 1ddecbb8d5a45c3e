use std::path::PathBuf;

#[inline]
#[must_use]
pub fn default_history_file_path() -> PathBuf {
    [crate::PROJECT_DATA_DIR.to_path_buf(), PathBuf::from(crate::HISTORY_FILE_NAME)]
        .into_iter()
        .collect()
}

#[inline]
#[must_use]
pub fn default_settings_file_path() -> PathBuf {
    [crate::PROJECT_CONFIG_DIR.to_path_buf(), PathBuf::from(crate::SETTINGS_FILE_NAME)]
        .into_iter()
        .collect()
}

#[inline]
#[must_use]
pub fn default_screenshot_cache_dir() -> PathBuf {
    [crate::PROJECT_CACHE_DIR.to_path_buf(), PathBuf::from(crate::SCREENSHOT_CACHE_DIR_NAME)]
        .into_iter()
        .collect()
}
