use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct OcrConfig {
    #[serde(default = "OcrConfig::default_enable")]
    pub enable: bool,

    #[serde(default = "OcrConfig::default_program")]
    pub program: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self { enable: Self::default_enable(), program: Self::default_program(), language: None }
    }
}

impl OcrConfig {
    pub const fn default_enable() -> bool { true }

    pub fn default_program() -> String { clipnest_preview::OcrEngine::DEFAULT_PROGRAM.to_string() }
}

impl From<OcrConfig> for Option<clipnest_preview::OcrEngine> {
    fn from(OcrConfig { enable, program, language }: OcrConfig) -> Self {
        enable.then(|| clipnest_preview::OcrEngine::new(program, language))
    }
}
