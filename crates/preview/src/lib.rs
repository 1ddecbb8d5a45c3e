mod error;
mod metadata;
mod ocr;
mod screenshot;
pub mod url;

pub use self::{
    error::Error,
    metadata::{MetadataFetcher, PageMetadata},
    ocr::OcrEngine,
    screenshot::ScreenshotCapturer,
};
