use std::sync::Arc;

use clipnest_base::ClipboardContent;
use parking_lot::RwLock;

use crate::{ClipboardLoad, ClipboardStore, Error};

/// In-process clipboard, useful for tests and headless sessions.
#[derive(Clone, Debug, Default)]
pub struct Clipboard {
    data: Arc<RwLock<Option<ClipboardContent>>>,
}

impl Clipboard {
    #[inline]
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[inline]
    #[must_use]
    pub fn with_content(content: ClipboardContent) -> Self {
        Self { data: Arc::new(RwLock::new(Some(content))) }
    }
}

impl ClipboardLoad for Clipboard {
    fn load(&self) -> Result<ClipboardContent, Error> { self.data.read().clone().ok_or(Error::Empty) }
}

impl ClipboardStore for Clipboard {
    #[inline]
    fn store(&self, content: ClipboardContent) -> Result<(), Error> {
        *self.data.write() = Some(content);
        Ok(())
    }

    fn clear(&self) -> Result<(), Error> {
        *self.data.write() = None;
        Ok(())
    }
}
