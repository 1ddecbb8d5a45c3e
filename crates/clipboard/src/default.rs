use std::{borrow::Cow, sync::Arc};

#[cfg(all(unix, not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))))]
use arboard::SetExtLinux;
use bytes::Bytes;
use clipnest_base::ClipboardContent;
use parking_lot::Mutex;

use crate::{ClipboardLoad, ClipboardStore, Error};

/// System clipboard backed by `arboard`.
#[derive(Clone)]
pub struct Clipboard {
    inner: Arc<Mutex<arboard::Clipboard>>,
    wait_until_replaced: bool,
}

impl Clipboard {
    /// # Errors
    pub fn new() -> Result<Self, Error> {
        let inner = arboard::Clipboard::new()?;
        Ok(Self { inner: Arc::new(Mutex::new(inner)), wait_until_replaced: false })
    }

    /// Makes [`ClipboardStore::store`] block until another application takes
    /// over the clipboard.
    ///
    /// On X11 and Wayland the content is served by the owning process, so a
    /// short-lived process has to stay alive to keep it available. Elsewhere this
    /// has no effect.
    #[must_use]
    pub const fn wait_until_replaced(mut self, wait: bool) -> Self {
        self.wait_until_replaced = wait;
        self
    }
}

impl ClipboardLoad for Clipboard {
    fn load(&self) -> Result<ClipboardContent, Error> {
        let mut clipboard = self.inner.lock();

        match clipboard.get_text() {
            Ok(text) => Ok(ClipboardContent::Plaintext(text)),
            Err(arboard::Error::ContentNotAvailable) => {
                let arboard::ImageData { width, height, bytes } = clipboard.get_image()?;
                Ok(ClipboardContent::Image { width, height, bytes: Bytes::from(bytes.into_owned()) })
            }
            Err(err) => Err(Error::from(err)),
        }
    }
}

impl ClipboardStore for Clipboard {
    fn store(&self, content: ClipboardContent) -> Result<(), Error> {
        let mut clipboard = self.inner.lock();
        let set = clipboard.set();

        #[cfg(all(
            unix,
            not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))
        ))]
        let set = if self.wait_until_replaced {
            tracing::debug!("Serve clipboard content until it is replaced");
            set.wait()
        } else {
            set
        };

        match content {
            ClipboardContent::Plaintext(text) => set.text(text)?,
            ClipboardContent::Image { width, height, bytes } => set.image(arboard::ImageData {
                width,
                height,
                bytes: Cow::Owned(bytes.to_vec()),
            })?,
        }
        Ok(())
    }

    #[inline]
    fn clear(&self) -> Result<(), Error> {
        self.inner.lock().clear()?;
        Ok(())
    }
}
