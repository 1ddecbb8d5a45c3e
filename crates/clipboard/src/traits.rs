use clipnest_base::ClipboardContent;

use crate::Error;

pub trait Load: Send + Sync {
    /// # Errors
    fn load(&self) -> Result<ClipboardContent, Error>;

    fn is_empty(&self) -> bool { matches!(self.load(), Err(Error::Empty)) }
}

pub trait Store: Send + Sync {
    /// # Errors
    fn store(&self, content: ClipboardContent) -> Result<(), Error>;

    /// # Errors
    fn clear(&self) -> Result<(), Error>;
}

pub trait LoadExt: Load {
    /// # Errors
    fn load_string(&self) -> Result<String, Error> {
        if let ClipboardContent::Plaintext(text) = self.load()? {
            Ok(text)
        } else {
            Err(Error::Empty)
        }
    }
}

impl<C: Load + ?Sized> LoadExt for C {}

pub trait StoreExt: Store {
    /// # Errors
    fn store_string(&self, data: &str) -> Result<(), Error> {
        self.store(ClipboardContent::Plaintext(data.to_string()))
    }
}

impl<C: Store + ?Sized> StoreExt for C {}
