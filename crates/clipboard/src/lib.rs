mod default;
mod error;
mod local;
mod traits;

pub use clipnest_base::ClipboardContent;

pub use self::{
    default::Clipboard,
    error::Error,
    local::Clipboard as LocalClipboard,
    traits::{
        Load as ClipboardLoad, LoadExt as ClipboardLoadExt, Store as ClipboardStore,
        StoreExt as ClipboardStoreExt,
    },
};
