mod entry;
pub mod history;
mod record;
pub mod settings;
mod store;

pub use self::{
    entry::{Content as EntryContent, Entry, Id as EntryId, Snapshot as EntrySnapshot},
    history::{Error as HistoryError, HistoryLock, HistoryManager},
    record::{Error as RecordError, Record},
    settings::{Error as SettingsError, Theme, ThemePreset, WindowSettings},
    store::{HistoryStore, InsertOutcome},
};
