use std::{ffi::OsString, path::Path};

use notify::{Event as FsEvent, EventKind};
use tokio::sync::mpsc;

use crate::event::Event;

/// Forwards file system events about the history file to the control loop.
pub struct EventHandler {
    file_name: OsString,

    event_sender: mpsc::UnboundedSender<Event>,
}

impl EventHandler {
    pub fn new(file_path: &Path, event_sender: mpsc::UnboundedSender<Event>) -> Self {
        let file_name = file_path.file_name().map(OsString::from).unwrap_or_default();
        Self { file_name, event_sender }
    }

    fn concerns_history_file(&self, event: &FsEvent) -> bool {
        matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_))
            && event.paths.iter().any(|path| path.file_name() == Some(self.file_name.as_os_str()))
    }
}

impl notify::EventHandler for EventHandler {
    fn handle_event(&mut self, event: notify::Result<FsEvent>) {
        match event {
            Ok(event) if self.concerns_history_file(&event) => {
                tracing::trace!("History file event: {:?}", event.kind);
                drop(self.event_sender.send(Event::HistoryFileChanged));
            }
            Ok(_) => {}
            Err(err) => tracing::warn!("Error occurs while watching file system, error: {err:?}"),
        }
    }
}
