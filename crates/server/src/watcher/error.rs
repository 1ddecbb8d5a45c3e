use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Could not read clipboard, error: {source}"))]
    JoinClipboardTask { source: tokio::task::JoinError },

    #[snafu(display("Could not send clipboard event"))]
    SendClipboardEvent,
}
