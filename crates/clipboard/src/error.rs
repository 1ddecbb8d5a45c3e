use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("{error}"))]
    Arboard { error: arboard::Error },

    #[snafu(display("Clipboard is empty"))]
    Empty,
}

impl From<arboard::Error> for Error {
    fn from(error: arboard::Error) -> Self {
        match error {
            arboard::Error::ContentNotAvailable => Self::Empty,
            error => Self::Arboard { error },
        }
    }
}
