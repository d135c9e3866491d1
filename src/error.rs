use std::io;

use thiserror::Error;

/// Errors surfaced by the async buffering layer: a small `thiserror` enum,
/// one variant per distinct way a streamed source can fail.
#[derive(Error, Debug)]
pub enum AsyncIoError {
    #[error("failed to allocate ring buffer")]
    NoMemory,

    #[error("inner source failed to open: {0}")]
    InnerOpenFailed(#[source] io::Error),

    #[error("inner source I/O error: {0}")]
    InnerIo(#[source] io::Error),

    #[error("end of stream")]
    Eof,

    #[error("invalid seek")]
    InvalidSeek,

    #[error("operation interrupted")]
    Interrupted,

    #[error("failed to initialize synchronization primitives: {0}")]
    SyncInitFailed(String),
}

impl From<AsyncIoError> for io::Error {
    fn from(err: AsyncIoError) -> Self {
        match err {
            AsyncIoError::Eof => io::Error::new(io::ErrorKind::UnexpectedEof, err),
            AsyncIoError::InvalidSeek => io::Error::new(io::ErrorKind::InvalidInput, err),
            AsyncIoError::Interrupted => io::Error::new(io::ErrorKind::Interrupted, err),
            AsyncIoError::InnerOpenFailed(e) | AsyncIoError::InnerIo(e) => e,
            AsyncIoError::NoMemory | AsyncIoError::SyncInitFailed(_) => {
                io::Error::new(io::ErrorKind::Other, err)
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, AsyncIoError>;
