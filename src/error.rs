use std::io;

use thiserror::Error;

/// Errors surfaced by the journal core.
///
/// Staging failures are reported to the caller because they affect whether a
/// save is durably recorded. Pull/push failures are not: local durability was
/// already achieved, and the next debounce or reconciliation cycle retries
/// the remote side.
#[derive(Debug, Error)]
pub enum JournalError {
    #[error("invalid note id '{0}': expected YYYYMMDD")]
    InvalidId(String),

    #[error("notes root not readable: {0}")]
    StorageUnavailable(#[source] io::Error),

    #[error("could not write note: {0}")]
    StorageWrite(#[source] io::Error),

    #[error("git staging failed: {0}")]
    SyncStage(String),

    #[error("remote sync failed: {0}")]
    SyncRemote(String),

    #[error("attachment {index} out of range for note {id}")]
    AttachmentOutOfRange { id: String, index: usize },
}
