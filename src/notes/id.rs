use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::JournalError;

static ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{8}$").expect("note id regex"));

/// A note identifier: an 8-digit calendar date (`YYYYMMDD`).
///
/// The identifier doubles as the note's directory name under the notes root,
/// so it is validated before anything touches the filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoteId(String);

impl NoteId {
    pub fn parse(raw: &str) -> Result<Self, JournalError> {
        if ID_RE.is_match(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(JournalError::InvalidId(raw.to_string()))
        }
    }

    /// The identifier for the current local calendar date.
    pub fn today() -> Self {
        Self(chrono::Local::now().format("%Y%m%d").to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
