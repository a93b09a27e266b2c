use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;

use crate::error::JournalError;
use crate::notes::id::NoteId;

/// File inside each note directory holding the note body. Everything else in
/// the directory is an attachment.
pub const NOTE_FILE: &str = "note.md";

/// Disk layout for the note tree: one directory per note, named by the note
/// identifier, containing `note.md` plus any attachments.
pub struct NoteStore {
    root: PathBuf,
}

impl NoteStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn note_dir(&self, id: &NoteId) -> PathBuf {
        self.root.join(id.as_str())
    }

    /// All note identifiers present on disk, most recent first.
    ///
    /// Non-directory entries and directories whose names are not valid
    /// identifiers (including flat files from the legacy single-file layout)
    /// are ignored.
    pub async fn list_ids(&self) -> Result<Vec<NoteId>, JournalError> {
        let mut entries = fs::read_dir(&self.root)
            .await
            .map_err(JournalError::StorageUnavailable)?;

        let mut ids = Vec::new();
        while let Ok(Some(entry)) = entries.next_entry().await {
            let file_type = match entry.file_type().await {
                Ok(t) => t,
                Err(_) => continue,
            };
            if !file_type.is_dir() {
                continue;
            }
            let name = entry.file_name();
            let name = match name.to_str() {
                Some(n) => n,
                None => continue,
            };
            if let Ok(id) = NoteId::parse(name) {
                ids.push(id);
            }
        }

        ids.sort_by(|a, b| b.cmp(a));
        Ok(ids)
    }

    /// Read a note's body. A note directory without a body file reads as
    /// empty rather than an error, so attachment-only notes stay listable.
    pub async fn read_note(&self, id: &NoteId) -> io::Result<String> {
        match fs::read_to_string(self.note_dir(id).join(NOTE_FILE)).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(e),
        }
    }

    /// Durably write a note's body, creating the note directory if absent.
    pub async fn write_note(&self, id: &NoteId, text: &str) -> Result<(), JournalError> {
        let dir = self.note_dir(id);
        fs::create_dir_all(&dir)
            .await
            .map_err(JournalError::StorageWrite)?;
        fs::write(dir.join(NOTE_FILE), text)
            .await
            .map_err(JournalError::StorageWrite)?;
        Ok(())
    }

    /// Attachment file names for a note, in serving order: numeric filename
    /// stems ascending when every stem is numeric, lexical otherwise. A
    /// missing note directory has no attachments.
    pub async fn list_attachments(&self, id: &NoteId) -> io::Result<Vec<String>> {
        let mut entries = match fs::read_dir(self.note_dir(id)).await {
            Ok(e) => e,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut names = Vec::new();
        while let Ok(Some(entry)) = entries.next_entry().await {
            let file_type = match entry.file_type().await {
                Ok(t) => t,
                Err(_) => continue,
            };
            if !file_type.is_file() {
                continue;
            }
            let name = entry.file_name();
            let name = match name.to_str() {
                Some(n) => n,
                None => continue,
            };
            if name == NOTE_FILE || name.starts_with('.') {
                continue;
            }
            names.push(name.to_string());
        }

        if names.iter().all(|n| stem_number(n).is_some()) {
            names.sort_by_key(|n| stem_number(n).unwrap_or(u64::MAX));
        } else {
            names.sort();
        }
        Ok(names)
    }

    pub async fn count_attachments(&self, id: &NoteId) -> usize {
        self.list_attachments(id).await.map_or(0, |names| names.len())
    }
}

fn stem_number(name: &str) -> Option<u64> {
    Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .and_then(|s| s.parse().ok())
}
