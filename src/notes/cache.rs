//! In-memory snapshot of the on-disk note tree.
//!
//! Reads are served from this cache only; disk is consulted during rebuilds
//! and writes. The map is replaced atomically on rebuild, so readers observe
//! either the previous snapshot or the new one, never a partial scan.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::JournalError;
use crate::notes::id::NoteId;
use crate::notes::rank;
use crate::notes::store::NoteStore;

const PREVIEW_CHARS: usize = 80;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedNote {
    pub content: String,
    pub preview: String,
    pub attachment_count: usize,
}

/// One row of a listing response: everything but the note body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteSummary {
    pub id: NoteId,
    pub preview: String,
    pub attachment_count: usize,
}

/// Identifier-keyed cache of note content, bounded by a total byte budget.
///
/// The cache's own lock makes concurrent readers safe against the rebuild
/// swap and individual puts. Mutual exclusion between rebuild and put is the
/// caller's job: both run under the global write lock.
pub struct NoteCache {
    entries: RwLock<HashMap<NoteId, CachedNote>>,
    budget_bytes: u64,
}

impl NoteCache {
    pub fn new(budget_bytes: u64) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            budget_bytes,
        }
    }

    /// Rescan the note tree and atomically replace the cached snapshot.
    ///
    /// Notes are admitted most recent first until admitting the next one
    /// would exceed the byte budget; the first note is always admitted so a
    /// non-empty tree never yields an empty cache. A note that cannot be read
    /// is skipped with a warning. The new map is built entirely outside the
    /// lock and swapped in at the end.
    pub async fn rebuild(&self, store: &NoteStore) -> Result<(), JournalError> {
        let ids = store.list_ids().await?;

        let mut fresh = HashMap::new();
        let mut total_bytes: u64 = 0;
        for id in ids {
            let content = match store.read_note(&id).await {
                Ok(content) => content,
                Err(e) => {
                    log::warn!("skipping unreadable note {}: {}", id, e);
                    continue;
                }
            };
            let len = content.len() as u64;
            if !fresh.is_empty() && total_bytes + len > self.budget_bytes {
                break;
            }
            total_bytes += len;

            let attachment_count = store.count_attachments(&id).await;
            fresh.insert(
                id,
                CachedNote {
                    preview: preview_of(&content),
                    content,
                    attachment_count,
                },
            );
        }

        log::info!("note cache rebuilt: {} notes, {} bytes", fresh.len(), total_bytes);
        *self.entries.write() = fresh;
        Ok(())
    }

    pub fn get(&self, id: &NoteId) -> Option<CachedNote> {
        self.entries.read().get(id).cloned()
    }

    /// Install or overwrite the entry for `id` with freshly saved content.
    /// An existing entry keeps its attachment count.
    pub fn put(&self, id: &NoteId, content: String) {
        let preview = preview_of(&content);
        let mut entries = self.entries.write();
        match entries.get_mut(id) {
            Some(entry) => {
                entry.content = content;
                entry.preview = preview;
            }
            None => {
                entries.insert(
                    id.clone(),
                    CachedNote {
                        content,
                        preview,
                        attachment_count: 0,
                    },
                );
            }
        }
    }

    /// Every cached note as a summary, most recent first, with a placeholder
    /// for `today` synthesized if that note has not been saved yet.
    pub fn list_all(&self, today: &NoteId) -> Vec<NoteSummary> {
        let entries = self.entries.read();
        let mut summaries: Vec<NoteSummary> = entries
            .iter()
            .map(|(id, note)| NoteSummary {
                id: id.clone(),
                preview: note.preview.clone(),
                attachment_count: note.attachment_count,
            })
            .collect();
        if !entries.contains_key(today) {
            summaries.push(NoteSummary {
                id: today.clone(),
                preview: String::new(),
                attachment_count: 0,
            });
        }
        drop(entries);

        summaries.sort_by(|a, b| b.id.cmp(&a.id));
        summaries
    }

    /// Ranked search over cached note content. Notes without content never
    /// match (which also keeps the today placeholder out, since it is not a
    /// cache entry). Results are ordered best score first, ties most recent
    /// first.
    pub fn search(&self, query: &str) -> Vec<NoteSummary> {
        let entries = self.entries.read();
        let mut scored: Vec<(usize, NoteSummary)> = entries
            .iter()
            .filter(|(_, note)| !note.content.is_empty())
            .filter_map(|(id, note)| {
                rank::match_score(query, &note.content).map(|score| {
                    (
                        score,
                        NoteSummary {
                            id: id.clone(),
                            preview: note.preview.clone(),
                            attachment_count: note.attachment_count,
                        },
                    )
                })
            })
            .collect();
        drop(entries);

        scored.sort_by(|(sa, a), (sb, b)| sa.cmp(sb).then_with(|| b.id.cmp(&a.id)));
        scored.into_iter().map(|(_, summary)| summary).collect()
    }
}

fn preview_of(content: &str) -> String {
    content.chars().take(PREVIEW_CHARS).collect()
}
