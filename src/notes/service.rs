//! The journal service: the write path plus the cache-backed read paths,
//! composed over the store, the git adapter, and the sync scheduler.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::JournalError;
use crate::notes::cache::{CachedNote, NoteCache, NoteSummary};
use crate::notes::id::NoteId;
use crate::notes::store::NoteStore;
use crate::sync::debounce::Debouncer;
use crate::sync::git::GitRemote;
use crate::sync::Syncer;

const COMMIT_MESSAGE: &str = "automated-update";

pub struct Journal {
    store: Arc<NoteStore>,
    cache: Arc<NoteCache>,
    git: Arc<GitRemote>,
    debouncer: Arc<Debouncer>,
    syncer: Arc<Syncer>,
    write_lock: Arc<Mutex<()>>,
}

impl Journal {
    pub fn new(
        store: Arc<NoteStore>,
        cache: Arc<NoteCache>,
        git: Arc<GitRemote>,
        debouncer: Arc<Debouncer>,
        syncer: Arc<Syncer>,
        write_lock: Arc<Mutex<()>>,
    ) -> Self {
        Self {
            store,
            cache,
            git,
            debouncer,
            syncer,
            write_lock,
        }
    }

    /// Persist a note and schedule remote sync.
    ///
    /// Ordered under the global write lock: disk write, then commit staging,
    /// then cache update, then arming the debouncer. The cache reflects the
    /// write before this returns, so a subsequent read sees the new content
    /// whatever the remote ends up doing.
    pub async fn save(&self, id: &NoteId, text: String) -> Result<(), JournalError> {
        let _guard = self.write_lock.lock().await;

        self.store.write_note(id, &text).await?;
        self.git.stage_and_commit(COMMIT_MESSAGE).await?;
        self.cache.put(id, text);

        let syncer = Arc::clone(&self.syncer);
        self.debouncer.arm(move || async move { syncer.sync_now().await });
        Ok(())
    }

    pub fn get(&self, id: &NoteId) -> Option<CachedNote> {
        self.cache.get(id)
    }

    /// List notes: unranked (most recent first, with the today placeholder)
    /// for an empty query, ranked otherwise.
    pub fn list(&self, query: &str) -> Vec<NoteSummary> {
        if query.is_empty() {
            self.cache.list_all(&NoteId::today())
        } else {
            self.cache.search(query)
        }
    }

    /// Resolve an attachment ordinal to the URL path it is served from.
    pub async fn attachment_location(
        &self,
        id: &NoteId,
        index: usize,
    ) -> Result<String, JournalError> {
        let names = self
            .store
            .list_attachments(id)
            .await
            .map_err(JournalError::StorageUnavailable)?;
        match names.get(index) {
            Some(name) => Ok(format!("/db/{}/{}", id, name)),
            None => Err(JournalError::AttachmentOutOfRange {
                id: id.to_string(),
                index,
            }),
        }
    }

    /// Populate the cache from disk. Called once at startup before the
    /// server starts serving reads.
    pub async fn init_cache(&self) -> Result<(), JournalError> {
        self.cache.rebuild(&self.store).await
    }
}
