//! Local/remote reconciliation: the debounced sync pass and the periodic
//! pull loop both live here, sharing the global write lock with the save
//! path so at most one of save, sync, or reconciliation runs at a time.

pub mod debounce;
pub mod git;
pub mod reconciler;

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::notes::cache::NoteCache;
use crate::notes::store::NoteStore;
use crate::sync::git::GitRemote;

pub struct Syncer {
    git: Arc<GitRemote>,
    cache: Arc<NoteCache>,
    store: Arc<NoteStore>,
    write_lock: Arc<Mutex<()>>,
}

impl Syncer {
    pub fn new(
        git: Arc<GitRemote>,
        cache: Arc<NoteCache>,
        store: Arc<NoteStore>,
        write_lock: Arc<Mutex<()>>,
    ) -> Self {
        Self {
            git,
            cache,
            store,
            write_lock,
        }
    }

    /// The full pass fired by the debouncer: pull remote changes, rebuild the
    /// cache if the pull brought anything in, then push local commits. Remote
    /// failures are logged and left for the next cycle; a failed pull skips
    /// the push so local commits are not pushed onto a diverged remote.
    pub async fn sync_now(&self) {
        let _guard = self.write_lock.lock().await;
        log::info!("running debounced sync");

        let changed = match self.git.pull().await {
            Ok(changed) => changed,
            Err(e) => {
                log::warn!("sync pull failed: {}", e);
                return;
            }
        };
        if changed {
            if let Err(e) = self.cache.rebuild(&self.store).await {
                log::warn!("cache rebuild after pull failed: {}", e);
            }
        }
        if let Err(e) = self.git.push().await {
            log::warn!("sync push failed: {}", e);
        }
    }

    /// One reconciliation tick: pull, and rebuild the cache only when the
    /// pull reports remote changes. Pushing stays tied to saves.
    pub async fn reconcile(&self) {
        let _guard = self.write_lock.lock().await;

        match self.git.pull().await {
            Ok(true) => {
                if let Err(e) = self.cache.rebuild(&self.store).await {
                    log::warn!("cache rebuild after pull failed: {}", e);
                }
            }
            Ok(false) => {}
            Err(e) => log::warn!("periodic pull failed: {}", e),
        }
    }
}
