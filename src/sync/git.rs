//! Git CLI adapter for the notes working tree.
//!
//! The notes root is expected to be the top of a git checkout with a remote
//! configured; every operation shells out with `git -C <root>` and reports
//! combined stdout/stderr in error messages.

use std::io;
use std::path::PathBuf;

use tokio::process::Command;

use crate::error::JournalError;

struct GitOutput {
    ok: bool,
    output: String,
}

pub struct GitRemote {
    root: PathBuf,
}

impl GitRemote {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    async fn run(&self, args: &[&str]) -> io::Result<GitOutput> {
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.root)
            .args(args)
            .output()
            .await?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(GitOutput {
            ok: output.status.success(),
            output: combined.trim().to_string(),
        })
    }

    /// Startup precondition: the configured notes root must itself be the top
    /// of a git working tree, not merely live inside one.
    pub async fn repository_root_matches(&self) -> bool {
        let out = match self.run(&["rev-parse", "--show-toplevel"]).await {
            Ok(out) => out,
            Err(_) => return false,
        };
        if !out.ok {
            return false;
        }

        let expected = match std::fs::canonicalize(&self.root) {
            Ok(p) => p,
            Err(_) => return false,
        };
        match std::fs::canonicalize(&out.output) {
            Ok(reported) => reported == expected,
            Err(_) => false,
        }
    }

    /// Fetch and, when the remote has new commits, pull them. Returns whether
    /// local content changed. A dry-run fetch with no output means there is
    /// nothing to pull and the pull itself is skipped.
    pub async fn pull(&self) -> Result<bool, JournalError> {
        let fetch = self
            .run(&["fetch", "--dry-run"])
            .await
            .map_err(|e| JournalError::SyncRemote(e.to_string()))?;
        if !fetch.ok {
            return Err(JournalError::SyncRemote(format!("git fetch: {}", fetch.output)));
        }
        if fetch.output.is_empty() {
            return Ok(false);
        }

        let pull = self
            .run(&["pull"])
            .await
            .map_err(|e| JournalError::SyncRemote(e.to_string()))?;
        if !pull.ok {
            return Err(JournalError::SyncRemote(format!("git pull: {}", pull.output)));
        }
        Ok(true)
    }

    pub async fn push(&self) -> Result<(), JournalError> {
        let push = self
            .run(&["push"])
            .await
            .map_err(|e| JournalError::SyncRemote(e.to_string()))?;
        if !push.ok {
            return Err(JournalError::SyncRemote(format!("git push: {}", push.output)));
        }
        Ok(())
    }

    /// Stage the whole working tree and commit it. Committing an unchanged
    /// tree is not an error: saving identical content twice must stay
    /// idempotent.
    pub async fn stage_and_commit(&self, message: &str) -> Result<(), JournalError> {
        let add = self
            .run(&["add", "-A"])
            .await
            .map_err(|e| JournalError::SyncStage(e.to_string()))?;
        if !add.ok {
            return Err(JournalError::SyncStage(format!("git add: {}", add.output)));
        }

        let commit = self
            .run(&["commit", "-m", message])
            .await
            .map_err(|e| JournalError::SyncStage(e.to_string()))?;
        if !commit.ok && !commit.output.contains("nothing to commit") {
            return Err(JournalError::SyncStage(format!("git commit: {}", commit.output)));
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    /// Initialize a throwaway repository with the identity git needs to
    /// commit. Shared with the write-path tests.
    pub(crate) fn init_repo(dir: &Path) {
        let git = |args: &[&str]| {
            let status = std::process::Command::new("git")
                .arg("-C")
                .arg(dir)
                .args(args)
                .status()
                .expect("git must be installed");
            assert!(status.success(), "git {:?} failed", args);
        };
        git(&["init", "--quiet"]);
        git(&["config", "user.email", "journal@localhost"]);
        git(&["config", "user.name", "journal"]);
    }

    #[tokio::test]
    async fn root_check_rejects_a_plain_directory() {
        let dir = TempDir::new().unwrap();
        let git = GitRemote::new(dir.path().to_path_buf());
        assert!(!git.repository_root_matches().await);
    }

    #[tokio::test]
    async fn root_check_accepts_the_repository_root() {
        let dir = TempDir::new().unwrap();
        init_repo(dir.path());
        let git = GitRemote::new(dir.path().to_path_buf());
        assert!(git.repository_root_matches().await);
    }

    #[tokio::test]
    async fn root_check_rejects_a_subdirectory_of_a_repository() {
        let dir = TempDir::new().unwrap();
        init_repo(dir.path());
        let sub = dir.path().join("inner");
        std::fs::create_dir(&sub).unwrap();

        let git = GitRemote::new(sub);
        assert!(!git.repository_root_matches().await);
    }

    #[tokio::test]
    async fn stage_and_commit_records_changes() {
        let dir = TempDir::new().unwrap();
        init_repo(dir.path());
        std::fs::write(dir.path().join("a.md"), "hello").unwrap();

        let git = GitRemote::new(dir.path().to_path_buf());
        git.stage_and_commit("automated-update").await.unwrap();
    }

    #[tokio::test]
    async fn committing_an_unchanged_tree_succeeds() {
        let dir = TempDir::new().unwrap();
        init_repo(dir.path());
        std::fs::write(dir.path().join("a.md"), "hello").unwrap();

        let git = GitRemote::new(dir.path().to_path_buf());
        git.stage_and_commit("automated-update").await.unwrap();
        // No changes since the last commit: "nothing to commit" is success.
        git.stage_and_commit("automated-update").await.unwrap();
    }

    #[tokio::test]
    async fn pull_without_a_remote_is_a_remote_error() {
        let dir = TempDir::new().unwrap();
        init_repo(dir.path());

        let git = GitRemote::new(dir.path().to_path_buf());
        let err = git.pull().await.unwrap_err();
        assert!(matches!(err, JournalError::SyncRemote(_)));
    }
}
