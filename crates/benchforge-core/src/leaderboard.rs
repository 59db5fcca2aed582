//! Leaderboard projection: an in-memory sorted view of successful
//! submissions, rebuildable from the store (spec.md §4.E).
//!
//! Guarded by a single `RwLock`, generalizing the teacher's
//! `DocManager`-style cache-plus-disk shape from a per-key cache to one
//! sorted vector — expected sizes are small, so a full re-sort per insert is
//! acceptable, as spec.md §5 notes.

use std::path::{Path, PathBuf};

use tokio::sync::RwLock;

use crate::types::{LeaderboardEntry, LeaderboardRow};

pub struct Leaderboard {
    entries: RwLock<Vec<LeaderboardEntry>>,
    projection_root: PathBuf,
}

impl Leaderboard {
    pub fn new(projection_root: impl Into<PathBuf>) -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            projection_root: projection_root.into(),
        }
    }

    /// Append an entry and re-sort by `best_time` ascending. Also persists
    /// the projection record (best-effort: a write failure is logged but
    /// does not fail the submission).
    pub async fn insert(&self, entry: LeaderboardEntry) {
        let task = entry.task.clone();
        let id = entry.submission_id.clone();

        {
            let mut entries = self.entries.write().await;
            entries.push(entry);
            entries.sort_by(|a, b| a.best_time.total_cmp(&b.best_time));
        }

        if let Err(err) = self.persist(&task, &id).await {
            tracing::warn!(task = %task, id = %id, error = %err, "failed to persist leaderboard projection record");
        }
    }

    async fn persist(&self, task: &str, id: &crate::types::SubmissionId) -> std::io::Result<()> {
        let entries = self.entries.read().await;
        let entry = entries
            .iter()
            .find(|e| &e.task == task && &e.submission_id == id)
            .expect("entry was just inserted");
        let dir = self.projection_root.join(task);
        tokio::fs::create_dir_all(&dir).await?;
        let path = dir.join(format!("{}.json", id.0));
        let json = serde_json::to_vec_pretty(entry).expect("LeaderboardEntry always serializes");
        tokio::fs::write(path, json).await
    }

    /// Yield rows in rank order for a given task, annotated for UI
    /// highlighting: `first_of_user` marks the first occurrence of each
    /// user_id in sorted order, and `user_rank` increments on each
    /// first-of-user row.
    pub async fn list_for_display(&self, task: &str, user_id: &str, public_mode: bool) -> Vec<LeaderboardRow> {
        let entries = self.entries.read().await;
        let mut seen_users = std::collections::HashSet::new();
        let mut user_rank_counter = 0usize;

        entries
            .iter()
            .filter(|e| e.task == task)
            .enumerate()
            .map(|(rank, entry)| {
                let first_of_user = seen_users.insert(entry.user_id.clone());
                let user_rank = if first_of_user {
                    let r = user_rank_counter;
                    user_rank_counter += 1;
                    Some(r)
                } else {
                    None
                };
                let linkable = public_mode || entry.user_id == user_id;
                LeaderboardRow {
                    entry: entry.clone(),
                    rank,
                    first_of_user,
                    user_rank,
                    linkable,
                }
            })
            .collect()
    }

    /// Scan the per-task projection directory and load one record per file.
    pub async fn rebuild_from_projection(&self, task: &str) -> std::io::Result<()> {
        let dir = self.projection_root.join(task);
        let mut loaded = Vec::new();
        if dir.is_dir() {
            let mut entries = tokio::fs::read_dir(&dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                if entry.path().extension().and_then(|e| e.to_str()) != Some("json") {
                    continue;
                }
                let bytes = tokio::fs::read(entry.path()).await?;
                if let Ok(record) = serde_json::from_slice::<LeaderboardEntry>(&bytes) {
                    loaded.push(record);
                } else {
                    tracing::warn!(path = ?entry.path(), "skipping unparseable leaderboard projection record");
                }
            }
        }
        self.replace_all(loaded, task).await;
        Ok(())
    }

    /// Fallback: scan the submission store, keep submissions with status 0,
    /// and sort.
    pub async fn rebuild_from_store(
        &self,
        store: &crate::store::SubmissionStore,
        task: &str,
    ) -> std::io::Result<()> {
        let ids = store.list_ids(task).await?;
        let mut loaded = Vec::new();
        for id in ids {
            if let Some(sub) = store.load(task, &id).await {
                if let Some(result) = &sub.result {
                    if result.correctness_passed() {
                        loaded.push(LeaderboardEntry {
                            task: task.to_string(),
                            user_id: sub.user_id,
                            submission_id: sub.id,
                            best_time: result.best_time,
                            cycles_per_call: result.cycles_per_call,
                            author: sub.author,
                        });
                    }
                }
            }
        }
        self.replace_all(loaded, task).await;
        Ok(())
    }

    async fn replace_all(&self, mut loaded: Vec<LeaderboardEntry>, task: &str) {
        loaded.sort_by(|a, b| a.best_time.total_cmp(&b.best_time));
        let mut entries = self.entries.write().await;
        entries.retain(|e| e.task != task);
        entries.extend(loaded);
        entries.sort_by(|a, b| a.best_time.total_cmp(&b.best_time));
    }

    pub fn projection_root(&self) -> &Path {
        &self.projection_root
    }
}
