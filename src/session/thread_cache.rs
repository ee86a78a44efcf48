//! Versioned in-memory comment thread cache.
//!
//! The thread id is the join key between server state and everything
//! rendered locally, so the cache is keyed by it: duplicate ids cannot
//! coexist. Every mutation bumps the version; rendering layers re-render
//! from the current snapshot whenever the version moves.

use std::collections::BTreeMap;

use crate::model::CommentThread;

#[derive(Debug, Default)]
pub struct ThreadCache {
    threads: BTreeMap<i32, CommentThread>,
    version: u64,
}

impl ThreadCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Replace the whole cache with a fresh server snapshot. Threads
    /// without a server id are dropped; on duplicate ids the last entry
    /// wins.
    pub fn replace_all(&mut self, threads: Vec<CommentThread>) {
        self.threads = threads
            .into_iter()
            .filter(|t| t.id != 0)
            .map(|t| (t.id, t))
            .collect();
        self.version += 1;
    }

    /// Insert or replace a single thread.
    pub fn upsert(&mut self, thread: CommentThread) {
        if thread.id == 0 {
            return;
        }
        self.threads.insert(thread.id, thread);
        self.version += 1;
    }

    pub fn get(&self, thread_id: i32) -> Option<&CommentThread> {
        self.threads.get(&thread_id)
    }

    pub fn contains(&self, thread_id: i32) -> bool {
        self.threads.contains_key(&thread_id)
    }

    /// Run a mutation against one thread. Bumps the version only when the
    /// thread exists; a missing id is a silent no-op returning `None`.
    pub fn with_thread_mut<R>(
        &mut self,
        thread_id: i32,
        mutate: impl FnOnce(&mut CommentThread) -> R,
    ) -> Option<R> {
        let thread = self.threads.get_mut(&thread_id)?;
        let result = mutate(thread);
        self.version += 1;
        Some(result)
    }

    /// All threads, ordered by id.
    pub fn snapshot(&self) -> Vec<CommentThread> {
        self.threads.values().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommentThread> {
        self.threads.values()
    }

    pub fn len(&self) -> usize {
        self.threads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }
}
