//! The single live diff pair and its comment reconciliation.
//!
//! One reconciler session materializes the two revisions of a changed file
//! into the shared temp pair, maps server threads onto highlight ranges in
//! both revisions, and applies every comment mutation with the same
//! contract: call the backend first, splice the echoed entity into the
//! local cache only on success. There is no rollback protocol; a failure
//! leaves the cache exactly as it was.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::backend::PullRequestBackend;
use crate::error::Result;
use crate::model::{
    ChangeType, CommentThread, CommentThreadStatus, FileChange, IdentityRef, PullRequest,
    ThreadContext, UserProfile,
};
use crate::paths::{last_path_fragment, left_diff_path_in, right_diff_path_in};
use crate::position::{EditorRange, to_server_positions};
use crate::session::ThreadCache;

/// Which revision of the open diff pair a range belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffSide {
    /// The "previous" (target branch) revision.
    Left,
    /// The "changeset" (source branch) revision.
    Right,
}

/// A highlight applied to a range in one open revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoration {
    pub thread_id: i32,
    pub side: DiffSide,
    pub range: EditorRange,
    pub hover_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiffSessionState {
    #[default]
    Closed,
    Materializing,
    Open,
}

#[derive(Debug)]
pub struct DiffCommentReconciler {
    user: UserProfile,
    temp_dir: PathBuf,
    state: DiffSessionState,
    /// Token minted per materialization; a decoration pass belonging to a
    /// superseded materialization is dropped instead of applied.
    materialization: Option<Uuid>,
    file_path: Option<String>,
    left_revision_path: Option<PathBuf>,
    right_revision_path: Option<PathBuf>,
    selected_range: Option<(DiffSide, EditorRange)>,
    decorations: BTreeMap<i32, Vec<Decoration>>,
}

impl DiffCommentReconciler {
    pub fn new(user: UserProfile) -> Self {
        Self::with_temp_dir(user, std::env::temp_dir())
    }

    pub fn with_temp_dir(user: UserProfile, temp_dir: impl Into<PathBuf>) -> Self {
        Self {
            user,
            temp_dir: temp_dir.into(),
            state: DiffSessionState::Closed,
            materialization: None,
            file_path: None,
            left_revision_path: None,
            right_revision_path: None,
            selected_range: None,
            decorations: BTreeMap::new(),
        }
    }

    pub fn state(&self) -> DiffSessionState {
        self.state
    }

    /// Repository path of the file whose diff is open.
    pub fn file_path(&self) -> Option<&str> {
        self.file_path.as_deref()
    }

    pub fn left_revision_path(&self) -> Option<&Path> {
        self.left_revision_path.as_deref()
    }

    pub fn right_revision_path(&self) -> Option<&Path> {
        self.right_revision_path.as_deref()
    }

    pub fn selected_range(&self) -> Option<(DiffSide, EditorRange)> {
        self.selected_range
    }

    /// Every live decoration, over both revisions.
    pub fn decorations(&self) -> Vec<&Decoration> {
        self.decorations.values().flatten().collect()
    }

    pub fn decorations_for_thread(&self, thread_id: i32) -> Vec<&Decoration> {
        self.decorations
            .get(&thread_id)
            .map(|d| d.iter().collect())
            .unwrap_or_default()
    }

    /// Materialize and open the diff pair for `change`, replacing whatever
    /// pair was open before. Threads are re-fetched on reaching `Open` and
    /// both revisions decorated.
    pub fn open_diff(
        &mut self,
        backend: &dyn PullRequestBackend,
        cache: &mut ThreadCache,
        pull_request: &PullRequest,
        change: &FileChange,
    ) -> Result<()> {
        self.close_diff();
        self.state = DiffSessionState::Materializing;
        let token = Uuid::new_v4();
        self.materialization = Some(token);

        match self.materialize(backend, pull_request, change) {
            Ok(true) => {}
            Ok(false) => {
                // Preconditions absent (no merge commits); nothing to show.
                self.close_diff();
                return Ok(());
            }
            Err(err) => {
                self.close_diff();
                return Err(err);
            }
        }

        self.state = DiffSessionState::Open;

        match backend.get_pull_request_threads(pull_request.pull_request_id) {
            Ok(threads) => cache.replace_all(threads),
            Err(err) => {
                tracing::warn!("thread refresh on diff open failed: {err}");
            }
        }

        if self.materialization == Some(token) {
            self.redecorate(cache);
        }
        Ok(())
    }

    fn materialize(
        &mut self,
        backend: &dyn PullRequestBackend,
        pull_request: &PullRequest,
        change: &FileChange,
    ) -> Result<bool> {
        let (Some(source), Some(target)) =
            (pull_request.source_commit_id(), pull_request.target_commit_id())
        else {
            tracing::warn!(
                pull_request_id = pull_request.pull_request_id,
                "pull request has no merge commits to diff against"
            );
            return Ok(false);
        };

        let fetch = |path: &str, commit: &str| -> Result<String> {
            Ok(backend.get_file_contents(path, commit)?.unwrap_or_default())
        };

        let path = change.effective_path().to_string();
        let (left_content, right_content) = match change.change_type {
            ChangeType::Add => (String::new(), fetch(&path, source)?),
            ChangeType::Delete => (fetch(&path, target)?, String::new()),
            ChangeType::Rename | ChangeType::RenameEdit => {
                let original = change.original_path.as_deref().unwrap_or(&path);
                (fetch(original, target)?, fetch(&path, source)?)
            }
            _ => (fetch(&path, target)?, fetch(&path, source)?),
        };

        let fragment = last_path_fragment(&path).to_string();
        let left_path = left_diff_path_in(&self.temp_dir, &fragment);
        let right_path = right_diff_path_in(&self.temp_dir, &fragment);
        // Write-then-open: both revisions are fully on disk before the
        // host is handed the pair.
        fs::write(&left_path, left_content)?;
        fs::write(&right_path, right_content)?;

        self.file_path = Some(path);
        self.left_revision_path = Some(left_path);
        self.right_revision_path = Some(right_path);
        Ok(true)
    }

    /// Rebuild the decoration set for the open file from the cache.
    fn redecorate(&mut self, cache: &ThreadCache) {
        self.decorations.clear();
        if self.state != DiffSessionState::Open {
            return;
        }
        let Some(file_path) = self.file_path.clone() else {
            return;
        };
        let decorable: Vec<CommentThread> = cache
            .iter()
            .filter(|t| t.anchors_to(&file_path) && !t.is_deleted && t.has_visible_comments())
            .cloned()
            .collect();
        for thread in &decorable {
            self.decorate_thread(thread);
        }
    }

    /// Append decorations for one thread, each side independently; a side
    /// with incomplete anchors is skipped.
    fn decorate_thread(&mut self, thread: &CommentThread) {
        let Some(context) = &thread.thread_context else {
            return;
        };
        let Some(first) = thread.first_visible_comment() else {
            return;
        };
        let hover_text = first.content.clone();

        let entry = self.decorations.entry(thread.id).or_default();
        if let Some(range) = context.left_range() {
            entry.push(Decoration {
                thread_id: thread.id,
                side: DiffSide::Left,
                range,
                hover_text: hover_text.clone(),
            });
        }
        if let Some(range) = context.right_range() {
            entry.push(Decoration {
                thread_id: thread.id,
                side: DiffSide::Right,
                range,
                hover_text,
            });
        }
        if entry.is_empty() {
            self.decorations.remove(&thread.id);
        }
    }

    /// Record the pending selection for a new thread. The thread reaches
    /// the server only on first-comment submission.
    pub fn create_thread(&mut self, side: DiffSide, range: EditorRange) {
        if self.state != DiffSessionState::Open {
            return;
        }
        self.selected_range = Some((side, range));
    }

    /// Submit the first comment of a pending thread. On success the echoed
    /// thread is spliced into the cache and decorated; on a missing or
    /// id-less response the pending selection stays put and nothing is
    /// treated as synced.
    pub fn submit_first_comment(
        &mut self,
        backend: &dyn PullRequestBackend,
        cache: &mut ThreadCache,
        pull_request: &PullRequest,
        text: &str,
    ) -> Result<Option<i32>> {
        if self.state != DiffSessionState::Open || text.is_empty() {
            return Ok(None);
        }
        let Some(file_path) = self.file_path.clone() else {
            return Ok(None);
        };
        let Some((side, range)) = self.selected_range else {
            return Ok(None);
        };

        let (start, end) = to_server_positions(range);
        let is_right = side == DiffSide::Right;
        let context = ThreadContext {
            file_path,
            left_file_start: (!is_right).then_some(start),
            left_file_end: (!is_right).then_some(end),
            right_file_start: is_right.then_some(start),
            right_file_end: is_right.then_some(end),
        };

        let response =
            backend.create_comment_thread(pull_request.pull_request_id, text, &context)?;
        let Some(thread) = response else {
            return Ok(None);
        };
        if thread.id == 0 || thread.comments.first().is_none_or(|c| c.id == 0) {
            return Ok(None);
        }

        self.selected_range = None;
        self.decorate_thread(&thread);
        let thread_id = thread.id;
        cache.upsert(thread);
        Ok(Some(thread_id))
    }

    /// Reply to an existing thread. Appends the echoed comment, preserving
    /// order; a stale thread id is a silent no-op.
    pub fn reply(
        &mut self,
        backend: &dyn PullRequestBackend,
        cache: &mut ThreadCache,
        pull_request: &PullRequest,
        thread_id: i32,
        text: &str,
    ) -> Result<Option<i32>> {
        if !cache.contains(thread_id) {
            return Ok(None);
        }
        let response = backend.reply_to_comment(text, thread_id, pull_request.pull_request_id)?;
        let Some(comment) = response else {
            return Ok(None);
        };
        if comment.id == 0 {
            return Ok(None);
        }
        let comment_id = comment.id;
        cache.with_thread_mut(thread_id, |t| t.comments.push(comment));
        Ok(Some(comment_id))
    }

    /// Replace a comment's content in place. Thread anchors are immutable
    /// after creation, so decorations are left untouched.
    pub fn update_comment(
        &mut self,
        backend: &dyn PullRequestBackend,
        cache: &mut ThreadCache,
        pull_request: &PullRequest,
        thread_id: i32,
        comment_id: i32,
        content: &str,
    ) -> Result<bool> {
        let exists = cache
            .get(thread_id)
            .is_some_and(|t| t.comments.iter().any(|c| c.id == comment_id));
        if !exists {
            return Ok(false);
        }

        let response = backend.update_comment(
            content,
            thread_id,
            pull_request.pull_request_id,
            comment_id,
        )?;
        let Some(updated) = response else {
            return Ok(false);
        };
        if updated.id == 0 {
            return Ok(false);
        }

        cache.with_thread_mut(thread_id, |t| {
            if let Some(slot) = t.comment_mut(comment_id) {
                slot.content = updated.content;
            }
        });
        Ok(true)
    }

    pub fn like_comment(
        &mut self,
        backend: &dyn PullRequestBackend,
        cache: &mut ThreadCache,
        pull_request: &PullRequest,
        thread_id: i32,
        comment_id: i32,
    ) -> Result<()> {
        if !comment_exists(cache, thread_id, comment_id) {
            return Ok(());
        }
        backend.like_comment(pull_request.pull_request_id, thread_id, comment_id)?;
        let user = IdentityRef {
            id: self.user.id.clone(),
            display_name: self.user.display_name.clone(),
            unique_name: None,
        };
        cache.with_thread_mut(thread_id, |t| {
            if let Some(comment) = t.comment_mut(comment_id)
                && !comment.liked_by(&user.id)
            {
                comment.users_liked.push(user);
            }
        });
        Ok(())
    }

    pub fn unlike_comment(
        &mut self,
        backend: &dyn PullRequestBackend,
        cache: &mut ThreadCache,
        pull_request: &PullRequest,
        thread_id: i32,
        comment_id: i32,
    ) -> Result<()> {
        if !comment_exists(cache, thread_id, comment_id) {
            return Ok(());
        }
        backend.unlike_comment(pull_request.pull_request_id, thread_id, comment_id)?;
        let user_id = self.user.id.clone();
        cache.with_thread_mut(thread_id, |t| {
            if let Some(comment) = t.comment_mut(comment_id) {
                comment.users_liked.retain(|u| u.id != user_id);
            }
        });
        Ok(())
    }

    /// Mark a comment deleted, keeping it in the thread to preserve reply
    /// ordering and ids. Deleting the last real comment disposes the
    /// thread's decorations; its id stays reserved in the cache.
    pub fn delete_comment(
        &mut self,
        backend: &dyn PullRequestBackend,
        cache: &mut ThreadCache,
        pull_request: &PullRequest,
        thread_id: i32,
        comment_id: i32,
    ) -> Result<()> {
        if !comment_exists(cache, thread_id, comment_id) {
            return Ok(());
        }
        backend.delete_comment(comment_id, thread_id, pull_request.pull_request_id)?;
        cache.with_thread_mut(thread_id, |t| {
            if let Some(comment) = t.comment_mut(comment_id) {
                comment.mark_deleted();
            }
        });
        if cache
            .get(thread_id)
            .is_some_and(|t| !t.has_visible_comments())
        {
            self.decorations.remove(&thread_id);
        }
        Ok(())
    }

    /// Toggle a thread between `Active` and `Fixed`. The local status tag
    /// is the single source of truth for which action is offered next;
    /// threads in any other state are left alone.
    pub fn toggle_thread_status(
        &mut self,
        backend: &dyn PullRequestBackend,
        cache: &mut ThreadCache,
        pull_request: &PullRequest,
        thread_id: i32,
    ) -> Result<Option<CommentThreadStatus>> {
        let Some(current) = cache.get(thread_id).map(|t| t.status) else {
            return Ok(None);
        };
        let next = match current {
            CommentThreadStatus::Active => CommentThreadStatus::Fixed,
            CommentThreadStatus::Fixed => CommentThreadStatus::Active,
            _ => return Ok(None),
        };

        let response =
            backend.update_thread_status(next, pull_request.pull_request_id, thread_id)?;
        if response.is_none() {
            return Ok(None);
        }
        cache.with_thread_mut(thread_id, |t| t.status = next);
        Ok(Some(next))
    }

    /// Tear the session down: decorations, pending selection and revision
    /// paths are dropped. Safe to call when already closed.
    pub fn close_diff(&mut self) {
        self.decorations.clear();
        self.selected_range = None;
        self.file_path = None;
        self.left_revision_path = None;
        self.right_revision_path = None;
        self.materialization = None;
        self.state = DiffSessionState::Closed;
    }
}

fn comment_exists(cache: &ThreadCache, thread_id: i32, comment_id: i32) -> bool {
    cache
        .get(thread_id)
        .is_some_and(|t| t.comments.iter().any(|c| c.id == comment_id))
}
