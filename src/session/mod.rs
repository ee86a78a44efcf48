//! The review session: one pull request, its thread cache, and the command
//! surface the host drives.
//!
//! The session owns the authoritative pull request snapshot and thread
//! cache, refreshes them wholesale on root expansion, after every mutating
//! command and on explicit refresh, and guarantees at most one diff pair
//! is open at a time. Hosts re-render the tree whenever `tree_version`
//! moves; there is no delta protocol.

mod thread_cache;

pub use thread_cache::ThreadCache;

use std::path::PathBuf;

use crate::avatar::AvatarCache;
use crate::backend::PullRequestBackend;
use crate::config::ReviewConfig;
use crate::diff::{DiffCommentReconciler, DiffSessionState, DiffSide};
use crate::error::{AdoPrError, Result};
use crate::model::{
    CommentActions, CommentThreadStatus, FileChange, Identity, PullRequest, PullRequestStatus,
    PullRequestVote, TreeNode, UserProfile, WorkItem,
};
use crate::position::EditorRange;
use crate::tree::TreeBuilder;

pub struct PullRequestSession<B: PullRequestBackend> {
    backend: B,
    config: ReviewConfig,
    user: UserProfile,
    pull_request: PullRequest,
    threads: ThreadCache,
    changes: Option<Vec<FileChange>>,
    avatars: AvatarCache,
    diff: Option<DiffCommentReconciler>,
    temp_dir: PathBuf,
    tree_version: u64,
}

impl<B: PullRequestBackend> PullRequestSession<B> {
    pub fn new(backend: B, config: ReviewConfig, pull_request_id: i32) -> Result<Self> {
        Self::with_temp_dir(backend, config, pull_request_id, std::env::temp_dir())
    }

    pub fn with_temp_dir(
        backend: B,
        config: ReviewConfig,
        pull_request_id: i32,
        temp_dir: impl Into<PathBuf>,
    ) -> Result<Self> {
        if !config.is_complete() {
            return Err(AdoPrError::NotConfigured(
                "collection URL, access token and project are required".to_string(),
            ));
        }

        let user = backend.get_user_profile()?.unwrap_or_else(|| {
            tracing::warn!("no signed-in identity; affordances will be read-only");
            UserProfile {
                id: String::new(),
                display_name: String::new(),
            }
        });
        let pull_request = backend.get_pull_request(pull_request_id)?;
        let mut threads = ThreadCache::new();
        threads.replace_all(backend.get_pull_request_threads(pull_request_id)?);

        Ok(Self {
            backend,
            config,
            user,
            pull_request,
            threads,
            changes: None,
            avatars: AvatarCache::new(),
            diff: None,
            temp_dir: temp_dir.into(),
            tree_version: 0,
        })
    }

    pub fn pull_request(&self) -> &PullRequest {
        &self.pull_request
    }

    pub fn threads(&self) -> &ThreadCache {
        &self.threads
    }

    pub fn user(&self) -> &UserProfile {
        &self.user
    }

    pub fn config(&self) -> &ReviewConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The open diff session, when one exists.
    pub fn diff(&self) -> Option<&DiffCommentReconciler> {
        self.diff.as_ref()
    }

    /// Monotonic counter; whenever it moves the host re-renders the tree
    /// from the current snapshot.
    pub fn tree_version(&self) -> u64 {
        self.tree_version
    }

    fn touch(&mut self) {
        self.tree_version += 1;
    }

    /// Settings-changed hook; the only way new configuration enters the
    /// session.
    pub fn update_config(&mut self, config: ReviewConfig) -> Result<()> {
        self.config = config;
        self.refresh()
    }

    /// Re-fetch the pull request and thread list wholesale and invalidate
    /// the cached change list.
    pub fn refresh(&mut self) -> Result<()> {
        let id = self.pull_request.pull_request_id;
        self.pull_request = self.backend.get_pull_request(id)?;
        self.threads
            .replace_all(self.backend.get_pull_request_threads(id)?);
        self.changes = None;
        self.touch();
        Ok(())
    }

    /// Ordered children of `node` (`None` expands the root). Total: a
    /// backend failure degrades to an empty or placeholder listing.
    pub fn tree_children(&mut self, node: Option<&TreeNode>) -> Vec<TreeNode> {
        if node.is_none() {
            let id = self.pull_request.pull_request_id;
            match self.backend.get_pull_request(id) {
                Ok(pull_request) => self.pull_request = pull_request,
                Err(err) => {
                    tracing::warn!("pull request refresh on root expansion failed: {err}");
                }
            }
            match self.backend.get_pull_request_threads(id) {
                Ok(threads) => self.threads.replace_all(threads),
                Err(err) => {
                    tracing::warn!("thread refresh on root expansion failed: {err}");
                }
            }
            self.changes = None;
        }

        let threads = self.threads.snapshot();
        TreeBuilder::new(
            &self.backend,
            &mut self.avatars,
            &self.pull_request,
            &threads,
            &mut self.changes,
        )
        .children(node)
    }

    /// Open the diff pair for a changed file, always closing the previous
    /// pair first: at most one diff session is live at any time.
    pub fn open_diff(&mut self, change: &FileChange) -> Result<()> {
        if let Some(diff) = &mut self.diff {
            diff.close_diff();
        }
        self.diff = None;

        let mut reconciler =
            DiffCommentReconciler::with_temp_dir(self.user.clone(), self.temp_dir.clone());
        let result = reconciler.open_diff(
            &self.backend,
            &mut self.threads,
            &self.pull_request,
            change,
        );
        match result {
            Ok(()) if reconciler.state() == DiffSessionState::Open => {
                self.diff = Some(reconciler);
                self.touch();
                Ok(())
            }
            Ok(()) => Ok(()),
            Err(err) => Err(err),
        }
    }

    /// Close the open diff pair, if any. Idempotent.
    pub fn close_diff(&mut self) {
        if let Some(mut diff) = self.diff.take() {
            diff.close_diff();
        }
    }

    /// Record the pending selection for a new thread in the open diff.
    pub fn create_thread(&mut self, side: DiffSide, range: EditorRange) {
        if let Some(diff) = &mut self.diff {
            diff.create_thread(side, range);
        }
    }

    /// Submit the first comment of the pending thread. Returns the new
    /// thread's server id on success.
    pub fn submit_first_comment(&mut self, text: &str) -> Result<Option<i32>> {
        let Some(diff) = self.diff.as_mut() else {
            return Err(AdoPrError::NoOpenDiff);
        };
        let created =
            diff.submit_first_comment(&self.backend, &mut self.threads, &self.pull_request, text)?;
        if created.is_some() {
            self.touch();
        }
        Ok(created)
    }

    pub fn reply(&mut self, thread_id: i32, text: &str) -> Result<Option<i32>> {
        let Some(diff) = self.diff.as_mut() else {
            return Err(AdoPrError::NoOpenDiff);
        };
        let replied = diff.reply(
            &self.backend,
            &mut self.threads,
            &self.pull_request,
            thread_id,
            text,
        )?;
        if replied.is_some() {
            self.touch();
        }
        Ok(replied)
    }

    pub fn update_comment(&mut self, thread_id: i32, comment_id: i32, text: &str) -> Result<bool> {
        let Some(diff) = self.diff.as_mut() else {
            return Err(AdoPrError::NoOpenDiff);
        };
        let updated = diff.update_comment(
            &self.backend,
            &mut self.threads,
            &self.pull_request,
            thread_id,
            comment_id,
            text,
        )?;
        if updated {
            self.touch();
        }
        Ok(updated)
    }

    pub fn delete_comment(&mut self, thread_id: i32, comment_id: i32) -> Result<()> {
        let Some(diff) = self.diff.as_mut() else {
            return Err(AdoPrError::NoOpenDiff);
        };
        diff.delete_comment(
            &self.backend,
            &mut self.threads,
            &self.pull_request,
            thread_id,
            comment_id,
        )?;
        self.touch();
        Ok(())
    }

    pub fn like_comment(&mut self, thread_id: i32, comment_id: i32) -> Result<()> {
        let Some(diff) = self.diff.as_mut() else {
            return Err(AdoPrError::NoOpenDiff);
        };
        diff.like_comment(
            &self.backend,
            &mut self.threads,
            &self.pull_request,
            thread_id,
            comment_id,
        )?;
        self.touch();
        Ok(())
    }

    pub fn unlike_comment(&mut self, thread_id: i32, comment_id: i32) -> Result<()> {
        let Some(diff) = self.diff.as_mut() else {
            return Err(AdoPrError::NoOpenDiff);
        };
        diff.unlike_comment(
            &self.backend,
            &mut self.threads,
            &self.pull_request,
            thread_id,
            comment_id,
        )?;
        self.touch();
        Ok(())
    }

    /// Resolve an active thread; offered when its local tag reads Active.
    pub fn resolve_thread(&mut self, thread_id: i32) -> Result<Option<CommentThreadStatus>> {
        self.toggle_thread_status(thread_id)
    }

    /// Reactivate a fixed thread; offered when its local tag reads Fixed.
    pub fn reactivate_thread(&mut self, thread_id: i32) -> Result<Option<CommentThreadStatus>> {
        self.toggle_thread_status(thread_id)
    }

    fn toggle_thread_status(&mut self, thread_id: i32) -> Result<Option<CommentThreadStatus>> {
        let Some(diff) = self.diff.as_mut() else {
            return Err(AdoPrError::NoOpenDiff);
        };
        let toggled = diff.toggle_thread_status(
            &self.backend,
            &mut self.threads,
            &self.pull_request,
            thread_id,
        )?;
        if toggled.is_some() {
            self.touch();
        }
        Ok(toggled)
    }

    /// Affordance flags for one comment, computed against the signed-in
    /// identity.
    pub fn comment_actions(&self, thread_id: i32, comment_id: i32) -> Option<CommentActions> {
        let thread = self.threads.get(thread_id)?;
        let comment = thread.comments.iter().find(|c| c.id == comment_id)?;
        Some(CommentActions::for_user(comment, &self.user))
    }

    pub fn set_vote(&mut self, vote: PullRequestVote) -> Result<()> {
        self.backend
            .set_pull_request_vote(vote, self.pull_request.pull_request_id)?;
        self.refresh()
    }

    pub fn approve(&mut self) -> Result<()> {
        self.set_vote(PullRequestVote::Approved)
    }

    pub fn approve_with_suggestions(&mut self) -> Result<()> {
        self.set_vote(PullRequestVote::ApprovedWithSuggestions)
    }

    pub fn reject(&mut self) -> Result<()> {
        self.set_vote(PullRequestVote::Rejected)
    }

    pub fn wait_for_author(&mut self) -> Result<()> {
        self.set_vote(PullRequestVote::WaitingForAuthor)
    }

    /// Complete the pull request, merging at the last merge source commit.
    pub fn complete(&mut self) -> Result<()> {
        let last_commit = self.pull_request.source_commit_id().map(str::to_string);
        self.backend.set_pull_request_status(
            self.pull_request.pull_request_id,
            PullRequestStatus::Completed,
            last_commit.as_deref(),
        )?;
        self.refresh()
    }

    pub fn abandon(&mut self) -> Result<()> {
        self.backend.set_pull_request_status(
            self.pull_request.pull_request_id,
            PullRequestStatus::Abandoned,
            None,
        )?;
        self.refresh()
    }

    pub fn reactivate(&mut self) -> Result<()> {
        self.backend.set_pull_request_status(
            self.pull_request.pull_request_id,
            PullRequestStatus::Active,
            None,
        )?;
        self.refresh()
    }

    pub fn mark_draft(&mut self) -> Result<()> {
        self.backend
            .set_pull_request_draft(self.pull_request.pull_request_id, true)?;
        self.refresh()
    }

    pub fn publish(&mut self) -> Result<()> {
        self.backend
            .set_pull_request_draft(self.pull_request.pull_request_id, false)?;
        self.refresh()
    }

    /// Identity search for the add-reviewer picker, excluding identities
    /// already attached as reviewers.
    pub fn search_reviewers(&self, query: &str) -> Result<Vec<Identity>> {
        let results = self.backend.search_identities(query)?;
        Ok(results
            .into_iter()
            .filter(|identity| {
                !self
                    .pull_request
                    .reviewers
                    .iter()
                    .any(|r| r.id == identity.local_id)
            })
            .collect())
    }

    pub fn add_reviewer(&mut self, reviewer_id: &str, required: bool) -> Result<()> {
        self.backend
            .add_reviewer(self.pull_request.pull_request_id, reviewer_id, required)?;
        self.refresh()
    }

    pub fn remove_reviewer(&mut self, reviewer_id: &str) -> Result<()> {
        self.backend
            .remove_reviewer(self.pull_request.pull_request_id, reviewer_id)?;
        self.refresh()
    }

    /// Work-item search for the attach picker, excluding items already
    /// linked to the pull request.
    pub fn search_work_items(&self, query: &str) -> Result<Vec<WorkItem>> {
        let results = self.backend.search_work_items(query)?;
        Ok(results
            .into_iter()
            .filter(|item| {
                !self
                    .pull_request
                    .work_item_refs
                    .iter()
                    .any(|r| r.id == item.id.to_string())
            })
            .collect())
    }

    pub fn add_work_item(&mut self, work_item_id: i32) -> Result<()> {
        self.backend
            .add_work_item(self.pull_request.pull_request_id, work_item_id)?;
        self.refresh()
    }

    pub fn remove_work_item(&mut self, work_item_id: i32) -> Result<()> {
        self.backend
            .remove_work_item(self.pull_request.pull_request_id, work_item_id)?;
        self.refresh()
    }
}
