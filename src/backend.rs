//! The consumed remote-service capability.
//!
//! Implementations wrap the Azure DevOps REST surface; this crate never
//! issues HTTP itself. Calls are synchronous from the engine's point of
//! view: a command handler blocks on the response and applies local state
//! only after success.

use crate::error::Result;
use crate::model::{
    Comment, CommentThread, CommentThreadStatus, FileChange, Identity, PolicyEvaluationRecord,
    PullRequest, PullRequestStatus, PullRequestVote, ThreadContext, UserProfile, WorkItem,
};

/// Trait for pull-request service implementations.
///
/// Read methods model a missing or unauthenticated backend as empty
/// collections or `None`, never as an error; mutation methods return the
/// created/updated entity so the caller can reconcile its cache, and
/// `None` when the service gave no usable response.
pub trait PullRequestBackend {
    /// The signed-in identity, when the connection is established.
    fn get_user_profile(&self) -> Result<Option<UserProfile>>;

    /// A pull request with commits and work item refs attached.
    fn get_pull_request(&self, pull_request_id: i32) -> Result<PullRequest>;

    /// All comment threads of the pull request's latest iteration.
    fn get_pull_request_threads(&self, pull_request_id: i32) -> Result<Vec<CommentThread>>;

    /// The changed-file list of the pull request's latest iteration.
    fn get_files_changed(&self, pull_request_id: i32) -> Result<Vec<FileChange>>;

    /// File contents at a specific commit. `None` when the file does not
    /// exist there.
    fn get_file_contents(&self, path: &str, commit_id: &str) -> Result<Option<String>>;

    /// Create a thread anchored by `context` to the latest iteration's
    /// change-tracking id for that file, with `text` as its first comment.
    fn create_comment_thread(
        &self,
        pull_request_id: i32,
        text: &str,
        context: &ThreadContext,
    ) -> Result<Option<CommentThread>>;

    fn reply_to_comment(
        &self,
        text: &str,
        thread_id: i32,
        pull_request_id: i32,
    ) -> Result<Option<Comment>>;

    fn update_comment(
        &self,
        content: &str,
        thread_id: i32,
        pull_request_id: i32,
        comment_id: i32,
    ) -> Result<Option<Comment>>;

    fn delete_comment(&self, comment_id: i32, thread_id: i32, pull_request_id: i32) -> Result<()>;

    fn update_thread_status(
        &self,
        status: CommentThreadStatus,
        pull_request_id: i32,
        thread_id: i32,
    ) -> Result<Option<CommentThread>>;

    fn like_comment(&self, pull_request_id: i32, thread_id: i32, comment_id: i32) -> Result<()>;

    fn unlike_comment(&self, pull_request_id: i32, thread_id: i32, comment_id: i32) -> Result<()>;

    /// Cast or change the signed-in reviewer's vote.
    fn set_pull_request_vote(&self, vote: PullRequestVote, pull_request_id: i32) -> Result<()>;

    /// Transition the pull request itself (complete, abandon, reactivate).
    /// Completing passes the last merge source commit id.
    fn set_pull_request_status(
        &self,
        pull_request_id: i32,
        status: PullRequestStatus,
        last_merge_source_commit: Option<&str>,
    ) -> Result<()>;

    fn set_pull_request_draft(&self, pull_request_id: i32, is_draft: bool) -> Result<()>;

    fn add_reviewer(&self, pull_request_id: i32, reviewer_id: &str, required: bool) -> Result<()>;

    fn remove_reviewer(&self, pull_request_id: i32, reviewer_id: &str) -> Result<()>;

    fn add_work_item(&self, pull_request_id: i32, work_item_id: i32) -> Result<()>;

    fn remove_work_item(&self, pull_request_id: i32, work_item_id: i32) -> Result<()>;

    /// Resolve work item refs to titles and types. Returns an empty list
    /// if not supported (default).
    fn get_work_items(&self, _ids: &[i32]) -> Result<Vec<WorkItem>> {
        Ok(Vec::new())
    }

    /// Work-item search for the attach picker. Returns an empty list if
    /// not supported (default).
    fn search_work_items(&self, _query: &str) -> Result<Vec<WorkItem>> {
        Ok(Vec::new())
    }

    /// Policy evaluation records for the pull request. Returns an empty
    /// list if not supported (default).
    fn get_policy_evaluations(&self, _pull_request_id: i32) -> Result<Vec<PolicyEvaluationRecord>> {
        Ok(Vec::new())
    }

    /// Identity search for the add-reviewer picker. Returns an empty list
    /// if not supported (default).
    fn search_identities(&self, _query: &str) -> Result<Vec<Identity>> {
        Ok(Vec::new())
    }

    /// Raw avatar image bytes for a user. Returns `None` if not supported
    /// (default).
    fn get_avatar(&self, _user_id: &str) -> Result<Option<Vec<u8>>> {
        Ok(None)
    }

    /// Raw icon image bytes for a work item type. Returns `None` if not
    /// supported (default).
    fn get_work_item_icon(&self, _work_item_type: &str) -> Result<Option<Vec<u8>>> {
        Ok(None)
    }
}
