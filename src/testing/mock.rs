//! An in-memory `PullRequestBackend` that mimics the remote service
//! without network calls.
//!
//! Mutations are applied to the mock's own state and echoed back the way
//! the service echoes created entities, so reconciliation paths can be
//! exercised end to end. Every call is recorded, and individual methods
//! can be scripted to fail or to return no usable response.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use crate::backend::PullRequestBackend;
use crate::error::{AdoPrError, Result};
use crate::model::{
    Comment, CommentThread, CommentThreadStatus, FileChange, Identity, IdentityRef,
    IdentityRefWithVote, PolicyEvaluationRecord, PullRequest, PullRequestStatus, PullRequestVote,
    ThreadContext, UserProfile, WorkItem, WorkItemRef,
};

/// Record of one backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCall {
    pub method: String,
    pub args: Vec<String>,
}

#[derive(Debug, Default)]
struct MockState {
    user: Option<UserProfile>,
    pull_request: PullRequest,
    threads: Vec<CommentThread>,
    changes: Vec<FileChange>,
    contents: HashMap<(String, String), String>,
    avatars: HashMap<String, Vec<u8>>,
    icons: HashMap<String, Vec<u8>>,
    work_items: Vec<WorkItem>,
    identities: Vec<Identity>,
    policies: Vec<PolicyEvaluationRecord>,
    calls: Vec<MockCall>,
    failing: HashSet<String>,
    unresponsive: HashSet<String>,
    next_thread_id: i32,
    next_comment_id: i32,
}

#[derive(Debug)]
pub struct MockBackend {
    state: RefCell<MockState>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            state: RefCell::new(MockState {
                user: Some(UserProfile {
                    id: "me".to_string(),
                    display_name: "Me".to_string(),
                }),
                next_thread_id: 1000,
                next_comment_id: 5000,
                ..MockState::default()
            }),
        }
    }

    pub fn set_user(&self, user: Option<UserProfile>) {
        self.state.borrow_mut().user = user;
    }

    pub fn set_pull_request(&self, pull_request: PullRequest) {
        self.state.borrow_mut().pull_request = pull_request;
    }

    pub fn add_thread(&self, thread: CommentThread) {
        self.state.borrow_mut().threads.push(thread);
    }

    pub fn set_changes(&self, changes: Vec<FileChange>) {
        self.state.borrow_mut().changes = changes;
    }

    pub fn set_content(&self, path: &str, commit_id: &str, content: &str) {
        self.state
            .borrow_mut()
            .contents
            .insert((path.to_string(), commit_id.to_string()), content.to_string());
    }

    pub fn set_avatar(&self, user_id: &str, bytes: Vec<u8>) {
        self.state
            .borrow_mut()
            .avatars
            .insert(user_id.to_string(), bytes);
    }

    pub fn set_work_item_icon(&self, work_item_type: &str, bytes: Vec<u8>) {
        self.state
            .borrow_mut()
            .icons
            .insert(work_item_type.to_string(), bytes);
    }

    pub fn add_work_item_record(&self, item: WorkItem) {
        self.state.borrow_mut().work_items.push(item);
    }

    pub fn add_identity(&self, identity: Identity) {
        self.state.borrow_mut().identities.push(identity);
    }

    pub fn add_policy(&self, policy: PolicyEvaluationRecord) {
        self.state.borrow_mut().policies.push(policy);
    }

    /// Script `method` to return an error on every call.
    pub fn fail_on(&self, method: &str) {
        self.state.borrow_mut().failing.insert(method.to_string());
    }

    /// Script `method` to succeed but give no usable response.
    pub fn drop_response_of(&self, method: &str) {
        self.state
            .borrow_mut()
            .unresponsive
            .insert(method.to_string());
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.state.borrow().calls.clone()
    }

    pub fn calls_named(&self, method: &str) -> Vec<MockCall> {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|c| c.method == method)
            .cloned()
            .collect()
    }

    pub fn threads_snapshot(&self) -> Vec<CommentThread> {
        self.state.borrow().threads.clone()
    }

    fn record(&self, method: &str, args: &[String]) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.calls.push(MockCall {
            method: method.to_string(),
            args: args.to_vec(),
        });
        if state.failing.contains(method) {
            return Err(AdoPrError::Backend(format!("mock failure in {method}")));
        }
        Ok(())
    }

    fn is_unresponsive(&self, method: &str) -> bool {
        self.state.borrow().unresponsive.contains(method)
    }

    fn author(&self) -> Option<IdentityRef> {
        self.state.borrow().user.as_ref().map(|u| IdentityRef {
            id: u.id.clone(),
            display_name: u.display_name.clone(),
            unique_name: None,
        })
    }
}

impl PullRequestBackend for MockBackend {
    fn get_user_profile(&self) -> Result<Option<UserProfile>> {
        self.record("get_user_profile", &[])?;
        Ok(self.state.borrow().user.clone())
    }

    fn get_pull_request(&self, pull_request_id: i32) -> Result<PullRequest> {
        self.record("get_pull_request", &[pull_request_id.to_string()])?;
        Ok(self.state.borrow().pull_request.clone())
    }

    fn get_pull_request_threads(&self, pull_request_id: i32) -> Result<Vec<CommentThread>> {
        self.record("get_pull_request_threads", &[pull_request_id.to_string()])?;
        Ok(self.state.borrow().threads.clone())
    }

    fn get_files_changed(&self, pull_request_id: i32) -> Result<Vec<FileChange>> {
        self.record("get_files_changed", &[pull_request_id.to_string()])?;
        Ok(self.state.borrow().changes.clone())
    }

    fn get_file_contents(&self, path: &str, commit_id: &str) -> Result<Option<String>> {
        self.record(
            "get_file_contents",
            &[path.to_string(), commit_id.to_string()],
        )?;
        Ok(self
            .state
            .borrow()
            .contents
            .get(&(path.to_string(), commit_id.to_string()))
            .cloned())
    }

    fn create_comment_thread(
        &self,
        pull_request_id: i32,
        text: &str,
        context: &ThreadContext,
    ) -> Result<Option<CommentThread>> {
        self.record(
            "create_comment_thread",
            &[pull_request_id.to_string(), text.to_string()],
        )?;
        if self.is_unresponsive("create_comment_thread") {
            return Ok(None);
        }

        let author = self.author();
        let mut state = self.state.borrow_mut();
        state.next_thread_id += 1;
        state.next_comment_id += 1;
        let thread = CommentThread {
            id: state.next_thread_id,
            status: CommentThreadStatus::Active,
            is_deleted: false,
            thread_context: Some(context.clone()),
            comments: vec![Comment {
                id: state.next_comment_id,
                content: text.to_string(),
                author,
                ..Comment::default()
            }],
            published_date: None,
        };
        state.threads.push(thread.clone());
        Ok(Some(thread))
    }

    fn reply_to_comment(
        &self,
        text: &str,
        thread_id: i32,
        pull_request_id: i32,
    ) -> Result<Option<Comment>> {
        self.record(
            "reply_to_comment",
            &[
                text.to_string(),
                thread_id.to_string(),
                pull_request_id.to_string(),
            ],
        )?;
        if self.is_unresponsive("reply_to_comment") {
            return Ok(None);
        }

        let author = self.author();
        let mut state = self.state.borrow_mut();
        state.next_comment_id += 1;
        let comment = Comment {
            id: state.next_comment_id,
            content: text.to_string(),
            author,
            ..Comment::default()
        };
        let Some(thread) = state.threads.iter_mut().find(|t| t.id == thread_id) else {
            return Ok(None);
        };
        thread.comments.push(comment.clone());
        Ok(Some(comment))
    }

    fn update_comment(
        &self,
        content: &str,
        thread_id: i32,
        pull_request_id: i32,
        comment_id: i32,
    ) -> Result<Option<Comment>> {
        self.record(
            "update_comment",
            &[
                content.to_string(),
                thread_id.to_string(),
                pull_request_id.to_string(),
                comment_id.to_string(),
            ],
        )?;
        if self.is_unresponsive("update_comment") {
            return Ok(None);
        }

        let mut state = self.state.borrow_mut();
        let Some(thread) = state.threads.iter_mut().find(|t| t.id == thread_id) else {
            return Ok(None);
        };
        let Some(comment) = thread.comment_mut(comment_id) else {
            return Ok(None);
        };
        comment.content = content.to_string();
        Ok(Some(comment.clone()))
    }

    fn delete_comment(&self, comment_id: i32, thread_id: i32, pull_request_id: i32) -> Result<()> {
        self.record(
            "delete_comment",
            &[
                comment_id.to_string(),
                thread_id.to_string(),
                pull_request_id.to_string(),
            ],
        )?;
        let mut state = self.state.borrow_mut();
        if let Some(thread) = state.threads.iter_mut().find(|t| t.id == thread_id)
            && let Some(comment) = thread.comment_mut(comment_id)
        {
            comment.is_deleted = true;
        }
        Ok(())
    }

    fn update_thread_status(
        &self,
        status: CommentThreadStatus,
        pull_request_id: i32,
        thread_id: i32,
    ) -> Result<Option<CommentThread>> {
        self.record(
            "update_thread_status",
            &[
                i32::from(status).to_string(),
                pull_request_id.to_string(),
                thread_id.to_string(),
            ],
        )?;
        if self.is_unresponsive("update_thread_status") {
            return Ok(None);
        }

        let mut state = self.state.borrow_mut();
        let Some(thread) = state.threads.iter_mut().find(|t| t.id == thread_id) else {
            return Ok(None);
        };
        thread.status = status;
        Ok(Some(thread.clone()))
    }

    fn like_comment(&self, pull_request_id: i32, thread_id: i32, comment_id: i32) -> Result<()> {
        self.record(
            "like_comment",
            &[
                pull_request_id.to_string(),
                thread_id.to_string(),
                comment_id.to_string(),
            ],
        )?;
        let liker = self.author();
        let mut state = self.state.borrow_mut();
        if let (Some(liker), Some(thread)) =
            (liker, state.threads.iter_mut().find(|t| t.id == thread_id))
            && let Some(comment) = thread.comment_mut(comment_id)
            && !comment.liked_by(&liker.id)
        {
            comment.users_liked.push(liker);
        }
        Ok(())
    }

    fn unlike_comment(&self, pull_request_id: i32, thread_id: i32, comment_id: i32) -> Result<()> {
        self.record(
            "unlike_comment",
            &[
                pull_request_id.to_string(),
                thread_id.to_string(),
                comment_id.to_string(),
            ],
        )?;
        let liker = self.author();
        let mut state = self.state.borrow_mut();
        if let (Some(liker), Some(thread)) =
            (liker, state.threads.iter_mut().find(|t| t.id == thread_id))
            && let Some(comment) = thread.comment_mut(comment_id)
        {
            comment.users_liked.retain(|u| u.id != liker.id);
        }
        Ok(())
    }

    fn set_pull_request_vote(&self, vote: PullRequestVote, pull_request_id: i32) -> Result<()> {
        self.record(
            "set_pull_request_vote",
            &[i32::from(vote).to_string(), pull_request_id.to_string()],
        )?;
        let user = self.state.borrow().user.clone();
        let mut state = self.state.borrow_mut();
        if let Some(user) = user {
            if let Some(reviewer) = state
                .pull_request
                .reviewers
                .iter_mut()
                .find(|r| r.id == user.id)
            {
                reviewer.vote = vote;
            } else {
                state.pull_request.reviewers.push(IdentityRefWithVote {
                    id: user.id,
                    display_name: user.display_name,
                    vote,
                    is_required: false,
                });
            }
        }
        Ok(())
    }

    fn set_pull_request_status(
        &self,
        pull_request_id: i32,
        status: PullRequestStatus,
        last_merge_source_commit: Option<&str>,
    ) -> Result<()> {
        let mut args = vec![pull_request_id.to_string(), u32::from(status).to_string()];
        if let Some(commit) = last_merge_source_commit {
            args.push(commit.to_string());
        }
        self.record("set_pull_request_status", &args)?;
        self.state.borrow_mut().pull_request.status = status;
        Ok(())
    }

    fn set_pull_request_draft(&self, pull_request_id: i32, is_draft: bool) -> Result<()> {
        self.record(
            "set_pull_request_draft",
            &[pull_request_id.to_string(), is_draft.to_string()],
        )?;
        self.state.borrow_mut().pull_request.is_draft = is_draft;
        Ok(())
    }

    fn add_reviewer(&self, pull_request_id: i32, reviewer_id: &str, required: bool) -> Result<()> {
        self.record(
            "add_reviewer",
            &[
                pull_request_id.to_string(),
                reviewer_id.to_string(),
                required.to_string(),
            ],
        )?;
        let mut state = self.state.borrow_mut();
        let display_name = state
            .identities
            .iter()
            .find(|i| i.local_id == reviewer_id)
            .map_or_else(|| reviewer_id.to_string(), |i| i.display_name.clone());
        state.pull_request.reviewers.push(IdentityRefWithVote {
            id: reviewer_id.to_string(),
            display_name,
            vote: PullRequestVote::NoVote,
            is_required: required,
        });
        Ok(())
    }

    fn remove_reviewer(&self, pull_request_id: i32, reviewer_id: &str) -> Result<()> {
        self.record(
            "remove_reviewer",
            &[pull_request_id.to_string(), reviewer_id.to_string()],
        )?;
        self.state
            .borrow_mut()
            .pull_request
            .reviewers
            .retain(|r| r.id != reviewer_id);
        Ok(())
    }

    fn add_work_item(&self, pull_request_id: i32, work_item_id: i32) -> Result<()> {
        self.record(
            "add_work_item",
            &[pull_request_id.to_string(), work_item_id.to_string()],
        )?;
        self.state
            .borrow_mut()
            .pull_request
            .work_item_refs
            .push(WorkItemRef {
                id: work_item_id.to_string(),
                url: None,
            });
        Ok(())
    }

    fn remove_work_item(&self, pull_request_id: i32, work_item_id: i32) -> Result<()> {
        self.record(
            "remove_work_item",
            &[pull_request_id.to_string(), work_item_id.to_string()],
        )?;
        let id = work_item_id.to_string();
        self.state
            .borrow_mut()
            .pull_request
            .work_item_refs
            .retain(|r| r.id != id);
        Ok(())
    }

    fn get_work_items(&self, ids: &[i32]) -> Result<Vec<WorkItem>> {
        self.record(
            "get_work_items",
            &[ids.iter().map(i32::to_string).collect::<Vec<_>>().join(",")],
        )?;
        Ok(self
            .state
            .borrow()
            .work_items
            .iter()
            .filter(|item| ids.contains(&item.id))
            .cloned()
            .collect())
    }

    fn search_work_items(&self, query: &str) -> Result<Vec<WorkItem>> {
        self.record("search_work_items", &[query.to_string()])?;
        let query = query.to_lowercase();
        Ok(self
            .state
            .borrow()
            .work_items
            .iter()
            .filter(|item| item.title.to_lowercase().contains(&query))
            .cloned()
            .collect())
    }

    fn get_policy_evaluations(&self, pull_request_id: i32) -> Result<Vec<PolicyEvaluationRecord>> {
        self.record("get_policy_evaluations", &[pull_request_id.to_string()])?;
        Ok(self.state.borrow().policies.clone())
    }

    fn search_identities(&self, query: &str) -> Result<Vec<Identity>> {
        self.record("search_identities", &[query.to_string()])?;
        let query = query.to_lowercase();
        Ok(self
            .state
            .borrow()
            .identities
            .iter()
            .filter(|i| i.display_name.to_lowercase().contains(&query))
            .cloned()
            .collect())
    }

    fn get_avatar(&self, user_id: &str) -> Result<Option<Vec<u8>>> {
        self.record("get_avatar", &[user_id.to_string()])?;
        Ok(self.state.borrow().avatars.get(user_id).cloned())
    }

    fn get_work_item_icon(&self, work_item_type: &str) -> Result<Option<Vec<u8>>> {
        self.record("get_work_item_icon", &[work_item_type.to_string()])?;
        Ok(self.state.borrow().icons.get(work_item_type).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_thread_is_visible_in_later_thread_fetches() {
        let backend = MockBackend::new();
        let context = ThreadContext {
            file_path: "src/a.rs".to_string(),
            ..ThreadContext::default()
        };
        let created = backend
            .create_comment_thread(1, "first", &context)
            .unwrap()
            .unwrap();

        let threads = backend.get_pull_request_threads(1).unwrap();
        assert!(threads.iter().any(|t| t.id == created.id));
    }

    #[test]
    fn scripted_failure_surfaces_as_backend_error() {
        let backend = MockBackend::new();
        backend.fail_on("get_pull_request_threads");
        assert!(backend.get_pull_request_threads(1).is_err());
    }

    #[test]
    fn unresponsive_create_returns_no_thread_but_records_the_call() {
        let backend = MockBackend::new();
        backend.drop_response_of("create_comment_thread");
        let context = ThreadContext::default();
        let created = backend.create_comment_thread(1, "text", &context).unwrap();
        assert!(created.is_none());
        assert_eq!(backend.calls_named("create_comment_thread").len(), 1);
    }
}
