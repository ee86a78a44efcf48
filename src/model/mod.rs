pub mod change;
pub mod pull_request;
pub mod thread;
pub mod tree;

pub use change::{ChangeType, FileChange};
pub use pull_request::{
    GitCommitRef, GitUserDate, Identity, IdentityRef, IdentityRefWithVote, PolicyEvaluationRecord,
    PolicyEvaluationStatus, PullRequest, PullRequestStatus, PullRequestVote, UserProfile, WorkItem,
    WorkItemRef,
};
pub use thread::{
    Comment, CommentActions, CommentThread, CommentThreadStatus, ThreadContext,
    DELETED_COMMENT_TEXT,
};
pub use tree::{NodeKind, TreeNode};
