use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user reference as Azure DevOps returns it on pull requests, threads
/// and likes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct IdentityRef {
    pub id: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_name: Option<String>,
}

/// The signed-in identity the session acts as. Affordance flags (editable,
/// liked) are computed against this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub display_name: String,
}

/// Reviewer vote values used by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "i32", into = "i32")]
pub enum PullRequestVote {
    Approved,
    ApprovedWithSuggestions,
    #[default]
    NoVote,
    WaitingForAuthor,
    Rejected,
}

impl From<i32> for PullRequestVote {
    fn from(value: i32) -> Self {
        match value {
            10 => PullRequestVote::Approved,
            5 => PullRequestVote::ApprovedWithSuggestions,
            -5 => PullRequestVote::WaitingForAuthor,
            -10 => PullRequestVote::Rejected,
            _ => PullRequestVote::NoVote,
        }
    }
}

impl From<PullRequestVote> for i32 {
    fn from(value: PullRequestVote) -> Self {
        match value {
            PullRequestVote::Approved => 10,
            PullRequestVote::ApprovedWithSuggestions => 5,
            PullRequestVote::NoVote => 0,
            PullRequestVote::WaitingForAuthor => -5,
            PullRequestVote::Rejected => -10,
        }
    }
}

impl PullRequestVote {
    /// Vote description shown next to a reviewer. `NoVote` renders empty.
    pub fn vote_text(&self) -> &'static str {
        match self {
            PullRequestVote::Approved => "Approved",
            PullRequestVote::ApprovedWithSuggestions => "Approved with suggestions",
            PullRequestVote::WaitingForAuthor => "Waiting for author",
            PullRequestVote::Rejected => "Rejected",
            PullRequestVote::NoVote => "",
        }
    }
}

/// A reviewer attached to a pull request, with their current vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct IdentityRefWithVote {
    pub id: String,
    pub display_name: String,
    pub vote: PullRequestVote,
    pub is_required: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "u32", into = "u32")]
pub enum PullRequestStatus {
    #[default]
    NotSet,
    Active,
    Abandoned,
    Completed,
}

impl From<u32> for PullRequestStatus {
    fn from(value: u32) -> Self {
        match value {
            1 => PullRequestStatus::Active,
            2 => PullRequestStatus::Abandoned,
            3 => PullRequestStatus::Completed,
            _ => PullRequestStatus::NotSet,
        }
    }
}

impl From<PullRequestStatus> for u32 {
    fn from(value: PullRequestStatus) -> Self {
        match value {
            PullRequestStatus::NotSet => 0,
            PullRequestStatus::Active => 1,
            PullRequestStatus::Abandoned => 2,
            PullRequestStatus::Completed => 3,
        }
    }
}

impl PullRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PullRequestStatus::NotSet => "NotSet",
            PullRequestStatus::Active => "Active",
            PullRequestStatus::Abandoned => "Abandoned",
            PullRequestStatus::Completed => "Completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct GitUserDate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct GitCommitRef {
    pub commit_id: String,
    /// Commit message summary.
    pub comment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<GitUserDate>,
}

/// A work item linked to a pull request; the full item is resolved lazily.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkItemRef {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A resolved work item, flattened to what the tree renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkItem {
    pub id: i32,
    pub title: String,
    pub work_item_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// An identity returned by reviewer search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Identity {
    pub local_id: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mail: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "u32", into = "u32")]
pub enum PolicyEvaluationStatus {
    #[default]
    Queued,
    Running,
    Approved,
    Rejected,
    NotApplicable,
    Broken,
}

impl From<u32> for PolicyEvaluationStatus {
    fn from(value: u32) -> Self {
        match value {
            1 => PolicyEvaluationStatus::Running,
            2 => PolicyEvaluationStatus::Approved,
            3 => PolicyEvaluationStatus::Rejected,
            4 => PolicyEvaluationStatus::NotApplicable,
            5 => PolicyEvaluationStatus::Broken,
            _ => PolicyEvaluationStatus::Queued,
        }
    }
}

impl From<PolicyEvaluationStatus> for u32 {
    fn from(value: PolicyEvaluationStatus) -> Self {
        match value {
            PolicyEvaluationStatus::Queued => 0,
            PolicyEvaluationStatus::Running => 1,
            PolicyEvaluationStatus::Approved => 2,
            PolicyEvaluationStatus::Rejected => 3,
            PolicyEvaluationStatus::NotApplicable => 4,
            PolicyEvaluationStatus::Broken => 5,
        }
    }
}

impl PolicyEvaluationStatus {
    /// Icon hint the host maps onto its theme icon set.
    pub fn icon_hint(&self) -> &'static str {
        match self {
            PolicyEvaluationStatus::Approved => "check",
            PolicyEvaluationStatus::Broken => "debug",
            PolicyEvaluationStatus::NotApplicable => "circle-slash",
            PolicyEvaluationStatus::Queued => "watch",
            PolicyEvaluationStatus::Rejected => "x",
            PolicyEvaluationStatus::Running => "play",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PolicyEvaluationRecord {
    pub evaluation_id: String,
    pub display_name: String,
    pub status: PolicyEvaluationStatus,
}

/// A pull request snapshot as consumed from the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PullRequest {
    pub pull_request_id: i32,
    pub title: String,
    pub description: String,
    pub status: PullRequestStatus,
    pub is_draft: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<IdentityRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<DateTime<Utc>>,
    pub source_ref_name: String,
    pub target_ref_name: String,
    pub reviewers: Vec<IdentityRefWithVote>,
    pub commits: Vec<GitCommitRef>,
    pub work_item_refs: Vec<WorkItemRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_merge_source_commit: Option<GitCommitRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_merge_target_commit: Option<GitCommitRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_merge_commit: Option<GitCommitRef>,
}

impl PullRequest {
    /// Commit id new file contents are read from (source branch side).
    pub fn source_commit_id(&self) -> Option<&str> {
        self.last_merge_source_commit
            .as_ref()
            .map(|c| c.commit_id.as_str())
    }

    /// Commit id previous file contents are read from (target branch side).
    pub fn target_commit_id(&self) -> Option<&str> {
        self.last_merge_target_commit
            .as_ref()
            .map(|c| c.commit_id.as_str())
    }
}
