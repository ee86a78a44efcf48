use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::pull_request::{IdentityRef, UserProfile};
use crate::position::{CommentPosition, EditorRange, to_editor_range};

/// Content a comment carries after deletion. Deleted comments stay in the
/// thread to preserve reply ordering and ids.
pub const DELETED_COMMENT_TEXT: &str = "*Comment Deleted*";

/// Anchor payload identifying which file and which position range(s) on
/// each diff side a thread belongs to. Absent on overall comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ThreadContext {
    pub file_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left_file_start: Option<CommentPosition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left_file_end: Option<CommentPosition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right_file_start: Option<CommentPosition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right_file_end: Option<CommentPosition>,
}

impl ThreadContext {
    /// Editor range on the left ("previous") revision, when both anchors
    /// are present.
    pub fn left_range(&self) -> Option<EditorRange> {
        to_editor_range(self.left_file_start, self.left_file_end)
    }

    /// Editor range on the right ("changeset") revision, when both anchors
    /// are present.
    pub fn right_range(&self) -> Option<EditorRange> {
        to_editor_range(self.right_file_start, self.right_file_end)
    }
}

/// Thread resolution status. The service reports these numerically; numbers
/// outside the known set decode as `Unknown`, which keeps the thread out of
/// listings the same way a missing status did in the service UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "i32", into = "i32")]
pub enum CommentThreadStatus {
    #[default]
    Unknown,
    Active,
    Fixed,
    WontFix,
    Closed,
    ByDesign,
    Pending,
}

impl From<i32> for CommentThreadStatus {
    fn from(value: i32) -> Self {
        match value {
            1 => CommentThreadStatus::Active,
            2 => CommentThreadStatus::Fixed,
            3 => CommentThreadStatus::WontFix,
            4 => CommentThreadStatus::Closed,
            5 => CommentThreadStatus::ByDesign,
            6 => CommentThreadStatus::Pending,
            _ => CommentThreadStatus::Unknown,
        }
    }
}

impl From<CommentThreadStatus> for i32 {
    fn from(value: CommentThreadStatus) -> Self {
        match value {
            CommentThreadStatus::Unknown => 0,
            CommentThreadStatus::Active => 1,
            CommentThreadStatus::Fixed => 2,
            CommentThreadStatus::WontFix => 3,
            CommentThreadStatus::Closed => 4,
            CommentThreadStatus::ByDesign => 5,
            CommentThreadStatus::Pending => 6,
        }
    }
}

impl CommentThreadStatus {
    pub fn is_valid(&self) -> bool {
        *self != CommentThreadStatus::Unknown
    }
}

/// A single comment inside a thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Comment {
    pub id: i32,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<IdentityRef>,
    pub is_deleted: bool,
    pub users_liked: Vec<IdentityRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_date: Option<DateTime<Utc>>,
}

impl Comment {
    pub fn author_display_name(&self) -> &str {
        self.author.as_ref().map_or("", |a| a.display_name.as_str())
    }

    pub fn author_id(&self) -> Option<&str> {
        self.author.as_ref().map(|a| a.id.as_str())
    }

    pub fn liked_by(&self, user_id: &str) -> bool {
        self.users_liked.iter().any(|u| u.id == user_id)
    }

    /// Mark this comment deleted in place: fixed marker content, cleared
    /// affordances, likes dropped.
    pub fn mark_deleted(&mut self) {
        self.content = DELETED_COMMENT_TEXT.to_string();
        self.is_deleted = true;
        self.users_liked.clear();
    }
}

/// UI affordance flags derived per comment for the signed-in user. Never
/// server-authoritative; recomputed after every mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommentActions {
    /// The signed-in user authored this comment and may edit or delete it.
    pub editable: bool,
    /// The signed-in user has liked this comment; the offered action
    /// toggles to "unlike".
    pub liked: bool,
}

impl CommentActions {
    pub fn for_user(comment: &Comment, user: &UserProfile) -> Self {
        if comment.is_deleted {
            return Self::default();
        }
        Self {
            editable: comment.author_id() == Some(user.id.as_str()),
            liked: comment.liked_by(&user.id),
        }
    }
}

/// A comment conversation, optionally anchored to a file position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CommentThread {
    pub id: i32,
    pub status: CommentThreadStatus,
    pub is_deleted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_context: Option<ThreadContext>,
    pub comments: Vec<Comment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_date: Option<DateTime<Utc>>,
}

impl CommentThread {
    /// The first non-deleted comment represents the thread in listings.
    pub fn first_visible_comment(&self) -> Option<&Comment> {
        self.comments.iter().find(|c| !c.is_deleted)
    }

    pub fn has_visible_comments(&self) -> bool {
        self.first_visible_comment().is_some()
    }

    /// Whether the thread may appear in listings at all: not deleted, with
    /// a server-assigned id and a recognized status.
    pub fn is_listable(&self) -> bool {
        !self.is_deleted && self.id != 0 && self.status.is_valid()
    }

    /// Whether the thread is an overall (file-less) comment.
    pub fn is_overall(&self) -> bool {
        self.thread_context.is_none()
    }

    /// Whether the thread anchors to the given complete file path.
    pub fn anchors_to(&self, file_path: &str) -> bool {
        self.thread_context
            .as_ref()
            .is_some_and(|ctx| ctx.file_path == file_path)
    }

    pub fn comment_mut(&mut self, comment_id: i32) -> Option<&mut Comment> {
        self.comments.iter_mut().find(|c| c.id == comment_id)
    }
}
