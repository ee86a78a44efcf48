use super::change::ChangeType;
use super::pull_request::{PolicyEvaluationStatus, PullRequestStatus, PullRequestVote};

/// Stable node kind discriminator, decoupled from any display text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    CreatedBy,
    Branches,
    Title,
    Description,
    DescriptionText,
    WorkItems,
    WorkItem,
    Policies,
    Policy,
    RequiredReviewers,
    OptionalReviewers,
    Reviewer,
    Commits,
    Commit,
    OverallComments,
    Files,
    Folder,
    File,
    Comment,
    Reply,
    Placeholder,
}

/// One node of the pull-request review tree.
///
/// Nodes are ephemeral: rebuilt on every expansion request and never
/// mutated in place. Each variant carries only the data needed to render
/// itself and to compute its children; identity is structural (kind plus
/// owning entity id), never an object reference or a label string.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeNode {
    CreatedBy {
        display_name: String,
        status: PullRequestStatus,
        avatar: Option<String>,
    },
    Branches {
        source_ref_name: String,
        target_ref_name: String,
    },
    Title {
        title: String,
    },
    Description,
    DescriptionText {
        text: String,
    },
    WorkItems,
    WorkItem {
        id: i32,
        title: String,
        work_item_type: String,
        url: Option<String>,
        icon: Option<String>,
    },
    Policies,
    Policy {
        display_name: String,
        status: PolicyEvaluationStatus,
    },
    RequiredReviewers,
    OptionalReviewers,
    Reviewer {
        display_name: String,
        vote: PullRequestVote,
        avatar: Option<String>,
    },
    Commits,
    Commit {
        commit_id: String,
        message: String,
        author: String,
    },
    OverallComments,
    Files,
    Folder {
        /// Accumulated directory prefix up to and including this folder,
        /// with a trailing slash.
        prefix: String,
        name: String,
    },
    File {
        name: String,
        /// Complete repository-relative path; the join key for threads.
        path: String,
        change_type: ChangeType,
        /// True when at least one active thread with a visible comment
        /// anchors to this file.
        has_active_threads: bool,
    },
    Comment {
        thread_id: i32,
        content: String,
        author: String,
        avatar: Option<String>,
    },
    Reply {
        thread_id: i32,
        comment_id: i32,
        content: String,
        author: String,
        avatar: Option<String>,
    },
    Placeholder {
        text: String,
    },
}

impl TreeNode {
    pub fn kind(&self) -> NodeKind {
        match self {
            TreeNode::CreatedBy { .. } => NodeKind::CreatedBy,
            TreeNode::Branches { .. } => NodeKind::Branches,
            TreeNode::Title { .. } => NodeKind::Title,
            TreeNode::Description => NodeKind::Description,
            TreeNode::DescriptionText { .. } => NodeKind::DescriptionText,
            TreeNode::WorkItems => NodeKind::WorkItems,
            TreeNode::WorkItem { .. } => NodeKind::WorkItem,
            TreeNode::Policies => NodeKind::Policies,
            TreeNode::Policy { .. } => NodeKind::Policy,
            TreeNode::RequiredReviewers => NodeKind::RequiredReviewers,
            TreeNode::OptionalReviewers => NodeKind::OptionalReviewers,
            TreeNode::Reviewer { .. } => NodeKind::Reviewer,
            TreeNode::Commits => NodeKind::Commits,
            TreeNode::Commit { .. } => NodeKind::Commit,
            TreeNode::OverallComments => NodeKind::OverallComments,
            TreeNode::Files => NodeKind::Files,
            TreeNode::Folder { .. } => NodeKind::Folder,
            TreeNode::File { .. } => NodeKind::File,
            TreeNode::Comment { .. } => NodeKind::Comment,
            TreeNode::Reply { .. } => NodeKind::Reply,
            TreeNode::Placeholder { .. } => NodeKind::Placeholder,
        }
    }

    /// Display label, derived from data. Rendering only; dispatch always
    /// goes through the variant itself.
    pub fn label(&self) -> String {
        match self {
            TreeNode::CreatedBy {
                display_name,
                status,
                ..
            } => format!("{display_name} - {}", status.as_str()),
            TreeNode::Branches {
                source_ref_name,
                target_ref_name,
            } => format!(
                "{} into {}",
                crate::paths::last_path_fragment(source_ref_name),
                crate::paths::last_path_fragment(target_ref_name)
            ),
            TreeNode::Title { title } => title.clone(),
            TreeNode::Description => "Description".to_string(),
            TreeNode::DescriptionText { text } => text.clone(),
            TreeNode::WorkItems => "Work Items".to_string(),
            TreeNode::WorkItem { title, .. } => title.clone(),
            TreeNode::Policies => "Policies".to_string(),
            TreeNode::Policy { display_name, .. } => display_name.clone(),
            TreeNode::RequiredReviewers => "Required Reviewers".to_string(),
            TreeNode::OptionalReviewers => "Optional Reviewers".to_string(),
            TreeNode::Reviewer { display_name, .. } => display_name.clone(),
            TreeNode::Commits => "Commits".to_string(),
            TreeNode::Commit { message, .. } => message.clone(),
            TreeNode::OverallComments => "Overall Comments".to_string(),
            TreeNode::Files => "Files".to_string(),
            TreeNode::Folder { name, .. } => name.clone(),
            TreeNode::File { name, .. } => name.clone(),
            TreeNode::Comment { content, .. } => content.clone(),
            TreeNode::Reply { content, .. } => content.clone(),
            TreeNode::Placeholder { text } => text.clone(),
        }
    }

    /// Secondary text shown next to the label.
    pub fn description(&self) -> Option<String> {
        match self {
            TreeNode::Reviewer { vote, .. } => Some(vote.vote_text().to_string()),
            TreeNode::File { change_type, .. } => Some(change_type.description().to_string()),
            TreeNode::Comment { author, .. } | TreeNode::Reply { author, .. } => {
                Some(author.clone())
            }
            TreeNode::WorkItem { work_item_type, .. } => Some(work_item_type.clone()),
            _ => None,
        }
    }

    /// Whether the host should render this node expandable.
    pub fn is_expandable(&self) -> bool {
        match self {
            TreeNode::Description
            | TreeNode::WorkItems
            | TreeNode::Policies
            | TreeNode::RequiredReviewers
            | TreeNode::OptionalReviewers
            | TreeNode::Commits
            | TreeNode::OverallComments
            | TreeNode::Files
            | TreeNode::Folder { .. }
            | TreeNode::Comment { .. } => true,
            TreeNode::File {
                has_active_threads, ..
            } => *has_active_threads,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branches_label_uses_leaf_ref_names() {
        let node = TreeNode::Branches {
            source_ref_name: "refs/heads/feature/math".to_string(),
            target_ref_name: "refs/heads/main".to_string(),
        };
        assert_eq!(node.label(), "math into main");
    }

    #[test]
    fn file_node_expandability_follows_thread_flag() {
        let without = TreeNode::File {
            name: "math.ts".to_string(),
            path: "src/util/math.ts".to_string(),
            change_type: ChangeType::Edit,
            has_active_threads: false,
        };
        let with = TreeNode::File {
            name: "math.ts".to_string(),
            path: "src/util/math.ts".to_string(),
            change_type: ChangeType::Edit,
            has_active_threads: true,
        };
        assert!(!without.is_expandable());
        assert!(with.is_expandable());
    }

    #[test]
    fn structural_identity_distinguishes_same_label_nodes() {
        let a = TreeNode::Folder {
            prefix: "src/a/".to_string(),
            name: "a".to_string(),
        };
        let b = TreeNode::Folder {
            prefix: "lib/a/".to_string(),
            name: "a".to_string(),
        };
        assert_eq!(a.label(), b.label());
        assert_ne!(a, b);
        assert_eq!(a.kind(), NodeKind::Folder);
    }

    #[test]
    fn reviewer_description_is_the_vote_text() {
        let node = TreeNode::Reviewer {
            display_name: "Sam".to_string(),
            vote: PullRequestVote::WaitingForAuthor,
            avatar: None,
        };
        assert_eq!(node.description().as_deref(), Some("Waiting for author"));
    }
}
