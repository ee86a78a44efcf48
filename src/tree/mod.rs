//! Lazy expansion of the pull-request review tree.
//!
//! The builder produces the ordered children of one node per call,
//! consulting the session's cached pull request and threads and reaching
//! for the backend only where an expansion genuinely needs it (work items,
//! policies, the change list). Expansion is total: a backend failure
//! degrades to an empty or placeholder listing, never an error.

use crate::avatar::{AvatarCache, image_data_uri};
use crate::backend::PullRequestBackend;
use crate::model::{
    CommentThread, CommentThreadStatus, FileChange, PullRequest, TreeNode,
};
use crate::paths::{common_prefix, distinct_first_segments};

pub const NO_WORK_ITEMS: &str = "No work items";
pub const NO_POLICIES: &str = "No policies";
pub const NO_COMMENTS: &str = "No comments";
pub const NO_FILES: &str = "No files";

pub struct TreeBuilder<'a> {
    backend: &'a dyn PullRequestBackend,
    avatars: &'a mut AvatarCache,
    pull_request: &'a PullRequest,
    threads: &'a [CommentThread],
    /// Change list cache owned by the session; populated on Files
    /// expansion and reused by every Folder expansion below it.
    changes: &'a mut Option<Vec<FileChange>>,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(
        backend: &'a dyn PullRequestBackend,
        avatars: &'a mut AvatarCache,
        pull_request: &'a PullRequest,
        threads: &'a [CommentThread],
        changes: &'a mut Option<Vec<FileChange>>,
    ) -> Self {
        Self {
            backend,
            avatars,
            pull_request,
            threads,
            changes,
        }
    }

    /// Ordered children of `node`; `None` expands the root.
    pub fn children(&mut self, node: Option<&TreeNode>) -> Vec<TreeNode> {
        let Some(node) = node else {
            return self.root_children();
        };

        match node {
            TreeNode::Description => vec![TreeNode::DescriptionText {
                text: self.pull_request.description.clone(),
            }],
            TreeNode::WorkItems => self.work_item_children(),
            TreeNode::Policies => self.policy_children(),
            TreeNode::RequiredReviewers => self.reviewer_children(true),
            TreeNode::OptionalReviewers => self.reviewer_children(false),
            TreeNode::Commits => self.commit_children(),
            TreeNode::OverallComments => self.overall_comment_children(),
            TreeNode::Files => self.files_children(),
            TreeNode::Folder { prefix, .. } => self.folder_children(prefix),
            TreeNode::File {
                path,
                has_active_threads,
                ..
            } => {
                if *has_active_threads {
                    self.file_thread_children(path)
                } else {
                    Vec::new()
                }
            }
            TreeNode::Comment { thread_id, .. } => self.reply_children(*thread_id),
            _ => Vec::new(),
        }
    }

    fn root_children(&mut self) -> Vec<TreeNode> {
        let pr = self.pull_request;
        let created_by_name = pr
            .created_by
            .as_ref()
            .map_or(String::new(), |c| c.display_name.clone());
        let created_by_id = pr.created_by.as_ref().map(|c| c.id.as_str());
        let avatar = self.avatars.profile_pic(self.backend, created_by_id);

        vec![
            TreeNode::CreatedBy {
                display_name: created_by_name,
                status: pr.status,
                avatar,
            },
            TreeNode::Branches {
                source_ref_name: pr.source_ref_name.clone(),
                target_ref_name: pr.target_ref_name.clone(),
            },
            TreeNode::Title {
                title: pr.title.clone(),
            },
            TreeNode::Description,
            TreeNode::WorkItems,
            TreeNode::Policies,
            TreeNode::RequiredReviewers,
            TreeNode::OptionalReviewers,
            TreeNode::Commits,
            TreeNode::OverallComments,
            TreeNode::Files,
        ]
    }

    fn work_item_children(&mut self) -> Vec<TreeNode> {
        let ids: Vec<i32> = self
            .pull_request
            .work_item_refs
            .iter()
            .filter_map(|r| r.id.parse().ok())
            .collect();
        if ids.is_empty() {
            return vec![placeholder(NO_WORK_ITEMS)];
        }

        let items = match self.backend.get_work_items(&ids) {
            Ok(items) => items,
            Err(err) => {
                tracing::warn!("work item lookup failed: {err}");
                Vec::new()
            }
        };
        if items.is_empty() {
            return vec![placeholder(NO_WORK_ITEMS)];
        }

        items
            .into_iter()
            .map(|item| {
                let icon = match self.backend.get_work_item_icon(&item.work_item_type) {
                    Ok(Some(bytes)) => Some(image_data_uri(&bytes)),
                    Ok(None) => None,
                    Err(err) => {
                        tracing::warn!("work item icon lookup failed: {err}");
                        None
                    }
                };
                TreeNode::WorkItem {
                    id: item.id,
                    title: item.title,
                    work_item_type: item.work_item_type,
                    url: item.url,
                    icon,
                }
            })
            .collect()
    }

    fn policy_children(&mut self) -> Vec<TreeNode> {
        let records = match self
            .backend
            .get_policy_evaluations(self.pull_request.pull_request_id)
        {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!("policy evaluation lookup failed: {err}");
                Vec::new()
            }
        };
        if records.is_empty() {
            return vec![placeholder(NO_POLICIES)];
        }

        records
            .into_iter()
            .map(|record| TreeNode::Policy {
                display_name: record.display_name,
                status: record.status,
            })
            .collect()
    }

    fn reviewer_children(&mut self, required: bool) -> Vec<TreeNode> {
        self.pull_request
            .reviewers
            .iter()
            .filter(|r| r.is_required == required)
            .map(|r| TreeNode::Reviewer {
                display_name: r.display_name.clone(),
                vote: r.vote,
                avatar: self.avatars.profile_pic(self.backend, Some(&r.id)),
            })
            .collect()
    }

    fn commit_children(&mut self) -> Vec<TreeNode> {
        self.pull_request
            .commits
            .iter()
            .map(|commit| TreeNode::Commit {
                commit_id: commit.commit_id.clone(),
                message: commit.comment.clone(),
                author: commit.author.as_ref().map_or(String::new(), |a| a.name.clone()),
            })
            .collect()
    }

    fn overall_comment_children(&mut self) -> Vec<TreeNode> {
        let nodes: Vec<TreeNode> = self
            .threads
            .iter()
            .filter(|t| t.is_listable() && t.is_overall())
            .filter_map(|t| self.comment_node(t))
            .collect();
        if nodes.is_empty() {
            vec![placeholder(NO_COMMENTS)]
        } else {
            nodes
        }
    }

    fn files_children(&mut self) -> Vec<TreeNode> {
        if self.changes.is_none() {
            let fetched = match self
                .backend
                .get_files_changed(self.pull_request.pull_request_id)
            {
                Ok(changes) => changes,
                Err(err) => {
                    tracing::warn!("change list lookup failed: {err}");
                    Vec::new()
                }
            };
            *self.changes = Some(fetched);
        }

        let changes = self.changes.as_deref().unwrap_or(&[]);
        if changes.is_empty() {
            return vec![placeholder(NO_FILES)];
        }

        let paths: Vec<String> = changes
            .iter()
            .map(|c| c.effective_path().to_string())
            .collect();
        let prefix = common_prefix(&paths);
        let name = if prefix.is_empty() {
            "/".to_string()
        } else {
            prefix.clone()
        };
        vec![TreeNode::Folder { prefix, name }]
    }

    /// The grouping step: peel one path segment below `prefix`, emitting a
    /// sub-folder per distinct next segment and a file leaf per change
    /// that sits directly at this level. Each recursion strictly shortens
    /// the relative paths, so expansion always terminates; a change whose
    /// path equals the prefix itself is treated as already consumed.
    fn folder_children(&mut self, prefix: &str) -> Vec<TreeNode> {
        let changes = self.changes.as_deref().unwrap_or(&[]);

        let members: Vec<&FileChange> = changes
            .iter()
            .filter(|c| c.effective_path().starts_with(prefix))
            .collect();
        let relative: Vec<String> = members
            .iter()
            .map(|c| c.effective_path()[prefix.len()..].to_string())
            .collect();

        let mut nodes: Vec<TreeNode> = distinct_first_segments(&relative)
            .into_iter()
            .map(|segment| TreeNode::Folder {
                prefix: format!("{prefix}{segment}/"),
                name: segment,
            })
            .collect();

        for (change, rel) in members.iter().zip(&relative) {
            if rel.is_empty() || rel.contains('/') {
                continue;
            }
            let complete_path = format!("{prefix}{rel}");
            nodes.push(TreeNode::File {
                name: rel.clone(),
                path: complete_path.clone(),
                change_type: change.change_type,
                has_active_threads: self.file_has_active_threads(&complete_path),
            });
        }

        nodes
    }

    fn file_has_active_threads(&self, complete_path: &str) -> bool {
        self.threads.iter().any(|t| {
            t.anchors_to(complete_path)
                && t.is_listable()
                && t.status == CommentThreadStatus::Active
                && t.has_visible_comments()
        })
    }

    fn file_thread_children(&mut self, path: &str) -> Vec<TreeNode> {
        let nodes: Vec<TreeNode> = self
            .threads
            .iter()
            .filter(|t| t.is_listable() && t.anchors_to(path))
            .filter_map(|t| self.comment_node(t))
            .collect();
        if nodes.is_empty() {
            vec![placeholder(NO_COMMENTS)]
        } else {
            nodes
        }
    }

    fn comment_node(&mut self, thread: &CommentThread) -> Option<TreeNode> {
        let first = thread.first_visible_comment()?;
        Some(TreeNode::Comment {
            thread_id: thread.id,
            content: first.content.clone(),
            author: first.author_display_name().to_string(),
            avatar: self.avatars.profile_pic(self.backend, first.author_id()),
        })
    }

    fn reply_children(&mut self, thread_id: i32) -> Vec<TreeNode> {
        let Some(thread) = self.threads.iter().find(|t| t.id == thread_id) else {
            return Vec::new();
        };
        let Some(first) = thread.first_visible_comment() else {
            return Vec::new();
        };
        let first_id = first.id;

        thread
            .comments
            .iter()
            .skip_while(|c| c.id != first_id)
            .skip(1)
            .map(|comment| {
                let content = if comment.is_deleted {
                    crate::model::DELETED_COMMENT_TEXT.to_string()
                } else {
                    comment.content.clone()
                };
                TreeNode::Reply {
                    thread_id,
                    comment_id: comment.id,
                    content,
                    author: comment.author_display_name().to_string(),
                    avatar: self.avatars.profile_pic(self.backend, comment.author_id()),
                }
            })
            .collect()
    }
}

fn placeholder(text: &str) -> TreeNode {
    TreeNode::Placeholder {
        text: text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        ChangeType, Comment, GitCommitRef, IdentityRef, IdentityRefWithVote,
        PolicyEvaluationRecord, PolicyEvaluationStatus, PullRequestStatus, PullRequestVote,
        ThreadContext, WorkItem, WorkItemRef,
    };
    use crate::testing::MockBackend;

    fn pull_request() -> PullRequest {
        PullRequest {
            pull_request_id: 42,
            title: "Add math helpers".to_string(),
            description: "Adds clamp and lerp".to_string(),
            status: PullRequestStatus::Active,
            created_by: Some(IdentityRef {
                id: "u1".to_string(),
                display_name: "Rina".to_string(),
                unique_name: None,
            }),
            source_ref_name: "refs/heads/feature/math".to_string(),
            target_ref_name: "refs/heads/main".to_string(),
            ..PullRequest::default()
        }
    }

    fn file_thread(id: i32, path: &str, content: &str) -> CommentThread {
        CommentThread {
            id,
            status: CommentThreadStatus::Active,
            thread_context: Some(ThreadContext {
                file_path: path.to_string(),
                ..ThreadContext::default()
            }),
            comments: vec![Comment {
                id: id * 10,
                content: content.to_string(),
                author: Some(IdentityRef {
                    id: "u2".to_string(),
                    display_name: "Sam".to_string(),
                    unique_name: None,
                }),
                ..Comment::default()
            }],
            ..CommentThread::default()
        }
    }

    fn overall_thread(id: i32, content: &str) -> CommentThread {
        let mut thread = file_thread(id, "", content);
        thread.thread_context = None;
        thread
    }

    struct Fixture {
        backend: MockBackend,
        avatars: AvatarCache,
        pull_request: PullRequest,
        threads: Vec<CommentThread>,
        changes: Option<Vec<FileChange>>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                backend: MockBackend::new(),
                avatars: AvatarCache::new(),
                pull_request: pull_request(),
                threads: Vec::new(),
                changes: None,
            }
        }

        fn children(&mut self, node: Option<&TreeNode>) -> Vec<TreeNode> {
            TreeBuilder::new(
                &self.backend,
                &mut self.avatars,
                &self.pull_request,
                &self.threads,
                &mut self.changes,
            )
            .children(node)
        }
    }

    mod root_tests {
        use super::*;
        use crate::model::NodeKind;

        #[test]
        fn root_yields_the_fixed_section_order() {
            let mut fixture = Fixture::new();
            let kinds: Vec<NodeKind> = fixture
                .children(None)
                .iter()
                .map(TreeNode::kind)
                .collect();
            assert_eq!(
                kinds,
                vec![
                    NodeKind::CreatedBy,
                    NodeKind::Branches,
                    NodeKind::Title,
                    NodeKind::Description,
                    NodeKind::WorkItems,
                    NodeKind::Policies,
                    NodeKind::RequiredReviewers,
                    NodeKind::OptionalReviewers,
                    NodeKind::Commits,
                    NodeKind::OverallComments,
                    NodeKind::Files,
                ]
            );
        }

        #[test]
        fn created_by_carries_name_and_status() {
            let mut fixture = Fixture::new();
            let root = fixture.children(None);
            assert_eq!(root[0].label(), "Rina - Active");
        }
    }

    mod section_tests {
        use super::*;

        #[test]
        fn description_expands_to_its_text() {
            let mut fixture = Fixture::new();
            let children = fixture.children(Some(&TreeNode::Description));
            assert_eq!(
                children,
                vec![TreeNode::DescriptionText {
                    text: "Adds clamp and lerp".to_string()
                }]
            );
        }

        #[test]
        fn empty_work_items_render_a_placeholder() {
            let mut fixture = Fixture::new();
            let children = fixture.children(Some(&TreeNode::WorkItems));
            assert_eq!(children, vec![placeholder(NO_WORK_ITEMS)]);
        }

        #[test]
        fn work_items_resolve_through_the_backend() {
            let mut fixture = Fixture::new();
            fixture.pull_request.work_item_refs = vec![WorkItemRef {
                id: "7".to_string(),
                url: None,
            }];
            fixture.backend.add_work_item_record(WorkItem {
                id: 7,
                title: "Fix rounding".to_string(),
                work_item_type: "Bug".to_string(),
                url: Some("https://dev.azure.com/_wi/7".to_string()),
            });
            fixture.backend.set_work_item_icon("Bug", b"svg".to_vec());

            let children = fixture.children(Some(&TreeNode::WorkItems));
            assert_eq!(children.len(), 1);
            let TreeNode::WorkItem { id, title, icon, .. } = &children[0] else {
                panic!("expected a work item node");
            };
            assert_eq!(*id, 7);
            assert_eq!(title, "Fix rounding");
            assert!(icon.as_deref().unwrap().starts_with("data:image/*;base64,"));
        }

        #[test]
        fn backend_failure_degrades_work_items_to_placeholder() {
            let mut fixture = Fixture::new();
            fixture.pull_request.work_item_refs = vec![WorkItemRef {
                id: "7".to_string(),
                url: None,
            }];
            fixture.backend.fail_on("get_work_items");
            let children = fixture.children(Some(&TreeNode::WorkItems));
            assert_eq!(children, vec![placeholder(NO_WORK_ITEMS)]);
        }

        #[test]
        fn policies_list_their_evaluations() {
            let mut fixture = Fixture::new();
            fixture.backend.add_policy(PolicyEvaluationRecord {
                evaluation_id: "e1".to_string(),
                display_name: "Build".to_string(),
                status: PolicyEvaluationStatus::Approved,
            });
            let children = fixture.children(Some(&TreeNode::Policies));
            assert_eq!(
                children,
                vec![TreeNode::Policy {
                    display_name: "Build".to_string(),
                    status: PolicyEvaluationStatus::Approved,
                }]
            );
        }

        #[test]
        fn reviewers_partition_by_required_flag() {
            let mut fixture = Fixture::new();
            fixture.pull_request.reviewers = vec![
                IdentityRefWithVote {
                    id: "u2".to_string(),
                    display_name: "Sam".to_string(),
                    vote: PullRequestVote::Approved,
                    is_required: true,
                },
                IdentityRefWithVote {
                    id: "u3".to_string(),
                    display_name: "Kit".to_string(),
                    vote: PullRequestVote::NoVote,
                    is_required: false,
                },
            ];

            let required = fixture.children(Some(&TreeNode::RequiredReviewers));
            assert_eq!(required.len(), 1);
            assert_eq!(required[0].label(), "Sam");
            assert_eq!(required[0].description().as_deref(), Some("Approved"));

            let optional = fixture.children(Some(&TreeNode::OptionalReviewers));
            assert_eq!(optional.len(), 1);
            assert_eq!(optional[0].label(), "Kit");
        }

        #[test]
        fn commits_list_in_snapshot_order() {
            let mut fixture = Fixture::new();
            fixture.pull_request.commits = vec![
                GitCommitRef {
                    commit_id: "c1".to_string(),
                    comment: "first".to_string(),
                    author: None,
                },
                GitCommitRef {
                    commit_id: "c2".to_string(),
                    comment: "second".to_string(),
                    author: None,
                },
            ];
            let children = fixture.children(Some(&TreeNode::Commits));
            assert_eq!(children[0].label(), "first");
            assert_eq!(children[1].label(), "second");
        }
    }

    mod overall_comment_tests {
        use super::*;

        #[test]
        fn only_fileless_listable_threads_appear() {
            let mut fixture = Fixture::new();
            fixture.threads = vec![
                overall_thread(1, "overall note"),
                file_thread(2, "src/a.rs", "anchored"),
            ];
            let children = fixture.children(Some(&TreeNode::OverallComments));
            assert_eq!(children.len(), 1);
            assert_eq!(children[0].label(), "overall note");
        }

        #[test]
        fn deleted_thread_is_not_listed() {
            let mut fixture = Fixture::new();
            let mut thread = overall_thread(1, "gone");
            thread.is_deleted = true;
            fixture.threads = vec![thread];
            let children = fixture.children(Some(&TreeNode::OverallComments));
            assert_eq!(children, vec![placeholder(NO_COMMENTS)]);
        }

        #[test]
        fn thread_with_all_comments_deleted_is_not_listed() {
            let mut fixture = Fixture::new();
            let mut thread = overall_thread(1, "gone");
            for comment in &mut thread.comments {
                comment.mark_deleted();
            }
            fixture.threads = vec![thread];
            let children = fixture.children(Some(&TreeNode::OverallComments));
            assert_eq!(children, vec![placeholder(NO_COMMENTS)]);
        }

        #[test]
        fn display_comment_is_the_first_non_deleted_one() {
            let mut fixture = Fixture::new();
            let mut thread = overall_thread(1, "starter");
            thread.comments[0].mark_deleted();
            thread.comments.push(Comment {
                id: 99,
                content: "the reply carries on".to_string(),
                ..Comment::default()
            });
            fixture.threads = vec![thread];
            let children = fixture.children(Some(&TreeNode::OverallComments));
            assert_eq!(children[0].label(), "the reply carries on");
        }
    }

    mod grouping_tests {
        use super::*;

        fn changes(paths: &[&str]) -> Vec<FileChange> {
            paths
                .iter()
                .map(|p| FileChange::new(p, ChangeType::Edit))
                .collect()
        }

        #[test]
        fn files_expansion_emits_the_common_prefix_folder() {
            let mut fixture = Fixture::new();
            fixture
                .backend
                .set_changes(changes(&["src/a.ts", "src/b/c.ts"]));

            let children = fixture.children(Some(&TreeNode::Files));
            assert_eq!(
                children,
                vec![TreeNode::Folder {
                    prefix: "src/".to_string(),
                    name: "src/".to_string(),
                }]
            );
            // The change list is cached for folder recursion.
            assert!(fixture.changes.is_some());
        }

        #[test]
        fn folder_expansion_peels_one_segment() {
            let mut fixture = Fixture::new();
            fixture.changes = Some(changes(&["src/a.ts", "src/b/c.ts"]));

            let children = fixture.children(Some(&TreeNode::Folder {
                prefix: "src/".to_string(),
                name: "src/".to_string(),
            }));

            assert_eq!(
                children,
                vec![
                    TreeNode::Folder {
                        prefix: "src/b/".to_string(),
                        name: "b".to_string(),
                    },
                    TreeNode::File {
                        name: "a.ts".to_string(),
                        path: "src/a.ts".to_string(),
                        change_type: ChangeType::Edit,
                        has_active_threads: false,
                    },
                ]
            );
        }

        #[test]
        fn every_file_is_visited_exactly_once() {
            let mut fixture = Fixture::new();
            fixture.changes = Some(changes(&[
                "src/a.ts",
                "src/b/c.ts",
                "src/b/d.ts",
                "src/e/f/g.ts",
            ]));

            let mut folders = vec![TreeNode::Folder {
                prefix: "src/".to_string(),
                name: "src/".to_string(),
            }];
            let mut seen_files = Vec::new();
            let mut seen_folders = Vec::new();
            while let Some(folder) = folders.pop() {
                if let TreeNode::Folder { prefix, .. } = &folder {
                    seen_folders.push(prefix.clone());
                }
                for child in fixture.children(Some(&folder)) {
                    match child {
                        TreeNode::Folder { .. } => folders.push(child),
                        TreeNode::File { path, .. } => seen_files.push(path),
                        other => panic!("unexpected node {other:?}"),
                    }
                }
            }

            seen_files.sort();
            assert_eq!(
                seen_files,
                vec!["src/a.ts", "src/b/c.ts", "src/b/d.ts", "src/e/f/g.ts"]
            );
            seen_folders.sort();
            assert_eq!(seen_folders, vec!["src/", "src/b/", "src/e/", "src/e/f/"]);
        }

        #[test]
        fn renamed_change_groups_under_its_original_path_when_current_is_absent() {
            let mut fixture = Fixture::new();
            fixture.changes = Some(vec![FileChange {
                path: None,
                original_path: Some("src/old.ts".to_string()),
                change_type: ChangeType::Delete,
            }]);

            let children = fixture.children(Some(&TreeNode::Folder {
                prefix: "src/".to_string(),
                name: "src/".to_string(),
            }));
            assert_eq!(children.len(), 1);
            let TreeNode::File { path, .. } = &children[0] else {
                panic!("expected a file node");
            };
            assert_eq!(path, "src/old.ts");
        }

        #[test]
        fn file_is_expandable_only_with_an_active_visible_thread() {
            let mut fixture = Fixture::new();
            fixture.changes = Some(changes(&["src/a.ts", "src/b.ts"]));
            fixture.threads = vec![file_thread(1, "src/a.ts", "note")];
            let mut fixed = file_thread(2, "src/b.ts", "resolved");
            fixed.status = CommentThreadStatus::Fixed;
            fixture.threads.push(fixed);

            let children = fixture.children(Some(&TreeNode::Folder {
                prefix: "src/".to_string(),
                name: "src/".to_string(),
            }));

            let flags: Vec<(String, bool)> = children
                .iter()
                .filter_map(|node| match node {
                    TreeNode::File {
                        path,
                        has_active_threads,
                        ..
                    } => Some((path.clone(), *has_active_threads)),
                    _ => None,
                })
                .collect();
            assert_eq!(
                flags,
                vec![
                    ("src/a.ts".to_string(), true),
                    ("src/b.ts".to_string(), false),
                ]
            );
        }

        #[test]
        fn empty_change_list_renders_a_placeholder() {
            let mut fixture = Fixture::new();
            let children = fixture.children(Some(&TreeNode::Files));
            assert_eq!(children, vec![placeholder(NO_FILES)]);
        }
    }

    mod file_and_reply_tests {
        use super::*;

        #[test]
        fn file_expansion_lists_anchored_threads() {
            let mut fixture = Fixture::new();
            fixture.threads = vec![
                file_thread(1, "src/a.ts", "anchored here"),
                file_thread(2, "src/b.ts", "somewhere else"),
            ];
            let node = TreeNode::File {
                name: "a.ts".to_string(),
                path: "src/a.ts".to_string(),
                change_type: ChangeType::Edit,
                has_active_threads: true,
            };
            let children = fixture.children(Some(&node));
            assert_eq!(children.len(), 1);
            assert_eq!(children[0].label(), "anchored here");
        }

        #[test]
        fn replies_are_the_comments_after_the_displayed_one() {
            let mut fixture = Fixture::new();
            let mut thread = file_thread(1, "src/a.ts", "starter");
            thread.comments.push(Comment {
                id: 11,
                content: "first reply".to_string(),
                ..Comment::default()
            });
            thread.comments.push(Comment {
                id: 12,
                content: "second reply".to_string(),
                ..Comment::default()
            });
            fixture.threads = vec![thread];

            let node = TreeNode::Comment {
                thread_id: 1,
                content: "starter".to_string(),
                author: "Sam".to_string(),
                avatar: None,
            };
            let children = fixture.children(Some(&node));
            assert_eq!(children.len(), 2);
            assert_eq!(children[0].label(), "first reply");
            assert_eq!(children[1].label(), "second reply");
        }

        #[test]
        fn deleted_reply_shows_the_deleted_marker() {
            let mut fixture = Fixture::new();
            let mut thread = file_thread(1, "src/a.ts", "starter");
            let mut reply = Comment {
                id: 11,
                content: "oops".to_string(),
                ..Comment::default()
            };
            reply.mark_deleted();
            thread.comments.push(reply);
            fixture.threads = vec![thread];

            let node = TreeNode::Comment {
                thread_id: 1,
                content: "starter".to_string(),
                author: "Sam".to_string(),
                avatar: None,
            };
            let children = fixture.children(Some(&node));
            assert_eq!(children[0].label(), crate::model::DELETED_COMMENT_TEXT);
        }
    }
}
