//! Review engine for Azure DevOps pull requests, embeddable in editor
//! hosts.
//!
//! The crate builds the multi-level review tree on demand, materializes
//! file diffs into a temp revision pair, maps server comment threads onto
//! highlight ranges in both revisions, and keeps the local thread cache
//! consistent with the remote service across comment and vote commands.
//! The remote API itself is consumed through the [`PullRequestBackend`]
//! trait; rendering is left to the host.

pub mod avatar;
pub mod backend;
pub mod config;
pub mod diff;
pub mod error;
pub mod model;
pub mod paths;
pub mod position;
pub mod session;
pub mod testing;
pub mod tree;

pub use backend::PullRequestBackend;
pub use config::{ConfigLoadOutcome, ReviewConfig, load_config};
pub use diff::{Decoration, DiffCommentReconciler, DiffSessionState, DiffSide};
pub use error::{AdoPrError, Result};
pub use model::{NodeKind, TreeNode};
pub use position::{CommentPosition, EditorPosition, EditorRange};
pub use session::{PullRequestSession, ThreadCache};
