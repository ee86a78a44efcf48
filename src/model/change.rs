use serde::{Deserialize, Serialize};

/// Version-control change kind of a file in a pull request iteration.
///
/// The service encodes these as bitflags; `Rename` combined with `Edit`
/// arrives as a single combined value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "u32", into = "u32")]
pub enum ChangeType {
    Add,
    #[default]
    Edit,
    Rename,
    Delete,
    RenameEdit,
    Other,
}

impl From<u32> for ChangeType {
    fn from(value: u32) -> Self {
        match value {
            1 => ChangeType::Add,
            2 => ChangeType::Edit,
            8 => ChangeType::Rename,
            16 => ChangeType::Delete,
            10 => ChangeType::RenameEdit,
            _ => ChangeType::Other,
        }
    }
}

impl From<ChangeType> for u32 {
    fn from(value: ChangeType) -> Self {
        match value {
            ChangeType::Add => 1,
            ChangeType::Edit => 2,
            ChangeType::Rename => 8,
            ChangeType::Delete => 16,
            ChangeType::RenameEdit => 10,
            ChangeType::Other => 0,
        }
    }
}

impl ChangeType {
    /// Description shown next to a file name in the tree.
    pub fn description(&self) -> &'static str {
        match self {
            ChangeType::Add => "Add",
            ChangeType::Edit => "Edit",
            ChangeType::Rename => "Rename",
            ChangeType::Delete => "Delete",
            ChangeType::RenameEdit => "Rename, Edit",
            ChangeType::Other => "",
        }
    }
}

/// One changed file of a pull request iteration. Read-only snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct FileChange {
    /// Repository-relative path after the change. Missing for changes the
    /// service reports only by their pre-rename path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Pre-rename path, when the file was renamed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_path: Option<String>,
    pub change_type: ChangeType,
}

impl FileChange {
    pub fn new(path: &str, change_type: ChangeType) -> Self {
        Self {
            path: Some(path.to_string()),
            original_path: None,
            change_type,
        }
    }

    pub fn renamed(path: &str, original_path: &str, change_type: ChangeType) -> Self {
        Self {
            path: Some(path.to_string()),
            original_path: Some(original_path.to_string()),
            change_type,
        }
    }

    /// The path the change is displayed and anchored under: the current
    /// path when present, otherwise the pre-rename path.
    pub fn effective_path(&self) -> &str {
        self.path
            .as_deref()
            .or(self.original_path.as_deref())
            .unwrap_or("")
    }
}
