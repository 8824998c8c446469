use serde::{Deserialize, Serialize};

/// A parsed on-completion directive.
///
/// The serde representation matches the JSON directive format tasks may carry
/// inline (`{"type": "archive", "archiveFile": "done.md"}`), so the same type
/// deserializes both notations the directive parser accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OnCompletionAction {
    /// Leave the task where it is.
    Keep,
    /// Remove the task line from its origin document.
    Delete,
    /// Append the task to an archive document, then remove it from the origin.
    #[serde(rename_all = "camelCase")]
    Archive {
        #[serde(default)]
        archive_file: Option<String>,
        #[serde(default)]
        archive_section: Option<String>,
    },
    /// Relocate the task line to another document.
    #[serde(rename_all = "camelCase")]
    Move {
        target_file: String,
        #[serde(default)]
        target_section: Option<String>,
    },
    /// Copy the task line, resetting the copy to an open checkbox.
    #[serde(rename_all = "camelCase")]
    Duplicate {
        #[serde(default)]
        target_file: Option<String>,
        #[serde(default)]
        target_section: Option<String>,
        #[serde(default)]
        preserve_metadata: bool,
    },
}
