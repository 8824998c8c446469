use serde::{Deserialize, Serialize};

/// Where a task lives before any on-completion action runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TaskOrigin {
    /// A line in a markdown file (0-indexed).
    Markdown { file_path: String, line: usize },
    /// A task line inside a text node of a JSON canvas file.
    Canvas { file_path: String, node_id: String },
}

impl TaskOrigin {
    /// Path of the document the task currently lives in.
    pub fn file_path(&self) -> &str {
        match self {
            TaskOrigin::Markdown { file_path, .. } => file_path,
            TaskOrigin::Canvas { file_path, .. } => file_path,
        }
    }
}

/// A task as handed to the on-completion engine by a caller.
///
/// The engine consumes tasks, it does not own them: every field is filled in
/// by whoever detected the completion (the CLI handlers here, a host
/// application elsewhere).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Opaque stable identifier.
    pub id: String,
    /// Task text without list/checkbox markup.
    pub content: String,
    /// Origin document and position.
    pub origin: TaskOrigin,
    /// Current completion state.
    pub completed: bool,
    /// Checkbox marker character as it appears in the source (`x`, ` `, `/`, ...).
    pub status: char,
    /// The literal source line, including checkbox and trailing metadata.
    /// When absent, a minimal `- [status] content` line is synthesized.
    pub original_markdown: Option<String>,
    /// Raw on-completion directive value, when the task carries one.
    pub on_completion: Option<String>,
}

impl Task {
    /// The task's source line, synthesizing `- [x| ] content` when the
    /// literal source text was not captured.
    pub fn source_line(&self) -> String {
        match &self.original_markdown {
            Some(text) => text.clone(),
            None => format!(
                "- [{}] {}",
                if self.completed { 'x' } else { ' ' },
                self.content
            ),
        }
    }
}
