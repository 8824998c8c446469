pub mod archive;
pub mod delete;
pub mod duplicate;
pub mod move_task;

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::action::OnCompletionAction;
use crate::model::settings::Settings;
use crate::model::task::Task;
use crate::vault::canvas::CanvasTaskUpdater;
use crate::vault::store::Vault;

/// Everything one action run needs: the task, the stores, the settings, and
/// the date to stamp with. Built fresh per invocation and discarded after.
pub struct ExecutionContext<'a> {
    pub task: &'a Task,
    pub vault: &'a dyn Vault,
    pub canvas: &'a dyn CanvasTaskUpdater,
    pub settings: &'a Settings,
    /// Calendar date used for completion and duplication stamps. Captured
    /// once by the caller rather than read from the clock mid-run.
    pub today: NaiveDate,
}

/// Outcome of one on-completion action. Exactly one of `message` (success)
/// and `error` (failure) is set; both strings are written for direct display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExecutionResult {
    pub fn success(message: impl Into<String>) -> Self {
        ExecutionResult {
            success: true,
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        ExecutionResult {
            success: false,
            message: None,
            error: Some(error.into()),
        }
    }
}

/// Run an on-completion action against the task in the context.
///
/// Every failure mode comes back as a failure result; nothing here panics or
/// propagates an error to the caller.
pub fn execute(ctx: &ExecutionContext, action: &OnCompletionAction) -> ExecutionResult {
    match action {
        OnCompletionAction::Keep => ExecutionResult::success("Task kept in place"),
        OnCompletionAction::Delete => delete::execute_delete(ctx),
        OnCompletionAction::Archive {
            archive_file,
            archive_section,
        } => archive::execute_archive(ctx, archive_file.as_deref(), archive_section.as_deref()),
        OnCompletionAction::Move {
            target_file,
            target_section,
        } => move_task::execute_move(ctx, target_file, target_section.as_deref()),
        OnCompletionAction::Duplicate {
            target_file,
            target_section,
            preserve_metadata,
        } => duplicate::execute_duplicate(
            ctx,
            target_file.as_deref(),
            target_section.as_deref(),
            *preserve_metadata,
        ),
    }
}

/// One-line human description of what an action will do.
pub fn describe(action: &OnCompletionAction) -> String {
    match action {
        OnCompletionAction::Keep => "Keep the completed task in place".to_string(),
        OnCompletionAction::Delete => "Delete the completed task from the file".to_string(),
        OnCompletionAction::Archive {
            archive_file,
            archive_section,
        } => {
            let file = archive_file.as_deref().unwrap_or(archive::DEFAULT_ARCHIVE_FILE);
            let section = archive_section
                .as_deref()
                .unwrap_or(archive::DEFAULT_ARCHIVE_SECTION);
            format!("Archive task to {file} (section: {section})")
        }
        OnCompletionAction::Move {
            target_file,
            target_section,
        } => match target_section {
            Some(section) => format!("Move task to {target_file} (section: {section})"),
            None => format!("Move task to {target_file}"),
        },
        OnCompletionAction::Duplicate {
            target_file,
            target_section,
            ..
        } => match (target_file, target_section) {
            (Some(file), Some(section)) => {
                format!("Duplicate task to {file} (section: {section})")
            }
            (Some(file), None) => format!("Duplicate task to {file}"),
            (None, _) => "Duplicate task in same file".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::TaskOrigin;
    use crate::vault::mem::MemVault;
    use crate::vault::JsonCanvasUpdater;

    fn task() -> Task {
        Task {
            id: "t-1".to_string(),
            content: "A".to_string(),
            origin: TaskOrigin::Markdown {
                file_path: "a.md".to_string(),
                line: 0,
            },
            completed: true,
            status: 'x',
            original_markdown: None,
            on_completion: Some("keep".to_string()),
        }
    }

    #[test]
    fn test_keep_touches_nothing() {
        let vault = MemVault::new().with_file("a.md", "- [x] A\n");
        let canvas = JsonCanvasUpdater::new(&vault);
        let task = task();
        let settings = Settings::default();
        let ctx = ExecutionContext {
            task: &task,
            vault: &vault,
            canvas: &canvas,
            settings: &settings,
            today: chrono::NaiveDate::from_ymd_opt(2025, 7, 7).unwrap(),
        };
        let result = execute(&ctx, &OnCompletionAction::Keep);
        assert!(result.success);
        assert_eq!(vault.content("a.md").as_deref(), Some("- [x] A\n"));
    }

    #[test]
    fn test_describe_archive_defaults() {
        let action = OnCompletionAction::Archive {
            archive_file: None,
            archive_section: None,
        };
        assert_eq!(
            describe(&action),
            "Archive task to Archive/Completed Tasks.md (section: Completed Tasks)"
        );
    }

    #[test]
    fn test_describe_move_with_section() {
        let action = OnCompletionAction::Move {
            target_file: "Later.md".to_string(),
            target_section: Some("Inbox".to_string()),
        };
        assert_eq!(describe(&action), "Move task to Later.md (section: Inbox)");
    }

    #[test]
    fn test_result_serialization_shape() {
        let ok = ExecutionResult::success("done");
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "done");
        assert!(json.get("error").is_none());
    }
}
