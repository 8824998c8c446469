use crate::exec::{ExecutionContext, ExecutionResult};
use crate::model::task::TaskOrigin;
use crate::vault::store::VaultError;

/// Remove the completed task from its origin document.
pub fn execute_delete(ctx: &ExecutionContext) -> ExecutionResult {
    match &ctx.task.origin {
        TaskOrigin::Canvas { file_path, .. } => match ctx.canvas.delete_canvas_task(ctx.task) {
            Ok(()) => {
                ExecutionResult::success(format!("Task deleted from Canvas file {file_path}"))
            }
            Err(e) => ExecutionResult::failure(format!("Error deleting Canvas task: {e}")),
        },
        TaskOrigin::Markdown { file_path, line } => {
            match delete_markdown(ctx, file_path, *line) {
                Ok(result) => result,
                Err(e) => ExecutionResult::failure(format!("Failed to delete task: {e}")),
            }
        }
    }
}

fn delete_markdown(
    ctx: &ExecutionContext,
    file_path: &str,
    line: usize,
) -> Result<ExecutionResult, VaultError> {
    let Some(file) = ctx.vault.find_file(file_path) else {
        return Ok(ExecutionResult::failure(format!(
            "File not found: {file_path}"
        )));
    };

    let content = ctx.vault.read(&file)?;
    let mut lines: Vec<String> = content.split('\n').map(|l| l.to_string()).collect();

    // The literal source text wins over the recorded index: edits elsewhere
    // in the file may have shifted the task since it was captured.
    let index = ctx
        .task
        .original_markdown
        .as_deref()
        .and_then(|original| lines.iter().position(|l| l.trim() == original.trim()))
        .or_else(|| (line < lines.len()).then_some(line));

    let Some(index) = index else {
        return Ok(ExecutionResult::failure("Task not found in file"));
    };

    lines.remove(index);
    collapse_blank_runs(&mut lines);
    ctx.vault.write(&file, &lines.join("\n"))?;

    Ok(ExecutionResult::success("Task deleted successfully"))
}

/// Keep at most one blank line between content.
fn collapse_blank_runs(lines: &mut Vec<String>) {
    let mut i = lines.len().saturating_sub(1);
    while i >= 1 {
        if lines[i].trim().is_empty() && lines[i - 1].trim().is_empty() {
            lines.remove(i);
        }
        i -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::settings::Settings;
    use crate::model::task::Task;
    use crate::vault::mem::MemVault;
    use crate::vault::JsonCanvasUpdater;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn markdown_task(path: &str, line: usize, original: Option<&str>) -> Task {
        Task {
            id: "m-1".to_string(),
            content: "A".to_string(),
            origin: TaskOrigin::Markdown {
                file_path: path.to_string(),
                line,
            },
            completed: true,
            status: 'x',
            original_markdown: original.map(|s| s.to_string()),
            on_completion: Some("delete".to_string()),
        }
    }

    fn run(vault: &MemVault, task: &Task) -> ExecutionResult {
        let canvas = JsonCanvasUpdater::new(vault);
        let settings = Settings::default();
        let ctx = ExecutionContext {
            task,
            vault,
            canvas: &canvas,
            settings: &settings,
            today: NaiveDate::from_ymd_opt(2025, 7, 7).unwrap(),
        };
        execute_delete(&ctx)
    }

    #[test]
    fn test_delete_by_original_markdown_beats_stale_index() {
        let vault = MemVault::new().with_file("a.md", "intro\n- [x] Target 🏁 delete\nend");
        // Index points at the wrong line; the literal text still wins.
        let task = markdown_task("a.md", 0, Some("- [x] Target 🏁 delete"));

        let result = run(&vault, &task);

        assert!(result.success, "{result:?}");
        assert_eq!(vault.content("a.md").as_deref(), Some("intro\nend"));
    }

    #[test]
    fn test_delete_by_index_when_text_unknown() {
        let vault = MemVault::new().with_file("a.md", "one\ntwo\nthree");
        let task = markdown_task("a.md", 1, None);

        let result = run(&vault, &task);

        assert!(result.success, "{result:?}");
        assert_eq!(vault.content("a.md").as_deref(), Some("one\nthree"));
    }

    #[test]
    fn test_delete_collapses_blank_runs() {
        let vault = MemVault::new().with_file("a.md", "one\n\n- [x] gone\n\ntwo");
        let task = markdown_task("a.md", 2, Some("- [x] gone"));

        let result = run(&vault, &task);

        assert!(result.success, "{result:?}");
        assert_eq!(vault.content("a.md").as_deref(), Some("one\n\ntwo"));
    }

    #[test]
    fn test_delete_missing_file() {
        let vault = MemVault::new();
        let result = run(&vault, &markdown_task("ghost.md", 0, None));
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("File not found: ghost.md"));
    }

    #[test]
    fn test_delete_task_not_found() {
        let vault = MemVault::new().with_file("a.md", "one\ntwo");
        // Text not present, index out of range.
        let task = markdown_task("a.md", 9, Some("- [x] never there"));
        let result = run(&vault, &task);
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Task not found in file"));
    }

    #[test]
    fn test_delete_canvas_origin_goes_through_updater() {
        let canvas_json = serde_json::json!({
            "nodes": [
                {"id": "n1", "type": "text", "text": "- [x] Gone\nrest",
                 "x": 0, "y": 0, "width": 250, "height": 60}
            ],
            "edges": [],
        })
        .to_string();
        let vault = MemVault::new().with_file("board.canvas", &canvas_json);
        let task = Task {
            id: "c-1".to_string(),
            content: "Gone".to_string(),
            origin: TaskOrigin::Canvas {
                file_path: "board.canvas".to_string(),
                node_id: "n1".to_string(),
            },
            completed: true,
            status: 'x',
            original_markdown: Some("- [x] Gone".to_string()),
            on_completion: Some("delete".to_string()),
        };

        let result = run(&vault, &task);

        assert!(result.success, "{result:?}");
        assert_eq!(
            result.message.as_deref(),
            Some("Task deleted from Canvas file board.canvas")
        );
        assert!(!vault.content("board.canvas").unwrap().contains("Gone"));
    }
}
