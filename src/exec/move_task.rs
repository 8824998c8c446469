use crate::exec::{ExecutionContext, ExecutionResult};
use crate::model::task::TaskOrigin;
use crate::parse::normalize::strip_on_completion;
use crate::parse::section::insert_under_section;
use crate::vault::store::{FileHandle, Vault, VaultError};

/// Relocate the completed task to another document. Unlike archiving, a move
/// adds no completion marker and leaves the checkbox state alone; only the
/// on-completion directive is stripped.
pub fn execute_move(
    ctx: &ExecutionContext,
    target_file: &str,
    target_section: Option<&str>,
) -> ExecutionResult {
    match &ctx.task.origin {
        TaskOrigin::Markdown { file_path, line } => {
            match move_markdown(ctx, file_path, *line, target_file, target_section) {
                Ok(result) => result,
                Err(e) => ExecutionResult::failure(format!("Failed to move task: {e}")),
            }
        }
        TaskOrigin::Canvas { .. } if target_file.ends_with(".canvas") => {
            move_canvas_to_canvas(ctx, target_file, target_section)
        }
        TaskOrigin::Canvas { .. } => {
            match move_canvas_to_markdown(ctx, target_file, target_section) {
                Ok(result) => result,
                Err(e) => {
                    ExecutionResult::failure(format!("Failed to move Canvas task to Markdown: {e}"))
                }
            }
        }
    }
}

fn section_suffix(target_section: Option<&str>) -> String {
    match target_section {
        Some(section) => format!(" (section: {section})"),
        None => String::new(),
    }
}

/// Find the move target, creating it empty when absent. Move targets get no
/// skeleton and no parent folders; a missing folder is a creation failure.
fn resolve_target(vault: &dyn Vault, path: &str) -> Result<FileHandle, ()> {
    if let Some(file) = vault.find_file(path) {
        return Ok(file);
    }
    vault.create(path, "").map_err(|_| ())
}

fn move_markdown(
    ctx: &ExecutionContext,
    source_path: &str,
    source_line: usize,
    target_path: &str,
    target_section: Option<&str>,
) -> Result<ExecutionResult, VaultError> {
    let Some(source_file) = ctx.vault.find_file(source_path) else {
        return Ok(ExecutionResult::failure(format!(
            "Source file not found: {source_path}"
        )));
    };
    let Ok(target_file) = resolve_target(ctx.vault, target_path) else {
        return Ok(ExecutionResult::failure(format!(
            "Failed to create target file: {target_path}"
        )));
    };

    let source_content = ctx.vault.read(&source_file)?;
    let target_content = ctx.vault.read(&target_file)?;
    let mut source_lines: Vec<String> = source_content.split('\n').map(|l| l.to_string()).collect();
    let mut target_lines: Vec<String> = target_content.split('\n').map(|l| l.to_string()).collect();

    if source_line >= source_lines.len() {
        return Ok(ExecutionResult::failure(
            "Task line not found in source file",
        ));
    }

    let task_line = strip_on_completion(&source_lines[source_line]);
    source_lines.remove(source_line);

    match target_section {
        Some(section) => insert_under_section(&mut target_lines, section, task_line),
        None => target_lines.push(task_line),
    }

    ctx.vault.write(&source_file, &source_lines.join("\n"))?;
    ctx.vault.write(&target_file, &target_lines.join("\n"))?;

    Ok(ExecutionResult::success(format!(
        "Task moved to {target_path}{} successfully",
        section_suffix(target_section)
    )))
}

fn move_canvas_to_canvas(
    ctx: &ExecutionContext,
    target_path: &str,
    target_section: Option<&str>,
) -> ExecutionResult {
    let line = strip_on_completion(&ctx.task.source_line());

    // Canvas-to-canvas relocation removes the node line first, then drops the
    // cleaned line into the target canvas.
    if let Err(e) = ctx.canvas.delete_canvas_task(ctx.task) {
        return ExecutionResult::failure(format!("Error moving Canvas task: {e}"));
    }
    if let Err(e) = ctx.canvas.add_task_line(target_path, &line, target_section) {
        return ExecutionResult::failure(format!("Error moving Canvas task: {e}"));
    }

    ExecutionResult::success(format!(
        "Task moved to Canvas file {target_path}{} successfully",
        section_suffix(target_section)
    ))
}

fn move_canvas_to_markdown(
    ctx: &ExecutionContext,
    target_path: &str,
    target_section: Option<&str>,
) -> Result<ExecutionResult, VaultError> {
    let line = strip_on_completion(&ctx.task.source_line());

    // Land in the markdown target first; the canvas node is only deleted
    // after the write sticks.
    let Ok(target_file) = resolve_target(ctx.vault, target_path) else {
        return Ok(ExecutionResult::failure(format!(
            "Failed to create target file: {target_path}"
        )));
    };

    let target_content = ctx.vault.read(&target_file)?;
    let mut target_lines: Vec<String> = target_content.split('\n').map(|l| l.to_string()).collect();

    // Looser placement than the markdown path: directly after the first line
    // mentioning the section, or at end of file.
    let mut insert_at = target_lines.len();
    if let Some(section) = target_section {
        let section_lower = section.to_lowercase();
        if let Some(idx) = target_lines
            .iter()
            .position(|l| l.trim().to_lowercase().contains(&section_lower))
        {
            insert_at = idx + 1;
        }
    }
    target_lines.insert(insert_at, line);
    ctx.vault.write(&target_file, &target_lines.join("\n"))?;

    if let Err(e) = ctx.canvas.delete_canvas_task(ctx.task) {
        return Ok(ExecutionResult::failure(format!(
            "Task moved successfully to {target_path}{}, but failed to remove from Canvas: {e}",
            section_suffix(target_section)
        )));
    }

    Ok(ExecutionResult::success(format!(
        "Task moved from Canvas to {target_path}{} successfully",
        section_suffix(target_section)
    )))
}
