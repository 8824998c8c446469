use crate::exec::{ExecutionContext, ExecutionResult};
use crate::model::task::TaskOrigin;
use crate::parse::marker::completion_marker;
use crate::parse::normalize::{force_completed, strip_on_completion};
use crate::parse::section::insert_under_section;
use crate::vault::store::{FileHandle, Vault, VaultError};

/// Archive file used when neither the directive nor the settings name one.
pub const DEFAULT_ARCHIVE_FILE: &str = "Archive/Completed Tasks.md";
/// Section receiving archived tasks when the directive names none.
pub const DEFAULT_ARCHIVE_SECTION: &str = "Completed Tasks";

/// Internal archive failure kinds; rendered into result strings at the entry
/// points so callers only ever see an `ExecutionResult`.
#[derive(Debug, thiserror::Error)]
enum ArchiveError {
    #[error("Failed to create archive file: {0}")]
    CreateFailed(String),
    #[error(transparent)]
    Vault(#[from] VaultError),
}

/// Seed content for a freshly created archive document.
fn archive_skeleton(section: &str) -> String {
    format!("# Archive\n\n## {section}\n\n")
}

/// Return the archive document at `path`, creating it (and a missing parent
/// folder) with skeleton content when absent. Folder- and file-creation
/// failures collapse into one creation error; the caller only learns that the
/// archive could not be brought into existence.
fn resolve_or_create(
    vault: &dyn Vault,
    path: &str,
    section: &str,
) -> Result<FileHandle, ArchiveError> {
    if let Some(file) = vault.find_file(path) {
        return Ok(file);
    }

    let created = (|| -> Result<FileHandle, VaultError> {
        if let Some(idx) = path.rfind('/') {
            let folder = &path[..idx];
            if !folder.is_empty() && !vault.exists(folder) {
                vault.create_folder(folder)?;
            }
        }
        vault.create(path, &archive_skeleton(section))
    })();

    created.map_err(|_| ArchiveError::CreateFailed(path.to_string()))
}

/// Archive the context's task, routing on its origin.
pub fn execute_archive(
    ctx: &ExecutionContext,
    archive_file: Option<&str>,
    archive_section: Option<&str>,
) -> ExecutionResult {
    match &ctx.task.origin {
        TaskOrigin::Canvas { .. } => archive_canvas(ctx, archive_file, archive_section),
        TaskOrigin::Markdown { file_path, line } => {
            archive_markdown(ctx, file_path, *line, archive_file, archive_section)
        }
    }
}

// ---------------------------------------------------------------------------
// Canvas origin
// ---------------------------------------------------------------------------

fn archive_canvas(
    ctx: &ExecutionContext,
    archive_file: Option<&str>,
    archive_section: Option<&str>,
) -> ExecutionResult {
    let archive_file = archive_file.unwrap_or(DEFAULT_ARCHIVE_FILE);
    let section = archive_section.unwrap_or(DEFAULT_ARCHIVE_SECTION);

    match archive_canvas_inner(ctx, archive_file, section) {
        Ok(result) => result,
        Err(e) => ExecutionResult::failure(format!("Error archiving Canvas task: {e}")),
    }
}

fn archive_canvas_inner(
    ctx: &ExecutionContext,
    archive_file: &str,
    section: &str,
) -> Result<ExecutionResult, ArchiveError> {
    let line = force_completed(&strip_on_completion(&ctx.task.source_line()));

    // Archive before touching the source: a failure from here on leaves the
    // canvas untouched.
    let file = match resolve_or_create(ctx.vault, archive_file, section) {
        Ok(file) => file,
        Err(e) => return Ok(ExecutionResult::failure(e.to_string())),
    };

    let content = ctx.vault.read(&file)?;
    let marker = completion_marker(ctx.settings.metadata_format, ctx.today);
    let archived_line = format!("{line} {marker}");

    let mut lines: Vec<String> = content.split('\n').map(|l| l.to_string()).collect();
    insert_under_section(&mut lines, section, archived_line);
    ctx.vault.write(&file, &lines.join("\n"))?;

    // The node is only deleted once the archive write has landed. A deletion
    // failure is reported as such: the task is safe in the archive, just not
    // removed from its source.
    if let Err(e) = ctx.canvas.delete_canvas_task(ctx.task) {
        return Ok(ExecutionResult::failure(format!(
            "Task archived successfully to {archive_file}, but failed to remove from Canvas: {e}"
        )));
    }

    Ok(ExecutionResult::success(format!(
        "Task archived from Canvas to {archive_file}"
    )))
}

// ---------------------------------------------------------------------------
// Markdown origin
// ---------------------------------------------------------------------------

fn archive_markdown(
    ctx: &ExecutionContext,
    source_path: &str,
    source_line: usize,
    archive_file: Option<&str>,
    archive_section: Option<&str>,
) -> ExecutionResult {
    // Directive override, then the vault-wide default, then the built-in.
    let archive_path = archive_file
        .map(str::to_string)
        .or_else(|| ctx.settings.on_completion.default_archive_file.clone())
        .unwrap_or_else(|| DEFAULT_ARCHIVE_FILE.to_string());
    let section = archive_section.unwrap_or(DEFAULT_ARCHIVE_SECTION);

    match archive_markdown_inner(ctx, source_path, source_line, &archive_path, section) {
        Ok(result) => result,
        Err(e) => ExecutionResult::failure(format!("Failed to archive task: {e}")),
    }
}

fn archive_markdown_inner(
    ctx: &ExecutionContext,
    source_path: &str,
    source_line: usize,
    archive_path: &str,
    section: &str,
) -> Result<ExecutionResult, ArchiveError> {
    let Some(source_file) = ctx.vault.find_file(source_path) else {
        return Ok(ExecutionResult::failure(format!(
            "Source file not found: {source_path}"
        )));
    };

    let archive_file = match resolve_or_create(ctx.vault, archive_path, section) {
        Ok(file) => file,
        Err(e) => return Ok(ExecutionResult::failure(e.to_string())),
    };

    let source_content = ctx.vault.read(&source_file)?;
    let archive_content = ctx.vault.read(&archive_file)?;
    let mut source_lines: Vec<String> = source_content.split('\n').map(|l| l.to_string()).collect();
    let mut archive_lines: Vec<String> =
        archive_content.split('\n').map(|l| l.to_string()).collect();

    if source_line >= source_lines.len() {
        return Ok(ExecutionResult::failure(
            "Task line not found in source file",
        ));
    }

    let task_line = force_completed(&strip_on_completion(&source_lines[source_line]));
    let marker = completion_marker(ctx.settings.metadata_format, ctx.today);
    let archived_line = format!("{task_line} {marker} (from {source_path})");

    source_lines.remove(source_line);
    insert_under_section(&mut archive_lines, section, archived_line);

    // Best-effort sequential commit: source first, then archive. There is no
    // rollback if the archive write fails after the source write succeeded.
    ctx.vault.write(&source_file, &source_lines.join("\n"))?;
    ctx.vault.write(&archive_file, &archive_lines.join("\n"))?;

    Ok(ExecutionResult::success(format!(
        "Task archived to {archive_path} (section: {section})"
    )))
}
