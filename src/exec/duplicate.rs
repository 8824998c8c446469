use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::exec::{ExecutionContext, ExecutionResult};
use crate::model::task::TaskOrigin;
use crate::parse::section::insert_after_heading;
use crate::vault::store::{FileHandle, Vault, VaultError};

fn checkbox_state_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\s*[-*+]\s*\[)[xX\-](\])").unwrap())
}

fn completion_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"✅\s*\d{4}-\d{2}-\d{2}").unwrap())
}

fn scheduled_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"⏰\s*\d{4}-\d{2}-\d{2}").unwrap())
}

/// Build the duplicate of a task line: checkbox reset to open, completion
/// and scheduled dates dropped unless metadata is preserved, and a
/// `(duplicated <date>)` note appended.
fn duplicate_line(original: &str, preserve_metadata: bool, today: NaiveDate) -> String {
    let mut line = checkbox_state_re()
        .replace(original, "${1} ${2}")
        .into_owned();
    if !preserve_metadata {
        line = completion_date_re().replace_all(&line, "").into_owned();
        line = scheduled_date_re().replace_all(&line, "").into_owned();
        line = line.trim().to_string();
    }
    format!("{line} (duplicated {})", today.format("%Y-%m-%d"))
}

/// Copy the completed task, into another document or next to itself.
pub fn execute_duplicate(
    ctx: &ExecutionContext,
    target_file: Option<&str>,
    target_section: Option<&str>,
    preserve_metadata: bool,
) -> ExecutionResult {
    match &ctx.task.origin {
        TaskOrigin::Markdown { file_path, line } => {
            match duplicate_markdown(
                ctx,
                file_path,
                *line,
                target_file,
                target_section,
                preserve_metadata,
            ) {
                Ok(result) => result,
                Err(e) => ExecutionResult::failure(format!("Failed to duplicate task: {e}")),
            }
        }
        TaskOrigin::Canvas { file_path, .. } => {
            let target = target_file.unwrap_or(file_path).to_string();
            match duplicate_from_canvas(ctx, &target, target_section, preserve_metadata) {
                Ok(result) => result,
                Err(e) => ExecutionResult::failure(format!("Error duplicating Canvas task: {e}")),
            }
        }
    }
}

fn location_text(target_file: Option<&str>, target_section: Option<&str>) -> String {
    let mut text = match target_file {
        Some(file) => format!("to {file}"),
        None => "in same file".to_string(),
    };
    if let Some(section) = target_section {
        text.push_str(&format!(" (section: {section})"));
    }
    text
}

fn duplicate_markdown(
    ctx: &ExecutionContext,
    source_path: &str,
    source_line: usize,
    target_file: Option<&str>,
    target_section: Option<&str>,
    preserve_metadata: bool,
) -> Result<ExecutionResult, VaultError> {
    let Some(source) = ctx.vault.find_file(source_path) else {
        return Ok(ExecutionResult::failure(format!(
            "Source file not found: {source_path}"
        )));
    };

    let source_content = ctx.vault.read(&source)?;
    let mut source_lines: Vec<String> = source_content.split('\n').map(|l| l.to_string()).collect();

    if source_line >= source_lines.len() {
        return Ok(ExecutionResult::failure(
            "Task line not found in source file",
        ));
    }

    let copy = duplicate_line(&source_lines[source_line], preserve_metadata, ctx.today);

    match target_file {
        Some(target_path) if target_path != source_path => {
            let target = match find_or_create_empty(ctx.vault, target_path) {
                Ok(file) => file,
                Err(()) => {
                    return Ok(ExecutionResult::failure(format!(
                        "Failed to create target file: {target_path}"
                    )));
                }
            };
            let target_content = ctx.vault.read(&target)?;
            let mut target_lines: Vec<String> =
                target_content.split('\n').map(|l| l.to_string()).collect();
            match target_section {
                Some(section) => insert_after_heading(&mut target_lines, section, copy),
                None => target_lines.push(copy),
            }
            ctx.vault.write(&target, &target_lines.join("\n"))?;
        }
        _ => {
            // Same file: the copy lands directly under the original.
            source_lines.insert(source_line + 1, copy);
            ctx.vault.write(&source, &source_lines.join("\n"))?;
        }
    }

    Ok(ExecutionResult::success(format!(
        "Task duplicated {}",
        location_text(
            target_file.filter(|t| *t != source_path),
            target_section
        )
    )))
}

fn find_or_create_empty(vault: &dyn Vault, path: &str) -> Result<FileHandle, ()> {
    if let Some(file) = vault.find_file(path) {
        return Ok(file);
    }
    vault.create(path, "").map_err(|_| ())
}

fn duplicate_from_canvas(
    ctx: &ExecutionContext,
    target_path: &str,
    target_section: Option<&str>,
    preserve_metadata: bool,
) -> Result<ExecutionResult, VaultError> {
    let copy = duplicate_line(&ctx.task.source_line(), preserve_metadata, ctx.today);

    if target_path.ends_with(".canvas") {
        if let Err(e) = ctx.canvas.add_task_line(target_path, &copy, target_section) {
            return Ok(ExecutionResult::failure(format!(
                "Failed to duplicate Canvas task: {e}"
            )));
        }
    } else {
        let target = match find_or_create_empty(ctx.vault, target_path) {
            Ok(file) => file,
            Err(()) => {
                return Ok(ExecutionResult::failure(format!(
                    "Failed to create target file: {target_path}"
                )));
            }
        };
        let target_content = ctx.vault.read(&target)?;
        let mut target_lines: Vec<String> =
            target_content.split('\n').map(|l| l.to_string()).collect();
        match target_section {
            Some(section) => insert_after_heading(&mut target_lines, section, copy),
            None => target_lines.push(copy),
        }
        ctx.vault.write(&target, &target_lines.join("\n"))?;
    }

    let same_file = target_path == ctx.task.origin.file_path();
    Ok(ExecutionResult::success(format!(
        "Task duplicated {}",
        location_text((!same_file).then_some(target_path), target_section)
    )))
}
