use std::error::Error;
use std::path::Path;

use chrono::Local;

use crate::cli::commands::{Cli, Commands, DescribeArgs, DoneArgs, RunArgs};
use crate::exec::{self, ExecutionContext, ExecutionResult};
use crate::model::settings::Settings;
use crate::model::task::{Task, TaskOrigin};
use crate::parse::{extract_directive, force_completed, parse_directive};
use crate::vault::{FsVault, JsonCanvasUpdater, Vault};

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn Error>> {
    let json = cli.json;
    let root = match cli.vault {
        Some(ref dir) => std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve vault path '{dir}': {e}"))?,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Done(args) => cmd_done(&root, args, json),
        Commands::Run(args) => cmd_run(&root, args, json),
        Commands::Describe(args) => cmd_describe(args),
    }
}

// ---------------------------------------------------------------------------
// done / run
// ---------------------------------------------------------------------------

/// Shared lookup: read the file, bounds-check the 1-based line argument, and
/// return the 0-based index plus the line's current text.
fn locate_task_line(
    vault: &FsVault,
    file: &str,
    line: usize,
) -> Result<(usize, String), Box<dyn Error>> {
    if file.ends_with(".canvas") {
        return Err("canvas tasks are driven by the host application; onw operates on markdown files".into());
    }
    let index = line
        .checked_sub(1)
        .ok_or("line numbers start at 1")?;
    let handle = vault
        .find_file(file)
        .ok_or_else(|| format!("file not found: {file}"))?;
    let content = vault.read(&handle)?;
    let lines: Vec<&str> = content.split('\n').collect();
    let text = lines
        .get(index)
        .ok_or_else(|| format!("{file} has no line {line}"))?;
    Ok((index, text.to_string()))
}

fn build_task(file: &str, index: usize, line_text: &str) -> Task {
    Task {
        id: format!("{file}:{}", index + 1),
        content: line_text.trim().to_string(),
        origin: TaskOrigin::Markdown {
            file_path: file.to_string(),
            line: index,
        },
        completed: true,
        status: 'x',
        original_markdown: Some(line_text.to_string()),
        on_completion: extract_directive(line_text),
    }
}

fn run_action(
    root: &Path,
    vault: &FsVault,
    task: &Task,
    raw_directive: &str,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let action = parse_directive(raw_directive)?;
    let settings = Settings::load(root)?;
    let canvas = JsonCanvasUpdater::new(vault);
    let ctx = ExecutionContext {
        task,
        vault,
        canvas: &canvas,
        settings: &settings,
        today: Local::now().date_naive(),
    };

    let result = exec::execute(&ctx, &action);
    report(&result, json)
}

fn report(result: &ExecutionResult, json: bool) -> Result<(), Box<dyn Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }
    match (&result.message, &result.error) {
        (Some(message), _) => {
            println!("{message}");
            Ok(())
        }
        (None, Some(error)) => Err(error.clone().into()),
        (None, None) => Ok(()),
    }
}

fn cmd_done(root: &Path, args: DoneArgs, json: bool) -> Result<(), Box<dyn Error>> {
    let vault = FsVault::new(root);
    let (index, text) = locate_task_line(&vault, &args.file, args.line)?;

    // Persist the completed checkbox before the directive runs, the same
    // order the host applies: complete first, act second.
    let completed_line = force_completed(&text);
    if completed_line != text {
        let handle = vault
            .find_file(&args.file)
            .ok_or_else(|| format!("file not found: {}", args.file))?;
        let content = vault.read(&handle)?;
        let mut lines: Vec<String> = content.split('\n').map(|l| l.to_string()).collect();
        lines[index] = completed_line.clone();
        vault.write(&handle, &lines.join("\n"))?;
    }

    let task = build_task(&args.file, index, &completed_line);
    match task.on_completion.clone() {
        Some(raw) => run_action(root, &vault, &task, &raw, json),
        None => {
            let result = ExecutionResult::success("Task marked done (no on-completion directive)");
            report(&result, json)
        }
    }
}

fn cmd_run(root: &Path, args: RunArgs, json: bool) -> Result<(), Box<dyn Error>> {
    let vault = FsVault::new(root);
    let (index, text) = locate_task_line(&vault, &args.file, args.line)?;

    let task = build_task(&args.file, index, &text);
    let raw = task
        .on_completion
        .clone()
        .ok_or_else(|| format!("no on-completion directive on {}:{}", args.file, args.line))?;
    run_action(root, &vault, &task, &raw, json)
}

// ---------------------------------------------------------------------------
// describe
// ---------------------------------------------------------------------------

fn cmd_describe(args: DescribeArgs) -> Result<(), Box<dyn Error>> {
    let action = parse_directive(&args.directive)?;
    println!("{}", exec::describe(&action));
    Ok(())
}
