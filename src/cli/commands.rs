use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "onw", about = concat!("[x] onward v", env!("CARGO_PKG_VERSION"), " - finish a task, file it away"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different vault directory
    #[arg(short = 'C', long = "vault", global = true)]
    pub vault: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Mark a task done and run its on-completion directive
    Done(DoneArgs),
    /// Run a task's on-completion directive without touching the checkbox
    Run(RunArgs),
    /// Explain what a directive value would do
    Describe(DescribeArgs),
}

// ---------------------------------------------------------------------------
// Done / Run args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct DoneArgs {
    /// Vault-relative path of the markdown file holding the task
    pub file: String,
    /// Line number of the task (1-based, as shown in editors)
    pub line: usize,
}

#[derive(Args)]
pub struct RunArgs {
    /// Vault-relative path of the markdown file holding the task
    pub file: String,
    /// Line number of the task (1-based, as shown in editors)
    pub line: usize,
}

// ---------------------------------------------------------------------------
// Describe args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct DescribeArgs {
    /// A directive value, e.g. `archive:Done.md` or `{"type": "move", ...}`
    pub directive: String,
}
