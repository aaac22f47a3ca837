use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "strack")]
#[command(about = "A study-tracking companion for the command line")]
#[command(long_about = "strack - a study-tracking companion

Capture study tasks, run session timers, review your progress, and keep
everything synced to your account. Work made while offline is buffered
locally and uploaded the next time you sync.

QUICK START:
  strack add \"read chapter 4 #math\"   Capture a task
  strack session start                 Start a pomodoro
  strack session stop                  Finish it and record the time
  strack report                        See this week's study time
  strack sync run                      Upload anything made offline

OUTPUT FORMATS:
  --output pretty    Human-readable colored output (default)
  --output json      Machine-readable JSON for scripting

For more information on a specific command, run:
  strack <command> --help")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    ///
    /// Use 'pretty' for human-readable colored output (default),
    /// or 'json' for machine-readable output suitable for scripting.
    #[arg(short, long, value_enum, default_value = "pretty", global = true)]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Capture a study task
    ///
    /// The first #tag in the text becomes the task's category:
    ///
    ///   strack add "read chapter 4 #math"
    ///   strack add "flashcards" --category biology
    ///
    /// When you're signed in and online the task is uploaded right away;
    /// otherwise it is buffered and uploaded on the next sync.
    #[command(alias = "a")]
    Add(AddArgs),

    /// List captured tasks
    ///
    /// Shows open tasks by default; use --all to include finished ones.
    #[command(alias = "ls")]
    List(ListArgs),

    /// Mark a task as done
    Done {
        /// Task ID (shown by 'strack list')
        id: i64,
    },

    /// Start, stop, and log study sessions
    #[command(alias = "s")]
    Session(SessionArgs),

    /// Inspect and run offline sync
    Sync(SyncArgs),

    /// Show a study report
    ///
    /// Aggregates finished sessions over a period:
    ///
    ///   strack report                 This week
    ///   strack report --period today
    ///   strack report --period all
    Report(ReportArgs),

    /// Export a study report to JSON or Markdown
    Export(ExportArgs),

    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Arguments for the add command.
#[derive(Args)]
pub struct AddArgs {
    /// Task text (may include a #category tag)
    #[arg(trailing_var_arg = true, required = true)]
    pub text: Vec<String>,

    /// Category override (beats any #tag in the text)
    #[arg(short, long)]
    pub category: Option<String>,
}

/// Arguments for the list command.
#[derive(Args)]
pub struct ListArgs {
    /// Include finished tasks
    #[arg(long)]
    pub all: bool,

    /// Only show tasks in this category
    #[arg(short, long)]
    pub category: Option<String>,
}

/// Arguments for the session command.
#[derive(Args)]
pub struct SessionArgs {
    #[command(subcommand)]
    pub command: SessionCommands,
}

#[derive(Subcommand)]
pub enum SessionCommands {
    /// Start a study session timer
    Start {
        /// Session type: pomodoro, focus, review, open
        #[arg(short = 't', long = "type", default_value = "pomodoro")]
        session_type: String,

        /// What you're studying
        #[arg(long)]
        task: Option<String>,
    },

    /// Finish the running session and record the time
    Stop,

    /// Show the running session, if any
    Status,

    /// Record a finished session directly
    Log {
        /// Session length in minutes
        minutes: i64,

        /// Session type: pomodoro, focus, review, open
        #[arg(short = 't', long = "type", default_value = "pomodoro")]
        session_type: String,

        /// What you studied
        #[arg(long)]
        task: Option<String>,
    },

    /// List recent sessions
    List {
        /// Number of sessions to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },
}

/// Arguments for the sync command.
#[derive(Args)]
pub struct SyncArgs {
    #[command(subcommand)]
    pub command: SyncCommands,
}

#[derive(Subcommand)]
pub enum SyncCommands {
    /// Show what's waiting to be uploaded
    Status,

    /// Upload buffered offline changes now
    Run,
}

/// Arguments for the report command.
#[derive(Args)]
pub struct ReportArgs {
    /// Report period: today, week, month, all
    #[arg(short, long, default_value = "week")]
    pub period: String,
}

/// Export output format.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    /// Pretty-printed JSON.
    Json,
    /// Markdown document.
    Markdown,
}

/// Arguments for the export command.
#[derive(Args)]
pub struct ExportArgs {
    /// Export format
    #[arg(short, long, value_enum, default_value_t = ExportFormat::Json)]
    pub format: ExportFormat,

    /// Report period: today, week, month, all
    #[arg(short, long, default_value = "week")]
    pub period: String,

    /// Optional destination path (stdout when omitted)
    #[arg(short, long, value_name = "PATH")]
    pub dest: Option<PathBuf>,
}
