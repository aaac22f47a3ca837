//! Sync commands: status and run.

use colored::Colorize;
use tracing::warn;

use super::common::{open_database, PROBE_TIMEOUT};
use crate::backend::BackendClient;
use crate::cli::args::{OutputFormat, SyncCommands};
use crate::config::Config;
use crate::error::StrackError;
use crate::features::sync::{
    AccountId, BatchStore, CategoryOutcome, Connectivity, ConsoleNotifier, NetProbe, PendingBatch,
    SqliteBatchStore, SyncManager, SyncReport,
};
use crate::output::to_json;
use crate::storage::Database;

/// Execute sync subcommands.
pub fn sync(cmd: SyncCommands, format: OutputFormat) -> Result<String, StrackError> {
    let config = Config::load()?;
    let db = open_database()?;

    match cmd {
        SyncCommands::Status => show_status(&config, &db, format),
        SyncCommands::Run => run_sync(&config, &db, format),
    }
}

/// Show what's waiting to be uploaded.
fn show_status(config: &Config, db: &Database, format: OutputFormat) -> Result<String, StrackError> {
    let store = SqliteBatchStore::new(db);
    let batch = match store.load() {
        Ok(batch) => batch,
        Err(e) => {
            warn!("pending batch unreadable: {e}");
            PendingBatch::default()
        }
    };

    let account = config.sync_identity();
    let online = account.is_some()
        && NetProbe::for_backend_url(&config.sync.backend_url, PROBE_TIMEOUT).is_online();

    match format {
        OutputFormat::Json => {
            let data = serde_json::json!({
                "account": account,
                "online": online,
                "pending_tasks": batch.todos.len(),
                "pending_sessions": batch.study_sessions.len(),
            });
            to_json(&data)
        }
        OutputFormat::Pretty => {
            let mut lines = Vec::new();

            lines.push("Sync Status".bold().to_string());
            lines.push("─".repeat(40));

            match &account {
                Some(account) => {
                    lines.push(format!("  Account:  {account}"));
                    lines.push(format!(
                        "  Backend:  {}",
                        if online {
                            "reachable".green()
                        } else {
                            "unreachable".yellow()
                        }
                    ));
                }
                None => lines.push(format!("  Account:  {}", "signed out".dimmed())),
            }

            lines.push(format!("  Pending:  {} tasks", batch.todos.len()));
            lines.push(format!(
                "            {} sessions",
                batch.study_sessions.len()
            ));

            if !batch.is_empty() && account.is_some() {
                lines.push(String::new());
                lines.push(
                    "Run 'strack sync run' to upload pending changes"
                        .dimmed()
                        .to_string(),
                );
            }

            Ok(lines.join("\n"))
        }
    }
}

/// Upload buffered changes now.
fn run_sync(config: &Config, db: &Database, format: OutputFormat) -> Result<String, StrackError> {
    let Some(account) = config.sync_identity() else {
        return match format {
            OutputFormat::Json => to_json(&serde_json::json!({ "skipped": "signed_out" })),
            OutputFormat::Pretty => Ok(format!(
                "Sync is off. Enable it and sign in via {}.",
                "~/.strack/config.yaml".bold()
            )),
        };
    };

    let store = SqliteBatchStore::new(db);
    let client = BackendClient::from_config(&config.sync)?;
    let probe = NetProbe::for_backend_url(&config.sync.backend_url, PROBE_TIMEOUT);
    let notifier = ConsoleNotifier;

    let manager = SyncManager::new(&store, &client, &probe, &notifier);

    manager.attach(Some(AccountId(account))).map_or_else(
        || match format {
            OutputFormat::Json => to_json(&serde_json::json!({ "skipped": "offline" })),
            OutputFormat::Pretty => {
                Ok("Backend is unreachable. Changes stay buffered until the next sync.".to_string())
            }
        },
        |report| format_run_report(&report, format),
    )
}

fn format_run_report(report: &SyncReport, format: OutputFormat) -> Result<String, StrackError> {
    match format {
        OutputFormat::Json => {
            let data = serde_json::json!({
                "tasks": outcome_json(&report.todos),
                "sessions": outcome_json(&report.study_sessions),
                "synced": report.synced_entries(),
                "failed": report.any_failed(),
            });
            to_json(&data)
        }
        OutputFormat::Pretty => {
            if report.any_failed() {
                Ok(format!(
                    "{} Sync failed part-way; un-synced changes stay buffered.",
                    "✗".red()
                ))
            } else if report.synced_entries() == 0 {
                Ok("Nothing pending to upload.".to_string())
            } else {
                Ok(format!(
                    "{} Uploaded {} pending changes.",
                    "✓".green(),
                    report.synced_entries()
                ))
            }
        }
    }
}

fn outcome_json(outcome: &CategoryOutcome) -> serde_json::Value {
    match outcome {
        CategoryOutcome::Empty => serde_json::json!({ "status": "empty" }),
        CategoryOutcome::Drained(count) => {
            serde_json::json!({ "status": "drained", "count": count })
        }
        CategoryOutcome::Failed { submitted, pending } => serde_json::json!({
            "status": "failed",
            "submitted": submitted,
            "pending": pending,
        }),
    }
}
