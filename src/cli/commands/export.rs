//! Export command implementation.

use super::common::open_database;
use crate::cli::args::{ExportArgs, ExportFormat, OutputFormat};
use crate::config::Config;
use crate::error::StrackError;
use crate::features::study::{ReportPeriod, SessionStorage, StudyReport};
use crate::output::to_json;

/// Export a study report to JSON or Markdown.
pub fn export(args: &ExportArgs, format: OutputFormat) -> Result<String, StrackError> {
    let config = Config::load()?;
    let db = open_database()?;
    let storage = SessionStorage::new(&db);

    let period = ReportPeriod::parse(&args.period);
    let report = StudyReport::build(&storage, period, config.study.daily_goal_minutes)?;

    let rendered = match args.format {
        ExportFormat::Json => to_json(&report)?,
        ExportFormat::Markdown => report.to_markdown(),
    };

    match &args.dest {
        Some(path) => {
            std::fs::write(path, &rendered)?;
            match format {
                OutputFormat::Json => to_json(&serde_json::json!({
                    "written": path.display().to_string(),
                })),
                OutputFormat::Pretty => Ok(format!("Exported report to {}", path.display())),
            }
        }
        None => Ok(rendered),
    }
}
