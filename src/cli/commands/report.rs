//! Report command implementation.

use super::common::open_database;
use crate::cli::args::{OutputFormat, ReportArgs};
use crate::config::Config;
use crate::error::StrackError;
use crate::features::study::{ReportPeriod, SessionStorage, StudyReport};
use crate::output::format_report;

/// Show a study report for a period.
pub fn report(args: &ReportArgs, format: OutputFormat) -> Result<String, StrackError> {
    let config = Config::load()?;
    let db = open_database()?;
    let storage = SessionStorage::new(&db);

    let period = ReportPeriod::parse(&args.period);
    let report = StudyReport::build(&storage, period, config.study.daily_goal_minutes)?;

    format_report(&report, format)
}
