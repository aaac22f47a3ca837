//! Task commands: add, list, done.

use colored::Colorize;

use super::common::{deliver, open_database, Mutation};
use crate::cli::args::{AddArgs, ListArgs, OutputFormat};
use crate::config::Config;
use crate::error::StrackError;
use crate::features::sync::PendingTask;
use crate::features::tasks::{parse_capture, Task, TaskStorage};
use crate::output::{format_tasks, to_json};

/// Capture a new task.
pub fn add(args: &AddArgs, format: OutputFormat) -> Result<String, StrackError> {
    let text = args.text.join(" ");
    if text.trim().is_empty() {
        return Err(StrackError::Config("No task text provided".to_string()));
    }

    let config = Config::load()?;
    let parsed = parse_capture(&text);

    if parsed.title.is_empty() {
        return Err(StrackError::Config(
            "Task text is empty after removing tags".to_string(),
        ));
    }

    let category = args
        .category
        .clone()
        .or(parsed.category)
        .unwrap_or_else(|| config.general.default_category.clone());

    let db = open_database()?;
    let mut task = Task::new(parsed.title, category);
    TaskStorage::new(&db).insert(&mut task)?;

    let delivery = deliver(
        &config,
        &db,
        Mutation::Task(PendingTask {
            title: task.title.clone(),
            category: task.category.clone(),
        }),
    )?;

    match format {
        OutputFormat::Json => to_json(&task),
        OutputFormat::Pretty => Ok(format!(
            "Added \"{}\" {}{}",
            task.title.bold(),
            format!("#{}", task.category).cyan(),
            delivery.describe().dimmed()
        )),
    }
}

/// List captured tasks.
pub fn list(args: &ListArgs, format: OutputFormat) -> Result<String, StrackError> {
    let db = open_database()?;
    let tasks = TaskStorage::new(&db).list(args.all, args.category.as_deref())?;

    let title = if args.all { "Tasks" } else { "Open tasks" };
    format_tasks(&tasks, title, format)
}

/// Mark a task as done.
pub fn done(id: i64, format: OutputFormat) -> Result<String, StrackError> {
    let db = open_database()?;
    let storage = TaskStorage::new(&db);

    if !storage.complete(id)? {
        return Err(StrackError::NotFound(format!("Task {id}")));
    }

    match format {
        OutputFormat::Json => {
            let task = storage.get(id)?;
            to_json(&task)
        }
        OutputFormat::Pretty => Ok(format!("{} Task {id} done", "✓".green())),
    }
}
