//! List command for daily-todo.
//!
//! Shows a day's tasks with their index and status. Never writes.

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::Config;
use crate::document::{parse_tasks, Task};
use crate::error::Result;
use crate::storage::DayStore;

/// Options for the list command.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the list command.
#[derive(Debug, Clone, Serialize)]
pub struct ListOutput {
    /// Whether the list was successful.
    pub success: bool,
    /// The listed day.
    pub date: String,
    /// Number of tasks.
    pub count: usize,
    /// The tasks in document order.
    pub tasks: Vec<Task>,
    /// Error message if listing failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ListOutput {
    /// Create a successful output.
    pub fn success(date: NaiveDate, tasks: Vec<Task>) -> Self {
        Self {
            success: true,
            date: date.format("%Y-%m-%d").to_string(),
            count: tasks.len(),
            tasks,
            error: None,
        }
    }

    /// Create a failed output.
    pub fn failure(date: NaiveDate, error: impl Into<String>) -> Self {
        Self {
            success: false,
            date: date.format("%Y-%m-%d").to_string(),
            count: 0,
            tasks: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// The list command implementation.
pub struct ListCommand<S: DayStore> {
    store: S,
    config: Config,
}

impl<S: DayStore> ListCommand<S> {
    /// Create a new list command.
    pub fn new(store: S, config: Config) -> Self {
        Self { store, config }
    }

    /// Run the list command for `date`.
    pub fn run(&self, date: NaiveDate, _options: &ListOptions) -> ListOutput {
        match self.execute(date) {
            Ok(output) => output,
            Err(err) => ListOutput::failure(date, err.to_string()),
        }
    }

    /// Parse the tasks of `date`.
    pub fn execute(&self, date: NaiveDate) -> Result<ListOutput> {
        let content = self.store.read(date)?;
        let tasks = parse_tasks(&content, &self.config.sections);
        Ok(ListOutput::success(date, tasks))
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &ListOutput, options: &ListOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output)
        }
    }

    /// Format output as human-readable text.
    fn format_human_readable(&self, output: &ListOutput) -> String {
        if !output.success {
            return format!(
                "List failed: {}\n",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        if output.tasks.is_empty() {
            return format!("{}: no tasks, or no file for this day.\n", output.date);
        }

        let mut result = String::new();
        for task in &output.tasks {
            result.push_str(&task.list_line());
            result.push('\n');
        }
        result
    }
}
