//! Update command for daily-todo.
//!
//! Turns a natural-language instruction into an edit set through the text
//! generator and applies it to the day's tasks. A response that cannot be
//! decoded applies no edits; the day file is still rewritten.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::Config;
use crate::document::{
    day_title, extract_task_section, parse_tasks, replace_task_section, serialize_tasks,
    single_line, Task, TaskStatus,
};
use crate::error::Result;
use crate::generator::{decode_intent, prompts, IntentDecode, TextGenerator, UpdateIntent};
use crate::storage::DayStore;

/// Options for the update command.
#[derive(Debug, Clone, Default)]
pub struct UpdateOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Counts of the edits that matched an existing task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AppliedEdits {
    pub completed: usize,
    pub abandoned: usize,
    pub edited: usize,
    pub added: usize,
}

impl AppliedEdits {
    /// Total number of changes.
    pub fn total(&self) -> usize {
        self.completed + self.abandoned + self.edited + self.added
    }
}

/// Output format for the update command.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateOutput {
    /// Whether the update was successful.
    pub success: bool,
    /// The updated day.
    pub date: String,
    /// Where the day file was written.
    pub path: String,
    /// Edits applied.
    pub applied: AppliedEdits,
    /// True when the generator's response could not be decoded.
    pub malformed_response: bool,
    /// Tasks after the update.
    pub tasks: Vec<Task>,
    /// Error message if the update failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UpdateOutput {
    /// Create a successful output.
    pub fn success(
        date: NaiveDate,
        path: String,
        applied: AppliedEdits,
        malformed_response: bool,
        tasks: Vec<Task>,
    ) -> Self {
        Self {
            success: true,
            date: date.format("%Y-%m-%d").to_string(),
            path,
            applied,
            malformed_response,
            tasks,
            error: None,
        }
    }

    /// Create a failed output.
    pub fn failure(date: NaiveDate, error: impl Into<String>) -> Self {
        Self {
            success: false,
            date: date.format("%Y-%m-%d").to_string(),
            path: String::new(),
            applied: AppliedEdits::default(),
            malformed_response: false,
            tasks: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// The update command implementation.
pub struct UpdateCommand<S: DayStore, G: TextGenerator> {
    store: S,
    generator: G,
    config: Config,
}

impl<S: DayStore, G: TextGenerator> UpdateCommand<S, G> {
    /// Create a new update command.
    pub fn new(store: S, generator: G, config: Config) -> Self {
        Self {
            store,
            generator,
            config,
        }
    }

    /// Run the update command.
    pub fn run(&self, date: NaiveDate, message: &str, _options: &UpdateOptions) -> UpdateOutput {
        match self.execute(date, message) {
            Ok(output) => output,
            Err(err) => UpdateOutput::failure(date, err.to_string()),
        }
    }

    /// Apply `message` to the tasks of `date`.
    pub fn execute(&self, date: NaiveDate, message: &str) -> Result<UpdateOutput> {
        let headers = &self.config.sections;

        let mut content = self.store.read(date)?;
        if content.trim().is_empty() {
            content = format!("{}\n\n{}\n\n", day_title(date), headers.task);
        }

        let mut tasks = parse_tasks(&content, headers);
        let section = extract_task_section(&content, headers);
        let prompt = prompts::update_intent(&section, &tasks, message);

        tracing::debug!(%date, tasks = tasks.len(), generator = self.generator.name(), "requesting update intent");
        let raw = self.generator.complete(&prompt)?;

        let decoded = decode_intent(&raw);
        let malformed_response = matches!(decoded, IntentDecode::Malformed { .. });
        let intent = decoded.into_intent_or_empty();

        let applied = apply_intent(&mut tasks, &intent);
        tracing::debug!(?applied, "applied update intent");

        let document = replace_task_section(&content, &serialize_tasks(&tasks, headers), headers);
        self.store.write(date, &document)?;

        Ok(UpdateOutput::success(
            date,
            self.store.location(date),
            applied,
            malformed_response,
            tasks,
        ))
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &UpdateOutput, options: &UpdateOptions) -> String {
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
    fn format_human_readable(&self, output: &UpdateOutput) -> String {
        if !output.success {
            return format!(
                "Update failed: {}\n",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        let mut result = String::new();
        if output.malformed_response {
            result.push_str("Could not understand the instruction; no changes applied.\n");
        } else if output.applied.total() == 0 {
            result.push_str("No matching changes.\n");
        } else {
            let a = &output.applied;
            result.push_str(&format!(
                "Updated {}: {} completed, {} abandoned, {} edited, {} added.\n",
                output.date, a.completed, a.abandoned, a.edited, a.added
            ));
        }

        for task in &output.tasks {
            result.push_str(&task.list_line());
            result.push('\n');
        }
        result
    }
}

/// Apply `intent` to `tasks` in a fixed order: completions, abandonments,
/// title edits, then new tasks.
///
/// Indices that match no task are ignored. New tasks are pending and numbered
/// after the current maximum index. Titles are collapsed to one line and
/// blank ones are skipped.
pub fn apply_intent(tasks: &mut Vec<Task>, intent: &UpdateIntent) -> AppliedEdits {
    let mut applied = AppliedEdits::default();

    let completed: HashSet<usize> = intent.completed_indices.iter().copied().collect();
    for task in tasks.iter_mut().filter(|t| completed.contains(&t.index)) {
        task.status = TaskStatus::Done;
        applied.completed += 1;
    }

    let abandoned: HashSet<usize> = intent.abandoned_indices.iter().copied().collect();
    for task in tasks.iter_mut().filter(|t| abandoned.contains(&t.index)) {
        task.status = TaskStatus::Abandoned;
        applied.abandoned += 1;
    }

    for edit in &intent.text_edits {
        let title = single_line(&edit.new_title);
        if title.is_empty() {
            continue;
        }
        if let Some(task) = tasks.iter_mut().find(|t| t.index == edit.index) {
            task.title = title;
            applied.edited += 1;
        }
    }

    let mut next_index = tasks.iter().map(|t| t.index).max().unwrap_or(0);
    for title in &intent.new_tasks {
        let title = single_line(title);
        if title.is_empty() {
            continue;
        }
        next_index += 1;
        tasks.push(Task::new(next_index, title, TaskStatus::Pending));
        applied.added += 1;
    }

    applied
}
