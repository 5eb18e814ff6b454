//! Generate command for daily-todo.
//!
//! Builds a day's task list from the previous day's pending tasks. When the
//! previous day left nothing pending, the day gets an empty task section and
//! the generator is never called.

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::config::Config;
use crate::document::{day_title, parse_tasks, replace_task_section, Task};
use crate::error::{Result, TodoError};
use crate::generator::{prompts, TextGenerator};
use crate::storage::DayStore;

/// Options for the generate command.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the generate command.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateOutput {
    /// Whether generation was successful.
    pub success: bool,
    /// The generated day.
    pub date: String,
    /// Where the day file was written.
    pub path: String,
    /// Number of pending tasks carried over from the previous day.
    pub carried_over: usize,
    /// True when nothing was pending and no generator call was made.
    pub cold_start: bool,
    /// Error message if generation failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerateOutput {
    /// Create a successful output.
    pub fn success(date: NaiveDate, path: String, carried_over: usize) -> Self {
        Self {
            success: true,
            date: date.format("%Y-%m-%d").to_string(),
            path,
            carried_over,
            cold_start: carried_over == 0,
            error: None,
        }
    }

    /// Create a failed output.
    pub fn failure(date: NaiveDate, error: impl Into<String>) -> Self {
        Self {
            success: false,
            date: date.format("%Y-%m-%d").to_string(),
            path: String::new(),
            carried_over: 0,
            cold_start: false,
            error: Some(error.into()),
        }
    }
}

/// The generate command implementation.
pub struct GenerateCommand<S: DayStore, G: TextGenerator> {
    store: S,
    generator: G,
    config: Config,
}

impl<S: DayStore, G: TextGenerator> GenerateCommand<S, G> {
    /// Create a new generate command.
    pub fn new(store: S, generator: G, config: Config) -> Self {
        Self {
            store,
            generator,
            config,
        }
    }

    /// Run the generate command for `date`.
    pub fn run(&self, date: NaiveDate, _options: &GenerateOptions) -> GenerateOutput {
        match self.execute(date) {
            Ok(output) => output,
            Err(err) => GenerateOutput::failure(date, err.to_string()),
        }
    }

    /// Generate `date` from the previous day's pending tasks.
    pub fn execute(&self, date: NaiveDate) -> Result<GenerateOutput> {
        let headers = &self.config.sections;
        let yesterday = date
            .checked_sub_days(Days::new(1))
            .ok_or_else(|| TodoError::invalid_argument(format!("no day before {}", date)))?;

        let pending: Vec<String> = parse_tasks(&self.store.read(yesterday)?, headers)
            .into_iter()
            .filter(Task::is_pending)
            .map(|task| task.title)
            .collect();

        let section = if pending.is_empty() {
            tracing::debug!(%date, "nothing pending yesterday, writing empty task section");
            format!("{}\n\n", headers.task)
        } else {
            tracing::debug!(
                %date,
                pending = pending.len(),
                generator = self.generator.name(),
                "carrying over pending tasks"
            );
            let prompt = prompts::generate_tasks(&pending, date, headers);
            let generated = self.generator.complete(&prompt)?;
            warn_missing_titles(&generated, &pending);
            ensure_task_header(&generated, &headers.task)
        };

        let existing = self.store.read(date)?;
        let document = if existing.trim().is_empty() {
            let mut document = format!("{}\n\n{}", day_title(date), section);
            if !document.ends_with('\n') {
                document.push('\n');
            }
            document
        } else {
            replace_task_section(&existing, &section, headers)
        };

        self.store.write(date, &document)?;

        Ok(GenerateOutput::success(
            date,
            self.store.location(date),
            pending.len(),
        ))
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &GenerateOutput, options: &GenerateOptions) -> String {
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
    fn format_human_readable(&self, output: &GenerateOutput) -> String {
        if !output.success {
            return format!(
                "Generate failed: {}\n",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        if output.cold_start {
            format!(
                "Created {} with an empty task list (nothing pending from the previous day).\n{}\n",
                output.date, output.path
            )
        } else {
            format!(
                "Generated {} with {} carried-over task(s).\n{}\n",
                output.date, output.carried_over, output.path
            )
        }
    }
}

/// Prefix `generated` with the task header unless it already carries one.
fn ensure_task_header(generated: &str, task_header: &str) -> String {
    if generated.lines().any(|line| line.trim() == task_header) {
        generated.to_string()
    } else {
        format!("{}\n\n{}", task_header, generated)
    }
}

/// Log each carried-over title the generator dropped.
fn warn_missing_titles(generated: &str, pending: &[String]) {
    for title in pending {
        if !generated.contains(title.as_str()) {
            tracing::warn!(title = %title, "pending task missing from generated list");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{SectionHeaders, TaskStatus};
    use crate::generator::ScriptedGenerator;
    use crate::storage::MemoryDayStore;
    use std::sync::Arc;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn setup(
        documents: Vec<(NaiveDate, &str)>,
        responses: Vec<&str>,
    ) -> (
        Arc<MemoryDayStore>,
        Arc<ScriptedGenerator>,
        GenerateCommand<Arc<MemoryDayStore>, Arc<ScriptedGenerator>>,
    ) {
        let store = Arc::new(MemoryDayStore::with_documents(
            documents
                .into_iter()
                .map(|(date, text)| (date, text.to_string())),
        ));
        let generator = Arc::new(ScriptedGenerator::with_responses(responses));
        let cmd = GenerateCommand::new(
            Arc::clone(&store),
            Arc::clone(&generator),
            Config::default(),
        );
        (store, generator, cmd)
    }

    #[test]
    fn test_cold_start_without_previous_day() {
        let (store, generator, cmd) = setup(vec![], vec![]);

        let output = cmd.execute(day(2)).unwrap();

        assert!(output.success);
        assert!(output.cold_start);
        assert_eq!(generator.call_count(), 0);
        assert_eq!(store.read(day(2)).unwrap(), "# 2024-01-02\n\n## Task\n\n");
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn test_cold_start_when_previous_day_finished() {
        let (store, generator, cmd) = setup(
            vec![(day(1), "# 2024-01-01\n\n## Task\n\n- [x] done\n\n## Abandoned\n\n- [~] dropped\n")],
            vec![],
        );

        let output = cmd.execute(day(2)).unwrap();

        assert!(output.cold_start);
        assert_eq!(generator.call_count(), 0);
        assert!(parse_tasks(&store.read(day(2)).unwrap(), &SectionHeaders::default()).is_empty());
    }

    #[test]
    fn test_cold_start_overwrites_existing_tasks() {
        let (store, _generator, cmd) = setup(
            vec![(day(2), "# 2024-01-02\n\n## Task\n\n- [ ] typed by hand\n\n## Notes\nkeep\n")],
            vec![],
        );

        cmd.execute(day(2)).unwrap();

        assert_eq!(
            store.read(day(2)).unwrap(),
            "# 2024-01-02\n\n## Task\n\n## Notes\nkeep\n"
        );
    }

    #[test]
    fn test_carries_over_pending_tasks() {
        let (store, generator, cmd) = setup(
            vec![(
                day(1),
                "# 2024-01-01\n\n## Task\n\n- [ ] write report\n- [x] email client\n- [ ] call bank\n",
            )],
            vec!["## Task\n\n- [ ] write report\n- [ ] call bank"],
        );

        let output = cmd.execute(day(2)).unwrap();

        assert!(output.success);
        assert!(!output.cold_start);
        assert_eq!(output.carried_over, 2);
        assert_eq!(generator.call_count(), 1);

        let prompt = &generator.prompts()[0];
        assert!(prompt.user.contains("2024-01-02"));
        assert!(prompt.user.contains("- write report\n- call bank"));
        assert!(!prompt.user.contains("email client"));

        assert_eq!(
            store.read(day(2)).unwrap(),
            "# 2024-01-02\n\n## Task\n\n- [ ] write report\n- [ ] call bank\n"
        );
    }

    #[test]
    fn test_injects_missing_task_header() {
        let (store, _generator, cmd) = setup(
            vec![(day(1), "## Task\n- [ ] write report\n")],
            vec!["- [ ] write report"],
        );

        cmd.execute(day(2)).unwrap();

        let tasks = parse_tasks(&store.read(day(2)).unwrap(), &SectionHeaders::default());
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "write report");
        assert_eq!(tasks[0].status, TaskStatus::Pending);
    }

    #[test]
    fn test_merges_into_existing_document() {
        let (store, _generator, cmd) = setup(
            vec![
                (day(1), "## Task\n- [ ] a\n"),
                (
                    day(2),
                    "# 2024-01-02\n\n## Notes\nmeeting at 3\n\n## Summary\n\nold\n",
                ),
            ],
            vec!["## Task\n\n- [ ] a"],
        );

        cmd.execute(day(2)).unwrap();

        let content = store.read(day(2)).unwrap();
        assert!(content.starts_with("# 2024-01-02\n\n## Notes\nmeeting at 3\n\n## Summary\n\nold\n"));
        assert!(content.ends_with("## Task\n\n- [ ] a\n"));
    }

    #[test]
    fn test_generator_failure_writes_nothing() {
        let (store, generator, cmd) = setup(vec![(day(1), "## Task\n- [ ] a\n")], vec![]);
        generator.push_error("connection refused");

        let output = cmd.run(day(2), &GenerateOptions::default());

        assert!(!output.success);
        assert!(output.error.unwrap().contains("connection refused"));
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn test_ensure_task_header() {
        assert_eq!(ensure_task_header("- [ ] a", "## Task"), "## Task\n\n- [ ] a");
        assert_eq!(ensure_task_header("## Task\n- [ ] a", "## Task"), "## Task\n- [ ] a");
    }

    #[test]
    fn test_format_output() {
        let (_store, _generator, cmd) = setup(vec![], vec![]);
        let output = GenerateOutput::success(day(2), "/days/2024-01-02.md".to_string(), 0);

        let human = cmd.format_output(&output, &GenerateOptions::default());
        assert!(human.contains("empty task list"));
        assert!(human.contains("/days/2024-01-02.md"));

        let json = cmd.format_output(
            &output,
            &GenerateOptions {
                json: true,
                ..Default::default()
            },
        );
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["cold_start"], true);
        assert_eq!(value["date"], "2024-01-02");

        let quiet = cmd.format_output(
            &output,
            &GenerateOptions {
                quiet: true,
                ..Default::default()
            },
        );
        assert!(quiet.is_empty());
    }
}
