//! Summary command for daily-todo.
//!
//! A daily summary is written into the day's summary section and printed.
//! A weekly summary covers the seven days ending at the given date and is
//! only printed.

use std::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::config::Config;
use crate::document::{day_title, replace_summary_section};
use crate::error::{Result, TodoError};
use crate::generator::{prompts, TextGenerator};
use crate::storage::DayStore;

/// Number of days covered by a weekly summary, end date included.
pub const WEEK_DAYS: u64 = 7;

/// Which summary to produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryKind {
    #[default]
    Daily,
    Weekly,
}

impl FromStr for SummaryKind {
    type Err = TodoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            other => Err(TodoError::invalid_argument(format!(
                "unknown summary kind '{}', use daily or weekly",
                other
            ))),
        }
    }
}

impl fmt::Display for SummaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Daily => f.write_str("daily"),
            Self::Weekly => f.write_str("weekly"),
        }
    }
}

/// Options for the summary command.
#[derive(Debug, Clone, Default)]
pub struct SummaryOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the summary command.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryOutput {
    /// Whether the summary was successful.
    pub success: bool,
    /// Daily or weekly.
    pub kind: SummaryKind,
    /// First day covered.
    pub start_date: String,
    /// Last day covered.
    pub end_date: String,
    /// The generated summary text.
    pub summary: String,
    /// Where the summary was written (daily only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Error message if the summary failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SummaryOutput {
    /// Create a successful output.
    pub fn success(
        kind: SummaryKind,
        start: NaiveDate,
        end: NaiveDate,
        summary: String,
        path: Option<String>,
    ) -> Self {
        Self {
            success: true,
            kind,
            start_date: start.format("%Y-%m-%d").to_string(),
            end_date: end.format("%Y-%m-%d").to_string(),
            summary,
            path,
            error: None,
        }
    }

    /// Create a failed output.
    pub fn failure(kind: SummaryKind, date: NaiveDate, error: impl Into<String>) -> Self {
        let date = date.format("%Y-%m-%d").to_string();
        Self {
            success: false,
            kind,
            start_date: date.clone(),
            end_date: date,
            summary: String::new(),
            path: None,
            error: Some(error.into()),
        }
    }
}

/// The summary command implementation.
pub struct SummaryCommand<S: DayStore, G: TextGenerator> {
    store: S,
    generator: G,
    config: Config,
}

impl<S: DayStore, G: TextGenerator> SummaryCommand<S, G> {
    /// Create a new summary command.
    pub fn new(store: S, generator: G, config: Config) -> Self {
        Self {
            store,
            generator,
            config,
        }
    }

    /// Run the summary command.
    pub fn run(&self, kind: SummaryKind, date: NaiveDate, _options: &SummaryOptions) -> SummaryOutput {
        match self.execute(kind, date) {
            Ok(output) => output,
            Err(err) => SummaryOutput::failure(kind, date, err.to_string()),
        }
    }

    /// Produce a `kind` summary ending at `date`.
    pub fn execute(&self, kind: SummaryKind, date: NaiveDate) -> Result<SummaryOutput> {
        match kind {
            SummaryKind::Daily => self.daily(date),
            SummaryKind::Weekly => self.weekly(date),
        }
    }

    /// Summarize one day and store the result in its summary section.
    fn daily(&self, date: NaiveDate) -> Result<SummaryOutput> {
        let headers = &self.config.sections;
        let content = self.store.read(date)?;

        let summary = self
            .generator
            .complete(&prompts::summarize_daily(&content, date))?;

        let base = if content.trim().is_empty() {
            format!("{}\n\n{}\n\n", day_title(date), headers.task)
        } else {
            content
        };
        let document = replace_summary_section(&base, &summary, headers);
        self.store.write(date, &document)?;

        Ok(SummaryOutput::success(
            SummaryKind::Daily,
            date,
            date,
            summary,
            Some(self.store.location(date)),
        ))
    }

    /// Summarize the week ending at `end`. Writes nothing.
    fn weekly(&self, end: NaiveDate) -> Result<SummaryOutput> {
        let start = end
            .checked_sub_days(Days::new(WEEK_DAYS - 1))
            .ok_or_else(|| TodoError::invalid_argument(format!("no week ending {}", end)))?;

        let days = start
            .iter_days()
            .take(WEEK_DAYS as usize)
            .map(|day| Ok((day, self.store.read(day)?)))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(%start, %end, generator = self.generator.name(), "requesting weekly summary");
        let summary = self.generator.complete(&prompts::summarize_weekly(&days))?;

        Ok(SummaryOutput::success(
            SummaryKind::Weekly,
            start,
            end,
            summary,
            None,
        ))
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &SummaryOutput, options: &SummaryOptions) -> String {
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
    fn format_human_readable(&self, output: &SummaryOutput) -> String {
        if !output.success {
            return format!(
                "Summary failed: {}\n",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        match output.kind {
            SummaryKind::Daily => format!(
                "Wrote the summary for {}.\n{}\n",
                output.end_date, output.summary
            ),
            SummaryKind::Weekly => format!(
                "Week {} to {}:\n{}\n",
                output.start_date, output.end_date, output.summary
            ),
        }
    }
}
