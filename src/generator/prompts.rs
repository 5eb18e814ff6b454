//! Prompt builders for the three request shapes.

use chrono::NaiveDate;

use crate::document::{SectionHeaders, Task};
use crate::generator::Prompt;

/// Placeholder for an empty payload.
const NOTHING: &str = "(none)";

/// Ask for today's Task section carrying over yesterday's pending titles.
pub fn generate_tasks(pending: &[String], date: NaiveDate, headers: &SectionHeaders) -> Prompt {
    let system = format!(
        "You are a daily planning assistant. Build today's task list from the \
items left unfinished yesterday.\n\
Rules:\n\
1. Every unfinished item must be carried over to today, one per line as: - [ ] description\n\
2. Output Markdown only: a \"{}\" heading followed by the - [ ] lines. \
No code blocks, no commentary.\n\
3. Do not add any task that is not in the list.",
        headers.task
    );

    let listing = if pending.is_empty() {
        NOTHING.to_string()
    } else {
        pending
            .iter()
            .map(|title| format!("- {}", title))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let user = format!(
        "Today's date: {}\n\nUnfinished items from yesterday (carry all of them over):\n{}",
        date.format("%Y-%m-%d"),
        listing
    );

    Prompt::new(system, user)
}

/// Ask for a JSON edit set describing `message` against the current tasks.
///
/// `section` is the literal Task and Abandoned text; `tasks` supplies the
/// numbered listing the indices refer to.
pub fn update_intent(section: &str, tasks: &[Task], message: &str) -> Prompt {
    let system = "You are a task list parser. You receive the current task list (Markdown) \
and one natural-language instruction. Work out what the user wants and reply with a single \
JSON object only, not wrapped in a code block.\n\
Fields:\n\
- completed_indices: numbers of tasks to mark done (1-based), e.g. [1, 3]\n\
- abandoned_indices: numbers of tasks to abandon, e.g. [2]\n\
- new_tasks: descriptions of tasks to add, e.g. [\"write weekly report\", \"meeting\"]\n\
- text_edits: tasks whose description changes, each {\"index\": 1, \"new_title\": \"new text\"}\n\
Use an empty list [] or omit a field when it does not apply.";

    let section = if section.trim().is_empty() {
        NOTHING
    } else {
        section.trim_end()
    };

    let numbered = if tasks.is_empty() {
        NOTHING.to_string()
    } else {
        tasks
            .iter()
            .map(|task| format!("{}. [{}] {}", task.index, task.status, task.title))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let user = format!(
        "Current task list (Markdown):\n\n{}\n\nTask numbers:\n{}\n\nThe user says: {}",
        section, numbered, message
    );

    Prompt::new(system, user)
}

/// Ask for a one or two sentence factual summary of one day.
pub fn summarize_daily(content: &str, date: NaiveDate) -> Prompt {
    let system = "You are a daily summary assistant. From the day's Markdown, write a short, \
factual summary of one or two sentences covering only facts and progress. Output the \
summary text only, without a heading.";

    let body = if content.trim().is_empty() {
        NOTHING
    } else {
        content
    };

    let user = format!(
        "Date: {}\n\nContent:\n\n{}",
        date.format("%Y-%m-%d"),
        body
    );

    Prompt::new(system, user)
}

/// Ask for one aggregate summary over several days, oldest first.
pub fn summarize_weekly(days: &[(NaiveDate, String)]) -> Prompt {
    let system = "You are a weekly report assistant. Below are several days of task logs. \
Write a short summary of the week, highlighting what was completed and the main themes. \
Output the summary text only.";

    let parts = days
        .iter()
        .map(|(date, content)| format!("## {}\n\n{}", date.format("%Y-%m-%d"), content))
        .collect::<Vec<_>>()
        .join("\n\n---\n\n");

    Prompt::new(system, format!("This week's logs:\n\n{}", parts))
}
