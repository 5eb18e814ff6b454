//! daily-todo - a per-day markdown task log
//!
//! Each calendar day is one markdown file with a task checklist, an
//! abandoned-task list and a summary. The commands carry unfinished tasks
//! over from the previous day, apply natural-language edits, and write
//! summaries, using a language model for the parts that need one. Everything
//! outside the recognized sections of a day file is left untouched.

pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod generator;
pub mod storage;

pub use config::Config;
pub use document::{
    extract_task_section, parse_tasks, replace_summary_section, replace_task_section,
    serialize_tasks, SectionHeaders, Task, TaskStatus,
};
pub use error::{Result, TodoError};
pub use generator::{OpenAiGenerator, Prompt, ScriptedGenerator, TextGenerator, UpdateIntent};
pub use storage::{DayStore, FileDayStore, MemoryDayStore};

// CLI commands
pub use cli::{GenerateCommand, ListCommand, SummaryCommand, SummaryKind, UpdateCommand};
