//! CLI commands for daily-todo.
//!
//! - **Read-only**: list
//! - **Generator-backed**: generate, update, summary
//!
//! Every command follows the same shape: `execute` returns a `Result`, `run`
//! folds errors into a failed output, and `format_output` renders it as
//! human-readable text or JSON.

pub mod generate;
pub mod list;
pub mod summary;
pub mod update;

pub use generate::GenerateCommand;
pub use list::ListCommand;
pub use summary::{SummaryCommand, SummaryKind};
pub use update::UpdateCommand;
