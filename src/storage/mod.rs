//! Day-file storage for daily-todo.
//!
//! One document per calendar date, with file-based and in-memory backends.

pub mod file;
pub mod memory;
pub mod traits;

pub use file::FileDayStore;
pub use memory::MemoryDayStore;
pub use traits::DayStore;
