//! Day-file storage traits.
//!
//! This module defines the `DayStore` trait: one text document per calendar
//! date, read whole and written whole.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::error::Result;

/// Trait for day-document storage backends.
pub trait DayStore: Send + Sync {
    /// Read the document for `date`.
    ///
    /// A date with no document reads as an empty string, not an error.
    fn read(&self, date: NaiveDate) -> Result<String>;

    /// Replace the document for `date` with `content`.
    fn write(&self, date: NaiveDate, content: &str) -> Result<()>;

    /// Human-readable location of the document for `date`, for messages.
    fn location(&self, date: NaiveDate) -> String;
}

/// Blanket implementation of DayStore for Arc-wrapped stores.
///
/// Lets tests keep a handle on a store they passed into a command.
impl<T: DayStore + ?Sized> DayStore for Arc<T> {
    fn read(&self, date: NaiveDate) -> Result<String> {
        (**self).read(date)
    }

    fn write(&self, date: NaiveDate, content: &str) -> Result<()> {
        (**self).write(date, content)
    }

    fn location(&self, date: NaiveDate) -> String {
        (**self).location(date)
    }
}
