//! Text generator traits.

use std::sync::Arc;

use serde::Serialize;

use crate::error::Result;

/// One request to a text generator: a system instruction and a user message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prompt {
    /// Instructions describing the expected output.
    pub system: String,
    /// The request payload.
    pub user: String,
}

impl Prompt {
    /// Create a new prompt.
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }
}

/// Trait for text generation backends.
///
/// A call is one blocking request/response. Transport failures are returned
/// as errors and never retried.
pub trait TextGenerator: Send + Sync {
    /// Complete `prompt`, returning the generated text trimmed of surrounding
    /// whitespace.
    fn complete(&self, prompt: &Prompt) -> Result<String>;

    /// Short backend name for logging.
    fn name(&self) -> &'static str;
}

impl<T: TextGenerator + ?Sized> TextGenerator for Arc<T> {
    fn complete(&self, prompt: &Prompt) -> Result<String> {
        (**self).complete(prompt)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

impl<T: TextGenerator + ?Sized> TextGenerator for Box<T> {
    fn complete(&self, prompt: &Prompt) -> Result<String> {
        (**self).complete(prompt)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
