//! Scripted text generator for testing.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::error::{Result, TodoError};
use crate::generator::{Prompt, TextGenerator};

/// Generator that replays queued responses and records every prompt.
///
/// An exhausted queue returns a generator error, the same way a failed
/// request would.
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    responses: Mutex<VecDeque<Result<String>>>,
    prompts: Mutex<Vec<Prompt>>,
}

impl ScriptedGenerator {
    /// Create a generator with no queued responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a generator that answers with `responses` in order.
    pub fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let generator = Self::new();
        for response in responses {
            generator.push(response);
        }
        generator
    }

    /// Queue a successful response.
    pub fn push(&self, response: impl Into<String>) {
        self.lock_responses().push_back(Ok(response.into()));
    }

    /// Queue a failure.
    pub fn push_error(&self, message: impl Into<String>) {
        self.lock_responses()
            .push_back(Err(TodoError::generator(message)));
    }

    /// Number of `complete` calls so far.
    pub fn call_count(&self) -> usize {
        self.lock_prompts().len()
    }

    /// Prompts received so far, in order.
    pub fn prompts(&self) -> Vec<Prompt> {
        self.lock_prompts().clone()
    }

    fn lock_responses(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<String>>> {
        self.responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_prompts(&self) -> std::sync::MutexGuard<'_, Vec<Prompt>> {
        self.prompts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TextGenerator for ScriptedGenerator {
    fn complete(&self, prompt: &Prompt) -> Result<String> {
        self.lock_prompts().push(prompt.clone());
        self.lock_responses()
            .pop_front()
            .unwrap_or_else(|| Err(TodoError::generator("no scripted response left")))
            .map(|text| text.trim().to_string())
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}
