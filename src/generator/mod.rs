//! Text generation for daily-todo.
//!
//! The workflow commands talk to a language model through the
//! [`TextGenerator`] trait. [`OpenAiGenerator`] is the production backend;
//! [`ScriptedGenerator`] replays canned responses in tests.

pub mod intent;
pub mod openai;
pub mod prompts;
pub mod scripted;
pub mod traits;

pub use intent::{decode_intent, strip_code_fence, IntentDecode, TextEdit, UpdateIntent};
pub use openai::OpenAiGenerator;
pub use scripted::ScriptedGenerator;
pub use traits::{Prompt, TextGenerator};
