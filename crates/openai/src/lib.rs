//! OpenAI chat completions and the headshot reaction generator built on it.

pub mod client;
pub mod reactions;

pub use client::{ChatClient, ChatError, OpenAiConfig};
pub use reactions::{Reaction, ReactionGenerator};
