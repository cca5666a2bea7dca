//! Flows: one templated prompt, one model call, one schema-checked reply.

pub mod adjust;
pub mod generate;
pub mod runner;

use serde::Serialize;

use crate::{
    error::Result,
    prompts::PromptRenderer,
    schemas::CompletionSchema,
    types::Validate,
};

pub use adjust::AdjustItinerary;
pub use generate::GenerateItinerary;
pub use runner::FlowRunner;

/// A named prompt with a validated input and a schema-bound output.
pub trait Flow {
    const NAME: &'static str;
    const SYSTEM_PROMPT: &'static str;

    type Input: Validate + Sync;
    type Output: CompletionSchema + Serialize;

    fn prompt(prompts: &PromptRenderer, input: &Self::Input) -> Result<String>;
}
