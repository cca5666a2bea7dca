use super::Flow;
use crate::{
    error::Result,
    prompts::{templates, PromptRenderer},
    types::{AdjustedItinerary, AdjustmentRequest},
};

/// Re-plans an itinerary around weather and transport disruptions.
#[derive(Debug, Clone, Copy)]
pub struct AdjustItinerary;

impl Flow for AdjustItinerary {
    const NAME: &'static str = templates::ADJUSTMENT_TEMPLATE_NAME;
    const SYSTEM_PROMPT: &'static str = templates::ADJUSTMENT_SYSTEM;

    type Input = AdjustmentRequest;
    type Output = AdjustedItinerary;

    fn prompt(prompts: &PromptRenderer, input: &AdjustmentRequest) -> Result<String> {
        prompts.render_adjustment(input)
    }
}
