use super::Flow;
use crate::{
    error::Result,
    prompts::{templates, PromptRenderer},
    types::{GeneratedItinerary, ItineraryRequest},
};

/// Turns trip preferences into a day-by-day itinerary.
#[derive(Debug, Clone, Copy)]
pub struct GenerateItinerary;

impl Flow for GenerateItinerary {
    const NAME: &'static str = templates::GENERATION_TEMPLATE_NAME;
    const SYSTEM_PROMPT: &'static str = templates::GENERATION_SYSTEM;

    type Input = ItineraryRequest;
    type Output = GeneratedItinerary;

    fn prompt(prompts: &PromptRenderer, input: &ItineraryRequest) -> Result<String> {
        prompts.render_generation(input)
    }
}
