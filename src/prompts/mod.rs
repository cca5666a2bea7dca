//! Prompt rendering for the two flows.

pub mod templates;

use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

use crate::{
    error::{PlannerError, Result},
    types::{AdjustmentRequest, ItineraryRequest},
};
use templates::{
    ADJUSTMENT_TEMPLATE, ADJUSTMENT_TEMPLATE_NAME, GENERATION_TEMPLATE, GENERATION_TEMPLATE_NAME,
    NOT_REPORTED,
};

/// Values substituted into the generation template
#[derive(Debug, Clone, Serialize)]
pub struct GenerationContext {
    pub budget: String,
    pub interests: String,
    pub travel_dates: String,
    pub region: String,
    pub days: i64,
}

impl From<&ItineraryRequest> for GenerationContext {
    fn from(request: &ItineraryRequest) -> Self {
        Self {
            budget: request.budget.to_string(),
            interests: request
                .unique_interests()
                .iter()
                .map(|interest| interest.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            travel_dates: request.travel_dates.to_string(),
            region: request.region.trim().to_string(),
            days: request.travel_dates.days(),
        }
    }
}

/// Values substituted into the adjustment template
#[derive(Debug, Clone, Serialize)]
pub struct AdjustmentContext {
    pub original_itinerary: String,
    pub current_weather: String,
    pub delay_info: String,
}

impl From<&AdjustmentRequest> for AdjustmentContext {
    fn from(request: &AdjustmentRequest) -> Self {
        Self {
            original_itinerary: request.original_itinerary.trim().to_string(),
            current_weather: request.weather().unwrap_or(NOT_REPORTED).to_string(),
            delay_info: request.delay().unwrap_or(NOT_REPORTED).to_string(),
        }
    }
}

/// Holds the compiled templates. Output is plain text, so nothing is escaped,
/// and strict mode turns a missing variable into an error.
pub struct PromptRenderer {
    hbs: Handlebars<'static>,
}

impl std::fmt::Debug for PromptRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptRenderer").finish_non_exhaustive()
    }
}

impl PromptRenderer {
    pub fn new() -> Result<Self> {
        let mut hbs = Handlebars::new();
        hbs.set_strict_mode(true);
        hbs.register_escape_fn(handlebars::no_escape);

        for (name, template) in [
            (GENERATION_TEMPLATE_NAME, GENERATION_TEMPLATE),
            (ADJUSTMENT_TEMPLATE_NAME, ADJUSTMENT_TEMPLATE),
        ] {
            hbs.register_template_string(name, template)
                .map_err(|e| PlannerError::Template(format!("Failed to compile {name}: {e}")))?;
        }

        Ok(Self { hbs })
    }

    pub fn render<C: Serialize>(&self, template_name: &str, context: &C) -> Result<String> {
        debug!(target: "wanderplan::prompt", template = template_name, "rendering prompt");
        self.hbs
            .render(template_name, context)
            .map_err(|e| PlannerError::Template(format!("Failed to render {template_name}: {e}")))
    }

    pub fn render_generation(&self, request: &ItineraryRequest) -> Result<String> {
        self.render(GENERATION_TEMPLATE_NAME, &GenerationContext::from(request))
    }

    pub fn render_adjustment(&self, request: &AdjustmentRequest) -> Result<String> {
        self.render(ADJUSTMENT_TEMPLATE_NAME, &AdjustmentContext::from(request))
    }
}
