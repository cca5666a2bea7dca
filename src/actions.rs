//! The user-facing boundary around the flows.
//!
//! Whatever goes wrong, the caller sees one of three fixed messages; the
//! detailed cause only goes to the log.

use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::{
    error::PlannerError,
    flows::FlowRunner,
    types::{AdjustedItinerary, AdjustmentRequest, GeneratedItinerary, ItineraryRequest, Validate},
};

pub const INVALID_INPUT: &str = "Invalid input.";
pub const GENERATE_FAILED: &str = "Failed to generate itinerary. Please try again.";
pub const ADJUST_FAILED: &str = "Failed to adjust itinerary. Please try again.";

/// Serialized as `{"success": ...}` or `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionResult<T> {
    Success(T),
    Error(String),
}

impl<T> ActionResult<T> {
    pub fn invalid_input() -> Self {
        ActionResult::Error(INVALID_INPUT.to_string())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ActionResult::Success(_))
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            ActionResult::Error(message) => Some(message),
            ActionResult::Success(_) => None,
        }
    }

    pub fn into_result(self) -> Result<T, String> {
        match self {
            ActionResult::Success(value) => Ok(value),
            ActionResult::Error(message) => Err(message),
        }
    }
}

pub async fn generate_itinerary_action(
    runner: &FlowRunner,
    request: &ItineraryRequest,
) -> ActionResult<GeneratedItinerary> {
    if let Err(err) = request.validate() {
        warn!(target: "wanderplan::action", action = "generate", %err, "rejected input");
        return ActionResult::invalid_input();
    }

    match runner.generate_itinerary(request).await {
        Ok(itinerary) => ActionResult::Success(itinerary),
        Err(err) => failure("generate", &err, GENERATE_FAILED),
    }
}

pub async fn adjust_itinerary_action(
    runner: &FlowRunner,
    request: &AdjustmentRequest,
) -> ActionResult<AdjustedItinerary> {
    if let Err(err) = request.validate() {
        warn!(target: "wanderplan::action", action = "adjust", %err, "rejected input");
        return ActionResult::invalid_input();
    }

    match runner.adjust_itinerary(request).await {
        Ok(adjusted) => ActionResult::Success(adjusted),
        Err(err) => failure("adjust", &err, ADJUST_FAILED),
    }
}

fn failure<T>(action: &'static str, err: &PlannerError, message: &str) -> ActionResult<T> {
    if err.is_invalid_input() {
        warn!(target: "wanderplan::action", action, %err, "rejected input");
        return ActionResult::invalid_input();
    }

    error!(
        target: "wanderplan::action",
        action,
        code = err.error_code(),
        retryable = err.is_retryable(),
        %err,
        "flow failed"
    );
    ActionResult::Error(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_shapes() {
        let ok: ActionResult<GeneratedItinerary> = ActionResult::Success(GeneratedItinerary {
            itinerary: "Day 1".to_string(),
        });
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            json!({ "success": { "itinerary": "Day 1" } })
        );

        let err: ActionResult<GeneratedItinerary> = ActionResult::invalid_input();
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({ "error": "Invalid input." })
        );
        assert_eq!(err.error_message(), Some(INVALID_INPUT));
        assert!(!err.is_success());
    }

    #[test]
    fn test_adjusted_envelope_uses_camel_case() {
        let ok = ActionResult::Success(AdjustedItinerary {
            adjusted_itinerary: "Day 1: museum".to_string(),
            reasoning: "Rain".to_string(),
        });
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            json!({ "success": { "adjustedItinerary": "Day 1: museum", "reasoning": "Rain" } })
        );
    }

    #[test]
    fn test_flow_errors_collapse_to_fixed_message() {
        let result: ActionResult<()> =
            failure("generate", &PlannerError::Model("boom".into()), GENERATE_FAILED);
        assert_eq!(result.into_result(), Err(GENERATE_FAILED.to_string()));

        let result: ActionResult<()> = failure(
            "adjust",
            &PlannerError::RateLimit { retry_after: 3 },
            ADJUST_FAILED,
        );
        assert_eq!(result.error_message(), Some(ADJUST_FAILED));

        let result: ActionResult<()> = failure(
            "adjust",
            &PlannerError::InvalidInput("x".into()),
            ADJUST_FAILED,
        );
        assert_eq!(result.error_message(), Some(INVALID_INPUT));
    }
}
