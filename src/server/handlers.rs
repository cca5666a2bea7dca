use axum::{
    extract::{rejection::JsonRejection, State},
    response::Html,
    Json,
};
use serde_json::{json, Value};
use tracing::warn;

use super::AppState;
use crate::{
    actions::{adjust_itinerary_action, generate_itinerary_action, ActionResult},
    types::{AdjustedItinerary, AdjustmentRequest, GeneratedItinerary, ItineraryRequest},
};

const INDEX_HTML: &str = include_str!("../../assets/index.html");

pub(super) async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub(super) async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

// A body that does not even decode (unknown interest, non-numeric budget,
// missing field) gets the same answer as one that fails validation.
pub(super) async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<ItineraryRequest>, JsonRejection>,
) -> Json<ActionResult<GeneratedItinerary>> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!(target: "wanderplan::server", route = "generate", error = %rejection.body_text(), "undecodable body");
            return Json(ActionResult::invalid_input());
        }
    };

    Json(generate_itinerary_action(&state.runner, &request).await)
}

pub(super) async fn adjust(
    State(state): State<AppState>,
    payload: Result<Json<AdjustmentRequest>, JsonRejection>,
) -> Json<ActionResult<AdjustedItinerary>> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!(target: "wanderplan::server", route = "adjust", error = %rejection.body_text(), "undecodable body");
            return Json(ActionResult::invalid_input());
        }
    };

    Json(adjust_itinerary_action(&state.runner, &request).await)
}
