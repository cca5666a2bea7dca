use crate::completion_schema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A personalized travel itinerary produced from the traveller's preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
#[completion_schema(name = "GeneratedItinerary")]
pub struct GeneratedItinerary {
    /// A detailed day-by-day travel itinerary including destinations, activities, estimated costs and travel times.
    pub itinerary: String,
}

/// An itinerary re-planned around real-time events such as weather or delays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[completion_schema(name = "AdjustedItinerary")]
pub struct AdjustedItinerary {
    /// The adjusted itinerary based on the real-time events.
    pub adjusted_itinerary: String,
    /// The reasoning behind the adjustments made to the itinerary.
    pub reasoning: String,
}
