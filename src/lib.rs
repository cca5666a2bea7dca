//! wanderplan: personalized travel itineraries from a hosted LLM
//!
//! Trip preferences (region, budget, dates, interests) are validated, rendered
//! into a fixed prompt and sent to an OpenAI-compatible endpoint that must
//! answer with JSON matching the output schema. A second flow re-plans an
//! existing itinerary around current weather or transport delays.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use chrono::NaiveDate;
//! use wanderplan::{
//!     actions::generate_itinerary_action, FlowRunner, Interest, ItineraryRequest,
//!     PlannerConfig, TravelDates,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PlannerConfig::from_env()?;
//!     let runner = FlowRunner::new(&config)?;
//!
//!     let request = ItineraryRequest {
//!         region: "Portugal".to_string(),
//!         budget: 1800.0,
//!         travel_dates: TravelDates::new(
//!             NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
//!             NaiveDate::from_ymd_opt(2025, 9, 6).unwrap(),
//!         ),
//!         interests: vec![Interest::Heritage, Interest::Nightlife],
//!     };
//!
//!     match generate_itinerary_action(&runner, &request).await.into_result() {
//!         Ok(plan) => println!("{}", plan.itinerary),
//!         Err(message) => eprintln!("{message}"),
//!     }
//!     Ok(())
//! }
//! ```

extern crate self as wanderplan;

pub mod actions;
pub mod config;
pub mod error;
pub mod flows;
pub mod prompts;
pub mod schemas;
pub mod server;
pub mod services;
pub mod types;

pub use actions::{
    adjust_itinerary_action, generate_itinerary_action, ActionResult, ADJUST_FAILED,
    GENERATE_FAILED, INVALID_INPUT,
};
pub use config::PlannerConfig;
pub use error::{PlannerError, Result};
pub use flows::{AdjustItinerary, Flow, FlowRunner, GenerateItinerary};
pub use schemas::{CompletionSchema, SchemaHandle};
pub use types::{
    AdjustedItinerary, AdjustmentRequest, GeneratedItinerary, Interest, ItineraryRequest,
    TravelDates, Validate,
};
pub use wanderplan_macros::completion_schema;

pub use schemas as schema;

#[cfg(feature = "cli")]
pub mod cli;
