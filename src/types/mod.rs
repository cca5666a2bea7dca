pub mod itinerary;
pub mod request;
pub mod response;

pub use itinerary::{AdjustedItinerary, GeneratedItinerary};
pub use request::{AdjustmentRequest, Interest, ItineraryRequest, TravelDates, Validate};
pub use response::{deserialize_structured_response, StructuredPayload};
