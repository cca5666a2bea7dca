//! Built-in prompt templates (Handlebars syntax).

pub const GENERATION_TEMPLATE_NAME: &str = "generate-personalized-itinerary";
pub const ADJUSTMENT_TEMPLATE_NAME: &str = "adjust-itinerary-for-real-time-events";

pub const GENERATION_SYSTEM: &str =
    "You are a travel agent specializing in personalized itinerary generation.";

pub const GENERATION_TEMPLATE: &str = "\
Based on the user's budget, interests, travel dates and desired region, create a detailed day-by-day travel itinerary.
Include suggested destinations, activities, estimated costs and travel times.
Make sure the itinerary is feasible, well-balanced, and takes into account local conditions.
The trip lasts {{days}} day(s).

Budget: {{budget}} USD
Interests: {{interests}}
Travel Dates: {{travel_dates}}
Region: {{region}}

Itinerary: ";

pub const ADJUSTMENT_SYSTEM: &str =
    "You are an AI travel assistant that adjusts itineraries based on real-time events.";

pub const ADJUSTMENT_TEMPLATE: &str = "\
Original Itinerary: {{original_itinerary}}
Current Weather: {{current_weather}}
Delay Information: {{delay_info}}

Based on the real-time events provided, adjust the itinerary to provide the user with the best possible experience. Explain your reasoning for the adjustments you have made.
Return the adjusted itinerary and reasoning in the output schema format.";

/// Rendered in place of a weather or delay field the user left empty.
pub const NOT_REPORTED: &str = "None reported";
