//! Trip preferences and adjustment requests as the user submits them.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{PlannerError, Result};

/// Input checks run before anything is sent to the model.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// The interests a traveller can pick from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interest {
    Heritage,
    Nightlife,
    Adventure,
}

impl Interest {
    pub const ALL: [Interest; 3] = [Interest::Heritage, Interest::Nightlife, Interest::Adventure];

    pub fn as_str(&self) -> &'static str {
        match self {
            Interest::Heritage => "heritage",
            Interest::Nightlife => "nightlife",
            Interest::Adventure => "adventure",
        }
    }
}

impl fmt::Display for Interest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interest {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let needle = s.trim();
        Interest::ALL
            .into_iter()
            .find(|interest| interest.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| {
                format!(
                    "unknown interest `{needle}` (expected one of: {})",
                    Interest::ALL.map(|i| i.as_str()).join(", ")
                )
            })
    }
}

/// Inclusive travel window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelDates {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl TravelDates {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    /// Number of days in the window, counting both ends.
    pub fn days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }
}

impl fmt::Display for TravelDates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.from.format("%Y-%m-%d"),
            self.to.format("%Y-%m-%d")
        )
    }
}

/// What the trip form collects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryRequest {
    pub region: String,
    /// Budget in USD; the form may post it as a numeric string.
    #[serde(deserialize_with = "number_or_numeric_string")]
    pub budget: f64,
    pub travel_dates: TravelDates,
    pub interests: Vec<Interest>,
}

impl ItineraryRequest {
    /// Interests in submission order with repeats dropped.
    pub fn unique_interests(&self) -> Vec<Interest> {
        let mut seen = Vec::with_capacity(self.interests.len());
        for interest in &self.interests {
            if !seen.contains(interest) {
                seen.push(*interest);
            }
        }
        seen
    }
}

impl Validate for ItineraryRequest {
    fn validate(&self) -> Result<()> {
        if self.region.trim().chars().count() < 2 {
            return Err(PlannerError::InvalidInput(
                "Region must be at least 2 characters.".to_string(),
            ));
        }
        if !self.budget.is_finite() || self.budget <= 0.0 {
            return Err(PlannerError::InvalidInput(
                "Budget must be a positive number.".to_string(),
            ));
        }
        if self.travel_dates.from > self.travel_dates.to {
            return Err(PlannerError::InvalidInput(
                "Travel start date must not be after the end date.".to_string(),
            ));
        }
        if self.interests.is_empty() {
            return Err(PlannerError::InvalidInput(
                "You have to select at least one interest.".to_string(),
            ));
        }
        Ok(())
    }
}

/// A request to re-plan around something that just happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentRequest {
    pub original_itinerary: String,
    #[serde(default)]
    pub current_weather: Option<String>,
    #[serde(default)]
    pub delay_info: Option<String>,
}

impl AdjustmentRequest {
    pub fn new(original_itinerary: impl Into<String>) -> Self {
        Self {
            original_itinerary: original_itinerary.into(),
            current_weather: None,
            delay_info: None,
        }
    }

    pub fn with_weather(mut self, weather: impl Into<String>) -> Self {
        self.current_weather = Some(weather.into());
        self
    }

    pub fn with_delay(mut self, delay: impl Into<String>) -> Self {
        self.delay_info = Some(delay.into());
        self
    }

    pub fn weather(&self) -> Option<&str> {
        non_blank(self.current_weather.as_deref())
    }

    pub fn delay(&self) -> Option<&str> {
        non_blank(self.delay_info.as_deref())
    }
}

impl Validate for AdjustmentRequest {
    fn validate(&self) -> Result<()> {
        if self.original_itinerary.trim().is_empty() {
            return Err(PlannerError::InvalidInput(
                "Original itinerary is missing.".to_string(),
            ));
        }
        if self.weather().is_none() && self.delay().is_none() {
            return Err(PlannerError::InvalidInput(
                "Please provide weather or delay information for adjustment.".to_string(),
            ));
        }
        Ok(())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn number_or_numeric_string<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("`{text}` is not a number"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn request() -> ItineraryRequest {
        ItineraryRequest {
            region: "India".to_string(),
            budget: 1500.0,
            travel_dates: TravelDates::new(date("2024-01-01"), date("2024-01-10")),
            interests: vec![Interest::Heritage],
        }
    }

    fn invalid_message(result: Result<()>) -> String {
        match result {
            Err(PlannerError::InvalidInput(msg)) => msg,
            other => panic!("expected invalid input, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_region_needs_two_characters() {
        let mut req = request();
        req.region = " F ".to_string();
        assert!(invalid_message(req.validate()).contains("Region"));

        req.region = "UK".to_string();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_budget_must_be_positive_and_finite() {
        for budget in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            let mut req = request();
            req.budget = budget;
            assert!(invalid_message(req.validate()).contains("Budget"));
        }

        let mut req = request();
        req.budget = 0.01;
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_dates_must_be_ordered() {
        let mut req = request();
        req.travel_dates = TravelDates::new(date("2024-02-01"), date("2024-01-01"));
        assert!(invalid_message(req.validate()).contains("start date"));

        req.travel_dates = TravelDates::new(date("2024-02-01"), date("2024-02-01"));
        assert!(req.validate().is_ok());
        assert_eq!(req.travel_dates.days(), 1);
    }

    #[test]
    fn test_interests_required() {
        let mut req = request();
        req.interests.clear();
        assert!(invalid_message(req.validate()).contains("interest"));
    }

    #[test]
    fn test_unique_interests_keep_order() {
        let mut req = request();
        req.interests = vec![
            Interest::Nightlife,
            Interest::Heritage,
            Interest::Nightlife,
        ];
        assert_eq!(
            req.unique_interests(),
            vec![Interest::Nightlife, Interest::Heritage]
        );
    }

    #[test]
    fn test_request_deserializes_form_payload() {
        let req: ItineraryRequest = serde_json::from_value(json!({
            "region": "France",
            "budget": "2500",
            "travelDates": { "from": "2024-06-01", "to": "2024-06-07" },
            "interests": ["heritage", "adventure"]
        }))
        .unwrap();

        assert_eq!(req.budget, 2500.0);
        assert_eq!(req.travel_dates.to_string(), "2024-06-01 to 2024-06-07");
        assert_eq!(req.interests, vec![Interest::Heritage, Interest::Adventure]);
    }

    #[test]
    fn test_unknown_interest_is_rejected() {
        let result = serde_json::from_value::<ItineraryRequest>(json!({
            "region": "France",
            "budget": 100,
            "travelDates": { "from": "2024-06-01", "to": "2024-06-07" },
            "interests": ["shopping"]
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_non_numeric_budget_is_rejected() {
        let result = serde_json::from_value::<ItineraryRequest>(json!({
            "region": "France",
            "budget": "lots",
            "travelDates": { "from": "2024-06-01", "to": "2024-06-07" },
            "interests": ["heritage"]
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_interest_from_str() {
        assert_eq!("Heritage".parse::<Interest>().unwrap(), Interest::Heritage);
        assert_eq!(" nightlife ".parse::<Interest>().unwrap(), Interest::Nightlife);
        let err = "museums".parse::<Interest>().unwrap_err();
        assert!(err.contains("heritage, nightlife, adventure"));
    }

    #[test]
    fn test_adjustment_requires_itinerary() {
        let req = AdjustmentRequest::new("  ").with_weather("Rain");
        assert!(invalid_message(req.validate()).contains("Original itinerary"));
    }

    #[test]
    fn test_adjustment_requires_weather_or_delay() {
        let req = AdjustmentRequest::new("Day 1: Louvre");
        assert!(invalid_message(req.validate()).contains("weather or delay"));

        let blank = AdjustmentRequest::new("Day 1: Louvre")
            .with_weather("   ")
            .with_delay("");
        assert!(blank.validate().is_err());

        assert!(AdjustmentRequest::new("Day 1: Louvre")
            .with_weather("Heavy rain")
            .validate()
            .is_ok());
        assert!(AdjustmentRequest::new("Day 1: Louvre")
            .with_delay("Train delayed 3h")
            .validate()
            .is_ok());
    }

    #[test]
    fn test_adjustment_deserializes_empty_strings_as_blank() {
        let req: AdjustmentRequest = serde_json::from_value(json!({
            "originalItinerary": "Day 1",
            "currentWeather": "",
            "delayInfo": "Flight delayed"
        }))
        .unwrap();

        assert_eq!(req.weather(), None);
        assert_eq!(req.delay(), Some("Flight delayed"));
    }
}
