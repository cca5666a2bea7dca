use chrono::NaiveDate;
use wanderplan::{
    adjust_itinerary_action, generate_itinerary_action, AdjustmentRequest, FlowRunner, Interest,
    ItineraryRequest, PlannerConfig, TravelDates,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::try_init().ok();

    let config = PlannerConfig::from_env()?;
    let runner = FlowRunner::new(&config)?;

    println!("=== Trip Planner ({}) ===\n", runner.model());

    let request = ItineraryRequest {
        region: "Japan".to_string(),
        budget: 3200.0,
        travel_dates: TravelDates::new(
            NaiveDate::from_ymd_opt(2025, 11, 3).ok_or("bad start date")?,
            NaiveDate::from_ymd_opt(2025, 11, 9).ok_or("bad end date")?,
        ),
        interests: vec![Interest::Heritage, Interest::Nightlife],
    };
    println!(
        "Region: {} | Budget: {} USD | Dates: {}\n",
        request.region, request.budget, request.travel_dates
    );

    let plan = match generate_itinerary_action(&runner, &request).await.into_result() {
        Ok(plan) => plan,
        Err(message) => {
            eprintln!("{message}");
            return Ok(());
        }
    };
    println!("--- Itinerary ---\n{}\n", plan.itinerary);

    let adjustment = AdjustmentRequest::new(plan.itinerary)
        .with_weather("Typhoon warning for Kyoto on day 3")
        .with_delay("Shinkansen to Kyoto delayed by 4 hours");

    match adjust_itinerary_action(&runner, &adjustment).await.into_result() {
        Ok(adjusted) => {
            println!("--- Why it changed ---\n{}\n", adjusted.reasoning);
            println!("--- Adjusted Itinerary ---\n{}", adjusted.adjusted_itinerary);
        }
        Err(message) => eprintln!("{message}"),
    }

    Ok(())
}
