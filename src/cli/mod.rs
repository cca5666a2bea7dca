use crate::{
    actions::{adjust_itinerary_action, generate_itinerary_action},
    config::{self, PlannerConfig},
    server, AdjustmentRequest, FlowRunner, Interest, ItineraryRequest, TravelDates,
};
use anyhow::{anyhow, bail, Context};
use chrono::NaiveDate;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::{collections::HashMap, env, io::Read, net::SocketAddr, sync::Arc};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn command() -> Command {
    Command::new("wanderplan")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Personalized travel itineraries from a hosted LLM, with real-time adjustments")
        .subcommand_required(true)
        .arg(
            Arg::new("model")
                .short('m')
                .long("model")
                .value_name("MODEL")
                .global(true)
                .help("Model to use (or set WANDERPLAN_MODEL)"),
        )
        .arg(
            Arg::new("api-key")
                .short('k')
                .long("api-key")
                .value_name("KEY")
                .global(true)
                .help("API key (or set OPENAI_API_KEY env var)"),
        )
        .arg(
            Arg::new("base-url")
                .short('u')
                .long("base-url")
                .value_name("URL")
                .global(true)
                .help("OpenAI-compatible base URL (or set OPENAI_BASE_URL / OPENROUTER_BASE_URL)"),
        )
        .arg(
            Arg::new("timeout")
                .short('t')
                .long("timeout")
                .value_name("SECONDS")
                .global(true)
                .help("Model request timeout in seconds (or set WANDERPLAN_TIMEOUT_SECS)"),
        )
        .arg(
            Arg::new("temperature")
                .long("temperature")
                .value_name("TEMP")
                .global(true)
                .help("Sampling temperature between 0 and 2 (or set WANDERPLAN_TEMPERATURE)"),
        )
        .subcommand(
            Command::new("serve").about("Run the web front-end").arg(
                Arg::new("addr")
                    .long("addr")
                    .value_name("HOST:PORT")
                    .value_parser(value_parser!(SocketAddr))
                    .help("Listen address (or set WANDERPLAN_ADDR)"),
            ),
        )
        .subcommand(
            Command::new("generate")
                .about("Generate an itinerary from trip preferences")
                .arg(
                    Arg::new("region")
                        .long("region")
                        .required(true)
                        .help("Region or country, e.g. India"),
                )
                .arg(
                    Arg::new("budget")
                        .long("budget")
                        .required(true)
                        .value_parser(value_parser!(f64))
                        .help("Budget in USD"),
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .required(true)
                        .value_parser(parse_date)
                        .help("First travel day (YYYY-MM-DD)"),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .required(true)
                        .value_parser(parse_date)
                        .help("Last travel day (YYYY-MM-DD)"),
                )
                .arg(
                    Arg::new("interest")
                        .long("interest")
                        .required(true)
                        .action(ArgAction::Append)
                        .value_parser(value_parser!(Interest))
                        .help("heritage, nightlife or adventure; repeat for more"),
                ),
        )
        .subcommand(
            Command::new("adjust")
                .about("Adjust an itinerary for current weather or delays")
                .arg(
                    Arg::new("itinerary-file")
                        .long("itinerary-file")
                        .value_name("PATH")
                        .required(true)
                        .help("File holding the original itinerary, or - for stdin"),
                )
                .arg(Arg::new("weather").long("weather").help("Current weather"))
                .arg(Arg::new("delay").long("delay").help("Delay information")),
        )
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

/// Flags take precedence over the environment (and `.env`).
fn resolve_config(matches: &ArgMatches) -> anyhow::Result<PlannerConfig> {
    let overrides: HashMap<&str, String> = [
        ("api-key", config::ENV_API_KEY),
        ("base-url", config::ENV_BASE_URL),
        ("model", config::ENV_MODEL),
        ("timeout", config::ENV_TIMEOUT_SECS),
        ("temperature", config::ENV_TEMPERATURE),
    ]
    .into_iter()
    .filter_map(|(flag, key)| matches.get_one::<String>(flag).map(|v| (key, v.clone())))
    .collect();

    let config = PlannerConfig::from_lookup(|key| {
        overrides
            .get(key)
            .cloned()
            .or_else(|| env::var(key).ok())
    })?;
    Ok(config)
}

/// CLI entry point for the wanderplan binary
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = command().get_matches();
    let mut config = resolve_config(&matches)?;
    info!(model = %config.model, base_url = %config.base_url, "configuration loaded");

    match matches.subcommand() {
        Some(("serve", sub)) => {
            if let Some(addr) = sub.get_one::<SocketAddr>("addr") {
                config = config.with_addr(*addr);
            }
            let runner = Arc::new(FlowRunner::new(&config)?);
            server::serve(config.addr, runner).await?;
        }
        Some(("generate", sub)) => {
            let runner = FlowRunner::new(&config)?;
            let request = generate_request(sub)?;
            let itinerary = generate_itinerary_action(&runner, &request)
                .await
                .into_result()
                .map_err(|message| anyhow!(message))?;
            println!("{}", itinerary.itinerary);
        }
        Some(("adjust", sub)) => {
            let runner = FlowRunner::new(&config)?;
            let request = adjust_request(sub)?;
            let adjusted = adjust_itinerary_action(&runner, &request)
                .await
                .into_result()
                .map_err(|message| anyhow!(message))?;
            println!("Adjustment reason:\n{}\n", adjusted.reasoning);
            println!("{}", adjusted.adjusted_itinerary);
        }
        _ => bail!("unknown subcommand"),
    }

    Ok(())
}

fn generate_request(sub: &ArgMatches) -> anyhow::Result<ItineraryRequest> {
    let required = |name: &str| anyhow!("--{name} is required");

    Ok(ItineraryRequest {
        region: sub
            .get_one::<String>("region")
            .cloned()
            .ok_or_else(|| required("region"))?,
        budget: *sub.get_one::<f64>("budget").ok_or_else(|| required("budget"))?,
        travel_dates: TravelDates::new(
            *sub.get_one::<NaiveDate>("from").ok_or_else(|| required("from"))?,
            *sub.get_one::<NaiveDate>("to").ok_or_else(|| required("to"))?,
        ),
        interests: sub
            .get_many::<Interest>("interest")
            .map(|values| values.copied().collect())
            .unwrap_or_default(),
    })
}

fn adjust_request(sub: &ArgMatches) -> anyhow::Result<AdjustmentRequest> {
    let path = sub
        .get_one::<String>("itinerary-file")
        .ok_or_else(|| anyhow!("--itinerary-file is required"))?;

    let original = if path == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read itinerary from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?
    };

    Ok(AdjustmentRequest {
        original_itinerary: original,
        current_weather: sub.get_one::<String>("weather").cloned(),
        delay_info: sub.get_one::<String>("delay").cloned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_is_well_formed() {
        command().debug_assert();
    }

    #[test]
    fn test_generate_arguments_parse() {
        let matches = command()
            .try_get_matches_from([
                "wanderplan",
                "generate",
                "--region",
                "Peru",
                "--budget",
                "2400",
                "--from",
                "2025-05-01",
                "--to",
                "2025-05-09",
                "--interest",
                "adventure",
                "--interest",
                "heritage",
            ])
            .unwrap();

        let (_, sub) = matches.subcommand().unwrap();
        let request = generate_request(sub).unwrap();
        assert_eq!(request.region, "Peru");
        assert_eq!(request.budget, 2400.0);
        assert_eq!(request.travel_dates.days(), 9);
        assert_eq!(request.interests, vec![Interest::Adventure, Interest::Heritage]);
    }

    #[test]
    fn test_bad_date_and_interest_are_rejected() {
        let base = ["wanderplan", "generate", "--region", "Peru", "--budget", "1"];

        let bad_date = command().try_get_matches_from(
            base.iter()
                .copied()
                .chain(["--from", "05/01/2025", "--to", "2025-05-09", "--interest", "heritage"]),
        );
        assert!(bad_date.is_err());

        let bad_interest = command().try_get_matches_from(
            base.iter()
                .copied()
                .chain(["--from", "2025-05-01", "--to", "2025-05-09", "--interest", "golf"]),
        );
        assert!(bad_interest.is_err());
    }

    #[test]
    fn test_global_flags_override_environment() {
        let matches = command()
            .try_get_matches_from([
                "wanderplan",
                "serve",
                "--api-key",
                "sk-flag",
                "--model",
                "flag/model",
                "--temperature",
                "0.2",
            ])
            .unwrap();

        let config = resolve_config(&matches).unwrap();
        assert_eq!(config.api_key, "sk-flag");
        assert_eq!(config.model, "flag/model");
        assert_eq!(config.temperature, Some(0.2));
    }
}
