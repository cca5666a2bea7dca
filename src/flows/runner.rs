use std::time::{Duration, Instant};

use tokio::time::timeout;
use tracing::{debug, info};

use super::{AdjustItinerary, Flow, GenerateItinerary};
use crate::{
    config::PlannerConfig,
    error::{PlannerError, Result},
    prompts::PromptRenderer,
    schemas::{
        parse_structured_content, response_format, schema_instructions,
        validate_structured_payload, CompletionSchema,
    },
    services::openai_client::{
        first_message_content, token_usage, ChatCompletionRequest, OpenAIClient,
    },
    types::{
        AdjustedItinerary, AdjustmentRequest, GeneratedItinerary, ItineraryRequest,
        StructuredPayload, Validate,
    },
};

/// Executes flows against the configured model. Immutable once built, so one
/// instance is shared across requests.
#[derive(Debug)]
pub struct FlowRunner {
    client: OpenAIClient,
    prompts: PromptRenderer,
    model: String,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
    timeout: Duration,
}

impl FlowRunner {
    pub fn new(config: &PlannerConfig) -> Result<Self> {
        Ok(Self {
            client: OpenAIClient::new(config)?,
            prompts: PromptRenderer::new()?,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            timeout: config.request_timeout,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn generate_itinerary(
        &self,
        request: &ItineraryRequest,
    ) -> Result<GeneratedItinerary> {
        self.run::<GenerateItinerary>(request).await
    }

    pub async fn adjust_itinerary(&self, request: &AdjustmentRequest) -> Result<AdjustedItinerary> {
        self.run::<AdjustItinerary>(request).await
    }

    /// Validate, render, call the model once, and decode its reply into
    /// `F::Output`.
    pub async fn run<F: Flow>(&self, input: &F::Input) -> Result<F::Output> {
        input.validate()?;

        let schema = F::Output::schema();
        let prompt = F::prompt(&self.prompts, input)?;
        debug!(target: "wanderplan::flow", flow = F::NAME, %prompt, "prompt rendered");

        let body = ChatCompletionRequest::new(self.model.as_str())
            .with_system(format!(
                "{}\n\n{}",
                F::SYSTEM_PROMPT,
                schema_instructions(schema)
            ))
            .with_user(prompt)
            .with_max_tokens(self.max_tokens)
            .with_temperature(self.temperature)
            .with_response_format(response_format(schema))
            .into_value();

        let started = Instant::now();
        let response = timeout(self.timeout, self.client.chat_completion(&body))
            .await
            .map_err(|_| {
                PlannerError::Timeout(format!(
                    "`{}` model call exceeded {}s",
                    F::NAME,
                    self.timeout.as_secs()
                ))
            })??;

        let content = first_message_content(&response)?;
        let payload = parse_structured_content(content)?;
        validate_structured_payload(schema, &payload)?;
        let output = StructuredPayload::new(schema.clone(), payload).deserialize::<F::Output>()?;

        let usage = token_usage(&response);
        info!(
            target: "wanderplan::flow",
            flow = F::NAME,
            model = %self.model,
            elapsed_ms = started.elapsed().as_millis() as u64,
            total_tokens = usage.map(|u| u.total_tokens),
            "flow completed"
        );

        Ok(output)
    }
}
