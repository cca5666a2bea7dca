use crate::{
    error::{PlannerError, Result},
    schemas::SchemaHandle,
};
use jsonschema::{Draft, JSONSchema};
use serde_json::{json, Map, Value};

const MAX_SCHEMA_ERRORS: usize = 3;

/// Validate a model reply against the schema it was asked to follow
pub fn validate_structured_payload(schema: &SchemaHandle, payload: &Value) -> Result<()> {
    if !payload.is_object() {
        return Err(PlannerError::Validation(format!(
            "reply must be a JSON object matching the `{}` schema",
            schema.schema_name()
        )));
    }

    let validator = JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(schema.schema_json())
        .map_err(|err| {
            PlannerError::Validation(format!(
                "Failed to prepare `{}` schema for validation: {}",
                schema.schema_name(),
                err
            ))
        })?;

    if let Err(errors) = validator.validate(payload) {
        let mut details = Vec::new();
        let mut truncated = false;

        for (idx, error) in errors.enumerate() {
            if idx < MAX_SCHEMA_ERRORS {
                let mut path = error.instance_path.to_string();
                if path.is_empty() {
                    path = "<root>".to_string();
                }
                details.push(format!("{}: {}", path, error));
            } else {
                truncated = true;
                break;
            }
        }

        let mut detail_str = if details.is_empty() {
            "structured payload failed schema validation".to_string()
        } else {
            details.join("; ")
        };

        if truncated {
            detail_str.push_str("; additional errors truncated");
        }

        return Err(PlannerError::Validation(format!(
            "Structured payload does not match `{}` schema: {}",
            schema.schema_name(),
            detail_str
        )));
    }

    Ok(())
}

/// The `response_format` block asking an OpenAI-compatible endpoint for JSON
/// that follows `schema`.
///
/// Strict mode rejects the `$schema`/`title` keys schemars emits at the root,
/// so only the object shape is forwarded.
pub fn response_format(schema: &SchemaHandle) -> Value {
    let source = schema.schema_json();
    let mut shape = Map::new();
    shape.insert("type".to_string(), json!("object"));

    if let Some(description) = source.get("description") {
        shape.insert("description".to_string(), description.clone());
    }
    if let Some(properties) = source.get("properties") {
        shape.insert("properties".to_string(), properties.clone());
    }
    shape.insert("required".to_string(), json!(schema.required_fields()));
    shape.insert("additionalProperties".to_string(), json!(false));

    json!({
        "type": "json_schema",
        "json_schema": {
            "name": schema.schema_name(),
            "strict": true,
            "schema": Value::Object(shape)
        }
    })
}

/// Appended to the system prompt for endpoints that ignore `response_format`.
pub fn schema_instructions(schema: &SchemaHandle) -> String {
    format!(
        "Structured response requirement: reply with a single JSON object that strictly conforms to the `{}` schema, with the fields {}. Do not wrap it in prose.",
        schema.schema_name(),
        schema
            .required_fields()
            .iter()
            .map(|field| format!("`{field}`"))
            .collect::<Vec<_>>()
            .join(", ")
    )
}

/// Parse the assistant's text into JSON, unwrapping a fenced ```json block
/// if the model added one.
pub fn parse_structured_content(content: &str) -> Result<Value> {
    let trimmed = content.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();

    serde_json::from_str(body).map_err(|err| {
        PlannerError::Validation(format!("model reply was not valid JSON: {err}"))
    })
}
