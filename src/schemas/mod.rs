//! JSON schemas for structured model replies.

pub mod schema;
pub mod validation;

pub use schema::{apply_doc_comments, CompletionSchema, SchemaHandle};
pub use validation::{
    parse_structured_content, response_format, schema_instructions, validate_structured_payload,
};
