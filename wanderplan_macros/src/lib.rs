mod completion_schema;
mod schema_extraction;

use proc_macro::TokenStream;

/// Binds a struct to the JSON schema the model must answer with.
///
/// Generates a `wanderplan::schema::CompletionSchema` impl whose handle is
/// built once from `schemars::schema_for!`, titled with the struct name (or
/// `name = "..."`) and described by the struct's doc comment (or
/// `description = "..."`). Field doc comments become property descriptions.
///
/// ```ignore
/// #[derive(Debug, Serialize, Deserialize, JsonSchema)]
/// #[completion_schema(name = "GeneratedItinerary")]
/// pub struct GeneratedItinerary {
///     /// Day-by-day plan
///     pub itinerary: String,
/// }
/// ```
#[proc_macro_attribute]
pub fn completion_schema(attr: TokenStream, item: TokenStream) -> TokenStream {
    completion_schema::completion_schema(attr, item)
}
