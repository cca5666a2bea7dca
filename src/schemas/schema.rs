//! Named JSON schemas bound to the types the model answers with.

use std::{any::TypeId, sync::Arc};

use schemars::schema::{RootSchema, Schema};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A reply type's schema, built once per type and shared by every request.
#[derive(Clone, Debug)]
pub struct SchemaHandle {
    name: &'static str,
    type_name: &'static str,
    type_id: TypeId,
    json: Arc<Value>,
}

impl SchemaHandle {
    /// Bind a generated schema to `T`.
    ///
    /// # Panics
    ///
    /// If schemars produced a schema that `serde_json` cannot represent.
    pub fn new<T: 'static>(name: &'static str, type_name: &'static str, root: RootSchema) -> Self {
        let json = serde_json::to_value(&root)
            .unwrap_or_else(|err| panic!("schema for `{type_name}` is not valid JSON: {err}"));

        Self {
            name,
            type_name,
            type_id: TypeId::of::<T>(),
            json: Arc::new(json),
        }
    }

    pub fn schema_name(&self) -> &'static str {
        self.name
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn schema_json(&self) -> &Value {
        &self.json
    }

    /// Names of the properties the model must always fill in.
    pub fn required_fields(&self) -> Vec<&str> {
        self.json["required"]
            .as_array()
            .map(|fields| fields.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}

/// A type the model is asked to answer with, see `#[completion_schema]`.
pub trait CompletionSchema: DeserializeOwned + Send + Sync + 'static {
    fn schema() -> &'static SchemaHandle;
}

/// Titles the schema, and fills in descriptions schemars left empty: the
/// struct's from `description`, each property's from `field_docs` (keyed by
/// serialized property name).
pub fn apply_doc_comments(
    root: &mut RootSchema,
    title: &'static str,
    description: Option<&'static str>,
    field_docs: &[(&'static str, &'static str)],
) {
    let metadata = root.schema.metadata();
    metadata.title = Some(title.to_string());
    if metadata.description.is_none() {
        metadata.description = description.map(str::to_string);
    }

    let Some(object) = root.schema.object.as_mut() else {
        return;
    };
    for (property, doc) in field_docs {
        if let Some(Schema::Object(schema)) = object.properties.get_mut(*property) {
            schema
                .metadata()
                .description
                .get_or_insert_with(|| doc.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemars::{schema_for, JsonSchema};

    #[allow(dead_code)]
    #[derive(JsonSchema)]
    struct Stop {
        city: String,
        /// Nights spent here
        nights: u8,
    }

    #[test]
    fn test_docs_fill_gaps_without_overwriting() {
        let mut root = schema_for!(Stop);
        apply_doc_comments(
            &mut root,
            "TripStop",
            Some("One stop on the route"),
            &[("city", "City name"), ("nights", "ignored"), ("missing", "ignored")],
        );

        let handle = SchemaHandle::new::<Stop>("TripStop", "Stop", root);
        let json = handle.schema_json();
        assert_eq!(json["title"], "TripStop");
        assert_eq!(json["description"], "One stop on the route");
        assert_eq!(json["properties"]["city"]["description"], "City name");
        assert_eq!(json["properties"]["nights"]["description"], "Nights spent here");
        assert!(json["properties"].get("missing").is_none());

        let mut required = handle.required_fields();
        required.sort_unstable();
        assert_eq!(required, vec!["city", "nights"]);
        assert_eq!(handle.type_id(), TypeId::of::<Stop>());
    }
}
