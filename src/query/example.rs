use crate::document::{ApiDescription, SchemaKind, SchemaNode};
use serde_json::{Map, Value, json};

/// Builds a representative value for `schema`, following `$ref`s into
/// `components.schemas`.
///
/// A reference back to a schema that is already being expanded yields `null` at that
/// position, so self-referential models terminate. Boolean schemas also yield `null`.
pub fn synthesize_example(doc: &ApiDescription, schema: &SchemaNode) -> Value {
    let mut expanding = Vec::new();
    synthesize(doc, schema, &mut expanding)
}

fn synthesize<'a>(
    doc: &'a ApiDescription,
    node: &'a SchemaNode,
    expanding: &mut Vec<&'a str>,
) -> Value {
    let Some(schema) = node.as_object() else {
        return Value::Null;
    };

    if let Some(name) = schema.reference_name()
        && let Some(resolved) = doc.schema(name)
    {
        if expanding.contains(&name) {
            return Value::Null;
        }
        expanding.push(name);
        let value = synthesize(doc, resolved, expanding);
        expanding.pop();
        return value;
    }

    if let Some(example) = &schema.example {
        return example.clone();
    }

    match schema.kind() {
        Some(SchemaKind::Object) => {
            let mut object = Map::new();
            for (key, property) in schema.properties.iter().flatten() {
                object.insert(key.clone(), synthesize(doc, property, expanding));
            }
            Value::Object(object)
        }
        Some(SchemaKind::Array) => {
            // Missing `items` behaves like an empty schema, which synthesizes to `null`.
            let item = match &schema.items {
                Some(items) => synthesize(doc, items, expanding),
                None => Value::Null,
            };
            Value::Array(vec![item])
        }
        Some(SchemaKind::String) => schema
            .enum_values
            .as_ref()
            .and_then(Value::as_array)
            .and_then(|values| values.first())
            .filter(|value| !value.is_null())
            .cloned()
            .unwrap_or_else(|| json!("string")),
        Some(SchemaKind::Number | SchemaKind::Integer) => json!(0),
        Some(SchemaKind::Boolean) => json!(true),
        None => Value::Null,
    }
}
