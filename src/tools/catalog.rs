use crate::document::ApiDescription;
use crate::mcp::errors;
use crate::query::{self, SchemaLookup};
use crate::tools::{error_result, optional_str, required_str, success_result};
use serde_json::{Value, json};

pub fn schemas(doc: &ApiDescription, args: &Value) -> Value {
    match query::schemas(doc, optional_str(args, "schemaName")) {
        None => error_result(errors::NOT_FOUND, "No schemas found"),
        Some(SchemaLookup::Single { schema: None, .. }) => {
            error_result(errors::NOT_FOUND, "Schema not found")
        }
        Some(lookup) => success_result(lookup),
    }
}

pub fn tags(doc: &ApiDescription) -> Value {
    let tags = query::all_tags(doc);
    success_result(json!({
        "total": tags.len(),
        "tags": tags,
    }))
}

pub fn info(doc: &ApiDescription) -> Value {
    success_result(query::api_info(doc))
}

pub fn security_schemes(doc: &ApiDescription) -> Value {
    match query::security_schemes(doc) {
        Some(schemes) => success_result(schemes),
        None => error_result(errors::NOT_FOUND, "No security schemes found"),
    }
}

pub fn servers(doc: &ApiDescription) -> Value {
    match query::server_urls(doc) {
        Some(servers) => success_result(json!({
            "total": servers.len(),
            "servers": servers,
        })),
        None => error_result(errors::NOT_FOUND, "No servers found"),
    }
}

pub fn schema_references(doc: &ApiDescription, args: &Value) -> Value {
    match required_str(args, "schemaName") {
        Ok(name) => success_result(query::schema_references(doc, name)),
        Err(error) => error,
    }
}
