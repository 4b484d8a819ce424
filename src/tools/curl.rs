use crate::document::ApiDescription;
use crate::mcp::errors;
use crate::query;
use crate::tools::{error_result, required_str, success_result};
use serde_json::Value;

pub fn call(doc: &ApiDescription, args: &Value) -> Value {
    let (path, method) = match (required_str(args, "path"), required_str(args, "method")) {
        (Ok(path), Ok(method)) => (path, method),
        (Err(error), _) | (_, Err(error)) => return error,
    };

    match query::curl_example(doc, path, method) {
        Some(example) => success_result(example),
        None => error_result(errors::NOT_FOUND, "Endpoint not found"),
    }
}
