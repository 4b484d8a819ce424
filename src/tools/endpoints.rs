use crate::document::ApiDescription;
use crate::mcp::contracts::MAX_SEARCH_RESULTS;
use crate::mcp::errors;
use crate::query;
use crate::tools::{error_result, optional_str, required_str, success_result};
use serde_json::{Value, json};

pub fn list(doc: &ApiDescription, args: &Value) -> Value {
    let mut endpoints = query::list_endpoints(doc);
    if let Some(tag) = optional_str(args, "tag") {
        endpoints.retain(|endpoint| endpoint.tags.contains(&tag));
    }

    success_result(json!({
        "total": endpoints.len(),
        "endpoints": endpoints,
    }))
}

pub fn details(doc: &ApiDescription, args: &Value) -> Value {
    let path = match required_str(args, "path") {
        Ok(path) => path,
        Err(error) => return error,
    };

    match query::endpoint_details(doc, path, optional_str(args, "method")) {
        Some(details) => success_result(details),
        None => error_result(errors::NOT_FOUND, "Endpoint not found"),
    }
}

pub fn search(doc: &ApiDescription, args: &Value) -> Value {
    let query_text = match required_str(args, "query") {
        Ok(query_text) => query_text,
        Err(error) => return error,
    };

    let hits = query::search_endpoints(doc, query_text);
    success_result(json!({
        "query": query_text,
        "resultsCount": hits.len(),
        "results": &hits[..hits.len().min(MAX_SEARCH_RESULTS)],
    }))
}

pub fn by_tag(doc: &ApiDescription, args: &Value) -> Value {
    let tag = match required_str(args, "tag") {
        Ok(tag) => tag,
        Err(error) => return error,
    };

    let endpoints = query::endpoints_by_tag(doc, tag);
    success_result(json!({
        "tag": tag,
        "total": endpoints.len(),
        "endpoints": endpoints,
    }))
}

pub fn validate_path(doc: &ApiDescription, args: &Value) -> Value {
    match required_str(args, "path") {
        Ok(path) => success_result(query::validate_endpoint_path(doc, path)),
        Err(error) => error,
    }
}

pub fn deprecated(doc: &ApiDescription) -> Value {
    success_result(query::deprecated_endpoints(doc))
}
