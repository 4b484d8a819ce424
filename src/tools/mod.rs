use crate::compose::Transport;
use crate::mcp::{contracts, errors};
use crate::source::DocumentCache;
use serde::Serialize;
use serde_json::{Value, json};

pub mod catalog;
pub mod curl;
pub mod endpoints;
pub mod execute;

/// Everything a tool call needs: the description cache and the outbound transport.
pub struct ToolContext {
    cache: DocumentCache,
    transport: Box<dyn Transport>,
}

impl ToolContext {
    pub fn new(cache: DocumentCache, transport: Box<dyn Transport>) -> Self {
        Self { cache, transport }
    }

    pub fn call(&mut self, name: &str, args: &Value) -> Value {
        if !contracts::ALL_TOOLS.contains(&name) {
            return error_result(errors::INVALID_INPUT, "Unknown tool");
        }

        let doc = match self.cache.get() {
            Ok(doc) => doc,
            Err(error) => return error_result(errors::FETCH_FAILED, error.to_string()),
        };
        tracing::debug!(tool = name, "dispatching tool call");

        match name {
            contracts::TOOL_LIST_ENDPOINTS => endpoints::list(&doc, args),
            contracts::TOOL_GET_ENDPOINT_DETAILS => endpoints::details(&doc, args),
            contracts::TOOL_SEARCH_ENDPOINTS => endpoints::search(&doc, args),
            contracts::TOOL_GET_ENDPOINTS_BY_TAG => endpoints::by_tag(&doc, args),
            contracts::TOOL_VALIDATE_ENDPOINT_PATH => endpoints::validate_path(&doc, args),
            contracts::TOOL_GET_DEPRECATED_ENDPOINTS => endpoints::deprecated(&doc),
            contracts::TOOL_GET_SCHEMAS => catalog::schemas(&doc, args),
            contracts::TOOL_LIST_TAGS => catalog::tags(&doc),
            contracts::TOOL_GET_API_INFO => catalog::info(&doc),
            contracts::TOOL_GET_SECURITY_SCHEMES => catalog::security_schemes(&doc),
            contracts::TOOL_GET_SERVER_URLS => catalog::servers(&doc),
            contracts::TOOL_GET_SCHEMA_REFERENCES => catalog::schema_references(&doc, args),
            contracts::TOOL_GENERATE_CURL_EXAMPLE => curl::call(&doc, args),
            contracts::TOOL_EXECUTE_ENDPOINT => execute::call(&doc, args, &*self.transport),
            _ => error_result(errors::INVALID_INPUT, "Unknown tool"),
        }
    }
}

pub fn success_result(value: impl Serialize) -> Value {
    match serde_json::to_value(value) {
        Ok(structured) => envelope(structured, false),
        Err(error) => error_result(
            errors::INTERNAL_ERROR,
            format!("failed to serialize tool result: {error}"),
        ),
    }
}

pub fn error_result(kind: &'static str, message: impl Into<String>) -> Value {
    error_payload_result(kind, json!({ "error": message.into() }))
}

/// Error result built from a payload that already carries an `error` message.
pub fn error_payload_result(kind: &'static str, mut payload: Value) -> Value {
    if let Some(obj) = payload.as_object_mut() {
        obj.insert("kind".to_string(), json!(kind));
    }
    envelope(payload, true)
}

fn envelope(structured: Value, is_error: bool) -> Value {
    let text = serde_json::to_string_pretty(&structured).unwrap_or_default();
    json!({
        "content": [{"type": "text", "text": text}],
        "structuredContent": structured,
        "isError": is_error
    })
}

fn required_str<'a>(args: &'a Value, key: &str) -> Result<&'a str, Value> {
    args.get(key).and_then(Value::as_str).ok_or_else(|| {
        error_result(
            errors::INVALID_INPUT,
            format!("{key} is required and must be a string"),
        )
    })
}

fn optional_str<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args.get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::{InboundResponse, OutboundRequest, TransportError};
    use crate::source::SpecLocation;
    use std::path::PathBuf;

    struct OfflineTransport;

    impl Transport for OfflineTransport {
        fn send(&self, _request: &OutboundRequest) -> Result<InboundResponse, TransportError> {
            Err(TransportError::Failed("offline".to_string()))
        }
    }

    fn context(location: PathBuf) -> ToolContext {
        let cache = DocumentCache::new(Some(SpecLocation::File(location)), None).expect("cache");
        ToolContext::new(cache, Box::new(OfflineTransport))
    }

    fn petstore_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/petstore.json")
    }

    #[test]
    fn results_carry_pretty_text_and_structured_content() {
        let mut ctx = context(petstore_path());
        let result = ctx.call(contracts::TOOL_LIST_TAGS, &json!({}));
        assert_eq!(result["isError"], json!(false));
        assert_eq!(result["structuredContent"]["total"], json!(4));
        let text = result["content"][0]["text"].as_str().expect("text");
        let reparsed: Value = serde_json::from_str(text).expect("json text");
        assert_eq!(reparsed, result["structuredContent"]);
        assert!(text.contains('\n'));
    }

    #[test]
    fn unknown_tool_is_reported_without_loading() {
        let mut ctx = context(PathBuf::from("/definitely/not/here.json"));
        let result = ctx.call("dropDatabase", &json!({}));
        assert_eq!(result["isError"], json!(true));
        assert_eq!(result["structuredContent"]["error"], json!("Unknown tool"));
        assert_eq!(result["structuredContent"]["kind"], json!(errors::INVALID_INPUT));
    }

    #[test]
    fn fetch_failures_surface_as_tool_errors() {
        let mut ctx = context(PathBuf::from("/definitely/not/here.json"));
        let result = ctx.call(contracts::TOOL_LIST_ENDPOINTS, &json!({}));
        assert_eq!(result["isError"], json!(true));
        assert_eq!(result["structuredContent"]["kind"], json!(errors::FETCH_FAILED));
        let message = result["structuredContent"]["error"].as_str().expect("message");
        assert!(message.contains("/definitely/not/here.json"));
    }

    #[test]
    fn missing_required_argument_is_invalid_input() {
        let mut ctx = context(petstore_path());
        let result = ctx.call(contracts::TOOL_SEARCH_ENDPOINTS, &json!({"query": 3}));
        assert_eq!(result["isError"], json!(true));
        assert_eq!(result["structuredContent"]["kind"], json!(errors::INVALID_INPUT));
        assert_eq!(
            result["structuredContent"]["error"],
            json!("query is required and must be a string")
        );
    }

    #[test]
    fn every_tool_is_dispatched() {
        let mut ctx = context(petstore_path());
        for name in contracts::ALL_TOOLS {
            let result = ctx.call(name, &json!({}));
            assert_ne!(
                result["structuredContent"]["error"],
                json!("Unknown tool"),
                "{name} fell through dispatch"
            );
        }
    }
}
