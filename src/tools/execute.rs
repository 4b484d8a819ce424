use crate::compose::{ComposeError, ExecuteOptions, Transport, execute_endpoint};
use crate::document::ApiDescription;
use crate::mcp::errors;
use crate::tools::{error_payload_result, error_result, optional_str, required_str, success_result};
use serde_json::{Map, Value};

pub fn call(doc: &ApiDescription, args: &Value, transport: &dyn Transport) -> Value {
    let (path, method) = match (required_str(args, "path"), required_str(args, "method")) {
        (Ok(path), Ok(method)) => (path, method),
        (Err(error), _) | (_, Err(error)) => return error,
    };
    let options = match parse_options(args) {
        Ok(options) => options,
        Err(message) => return error_result(errors::INVALID_INPUT, message),
    };

    match execute_endpoint(doc, path, method, &options, transport) {
        Ok(result) => success_result(result),
        Err(error) => error_payload_result(error_kind(&error), error.to_payload()),
    }
}

fn error_kind(error: &ComposeError) -> &'static str {
    match error {
        ComposeError::EndpointNotFound { .. } | ComposeError::MethodNotFound { .. } => {
            errors::NOT_FOUND
        }
        ComposeError::Timeout { .. } => errors::TIMEOUT,
        ComposeError::Transport { .. } => errors::TRANSPORT_FAILED,
    }
}

fn parse_options(args: &Value) -> Result<ExecuteOptions, String> {
    Ok(ExecuteOptions {
        base_url: optional_str(args, "baseUrl").map(str::to_string),
        path_params: object_arg(args, "pathParams")?,
        query_params: object_arg(args, "queryParams")?,
        headers: object_arg(args, "headers")?,
        body: args.get("body").filter(|body| !body.is_null()).cloned(),
    })
}

/// Absent or null is an empty map; anything other than an object is rejected.
fn object_arg(args: &Value, key: &str) -> Result<Map<String, Value>, String> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(Map::new()),
        Some(Value::Object(map)) => Ok(map.clone()),
        Some(_) => Err(format!("{key} must be an object")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::{InboundResponse, OutboundRequest, TransportError};
    use crate::query::fixtures::petstore;
    use indexmap::IndexMap;
    use serde_json::json;
    use std::cell::RefCell;

    struct ScriptedTransport {
        outcome: fn() -> Result<InboundResponse, TransportError>,
        sent: RefCell<Vec<OutboundRequest>>,
    }

    impl ScriptedTransport {
        fn new(outcome: fn() -> Result<InboundResponse, TransportError>) -> Self {
            Self {
                outcome,
                sent: RefCell::new(Vec::new()),
            }
        }
    }

    impl Transport for ScriptedTransport {
        fn send(&self, request: &OutboundRequest) -> Result<InboundResponse, TransportError> {
            self.sent.borrow_mut().push(request.clone());
            (self.outcome)()
        }
    }

    fn created() -> Result<InboundResponse, TransportError> {
        Ok(InboundResponse {
            status: 201,
            status_text: "Created".to_string(),
            headers: IndexMap::from([(
                "content-type".to_string(),
                "application/json; charset=utf-8".to_string(),
            )]),
            body: r#"{"id": 7}"#.to_string(),
        })
    }

    fn timed_out() -> Result<InboundResponse, TransportError> {
        Err(TransportError::Timeout("operation timed out".to_string()))
    }

    fn refused() -> Result<InboundResponse, TransportError> {
        Err(TransportError::Failed("connection refused".to_string()))
    }

    #[test]
    fn successful_call_is_wrapped() {
        let transport = ScriptedTransport::new(created);
        let args = json!({
            "path": "/pets",
            "method": "post",
            "baseUrl": "http://127.0.0.1:9",
            "body": {"name": "Rex"}
        });
        let result = call(&petstore(), &args, &transport);

        assert_eq!(result["isError"], json!(false));
        let body = &result["structuredContent"];
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["status"], json!(201));
        assert_eq!(body["data"], json!({"id": 7}));
        assert_eq!(body["method"], json!("POST"));

        let sent = transport.sent.borrow();
        assert_eq!(sent[0].url, "http://127.0.0.1:9/pets");
        assert_eq!(sent[0].body.as_deref(), Some(r#"{"name":"Rex"}"#));
    }

    #[test]
    fn unknown_endpoint_never_reaches_the_network() {
        let transport = ScriptedTransport::new(created);
        let result = call(
            &petstore(),
            &json!({"path": "/nope", "method": "get"}),
            &transport,
        );
        assert_eq!(
            result["structuredContent"],
            json!({"error": "Endpoint not found", "path": "/nope", "kind": "not_found"})
        );
        assert!(transport.sent.borrow().is_empty());
    }

    #[test]
    fn timeout_and_transport_failures_are_distinct() {
        let doc = petstore();
        let args = json!({"path": "/ping", "method": "get"});

        let result = call(&doc, &args, &ScriptedTransport::new(timed_out));
        assert_eq!(result["isError"], json!(true));
        assert_eq!(result["structuredContent"]["kind"], json!(errors::TIMEOUT));
        assert_eq!(
            result["structuredContent"]["url"],
            json!("https://petstore.example.com/v1/ping")
        );

        let result = call(&doc, &args, &ScriptedTransport::new(refused));
        assert_eq!(
            result["structuredContent"]["kind"],
            json!(errors::TRANSPORT_FAILED)
        );
        assert_eq!(
            result["structuredContent"]["error"],
            json!("connection refused")
        );
    }

    #[test]
    fn malformed_options_are_rejected() {
        let transport = ScriptedTransport::new(created);
        let result = call(
            &petstore(),
            &json!({"path": "/pets", "method": "get", "queryParams": "limit=1"}),
            &transport,
        );
        assert_eq!(
            result["structuredContent"]["error"],
            json!("queryParams must be an object")
        );
        assert!(transport.sent.borrow().is_empty());
    }
}
