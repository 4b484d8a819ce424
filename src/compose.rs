//! Builds live HTTP requests from an operation definition and runs them.
//!
//! [`compose_request`] is pure. [`execute_endpoint`] hands the composed request to a
//! [`Transport`], which is the only place that touches the network.

use crate::document::{ApiDescription, HttpMethod, Operation, SchemaNode};
use crate::query::base_url;
use indexmap::IndexMap;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;
use serde_json::{Map, Value, json};
use std::time::Duration;
use thiserror::Error;
use url::form_urlencoded;

/// Characters `encodeURIComponent` leaves alone: `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const PATH_PARAM: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Caller overrides for one live call.
#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    pub base_url: Option<String>,
    pub path_params: Map<String, Value>,
    pub query_params: Map<String, Value>,
    pub headers: Map<String, Value>,
    pub body: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: IndexMap<String, String>,
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InboundResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: IndexMap<String, String>,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("{0}")]
    Timeout(String),
    #[error("{0}")]
    Failed(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            TransportError::Timeout(error.to_string())
        } else {
            TransportError::Failed(error.to_string())
        }
    }
}

pub trait Transport {
    fn send(&self, request: &OutboundRequest) -> Result<InboundResponse, TransportError>;
}

/// Blocking HTTP client with an optional per-request deadline.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &OutboundRequest) -> Result<InboundResponse, TransportError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Patch => reqwest::Method::PATCH,
        };

        let mut builder = self.client.request(method, request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send()?;
        let status = response.status();
        let mut headers: IndexMap<String, String> = IndexMap::new();
        for (name, value) in response.headers() {
            let value = String::from_utf8_lossy(value.as_bytes());
            headers
                .entry(name.as_str().to_string())
                .and_modify(|existing| {
                    existing.push_str(", ");
                    existing.push_str(&value);
                })
                .or_insert_with(|| value.to_string());
        }
        let body = response.text()?;

        Ok(InboundResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    pub success: bool,
    pub status: u16,
    pub status_text: String,
    pub headers: IndexMap<String, String>,
    pub data: Value,
    pub url: String,
    pub method: &'static str,
}

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("Endpoint not found")]
    EndpointNotFound { path: String },
    #[error("Method not found for this endpoint")]
    MethodNotFound { path: String, method: String },
    #[error("{message}")]
    Timeout {
        url: String,
        method: &'static str,
        message: String,
    },
    #[error("{message}")]
    Transport {
        url: String,
        method: &'static str,
        message: String,
    },
}

impl ComposeError {
    /// Error object returned to the tool caller: the message plus whatever locates it.
    pub fn to_payload(&self) -> Value {
        let error = self.to_string();
        match self {
            ComposeError::EndpointNotFound { path } => json!({"error": error, "path": path}),
            ComposeError::MethodNotFound { path, method } => {
                json!({"error": error, "path": path, "method": method})
            }
            ComposeError::Timeout { url, method, .. }
            | ComposeError::Transport { url, method, .. } => {
                json!({"error": error, "url": url, "method": method})
            }
        }
    }
}

/// Resolves the operation and turns caller overrides into a concrete request.
pub fn compose_request(
    doc: &ApiDescription,
    path: &str,
    method: &str,
    options: &ExecuteOptions,
) -> Result<OutboundRequest, ComposeError> {
    let item = doc
        .path_item(path)
        .ok_or_else(|| ComposeError::EndpointNotFound {
            path: path.to_string(),
        })?;
    let (verb, operation) = HttpMethod::parse(method)
        .and_then(|verb| item.operation(verb).map(|operation| (verb, operation)))
        .ok_or_else(|| ComposeError::MethodNotFound {
            path: path.to_string(),
            method: method.to_string(),
        })?;

    let base = options
        .base_url
        .clone()
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| base_url(doc));
    let mut url = format!("{base}{path}");

    for (name, value) in &options.path_params {
        let encoded = utf8_percent_encode(&param_text(value), PATH_PARAM).to_string();
        url = url.replace(&format!("{{{name}}}"), &encoded);
    }

    let mut query = form_urlencoded::Serializer::new(String::new());
    for (name, value) in &options.query_params {
        query.append_pair(name, &param_text(value));
    }
    let query = query.finish();
    if !query.is_empty() {
        url.push('?');
        url.push_str(&query);
    }

    let body = options
        .body
        .as_ref()
        .filter(|_| verb.accepts_body())
        .and_then(|body| match body {
            Value::Null => None,
            Value::String(text) if text.is_empty() => None,
            Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        });

    Ok(OutboundRequest {
        method: verb,
        url,
        headers: compose_headers(operation, &options.headers),
        body,
    })
}

/// Composes and sends the request. Every failure comes back as a [`ComposeError`];
/// unknown paths and verbs never reach the transport.
pub fn execute_endpoint(
    doc: &ApiDescription,
    path: &str,
    method: &str,
    options: &ExecuteOptions,
    transport: &dyn Transport,
) -> Result<ExecutionResult, ComposeError> {
    let request = compose_request(doc, path, method, options)?;
    let verb = request.method.as_upper();
    tracing::info!(method = verb, url = %request.url, "calling live endpoint");

    let response = match transport.send(&request) {
        Ok(response) => response,
        Err(error) => {
            tracing::warn!(method = verb, url = %request.url, %error, "live call failed");
            let message = error.to_string();
            return Err(match error {
                TransportError::Timeout(_) => ComposeError::Timeout {
                    url: request.url,
                    method: verb,
                    message,
                },
                TransportError::Failed(_) => ComposeError::Transport {
                    url: request.url,
                    method: verb,
                    message,
                },
            });
        }
    };

    let is_json = response
        .headers
        .get("content-type")
        .is_some_and(|content_type| content_type.contains("application/json"));
    let data = if is_json {
        serde_json::from_str(&response.body).map_err(|error| ComposeError::Transport {
            url: request.url.clone(),
            method: verb,
            message: format!("invalid JSON response body: {error}"),
        })?
    } else {
        Value::String(response.body)
    };

    Ok(ExecutionResult {
        success: (200..300).contains(&response.status),
        status: response.status,
        status_text: response.status_text,
        headers: response.headers,
        data,
        url: request.url,
        method: verb,
    })
}

/// `Content-Type: application/json`, then required header parameters that carry an
/// example, then caller headers. Names compare case-insensitively.
fn compose_headers(
    operation: &Operation,
    overrides: &Map<String, Value>,
) -> IndexMap<String, String> {
    let mut headers = IndexMap::new();
    headers.insert("Content-Type".to_string(), DEFAULT_CONTENT_TYPE.to_string());

    for parameter in operation.parameters() {
        if !parameter.is_required_header() {
            continue;
        }
        let Some(name) = parameter.name() else {
            continue;
        };
        if find_header(&headers, name).is_some() {
            continue;
        }
        let example = parameter
            .schema
            .as_ref()
            .and_then(SchemaNode::as_object)
            .and_then(|schema| schema.example.as_ref())
            .filter(|example| !example.is_null());
        if let Some(example) = example {
            headers.insert(name.to_string(), param_text(example));
        }
    }

    for (name, value) in overrides {
        if let Some(existing) = find_header(&headers, name) {
            headers.shift_remove_index(existing);
        }
        headers.insert(name.clone(), param_text(value));
    }
    headers
}

fn find_header(headers: &IndexMap<String, String>, name: &str) -> Option<usize> {
    headers
        .keys()
        .position(|existing| existing.eq_ignore_ascii_case(name))
}

/// Text form of a loosely typed argument: strings verbatim, arrays comma-joined,
/// everything else as JSON.
fn param_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Array(items) => items.iter().map(param_text).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::fixtures::petstore;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    struct RecordingTransport {
        sent: RefCell<Vec<OutboundRequest>>,
        reply: Result<InboundResponse, fn() -> TransportError>,
    }

    impl RecordingTransport {
        fn replying(response: InboundResponse) -> Self {
            Self {
                sent: RefCell::new(Vec::new()),
                reply: Ok(response),
            }
        }

        fn failing(error: fn() -> TransportError) -> Self {
            Self {
                sent: RefCell::new(Vec::new()),
                reply: Err(error),
            }
        }
    }

    impl Transport for RecordingTransport {
        fn send(&self, request: &OutboundRequest) -> Result<InboundResponse, TransportError> {
            self.sent.borrow_mut().push(request.clone());
            match &self.reply {
                Ok(response) => Ok(response.clone()),
                Err(error) => Err(error()),
            }
        }
    }

    fn json_response(status: u16, body: &str) -> InboundResponse {
        InboundResponse {
            status,
            status_text: "OK".to_string(),
            headers: IndexMap::from([(
                "content-type".to_string(),
                "application/json; charset=utf-8".to_string(),
            )]),
            body: body.to_string(),
        }
    }

    fn options(value: Value) -> ExecuteOptions {
        let object = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default()
        };
        ExecuteOptions {
            base_url: value.get("baseUrl").and_then(Value::as_str).map(str::to_string),
            path_params: object("pathParams"),
            query_params: object("queryParams"),
            headers: object("headers"),
            body: value.get("body").cloned(),
        }
    }

    #[test]
    fn unknown_path_never_reaches_the_network() {
        let doc = petstore();
        let transport = RecordingTransport::replying(json_response(200, "{}"));
        let error = execute_endpoint(&doc, "/nope", "get", &ExecuteOptions::default(), &transport)
            .expect_err("unknown path");
        assert_eq!(error.to_payload(), json!({"error": "Endpoint not found", "path": "/nope"}));
        assert!(transport.sent.borrow().is_empty());
    }

    #[test]
    fn unknown_verb_never_reaches_the_network() {
        let doc = petstore();
        let transport = RecordingTransport::replying(json_response(200, "{}"));
        let error = execute_endpoint(&doc, "/ping", "DELETE", &ExecuteOptions::default(), &transport)
            .expect_err("unknown verb");
        assert_eq!(
            error.to_payload(),
            json!({"error": "Method not found for this endpoint", "path": "/ping", "method": "DELETE"})
        );
        assert!(transport.sent.borrow().is_empty());
    }

    #[test]
    fn path_and_query_parameters_are_encoded() {
        let doc = petstore();
        let request = compose_request(
            &doc,
            "/pets/{petId}",
            "get",
            &options(json!({
                "pathParams": {"petId": "a b/c"},
                "queryParams": {"q": "x&y", "page": 2, "ids": [1, 2]}
            })),
        )
        .expect("request");
        assert_eq!(
            request.url,
            "https://petstore.example.com/v1/pets/a%20b%2Fc?q=x%26y&page=2&ids=1%2C2"
        );
    }

    #[test]
    fn caller_base_url_wins() {
        let doc = petstore();
        let request = compose_request(
            &doc,
            "/ping",
            "get",
            &options(json!({"baseUrl": "http://127.0.0.1:9000"})),
        )
        .expect("request");
        assert_eq!(request.url, "http://127.0.0.1:9000/ping");
    }

    #[test]
    fn required_header_examples_are_injected_and_overridable() {
        let doc = petstore();
        let request =
            compose_request(&doc, "/pets", "get", &ExecuteOptions::default()).expect("request");
        assert_eq!(
            request.headers,
            IndexMap::from([
                ("Content-Type".to_string(), "application/json".to_string()),
                ("X-Request-Id".to_string(), "req-123".to_string()),
            ])
        );

        let request = compose_request(
            &doc,
            "/pets",
            "get",
            &options(json!({"headers": {"x-request-id": "mine", "content-type": "text/plain"}})),
        )
        .expect("request");
        assert_eq!(
            request.headers,
            IndexMap::from([
                ("x-request-id".to_string(), "mine".to_string()),
                ("content-type".to_string(), "text/plain".to_string()),
            ])
        );
    }

    #[test]
    fn loosely_typed_header_parameters_still_inject() {
        let doc: ApiDescription = serde_json::from_value(json!({
            "paths": {"/keys": {"get": {"parameters": [
                {"$ref": "#/components/parameters/Trace"},
                {
                    "name": "X-Api-Key",
                    "in": "header",
                    "required": "true",
                    "schema": {"type": "string", "example": "demo"}
                },
                {"name": "X-Free", "in": "header", "required": true, "schema": true}
            ]}}}
        }))
        .expect("doc");
        let request =
            compose_request(&doc, "/keys", "get", &ExecuteOptions::default()).expect("request");
        assert_eq!(
            request.headers,
            IndexMap::from([
                ("Content-Type".to_string(), "application/json".to_string()),
                ("X-Api-Key".to_string(), "demo".to_string()),
            ])
        );
    }

    #[test]
    fn body_only_for_verbs_that_carry_one() {
        let doc = petstore();
        let request = compose_request(
            &doc,
            "/pets",
            "post",
            &options(json!({"body": {"name": "rex"}})),
        )
        .expect("request");
        assert_eq!(request.body.as_deref(), Some(r#"{"name":"rex"}"#));

        let request = compose_request(
            &doc,
            "/users/{userId}",
            "put",
            &options(json!({"body": "<raw/>"})),
        )
        .expect("request");
        assert_eq!(request.body.as_deref(), Some("<raw/>"));

        let request = compose_request(
            &doc,
            "/pets",
            "get",
            &options(json!({"body": {"ignored": true}})),
        )
        .expect("request");
        assert!(request.body.is_none());
    }

    #[test]
    fn json_responses_are_parsed() {
        let doc = petstore();
        let transport = RecordingTransport::replying(json_response(200, r#"[{"id": 1}]"#));
        let result = execute_endpoint(&doc, "/pets", "get", &ExecuteOptions::default(), &transport)
            .expect("result");
        assert!(result.success);
        assert_eq!(result.data, json!([{"id": 1}]));
        assert_eq!(result.method, "GET");
        assert_eq!(transport.sent.borrow().len(), 1);
    }

    #[test]
    fn non_json_responses_stay_text_and_errors_are_not_success() {
        let doc = petstore();
        let transport = RecordingTransport::replying(InboundResponse {
            status: 503,
            status_text: "Service Unavailable".to_string(),
            headers: IndexMap::from([("content-type".to_string(), "text/plain".to_string())]),
            body: "down".to_string(),
        });
        let result = execute_endpoint(&doc, "/ping", "get", &ExecuteOptions::default(), &transport)
            .expect("result");
        assert!(!result.success);
        assert_eq!(result.status, 503);
        assert_eq!(result.data, json!("down"));
    }

    #[test]
    fn timeouts_are_distinct_from_other_failures() {
        let doc = petstore();
        let transport =
            RecordingTransport::failing(|| TransportError::Timeout("operation timed out".into()));
        let error = execute_endpoint(&doc, "/ping", "get", &ExecuteOptions::default(), &transport)
            .expect_err("timeout");
        assert!(matches!(error, ComposeError::Timeout { .. }));
        assert_eq!(
            error.to_payload(),
            json!({
                "error": "operation timed out",
                "url": "https://petstore.example.com/v1/ping",
                "method": "GET"
            })
        );

        let transport =
            RecordingTransport::failing(|| TransportError::Failed("connection refused".into()));
        let error = execute_endpoint(&doc, "/ping", "get", &ExecuteOptions::default(), &transport)
            .expect_err("transport");
        assert!(matches!(error, ComposeError::Transport { .. }));
    }

    #[test]
    fn malformed_json_body_is_a_transport_failure() {
        let doc = petstore();
        let transport = RecordingTransport::replying(json_response(200, "not json"));
        let error = execute_endpoint(&doc, "/ping", "get", &ExecuteOptions::default(), &transport)
            .expect_err("bad body");
        assert!(matches!(error, ComposeError::Transport { .. }));
    }
}
