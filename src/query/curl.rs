use super::base_url;
use super::example::synthesize_example;
use crate::document::{ApiDescription, HttpMethod};
use serde::Serialize;

const AUTH_PLACEHOLDER: &str = "Authorization: Bearer YOUR_TOKEN_HERE";

#[derive(Debug, Serialize)]
pub struct CurlExample<'a> {
    pub path: &'a str,
    pub method: &'static str,
    pub curl: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
}

/// Ready-to-paste curl command for one operation, with a synthesized JSON body.
///
/// `None` when the path or the verb is not declared.
pub fn curl_example<'a>(
    doc: &'a ApiDescription,
    path: &str,
    method: &str,
) -> Option<CurlExample<'a>> {
    let (path, item) = doc.path_entry(path)?;
    let method = HttpMethod::parse(method)?;
    let operation = item.operation(method)?;

    let mut curl = format!("curl -X {} \"{}{}\"", method.as_upper(), base_url(doc), path);

    let body = operation.first_body_content();
    let mut headers = Vec::new();
    if let Some((content_type, _)) = body {
        headers.push(format!("Content-Type: {content_type}"));
    }
    if operation.security.is_some() || doc.security.is_some() {
        headers.push(AUTH_PLACEHOLDER.to_string());
    }
    for header in headers {
        curl.push_str(&format!(" \\\n  -H \"{header}\""));
    }

    if let Some(schema) = body.and_then(|(_, media)| media.schema.as_ref()) {
        let example = synthesize_example(doc, schema);
        let pretty = serde_json::to_string_pretty(&example).unwrap_or_default();
        curl.push_str(&format!(" \\\n  -d '{pretty}'"));
    }

    Some(CurlExample {
        path,
        method: method.as_upper(),
        curl,
        description: operation.summary(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::fixtures::petstore;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn bare_get_has_no_headers_or_body() {
        let doc: ApiDescription =
            serde_json::from_value(json!({"paths": {"/ping": {"get": {"summary": "Ping"}}}}))
                .expect("doc");
        let example = curl_example(&doc, "/ping", "get").expect("example");
        assert_eq!(example.curl, "curl -X GET \"http://localhost:3000/ping\"");
        assert_eq!(example.method, "GET");
        assert_eq!(example.description, Some("Ping"));
    }

    #[test]
    fn body_and_auth_headers() {
        let doc = petstore();
        let example = curl_example(&doc, "/pets", "post").expect("example");
        let expected = [
            "curl -X POST \"https://petstore.example.com/v1/pets\" \\",
            "  -H \"Content-Type: application/json\" \\",
            "  -H \"Authorization: Bearer YOUR_TOKEN_HERE\" \\",
            "  -d '{",
            "  \"name\": \"doggie\",",
            "  \"tag\": \"string\"",
            "}'",
        ]
        .join("\n");
        assert_eq!(example.curl, expected);
    }

    #[test]
    fn document_level_security_adds_auth() {
        let doc: ApiDescription = serde_json::from_value(json!({
            "security": [{"bearerAuth": []}],
            "paths": {"/me": {"get": {}}}
        }))
        .expect("doc");
        let example = curl_example(&doc, "/me", "GET").expect("example");
        assert!(example.curl.contains("-H \"Authorization: Bearer YOUR_TOKEN_HERE\""));
        assert!(example.description.is_none());
    }

    #[test]
    fn enum_values_feed_the_body() {
        let doc = petstore();
        let example = curl_example(&doc, "/store/orders", "post").expect("example");
        assert!(example.curl.contains("\"status\": \"placed\""));
        assert!(example.curl.contains("\"complete\": true"));
        assert!(!example.curl.contains("Authorization"));
    }

    #[test]
    fn unknown_path_or_verb_is_none() {
        let doc = petstore();
        assert!(curl_example(&doc, "/nope", "get").is_none());
        assert!(curl_example(&doc, "/ping", "post").is_none());
        assert!(curl_example(&doc, "/ping", "trace").is_none());
    }
}
