use serde_json::json;

pub mod contracts;
pub mod errors;

pub fn tool_definitions() -> Vec<serde_json::Value> {
    vec![
        json!({
            "name": contracts::TOOL_LIST_ENDPOINTS,
            "description": "List every endpoint of the API with its HTTP methods and tags. Returns a light summary to save tokens.",
            "inputSchema": contracts::list_endpoints_schema()
        }),
        json!({
            "name": contracts::TOOL_GET_ENDPOINT_DETAILS,
            "description": "Full details of one endpoint: parameters, request body, responses and schemas.",
            "inputSchema": contracts::endpoint_details_schema()
        }),
        json!({
            "name": contracts::TOOL_SEARCH_ENDPOINTS,
            "description": "Search endpoints by keyword in paths, summaries, descriptions and tags. Results are sorted by relevance.",
            "inputSchema": contracts::search_endpoints_schema()
        }),
        json!({
            "name": contracts::TOOL_GET_SCHEMAS,
            "description": "Data schemas (DTOs) defined by the API. Without a name, lists every schema; with a name, returns the full schema.",
            "inputSchema": contracts::schemas_schema()
        }),
        json!({
            "name": contracts::TOOL_LIST_TAGS,
            "description": "List the tags used to categorize endpoints.",
            "inputSchema": contracts::no_arguments_schema()
        }),
        json!({
            "name": contracts::TOOL_GET_ENDPOINTS_BY_TAG,
            "description": "Every endpoint carrying a given tag.",
            "inputSchema": contracts::endpoints_by_tag_schema()
        }),
        json!({
            "name": contracts::TOOL_GET_API_INFO,
            "description": "API metadata: title, version, description, servers, contact and license.",
            "inputSchema": contracts::no_arguments_schema()
        }),
        json!({
            "name": contracts::TOOL_GET_SECURITY_SCHEMES,
            "description": "Authentication and authorization schemes offered by the API (OAuth2, API keys, bearer tokens).",
            "inputSchema": contracts::no_arguments_schema()
        }),
        json!({
            "name": contracts::TOOL_GET_SERVER_URLS,
            "description": "Server URLs declared by the API and their environments.",
            "inputSchema": contracts::no_arguments_schema()
        }),
        json!({
            "name": contracts::TOOL_VALIDATE_ENDPOINT_PATH,
            "description": "Check whether an endpoint path exists. When it does not, suggests similar paths to fix typos.",
            "inputSchema": contracts::validate_path_schema()
        }),
        json!({
            "name": contracts::TOOL_GET_SCHEMA_REFERENCES,
            "description": "Find the endpoints that use a schema. Useful for impact analysis before changing it.",
            "inputSchema": contracts::schema_references_schema()
        }),
        json!({
            "name": contracts::TOOL_GENERATE_CURL_EXAMPLE,
            "description": "Generate a curl command for an endpoint, with headers and an example request body.",
            "inputSchema": contracts::curl_example_schema()
        }),
        json!({
            "name": contracts::TOOL_GET_DEPRECATED_ENDPOINTS,
            "description": "List the endpoints marked as deprecated.",
            "inputSchema": contracts::no_arguments_schema()
        }),
        json!({
            "name": contracts::TOOL_EXECUTE_ENDPOINT,
            "description": "Call an API endpoint and return the live response. Required headers declared by the description are added automatically.",
            "inputSchema": contracts::execute_endpoint_schema()
        }),
    ]
}
