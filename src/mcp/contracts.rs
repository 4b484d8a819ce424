use serde_json::json;

pub const TOOL_LIST_ENDPOINTS: &str = "listEndpoints";
pub const TOOL_GET_ENDPOINT_DETAILS: &str = "getEndpointDetails";
pub const TOOL_SEARCH_ENDPOINTS: &str = "searchEndpoints";
pub const TOOL_GET_SCHEMAS: &str = "getSchemas";
pub const TOOL_LIST_TAGS: &str = "listTags";
pub const TOOL_GET_ENDPOINTS_BY_TAG: &str = "getEndpointsByTag";
pub const TOOL_GET_API_INFO: &str = "getApiInfo";
pub const TOOL_GET_SECURITY_SCHEMES: &str = "getSecuritySchemes";
pub const TOOL_GET_SERVER_URLS: &str = "getServerUrls";
pub const TOOL_VALIDATE_ENDPOINT_PATH: &str = "validateEndpointPath";
pub const TOOL_GET_SCHEMA_REFERENCES: &str = "getSchemaReferences";
pub const TOOL_GENERATE_CURL_EXAMPLE: &str = "generateCurlExample";
pub const TOOL_GET_DEPRECATED_ENDPOINTS: &str = "getDeprecatedEndpoints";
pub const TOOL_EXECUTE_ENDPOINT: &str = "executeEndpoint";

pub const ALL_TOOLS: [&str; 14] = [
    TOOL_LIST_ENDPOINTS,
    TOOL_GET_ENDPOINT_DETAILS,
    TOOL_SEARCH_ENDPOINTS,
    TOOL_GET_SCHEMAS,
    TOOL_LIST_TAGS,
    TOOL_GET_ENDPOINTS_BY_TAG,
    TOOL_GET_API_INFO,
    TOOL_GET_SECURITY_SCHEMES,
    TOOL_GET_SERVER_URLS,
    TOOL_VALIDATE_ENDPOINT_PATH,
    TOOL_GET_SCHEMA_REFERENCES,
    TOOL_GENERATE_CURL_EXAMPLE,
    TOOL_GET_DEPRECATED_ENDPOINTS,
    TOOL_EXECUTE_ENDPOINT,
];

/// Search hits returned by `searchEndpoints`; `resultsCount` still reports the full count.
pub const MAX_SEARCH_RESULTS: usize = 20;

const METHODS: [&str; 5] = ["get", "post", "put", "delete", "patch"];

pub fn no_arguments_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {}
    })
}

pub fn list_endpoints_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "tag": {
                "type": "string",
                "description": "Only return endpoints carrying this tag (optional)"
            }
        }
    })
}

pub fn endpoint_details_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "path": {
                "type": "string",
                "description": "Endpoint path (e.g. /users/{id})"
            },
            "method": {
                "type": "string",
                "description": "HTTP method (optional, every method when omitted)",
                "enum": METHODS
            }
        },
        "required": ["path"]
    })
}

pub fn search_endpoints_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "query": {
                "type": "string",
                "description": "Search term"
            }
        },
        "required": ["query"]
    })
}

pub fn schemas_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "schemaName": {
                "type": "string",
                "description": "Name of the schema to return (optional)"
            }
        }
    })
}

pub fn endpoints_by_tag_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "tag": {
                "type": "string",
                "description": "Tag whose endpoints are returned"
            }
        },
        "required": ["tag"]
    })
}

pub fn validate_path_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "path": {
                "type": "string",
                "description": "Endpoint path to validate (e.g. /users/{id})"
            }
        },
        "required": ["path"]
    })
}

pub fn schema_references_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "schemaName": {
                "type": "string",
                "description": "Name of the schema to look for"
            }
        },
        "required": ["schemaName"]
    })
}

pub fn curl_example_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "path": {
                "type": "string",
                "description": "Endpoint path (e.g. /users/{id})"
            },
            "method": {
                "type": "string",
                "description": "HTTP method",
                "enum": METHODS
            }
        },
        "required": ["path", "method"]
    })
}

pub fn execute_endpoint_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "path": {
                "type": "string",
                "description": "Endpoint path (e.g. /users/{id})"
            },
            "method": {
                "type": "string",
                "description": "HTTP method",
                "enum": METHODS
            },
            "baseUrl": {
                "type": "string",
                "description": "Server base URL (optional, defaults to the first declared server)"
            },
            "pathParams": {
                "type": "object",
                "description": "Path parameters (e.g. {\"id\": \"123\"})"
            },
            "queryParams": {
                "type": "object",
                "description": "Query parameters (e.g. {\"page\": 1, \"perPage\": 10})"
            },
            "headers": {
                "type": "object",
                "description": "Extra headers (e.g. {\"Authorization\": \"Bearer token\"})"
            },
            "body": {
                "type": "object",
                "description": "Request body for POST/PUT/PATCH"
            }
        },
        "required": ["path", "method"]
    })
}
