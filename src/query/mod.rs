//! Read-only queries over a parsed [`ApiDescription`].
//!
//! Every function here borrows the document and returns a freshly built view; nothing
//! writes back into the description.

use crate::document::ApiDescription;

mod catalog;
mod curl;
mod endpoints;
mod example;
mod similarity;

pub use catalog::{
    SchemaLookup, all_tags, api_info, schema_references, schemas, security_schemes, server_urls,
};
pub use curl::curl_example;
pub use endpoints::{
    deprecated_endpoints, endpoint_details, endpoints_by_tag, list_endpoints, search_endpoints,
    validate_endpoint_path,
};

/// Target used when neither the caller nor the document names a server.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// First declared server (variables substituted) or [`DEFAULT_BASE_URL`].
pub fn base_url(doc: &ApiDescription) -> String {
    doc.first_server()
        .map(|server| server.resolved_url())
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::document::ApiDescription;

    pub fn petstore() -> ApiDescription {
        serde_json::from_str(include_str!("../../tests/fixtures/petstore.json"))
            .expect("petstore fixture")
    }
}
