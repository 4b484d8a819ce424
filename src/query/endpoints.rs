use super::similarity::similarity;
use crate::document::{ApiDescription, HttpMethod, Operation};
use indexmap::IndexSet;
use serde::Serialize;
use serde::ser::{SerializeStruct, Serializer};
use serde_json::Value;

const SUGGESTION_THRESHOLD: f64 = 0.4;
const MAX_SUGGESTIONS: usize = 5;

#[derive(Debug, Serialize)]
pub struct EndpointSummary<'a> {
    pub path: &'a str,
    pub methods: Vec<HttpMethod>,
    pub tags: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<&'a str>,
}

/// One entry per declared path.
pub fn list_endpoints(doc: &ApiDescription) -> Vec<EndpointSummary<'_>> {
    doc.paths()
        .map(|(path, item)| {
            let mut tags = IndexSet::new();
            let mut summary = None;
            for (_, operation) in item.operations() {
                tags.extend(operation.tags());
                if summary.is_none() {
                    summary = operation.summary().filter(|s| !s.is_empty());
                }
            }
            EndpointSummary {
                path,
                methods: item.methods(),
                tags: tags.into_iter().collect(),
                summary,
            }
        })
        .collect()
}

#[derive(Debug, Serialize)]
pub struct MethodDetails<'a> {
    pub method: HttpMethod,
    pub details: &'a Operation,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum EndpointDetails<'a> {
    /// A single verb was asked for. `details` is absent when the path does not define it.
    Method {
        path: &'a str,
        method: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        details: Option<&'a Operation>,
    },
    All {
        path: &'a str,
        methods: Vec<MethodDetails<'a>>,
    },
}

pub fn endpoint_details<'a>(
    doc: &'a ApiDescription,
    path: &str,
    method: Option<&str>,
) -> Option<EndpointDetails<'a>> {
    let (path, item) = doc.path_entry(path)?;

    let details = match method {
        Some(method) => EndpointDetails::Method {
            path,
            method: method.to_lowercase(),
            details: HttpMethod::parse(method).and_then(|method| item.operation(method)),
        },
        None => EndpointDetails::All {
            path,
            methods: item
                .operations()
                .map(|(method, details)| MethodDetails { method, details })
                .collect(),
        },
    };
    Some(details)
}

#[derive(Debug, Serialize)]
pub struct SearchHit<'a> {
    pub path: &'a str,
    pub method: HttpMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<&'a Value>,
    pub score: u32,
}

/// Case-insensitive keyword search, best matches first.
///
/// Path hits weigh 3, summary and tag hits 2, description hits 1. Ties keep document order.
pub fn search_endpoints<'a>(doc: &'a ApiDescription, query: &str) -> Vec<SearchHit<'a>> {
    let needle = query.to_lowercase();
    let contains = |haystack: Option<&str>| {
        haystack.is_some_and(|text| text.to_lowercase().contains(&needle))
    };

    let mut hits: Vec<SearchHit<'a>> = doc
        .operations()
        .filter_map(|(path, method, operation)| {
            let mut score = 0;
            if contains(Some(path)) {
                score += 3;
            }
            if contains(operation.summary()) {
                score += 2;
            }
            if contains(operation.description()) {
                score += 1;
            }
            if operation.tags().any(|tag| contains(Some(tag))) {
                score += 2;
            }
            (score > 0).then(|| SearchHit {
                path,
                method,
                summary: operation.summary(),
                tags: operation.tags.as_ref(),
                score,
            })
        })
        .collect();

    hits.sort_by(|a, b| b.score.cmp(&a.score));
    hits
}

#[derive(Debug, Serialize)]
pub struct TaggedEndpoint<'a> {
    pub path: &'a str,
    pub method: HttpMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    pub deprecated: bool,
}

/// Operations carrying exactly `tag` (case-sensitive).
pub fn endpoints_by_tag<'a>(doc: &'a ApiDescription, tag: &str) -> Vec<TaggedEndpoint<'a>> {
    doc.operations()
        .filter(|(_, _, operation)| operation.tags().any(|t| t == tag))
        .map(|(path, method, operation)| TaggedEndpoint {
            path,
            method,
            summary: operation.summary(),
            description: operation.description(),
            deprecated: operation.is_deprecated(),
        })
        .collect()
}

#[derive(Debug)]
pub enum PathValidation<'a> {
    Found {
        path: &'a str,
        methods: Vec<HttpMethod>,
    },
    Missing {
        suggestions: Vec<&'a str>,
    },
}

impl Serialize for PathValidation<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PathValidation::Found { path, methods } => {
                let mut state = serializer.serialize_struct("PathValidation", 3)?;
                state.serialize_field("exists", &true)?;
                state.serialize_field("path", path)?;
                state.serialize_field("methods", methods)?;
                state.end()
            }
            PathValidation::Missing { suggestions } => {
                let mut state = serializer.serialize_struct("PathValidation", 2)?;
                state.serialize_field("exists", &false)?;
                state.serialize_field("suggestions", suggestions)?;
                state.end()
            }
        }
    }
}

/// Confirms a path exists or proposes up to five close matches for it.
pub fn validate_endpoint_path<'a>(doc: &'a ApiDescription, path: &str) -> PathValidation<'a> {
    if let Some((path, item)) = doc.path_entry(path) {
        return PathValidation::Found {
            path,
            methods: item.methods(),
        };
    }

    let mut scored: Vec<(&str, f64)> = doc
        .paths()
        .map(|(candidate, _)| (candidate, similarity(path, candidate)))
        .filter(|(_, score)| *score > SUGGESTION_THRESHOLD)
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));

    PathValidation::Missing {
        suggestions: scored
            .into_iter()
            .take(MAX_SUGGESTIONS)
            .map(|(candidate, _)| candidate)
            .collect(),
    }
}

#[derive(Debug, Serialize)]
pub struct DeprecatedEndpoint<'a> {
    pub path: &'a str,
    pub method: HttpMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct DeprecatedEndpoints<'a> {
    pub total: usize,
    pub endpoints: Vec<DeprecatedEndpoint<'a>>,
}

pub fn deprecated_endpoints(doc: &ApiDescription) -> DeprecatedEndpoints<'_> {
    let endpoints: Vec<_> = doc
        .operations()
        .filter(|(_, _, operation)| operation.is_deprecated())
        .map(|(path, method, operation)| DeprecatedEndpoint {
            path,
            method,
            summary: operation.summary(),
            description: operation.description(),
        })
        .collect();
    DeprecatedEndpoints {
        total: endpoints.len(),
        endpoints,
    }
}
