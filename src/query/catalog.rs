use crate::document::{ApiDescription, HttpMethod, SchemaNode, Server};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SchemaLookup<'a> {
    Single {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        schema: Option<&'a SchemaNode>,
    },
    #[serde(rename_all = "camelCase")]
    Catalog {
        schema_names: Vec<&'a str>,
        count: usize,
    },
}

/// `None` when the document has no `components.schemas` section at all.
pub fn schemas<'a>(doc: &'a ApiDescription, name: Option<&str>) -> Option<SchemaLookup<'a>> {
    let schemas = doc.schemas()?;
    let lookup = match name {
        Some(name) => SchemaLookup::Single {
            name: name.to_string(),
            schema: schemas.get(name),
        },
        None => SchemaLookup::Catalog {
            schema_names: schemas.keys().map(String::as_str).collect(),
            count: schemas.len(),
        },
    };
    Some(lookup)
}

/// Sorted, de-duplicated tags of every operation.
pub fn all_tags(doc: &ApiDescription) -> Vec<&str> {
    doc.operations()
        .flat_map(|(_, _, operation)| operation.tags())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiInfo<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terms_of_service: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servers: Option<&'a [Server]>,
}

pub fn api_info(doc: &ApiDescription) -> ApiInfo<'_> {
    let info = doc.info.as_ref();
    ApiInfo {
        title: info.and_then(|info| info.title.as_ref()),
        version: info.and_then(|info| info.version.as_ref()),
        description: info.and_then(|info| info.description.as_ref()),
        terms_of_service: info.and_then(|info| info.terms_of_service.as_ref()),
        contact: info.and_then(|info| info.contact.as_ref()),
        license: info.and_then(|info| info.license.as_ref()),
        servers: doc.servers.as_deref(),
    }
}

#[derive(Debug, Serialize)]
pub struct SecuritySchemes<'a> {
    pub schemes: &'a IndexMap<String, Value>,
    pub count: usize,
}

pub fn security_schemes(doc: &ApiDescription) -> Option<SecuritySchemes<'_>> {
    let schemes = doc
        .components
        .as_ref()
        .and_then(|components| components.security_schemes.as_ref())?;
    Some(SecuritySchemes {
        schemes,
        count: schemes.len(),
    })
}

/// Declared servers, or `None` when the list is absent or empty.
pub fn server_urls(doc: &ApiDescription) -> Option<&[Server]> {
    doc.servers
        .as_deref()
        .filter(|servers| !servers.is_empty())
}

#[derive(Debug, Serialize)]
pub struct SchemaUsage<'a> {
    pub path: &'a str,
    pub method: HttpMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaReferences<'a> {
    pub schema_name: String,
    pub usage_count: usize,
    pub used_by: Vec<SchemaUsage<'a>>,
}

/// Operations whose serialized JSON mentions `#/components/schemas/<name>`.
///
/// This is a plain substring scan: `Pet` also matches operations that only reference
/// `PetList`.
pub fn schema_references<'a>(doc: &'a ApiDescription, name: &str) -> SchemaReferences<'a> {
    let needle = format!("#/components/schemas/{name}");
    let used_by: Vec<_> = doc
        .operations()
        .filter(|(_, _, operation)| {
            serde_json::to_string(operation).is_ok_and(|text| text.contains(&needle))
        })
        .map(|(path, method, operation)| SchemaUsage {
            path,
            method,
            summary: operation.summary(),
        })
        .collect();
    SchemaReferences {
        schema_name: name.to_string(),
        usage_count: used_by.len(),
        used_by,
    }
}
