//! Typed, read-only view of an OpenAPI description.
//!
//! Only the parts the query engine reads are modelled as fields. Everything else is kept
//! verbatim in `extras` maps so that serializing an operation or schema reproduces what the
//! document declared.
//!
//! Descriptions are not validated. Scalars that are usually strings or booleans are held as
//! raw [`Value`]s and read through accessors, so `version: 1.0` or `required: "true"` never
//! reject a document.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    /// Case-insensitive parse of a caller-supplied verb.
    pub fn parse(value: &str) -> Option<Self> {
        Self::from_key(&value.to_ascii_lowercase())
    }

    /// Exact match against a path-item key. Path items only declare lowercase verbs.
    fn from_key(key: &str) -> Option<Self> {
        match key {
            "get" => Some(HttpMethod::Get),
            "post" => Some(HttpMethod::Post),
            "put" => Some(HttpMethod::Put),
            "delete" => Some(HttpMethod::Delete),
            "patch" => Some(HttpMethod::Patch),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
            HttpMethod::Patch => "patch",
        }
    }

    pub fn as_upper(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }

    pub fn accepts_body(self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiDescription {
    #[serde(default)]
    pub info: Option<Info>,
    #[serde(default)]
    pub servers: Option<Vec<Server>>,
    #[serde(default)]
    pub paths: Option<IndexMap<String, PathItem>>,
    #[serde(default)]
    pub components: Option<Components>,
    #[serde(default)]
    pub security: Option<Value>,
}

impl ApiDescription {
    pub fn paths(&self) -> impl Iterator<Item = (&str, &PathItem)> {
        self.paths
            .iter()
            .flat_map(|paths| paths.iter())
            .map(|(path, item)| (path.as_str(), item))
    }

    pub fn path_item(&self, path: &str) -> Option<&PathItem> {
        self.path_entry(path).map(|(_, item)| item)
    }

    /// Like [`ApiDescription::path_item`] but also hands back the document's own key.
    pub fn path_entry(&self, path: &str) -> Option<(&str, &PathItem)> {
        self.paths
            .as_ref()
            .and_then(|paths| paths.get_key_value(path))
            .map(|(key, item)| (key.as_str(), item))
    }

    /// Every operation of the document, in declaration order.
    pub fn operations(&self) -> impl Iterator<Item = (&str, HttpMethod, &Operation)> {
        self.paths().flat_map(|(path, item)| {
            item.operations()
                .map(move |(method, operation)| (path, method, operation))
        })
    }

    pub fn schemas(&self) -> Option<&IndexMap<String, SchemaNode>> {
        self.components
            .as_ref()
            .and_then(|components| components.schemas.as_ref())
    }

    pub fn schema(&self, name: &str) -> Option<&SchemaNode> {
        self.schemas().and_then(|schemas| schemas.get(name))
    }

    pub fn first_server(&self) -> Option<&Server> {
        self.servers.as_ref().and_then(|servers| servers.first())
    }
}

/// String content of an optional raw scalar.
fn text(value: &Option<Value>) -> Option<&str> {
    value.as_ref().and_then(Value::as_str)
}

/// Strings verbatim, numbers and booleans in their JSON spelling.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(_) | Value::Bool(_) => Some(value.to_string()),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Info {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terms_of_service: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Server {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<IndexMap<String, ServerVariable>>,
}

impl Server {
    /// Server URL with every `{name}` placeholder replaced by its declared default.
    /// An absent or non-string `url` resolves to an empty string.
    pub fn resolved_url(&self) -> String {
        let mut url = self.url().unwrap_or_default().to_string();
        for (name, variable) in self.variables.iter().flatten() {
            if let Some(default) = variable.default.as_ref().and_then(scalar_text) {
                url = url.replace(&format!("{{{name}}}"), &default);
            }
        }
        url
    }

    pub fn url(&self) -> Option<&str> {
        text(&self.url)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerVariable {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Components {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schemas: Option<IndexMap<String, SchemaNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_schemes: Option<IndexMap<String, Value>>,
    #[serde(flatten)]
    pub extras: IndexMap<String, Value>,
}

/// Operations of one path, keyed by verb in the order the document declares them.
///
/// Keys other than the five supported verbs (`parameters`, `$ref`, `options`, ...) are kept
/// in `extras` and never surface as operations.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(try_from = "IndexMap<String, Value>")]
pub struct PathItem {
    operations: IndexMap<HttpMethod, Operation>,
    extras: IndexMap<String, Value>,
}

impl PathItem {
    pub fn operations(&self) -> impl Iterator<Item = (HttpMethod, &Operation)> {
        self.operations
            .iter()
            .map(|(method, operation)| (*method, operation))
    }

    pub fn methods(&self) -> Vec<HttpMethod> {
        self.operations.keys().copied().collect()
    }

    pub fn operation(&self, method: HttpMethod) -> Option<&Operation> {
        self.operations.get(&method)
    }
}

impl TryFrom<IndexMap<String, Value>> for PathItem {
    type Error = serde_json::Error;

    fn try_from(raw: IndexMap<String, Value>) -> Result<Self, Self::Error> {
        let mut item = PathItem::default();
        for (key, value) in raw {
            match HttpMethod::from_key(&key) {
                Some(method) => {
                    let operation = serde_json::from_value(value)?;
                    item.operations.insert(method, operation);
                }
                None => {
                    item.extras.insert(key, value);
                }
            }
        }
        Ok(item)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<Parameter>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responses: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<Value>,
    #[serde(flatten)]
    pub extras: IndexMap<String, Value>,
}

impl Operation {
    /// String entries of `tags`. Anything else in the list is skipped.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags
            .as_ref()
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
    }

    pub fn summary(&self) -> Option<&str> {
        text(&self.summary)
    }

    pub fn description(&self) -> Option<&str> {
        text(&self.description)
    }

    pub fn parameters(&self) -> &[Parameter] {
        self.parameters.as_deref().unwrap_or_default()
    }

    /// Only a literal boolean `true` marks an operation deprecated.
    pub fn is_deprecated(&self) -> bool {
        matches!(self.deprecated, Some(Value::Bool(true)))
    }

    /// First declared request-body media type and its schema, if any.
    pub fn first_body_content(&self) -> Option<(&str, &MediaType)> {
        self.request_body
            .as_ref()
            .and_then(|body| body.content.as_ref())
            .and_then(|content| content.first())
            .map(|(content_type, media)| (content_type.as_str(), media))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterLocation {
    Query,
    Path,
    Header,
    Cookie,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Parameter {
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    #[serde(rename = "in", default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaNode>,
    #[serde(flatten)]
    pub extras: IndexMap<String, Value>,
}

impl Parameter {
    pub fn name(&self) -> Option<&str> {
        text(&self.name)
    }

    pub fn location(&self) -> Option<ParameterLocation> {
        match text(&self.location)? {
            "query" => Some(ParameterLocation::Query),
            "path" => Some(ParameterLocation::Path),
            "header" => Some(ParameterLocation::Header),
            "cookie" => Some(ParameterLocation::Cookie),
            _ => None,
        }
    }

    /// `required` counts when it is `true` or the string `"true"` in any case.
    pub fn is_required(&self) -> bool {
        match &self.required {
            Some(Value::Bool(required)) => *required,
            Some(Value::String(required)) => required.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    pub fn is_required_header(&self) -> bool {
        self.location() == Some(ParameterLocation::Header) && self.is_required()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestBody {
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<IndexMap<String, MediaType>>,
    #[serde(flatten)]
    pub extras: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaNode>,
    #[serde(flatten)]
    pub extras: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    Object,
    Array,
    String,
    Number,
    Integer,
    Boolean,
}

/// A schema position. OpenAPI 3.1 allows a bare `true` or `false` wherever a schema object
/// can appear; those serialize back as the same boolean.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaNode {
    Boolean(bool),
    Object(Box<Schema>),
}

impl SchemaNode {
    pub fn as_object(&self) -> Option<&Schema> {
        match self {
            SchemaNode::Object(schema) => Some(schema),
            SchemaNode::Boolean(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, SchemaNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<SchemaNode>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    #[serde(flatten)]
    pub extras: IndexMap<String, Value>,
}

impl Schema {
    /// Name targeted by `$ref`: the segment after the last `/`.
    pub fn reference_name(&self) -> Option<&str> {
        self.reference
            .as_deref()
            .map(|reference| reference.rsplit('/').next().unwrap_or(reference))
    }

    /// Declared type. For 3.1 type arrays the first non-`null` entry wins.
    pub fn kind(&self) -> Option<SchemaKind> {
        let name = match self.schema_type.as_ref()? {
            Value::String(name) => name.as_str(),
            Value::Array(names) => names
                .iter()
                .filter_map(Value::as_str)
                .find(|name| *name != "null")?,
            _ => return None,
        };
        match name {
            "object" => Some(SchemaKind::Object),
            "array" => Some(SchemaKind::Array),
            "string" => Some(SchemaKind::String),
            "number" => Some(SchemaKind::Number),
            "integer" => Some(SchemaKind::Integer),
            "boolean" => Some(SchemaKind::Boolean),
            _ => None,
        }
    }
}
