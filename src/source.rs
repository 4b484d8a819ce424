//! Loads the API description once and hands out shared handles to it.

use crate::document::ApiDescription;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("no API description configured (pass --spec or set API_URL)")]
    NotConfigured,

    #[error("invalid API description URL '{location}': {source}")]
    InvalidUrl {
        location: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid file URL (cannot convert to path): {0}")]
    InvalidFileUrl(String),

    #[error("Failed to fetch Swagger doc: {0}")]
    Status(String),

    #[error("failed to fetch API description from '{url}': {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to read API description file '{path}': {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse API description from '{location}': {message}")]
    Parse { location: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecLocation {
    Url(Url),
    File(PathBuf),
}

impl SpecLocation {
    /// `http(s)://` is fetched, `file://` and anything else is read from disk.
    pub fn parse(location: &str) -> Result<Self, SourceError> {
        if location.starts_with("http://") || location.starts_with("https://") {
            let url = Url::parse(location).map_err(|source| SourceError::InvalidUrl {
                location: location.to_string(),
                source,
            })?;
            Ok(SpecLocation::Url(url))
        } else if location.starts_with("file://") {
            let url = Url::parse(location).map_err(|source| SourceError::InvalidUrl {
                location: location.to_string(),
                source,
            })?;
            let path = url
                .to_file_path()
                .map_err(|()| SourceError::InvalidFileUrl(location.to_string()))?;
            Ok(SpecLocation::File(path))
        } else {
            Ok(SpecLocation::File(PathBuf::from(location)))
        }
    }
}

impl fmt::Display for SpecLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecLocation::Url(url) => write!(f, "{url}"),
            SpecLocation::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Fetch-once cache. Only a successfully parsed description is kept; a failed load is
/// retried on the next call.
pub struct DocumentCache {
    location: Option<SpecLocation>,
    client: reqwest::blocking::Client,
    document: Option<Arc<ApiDescription>>,
}

impl DocumentCache {
    pub fn new(location: Option<SpecLocation>, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            location,
            client,
            document: None,
        })
    }

    pub fn get(&mut self) -> Result<Arc<ApiDescription>, SourceError> {
        if let Some(document) = &self.document {
            return Ok(Arc::clone(document));
        }

        let location = self.location.as_ref().ok_or(SourceError::NotConfigured)?;
        tracing::info!(%location, "loading API description");
        let document = match self.load(location) {
            Ok(document) => Arc::new(document),
            Err(error) => {
                tracing::error!(%location, %error, "failed to load API description");
                return Err(error);
            }
        };
        tracing::info!(
            %location,
            paths = document.paths().count(),
            "API description loaded"
        );

        self.document = Some(Arc::clone(&document));
        Ok(document)
    }

    fn load(&self, location: &SpecLocation) -> Result<ApiDescription, SourceError> {
        let text = match location {
            SpecLocation::Url(url) => self.fetch(url)?,
            SpecLocation::File(path) => {
                std::fs::read_to_string(path).map_err(|source| SourceError::ReadFile {
                    path: path.display().to_string(),
                    source,
                })?
            }
        };
        parse_description(&text, &location.to_string())
    }

    fn fetch(&self, url: &Url) -> Result<String, SourceError> {
        let fetch_error = |source| SourceError::Fetch {
            url: url.to_string(),
            source,
        };
        let response = self.client.get(url.clone()).send().map_err(fetch_error)?;
        let status = response.status();
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or(status.as_str());
            return Err(SourceError::Status(reason.to_string()));
        }
        response.text().map_err(fetch_error)
    }
}

/// Parses JSON, falling back to YAML when the text is not JSON at all.
pub fn parse_description(text: &str, location: &str) -> Result<ApiDescription, SourceError> {
    let parse_error = |message: String| SourceError::Parse {
        location: location.to_string(),
        message,
    };

    match serde_json::from_str::<ApiDescription>(text) {
        Ok(document) => Ok(document),
        Err(json_error) if json_error.is_syntax() || json_error.is_eof() => {
            let value: serde_json::Value = serde_yaml::from_str(text).map_err(|yaml_error| {
                parse_error(format!("neither JSON ({json_error}) nor YAML ({yaml_error})"))
            })?;
            serde_json::from_value(value).map_err(|error| parse_error(error.to_string()))
        }
        Err(json_error) => Err(parse_error(json_error.to_string())),
    }
}
