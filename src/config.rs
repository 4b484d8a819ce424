use crate::source::{SourceError, SpecLocation};
use clap::Args;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// API description to serve: http(s) URL, file:// URL or local path (JSON or YAML)
    #[arg(long = "spec", env = "API_URL", global = true)]
    pub spec: Option<String>,
    /// Deadline in seconds for the description fetch and live calls (0 disables it)
    #[arg(
        long,
        env = "MCP_SWAGGER_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        global = true
    )]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub spec: Option<SpecLocation>,
    pub timeout: Option<Duration>,
}

impl Config {
    pub fn from_args(args: &GlobalArgs) -> Result<Self, SourceError> {
        let spec = args
            .spec
            .as_deref()
            .map(str::trim)
            .filter(|spec| !spec.is_empty())
            .map(SpecLocation::parse)
            .transpose()?;
        let timeout = (args.timeout_secs > 0).then(|| Duration::from_secs(args.timeout_secs));
        Ok(Self { spec, timeout })
    }
}
