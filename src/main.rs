use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::{Value, json};
use std::io::{self, BufRead, Write};
use std::process;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod compose;
mod config;
mod document;
mod mcp;
mod query;
mod source;
mod tools;

use compose::HttpTransport;
use config::{Config, GlobalArgs};
use source::DocumentCache;
use tools::ToolContext;

const JSONRPC_METHOD_NOT_FOUND: i64 = -32601;

#[derive(Parser)]
#[command(name = "mcp-swagger")]
#[command(
    version,
    about = "Explore and call an OpenAPI/Swagger API over MCP or from the command line"
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct OutputArgs {
    /// Output JSON structuredContent
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP stdio server
    Serve {
        /// Serve MCP over stdio (NDJSON)
        #[arg(long)]
        stdio: bool,
    },
    /// List endpoints, optionally restricted to one tag
    ListEndpoints {
        #[arg(long)]
        tag: Option<String>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Search endpoints by keyword
    SearchEndpoints {
        #[arg(long)]
        query: String,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Check that a path exists or suggest close matches
    ValidatePath {
        #[arg(long)]
        path: String,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Print a curl command for an endpoint
    CurlExample {
        #[arg(long)]
        path: String,
        #[arg(long)]
        method: String,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Call any tool with JSON arguments
    Call {
        /// Tool name (e.g. getApiInfo)
        #[arg(long)]
        tool: String,
        /// Tool arguments as a JSON object
        #[arg(long, default_value = "{}")]
        arguments: String,
        #[command(flatten)]
        output: OutputArgs,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = Config::from_args(&cli.global).context("invalid configuration")?;
    let mut ctx = build_context(&config)?;

    match cli.command {
        Commands::Serve { stdio } => {
            if stdio {
                run_stdio_server(&mut ctx)
            } else {
                anyhow::bail!("only --stdio transport is supported")
            }
        }
        Commands::ListEndpoints { tag, output } => {
            let args = match tag {
                Some(tag) => json!({ "tag": tag }),
                None => json!({}),
            };
            run_tool(&mut ctx, mcp::contracts::TOOL_LIST_ENDPOINTS, &args, output.json)
        }
        Commands::SearchEndpoints { query, output } => run_tool(
            &mut ctx,
            mcp::contracts::TOOL_SEARCH_ENDPOINTS,
            &json!({ "query": query }),
            output.json,
        ),
        Commands::ValidatePath { path, output } => run_tool(
            &mut ctx,
            mcp::contracts::TOOL_VALIDATE_ENDPOINT_PATH,
            &json!({ "path": path }),
            output.json,
        ),
        Commands::CurlExample {
            path,
            method,
            output,
        } => run_tool(
            &mut ctx,
            mcp::contracts::TOOL_GENERATE_CURL_EXAMPLE,
            &json!({ "path": path, "method": method }),
            output.json,
        ),
        Commands::Call {
            tool,
            arguments,
            output,
        } => {
            let args: Value =
                serde_json::from_str(&arguments).context("--arguments must be valid JSON")?;
            run_tool(&mut ctx, &tool, &args, output.json)
        }
    }
}

/// Logs go to stderr; stdout carries the JSON-RPC stream.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(false),
        )
        .init();
}

fn build_context(config: &Config) -> Result<ToolContext> {
    let cache = DocumentCache::new(config.spec.clone(), config.timeout)
        .context("failed to build description client")?;
    let transport = HttpTransport::new(config.timeout).context("failed to build HTTP client")?;
    Ok(ToolContext::new(cache, Box::new(transport)))
}

fn run_tool(ctx: &mut ToolContext, name: &str, args: &Value, json_output: bool) -> Result<()> {
    let result = ctx.call(name, args);
    print_tool_result(result, json_output)
}

fn print_tool_result(result: Value, json_output: bool) -> Result<()> {
    let is_error = result
        .get("isError")
        .and_then(|value| value.as_bool())
        .unwrap_or(false);

    if is_error {
        let message = result
            .get("structuredContent")
            .and_then(|value| value.get("error"))
            .and_then(|value| value.as_str())
            .unwrap_or("tool error");
        eprintln!("{message}");
        process::exit(1);
    }

    if json_output {
        let structured = result
            .get("structuredContent")
            .cloned()
            .unwrap_or_else(|| json!({}));
        let output = serde_json::to_string_pretty(&structured)?;
        println!("{output}");
        return Ok(());
    }

    let text = result
        .get("content")
        .and_then(|value| value.as_array())
        .and_then(|arr| arr.first())
        .and_then(|value| value.get("text"))
        .and_then(|value| value.as_str())
        .unwrap_or("");
    println!("{text}");
    Ok(())
}

fn run_stdio_server(ctx: &mut ToolContext) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let reader = stdin.lock().lines();
    let mut writer = io::BufWriter::new(stdout.lock());
    tracing::info!("serving MCP over stdio");

    for line in reader {
        let line = line.context("failed to read stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        let request: Value = match serde_json::from_str(&line) {
            Ok(value) => value,
            Err(error) => {
                tracing::warn!(%error, "skipping unparsable request line");
                continue;
            }
        };

        let method = request.get("method").and_then(|value| value.as_str());
        let id = request.get("id").cloned();
        let response = match (method, id) {
            (Some("initialize"), Some(id)) => Some(json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": {
                    "protocolVersion": "2025-11-25",
                    "capabilities": {
                        "tools": {}
                    },
                    "serverInfo": {
                        "name": env!("CARGO_PKG_NAME"),
                        "version": env!("CARGO_PKG_VERSION")
                    }
                }
            })),
            (Some("ping"), Some(id)) => Some(json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": {}
            })),
            (Some("tools/list"), Some(id)) => Some(json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": {
                    "tools": mcp::tool_definitions()
                }
            })),
            (Some("tools/call"), Some(id)) => {
                let result = handle_tool_call(ctx, &request);
                Some(json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "result": result
                }))
            }
            (method, Some(id)) => {
                tracing::debug!(method = ?method, "unsupported method");
                Some(json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "error": {
                        "code": JSONRPC_METHOD_NOT_FOUND,
                        "message": format!("method not found: {}", method.unwrap_or(""))
                    }
                }))
            }
            (_, None) => None,
        };

        if let Some(response) = response {
            let serialized =
                serde_json::to_string(&response).context("failed to serialize response")?;
            writeln!(writer, "{serialized}").context("failed to write response")?;
            writer.flush().context("failed to flush response")?;
        }
    }

    Ok(())
}

fn handle_tool_call(ctx: &mut ToolContext, request: &Value) -> Value {
    let params = request.get("params");
    let Some(params) = params.and_then(|value| value.as_object()) else {
        return tools::error_result(mcp::errors::INVALID_INPUT, "params must be an object");
    };

    let name = params.get("name").and_then(|value| value.as_str());
    let Some(name) = name else {
        return tools::error_result(mcp::errors::INVALID_INPUT, "params.name must be a string");
    };

    let args = params
        .get("arguments")
        .cloned()
        .unwrap_or_else(|| json!({}));

    ctx.call(name, &args)
}
