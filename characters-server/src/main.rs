//! Line-delimited JSON server exposing the character tools.
//!
//! One request per stdin line, one response per stdout line. Logs go to
//! stderr so they never interleave with responses. Configuration comes from
//! the environment (and a `.env` file when present):
//!
//! - `CHARACTERS_DATA_FILE`: path to the JSON table file; omit to run on the
//!   in-memory store
//! - `RUST_LOG`: tracing filter, e.g. `info` or `characters_core=debug`
//!
//! Request:  `{"id": 1, "tool": "getCharacter", "params": {"characterId": "..."}}`
//! Response: `{"id": 1, "result": {...}}` or `{"id": 1, "error": "..."}`
//!
//! The reserved name `listTools` answers with the registry's definitions.

use characters_core::{
    CharacterService, CharacterStore, ExperienceTable, JsonFileStore, MemoryStore,
};
use characters_tools::{character_tool_registry, ToolRegistry};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// A single request line.
#[derive(Debug, Deserialize)]
struct Request {
    /// Echoed back verbatim; callers use it to correlate responses.
    #[serde(default)]
    id: Value,
    tool: String,
    #[serde(default)]
    params: Value,
}

/// A single response line.
#[derive(Debug, Serialize)]
struct Response {
    id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl Response {
    fn result(id: Value, result: Value) -> Self {
        Self {
            id,
            result: Some(result),
            error: None,
        }
    }

    fn error(id: Value, message: impl Into<String>) -> Self {
        Self {
            id,
            result: None,
            error: Some(message.into()),
        }
    }
}

fn build_store() -> Arc<dyn CharacterStore> {
    match std::env::var("CHARACTERS_DATA_FILE") {
        Ok(path) if !path.is_empty() => {
            info!(%path, "using JSON file store");
            Arc::new(JsonFileStore::new(path))
        }
        _ => {
            info!("no data file configured; using in-memory store");
            Arc::new(MemoryStore::new())
        }
    }
}

async fn handle_line(registry: &ToolRegistry, line: &str) -> Response {
    let request: Request = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(err) => return Response::error(Value::Null, format!("Malformed request: {err}")),
    };

    if request.tool == "listTools" {
        return match serde_json::to_value(registry.definitions()) {
            Ok(definitions) => Response::result(request.id, definitions),
            Err(err) => Response::error(request.id, err.to_string()),
        };
    }

    match registry.dispatch(&request.tool, request.params).await {
        Ok(output) => match serde_json::to_value(&output) {
            Ok(result) => Response::result(request.id, result),
            Err(err) => Response::error(request.id, err.to_string()),
        },
        Err(err) => Response::error(request.id, err.to_string()),
    }
}

async fn serve(registry: ToolRegistry) -> io::Result<()> {
    let mut lines = BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let response = handle_line(&registry, &line).await;
        let encoded = match serde_json::to_string(&response) {
            Ok(encoded) => encoded,
            Err(err) => {
                error!(%err, "failed to encode response");
                continue;
            }
        };

        stdout.write_all(encoded.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let service = Arc::new(CharacterService::new(
        build_store(),
        ExperienceTable::default(),
    ));
    let registry = character_tool_registry(service);

    info!(tools = registry.len(), "character server ready");
    serve(registry).await?;
    info!("stdin closed; shutting down");
    Ok(())
}
