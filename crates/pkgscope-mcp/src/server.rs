//! Stdio JSON-RPC server loop.
//!
//! MCP clients speak newline-delimited JSON over the child process's
//! stdin/stdout, so stdout carries protocol traffic only; all logging
//! goes to stderr. Async I/O throughout so a slow derivation never
//! wedges the reader.

use crate::handlers::Handlers;
use crate::protocol::{error_codes, JsonRpcRequest, JsonRpcResponse};
use anyhow::{Context, Result};
use pkgscope_core::sources::Sources;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

pub struct McpServer {
    handlers: Handlers,
}

impl McpServer {
    pub fn new(sources: Sources) -> Self {
        Self {
            handlers: Handlers::new(sources),
        }
    }

    /// Read requests from stdin until EOF, answering each on stdout.
    pub async fn run(&self) -> Result<()> {
        let stdin = tokio::io::stdin();
        let stdout = tokio::io::stdout();
        let mut reader = BufReader::new(stdin);
        let mut writer = tokio::io::BufWriter::new(stdout);
        let mut line = String::new();

        tracing::info!("pkgscope MCP server ready");

        loop {
            line.clear();
            let bytes_read = reader
                .read_line(&mut line)
                .await
                .context("failed to read from stdin")?;

            // EOF: the client hung up
            if bytes_read == 0 {
                tracing::info!("stdin closed, shutting down");
                break;
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let Some(response) = self.handle_line(trimmed).await else {
                continue;
            };

            let payload = serde_json::to_string(&response)?;
            writer
                .write_all(payload.as_bytes())
                .await
                .context("failed to write to stdout")?;
            writer.write_all(b"\n").await?;
            writer.flush().await.context("failed to flush stdout")?;
        }

        Ok(())
    }

    /// One line in, at most one response out (notifications get none).
    async fn handle_line(&self, input: &str) -> Option<JsonRpcResponse> {
        let request: JsonRpcRequest = match serde_json::from_str(input) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!("unparseable request: {}", e);
                return Some(JsonRpcResponse::error(
                    None,
                    error_codes::PARSE_ERROR,
                    format!("Parse error: {}", e),
                ));
            }
        };

        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(
                request.id,
                error_codes::INVALID_REQUEST,
                "Invalid JSON-RPC version, expected \"2.0\"",
            ));
        }

        self.handlers.dispatch(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pkgscope_core::models::{AdvisoryRecord, DownloadWindow, PackageProfile, RepoStat};
    use pkgscope_core::sources::{AdvisorySource, RegistrySource, RepoSource};
    use std::sync::Arc;

    struct EmptyRegistry;

    #[async_trait]
    impl RegistrySource for EmptyRegistry {
        async fn profile(&self, _name: &str) -> Option<PackageProfile> {
            None
        }
        async fn downloads(&self, _name: &str, _window: DownloadWindow) -> Option<u64> {
            None
        }
    }

    struct NoRepos;

    #[async_trait]
    impl RepoSource for NoRepos {
        async fn stats(&self, _owner: &str, _name: &str) -> Option<RepoStat> {
            None
        }
    }

    struct NoAdvisories;

    #[async_trait]
    impl AdvisorySource for NoAdvisories {
        async fn advisories<'a>(&self, _name: &str, _version: Option<&'a str>) -> Vec<AdvisoryRecord> {
            Vec::new()
        }
    }

    fn server() -> McpServer {
        McpServer::new(Sources::new(
            Arc::new(EmptyRegistry),
            Arc::new(NoRepos),
            Arc::new(NoAdvisories),
        ))
    }

    #[tokio::test]
    async fn test_garbage_input_yields_parse_error() {
        let response = server().handle_line("this is not json").await.unwrap();
        assert_eq!(response.error.unwrap().code, error_codes::PARSE_ERROR);
        assert!(response.id.is_none());
    }

    #[tokio::test]
    async fn test_wrong_version_is_invalid_request() {
        let response = server()
            .handle_line(r#"{"jsonrpc":"1.0","id":3,"method":"initialize"}"#)
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().code, error_codes::INVALID_REQUEST);
    }

    #[tokio::test]
    async fn test_notification_line_produces_no_output() {
        let response = server()
            .handle_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await;
        assert!(response.is_none());
    }

    #[tokio::test]
    async fn test_initialize_round_trip() {
        let response = server()
            .handle_line(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#)
            .await
            .unwrap();
        assert!(response.error.is_none());
        assert_eq!(response.result.unwrap()["serverInfo"]["name"], "pkgscope");
    }
}
