//! Request handlers: JSON-RPC methods in, derivation results out.
//!
//! Tool execution failures (package not found, bad package count, and
//! the like) come back as isError tool results with a message, the way
//! MCP clients expect. Protocol-level problems (unknown method, params
//! that don't match the schema) are JSON-RPC error objects. Nothing in
//! here can crash the process.

use crate::protocol::{error_codes, methods, JsonRpcId, JsonRpcRequest, JsonRpcResponse};
use crate::tools;
use pkgscope_core::sources::Sources;
use pkgscope_core::{
    alternatives, compare, manifest, research, security, trending,
};
use serde::Deserialize;
use serde_json::json;

pub struct Handlers {
    sources: Sources,
}

#[derive(Debug, Deserialize)]
struct ToolCallParams {
    name: String,
    #[serde(default)]
    arguments: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResearchArgs {
    package: String,
    current_version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompareArgs {
    packages: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct AlternativesArgs {
    package: String,
    category: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SecurityArgs {
    package: String,
    version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeArgs {
    package_json: serde_json::Value,
    #[serde(default = "default_true")]
    check_dev_deps: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct TrendingArgs {
    category: String,
    framework: Option<String>,
}

impl Handlers {
    pub fn new(sources: Sources) -> Self {
        Self { sources }
    }

    /// Dispatch one request. Notifications return None; everything else
    /// gets exactly one response.
    pub async fn dispatch(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            tracing::debug!("notification {}, no response", request.method);
            return None;
        }

        let id = request.id.clone();
        let response = match request.method.as_str() {
            methods::INITIALIZE => self.initialize(id),
            methods::TOOLS_LIST => self.list_tools(id),
            methods::TOOLS_CALL => self.call_tool(id, request.params).await,
            other => JsonRpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Unknown method: {}", other),
            ),
        };
        Some(response)
    }

    fn initialize(&self, id: Option<JsonRpcId>) -> JsonRpcResponse {
        JsonRpcResponse::success(
            id,
            json!({
                "protocolVersion": "2024-11-05",
                "capabilities": { "tools": {} },
                "serverInfo": {
                    "name": "pkgscope",
                    "version": env!("CARGO_PKG_VERSION"),
                },
            }),
        )
    }

    fn list_tools(&self, id: Option<JsonRpcId>) -> JsonRpcResponse {
        JsonRpcResponse::success(id, json!({ "tools": tools::all() }))
    }

    async fn call_tool(
        &self,
        id: Option<JsonRpcId>,
        params: Option<serde_json::Value>,
    ) -> JsonRpcResponse {
        let params: ToolCallParams = match params.map(serde_json::from_value).transpose() {
            Ok(Some(p)) => p,
            Ok(None) => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    "tools/call requires params",
                )
            }
            Err(e) => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("Invalid tools/call params: {}", e),
                )
            }
        };

        // An omitted arguments object means "no arguments", not null
        let arguments = match params.arguments {
            serde_json::Value::Null => json!({}),
            other => other,
        };

        match self.run_tool(&params.name, arguments).await {
            Ok(result) => tool_result(id, result),
            Err(ToolError::UnknownTool(name)) => JsonRpcResponse::error(
                id,
                error_codes::TOOL_NOT_FOUND,
                format!("Unknown tool: {}", name),
            ),
            Err(ToolError::BadArguments(e)) => JsonRpcResponse::error(
                id,
                error_codes::INVALID_PARAMS,
                format!("Invalid arguments for {}: {}", params.name, e),
            ),
            Err(ToolError::Execution(e)) => tool_failure(id, e),
        }
    }

    async fn run_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ToolError> {
        let src = &self.sources;

        match name {
            "research_package" => {
                let args: ResearchArgs = parse_args(arguments)?;
                let report =
                    research::research_package(src, &args.package, args.current_version.as_deref())
                        .await?;
                Ok(serde_json::to_value(report)?)
            }
            "compare_packages" => {
                let args: CompareArgs = parse_args(arguments)?;
                let comparison = compare::compare_packages(src, &args.packages).await?;
                Ok(serde_json::to_value(comparison)?)
            }
            "find_alternatives" => {
                let args: AlternativesArgs = parse_args(arguments)?;
                let report =
                    alternatives::find_alternatives(src, &args.package, args.category.as_deref())
                        .await?;
                Ok(serde_json::to_value(report)?)
            }
            "check_security" => {
                let args: SecurityArgs = parse_args(arguments)?;
                let audit =
                    security::check_security(src, &args.package, args.version.as_deref()).await?;
                Ok(serde_json::to_value(audit)?)
            }
            "analyze_package_json" => {
                let args: AnalyzeArgs = parse_args(arguments)?;
                let parsed = manifest::PackageManifest::from_json(&args.package_json)?;
                let report =
                    manifest::analyze_manifest(src, &parsed, args.check_dev_deps).await?;
                Ok(serde_json::to_value(report)?)
            }
            "get_trending" => {
                let args: TrendingArgs = parse_args(arguments)?;
                let report =
                    trending::get_trending(src, &args.category, args.framework.as_deref()).await?;
                Ok(serde_json::to_value(report)?)
            }
            other => Err(ToolError::UnknownTool(other.to_string())),
        }
    }
}

enum ToolError {
    UnknownTool(String),
    BadArguments(serde_json::Error),
    Execution(pkgscope_core::Error),
}

impl From<pkgscope_core::Error> for ToolError {
    fn from(e: pkgscope_core::Error) -> Self {
        ToolError::Execution(e)
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(e: serde_json::Error) -> Self {
        // Only reachable while serializing a result, which is infallible
        // for our derive'd records; treated as an execution failure.
        ToolError::Execution(pkgscope_core::Error::SerializationError(e))
    }
}

fn parse_args<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> Result<T, ToolError> {
    serde_json::from_value(value).map_err(ToolError::BadArguments)
}

/// Wrap a derivation result in MCP text content.
fn tool_result(id: Option<JsonRpcId>, value: serde_json::Value) -> JsonRpcResponse {
    let text = serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string());
    JsonRpcResponse::success(
        id,
        json!({
            "content": [{ "type": "text", "text": text }],
        }),
    )
}

/// Tool ran and failed: an isError result, not a protocol error.
fn tool_failure(id: Option<JsonRpcId>, error: pkgscope_core::Error) -> JsonRpcResponse {
    tracing::debug!("tool call failed: {}", error);
    JsonRpcResponse::success(
        id,
        json!({
            "content": [{ "type": "text", "text": format!("Error: {}", error) }],
            "isError": true,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pkgscope_core::models::{
        AdvisoryRecord, DownloadWindow, PackageProfile, RepoStat,
    };
    use pkgscope_core::sources::{AdvisorySource, RegistrySource, RepoSource};
    use std::sync::Arc;

    /// Registry that knows exactly one package, "left-pad" at 1.3.0.
    struct StubRegistry;

    #[async_trait]
    impl RegistrySource for StubRegistry {
        async fn profile(&self, name: &str) -> Option<PackageProfile> {
            (name == "left-pad").then(|| PackageProfile {
                name: name.to_string(),
                description: Some("String left pad".to_string()),
                latest_version: "1.3.0".to_string(),
                license: Some("WTFPL".to_string()),
                homepage: None,
                keywords: Vec::new(),
                maintainer_count: 1,
                repository_url: None,
                versions: vec!["1.0.0".to_string(), "1.3.0".to_string()],
                published_at: None,
            })
        }

        async fn downloads(&self, name: &str, _window: DownloadWindow) -> Option<u64> {
            (name == "left-pad").then_some(2_000_000)
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

    fn handlers() -> Handlers {
        Handlers::new(Sources::new(
            Arc::new(StubRegistry),
            Arc::new(NoRepos),
            Arc::new(NoAdvisories),
        ))
    }

    fn request(method: &str, params: serde_json::Value) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(JsonRpcId::Number(1)),
            method: method.to_string(),
            params: Some(params),
        }
    }

    #[tokio::test]
    async fn test_initialize_reports_server_info() {
        let response = handlers()
            .dispatch(request(methods::INITIALIZE, json!({})))
            .await
            .unwrap();

        let result = response.result.unwrap();
        assert_eq!(result["serverInfo"]["name"], "pkgscope");
        assert!(result["protocolVersion"].is_string());
    }

    #[tokio::test]
    async fn test_tools_list_exports_six_tools() {
        let response = handlers()
            .dispatch(request(methods::TOOLS_LIST, json!({})))
            .await
            .unwrap();

        let tools = response.result.unwrap()["tools"].as_array().unwrap().len();
        assert_eq!(tools, 6);
    }

    #[tokio::test]
    async fn test_notifications_get_no_response() {
        let notification = JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: None,
            method: "notifications/initialized".to_string(),
            params: None,
        };
        assert!(handlers().dispatch(notification).await.is_none());
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let response = handlers()
            .dispatch(request("resources/list", json!({})))
            .await
            .unwrap();
        assert_eq!(
            response.error.unwrap().code,
            error_codes::METHOD_NOT_FOUND
        );
    }

    #[tokio::test]
    async fn test_call_research_returns_text_content() {
        let response = handlers()
            .dispatch(request(
                methods::TOOLS_CALL,
                json!({ "name": "research_package", "arguments": { "package": "left-pad" } }),
            ))
            .await
            .unwrap();

        let result = response.result.unwrap();
        assert!(result.get("isError").is_none());

        let content = &result["content"][0];
        assert_eq!(content["type"], "text");
        let text = content["text"].as_str().unwrap();
        assert!(text.contains("left-pad"));
        assert!(text.contains("1.3.0"));
    }

    #[tokio::test]
    async fn test_research_missing_package_is_tool_error() {
        let response = handlers()
            .dispatch(request(
                methods::TOOLS_CALL,
                json!({ "name": "research_package", "arguments": { "package": "no-such-pkg" } }),
            ))
            .await
            .unwrap();

        let result = response.result.unwrap();
        assert_eq!(result["isError"], true);
        let text = result["content"][0]["text"].as_str().unwrap();
        assert!(text.starts_with("Error:"));
        assert!(text.contains("not found"));
    }

    #[tokio::test]
    async fn test_compare_with_one_package_is_tool_error() {
        let response = handlers()
            .dispatch(request(
                methods::TOOLS_CALL,
                json!({ "name": "compare_packages", "arguments": { "packages": ["left-pad"] } }),
            ))
            .await
            .unwrap();

        let result = response.result.unwrap();
        assert_eq!(result["isError"], true);
        let text = result["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("Invalid argument"));
    }

    #[tokio::test]
    async fn test_unknown_tool_is_protocol_error() {
        let response = handlers()
            .dispatch(request(
                methods::TOOLS_CALL,
                json!({ "name": "mine_bitcoin", "arguments": {} }),
            ))
            .await
            .unwrap();

        let error = response.error.unwrap();
        assert_eq!(error.code, error_codes::TOOL_NOT_FOUND);
        assert!(error.message.contains("mine_bitcoin"));
    }

    #[tokio::test]
    async fn test_malformed_arguments_are_invalid_params() {
        // packages should be an array of strings
        let response = handlers()
            .dispatch(request(
                methods::TOOLS_CALL,
                json!({ "name": "compare_packages", "arguments": { "packages": "left-pad" } }),
            ))
            .await
            .unwrap();

        assert_eq!(
            response.error.unwrap().code,
            error_codes::INVALID_PARAMS
        );
    }

    #[tokio::test]
    async fn test_analyze_package_json_round_trip() {
        let response = handlers()
            .dispatch(request(
                methods::TOOLS_CALL,
                json!({
                    "name": "analyze_package_json",
                    "arguments": {
                        "packageJson": { "dependencies": { "left-pad": "^1.0.0" } }
                    }
                }),
            ))
            .await
            .unwrap();

        let result = response.result.unwrap();
        assert!(result.get("isError").is_none());
        let text = result["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("\"status\": \"minor\""), "text was: {}", text);
    }
}
