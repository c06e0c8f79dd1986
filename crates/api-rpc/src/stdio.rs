//! Newline-delimited JSON-RPC transport
//!
//! One request per line in, one response per line out. Notifications (no
//! `id`) get no response. Stdout carries frames only, so logging must go
//! elsewhere.

use jsonrpsee::RpcModule;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

/// JSON-RPC parse error code
const PARSE_ERROR: i32 = -32700;

/// JSON-RPC invalid request code
const INVALID_REQUEST: i32 = -32600;

fn error_frame(code: i32, message: &str) -> String {
    json!({
        "jsonrpc": "2.0",
        "error": { "code": code, "message": message },
        "id": null,
    })
    .to_string()
}

/// Answer each line of `reader` on `writer` until EOF
pub async fn serve_lines<Ctx, R, W>(
    module: &RpcModule<Ctx>,
    reader: R,
    mut writer: W,
) -> std::io::Result<()>
where
    Ctx: Send + Sync + 'static,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Value>(line) {
            Err(e) => {
                warn!(error = %e, "Unparseable stdio frame");
                error_frame(PARSE_ERROR, "Parse error")
            }
            Ok(Value::Object(frame)) if !frame.contains_key("id") => {
                debug!("Ignoring notification");
                continue;
            }
            Ok(_) => match module.raw_json_request(line, 1).await {
                Ok((response, _)) => response.to_string(),
                Err(e) => {
                    warn!(error = %e, "Invalid stdio request");
                    error_frame(INVALID_REQUEST, "Invalid request")
                }
            },
        };

        debug!(bytes = response.len(), "Stdio response");
        writer.write_all(response.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::{RpcServer, RpcServerConfig};
    use boltz_core::application::{Invoker, PredictionService};
    use boltz_core::port::inference_runner::mocks::MockInferenceRunner;
    use boltz_core::port::system_probe::mocks::MockSystemProbe;
    use boltz_core::port::{Sha256IdProvider, SystemTimeProvider};
    use boltz_infra_store::{ArtifactLayout, FsArtifactStore, InMemoryJobRegistry};
    use std::sync::Arc;

    fn echo_module() -> RpcModule<()> {
        let mut module = RpcModule::new(());
        module
            .register_method("echo", |params, _, _| params.parse::<Value>())
            .unwrap();
        module
    }

    async fn run(input: &str) -> Vec<Value> {
        run_with(&echo_module(), input).await
    }

    async fn run_with(module: &RpcModule<()>, input: &str) -> Vec<Value> {
        let mut out = Vec::new();
        serve_lines(module, input.as_bytes(), &mut out).await.unwrap();

        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_one_response_per_line() {
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"echo","params":{"a":1}}"#,
            "\n\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"echo","params":{"b":2}}"#,
            "\n",
        );

        let responses = run(input).await;

        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["id"], 1);
        assert_eq!(responses[0]["result"]["a"], 1);
        assert_eq!(responses[1]["result"]["b"], 2);
    }

    #[tokio::test]
    async fn test_unknown_method_is_error_frame() {
        let responses = run(r#"{"jsonrpc":"2.0","id":7,"method":"nope"}"#).await;
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0]["id"], 7);
        assert!(responses[0]["error"]["code"].is_i64());
    }

    #[tokio::test]
    async fn test_garbage_line_is_parse_error() {
        let responses = run("not json\n").await;
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0]["error"]["code"], PARSE_ERROR);
    }

    #[tokio::test]
    async fn test_notification_gets_no_response() {
        let input = concat!(
            r#"{"jsonrpc":"2.0","method":"echo","params":{"a":1}}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":3,"method":"echo","params":{"b":2}}"#,
            "\n",
        );

        let responses = run(input).await;

        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0]["id"], 3);
    }

    #[tokio::test]
    async fn test_prediction_module_over_stdio() {
        let root = std::env::temp_dir().join(format!("boltz-stdio-{}", uuid::Uuid::new_v4()));
        let artifacts =
            Arc::new(FsArtifactStore::open(ArtifactLayout::under(&root), 1024).unwrap());
        let registry = Arc::new(InMemoryJobRegistry::new());
        let time_provider = Arc::new(SystemTimeProvider);
        let invoker = Arc::new(Invoker::new(
            registry.clone(),
            artifacts.clone(),
            Arc::new(MockInferenceRunner::new_success()),
            time_provider.clone(),
        ));
        let service = Arc::new(PredictionService::new(
            registry,
            artifacts,
            Arc::new(Sha256IdProvider),
            time_provider,
            Arc::new(MockSystemProbe::cpu_only()),
            invoker,
        ));
        let module = RpcServer::new(RpcServerConfig::default(), service)
            .build_module()
            .unwrap();

        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"check_job_status","params":{"job_id":"0000000000000000"}}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"list_jobs"}"#,
            "\n",
        );
        let responses = run_with(&module, input).await;
        let _ = std::fs::remove_dir_all(&root);

        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["result"]["status"], "unknown");
        assert_eq!(responses[0]["result"]["code"], 4001);
        assert_eq!(
            responses[0]["result"]["error"],
            "Job ID 0000000000000000 not found"
        );
        assert_eq!(responses[1]["result"]["status"], "success");
        assert_eq!(responses[1]["result"]["total"], 0);
    }
}
