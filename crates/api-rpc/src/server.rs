//! JSON-RPC Server
//!
//! Registers the six prediction methods and serves them over HTTP or stdio.

use crate::auth::BearerAuth;
use crate::error::ServerError;
use crate::handler::RpcHandler;
use crate::stdio;
use crate::types::{
    JobIdRequest, ListJobsRequest, PredictFromPdbRequest, PredictFromSequenceRequest,
};
use boltz_core::application::PredictionService;
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::RpcModule;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

pub const DEFAULT_RPC_HOST: &str = "0.0.0.0";
pub const DEFAULT_RPC_PORT: u16 = 8000;

/// Method names
pub mod method {
    pub const PREDICT_FROM_PDB: &str = "predict_structure_from_pdb";
    pub const PREDICT_FROM_SEQUENCE: &str = "predict_structure_from_sequence";
    pub const CHECK_JOB_STATUS: &str = "check_job_status";
    pub const GET_PREDICTION_RESULT: &str = "get_prediction_result";
    pub const LIST_JOBS: &str = "list_jobs";
    pub const GET_SERVER_INFO: &str = "get_server_info";
}

/// RPC Server Configuration
#[derive(Debug, Clone)]
pub struct RpcServerConfig {
    pub host: String,
    pub port: u16,
    /// Bearer token enforced on HTTP; `None` leaves the endpoint open
    pub auth_token: Option<String>,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
            auth_token: None,
        }
    }
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    handler: Arc<RpcHandler>,
}

impl RpcServer {
    pub fn new(config: RpcServerConfig, service: Arc<PredictionService>) -> Self {
        Self {
            config,
            handler: Arc::new(RpcHandler::new(service)),
        }
    }

    /// Register every method on a fresh module
    pub fn build_module(&self) -> Result<RpcModule<()>, ServerError> {
        let mut module = RpcModule::new(());

        let handler = self.handler.clone();
        module
            .register_async_method(method::PREDICT_FROM_PDB, move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: PredictFromPdbRequest = params.parse()?;
                    Ok::<_, jsonrpsee::types::ErrorObjectOwned>(
                        handler.predict_from_pdb(req).await,
                    )
                }
            })
            .map_err(|e| ServerError::Register(e.to_string()))?;

        let handler = self.handler.clone();
        module
            .register_async_method(method::PREDICT_FROM_SEQUENCE, move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: PredictFromSequenceRequest = params.parse()?;
                    Ok::<_, jsonrpsee::types::ErrorObjectOwned>(
                        handler.predict_from_sequence(req).await,
                    )
                }
            })
            .map_err(|e| ServerError::Register(e.to_string()))?;

        let handler = self.handler.clone();
        module
            .register_async_method(method::CHECK_JOB_STATUS, move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: JobIdRequest = params.parse()?;
                    Ok::<_, jsonrpsee::types::ErrorObjectOwned>(
                        handler.check_job_status(req).await,
                    )
                }
            })
            .map_err(|e| ServerError::Register(e.to_string()))?;

        let handler = self.handler.clone();
        module
            .register_async_method(method::GET_PREDICTION_RESULT, move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: JobIdRequest = params.parse()?;
                    Ok::<_, jsonrpsee::types::ErrorObjectOwned>(
                        handler.get_prediction_result(req).await,
                    )
                }
            })
            .map_err(|e| ServerError::Register(e.to_string()))?;

        let handler = self.handler.clone();
        module
            .register_async_method(method::LIST_JOBS, move |params, _, _| {
                let handler = handler.clone();
                async move {
                    // Params are optional here
                    let req = params.parse::<Option<ListJobsRequest>>()?.unwrap_or_default();
                    Ok::<_, jsonrpsee::types::ErrorObjectOwned>(handler.list_jobs(req).await)
                }
            })
            .map_err(|e| ServerError::Register(e.to_string()))?;

        let handler = self.handler.clone();
        module
            .register_async_method(method::GET_SERVER_INFO, move |_, _, _| {
                let handler = handler.clone();
                async move {
                    Ok::<_, jsonrpsee::types::ErrorObjectOwned>(handler.get_server_info().await)
                }
            })
            .map_err(|e| ServerError::Register(e.to_string()))?;

        Ok(module)
    }

    /// Start the JSON-RPC server over HTTP
    ///
    /// Returns the handle and the bound address (useful with port 0).
    pub async fn start(self) -> Result<(ServerHandle, SocketAddr), ServerError> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let auth = BearerAuth::new(self.config.auth_token.clone());

        info!(
            host = %self.config.host,
            port = %self.config.port,
            auth = self.config.auth_token.is_some(),
            "Starting JSON-RPC server on HTTP"
        );

        let module = self.build_module()?;

        // Upload size is enforced after decoding, not at the transport
        let server = Server::builder()
            .max_request_body_size(u32::MAX)
            .max_response_body_size(u32::MAX)
            .set_http_middleware(tower::ServiceBuilder::new().layer(auth.layer()))
            .build(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.clone(),
                source,
            })?;

        let local_addr = server.local_addr().map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;

        info!(addr = %local_addr, "JSON-RPC server started successfully");

        Ok((server.start(module), local_addr))
    }

    /// Serve newline-delimited JSON-RPC on stdin/stdout until EOF
    pub async fn serve_stdio(self) -> Result<(), ServerError> {
        let module = self.build_module()?;
        info!("Serving JSON-RPC over stdio");

        let reader = tokio::io::BufReader::new(tokio::io::stdin());
        stdio::serve_lines(&module, reader, tokio::io::stdout()).await?;

        info!("Stdio transport closed");
        Ok(())
    }
}
