//! Process configuration from the environment

use anyhow::{bail, Context, Result};
use boltz_api_rpc::server::{DEFAULT_RPC_HOST, DEFAULT_RPC_PORT};
use boltz_api_rpc::RpcServerConfig;
use boltz_core::port::artifact_store::DEFAULT_MAX_UPLOAD_BYTES;
use boltz_infra_system::boltz_runner::DEFAULT_BOLTZ_BINARY;
use std::path::PathBuf;

const DEFAULT_DATA_DIR: &str = "~/.boltz_mcp";
const BYTES_PER_MB: usize = 1024 * 1024;

/// RPC transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Http,
    Stdio,
}

impl std::str::FromStr for Transport {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(Transport::Http),
            "stdio" => Ok(Transport::Stdio),
            other => bail!("Unknown transport '{}' (expected http or stdio)", other),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub transport: Transport,
    pub host: String,
    pub port: u16,
    pub auth_token: Option<String>,
    /// Root of uploads/, outputs/ and models/
    pub data_dir: PathBuf,
    pub boltz_binary: PathBuf,
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    /// Load from `BOLTZ_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary variable lookup; unset and empty are equivalent
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let transport = match var("BOLTZ_TRANSPORT") {
            Some(value) => value.parse().context("Invalid BOLTZ_TRANSPORT")?,
            None => Transport::Http,
        };

        let port = match var("BOLTZ_PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .with_context(|| format!("Invalid BOLTZ_PORT '{}'", value))?,
            None => DEFAULT_RPC_PORT,
        };

        let max_upload_bytes = match var("BOLTZ_MAX_UPLOAD_MB") {
            Some(value) => {
                let mb = value
                    .trim()
                    .parse::<usize>()
                    .with_context(|| format!("Invalid BOLTZ_MAX_UPLOAD_MB '{}'", value))?;
                if mb == 0 {
                    bail!("BOLTZ_MAX_UPLOAD_MB must be positive");
                }
                mb.checked_mul(BYTES_PER_MB)
                    .context("BOLTZ_MAX_UPLOAD_MB is too large")?
            }
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        let data_dir = var("BOLTZ_DATA_DIR").unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());

        Ok(Self {
            transport,
            host: var("BOLTZ_HOST").unwrap_or_else(|| DEFAULT_RPC_HOST.to_string()),
            port,
            auth_token: var("BOLTZ_AUTH_TOKEN"),
            data_dir: PathBuf::from(shellexpand::tilde(&data_dir).into_owned()),
            boltz_binary: PathBuf::from(
                var("BOLTZ_BINARY").unwrap_or_else(|| DEFAULT_BOLTZ_BINARY.to_string()),
            ),
            max_upload_bytes,
        })
    }

    pub fn rpc_config(&self) -> RpcServerConfig {
        RpcServerConfig {
            host: self.host.clone(),
            port: self.port,
            auth_token: self.auth_token.clone(),
        }
    }
}
