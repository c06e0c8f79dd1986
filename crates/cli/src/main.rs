//! Boltz CLI - Command-line client for the Boltz prediction server

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::PathBuf;
use tabled::{Table, Tabled};

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8000";

#[derive(Parser)]
#[command(name = "boltz-client")]
#[command(about = "Boltz Prediction Server CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC server URL
    #[arg(long, env = "BOLTZ_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,

    /// Bearer token, if the server requires one
    #[arg(long, env = "BOLTZ_AUTH_TOKEN", hide_env_values = true)]
    auth_token: Option<String>,
}

#[derive(Args)]
struct InferenceArgs {
    /// Recycling steps
    #[arg(long, default_value = "3")]
    recycling_steps: u32,

    /// Sampling steps
    #[arg(long, default_value = "200")]
    sampling_steps: u32,

    /// Comma-separated device ids
    #[arg(long, default_value = "0")]
    devices: String,

    /// Number of diffusion samples
    #[arg(long, default_value = "1")]
    diffusion_samples: u32,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a structure file (PDB, FASTA, YAML)
    SubmitPdb {
        /// Input file
        file: PathBuf,

        /// Name to store the upload under (default: the file's name)
        #[arg(long)]
        filename: Option<String>,

        #[command(flatten)]
        inference: InferenceArgs,
    },

    /// Submit an amino-acid sequence
    SubmitSeq {
        /// Single-letter amino-acid codes
        sequence: String,

        /// Chain identifier
        #[arg(long, default_value = "A")]
        chain_id: String,

        #[command(flatten)]
        inference: InferenceArgs,
    },

    /// Show a job's full record
    Status {
        /// Job ID
        job_id: String,
    },

    /// Download the structure of a completed job
    Result {
        /// Job ID
        job_id: String,

        /// Output path (default: the server-side file name)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// List recent jobs
    List {
        /// Maximum number of jobs
        #[arg(short = 'n', long, default_value = "10")]
        limit: usize,
    },

    /// Show server information
    Info,
}

#[derive(Serialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    params: Value,
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    result: Option<Value>,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

#[derive(Deserialize, Tabled)]
struct SubmitResult {
    job_id: String,
    status: String,
    message: String,
}

#[derive(Deserialize, Tabled)]
struct JobRow {
    job_id: String,
    status: String,
    filename: String,
    created_at: String,
}

struct RpcClient {
    url: String,
    auth_token: Option<String>,
    http: reqwest::Client,
}

impl RpcClient {
    fn new(url: String, auth_token: Option<String>) -> Self {
        Self {
            url,
            auth_token,
            http: reqwest::Client::new(),
        }
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
            id: 1,
        };

        let mut builder = self.http.post(&self.url).json(&request);
        if let Some(token) = &self.auth_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .context("Failed to connect to server")?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            anyhow::bail!("Unauthorized: check BOLTZ_AUTH_TOKEN");
        }

        let response: JsonRpcResponse = response
            .json()
            .await
            .context("Failed to parse response")?;

        if let Some(error) = response.error {
            anyhow::bail!("RPC error ({}): {}", error.code, error.message);
        }

        let result = response
            .result
            .ok_or_else(|| anyhow::anyhow!("No result in response"))?;
        check_reply(result)
    }
}

/// Fail on `{status, error, code}` replies
///
/// A failed job record has `error` but no `code`, and is passed through.
fn check_reply(reply: Value) -> Result<Value> {
    let is_error_reply = reply.get("code").is_some_and(Value::is_i64);
    let error = reply.get("error").and_then(Value::as_str).filter(|_| is_error_reply);
    if let Some(error) = error {
        let status = reply.get("status").and_then(Value::as_str).unwrap_or("error");
        anyhow::bail!("{} ({})", error, status);
    }
    Ok(reply)
}

fn inference_params(args: &InferenceArgs) -> Value {
    json!({
        "recycling_steps": args.recycling_steps,
        "sampling_steps": args.sampling_steps,
        "devices": args.devices,
        "diffusion_samples": args.diffusion_samples,
    })
}

/// Merge two JSON objects (right wins)
fn merge(mut left: Value, right: Value) -> Value {
    if let (Some(l), Value::Object(r)) = (left.as_object_mut(), right) {
        l.extend(r);
    }
    left
}

fn colored_status(status: &str) -> String {
    match status {
        "completed" | "success" => status.green().to_string(),
        "failed" | "error" | "unknown" => status.red().to_string(),
        "running" => status.cyan().to_string(),
        _ => status.yellow().to_string(),
    }
}

fn print_submission(result: Value) -> Result<()> {
    let submission: SubmitResult = serde_json::from_value(result)?;
    println!("{}", "✓ Job submitted".green().bold());
    println!();
    println!("{}", Table::new(vec![submission]));
    Ok(())
}

fn field<'a>(value: &'a Value, key: &str) -> &'a str {
    value.get(key).and_then(Value::as_str).unwrap_or("-")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let rpc = RpcClient::new(cli.rpc_url.clone(), cli.auth_token.clone());

    match cli.command {
        Commands::SubmitPdb {
            file,
            filename,
            inference,
        } => {
            let bytes = std::fs::read(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let filename = match filename {
                Some(name) => name,
                None => file
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .context("Input path has no file name")?,
            };

            let params = merge(
                json!({ "pdb_content": STANDARD.encode(bytes), "filename": filename }),
                inference_params(&inference),
            );

            let result = rpc.call("predict_structure_from_pdb", params).await?;
            print_submission(result)?;
        }

        Commands::SubmitSeq {
            sequence,
            chain_id,
            inference,
        } => {
            let params = merge(
                json!({ "sequence": sequence, "chain_id": chain_id }),
                inference_params(&inference),
            );

            let result = rpc.call("predict_structure_from_sequence", params).await?;
            print_submission(result)?;
        }

        Commands::Status { job_id } => {
            let job = rpc
                .call("check_job_status", json!({ "job_id": job_id }))
                .await?;

            println!("{}", format!("Job {}", job_id).cyan().bold());
            println!();
            println!("  {} {}", "Status:".bold(), colored_status(field(&job, "status")));
            println!("  {} {}", "File:".bold(), field(&job, "filename"));
            println!("  {} {}", "Created:".bold(), field(&job, "created_at"));
            println!("  {} {}", "Started:".bold(), field(&job, "started_at"));
            println!("  {} {}", "Finished:".bold(), field(&job, "completed_at"));
            if let Some(output) = job.get("output_path").and_then(Value::as_str) {
                println!("  {} {}", "Output:".bold(), output);
            }
            if let Some(error) = job.get("error").and_then(Value::as_str) {
                println!("  {} {}", "Error:".bold(), error.red());
            }
        }

        Commands::Result { job_id, out } => {
            let result = rpc
                .call("get_prediction_result", json!({ "job_id": job_id }))
                .await?;

            let content = STANDARD
                .decode(field(&result, "cif_content"))
                .context("Server returned invalid base64")?;
            let out = out.unwrap_or_else(|| PathBuf::from(field(&result, "filename")));

            std::fs::write(&out, &content)
                .with_context(|| format!("Failed to write {}", out.display()))?;

            println!(
                "{}",
                format!("✓ Saved {} ({} bytes)", out.display(), content.len())
                    .green()
                    .bold()
            );
        }

        Commands::List { limit } => {
            let result = rpc.call("list_jobs", json!({ "limit": limit })).await?;
            let jobs: Vec<JobRow> = serde_json::from_value(result["jobs"].clone())?;

            if jobs.is_empty() {
                println!("{}", "No jobs yet".yellow());
            } else {
                println!("{}", Table::new(jobs));
            }
            println!();
            println!("  {} {}", "Total jobs:".bold(), result["total"]);
        }

        Commands::Info => {
            println!("{}", "Server Info".cyan().bold());
            println!();

            match rpc.call("get_server_info", json!({})).await {
                Ok(info) => {
                    println!("  {} {}", "RPC URL:".bold(), cli.rpc_url);
                    println!("  {} {}", "Status:".bold(), "ONLINE".green());
                    println!(
                        "  {} {} v{}",
                        "Server:".bold(),
                        field(&info, "server"),
                        field(&info, "version")
                    );
                    println!("  {} {}", "GPU:".bold(), field(&info, "gpu_info"));
                    println!();
                    println!("  {} {}", "Active Jobs:".bold(), info["active_jobs"]);
                    println!("  {} {}", "Total Jobs:".bold(), info["total_jobs"]);
                    println!(
                        "  {} {:.1} MB",
                        "Max Upload:".bold(),
                        info["max_upload_size_mb"].as_f64().unwrap_or(0.0)
                    );
                    if let Some(disk) = info.get("disk_usage").filter(|d| !d.is_null()) {
                        println!(
                            "  {} {:.1} GB free of {:.1} GB",
                            "Disk:".bold(),
                            disk["free_gb"].as_f64().unwrap_or(0.0),
                            disk["total_gb"].as_f64().unwrap_or(0.0)
                        );
                    }
                    println!();
                    println!("  {} {}", "Uploads:".bold(), field(&info, "upload_dir"));
                    println!("  {} {}", "Outputs:".bold(), field(&info, "output_dir"));
                    println!("  {} {}", "Models:".bold(), field(&info, "model_cache_dir"));
                }
                Err(e) => {
                    println!("  {} {}", "Status:".bold(), "ERROR".red());
                    println!("  {} {}", "Error:".bold(), e);
                }
            }
        }
    }

    Ok(())
}
