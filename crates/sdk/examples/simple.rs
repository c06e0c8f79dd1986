//! Simple SDK Example
//!
//! Submits a short sequence, waits for the job and prints the result size.
//!
//! # Usage
//!
//! 1. Start the server:
//!    ```bash
//!    cargo run --package boltz-daemon
//!    ```
//!
//! 2. Run this example:
//!    ```bash
//!    cargo run --package boltz-sdk --example simple
//!    ```

use boltz_sdk::{BoltzClient, PredictFromSequenceRequest, SdkError};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Boltz SDK - Simple Example");
    println!("==========================\n");

    // 1. Connect to server
    let url = std::env::var("BOLTZ_RPC_URL").unwrap_or_else(|_| "http://127.0.0.1:8000".into());
    let token = std::env::var("BOLTZ_AUTH_TOKEN").ok();
    println!("1. Connecting to {}...", url);
    let client = BoltzClient::connect_with_token(&url, token.as_deref()).await?;

    let info = client.get_server_info().await?;
    println!("   ✓ {} v{} ({})\n", info.server, info.version, info.gpu_info);

    // 2. Submit a sequence
    println!("2. Submitting sequence...");
    let mut request = PredictFromSequenceRequest::new("MKTAYIAKQRQISFVKSHFSRQ");
    request.options.sampling_steps = Some(50);
    let submitted = client.predict_from_sequence(request).await?;
    println!("   ✓ Job {} {}\n", submitted.job_id, submitted.status);

    // 3. Wait for completion
    println!("3. Waiting for completion...");
    let job = client
        .wait_for_completion(
            &submitted.job_id,
            Duration::from_secs(5),
            Duration::from_secs(60 * 60),
        )
        .await?;
    println!("   ✓ Finished as {}\n", job.status);

    // 4. Fetch the structure
    println!("4. Fetching result...");
    match client.get_prediction_result(&job.job_id).await {
        Ok(result) => println!(
            "   ✓ {} ({} base64 chars)",
            result.filename,
            result.cif_content.len()
        ),
        Err(SdkError::Rejected { status, error, .. }) => {
            println!("   ⚠ Job ended as {}: {}", status, error)
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
