//! Boltz Client Implementation

use crate::error::{Result, SdkError};
use crate::types::{
    JobInfo, JobList, PredictFromPdbRequest, PredictFromSequenceRequest, PredictionResult,
    ServerInfo, SubmitResponse,
};
use http::header::AUTHORIZATION;
use http::{HeaderMap, HeaderValue};
use jsonrpsee::core::client::ClientT;
use jsonrpsee::core::params::ObjectParams;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Boltz Prediction Server Client
///
/// # Example
///
/// ```no_run
/// use boltz_sdk::{BoltzClient, PredictFromSequenceRequest};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = BoltzClient::connect("http://127.0.0.1:8000").await?;
/// let submitted = client
///     .predict_from_sequence(PredictFromSequenceRequest::new("MKTAYIAKQRQ"))
///     .await?;
/// println!("Job ID: {}", submitted.job_id);
/// # Ok(())
/// # }
/// ```
pub struct BoltzClient {
    client: HttpClient,
}

impl BoltzClient {
    /// Connect to an open server
    pub async fn connect(url: impl AsRef<str>) -> Result<Self> {
        Self::connect_with_token(url, None).await
    }

    /// Connect, sending `Authorization: Bearer <token>` when a token is given
    pub async fn connect_with_token(url: impl AsRef<str>, token: Option<&str>) -> Result<Self> {
        let url = url.as_ref();

        let mut headers = HeaderMap::new();
        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| SdkError::InvalidToken(e.to_string()))?;
            headers.insert(AUTHORIZATION, value);
        }

        // Uploads may be large
        let client = HttpClientBuilder::default()
            .request_timeout(Duration::from_secs(120))
            .max_request_size(u32::MAX)
            .max_response_size(u32::MAX)
            .set_headers(headers)
            .build(url)
            .map_err(|e| SdkError::Connection(format!("Failed to create client: {}", e)))?;

        Ok(Self { client })
    }

    /// Submit a base64-encoded structure file
    pub async fn predict_from_pdb(&self, request: PredictFromPdbRequest) -> Result<SubmitResponse> {
        self.call("predict_structure_from_pdb", object_params(&request)?)
            .await
    }

    /// Submit an amino-acid sequence
    pub async fn predict_from_sequence(
        &self,
        request: PredictFromSequenceRequest,
    ) -> Result<SubmitResponse> {
        self.call("predict_structure_from_sequence", object_params(&request)?)
            .await
    }

    /// Full job record
    pub async fn check_job_status(&self, job_id: impl AsRef<str>) -> Result<JobInfo> {
        self.call("check_job_status", job_id_params(job_id.as_ref())?)
            .await
    }

    /// Encoded output of a completed job
    ///
    /// An unfinished job is rejected with its current status in
    /// `SdkError::Rejected::status`.
    pub async fn get_prediction_result(&self, job_id: impl AsRef<str>) -> Result<PredictionResult> {
        self.call("get_prediction_result", job_id_params(job_id.as_ref())?)
            .await
    }

    /// Most recent jobs, newest first (`None` = server default of 10)
    pub async fn list_jobs(&self, limit: Option<usize>) -> Result<JobList> {
        let mut params = ObjectParams::new();
        if let Some(limit) = limit {
            params.insert("limit", limit)?;
        }
        self.call("list_jobs", params).await
    }

    pub async fn get_server_info(&self) -> Result<ServerInfo> {
        self.call("get_server_info", ObjectParams::new()).await
    }

    /// Poll `check_job_status` until the job reaches a terminal status
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use boltz_sdk::BoltzClient;
    /// # use std::time::Duration;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// # let client = BoltzClient::connect("http://127.0.0.1:8000").await?;
    /// let job = client
    ///     .wait_for_completion("0123456789abcdef", Duration::from_secs(5), Duration::from_secs(3600))
    ///     .await?;
    /// println!("{} finished as {}", job.job_id, job.status);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn wait_for_completion(
        &self,
        job_id: impl AsRef<str>,
        poll_interval: Duration,
        timeout: Duration,
    ) -> Result<JobInfo> {
        let job_id = job_id.as_ref();

        let poll = async {
            loop {
                let job = self.check_job_status(job_id).await?;
                if job.status.is_terminal() {
                    return Ok::<JobInfo, SdkError>(job);
                }
                tokio::time::sleep(poll_interval).await;
            }
        };

        tokio::time::timeout(timeout, poll)
            .await
            .map_err(|_| SdkError::Timeout(job_id.to_string()))?
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: ObjectParams) -> Result<T> {
        let reply: Value = self.client.request(method, params).await?;
        decode_reply(reply)
    }
}

/// Named params from a serializable request struct
fn object_params<T: Serialize>(request: &T) -> Result<ObjectParams> {
    let mut params = ObjectParams::new();
    match serde_json::to_value(request)? {
        Value::Object(fields) => {
            for (name, value) in fields {
                params.insert(&name, value)?;
            }
            Ok(params)
        }
        other => Err(SdkError::Other(format!(
            "Request must serialize to an object, got {}",
            other
        ))),
    }
}

fn job_id_params(job_id: &str) -> Result<ObjectParams> {
    let mut params = ObjectParams::new();
    params.insert("job_id", job_id)?;
    Ok(params)
}

/// Split a reply into its success body or `SdkError::Rejected`
///
/// Only the error envelope carries a numeric `code`. A failed job record also
/// has `error`, but it is a successful `check_job_status` reply.
fn decode_reply<T: DeserializeOwned>(reply: Value) -> Result<T> {
    let code = reply
        .get("code")
        .and_then(Value::as_i64)
        .and_then(|c| i32::try_from(c).ok());

    if let (Some(code), Some(error)) = (code, reply.get("error").and_then(Value::as_str)) {
        let status = reply
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or("error")
            .to_string();

        return Err(SdkError::Rejected {
            status,
            error: error.to_string(),
            code,
        });
    }

    Ok(serde_json::from_value(reply)?)
}
