// Panic isolation for inference tasks
use std::any::Any;
use tokio::task::JoinError;
use tracing::error;

/// Extract a readable message from a panic payload
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Describe why a spawned inference task did not return
pub fn describe_join_error(job_id: &str, join_err: JoinError) -> String {
    if join_err.is_panic() {
        let msg = panic_message(join_err.into_panic().as_ref());
        error!(job_id = %job_id, panic_msg = %msg, "Inference task panicked");
        format!("Inference task panicked: {}", msg)
    } else {
        error!(job_id = %job_id, "Inference task cancelled");
        "Inference task cancelled".to_string()
    }
}
