//! Job lifecycle through the prediction service
//!
//! Real registry and artifact store, mocked inference runner.

mod common;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use boltz_core::application::prediction::{SubmitFileRequest, SubmitSequenceRequest};
use boltz_core::domain::JobStatus;
use boltz_core::error::AppError;
use boltz_core::port::inference_runner::mocks::{MockBehavior, MockInferenceRunner};
use boltz_core::port::time_provider::mocks::SteppingTimeProvider;
use boltz_core::port::JobRegistry;
use chrono::{TimeZone, Utc};
use common::HarnessBuilder;
use std::sync::Arc;
use std::time::Duration;

fn file_request(content: &[u8], filename: &str) -> SubmitFileRequest {
    SubmitFileRequest {
        content: STANDARD.encode(content),
        filename: filename.to_string(),
        recycling_steps: 3,
        sampling_steps: 200,
        devices: "0".to_string(),
        diffusion_samples: 1,
    }
}

fn sequence_request(sequence: &str) -> SubmitSequenceRequest {
    SubmitSequenceRequest {
        sequence: sequence.to_string(),
        chain_id: "A".to_string(),
        recycling_steps: 3,
        sampling_steps: 200,
        devices: "0".to_string(),
        diffusion_samples: 1,
    }
}

/// Sequence `ACDEFG` on chain `A` runs to completion and its output round-trips
#[tokio::test]
async fn test_sequence_submission_end_to_end() {
    let runner = Arc::new(MockInferenceRunner::new_success());
    let h = HarnessBuilder::new(runner.clone()).build();

    let submission = h
        .service
        .submit_sequence(sequence_request("ACDEFG"))
        .await
        .unwrap();

    assert_eq!(submission.status, JobStatus::Queued);
    assert_eq!(submission.job_id.len(), 16);
    assert_eq!(
        submission.message,
        "Prediction job started for sequence (length: 6). Use check_job_status() to monitor progress."
    );

    let job = h.wait_terminal(&submission.job_id).await;
    assert_eq!(job.status(), JobStatus::Completed);
    assert!(job.error().is_none());
    assert!(job.started_at().is_some());
    assert!(job.completed_at().is_some());
    assert_eq!(job.metadata.sequence_length, Some(6));
    assert_eq!(job.metadata.chain_id.as_deref(), Some("A"));
    assert!(job.metadata.filename.starts_with("sequence_"));
    assert!(job.metadata.filename.ends_with(".fasta"));

    // Synthesized FASTA input
    assert_eq!(
        std::fs::read_to_string(&job.input_path).unwrap(),
        ">A\nACDEFG\n"
    );

    // Output lives under the job's own directory
    let output = job.output_path().unwrap().to_path_buf();
    assert!(output.starts_with(h.layout.output_dir.join(&submission.job_id)));

    let result = h.service.get_result(&submission.job_id).await.unwrap();
    assert_eq!(result.filename, "input_model_0.cif");
    assert_eq!(
        STANDARD.decode(result.cif_content).unwrap(),
        std::fs::read(&output).unwrap()
    );
    assert_eq!(result.job_info.id, submission.job_id);

    // Device count, not ids, reaches the runner
    let requests = runner.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].params.device_count(), 1);
    assert_eq!(
        requests[0].output_dir,
        h.layout.output_dir.join(&submission.job_id)
    );
}

#[tokio::test]
async fn test_file_submission_saves_bytes_verbatim() {
    let h = HarnessBuilder::new(Arc::new(MockInferenceRunner::new_success())).build();
    let pdb = b"HEADER    TEST\nATOM      1  N   MET A   1      11.104   6.134  -6.504\nEND\n";

    let submission = h
        .service
        .submit_file(file_request(pdb, "1abc.pdb"))
        .await
        .unwrap();

    assert_eq!(
        submission.message,
        "Prediction job started for 1abc.pdb. Use check_job_status() to monitor progress."
    );

    let saved = h.layout.upload_dir.join("1abc.pdb");
    assert_eq!(std::fs::read(saved).unwrap(), pdb);

    let job = h.wait_terminal(&submission.job_id).await;
    assert_eq!(job.metadata.filename, "1abc.pdb");
    assert!(job.metadata.sequence_length.is_none());
    assert_eq!(job.status(), JobStatus::Completed);
}

#[tokio::test]
async fn test_result_before_completion_is_state_error() {
    let (runner, gate) = MockInferenceRunner::new_success().gated();
    let h = HarnessBuilder::new(Arc::new(runner)).build();

    let submission = h
        .service
        .submit_file(file_request(b"ATOM", "gated.pdb"))
        .await
        .unwrap();

    match h.service.get_result(&submission.job_id).await {
        Err(AppError::NotCompleted(status)) => {
            assert!(matches!(status, JobStatus::Queued | JobStatus::Running))
        }
        other => panic!("expected NotCompleted, got {:?}", other.map(|r| r.filename)),
    }

    // Wait until the runner holds the job
    tokio::time::timeout(Duration::from_secs(5), async {
        while h.service.get_status(&submission.job_id).await.unwrap().status()
            != JobStatus::Running
        {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();

    let err = h.service.get_result(&submission.job_id).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Job is not completed yet. Current status: running"
    );

    gate.notify_one();
    let job = h.wait_terminal(&submission.job_id).await;
    assert_eq!(job.status(), JobStatus::Completed);
    assert!(h.service.get_result(&submission.job_id).await.is_ok());
}

#[tokio::test]
async fn test_nonzero_exit_records_stderr_verbatim() {
    let stderr = "RuntimeError: CUDA out of memory\n  at layer 12\n";
    let h = HarnessBuilder::new(Arc::new(MockInferenceRunner::new_fail(stderr))).build();

    let submission = h
        .service
        .submit_file(file_request(b"ATOM", "oom.pdb"))
        .await
        .unwrap();
    let job = h.wait_terminal(&submission.job_id).await;

    assert_eq!(job.status(), JobStatus::Failed);
    assert_eq!(job.error(), Some(stderr));
    assert!(job.output_path().is_none());
    assert!(job.completed_at().is_some());

    let err = h.service.get_result(&submission.job_id).await.unwrap_err();
    assert!(matches!(err, AppError::NotCompleted(JobStatus::Failed)));
}

#[tokio::test]
async fn test_zero_exit_without_structure_fails() {
    let runner = MockInferenceRunner::new(MockBehavior::Success(vec![
        "boltz_results/log.txt".to_string(),
        "boltz_results/confidence.json".to_string(),
    ]));
    let h = HarnessBuilder::new(Arc::new(runner)).build();

    let submission = h
        .service
        .submit_file(file_request(b"ATOM", "empty.pdb"))
        .await
        .unwrap();
    let job = h.wait_terminal(&submission.job_id).await;

    assert_eq!(job.status(), JobStatus::Failed);
    assert_eq!(
        job.error(),
        Some("No CIF output file found after prediction")
    );
}

#[tokio::test]
async fn test_spawn_failure_recorded_on_job() {
    let runner = MockInferenceRunner::new(MockBehavior::SpawnError(
        "boltz: No such file or directory".to_string(),
    ));
    let h = HarnessBuilder::new(Arc::new(runner)).build();

    let submission = h
        .service
        .submit_file(file_request(b"ATOM", "nobin.pdb"))
        .await
        .unwrap();
    let job = h.wait_terminal(&submission.job_id).await;

    assert_eq!(job.status(), JobStatus::Failed);
    assert!(job.error().unwrap().contains("No such file or directory"));
}

#[tokio::test]
async fn test_runner_panic_is_isolated() {
    let h = HarnessBuilder::new(Arc::new(MockInferenceRunner::new_panic_inducing(
        "model exploded",
    )))
    .build();

    let first = h
        .service
        .submit_file(file_request(b"ATOM", "panic1.pdb"))
        .await
        .unwrap();
    let job = h.wait_terminal(&first.job_id).await;

    assert_eq!(job.status(), JobStatus::Failed);
    assert!(job.error().unwrap().contains("model exploded"));

    // The service keeps accepting work
    let second = h
        .service
        .submit_file(file_request(b"ATOM", "panic2.pdb"))
        .await
        .unwrap();
    assert_eq!(
        h.wait_terminal(&second.job_id).await.status(),
        JobStatus::Failed
    );
    assert_eq!(h.registry.count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_invalid_sequence_leaves_no_trace() {
    let runner = Arc::new(MockInferenceRunner::new_success());
    let h = HarnessBuilder::new(runner.clone()).build();

    let err = h
        .service
        .submit_sequence(sequence_request("MKTX1Q"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(
        err.to_string(),
        "Invalid amino acid sequence. Use single-letter codes only."
    );
    assert_eq!(h.registry.count().await.unwrap(), 0);
    assert!(h.uploads().is_empty());
    assert_eq!(runner.call_count(), 0);
}

#[tokio::test]
async fn test_sequence_is_normalized() {
    let h = HarnessBuilder::new(Arc::new(MockInferenceRunner::new_success())).build();

    let submission = h
        .service
        .submit_sequence(sequence_request(" mkta yiak\nqrq "))
        .await
        .unwrap();
    let job = h.service.get_status(&submission.job_id).await.unwrap();

    assert_eq!(job.metadata.sequence_length, Some(11));
    assert_eq!(
        std::fs::read_to_string(&job.input_path).unwrap(),
        ">A\nMKTAYIAKQRQ\n"
    );
}

#[tokio::test]
async fn test_malformed_devices_rejected_before_write() {
    let runner = Arc::new(MockInferenceRunner::new_success());
    let h = HarnessBuilder::new(runner.clone()).build();

    let mut req = file_request(b"ATOM", "devices.pdb");
    req.devices = "0,gpu1".to_string();
    let err = h.service.submit_file(req).await.unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert!(h.uploads().is_empty());
    assert_eq!(h.registry.count().await.unwrap(), 0);
    assert_eq!(runner.call_count(), 0);
}

#[tokio::test]
async fn test_device_list_is_trimmed_and_counted() {
    let runner = Arc::new(MockInferenceRunner::new_success());
    let h = HarnessBuilder::new(runner.clone()).build();

    let mut req = file_request(b"ATOM", "multi.pdb");
    req.devices = "0, 1 ,3".to_string();
    let submission = h.service.submit_file(req).await.unwrap();
    let job = h.wait_terminal(&submission.job_id).await;

    assert_eq!(job.metadata.params.devices, vec![0, 1, 3]);
    assert_eq!(runner.requests()[0].params.device_count(), 3);
}

#[tokio::test]
async fn test_oversized_upload_rejected() {
    let h = HarnessBuilder::new(Arc::new(MockInferenceRunner::new_success()))
        .max_upload_bytes(16)
        .build();

    let err = h
        .service
        .submit_file(file_request(&[b'A'; 17], "big.pdb"))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "File too large: 17 bytes (max: 16)");
    assert!(h.uploads().is_empty());
    assert_eq!(h.registry.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_invalid_base64_rejected() {
    let h = HarnessBuilder::new(Arc::new(MockInferenceRunner::new_success())).build();

    let mut req = file_request(b"", "bad.pdb");
    req.content = "%%% not base64 %%%".to_string();
    let err = h.service.submit_file(req).await.unwrap_err();

    assert!(err.to_string().starts_with("Invalid base64 content"));
    assert_eq!(h.registry.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_list_jobs_newest_first() {
    let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    let clock = Arc::new(SteppingTimeProvider::new(start, chrono::Duration::seconds(1)));
    let h = HarnessBuilder::new(Arc::new(MockInferenceRunner::new_success()))
        .time_provider(clock)
        .build();

    let mut ids = Vec::new();
    for name in ["a.pdb", "b.pdb", "c.pdb"] {
        let submission = h
            .service
            .submit_file(file_request(b"ATOM", name))
            .await
            .unwrap();
        ids.push(submission.job_id);
    }

    let list = h.service.list_jobs(2).await.unwrap();
    assert_eq!(list.total, 3);
    let listed: Vec<&str> = list.jobs.iter().map(|j| j.job_id.as_str()).collect();
    assert_eq!(listed, vec![ids[2].as_str(), ids[1].as_str()]);
    assert_eq!(list.jobs[0].filename, "c.pdb");
}

#[tokio::test]
async fn test_same_filename_gets_distinct_ids() {
    let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    let clock = Arc::new(SteppingTimeProvider::new(
        start,
        chrono::Duration::nanoseconds(1),
    ));
    let h = HarnessBuilder::new(Arc::new(MockInferenceRunner::new_success()))
        .time_provider(clock)
        .build();

    let first = h
        .service
        .submit_file(file_request(b"ATOM", "same.pdb"))
        .await
        .unwrap();
    let second = h
        .service
        .submit_file(file_request(b"ATOM", "same.pdb"))
        .await
        .unwrap();

    assert_ne!(first.job_id, second.job_id);
    assert!(first.job_id.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(h.registry.count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_unknown_job_is_not_found() {
    let h = HarnessBuilder::new(Arc::new(MockInferenceRunner::new_success())).build();

    let err = h.service.get_status("ffffffffffffffff").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(err.to_string(), "Job ID ffffffffffffffff not found");

    let err = h.service.get_result("ffffffffffffffff").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_missing_output_file_is_load_error() {
    let h = HarnessBuilder::new(Arc::new(MockInferenceRunner::new_success())).build();

    let submission = h
        .service
        .submit_file(file_request(b"ATOM", "gone.pdb"))
        .await
        .unwrap();
    let job = h.wait_terminal(&submission.job_id).await;
    std::fs::remove_file(job.output_path().unwrap()).unwrap();

    let err = h.service.get_result(&submission.job_id).await.unwrap_err();
    assert!(matches!(err, AppError::OutputUnavailable(_)));
    assert!(err
        .to_string()
        .starts_with("Failed to load output file: Output file not found:"));
}

#[tokio::test]
async fn test_server_info_counts_jobs() {
    let (runner, gate) = MockInferenceRunner::new_success().gated();
    let h = HarnessBuilder::new(Arc::new(runner)).build();

    let submission = h
        .service
        .submit_file(file_request(b"ATOM", "info.pdb"))
        .await
        .unwrap();

    tokio::time::timeout(Duration::from_secs(5), async {
        while h.service.server_info().await.unwrap().active_jobs != 1 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();

    gate.notify_one();
    h.wait_terminal(&submission.job_id).await;

    let info = h.service.server_info().await.unwrap();
    assert_eq!(info.server, "Boltz Prediction Server");
    assert_eq!(info.total_jobs, 1);
    assert_eq!(info.active_jobs, 0);
    assert_eq!(info.max_upload_size_mb, 100.0);
    assert_eq!(info.gpu_info, "Unknown (check with nvidia-smi)");
    assert!(info.accelerators.is_empty());
    assert_eq!(info.output_dir, h.layout.output_dir);
    let disk = info.disk_usage.unwrap();
    assert_eq!(disk.total_gb, 500.0);
    assert_eq!(disk.free_gb, 400.0);
}
