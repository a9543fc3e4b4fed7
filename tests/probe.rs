//! Diagnostic probe verdicts over scripted bridge behavior.

mod common;

use std::time::Duration;

use bridge_bench::{diagnose, AttemptVerdict, ProbeConfig, ProbeError, ProbeVerdict};

use common::{FakeBridge, FrameScript};

fn probe_config() -> ProbeConfig {
    ProbeConfig::default()
        .with_timeouts(vec![
            Duration::from_secs(5),
            Duration::from_secs(10),
            Duration::from_secs(30),
        ])
        .with_retry_pause(Duration::from_millis(0))
}

#[tokio::test]
async fn test_capture_timing_out_at_every_deadline_means_hanging() {
    let rpc = FakeBridge::with_frame_script(vec![
        FrameScript::Timeout,
        FrameScript::Timeout,
        FrameScript::Timeout,
    ]);

    let report = diagnose(&rpc, &probe_config()).await.unwrap();

    assert_eq!(report.verdict, ProbeVerdict::BridgeHanging);
    assert!(report.frame.is_none());

    // All three escalating deadlines were tried.
    let secs: Vec<u64> = rpc.capture_timeouts().iter().map(|t| t.as_secs()).collect();
    assert_eq!(secs, vec![5, 10, 30]);

    // The evidence trail records each timeout as the hang signature.
    let capture_verdicts: Vec<AttemptVerdict> = report
        .attempts
        .iter()
        .filter(|a| a.rpc_name == "GetFrame")
        .map(|a| a.verdict)
        .collect();
    assert_eq!(capture_verdicts, vec![AttemptVerdict::Timeout; 3]);
}

#[tokio::test]
async fn test_first_successful_capture_short_circuits_escalation() {
    let rpc = FakeBridge::new();

    let report = diagnose(&rpc, &probe_config()).await.unwrap();

    assert_eq!(report.verdict, ProbeVerdict::BridgeHealthy);
    assert!(report.frame.is_some());

    // Later timeouts were never attempted.
    let secs: Vec<u64> = rpc.capture_timeouts().iter().map(|t| t.as_secs()).collect();
    assert_eq!(secs, vec![5]);
}

#[tokio::test]
async fn test_empty_frames_escalate_then_conclude_hanging() {
    let rpc = FakeBridge::with_frame_script(vec![
        FrameScript::Empty,
        FrameScript::Empty,
        FrameScript::Empty,
    ]);

    let report = diagnose(&rpc, &probe_config()).await.unwrap();

    assert_eq!(report.verdict, ProbeVerdict::BridgeHanging);
    let capture_verdicts: Vec<AttemptVerdict> = report
        .attempts
        .iter()
        .filter(|a| a.rpc_name == "GetFrame")
        .map(|a| a.verdict)
        .collect();
    assert_eq!(capture_verdicts, vec![AttemptVerdict::EmptyResponse; 3]);
}

#[tokio::test]
async fn test_recovery_on_second_deadline_is_healthy() {
    let rpc = FakeBridge::with_frame_script(vec![FrameScript::Timeout]);

    let report = diagnose(&rpc, &probe_config()).await.unwrap();

    assert_eq!(report.verdict, ProbeVerdict::BridgeHealthy);
    let secs: Vec<u64> = rpc.capture_timeouts().iter().map(|t| t.as_secs()).collect();
    assert_eq!(secs, vec![5, 10]);
}

#[tokio::test]
async fn test_heartbeat_failure_is_fatal_to_the_probe() {
    let mut fake = FakeBridge::new();
    fake.fail_heartbeat = true;

    let err = diagnose(&fake, &probe_config()).await.unwrap_err();

    let ProbeError::ChannelBroken { call, attempts, .. } = err;
    assert_eq!(call, "Heartbeat");
    // The probe stopped immediately: no registration, no capture.
    assert_eq!(attempts.len(), 1);
    assert!(fake.capture_timeouts().is_empty());
}

#[tokio::test]
async fn test_register_failure_is_fatal_to_the_probe() {
    let mut fake = FakeBridge::new();
    fake.fail_register = true;

    let err = diagnose(&fake, &probe_config()).await.unwrap_err();

    let ProbeError::ChannelBroken { call, .. } = err;
    assert_eq!(call, "RegisterAgent");
    assert!(fake.capture_timeouts().is_empty());
}
