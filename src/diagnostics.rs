//! Escalating-timeout diagnostic probe.
//!
//! When frame captures stall, this procedure localizes the hang:
//! heartbeat and a throwaway registration are cheap calls that prove the
//! channel works, then a capture is tried under each candidate deadline
//! in ascending order. If the cheap calls keep succeeding while every
//! capture attempt expires, the fault is in the bridge's observation
//! path, not the caller or the network.

use std::fmt;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::bridge::{BridgeRpc, Frame, RpcError};

/// Fixed bound for the heartbeat and registration steps. These are
/// cheap calls; if they fail the channel itself is broken, not slow.
pub const CONTROL_CALL_TIMEOUT: Duration = Duration::from_secs(5);

/// Default escalation sequence for the capture step.
pub const DEFAULT_ESCALATION_SECS: [u64; 3] = [5, 10, 30];

/// Outcome of one probe RPC attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptVerdict {
    Ok,
    Timeout,
    RpcError,
    EmptyResponse,
}

impl fmt::Display for AttemptVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptVerdict::Ok => f.write_str("ok"),
            AttemptVerdict::Timeout => f.write_str("timeout"),
            AttemptVerdict::RpcError => f.write_str("rpc_error"),
            AttemptVerdict::EmptyResponse => f.write_str("empty_response"),
        }
    }
}

/// Record of one probe RPC attempt.
#[derive(Debug, Clone)]
pub struct ProbeAttempt {
    pub rpc_name: &'static str,
    pub timeout_used: Duration,
    pub elapsed: Duration,
    pub verdict: AttemptVerdict,
}

/// Final verdict over the whole escalation sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeVerdict {
    /// A capture produced a non-empty frame; the bridge works.
    BridgeHealthy,
    /// Every candidate deadline was exhausted; the hang is in the
    /// bridge's observation path.
    BridgeHanging,
}

impl fmt::Display for ProbeVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeVerdict::BridgeHealthy => f.write_str("bridge_healthy"),
            ProbeVerdict::BridgeHanging => f.write_str("bridge_hanging"),
        }
    }
}

/// Verdict plus the ordered evidence trail.
#[derive(Debug)]
pub struct DiagnosticReport {
    pub verdict: ProbeVerdict,
    pub attempts: Vec<ProbeAttempt>,
    /// The frame that proved the bridge healthy, if any.
    pub frame: Option<Frame>,
}

/// Probe failures. A broken channel is reported immediately; it means
/// the bridge is unreachable, which is a different fault than a hang.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("bridge channel is broken: {call} failed: {source}")]
    ChannelBroken {
        call: &'static str,
        #[source]
        source: RpcError,
        attempts: Vec<ProbeAttempt>,
    },
}

/// Probe configuration.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Candidate capture deadlines, tried in order.
    pub timeouts: Vec<Duration>,
    /// Hub URL used for the throwaway diagnostic registration.
    pub hub_url: String,
    /// Pause between escalation attempts.
    pub retry_pause: Duration,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeouts: DEFAULT_ESCALATION_SECS
                .iter()
                .map(|s| Duration::from_secs(*s))
                .collect(),
            hub_url: "http://localhost:4545".to_string(),
            retry_pause: Duration::from_secs(2),
        }
    }
}

impl ProbeConfig {
    /// Set the escalation sequence.
    pub fn with_timeouts(mut self, timeouts: Vec<Duration>) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Set the pause between attempts.
    pub fn with_retry_pause(mut self, pause: Duration) -> Self {
        self.retry_pause = pause;
        self
    }
}

/// Run the probe: Heartbeat -> Register -> GetFrame per candidate
/// timeout, stopping at the first non-empty frame.
pub async fn diagnose<T: BridgeRpc>(
    rpc: &T,
    config: &ProbeConfig,
) -> Result<DiagnosticReport, ProbeError> {
    let mut attempts: Vec<ProbeAttempt> = Vec::new();

    for (index, &timeout) in config.timeouts.iter().enumerate() {
        info!("probe attempt with {:?} capture deadline", timeout);

        // Heartbeat with a short fixed bound. Failure is fatal: the
        // channel itself is broken, not merely slow.
        let started = Instant::now();
        match rpc.heartbeat("diagnostic", CONTROL_CALL_TIMEOUT).await {
            Ok(status) => {
                attempts.push(ProbeAttempt {
                    rpc_name: "Heartbeat",
                    timeout_used: CONTROL_CALL_TIMEOUT,
                    elapsed: started.elapsed(),
                    verdict: AttemptVerdict::Ok,
                });
                debug!(status = %status.status, "heartbeat ok");
            }
            Err(source) => {
                attempts.push(ProbeAttempt {
                    rpc_name: "Heartbeat",
                    timeout_used: CONTROL_CALL_TIMEOUT,
                    elapsed: started.elapsed(),
                    verdict: error_verdict(&source),
                });
                return Err(ProbeError::ChannelBroken {
                    call: "Heartbeat",
                    source,
                    attempts,
                });
            }
        }

        // Throwaway diagnostic registration, same fatal-on-failure rule.
        let started = Instant::now();
        let agent_id = match rpc
            .register_agent("diagnostic-session", &config.hub_url, CONTROL_CALL_TIMEOUT)
            .await
        {
            Ok(agent_id) => {
                attempts.push(ProbeAttempt {
                    rpc_name: "RegisterAgent",
                    timeout_used: CONTROL_CALL_TIMEOUT,
                    elapsed: started.elapsed(),
                    verdict: AttemptVerdict::Ok,
                });
                agent_id
            }
            Err(source) => {
                attempts.push(ProbeAttempt {
                    rpc_name: "RegisterAgent",
                    timeout_used: CONTROL_CALL_TIMEOUT,
                    elapsed: started.elapsed(),
                    verdict: error_verdict(&source),
                });
                return Err(ProbeError::ChannelBroken {
                    call: "RegisterAgent",
                    source,
                    attempts,
                });
            }
        };

        // The critical step: capture with the current candidate deadline.
        let started = Instant::now();
        match rpc.get_frame(&agent_id, timeout).await {
            Ok(frame) if !frame.is_empty() => {
                attempts.push(ProbeAttempt {
                    rpc_name: "GetFrame",
                    timeout_used: timeout,
                    elapsed: started.elapsed(),
                    verdict: AttemptVerdict::Ok,
                });
                info!(
                    seq = frame.sequence_number,
                    "capture succeeded, bridge is healthy"
                );
                return Ok(DiagnosticReport {
                    verdict: ProbeVerdict::BridgeHealthy,
                    attempts,
                    frame: Some(frame),
                });
            }
            Ok(_) => {
                attempts.push(ProbeAttempt {
                    rpc_name: "GetFrame",
                    timeout_used: timeout,
                    elapsed: started.elapsed(),
                    verdict: AttemptVerdict::EmptyResponse,
                });
                warn!("bridge answered with an empty frame");
            }
            Err(source) => {
                let verdict = error_verdict(&source);
                attempts.push(ProbeAttempt {
                    rpc_name: "GetFrame",
                    timeout_used: timeout,
                    elapsed: started.elapsed(),
                    verdict,
                });
                match verdict {
                    // The hang signature: the call never came back.
                    AttemptVerdict::Timeout => {
                        warn!("capture timed out after {:?}", timeout);
                    }
                    _ => warn!("capture failed: {}", source),
                }
            }
        }

        if index + 1 < config.timeouts.len() {
            tokio::time::sleep(config.retry_pause).await;
        }
    }

    // Heartbeat and registration succeeded at every attempt while no
    // capture ever produced a frame: the fault is the bridge's
    // observation path.
    Ok(DiagnosticReport {
        verdict: ProbeVerdict::BridgeHanging,
        attempts,
        frame: None,
    })
}

fn error_verdict(error: &RpcError) -> AttemptVerdict {
    if error.is_timeout() {
        AttemptVerdict::Timeout
    } else if error.is_empty_frame() {
        AttemptVerdict::EmptyResponse
    } else {
        AttemptVerdict::RpcError
    }
}
