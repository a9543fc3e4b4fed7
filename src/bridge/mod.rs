//! Bridge protocol layer: transport, session lifecycle, and observation.

pub mod observation;
pub mod rpc;
pub mod session;

pub use observation::{Frame, ObservationClient};
pub use rpc::{BridgeRpc, GrpcBridge, HeartbeatStatus, InjectAck};
pub use session::{AgentSession, ConnectionError, SessionManager};

use std::time::Duration;
use thiserror::Error;

/// Failure of a single bridge RPC call.
///
/// Deadline expiry is classified separately from backend-reported errors
/// because the two are diagnosed differently: a timeout is the hang
/// signature the diagnostic probe looks for, while a status error means
/// the bridge answered and refused.
#[derive(Error, Debug)]
pub enum RpcError {
    #[error("{call} timed out after {timeout:?}")]
    Timeout {
        call: &'static str,
        timeout: Duration,
    },
    #[error("{call} failed: {status}")]
    Status {
        call: &'static str,
        status: tonic::Status,
    },
    #[error("bridge responded with no frame payload")]
    EmptyFrame,
}

impl RpcError {
    /// Whether this failure is a deadline expiry.
    pub fn is_timeout(&self) -> bool {
        matches!(self, RpcError::Timeout { .. })
    }

    /// Whether the bridge answered but produced no frame.
    pub fn is_empty_frame(&self) -> bool {
        matches!(self, RpcError::EmptyFrame)
    }
}
