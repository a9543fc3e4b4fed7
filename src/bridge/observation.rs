//! Observation of the remote desktop state.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::rpc::BridgeRpc;
use super::RpcError;
use crate::config::BenchConfig;
use crate::proto::agent::FrameData;

/// One captured visual observation of the remote desktop.
///
/// Transient: consumed by the decision step and discarded.
/// `sequence_number` is strictly increasing within a session.
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub format: String,
    pub data: Vec<u8>,
    pub sequence_number: u64,
    pub timestamp: f64,
}

impl Frame {
    /// Whether the frame carries no pixel payload.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Persist the frame payload to disk, for diagnostics only.
    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        std::fs::write(path, &self.data)
    }
}

impl From<FrameData> for Frame {
    fn from(data: FrameData) -> Self {
        Self {
            width: data.width,
            height: data.height,
            format: data.format,
            data: data.data,
            sequence_number: data.sequence_number,
            timestamp: data.timestamp,
        }
    }
}

/// Requests frames and read-only window state from the bridge.
pub struct ObservationClient<T: BridgeRpc> {
    rpc: Arc<T>,
    agent_id: String,
    timeout: Duration,
    last_sequence: Option<u64>,
}

impl<T: BridgeRpc> ObservationClient<T> {
    pub fn new(rpc: Arc<T>, agent_id: &str, config: &BenchConfig) -> Self {
        Self {
            rpc,
            agent_id: agent_id.to_string(),
            timeout: config.capture_timeout,
            last_sequence: None,
        }
    }

    /// Capture the current frame.
    ///
    /// An answered call with no payload is [`RpcError::EmptyFrame`]; a
    /// deadline expiry is [`RpcError::Timeout`]. A non-increasing
    /// sequence number is a bridge contract violation and is logged, the
    /// frame is still delivered.
    pub async fn capture(&mut self) -> Result<Frame, RpcError> {
        let frame = self.rpc.get_frame(&self.agent_id, self.timeout).await?;

        if let Some(last) = self.last_sequence {
            if frame.sequence_number <= last {
                warn!(
                    last,
                    got = frame.sequence_number,
                    "frame sequence number did not increase"
                );
            }
        }
        self.last_sequence = Some(frame.sequence_number);

        debug!(
            seq = frame.sequence_number,
            bytes = frame.data.len(),
            "captured {}x{} frame",
            frame.width,
            frame.height
        );
        Ok(frame)
    }

    /// Titles of all open windows.
    pub async fn list_windows(&self) -> Result<Vec<String>, RpcError> {
        self.rpc.get_window_list(&self.agent_id, self.timeout).await
    }

    /// Title of the currently focused window.
    pub async fn active_window(&self) -> Result<String, RpcError> {
        self.rpc
            .get_active_window(&self.agent_id, self.timeout)
            .await
    }

    /// Sequence number of the most recently captured frame.
    pub fn last_sequence(&self) -> Option<u64> {
        self.last_sequence
    }
}
