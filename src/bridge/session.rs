//! Session lifecycle against the bridge.
//!
//! A session is one registered connection identified by the
//! backend-assigned `agent_id`. The [`SessionManager`] is the sole owner
//! of that id and hands it out to the injector, observation client, and
//! probe. Release is idempotent and guaranteed on every exit path.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use super::rpc::{BridgeRpc, HeartbeatStatus};
use super::RpcError;
use crate::config::BenchConfig;

/// Session establishment errors. Fatal to the caller; retry policy, if
/// any, belongs to the orchestrating caller.
#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error("failed to connect to bridge at {address}: {source}")]
    Transport {
        address: String,
        #[source]
        source: tonic::transport::Error,
    },
    #[error("agent registration failed: {0}")]
    Registration(#[source] RpcError),
}

/// One registered bridge session.
///
/// `agent_id` is assigned exclusively by the bridge's registration
/// response and never mutated afterward.
#[derive(Debug, Clone)]
pub struct AgentSession {
    pub agent_id: String,
    pub session_id: String,
    pub bridge_address: String,
    pub connected_at: DateTime<Utc>,
}

/// Opens and owns one live bridge session.
#[derive(Debug)]
pub struct SessionManager<T: BridgeRpc> {
    rpc: Arc<T>,
    session: AgentSession,
    rpc_timeout: Duration,
    closed: bool,
}

impl<T: BridgeRpc> SessionManager<T> {
    /// Register a new agent session on an established channel.
    ///
    /// # Errors
    /// [`ConnectionError::Registration`] if the registration call fails.
    pub async fn connect(rpc: Arc<T>, config: &BenchConfig) -> Result<Self, ConnectionError> {
        let session_id = Uuid::new_v4().to_string();
        debug!(%session_id, "registering agent session");

        let agent_id = rpc
            .register_agent(&session_id, &config.hub_url, config.connect_timeout)
            .await
            .map_err(ConnectionError::Registration)?;

        info!(%agent_id, "connected to bridge at {}", config.bridge_address);

        Ok(Self {
            rpc,
            session: AgentSession {
                agent_id,
                session_id,
                bridge_address: config.bridge_address.clone(),
                connected_at: Utc::now(),
            },
            rpc_timeout: config.rpc_timeout,
            closed: false,
        })
    }

    /// The backend-assigned agent id for this session.
    pub fn agent_id(&self) -> &str {
        &self.session.agent_id
    }

    /// The full session record.
    pub fn session(&self) -> &AgentSession {
        &self.session
    }

    /// Shared handle to the underlying RPC surface.
    pub fn rpc(&self) -> Arc<T> {
        Arc::clone(&self.rpc)
    }

    /// Liveness check against the bridge.
    pub async fn heartbeat(&self) -> Result<HeartbeatStatus, RpcError> {
        self.rpc
            .heartbeat(&self.session.agent_id, self.rpc_timeout)
            .await
    }

    /// Whether `close` has already run.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Release the session. Safe to call multiple times; the channel
    /// itself is dropped with the last RPC handle.
    pub fn close(&mut self) {
        if self.closed {
            debug!(agent_id = %self.session.agent_id, "session already closed");
            return;
        }
        self.closed = true;
        info!(agent_id = %self.session.agent_id, "bridge session closed");
    }
}

impl<T: BridgeRpc> Drop for SessionManager<T> {
    fn drop(&mut self) {
        self.close();
    }
}
