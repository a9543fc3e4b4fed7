//! RPC seam over the bridge's `DesktopAgent` gRPC service.
//!
//! Every call is bounded by an explicit deadline; expiry surfaces as
//! [`RpcError::Timeout`] so callers can tell a hang from a refusal.
//! Components speak to the bridge through the [`BridgeRpc`] trait, which
//! keeps them testable against an in-memory fake.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tonic::transport::{Channel, Endpoint};
use tracing::debug;

use super::observation::Frame;
use super::session::ConnectionError;
use super::RpcError;
use crate::proto::agent::desktop_agent_client::DesktopAgentClient;
use crate::proto::agent::{
    ConnectRequest, GetActiveWindowRequest, GetFrameRequest, GetWindowListRequest,
    HeartbeatRequest, InputResponse, KeyPressRequest, LaunchApplicationRequest, MouseClickRequest,
    MouseMoveRequest,
};

/// Heartbeat reply from the bridge.
#[derive(Debug, Clone)]
pub struct HeartbeatStatus {
    pub status: String,
    /// Unix timestamp in milliseconds.
    pub server_timestamp: i64,
}

/// Acknowledgement of an injection call.
#[derive(Debug, Clone)]
pub struct InjectAck {
    pub success: bool,
    pub error_message: String,
}

impl From<InputResponse> for InjectAck {
    fn from(resp: InputResponse) -> Self {
        Self {
            success: resp.success,
            error_message: resp.error_message,
        }
    }
}

/// The bridge's RPC surface as seen by this crate.
///
/// All calls are synchronous request/response and carry an explicit
/// per-call deadline. `agent_id` is mandatory on every call except the
/// registration bootstrap.
#[async_trait]
pub trait BridgeRpc: Send + Sync {
    /// Register a session and obtain the backend-assigned agent id.
    async fn register_agent(
        &self,
        session_id: &str,
        hub_url: &str,
        timeout: Duration,
    ) -> Result<String, RpcError>;

    async fn heartbeat(&self, agent_id: &str, timeout: Duration)
        -> Result<HeartbeatStatus, RpcError>;

    /// Fetch the current visual frame. An answered call carrying no
    /// payload is [`RpcError::EmptyFrame`], distinct from a timeout.
    async fn get_frame(&self, agent_id: &str, timeout: Duration) -> Result<Frame, RpcError>;

    async fn inject_key_press(
        &self,
        agent_id: &str,
        key: &str,
        modifiers: &[String],
        timeout: Duration,
    ) -> Result<InjectAck, RpcError>;

    async fn inject_mouse_click(
        &self,
        agent_id: &str,
        x: i32,
        y: i32,
        button: &str,
        timeout: Duration,
    ) -> Result<InjectAck, RpcError>;

    async fn inject_mouse_move(
        &self,
        agent_id: &str,
        x: i32,
        y: i32,
        timeout: Duration,
    ) -> Result<InjectAck, RpcError>;

    async fn get_window_list(
        &self,
        agent_id: &str,
        timeout: Duration,
    ) -> Result<Vec<String>, RpcError>;

    async fn get_active_window(
        &self,
        agent_id: &str,
        timeout: Duration,
    ) -> Result<String, RpcError>;

    async fn launch_application(
        &self,
        app_id: &str,
        timeout: Duration,
    ) -> Result<InjectAck, RpcError>;
}

/// Production [`BridgeRpc`] backed by the tonic-generated client.
///
/// The underlying channel is cheap to clone; each call clones the client
/// so the wrapper can be shared behind an `Arc`.
pub struct GrpcBridge {
    client: DesktopAgentClient<Channel>,
}

impl GrpcBridge {
    /// Open a channel to the bridge.
    ///
    /// Accepts `host:port` or a full URI; a bare authority gets an
    /// `http://` scheme prepended.
    pub async fn connect(address: &str) -> Result<Self, ConnectionError> {
        let uri = if address.contains("://") {
            address.to_string()
        } else {
            format!("http://{}", address)
        };

        debug!(%uri, "opening bridge channel");

        let endpoint = Endpoint::from_shared(uri).map_err(|source| ConnectionError::Transport {
            address: address.to_string(),
            source,
        })?;
        let channel = endpoint
            .connect()
            .await
            .map_err(|source| ConnectionError::Transport {
                address: address.to_string(),
                source,
            })?;

        Ok(Self {
            client: DesktopAgentClient::new(channel),
        })
    }

    fn client(&self) -> DesktopAgentClient<Channel> {
        self.client.clone()
    }
}

/// Run one RPC future under a deadline, classifying expiry as a timeout.
async fn bounded<T, F>(call: &'static str, limit: Duration, fut: F) -> Result<T, RpcError>
where
    F: Future<Output = Result<tonic::Response<T>, tonic::Status>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(Ok(response)) => Ok(response.into_inner()),
        Ok(Err(status)) => Err(RpcError::Status { call, status }),
        Err(_) => Err(RpcError::Timeout {
            call,
            timeout: limit,
        }),
    }
}

#[async_trait]
impl BridgeRpc for GrpcBridge {
    async fn register_agent(
        &self,
        session_id: &str,
        hub_url: &str,
        timeout: Duration,
    ) -> Result<String, RpcError> {
        let mut client = self.client();
        let request = ConnectRequest {
            session_id: session_id.to_string(),
            hub_url: hub_url.to_string(),
        };
        let response = bounded("RegisterAgent", timeout, client.register_agent(request)).await?;
        Ok(response.agent_id)
    }

    async fn heartbeat(
        &self,
        agent_id: &str,
        timeout: Duration,
    ) -> Result<HeartbeatStatus, RpcError> {
        let mut client = self.client();
        let request = HeartbeatRequest {
            agent_id: agent_id.to_string(),
        };
        let response = bounded("Heartbeat", timeout, client.heartbeat(request)).await?;
        Ok(HeartbeatStatus {
            status: response.status,
            server_timestamp: response.server_timestamp,
        })
    }

    async fn get_frame(&self, agent_id: &str, timeout: Duration) -> Result<Frame, RpcError> {
        let mut client = self.client();
        let request = GetFrameRequest {
            agent_id: agent_id.to_string(),
        };
        let response = bounded("GetFrame", timeout, client.get_frame(request)).await?;

        match response.frame {
            Some(data) if !data.data.is_empty() => Ok(Frame::from(data)),
            _ => Err(RpcError::EmptyFrame),
        }
    }

    async fn inject_key_press(
        &self,
        agent_id: &str,
        key: &str,
        modifiers: &[String],
        timeout: Duration,
    ) -> Result<InjectAck, RpcError> {
        let mut client = self.client();
        let request = KeyPressRequest {
            agent_id: agent_id.to_string(),
            key: key.to_string(),
            modifiers: modifiers.to_vec(),
        };
        let response = bounded("InjectKeyPress", timeout, client.inject_key_press(request)).await?;
        Ok(response.into())
    }

    async fn inject_mouse_click(
        &self,
        agent_id: &str,
        x: i32,
        y: i32,
        button: &str,
        timeout: Duration,
    ) -> Result<InjectAck, RpcError> {
        let mut client = self.client();
        let request = MouseClickRequest {
            agent_id: agent_id.to_string(),
            x,
            y,
            button: button.to_string(),
        };
        let response = bounded(
            "InjectMouseClick",
            timeout,
            client.inject_mouse_click(request),
        )
        .await?;
        Ok(response.into())
    }

    async fn inject_mouse_move(
        &self,
        agent_id: &str,
        x: i32,
        y: i32,
        timeout: Duration,
    ) -> Result<InjectAck, RpcError> {
        let mut client = self.client();
        let request = MouseMoveRequest {
            agent_id: agent_id.to_string(),
            x,
            y,
        };
        let response = bounded(
            "InjectMouseMove",
            timeout,
            client.inject_mouse_move(request),
        )
        .await?;
        Ok(response.into())
    }

    async fn get_window_list(
        &self,
        agent_id: &str,
        timeout: Duration,
    ) -> Result<Vec<String>, RpcError> {
        let mut client = self.client();
        let request = GetWindowListRequest {
            agent_id: agent_id.to_string(),
        };
        let response = bounded("GetWindowList", timeout, client.get_window_list(request)).await?;
        Ok(response.windows)
    }

    async fn get_active_window(
        &self,
        agent_id: &str,
        timeout: Duration,
    ) -> Result<String, RpcError> {
        let mut client = self.client();
        let request = GetActiveWindowRequest {
            agent_id: agent_id.to_string(),
        };
        let response = bounded(
            "GetActiveWindow",
            timeout,
            client.get_active_window(request),
        )
        .await?;
        Ok(response.window_title)
    }

    async fn launch_application(
        &self,
        app_id: &str,
        timeout: Duration,
    ) -> Result<InjectAck, RpcError> {
        let mut client = self.client();
        let request = LaunchApplicationRequest {
            app_id: app_id.to_string(),
        };
        let response = bounded(
            "LaunchApplication",
            timeout,
            client.launch_application(request),
        )
        .await?;
        Ok(response.into())
    }
}
