#![allow(dead_code)]

//! Shared in-memory bridge fake for integration tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use bridge_bench::{
    ActionCommand, BenchConfig, BridgeRpc, Decision, DecisionPolicy, Frame, HeartbeatStatus,
    InjectAck, MouseButton, PolicyError, RpcError,
};

/// One recorded RPC call against the fake bridge.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    RegisterAgent { session_id: String },
    Heartbeat,
    GetFrame { timeout: Duration },
    KeyPress { key: String, modifiers: Vec<String> },
    MouseClick { x: i32, y: i32, button: String },
    MouseMove { x: i32, y: i32 },
    WindowList,
    ActiveWindow,
    Launch { app_id: String },
}

/// Scripted outcome for one `GetFrame` call. When the script runs out,
/// the fake serves frames with increasing sequence numbers.
#[derive(Debug)]
pub enum FrameScript {
    Frame(Frame),
    Timeout,
    Empty,
    Error,
}

/// In-memory [`BridgeRpc`] recording every call.
#[derive(Debug)]
pub struct FakeBridge {
    pub calls: Mutex<Vec<Call>>,
    script: Mutex<VecDeque<FrameScript>>,
    seq: AtomicU64,
    pub fail_heartbeat: bool,
    pub fail_register: bool,
    pub reject_inject: bool,
}

impl FakeBridge {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            script: Mutex::new(VecDeque::new()),
            seq: AtomicU64::new(0),
            fail_heartbeat: false,
            fail_register: false,
            reject_inject: false,
        }
    }

    pub fn with_frame_script(script: Vec<FrameScript>) -> Self {
        let fake = Self::new();
        *fake.script.lock().unwrap() = script.into();
        fake
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn capture_timeouts(&self) -> Vec<Duration> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::GetFrame { timeout } => Some(timeout),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_frame(&self) -> Frame {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        Frame {
            width: 2,
            height: 2,
            format: "png".to_string(),
            data: vec![0; 4],
            sequence_number: seq,
            timestamp: seq as f64,
        }
    }
}

#[async_trait]
impl BridgeRpc for FakeBridge {
    async fn register_agent(
        &self,
        session_id: &str,
        _hub_url: &str,
        _timeout: Duration,
    ) -> Result<String, RpcError> {
        self.record(Call::RegisterAgent {
            session_id: session_id.to_string(),
        });
        if self.fail_register {
            return Err(RpcError::Status {
                call: "RegisterAgent",
                status: tonic::Status::unavailable("bridge rebooting"),
            });
        }
        Ok("agent-1".to_string())
    }

    async fn heartbeat(
        &self,
        _agent_id: &str,
        timeout: Duration,
    ) -> Result<HeartbeatStatus, RpcError> {
        self.record(Call::Heartbeat);
        if self.fail_heartbeat {
            return Err(RpcError::Timeout {
                call: "Heartbeat",
                timeout,
            });
        }
        Ok(HeartbeatStatus {
            status: "ok".to_string(),
            server_timestamp: 1_700_000_000_000,
        })
    }

    async fn get_frame(&self, _agent_id: &str, timeout: Duration) -> Result<Frame, RpcError> {
        self.record(Call::GetFrame { timeout });
        match self.script.lock().unwrap().pop_front() {
            None => Ok(self.next_frame()),
            Some(FrameScript::Frame(frame)) => Ok(frame),
            Some(FrameScript::Timeout) => Err(RpcError::Timeout {
                call: "GetFrame",
                timeout,
            }),
            Some(FrameScript::Empty) => Err(RpcError::EmptyFrame),
            Some(FrameScript::Error) => Err(RpcError::Status {
                call: "GetFrame",
                status: tonic::Status::internal("capture backend fault"),
            }),
        }
    }

    async fn inject_key_press(
        &self,
        _agent_id: &str,
        key: &str,
        modifiers: &[String],
        _timeout: Duration,
    ) -> Result<InjectAck, RpcError> {
        self.record(Call::KeyPress {
            key: key.to_string(),
            modifiers: modifiers.to_vec(),
        });
        Ok(self.ack())
    }

    async fn inject_mouse_click(
        &self,
        _agent_id: &str,
        x: i32,
        y: i32,
        button: &str,
        _timeout: Duration,
    ) -> Result<InjectAck, RpcError> {
        self.record(Call::MouseClick {
            x,
            y,
            button: button.to_string(),
        });
        Ok(self.ack())
    }

    async fn inject_mouse_move(
        &self,
        _agent_id: &str,
        x: i32,
        y: i32,
        _timeout: Duration,
    ) -> Result<InjectAck, RpcError> {
        self.record(Call::MouseMove { x, y });
        Ok(self.ack())
    }

    async fn get_window_list(
        &self,
        _agent_id: &str,
        _timeout: Duration,
    ) -> Result<Vec<String>, RpcError> {
        self.record(Call::WindowList);
        Ok(vec!["Calculator".to_string(), "Files".to_string()])
    }

    async fn get_active_window(
        &self,
        _agent_id: &str,
        _timeout: Duration,
    ) -> Result<String, RpcError> {
        self.record(Call::ActiveWindow);
        Ok("Calculator".to_string())
    }

    async fn launch_application(
        &self,
        app_id: &str,
        _timeout: Duration,
    ) -> Result<InjectAck, RpcError> {
        self.record(Call::Launch {
            app_id: app_id.to_string(),
        });
        Ok(self.ack())
    }
}

impl FakeBridge {
    fn ack(&self) -> InjectAck {
        if self.reject_inject {
            InjectAck {
                success: false,
                error_message: "input injection disabled".to_string(),
            }
        } else {
            InjectAck {
                success: true,
                error_message: String::new(),
            }
        }
    }
}

/// Policy replaying a fixed list of decisions, then clicking forever.
pub struct ScriptedPolicy {
    decisions: VecDeque<Decision>,
}

impl ScriptedPolicy {
    pub fn new(decisions: Vec<Decision>) -> Self {
        Self {
            decisions: decisions.into(),
        }
    }
}

#[async_trait]
impl DecisionPolicy for ScriptedPolicy {
    async fn decide(&mut self, _task: &str, _frame: &Frame) -> Result<Decision, PolicyError> {
        Ok(self.decisions.pop_front().unwrap_or_else(|| {
            Decision::act(ActionCommand::Click {
                x: 1,
                y: 1,
                button: MouseButton::Left,
            })
        }))
    }
}

/// Policy that always fails to decide.
pub struct FailingPolicy;

#[async_trait]
impl DecisionPolicy for FailingPolicy {
    async fn decide(&mut self, _task: &str, _frame: &Frame) -> Result<Decision, PolicyError> {
        Err(PolicyError::Failed("model unavailable".to_string()))
    }
}

/// A config with no pacing delays, for fast tests.
pub fn fast_config() -> BenchConfig {
    BenchConfig::default()
        .with_step_delay(Duration::from_millis(0))
        .with_keystroke_delay(Duration::from_millis(1))
        .with_rpc_timeout(Duration::from_secs(1))
}
