// Copyright 2025 bridge-bench contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # Bridge Bench
//!
//! Benchmark runner and hang diagnostics for the desktop-agent gRPC bridge.
//!
//! The bridge is a remote backend that exposes screen capture and input
//! injection over gRPC. This crate drives it through bounded benchmark
//! tasks (observe, decide, act), aggregates per-task results into
//! crash-safe batch artifacts, and ships an escalating-timeout probe that
//! localizes a hanging observation path to the bridge side.
//!
//! ## Running a task
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use bridge_bench::{
//!     BenchConfig, FixedCyclePolicy, GrpcBridge, SessionManager, TaskOrchestrator, TaskSpec,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = BenchConfig::default().with_bridge_address("localhost:50051");
//!     let rpc = Arc::new(GrpcBridge::connect(&config.bridge_address).await?);
//!     let session = SessionManager::connect(rpc, &config).await?;
//!
//!     let mut orchestrator = TaskOrchestrator::new(
//!         session.rpc(),
//!         session.agent_id(),
//!         FixedCyclePolicy::new(),
//!         &config,
//!     );
//!
//!     let spec = TaskSpec::new("demo_001", "Open the calculator", 15);
//!     let result = orchestrator.run_task(&spec).await;
//!     println!("{}: {}", result.test_id, result.status);
//!     Ok(())
//! }
//! ```

pub mod actions;
pub mod agent;
pub mod bridge;
pub mod config;
pub mod diagnostics;
pub mod proto;
pub mod report;

pub use actions::{ActionCommand, ActionError, ActionInjector, MouseButton};
pub use agent::{
    Decision, DecisionPolicy, FixedCyclePolicy, PolicyError, TaskOrchestrator, TaskSpec,
};
pub use bridge::{
    AgentSession, BridgeRpc, ConnectionError, Frame, GrpcBridge, HeartbeatStatus, InjectAck,
    ObservationClient, RpcError, SessionManager,
};
pub use config::{BenchConfig, Selection, SuiteError, TestCase};
pub use diagnostics::{
    diagnose, AttemptVerdict, DiagnosticReport, ProbeAttempt, ProbeConfig, ProbeError,
    ProbeVerdict,
};
pub use report::{BenchmarkRun, ReportError, Reporter, RunSummary, TaskResult, TaskStatus};
