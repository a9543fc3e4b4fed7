//! The bounded task-execution loop.
//!
//! Per task the orchestrator runs `Init -> Stepping -> {Completed,
//! Exhausted, Errored}` and always emits exactly one [`TaskResult`].
//! Failures inside one task never cross the orchestrator boundary.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tokio::time::sleep;
use tracing::{info, warn};

use super::policy::DecisionPolicy;
use crate::actions::{ActionError, ActionInjector};
use crate::bridge::{BridgeRpc, ObservationClient};
use crate::config::BenchConfig;
use crate::report::{TaskResult, TaskStatus};

/// One benchmark task to execute.
#[derive(Debug, Clone)]
pub struct TaskSpec {
    pub test_id: String,
    pub instruction: String,
    pub max_steps: u32,
}

impl TaskSpec {
    pub fn new(test_id: impl Into<String>, instruction: impl Into<String>, max_steps: u32) -> Self {
        Self {
            test_id: test_id.into(),
            instruction: instruction.into(),
            max_steps,
        }
    }
}

/// Terminal state of one task run.
enum Outcome {
    /// The policy signalled completion, with its success flag and reward.
    Completed { success: bool, reward: f64 },
    /// The step bound was reached without a completion signal.
    Exhausted,
    /// A failure ended the task early.
    Errored(String),
}

/// Runs the step-bounded observe/decide/act loop for one task at a time.
pub struct TaskOrchestrator<T: BridgeRpc, P: DecisionPolicy> {
    observation: ObservationClient<T>,
    injector: ActionInjector<T>,
    policy: P,
    step_delay: std::time::Duration,
}

impl<T: BridgeRpc, P: DecisionPolicy> TaskOrchestrator<T, P> {
    pub fn new(rpc: Arc<T>, agent_id: &str, policy: P, config: &BenchConfig) -> Self {
        Self {
            observation: ObservationClient::new(Arc::clone(&rpc), agent_id, config),
            injector: ActionInjector::new(rpc, agent_id, config),
            policy,
            step_delay: config.step_delay,
        }
    }

    /// Execute one task to a terminal state.
    ///
    /// Always returns a result, never an error: any failure inside the
    /// loop is captured in the result's `error` field with
    /// `status = error`.
    pub async fn run_task(&mut self, spec: &TaskSpec) -> TaskResult {
        info!(test_id = %spec.test_id, max_steps = spec.max_steps, "starting task");
        let started = Instant::now();

        let mut steps_taken: u32 = 0;
        let mut cost = 0.0;

        let outcome = if spec.max_steps == 0 {
            Outcome::Errored("max_steps must be greater than zero".to_string())
        } else {
            self.step_loop(spec, &mut steps_taken, &mut cost).await
        };

        let duration = started.elapsed().as_secs_f64();
        let result = match outcome {
            Outcome::Completed { success, reward } => TaskResult {
                test_id: spec.test_id.clone(),
                status: if success {
                    TaskStatus::Passed
                } else {
                    TaskStatus::Failed
                },
                reward,
                steps_taken,
                cost,
                duration,
                error: None,
                timestamp: Utc::now(),
            },
            Outcome::Exhausted => TaskResult {
                test_id: spec.test_id.clone(),
                status: TaskStatus::Failed,
                reward: 0.0,
                steps_taken,
                cost,
                duration,
                error: None,
                timestamp: Utc::now(),
            },
            Outcome::Errored(message) => TaskResult {
                test_id: spec.test_id.clone(),
                status: TaskStatus::Error,
                reward: 0.0,
                steps_taken,
                cost,
                duration,
                error: Some(message),
                timestamp: Utc::now(),
            },
        };

        info!(
            test_id = %spec.test_id,
            status = %result.status,
            steps = result.steps_taken,
            "task finished in {:.1}s",
            result.duration
        );
        result
    }

    /// The `Stepping` state: observe, decide, act, pace.
    async fn step_loop(&mut self, spec: &TaskSpec, steps_taken: &mut u32, cost: &mut f64) -> Outcome {
        for step in 0..spec.max_steps {
            let frame = match self.observation.capture().await {
                Ok(frame) => frame,
                Err(e) => return Outcome::Errored(format!("frame capture failed: {}", e)),
            };

            let decision = match self.policy.decide(&spec.instruction, &frame).await {
                Ok(decision) => decision,
                Err(e) => return Outcome::Errored(e.to_string()),
            };

            *steps_taken += 1;
            *cost += decision.cost;

            if let Some(command) = &decision.command {
                match self.injector.execute(command).await {
                    Ok(()) => {}
                    // Unsupported commands are a no-op step, not a task
                    // abort.
                    Err(ActionError::Unsupported(kind)) => {
                        warn!(test_id = %spec.test_id, step, %kind, "skipping unsupported action");
                    }
                    Err(e) => return Outcome::Errored(format!("action failed: {}", e)),
                }
            }

            if decision.done {
                return Outcome::Completed {
                    success: decision.success,
                    reward: decision.reward,
                };
            }

            if step + 1 < spec.max_steps {
                sleep(self.step_delay).await;
            }
        }

        Outcome::Exhausted
    }

    /// The policy driving this orchestrator.
    pub fn policy(&self) -> &P {
        &self.policy
    }
}
