//! Decision policies: the pluggable strategy that picks an action from
//! an observation.
//!
//! The orchestrator never embeds decision logic; it is handed a
//! [`DecisionPolicy`] so that deterministic fixtures can stand in for a
//! real vision-language model in tests.

use async_trait::async_trait;
use thiserror::Error;

use crate::actions::{ActionCommand, MouseButton};
use crate::bridge::Frame;

/// Decision policy errors.
#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("decision failed: {0}")]
    Failed(String),
}

/// Outcome of one decision step.
#[derive(Debug, Clone)]
pub struct Decision {
    /// Command to execute this step; `None` means the policy only
    /// signals completion.
    pub command: Option<ActionCommand>,
    /// Whether the policy considers the task complete.
    pub done: bool,
    /// Success flag reported by the policy. Only meaningful with
    /// `done`; defaults to `false` when the policy provides none.
    pub success: bool,
    /// Reward reported by the policy, if any.
    pub reward: f64,
    /// Cost incurred by this decision (e.g. model spend).
    pub cost: f64,
}

impl Decision {
    /// A decision that executes a command and continues.
    pub fn act(command: ActionCommand) -> Self {
        Self {
            command: Some(command),
            done: false,
            success: false,
            reward: 0.0,
            cost: 0.0,
        }
    }

    /// A decision that signals task completion.
    pub fn finish(success: bool) -> Self {
        Self {
            command: None,
            done: true,
            success,
            reward: 0.0,
            cost: 0.0,
        }
    }

    /// Attach a cost to this decision.
    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = cost;
        self
    }

    /// Attach a reward to this decision.
    pub fn with_reward(mut self, reward: f64) -> Self {
        self.reward = reward;
        self
    }
}

/// Chooses the next action from the task description and the current
/// frame.
#[async_trait]
pub trait DecisionPolicy: Send {
    async fn decide(&mut self, task: &str, frame: &Frame) -> Result<Decision, PolicyError>;
}

/// Placeholder policy cycling through a fixed action sequence.
///
/// Stands in where a real model-backed policy would go: click, type a
/// greeting, press Return, repeat. It never signals completion, so
/// tasks driven by it run to their step bound.
#[derive(Debug, Default)]
pub struct FixedCyclePolicy {
    step: usize,
}

impl FixedCyclePolicy {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DecisionPolicy for FixedCyclePolicy {
    async fn decide(&mut self, _task: &str, _frame: &Frame) -> Result<Decision, PolicyError> {
        let command = match self.step % 3 {
            0 => ActionCommand::Click {
                x: 100,
                y: 100,
                button: MouseButton::Left,
            },
            1 => ActionCommand::TypeText {
                text: "hello".to_string(),
            },
            _ => ActionCommand::KeyPress {
                key: "Return".to_string(),
                modifiers: Vec::new(),
            },
        };
        self.step += 1;
        Ok(Decision::act(command))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> Frame {
        Frame {
            width: 4,
            height: 4,
            format: "png".to_string(),
            data: vec![0; 16],
            sequence_number: 1,
            timestamp: 0.0,
        }
    }

    #[tokio::test]
    async fn test_fixed_cycle_repeats() {
        let mut policy = FixedCyclePolicy::new();
        let first = policy.decide("task", &frame()).await.unwrap();
        assert!(matches!(
            first.command,
            Some(ActionCommand::Click { x: 100, y: 100, .. })
        ));

        let second = policy.decide("task", &frame()).await.unwrap();
        assert!(matches!(second.command, Some(ActionCommand::TypeText { .. })));

        let third = policy.decide("task", &frame()).await.unwrap();
        assert!(matches!(third.command, Some(ActionCommand::KeyPress { .. })));

        let fourth = policy.decide("task", &frame()).await.unwrap();
        assert!(matches!(fourth.command, Some(ActionCommand::Click { .. })));
        assert!(!fourth.done);
    }
}
