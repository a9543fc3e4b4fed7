//! Task execution: the decision-policy seam and the bounded step loop.

pub mod orchestrator;
pub mod policy;

pub use orchestrator::{TaskOrchestrator, TaskSpec};
pub use policy::{Decision, DecisionPolicy, FixedCyclePolicy, PolicyError};
