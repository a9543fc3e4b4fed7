//! Input commands and their execution against the bridge.

pub mod injector;

pub use injector::ActionInjector;

use std::fmt;

use thiserror::Error;

use crate::bridge::RpcError;

/// Action execution errors.
#[derive(Error, Debug)]
pub enum ActionError {
    /// The decision produced a command this injector cannot map to a
    /// bridge call. Treated as a no-op step by the orchestrator.
    #[error("unsupported action: {0}")]
    Unsupported(String),
    /// The bridge answered but reported the injection failed.
    #[error("{call} rejected by bridge: {message}")]
    Rejected {
        call: &'static str,
        message: String,
    },
    #[error(transparent)]
    Rpc(#[from] RpcError),
}

/// Mouse button for click commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    pub fn as_str(&self) -> &'static str {
        match self {
            MouseButton::Left => "left",
            MouseButton::Right => "right",
            MouseButton::Middle => "middle",
        }
    }
}

impl fmt::Display for MouseButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One input command decided for a single step.
///
/// Immutable value, constructed per step and owned by the orchestrator
/// for the duration of that step. `Other` models a decision output with
/// no bridge mapping; executing it fails with
/// [`ActionError::Unsupported`].
#[derive(Debug, Clone, PartialEq)]
pub enum ActionCommand {
    Click {
        x: i32,
        y: i32,
        button: MouseButton,
    },
    Move {
        x: i32,
        y: i32,
    },
    KeyPress {
        key: String,
        modifiers: Vec<String>,
    },
    TypeText {
        text: String,
    },
    LaunchApp {
        app_id: String,
    },
    Other {
        kind: String,
    },
}

impl ActionCommand {
    /// Short name of the command variant, for logging.
    pub fn kind(&self) -> &str {
        match self {
            ActionCommand::Click { .. } => "click",
            ActionCommand::Move { .. } => "move",
            ActionCommand::KeyPress { .. } => "key",
            ActionCommand::TypeText { .. } => "type",
            ActionCommand::LaunchApp { .. } => "launch",
            ActionCommand::Other { kind } => kind,
        }
    }
}
