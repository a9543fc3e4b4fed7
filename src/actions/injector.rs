//! Encodes input commands as bridge calls.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::debug;

use super::{ActionCommand, ActionError};
use crate::bridge::{BridgeRpc, InjectAck};
use crate::config::BenchConfig;

/// Executes [`ActionCommand`]s against the bridge, one backend call per
/// variant, each bounded by a per-call timeout.
pub struct ActionInjector<T: BridgeRpc> {
    rpc: Arc<T>,
    agent_id: String,
    call_timeout: Duration,
    keystroke_delay: Duration,
}

impl<T: BridgeRpc> ActionInjector<T> {
    pub fn new(rpc: Arc<T>, agent_id: &str, config: &BenchConfig) -> Self {
        Self {
            rpc,
            agent_id: agent_id.to_string(),
            call_timeout: config.rpc_timeout,
            keystroke_delay: config.keystroke_delay,
        }
    }

    /// Execute one command.
    ///
    /// `TypeText` is deliberately decomposed into one `InjectKeyPress`
    /// per character with a small pause in between, emulating human
    /// typing cadence; the bridge expects individual key events, so the
    /// text is never batched into a single call.
    pub async fn execute(&self, command: &ActionCommand) -> Result<(), ActionError> {
        debug!(kind = command.kind(), "executing action");

        match command {
            ActionCommand::Click { x, y, button } => {
                let ack = self
                    .rpc
                    .inject_mouse_click(&self.agent_id, *x, *y, button.as_str(), self.call_timeout)
                    .await?;
                check_ack("InjectMouseClick", ack)
            }
            ActionCommand::Move { x, y } => {
                let ack = self
                    .rpc
                    .inject_mouse_move(&self.agent_id, *x, *y, self.call_timeout)
                    .await?;
                check_ack("InjectMouseMove", ack)
            }
            ActionCommand::KeyPress { key, modifiers } => {
                let ack = self
                    .rpc
                    .inject_key_press(&self.agent_id, key, modifiers, self.call_timeout)
                    .await?;
                check_ack("InjectKeyPress", ack)
            }
            ActionCommand::TypeText { text } => self.type_text(text).await,
            ActionCommand::LaunchApp { app_id } => {
                let ack = self
                    .rpc
                    .launch_application(app_id, self.call_timeout)
                    .await?;
                check_ack("LaunchApplication", ack)
            }
            ActionCommand::Other { kind } => Err(ActionError::Unsupported(kind.clone())),
        }
    }

    /// Type text one key press per character, in character order.
    async fn type_text(&self, text: &str) -> Result<(), ActionError> {
        let mut chars = text.chars().peekable();
        while let Some(ch) = chars.next() {
            let ack = self
                .rpc
                .inject_key_press(&self.agent_id, &ch.to_string(), &[], self.call_timeout)
                .await?;
            check_ack("InjectKeyPress", ack)?;

            if chars.peek().is_some() {
                sleep(self.keystroke_delay).await;
            }
        }
        Ok(())
    }
}

fn check_ack(call: &'static str, ack: InjectAck) -> Result<(), ActionError> {
    if ack.success {
        Ok(())
    } else {
        Err(ActionError::Rejected {
            call,
            message: ack.error_message,
        })
    }
}
