//! Runner configuration.

pub mod suite;

pub use suite::{load_suite, select, Selection, SuiteError, TestCase};

use std::time::Duration;

/// Default per-call RPC deadline.
pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(10);

/// Default pause between steps of one task.
pub const DEFAULT_STEP_DELAY: Duration = Duration::from_millis(500);

/// Default pause between injected keystrokes when typing text.
pub const DEFAULT_KEYSTROKE_DELAY: Duration = Duration::from_millis(10);

/// Configuration for the benchmark runner.
///
/// Credentials are an explicit value here, never read from the
/// environment inside library code; the binaries resolve them once and
/// pass them in.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Bridge address as `host:port` or a full URI.
    pub bridge_address: String,
    /// Hub URL reported to the bridge at registration.
    pub hub_url: String,
    /// API key forwarded to the decision policy, if it needs one.
    pub api_key: Option<String>,
    /// Fallback step bound for test cases that do not specify one.
    pub max_steps: u32,
    /// Deadline for the registration call.
    pub connect_timeout: Duration,
    /// Deadline for injection and window-query calls.
    pub rpc_timeout: Duration,
    /// Deadline for frame captures.
    pub capture_timeout: Duration,
    /// Pacing delay between steps.
    pub step_delay: Duration,
    /// Inter-character pause when typing text.
    pub keystroke_delay: Duration,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            bridge_address: "localhost:50051".to_string(),
            hub_url: "http://localhost:4545".to_string(),
            api_key: None,
            max_steps: 15,
            connect_timeout: DEFAULT_RPC_TIMEOUT,
            rpc_timeout: DEFAULT_RPC_TIMEOUT,
            capture_timeout: DEFAULT_RPC_TIMEOUT,
            step_delay: DEFAULT_STEP_DELAY,
            keystroke_delay: DEFAULT_KEYSTROKE_DELAY,
        }
    }
}

impl BenchConfig {
    /// Set the bridge address.
    pub fn with_bridge_address(mut self, address: impl Into<String>) -> Self {
        self.bridge_address = address.into();
        self
    }

    /// Set the hub URL reported at registration.
    pub fn with_hub_url(mut self, hub_url: impl Into<String>) -> Self {
        self.hub_url = hub_url.into();
        self
    }

    /// Set the API key passed to the decision policy.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the fallback step bound.
    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Set the per-call RPC deadline for all call kinds at once.
    pub fn with_rpc_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self.rpc_timeout = timeout;
        self.capture_timeout = timeout;
        self
    }

    /// Set the frame-capture deadline.
    pub fn with_capture_timeout(mut self, timeout: Duration) -> Self {
        self.capture_timeout = timeout;
        self
    }

    /// Set the pacing delay between steps.
    pub fn with_step_delay(mut self, delay: Duration) -> Self {
        self.step_delay = delay;
        self
    }

    /// Set the inter-character typing pause.
    pub fn with_keystroke_delay(mut self, delay: Duration) -> Self {
        self.keystroke_delay = delay;
        self
    }
}
