use std::time::Duration;

use crate::adapters::function_api::{FunctionApi, UpdateStatus};
use crate::error::DeployError;

pub const DEFAULT_SETTLE_MAX_WAIT: Duration = Duration::from_secs(45);
pub const DEFAULT_SETTLE_POLL_INTERVAL: Duration = Duration::from_secs(5);

pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// How long to wait for a layer change to propagate before replacing code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlePolicy {
    pub max_wait: Duration,
    pub poll_interval: Duration,
}

impl Default for SettlePolicy {
    fn default() -> Self {
        Self {
            max_wait: DEFAULT_SETTLE_MAX_WAIT,
            poll_interval: DEFAULT_SETTLE_POLL_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleOutcome {
    /// The provider reported the last update as successful.
    Settled { waited: Duration },
    /// Still in progress after `max_wait`; the caller proceeds anyway.
    TimedOut { waited: Duration },
    /// No status was reported, so the full `max_wait` was slept.
    FixedWait { waited: Duration },
}

/// Polls the function's last-update status until it settles or `max_wait`
/// elapses. Elapsed time is the sum of requested sleeps, not wall-clock time.
pub fn wait_for_settle(
    functions: &impl FunctionApi,
    sleeper: &impl Sleeper,
    function_name: &str,
    policy: &SettlePolicy,
) -> Result<SettleOutcome, DeployError> {
    let mut waited = Duration::ZERO;
    loop {
        match functions.last_update_status(function_name)? {
            UpdateStatus::Successful => {
                tracing::debug!(function_name, ?waited, "function configuration settled");
                return Ok(SettleOutcome::Settled { waited });
            }
            UpdateStatus::Failed { reason } => {
                return Err(DeployError::UpdateFailed {
                    function_name: function_name.to_string(),
                    reason: reason.unwrap_or_else(|| "no reason reported".to_string()),
                });
            }
            UpdateStatus::Unknown => {
                let remaining = policy.max_wait.saturating_sub(waited);
                tracing::info!(
                    function_name,
                    wait_secs = remaining.as_secs(),
                    "update status unavailable, waiting fixed interval"
                );
                sleeper.sleep(remaining);
                return Ok(SettleOutcome::FixedWait {
                    waited: waited + remaining,
                });
            }
            UpdateStatus::InProgress => {
                let remaining = policy.max_wait.saturating_sub(waited);
                if remaining.is_zero() {
                    tracing::warn!(
                        function_name,
                        waited_secs = waited.as_secs(),
                        "configuration update still in progress, pushing code anyway"
                    );
                    return Ok(SettleOutcome::TimedOut { waited });
                }

                let step = if policy.poll_interval.is_zero() {
                    remaining
                } else {
                    policy.poll_interval.min(remaining)
                };
                sleeper.sleep(step);
                waited += step;
            }
        }
    }
}
