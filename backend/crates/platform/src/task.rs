//! Periodic Background Tasks
//!
//! Fixed-period sweeps (cache reaping, nonce sweeping, denylist pruning) run on
//! the tokio timer rather than a dedicated thread. Each task is stopped through
//! a [`CancellationToken`] or by returning [`ControlFlow::Break`] from a pass.

use std::ops::ControlFlow;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use kernel::error::app_error::{AppError, AppResult};
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;

/// Run `pass` every `period` until `cancel` fires or a pass breaks.
///
/// A pass that panics is logged and the schedule continues with the next tick.
/// The first pass runs one full period after spawning. A zero period is
/// rejected up front; the timer would otherwise panic inside the task.
///
/// Must be called from within a tokio runtime.
pub fn spawn_periodic<F>(
    name: &'static str,
    period: Duration,
    cancel: CancellationToken,
    mut pass: F,
) -> AppResult<JoinHandle<()>>
where
    F: FnMut() -> ControlFlow<()> + Send + 'static,
{
    if period.is_zero() {
        return Err(AppError::internal(format!(
            "Period of background task '{name}' must be positive"
        )));
    }

    Ok(tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // interval fires immediately; skip that tick
        ticker.tick().await;

        tracing::debug!(task = name, period_ms = period.as_millis() as u64, "Periodic task started");

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            match catch_unwind(AssertUnwindSafe(&mut pass)) {
                Ok(ControlFlow::Continue(())) => {}
                Ok(ControlFlow::Break(())) => break,
                Err(panic) => {
                    let reason = panic
                        .downcast_ref::<&str>()
                        .map(|s| (*s).to_string())
                        .or_else(|| panic.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "unknown panic".to_string());
                    tracing::error!(task = name, reason = %reason, "Periodic pass panicked; continuing");
                }
            }
        }

        tracing::debug!(task = name, "Periodic task stopped");
    }))
}
