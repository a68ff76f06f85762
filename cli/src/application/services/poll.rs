//! Bounded polling driven by a [`RetryPolicy`].
//!
//! Knows nothing about what is being polled: the caller supplies a probe that
//! classifies each observation as ready, failed, or still pending.

use std::future::Future;

use crate::domain::RetryPolicy;

/// Classification of a single probe.
#[derive(Debug)]
pub enum Probe<T, E> {
    /// Terminal success; polling stops with this value.
    Ready(T),
    /// Terminal failure; polling stops with this error.
    Failed(E),
    /// Not settled yet; try again if the budget allows.
    Pending,
}

/// Why [`poll_until`] gave up.
#[derive(Debug, PartialEq, Eq)]
pub enum PollError<E> {
    Failed(E),
    /// Every attempt came back pending.
    Exhausted { attempts: u32 },
}

/// Sleep, probe, repeat: at most `policy.max_attempts` times.
///
/// Each attempt sleeps `policy.delay_for(attempt)` *before* probing, so the
/// first observation happens after one delay. The probe receives the 1-based
/// attempt number.
///
/// # Errors
///
/// Returns [`PollError::Failed`] as soon as a probe fails, or
/// [`PollError::Exhausted`] when the budget runs out.
pub async fn poll_until<T, E, F, Fut>(policy: &RetryPolicy, mut probe: F) -> Result<T, PollError<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Probe<T, E>>,
{
    for attempt in 1..=policy.max_attempts {
        tokio::time::sleep(policy.delay_for(attempt)).await;
        match probe(attempt).await {
            Probe::Ready(value) => return Ok(value),
            Probe::Failed(err) => return Err(PollError::Failed(err)),
            Probe::Pending => {
                tracing::trace!(attempt, max_attempts = policy.max_attempts, "probe pending");
            }
        }
    }
    Err(PollError::Exhausted {
        attempts: policy.max_attempts,
    })
}
