use std::time::Duration;

use tokio::{sync::Mutex, time::Instant};
use tokio_util::sync::CancellationToken;

/// Bounded exponential backoff for rate-limited provider calls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub base_delay: Duration,
    pub max_delay: Duration,
    /// Retries after the first attempt; `0` disables retrying.
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        let base = Duration::from_secs(3);
        Self {
            base_delay: base,
            max_delay: base * 16,
            max_attempts: 5,
        }
    }
}

impl RetryPolicy {
    pub fn new(base_delay: Duration, max_delay: Duration, max_attempts: u32) -> Self {
        Self {
            base_delay,
            max_delay: max_delay.max(base_delay),
            max_attempts,
        }
    }

    /// Delay before retry number `attempt` (0-based). A provider hint replaces
    /// the computed delay; both are capped at `max_delay`.
    pub fn delay_for(&self, attempt: u32, hint: Option<Duration>) -> Duration {
        let computed = self
            .base_delay
            .checked_mul(2u32.saturating_pow(attempt))
            .unwrap_or(self.max_delay);
        hint.unwrap_or(computed).min(self.max_delay)
    }
}

/// Provider-wide cooldown gate.
///
/// Every caller waits for the gate before hitting the provider, and a
/// rate-limited response pushes the gate forward for everyone. Concurrent
/// analyses therefore back off together instead of each retrying on its own
/// schedule.
#[derive(Debug, Default)]
pub struct Cooldown {
    until: Mutex<Option<Instant>>,
}

impl Cooldown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Closes the gate for at least `delay` from now.
    pub async fn extend(&self, delay: Duration) {
        let target = Instant::now() + delay;
        let mut until = self.until.lock().await;
        if until.is_none_or(|current| current < target) {
            *until = Some(target);
        }
    }

    /// Waits until the gate is open. Returns `false` if cancelled first.
    pub async fn wait(&self, cancel: &CancellationToken) -> bool {
        loop {
            let deadline = match *self.until.lock().await {
                Some(deadline) if deadline > Instant::now() => deadline,
                _ => return !cancel.is_cancelled(),
            };

            tokio::select! {
                _ = cancel.cancelled() => return false,
                _ = tokio::time::sleep_until(deadline) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_doubles_until_cap() {
        let policy = RetryPolicy::new(Duration::from_secs(1), Duration::from_secs(5), 10);

        assert_eq!(policy.delay_for(0, None), Duration::from_secs(1));
        assert_eq!(policy.delay_for(1, None), Duration::from_secs(2));
        assert_eq!(policy.delay_for(2, None), Duration::from_secs(4));
        assert_eq!(policy.delay_for(3, None), Duration::from_secs(5));
        assert_eq!(policy.delay_for(40, None), Duration::from_secs(5));
    }

    #[test]
    fn test_provider_hint_is_capped() {
        let policy = RetryPolicy::new(Duration::from_secs(1), Duration::from_secs(5), 3);

        assert_eq!(
            policy.delay_for(0, Some(Duration::from_secs(2))),
            Duration::from_secs(2)
        );
        assert_eq!(
            policy.delay_for(0, Some(Duration::from_secs(120))),
            Duration::from_secs(5)
        );
    }

    #[test]
    fn test_max_delay_never_below_base() {
        let policy = RetryPolicy::new(Duration::from_secs(4), Duration::from_secs(1), 1);
        assert_eq!(policy.max_delay, Duration::from_secs(4));
    }

    #[tokio::test]
    async fn test_open_gate_does_not_wait() {
        let gate = Cooldown::new();
        let cancel = CancellationToken::new();
        assert!(gate.wait(&cancel).await);
    }

    #[tokio::test]
    async fn test_cancelled_wait_returns_false() {
        let gate = Cooldown::new();
        gate.extend(Duration::from_secs(60)).await;

        let cancel = CancellationToken::new();
        cancel.cancel();
        assert!(!gate.wait(&cancel).await);
    }

    #[tokio::test]
    async fn test_gate_reopens_after_delay() {
        let gate = Cooldown::new();
        gate.extend(Duration::from_millis(5)).await;

        let cancel = CancellationToken::new();
        let started = Instant::now();
        assert!(gate.wait(&cancel).await);
        assert!(started.elapsed() >= Duration::from_millis(5));
    }
}
