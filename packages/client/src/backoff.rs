//! Reconnect backoff schedule.
//!
//! Exponential backoff with a fixed base delay, doubling per attempt,
//! capped at a maximum delay, up to a maximum attempt count. Exhausting
//! the attempts is terminal; the caller must surface a user-visible
//! failure instead of retrying forever.

use std::time::Duration;

/// Exponential reconnect backoff state.
///
/// The first computed delay is `base * 2`, then it doubles each attempt
/// until the cap: with base 1s, cap 10s, max 5 attempts the schedule is
/// `[2s, 4s, 8s, 10s, 10s]`.
#[derive(Debug)]
pub struct ReconnectBackoff {
    base: Duration,
    max_delay: Duration,
    max_attempts: u32,
    attempt: u32,
}

impl ReconnectBackoff {
    /// Create a new backoff schedule.
    pub fn new(base: Duration, max_delay: Duration, max_attempts: u32) -> Self {
        Self {
            base,
            max_delay,
            max_attempts,
            attempt: 0,
        }
    }

    /// Compute the delay before the next reconnect attempt.
    ///
    /// Returns `None` once the maximum attempt count is exhausted.
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.attempt >= self.max_attempts {
            return None;
        }
        self.attempt += 1;
        // 2^attempt, saturating well past the cap
        let factor = 1u32.checked_shl(self.attempt).unwrap_or(u32::MAX);
        let delay = self.base.saturating_mul(factor);
        Some(delay.min(self.max_delay))
    }

    /// Reset the attempt counter after a successful connection.
    pub fn reset(&mut self) {
        self.attempt = 0;
    }

    /// The number of attempts consumed so far.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// The configured maximum attempt count.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_schedule_doubles_and_clamps() {
        // テスト項目: base 1 秒・上限 10 秒・最大 5 回のスケジュールが
        //             [2, 4, 8, 10, 10] になる
        // given (前提条件):
        let mut backoff =
            ReconnectBackoff::new(Duration::from_secs(1), Duration::from_secs(10), 5);

        // when (操作):
        let mut delays = Vec::new();
        while let Some(delay) = backoff.next_delay() {
            delays.push(delay.as_secs());
        }

        // then (期待する結果):
        assert_eq!(delays, vec![2, 4, 8, 10, 10]);
    }

    #[test]
    fn test_sixth_attempt_is_terminal() {
        // テスト項目: 6 回目の失敗では再試行がスケジュールされない
        // given (前提条件):
        let mut backoff =
            ReconnectBackoff::new(Duration::from_secs(1), Duration::from_secs(10), 5);
        for _ in 0..5 {
            assert!(backoff.next_delay().is_some());
        }

        // when (操作):
        let result = backoff.next_delay();

        // then (期待する結果):
        assert_eq!(result, None);
        assert_eq!(backoff.attempt(), 5);
    }

    #[test]
    fn test_reset_restarts_the_schedule() {
        // テスト項目: 接続成功後の reset でスケジュールが最初から始まる
        // given (前提条件):
        let mut backoff =
            ReconnectBackoff::new(Duration::from_secs(1), Duration::from_secs(10), 5);
        backoff.next_delay();
        backoff.next_delay();
        backoff.next_delay();

        // when (操作):
        backoff.reset();

        // then (期待する結果):
        assert_eq!(backoff.attempt(), 0);
        assert_eq!(backoff.next_delay(), Some(Duration::from_secs(2)));
    }
}
