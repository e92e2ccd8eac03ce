//! Retry-until-deadline polling.
//!
//! Browser-level assertions run against a real server, so the page under test
//! may not reflect a submission the instant it is checked. [`retry_until`]
//! repeats an attempt at a fixed interval and gives up with the last error
//! once the deadline passes.

use std::{
    fmt,
    thread,
    time::{Duration, Instant},
};

use tracing::trace;

/// Default deadline for polling assertions.
pub const MAX_WAIT: Duration = Duration::from_secs(5);

/// Default pause between attempts.
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// How long to keep retrying and how often.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    /// Deadline measured from the first attempt.
    pub max_wait: Duration,
    /// Pause between failed attempts.
    pub interval: Duration,
}

impl WaitPolicy {
    /// Build a policy from an explicit deadline and interval.
    #[must_use]
    pub const fn new(max_wait: Duration, interval: Duration) -> Self { Self { max_wait, interval } }

    /// Replace the deadline, keeping the interval.
    #[must_use]
    pub const fn with_max_wait(self, max_wait: Duration) -> Self { Self { max_wait, ..self } }
}

impl Default for WaitPolicy {
    fn default() -> Self { Self::new(MAX_WAIT, POLL_INTERVAL) }
}

/// Call `attempt` until it succeeds or `policy.max_wait` has elapsed.
///
/// The attempt always runs at least once. The deadline is checked after each
/// failure, so the final attempt may start just before it passes.
///
/// # Errors
///
/// Returns the error from the last attempt when the deadline passes.
pub fn retry_until<T, E, F>(policy: WaitPolicy, mut attempt: F) -> Result<T, E>
where
    E: fmt::Display,
    F: FnMut() -> Result<T, E>,
{
    let started = Instant::now();
    loop {
        match attempt() {
            Ok(value) => return Ok(value),
            Err(err) if started.elapsed() >= policy.max_wait => return Err(err),
            Err(err) => {
                trace!(error = %err, "attempt failed; retrying");
                thread::sleep(policy.interval);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        cell::Cell,
        time::{Duration, Instant},
    };

    use rstest::rstest;

    use super::*;

    const SLACK: Duration = Duration::from_millis(100);
    const FAST: WaitPolicy = WaitPolicy::new(Duration::from_millis(300), Duration::from_millis(10));

    #[rstest]
    fn returns_first_success_without_sleeping() {
        let calls = Cell::new(0);
        let started = Instant::now();
        let value: Result<u8, String> = retry_until(WaitPolicy::default(), || {
            calls.set(calls.get() + 1);
            Ok(7)
        });
        assert_eq!(value, Ok(7));
        assert_eq!(calls.get(), 1);
        assert!(started.elapsed() < POLL_INTERVAL);
    }

    #[rstest]
    fn retries_until_attempt_succeeds() {
        let calls = Cell::new(0);
        let value = retry_until(FAST, || {
            calls.set(calls.get() + 1);
            if calls.get() < 3 {
                Err(format!("attempt {}", calls.get()))
            } else {
                Ok("done")
            }
        });
        assert_eq!(value, Ok("done"));
        assert_eq!(calls.get(), 3);
    }

    #[rstest]
    fn gives_up_with_last_error_after_deadline() {
        let calls = Cell::new(0);
        let started = Instant::now();
        let value: Result<(), String> = retry_until(FAST, || {
            calls.set(calls.get() + 1);
            Err(format!("attempt {}", calls.get()))
        });
        let elapsed = started.elapsed();
        assert!(elapsed >= FAST.max_wait);
        assert!(
            elapsed < FAST.max_wait + FAST.interval + SLACK,
            "gave up after {elapsed:?}, more than one interval past the deadline"
        );
        assert_eq!(value, Err(format!("attempt {}", calls.get())));
        assert!(calls.get() > 1);
    }

    #[rstest]
    fn succeeds_when_attempt_passes_just_before_deadline() {
        let ready_at = FAST.max_wait - FAST.interval * 3;
        let started = Instant::now();
        let value = retry_until(FAST, || {
            if started.elapsed() >= ready_at {
                Ok(started.elapsed())
            } else {
                Err("not yet")
            }
        });
        let passed_at = value.expect("attempt should pass inside the deadline");
        assert!(passed_at >= ready_at);
        assert!(started.elapsed() < FAST.max_wait + SLACK);
    }

    #[rstest]
    fn default_policy_matches_constants() {
        let policy = WaitPolicy::default();
        assert_eq!(policy.max_wait, MAX_WAIT);
        assert_eq!(policy.interval, POLL_INTERVAL);
        assert_eq!(
            policy.with_max_wait(Duration::from_secs(1)).interval,
            POLL_INTERVAL
        );
    }
}
