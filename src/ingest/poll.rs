//! Bounded parse-status polling as an explicit state machine.
//!
//! The service parses uploads asynchronously; the only way to know when a
//! document is ready is to ask repeatedly. The lifecycle is modelled as
//! [`ParseStatus`] — pending, ready, or terminally failed — and the loop's
//! result as [`PollOutcome`], which adds the timed-out case when the
//! attempt budget runs dry.
//!
//! Sleeping goes through the [`Clock`] trait so tests drive the loop
//! through all of its states without a single real delay; production code
//! passes [`TokioClock`].

use crate::error::DocError;
use crate::progress::IngestProgress;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tracing::debug;

/// One observation of a file's parse lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseStatus {
    /// Parsing finished; the file can be referenced by inference calls.
    Ready,
    /// A terminal failure state; the code says which one.
    Failed(String),
    /// Still working; the code is the service's in-progress phase.
    Pending(String),
}

impl ParseStatus {
    /// Map a raw service status code onto the lifecycle.
    ///
    /// Unknown codes are treated as pending: the service adds intermediate
    /// phases occasionally, and giving up on an unrecognised one would
    /// abandon documents that were still parsing fine.
    pub fn from_code(code: &str) -> Self {
        match code {
            "FILE_IS_READY" => ParseStatus::Ready,
            "PARSE_FAILED" | "SAFE_CHECK_FAILED" | "INDEX_BUILDING_FAILED" => {
                ParseStatus::Failed(code.to_string())
            }
            other => ParseStatus::Pending(other.to_string()),
        }
    }

    /// The raw status code for reporting.
    pub fn code(&self) -> &str {
        match self {
            ParseStatus::Ready => "FILE_IS_READY",
            ParseStatus::Failed(code) | ParseStatus::Pending(code) => code,
        }
    }
}

/// How a polling run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Ready,
    Failed(String),
    TimedOut,
}

/// Sleeping abstraction so tests can simulate time.
pub trait Clock: Send + Sync {
    fn sleep<'a>(&'a self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>>;
}

/// The production clock: real tokio sleeps.
pub struct TokioClock;

impl Clock for TokioClock {
    fn sleep<'a>(&'a self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(tokio::time::sleep(duration))
    }
}

/// Poll `fetch_status` until the file is ready, terminally failed, or the
/// attempt budget is exhausted.
///
/// Transport errors from `fetch_status` propagate immediately — a dead
/// network is not worth burning the remaining budget on.
pub async fn poll_until_ready<F, Fut>(
    fetch_status: F,
    interval: Duration,
    max_attempts: u32,
    clock: &dyn Clock,
    progress: &dyn IngestProgress,
) -> Result<PollOutcome, DocError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<ParseStatus, DocError>>,
{
    for attempt in 1..=max_attempts {
        let status = fetch_status().await?;
        progress.on_poll(attempt, max_attempts, status.code());

        match status {
            ParseStatus::Ready => {
                progress.on_parse_ready();
                return Ok(PollOutcome::Ready);
            }
            ParseStatus::Failed(code) => {
                return Ok(PollOutcome::Failed(code));
            }
            ParseStatus::Pending(code) => {
                debug!("Poll {attempt}/{max_attempts}: still parsing ({code})");
                clock.sleep(interval).await;
            }
        }
    }
    Ok(PollOutcome::TimedOut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::SilentProgress;
    use std::sync::Mutex;

    /// A clock that records requested sleeps and returns immediately.
    struct ManualClock {
        slept: Mutex<Vec<Duration>>,
    }

    impl ManualClock {
        fn new() -> Self {
            Self {
                slept: Mutex::new(Vec::new()),
            }
        }

        fn sleep_count(&self) -> usize {
            self.slept.lock().unwrap().len()
        }
    }

    impl Clock for ManualClock {
        fn sleep<'a>(
            &'a self,
            duration: Duration,
        ) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
            self.slept.lock().unwrap().push(duration);
            Box::pin(std::future::ready(()))
        }
    }

    fn scripted(statuses: Vec<ParseStatus>) -> impl Fn() -> std::future::Ready<Result<ParseStatus, DocError>> {
        let remaining = Mutex::new(statuses);
        move || {
            let mut remaining = remaining.lock().unwrap();
            let status = if remaining.is_empty() {
                ParseStatus::Pending("PARSING".into())
            } else {
                remaining.remove(0)
            };
            std::future::ready(Ok(status))
        }
    }

    #[tokio::test]
    async fn ready_after_two_pending_polls() {
        let clock = ManualClock::new();
        let fetch = scripted(vec![
            ParseStatus::Pending("INIT".into()),
            ParseStatus::Pending("PARSING".into()),
            ParseStatus::Ready,
        ]);
        let outcome =
            poll_until_ready(fetch, Duration::from_secs(5), 99, &clock, &SilentProgress)
                .await
                .unwrap();
        assert_eq!(outcome, PollOutcome::Ready);
        // Slept only after the two pending observations, never after ready.
        assert_eq!(clock.sleep_count(), 2);
        assert_eq!(clock.slept.lock().unwrap()[0], Duration::from_secs(5));
    }

    #[tokio::test]
    async fn terminal_failure_stops_immediately() {
        let clock = ManualClock::new();
        let fetch = scripted(vec![
            ParseStatus::Pending("PARSING".into()),
            ParseStatus::Failed("SAFE_CHECK_FAILED".into()),
        ]);
        let outcome =
            poll_until_ready(fetch, Duration::from_secs(5), 99, &clock, &SilentProgress)
                .await
                .unwrap();
        assert_eq!(outcome, PollOutcome::Failed("SAFE_CHECK_FAILED".into()));
        assert_eq!(clock.sleep_count(), 1);
    }

    #[tokio::test]
    async fn budget_exhaustion_times_out() {
        let clock = ManualClock::new();
        let fetch = scripted(Vec::new()); // pending forever
        let outcome =
            poll_until_ready(fetch, Duration::from_secs(5), 7, &clock, &SilentProgress)
                .await
                .unwrap();
        assert_eq!(outcome, PollOutcome::TimedOut);
        assert_eq!(clock.sleep_count(), 7);
    }

    #[tokio::test]
    async fn transport_error_propagates() {
        let clock = ManualClock::new();
        let fetch = || {
            std::future::ready(Err(DocError::StatusFailed {
                detail: "connection reset".into(),
            }))
        };
        let result =
            poll_until_ready(fetch, Duration::from_secs(5), 99, &clock, &SilentProgress).await;
        assert!(matches!(result, Err(DocError::StatusFailed { .. })));
        assert_eq!(clock.sleep_count(), 0);
    }

    #[test]
    fn status_codes_map_onto_the_state_machine() {
        assert_eq!(ParseStatus::from_code("FILE_IS_READY"), ParseStatus::Ready);
        for code in ["PARSE_FAILED", "SAFE_CHECK_FAILED", "INDEX_BUILDING_FAILED"] {
            assert_eq!(
                ParseStatus::from_code(code),
                ParseStatus::Failed(code.to_string())
            );
        }
        assert_eq!(
            ParseStatus::from_code("SOME_NEW_PHASE"),
            ParseStatus::Pending("SOME_NEW_PHASE".to_string())
        );
    }
}
