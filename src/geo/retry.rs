//! Outbound HTTP execution with bounded retries on provider throttling.
//!
//! The retry policy is deliberately asymmetric: HTTP 429 is the only
//! transient, self-inflicted failure worth absorbing against a shared
//! public provider. Other non-2xx statuses and transport faults fail the
//! call immediately.

use super::rate_gate::RateGate;
use super::types::GeoError;
use std::time::Duration;

/// Default Overpass interpreter endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://overpass-api.de/api/interpreter";

const USER_AGENT: &str = "Eirelocate/0.3 (school-uniform-exchange geodata client)";

pub const MAX_RETRIES: u32 = 3;
pub const INITIAL_DELAY: Duration = Duration::from_millis(1000);
pub const MAX_DELAY: Duration = Duration::from_millis(10_000);

/// A single outbound provider call. Implemented over `ureq` in production
/// and by scripted mocks in tests.
pub trait Transport: Send + Sync {
    /// POST one query to the provider and return the raw response body.
    fn execute(&self, query: &str) -> Result<String, GeoError>;
}

/// `ureq`-backed transport posting form-encoded Overpass queries.
pub struct HttpTransport {
    endpoint: String,
    agent: ureq::Agent,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    pub fn with_endpoint(endpoint: &str) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(30))
            .build();
        Self {
            endpoint: endpoint.to_string(),
            agent,
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HttpTransport {
    fn execute(&self, query: &str) -> Result<String, GeoError> {
        let response = self
            .agent
            .post(&self.endpoint)
            .set("User-Agent", USER_AGENT)
            .send_form(&[("data", query)]);

        match response {
            Ok(resp) => resp
                .into_string()
                .map_err(|e| GeoError::InvalidResponse(e.to_string())),
            Err(ureq::Error::Status(429, _)) => Err(GeoError::Throttled),
            Err(ureq::Error::Status(status, _)) => Err(GeoError::Provider { status }),
            Err(ureq::Error::Transport(t)) => Err(GeoError::Transport(t.to_string())),
        }
    }
}

/// Backoff before retrying `attempt` (1-based): 1s, 2s, 4s... capped at 10s.
fn backoff_delay(initial: Duration, max: Duration, attempt: u32) -> Duration {
    initial
        .checked_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
        .map_or(max, |d| d.min(max))
}

/// Wraps a single provider call with the rate gate and the 429 retry loop.
pub struct RetryExecutor {
    max_retries: u32,
    initial_delay: Duration,
    max_delay: Duration,
}

impl RetryExecutor {
    pub fn new() -> Self {
        Self::with_policy(MAX_RETRIES, INITIAL_DELAY, MAX_DELAY)
    }

    /// Executor with a specific policy (for testing).
    pub fn with_policy(max_retries: u32, initial_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_retries,
            initial_delay,
            max_delay,
        }
    }

    /// Rate-gate, post, and retry on throttling. Non-429 failures are
    /// returned immediately without retry.
    pub fn execute(
        &self,
        gate: &RateGate,
        transport: &dyn Transport,
        query: &str,
    ) -> Result<String, GeoError> {
        for attempt in 1..=self.max_retries {
            gate.acquire();
            match transport.execute(query) {
                Ok(body) => return Ok(body),
                Err(GeoError::Throttled) => {
                    if attempt == self.max_retries {
                        return Err(GeoError::RetriesExhausted {
                            attempts: self.max_retries,
                        });
                    }
                    let delay = backoff_delay(self.initial_delay, self.max_delay, attempt);
                    log::warn!(
                        "provider throttled (attempt {}/{}), backing off {:?}",
                        attempt,
                        self.max_retries,
                        delay
                    );
                    std::thread::sleep(delay);
                }
                Err(e) => return Err(e),
            }
        }
        Err(GeoError::RetriesExhausted {
            attempts: self.max_retries,
        })
    }
}

impl Default for RetryExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Instant;

    /// Transport that replays a scripted sequence of outcomes and counts
    /// how many calls it received.
    struct ScriptedTransport {
        script: Mutex<Vec<Result<String, GeoError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedTransport {
        fn new(script: Vec<Result<String, GeoError>>) -> Self {
            let mut script = script;
            script.reverse();
            Self {
                script: Mutex::new(script),
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Transport for ScriptedTransport {
        fn execute(&self, _query: &str) -> Result<String, GeoError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.script
                .lock()
                .unwrap()
                .pop()
                .unwrap_or(Err(GeoError::Transport("script exhausted".into())))
        }
    }

    fn fast_gate() -> RateGate {
        RateGate::with_interval(Duration::from_millis(0))
    }

    fn fast_executor() -> RetryExecutor {
        RetryExecutor::with_policy(3, Duration::from_millis(20), Duration::from_millis(200))
    }

    #[test]
    fn test_success_on_first_attempt() {
        let transport = ScriptedTransport::new(vec![Ok("{\"elements\":[]}".into())]);
        let result = fast_executor().execute(&fast_gate(), &transport, "q");
        assert_eq!(result.unwrap(), "{\"elements\":[]}");
        assert_eq!(transport.call_count(), 1);
    }

    #[test]
    fn test_retries_through_two_throttles() {
        let transport = ScriptedTransport::new(vec![
            Err(GeoError::Throttled),
            Err(GeoError::Throttled),
            Ok("ok".into()),
        ]);
        let start = Instant::now();
        let result = fast_executor().execute(&fast_gate(), &transport, "q");
        assert_eq!(result.unwrap(), "ok");
        assert_eq!(transport.call_count(), 3);
        // Backoff 20ms then 40ms between the three attempts.
        assert!(start.elapsed() >= Duration::from_millis(55));
    }

    #[test]
    fn test_exhausts_after_max_retries() {
        let transport = ScriptedTransport::new(vec![
            Err(GeoError::Throttled),
            Err(GeoError::Throttled),
            Err(GeoError::Throttled),
        ]);
        let result = fast_executor().execute(&fast_gate(), &transport, "q");
        match result {
            Err(GeoError::RetriesExhausted { attempts }) => assert_eq!(attempts, 3),
            other => panic!("expected exhausted retries, got {:?}", other),
        }
        assert_eq!(transport.call_count(), 3);
    }

    #[test]
    fn test_provider_error_is_not_retried() {
        let transport = ScriptedTransport::new(vec![Err(GeoError::Provider { status: 504 })]);
        let result = fast_executor().execute(&fast_gate(), &transport, "q");
        match result {
            Err(GeoError::Provider { status }) => assert_eq!(status, 504),
            other => panic!("expected provider error, got {:?}", other),
        }
        assert_eq!(transport.call_count(), 1);
    }

    #[test]
    fn test_transport_fault_is_not_retried() {
        let transport =
            ScriptedTransport::new(vec![Err(GeoError::Transport("connection reset".into()))]);
        let result = fast_executor().execute(&fast_gate(), &transport, "q");
        assert!(matches!(result, Err(GeoError::Transport(_))));
        assert_eq!(transport.call_count(), 1);
    }

    #[test]
    fn test_backoff_delay_doubles_and_caps() {
        let initial = Duration::from_millis(1000);
        let max = Duration::from_millis(10_000);
        assert_eq!(backoff_delay(initial, max, 1), Duration::from_millis(1000));
        assert_eq!(backoff_delay(initial, max, 2), Duration::from_millis(2000));
        assert_eq!(backoff_delay(initial, max, 3), Duration::from_millis(4000));
        assert_eq!(backoff_delay(initial, max, 5), Duration::from_millis(10_000));
    }
}
