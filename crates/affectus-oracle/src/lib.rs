//! The affect oracle contract: an external text-to-affect-state inference
//! step, treated as an opaque collaborator with its own retry policy.
//!
//! A narrow async trait injected into the engine rather than reached for as
//! a global, the same shape used for every other external dependency here.

use std::time::Duration;

use affectus_types::AffectState;
use async_trait::async_trait;

/// One oracle reading: the inferred affect state plus the metadata the
/// `/emotion/analyze` response surfaces alongside it.
#[derive(Debug, Clone, PartialEq)]
pub struct OracleReading {
    pub state: AffectState,
    pub primary_emotion: String,
    pub confidence: f64,
    pub vector: [f64; 8],
}

/// Maps free text to an affect state. Implementations talk to whatever
/// language model or classifier is configured; this crate only fixes the
/// contract and the retry behavior around it.
#[async_trait]
pub trait AffectOracle: Send + Sync {
    async fn analyze(&self, user_id: &str, text: &str) -> anyhow::Result<OracleReading>;
}

/// Wraps an `AffectOracle` with bounded exponential-backoff retry: at most
/// `max_attempts` calls, doubling the delay each time, and a hard ceiling
/// on the total time spent across all attempts.
pub struct RetryingOracle<O: AffectOracle> {
    inner: O,
    max_attempts: u32,
    initial_backoff: Duration,
    deadline: Duration,
}

impl<O: AffectOracle> RetryingOracle<O> {
    pub fn new(inner: O, max_attempts: u32, initial_backoff: Duration, deadline: Duration) -> Self {
        Self {
            inner,
            max_attempts: max_attempts.max(1),
            initial_backoff,
            deadline,
        }
    }

    pub fn wrap(inner: O) -> Self {
        Self::new(inner, 3, Duration::from_millis(200), Duration::from_secs(5))
    }
}

#[async_trait]
impl<O: AffectOracle> AffectOracle for RetryingOracle<O> {
    async fn analyze(&self, user_id: &str, text: &str) -> anyhow::Result<OracleReading> {
        let started = tokio::time::Instant::now();
        let mut backoff = self.initial_backoff;
        let mut last_err = None;

        for attempt in 1..=self.max_attempts {
            if started.elapsed() >= self.deadline {
                break;
            }
            match self.inner.analyze(user_id, text).await {
                Ok(reading) => return Ok(reading),
                Err(err) => {
                    tracing::warn!(attempt, max_attempts = self.max_attempts, error = %err, "affect oracle call failed");
                    last_err = Some(err);
                    if attempt < self.max_attempts {
                        let remaining = self.deadline.saturating_sub(started.elapsed());
                        tokio::time::sleep(backoff.min(remaining)).await;
                        backoff *= 2;
                    }
                }
            }
        }

        Err(last_err.unwrap_or_else(|| anyhow::anyhow!("affect oracle retry deadline exceeded")))
    }
}

/// Deterministic stand-in oracle for tests and local development: derives a
/// state from simple lexical cues rather than calling a model.
pub struct MockAffectOracle;

#[async_trait]
impl AffectOracle for MockAffectOracle {
    async fn analyze(&self, _user_id: &str, text: &str) -> anyhow::Result<OracleReading> {
        let lower = text.to_lowercase();
        let (valence, arousal, stress, emotion) = if lower.contains("anxious") || lower.contains("stressed") {
            (-0.4, 0.6, 0.8, "anxious")
        } else if lower.contains("sad") || lower.contains("down") {
            (-0.6, -0.2, 0.4, "sad")
        } else if lower.contains("happy") || lower.contains("great") {
            (0.6, 0.3, 0.2, "happy")
        } else if lower.contains("tired") || lower.contains("exhausted") {
            (-0.1, -0.6, 0.3, "tired")
        } else {
            (0.0, 0.0, 0.3, "neutral")
        };
        let state = AffectState::new(valence, arousal, stress, 0.6).expect("finite mock inputs");
        Ok(OracleReading {
            state,
            primary_emotion: emotion.to_string(),
            confidence: 0.6,
            vector: [valence, arousal, stress, 0.6, 0.0, 0.0, 0.0, 0.0],
        })
    }
}

/// Always-fails oracle, for exercising the retry wrapper's give-up path.
pub struct FailingOracle;

#[async_trait]
impl AffectOracle for FailingOracle {
    async fn analyze(&self, _user_id: &str, _text: &str) -> anyhow::Result<OracleReading> {
        Err(anyhow::anyhow!("oracle unreachable"))
    }
}
