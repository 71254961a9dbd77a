//! Affectus configuration — centralized, typed environment loading.
//!
//! All tunables the core reads from the process environment are
//! collected here instead of being read ad hoc at their point of use, so
//! that a single `AffectusConfig::from_env()` call at startup is the only
//! place environment variables are parsed.

use std::env;
use std::time::Duration;

/// Q-learning, exploration and session tunables loaded from the process
/// environment.
#[derive(Debug, Clone, PartialEq)]
pub struct AffectusConfig {
    /// `Q_LEARNING_RATE` — α, default 0.10.
    pub q_learning_rate: f64,
    /// `Q_DISCOUNT` — γ, default 0.95.
    pub q_discount: f64,
    /// `EPSILON_INITIAL` — default 0.30.
    pub epsilon_initial: f64,
    /// `EPSILON_MIN` — default 0.05.
    pub epsilon_min: f64,
    /// `EPSILON_DECAY` — default 0.995.
    pub epsilon_decay: f64,
    /// `EXPERIENCE_RING` — default 1000.
    pub experience_ring: usize,
    /// `SESSION_TTL_SECONDS` — default 86400.
    pub session_ttl: Duration,
    /// `REWARD_PROXIMITY_THRESHOLD` — default 0.30.
    pub reward_proximity_threshold: f64,

    /// Per-IP rate limit for `POST /recommend`: 60/min.
    pub recommend_rate_per_minute: u32,
    /// Per-IP rate limit for `POST /emotion/analyze`: 30/min.
    pub analyze_rate_per_minute: u32,
    /// Backpressure threshold: reject with "busy" if a per-user lock would
    /// be held longer than this.
    pub per_user_lock_timeout: Duration,
}

impl Default for AffectusConfig {
    fn default() -> Self {
        Self {
            q_learning_rate: 0.10,
            q_discount: 0.95,
            epsilon_initial: 0.30,
            epsilon_min: 0.05,
            epsilon_decay: 0.995,
            experience_ring: 1000,
            session_ttl: Duration::from_secs(86_400),
            reward_proximity_threshold: 0.30,
            recommend_rate_per_minute: 60,
            analyze_rate_per_minute: 30,
            per_user_lock_timeout: Duration::from_secs(5),
        }
    }
}

fn f64_env(var: &str, default: f64) -> f64 {
    env::var(var)
        .ok()
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

fn usize_env(var: &str, default: usize) -> usize {
    env::var(var)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

fn u32_env(var: &str, default: u32) -> u32 {
    env::var(var)
        .ok()
        .and_then(|v| v.trim().parse::<u32>().ok())
        .unwrap_or(default)
}

fn seconds_env(var: &str, default_secs: u64) -> Duration {
    env::var(var)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or_else(|| Duration::from_secs(default_secs))
}

impl AffectusConfig {
    /// Load configuration from the process environment, falling back to
    /// the documented defaults for anything unset or unparseable. Attempts
    /// to load a `.env` file first (no-op if absent), matching the
    /// `dotenvy` idiom used throughout the ambient stack.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        let defaults = Self::default();

        let cfg = Self {
            q_learning_rate: f64_env("Q_LEARNING_RATE", defaults.q_learning_rate),
            q_discount: f64_env("Q_DISCOUNT", defaults.q_discount),
            epsilon_initial: f64_env("EPSILON_INITIAL", defaults.epsilon_initial),
            epsilon_min: f64_env("EPSILON_MIN", defaults.epsilon_min),
            epsilon_decay: f64_env("EPSILON_DECAY", defaults.epsilon_decay),
            experience_ring: usize_env("EXPERIENCE_RING", defaults.experience_ring),
            session_ttl: seconds_env("SESSION_TTL_SECONDS", defaults.session_ttl.as_secs()),
            reward_proximity_threshold: f64_env(
                "REWARD_PROXIMITY_THRESHOLD",
                defaults.reward_proximity_threshold,
            ),
            recommend_rate_per_minute: u32_env(
                "RECOMMEND_RATE_PER_MINUTE",
                defaults.recommend_rate_per_minute,
            ),
            analyze_rate_per_minute: u32_env(
                "ANALYZE_RATE_PER_MINUTE",
                defaults.analyze_rate_per_minute,
            ),
            per_user_lock_timeout: seconds_env(
                "PER_USER_LOCK_TIMEOUT_SECONDS",
                defaults.per_user_lock_timeout.as_secs(),
            ),
        };

        tracing::info!(
            alpha = cfg.q_learning_rate,
            gamma = cfg.q_discount,
            epsilon_initial = cfg.epsilon_initial,
            "affectus config loaded"
        );
        cfg
    }
}
