//! Per-user epsilon-greedy exploration state, decay, and injection into a
//! ranked candidate list.

use std::collections::HashMap;

use affectus_types::ExplorationState;
use chrono::Utc;
use rand::Rng;
use tokio::sync::RwLock;

pub const EPSILON_RESET: f64 = 0.30;
const DECAY_ALPHA: f64 = 0.1;
const INJECTION_BOOST: f64 = 0.20;

/// A ranked candidate, generic over whatever payload the ranker already
/// produced; only the fields exploration injection needs are named here.
pub struct RankedCandidate<T> {
    pub combined_score: f64,
    pub is_exploration: bool,
    pub payload: T,
}

pub struct ExplorationController {
    states: RwLock<HashMap<String, ExplorationState>>,
    epsilon_initial: f64,
    epsilon_min: f64,
    epsilon_decay: f64,
}

impl ExplorationController {
    pub fn new(epsilon_initial: f64, epsilon_min: f64, epsilon_decay: f64) -> Self {
        Self {
            states: RwLock::new(HashMap::new()),
            epsilon_initial,
            epsilon_min,
            epsilon_decay,
        }
    }

    /// Fetch a user's exploration state, creating it at `epsilon_initial`
    /// on first access.
    pub async fn state_for(&self, user_id: &str) -> ExplorationState {
        let mut states = self.states.write().await;
        states
            .entry(user_id.to_string())
            .or_insert_with(|| ExplorationState::initial(self.epsilon_initial, Utc::now()))
            .clone()
    }

    pub async fn load(&self, user_id: &str, state: ExplorationState) {
        self.states.write().await.insert(user_id.to_string(), state);
    }

    /// Advance a user's exploration state after one feedback event: bump
    /// `total_experiences`, blend `reward` into the moving average, and
    /// decay epsilon toward its floor.
    pub async fn record_feedback(&self, user_id: &str, reward: f64) -> ExplorationState {
        let mut states = self.states.write().await;
        let state = states
            .entry(user_id.to_string())
            .or_insert_with(|| ExplorationState::initial(self.epsilon_initial, Utc::now()));
        state.total_experiences += 1;
        state.avg_reward = DECAY_ALPHA * reward + (1.0 - DECAY_ALPHA) * state.avg_reward;
        state.epsilon = (state.epsilon * self.epsilon_decay).max(self.epsilon_min);
        state.last_updated = Utc::now();
        state.clone()
    }

    /// Reset a user's epsilon back to the initial value without touching
    /// `total_experiences` or `avg_reward`.
    pub async fn reset_epsilon(&self, user_id: &str) -> ExplorationState {
        let mut states = self.states.write().await;
        let state = states
            .entry(user_id.to_string())
            .or_insert_with(|| ExplorationState::initial(self.epsilon_initial, Utc::now()));
        state.epsilon = EPSILON_RESET;
        state.last_updated = Utc::now();
        state.clone()
    }

    /// Walk the lower half of a sorted-descending candidate list; with
    /// probability epsilon at each position, mark it as exploration and
    /// boost its combined score, then re-sort by combined score
    /// descending (stable, so equal scores keep their relative order).
    pub async fn inject<T>(&self, user_id: &str, mut candidates: Vec<RankedCandidate<T>>) -> Vec<RankedCandidate<T>> {
        let epsilon = self.state_for(user_id).await.epsilon;
        let lower_half_start = candidates.len() / 2;
        let mut rng = rand::thread_rng();
        for candidate in candidates.iter_mut().skip(lower_half_start) {
            if rng.gen_bool(epsilon.clamp(0.0, 1.0)) {
                candidate.is_exploration = true;
                candidate.combined_score += INJECTION_BOOST;
            }
        }
        candidates.sort_by(|a, b| b.combined_score.partial_cmp(&a.combined_score).unwrap_or(std::cmp::Ordering::Equal));
        candidates
    }
}

/// `UCB_i = q_i + 2*sqrt(ln(N) / n_i)`, used only to break ties among
/// already-visited candidates; unvisited candidates are treated as +inf by
/// the caller before this is ever invoked.
pub fn ucb_bonus(total_visits: u64, candidate_visits: u64) -> f64 {
    if candidate_visits == 0 {
        return f64::INFINITY;
    }
    2.0 * ((total_visits as f64).ln() / candidate_visits as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn state_created_lazily_at_initial_epsilon() {
        let controller = ExplorationController::new(0.30, 0.05, 0.995);
        let state = controller.state_for("u1").await;
        assert_eq!(state.epsilon, 0.30);
        assert_eq!(state.total_experiences, 0);
    }

    #[tokio::test]
    async fn epsilon_decays_and_floors() {
        let controller = ExplorationController::new(0.30, 0.05, 0.995);
        let mut last = 0.30;
        for _ in 0..100 {
            let state = controller.record_feedback("u1", 0.5).await;
            last = state.epsilon;
        }
        let expected = (0.05f64).max(0.30 * 0.995_f64.powi(100));
        assert!((last - expected).abs() < 1e-9);
    }

    #[tokio::test]
    async fn reset_restores_initial_epsilon_without_touching_counters() {
        let controller = ExplorationController::new(0.30, 0.05, 0.995);
        controller.record_feedback("u1", 1.0).await;
        let before = controller.state_for("u1").await;
        let after = controller.reset_epsilon("u1").await;
        assert_eq!(after.epsilon, 0.30);
        assert_eq!(after.total_experiences, before.total_experiences);
    }

    #[tokio::test]
    async fn users_are_isolated() {
        let controller = ExplorationController::new(0.30, 0.05, 0.995);
        controller.record_feedback("u1", 1.0).await;
        let u2 = controller.state_for("u2").await;
        assert_eq!(u2.total_experiences, 0);
    }

    #[tokio::test]
    async fn epsilon_after_100_feedbacks_matches_closed_form_and_injection_rate() {
        let controller = ExplorationController::new(0.30, 0.05, 0.995);
        let mut last = 0.30;
        for _ in 0..100 {
            let state = controller.record_feedback("u1", 0.5).await;
            last = state.epsilon;
        }
        let expected = (0.05f64).max(0.30 * 0.995_f64.powi(100));
        assert!((expected - 0.1818).abs() < 1e-3);
        assert!((last - expected).abs() < 1e-9);

        // Draw the injection coin flip many times at the settled epsilon and
        // check the observed exploration rate lands within 3 standard
        // deviations of epsilon (binomial proportion).
        let trials = 2000;
        let candidates_per_trial = 10;
        let lower_half = candidates_per_trial / 2;
        let mut flips = 0u64;
        for _ in 0..trials {
            let candidates: Vec<RankedCandidate<()>> = (0..candidates_per_trial)
                .map(|_| RankedCandidate { combined_score: 0.0, is_exploration: false, payload: () })
                .collect();
            let injected = controller.inject("u1", candidates).await;
            flips += injected.iter().filter(|c| c.is_exploration).count() as u64;
        }
        let draws = (trials * lower_half) as f64;
        let observed = flips as f64 / draws;
        let sigma = (last * (1.0 - last) / draws).sqrt();
        assert!(
            (observed - last).abs() < 3.0 * sigma,
            "observed {observed} vs epsilon {last} (3 sigma = {})",
            3.0 * sigma
        );
    }

    #[test]
    fn ucb_unvisited_dominates() {
        assert_eq!(ucb_bonus(10, 0), f64::INFINITY);
    }

    #[test]
    fn ucb_decreases_with_more_visits() {
        let few = ucb_bonus(100, 2);
        let many = ucb_bonus(100, 50);
        assert!(few > many);
    }
}
