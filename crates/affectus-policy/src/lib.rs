//! Per-user Q-learning policy: the Q-table, exploration state, reward
//! calculation, outcome prediction, and hybrid ranking.

pub mod exploration;
pub mod outcome;
pub mod qstore;
pub mod ranker;
pub mod reward;

pub use exploration::{ucb_bonus, ExplorationController, RankedCandidate};
pub use outcome::{predict, PredictedOutcome};
pub use qstore::QStore;
pub use ranker::{HybridRanker, RankedItem};
pub use reward::{RewardBreakdown, RewardCalculator};
