//! Orchestration layer: wires the embedding, policy, store and oracle
//! crates together into `recommend`, `feedback` and `analyze` pipelines.

pub mod context;
pub mod feedback;
pub mod progress;
pub mod rationale;
pub mod recommend;

pub use context::{EngineContext, UserLocks};
pub use feedback::{feedback, FeedbackOutcome};
pub use progress::{analyze, ConvergenceStage, ProgressReport, RewardTrend};
pub use recommend::{derive_desired_state, recommend, Recommendation, RecommendResponse};
