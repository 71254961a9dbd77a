//! Pure analytics derived from a user's experience log: completion rate,
//! reward trend, exploration/exploitation split, and a convergence score.

use affectus_types::Experience;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewardTrend {
    Improving,
    Stable,
    Declining,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvergenceStage {
    Exploring,
    Learning,
    Confident,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressReport {
    pub total_experiences: usize,
    pub completion_rate: f64,
    pub avg_reward: f64,
    pub reward_trend: RewardTrend,
    pub exploration_count: usize,
    pub exploitation_count: usize,
    pub convergence_score: f64,
    pub convergence_stage: ConvergenceStage,
}

const CONVERGENCE_N_CAP: f64 = 100.0;

pub fn analyze(experiences: &[Experience], current_epsilon: f64, epsilon_initial: f64) -> ProgressReport {
    let total_experiences = experiences.len();

    if total_experiences == 0 {
        return ProgressReport {
            total_experiences: 0,
            completion_rate: 0.0,
            avg_reward: 0.0,
            reward_trend: RewardTrend::Stable,
            exploration_count: 0,
            exploitation_count: 0,
            convergence_score: 0.0,
            convergence_stage: ConvergenceStage::Exploring,
        };
    }

    let completed = experiences.iter().filter(|e| e.completed).count();
    let completion_rate = completed as f64 / total_experiences as f64;

    let avg_reward = experiences.iter().map(|e| e.reward).sum::<f64>() / total_experiences as f64;

    let exploration_count = experiences.iter().filter(|e| e.was_exploration).count();
    let exploitation_count = total_experiences - exploration_count;

    let reward_trend = trend(experiences);

    let normalized_epsilon = (current_epsilon / epsilon_initial.max(f64::EPSILON)).clamp(0.0, 1.0);
    let convergence_score = 0.4 * (total_experiences as f64 / CONVERGENCE_N_CAP).min(1.0)
        + 0.4 * (avg_reward + 1.0) / 2.0
        + 0.2 * (1.0 - normalized_epsilon);

    let convergence_stage = if convergence_score < 0.30 {
        ConvergenceStage::Exploring
    } else if convergence_score < 0.70 {
        ConvergenceStage::Learning
    } else {
        ConvergenceStage::Confident
    };

    ProgressReport {
        total_experiences,
        completion_rate,
        avg_reward,
        reward_trend,
        exploration_count,
        exploitation_count,
        convergence_score,
        convergence_stage,
    }
}

/// Compares the mean reward of the last third of the log against the mean
/// of the prior two-thirds.
fn trend(experiences: &[Experience]) -> RewardTrend {
    let n = experiences.len();
    if n < 3 {
        return RewardTrend::Stable;
    }
    let split = n - n / 3;
    let (earlier, later) = experiences.split_at(split);
    let earlier_avg = earlier.iter().map(|e| e.reward).sum::<f64>() / earlier.len() as f64;
    let later_avg = later.iter().map(|e| e.reward).sum::<f64>() / later.len() as f64;

    const EPSILON: f64 = 0.02;
    if later_avg - earlier_avg > EPSILON {
        RewardTrend::Improving
    } else if earlier_avg - later_avg > EPSILON {
        RewardTrend::Declining
    } else {
        RewardTrend::Stable
    }
}
