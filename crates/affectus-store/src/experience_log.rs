//! Per-user, bounded, append-only experience log.

use std::collections::{HashMap, VecDeque};

use affectus_types::Experience;
use tokio::sync::RwLock;

pub struct ExperienceLog {
    per_user: RwLock<HashMap<String, VecDeque<Experience>>>,
    capacity: usize,
}

impl ExperienceLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            per_user: RwLock::new(HashMap::new()),
            capacity,
        }
    }

    /// Append an experience, dropping the oldest record for this user if
    /// the ring is at capacity. Never mutates existing records.
    pub async fn append(&self, experience: Experience) {
        let mut per_user = self.per_user.write().await;
        let ring = per_user.entry(experience.user_id.clone()).or_default();
        if ring.len() >= self.capacity {
            ring.pop_front();
        }
        ring.push_back(experience);
    }

    /// Most recent experiences for a user, oldest first.
    pub async fn for_user(&self, user_id: &str) -> Vec<Experience> {
        self.per_user
            .read()
            .await
            .get(user_id)
            .map(|ring| ring.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub async fn count_for_user(&self, user_id: &str) -> usize {
        self.per_user.read().await.get(user_id).map(|r| r.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use affectus_types::{AffectState, DesiredState, Intensity};
    use chrono::Utc;

    fn sample(user: &str) -> Experience {
        Experience {
            user_id: user.into(),
            timestamp: Utc::now(),
            state_before: AffectState::new(0.0, 0.0, 0.2, 0.5).unwrap(),
            content_id: "c1".into(),
            state_after: AffectState::new(0.1, 0.0, 0.1, 0.5).unwrap(),
            desired_state: DesiredState::new(0.3, 0.0, 0.1, Intensity::Subtle, "test").unwrap(),
            reward: 0.2,
            completed: true,
            watch_duration: 30.0,
            total_duration: 30.0,
            rating: None,
            was_exploration: false,
        }
    }

    #[tokio::test]
    async fn ring_drops_oldest_at_capacity() {
        let log = ExperienceLog::new(2);
        log.append(sample("u1")).await;
        log.append(sample("u1")).await;
        log.append(sample("u1")).await;
        assert_eq!(log.count_for_user("u1").await, 2);
    }

    #[tokio::test]
    async fn users_are_isolated() {
        let log = ExperienceLog::new(10);
        log.append(sample("u1")).await;
        assert_eq!(log.count_for_user("u2").await, 0);
        assert_eq!(log.count_for_user("u1").await, 1);
    }
}
