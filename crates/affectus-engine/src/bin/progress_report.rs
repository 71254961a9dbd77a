//! Offline progress report over a JSON-lines experience log.
//!
//! Usage:
//!   cargo run --bin progress-report --package affectus-engine -- <path> [epsilon] [epsilon_initial]

use affectus_engine::analyze;
use affectus_types::Experience;
use std::env;
use std::fs;

fn main() -> anyhow::Result<()> {
    let mut args = env::args().skip(1);
    let path = args.next().ok_or_else(|| anyhow::anyhow!("usage: progress-report <path> [epsilon] [epsilon_initial]"))?;
    let epsilon: f64 = args.next().and_then(|v| v.parse().ok()).unwrap_or(0.05);
    let epsilon_initial: f64 = args.next().and_then(|v| v.parse().ok()).unwrap_or(0.30);

    let raw = fs::read_to_string(&path)?;
    let mut experiences = Vec::new();
    for (i, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let experience: Experience = serde_json::from_str(line)
            .map_err(|err| anyhow::anyhow!("line {}: {}", i + 1, err))?;
        experiences.push(experience);
    }

    let report = analyze(&experiences, epsilon, epsilon_initial);

    println!("=== AFFECTUS PROGRESS REPORT ===");
    println!();
    println!("Experiences:       {}", report.total_experiences);
    println!("Completion rate:   {:.1}%", report.completion_rate * 100.0);
    println!("Avg reward:        {:.3}", report.avg_reward);
    println!("Reward trend:      {:?}", report.reward_trend);
    println!("Exploration:       {}", report.exploration_count);
    println!("Exploitation:      {}", report.exploitation_count);
    println!("Convergence score: {:.3}", report.convergence_score);
    println!("Convergence stage: {:?}", report.convergence_stage);

    Ok(())
}
