//! Health reporting: overall status plus one named check per external
//! collaborator, each with an ok/warn/error status and a detail string.

use std::time::Duration;

use affectus_engine::EngineContext;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckResult {
    pub name: String,
    pub status: String,
    pub details: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthReport {
    pub status: String,
    pub checks: Vec<CheckResult>,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.checks.iter().all(|c| c.status != "error")
    }
}

pub async fn check_all(ctx: &EngineContext) -> HealthReport {
    let checks = vec![check_oracle(ctx).await, check_catalog(ctx).await];
    let status = if checks.iter().all(|c| c.status == "ok") { "ok" } else { "degraded" };
    HealthReport { status: status.to_string(), checks }
}

async fn check_oracle(ctx: &EngineContext) -> CheckResult {
    let probe = tokio::time::timeout(Duration::from_millis(500), ctx.oracle.analyze("healthcheck", "ok"));
    match probe.await {
        Ok(Ok(_)) => CheckResult { name: "oracle".into(), status: "ok".into(), details: None },
        Ok(Err(err)) => CheckResult { name: "oracle".into(), status: "error".into(), details: Some(err.to_string()) },
        Err(_) => CheckResult { name: "oracle".into(), status: "error".into(), details: Some("timed out".into()) },
    }
}

async fn check_catalog(ctx: &EngineContext) -> CheckResult {
    let len = ctx.profiler.len().await;
    if len == 0 {
        CheckResult { name: "catalog".into(), status: "warn".into(), details: Some("catalog is empty".into()) }
    } else {
        CheckResult { name: "catalog".into(), status: "ok".into(), details: Some(format!("{len} items")) }
    }
}
