use crate::domain::services::escalation_service::EscalationEngine;
use crate::utils::errors::WorkerError;
use crate::workers::worker::Worker;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

/// 自动升级巡检工作器
///
/// 按固定周期驱动升级引擎巡检超出时间预算的工单
pub struct EscalationSweepWorker {
    engine: Arc<EscalationEngine>,
    interval: Duration,
    shutdown: watch::Receiver<bool>,
}

impl EscalationSweepWorker {
    pub fn new(
        engine: Arc<EscalationEngine>,
        interval: Duration,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            engine,
            interval,
            shutdown,
        }
    }

    /// 执行一轮巡检
    pub async fn run_cycle(&self) -> Result<u64, WorkerError> {
        self.engine
            .run_automatic_escalation_sweep()
            .await
            .map_err(|e| WorkerError::DomainError(e.to_string()))
    }
}

#[async_trait]
impl Worker for EscalationSweepWorker {
    async fn run(&self) -> Result<(), WorkerError> {
        info!("Escalation sweep worker started");

        let mut shutdown = self.shutdown.clone();
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    match self.run_cycle().await {
                        Ok(escalated) => {
                            if escalated > 0 {
                                info!("Escalation sweep escalated {} tickets", escalated);
                            }
                        }
                        Err(e) => {
                            error!("Escalation sweep cycle failed: {}", e);
                        }
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("Escalation sweep worker stopping");
                        break;
                    }
                }
            }
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "escalation_sweep"
    }
}

#[cfg(test)]
#[path = "escalation_sweep_worker_test.rs"]
mod tests;
