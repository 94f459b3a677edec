use crate::domain::services::sla_service::{ScanOutcome, SlaMonitor};
use crate::utils::errors::WorkerError;
use crate::workers::worker::Worker;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

/// SLA扫描工作器
///
/// 按固定周期驱动SLA监控器扫描活动工单
pub struct SlaScanWorker {
    monitor: Arc<SlaMonitor>,
    interval: Duration,
    shutdown: watch::Receiver<bool>,
}

impl SlaScanWorker {
    pub fn new(monitor: Arc<SlaMonitor>, interval: Duration, shutdown: watch::Receiver<bool>) -> Self {
        Self {
            monitor,
            interval,
            shutdown,
        }
    }

    /// 执行一轮扫描
    pub async fn run_cycle(&self) -> Result<ScanOutcome, WorkerError> {
        self.monitor
            .scan_active_tickets()
            .await
            .map_err(|e| WorkerError::DomainError(e.to_string()))
    }
}

#[async_trait]
impl Worker for SlaScanWorker {
    async fn run(&self) -> Result<(), WorkerError> {
        info!("SLA scan worker started");

        let mut shutdown = self.shutdown.clone();
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    match self.run_cycle().await {
                        Ok(outcome) => {
                            if outcome.violations > 0 || outcome.due_dates_set > 0 {
                                info!(
                                    "SLA scan: {} scanned, {} violations, {} due dates set",
                                    outcome.scanned, outcome.violations, outcome.due_dates_set
                                );
                            }
                        }
                        Err(e) => {
                            error!("SLA scan cycle failed: {}", e);
                        }
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("SLA scan worker stopping");
                        break;
                    }
                }
            }
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "sla_scan"
    }
}

#[cfg(test)]
#[path = "sla_scan_worker_test.rs"]
mod tests;
