// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use axum::Extension;
use dispatchrs::application::use_cases::ticket_use_case::TicketUseCase;
use dispatchrs::config::settings::Settings;
use dispatchrs::domain::services::assignment_service::AssignmentEngine;
use dispatchrs::domain::services::escalation_service::EscalationEngine;
use dispatchrs::domain::services::notification_service::Notifier;
use dispatchrs::domain::services::sla_service::SlaMonitor;
use dispatchrs::infrastructure::repositories::memory_directory::MemoryDirectory;
use dispatchrs::infrastructure::repositories::memory_escalation_ledger::MemoryEscalationLedger;
use dispatchrs::infrastructure::repositories::memory_sla_store::{
    MemorySlaRuleStore, MemorySlaViolationStore,
};
use dispatchrs::infrastructure::repositories::memory_ticket_store::MemoryTicketStore;
use dispatchrs::infrastructure::repositories::memory_unit_of_work::MemoryTicketUnitOfWork;
use dispatchrs::infrastructure::services::log_notifier::LogNotifier;
use dispatchrs::infrastructure::services::webhook_notifier::WebhookNotifier;
use dispatchrs::presentation::routes;
use dispatchrs::utils::clock::{Clock, SystemClock};
use dispatchrs::utils::telemetry;
use dispatchrs::workers::escalation_sweep_worker::EscalationSweepWorker;
use dispatchrs::workers::manager::WorkerManager;
use dispatchrs::workers::sla_scan_worker::SlaScanWorker;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting dispatchrs...");

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    info!("Configuration loaded");

    // Initialize Prometheus Metrics
    dispatchrs::infrastructure::metrics::init_metrics(&settings.metrics.listen);

    // 3. Initialize stores
    // In-memory reference implementations; production deployments swap these
    // for store-backed implementations at this composition root.
    let tickets = Arc::new(MemoryTicketStore::new());
    let directory = Arc::new(MemoryDirectory::new());
    let ledger = Arc::new(MemoryEscalationLedger::new());
    let rules = Arc::new(MemorySlaRuleStore::new());
    rules.load(settings.sla.rules()?);
    let violations = Arc::new(MemorySlaViolationStore::new());
    let uow = Arc::new(MemoryTicketUnitOfWork::new(
        tickets.clone(),
        directory.clone(),
    ));
    info!("Stores initialized with {} SLA rules", settings.sla.rules.len());

    // 4. Initialize Notifier
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let notifier: Arc<dyn Notifier> = match &settings.notifier.endpoint {
        Some(endpoint) => Arc::new(WebhookNotifier::new(
            endpoint.clone(),
            settings.notifier.secret.clone(),
        )),
        None => Arc::new(LogNotifier),
    };

    // 5. Initialize Engines
    let assignment = Arc::new(AssignmentEngine::new(
        tickets.clone(),
        directory.clone(),
        uow.clone(),
        notifier.clone(),
        clock.clone(),
    ));
    let escalation = Arc::new(EscalationEngine::new(
        tickets.clone(),
        directory.clone(),
        ledger.clone(),
        uow.clone(),
        notifier.clone(),
        clock.clone(),
        settings.escalation.budgets(),
    ));
    let monitor = Arc::new(SlaMonitor::new(
        tickets.clone(),
        rules.clone(),
        violations.clone(),
        uow.clone(),
        notifier.clone(),
        clock.clone(),
        settings.sla.monitor_config(),
    ));

    // 6. Start Workers
    let mut worker_manager = WorkerManager::new();
    worker_manager.spawn(SlaScanWorker::new(
        monitor.clone(),
        Duration::from_secs(settings.sla.scan_period_secs),
        worker_manager.shutdown_signal(),
    ));
    worker_manager.spawn(EscalationSweepWorker::new(
        escalation.clone(),
        Duration::from_secs(settings.escalation.sweep_period_secs),
        worker_manager.shutdown_signal(),
    ));

    // 7. Start HTTP server
    let use_case = Arc::new(TicketUseCase::new(
        tickets.clone(),
        directory.clone(),
        ledger.clone(),
        assignment.clone(),
        escalation.clone(),
        clock.clone(),
    ));

    let app = routes::routes()
        .layer(Extension(use_case))
        .layer(Extension(settings.clone()))
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = worker_manager.wait_for_shutdown() => {}
    }

    Ok(())
}
