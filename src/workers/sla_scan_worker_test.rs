#[cfg(test)]
mod tests {
    use crate::domain::models::incident::{Category, Impact, Incident, Priority, Urgency};
    use crate::domain::models::notification::Notification;
    use crate::domain::models::sla::SlaRule;
    use crate::domain::repositories::ticket_store::TicketStore;
    use crate::domain::services::notification_service::Notifier;
    use crate::domain::services::sla_service::{SlaMonitor, SlaMonitorConfig};
    use crate::infrastructure::repositories::memory_directory::MemoryDirectory;
    use crate::infrastructure::repositories::memory_sla_store::{
        MemorySlaRuleStore, MemorySlaViolationStore,
    };
    use crate::infrastructure::repositories::memory_ticket_store::MemoryTicketStore;
    use crate::infrastructure::repositories::memory_unit_of_work::MemoryTicketUnitOfWork;
    use crate::utils::clock::{Clock, ManualClock};
    use crate::workers::sla_scan_worker::SlaScanWorker;
    use crate::workers::worker::Worker;
    use anyhow::Result;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::watch;

    struct NullNotifier;

    #[async_trait]
    impl Notifier for NullNotifier {
        async fn notify(&self, _notification: Notification) -> Result<()> {
            Ok(())
        }
    }

    fn monitor(tickets: Arc<MemoryTicketStore>, clock: Arc<ManualClock>) -> Arc<SlaMonitor> {
        let directory = Arc::new(MemoryDirectory::new());
        let rules = Arc::new(MemorySlaRuleStore::new());
        rules.load(vec![SlaRule {
            priority: Priority::Critical,
            impact: Impact::High,
            urgency: Urgency::High,
            response_minutes: 15,
            resolution_minutes: 240,
        }]);
        let uow = Arc::new(MemoryTicketUnitOfWork::new(tickets.clone(), directory));
        Arc::new(SlaMonitor::new(
            tickets,
            rules,
            Arc::new(MemorySlaViolationStore::new()),
            uow,
            Arc::new(NullNotifier),
            clock,
            SlaMonitorConfig::default(),
        ))
    }

    #[tokio::test]
    async fn test_run_cycle_reports_scan_outcome() {
        let tickets = Arc::new(MemoryTicketStore::new());
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 0).unwrap(),
        ));
        tickets
            .insert(&Incident::new(
                0,
                String::new(),
                500,
                Category::Network,
                Priority::Critical,
                Impact::High,
                Urgency::High,
                clock.now(),
            ))
            .await
            .unwrap();
        clock.advance(chrono::Duration::minutes(20));

        let (_tx, rx) = watch::channel(false);
        let worker = SlaScanWorker::new(
            monitor(tickets, clock),
            Duration::from_secs(300),
            rx,
        );

        let outcome = worker.run_cycle().await.unwrap();
        assert_eq!(outcome.scanned, 1);
        assert_eq!(outcome.violations, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_exits_promptly_on_shutdown() {
        let tickets = Arc::new(MemoryTicketStore::new());
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 0).unwrap(),
        ));
        let (tx, rx) = watch::channel(false);
        let worker = SlaScanWorker::new(monitor(tickets, clock), Duration::from_secs(300), rx);

        let handle = tokio::spawn(async move { worker.run().await });
        tokio::task::yield_now().await;
        tx.send(true).unwrap();

        let joined = tokio::time::timeout(Duration::from_secs(5), handle).await;
        assert!(joined.is_ok(), "worker did not stop on shutdown signal");
    }
}
