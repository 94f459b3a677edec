#[cfg(test)]
mod tests {
    use crate::domain::models::incident::{
        Category, Impact, Incident, Priority, SupportTier, Urgency,
    };
    use crate::domain::models::notification::Notification;
    use crate::domain::repositories::ticket_store::TicketStore;
    use crate::domain::services::escalation_service::{EscalationBudgets, EscalationEngine};
    use crate::domain::services::notification_service::Notifier;
    use crate::infrastructure::repositories::memory_directory::MemoryDirectory;
    use crate::infrastructure::repositories::memory_escalation_ledger::MemoryEscalationLedger;
    use crate::infrastructure::repositories::memory_ticket_store::MemoryTicketStore;
    use crate::infrastructure::repositories::memory_unit_of_work::MemoryTicketUnitOfWork;
    use crate::utils::clock::{Clock, ManualClock};
    use crate::workers::escalation_sweep_worker::EscalationSweepWorker;
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

    fn engine(tickets: Arc<MemoryTicketStore>, clock: Arc<ManualClock>) -> Arc<EscalationEngine> {
        let directory = Arc::new(MemoryDirectory::new());
        let uow = Arc::new(MemoryTicketUnitOfWork::new(
            tickets.clone(),
            directory.clone(),
        ));
        Arc::new(EscalationEngine::new(
            tickets,
            directory,
            Arc::new(MemoryEscalationLedger::new()),
            uow,
            Arc::new(NullNotifier),
            clock,
            EscalationBudgets::default(),
        ))
    }

    #[tokio::test]
    async fn test_run_cycle_escalates_overdue_tickets() {
        let tickets = Arc::new(MemoryTicketStore::new());
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 0).unwrap(),
        ));
        let ticket = tickets
            .insert(&Incident::new(
                0,
                String::new(),
                500,
                Category::Software,
                Priority::Medium,
                Impact::Medium,
                Urgency::Medium,
                clock.now(),
            ))
            .await
            .unwrap();
        clock.advance(chrono::Duration::minutes(150));

        let (_tx, rx) = watch::channel(false);
        let worker = EscalationSweepWorker::new(
            engine(tickets.clone(), clock),
            Duration::from_secs(600),
            rx,
        );

        let escalated = worker.run_cycle().await.unwrap();
        assert_eq!(escalated, 1);
        let stored = tickets.find_by_id(ticket.id).await.unwrap().unwrap();
        assert_eq!(stored.tier, SupportTier::L2Expert);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_exits_promptly_on_shutdown() {
        let tickets = Arc::new(MemoryTicketStore::new());
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 0).unwrap(),
        ));
        let (tx, rx) = watch::channel(false);
        let worker =
            EscalationSweepWorker::new(engine(tickets, clock), Duration::from_secs(600), rx);

        let handle = tokio::spawn(async move { worker.run().await });
        tokio::task::yield_now().await;
        tx.send(true).unwrap();

        let joined = tokio::time::timeout(Duration::from_secs(5), handle).await;
        assert!(joined.is_ok(), "worker did not stop on shutdown signal");
    }
}
