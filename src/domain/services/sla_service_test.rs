#[cfg(test)]
mod tests {
    use crate::domain::models::incident::{
        Category, Impact, Incident, Priority, Urgency,
    };
    use crate::domain::models::notification::{Notification, NotificationKind};
    use crate::domain::models::sla::{SlaRule, ViolationKind};
    use crate::domain::repositories::sla_store::SlaViolationStore;
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
    use anyhow::Result;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone, Utc};
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<Notification>>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(&self, notification: Notification) -> Result<()> {
            self.sent.lock().push(notification);
            Ok(())
        }
    }

    struct Fixture {
        tickets: Arc<MemoryTicketStore>,
        rules: Arc<MemorySlaRuleStore>,
        violations: Arc<MemorySlaViolationStore>,
        notifier: Arc<RecordingNotifier>,
        clock: Arc<ManualClock>,
        monitor: SlaMonitor,
    }

    fn fixture() -> Fixture {
        let tickets = Arc::new(MemoryTicketStore::new());
        let directory = Arc::new(MemoryDirectory::new());
        let rules = Arc::new(MemorySlaRuleStore::new());
        let violations = Arc::new(MemorySlaViolationStore::new());
        let uow = Arc::new(MemoryTicketUnitOfWork::new(
            tickets.clone(),
            directory.clone(),
        ));
        let notifier = Arc::new(RecordingNotifier::default());
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 0).unwrap(),
        ));
        let monitor = SlaMonitor::new(
            tickets.clone(),
            rules.clone(),
            violations.clone(),
            uow,
            notifier.clone(),
            clock.clone(),
            SlaMonitorConfig::default(),
        );
        Fixture {
            tickets,
            rules,
            violations,
            notifier,
            clock,
            monitor,
        }
    }

    fn critical_rule() -> SlaRule {
        SlaRule {
            priority: Priority::Critical,
            impact: Impact::High,
            urgency: Urgency::High,
            response_minutes: 15,
            resolution_minutes: 240,
        }
    }

    async fn open_critical_ticket(fx: &Fixture) -> Incident {
        fx.tickets
            .insert(&Incident::new(
                0,
                String::new(),
                500,
                Category::Network,
                Priority::Critical,
                Impact::High,
                Urgency::High,
                fx.clock.now(),
            ))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_unassigned_ticket_past_response_budget_gets_a_violation() {
        let fx = fixture();
        fx.rules.load(vec![critical_rule()]);
        let ticket = open_critical_ticket(&fx).await;
        fx.clock.advance(Duration::minutes(20));

        let outcome = fx.monitor.scan_active_tickets().await.unwrap();

        assert_eq!(outcome.scanned, 1);
        assert_eq!(outcome.violations, 1);
        let latest = fx
            .violations
            .latest_for_ticket(ticket.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest.kind, ViolationKind::Response);
        assert_eq!(latest.exceeded_by_minutes, 5);
    }

    #[tokio::test]
    async fn test_violations_are_deduplicated_within_the_window() {
        let fx = fixture();
        fx.rules.load(vec![critical_rule()]);
        open_critical_ticket(&fx).await;
        fx.clock.advance(Duration::minutes(20));

        fx.monitor.scan_active_tickets().await.unwrap();
        fx.clock.advance(Duration::minutes(5));
        fx.monitor.scan_active_tickets().await.unwrap();

        // Two scans inside the 60 minute window, exactly one record
        assert_eq!(fx.violations.len(), 1);

        fx.clock.advance(Duration::minutes(60));
        fx.monitor.scan_active_tickets().await.unwrap();
        assert_eq!(fx.violations.len(), 2);
    }

    #[tokio::test]
    async fn test_tickets_without_a_matching_rule_are_skipped() {
        let fx = fixture();
        let ticket = open_critical_ticket(&fx).await;
        fx.clock.advance(Duration::minutes(500));

        let outcome = fx.monitor.scan_active_tickets().await.unwrap();

        assert_eq!(outcome.scanned, 1);
        assert_eq!(outcome.violations, 0);
        assert!(fx
            .violations
            .latest_for_ticket(ticket.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_assigned_ticket_past_resolution_budget_gets_a_violation() {
        let fx = fixture();
        fx.rules.load(vec![critical_rule()]);
        let mut ticket = Incident::new(
            0,
            String::new(),
            500,
            Category::Network,
            Priority::Critical,
            Impact::High,
            Urgency::High,
            fx.clock.now(),
        );
        ticket.assigned_to = Some(3);
        ticket.assigned_at = Some(fx.clock.now());
        ticket.due_at = Some(fx.clock.now() + Duration::minutes(240));
        let ticket = fx.tickets.insert(&ticket).await.unwrap();
        fx.clock.advance(Duration::minutes(250));

        let outcome = fx.monitor.scan_active_tickets().await.unwrap();

        assert_eq!(outcome.violations, 1);
        let latest = fx
            .violations
            .latest_for_ticket(ticket.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest.kind, ViolationKind::Resolution);
        assert_eq!(latest.exceeded_by_minutes, 10);
        // The handler is the breach recipient
        let sent = fx.notifier.sent.lock();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].user_id, 3);
        assert_eq!(sent[0].kind, NotificationKind::SlaBreached);
    }

    #[tokio::test]
    async fn test_due_date_is_computed_once_for_assigned_tickets() {
        let fx = fixture();
        fx.rules.load(vec![critical_rule()]);
        let mut ticket = Incident::new(
            0,
            String::new(),
            500,
            Category::Network,
            Priority::Critical,
            Impact::High,
            Urgency::High,
            fx.clock.now(),
        );
        ticket.assigned_to = Some(3);
        ticket.assigned_at = Some(fx.clock.now());
        let ticket = fx.tickets.insert(&ticket).await.unwrap();
        let assigned_at = ticket.assigned_at.unwrap();

        let outcome = fx.monitor.scan_active_tickets().await.unwrap();
        assert_eq!(outcome.due_dates_set, 1);

        let stored = fx.tickets.find_by_id(ticket.id).await.unwrap().unwrap();
        assert_eq!(stored.due_at, Some(assigned_at + Duration::minutes(240)));

        let outcome = fx.monitor.scan_active_tickets().await.unwrap();
        assert_eq!(outcome.due_dates_set, 0);
    }

    #[tokio::test]
    async fn test_near_due_notice_is_sent_once() {
        let fx = fixture();
        fx.rules.load(vec![critical_rule()]);
        let mut ticket = Incident::new(
            0,
            String::new(),
            500,
            Category::Network,
            Priority::Critical,
            Impact::High,
            Urgency::High,
            fx.clock.now(),
        );
        ticket.assigned_to = Some(3);
        ticket.assigned_at = Some(fx.clock.now());
        ticket.due_at = Some(fx.clock.now() + Duration::minutes(240));
        fx.tickets.insert(&ticket).await.unwrap();

        // 220 minutes in, 20 minutes before the due time
        fx.clock.advance(Duration::minutes(220));
        let outcome = fx.monitor.scan_active_tickets().await.unwrap();
        assert_eq!(outcome.near_due_notices, 1);

        fx.clock.advance(Duration::minutes(5));
        let outcome = fx.monitor.scan_active_tickets().await.unwrap();
        assert_eq!(outcome.near_due_notices, 0);

        let sent = fx.notifier.sent.lock();
        let notices: Vec<_> = sent
            .iter()
            .filter(|n| n.kind == NotificationKind::SlaNearDue)
            .collect();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].user_id, 3);
    }

    #[tokio::test]
    async fn test_terminal_tickets_are_not_scanned() {
        let fx = fixture();
        fx.rules.load(vec![critical_rule()]);
        let mut ticket = Incident::new(
            0,
            String::new(),
            500,
            Category::Network,
            Priority::Critical,
            Impact::High,
            Urgency::High,
            fx.clock.now(),
        );
        ticket.status = crate::domain::models::incident::IncidentStatus::Closed;
        ticket.closed_at = Some(fx.clock.now());
        fx.tickets.insert(&ticket).await.unwrap();
        fx.clock.advance(Duration::minutes(1000));

        let outcome = fx.monitor.scan_active_tickets().await.unwrap();
        assert_eq!(outcome.scanned, 0);
        assert!(fx.violations.is_empty());
    }
}
