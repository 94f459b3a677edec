// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use dispatchrs::application::use_cases::ticket_use_case::TicketUseCase;
use dispatchrs::domain::models::incident::SupportTier;
use dispatchrs::domain::models::notification::Notification;
use dispatchrs::domain::models::sla::SlaRule;
use dispatchrs::domain::models::technician::{Specialty, StaffRole, Technician};
use dispatchrs::domain::services::assignment_service::AssignmentEngine;
use dispatchrs::domain::services::escalation_service::{EscalationBudgets, EscalationEngine};
use dispatchrs::domain::services::notification_service::Notifier;
use dispatchrs::domain::services::sla_service::{SlaMonitor, SlaMonitorConfig};
use dispatchrs::infrastructure::repositories::memory_directory::MemoryDirectory;
use dispatchrs::infrastructure::repositories::memory_escalation_ledger::MemoryEscalationLedger;
use dispatchrs::infrastructure::repositories::memory_sla_store::{
    MemorySlaRuleStore, MemorySlaViolationStore,
};
use dispatchrs::infrastructure::repositories::memory_ticket_store::MemoryTicketStore;
use dispatchrs::infrastructure::repositories::memory_unit_of_work::MemoryTicketUnitOfWork;
use dispatchrs::utils::clock::ManualClock;
use std::sync::Arc;

pub struct SilentNotifier;

#[async_trait]
impl Notifier for SilentNotifier {
    async fn notify(&self, _notification: Notification) -> Result<()> {
        Ok(())
    }
}

/// Everything a scenario needs, wired over shared in-memory stores.
pub struct TestHarness {
    pub tickets: Arc<MemoryTicketStore>,
    pub directory: Arc<MemoryDirectory>,
    pub ledger: Arc<MemoryEscalationLedger>,
    pub rules: Arc<MemorySlaRuleStore>,
    pub violations: Arc<MemorySlaViolationStore>,
    pub clock: Arc<ManualClock>,
    pub assignment: Arc<AssignmentEngine>,
    pub escalation: Arc<EscalationEngine>,
    pub monitor: Arc<SlaMonitor>,
    pub use_case: Arc<TicketUseCase>,
}

pub fn harness() -> TestHarness {
    let tickets = Arc::new(MemoryTicketStore::new());
    let directory = Arc::new(MemoryDirectory::new());
    let ledger = Arc::new(MemoryEscalationLedger::new());
    let rules = Arc::new(MemorySlaRuleStore::new());
    let violations = Arc::new(MemorySlaViolationStore::new());
    let uow = Arc::new(MemoryTicketUnitOfWork::new(
        tickets.clone(),
        directory.clone(),
    ));
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 0).unwrap(),
    ));
    let notifier = Arc::new(SilentNotifier);

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
        EscalationBudgets::default(),
    ));
    let monitor = Arc::new(SlaMonitor::new(
        tickets.clone(),
        rules.clone(),
        violations.clone(),
        uow.clone(),
        notifier.clone(),
        clock.clone(),
        SlaMonitorConfig::default(),
    ));
    let use_case = Arc::new(TicketUseCase::new(
        tickets.clone(),
        directory.clone(),
        ledger.clone(),
        assignment.clone(),
        escalation.clone(),
        clock.clone(),
    ));

    TestHarness {
        tickets,
        directory,
        ledger,
        rules,
        violations,
        clock,
        assignment,
        escalation,
        monitor,
        use_case,
    }
}

pub fn technician(
    id: i64,
    tier: SupportTier,
    specialty: Specialty,
    workload: u32,
    experience: u8,
) -> Technician {
    Technician {
        id,
        name: format!("tech-{}", id),
        role: StaffRole::Technician,
        tier,
        specialty,
        active: true,
        workload,
        experience_years: experience,
        is_spoc: false,
        spoc_available: false,
    }
}

pub fn supervisor(id: i64) -> Technician {
    Technician {
        id,
        name: format!("supervisor-{}", id),
        role: StaffRole::Supervisor,
        tier: SupportTier::L2Expert,
        specialty: Specialty::General,
        active: true,
        workload: 0,
        experience_years: 12,
        is_spoc: false,
        spoc_available: false,
    }
}

pub fn critical_rule() -> SlaRule {
    SlaRule {
        priority: dispatchrs::domain::models::incident::Priority::Critical,
        impact: dispatchrs::domain::models::incident::Impact::High,
        urgency: dispatchrs::domain::models::incident::Urgency::High,
        response_minutes: 15,
        resolution_minutes: 240,
    }
}
