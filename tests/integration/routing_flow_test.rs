// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::helpers::{critical_rule, harness, technician};
use chrono::Duration;
use dispatchrs::application::dto::create_ticket_request::CreateTicketRequestDto;
use dispatchrs::domain::models::incident::{
    Category, Impact, IncidentStatus, Priority, SupportTier, Urgency,
};
use dispatchrs::domain::models::sla::ViolationKind;
use dispatchrs::domain::models::technician::Specialty;
use dispatchrs::domain::repositories::escalation_ledger::EscalationLedger;
use dispatchrs::domain::repositories::sla_store::SlaViolationStore;
use dispatchrs::domain::repositories::technician_directory::TechnicianDirectory;
use dispatchrs::domain::repositories::ticket_store::TicketStore;

/// A ticket's full journey: intake with immediate placement, timeout-driven
/// escalation through the tiers, SLA violation detection along the way.
#[tokio::test]
async fn test_full_ticket_lifecycle() {
    let h = harness();
    h.rules.load(vec![critical_rule()]);
    h.directory
        .upsert(&technician(1, SupportTier::L1Technician, Specialty::Network, 0, 4))
        .await
        .unwrap();
    h.directory
        .upsert(&technician(2, SupportTier::L2Expert, Specialty::Network, 0, 8))
        .await
        .unwrap();

    // Intake places the ticket with the only matching L1 technician
    let response = h
        .use_case
        .open_ticket(CreateTicketRequestDto {
            reported_by: 500,
            category: Category::Network,
            priority: Priority::Critical,
            impact: Impact::High,
            urgency: Urgency::High,
        })
        .await;
    assert!(response.success);
    let data = response.data.unwrap();
    assert!(data.assignment.assigned);
    assert_eq!(data.ticket.assigned_to, Some(1));
    assert_eq!(data.ticket.status, IncidentStatus::InProgress);
    let ticket_id = data.ticket.id;

    let l1 = h.directory.find_by_id(1).await.unwrap().unwrap();
    assert_eq!(l1.workload, 1);

    // First SLA scan persists the due date
    let outcome = h.monitor.scan_active_tickets().await.unwrap();
    assert_eq!(outcome.due_dates_set, 1);
    let stored = h.tickets.find_by_id(ticket_id).await.unwrap().unwrap();
    assert!(stored.due_at.is_some());

    // Two hours in, the sweep forces the ticket up to L2
    h.clock.advance(Duration::minutes(121));
    let escalated = h.escalation.run_automatic_escalation_sweep().await.unwrap();
    assert_eq!(escalated, 1);

    let stored = h.tickets.find_by_id(ticket_id).await.unwrap().unwrap();
    assert_eq!(stored.tier, SupportTier::L2Expert);
    assert!(stored.auto_escalated);
    assert_eq!(stored.assigned_to, Some(2));

    // Workload moved with the ticket
    let l1 = h.directory.find_by_id(1).await.unwrap().unwrap();
    let l2 = h.directory.find_by_id(2).await.unwrap().unwrap();
    assert_eq!(l1.workload, 0);
    assert_eq!(l2.workload, 1);

    let records = h.ledger.find_by_ticket(ticket_id).await.unwrap();
    assert_eq!(records.len(), 1);
    assert!(records[0].automatic);
    assert!(records[0].from_tier < records[0].to_tier);

    // Past the resolution budget the scan records a violation
    h.clock.advance(Duration::minutes(241));
    let outcome = h.monitor.scan_active_tickets().await.unwrap();
    assert_eq!(outcome.violations, 1);
    let violation = h
        .violations
        .latest_for_ticket(ticket_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(violation.kind, ViolationKind::Resolution);
}

/// Support tier never decreases and never passes L4, whatever the sweep does.
#[tokio::test]
async fn test_tier_is_monotonic_up_to_the_vendor_tier() {
    let h = harness();
    let response = h
        .use_case
        .open_ticket(CreateTicketRequestDto {
            reported_by: 500,
            category: Category::Software,
            priority: Priority::Medium,
            impact: Impact::Medium,
            urgency: Urgency::Medium,
        })
        .await;
    let ticket_id = response.data.unwrap().ticket.id;

    let mut last_tier = SupportTier::L1Technician;
    // Budgets: 120 + 240 + 480 minutes walks the ticket to L4; further
    // sweeps leave it there.
    for _ in 0..6 {
        h.clock.advance(Duration::minutes(2000));
        h.escalation.run_automatic_escalation_sweep().await.unwrap();
        let stored = h.tickets.find_by_id(ticket_id).await.unwrap().unwrap();
        assert!(stored.tier >= last_tier);
        last_tier = stored.tier;
    }
    assert_eq!(last_tier, SupportTier::L4Vendor);

    let stored = h.tickets.find_by_id(ticket_id).await.unwrap().unwrap();
    assert_eq!(stored.escalation_count, 3);
}

/// Workload bookkeeping stays exact across assign, reassign and escalate.
#[tokio::test]
async fn test_workload_matches_assigned_active_tickets() {
    let h = harness();
    for id in 1..=3 {
        h.directory
            .upsert(&technician(
                id,
                SupportTier::L1Technician,
                Specialty::Software,
                0,
                id as u8,
            ))
            .await
            .unwrap();
    }
    h.directory
        .upsert(&technician(4, SupportTier::L2Expert, Specialty::Software, 0, 9))
        .await
        .unwrap();
    h.directory
        .upsert(&crate::helpers::supervisor(10))
        .await
        .unwrap();

    let mut ticket_ids = Vec::new();
    for _ in 0..5 {
        let response = h
            .use_case
            .open_ticket(CreateTicketRequestDto {
                reported_by: 500,
                category: Category::Software,
                priority: Priority::Medium,
                impact: Impact::Medium,
                urgency: Urgency::Medium,
            })
            .await;
        ticket_ids.push(response.data.unwrap().ticket.id);
    }

    // Shuffle assignments around and push one ticket up a tier
    h.assignment.assign_manually(ticket_ids[0], 3, 10).await.unwrap();
    h.assignment.assign_manually(ticket_ids[1], 3, 10).await.unwrap();
    h.escalation
        .escalate_to_next_tier(ticket_ids[2], "needs an expert", None)
        .await
        .unwrap();

    // Count tickets per handler and compare with the stored workload
    let active = h.tickets.find_active().await.unwrap();
    for id in [1i64, 2, 3, 4] {
        let expected = active
            .iter()
            .filter(|t| t.assigned_to == Some(id))
            .count() as u32;
        let stored = h.directory.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(
            stored.workload, expected,
            "technician {} workload drifted",
            id
        );
    }
}
