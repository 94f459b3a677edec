// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::escalation::EscalationRecord;
use crate::domain::models::incident::{
    Category, Impact, Incident, IncidentStatus, Priority, SupportTier, Urgency,
};
use crate::domain::services::assignment_service::AssignmentOutcome;
use crate::domain::services::escalation_service::EscalationCheck;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// 工单响应数据传输对象
#[derive(Debug, Serialize)]
pub struct IncidentDto {
    pub id: i64,
    pub ticket_number: String,
    pub status: IncidentStatus,
    pub tier: SupportTier,
    pub category: Category,
    pub priority: Priority,
    pub impact: Impact,
    pub urgency: Urgency,
    pub assigned_to: Option<i64>,
    pub reported_at: DateTime<Utc>,
    pub assigned_at: Option<DateTime<Utc>>,
    pub last_escalated_at: Option<DateTime<Utc>>,
    pub due_at: Option<DateTime<Utc>>,
    pub escalation_count: i32,
    pub auto_escalated: bool,
}

impl From<Incident> for IncidentDto {
    fn from(incident: Incident) -> Self {
        Self {
            id: incident.id,
            ticket_number: incident.ticket_number,
            status: incident.status,
            tier: incident.tier,
            category: incident.category,
            priority: incident.priority,
            impact: incident.impact,
            urgency: incident.urgency,
            assigned_to: incident.assigned_to,
            reported_at: incident.reported_at,
            assigned_at: incident.assigned_at,
            last_escalated_at: incident.last_escalated_at,
            due_at: incident.due_at,
            escalation_count: incident.escalation_count,
            auto_escalated: incident.auto_escalated,
        }
    }
}

/// 分派结果数据传输对象
#[derive(Debug, Serialize)]
pub struct AssignmentOutcomeDto {
    /// 是否完成了分派
    pub assigned: bool,
    /// 是否因SPOC值守而要求人工分派
    pub manual_required: bool,
    /// 分派到的技术员ID
    pub technician_id: Option<i64>,
    /// 结果描述
    pub detail: String,
}

impl AssignmentOutcomeDto {
    /// 分派未完成时的结果，保留失败描述
    pub fn unassigned(detail: String) -> Self {
        Self {
            assigned: false,
            manual_required: false,
            technician_id: None,
            detail,
        }
    }
}

impl From<AssignmentOutcome> for AssignmentOutcomeDto {
    fn from(outcome: AssignmentOutcome) -> Self {
        match outcome {
            AssignmentOutcome::Assigned(incident) => Self {
                assigned: true,
                manual_required: false,
                technician_id: incident.assigned_to,
                detail: "Assigned automatically".to_string(),
            },
            AssignmentOutcome::ManualRequired { spoc_id } => Self {
                assigned: false,
                manual_required: true,
                technician_id: None,
                detail: format!("SPOC {} is on duty, manual assignment required", spoc_id),
            },
        }
    }
}

/// 工单创建结果数据传输对象
#[derive(Debug, Serialize)]
pub struct OpenTicketDataDto {
    pub ticket: IncidentDto,
    pub assignment: AssignmentOutcomeDto,
}

/// 自动升级检查结果数据传输对象
#[derive(Debug, Serialize)]
pub struct EscalationCheckDto {
    pub escalated: bool,
    pub elapsed_minutes: i64,
    pub budget_minutes: i64,
}

impl From<EscalationCheck> for EscalationCheckDto {
    fn from(check: EscalationCheck) -> Self {
        Self {
            escalated: check.escalated,
            elapsed_minutes: check.elapsed_minutes,
            budget_minutes: check.budget_minutes,
        }
    }
}

/// 升级历史记录数据传输对象
#[derive(Debug, Serialize)]
pub struct EscalationRecordDto {
    pub id: Uuid,
    pub ticket_id: i64,
    pub from_tier: SupportTier,
    pub to_tier: SupportTier,
    pub from_technician: Option<i64>,
    pub to_technician: Option<i64>,
    pub reason: String,
    pub automatic: bool,
    pub created_at: DateTime<Utc>,
}

impl From<EscalationRecord> for EscalationRecordDto {
    fn from(record: EscalationRecord) -> Self {
        Self {
            id: record.id,
            ticket_id: record.ticket_id,
            from_tier: record.from_tier,
            to_tier: record.to_tier,
            from_technician: record.from_technician,
            to_technician: record.to_technician,
            reason: record.reason,
            automatic: record.automatic,
            created_at: record.created_at,
        }
    }
}
