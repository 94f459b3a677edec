// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::assign_request::ManualAssignRequestDto;
use crate::application::dto::create_ticket_request::CreateTicketRequestDto;
use crate::application::dto::envelope::ServiceResponse;
use crate::application::dto::escalate_request::EscalateRequestDto;
use crate::application::dto::ticket_response::{
    AssignmentOutcomeDto, EscalationCheckDto, EscalationRecordDto, IncidentDto, OpenTicketDataDto,
};
use crate::domain::models::incident::{Incident, RoutingError};
use crate::domain::repositories::escalation_ledger::EscalationLedger;
use crate::domain::repositories::technician_directory::TechnicianDirectory;
use crate::domain::repositories::ticket_store::TicketStore;
use crate::domain::services::assignment_service::AssignmentEngine;
use crate::domain::services::escalation_service::EscalationEngine;
use crate::utils::clock::Clock;
use std::sync::Arc;
use tracing::info;

/// 工单用例
///
/// 引擎的公开操作面。每个操作把领域层结果包进统一的
/// 结果信封，HTTP层、CLI与调度器以一致的方式消费。
pub struct TicketUseCase {
    tickets: Arc<dyn TicketStore>,
    directory: Arc<dyn TechnicianDirectory>,
    ledger: Arc<dyn EscalationLedger>,
    assignment: Arc<AssignmentEngine>,
    escalation: Arc<EscalationEngine>,
    clock: Arc<dyn Clock>,
}

impl TicketUseCase {
    /// 创建新的工单用例实例
    pub fn new(
        tickets: Arc<dyn TicketStore>,
        directory: Arc<dyn TechnicianDirectory>,
        ledger: Arc<dyn EscalationLedger>,
        assignment: Arc<AssignmentEngine>,
        escalation: Arc<EscalationEngine>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            tickets,
            directory,
            ledger,
            assignment,
            escalation,
            clock,
        }
    }

    /// 创建工单并立即尝试自动分派
    ///
    /// 分派失败不影响工单创建，失败描述随结果一并返回
    pub async fn open_ticket(
        &self,
        request: CreateTicketRequestDto,
    ) -> ServiceResponse<OpenTicketDataDto> {
        let incident = Incident::new(
            0,
            String::new(),
            request.reported_by,
            request.category,
            request.priority,
            request.impact,
            request.urgency,
            self.clock.now(),
        );
        let ticket = match self.tickets.insert(&incident).await {
            Ok(ticket) => ticket,
            Err(e) => return ServiceResponse::fail(format!("Failed to create ticket: {}", e)),
        };
        info!("Ticket {} opened by user {}", ticket.ticket_number, request.reported_by);

        let assignment = match self.assignment.assign_automatically(ticket.id).await {
            Ok(outcome) => AssignmentOutcomeDto::from(outcome),
            Err(e) => AssignmentOutcomeDto::unassigned(e.to_string()),
        };

        // 分派可能更新了工单，返回最新状态
        let ticket = match self.tickets.find_by_id(ticket.id).await {
            Ok(Some(latest)) => latest,
            _ => ticket,
        };

        ServiceResponse::ok(
            OpenTicketDataDto {
                ticket: ticket.into(),
                assignment,
            },
            "Ticket created",
        )
    }

    /// 自动分派
    pub async fn assign_automatically(
        &self,
        ticket_id: i64,
    ) -> ServiceResponse<AssignmentOutcomeDto> {
        match self.assignment.assign_automatically(ticket_id).await {
            Ok(outcome) => {
                let dto = AssignmentOutcomeDto::from(outcome);
                let message = dto.detail.clone();
                ServiceResponse::ok(dto, message)
            }
            Err(e) => ServiceResponse::fail(e.to_string()),
        }
    }

    /// 人工分派
    pub async fn assign_manually(
        &self,
        ticket_id: i64,
        request: ManualAssignRequestDto,
    ) -> ServiceResponse<IncidentDto> {
        match self
            .assignment
            .assign_manually(ticket_id, request.technician_id, request.requested_by)
            .await
        {
            Ok(ticket) => ServiceResponse::ok(ticket.into(), "Ticket assigned"),
            Err(e) => ServiceResponse::fail(e.to_string()),
        }
    }

    /// 人工升级
    ///
    /// 请求人必须具备调度角色；未指定目标层级时升级到下一层级
    pub async fn escalate(
        &self,
        ticket_id: i64,
        request: EscalateRequestDto,
    ) -> ServiceResponse<IncidentDto> {
        match self.directory.find_by_id(request.requested_by).await {
            Ok(Some(requester)) if requester.role.can_dispatch() || requester.is_spoc => {}
            Ok(Some(_)) => {
                return ServiceResponse::fail(
                    RoutingError::Forbidden(request.requested_by).to_string(),
                );
            }
            Ok(None) => {
                return ServiceResponse::fail(
                    RoutingError::TechnicianNotFound(request.requested_by).to_string(),
                );
            }
            Err(e) => return ServiceResponse::fail(e.to_string()),
        }

        let result = match request.to_tier {
            Some(to_tier) => {
                self.escalation
                    .escalate_to_tier(ticket_id, to_tier, &request.reason, request.technician_id)
                    .await
            }
            None => {
                self.escalation
                    .escalate_to_next_tier(ticket_id, &request.reason, request.technician_id)
                    .await
            }
        };
        match result {
            Ok(ticket) => ServiceResponse::ok(ticket.into(), "Ticket escalated"),
            Err(e) => ServiceResponse::fail(e.to_string()),
        }
    }

    /// 自动升级检查
    pub async fn check_escalation(&self, ticket_id: i64) -> ServiceResponse<EscalationCheckDto> {
        match self.escalation.check_automatic_escalation(ticket_id).await {
            Ok(check) => {
                let message = if check.escalated {
                    "Ticket escalated automatically"
                } else {
                    "Ticket within its tier time budget"
                };
                ServiceResponse::ok(check.into(), message)
            }
            Err(e) => ServiceResponse::fail(e.to_string()),
        }
    }

    /// 查询工单
    pub async fn get_ticket(&self, ticket_id: i64) -> ServiceResponse<IncidentDto> {
        match self.tickets.find_by_id(ticket_id).await {
            Ok(Some(ticket)) => ServiceResponse::ok(ticket.into(), "Ticket found"),
            Ok(None) => {
                ServiceResponse::fail(RoutingError::TicketNotFound(ticket_id).to_string())
            }
            Err(e) => ServiceResponse::fail(e.to_string()),
        }
    }

    /// 查询升级历史
    pub async fn escalation_history(
        &self,
        ticket_id: i64,
    ) -> ServiceResponse<Vec<EscalationRecordDto>> {
        match self.ledger.find_by_ticket(ticket_id).await {
            Ok(records) => {
                let history: Vec<EscalationRecordDto> =
                    records.into_iter().map(EscalationRecordDto::from).collect();
                ServiceResponse::ok(history, "Escalation history")
            }
            Err(e) => ServiceResponse::fail(e.to_string()),
        }
    }
}
