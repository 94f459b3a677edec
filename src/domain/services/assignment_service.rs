// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::incident::{Incident, RoutingError};
use crate::domain::models::notification::{Notification, NotificationKind};
use crate::domain::models::technician::Technician;
use crate::domain::repositories::technician_directory::TechnicianDirectory;
use crate::domain::repositories::ticket_store::{RepositoryError, TicketStore};
use crate::domain::repositories::unit_of_work::{TicketChange, TicketUnitOfWork};
use crate::domain::services::notification_service::Notifier;
use crate::utils::clock::Clock;
use metrics::counter;
use std::sync::Arc;
use tracing::{info, warn};

/// 自动分派结果
#[derive(Debug, Clone)]
pub enum AssignmentOutcome {
    /// 已成功分派给处理人
    Assigned(Incident),
    /// 有SPOC值守，需要人工分派
    ManualRequired {
        /// 当前值守的SPOC
        spoc_id: i64,
    },
}

/// 按最低负载挑选候选人，负载相同时年资高者优先
pub(crate) fn pick_least_loaded(mut candidates: Vec<Technician>) -> Option<Technician> {
    candidates.sort_by(|a, b| {
        a.workload
            .cmp(&b.workload)
            .then_with(|| b.experience_years.cmp(&a.experience_years))
    });
    candidates.into_iter().next()
}

/// 分派引擎
///
/// 为未分派的工单确定唯一处理人，或明确拒绝分派。
/// 有SPOC值守时自动分派被拒绝，路由决策必须经过人工。
pub struct AssignmentEngine {
    tickets: Arc<dyn TicketStore>,
    directory: Arc<dyn TechnicianDirectory>,
    uow: Arc<dyn TicketUnitOfWork>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
}

impl AssignmentEngine {
    /// 创建新的分派引擎实例
    pub fn new(
        tickets: Arc<dyn TicketStore>,
        directory: Arc<dyn TechnicianDirectory>,
        uow: Arc<dyn TicketUnitOfWork>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            tickets,
            directory,
            uow,
            notifier,
            clock,
        }
    }

    /// 自动分派工单
    ///
    /// 有SPOC值守时拒绝并返回人工分派要求；否则在工单当前层级内
    /// 专长匹配的在职技术员中选取负载最低者（年资高者优先破平），
    /// 设置处理人与分派时间、工单转入处理中、处理人工作量加一，
    /// 工单与技术员在一次提交中原子落库。
    ///
    /// # 参数
    ///
    /// * `ticket_id` - 工单ID
    ///
    /// # 返回值
    ///
    /// * `Ok(AssignmentOutcome)` - 分派结果
    /// * `Err(RoutingError)` - 工单不存在、已有处理人或无可用技术员
    pub async fn assign_automatically(
        &self,
        ticket_id: i64,
    ) -> Result<AssignmentOutcome, RoutingError> {
        let mut retried = false;
        loop {
            let ticket = self
                .tickets
                .find_by_id(ticket_id)
                .await?
                .ok_or(RoutingError::TicketNotFound(ticket_id))?;
            if ticket.is_terminal() {
                return Err(RoutingError::TicketClosed(ticket_id));
            }
            if ticket.assigned_to.is_some() {
                return Err(RoutingError::AlreadyAssigned(ticket_id));
            }

            // SPOC值守时路由决策必须经过人工
            if let Some(spoc) = self.directory.find_spoc_on_duty().await? {
                info!(
                    "SPOC {} on duty, ticket {} requires manual assignment",
                    spoc.id, ticket_id
                );
                return Ok(AssignmentOutcome::ManualRequired { spoc_id: spoc.id });
            }

            let specialty = ticket.category.required_specialty();
            let candidates = self
                .directory
                .find_candidates(Some(ticket.tier), Some(specialty))
                .await?;
            let chosen = pick_least_loaded(candidates)
                .ok_or(RoutingError::NoTechnicianAvailable(ticket_id))?;

            let now = self.clock.now();
            let mut updated = ticket.clone();
            updated.assigned_to = Some(chosen.id);
            updated.assigned_at = Some(now);
            updated.activate();

            let change = TicketChange {
                ticket: updated,
                release_workload: None,
                engage_workload: Some(chosen.id),
            };
            match self.uow.commit(change).await {
                Ok(committed) => {
                    counter!("assignments_total", "mode" => "automatic").increment(1);
                    info!(
                        "Ticket {} assigned to technician {} ({})",
                        ticket_id, chosen.id, chosen.name
                    );
                    self.dispatch(
                        chosen.id,
                        &committed,
                        NotificationKind::Assigned,
                        format!("Ticket {} has been assigned to you", committed.ticket_number),
                    )
                    .await;
                    return Ok(AssignmentOutcome::Assigned(committed));
                }
                Err(RepositoryError::Conflict) if !retried => {
                    retried = true;
                    continue;
                }
                Err(RepositoryError::Conflict) => {
                    return Err(RoutingError::ConflictRetryExhausted(ticket_id));
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// 人工分派工单
    ///
    /// 请求人必须是SPOC、主管或管理员；目标技术员必须在职。
    /// 工单已有处理人时先释放其工作量再增加新处理人的工作量，
    /// 改派移动负载而不是复制负载。
    ///
    /// # 参数
    ///
    /// * `ticket_id` - 工单ID
    /// * `technician_id` - 目标技术员ID
    /// * `requested_by` - 请求人ID
    ///
    /// # 返回值
    ///
    /// * `Ok(Incident)` - 分派后的工单
    /// * `Err(RoutingError)` - 权限不足、目标不可用或提交冲突
    pub async fn assign_manually(
        &self,
        ticket_id: i64,
        technician_id: i64,
        requested_by: i64,
    ) -> Result<Incident, RoutingError> {
        let requester = self
            .directory
            .find_by_id(requested_by)
            .await?
            .ok_or(RoutingError::TechnicianNotFound(requested_by))?;
        if !(requester.role.can_dispatch() || requester.is_spoc) {
            return Err(RoutingError::Forbidden(requested_by));
        }

        let target = self
            .directory
            .find_by_id(technician_id)
            .await?
            .ok_or(RoutingError::TechnicianNotFound(technician_id))?;
        if !target.active {
            return Err(RoutingError::NoTechnicianAvailable(ticket_id));
        }

        let mut retried = false;
        loop {
            let ticket = self
                .tickets
                .find_by_id(ticket_id)
                .await?
                .ok_or(RoutingError::TicketNotFound(ticket_id))?;
            if ticket.is_terminal() {
                return Err(RoutingError::TicketClosed(ticket_id));
            }

            let previous = ticket.assigned_to;
            let now = self.clock.now();
            let mut updated = ticket.clone();
            updated.assigned_to = Some(technician_id);
            updated.assigned_at = Some(now);
            updated.activate();

            // 同一处理人重复分派时不触碰工作量
            let (release, engage) = match previous {
                Some(p) if p == technician_id => (None, None),
                Some(p) => (Some(p), Some(technician_id)),
                None => (None, Some(technician_id)),
            };

            let change = TicketChange {
                ticket: updated,
                release_workload: release,
                engage_workload: engage,
            };
            match self.uow.commit(change).await {
                Ok(committed) => {
                    counter!("assignments_total", "mode" => "manual").increment(1);
                    info!(
                        "Ticket {} manually assigned to technician {} by {}",
                        ticket_id, technician_id, requested_by
                    );
                    if previous != Some(technician_id) {
                        let kind = if previous.is_some() {
                            NotificationKind::Reassigned
                        } else {
                            NotificationKind::Assigned
                        };
                        self.dispatch(
                            technician_id,
                            &committed,
                            kind,
                            format!("Ticket {} has been assigned to you", committed.ticket_number),
                        )
                        .await;
                    }
                    return Ok(committed);
                }
                Err(RepositoryError::Conflict) if !retried => {
                    retried = true;
                    continue;
                }
                Err(RepositoryError::Conflict) => {
                    return Err(RoutingError::ConflictRetryExhausted(ticket_id));
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    async fn dispatch(
        &self,
        user_id: i64,
        ticket: &Incident,
        kind: NotificationKind,
        message: String,
    ) {
        let notification = Notification::new(user_id, ticket.id, kind, message, self.clock.now());
        if let Err(e) = self.notifier.notify(notification).await {
            warn!(
                "Failed to queue {} notification for ticket {}: {}",
                kind, ticket.id, e
            );
        }
    }
}

#[cfg(test)]
#[path = "assignment_service_test.rs"]
mod tests;
