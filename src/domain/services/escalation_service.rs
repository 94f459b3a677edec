// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::escalation::EscalationRecord;
use crate::domain::models::incident::{Incident, RoutingError, SupportTier};
use crate::domain::models::notification::{Notification, NotificationKind};
use crate::domain::repositories::escalation_ledger::EscalationLedger;
use crate::domain::repositories::technician_directory::TechnicianDirectory;
use crate::domain::repositories::ticket_store::{RepositoryError, TicketStore};
use crate::domain::repositories::unit_of_work::{TicketChange, TicketUnitOfWork};
use crate::domain::services::assignment_service::pick_least_loaded;
use crate::domain::services::notification_service::Notifier;
use crate::utils::clock::Clock;
use metrics::counter;
use std::sync::Arc;
use tracing::{error, info, warn};

/// 各层级的自动升级时间预算（分钟）
#[derive(Debug, Clone)]
pub struct EscalationBudgets {
    pub l1_minutes: i64,
    pub l2_minutes: i64,
    pub l3_minutes: i64,
    pub l4_minutes: i64,
}

impl Default for EscalationBudgets {
    fn default() -> Self {
        Self {
            l1_minutes: 120,
            l2_minutes: 240,
            l3_minutes: 480,
            l4_minutes: 1440,
        }
    }
}

impl EscalationBudgets {
    /// 指定层级的时间预算
    pub fn budget_for(&self, tier: SupportTier) -> i64 {
        match tier {
            SupportTier::L1Technician => self.l1_minutes,
            SupportTier::L2Expert => self.l2_minutes,
            SupportTier::L3Specialist => self.l3_minutes,
            SupportTier::L4Vendor => self.l4_minutes,
        }
    }
}

/// 自动升级检查结果
#[derive(Debug, Clone, Copy)]
pub struct EscalationCheck {
    /// 本次检查是否触发了升级
    pub escalated: bool,
    /// 距计时基准已过去的分钟数
    pub elapsed_minutes: i64,
    /// 当前层级的预算分钟数
    pub budget_minutes: i64,
}

/// 升级引擎
///
/// 支持层级上的状态机，严格单步前进，L4为终点。
/// 每次升级先写审计记录再变更工单，审计轨迹不会因
/// 后续提交失败而丢失。
pub struct EscalationEngine {
    tickets: Arc<dyn TicketStore>,
    directory: Arc<dyn TechnicianDirectory>,
    ledger: Arc<dyn EscalationLedger>,
    uow: Arc<dyn TicketUnitOfWork>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    budgets: EscalationBudgets,
}

impl EscalationEngine {
    /// 创建新的升级引擎实例
    pub fn new(
        tickets: Arc<dyn TicketStore>,
        directory: Arc<dyn TechnicianDirectory>,
        ledger: Arc<dyn EscalationLedger>,
        uow: Arc<dyn TicketUnitOfWork>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        budgets: EscalationBudgets,
    ) -> Self {
        Self {
            tickets,
            directory,
            ledger,
            uow,
            notifier,
            clock,
            budgets,
        }
    }

    /// 升级到下一层级
    ///
    /// 按 L1→L2→L3→L4 的固定顺序计算目标层级。
    ///
    /// # 参数
    ///
    /// * `ticket_id` - 工单ID
    /// * `reason` - 升级原因
    /// * `target_technician_id` - 指定的目标处理人（可选）
    ///
    /// # 返回值
    ///
    /// * `Ok(Incident)` - 升级后的工单
    /// * `Err(RoutingError)` - 已处于最高层级或工单已进入终态
    pub async fn escalate_to_next_tier(
        &self,
        ticket_id: i64,
        reason: &str,
        target_technician_id: Option<i64>,
    ) -> Result<Incident, RoutingError> {
        let ticket = self
            .tickets
            .find_by_id(ticket_id)
            .await?
            .ok_or(RoutingError::TicketNotFound(ticket_id))?;
        if ticket.is_terminal() {
            return Err(RoutingError::TicketClosed(ticket_id));
        }
        let next = ticket
            .tier
            .next()
            .ok_or(RoutingError::MaxTierReached(ticket_id))?;
        self.escalate(ticket_id, next, reason, target_technician_id, false)
            .await
    }

    /// 升级到指定层级
    ///
    /// 目标层级必须严格高于当前层级。指定目标处理人时其必须
    /// 在职且属于目标层级；未指定时自动选取该层级负载最低的
    /// 在职技术员，无人可用则不带处理人继续升级。
    pub async fn escalate_to_tier(
        &self,
        ticket_id: i64,
        to_tier: SupportTier,
        reason: &str,
        target_technician_id: Option<i64>,
    ) -> Result<Incident, RoutingError> {
        self.escalate(ticket_id, to_tier, reason, target_technician_id, false)
            .await
    }

    async fn escalate(
        &self,
        ticket_id: i64,
        to_tier: SupportTier,
        reason: &str,
        target_technician_id: Option<i64>,
        automatic: bool,
    ) -> Result<Incident, RoutingError> {
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
            if to_tier <= ticket.tier {
                return Err(RoutingError::InvalidTransition {
                    ticket_id,
                    from: ticket.tier,
                    to: to_tier,
                });
            }

            // 解析目标处理人
            let destination = match target_technician_id {
                Some(id) => {
                    let technician = self
                        .directory
                        .find_by_id(id)
                        .await?
                        .ok_or(RoutingError::TechnicianNotFound(id))?;
                    if !technician.active || technician.tier != to_tier {
                        return Err(RoutingError::TierMismatch {
                            technician_id: id,
                            tier: to_tier,
                        });
                    }
                    Some(technician)
                }
                None => {
                    let candidates = self.directory.find_candidates(Some(to_tier), None).await?;
                    pick_least_loaded(candidates)
                }
            };

            let now = self.clock.now();

            // 审计记录先于工单变更落库
            let record = EscalationRecord::new(
                ticket.id,
                ticket.tier,
                to_tier,
                ticket.assigned_to,
                destination.as_ref().map(|t| t.id),
                reason.to_string(),
                automatic,
                now,
            );
            self.ledger.append(&record).await?;

            let previous = ticket.assigned_to;
            let mut updated = ticket.clone();
            updated.tier = to_tier;
            updated.escalation_count += 1;
            updated.last_escalated_at = Some(now);
            updated.escalation_reason = Some(reason.to_string());
            updated.auto_escalated = automatic;

            let (release, engage) = if let Some(dest) = &destination {
                updated.assigned_to = Some(dest.id);
                updated.assigned_at = Some(now);
                match previous {
                    Some(p) if p == dest.id => (None, None),
                    Some(p) => (Some(p), Some(dest.id)),
                    None => (None, Some(dest.id)),
                }
            } else {
                warn!(
                    "No technician available at tier {} for ticket {}, escalating without handler",
                    to_tier, ticket_id
                );
                (None, None)
            };
            updated.activate();

            let change = TicketChange {
                ticket: updated,
                release_workload: release,
                engage_workload: engage,
            };
            match self.uow.commit(change).await {
                Ok(committed) => {
                    let mode = if automatic { "automatic" } else { "manual" };
                    counter!("escalations_total", "mode" => mode).increment(1);
                    info!(
                        "Ticket {} escalated {} -> {} ({})",
                        ticket_id, record.from_tier, to_tier, mode
                    );
                    let recipient = committed.assigned_to.unwrap_or(committed.reported_by);
                    self.dispatch(
                        recipient,
                        &committed,
                        format!(
                            "Ticket {} escalated to tier {}: {}",
                            committed.ticket_number, to_tier, reason
                        ),
                    )
                    .await;
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

    /// 自动升级的时间预算检查
    ///
    /// 计时基准取最近一次升级、分派、报告三个时间中最晚者。
    /// 超过当前层级预算时升级一个层级并标记为自动，
    /// 无论是否升级都返回经过时间与预算数字。
    ///
    /// # 参数
    ///
    /// * `ticket_id` - 工单ID
    ///
    /// # 返回值
    ///
    /// * `Ok(EscalationCheck)` - 检查结果
    /// * `Err(RoutingError)` - 工单不存在或已进入终态
    pub async fn check_automatic_escalation(
        &self,
        ticket_id: i64,
    ) -> Result<EscalationCheck, RoutingError> {
        let ticket = self
            .tickets
            .find_by_id(ticket_id)
            .await?
            .ok_or(RoutingError::TicketNotFound(ticket_id))?;
        if ticket.is_terminal() {
            return Err(RoutingError::TicketClosed(ticket_id));
        }

        let now = self.clock.now();
        let elapsed = (now - ticket.escalation_reference()).num_minutes();
        let budget = self.budgets.budget_for(ticket.tier);

        if elapsed < budget {
            return Ok(EscalationCheck {
                escalated: false,
                elapsed_minutes: elapsed,
                budget_minutes: budget,
            });
        }

        // L4没有更高层级可去
        let Some(next) = ticket.tier.next() else {
            return Ok(EscalationCheck {
                escalated: false,
                elapsed_minutes: elapsed,
                budget_minutes: budget,
            });
        };

        let reason = format!(
            "Automatic escalation: {} minutes elapsed at tier {} exceeds the {} minute budget",
            elapsed, ticket.tier, budget
        );
        self.escalate(ticket_id, next, &reason, None, true).await?;

        Ok(EscalationCheck {
            escalated: true,
            elapsed_minutes: elapsed,
            budget_minutes: budget,
        })
    }

    /// 自动升级巡检
    ///
    /// 遍历所有未达最高层级的活动工单逐个检查，
    /// 单个工单的失败只记录日志不中断巡检。
    /// 预算内的工单保持不变，同一轮巡检重复执行是幂等的。
    ///
    /// # 返回值
    ///
    /// * `Ok(u64)` - 实际升级的工单数量
    pub async fn run_automatic_escalation_sweep(&self) -> Result<u64, RoutingError> {
        let active = self.tickets.find_active().await?;
        let mut escalated = 0u64;
        for ticket in active {
            if ticket.tier.next().is_none() {
                continue;
            }
            match self.check_automatic_escalation(ticket.id).await {
                Ok(check) if check.escalated => escalated += 1,
                Ok(_) => {}
                Err(e) => {
                    error!("Escalation check failed for ticket {}: {}", ticket.id, e);
                }
            }
        }
        if escalated > 0 {
            info!("Escalation sweep moved {} tickets up a tier", escalated);
        }
        Ok(escalated)
    }

    async fn dispatch(&self, user_id: i64, ticket: &Incident, message: String) {
        let notification = Notification::new(
            user_id,
            ticket.id,
            NotificationKind::Escalated,
            message,
            self.clock.now(),
        );
        if let Err(e) = self.notifier.notify(notification).await {
            warn!(
                "Failed to queue escalation notification for ticket {}: {}",
                ticket.id, e
            );
        }
    }
}

#[cfg(test)]
#[path = "escalation_service_test.rs"]
mod tests;
