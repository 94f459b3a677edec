// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::incident::{Incident, RoutingError};
use crate::domain::models::notification::{Notification, NotificationKind};
use crate::domain::models::sla::{SlaViolation, ViolationKind};
use crate::domain::repositories::sla_store::{SlaRuleStore, SlaViolationStore};
use crate::domain::repositories::ticket_store::{RepositoryError, TicketStore};
use crate::domain::repositories::unit_of_work::{TicketChange, TicketUnitOfWork};
use crate::domain::services::notification_service::Notifier;
use crate::utils::clock::Clock;
use chrono::Duration;
use dashmap::DashMap;
use metrics::counter;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// SLA监控配置
#[derive(Debug, Clone)]
pub struct SlaMonitorConfig {
    /// 同一工单的违规记录去重窗口（分钟）
    pub violation_dedup_minutes: i64,
    /// 临近到期提醒窗口（分钟）
    pub near_due_minutes: i64,
}

impl Default for SlaMonitorConfig {
    fn default() -> Self {
        Self {
            violation_dedup_minutes: 60,
            near_due_minutes: 30,
        }
    }
}

/// 一轮扫描的统计结果
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOutcome {
    /// 扫描的活动工单数
    pub scanned: u64,
    /// 新记录的违规数
    pub violations: u64,
    /// 发出的临近到期提醒数
    pub near_due_notices: u64,
    /// 计算并持久化的到期时间数
    pub due_dates_set: u64,
}

/// SLA监控器
///
/// 周期性扫描活动工单，按优先级×影响范围×紧急程度矩阵
/// 检出响应/解决时间预算违规并记录。检出与记录独立于
/// 层级升级，两者都由经过时间驱动但互不依赖。
pub struct SlaMonitor {
    tickets: Arc<dyn TicketStore>,
    rules: Arc<dyn SlaRuleStore>,
    violations: Arc<dyn SlaViolationStore>,
    uow: Arc<dyn TicketUnitOfWork>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    config: SlaMonitorConfig,
    /// 进程内的提醒去重，同一工单只发一次临近到期提醒
    near_due_notified: DashMap<i64, ()>,
}

impl SlaMonitor {
    /// 创建新的SLA监控器实例
    pub fn new(
        tickets: Arc<dyn TicketStore>,
        rules: Arc<dyn SlaRuleStore>,
        violations: Arc<dyn SlaViolationStore>,
        uow: Arc<dyn TicketUnitOfWork>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        config: SlaMonitorConfig,
    ) -> Self {
        Self {
            tickets,
            rules,
            violations,
            uow,
            notifier,
            clock,
            config,
            near_due_notified: DashMap::new(),
        }
    }

    /// 扫描所有活动工单
    ///
    /// 没有匹配规则的工单直接跳过。单个工单的存储失败
    /// 只记录日志，不影响本轮其余工单的处理。
    ///
    /// # 返回值
    ///
    /// * `Ok(ScanOutcome)` - 本轮扫描统计
    pub async fn scan_active_tickets(&self) -> Result<ScanOutcome, RoutingError> {
        let active = self.tickets.find_active().await?;
        let mut outcome = ScanOutcome::default();
        for ticket in active {
            outcome.scanned += 1;
            if let Err(e) = self.scan_ticket(&ticket, &mut outcome).await {
                error!("SLA scan failed for ticket {}: {}", ticket.id, e);
            }
        }
        if outcome.violations > 0 {
            info!(
                "SLA scan recorded {} violations across {} tickets",
                outcome.violations, outcome.scanned
            );
        }
        Ok(outcome)
    }

    async fn scan_ticket(
        &self,
        ticket: &Incident,
        outcome: &mut ScanOutcome,
    ) -> Result<(), RoutingError> {
        let Some(rule) = self
            .rules
            .find_rule(ticket.priority, ticket.impact, ticket.urgency)
            .await?
        else {
            debug!(
                "No SLA rule for ticket {} ({}/{}/{}), skipping",
                ticket.id, ticket.priority, ticket.impact, ticket.urgency
            );
            return Ok(());
        };

        let now = self.clock.now();

        // 响应时间检查：仍未分派的工单
        if ticket.assigned_to.is_none() {
            let elapsed = (now - ticket.reported_at).num_minutes();
            if elapsed > rule.response_minutes {
                self.record_violation(
                    ticket,
                    ViolationKind::Response,
                    elapsed - rule.response_minutes,
                    outcome,
                )
                .await?;
            }
        }

        // 解决时间检查：仍未解决的工单，从分派时间起算，从未分派则从报告时间起算
        if ticket.resolved_at.is_none() {
            let reference = ticket.assigned_at.unwrap_or(ticket.reported_at);
            let elapsed = (now - reference).num_minutes();
            if elapsed > rule.resolution_minutes {
                self.record_violation(
                    ticket,
                    ViolationKind::Resolution,
                    elapsed - rule.resolution_minutes,
                    outcome,
                )
                .await?;
            }
        }

        // 到期时间缺失且已分派时计算并持久化，供外部查询免于重算
        let mut due_at = ticket.due_at;
        if ticket.due_at.is_none() {
            if let Some(assigned_at) = ticket.assigned_at {
                let due = assigned_at + Duration::minutes(rule.resolution_minutes);
                let mut updated = ticket.clone();
                updated.due_at = Some(due);
                match self.uow.commit(TicketChange::ticket_only(updated)).await {
                    Ok(_) => {
                        due_at = Some(due);
                        outcome.due_dates_set += 1;
                    }
                    Err(RepositoryError::Conflict) => {
                        debug!(
                            "Ticket {} changed concurrently, due date left for the next scan",
                            ticket.id
                        );
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        }

        // 临近到期提醒，进程内去重避免每轮重复发送
        if let Some(due) = due_at {
            if ticket.resolved_at.is_none()
                && now < due
                && due - now <= Duration::minutes(self.config.near_due_minutes)
                && self.near_due_notified.insert(ticket.id, ()).is_none()
            {
                outcome.near_due_notices += 1;
                self.dispatch(
                    ticket,
                    NotificationKind::SlaNearDue,
                    format!("Ticket {} is due at {}", ticket.ticket_number, due),
                )
                .await;
            }
        }

        Ok(())
    }

    async fn record_violation(
        &self,
        ticket: &Incident,
        kind: ViolationKind,
        exceeded_by_minutes: i64,
        outcome: &mut ScanOutcome,
    ) -> Result<(), RoutingError> {
        let now = self.clock.now();
        if let Some(previous) = self.violations.latest_for_ticket(ticket.id).await? {
            if (now - previous.detected_at).num_minutes() < self.config.violation_dedup_minutes {
                return Ok(());
            }
        }

        let violation = SlaViolation::new(ticket.id, kind, exceeded_by_minutes, now);
        self.violations.record(&violation).await?;
        counter!("sla_violations_total", "kind" => kind.to_string()).increment(1);
        warn!(
            "SLA {} violation recorded for ticket {} ({} minutes over budget)",
            kind, ticket.id, exceeded_by_minutes
        );
        outcome.violations += 1;
        self.dispatch(
            ticket,
            NotificationKind::SlaBreached,
            format!(
                "Ticket {} exceeded its {} time budget by {} minutes",
                ticket.ticket_number, kind, exceeded_by_minutes
            ),
        )
        .await;
        Ok(())
    }

    async fn dispatch(&self, ticket: &Incident, kind: NotificationKind, message: String) {
        let recipient = ticket.assigned_to.unwrap_or(ticket.reported_by);
        let notification =
            Notification::new(recipient, ticket.id, kind, message, self.clock.now());
        if let Err(e) = self.notifier.notify(notification).await {
            warn!(
                "Failed to queue {} notification for ticket {}: {}",
                kind, ticket.id, e
            );
        }
    }
}

#[cfg(test)]
#[path = "sla_service_test.rs"]
mod tests;
