// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::incident::{Impact, Priority, Urgency};
use crate::domain::models::sla::{SlaRule, SlaViolation};
use crate::domain::repositories::ticket_store::RepositoryError;
use async_trait::async_trait;

/// SLA规则存储特质
#[async_trait]
pub trait SlaRuleStore: Send + Sync {
    /// 按（优先级，影响范围，紧急程度）精确匹配规则
    async fn find_rule(
        &self,
        priority: Priority,
        impact: Impact,
        urgency: Urgency,
    ) -> Result<Option<SlaRule>, RepositoryError>;
}

/// SLA违规记录存储特质
///
/// 只追加，去重逻辑由监控器基于最近记录判断
#[async_trait]
pub trait SlaViolationStore: Send + Sync {
    /// 写入一条违规记录
    async fn record(&self, violation: &SlaViolation) -> Result<(), RepositoryError>;
    /// 查询某工单最近一条违规记录
    async fn latest_for_ticket(
        &self,
        ticket_id: i64,
    ) -> Result<Option<SlaViolation>, RepositoryError>;
}
