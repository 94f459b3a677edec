// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::incident::{Impact, Priority, Urgency};
use crate::domain::models::sla::{SlaRule, SlaViolation};
use crate::domain::repositories::sla_store::{SlaRuleStore, SlaViolationStore};
use crate::domain::repositories::ticket_store::RepositoryError;
use async_trait::async_trait;
use parking_lot::RwLock;

/// 内存SLA规则存储
pub struct MemorySlaRuleStore {
    rules: RwLock<Vec<SlaRule>>,
}

impl MemorySlaRuleStore {
    /// 创建空的规则存储
    pub fn new() -> Self {
        Self {
            rules: RwLock::new(Vec::new()),
        }
    }

    /// 批量载入规则，通常在启动时从配置读取
    pub fn load(&self, rules: Vec<SlaRule>) {
        let mut guard = self.rules.write();
        guard.extend(rules);
    }
}

impl Default for MemorySlaRuleStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SlaRuleStore for MemorySlaRuleStore {
    async fn find_rule(
        &self,
        priority: Priority,
        impact: Impact,
        urgency: Urgency,
    ) -> Result<Option<SlaRule>, RepositoryError> {
        Ok(self
            .rules
            .read()
            .iter()
            .find(|rule| {
                rule.priority == priority && rule.impact == impact && rule.urgency == urgency
            })
            .cloned())
    }
}

/// 内存SLA违规记录存储
pub struct MemorySlaViolationStore {
    violations: RwLock<Vec<SlaViolation>>,
}

impl MemorySlaViolationStore {
    /// 创建空的违规记录存储
    pub fn new() -> Self {
        Self {
            violations: RwLock::new(Vec::new()),
        }
    }

    /// 当前记录总数，测试断言使用
    pub fn len(&self) -> usize {
        self.violations.read().len()
    }

    /// 是否没有任何记录
    pub fn is_empty(&self) -> bool {
        self.violations.read().is_empty()
    }
}

impl Default for MemorySlaViolationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SlaViolationStore for MemorySlaViolationStore {
    async fn record(&self, violation: &SlaViolation) -> Result<(), RepositoryError> {
        self.violations.write().push(violation.clone());
        Ok(())
    }

    async fn latest_for_ticket(
        &self,
        ticket_id: i64,
    ) -> Result<Option<SlaViolation>, RepositoryError> {
        Ok(self
            .violations
            .read()
            .iter()
            .filter(|violation| violation.ticket_id == ticket_id)
            .max_by_key(|violation| violation.detected_at)
            .cloned())
    }
}
