// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::incident::{Impact, Priority, Urgency};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// SLA规则
///
/// 按（优先级，影响范围，紧急程度）精确匹配，
/// 给出响应时间与解决时间预算（分钟）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlaRule {
    pub priority: Priority,
    pub impact: Impact,
    pub urgency: Urgency,
    /// 响应时间预算（分钟）
    pub response_minutes: i64,
    /// 解决时间预算（分钟）
    pub resolution_minutes: i64,
}

/// SLA违规类型枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// 超出响应时间预算
    Response,
    /// 超出解决时间预算
    Resolution,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ViolationKind::Response => write!(f, "response"),
            ViolationKind::Resolution => write!(f, "resolution"),
        }
    }
}

/// SLA违规记录
///
/// 周期性扫描检出违规时写入，只追加。
/// 同一工单在去重窗口内最多产生一条记录。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlaViolation {
    /// 记录唯一标识符
    pub id: Uuid,
    /// 工单ID
    pub ticket_id: i64,
    /// 违规类型
    pub kind: ViolationKind,
    /// 超出预算的分钟数
    pub exceeded_by_minutes: i64,
    /// 检出时间
    pub detected_at: DateTime<Utc>,
}

impl SlaViolation {
    /// 创建一条新的违规记录
    pub fn new(
        ticket_id: i64,
        kind: ViolationKind,
        exceeded_by_minutes: i64,
        detected_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            ticket_id,
            kind,
            exceeded_by_minutes,
            detected_at,
        }
    }
}
