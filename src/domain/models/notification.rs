// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// 通知种类枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationKind {
    /// 工单已分派
    Assigned,
    /// 工单已改派
    Reassigned,
    /// 工单已升级
    Escalated,
    /// SLA临近到期
    SlaNearDue,
    /// SLA已违约
    SlaBreached,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NotificationKind::Assigned => write!(f, "assigned"),
            NotificationKind::Reassigned => write!(f, "reassigned"),
            NotificationKind::Escalated => write!(f, "escalated"),
            NotificationKind::SlaNearDue => write!(f, "sla-near-due"),
            NotificationKind::SlaBreached => write!(f, "sla-breached"),
        }
    }
}

/// 状态变更通知
///
/// 引擎在每次状态变更后发出，发送失败不回滚触发它的变更
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// 通知唯一标识符
    pub id: Uuid,
    /// 接收人用户ID
    pub user_id: i64,
    /// 关联的工单ID
    pub ticket_id: i64,
    /// 通知种类
    pub kind: NotificationKind,
    /// 通知内容
    pub message: String,
    /// 创建时间
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// 创建一条新的通知
    pub fn new(
        user_id: i64,
        ticket_id: i64,
        kind: NotificationKind,
        message: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            ticket_id,
            kind,
            message,
            created_at,
        }
    }
}
