// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::incident::SupportTier;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 升级审计记录
///
/// 每次升级写入一条，只追加、永不修改或删除。
/// 记录在工单变更之前写入，保证审计轨迹不会因后续提交失败而丢失。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscalationRecord {
    /// 记录唯一标识符
    pub id: Uuid,
    /// 工单ID
    pub ticket_id: i64,
    /// 起始层级
    pub from_tier: SupportTier,
    /// 目标层级
    pub to_tier: SupportTier,
    /// 起始处理人ID（可选）
    pub from_technician: Option<i64>,
    /// 目标处理人ID（可选）
    pub to_technician: Option<i64>,
    /// 升级原因说明
    pub reason: String,
    /// 是否为自动升级
    pub automatic: bool,
    /// 记录时间
    pub created_at: DateTime<Utc>,
}

impl EscalationRecord {
    /// 创建一条新的升级记录
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        ticket_id: i64,
        from_tier: SupportTier,
        to_tier: SupportTier,
        from_technician: Option<i64>,
        to_technician: Option<i64>,
        reason: String,
        automatic: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            ticket_id,
            from_tier,
            to_tier,
            from_technician,
            to_technician,
            reason,
            automatic,
            created_at,
        }
    }
}
