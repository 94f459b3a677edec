// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::incident::SupportTier;
use serde::Deserialize;
use validator::Validate;

/// 升级请求数据传输对象
///
/// 未指定目标层级时升级到下一层级
#[derive(Debug, Deserialize, Validate)]
pub struct EscalateRequestDto {
    /// 目标层级（可选）
    pub to_tier: Option<SupportTier>,
    /// 升级原因
    #[validate(length(min = 1, max = 500))]
    pub reason: String,
    /// 指定的目标处理人（可选）
    pub technician_id: Option<i64>,
    /// 请求人ID，必须具备调度角色
    #[validate(range(min = 1))]
    pub requested_by: i64,
}
