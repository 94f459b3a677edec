// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::incident::{Category, Impact, Priority, Urgency};
use serde::Deserialize;
use validator::Validate;

/// 工单创建请求数据传输对象
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTicketRequestDto {
    /// 报告人用户ID
    #[validate(range(min = 1))]
    pub reported_by: i64,
    /// 工单分类
    pub category: Category,
    /// 优先级
    #[serde(default)]
    pub priority: Priority,
    /// 影响范围
    #[serde(default)]
    pub impact: Impact,
    /// 紧急程度
    #[serde(default)]
    pub urgency: Urgency,
}
