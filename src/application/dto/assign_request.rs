// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Deserialize;
use validator::Validate;

/// 人工分派请求数据传输对象
#[derive(Debug, Deserialize, Validate)]
pub struct ManualAssignRequestDto {
    /// 目标技术员ID
    #[validate(range(min = 1))]
    pub technician_id: i64,
    /// 请求人ID，必须具备调度角色
    #[validate(range(min = 1))]
    pub requested_by: i64,
}
