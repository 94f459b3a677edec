// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Serialize;

/// 统一结果信封
///
/// 每个公开操作都返回该结构，HTTP层、CLI与调度器
/// 以一致的方式呈现失败描述，引擎不依赖任何传输方式
#[derive(Debug, Serialize)]
pub struct ServiceResponse<T> {
    /// 操作是否成功
    pub success: bool,
    /// 成功时的数据载荷
    pub data: Option<T>,
    /// 人类可读的结果描述
    pub message: String,
}

impl<T> ServiceResponse<T> {
    /// 构造成功响应
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: message.into(),
        }
    }

    /// 构造失败响应
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: message.into(),
        }
    }
}
