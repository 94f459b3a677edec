// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::notification::Notification;
use anyhow::Result;
use async_trait::async_trait;

/// 通知服务特质
///
/// 定义状态变更通知的外发接口。投递是即发即忘的：
/// 实现方必须立即入队返回，不得让调用方阻塞在网络IO上，
/// 投递失败也不回滚触发通知的状态变更。
#[async_trait]
pub trait Notifier: Send + Sync {
    /// 发出一条通知
    ///
    /// # 参数
    ///
    /// * `notification` - 待发送的通知
    ///
    /// # 返回值
    ///
    /// * `Ok(())` - 已入队
    /// * `Err(anyhow::Error)` - 入队失败
    async fn notify(&self, notification: Notification) -> Result<()>;
}
