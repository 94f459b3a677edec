// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::notification::Notification;
use crate::domain::services::notification_service::Notifier;
use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

/// 日志通知器
///
/// 未配置通知网关时的缺省实现，只把通知写入结构化日志
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, notification: Notification) -> Result<()> {
        info!(
            "Notification ({}) for user {} on ticket {}: {}",
            notification.kind, notification.user_id, notification.ticket_id, notification.message
        );
        Ok(())
    }
}
