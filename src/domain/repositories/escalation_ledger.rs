// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::escalation::EscalationRecord;
use crate::domain::repositories::ticket_store::RepositoryError;
use async_trait::async_trait;

/// 升级审计账本特质
///
/// 只追加的升级记录存储，供报表侧读取
#[async_trait]
pub trait EscalationLedger: Send + Sync {
    /// 追加一条升级记录
    async fn append(&self, record: &EscalationRecord) -> Result<(), RepositoryError>;
    /// 按工单查询升级历史，按时间升序
    async fn find_by_ticket(&self, ticket_id: i64) -> Result<Vec<EscalationRecord>, RepositoryError>;
}
