// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::escalation::EscalationRecord;
use crate::domain::repositories::escalation_ledger::EscalationLedger;
use crate::domain::repositories::ticket_store::RepositoryError;
use async_trait::async_trait;
use parking_lot::RwLock;

/// 内存升级账本
///
/// 只追加的升级记录存储，记录一经写入不再变更
pub struct MemoryEscalationLedger {
    records: RwLock<Vec<EscalationRecord>>,
}

impl MemoryEscalationLedger {
    /// 创建空的内存账本
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }
}

impl Default for MemoryEscalationLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EscalationLedger for MemoryEscalationLedger {
    async fn append(&self, record: &EscalationRecord) -> Result<(), RepositoryError> {
        self.records.write().push(record.clone());
        Ok(())
    }

    async fn find_by_ticket(
        &self,
        ticket_id: i64,
    ) -> Result<Vec<EscalationRecord>, RepositoryError> {
        let mut matching: Vec<EscalationRecord> = self
            .records
            .read()
            .iter()
            .filter(|record| record.ticket_id == ticket_id)
            .cloned()
            .collect();
        matching.sort_by_key(|record| record.created_at);
        Ok(matching)
    }
}
