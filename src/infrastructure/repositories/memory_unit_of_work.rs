// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::incident::Incident;
use crate::domain::repositories::ticket_store::RepositoryError;
use crate::domain::repositories::unit_of_work::{TicketChange, TicketUnitOfWork};
use crate::infrastructure::repositories::memory_directory::MemoryDirectory;
use crate::infrastructure::repositories::memory_ticket_store::MemoryTicketStore;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

/// 内存工作单元
///
/// 工单与技术员复合变更的进程内原子提交：提交锁串行化
/// 所有提交，先校验工单版本与涉及的技术员，校验通过后
/// 一并应用，保证工作量计数与工单指派不会彼此脱节。
pub struct MemoryTicketUnitOfWork {
    tickets: Arc<MemoryTicketStore>,
    directory: Arc<MemoryDirectory>,
    commit_lock: Mutex<()>,
}

impl MemoryTicketUnitOfWork {
    /// 基于同一对内存存储创建工作单元
    pub fn new(tickets: Arc<MemoryTicketStore>, directory: Arc<MemoryDirectory>) -> Self {
        Self {
            tickets,
            directory,
            commit_lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl TicketUnitOfWork for MemoryTicketUnitOfWork {
    async fn commit(&self, change: TicketChange) -> Result<Incident, RepositoryError> {
        let _guard = self.commit_lock.lock();

        // 涉及的技术员先行校验，替换工单后不再有失败路径
        for id in [change.release_workload, change.engage_workload]
            .into_iter()
            .flatten()
        {
            if !self.directory.contains(id) {
                return Err(RepositoryError::NotFound);
            }
        }

        let committed = self.tickets.replace_if_current(change.ticket)?;

        if let Some(id) = change.release_workload {
            self.directory.adjust_workload(id, -1)?;
        }
        if let Some(id) = change.engage_workload {
            self.directory.adjust_workload(id, 1)?;
        }

        Ok(committed)
    }
}

#[cfg(test)]
#[path = "memory_unit_of_work_test.rs"]
mod tests;
