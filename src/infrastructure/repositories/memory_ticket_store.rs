// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::incident::Incident;
use crate::domain::repositories::ticket_store::{RepositoryError, TicketStore};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};

/// 内存工单存储
///
/// 工单存储接口的进程内参考实现，供二进制入口与测试使用。
/// 落库时分配自增ID与工单编号，提交时校验乐观版本号。
pub struct MemoryTicketStore {
    tickets: DashMap<i64, Incident>,
    next_id: AtomicI64,
}

impl MemoryTicketStore {
    /// 创建空的内存工单存储
    pub fn new() -> Self {
        Self {
            tickets: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    /// 版本一致时替换工单并递增版本号
    ///
    /// 工作单元在提交锁内调用，版本落后返回 `Conflict`
    pub(crate) fn replace_if_current(&self, ticket: Incident) -> Result<Incident, RepositoryError> {
        let mut entry = self
            .tickets
            .get_mut(&ticket.id)
            .ok_or(RepositoryError::NotFound)?;
        if entry.version != ticket.version {
            return Err(RepositoryError::Conflict);
        }
        let mut committed = ticket;
        committed.version += 1;
        *entry = committed.clone();
        Ok(committed)
    }
}

impl Default for MemoryTicketStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TicketStore for MemoryTicketStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Incident>, RepositoryError> {
        Ok(self.tickets.get(&id).map(|entry| entry.value().clone()))
    }

    async fn find_active(&self) -> Result<Vec<Incident>, RepositoryError> {
        let mut active: Vec<Incident> = self
            .tickets
            .iter()
            .filter(|entry| !entry.is_terminal())
            .map(|entry| entry.value().clone())
            .collect();
        active.sort_by_key(|ticket| ticket.id);
        Ok(active)
    }

    async fn insert(&self, ticket: &Incident) -> Result<Incident, RepositoryError> {
        let mut stored = ticket.clone();
        if stored.id <= 0 {
            stored.id = self.next_id.fetch_add(1, Ordering::SeqCst);
        }
        if stored.ticket_number.is_empty() {
            stored.ticket_number = format!("INC-{:06}", stored.id);
        }
        stored.version = 1;
        if self.tickets.contains_key(&stored.id) {
            return Err(RepositoryError::Storage(format!(
                "duplicate ticket id {}",
                stored.id
            )));
        }
        self.tickets.insert(stored.id, stored.clone());
        Ok(stored)
    }
}
