// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::incident::SupportTier;
use crate::domain::models::technician::{Specialty, Technician};
use crate::domain::repositories::technician_directory::TechnicianDirectory;
use crate::domain::repositories::ticket_store::RepositoryError;
use async_trait::async_trait;
use dashmap::DashMap;

/// 内存技术员名录
///
/// 技术员名录接口的进程内参考实现。工作量的增减只由
/// 工作单元在提交锁内调用，不走公开接口。
pub struct MemoryDirectory {
    technicians: DashMap<i64, Technician>,
}

impl MemoryDirectory {
    /// 创建空的内存名录
    pub fn new() -> Self {
        Self {
            technicians: DashMap::new(),
        }
    }

    pub(crate) fn contains(&self, id: i64) -> bool {
        self.technicians.contains_key(&id)
    }

    /// 调整工作量，负向调整下限为零
    pub(crate) fn adjust_workload(&self, id: i64, delta: i64) -> Result<(), RepositoryError> {
        let mut technician = self
            .technicians
            .get_mut(&id)
            .ok_or(RepositoryError::NotFound)?;
        technician.workload = if delta >= 0 {
            technician.workload + delta as u32
        } else {
            technician.workload.saturating_sub(delta.unsigned_abs() as u32)
        };
        Ok(())
    }
}

impl Default for MemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TechnicianDirectory for MemoryDirectory {
    async fn find_by_id(&self, id: i64) -> Result<Option<Technician>, RepositoryError> {
        Ok(self.technicians.get(&id).map(|entry| entry.value().clone()))
    }

    async fn upsert(&self, technician: &Technician) -> Result<Technician, RepositoryError> {
        self.technicians
            .insert(technician.id, technician.clone());
        Ok(technician.clone())
    }

    async fn find_candidates(
        &self,
        tier: Option<SupportTier>,
        specialty: Option<Specialty>,
    ) -> Result<Vec<Technician>, RepositoryError> {
        let mut candidates: Vec<Technician> = self
            .technicians
            .iter()
            .filter(|entry| entry.active)
            .filter(|entry| tier.is_none_or(|t| entry.tier == t))
            .filter(|entry| specialty.is_none_or(|s| entry.specialty == s))
            .map(|entry| entry.value().clone())
            .collect();
        candidates.sort_by_key(|technician| technician.id);
        Ok(candidates)
    }

    async fn find_spoc_on_duty(&self) -> Result<Option<Technician>, RepositoryError> {
        let mut on_duty: Vec<Technician> = self
            .technicians
            .iter()
            .filter(|entry| entry.is_spoc_on_duty())
            .map(|entry| entry.value().clone())
            .collect();
        on_duty.sort_by_key(|technician| technician.id);
        Ok(on_duty.into_iter().next())
    }
}
