// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::incident::SupportTier;
use crate::domain::models::technician::{Specialty, Technician};
use crate::domain::repositories::ticket_store::RepositoryError;
use async_trait::async_trait;

/// 技术员名录特质
///
/// 定义技术员数据访问接口。工作量计数不经由该接口变更，
/// 只随工单复合提交一并落库。
#[async_trait]
pub trait TechnicianDirectory: Send + Sync {
    /// 根据ID查找技术员
    async fn find_by_id(&self, id: i64) -> Result<Option<Technician>, RepositoryError>;
    /// 写入或更新技术员记录
    async fn upsert(&self, technician: &Technician) -> Result<Technician, RepositoryError>;
    /// 按层级与专长筛选在职技术员
    async fn find_candidates(
        &self,
        tier: Option<SupportTier>,
        specialty: Option<Specialty>,
    ) -> Result<Vec<Technician>, RepositoryError>;
    /// 查找当前值守的单一联络点
    async fn find_spoc_on_duty(&self) -> Result<Option<Technician>, RepositoryError>;
}
