// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::incident::Incident;
use async_trait::async_trait;
use thiserror::Error;

/// 仓库错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 存储层错误
    #[error("Storage error: {0}")]
    Storage(String),
    /// 记录未找到
    #[error("Record not found")]
    NotFound,
    /// 乐观并发版本冲突
    #[error("Version conflict")]
    Conflict,
}

/// 工单存储特质
///
/// 定义工单数据访问接口。写入走单独的工作单元接口，
/// 该接口只承担读取与新工单落库。
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// 根据ID查找工单
    async fn find_by_id(&self, id: i64) -> Result<Option<Incident>, RepositoryError>;
    /// 获取所有未进入终态的工单
    async fn find_active(&self) -> Result<Vec<Incident>, RepositoryError>;
    /// 新工单落库
    async fn insert(&self, ticket: &Incident) -> Result<Incident, RepositoryError>;
}
