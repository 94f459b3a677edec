// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::incident::Incident;
use crate::domain::repositories::ticket_store::RepositoryError;
use async_trait::async_trait;

/// 工单与技术员的复合变更
///
/// 一次提交携带新的工单状态以及工作量增减：
/// `release_workload` 为原处理人减一（下限为零），
/// `engage_workload` 为新处理人加一。
#[derive(Debug, Clone)]
pub struct TicketChange {
    /// 新的工单状态，version字段为读取时观察到的版本
    pub ticket: Incident,
    /// 需要释放工作量的技术员ID
    pub release_workload: Option<i64>,
    /// 需要增加工作量的技术员ID
    pub engage_workload: Option<i64>,
}

impl TicketChange {
    /// 构造只更新工单、不变更工作量的提交
    pub fn ticket_only(ticket: Incident) -> Self {
        Self {
            ticket,
            release_workload: None,
            engage_workload: None,
        }
    }
}

/// 工单工作单元特质
///
/// 工单与技术员的每次复合变更都通过该接口原子提交：
/// 要么全部生效，要么全部不生效。提交时校验工单版本，
/// 版本落后返回 `Conflict`，由调用方重读后重试。
#[async_trait]
pub trait TicketUnitOfWork: Send + Sync {
    /// 原子提交一次复合变更，返回提交后的工单
    async fn commit(&self, change: TicketChange) -> Result<Incident, RepositoryError>;
}
