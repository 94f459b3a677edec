// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::technician::Specialty;
use crate::domain::repositories::ticket_store::RepositoryError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 工单实体
///
/// 表示一个待处理的支持事件。工单在多级支持体系中流转，
/// 由分派引擎确定初始处理人，由升级引擎逐级上移，
/// 直到进入终态（已解决/已关闭/已取消）后对引擎只读。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Incident {
    /// 工单唯一标识符
    pub id: i64,
    /// 工单编号，面向用户的可读标识
    pub ticket_number: String,
    /// 报告人用户ID，无处理人时的通知对象
    pub reported_by: i64,
    /// 工单分类，决定所需的处理专长
    pub category: Category,
    /// 优先级
    pub priority: Priority,
    /// 影响范围
    pub impact: Impact,
    /// 紧急程度
    pub urgency: Urgency,
    /// 工单状态，跟踪工单在生命周期中的当前阶段
    pub status: IncidentStatus,
    /// 当前支持层级，除终态外单调不降
    pub tier: SupportTier,
    /// 当前处理人ID（可选）
    pub assigned_to: Option<i64>,
    /// 报告时间
    pub reported_at: DateTime<Utc>,
    /// 分派时间
    pub assigned_at: Option<DateTime<Utc>>,
    /// 最近一次升级时间
    pub last_escalated_at: Option<DateTime<Utc>>,
    /// 解决时间
    pub resolved_at: Option<DateTime<Utc>>,
    /// 关闭时间
    pub closed_at: Option<DateTime<Utc>>,
    /// SLA到期时间，由SLA监控器在分派后计算并持久化
    pub due_at: Option<DateTime<Utc>>,
    /// 累计升级次数
    pub escalation_count: i32,
    /// 最近一次升级是否为自动触发
    pub auto_escalated: bool,
    /// 最近一次升级的原因说明
    pub escalation_reason: Option<String>,
    /// 乐观并发版本号，提交时校验
    pub version: u64,
}

/// 工单分类枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// 硬件故障
    Hardware,
    /// 软件问题
    #[default]
    Software,
    /// 网络问题
    Network,
    /// 安全事件
    Security,
    /// 服务请求
    ServiceRequest,
}

impl Category {
    /// 该分类所需的处理专长
    pub fn required_specialty(&self) -> Specialty {
        match self {
            Category::Hardware => Specialty::Hardware,
            Category::Software => Specialty::Software,
            Category::Network => Specialty::Network,
            Category::Security => Specialty::Security,
            Category::ServiceRequest => Specialty::General,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Category::Hardware => write!(f, "hardware"),
            Category::Software => write!(f, "software"),
            Category::Network => write!(f, "network"),
            Category::Security => write!(f, "security"),
            Category::ServiceRequest => write!(f, "service_request"),
        }
    }
}

impl FromStr for Category {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hardware" => Ok(Category::Hardware),
            "software" => Ok(Category::Software),
            "network" => Ok(Category::Network),
            "security" => Ok(Category::Security),
            "service_request" => Ok(Category::ServiceRequest),
            _ => Err(()),
        }
    }
}

/// 优先级枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
            Priority::Critical => write!(f, "critical"),
        }
    }
}

impl FromStr for Priority {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "critical" => Ok(Priority::Critical),
            _ => Err(()),
        }
    }
}

/// 影响范围枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    Low,
    #[default]
    Medium,
    High,
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Impact::Low => write!(f, "low"),
            Impact::Medium => write!(f, "medium"),
            Impact::High => write!(f, "high"),
        }
    }
}

impl FromStr for Impact {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Impact::Low),
            "medium" => Ok(Impact::Medium),
            "high" => Ok(Impact::High),
            _ => Err(()),
        }
    }
}

/// 紧急程度枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Low,
    #[default]
    Medium,
    High,
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Urgency::Low => write!(f, "low"),
            Urgency::Medium => write!(f, "medium"),
            Urgency::High => write!(f, "high"),
        }
    }
}

impl FromStr for Urgency {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Urgency::Low),
            "medium" => Ok(Urgency::Medium),
            "high" => Ok(Urgency::High),
            _ => Err(()),
        }
    }
}

/// 工单状态枚举
///
/// 状态转换遵循以下流程：
/// Open → InProgress → Resolved → Closed
/// Open/InProgress 可进入 OnHold，任意非终态可进入 Cancelled。
/// Resolved/Closed/Cancelled 为终态，终态工单不再变更层级或处理人。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IncidentStatus {
    /// 已创建，尚未分派
    #[default]
    Open,
    /// 处理中
    InProgress,
    /// 挂起等待
    OnHold,
    /// 已解决
    Resolved,
    /// 已关闭
    Closed,
    /// 已取消
    Cancelled,
}

impl IncidentStatus {
    /// 是否为终态
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            IncidentStatus::Resolved | IncidentStatus::Closed | IncidentStatus::Cancelled
        )
    }
}

impl fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            IncidentStatus::Open => write!(f, "open"),
            IncidentStatus::InProgress => write!(f, "in_progress"),
            IncidentStatus::OnHold => write!(f, "on_hold"),
            IncidentStatus::Resolved => write!(f, "resolved"),
            IncidentStatus::Closed => write!(f, "closed"),
            IncidentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl FromStr for IncidentStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(IncidentStatus::Open),
            "in_progress" => Ok(IncidentStatus::InProgress),
            "on_hold" => Ok(IncidentStatus::OnHold),
            "resolved" => Ok(IncidentStatus::Resolved),
            "closed" => Ok(IncidentStatus::Closed),
            "cancelled" => Ok(IncidentStatus::Cancelled),
            _ => Err(()),
        }
    }
}

/// 支持层级枚举
///
/// 层级只能沿 L1 → L2 → L3 → L4 单步前进，L4 为最高层级
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SupportTier {
    /// 一线技术员
    #[default]
    L1Technician,
    /// 二线专家
    L2Expert,
    /// 三线专项工程师
    L3Specialist,
    /// 外部供应商
    L4Vendor,
}

impl SupportTier {
    /// 下一层级，L4 没有下一级
    pub fn next(&self) -> Option<SupportTier> {
        match self {
            SupportTier::L1Technician => Some(SupportTier::L2Expert),
            SupportTier::L2Expert => Some(SupportTier::L3Specialist),
            SupportTier::L3Specialist => Some(SupportTier::L4Vendor),
            SupportTier::L4Vendor => None,
        }
    }
}

impl fmt::Display for SupportTier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SupportTier::L1Technician => write!(f, "l1_technician"),
            SupportTier::L2Expert => write!(f, "l2_expert"),
            SupportTier::L3Specialist => write!(f, "l3_specialist"),
            SupportTier::L4Vendor => write!(f, "l4_vendor"),
        }
    }
}

impl FromStr for SupportTier {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "l1_technician" => Ok(SupportTier::L1Technician),
            "l2_expert" => Ok(SupportTier::L2Expert),
            "l3_specialist" => Ok(SupportTier::L3Specialist),
            "l4_vendor" => Ok(SupportTier::L4Vendor),
            _ => Err(()),
        }
    }
}

/// 路由错误类型
///
/// 表示分派与升级过程中可能出现的各种可恢复错误，
/// 每个变体携带足够的上下文供调用方决策
#[derive(Error, Debug)]
pub enum RoutingError {
    /// 工单不存在
    #[error("Ticket {0} not found")]
    TicketNotFound(i64),

    /// 技术员不存在
    #[error("Technician {0} not found")]
    TechnicianNotFound(i64),

    /// 工单已有处理人
    #[error("Ticket {0} is already assigned")]
    AlreadyAssigned(i64),

    /// 请求人权限不足
    #[error("Requester {0} lacks the role required for this operation")]
    Forbidden(i64),

    /// 没有可用的技术员
    #[error("No technician available for ticket {0}")]
    NoTechnicianAvailable(i64),

    /// 非法的层级转换
    #[error("Invalid tier transition {from} -> {to} for ticket {ticket_id}")]
    InvalidTransition {
        ticket_id: i64,
        from: SupportTier,
        to: SupportTier,
    },

    /// 已处于最高层级
    #[error("Ticket {0} is already at the maximum support tier")]
    MaxTierReached(i64),

    /// 指定技术员不属于目标层级
    #[error("Technician {technician_id} does not belong to tier {tier}")]
    TierMismatch {
        technician_id: i64,
        tier: SupportTier,
    },

    /// 工单已进入终态
    #[error("Ticket {0} is in a terminal state")]
    TicketClosed(i64),

    /// 并发冲突重试耗尽
    #[error("Concurrent update on ticket {0} not resolved after retry")]
    ConflictRetryExhausted(i64),

    /// 仓库错误
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl Incident {
    /// 创建一个新的工单
    ///
    /// # 参数
    ///
    /// * `id` - 工单ID
    /// * `ticket_number` - 工单编号
    /// * `reported_by` - 报告人用户ID
    /// * `category` - 工单分类
    /// * `priority` - 优先级
    /// * `impact` - 影响范围
    /// * `urgency` - 紧急程度
    /// * `reported_at` - 报告时间
    ///
    /// # 返回值
    ///
    /// 返回新创建的工单实例，初始状态为Open、层级为L1
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: i64,
        ticket_number: String,
        reported_by: i64,
        category: Category,
        priority: Priority,
        impact: Impact,
        urgency: Urgency,
        reported_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            ticket_number,
            reported_by,
            category,
            priority,
            impact,
            urgency,
            status: IncidentStatus::Open,
            tier: SupportTier::L1Technician,
            assigned_to: None,
            reported_at,
            assigned_at: None,
            last_escalated_at: None,
            resolved_at: None,
            closed_at: None,
            due_at: None,
            escalation_count: 0,
            auto_escalated: false,
            escalation_reason: None,
            version: 0,
        }
    }

    /// 是否处于终态
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// 自动升级的计时基准
    ///
    /// 取最近一次升级时间、分派时间、报告时间中最晚的一个
    pub fn escalation_reference(&self) -> DateTime<Utc> {
        let mut reference = self.reported_at;
        if let Some(assigned_at) = self.assigned_at {
            reference = reference.max(assigned_at);
        }
        if let Some(last_escalated_at) = self.last_escalated_at {
            reference = reference.max(last_escalated_at);
        }
        reference
    }

    /// 进入处理中状态
    ///
    /// 仅Open与OnHold会转入InProgress，其余状态保持不变
    pub fn activate(&mut self) {
        if matches!(self.status, IncidentStatus::Open | IncidentStatus::OnHold) {
            self.status = IncidentStatus::InProgress;
        }
    }
}
