// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::incident::SupportTier;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 技术员实体
///
/// 表示一个候选处理人。工作量计数只由分派引擎与升级引擎
/// 在复合提交中变更，每次增加对应唯一一次减少。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Technician {
    /// 技术员唯一标识符
    pub id: i64,
    /// 姓名
    pub name: String,
    /// 岗位角色
    pub role: StaffRole,
    /// 所属支持层级
    pub tier: SupportTier,
    /// 处理专长
    pub specialty: Specialty,
    /// 是否在职可用
    pub active: bool,
    /// 当前工作量（在办工单数）
    pub workload: u32,
    /// 工作年限
    pub experience_years: u8,
    /// 是否被指定为单一联络点（仅对主管/管理员有意义）
    pub is_spoc: bool,
    /// 单一联络点当前是否值守
    pub spoc_available: bool,
}

/// 岗位角色枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    /// 技术员
    #[default]
    Technician,
    /// 主管
    Supervisor,
    /// 管理员
    Administrator,
}

impl StaffRole {
    /// 是否具备人工分派权限
    pub fn can_dispatch(&self) -> bool {
        matches!(self, StaffRole::Supervisor | StaffRole::Administrator)
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StaffRole::Technician => write!(f, "technician"),
            StaffRole::Supervisor => write!(f, "supervisor"),
            StaffRole::Administrator => write!(f, "administrator"),
        }
    }
}

impl FromStr for StaffRole {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "technician" => Ok(StaffRole::Technician),
            "supervisor" => Ok(StaffRole::Supervisor),
            "administrator" => Ok(StaffRole::Administrator),
            _ => Err(()),
        }
    }
}

/// 处理专长枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Specialty {
    Hardware,
    Software,
    Network,
    Security,
    /// 通用支持，承接服务请求类工单
    #[default]
    General,
}

impl fmt::Display for Specialty {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Specialty::Hardware => write!(f, "hardware"),
            Specialty::Software => write!(f, "software"),
            Specialty::Network => write!(f, "network"),
            Specialty::Security => write!(f, "security"),
            Specialty::General => write!(f, "general"),
        }
    }
}

impl FromStr for Specialty {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hardware" => Ok(Specialty::Hardware),
            "software" => Ok(Specialty::Software),
            "network" => Ok(Specialty::Network),
            "security" => Ok(Specialty::Security),
            "general" => Ok(Specialty::General),
            _ => Err(()),
        }
    }
}

impl Technician {
    /// 是否为值守中的单一联络点
    ///
    /// 仅在职、具备主管或管理员角色、被指定为SPOC且当前值守时成立
    pub fn is_spoc_on_duty(&self) -> bool {
        self.active && self.is_spoc && self.spoc_available && self.role.can_dispatch()
    }
}
