// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 该模块包含系统的核心业务逻辑服务，这些服务封装了复杂的
/// 业务规则和领域逻辑，协调多个领域对象来完成业务操作。
///
/// 包含的服务：
/// - 分派服务（assignment_service）：为未分派工单确定处理人
/// - 升级服务（escalation_service）：层级状态机与自动升级巡检
/// - SLA服务（sla_service）：周期性违规检出与到期时间维护
/// - 通知服务（notification_service）：状态变更通知的外发接口
pub mod assignment_service;
pub mod escalation_service;
pub mod notification_service;
pub mod sla_service;
