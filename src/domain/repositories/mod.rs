// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// 该模块定义了领域层的仓库接口，遵循依赖倒置原则。
/// 仓库接口定义了数据持久化的抽象契约，具体实现由基础设施层提供。
///
/// 包含的仓库接口：
/// - 工单存储（ticket_store）：工单读取与落库
/// - 技术员名录（technician_directory）：候选处理人检索
/// - 升级账本（escalation_ledger）：只追加的升级审计记录
/// - SLA存储（sla_store）：规则查询与违规记录
/// - 工作单元（unit_of_work）：工单+技术员的原子复合提交
///
/// 这些接口确保了领域层不依赖于具体的数据存储技术，
/// 提高了系统的可测试性和可维护性.
pub mod escalation_ledger;
pub mod sla_store;
pub mod technician_directory;
pub mod ticket_store;
pub mod unit_of_work;
