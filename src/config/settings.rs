// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::models::incident::{Impact, Priority, Urgency};
use crate::domain::models::sla::SlaRule;
use crate::domain::services::escalation_service::EscalationBudgets;
use crate::domain::services::sla_service::SlaMonitorConfig;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// 应用程序配置设置
///
/// 包含服务器、指标、升级预算、SLA扫描和通知外发等所有配置项
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// 指标导出配置
    pub metrics: MetricsSettings,
    /// 升级配置
    pub escalation: EscalationSettings,
    /// SLA监控配置
    pub sla: SlaSettings,
    /// 通知外发配置
    pub notifier: NotifierSettings,
}

/// 服务器配置设置
#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 指标导出配置设置
#[derive(Debug, Deserialize)]
pub struct MetricsSettings {
    /// Prometheus导出器监听地址
    pub listen: String,
}

/// 升级配置设置
///
/// 各层级的时间预算与巡检周期，可在不重新部署的情况下调整
#[derive(Debug, Deserialize)]
pub struct EscalationSettings {
    /// L1层级时间预算（分钟）
    pub l1_minutes: i64,
    /// L2层级时间预算（分钟）
    pub l2_minutes: i64,
    /// L3层级时间预算（分钟）
    pub l3_minutes: i64,
    /// L4层级时间预算（分钟）
    pub l4_minutes: i64,
    /// 自动升级巡检周期（秒）
    pub sweep_period_secs: u64,
}

impl EscalationSettings {
    /// 转换为领域层的预算结构
    pub fn budgets(&self) -> EscalationBudgets {
        EscalationBudgets {
            l1_minutes: self.l1_minutes,
            l2_minutes: self.l2_minutes,
            l3_minutes: self.l3_minutes,
            l4_minutes: self.l4_minutes,
        }
    }
}

/// SLA监控配置设置
#[derive(Debug, Deserialize)]
pub struct SlaSettings {
    /// 扫描周期（秒）
    pub scan_period_secs: u64,
    /// 违规记录去重窗口（分钟）
    pub violation_dedup_minutes: i64,
    /// 临近到期提醒窗口（分钟）
    pub near_due_minutes: i64,
    /// 启动时载入的SLA规则表
    #[serde(default)]
    pub rules: Vec<SlaRuleSettings>,
}

impl SlaSettings {
    /// 转换为监控器配置
    pub fn monitor_config(&self) -> SlaMonitorConfig {
        SlaMonitorConfig {
            violation_dedup_minutes: self.violation_dedup_minutes,
            near_due_minutes: self.near_due_minutes,
        }
    }

    /// 解析规则表
    pub fn rules(&self) -> Result<Vec<SlaRule>, ConfigError> {
        self.rules.iter().map(SlaRuleSettings::parse).collect()
    }
}

/// 单条SLA规则的配置表示
#[derive(Debug, Deserialize)]
pub struct SlaRuleSettings {
    /// 优先级（low/medium/high/critical）
    pub priority: String,
    /// 影响范围（low/medium/high）
    pub impact: String,
    /// 紧急程度（low/medium/high）
    pub urgency: String,
    /// 响应时间预算（分钟）
    pub response_minutes: i64,
    /// 解决时间预算（分钟）
    pub resolution_minutes: i64,
}

impl SlaRuleSettings {
    fn parse(&self) -> Result<SlaRule, ConfigError> {
        let priority: Priority = self
            .priority
            .parse()
            .map_err(|_| ConfigError::Message(format!("invalid priority: {}", self.priority)))?;
        let impact: Impact = self
            .impact
            .parse()
            .map_err(|_| ConfigError::Message(format!("invalid impact: {}", self.impact)))?;
        let urgency: Urgency = self
            .urgency
            .parse()
            .map_err(|_| ConfigError::Message(format!("invalid urgency: {}", self.urgency)))?;
        Ok(SlaRule {
            priority,
            impact,
            urgency,
            response_minutes: self.response_minutes,
            resolution_minutes: self.resolution_minutes,
        })
    }
}

/// 通知外发配置设置
#[derive(Debug, Deserialize)]
pub struct NotifierSettings {
    /// 通知网关地址，未配置时只写日志
    pub endpoint: Option<String>,
    /// 通知签名密钥
    pub secret: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Start with default settings
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            // Default metrics settings
            .set_default("metrics.listen", "0.0.0.0:9000")?
            // Default escalation budgets (minutes per tier)
            .set_default("escalation.l1_minutes", 120)?
            .set_default("escalation.l2_minutes", 240)?
            .set_default("escalation.l3_minutes", 480)?
            .set_default("escalation.l4_minutes", 1440)?
            .set_default("escalation.sweep_period_secs", 600)?
            // Default SLA monitor settings
            .set_default("sla.scan_period_secs", 300)?
            .set_default("sla.violation_dedup_minutes", 60)?
            .set_default("sla.near_due_minutes", 30)?
            // Default notifier settings
            .set_default("notifier.secret", "your-secret-key")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("DISPATCHRS").separator("__"));

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
