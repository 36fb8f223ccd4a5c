// ==========================================
// 农产品供应链追溯系统 - 配置层
// ==========================================
// 职责: 追溯参数默认值与覆写
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod trace_config;

// 重导出核心配置
pub use config_manager::{config_keys, ConfigError, ConfigManager};
pub use trace_config::{RiskRouteConfig, TraceConfig};
