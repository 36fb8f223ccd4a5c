// ==========================================
// 农产品供应链追溯系统 - 追溯配置
// ==========================================
// 职责: 冷链阈值、名义车速、公开追溯地址等可覆写参数
// 来源: 默认值 + config_kv 覆写 (见 ConfigManager)
// ==========================================

use serde::{Deserialize, Serialize};

/// 冷链高风险温度阈值 (°C,严格大于才算高风险)
pub const DEFAULT_RISK_THRESHOLD_CELSIUS: f64 = 8.0;

/// 路线估算使用的名义平均车速 (km/h)
pub const DEFAULT_NOMINAL_SPEED_KMH: f64 = 60.0;

/// 公开追溯页面的基础地址
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:5173";

/// 产品搜索结果上限
pub const DEFAULT_SEARCH_LIMIT: usize = 20;

// ==========================================
// RiskRouteConfig - 风险与路线估算参数
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskRouteConfig {
    pub risk_threshold_celsius: f64,
    pub nominal_speed_kmh: f64,
}

impl Default for RiskRouteConfig {
    fn default() -> Self {
        Self {
            risk_threshold_celsius: DEFAULT_RISK_THRESHOLD_CELSIUS,
            nominal_speed_kmh: DEFAULT_NOMINAL_SPEED_KMH,
        }
    }
}

// ==========================================
// TraceConfig - 追溯服务整体配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceConfig {
    pub risk_route: RiskRouteConfig,
    pub public_base_url: String,
    pub search_limit: usize,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            risk_route: RiskRouteConfig::default(),
            public_base_url: DEFAULT_PUBLIC_BASE_URL.to_string(),
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

impl TraceConfig {
    /// 公开追溯地址: {base}/trace/{batch_code}
    pub fn trace_url(&self, batch_code: &str) -> String {
        format!(
            "{}/trace/{}",
            self.public_base_url.trim_end_matches('/'),
            batch_code
        )
    }
}
