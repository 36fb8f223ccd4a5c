// ==========================================
// 农产品供应链追溯系统 - 引擎层
// ==========================================
// 职责: 冷链风险/路线估算、时间线构建、状态推导
// 红线: Engine 不拼 SQL,只处理已取回的领域记录
// ==========================================

pub mod risk_route;
pub mod status;
pub mod timeline;

// 重导出核心引擎
pub use risk_route::{
    format_distance, format_duration, great_circle_distance_m, LegColdChain, RiskRouteEvaluator,
};
pub use status::StatusInferenceEngine;
pub use timeline::TimelineBuilder;
