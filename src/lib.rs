// ==========================================
// 农产品供应链追溯系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 只读追溯聚合 (批次 → 运输 → 零售)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 风险/路线、时间线、状态推导
pub mod engine;

// 配置层 - 追溯参数
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 查询接口
pub mod api;

// 应用层 - 装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    BatchIdentifier, DeliveryStatus, GeoPoint, InventoryStatus, JourneyStage, JourneyStatus,
    RiskFlag, SurrogateId,
};

// 领域实体
pub use domain::{Batch, InventoryEntry, TimelineEvent, TraceabilityReport, TransportLeg};

// 引擎
pub use engine::{RiskRouteEvaluator, StatusInferenceEngine, TimelineBuilder};

// API
pub use api::{ApiError, ApiResult, TraceabilityApi, TransportApi};

// 配置
pub use config::{RiskRouteConfig, TraceConfig};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "农产品供应链追溯系统";
