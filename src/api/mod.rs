// ==========================================
// 农产品供应链追溯系统 - API 层
// ==========================================
// 职责: 对外查询入口,供命令行与上层服务调用
// ==========================================

pub mod error;
pub mod trace_api;
pub mod transport_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use trace_api::{
    FarmDigest, FarmerDigest, ProductHistory, ProductSearchHit, ProductStatusView, StoreDigest,
    TraceabilityApi, TransportDigest,
};
pub use transport_api::{DestinationEta, RouteDetailsView, TransportApi};
