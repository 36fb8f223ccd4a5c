// ==========================================
// 农产品供应链追溯系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、报告结构
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod batch;
pub mod inventory;
pub mod party;
pub mod report;
pub mod transport;
pub mod types;

// 重导出核心类型
pub use batch::{Batch, ProcessingDetails, StorageConditions};
pub use inventory::InventoryEntry;
pub use party::{PartyProfile, PartyRole, PostalAddress, RetailStore};
pub use report::{
    BatchSummary, EventLocation, JourneySummary, PartyContact, ProducerInfo, RetailLocationEntry,
    RetailerContact, TimelineDetails, TimelineEvent, TraceabilityReport, TransportHistoryEntry,
};
pub use transport::{
    DriverDetails, LegEndpoint, RouteEstimate, TemperatureSample, TransportLeg, VehicleDetails,
};
pub use types::{
    BatchIdentifier, BatchLifecycleStatus, DeliveryStatus, GeoPoint, InventoryStatus,
    JourneyStage, JourneyStatus, RiskFlag, SurrogateId,
};
