// ==========================================
// 农产品供应链追溯系统 - 追溯报告领域模型
// ==========================================
// 用途: 追溯聚合的输出结构 (只读投影,不落库)
// 组成: 批次摘要 + 生产者 + 运输履历 + 零售网点 + 时间线 + 汇总
// ==========================================

use crate::domain::batch::{ProcessingDetails, StorageConditions};
use crate::domain::party::PartyProfile;
use crate::domain::transport::{
    DriverDetails, LegEndpoint, RouteEstimate, TemperatureSample, VehicleDetails,
};
use crate::domain::types::{
    BatchLifecycleStatus, DeliveryStatus, GeoPoint, InventoryStatus, JourneyStage, JourneyStatus,
    RiskFlag, SurrogateId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// TimelineEvent - 时间线事件
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub stage: JourneyStage,
    pub event: String,
    pub timestamp: Option<DateTime<Utc>>, // 缺失时排在最前
    pub location: Option<EventLocation>,
    pub details: TimelineDetails,
    pub status: String, // 取自源记录,不另行推导
}

/// 事件发生地
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventLocation {
    pub name: Option<String>,
    pub coordinates: Option<GeoPoint>,
}

impl EventLocation {
    pub fn from_endpoint(endpoint: &LegEndpoint) -> Self {
        Self {
            name: Some(endpoint.location_name.clone()),
            coordinates: endpoint.coordinates,
        }
    }
}

/// 分阶段的事件明细
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimelineDetails {
    Harvest {
        producer: String,
        batch_code: String,
        quantity: f64,
        unit: String,
        quality_grade: Option<String>,
    },
    Processing {
        facility_name: Option<String>,
        certifications: Vec<String>,
        end_date: Option<DateTime<Utc>>,
    },
    Departure {
        transport_code: String,
        transporter: String,
        origin: String,
        destination: String,
        vehicle: Option<String>,
        driver: Option<String>,
    },
    Arrival {
        transport_code: String,
        transporter: String,
        origin: String,
        destination: String,
    },
    Stocked {
        retailer: String,
        store_name: Option<String>,
        sku: String,
        quantity: f64,
        price: f64,
        currency: String,
    },
}

// ==========================================
// 报告分块
// ==========================================

/// 批次摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub id: SurrogateId,
    pub batch_code: String,
    pub product_name: String,
    pub quantity: f64,
    pub unit: String,
    pub quality_grade: Option<String>,
    pub organic_certified: bool,
    pub pesticide_residue: Option<String>,
    pub status: BatchLifecycleStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 生产者信息 + 产地/加工/仓储
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProducerInfo {
    pub producer: PartyProfile,
    pub display_name: String,
    pub harvest_date: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,
    pub farm_location: Option<GeoPoint>,
    pub processing_details: Option<ProcessingDetails>,
    pub storage_conditions: Option<StorageConditions>,
}

/// 参与方联系信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyContact {
    pub name: String,
    pub contact: Option<String>,
    pub email: String,
}

impl PartyContact {
    pub fn from_profile(profile: &PartyProfile) -> Self {
        Self {
            name: profile.display_name(),
            contact: profile.contact_number.clone(),
            email: profile.email.clone(),
        }
    }
}

/// 运输履历条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportHistoryEntry {
    pub transport_code: String,
    pub transporter: PartyContact,
    pub origin: LegEndpoint,
    pub destination: LegEndpoint,
    pub departure_time: Option<DateTime<Utc>>,
    pub estimated_arrival_time: Option<DateTime<Utc>>,
    pub actual_arrival_time: Option<DateTime<Utc>>,
    pub vehicle: Option<VehicleDetails>,
    pub driver: Option<DriverDetails>,
    pub temperature_logs: Vec<TemperatureSample>,
    pub condition_notes: Option<String>,
    pub status: DeliveryStatus,

    // ===== 冷链评估 (读时计算) =====
    pub risk_flag: RiskFlag,
    pub max_temperature_celsius: Option<f64>,
    pub high_risk_samples: usize,

    /// 无坐标时为空,不影响整份报告
    pub route: Option<RouteEstimate>,
}

/// 零售商 + 门店
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetailerContact {
    pub name: String,
    pub contact: Option<String>,
    pub email: String,
    pub store_name: Option<String>,
    pub store_address: Option<String>,
}

/// 零售网点条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetailLocationEntry {
    pub retailer: RetailerContact,
    pub sku: String,
    pub product_name: Option<String>,
    pub quantity_available: f64,
    pub unit_price: f64,
    pub currency: String,
    pub quality_status: Option<String>,
    pub status: InventoryStatus,
    pub location: Option<GeoPoint>,
    pub shelf_date: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>, // 生效保质期
    pub last_restocked: Option<DateTime<Utc>>,
    pub last_sold: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JourneySummary {
    pub total_transport_steps: usize,
    pub total_retail_locations: usize,
    pub total_journey_days: i64,
    pub current_status: JourneyStatus,
}

// ==========================================
// TraceabilityReport - 追溯报告
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceabilityReport {
    pub batch_info: BatchSummary,
    pub producer_info: ProducerInfo,
    pub transport_history: Vec<TransportHistoryEntry>,
    pub retail_locations: Vec<RetailLocationEntry>,
    pub timeline: Vec<TimelineEvent>,
    pub summary: JourneySummary,
    pub trace_url: String,
}
