// ==========================================
// 农产品供应链追溯系统 - 运输领域模型
// ==========================================
// 用途: 批次的一段运输 (一个批次可有多段运输)
// 温度日志: 只追加,按记录顺序保存
// ==========================================

use crate::domain::party::{PartyProfile, PostalAddress};
use crate::domain::types::{DeliveryStatus, GeoPoint, RiskFlag, SurrogateId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// LegEndpoint - 运输起点/终点
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegEndpoint {
    pub location_name: String,
    pub address: Option<PostalAddress>,
    pub coordinates: Option<GeoPoint>,
}

impl LegEndpoint {
    /// 地址摘要: "地点名, 城市, 州/省" (缺失部分保留为空串)
    pub fn address_line(&self) -> String {
        let city = self
            .address
            .as_ref()
            .and_then(|a| a.city.as_deref())
            .unwrap_or("");
        let state = self
            .address
            .as_ref()
            .and_then(|a| a.state.as_deref())
            .unwrap_or("");
        format!("{}, {}, {}", self.location_name, city, state)
    }
}

// ==========================================
// 车辆与司机
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDetails {
    #[serde(default)]
    pub vehicle_type: Option<String>,
    #[serde(default)]
    pub vehicle_number: Option<String>,
    #[serde(default)]
    pub capacity: Option<String>,
    #[serde(default)]
    pub refrigerated: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverDetails {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub license_number: Option<String>,
    #[serde(default)]
    pub contact_number: Option<String>,
}

// ==========================================
// TemperatureSample - 温度采样
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureSample {
    pub timestamp: Option<DateTime<Utc>>,
    pub temperature_celsius: f64,
    pub location: Option<GeoPoint>,
}

// ==========================================
// TransportLeg - 运输段
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportLeg {
    pub id: SurrogateId,
    pub transport_code: String,      // 运输单号 (全局唯一)
    pub batch_id: SurrogateId,       // 所属批次
    pub transporter: PartyProfile,   // 承运人 (已解析)

    // ===== 路线 =====
    pub origin: LegEndpoint,
    pub destination: LegEndpoint,

    // ===== 时间 =====
    pub departure_time: Option<DateTime<Utc>>,
    pub estimated_arrival_time: Option<DateTime<Utc>>,
    pub actual_arrival_time: Option<DateTime<Utc>>, // 送达前为空

    // ===== 车辆与司机 =====
    pub vehicle: Option<VehicleDetails>,
    pub driver: Option<DriverDetails>,

    // ===== 冷链 =====
    pub temperature_logs: Vec<TemperatureSample>,
    pub risk_flag: RiskFlag, // 落库时的风险标记

    pub status: DeliveryStatus,
    pub condition_notes: Option<String>,

    // ===== 元数据 =====
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TransportLeg {
    pub fn has_arrived(&self) -> bool {
        self.actual_arrival_time.is_some()
    }

    /// 最近一次温度采样
    ///
    /// 缺失时间戳视为最早;时间戳相同时取日志中靠后的一条
    pub fn latest_temperature_sample(&self) -> Option<&TemperatureSample> {
        self.temperature_logs
            .iter()
            .enumerate()
            .max_by_key(|(idx, sample)| (sample.timestamp, *idx))
            .map(|(_, sample)| sample)
    }
}

// ==========================================
// RouteEstimate - 路线估算
// ==========================================
// 说明: 球面距离 + 名义车速推算,不是真实路径规划
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteEstimate {
    pub distance_meters: u64,
    pub duration_seconds: u64,
    pub distance_text: String,
    pub duration_text: String,
    pub start_address: Option<String>,
    pub end_address: Option<String>,
}

impl RouteEstimate {
    /// 附加起止地址摘要
    pub fn with_addresses(mut self, origin: &LegEndpoint, destination: &LegEndpoint) -> Self {
        self.start_address = Some(origin.address_line());
        self.end_address = Some(destination.address_line());
        self
    }
}
