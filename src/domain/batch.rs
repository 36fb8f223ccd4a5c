// ==========================================
// 农产品供应链追溯系统 - 产品批次领域模型
// ==========================================
// 用途: 一个采收批次 (一行一批,不拆分不合并)
// 归属: 创建该批次的生产者账号
// ==========================================

use crate::domain::party::PartyProfile;
use crate::domain::types::{BatchLifecycleStatus, GeoPoint, SurrogateId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// ProcessingDetails - 加工信息
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingDetails {
    #[serde(default)]
    pub facility_name: Option<String>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub certifications: Vec<String>,
}

// ==========================================
// StorageConditions - 仓储条件 (自由文本)
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageConditions {
    #[serde(default)]
    pub temperature: Option<String>,
    #[serde(default)]
    pub humidity: Option<String>,
    #[serde(default)]
    pub other_conditions: Option<String>,
}

// ==========================================
// Batch - 产品批次
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    pub id: SurrogateId,         // 代理主键
    pub batch_code: String,      // 批次号 (全局唯一)
    pub product_name: String,    // 产品名称
    pub producer: PartyProfile,  // 生产者 (已解析)

    // ===== 采收与保质 =====
    pub harvest_date: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,

    // ===== 数量与质量 =====
    pub quantity: f64,
    pub unit: String,
    pub quality_grade: Option<String>,
    pub organic_certified: bool,
    pub pesticide_residue: Option<String>,

    // ===== 产地与加工 =====
    pub farm_location: Option<GeoPoint>,
    pub processing_details: Option<ProcessingDetails>,
    pub storage_conditions: Option<StorageConditions>,

    pub status: BatchLifecycleStatus,
    pub notes: Option<String>,

    // ===== 元数据 =====
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Batch {
    /// 是否已过期 (严格晚于保质期才算过期)
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expiry_date
    }

    /// 保质期是否晚于采收日期
    ///
    /// 该约束由批次登记方负责校验,读侧只做告警,不中断
    pub fn has_valid_shelf_life(&self) -> bool {
        self.expiry_date > self.harvest_date
    }
}
