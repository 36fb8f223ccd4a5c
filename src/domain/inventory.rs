// ==========================================
// 农产品供应链追溯系统 - 零售库存领域模型
// ==========================================
// 用途: 零售商上架某批次后的一条库存记录
// 约束: SKU 在全部库存中唯一
// ==========================================

use crate::domain::party::{PartyProfile, RetailStore};
use crate::domain::types::{InventoryStatus, SurrogateId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// InventoryEntry - 库存记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryEntry {
    pub id: SurrogateId,
    pub sku: String,
    pub batch_id: SurrogateId,
    pub retailer: PartyProfile,       // 零售商 (已解析)
    pub store: Option<RetailStore>,   // 门店 (可选)
    pub product_name: Option<String>,

    // ===== 数量与价格 =====
    pub quantity_available: f64,
    pub unit_price: f64,
    pub currency: String,

    // ===== 状态 =====
    pub quality_status: Option<String>,
    pub status: InventoryStatus,

    // ===== 时间 =====
    pub shelf_date: Option<DateTime<Utc>>,
    pub expiry_date: Option<DateTime<Utc>>, // 门店级保质期覆盖
    pub last_restocked: Option<DateTime<Utc>>,
    pub last_sold: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InventoryEntry {
    /// 在架可售: 状态为 available 且数量大于 0
    pub fn is_available(&self) -> bool {
        self.status == InventoryStatus::Available && self.quantity_available > 0.0
    }

    /// 上架时间 (缺失时回退到记录创建时间)
    pub fn stocked_at(&self) -> DateTime<Utc> {
        self.shelf_date.unwrap_or(self.created_at)
    }

    /// 生效保质期: 门店覆盖值优先,否则取批次保质期
    pub fn effective_expiry(&self, batch_expiry: DateTime<Utc>) -> DateTime<Utc> {
        self.expiry_date.unwrap_or(batch_expiry)
    }

    pub fn store_name(&self) -> Option<&str> {
        self.store.as_ref().map(|s| s.shop_name.as_str())
    }
}
