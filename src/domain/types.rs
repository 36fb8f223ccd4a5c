// ==========================================
// 农产品供应链追溯系统 - 领域类型定义
// ==========================================
// 职责: 状态枚举、风险标记、批次标识、坐标
// 约定: to_db_str / from_db_str 与数据库存储口径一致
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;
use uuid::Uuid;

// ==========================================
// 代理主键 (Surrogate Id)
// ==========================================
// 格式: 24 位十六进制字符串 (统一存为小写)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurrogateId(String);

impl SurrogateId {
    pub const LEN: usize = 24;

    /// 校验并构造代理主键
    ///
    /// # 返回
    /// - Some(SurrogateId): 长度为 24 且全部为十六进制字符
    /// - None: 格式不符
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.len() == Self::LEN && trimmed.chars().all(|c| c.is_ascii_hexdigit()) {
            Some(Self(trimmed.to_ascii_lowercase()))
        } else {
            None
        }
    }

    /// 生成新的代理主键 (取 UUID v4 的前 24 位十六进制)
    pub fn generate() -> Self {
        let hex = Uuid::new_v4().simple().to_string();
        Self(hex[..Self::LEN].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SurrogateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ==========================================
// 批次标识 (Batch Identifier)
// ==========================================
// 在 API 边界解析一次,下游不再做格式嗅探
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BatchIdentifier {
    /// 人类可读批次号 (如 BATCH-1234)
    ByCode(String),
    /// 代理主键
    BySurrogate(SurrogateId),
}

impl BatchIdentifier {
    /// 解析外部传入的标识
    ///
    /// # 规则
    /// - 空白字符串 → None
    /// - 24 位十六进制 → BySurrogate
    /// - 其余 → ByCode (去除首尾空白)
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        match SurrogateId::parse(trimmed) {
            Some(id) => Some(BatchIdentifier::BySurrogate(id)),
            None => Some(BatchIdentifier::ByCode(trimmed.to_string())),
        }
    }
}

impl fmt::Display for BatchIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchIdentifier::ByCode(code) => write!(f, "code:{}", code),
            BatchIdentifier::BySurrogate(id) => write!(f, "id:{}", id),
        }
    }
}

// ==========================================
// 地理坐标 (GeoPoint)
// ==========================================
// 存储顺序: [longitude, latitude]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// 坐标是否落在合法范围内
    pub fn is_valid(&self) -> bool {
        self.longitude.is_finite()
            && self.latitude.is_finite()
            && self.longitude.abs() <= 180.0
            && self.latitude.abs() <= 90.0
    }
}

// ==========================================
// 批次生命周期状态
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchLifecycleStatus {
    Active,   // 在售
    Inactive, // 停用
    Expired,  // 已过期
    Sold,     // 已售罄
}

impl BatchLifecycleStatus {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            BatchLifecycleStatus::Active => "active",
            BatchLifecycleStatus::Inactive => "inactive",
            BatchLifecycleStatus::Expired => "expired",
            BatchLifecycleStatus::Sold => "sold",
        }
    }

    pub fn parse_db_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Some(BatchLifecycleStatus::Active),
            "inactive" => Some(BatchLifecycleStatus::Inactive),
            "expired" => Some(BatchLifecycleStatus::Expired),
            "sold" => Some(BatchLifecycleStatus::Sold),
            _ => None,
        }
    }

    /// 未知取值记 warn 后按 Active 处理
    pub fn from_db_str(s: &str) -> Self {
        Self::parse_db_str(s).unwrap_or_else(|| {
            warn!(value = s, fallback = "active", "未知批次状态,按默认值处理");
            BatchLifecycleStatus::Active
        })
    }
}

impl fmt::Display for BatchLifecycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}

// ==========================================
// 运输状态 (Delivery Status)
// ==========================================
// 序列化格式: kebab-case (in-transit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeliveryStatus {
    Pending,   // 待发运
    InTransit, // 运输中
    Delivered, // 已送达
    Delayed,   // 延误
    Cancelled, // 已取消
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Pending => "pending",
            DeliveryStatus::InTransit => "in-transit",
            DeliveryStatus::Delivered => "delivered",
            DeliveryStatus::Delayed => "delayed",
            DeliveryStatus::Cancelled => "cancelled",
        }
    }

    /// 兼容 "In Transit" / "in_transit" / "Delivered" 等写法
    pub fn parse_db_str(s: &str) -> Option<Self> {
        let normalized: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .map(|c| if c == ' ' || c == '_' { '-' } else { c })
            .collect();
        match normalized.as_str() {
            "pending" => Some(DeliveryStatus::Pending),
            "in-transit" => Some(DeliveryStatus::InTransit),
            "delivered" => Some(DeliveryStatus::Delivered),
            "delayed" => Some(DeliveryStatus::Delayed),
            "cancelled" | "canceled" => Some(DeliveryStatus::Cancelled),
            _ => None,
        }
    }

    /// 未知取值记 warn 后按 Pending 处理
    pub fn from_db_str(s: &str) -> Self {
        Self::parse_db_str(s).unwrap_or_else(|| {
            warn!(value = s, fallback = "pending", "未知运输状态,按默认值处理");
            DeliveryStatus::Pending
        })
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==========================================
// 库存可售状态
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InventoryStatus {
    Available,    // 在架可售
    OutOfStock,   // 缺货
    Discontinued, // 下架
}

impl InventoryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InventoryStatus::Available => "available",
            InventoryStatus::OutOfStock => "out_of_stock",
            InventoryStatus::Discontinued => "discontinued",
        }
    }

    pub fn parse_db_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().replace([' ', '-'], "_").as_str() {
            "available" => Some(InventoryStatus::Available),
            "out_of_stock" => Some(InventoryStatus::OutOfStock),
            "discontinued" => Some(InventoryStatus::Discontinued),
            _ => None,
        }
    }

    /// 未知取值记 warn 后按 OutOfStock 处理 (不计入可售)
    pub fn from_db_str(s: &str) -> Self {
        Self::parse_db_str(s).unwrap_or_else(|| {
            warn!(value = s, fallback = "out_of_stock", "未知库存状态,按默认值处理");
            InventoryStatus::OutOfStock
        })
    }
}

impl fmt::Display for InventoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==========================================
// 冷链风险标记 (Risk Flag)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskFlag {
    Normal,
    #[serde(rename = "High Risk")]
    HighRisk,
}

impl RiskFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskFlag::Normal => "Normal",
            RiskFlag::HighRisk => "High Risk",
        }
    }

    pub fn parse_db_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().replace(['_', '-'], " ").as_str() {
            "normal" => Some(RiskFlag::Normal),
            "high risk" => Some(RiskFlag::HighRisk),
            _ => None,
        }
    }

    /// 未知取值记 warn 后按 Normal 处理
    pub fn from_db_str(s: &str) -> Self {
        Self::parse_db_str(s).unwrap_or_else(|| {
            warn!(value = s, fallback = "Normal", "未知风险标记,按默认值处理");
            RiskFlag::Normal
        })
    }
}

impl fmt::Display for RiskFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==========================================
// 当前流转状态 (读时推导,不落库)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JourneyStatus {
    Expired,           // 已过期
    AvailableAtRetail, // 零售在售
    SoldOut,           // 零售售罄
    InTransit,         // 运输中
    DeliveredToRetail, // 已送达零售
    WithProducer,      // 仍在产地
}

impl JourneyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JourneyStatus::Expired => "expired",
            JourneyStatus::AvailableAtRetail => "available_at_retail",
            JourneyStatus::SoldOut => "sold_out",
            JourneyStatus::InTransit => "in_transit",
            JourneyStatus::DeliveredToRetail => "delivered_to_retail",
            JourneyStatus::WithProducer => "with_producer",
        }
    }
}

impl fmt::Display for JourneyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==========================================
// 时间线阶段
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JourneyStage {
    Production,
    Processing,
    Transportation,
    Retail,
}

impl fmt::Display for JourneyStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JourneyStage::Production => write!(f, "Production"),
            JourneyStage::Processing => write!(f, "Processing"),
            JourneyStage::Transportation => write!(f, "Transportation"),
            JourneyStage::Retail => write!(f, "Retail"),
        }
    }
}
