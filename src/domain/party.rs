// ==========================================
// 农产品供应链追溯系统 - 参与方领域模型
// ==========================================
// 职责: 生产者 / 承运人 / 零售商账号的展示字段,零售门店
// 说明: 账号凭证由外部身份服务管理,这里只保留只读展示信息
// ==========================================

use crate::domain::types::GeoPoint;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 账号角色
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartyRole {
    #[serde(rename = "ROLE_FARMER")]
    Farmer,
    #[serde(rename = "ROLE_DISTRIBUTOR")]
    Distributor,
    #[serde(rename = "ROLE_RETAILER")]
    Retailer,
    #[serde(rename = "ROLE_CONSUMER")]
    Consumer,
    #[serde(rename = "ROLE_ADMIN")]
    Admin,
}

impl PartyRole {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            PartyRole::Farmer => "ROLE_FARMER",
            PartyRole::Distributor => "ROLE_DISTRIBUTOR",
            PartyRole::Retailer => "ROLE_RETAILER",
            PartyRole::Consumer => "ROLE_CONSUMER",
            PartyRole::Admin => "ROLE_ADMIN",
        }
    }

    pub fn from_db_str(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "ROLE_FARMER" => PartyRole::Farmer,
            "ROLE_DISTRIBUTOR" => PartyRole::Distributor,
            "ROLE_RETAILER" => PartyRole::Retailer,
            "ROLE_ADMIN" => PartyRole::Admin,
            _ => PartyRole::Consumer,
        }
    }
}

impl fmt::Display for PartyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}

// ==========================================
// PostalAddress - 邮寄地址
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostalAddress {
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

// ==========================================
// PartyProfile - 账号展示信息
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyProfile {
    pub party_id: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub contact_number: Option<String>,
    pub role: PartyRole,
    pub address: Option<PostalAddress>,
}

impl PartyProfile {
    /// 展示名: "名 姓"
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

// ==========================================
// RetailStore - 零售门店
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetailStore {
    pub store_id: String,
    pub shop_name: String,
    pub location: String, // 门店地址 (自由文本)
    pub coordinates: Option<GeoPoint>,
}
