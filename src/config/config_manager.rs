// ==========================================
// 农产品供应链追溯系统 - 配置管理器
// ==========================================
// 职责: 从 config_kv 表读取追溯参数覆写
// 存储: config_kv 表 (key-value + scope,只读 scope_id='global')
// ==========================================

use crate::config::trace_config::{RiskRouteConfig, TraceConfig};
use crate::db::open_sqlite_connection;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// 配置层错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置库访问失败: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("配置库锁获取失败: {0}")]
    LockError(String),
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    pub fn new(db_path: &str) -> Result<Self, ConfigError> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 读取 global scope 的配置值
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, ConfigError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ConfigError::LockError(e.to_string()))?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 获取所有 global 配置的快照
    pub fn get_config_snapshot(&self) -> Result<HashMap<String, String>, ConfigError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ConfigError::LockError(e.to_string()))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut snapshot = HashMap::new();
        for row in rows {
            let (key, value) = row?;
            snapshot.insert(key, value);
        }
        Ok(snapshot)
    }

    /// 加载追溯配置 (默认值 + 覆写)
    ///
    /// # 说明
    /// - 配置不存在: 使用默认值
    /// - 配置格式错误或取值非法: 告警后使用默认值
    pub fn load_trace_config(&self) -> Result<TraceConfig, ConfigError> {
        let defaults = TraceConfig::default();

        let risk_threshold_celsius = self.read_f64(
            config_keys::RISK_THRESHOLD_CELSIUS,
            defaults.risk_route.risk_threshold_celsius,
            |v| v.is_finite(),
        )?;
        let nominal_speed_kmh = self.read_f64(
            config_keys::NOMINAL_SPEED_KMH,
            defaults.risk_route.nominal_speed_kmh,
            |v| v.is_finite() && v > 0.0,
        )?;

        let public_base_url = match self.get_global_config_value(config_keys::PUBLIC_BASE_URL)? {
            Some(url) if !url.trim().is_empty() => url.trim().to_string(),
            _ => defaults.public_base_url,
        };

        let search_limit = match self.get_global_config_value(config_keys::SEARCH_LIMIT)? {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(limit) if limit > 0 => limit,
                _ => {
                    tracing::warn!(
                        config_key = config_keys::SEARCH_LIMIT,
                        raw_value = %raw,
                        "搜索上限配置非法，使用默认值"
                    );
                    defaults.search_limit
                }
            },
            None => defaults.search_limit,
        };

        Ok(TraceConfig {
            risk_route: RiskRouteConfig {
                risk_threshold_celsius,
                nominal_speed_kmh,
            },
            public_base_url,
            search_limit,
        })
    }

    fn read_f64(
        &self,
        key: &str,
        default: f64,
        is_valid: impl Fn(f64) -> bool,
    ) -> Result<f64, ConfigError> {
        let raw = match self.get_global_config_value(key)? {
            Some(raw) => raw,
            None => return Ok(default),
        };

        match raw.trim().parse::<f64>() {
            Ok(value) if is_valid(value) => Ok(value),
            _ => {
                tracing::warn!(
                    config_key = key,
                    raw_value = %raw,
                    "配置格式错误，使用默认值"
                );
                Ok(default)
            }
        }
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 冷链
    pub const RISK_THRESHOLD_CELSIUS: &str = "risk_threshold_celsius";

    // 路线估算
    pub const NOMINAL_SPEED_KMH: &str = "nominal_speed_kmh";

    // 公开追溯页面
    pub const PUBLIC_BASE_URL: &str = "public_base_url";

    // 产品搜索
    pub const SEARCH_LIMIT: &str = "search_limit";
}
