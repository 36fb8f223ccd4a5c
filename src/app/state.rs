// ==========================================
// 农产品供应链追溯系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// 装配顺序: 连接 → 建表 → 配置 → 仓储 → API
// ==========================================

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::api::{TraceabilityApi, TransportApi};
use crate::config::{ConfigManager, TraceConfig};
use crate::db::{init_schema, open_sqlite_connection};
use crate::repository::{SqliteTraceRecordReader, TraceRecordReader};

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "FARM_TRACE_DB";

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 生效配置 (默认值 + config_kv 覆写)
    pub config: TraceConfig,

    /// 追溯查询API
    pub trace_api: Arc<TraceabilityApi>,

    /// 运输路线API
    pub transport_api: Arc<TransportApi>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    ///
    /// # 返回
    /// - Ok(AppState): 应用状态实例
    /// - Err(String): 初始化错误
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        init_schema(&conn).map_err(|e| format!("无法初始化数据库结构: {}", e))?;

        Ok(Self::from_connection(db_path, Arc::new(Mutex::new(conn))))
    }

    /// 从已有连接装配 (连接需已完成建表)
    pub fn from_connection(db_path: String, conn: Arc<Mutex<Connection>>) -> Self {
        let config_manager = ConfigManager::from_connection(conn.clone());
        let config = match config_manager.load_trace_config() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("读取配置失败，使用默认配置: {}", e);
                TraceConfig::default()
            }
        };

        let reader: Arc<dyn TraceRecordReader> = Arc::new(SqliteTraceRecordReader::new(conn));
        let trace_api = Arc::new(TraceabilityApi::new(reader.clone(), config.clone()));
        let transport_api = Arc::new(TransportApi::new(reader, config.risk_route));

        tracing::info!(
            risk_threshold_celsius = config.risk_route.risk_threshold_celsius,
            nominal_speed_kmh = config.risk_route.nominal_speed_kmh,
            "AppState初始化完成"
        );

        Self {
            db_path,
            config,
            trace_api,
            transport_api,
        }
    }
}

/// 获取默认数据库路径
///
/// # 优先级
/// 1. 环境变量 FARM_TRACE_DB
/// 2. 用户本地数据目录下的 farm-trace/farm_trace.db
/// 3. 当前目录 ./farm_trace.db
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    match dirs::data_local_dir() {
        Some(data_dir) => {
            let dir = data_dir.join("farm-trace");
            // 目录创建失败时回退到当前目录
            if std::fs::create_dir_all(&dir).is_ok() {
                dir.join("farm_trace.db").to_string_lossy().to_string()
            } else {
                "./farm_trace.db".to_string()
            }
        }
        None => "./farm_trace.db".to_string(),
    }
}
