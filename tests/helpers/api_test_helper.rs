// ==========================================
// API集成测试辅助工具
// ==========================================
// 职责: 提供API层集成测试的通用辅助函数
// 装配: 临时库 → 建表 → (可选)配置覆写 → AppState
// ==========================================
#![allow(dead_code)]

#[path = "../test_helpers.rs"]
mod test_helpers;

use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use tempfile::NamedTempFile;

use farm_trace::api::{TraceabilityApi, TransportApi};
use farm_trace::app::AppState;
use farm_trace::domain::batch::Batch;
use farm_trace::domain::inventory::InventoryEntry;
use farm_trace::domain::transport::TransportLeg;

use super::db_seeder::seed_journey;

// ==========================================
// API测试环境
// ==========================================

/// API测试环境
///
/// 包含 AppState 装配出的 API 实例,以及用于准备数据的共享连接
pub struct ApiTestEnv {
    pub db_path: String,
    pub conn: Arc<Mutex<Connection>>,
    pub state: AppState,

    // 临时文件（确保生命周期）
    _temp_file: NamedTempFile,
}

impl ApiTestEnv {
    /// 创建新的API测试环境 (默认配置)
    pub fn new() -> Result<Self, String> {
        Self::with_config(&[])
    }

    /// 创建API测试环境,装配前写入配置覆写
    ///
    /// # 参数
    /// - overrides: (key, value) 列表,写入 global scope
    pub fn with_config(overrides: &[(&str, &str)]) -> Result<Self, String> {
        let (temp_file, db_path) = test_helpers::create_test_db()
            .map_err(|e| format!("创建测试数据库失败: {}", e))?;

        let conn = test_helpers::open_test_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        for (key, value) in overrides {
            test_helpers::insert_test_config(&conn, key, value)
                .map_err(|e| format!("写入配置失败: {}", e))?;
        }
        let conn = Arc::new(Mutex::new(conn));

        let state = AppState::from_connection(db_path.clone(), conn.clone());

        Ok(Self {
            db_path,
            conn,
            state,
            _temp_file: temp_file,
        })
    }

    pub fn trace_api(&self) -> &TraceabilityApi {
        &self.state.trace_api
    }

    pub fn transport_api(&self) -> &TransportApi {
        &self.state.transport_api
    }

    /// 写入一条完整流转记录
    pub fn prepare_journey(
        &self,
        batch: &Batch,
        legs: &[TransportLeg],
        entries: &[InventoryEntry],
    ) -> Result<(), String> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| format!("锁获取失败: {}", e))?;
        seed_journey(&conn, batch, legs, entries).map_err(|e| format!("写入测试数据失败: {}", e))
    }

    /// 直接执行 SQL (构造脏数据等场景)
    pub fn execute_sql(&self, sql: &str) -> Result<usize, String> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(sql, []).map_err(|e| format!("执行 SQL 失败: {}", e))
    }
}
