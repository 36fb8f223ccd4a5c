// ==========================================
// 农产品供应链追溯系统 - 产品批次仓储
// ==========================================
// 红线: Repository 不含业务逻辑,只读
// 说明: 查询时 JOIN party,一次性解析生产者展示字段
// ==========================================

use crate::domain::batch::{Batch, ProcessingDetails, StorageConditions};
use crate::domain::types::{BatchLifecycleStatus, SurrogateId};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_codec::{
    optional_json, optional_point, party_columns, party_from_row, required_timestamp,
    surrogate_id,
};
use rusqlite::functions::FunctionFlags;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

/// 批次列数 (不含参与方列)
const BATCH_COLUMN_COUNT: usize = 18;

fn select_batch_sql(where_clause: &str) -> String {
    format!(
        r#"
        SELECT
            b.batch_id, b.batch_code, b.product_name,
            b.harvest_date, b.expiry_date,
            b.quantity, b.unit, b.quality_grade, b.organic_certified, b.pesticide_residue,
            b.farm_longitude, b.farm_latitude,
            b.processing_json, b.storage_json,
            b.status, b.notes, b.created_at, b.updated_at,
            {party}
        FROM product_batch b
        JOIN party p ON p.party_id = b.producer_id
        {where_clause}
        "#,
        party = party_columns("p"),
        where_clause = where_clause,
    )
}

fn map_batch_row(row: &Row<'_>) -> SqliteResult<Batch> {
    Ok(Batch {
        id: surrogate_id(row, 0)?,
        batch_code: row.get(1)?,
        product_name: row.get(2)?,
        harvest_date: required_timestamp(row, 3)?,
        expiry_date: required_timestamp(row, 4)?,
        quantity: row.get(5)?,
        unit: row.get(6)?,
        quality_grade: row.get(7)?,
        organic_certified: row.get::<_, i64>(8)? != 0,
        pesticide_residue: row.get(9)?,
        farm_location: optional_point(row, 10, 11)?,
        processing_details: optional_json::<ProcessingDetails>(
            row,
            12,
            "product_batch.processing_json",
        )?,
        storage_conditions: optional_json::<StorageConditions>(
            row,
            13,
            "product_batch.storage_json",
        )?,
        status: BatchLifecycleStatus::from_db_str(&row.get::<_, String>(14)?),
        notes: row.get(15)?,
        created_at: required_timestamp(row, 16)?,
        updated_at: required_timestamp(row, 17)?,
        producer: party_from_row(row, BATCH_COLUMN_COUNT)?,
    })
}

// ==========================================
// BatchRepository - 产品批次仓储
// ==========================================
pub struct BatchRepository {
    conn: Arc<Mutex<Connection>>,
}

impl BatchRepository {
    /// 从已有连接创建仓储实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 按批次号查询
    ///
    /// # 返回
    /// - Ok(Some(Batch)): 找到批次
    /// - Ok(None): 未找到
    /// - Err: 数据库错误
    pub fn find_by_code(&self, batch_code: &str) -> RepositoryResult<Option<Batch>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&select_batch_sql("WHERE b.batch_code = ?1"))?;
        let batch = stmt
            .query_row(params![batch_code], map_batch_row)
            .optional()?;
        Ok(batch)
    }

    /// 按代理主键查询
    pub fn find_by_id(&self, batch_id: &SurrogateId) -> RepositoryResult<Option<Batch>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&select_batch_sql("WHERE b.batch_id = ?1"))?;
        let batch = stmt
            .query_row(params![batch_id.as_str()], map_batch_row)
            .optional()?;
        Ok(batch)
    }

    /// 按产品名或批次号模糊搜索 (按 Unicode 规则不区分大小写)
    ///
    /// # 参数
    /// - `query`: 关键字 (按字面匹配,不含通配符语义)
    /// - `limit`: 结果上限
    pub fn search(&self, query: &str, limit: usize) -> RepositoryResult<Vec<Batch>> {
        let needle = fold_case(query.trim());
        let conn = self.get_conn()?;
        register_fold_case(&conn)?;

        let mut stmt = conn.prepare(&select_batch_sql(
            r#"
            WHERE instr(fold_case(b.product_name), ?1) > 0
               OR instr(fold_case(b.batch_code), ?1) > 0
            ORDER BY b.harvest_date DESC, b.batch_code ASC
            LIMIT ?2
            "#,
        ))?;

        let batches = stmt
            .query_map(params![needle, limit as i64], map_batch_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(batches)
    }
}

/// 大小写折叠 (SQLite 内置 lower/LIKE 只处理 ASCII)
fn fold_case(raw: &str) -> String {
    raw.to_lowercase()
}

/// 在连接上注册 fold_case(text) 标量函数 (重复注册会覆盖,幂等)
fn register_fold_case(conn: &Connection) -> SqliteResult<()> {
    conn.create_scalar_function(
        "fold_case",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let raw: Option<String> = ctx.get(0)?;
            Ok(raw.map(|s| fold_case(&s)))
        },
    )
}
