// ==========================================
// 农产品供应链追溯系统 - 零售库存仓储
// ==========================================
// 红线: Repository 不含业务逻辑,只读
// 说明: JOIN party 解析零售商, LEFT JOIN retail_store 解析门店
// ==========================================

use crate::domain::inventory::InventoryEntry;
use crate::domain::party::RetailStore;
use crate::domain::types::{InventoryStatus, SurrogateId};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_codec::{
    optional_point, optional_timestamp, party_columns, party_from_row, required_timestamp,
    surrogate_id, PARTY_COLUMN_COUNT,
};
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

/// 库存列数 (不含参与方列与门店列)
const INVENTORY_COLUMN_COUNT: usize = 15;

/// 门店列起始下标
const STORE_OFFSET: usize = INVENTORY_COLUMN_COUNT + PARTY_COLUMN_COUNT;

fn map_inventory_row(row: &Row<'_>) -> SqliteResult<InventoryEntry> {
    let store_id: Option<String> = row.get(STORE_OFFSET)?;
    let store = match store_id {
        Some(store_id) => Some(RetailStore {
            store_id,
            shop_name: row.get(STORE_OFFSET + 1)?,
            location: row.get(STORE_OFFSET + 2)?,
            coordinates: optional_point(row, STORE_OFFSET + 3, STORE_OFFSET + 4)?,
        }),
        None => None,
    };

    Ok(InventoryEntry {
        id: surrogate_id(row, 0)?,
        sku: row.get(1)?,
        batch_id: surrogate_id(row, 2)?,
        product_name: row.get(3)?,
        quantity_available: row.get(4)?,
        unit_price: row.get(5)?,
        currency: row.get(6)?,
        quality_status: row.get(7)?,
        status: InventoryStatus::from_db_str(&row.get::<_, String>(8)?),
        shelf_date: optional_timestamp(row, 9, "store_inventory.shelf_date")?,
        expiry_date: optional_timestamp(row, 10, "store_inventory.expiry_date")?,
        last_restocked: optional_timestamp(row, 11, "store_inventory.last_restocked")?,
        last_sold: optional_timestamp(row, 12, "store_inventory.last_sold")?,
        created_at: required_timestamp(row, 13)?,
        updated_at: required_timestamp(row, 14)?,
        retailer: party_from_row(row, INVENTORY_COLUMN_COUNT)?,
        store,
    })
}

// ==========================================
// InventoryRepository - 零售库存仓储
// ==========================================
pub struct InventoryRepository {
    conn: Arc<Mutex<Connection>>,
}

impl InventoryRepository {
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

    /// 查询批次的全部库存记录 (顺序无业务含义,按 SKU 排序保证稳定输出)
    pub fn find_by_batch(&self, batch_id: &SurrogateId) -> RepositoryResult<Vec<InventoryEntry>> {
        let conn = self.get_conn()?;
        let sql = format!(
            r#"
            SELECT
                i.inventory_id, i.sku, i.batch_id, i.product_name,
                i.quantity_available, i.unit_price, i.currency,
                i.quality_status, i.status,
                i.shelf_date, i.expiry_date, i.last_restocked, i.last_sold,
                i.created_at, i.updated_at,
                {party},
                s.store_id, s.shop_name, s.location, s.longitude, s.latitude
            FROM store_inventory i
            JOIN party p ON p.party_id = i.retailer_id
            LEFT JOIN retail_store s ON s.store_id = i.store_id
            WHERE i.batch_id = ?1
            ORDER BY i.sku ASC
            "#,
            party = party_columns("p"),
        );

        let mut stmt = conn.prepare(&sql)?;
        let entries = stmt
            .query_map(params![batch_id.as_str()], map_inventory_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(entries)
    }

    /// 统计批次的库存记录数量
    pub fn count_by_batch(&self, batch_id: &SurrogateId) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM store_inventory WHERE batch_id = ?1",
            params![batch_id.as_str()],
            |row| row.get(0),
        )?;
        Ok(count.max(0) as usize)
    }
}
