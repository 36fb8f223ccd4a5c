// ==========================================
// 农产品供应链追溯系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发读写时的偶发 busy 错误
// - 提供幂等建表 (批次 / 运输 / 温度日志 / 库存 / 参与方 / 配置)
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

/// 初始化数据库 schema（幂等）
///
/// # 说明
/// - 时间字段统一存 RFC 3339 文本 (UTC)
/// - 地址/加工/车辆等子文档存 JSON 文本
/// - 坐标按 (longitude, latitude) 拆列存储
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS party (
            party_id TEXT PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            contact_number TEXT,
            role TEXT NOT NULL,
            address_json TEXT
        );

        CREATE TABLE IF NOT EXISTS retail_store (
            store_id TEXT PRIMARY KEY,
            shop_name TEXT NOT NULL,
            location TEXT NOT NULL,
            longitude REAL,
            latitude REAL,
            manager_id TEXT REFERENCES party(party_id)
        );

        CREATE TABLE IF NOT EXISTS product_batch (
            batch_id TEXT PRIMARY KEY,
            batch_code TEXT NOT NULL UNIQUE,
            product_name TEXT NOT NULL,
            producer_id TEXT NOT NULL REFERENCES party(party_id),
            harvest_date TEXT NOT NULL,
            expiry_date TEXT NOT NULL,
            quantity REAL NOT NULL DEFAULT 0,
            unit TEXT NOT NULL,
            quality_grade TEXT,
            organic_certified INTEGER NOT NULL DEFAULT 0,
            pesticide_residue TEXT,
            farm_longitude REAL,
            farm_latitude REAL,
            processing_json TEXT,
            storage_json TEXT,
            status TEXT NOT NULL DEFAULT 'active',
            notes TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_product_batch_producer ON product_batch(producer_id);

        CREATE TABLE IF NOT EXISTS transport_leg (
            leg_id TEXT PRIMARY KEY,
            transport_code TEXT NOT NULL UNIQUE,
            batch_id TEXT NOT NULL REFERENCES product_batch(batch_id),
            transporter_id TEXT NOT NULL REFERENCES party(party_id),
            origin_json TEXT NOT NULL,
            destination_json TEXT NOT NULL,
            departure_time TEXT,
            estimated_arrival_time TEXT,
            actual_arrival_time TEXT,
            vehicle_json TEXT,
            driver_json TEXT,
            risk_flag TEXT NOT NULL DEFAULT 'Normal',
            status TEXT NOT NULL DEFAULT 'pending',
            condition_notes TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_transport_leg_batch ON transport_leg(batch_id, departure_time);

        CREATE TABLE IF NOT EXISTS temperature_log (
            leg_id TEXT NOT NULL REFERENCES transport_leg(leg_id) ON DELETE CASCADE,
            seq_no INTEGER NOT NULL,
            recorded_at TEXT,
            temperature_c REAL NOT NULL,
            longitude REAL,
            latitude REAL,
            PRIMARY KEY (leg_id, seq_no)
        );

        CREATE TABLE IF NOT EXISTS store_inventory (
            inventory_id TEXT PRIMARY KEY,
            sku TEXT NOT NULL UNIQUE,
            batch_id TEXT NOT NULL REFERENCES product_batch(batch_id),
            retailer_id TEXT NOT NULL REFERENCES party(party_id),
            store_id TEXT REFERENCES retail_store(store_id),
            product_name TEXT,
            quantity_available REAL NOT NULL DEFAULT 0,
            unit_price REAL NOT NULL DEFAULT 0,
            currency TEXT NOT NULL DEFAULT 'USD',
            quality_status TEXT,
            status TEXT NOT NULL DEFAULT 'available',
            shelf_date TEXT,
            expiry_date TEXT,
            last_restocked TEXT,
            last_sold TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_store_inventory_batch ON store_inventory(batch_id);
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}
