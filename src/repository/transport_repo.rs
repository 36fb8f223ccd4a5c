// ==========================================
// 农产品供应链追溯系统 - 运输段仓储
// ==========================================
// 红线: Repository 不含业务逻辑,只读
// 基数: 一个批次可有多段运输 (按出发时间升序返回)
// ==========================================

use crate::domain::transport::{DriverDetails, TemperatureSample, TransportLeg, VehicleDetails};
use crate::domain::types::{DeliveryStatus, RiskFlag, SurrogateId};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_codec::{
    optional_json, optional_point, optional_timestamp, party_columns, party_from_row,
    required_endpoint, required_timestamp, surrogate_id,
};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// 运输段列数 (不含参与方列)
const LEG_COLUMN_COUNT: usize = 15;

fn select_leg_sql(where_clause: &str) -> String {
    format!(
        r#"
        SELECT
            l.leg_id, l.transport_code, l.batch_id,
            l.origin_json, l.destination_json,
            l.departure_time, l.estimated_arrival_time, l.actual_arrival_time,
            l.vehicle_json, l.driver_json,
            l.risk_flag, l.status, l.condition_notes,
            l.created_at, l.updated_at,
            {party}
        FROM transport_leg l
        JOIN party p ON p.party_id = l.transporter_id
        {where_clause}
        "#,
        party = party_columns("p"),
        where_clause = where_clause,
    )
}

fn map_leg_row(row: &Row<'_>) -> SqliteResult<TransportLeg> {
    Ok(TransportLeg {
        id: surrogate_id(row, 0)?,
        transport_code: row.get(1)?,
        batch_id: surrogate_id(row, 2)?,
        origin: required_endpoint(row, 3)?,
        destination: required_endpoint(row, 4)?,
        departure_time: optional_timestamp(row, 5, "transport_leg.departure_time")?,
        estimated_arrival_time: optional_timestamp(
            row,
            6,
            "transport_leg.estimated_arrival_time",
        )?,
        actual_arrival_time: optional_timestamp(row, 7, "transport_leg.actual_arrival_time")?,
        vehicle: optional_json::<VehicleDetails>(row, 8, "transport_leg.vehicle_json")?,
        driver: optional_json::<DriverDetails>(row, 9, "transport_leg.driver_json")?,
        risk_flag: RiskFlag::from_db_str(&row.get::<_, String>(10)?),
        status: DeliveryStatus::from_db_str(&row.get::<_, String>(11)?),
        condition_notes: row.get(12)?,
        created_at: required_timestamp(row, 13)?,
        updated_at: required_timestamp(row, 14)?,
        transporter: party_from_row(row, LEG_COLUMN_COUNT)?,
        temperature_logs: Vec::new(),
    })
}

fn map_sample_row(row: &Row<'_>) -> SqliteResult<(String, TemperatureSample)> {
    Ok((
        row.get(0)?,
        TemperatureSample {
            timestamp: optional_timestamp(row, 1, "temperature_log.recorded_at")?,
            temperature_celsius: row.get(2)?,
            location: optional_point(row, 3, 4)?,
        },
    ))
}

// ==========================================
// TransportLegRepository - 运输段仓储
// ==========================================
pub struct TransportLegRepository {
    conn: Arc<Mutex<Connection>>,
}

impl TransportLegRepository {
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

    /// 查询批次的全部运输段 (含温度日志)
    ///
    /// # 排序
    /// - 出发时间升序,缺失出发时间的排在最前
    /// - 出发时间相同按运输单号升序
    pub fn find_by_batch(&self, batch_id: &SurrogateId) -> RepositoryResult<Vec<TransportLeg>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(&select_leg_sql("WHERE l.batch_id = ?1"))?;
        let mut legs = stmt
            .query_map(params![batch_id.as_str()], map_leg_row)?
            .collect::<SqliteResult<Vec<_>>>()?;

        let mut log_stmt = conn.prepare(
            r#"
            SELECT t.leg_id, t.recorded_at, t.temperature_c, t.longitude, t.latitude
            FROM temperature_log t
            JOIN transport_leg l ON l.leg_id = t.leg_id
            WHERE l.batch_id = ?1
            ORDER BY t.leg_id ASC, t.seq_no ASC
            "#,
        )?;
        let mut logs_by_leg: HashMap<String, Vec<TemperatureSample>> = HashMap::new();
        for entry in log_stmt.query_map(params![batch_id.as_str()], map_sample_row)? {
            let (leg_id, sample) = entry?;
            logs_by_leg.entry(leg_id).or_default().push(sample);
        }

        for leg in legs.iter_mut() {
            if let Some(samples) = logs_by_leg.remove(leg.id.as_str()) {
                leg.temperature_logs = samples;
            }
        }

        legs.sort_by(|a, b| {
            a.departure_time
                .cmp(&b.departure_time)
                .then_with(|| a.transport_code.cmp(&b.transport_code))
        });
        Ok(legs)
    }

    /// 按运输单号查询单段运输 (含温度日志)
    pub fn find_by_code(&self, transport_code: &str) -> RepositoryResult<Option<TransportLeg>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(&select_leg_sql("WHERE l.transport_code = ?1"))?;
        let leg = stmt
            .query_row(params![transport_code], map_leg_row)
            .optional()?;

        let mut leg = match leg {
            Some(leg) => leg,
            None => return Ok(None),
        };

        let mut log_stmt = conn.prepare(
            r#"
            SELECT leg_id, recorded_at, temperature_c, longitude, latitude
            FROM temperature_log
            WHERE leg_id = ?1
            ORDER BY seq_no ASC
            "#,
        )?;
        leg.temperature_logs = log_stmt
            .query_map(params![leg.id.as_str()], map_sample_row)?
            .map(|entry| entry.map(|(_, sample)| sample))
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(Some(leg))
    }

    /// 统计批次的运输段数量
    pub fn count_by_batch(&self, batch_id: &SurrogateId) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM transport_leg WHERE batch_id = ?1",
            params![batch_id.as_str()],
            |row| row.get(0),
        )?;
        Ok(count.max(0) as usize)
    }
}
