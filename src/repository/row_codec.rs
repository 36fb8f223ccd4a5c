// ==========================================
// 农产品供应链追溯系统 - 行解码工具
// ==========================================
// 职责: 时间/JSON/坐标/参与方字段的统一解码
// 约定:
// - 必填时间解析失败 → FieldValueError (整行失败)
// - 可选时间/JSON 解析失败 → 告警后置空 (降级,不中断)
// ==========================================

use crate::domain::party::{PartyProfile, PartyRole, PostalAddress};
use crate::domain::transport::LegEndpoint;
use crate::domain::types::{GeoPoint, SurrogateId};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::Row;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// 时间写入格式: RFC 3339,毫秒精度,UTC (Z 结尾,可按字典序排序)
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// 解析时间文本
///
/// # 支持格式
/// - RFC 3339 (`2023-10-03T08:00:00Z` / 带时区偏移)
/// - `YYYY-MM-DD HH:MM:SS` (按 UTC)
/// - `YYYY-MM-DD` (当日 00:00 UTC)
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub(crate) fn required_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    parse_timestamp(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("无法解析时间: {}", raw).into(),
        )
    })
}

pub(crate) fn optional_timestamp(
    row: &Row<'_>,
    idx: usize,
    field: &str,
) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.get(idx)?;
    Ok(raw.and_then(|s| {
        let parsed = parse_timestamp(&s);
        if parsed.is_none() && !s.trim().is_empty() {
            tracing::warn!(field, raw_value = %s, "时间字段无法解析，按缺失处理");
        }
        parsed
    }))
}

pub(crate) fn optional_json<T: DeserializeOwned>(
    row: &Row<'_>,
    idx: usize,
    field: &str,
) -> rusqlite::Result<Option<T>> {
    let raw: Option<String> = row.get(idx)?;
    Ok(raw.and_then(|s| match serde_json::from_str::<T>(&s) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(field, error = %e, "JSON 字段无法解析，按缺失处理");
            None
        }
    }))
}

pub(crate) fn optional_point(
    row: &Row<'_>,
    lng_idx: usize,
    lat_idx: usize,
) -> rusqlite::Result<Option<GeoPoint>> {
    let lng: Option<f64> = row.get(lng_idx)?;
    let lat: Option<f64> = row.get(lat_idx)?;
    Ok(match (lng, lat) {
        (Some(lng), Some(lat)) => Some(GeoPoint::new(lng, lat)),
        _ => None,
    })
}

pub(crate) fn surrogate_id(row: &Row<'_>, idx: usize) -> rusqlite::Result<SurrogateId> {
    let raw: String = row.get(idx)?;
    SurrogateId::parse(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("非法代理主键: {}", raw).into(),
        )
    })
}

// ==========================================
// 参与方列 (JOIN party 时使用)
// ==========================================

/// 参与方列清单,共 8 列
pub(crate) fn party_columns(alias: &str) -> String {
    format!(
        "{a}.party_id, {a}.username, {a}.email, {a}.first_name, {a}.last_name, \
         {a}.contact_number, {a}.role, {a}.address_json",
        a = alias
    )
}

pub(crate) const PARTY_COLUMN_COUNT: usize = 8;

pub(crate) fn party_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<PartyProfile> {
    Ok(PartyProfile {
        party_id: row.get(offset)?,
        username: row.get(offset + 1)?,
        email: row.get(offset + 2)?,
        first_name: row.get(offset + 3)?,
        last_name: row.get(offset + 4)?,
        contact_number: row.get(offset + 5)?,
        role: PartyRole::from_db_str(&row.get::<_, String>(offset + 6)?),
        address: optional_json::<PostalAddress>(row, offset + 7, "party.address_json")?,
    })
}

// ==========================================
// 运输起止点 JSON 文档
// ==========================================
// 格式: {"locationName": "...", "address": {...}, "coordinates": [lng, lat]}
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EndpointDoc {
    location_name: String,
    #[serde(default)]
    address: Option<PostalAddress>,
    #[serde(default)]
    coordinates: Option<Vec<f64>>,
}

impl From<EndpointDoc> for LegEndpoint {
    fn from(doc: EndpointDoc) -> Self {
        let coordinates = match doc.coordinates.as_deref() {
            Some([lng, lat]) => Some(GeoPoint::new(*lng, *lat)),
            _ => None,
        };
        LegEndpoint {
            location_name: doc.location_name,
            address: doc.address,
            coordinates,
        }
    }
}

pub(crate) fn required_endpoint(row: &Row<'_>, idx: usize) -> rusqlite::Result<LegEndpoint> {
    let raw: String = row.get(idx)?;
    serde_json::from_str::<EndpointDoc>(&raw)
        .map(LegEndpoint::from)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_timestamp_多种格式() {
        let expected = Utc.with_ymd_and_hms(2023, 10, 3, 0, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2023-10-03"), Some(expected));
        assert_eq!(parse_timestamp("2023-10-03 00:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2023-10-03T00:00:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2023-10-03T02:00:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("not a date"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn test_format_timestamp_可回读() {
        let ts = Utc.with_ymd_and_hms(2023, 10, 1, 6, 30, 0).unwrap();
        let text = format_timestamp(ts);
        assert_eq!(text, "2023-10-01T06:30:00.000Z");
        assert_eq!(parse_timestamp(&text), Some(ts));
    }

    #[test]
    fn test_endpoint_doc_坐标缺失() {
        let doc: EndpointDoc =
            serde_json::from_str(r#"{"locationName":"Farm ABC","coordinates":[1.0]}"#).unwrap();
        let endpoint = LegEndpoint::from(doc);
        assert_eq!(endpoint.location_name, "Farm ABC");
        assert!(endpoint.coordinates.is_none());
    }
}
