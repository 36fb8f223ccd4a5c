// ==========================================
// 测试数据落库
// ==========================================
// 职责: 把构建器产出的领域对象按存储口径写入 SQLite
// 说明: 参与方/门店使用 INSERT OR IGNORE,可重复写入
// ==========================================
#![allow(dead_code)]

use std::error::Error;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde_json::json;

use farm_trace::domain::batch::Batch;
use farm_trace::domain::inventory::InventoryEntry;
use farm_trace::domain::party::{PartyProfile, RetailStore};
use farm_trace::domain::transport::{LegEndpoint, TransportLeg};
use farm_trace::repository::format_timestamp;

fn ts(value: DateTime<Utc>) -> String {
    format_timestamp(value)
}

fn opt_ts(value: Option<DateTime<Utc>>) -> Option<String> {
    value.map(format_timestamp)
}

fn endpoint_json(endpoint: &LegEndpoint) -> String {
    let coordinates = endpoint
        .coordinates
        .map(|p| json!([p.longitude, p.latitude]));
    json!({
        "locationName": endpoint.location_name,
        "address": endpoint.address,
        "coordinates": coordinates,
    })
    .to_string()
}

pub fn seed_party(conn: &Connection, party: &PartyProfile) -> Result<(), Box<dyn Error>> {
    let address_json = match &party.address {
        Some(address) => Some(serde_json::to_string(address)?),
        None => None,
    };
    conn.execute(
        r#"
        INSERT OR IGNORE INTO party (
            party_id, username, email, first_name, last_name,
            contact_number, role, address_json
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
        params![
            party.party_id,
            party.username,
            party.email,
            party.first_name,
            party.last_name,
            party.contact_number,
            party.role.to_db_str(),
            address_json,
        ],
    )?;
    Ok(())
}

pub fn seed_store(conn: &Connection, store: &RetailStore) -> Result<(), Box<dyn Error>> {
    conn.execute(
        r#"
        INSERT OR IGNORE INTO retail_store (store_id, shop_name, location, longitude, latitude)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
        params![
            store.store_id,
            store.shop_name,
            store.location,
            store.coordinates.map(|p| p.longitude),
            store.coordinates.map(|p| p.latitude),
        ],
    )?;
    Ok(())
}

pub fn seed_batch(conn: &Connection, batch: &Batch) -> Result<(), Box<dyn Error>> {
    seed_party(conn, &batch.producer)?;

    let processing_json = match &batch.processing_details {
        Some(details) => Some(serde_json::to_string(details)?),
        None => None,
    };
    let storage_json = match &batch.storage_conditions {
        Some(conditions) => Some(serde_json::to_string(conditions)?),
        None => None,
    };

    conn.execute(
        r#"
        INSERT INTO product_batch (
            batch_id, batch_code, product_name, producer_id,
            harvest_date, expiry_date, quantity, unit, quality_grade,
            organic_certified, pesticide_residue, farm_longitude, farm_latitude,
            processing_json, storage_json, status, notes, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)
        "#,
        params![
            batch.id.as_str(),
            batch.batch_code,
            batch.product_name,
            batch.producer.party_id,
            ts(batch.harvest_date),
            ts(batch.expiry_date),
            batch.quantity,
            batch.unit,
            batch.quality_grade,
            batch.organic_certified as i64,
            batch.pesticide_residue,
            batch.farm_location.map(|p| p.longitude),
            batch.farm_location.map(|p| p.latitude),
            processing_json,
            storage_json,
            batch.status.to_db_str(),
            batch.notes,
            ts(batch.created_at),
            ts(batch.updated_at),
        ],
    )?;
    Ok(())
}

pub fn seed_leg(conn: &Connection, leg: &TransportLeg) -> Result<(), Box<dyn Error>> {
    seed_party(conn, &leg.transporter)?;

    let vehicle_json = match &leg.vehicle {
        Some(vehicle) => Some(serde_json::to_string(vehicle)?),
        None => None,
    };
    let driver_json = match &leg.driver {
        Some(driver) => Some(serde_json::to_string(driver)?),
        None => None,
    };

    conn.execute(
        r#"
        INSERT INTO transport_leg (
            leg_id, transport_code, batch_id, transporter_id,
            origin_json, destination_json,
            departure_time, estimated_arrival_time, actual_arrival_time,
            vehicle_json, driver_json, risk_flag, status, condition_notes,
            created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
        "#,
        params![
            leg.id.as_str(),
            leg.transport_code,
            leg.batch_id.as_str(),
            leg.transporter.party_id,
            endpoint_json(&leg.origin),
            endpoint_json(&leg.destination),
            opt_ts(leg.departure_time),
            opt_ts(leg.estimated_arrival_time),
            opt_ts(leg.actual_arrival_time),
            vehicle_json,
            driver_json,
            leg.risk_flag.as_str(),
            leg.status.as_str(),
            leg.condition_notes,
            ts(leg.created_at),
            ts(leg.updated_at),
        ],
    )?;

    for (seq_no, sample) in leg.temperature_logs.iter().enumerate() {
        conn.execute(
            r#"
            INSERT INTO temperature_log (leg_id, seq_no, recorded_at, temperature_c, longitude, latitude)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                leg.id.as_str(),
                seq_no as i64,
                opt_ts(sample.timestamp),
                sample.temperature_celsius,
                sample.location.map(|p| p.longitude),
                sample.location.map(|p| p.latitude),
            ],
        )?;
    }
    Ok(())
}

pub fn seed_inventory(conn: &Connection, entry: &InventoryEntry) -> Result<(), Box<dyn Error>> {
    seed_party(conn, &entry.retailer)?;
    if let Some(store) = &entry.store {
        seed_store(conn, store)?;
    }

    conn.execute(
        r#"
        INSERT INTO store_inventory (
            inventory_id, sku, batch_id, retailer_id, store_id, product_name,
            quantity_available, unit_price, currency, quality_status, status,
            shelf_date, expiry_date, last_restocked, last_sold, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)
        "#,
        params![
            entry.id.as_str(),
            entry.sku,
            entry.batch_id.as_str(),
            entry.retailer.party_id,
            entry.store.as_ref().map(|s| s.store_id.clone()),
            entry.product_name,
            entry.quantity_available,
            entry.unit_price,
            entry.currency,
            entry.quality_status,
            entry.status.as_str(),
            opt_ts(entry.shelf_date),
            opt_ts(entry.expiry_date),
            opt_ts(entry.last_restocked),
            opt_ts(entry.last_sold),
            ts(entry.created_at),
            ts(entry.updated_at),
        ],
    )?;
    Ok(())
}

/// 一次写入批次及其全部运输段、库存记录
pub fn seed_journey(
    conn: &Connection,
    batch: &Batch,
    legs: &[TransportLeg],
    entries: &[InventoryEntry],
) -> Result<(), Box<dyn Error>> {
    seed_batch(conn, batch)?;
    for leg in legs {
        seed_leg(conn, leg)?;
    }
    for entry in entries {
        seed_inventory(conn, entry)?;
    }
    Ok(())
}
