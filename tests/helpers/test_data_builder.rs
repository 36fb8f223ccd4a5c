// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================
// 职责: 构建批次 / 运输段 / 库存记录等领域对象
// 说明: 构建结果既可直接喂给内存读取器,也可经 db_seeder 落库
// ==========================================
#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use farm_trace::domain::batch::{Batch, ProcessingDetails, StorageConditions};
use farm_trace::domain::inventory::InventoryEntry;
use farm_trace::domain::party::{PartyProfile, PartyRole, PostalAddress, RetailStore};
use farm_trace::domain::transport::{
    DriverDetails, LegEndpoint, TemperatureSample, TransportLeg, VehicleDetails,
};
use farm_trace::domain::types::{
    BatchLifecycleStatus, DeliveryStatus, GeoPoint, InventoryStatus, RiskFlag, SurrogateId,
};

/// UTC 零点
pub fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

/// UTC 指定时刻
pub fn utc_hm(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

// ==========================================
// 参与方
// ==========================================

pub fn party(username: &str, first: &str, last: &str, role: PartyRole) -> PartyProfile {
    PartyProfile {
        party_id: format!("party-{}", username),
        username: username.to_string(),
        email: format!("{}@example.com", username),
        first_name: first.to_string(),
        last_name: last.to_string(),
        contact_number: Some("555-0100".to_string()),
        role,
        address: Some(PostalAddress {
            street: Some("1 Orchard Rd".to_string()),
            city: Some("Springfield".to_string()),
            state: Some("IL".to_string()),
            zip_code: Some("62701".to_string()),
            country: Some("US".to_string()),
        }),
    }
}

pub fn farmer() -> PartyProfile {
    party("jdoe", "John", "Doe", PartyRole::Farmer)
}

pub fn trucker() -> PartyProfile {
    party("bob", "Bob", "Trucker", PartyRole::Distributor)
}

pub fn grocer() -> PartyProfile {
    party("alice", "Alice", "Grocer", PartyRole::Retailer)
}

pub fn store(store_id: &str, shop_name: &str, coordinates: Option<GeoPoint>) -> RetailStore {
    RetailStore {
        store_id: store_id.to_string(),
        shop_name: shop_name.to_string(),
        location: "42 Market St, Springfield".to_string(),
        coordinates,
    }
}

// ==========================================
// Batch 构建器
// ==========================================

pub struct BatchBuilder {
    batch: Batch,
}

impl BatchBuilder {
    pub fn new(batch_code: &str) -> Self {
        let harvest = utc(2023, 10, 1);
        Self {
            batch: Batch {
                id: SurrogateId::generate(),
                batch_code: batch_code.to_string(),
                product_name: "Organic Apples".to_string(),
                producer: farmer(),
                harvest_date: harvest,
                expiry_date: utc(2023, 11, 1),
                quantity: 500.0,
                unit: "kg".to_string(),
                quality_grade: Some("A".to_string()),
                organic_certified: true,
                pesticide_residue: Some("none detected".to_string()),
                farm_location: Some(GeoPoint::new(-89.65, 39.78)),
                processing_details: None,
                storage_conditions: Some(StorageConditions {
                    temperature: Some("2-4°C".to_string()),
                    humidity: Some("90%".to_string()),
                    other_conditions: None,
                }),
                status: BatchLifecycleStatus::Active,
                notes: None,
                created_at: harvest,
                updated_at: harvest,
            },
        }
    }

    pub fn id(mut self, raw: &str) -> Self {
        self.batch.id = SurrogateId::parse(raw).expect("测试用代理主键必须合法");
        self
    }

    pub fn product(mut self, name: &str) -> Self {
        self.batch.product_name = name.to_string();
        self
    }

    pub fn harvest(mut self, date: DateTime<Utc>) -> Self {
        self.batch.harvest_date = date;
        self.batch.created_at = date;
        self.batch.updated_at = date;
        self
    }

    pub fn expiry(mut self, date: DateTime<Utc>) -> Self {
        self.batch.expiry_date = date;
        self
    }

    pub fn producer(mut self, producer: PartyProfile) -> Self {
        self.batch.producer = producer;
        self
    }

    pub fn farm_location(mut self, point: Option<GeoPoint>) -> Self {
        self.batch.farm_location = point;
        self
    }

    pub fn processing(mut self, facility: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.batch.processing_details = Some(ProcessingDetails {
            facility_name: Some(facility.to_string()),
            start_date: Some(start),
            end_date: Some(end),
            certifications: vec!["HACCP".to_string()],
        });
        self
    }

    pub fn build(self) -> Batch {
        self.batch
    }
}

// ==========================================
// TransportLeg 构建器
// ==========================================

pub struct LegBuilder {
    leg: TransportLeg,
}

impl LegBuilder {
    pub fn new(transport_code: &str, batch: &Batch) -> Self {
        let created = batch.harvest_date;
        Self {
            leg: TransportLeg {
                id: SurrogateId::generate(),
                transport_code: transport_code.to_string(),
                batch_id: batch.id.clone(),
                transporter: trucker(),
                origin: LegEndpoint {
                    location_name: "Doe Family Farm".to_string(),
                    address: Some(PostalAddress {
                        city: Some("Springfield".to_string()),
                        state: Some("IL".to_string()),
                        ..PostalAddress::default()
                    }),
                    coordinates: Some(GeoPoint::new(0.0, 0.0)),
                },
                destination: LegEndpoint {
                    location_name: "Central Market".to_string(),
                    address: Some(PostalAddress {
                        city: Some("Chicago".to_string()),
                        state: Some("IL".to_string()),
                        ..PostalAddress::default()
                    }),
                    coordinates: Some(GeoPoint::new(0.01, 0.0)),
                },
                departure_time: Some(utc(2023, 10, 2)),
                estimated_arrival_time: Some(utc(2023, 10, 3)),
                actual_arrival_time: None,
                vehicle: Some(VehicleDetails {
                    vehicle_type: Some("Refrigerated Truck".to_string()),
                    vehicle_number: Some("IL-4821".to_string()),
                    capacity: Some("10t".to_string()),
                    refrigerated: true,
                }),
                driver: Some(DriverDetails {
                    name: Some("Bob Trucker".to_string()),
                    license_number: Some("D-1234".to_string()),
                    contact_number: None,
                }),
                temperature_logs: Vec::new(),
                risk_flag: RiskFlag::Normal,
                status: DeliveryStatus::InTransit,
                condition_notes: None,
                created_at: created,
                updated_at: created,
            },
        }
    }

    pub fn departure(mut self, at: Option<DateTime<Utc>>) -> Self {
        self.leg.departure_time = at;
        self
    }

    /// 设置实际到达时间,同时把状态置为 delivered
    pub fn arrived(mut self, at: DateTime<Utc>) -> Self {
        self.leg.actual_arrival_time = Some(at);
        self.leg.status = DeliveryStatus::Delivered;
        self
    }

    pub fn status(mut self, status: DeliveryStatus) -> Self {
        self.leg.status = status;
        self
    }

    pub fn risk_flag(mut self, flag: RiskFlag) -> Self {
        self.leg.risk_flag = flag;
        self
    }

    pub fn origin_coordinates(mut self, point: Option<GeoPoint>) -> Self {
        self.leg.origin.coordinates = point;
        self
    }

    pub fn destination_coordinates(mut self, point: Option<GeoPoint>) -> Self {
        self.leg.destination.coordinates = point;
        self
    }

    pub fn temperature(mut self, at: Option<DateTime<Utc>>, celsius: f64) -> Self {
        self.leg.temperature_logs.push(TemperatureSample {
            timestamp: at,
            temperature_celsius: celsius,
            location: None,
        });
        self
    }

    pub fn notes(mut self, notes: &str) -> Self {
        self.leg.condition_notes = Some(notes.to_string());
        self
    }

    pub fn build(self) -> TransportLeg {
        self.leg
    }
}

// ==========================================
// InventoryEntry 构建器
// ==========================================

pub struct InventoryBuilder {
    entry: InventoryEntry,
}

impl InventoryBuilder {
    pub fn new(sku: &str, batch: &Batch) -> Self {
        let created = utc(2023, 10, 4);
        Self {
            entry: InventoryEntry {
                id: SurrogateId::generate(),
                sku: sku.to_string(),
                batch_id: batch.id.clone(),
                retailer: grocer(),
                store: Some(store("store-1", "Alice Groceries", Some(GeoPoint::new(-87.62, 41.88)))),
                product_name: Some(batch.product_name.clone()),
                quantity_available: 50.0,
                unit_price: 3.5,
                currency: "USD".to_string(),
                quality_status: Some("fresh".to_string()),
                status: InventoryStatus::Available,
                shelf_date: Some(utc(2023, 10, 4)),
                expiry_date: None,
                last_restocked: None,
                last_sold: None,
                created_at: created,
                updated_at: created,
            },
        }
    }

    pub fn quantity(mut self, quantity: f64) -> Self {
        self.entry.quantity_available = quantity;
        self
    }

    pub fn status(mut self, status: InventoryStatus) -> Self {
        self.entry.status = status;
        self
    }

    pub fn shelf_date(mut self, at: Option<DateTime<Utc>>) -> Self {
        self.entry.shelf_date = at;
        self
    }

    pub fn expiry(mut self, at: DateTime<Utc>) -> Self {
        self.entry.expiry_date = Some(at);
        self
    }

    pub fn store(mut self, store: Option<RetailStore>) -> Self {
        self.entry.store = store;
        self
    }

    pub fn build(self) -> InventoryEntry {
        self.entry
    }
}
