// ==========================================
// 农产品供应链追溯系统 - 时间线构建引擎
// ==========================================
// 职责: 批次 + 运输段 + 库存记录 → 按时间排序的流转事件序列
// 输入: 已解析的领域记录 (不查库)
// 输出: Vec<TimelineEvent>
// ==========================================
// 事件规则:
// - 采收事件: 恰好 1 条
// - 加工事件: 有加工信息时 1 条
// - 运输事件: 每段 1 条出发,已送达的再加 1 条到达
// - 零售事件: 每条库存记录 1 条 (上架时间)
// 排序: 时间升序,稳定排序; 缺失时间视为最早
// ==========================================

use crate::domain::batch::Batch;
use crate::domain::inventory::InventoryEntry;
use crate::domain::report::{EventLocation, TimelineDetails, TimelineEvent};
use crate::domain::transport::{DriverDetails, TransportLeg, VehicleDetails};
use crate::domain::types::JourneyStage;

// ==========================================
// TimelineBuilder - 时间线构建器
// ==========================================
pub struct TimelineBuilder {
    // 无状态引擎
}

impl TimelineBuilder {
    pub fn new() -> Self {
        Self {}
    }

    /// 构建完整时间线
    ///
    /// # 参数
    /// - `batch`: 批次
    /// - `legs`: 运输段 (顺序不影响结果)
    /// - `entries`: 库存记录
    pub fn build(
        &self,
        batch: &Batch,
        legs: &[TransportLeg],
        entries: &[InventoryEntry],
    ) -> Vec<TimelineEvent> {
        let mut events = Vec::with_capacity(2 + legs.len() * 2 + entries.len());

        events.push(self.harvest_event(batch));
        if let Some(event) = self.processing_event(batch) {
            events.push(event);
        }
        for leg in legs {
            events.push(self.departure_event(leg));
            if let Some(event) = self.arrival_event(leg) {
                events.push(event);
            }
        }
        for entry in entries {
            events.push(self.stocked_event(entry));
        }

        // Option<DateTime> 排序时 None 在前; sort_by_key 为稳定排序
        events.sort_by_key(|event| event.timestamp);
        events
    }

    // ==========================================
    // 各阶段事件
    // ==========================================

    fn harvest_event(&self, batch: &Batch) -> TimelineEvent {
        TimelineEvent {
            stage: JourneyStage::Production,
            event: format!("Harvested {}", batch.product_name),
            timestamp: Some(batch.harvest_date),
            location: batch.farm_location.map(|point| EventLocation {
                name: batch
                    .producer
                    .address
                    .as_ref()
                    .and_then(|a| a.city.clone()),
                coordinates: Some(point),
            }),
            details: TimelineDetails::Harvest {
                producer: batch.producer.display_name(),
                batch_code: batch.batch_code.clone(),
                quantity: batch.quantity,
                unit: batch.unit.clone(),
                quality_grade: batch.quality_grade.clone(),
            },
            status: batch.status.to_db_str().to_string(),
        }
    }

    fn processing_event(&self, batch: &Batch) -> Option<TimelineEvent> {
        let processing = batch.processing_details.as_ref()?;
        Some(TimelineEvent {
            stage: JourneyStage::Processing,
            event: match processing.facility_name.as_deref() {
                Some(facility) => format!("Processed at {}", facility),
                None => "Processed".to_string(),
            },
            timestamp: processing.start_date.or(processing.end_date),
            location: processing.facility_name.as_ref().map(|facility| EventLocation {
                name: Some(facility.clone()),
                coordinates: None,
            }),
            details: TimelineDetails::Processing {
                facility_name: processing.facility_name.clone(),
                certifications: processing.certifications.clone(),
                end_date: processing.end_date,
            },
            status: batch.status.to_db_str().to_string(),
        })
    }

    fn departure_event(&self, leg: &TransportLeg) -> TimelineEvent {
        TimelineEvent {
            stage: JourneyStage::Transportation,
            event: format!("Departed from {}", leg.origin.location_name),
            timestamp: leg.departure_time,
            location: Some(EventLocation::from_endpoint(&leg.origin)),
            details: TimelineDetails::Departure {
                transport_code: leg.transport_code.clone(),
                transporter: leg.transporter.display_name(),
                origin: leg.origin.location_name.clone(),
                destination: leg.destination.location_name.clone(),
                vehicle: leg.vehicle.as_ref().and_then(describe_vehicle),
                driver: leg.driver.as_ref().and_then(describe_driver),
            },
            status: leg.status.as_str().to_string(),
        }
    }

    fn arrival_event(&self, leg: &TransportLeg) -> Option<TimelineEvent> {
        let arrived_at = leg.actual_arrival_time?;
        Some(TimelineEvent {
            stage: JourneyStage::Transportation,
            event: format!("Arrived at {}", leg.destination.location_name),
            timestamp: Some(arrived_at),
            location: Some(EventLocation::from_endpoint(&leg.destination)),
            details: TimelineDetails::Arrival {
                transport_code: leg.transport_code.clone(),
                transporter: leg.transporter.display_name(),
                origin: leg.origin.location_name.clone(),
                destination: leg.destination.location_name.clone(),
            },
            status: leg.status.as_str().to_string(),
        })
    }

    fn stocked_event(&self, entry: &InventoryEntry) -> TimelineEvent {
        let retailer = entry.retailer.display_name();
        let place = entry.store_name().unwrap_or(retailer.as_str()).to_string();
        TimelineEvent {
            stage: JourneyStage::Retail,
            event: format!("Stocked at {}", place),
            timestamp: Some(entry.stocked_at()),
            location: entry.store.as_ref().map(|store| EventLocation {
                name: Some(store.shop_name.clone()),
                coordinates: store.coordinates,
            }),
            details: TimelineDetails::Stocked {
                retailer,
                store_name: entry.store_name().map(str::to_string),
                sku: entry.sku.clone(),
                quantity: entry.quantity_available,
                price: entry.unit_price,
                currency: entry.currency.clone(),
            },
            status: entry.status.as_str().to_string(),
        }
    }
}

impl Default for TimelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// 车辆摘要: "类型 (车牌)"
fn describe_vehicle(vehicle: &VehicleDetails) -> Option<String> {
    match (vehicle.vehicle_type.as_deref(), vehicle.vehicle_number.as_deref()) {
        (Some(kind), Some(number)) => Some(format!("{} ({})", kind, number)),
        (Some(kind), None) => Some(kind.to_string()),
        (None, Some(number)) => Some(number.to_string()),
        (None, None) => None,
    }
}

fn describe_driver(driver: &DriverDetails) -> Option<String> {
    driver.name.clone()
}
