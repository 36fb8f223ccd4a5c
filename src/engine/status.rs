// ==========================================
// 农产品供应链追溯系统 - 流转状态推导引擎
// ==========================================
// 职责: 由批次/运输段/库存记录推导当前状态与汇总指标
// 红线: 状态不落库,每次读时推导; 引擎不拼 SQL
// ==========================================
// 优先级 (自上而下,命中即返回):
// 1. now > 保质期                 → Expired
// 2. 任一库存在架且数量 > 0        → AvailableAtRetail
// 3. 有库存记录但均不可售          → SoldOut
// 4. 任一运输段 in-transit         → InTransit
// 5. 任一运输段 delivered          → DeliveredToRetail
// 6. 其余                         → WithProducer
// ==========================================

use crate::domain::batch::Batch;
use crate::domain::inventory::InventoryEntry;
use crate::domain::report::JourneySummary;
use crate::domain::transport::TransportLeg;
use crate::domain::types::{DeliveryStatus, JourneyStatus};
use chrono::{DateTime, Duration, Utc};

const SECONDS_PER_DAY: i64 = 86_400;

// ==========================================
// StatusInferenceEngine - 状态推导引擎
// ==========================================
pub struct StatusInferenceEngine {
    // 无状态引擎
}

impl StatusInferenceEngine {
    pub fn new() -> Self {
        Self {}
    }

    /// 推导当前流转状态
    pub fn infer_status(
        &self,
        batch: &Batch,
        legs: &[TransportLeg],
        entries: &[InventoryEntry],
        now: DateTime<Utc>,
    ) -> JourneyStatus {
        if batch.is_expired_at(now) {
            return JourneyStatus::Expired;
        }
        if entries.iter().any(InventoryEntry::is_available) {
            return JourneyStatus::AvailableAtRetail;
        }
        if !entries.is_empty() {
            return JourneyStatus::SoldOut;
        }
        if legs.iter().any(|leg| leg.status == DeliveryStatus::InTransit) {
            return JourneyStatus::InTransit;
        }
        if legs.iter().any(|leg| leg.status == DeliveryStatus::Delivered) {
            return JourneyStatus::DeliveredToRetail;
        }
        JourneyStatus::WithProducer
    }

    /// 流转天数
    ///
    /// # 规则
    /// - 终点: 所有运输段中最晚的实际到达时间; 均未到达时取 now
    /// - 向上取整到天
    /// - 采收日期晚于终点时结果记为 0
    pub fn calculate_journey_days(
        &self,
        harvest_date: DateTime<Utc>,
        legs: &[TransportLeg],
        now: DateTime<Utc>,
    ) -> i64 {
        let end = legs
            .iter()
            .filter_map(|leg| leg.actual_arrival_time)
            .max()
            .unwrap_or(now);
        ceil_days(end - harvest_date).max(0)
    }

    /// 距保质期天数 (向上取整,已过期为负数)
    pub fn days_until_expiry(&self, expiry_date: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
        ceil_days(expiry_date - now)
    }

    /// 汇总块
    pub fn summarize(
        &self,
        batch: &Batch,
        legs: &[TransportLeg],
        entries: &[InventoryEntry],
        now: DateTime<Utc>,
    ) -> JourneySummary {
        JourneySummary {
            total_transport_steps: legs.len(),
            total_retail_locations: entries.len(),
            total_journey_days: self.calculate_journey_days(batch.harvest_date, legs, now),
            current_status: self.infer_status(batch, legs, entries, now),
        }
    }
}

impl Default for StatusInferenceEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// 时长向上取整为天数 (负数同样向正无穷取整)
fn ceil_days(span: Duration) -> i64 {
    let seconds = span.num_seconds();
    let days = seconds.div_euclid(SECONDS_PER_DAY);
    if seconds.rem_euclid(SECONDS_PER_DAY) > 0 {
        days + 1
    } else {
        days
    }
}
