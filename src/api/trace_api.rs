// ==========================================
// 农产品供应链追溯系统 - 追溯查询 API
// ==========================================
// 职责: 追溯报告聚合、产品状态、产品搜索、消费者履历摘要
// 流程: 解析标识 → 查批次 → 并发取运输段/库存 → 引擎推导 → 组装
// 红线: 只读,无副作用; 同一批次无论按批次号还是代理主键查询,结果一致
// ==========================================

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::config::trace_config::TraceConfig;
use crate::domain::batch::Batch;
use crate::domain::inventory::InventoryEntry;
use crate::domain::party::PostalAddress;
use crate::domain::report::{
    BatchSummary, PartyContact, ProducerInfo, RetailLocationEntry, RetailerContact,
    TraceabilityReport, TransportHistoryEntry,
};
use crate::domain::transport::{TemperatureSample, TransportLeg, VehicleDetails};
use crate::domain::types::{
    BatchIdentifier, DeliveryStatus, GeoPoint, InventoryStatus, JourneyStatus, SurrogateId,
};
use crate::engine::{RiskRouteEvaluator, StatusInferenceEngine, TimelineBuilder};
use crate::repository::trace_reader::TraceRecordReader;

/// 门店名缺失时的占位
const UNKNOWN_STORE: &str = "Unknown Store";

// ==========================================
// TraceabilityApi - 追溯查询 API
// ==========================================
pub struct TraceabilityApi {
    reader: Arc<dyn TraceRecordReader>,
    evaluator: RiskRouteEvaluator,
    timeline_builder: TimelineBuilder,
    status_engine: StatusInferenceEngine,
    config: TraceConfig,
}

impl TraceabilityApi {
    /// 创建新的 TraceabilityApi 实例
    pub fn new(reader: Arc<dyn TraceRecordReader>, config: TraceConfig) -> Self {
        Self {
            reader,
            evaluator: RiskRouteEvaluator::new(config.risk_route),
            timeline_builder: TimelineBuilder::new(),
            status_engine: StatusInferenceEngine::new(),
            config,
        }
    }

    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    // ==========================================
    // 追溯报告
    // ==========================================

    /// 查询批次追溯报告
    ///
    /// # 参数
    /// - identifier: 批次号 (如 BATCH-1234) 或 24 位代理主键
    ///
    /// # 返回
    /// - Ok(TraceabilityReport): 追溯报告
    /// - Err(ApiError::NotFound): 批次不存在
    /// - Err(ApiError::InvalidInput): 标识为空
    pub async fn get_traceability_report(&self, identifier: &str) -> ApiResult<TraceabilityReport> {
        self.get_traceability_report_at(identifier, Utc::now()).await
    }

    /// 以指定时刻为 "当前时间" 生成追溯报告
    pub async fn get_traceability_report_at(
        &self,
        identifier: &str,
        now: DateTime<Utc>,
    ) -> ApiResult<TraceabilityReport> {
        let batch = self.resolve_batch(identifier).await?;
        let (legs, entries) = self.fetch_related(&batch.id).await?;

        let report = self.assemble_report(&batch, &legs, &entries, now);
        info!(
            batch_code = %batch.batch_code,
            legs = legs.len(),
            entries = entries.len(),
            status = %report.summary.current_status,
            "追溯报告生成完成"
        );
        Ok(report)
    }

    /// 解析标识并查询批次
    async fn resolve_batch(&self, identifier: &str) -> ApiResult<Batch> {
        let parsed = BatchIdentifier::parse(identifier)
            .ok_or_else(|| ApiError::InvalidInput("批次标识不能为空".to_string()))?;
        debug!(identifier = %parsed, "查询批次");

        let batch = self
            .reader
            .find_batch(&parsed)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("批次不存在: {}", identifier.trim())))?;

        if !batch.has_valid_shelf_life() {
            warn!(
                batch_code = %batch.batch_code,
                harvest_date = %batch.harvest_date,
                expiry_date = %batch.expiry_date,
                "保质期不晚于采收日期"
            );
        }
        Ok(batch)
    }

    /// 并发读取运输段与库存记录 (两者互不依赖)
    async fn fetch_related(
        &self,
        batch_id: &SurrogateId,
    ) -> ApiResult<(Vec<TransportLeg>, Vec<InventoryEntry>)> {
        let (legs, entries) = futures::try_join!(
            self.reader.find_legs_for_batch(batch_id),
            self.reader.find_inventory_for_batch(batch_id)
        )?;
        Ok((legs, entries))
    }

    fn assemble_report(
        &self,
        batch: &Batch,
        legs: &[TransportLeg],
        entries: &[InventoryEntry],
        now: DateTime<Utc>,
    ) -> TraceabilityReport {
        let transport_history = legs
            .iter()
            .map(|leg| self.transport_history_entry(leg))
            .collect();
        let retail_locations = entries
            .iter()
            .map(|entry| retail_location_entry(entry, batch.expiry_date))
            .collect();

        TraceabilityReport {
            batch_info: batch_summary(batch),
            producer_info: producer_info(batch),
            transport_history,
            retail_locations,
            timeline: self.timeline_builder.build(batch, legs, entries),
            summary: self.status_engine.summarize(batch, legs, entries, now),
            trace_url: self.config.trace_url(&batch.batch_code),
        }
    }

    fn transport_history_entry(&self, leg: &TransportLeg) -> TransportHistoryEntry {
        let cold_chain = self.evaluator.evaluate_leg(leg);
        let route = self.evaluator.estimate_leg_route(leg);
        if route.is_none() {
            debug!(transport_code = %leg.transport_code, "起止点缺坐标,跳过路线估算");
        }

        TransportHistoryEntry {
            transport_code: leg.transport_code.clone(),
            transporter: PartyContact::from_profile(&leg.transporter),
            origin: leg.origin.clone(),
            destination: leg.destination.clone(),
            departure_time: leg.departure_time,
            estimated_arrival_time: leg.estimated_arrival_time,
            actual_arrival_time: leg.actual_arrival_time,
            vehicle: leg.vehicle.clone(),
            driver: leg.driver.clone(),
            temperature_logs: leg.temperature_logs.clone(),
            condition_notes: leg.condition_notes.clone(),
            status: leg.status,
            risk_flag: cold_chain.risk_flag,
            max_temperature_celsius: cold_chain.max_temperature_celsius,
            high_risk_samples: cold_chain.high_risk_samples,
            route,
        }
    }

    // ==========================================
    // 产品状态
    // ==========================================

    /// 查询产品当前状态与保质期剩余天数
    pub async fn get_product_status(&self, identifier: &str) -> ApiResult<ProductStatusView> {
        self.get_product_status_at(identifier, Utc::now()).await
    }

    pub async fn get_product_status_at(
        &self,
        identifier: &str,
        now: DateTime<Utc>,
    ) -> ApiResult<ProductStatusView> {
        let batch = self.resolve_batch(identifier).await?;
        let (legs, entries) = self.fetch_related(&batch.id).await?;

        let status = self.status_engine.infer_status(&batch, &legs, &entries, now);
        Ok(ProductStatusView {
            batch_code: batch.batch_code.clone(),
            product_name: batch.product_name.clone(),
            status,
            is_expired: batch.is_expired_at(now),
            expiry_date: batch.expiry_date,
            days_until_expiry: self.status_engine.days_until_expiry(batch.expiry_date, now),
        })
    }

    // ==========================================
    // 产品搜索
    // ==========================================

    /// 按产品名或批次号搜索 (不区分大小写,结果数受 search_limit 限制)
    pub async fn search_products(&self, query: &str) -> ApiResult<Vec<ProductSearchHit>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ApiError::InvalidInput("搜索关键字不能为空".to_string()));
        }

        let batches = self
            .reader
            .search_batches(query, self.config.search_limit)
            .await?;

        let mut hits = Vec::with_capacity(batches.len());
        for batch in batches {
            let (transport_count, inventory_count) = futures::try_join!(
                self.reader.count_legs_for_batch(&batch.id),
                self.reader.count_inventory_for_batch(&batch.id)
            )?;
            hits.push(ProductSearchHit {
                batch_id: batch.id.clone(),
                batch_code: batch.batch_code.clone(),
                product_name: batch.product_name.clone(),
                producer_name: batch.producer.display_name(),
                harvest_date: batch.harvest_date,
                expiry_date: batch.expiry_date,
                organic_certified: batch.organic_certified,
                transport_count,
                inventory_count,
            });
        }

        info!(query, hits = hits.len(), "产品搜索完成");
        Ok(hits)
    }

    // ==========================================
    // 消费者履历摘要
    // ==========================================

    /// 产地 / 运输 / 门店三段式摘要
    pub async fn get_product_history(&self, identifier: &str) -> ApiResult<ProductHistory> {
        let batch = self.resolve_batch(identifier).await?;
        let (legs, entries) = self.fetch_related(&batch.id).await?;

        let farm = FarmDigest {
            batch_code: batch.batch_code.clone(),
            product_name: batch.product_name.clone(),
            farmer: FarmerDigest {
                name: batch.producer.display_name(),
                contact: batch.producer.contact_number.clone(),
                address: batch.producer.address.clone(),
            },
            location: batch.farm_location,
            harvest_date: batch.harvest_date,
            pesticide_residue: batch.pesticide_residue.clone(),
            organic_certified: batch.organic_certified,
            quality_grade: batch.quality_grade.clone(),
        };

        let transport = legs
            .iter()
            .map(|leg| TransportDigest {
                transport_code: leg.transport_code.clone(),
                transporter: leg.transporter.display_name(),
                origin: leg.origin.location_name.clone(),
                destination: leg.destination.location_name.clone(),
                departure_time: leg.departure_time,
                actual_arrival_time: leg.actual_arrival_time,
                vehicle: leg.vehicle.clone(),
                temperature_logs: leg.temperature_logs.clone(),
                notes: leg.condition_notes.clone(),
                status: leg.status,
            })
            .collect();

        let store = entries
            .iter()
            .map(|entry| StoreDigest {
                sku: entry.sku.clone(),
                retailer_name: entry.retailer.display_name(),
                store_name: entry.store_name().unwrap_or(UNKNOWN_STORE).to_string(),
                shelf_date: entry.stocked_at(),
                expiry_date: entry.effective_expiry(batch.expiry_date),
                location: entry.store.as_ref().and_then(|s| s.coordinates),
                status: entry.status,
                quality_status: entry.quality_status.clone(),
                price: entry.unit_price,
                currency: entry.currency.clone(),
            })
            .collect();

        Ok(ProductHistory {
            farm,
            transport,
            store,
        })
    }

    // ==========================================
    // 公开追溯地址
    // ==========================================

    /// 二维码内容: {base}/trace/{batch_code} (图片渲染不在本系统内)
    pub fn trace_url(&self, batch_code: &str) -> String {
        self.config.trace_url(batch_code)
    }
}

// ==========================================
// 报告分块组装
// ==========================================

fn batch_summary(batch: &Batch) -> BatchSummary {
    BatchSummary {
        id: batch.id.clone(),
        batch_code: batch.batch_code.clone(),
        product_name: batch.product_name.clone(),
        quantity: batch.quantity,
        unit: batch.unit.clone(),
        quality_grade: batch.quality_grade.clone(),
        organic_certified: batch.organic_certified,
        pesticide_residue: batch.pesticide_residue.clone(),
        status: batch.status,
        notes: batch.notes.clone(),
        created_at: batch.created_at,
        updated_at: batch.updated_at,
    }
}

fn producer_info(batch: &Batch) -> ProducerInfo {
    ProducerInfo {
        producer: batch.producer.clone(),
        display_name: batch.producer.display_name(),
        harvest_date: batch.harvest_date,
        expiry_date: batch.expiry_date,
        farm_location: batch.farm_location,
        processing_details: batch.processing_details.clone(),
        storage_conditions: batch.storage_conditions.clone(),
    }
}

fn retail_location_entry(
    entry: &InventoryEntry,
    batch_expiry: DateTime<Utc>,
) -> RetailLocationEntry {
    RetailLocationEntry {
        retailer: RetailerContact {
            name: entry.retailer.display_name(),
            contact: entry.retailer.contact_number.clone(),
            email: entry.retailer.email.clone(),
            store_name: entry.store_name().map(str::to_string),
            store_address: entry.store.as_ref().map(|s| s.location.clone()),
        },
        sku: entry.sku.clone(),
        product_name: entry.product_name.clone(),
        quantity_available: entry.quantity_available,
        unit_price: entry.unit_price,
        currency: entry.currency.clone(),
        quality_status: entry.quality_status.clone(),
        status: entry.status,
        location: entry.store.as_ref().and_then(|s| s.coordinates),
        shelf_date: entry.stocked_at(),
        expiry_date: entry.effective_expiry(batch_expiry),
        last_restocked: entry.last_restocked,
        last_sold: entry.last_sold,
        created_at: entry.created_at,
        updated_at: entry.updated_at,
    }
}

// ==========================================
// 响应结构
// ==========================================

/// 产品状态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductStatusView {
    pub batch_code: String,
    pub product_name: String,
    pub status: JourneyStatus,
    pub is_expired: bool,
    pub expiry_date: DateTime<Utc>,
    pub days_until_expiry: i64,
}

/// 产品搜索结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSearchHit {
    pub batch_id: SurrogateId,
    pub batch_code: String,
    pub product_name: String,
    pub producer_name: String,
    pub harvest_date: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,
    pub organic_certified: bool,
    pub transport_count: usize,
    pub inventory_count: usize,
}

/// 消费者履历摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductHistory {
    pub farm: FarmDigest,
    pub transport: Vec<TransportDigest>,
    pub store: Vec<StoreDigest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmDigest {
    pub batch_code: String,
    pub product_name: String,
    pub farmer: FarmerDigest,
    pub location: Option<GeoPoint>,
    pub harvest_date: DateTime<Utc>,
    pub pesticide_residue: Option<String>,
    pub organic_certified: bool,
    pub quality_grade: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmerDigest {
    pub name: String,
    pub contact: Option<String>,
    pub address: Option<PostalAddress>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportDigest {
    pub transport_code: String,
    pub transporter: String,
    pub origin: String,
    pub destination: String,
    pub departure_time: Option<DateTime<Utc>>,
    pub actual_arrival_time: Option<DateTime<Utc>>,
    pub vehicle: Option<VehicleDetails>,
    pub temperature_logs: Vec<TemperatureSample>,
    pub notes: Option<String>,
    pub status: DeliveryStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreDigest {
    pub sku: String,
    pub retailer_name: String,
    pub store_name: String,
    pub shelf_date: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>, // 生效保质期
    pub location: Option<GeoPoint>,
    pub status: InventoryStatus,
    pub quality_status: Option<String>,
    pub price: f64,
    pub currency: String,
}
