// ==========================================
// 内存版 TraceRecordReader (测试替身)
// ==========================================
// 职责: 不经 SQLite 直接提供领域记录,用于 API 层行为测试
// 口径与 SqliteTraceRecordReader 一致:
// - 运输段按出发时间升序,相同时按运输单号
// - 搜索不区分大小写,匹配产品名或批次号
// ==========================================
#![allow(dead_code)]

use async_trait::async_trait;

use farm_trace::domain::batch::Batch;
use farm_trace::domain::inventory::InventoryEntry;
use farm_trace::domain::transport::TransportLeg;
use farm_trace::domain::types::{BatchIdentifier, SurrogateId};
use farm_trace::repository::{RepositoryError, RepositoryResult, TraceRecordReader};

#[derive(Default)]
pub struct InMemoryTraceRecordReader {
    batches: Vec<Batch>,
    legs: Vec<TransportLeg>,
    entries: Vec<InventoryEntry>,
    fail_inventory: bool,
}

impl InMemoryTraceRecordReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_batch(mut self, batch: Batch) -> Self {
        self.batches.push(batch);
        self
    }

    pub fn with_leg(mut self, leg: TransportLeg) -> Self {
        self.legs.push(leg);
        self
    }

    pub fn with_entry(mut self, entry: InventoryEntry) -> Self {
        self.entries.push(entry);
        self
    }

    /// 库存查询返回数据库错误
    pub fn failing_inventory(mut self) -> Self {
        self.fail_inventory = true;
        self
    }
}

#[async_trait]
impl TraceRecordReader for InMemoryTraceRecordReader {
    async fn find_batch(&self, identifier: &BatchIdentifier) -> RepositoryResult<Option<Batch>> {
        let found = match identifier {
            BatchIdentifier::ByCode(code) => self.batches.iter().find(|b| &b.batch_code == code),
            BatchIdentifier::BySurrogate(id) => self
                .batches
                .iter()
                .find(|b| &b.id == id)
                .or_else(|| self.batches.iter().find(|b| b.batch_code == id.as_str())),
        };
        Ok(found.cloned())
    }

    async fn find_legs_for_batch(
        &self,
        batch_id: &SurrogateId,
    ) -> RepositoryResult<Vec<TransportLeg>> {
        let mut legs: Vec<TransportLeg> = self
            .legs
            .iter()
            .filter(|leg| &leg.batch_id == batch_id)
            .cloned()
            .collect();
        legs.sort_by(|a, b| {
            a.departure_time
                .cmp(&b.departure_time)
                .then_with(|| a.transport_code.cmp(&b.transport_code))
        });
        Ok(legs)
    }

    async fn find_inventory_for_batch(
        &self,
        batch_id: &SurrogateId,
    ) -> RepositoryResult<Vec<InventoryEntry>> {
        if self.fail_inventory {
            return Err(RepositoryError::DatabaseQueryError(
                "no such table: store_inventory".to_string(),
            ));
        }
        Ok(self
            .entries
            .iter()
            .filter(|entry| &entry.batch_id == batch_id)
            .cloned()
            .collect())
    }

    async fn find_leg(&self, transport_code: &str) -> RepositoryResult<Option<TransportLeg>> {
        Ok(self
            .legs
            .iter()
            .find(|leg| leg.transport_code == transport_code)
            .cloned())
    }

    async fn search_batches(&self, query: &str, limit: usize) -> RepositoryResult<Vec<Batch>> {
        let needle = query.trim().to_lowercase();
        Ok(self
            .batches
            .iter()
            .filter(|b| {
                b.product_name.to_lowercase().contains(&needle)
                    || b.batch_code.to_lowercase().contains(&needle)
            })
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count_legs_for_batch(&self, batch_id: &SurrogateId) -> RepositoryResult<usize> {
        Ok(self.legs.iter().filter(|leg| &leg.batch_id == batch_id).count())
    }

    async fn count_inventory_for_batch(&self, batch_id: &SurrogateId) -> RepositoryResult<usize> {
        Ok(self
            .entries
            .iter()
            .filter(|entry| &entry.batch_id == batch_id)
            .count())
    }
}
