// ==========================================
// 农产品供应链追溯系统 - 追溯记录读取 Trait
// ==========================================
// 职责: 追溯聚合所需的只读数据访问接口
// 实现者: SqliteTraceRecordReader (使用 rusqlite)
// 红线: 不含业务规则,缺失记录返回 None / 空集合
// ==========================================

use crate::domain::batch::Batch;
use crate::domain::inventory::InventoryEntry;
use crate::domain::transport::TransportLeg;
use crate::domain::types::{BatchIdentifier, SurrogateId};
use crate::repository::batch_repo::BatchRepository;
use crate::repository::error::RepositoryResult;
use crate::repository::inventory_repo::InventoryRepository;
use crate::repository::transport_repo::TransportLegRepository;
use async_trait::async_trait;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

// ==========================================
// TraceRecordReader Trait
// ==========================================
#[async_trait]
pub trait TraceRecordReader: Send + Sync {
    /// 按批次号或代理主键查询批次
    ///
    /// # 返回
    /// - Ok(Some(Batch)): 找到批次
    /// - Ok(None): 两种方式均未找到
    async fn find_batch(&self, identifier: &BatchIdentifier) -> RepositoryResult<Option<Batch>>;

    /// 批次的全部运输段 (出发时间升序,含温度日志)
    async fn find_legs_for_batch(&self, batch_id: &SurrogateId)
        -> RepositoryResult<Vec<TransportLeg>>;

    /// 批次的全部库存记录
    async fn find_inventory_for_batch(
        &self,
        batch_id: &SurrogateId,
    ) -> RepositoryResult<Vec<InventoryEntry>>;

    /// 按运输单号查询单段运输
    async fn find_leg(&self, transport_code: &str) -> RepositoryResult<Option<TransportLeg>>;

    /// 按产品名或批次号搜索批次
    async fn search_batches(&self, query: &str, limit: usize) -> RepositoryResult<Vec<Batch>>;

    async fn count_legs_for_batch(&self, batch_id: &SurrogateId) -> RepositoryResult<usize>;

    async fn count_inventory_for_batch(&self, batch_id: &SurrogateId) -> RepositoryResult<usize>;
}

// ==========================================
// SqliteTraceRecordReader - SQLite 实现
// ==========================================
pub struct SqliteTraceRecordReader {
    batch_repo: BatchRepository,
    leg_repo: TransportLegRepository,
    inventory_repo: InventoryRepository,
}

impl SqliteTraceRecordReader {
    /// 三个仓储共享同一连接
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            batch_repo: BatchRepository::new(conn.clone()),
            leg_repo: TransportLegRepository::new(conn.clone()),
            inventory_repo: InventoryRepository::new(conn),
        }
    }
}

#[async_trait]
impl TraceRecordReader for SqliteTraceRecordReader {
    async fn find_batch(&self, identifier: &BatchIdentifier) -> RepositoryResult<Option<Batch>> {
        match identifier {
            BatchIdentifier::ByCode(code) => self.batch_repo.find_by_code(code),
            BatchIdentifier::BySurrogate(id) => {
                // 代理主键未命中时再按批次号兜底 (批次号恰好是 24 位十六进制的情况)
                match self.batch_repo.find_by_id(id)? {
                    Some(batch) => Ok(Some(batch)),
                    None => self.batch_repo.find_by_code(id.as_str()),
                }
            }
        }
    }

    async fn find_legs_for_batch(
        &self,
        batch_id: &SurrogateId,
    ) -> RepositoryResult<Vec<TransportLeg>> {
        self.leg_repo.find_by_batch(batch_id)
    }

    async fn find_inventory_for_batch(
        &self,
        batch_id: &SurrogateId,
    ) -> RepositoryResult<Vec<InventoryEntry>> {
        self.inventory_repo.find_by_batch(batch_id)
    }

    async fn find_leg(&self, transport_code: &str) -> RepositoryResult<Option<TransportLeg>> {
        self.leg_repo.find_by_code(transport_code)
    }

    async fn search_batches(&self, query: &str, limit: usize) -> RepositoryResult<Vec<Batch>> {
        self.batch_repo.search(query, limit)
    }

    async fn count_legs_for_batch(&self, batch_id: &SurrogateId) -> RepositoryResult<usize> {
        self.leg_repo.count_by_batch(batch_id)
    }

    async fn count_inventory_for_batch(&self, batch_id: &SurrogateId) -> RepositoryResult<usize> {
        self.inventory_repo.count_by_batch(batch_id)
    }
}
