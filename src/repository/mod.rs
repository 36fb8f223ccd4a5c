// ==========================================
// 农产品供应链追溯系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑,只读
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod batch_repo;
pub mod error;
pub mod inventory_repo;
pub mod row_codec;
pub mod trace_reader;
pub mod transport_repo;

// 重导出核心仓储
pub use batch_repo::BatchRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use inventory_repo::InventoryRepository;
pub use row_codec::{format_timestamp, parse_timestamp};
pub use trace_reader::{SqliteTraceRecordReader, TraceRecordReader};
pub use transport_repo::TransportLegRepository;
