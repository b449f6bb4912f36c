// search-core/src/lib.rs
//! 远程搜索索引核心库
//!
//! 为托管的全文搜索服务提供：
//! - 索引域定义（字段、类型、取值来源）
//! - 文档 add/delete 操作的生成与提交
//! - 字段变更后的重建索引与收敛轮询
//! - 结构化查询的构建、执行与结果还原
//!
//! 网络传输通过 [`IndexServiceClient`] 注入。

pub mod client;
pub mod clock;
pub mod config;
pub mod error;
pub mod materialize;
pub mod registry;
pub mod response;
pub mod schema;
pub mod search;

#[cfg(test)]
mod testing;

// 重导出核心类型
pub use client::{DomainStatus, IndexServiceClient, ServiceEndpoint, TransportError};
pub use clock::{Clock, SystemClock};
pub use config::IndexConfig;
pub use error::{LoaderError, Result, SearchError};
pub use materialize::{BulkLoader, FindById, Loaded, ResultMaterializer};
pub use registry::{SchemaRegistry, Searchable, identity_field};
pub use response::{Hit, Hits, ResponseMessage, SearchResponse};
pub use schema::{
    ConvergenceState, DocumentOperation, FieldDefinition, FieldOptions, FieldSpec, FieldValue,
    IndexSchema, Record, Source, domain_name, document_id,
};
pub use search::QueryBuilder;

pub use query::{ClauseValue, CompileError, FieldType, Operator, SearchRequest};
