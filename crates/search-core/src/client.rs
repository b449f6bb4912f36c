// search-core/src/client.rs
//! 远程索引服务接口
//!
//! HTTP 传输本身不在本库中实现，由调用方注入。实现必须可以被多个
//! `IndexSchema` / `QueryBuilder` 并发调用（通常是进程级共享句柄）。

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schema::{DocumentOperation, FieldDefinition};

/// 传输层错误（非成功状态码、连接失败等）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("远程服务请求失败{}: {message}", status_suffix(.status))]
pub struct TransportError {
    pub status: Option<u16>,
    pub message: String,
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default()
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }
}

/// 服务 endpoint（新建的域可能暂时没有）
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServiceEndpoint {
    #[serde(default)]
    pub endpoint: Option<String>,
}

/// 远程域状态
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DomainStatus {
    pub domain_name: String,
    /// 字段定义已变更，需要重建索引
    #[serde(default)]
    pub requires_index_documents: bool,
    /// 正在重建索引
    #[serde(default)]
    pub processing: bool,
    #[serde(default)]
    pub search_service: ServiceEndpoint,
    #[serde(default)]
    pub doc_service: ServiceEndpoint,
}

/// 远程索引服务客户端
pub trait IndexServiceClient: Send + Sync {
    /// 创建域；域已存在时为空操作
    fn create_domain(&self, domain: &str) -> Result<(), TransportError>;

    /// 定义（或覆盖）一个索引字段
    fn define_field(&self, domain: &str, definition: &FieldDefinition) -> Result<(), TransportError>;

    /// 查询域状态；域不存在时返回空列表
    fn describe_domain(&self, domain: &str) -> Result<Vec<DomainStatus>, TransportError>;

    /// 触发重建索引
    fn index_documents(&self, domain: &str) -> Result<(), TransportError>;

    /// 向文档 endpoint 提交一批文档操作，返回解析后的 JSON 响应
    fn post_documents(
        &self,
        endpoint: &str,
        operations: &[DocumentOperation],
    ) -> Result<serde_json::Value, TransportError>;

    /// 向搜索 endpoint 发起查询，返回解析后的 JSON 响应
    fn search(
        &self,
        endpoint: &str,
        params: &[(&'static str, String)],
    ) -> Result<serde_json::Value, TransportError>;
}
