// search-core/src/schema/mod.rs
//! Schema 模块 - 远程索引域定义
//!
//! `IndexSchema` 是一个远程域的本地描述：字段集合、文档操作的生成与提交、
//! 远程状态的缓存和收敛轮询。单个实例不支持多线程并发修改。

pub mod convergence;
pub mod document;
pub mod fields;

use std::collections::HashMap;
use std::fmt::Display;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use query::FieldType;

use crate::client::{DomainStatus, IndexServiceClient};
use crate::clock::{Clock, SystemClock};
use crate::error::{Result, SearchError};

pub use convergence::ConvergenceState;
pub use document::{DocumentOperation, document_id};
pub use fields::{
    Extractor, FieldDefinition, FieldOptions, FieldSpec, FieldValue, Record, Source,
    TypedFieldOptions,
};

/// 收敛轮询默认的首次休眠时长
pub const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_secs(1);

/// add 操作默认的语言标记
pub const DEFAULT_LANG: &str = "en";

/// 规范化域名：小写，非 `[a-z0-9-]` 字符替换为 `-`
pub fn normalize_domain_name(raw: &str) -> Result<String> {
    let name: String = raw
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect();

    if name.chars().any(|c| c.is_ascii_alphanumeric()) {
        Ok(name)
    } else {
        Err(SearchError::InvalidDomainName(raw.to_string()))
    }
}

/// 由前缀、所属类型和可选限定名生成域名，如 `prod-customer-reviews-recent`
pub fn domain_name(prefix: &str, owner: &str, qualifier: Option<&str>) -> Result<String> {
    let base = match qualifier {
        Some(q) => format!("{}-{}", owner, q),
        None => owner.to_string(),
    };
    normalize_domain_name(&format!("{}{}", prefix, base))
}

#[derive(Debug, Clone, Copy)]
enum Service {
    Search,
    Document,
}

impl Service {
    fn name(&self) -> &'static str {
        match self {
            Service::Search => "search",
            Service::Document => "doc",
        }
    }
}

/// 远程状态缓存；强制刷新状态时两个 endpoint 一起失效
#[derive(Debug, Default)]
struct EndpointCache {
    status: Option<DomainStatus>,
    search: Option<String>,
    document: Option<String>,
}

impl EndpointCache {
    fn slot(&mut self, service: Service) -> &mut Option<String> {
        match service {
            Service::Search => &mut self.search,
            Service::Document => &mut self.document,
        }
    }
}

/// 远程索引域
pub struct IndexSchema<R> {
    name: String,
    fields: Vec<FieldSpec<R>>,
    positions: HashMap<String, usize>,
    client: Arc<dyn IndexServiceClient>,
    clock: Arc<dyn Clock>,
    initial_backoff: Duration,
    lang: String,
    cache: Mutex<EndpointCache>,
}

impl<R> IndexSchema<R> {
    /// 创建域定义；`name` 必须已经是规范化的域名
    pub fn new(name: impl Into<String>, client: Arc<dyn IndexServiceClient>) -> Result<Self> {
        let name = name.into();
        if normalize_domain_name(&name)? != name {
            return Err(SearchError::InvalidDomainName(name));
        }

        Ok(Self {
            name,
            fields: Vec::new(),
            positions: HashMap::new(),
            client,
            clock: Arc::new(SystemClock),
            initial_backoff: DEFAULT_INITIAL_BACKOFF,
            lang: DEFAULT_LANG.to_string(),
            cache: Mutex::new(EndpointCache::default()),
        })
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 按定义顺序遍历字段
    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec<R>> {
        self.fields.iter()
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec<R>> {
        self.positions.get(name).map(|&i| &self.fields[i])
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    /// 添加字段，取值来源为同名访问器
    pub fn add_field(
        &mut self,
        name: impl Into<String>,
        field_type: FieldType,
        options: FieldOptions,
    ) -> Result<()> {
        self.add_field_spec(FieldSpec::new(name, field_type, options))
    }

    /// 添加字段，字段名重复时返回 `DuplicateField`
    pub fn add_field_spec(&mut self, field: FieldSpec<R>) -> Result<()> {
        if self.positions.contains_key(field.name()) {
            return Err(SearchError::DuplicateField {
                domain: self.name.clone(),
                field: field.name().to_string(),
            });
        }
        self.positions.insert(field.name().to_string(), self.fields.len());
        self.fields.push(field);
        Ok(())
    }

    /// 所有字段的远程定义，按定义顺序
    pub fn field_definitions(&self) -> Vec<FieldDefinition> {
        self.fields.iter().map(FieldSpec::definition).collect()
    }

    /// 创建远程域并逐个定义字段
    ///
    /// 域已存在时远程服务不做任何事，字段定义会被覆盖。
    pub fn create(&self) -> Result<()> {
        tracing::info!("[索引] 正在创建域 {}", self.name);
        self.client.create_domain(&self.name)?;

        for field in &self.fields {
            tracing::info!("[索引]   ...创建 {} 字段 {}", field.field_type(), field.name());
            field.define_in_domain(self.client.as_ref(), &self.name)?;
        }
        tracing::info!("[索引]   ...完成");
        Ok(())
    }

    /// 触发远程重建索引，不等待完成
    pub fn reindex(&self) -> Result<()> {
        tracing::info!("[索引] 触发重建索引: {}", self.name);
        self.client.index_documents(&self.name)?;
        Ok(())
    }

    pub fn build_deletion_payload(&self, record_id: impl Display, version: u64) -> DocumentOperation {
        DocumentOperation::Delete {
            id: document_id(record_id),
            version,
        }
    }

    /// 删除某条记录对应的文档（version 必须大于上次提交的版本）
    pub fn delete_record(&self, record_id: impl Display, version: u64) -> Result<serde_json::Value> {
        let span = tracing::info_span!("index.delete_record", domain = %self.name, version);
        span.in_scope(|| self.submit(self.build_deletion_payload(record_id, version)))
    }

    /// 远程域状态
    ///
    /// `force_reload` 为 true 时重新拉取，并使两个 endpoint 缓存失效。
    /// 状态列表为空说明域不存在，返回 `DomainNotFound`。
    pub fn domain_status(&self, force_reload: bool) -> Result<DomainStatus> {
        if !force_reload {
            let cached = self.cache().status.clone();
            if let Some(status) = cached {
                return Ok(status);
            }
        }

        let span = tracing::info_span!("index.describe_domain", domain = %self.name);
        let status = span.in_scope(|| self.client.describe_domain(&self.name))?;
        let status = status
            .into_iter()
            .next()
            .ok_or_else(|| SearchError::DomainNotFound(self.name.clone()))?;

        let mut cache = self.cache();
        cache.status = Some(status.clone());
        cache.search = None;
        cache.document = None;
        Ok(status)
    }

    pub fn search_endpoint(&self) -> Result<String> {
        self.endpoint(Service::Search)
    }

    pub fn document_endpoint(&self) -> Result<String> {
        self.endpoint(Service::Document)
    }

    pub(crate) fn client(&self) -> &dyn IndexServiceClient {
        self.client.as_ref()
    }

    fn endpoint(&self, service: Service) -> Result<String> {
        let cached = self.cache().slot(service).clone();
        if let Some(endpoint) = cached {
            return Ok(endpoint);
        }

        let status = self.domain_status(false)?;
        let endpoint = match service {
            Service::Search => status.search_service.endpoint,
            Service::Document => status.doc_service.endpoint,
        }
        .ok_or_else(|| SearchError::EndpointUnavailable {
            domain: self.name.clone(),
            service: service.name(),
        })?;

        *self.cache().slot(service) = Some(endpoint.clone());
        Ok(endpoint)
    }

    fn submit(&self, operation: DocumentOperation) -> Result<serde_json::Value> {
        let endpoint = self.document_endpoint()?;
        tracing::debug!(
            "[文档] {} {} (version {}) -> {}",
            if operation.is_delete() { "delete" } else { "add" },
            operation.id(),
            operation.version(),
            endpoint
        );
        Ok(self
            .client
            .post_documents(&endpoint, std::slice::from_ref(&operation))?)
    }

    fn cache(&self) -> MutexGuard<'_, EndpointCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<R> std::fmt::Debug for IndexSchema<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexSchema")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("lang", &self.lang)
            .finish_non_exhaustive()
    }
}

impl<R: Record> IndexSchema<R> {
    /// 生成 add 文档操作
    ///
    /// 取值为空的字段被省略（远程格式没有 null）；0、空字符串等有值的字段照常写入。
    pub fn build_addition_payload(
        &self,
        record: &R,
        record_id: impl Display,
        version: u64,
    ) -> DocumentOperation {
        let fields = self
            .fields
            .iter()
            .filter_map(|field| {
                field
                    .value_for(record)
                    .filter(|value| !value.is_empty())
                    .map(|value| (field.name().to_string(), value))
            })
            .collect();

        DocumentOperation::Add {
            id: document_id(record_id),
            version,
            lang: self.lang.clone(),
            fields,
        }
    }

    /// 添加或替换某条记录对应的文档
    pub fn post_record(
        &self,
        record: &R,
        record_id: impl Display,
        version: u64,
    ) -> Result<serde_json::Value> {
        let span = tracing::info_span!("index.post_record", domain = %self.name, version);
        span.in_scope(|| self.submit(self.build_addition_payload(record, record_id, version)))
    }
}
