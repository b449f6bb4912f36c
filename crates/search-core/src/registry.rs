// search-core/src/registry.rs
//! Schema 注册表 - 每个所属类型的索引集合
//!
//! 所属类型（owner）→ 限定名 → `IndexSchema`。每个 (owner, 限定名) 只有一个
//! schema，首次访问时创建并自动声明身份字段 `<owner>_id`。

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::sync::Arc;

use query::FieldType;

use crate::client::IndexServiceClient;
use crate::clock::{Clock, SystemClock};
use crate::config::IndexConfig;
use crate::error::{Result, SearchError};
use crate::materialize::{BulkLoader, ResultMaterializer};
use crate::schema::{FieldOptions, FieldSpec, IndexSchema, Record, Source, domain_name};
use crate::search::QueryBuilder;

/// 可被索引的宿主记录
pub trait Searchable: Record {
    /// 记录主键
    fn record_id(&self) -> String;

    /// 乐观锁版本，作为文档版本号
    fn lock_version(&self) -> u64;
}

/// 身份字段名：`customer_review` → `customer_review_id`
pub fn identity_field(owner: &str) -> String {
    let base: String = owner
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{}_id", base)
}

pub struct SchemaRegistry<R> {
    client: Arc<dyn IndexServiceClient>,
    config: IndexConfig,
    clock: Arc<dyn Clock>,
    schemas: BTreeMap<String, BTreeMap<Option<String>, IndexSchema<R>>>,
}

impl<R> SchemaRegistry<R> {
    pub fn new(client: Arc<dyn IndexServiceClient>, config: IndexConfig) -> Self {
        Self {
            client,
            config,
            clock: Arc::new(SystemClock),
            schemas: BTreeMap::new(),
        }
    }

    /// 之后创建的 schema 使用该时钟
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// 获取或创建 (owner, qualifier) 对应的 schema
    pub fn index(&mut self, owner: &str, qualifier: Option<&str>) -> Result<&mut IndexSchema<R>> {
        let Self {
            client,
            config,
            clock,
            schemas,
        } = self;

        let by_owner = schemas.entry(owner.to_string()).or_default();
        match by_owner.entry(qualifier.map(str::to_string)) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let name = domain_name(&config.domain_prefix, owner, qualifier)?;
                tracing::debug!("[索引] 注册 {} ({:?}) -> {}", owner, qualifier, name);

                let mut schema = IndexSchema::new(name, client.clone())?
                    .with_clock(clock.clone())
                    .with_initial_backoff(config.initial_backoff())
                    .with_lang(config.lang.clone());
                schema.add_field_spec(
                    FieldSpec::new(
                        identity_field(owner),
                        FieldType::Literal,
                        FieldOptions::new().search_enabled(true).result_enabled(true),
                    )
                    .with_source(Source::Accessor("id".to_string())),
                )?;
                Ok(entry.insert(schema))
            }
        }
    }

    pub fn get(&self, owner: &str, qualifier: Option<&str>) -> Option<&IndexSchema<R>> {
        self.schemas
            .get(owner)?
            .get(&qualifier.map(str::to_string))
    }

    /// owner 的所有 schema
    pub fn schemas_for(&self, owner: &str) -> impl Iterator<Item = &IndexSchema<R>> {
        self.schemas.get(owner).into_iter().flat_map(|m| m.values())
    }

    /// 新查询，`fatal_warnings` 取自配置
    pub fn search(&self, owner: &str, qualifier: Option<&str>) -> Result<QueryBuilder<'_, R>> {
        let schema = self.require(owner, qualifier)?;
        let mut query = QueryBuilder::new(schema);
        query.fatal_warnings(self.config.fatal_warnings)?;
        Ok(query)
    }

    /// 新查询，结果按身份字段交给 `loader` 还原
    pub fn materializer<T, L: BulkLoader<T>>(
        &self,
        owner: &str,
        qualifier: Option<&str>,
        loader: L,
    ) -> Result<ResultMaterializer<'_, R, T, L>> {
        let query = self.search(owner, qualifier)?;
        ResultMaterializer::new(query, identity_field(owner), loader)
    }

    fn require(&self, owner: &str, qualifier: Option<&str>) -> Result<&IndexSchema<R>> {
        match self.get(owner, qualifier) {
            Some(schema) => Ok(schema),
            None => Err(SearchError::DomainNotFound(domain_name(
                &self.config.domain_prefix,
                owner,
                qualifier,
            )?)),
        }
    }
}

impl<R: Searchable> SchemaRegistry<R> {
    /// 把记录同步到 owner 的所有 schema：已删除的记录发 delete，否则发 add
    pub fn update_indexes(&self, owner: &str, record: &R, destroyed: bool) -> Result<()> {
        let id = record.record_id();
        let version = record.lock_version();
        for schema in self.schemas_for(owner) {
            if destroyed {
                schema.delete_record(&id, version)?;
            } else {
                schema.post_record(record, &id, version)?;
            }
        }
        Ok(())
    }
}
