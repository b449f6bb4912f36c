// search-core/src/materialize.rs
//! 搜索结果还原为领域对象
//!
//! 从命中中取出身份字段，再交给批量加载器一次性加载。
//! 加载器不保证保持命中顺序。

use serde_json::Value;

use crate::error::{LoaderError, Result, SearchError};
use crate::response::Hit;
use crate::search::QueryBuilder;

/// 加载结果：集合或单个对象
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Loaded<T> {
    Many(Vec<T>),
    Single(T),
}

impl<T> Loaded<T> {
    /// 单个对象按一个元素的序列遍历
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        match self {
            Loaded::Many(items) => items.iter(),
            Loaded::Single(item) => std::slice::from_ref(item).iter(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Loaded::Many(items) => items.len(),
            Loaded::Single(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_vec(self) -> Vec<T> {
        match self {
            Loaded::Many(items) => items,
            Loaded::Single(item) => vec![item],
        }
    }
}

impl<T> From<Vec<T>> for Loaded<T> {
    fn from(items: Vec<T>) -> Self {
        Loaded::Many(items)
    }
}

impl<'a, T> IntoIterator for &'a Loaded<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// 按 ID 批量加载领域对象
pub trait BulkLoader<T> {
    fn load_by_ids(&self, ids: &[String]) -> std::result::Result<Loaded<T>, LoaderError>;
}

impl<T, F> BulkLoader<T> for F
where
    F: Fn(&[String]) -> std::result::Result<Loaded<T>, LoaderError>,
{
    fn load_by_ids(&self, ids: &[String]) -> std::result::Result<Loaded<T>, LoaderError> {
        self(ids)
    }
}

/// 默认加载器：逐个按主键查找，找不到的 ID 被跳过
pub struct FindById<F> {
    find: F,
}

impl<F> FindById<F> {
    pub fn new(find: F) -> Self {
        Self { find }
    }
}

impl<T, F> BulkLoader<T> for FindById<F>
where
    F: Fn(&str) -> std::result::Result<Option<T>, LoaderError>,
{
    fn load_by_ids(&self, ids: &[String]) -> std::result::Result<Loaded<T>, LoaderError> {
        let mut found = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(item) = (self.find)(id)? {
                found.push(item);
            }
        }
        Ok(Loaded::Many(found))
    }
}

/// 包装 `QueryBuilder`，把命中还原为领域对象
pub struct ResultMaterializer<'a, R, T, L> {
    query: QueryBuilder<'a, R>,
    identity_field: String,
    loader: L,
    loaded: Option<Loaded<T>>,
}

impl<'a, R, T, L: BulkLoader<T>> ResultMaterializer<'a, R, T, L> {
    /// 身份字段会被加入返回字段
    pub fn new(
        mut query: QueryBuilder<'a, R>,
        identity_field: impl Into<String>,
        loader: L,
    ) -> Result<Self> {
        let identity_field = identity_field.into();
        query.returning([identity_field.clone()])?;
        Ok(Self {
            query,
            identity_field,
            loader,
            loaded: None,
        })
    }

    /// 底层查询，用于继续添加子句
    pub fn query(&mut self) -> &mut QueryBuilder<'a, R> {
        &mut self.query
    }

    pub fn identity_field(&self) -> &str {
        &self.identity_field
    }

    /// 只执行远程搜索，不调用加载器
    pub fn found_count(&mut self) -> Result<u64> {
        self.query.found_count()
    }

    /// 执行并加载；结果被缓存，加载器只调用一次
    pub fn materialize(&mut self) -> Result<&Loaded<T>> {
        let loaded = match self.loaded.take() {
            Some(loaded) => loaded,
            None => {
                let ids: Vec<String> = self
                    .query
                    .hits()?
                    .filter_map(|hit| identity_of(hit, &self.identity_field))
                    .collect();
                tracing::debug!("[查询] 按 {} 加载 {} 条记录", self.identity_field, ids.len());
                self.loader.load_by_ids(&ids).map_err(SearchError::Loader)?
            }
        };
        Ok(self.loaded.insert(loaded))
    }

    pub fn iter(&mut self) -> Result<std::slice::Iter<'_, T>> {
        Ok(self.materialize()?.iter())
    }
}

fn identity_of(hit: &Hit, field: &str) -> Option<String> {
    match hit.first(field)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
