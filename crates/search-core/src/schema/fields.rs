// search-core/src/schema/fields.rs
//! 索引字段定义
//!
//! 每个字段有名称、类型、取值来源和按类型过滤后的选项。字段在定义 schema
//! 时创建，之后不可变。

use std::fmt;
use std::sync::Arc;

use query::FieldType;
use serde::{Deserialize, Serialize};

use crate::client::IndexServiceClient;
use crate::error::Result;

/// 字段取值
///
/// 远程文档格式没有 null，缺失的值用 `None` 表示并在生成文档时省略。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Str(String),
    UInt(u64),
    /// 多值字段
    List(Vec<FieldValue>),
}

impl FieldValue {
    /// 空列表视为空值（没有可写入的值）
    pub fn is_empty(&self) -> bool {
        matches!(self, FieldValue::List(items) if items.is_empty())
    }

    /// 从 JSON 值转换；null 和对象没有对应的字段值
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        use serde_json::Value;

        match value {
            Value::Null | Value::Object(_) => None,
            Value::Bool(b) => Some(FieldValue::Str(b.to_string())),
            Value::Number(n) => Some(match n.as_u64() {
                Some(v) => FieldValue::UInt(v),
                None => FieldValue::Str(n.to_string()),
            }),
            Value::String(s) => Some(FieldValue::Str(s.clone())),
            Value::Array(items) => Some(FieldValue::List(
                items.iter().filter_map(FieldValue::from_json).collect(),
            )),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Str(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Str(value)
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        FieldValue::UInt(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::UInt(value.into())
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(values: Vec<T>) -> Self {
        FieldValue::List(values.into_iter().map(Into::into).collect())
    }
}

/// 可被索引的记录：按访问器名称读取属性
pub trait Record {
    fn field(&self, accessor: &str) -> Option<FieldValue>;
}

/// JSON 对象按键读取
impl Record for serde_json::Value {
    fn field(&self, accessor: &str) -> Option<FieldValue> {
        self.get(accessor).and_then(FieldValue::from_json)
    }
}

/// 计算字段的取值函数，以记录本身为上下文
pub type Extractor<R> = Arc<dyn Fn(&R) -> Option<FieldValue> + Send + Sync>;

/// 字段取值来源
pub enum Source<R> {
    /// 调用记录上的同名访问器
    Accessor(String),
    /// 对记录求值的函数
    Computed(Extractor<R>),
}

impl<R> Source<R> {
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&R) -> Option<FieldValue> + Send + Sync + 'static,
    {
        Source::Computed(Arc::new(f))
    }
}

impl<R> Clone for Source<R> {
    fn clone(&self) -> Self {
        match self {
            Source::Accessor(name) => Source::Accessor(name.clone()),
            Source::Computed(f) => Source::Computed(Arc::clone(f)),
        }
    }
}

impl<R> fmt::Debug for Source<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Accessor(name) => f.debug_tuple("Accessor").field(name).finish(),
            Source::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// 字段选项
///
/// 不同类型允许的选项不同，不允许的键在创建字段时被静默丢弃。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facet_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_enabled: Option<bool>,
}

impl FieldOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn facet_enabled(mut self, enabled: bool) -> Self {
        self.facet_enabled = Some(enabled);
        self
    }

    pub fn search_enabled(mut self, enabled: bool) -> Self {
        self.search_enabled = Some(enabled);
        self
    }

    pub fn result_enabled(mut self, enabled: bool) -> Self {
        self.result_enabled = Some(enabled);
        self
    }

    /// 只保留 `field_type` 允许的选项
    pub fn restricted_to(mut self, field_type: FieldType) -> Self {
        match field_type {
            FieldType::Literal => {}
            FieldType::UInt => {
                self.facet_enabled = None;
                self.search_enabled = None;
                self.result_enabled = None;
            }
            FieldType::Text => {
                self.search_enabled = None;
            }
        }
        self
    }
}

/// 远程字段定义中按类型命名的选项对象
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypedFieldOptions {
    #[serde(rename = "literal_options")]
    Literal(FieldOptions),
    #[serde(rename = "u_int_options")]
    UInt(FieldOptions),
    #[serde(rename = "text_options")]
    Text(FieldOptions),
}

/// 远程字段定义（线上格式）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub index_field_name: String,
    pub index_field_type: FieldType,
    #[serde(flatten)]
    pub options: TypedFieldOptions,
}

/// 单个索引字段
pub struct FieldSpec<R> {
    name: String,
    field_type: FieldType,
    source: Source<R>,
    options: FieldOptions,
}

impl<R> FieldSpec<R> {
    /// 创建字段，取值来源默认为同名访问器
    pub fn new(name: impl Into<String>, field_type: FieldType, options: FieldOptions) -> Self {
        let name = name.into();
        Self {
            source: Source::Accessor(name.clone()),
            name,
            field_type,
            options: options.restricted_to(field_type),
        }
    }

    /// 按类型名称创建字段，类型名无效时返回 `InvalidFieldType`
    pub fn create(name: impl Into<String>, field_type: &str, options: FieldOptions) -> Result<Self> {
        let field_type: FieldType = field_type.parse()?;
        Ok(Self::new(name, field_type, options))
    }

    pub fn with_source(mut self, source: Source<R>) -> Self {
        self.source = source;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn source(&self) -> &Source<R> {
        &self.source
    }

    pub fn options(&self) -> &FieldOptions {
        &self.options
    }

    /// 远程字段定义
    pub fn definition(&self) -> FieldDefinition {
        let options = self.options.clone();
        FieldDefinition {
            index_field_name: self.name.clone(),
            index_field_type: self.field_type,
            options: match self.field_type {
                FieldType::Literal => TypedFieldOptions::Literal(options),
                FieldType::UInt => TypedFieldOptions::UInt(options),
                FieldType::Text => TypedFieldOptions::Text(options),
            },
        }
    }

    /// 在远程域中定义该字段
    pub(crate) fn define_in_domain(
        &self,
        client: &dyn IndexServiceClient,
        domain: &str,
    ) -> Result<FieldDefinition> {
        let definition = self.definition();
        client.define_field(domain, &definition)?;
        Ok(definition)
    }
}

impl<R: Record> FieldSpec<R> {
    /// 从记录中取值，不会修改记录
    pub fn value_for(&self, record: &R) -> Option<FieldValue> {
        match &self.source {
            Source::Accessor(accessor) => record.field(accessor),
            Source::Computed(extract) => extract(record),
        }
    }
}

impl<R> Clone for FieldSpec<R> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            field_type: self.field_type,
            source: self.source.clone(),
            options: self.options.clone(),
        }
    }
}

impl<R> fmt::Debug for FieldSpec<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("name", &self.name)
            .field("field_type", &self.field_type)
            .field("source", &self.source)
            .field("options", &self.options)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn all_options() -> FieldOptions {
        FieldOptions::new()
            .default_value("x")
            .facet_enabled(true)
            .search_enabled(true)
            .result_enabled(true)
    }

    #[test]
    fn test_literal_keeps_all_options() {
        let field = FieldSpec::<serde_json::Value>::new("customer_id", FieldType::Literal, all_options());
        assert_eq!(field.options(), &all_options());
    }

    #[test]
    fn test_uint_drops_disallowed_options() {
        let field = FieldSpec::<serde_json::Value>::new("helpfulness", FieldType::UInt, all_options());
        assert_eq!(field.options(), &FieldOptions::new().default_value("x"));
    }

    #[test]
    fn test_text_drops_search_enabled() {
        let field = FieldSpec::<serde_json::Value>::new("body", FieldType::Text, all_options());
        assert_eq!(field.options().search_enabled, None);
        assert_eq!(field.options().facet_enabled, Some(true));
        assert_eq!(field.options().result_enabled, Some(true));
    }

    #[test]
    fn test_create_invalid_type() {
        let err = FieldSpec::<serde_json::Value>::create("x", "double", FieldOptions::new()).unwrap_err();
        assert!(matches!(err, crate::SearchError::InvalidFieldType(t) if t == "double"));
    }

    #[test]
    fn test_value_from_accessor() {
        let record = json!({"customer": "A1234", "helpfulness": 42});
        let field = FieldSpec::new("customer_id", FieldType::Literal, FieldOptions::new())
            .with_source(Source::Accessor("customer".into()));
        assert_eq!(field.value_for(&record), Some(FieldValue::from("A1234")));

        let field = FieldSpec::new("helpfulness", FieldType::UInt, FieldOptions::new());
        assert_eq!(field.value_for(&record), Some(FieldValue::UInt(42)));
    }

    #[test]
    fn test_value_from_computed_source() {
        let record = json!({"first": "Ada", "last": "Lovelace"});
        let field = FieldSpec::new("full_name", FieldType::Text, FieldOptions::new()).with_source(
            Source::computed(|r: &serde_json::Value| {
                let first = r.get("first")?.as_str()?;
                let last = r.get("last")?.as_str()?;
                Some(format!("{} {}", first, last).into())
            }),
        );
        assert_eq!(field.value_for(&record), Some(FieldValue::from("Ada Lovelace")));
    }

    #[test]
    fn test_json_values() {
        assert_eq!(FieldValue::from_json(&json!(null)), None);
        assert_eq!(FieldValue::from_json(&json!(0)), Some(FieldValue::UInt(0)));
        assert_eq!(FieldValue::from_json(&json!(-3)), Some(FieldValue::from("-3")));
        assert_eq!(FieldValue::from_json(&json!(false)), Some(FieldValue::from("false")));
        assert_eq!(
            FieldValue::from_json(&json!(["a", null, 2])),
            Some(FieldValue::List(vec![FieldValue::from("a"), FieldValue::UInt(2)]))
        );
    }

    #[test]
    fn test_definition_wire_format() {
        let field = FieldSpec::<serde_json::Value>::new(
            "customer_id",
            FieldType::Literal,
            FieldOptions::new().search_enabled(true).result_enabled(true),
        );
        let wire = serde_json::to_value(field.definition()).unwrap();
        assert_eq!(
            wire,
            json!({
                "index_field_name": "customer_id",
                "index_field_type": "literal",
                "literal_options": {"search_enabled": true, "result_enabled": true}
            })
        );

        let field = FieldSpec::<serde_json::Value>::new("helpfulness", FieldType::UInt, FieldOptions::new());
        let wire = serde_json::to_value(field.definition()).unwrap();
        assert_eq!(
            wire,
            json!({
                "index_field_name": "helpfulness",
                "index_field_type": "uint",
                "u_int_options": {}
            })
        );
    }
}
