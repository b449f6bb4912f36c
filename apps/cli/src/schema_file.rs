//! Schema 文件
//!
//! ```toml
//! owner = "customer_review"
//! qualifier = "recent"
//!
//! [[field]]
//! name = "helpfulness"
//! type = "uint"
//!
//! [[field]]
//! name = "author"
//! type = "literal"
//! source = "author_login"
//! options = { facet_enabled = true }
//! ```

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use search_core::{FieldOptions, FieldSpec, IndexSchema, SchemaRegistry, Source};

use crate::error::{Result, WrapErr};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaFile {
    pub owner: String,
    #[serde(default)]
    pub qualifier: Option<String>,
    #[serde(default, rename = "field")]
    pub fields: Vec<FieldEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    /// 记录上的属性名，默认与字段同名
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub options: FieldOptions,
}

impl SchemaFile {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Read schema file {:?}", path))?;
        Self::from_toml_str(&content).wrap_err_with(|| format!("Invalid schema file {:?}", path))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// 在注册表中创建该 schema 并添加字段
    pub fn register<'r>(
        &self,
        registry: &'r mut SchemaRegistry<Value>,
    ) -> Result<&'r mut IndexSchema<Value>> {
        let schema = registry.index(&self.owner, self.qualifier.as_deref())?;
        for entry in &self.fields {
            let mut field = FieldSpec::create(entry.name.as_str(), &entry.field_type, entry.options.clone())?;
            if let Some(source) = &entry.source {
                field = field.with_source(Source::Accessor(source.clone()));
            }
            schema.add_field_spec(field)?;
        }
        Ok(schema)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use search_core::{FieldType, IndexConfig, SearchError};

    use super::*;
    use crate::offline::OfflineClient;

    const REVIEWS: &str = r#"
owner = "customer_review"
qualifier = "recent"

[[field]]
name = "helpfulness"
type = "uint"
options = { search_enabled = true, default_value = "0" }

[[field]]
name = "author"
type = "literal"
source = "author_login"
options = { facet_enabled = true }
"#;

    fn registry() -> SchemaRegistry<Value> {
        SchemaRegistry::new(Arc::new(OfflineClient), IndexConfig::default())
    }

    #[test]
    fn test_register_schema_file() {
        let file = SchemaFile::from_toml_str(REVIEWS).unwrap();
        let mut registry = registry();
        let schema = file.register(&mut registry).unwrap();

        assert_eq!(schema.name(), "customer-review-recent");
        let names: Vec<&str> = schema.fields().map(|f| f.name()).collect();
        assert_eq!(names, vec!["customer_review_id", "helpfulness", "author"]);

        let helpfulness = schema.field("helpfulness").unwrap();
        assert_eq!(helpfulness.field_type(), FieldType::UInt);
        assert_eq!(helpfulness.options(), &FieldOptions::new().default_value("0"));

        let record = serde_json::json!({"author_login": "ada"});
        assert_eq!(
            schema.field("author").unwrap().value_for(&record),
            Some("ada".into())
        );
    }

    #[test]
    fn test_unknown_field_type() {
        let file = SchemaFile::from_toml_str(
            "owner = \"review\"\n[[field]]\nname = \"score\"\ntype = \"double\"\n",
        )
        .unwrap();
        let err = file.register(&mut registry()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SearchError>(),
            Some(SearchError::InvalidFieldType(t)) if t == "double"
        ));
    }

    #[test]
    fn test_duplicate_identity_field() {
        let file = SchemaFile::from_toml_str(
            "owner = \"review\"\n[[field]]\nname = \"review_id\"\ntype = \"literal\"\n",
        )
        .unwrap();
        let err = file.register(&mut registry()).unwrap_err();
        assert!(matches!(err.downcast_ref::<SearchError>(), Some(SearchError::DuplicateField { .. })));
    }

    #[test]
    fn test_offline_client_rejects_remote_calls() {
        let file = SchemaFile::from_toml_str(REVIEWS).unwrap();
        let mut registry = registry();
        let schema = file.register(&mut registry).unwrap();

        let err = schema.create().unwrap_err();
        assert!(matches!(err, SearchError::Transport(_)));
    }
}
