use std::path::PathBuf;

use search_core::{DocumentOperation, IndexConfig};
use serde_json::Value;

use super::{Command, OpenedSchema};
use crate::error::{OptionExt, Result, WrapErr, error};

pub struct DocumentCommand {
    config: IndexConfig,
    schema: PathBuf,
    record: PathBuf,
    id: Option<String>,
    version: u64,
    delete: bool,
}

impl DocumentCommand {
    pub fn new(
        config: IndexConfig,
        schema: PathBuf,
        record: PathBuf,
        id: Option<String>,
        version: u64,
        delete: bool,
    ) -> Self {
        Self {
            config,
            schema,
            record,
            id,
            version,
            delete,
        }
    }

    fn build_operation(&self) -> Result<DocumentOperation> {
        let opened = OpenedSchema::open(&self.config, &self.schema)?;
        let schema = opened.schema()?;

        let content = std::fs::read_to_string(&self.record)
            .wrap_err_with(|| format!("Read record file {:?}", self.record))?;
        let record: Value = serde_json::from_str(&content)
            .wrap_err_with(|| format!("Invalid record file {:?}", self.record))?;
        if !record.is_object() {
            return Err(error!("record must be a JSON object"));
        }

        let id = match &self.id {
            Some(id) => id.clone(),
            None => record_id(&record).ok_or_eyre("record has no `id` property, pass --id")?,
        };

        Ok(if self.delete {
            schema.build_deletion_payload(&id, self.version)
        } else {
            schema.build_addition_payload(&record, &id, self.version)
        })
    }
}

fn record_id(record: &Value) -> Option<String> {
    match record.get("id")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl Command for DocumentCommand {
    fn execute(&self) -> Result<()> {
        let operation = self.build_operation()?;
        println!("{}", serde_json::to_string_pretty(&[operation])?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use search_core::{FieldValue, document_id};

    use super::*;

    const SCHEMA: &str = "owner = \"review\"\n\n[[field]]\nname = \"helpfulness\"\ntype = \"uint\"\n";

    fn command(record: &str, id: Option<&str>, delete: bool) -> (tempfile::TempDir, DocumentCommand) {
        let dir = tempfile::tempdir().unwrap();
        let schema = dir.path().join("review.toml");
        let record_path = dir.path().join("record.json");
        std::fs::write(&schema, SCHEMA).unwrap();
        std::fs::write(&record_path, record).unwrap();

        let cmd = DocumentCommand::new(
            IndexConfig::default(),
            schema,
            record_path,
            id.map(str::to_string),
            4,
            delete,
        );
        (dir, cmd)
    }

    #[test]
    fn test_add_uses_record_id() {
        let (_dir, cmd) = command(r#"{"id": 17, "helpfulness": 3}"#, None, false);
        let op = cmd.build_operation().unwrap();

        let mut fields = BTreeMap::new();
        fields.insert("review_id".to_string(), FieldValue::UInt(17));
        fields.insert("helpfulness".to_string(), FieldValue::UInt(3));
        assert_eq!(
            op,
            DocumentOperation::Add {
                id: document_id(17),
                version: 4,
                lang: "en".to_string(),
                fields,
            }
        );
    }

    #[test]
    fn test_delete_with_explicit_id() {
        let (_dir, cmd) = command("{}", Some("abc"), true);
        let op = cmd.build_operation().unwrap();
        assert_eq!(
            op,
            DocumentOperation::Delete {
                id: document_id("abc"),
                version: 4
            }
        );
    }

    #[test]
    fn test_missing_id() {
        let (_dir, cmd) = command(r#"{"helpfulness": 3}"#, None, false);
        assert!(cmd.build_operation().is_err());
    }

    #[test]
    fn test_record_must_be_object() {
        let (_dir, cmd) = command("[1, 2]", Some("a"), false);
        assert!(cmd.build_operation().is_err());
    }
}
