pub mod compile;
pub mod define;
pub mod document;

use std::path::Path;
use std::sync::Arc;

use search_core::{IndexConfig, IndexSchema, SchemaRegistry};
use serde_json::Value;

use crate::error::{OptionExt, Result};
use crate::offline::OfflineClient;
use crate::schema_file::SchemaFile;

pub use compile::CompileCommand;
pub use define::DefineCommand;
pub use document::DocumentCommand;

pub trait Command {
    fn execute(&self) -> Result<()>;
}

/// 离线注册表，包含 schema 文件声明的索引
struct OpenedSchema {
    registry: SchemaRegistry<Value>,
    file: SchemaFile,
}

impl OpenedSchema {
    fn open(config: &IndexConfig, path: &Path) -> Result<Self> {
        let file = SchemaFile::load(path)?;
        let mut registry = SchemaRegistry::new(Arc::new(OfflineClient), config.clone());
        file.register(&mut registry)?;
        tracing::info!("[索引] 已加载 schema 文件 {:?}", path);
        Ok(Self { registry, file })
    }

    fn schema(&self) -> Result<&IndexSchema<Value>> {
        self.registry
            .get(&self.file.owner, self.file.qualifier.as_deref())
            .ok_or_eyre("schema was not registered")
    }
}
