use std::path::PathBuf;

use search_core::IndexConfig;

use super::{Command, OpenedSchema};
use crate::error::Result;

pub struct DefineCommand {
    config: IndexConfig,
    schema: PathBuf,
}

impl DefineCommand {
    pub fn new(config: IndexConfig, schema: PathBuf) -> Self {
        Self { config, schema }
    }
}

impl Command for DefineCommand {
    fn execute(&self) -> Result<()> {
        let opened = OpenedSchema::open(&self.config, &self.schema)?;
        let schema = opened.schema()?;

        println!("domain: {}", schema.name());
        println!("{}", serde_json::to_string_pretty(&schema.field_definitions())?);
        Ok(())
    }
}
