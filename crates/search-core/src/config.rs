// search-core/src/config.rs
//! 配置模块

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::Result;

/// 索引配置
///
/// 所有字段都有默认值，配置文件中可以只写需要覆盖的项：
///
/// ```toml
/// domain-prefix = "prod-"
/// fatal-warnings = false
/// initial-backoff-ms = 1000
/// lang = "en"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct IndexConfig {
    /// 所有域名的前缀（如环境名）
    pub domain_prefix: String,
    /// 查询结果中的警告是否视为错误
    pub fatal_warnings: bool,
    /// 收敛轮询的首次休眠时长（毫秒），之后每次翻倍
    pub initial_backoff_ms: u64,
    /// 写入 add 文档操作的语言标记
    pub lang: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            domain_prefix: String::new(),
            fatal_warnings: true,
            initial_backoff_ms: 1000,
            lang: "en".to_string(),
        }
    }
}

impl IndexConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// 从 TOML 文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// 尝试加载配置，失败则使用默认值
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load_from_file(path.as_ref()) {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!("[配置] 使用默认配置 ({:?}): {}", path.as_ref(), e);
                Self::default()
            }
        }
    }

    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }
}
