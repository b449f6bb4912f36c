use crate::error::{Result, WrapErr};
use search_core::IndexConfig;
use std::path::{Path, PathBuf};

/// 加载配置；默认位置的配置文件不存在时写入示例文件
pub fn load(path_override: Option<&Path>) -> Result<IndexConfig> {
    let config_path = match path_override {
        Some(path) => path.to_path_buf(),
        None => ::config::cli_config_path()?,
    };

    match std::fs::read_to_string(&config_path) {
        Ok(content) => IndexConfig::from_toml_str(&content)
            .wrap_err_with(|| format!("Invalid configuration file {:?}", config_path)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && path_override.is_none() => {
            create_example_config(&config_path)?;
            Ok(IndexConfig::default())
        }
        Err(e) => Err(e).wrap_err_with(|| format!("Read configuration file {:?}", config_path)),
    }
}

const EXAMPLE_CONFIG: &str = r#"# cloudindex 配置文件
#
# 此文件在首次运行时自动创建，所有项都可省略

# 所有域名的前缀，如 "prod-"
# domain-prefix = ""

# 查询结果中的警告是否视为错误
# fatal-warnings = true

# 重建索引后轮询状态的首次等待时长（毫秒），之后每次翻倍
# initial-backoff-ms = 1000

# 写入文档的语言标记
# lang = "en"
"#;

fn create_example_config(config_path: &PathBuf) -> Result<()> {
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(config_path, EXAMPLE_CONFIG)?;
    eprintln!("已创建配置文件: {:?}", config_path);
    Ok(())
}
