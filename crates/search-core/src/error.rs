// search-core/src/error.rs
//! 错误类型

use query::{CompileError, UnknownFieldType};
use thiserror::Error;

use crate::client::TransportError;

pub type Result<T> = std::result::Result<T, SearchError>;

/// 批量加载器返回的错误
pub type LoaderError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("无效的字段类型 '{0}'")]
    InvalidFieldType(String),

    #[error("字段 {field} 已存在于索引 {domain}")]
    DuplicateField { domain: String, field: String },

    #[error("索引 {domain} 中未定义字段 '{field}'")]
    UnknownField { domain: String, field: String },

    #[error("无效的域名 '{0}'：只允许小写字母、数字和连字符，且不能为空")]
    InvalidDomainName(String),

    /// 运算符不支持、取值不合法或查询为空
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("查询已执行，不能再修改")]
    AlreadyMaterialized,

    #[error("找不到域 '{0}'，请检查名称和所在区域")]
    DomainNotFound(String),

    #[error("域 '{domain}' 的 {service} 服务尚无可用 endpoint")]
    EndpointUnavailable { domain: String, service: &'static str },

    #[error("查询结果包含警告 {code}: {message}")]
    WarningInQueryResult { code: String, message: String },

    #[error("响应格式错误，缺少 hits: {0}")]
    MalformedResponse(String),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("批量加载失败: {0}")]
    Loader(#[source] LoaderError),

    #[error("读取配置文件失败: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("配置文件格式错误: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl From<UnknownFieldType> for SearchError {
    fn from(err: UnknownFieldType) -> Self {
        SearchError::InvalidFieldType(err.0)
    }
}

impl SearchError {
    /// 是否为 `CompileError::UnsupportedOperator`
    pub fn is_unsupported_operator(&self) -> bool {
        matches!(self, SearchError::Compile(CompileError::UnsupportedOperator { .. }))
    }

    /// 是否为 `CompileError::NoClauses`
    pub fn is_no_clauses(&self) -> bool {
        matches!(self, SearchError::Compile(CompileError::NoClauses))
    }
}
