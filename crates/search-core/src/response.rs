// search-core/src/response.rs
//! 搜索响应

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Result, SearchError};

/// 远程消息（警告或错误）
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResponseMessage {
    pub severity: String,
    pub code: String,
    pub message: String,
}

impl ResponseMessage {
    pub fn is_warning(&self) -> bool {
        self.severity == "warning"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ResponseInfo {
    pub messages: Vec<ResponseMessage>,
}

/// 单条命中
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Hit {
    pub id: String,
    /// 返回字段 → 值（通常是数组）
    pub data: BTreeMap<String, Value>,
}

impl Hit {
    /// 字段的第一个值；不是数组时视为单值
    pub fn first(&self, field: &str) -> Option<&Value> {
        let value = match self.data.get(field)? {
            Value::Array(values) => values.first(),
            value => Some(value),
        };
        value.filter(|value| !value.is_null())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Hits {
    pub found: u64,
    pub start: u64,
    pub hit: Vec<Hit>,
}

/// 解析后的搜索响应
///
/// 成功时包含 `hits`；远程错误时只有顶层 `messages`。
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SearchResponse {
    pub hits: Option<Hits>,
    pub info: Option<ResponseInfo>,
    pub messages: Vec<ResponseMessage>,
}

impl SearchResponse {
    pub fn from_json(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| SearchError::MalformedResponse(e.to_string()))
    }

    /// `info.messages` 中的警告，按响应顺序
    pub fn warnings(&self) -> impl Iterator<Item = &ResponseMessage> {
        self.info
            .iter()
            .flat_map(|info| info.messages.iter())
            .filter(|message| message.is_warning())
    }

    /// 命中部分；缺失时返回 `MalformedResponse` 并带上远程消息
    pub fn hits(&self) -> Result<&Hits> {
        self.hits.as_ref().ok_or_else(|| {
            let messages: Vec<String> = self
                .messages
                .iter()
                .map(|m| format!("{}: {}", m.code, m.message))
                .collect();
            SearchError::MalformedResponse(format!("messages: [{}]", messages.join(", ")))
        })
    }
}
