// search-core/src/schema/document.rs
//! 文档操作定义
//!
//! 提交到文档 endpoint 的 JSON 数组中的单个元素：
//!
//! ```text
//! {"type": "add", "id": "...", "version": 3, "lang": "en", "fields": {...}}
//! {"type": "delete", "id": "...", "version": 4}
//! ```
//!
//! 远程服务只接受 version 严格大于该文档上次被接受版本的操作。

use std::collections::BTreeMap;
use std::fmt::Display;

use md5::{Digest, Md5};
use serde::Serialize;

use super::fields::FieldValue;

/// 文档操作
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DocumentOperation {
    Add {
        id: String,
        version: u64,
        lang: String,
        fields: BTreeMap<String, FieldValue>,
    },
    Delete {
        id: String,
        version: u64,
    },
}

impl DocumentOperation {
    pub fn id(&self) -> &str {
        match self {
            DocumentOperation::Add { id, .. } | DocumentOperation::Delete { id, .. } => id,
        }
    }

    pub fn version(&self) -> u64 {
        match self {
            DocumentOperation::Add { version, .. } | DocumentOperation::Delete { version, .. } => {
                *version
            }
        }
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, DocumentOperation::Delete { .. })
    }
}

/// 由记录 ID 生成文档 ID
///
/// 32 位小写十六进制 MD5，满足远程服务对文档 ID 字符集和长度的限制。
pub fn document_id(record_id: impl Display) -> String {
    let mut hasher = Md5::new();
    hasher.update(record_id.to_string().as_bytes());
    format!("{:x}", hasher.finalize())
}
