//! 离线客户端：本工具不访问远程服务

use search_core::client::{DomainStatus, IndexServiceClient, TransportError};
use search_core::{DocumentOperation, FieldDefinition};

const OFFLINE: &str = "cloudindex runs offline, no transport is configured";

#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineClient;

impl OfflineClient {
    fn reject<T>(&self, action: &str) -> Result<T, TransportError> {
        tracing::debug!("[离线] 拒绝远程调用: {}", action);
        Err(TransportError::new(format!("{} ({})", OFFLINE, action)))
    }
}

impl IndexServiceClient for OfflineClient {
    fn create_domain(&self, domain: &str) -> Result<(), TransportError> {
        self.reject(&format!("create domain {}", domain))
    }

    fn define_field(&self, domain: &str, definition: &FieldDefinition) -> Result<(), TransportError> {
        self.reject(&format!("define {}.{}", domain, definition.index_field_name))
    }

    fn describe_domain(&self, domain: &str) -> Result<Vec<DomainStatus>, TransportError> {
        self.reject(&format!("describe {}", domain))
    }

    fn index_documents(&self, domain: &str) -> Result<(), TransportError> {
        self.reject(&format!("reindex {}", domain))
    }

    fn post_documents(
        &self,
        endpoint: &str,
        _operations: &[DocumentOperation],
    ) -> Result<serde_json::Value, TransportError> {
        self.reject(&format!("post documents to {}", endpoint))
    }

    fn search(
        &self,
        endpoint: &str,
        _params: &[(&'static str, String)],
    ) -> Result<serde_json::Value, TransportError> {
        self.reject(&format!("search {}", endpoint))
    }
}
