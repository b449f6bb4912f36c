// search-core/src/testing.rs
//! 测试替身：记录调用的客户端和虚拟时钟

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::client::{DomainStatus, IndexServiceClient, ServiceEndpoint, TransportError};
use crate::clock::Clock;
use crate::schema::{DocumentOperation, FieldDefinition};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// 带 endpoint 的域状态
pub fn domain_status(processing: bool, requires_index_documents: bool) -> DomainStatus {
    DomainStatus {
        domain_name: "test".to_string(),
        requires_index_documents,
        processing,
        search_service: ServiceEndpoint {
            endpoint: Some("search-test.example.com".to_string()),
        },
        doc_service: ServiceEndpoint {
            endpoint: Some("doc-test.example.com".to_string()),
        },
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateDomain(String),
    DefineField(String, FieldDefinition),
    DescribeDomain(String),
    IndexDocuments(String),
    PostDocuments(String, Vec<DocumentOperation>),
    Search(String, Vec<(&'static str, String)>),
}

/// 记录所有调用；describe 按脚本依次返回，最后一个重复使用
#[derive(Default)]
pub struct MockClient {
    statuses: Mutex<VecDeque<Vec<DomainStatus>>>,
    search_response: Mutex<serde_json::Value>,
    calls: Mutex<Vec<Call>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_statuses(self, statuses: Vec<Vec<DomainStatus>>) -> Self {
        *lock(&self.statuses) = statuses.into();
        self
    }

    pub fn with_search_response(self, response: serde_json::Value) -> Self {
        *lock(&self.search_response) = response;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        lock(&self.calls).clone()
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        lock(&self.calls).iter().filter(|c| predicate(c)).count()
    }

    fn record(&self, call: Call) {
        lock(&self.calls).push(call);
    }
}

impl IndexServiceClient for MockClient {
    fn create_domain(&self, domain: &str) -> Result<(), TransportError> {
        self.record(Call::CreateDomain(domain.to_string()));
        Ok(())
    }

    fn define_field(&self, domain: &str, definition: &FieldDefinition) -> Result<(), TransportError> {
        self.record(Call::DefineField(domain.to_string(), definition.clone()));
        Ok(())
    }

    fn describe_domain(&self, domain: &str) -> Result<Vec<DomainStatus>, TransportError> {
        self.record(Call::DescribeDomain(domain.to_string()));
        let mut statuses = lock(&self.statuses);
        let next = if statuses.len() > 1 {
            statuses.pop_front()
        } else {
            statuses.front().cloned()
        };
        Ok(next.unwrap_or_default())
    }

    fn index_documents(&self, domain: &str) -> Result<(), TransportError> {
        self.record(Call::IndexDocuments(domain.to_string()));
        Ok(())
    }

    fn post_documents(
        &self,
        endpoint: &str,
        operations: &[DocumentOperation],
    ) -> Result<serde_json::Value, TransportError> {
        self.record(Call::PostDocuments(endpoint.to_string(), operations.to_vec()));
        Ok(serde_json::json!({"status": "success", "adds": 1, "deletes": 0}))
    }

    fn search(
        &self,
        endpoint: &str,
        params: &[(&'static str, String)],
    ) -> Result<serde_json::Value, TransportError> {
        self.record(Call::Search(endpoint.to_string(), params.to_vec()));
        Ok(lock(&self.search_response).clone())
    }
}

/// 虚拟时钟：sleep 只推进时间并记录时长
pub struct FakeClock {
    start: Instant,
    elapsed: Mutex<Duration>,
    sleeps: Mutex<Vec<Duration>>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            elapsed: Mutex::new(Duration::ZERO),
            sleeps: Mutex::new(Vec::new()),
        }
    }

    pub fn elapsed(&self) -> Duration {
        *lock(&self.elapsed)
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        lock(&self.sleeps).clone()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        self.start + self.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        *lock(&self.elapsed) += duration;
        lock(&self.sleeps).push(duration);
    }
}
