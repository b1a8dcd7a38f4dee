//! Shared fixtures for upstream and fetch tests.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::io;

use async_trait::async_trait;
use serde_json::{Value, json};

use super::{Endpoint, MemberApi, TransportError};

/// Drive `future` to completion on a single-threaded Tokio runtime.
pub fn block_on_for_tests<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .expect("failed to build Tokio runtime")
        .block_on(future)
}

/// In-memory [`MemberApi`] that serves canned payloads.
///
/// Members registered with [`StubApi::failing`] never succeed; members
/// registered with [`StubApi::flaky`] fail a fixed number of times first.
/// Every other member endpoint returns [`StubApi::member_payload`].
#[derive(Debug, Default)]
pub struct StubApi {
    failing: HashSet<String>,
    flaky: HashMap<String, u32>,
    payloads: HashMap<String, Value>,
    attempts: RefCell<HashMap<String, u32>>,
}

impl StubApi {
    /// Stub where every request succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every request for `member_number` fail.
    #[must_use]
    pub fn failing(mut self, member_number: impl Into<String>) -> Self {
        self.failing.insert(member_number.into());
        self
    }

    /// Fail the first `failures` requests for `member_number`.
    #[must_use]
    pub fn flaky(mut self, member_number: impl Into<String>, failures: u32) -> Self {
        self.flaky.insert(member_number.into(), failures);
        self
    }

    /// Serve `payload` for `endpoint` instead of the generated one.
    #[must_use]
    pub fn with_payload(mut self, endpoint: &Endpoint, payload: Value) -> Self {
        self.payloads.insert(endpoint.to_string(), payload);
        self
    }

    /// Number of requests made for `endpoint`.
    pub fn attempts(&self, endpoint: &Endpoint) -> u32 {
        self.attempts
            .borrow()
            .get(endpoint.as_ref())
            .copied()
            .unwrap_or(0)
    }

    /// Total number of requests served.
    pub fn total_attempts(&self) -> u32 {
        self.attempts.borrow().values().sum()
    }

    /// Payload generated for a member endpoint.
    pub fn member_payload(member_number: &str) -> Value {
        json!({
            "member_data": {
                "member_number": member_number,
                "member_id": format!("id-{member_number}"),
            },
            "classifiers": [],
        })
    }

    fn record_attempt(&self, endpoint: &Endpoint) -> u32 {
        let mut attempts = self.attempts.borrow_mut();
        let count = attempts.entry(endpoint.to_string()).or_insert(0);
        *count += 1;
        *count
    }
}

#[async_trait(?Send)]
impl MemberApi for StubApi {
    async fn fetch(&self, endpoint: &Endpoint) -> Result<Value, TransportError> {
        let attempt = self.record_attempt(endpoint);
        let member = endpoint.member_number().unwrap_or_default();
        let flaky_failures = self.flaky.get(member).copied().unwrap_or(0);
        if self.failing.contains(member) || attempt <= flaky_failures {
            return Err(TransportError::Network {
                url: format!("stub://{endpoint}"),
                source: io::Error::new(io::ErrorKind::ConnectionReset, "stubbed failure"),
            });
        }
        if let Some(payload) = self.payloads.get(endpoint.as_ref()) {
            return Ok(payload.clone());
        }
        Ok(Self::member_payload(member))
    }
}
