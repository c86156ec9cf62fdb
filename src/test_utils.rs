//! In-memory collaborator stubs for testing
//!
//! `MemoryTransport` and `MemoryAdmin` stand in for the broker client. Both
//! are cheaply cloneable (shared interior state) so a probe clone can be kept
//! for assertions after the original moves into a publisher. Failures are
//! scripted per call: `timeout_next` / `fail_next_send` on the transport,
//! `fail_next_list` / `fail_next_create` on the admin.

use crate::{
    BrokerAdmin, Delivery, PendingSend, PublishError, SendOptions, TopicSpec, Transport,
};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A record captured by [`MemoryTransport`]
#[derive(Debug, Clone)]
pub struct SentRecord {
    pub topic: String,
    pub payload: Vec<u8>,
    pub options: SendOptions,
}

/// Transport stub that collects dispatched records
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    records: Arc<Mutex<Vec<SentRecord>>>,
    attempts: Arc<AtomicU64>,
    timeouts_remaining: Arc<AtomicU32>,
    fail_message: Arc<Mutex<Option<String>>>,
    next_offset: Arc<AtomicI64>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `count` sends with the timeout condition
    pub fn timeout_next(&self, count: u32) {
        self.timeouts_remaining.store(count, Ordering::Relaxed);
    }

    /// Fail the next send with a non-timeout transport error
    pub fn fail_next_send(&self, message: impl Into<String>) {
        *self.fail_message.lock().unwrap() = Some(message.into());
    }

    /// All successfully dispatched records, in order
    pub fn sent_records(&self) -> Vec<SentRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Total send attempts, failed ones included
    pub fn attempt_count(&self) -> u64 {
        self.attempts.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn send(
        &self,
        topic: &str,
        payload: &[u8],
        options: &SendOptions,
    ) -> Result<PendingSend, PublishError> {
        self.attempts.fetch_add(1, Ordering::Relaxed);

        if let Some(message) = self.fail_message.lock().unwrap().take() {
            return Err(PublishError::transport(message));
        }

        // Atomic decrement so concurrent sends each consume one scripted
        // timeout at most.
        let timed_out = self
            .timeouts_remaining
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1))
            .is_ok();
        if timed_out {
            return Err(PublishError::timeout(Duration::from_millis(30)));
        }

        self.records.lock().unwrap().push(SentRecord {
            topic: topic.to_string(),
            payload: payload.to_vec(),
            options: options.clone(),
        });

        let partition = options.partition.unwrap_or(0);
        let offset = self.next_offset.fetch_add(1, Ordering::Relaxed);
        Ok(PendingSend::completed(Ok(Delivery::new(
            topic, partition, offset,
        ))))
    }
}

/// Admin stub over an in-memory topic catalog
#[derive(Debug, Clone, Default)]
pub struct MemoryAdmin {
    topics: Arc<Mutex<HashSet<String>>>,
    created_batches: Arc<Mutex<Vec<Vec<TopicSpec>>>>,
    fail_list: Arc<Mutex<Option<String>>>,
    fail_create: Arc<Mutex<Option<String>>>,
}

impl MemoryAdmin {
    /// Create an admin with an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an admin with pre-existing topics
    pub fn with_topics(names: &[&str]) -> Self {
        let admin = Self::new();
        {
            let mut topics = admin.topics.lock().unwrap();
            topics.extend(names.iter().map(|s| s.to_string()));
        }
        admin
    }

    /// Fail the next list call with a transport error
    pub fn fail_next_list(&self, message: impl Into<String>) {
        *self.fail_list.lock().unwrap() = Some(message.into());
    }

    /// Fail the next create call with a broker rejection
    pub fn fail_next_create(&self, message: impl Into<String>) {
        *self.fail_create.lock().unwrap() = Some(message.into());
    }

    /// Current catalog snapshot
    pub fn topic_names(&self) -> HashSet<String> {
        self.topics.lock().unwrap().clone()
    }

    /// Every creation batch submitted, empty batches included
    pub fn created_batches(&self) -> Vec<Vec<TopicSpec>> {
        self.created_batches.lock().unwrap().clone()
    }
}

#[async_trait]
impl BrokerAdmin for MemoryAdmin {
    async fn list_topics(&self) -> Result<HashSet<String>, PublishError> {
        if let Some(message) = self.fail_list.lock().unwrap().take() {
            return Err(PublishError::transport(message));
        }

        Ok(self.topics.lock().unwrap().clone())
    }

    async fn create_topics(
        &self,
        specs: &[TopicSpec],
        validate_only: bool,
    ) -> Result<(), PublishError> {
        if let Some(message) = self.fail_create.lock().unwrap().take() {
            return Err(PublishError::rejected(message));
        }

        self.created_batches.lock().unwrap().push(specs.to_vec());

        if !validate_only {
            let mut topics = self.topics.lock().unwrap();
            for spec in specs {
                topics.insert(spec.name.clone());
            }
        }

        Ok(())
    }
}
