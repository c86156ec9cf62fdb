//! Broker-backed publisher with construction-time topic reconciliation
//!
//! `BrokerPublisher` owns one transport handle and one admin client for the
//! lifetime of the process. Reconciliation runs exactly once, synchronously,
//! inside construction; the value does not exist until the topic universe is
//! established, so there is no race between reconciliation and publishing
//! within a process. After that, `send` calls flow straight to the transport;
//! topic existence is never re-queried per send.

use crate::{
    BrokerAdmin, PendingSend, PublishError, Publisher, RetryPolicy, SendOptions, TopicReconciler,
    Transport,
};
use async_trait::async_trait;
use std::collections::HashSet;

/// Concrete [`Publisher`] over a broker transport.
///
/// `send` is wrapped in the configured [`RetryPolicy`] with the timeout
/// predicate: request timeouts back off and retry, every other failure
/// propagates immediately. The backoff sleep suspends only the retrying call,
/// so concurrent sends on a shared publisher are unaffected.
#[derive(Debug)]
pub struct BrokerPublisher<T, A> {
    transport: T,
    admin: A,
    topics: HashSet<String>,
    retry_policy: RetryPolicy,
}

impl<T, A> BrokerPublisher<T, A>
where
    T: Transport,
    A: BrokerAdmin,
{
    /// Construct a publisher with the default retry policy, reconciling
    /// `desired` topics first.
    ///
    /// Fails if reconciliation fails; a publisher whose topic universe could
    /// not be established is never handed out.
    pub async fn connect(
        transport: T,
        admin: A,
        desired: HashSet<String>,
    ) -> Result<Self, PublishError> {
        Self::connect_with_policy(transport, admin, desired, RetryPolicy::default()).await
    }

    /// Construct a publisher with an explicit retry policy.
    pub async fn connect_with_policy(
        transport: T,
        admin: A,
        desired: HashSet<String>,
        retry_policy: RetryPolicy,
    ) -> Result<Self, PublishError> {
        let reconciler = TopicReconciler::new(desired)?;
        let topics = reconciler.reconcile(&admin).await?;

        tracing::debug!(topics = topics.len(), "Publisher ready");

        Ok(Self {
            transport,
            admin,
            topics,
            retry_policy,
        })
    }

    /// The topic universe established at construction
    pub fn topics(&self) -> &HashSet<String> {
        &self.topics
    }

    /// Check whether `name` is part of the established universe.
    ///
    /// Informational only; `send` does not consult this. Sending to an
    /// unregistered topic is delegated to the broker, which may auto-create
    /// or reject it per its own policy.
    pub fn contains_topic(&self, name: &str) -> bool {
        self.topics.contains(name)
    }

    /// The admin client held by this publisher
    pub fn admin(&self) -> &A {
        &self.admin
    }

    /// The configured retry policy
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }
}

#[async_trait]
impl<T, A> Publisher for BrokerPublisher<T, A>
where
    T: Transport,
    A: BrokerAdmin,
{
    async fn send_with(
        &self,
        topic: &str,
        payload: &[u8],
        options: SendOptions,
    ) -> Result<PendingSend, PublishError> {
        tracing::debug!(topic, bytes = payload.len(), "Dispatching send");

        self.retry_policy
            .run(PublishError::is_timeout, || {
                self.transport.send(topic, payload, &options)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MemoryAdmin, MemoryTransport};
    use std::time::Duration;

    fn topic_set(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn fast_policy() -> RetryPolicy {
        RetryPolicy::default().with_base_delay(Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_construction_reconciles_topics() {
        let transport = MemoryTransport::new();
        let admin = MemoryAdmin::with_topics(&["orders"]);
        let admin_probe = admin.clone();

        let publisher = BrokerPublisher::connect(transport, admin, topic_set(&["clicks"]))
            .await
            .unwrap();

        assert_eq!(publisher.topics(), &topic_set(&["orders", "clicks"]));
        assert!(publisher.contains_topic("clicks"));
        assert!(!publisher.contains_topic("refunds"));
        assert_eq!(admin_probe.created_batches().len(), 1);
    }

    #[tokio::test]
    async fn test_construction_fails_when_reconciliation_fails() {
        let transport = MemoryTransport::new();
        let admin = MemoryAdmin::new();
        admin.fail_next_create("permission denied");

        let result = BrokerPublisher::connect(transport, admin, topic_set(&["clicks"])).await;
        assert!(matches!(result, Err(PublishError::Rejected(_))));
    }

    #[tokio::test]
    async fn test_send_returns_resolvable_handle() {
        let transport = MemoryTransport::new();
        let transport_probe = transport.clone();
        let publisher = BrokerPublisher::connect(transport, MemoryAdmin::new(), topic_set(&["orders"]))
            .await
            .unwrap();

        let pending = publisher.send("orders", b"evt1").await.unwrap();
        let delivery = pending.await.unwrap();

        assert_eq!(delivery.topic, "orders");
        assert_eq!(transport_probe.sent_records().len(), 1);
        assert_eq!(transport_probe.sent_records()[0].payload, b"evt1");
    }

    #[tokio::test]
    async fn test_send_retries_timeouts_then_succeeds() {
        let transport = MemoryTransport::new();
        transport.timeout_next(2);
        let transport_probe = transport.clone();

        let publisher = BrokerPublisher::connect_with_policy(
            transport,
            MemoryAdmin::new(),
            topic_set(&["orders"]),
            fast_policy(),
        )
        .await
        .unwrap();

        let pending = publisher.send("orders", b"evt1").await.unwrap();
        pending.await.unwrap();

        assert_eq!(transport_probe.attempt_count(), 3);
        assert_eq!(transport_probe.sent_records().len(), 1);
    }

    #[tokio::test]
    async fn test_non_timeout_failure_propagates_without_retry() {
        let transport = MemoryTransport::new();
        transport.fail_next_send("serialization failed");
        let transport_probe = transport.clone();

        let publisher = BrokerPublisher::connect_with_policy(
            transport,
            MemoryAdmin::new(),
            topic_set(&["orders"]),
            fast_policy(),
        )
        .await
        .unwrap();

        let result = publisher.send("orders", b"evt1").await;

        assert!(matches!(result, Err(PublishError::Transport(_))));
        assert_eq!(transport_probe.attempt_count(), 1);
    }

    #[tokio::test]
    async fn test_bounded_retries_surface_persistent_timeout() {
        let transport = MemoryTransport::new();
        transport.timeout_next(10);
        let transport_probe = transport.clone();

        let publisher = BrokerPublisher::connect_with_policy(
            transport,
            MemoryAdmin::new(),
            topic_set(&["orders"]),
            fast_policy().with_max_attempts(4),
        )
        .await
        .unwrap();

        let result = publisher.send("orders", b"evt1").await;

        assert!(matches!(result, Err(PublishError::Timeout(_))));
        assert_eq!(transport_probe.attempt_count(), 4);
    }

    #[tokio::test]
    async fn test_send_options_forwarded_verbatim() {
        let transport = MemoryTransport::new();
        let transport_probe = transport.clone();
        let publisher = BrokerPublisher::connect(transport, MemoryAdmin::new(), topic_set(&["orders"]))
            .await
            .unwrap();

        let options = SendOptions::new().with_key(b"user-17".to_vec()).with_partition(2);
        publisher.send_with("orders", b"evt1", options).await.unwrap();

        let records = transport_probe.sent_records();
        assert_eq!(records[0].options.key.as_deref(), Some(b"user-17".as_slice()));
        assert_eq!(records[0].options.partition, Some(2));
    }

    #[tokio::test]
    async fn test_unregistered_topic_is_delegated_to_broker() {
        let transport = MemoryTransport::new();
        let publisher = BrokerPublisher::connect(transport, MemoryAdmin::new(), topic_set(&["orders"]))
            .await
            .unwrap();

        // Membership is not re-validated on the send path.
        let pending = publisher.send("unknown", b"evt1").await.unwrap();
        assert!(pending.await.is_ok());
    }
}
