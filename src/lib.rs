//! Retry-hardened event publishing with broker topic reconciliation
//!
//! A small facade over a distributed log/broker: declare the topics the
//! process publishes to, and construction brings the broker's catalog up to
//! that set before a single message can be sent. Afterwards, one narrow
//! [`Publisher::send`] operation hands payloads to the transport, wrapped in
//! an exponential-backoff retry that intercepts exactly the request-timeout
//! failure class.
//!
//! ## Send state machine
//!
//! ```text
//! Attempting ──success──> handle returned
//!     │  ▲
//!     │  └──backoff (exponential)──┐
//!     ├──timeout───────────────────┘
//!     └──other failure──> propagated unchanged (terminal)
//! ```
//!
//! ## Structure
//!
//! - [`TopicReconciler`] computes `desired − existing` and creates exactly
//!   that subset in one batch; it never deletes or alters anything.
//! - [`BrokerPublisher`] owns the transport and admin handles, reconciles at
//!   construction, and exposes the retry-wrapped send path.
//! - [`SharedPublisher`] holds the single process-wide instance behind an
//!   explicit once-initialized cell.
//! - The broker itself stays behind the [`Transport`] and [`BrokerAdmin`]
//!   seams; in-memory stubs live in [`test_utils`].

pub mod admin;
pub mod config;
pub mod error;
pub mod publisher;
pub mod reconcile;
pub mod retry;
pub mod shared;
pub mod test_utils;
pub mod topic;
pub mod transport;

use async_trait::async_trait;
use std::fmt::Debug;

pub use admin::BrokerAdmin;
pub use config::{PublisherConfig, RetryConfigToml};
pub use error::PublishError;
pub use publisher::BrokerPublisher;
pub use reconcile::TopicReconciler;
pub use retry::RetryPolicy;
pub use shared::SharedPublisher;
pub use topic::{TopicSpec, DEFAULT_PARTITION_COUNT, DEFAULT_REPLICATION_FACTOR};
pub use transport::{Delivery, DeliveryHandle, PendingSend, SendOptions, Transport};

/// Capability to publish a payload onto a named topic
#[async_trait]
pub trait Publisher: Send + Sync + Debug {
    /// Send a payload with default options.
    ///
    /// Returns the pending-send handle of the dispatched record; awaiting
    /// delivery confirmation is the caller's concern.
    async fn send(&self, topic: &str, payload: &[u8]) -> Result<PendingSend, PublishError> {
        self.send_with(topic, payload, SendOptions::default()).await
    }

    /// Send a payload with explicit transport options.
    async fn send_with(
        &self,
        topic: &str,
        payload: &[u8],
        options: SendOptions,
    ) -> Result<PendingSend, PublishError>;
}
