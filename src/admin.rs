use crate::{PublishError, TopicSpec};
use async_trait::async_trait;
use std::collections::HashSet;
use std::fmt::Debug;

/// Administrative access to the broker's topic catalog.
///
/// Implementations wrap a real broker admin client. The reconciler only needs
/// two operations: a catalog snapshot and a batch creation call. Errors must
/// be surfaced as-is; this crate performs no translation on top of them.
#[async_trait]
pub trait BrokerAdmin: Send + Sync + Debug {
    /// List the topic names currently known to the broker.
    ///
    /// The snapshot is authoritative at query time only; other processes may
    /// create topics concurrently.
    async fn list_topics(&self) -> Result<HashSet<String>, PublishError>;

    /// Create all topics in `specs` in a single batch request.
    ///
    /// With `validate_only = true` the broker checks the descriptors without
    /// creating anything. An empty batch is a no-op and must succeed.
    /// Partial success is broker-defined and surfaced as-is; implementations
    /// must not attempt compensating rollback.
    async fn create_topics(
        &self,
        specs: &[TopicSpec],
        validate_only: bool,
    ) -> Result<(), PublishError>;
}
