//! Topic reconciliation against the broker catalog
//!
//! Brings the broker's topic universe up to the minimum required for a
//! declared set of topics: query the catalog, compute the missing subset,
//! create exactly that subset in one batch. Pre-existing topics are never
//! touched; the reconciler issues no delete or alter requests.

use crate::{BrokerAdmin, PublishError, TopicSpec};
use std::collections::HashSet;

/// Construction-time reconciler for a desired topic set.
///
/// Idempotent with respect to broker state: a second run over the same
/// desired set finds nothing missing and submits an empty batch. Safe to run
/// concurrently from multiple processes with overlapping desired sets as long
/// as the broker handles duplicate creation of an existing topic; the
/// reconciler does not serialize across processes.
#[derive(Debug, Clone)]
pub struct TopicReconciler {
    desired: HashSet<String>,
}

impl TopicReconciler {
    /// Create a reconciler for `desired`, rejecting empty topic names.
    pub fn new(desired: HashSet<String>) -> Result<Self, PublishError> {
        if desired.iter().any(|name| name.is_empty()) {
            return Err(PublishError::invalid_config(
                "desired topic set contains an empty name",
            ));
        }

        Ok(Self { desired })
    }

    /// The declared topic set
    pub fn desired(&self) -> &HashSet<String> {
        &self.desired
    }

    /// Reconcile the broker catalog against the desired set.
    ///
    /// Returns the resulting topic universe, `existing ∪ desired`. The
    /// creation batch is submitted even when nothing is missing; that keeps
    /// the code path uniform and the empty batch is a documented no-op on the
    /// admin side. Admin failures propagate unchanged: no retry, no rollback.
    /// Partial success within the batch is broker-defined and surfaced as-is.
    pub async fn reconcile<A: BrokerAdmin>(
        &self,
        admin: &A,
    ) -> Result<HashSet<String>, PublishError> {
        let existing = admin.list_topics().await?;

        let missing = self
            .desired
            .difference(&existing)
            .map(|name| TopicSpec::new(name.as_str()))
            .collect::<Result<Vec<_>, _>>()?;

        admin.create_topics(&missing, false).await?;

        if missing.is_empty() {
            tracing::debug!("All {} desired topics already exist", self.desired.len());
        } else {
            tracing::info!(
                created = missing.len(),
                existing = existing.len(),
                "Created missing topics"
            );
        }

        Ok(existing.union(&self.desired).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MemoryAdmin;
    use crate::{DEFAULT_PARTITION_COUNT, DEFAULT_REPLICATION_FACTOR};

    fn topic_set(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_creates_only_missing_topics() {
        let admin = MemoryAdmin::with_topics(&["orders"]);
        let reconciler = TopicReconciler::new(topic_set(&["orders", "clicks"])).unwrap();

        let universe = reconciler.reconcile(&admin).await.unwrap();

        assert_eq!(universe, topic_set(&["orders", "clicks"]));
        let batches = admin.created_batches();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 1);
        assert_eq!(batches[0][0].name, "clicks");
        assert_eq!(batches[0][0].partitions, DEFAULT_PARTITION_COUNT);
        assert_eq!(batches[0][0].replication_factor, DEFAULT_REPLICATION_FACTOR);
    }

    #[tokio::test]
    async fn test_second_run_is_idempotent() {
        let admin = MemoryAdmin::with_topics(&["orders"]);
        let reconciler = TopicReconciler::new(topic_set(&["orders", "clicks"])).unwrap();

        reconciler.reconcile(&admin).await.unwrap();
        let universe = reconciler.reconcile(&admin).await.unwrap();

        assert_eq!(universe, topic_set(&["orders", "clicks"]));
        let batches = admin.created_batches();
        assert_eq!(batches.len(), 2);
        assert!(batches[1].is_empty());
    }

    #[tokio::test]
    async fn test_universe_is_union_of_existing_and_desired() {
        let admin = MemoryAdmin::with_topics(&["orders", "refunds"]);
        let reconciler = TopicReconciler::new(topic_set(&["clicks", "orders"])).unwrap();

        let universe = reconciler.reconcile(&admin).await.unwrap();

        assert_eq!(universe, topic_set(&["orders", "refunds", "clicks"]));
    }

    #[tokio::test]
    async fn test_never_destroys_existing_topics() {
        let admin = MemoryAdmin::with_topics(&["orders", "refunds"]);
        let pre = admin.topic_names();
        let reconciler = TopicReconciler::new(topic_set(&["clicks"])).unwrap();

        reconciler.reconcile(&admin).await.unwrap();

        let post = admin.topic_names();
        assert!(pre.is_subset(&post));
    }

    #[tokio::test]
    async fn test_list_failure_propagates() {
        let admin = MemoryAdmin::new();
        admin.fail_next_list("broker unreachable");
        let reconciler = TopicReconciler::new(topic_set(&["clicks"])).unwrap();

        let result = reconciler.reconcile(&admin).await;
        assert!(matches!(result, Err(PublishError::Transport(_))));
        assert!(admin.created_batches().is_empty());
    }

    #[tokio::test]
    async fn test_create_failure_propagates() {
        let admin = MemoryAdmin::new();
        admin.fail_next_create("permission denied");
        let reconciler = TopicReconciler::new(topic_set(&["clicks"])).unwrap();

        let result = reconciler.reconcile(&admin).await;
        assert!(matches!(result, Err(PublishError::Rejected(_))));
        assert!(!admin.topic_names().contains("clicks"));
    }

    #[test]
    fn test_empty_topic_name_rejected() {
        let result = TopicReconciler::new(topic_set(&["orders", ""]));
        assert!(matches!(result, Err(PublishError::InvalidConfig(_))));
    }
}
