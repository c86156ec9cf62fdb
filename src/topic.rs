use crate::PublishError;

/// Default partition count for topics created by reconciliation
pub const DEFAULT_PARTITION_COUNT: i32 = 1;

/// Default replication factor for topics created by reconciliation
pub const DEFAULT_REPLICATION_FACTOR: i16 = 1;

/// Descriptor for a topic to be created on the broker.
///
/// One descriptor is built per missing topic during reconciliation, consumed
/// by a single batch creation call, then discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicSpec {
    /// Topic name, compared for exact equality (no normalization)
    pub name: String,

    /// Number of partitions
    pub partitions: i32,

    /// Replication factor across brokers
    pub replication_factor: i16,
}

impl TopicSpec {
    /// Create a descriptor with the fixed default partition/replication policy.
    ///
    /// Empty names are rejected here so an invalid descriptor never reaches
    /// the broker.
    pub fn new(name: impl Into<String>) -> Result<Self, PublishError> {
        let name = name.into();
        if name.is_empty() {
            return Err(PublishError::invalid_config("topic name must not be empty"));
        }

        Ok(Self {
            name,
            partitions: DEFAULT_PARTITION_COUNT,
            replication_factor: DEFAULT_REPLICATION_FACTOR,
        })
    }

    /// Set partition count
    pub fn with_partitions(mut self, partitions: i32) -> Self {
        self.partitions = partitions;
        self
    }

    /// Set replication factor
    pub fn with_replication_factor(mut self, replication_factor: i16) -> Self {
        self.replication_factor = replication_factor;
        self
    }
}
