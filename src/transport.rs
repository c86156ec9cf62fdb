//! Transport seam for handing payloads to the broker
//!
//! The publisher never talks the broker protocol itself; it dispatches
//! through the [`Transport`] trait and hands the caller a [`PendingSend`]
//! handle. Awaiting delivery confirmation is the caller's concern: dropping
//! the handle simply abandons interest and leaves the underlying request to
//! complete or fail on its own.

use crate::PublishError;
use async_trait::async_trait;
use std::fmt::Debug;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::oneshot;

/// Optional per-send parameters forwarded verbatim to the transport
#[derive(Debug, Clone, Default)]
pub struct SendOptions {
    /// Partitioning key, if the transport supports keyed dispatch
    pub key: Option<Vec<u8>>,

    /// Explicit target partition, overriding key-based assignment
    pub partition: Option<i32>,

    /// Transport headers attached to the record
    pub headers: Vec<(String, Vec<u8>)>,
}

impl SendOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the partitioning key
    pub fn with_key(mut self, key: impl Into<Vec<u8>>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Set an explicit target partition
    pub fn with_partition(mut self, partition: i32) -> Self {
        self.partition = Some(partition);
        self
    }

    /// Attach a header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Broker acknowledgment for a delivered record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Topic the record landed on
    pub topic: String,

    /// Partition assigned by the broker
    pub partition: i32,

    /// Offset within the partition
    pub offset: i64,

    /// Acknowledgment timestamp (nanoseconds since epoch)
    pub timestamp_ns: u64,
}

impl Delivery {
    pub fn new(topic: impl Into<String>, partition: i32, offset: i64) -> Self {
        let timestamp_ns = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos() as u64;

        Self {
            topic: topic.into(),
            partition,
            offset,
            timestamp_ns,
        }
    }
}

/// Opaque handle for an in-flight publish.
///
/// Resolves to the broker's [`Delivery`] acknowledgment, or to the error the
/// transport observed after dispatch. The publisher returns this without
/// awaiting it.
#[derive(Debug)]
pub struct PendingSend {
    inner: PendingSendInner,
}

#[derive(Debug)]
enum PendingSendInner {
    Ready(Option<Result<Delivery, PublishError>>),
    Waiting(oneshot::Receiver<Result<Delivery, PublishError>>),
}

impl PendingSend {
    /// Create a handle that is already resolved.
    ///
    /// For transports whose dispatch call learns the outcome synchronously.
    pub fn completed(result: Result<Delivery, PublishError>) -> Self {
        Self {
            inner: PendingSendInner::Ready(Some(result)),
        }
    }

    /// Create an unresolved handle plus the [`DeliveryHandle`] the transport
    /// uses to complete it later.
    pub fn pending() -> (Self, DeliveryHandle) {
        let (tx, rx) = oneshot::channel();
        let handle = Self {
            inner: PendingSendInner::Waiting(rx),
        };
        (handle, DeliveryHandle { tx })
    }
}

impl Future for PendingSend {
    type Output = Result<Delivery, PublishError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.get_mut().inner {
            PendingSendInner::Ready(slot) => match slot.take() {
                Some(result) => Poll::Ready(result),
                None => Poll::Ready(Err(PublishError::transport(
                    "pending send polled after completion",
                ))),
            },
            PendingSendInner::Waiting(rx) => Pin::new(rx).poll(cx).map(|recv| {
                recv.unwrap_or_else(|_| {
                    Err(PublishError::transport("delivery result dropped by transport"))
                })
            }),
        }
    }
}

/// Completion side of a [`PendingSend`].
///
/// Held by the transport while the request is in flight. Dropping it without
/// calling [`complete`](DeliveryHandle::complete) resolves the pending send
/// to a transport error.
#[derive(Debug)]
pub struct DeliveryHandle {
    tx: oneshot::Sender<Result<Delivery, PublishError>>,
}

impl DeliveryHandle {
    /// Resolve the paired [`PendingSend`].
    pub fn complete(self, result: Result<Delivery, PublishError>) {
        // The caller may have dropped the handle; nothing to do then.
        let _ = self.tx.send(result);
    }
}

/// Asynchronous send capability over the broker connection.
///
/// The dispatch call returns as soon as the record is handed to the broker
/// client; delivery is tracked through the returned handle. Implementations
/// must surface their request-timeout condition as [`PublishError::Timeout`],
/// the only error class the publisher's retry policy watches for.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    /// Dispatch one payload to a named topic.
    async fn send(
        &self,
        topic: &str,
        payload: &[u8],
        options: &SendOptions,
    ) -> Result<PendingSend, PublishError>;
}
