//! Application-scoped publisher cell
//!
//! One publisher instance is shared by every request-handling flow in the
//! process. The cell makes the initialization step explicit: wire it in as a
//! `static` or inject it as application state, call [`SharedPublisher::init`]
//! exactly once during bootstrap, and read it thereafter. Reading before
//! initialization yields `None`; ordering is the caller's responsibility and
//! is deliberately not enforced here.

use crate::{PublishError, Publisher};
use once_cell::sync::OnceCell;
use std::sync::Arc;

/// Once-initialized holder for the process-wide publisher
#[derive(Debug, Default)]
pub struct SharedPublisher {
    cell: OnceCell<Arc<dyn Publisher>>,
}

impl SharedPublisher {
    /// Create an empty cell, usable in `static` position.
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// Install the publisher. Errors if called more than once.
    ///
    /// The publisher is fully constructed (reconciliation included) before it
    /// can be passed here, so readers never observe a half-built instance.
    pub fn init(&self, publisher: Arc<dyn Publisher>) -> Result<(), PublishError> {
        self.cell
            .set(publisher)
            .map_err(|_| PublishError::invalid_config("shared publisher already initialized"))
    }

    /// Read the shared publisher, `None` before initialization.
    pub fn get(&self) -> Option<Arc<dyn Publisher>> {
        self.cell.get().cloned()
    }

    /// Check whether initialization has run
    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}
