//! Cache invalidation for the frontend's read views

pub mod client;
pub mod signature;

use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use client::{ClientError, HttpRevalidator};

/// Paths and tags whose cached views are stale after a mutation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invalidation {
    pub paths: Vec<String>,
    pub tags: Vec<String>,
}

impl Invalidation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.paths.push(path.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }
}

/// Fire-and-forget invalidation. Implementations must not block the caller and
/// never report failure back.
pub trait Revalidator: Send + Sync {
    fn invalidate(&self, invalidation: Invalidation);
}

/// Used when no revalidation endpoint is configured
pub struct NoopRevalidator;

impl Revalidator for NoopRevalidator {
    fn invalidate(&self, invalidation: Invalidation) {
        debug!(
            "Revalidation disabled, dropping {} paths / {} tags",
            invalidation.paths.len(),
            invalidation.tags.len()
        );
    }
}

/// Keeps every invalidation in memory
#[derive(Default)]
pub struct RecordingRevalidator {
    seen: Mutex<Vec<Invalidation>>,
}

impl RecordingRevalidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invalidations(&self) -> Vec<Invalidation> {
        self.seen
            .lock()
            .map(|seen| seen.clone())
            .unwrap_or_default()
    }
}

impl Revalidator for RecordingRevalidator {
    fn invalidate(&self, invalidation: Invalidation) {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(invalidation);
        }
    }
}
