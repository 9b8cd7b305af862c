//! Per-run walk state: the visited set and counters.

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::container::ContainerId;

/// Set of container identities already opened during a run.
#[derive(Debug, Default)]
pub struct VisitedSet {
    seen: Mutex<HashSet<ContainerId>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `id` as visited. Returns false when it was already present.
    ///
    /// Check and insert happen under one lock, so concurrent walkers never
    /// both proceed past the same identity.
    pub fn mark(&self, id: ContainerId) -> bool {
        let mut seen = self.seen.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        seen.insert(id)
    }

    pub fn contains(&self, id: &ContainerId) -> bool {
        let seen = self.seen.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        seen.contains(id)
    }

    pub fn len(&self) -> usize {
        let seen = self.seen.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Counters accumulated while walking.
#[derive(Debug, Default)]
pub struct WalkStats {
    pub containers_opened: AtomicUsize,
    pub containers_skipped: AtomicUsize,
    pub open_failures: AtomicUsize,
    pub pdfs_extracted: AtomicUsize,
    pub pdfs_without_text: AtomicUsize,
}

/// Plain copy of [`WalkStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStatsSnapshot {
    pub containers_opened: usize,
    pub containers_skipped: usize,
    pub open_failures: usize,
    pub pdfs_extracted: usize,
    pub pdfs_without_text: usize,
}

impl std::ops::AddAssign for WalkStatsSnapshot {
    fn add_assign(&mut self, other: Self) {
        self.containers_opened += other.containers_opened;
        self.containers_skipped += other.containers_skipped;
        self.open_failures += other.open_failures;
        self.pdfs_extracted += other.pdfs_extracted;
        self.pdfs_without_text += other.pdfs_without_text;
    }
}

impl WalkStats {
    pub(crate) fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> WalkStatsSnapshot {
        WalkStatsSnapshot {
            containers_opened: self.containers_opened.load(Ordering::Relaxed),
            containers_skipped: self.containers_skipped.load(Ordering::Relaxed),
            open_failures: self.open_failures.load(Ordering::Relaxed),
            pdfs_extracted: self.pdfs_extracted.load(Ordering::Relaxed),
            pdfs_without_text: self.pdfs_without_text.load(Ordering::Relaxed),
        }
    }
}

/// State threaded through one walk run.
///
/// Create one per batch run (or per top-level container); it is never
/// shared across unrelated runs.
#[derive(Debug, Default)]
pub struct WalkContext {
    pub visited: VisitedSet,
    pub stats: WalkStats,
}

impl WalkContext {
    pub fn new() -> Self {
        Self::default()
    }
}
