//! Thread-safe observer tracker
//!
//! For embeddings where position updates and recomputation come from
//! different threads. The observer map and the published list have
//! independent locks, and no operation holds both: a recompute copies the
//! active observers out under the map lock, computes with no lock held,
//! then swaps the list and its stats under the publish lock.
//!
//! Each snapshot is numbered under the map lock. A computation only
//! publishes if no newer snapshot has been published in the meantime, so a
//! slow recompute can never replace a fresher list. The list and its stats
//! are published together and always describe the same computation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard};

use glam::Vec3;

use crate::core::time::IntervalTimer;
use super::config::StreamingConfig;
use super::coord::{ChunkCoord, ChunkMapper};
use super::observer::{ObserverId, ObserverSet, ObserverState};
use super::priority::ChunkRequirement;
use super::tracker::{Computation, TrackerStats, compute_requirements};

/// Requirement list together with the stats of the computation that made it
struct Published {
    /// Snapshot number the list was computed from
    sequence: u64,
    requirements: Arc<[ChunkRequirement]>,
    stats: TrackerStats,
}

/// Active observers copied out under the map lock
struct Snapshot {
    sequence: u64,
    observers: Vec<ObserverState>,
}

/// Observer tracker that can be shared between threads behind an `Arc`
pub struct SharedObserverTracker {
    config: StreamingConfig,
    mapper: ChunkMapper,
    observers: Mutex<ObserverSet>,
    next_sequence: AtomicU64,
    published: RwLock<Published>,
    timer: Mutex<IntervalTimer>,
}

/// Lock a mutex, recovering the data if another thread panicked while
/// holding it. Every critical section here leaves the data consistent.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SharedObserverTracker {
    /// Create a tracker with no observers and an empty requirement list
    pub fn new(config: StreamingConfig) -> Self {
        Self {
            mapper: config.mapper(),
            timer: Mutex::new(IntervalTimer::new(config.recompute_interval_secs)),
            config,
            observers: Mutex::new(ObserverSet::new()),
            next_sequence: AtomicU64::new(1),
            published: RwLock::new(Published {
                sequence: 0,
                requirements: Arc::from(Vec::new()),
                stats: TrackerStats::default(),
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &StreamingConfig {
        &self.config
    }

    /// See [`ObserverTracker::update_position`](super::ObserverTracker::update_position)
    pub fn update_position(&self, id: ObserverId, position: Vec3, velocity: Vec3) {
        lock(&self.observers).update_position(&self.mapper, id, position, velocity);
    }

    /// Stop tracking an observer. Unknown ids are a no-op.
    pub fn remove_observer(&self, id: ObserverId) {
        lock(&self.observers).remove(id);
    }

    /// Mark an observer active or inactive. Returns false if unknown.
    pub fn set_active(&self, id: ObserverId, active: bool) -> bool {
        lock(&self.observers).set_active(id, active)
    }

    /// Copy of an observer's state
    pub fn observer(&self, id: ObserverId) -> Option<ObserverState> {
        lock(&self.observers).get(id).copied()
    }

    /// Number of active observers
    pub fn active_observer_count(&self) -> usize {
        lock(&self.observers).active_count()
    }

    /// Chebyshev distance from the nearest active observer's chunk to
    /// `coord`; `f32::INFINITY` if there are no active observers.
    pub fn min_distance_to_chunk(&self, coord: ChunkCoord) -> f32 {
        lock(&self.observers).min_distance_to_chunk(&self.mapper, coord)
    }

    /// Advance the recompute timer. Returns true if the list was rebuilt.
    pub fn tick(&self, delta_secs: f32) -> bool {
        let due = lock(&self.timer).tick(delta_secs);
        if due {
            self.recompute();
        }
        due
    }

    /// Rebuild the requirement list immediately.
    ///
    /// Returns false if a recompute started later on another thread
    /// already published, in which case this result is discarded.
    pub fn recompute(&self) -> bool {
        let snapshot = self.snapshot();
        let computation = compute_requirements(&snapshot.observers, &self.config);
        self.publish(snapshot.sequence, snapshot.observers.len(), computation)
    }

    /// Copy the active observers and number the copy, under the map lock
    fn snapshot(&self) -> Snapshot {
        let observers = lock(&self.observers);
        Snapshot {
            sequence: self.next_sequence.fetch_add(1, Ordering::Relaxed),
            observers: observers.snapshot_active(),
        }
    }

    /// Install a computation unless a newer snapshot is already published
    fn publish(&self, sequence: u64, observer_count: usize, computation: Computation) -> bool {
        let mut published = self.published.write().unwrap_or_else(PoisonError::into_inner);
        if sequence <= published.sequence {
            log::trace!(
                "Discarding stale recompute #{} (#{} already published)",
                sequence, published.sequence
            );
            return false;
        }

        published.stats = TrackerStats {
            recomputes: published.stats.recomputes + 1,
            last_observer_count: observer_count,
            last_requirement_count: computation.requirements.len(),
            last_ring_samples: computation.ring_samples,
            last_predictive_samples: computation.predictive_samples,
        };
        published.requirements = Arc::from(computation.requirements);
        published.sequence = sequence;

        log::trace!(
            "Published {} chunk requirements for {} observers",
            published.stats.last_requirement_count, observer_count
        );
        true
    }

    fn read_published(&self) -> RwLockReadGuard<'_, Published> {
        self.published.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the current requirement list, highest priority first
    pub fn required_chunks(&self) -> Arc<[ChunkRequirement]> {
        Arc::clone(&self.read_published().requirements)
    }

    /// Current list and the stats of the computation that produced it
    pub fn required_chunks_with_stats(&self) -> (Arc<[ChunkRequirement]>, TrackerStats) {
        let published = self.read_published();
        (Arc::clone(&published.requirements), published.stats)
    }

    /// Current requirement for one coordinate, if any
    pub fn requirement_for(&self, coord: ChunkCoord) -> Option<ChunkRequirement> {
        self.required_chunks().iter().find(|r| r.coord == coord).copied()
    }

    /// Counters from the last published recomputation
    pub fn stats(&self) -> TrackerStats {
        self.read_published().stats
    }
}

impl Default for SharedObserverTracker {
    fn default() -> Self {
        Self::new(StreamingConfig::default())
    }
}
