//! Observer tracker: turns observer positions into a ranked chunk
//! requirement list.
//!
//! Position updates are cheap and may arrive every frame. The expensive
//! pass (ring sampling, predictive sampling, merge, sort) only runs when
//! the recompute interval elapses in [`ObserverTracker::tick`], and each
//! run swaps in a brand new list. Consumers holding the previous
//! `Arc<[ChunkRequirement]>` keep a coherent, if stale, snapshot.

use std::sync::Arc;

use glam::{IVec2, Vec3};

use crate::core::time::IntervalTimer;
use super::config::StreamingConfig;
use super::coord::{ChunkCoord, ChunkMapper};
use super::observer::{ObserverId, ObserverSet, ObserverState};
use super::priority::{ChunkRequirement, RequirementMap, predictive_priority, ring_priority};
use super::ring::{disc_len, for_each_in_ring};

/// Counters from the most recent recomputation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TrackerStats {
    /// Recomputations run since creation
    pub recomputes: u64,
    /// Active observers seen by the last recomputation
    pub last_observer_count: usize,
    /// Entries in the current requirement list
    pub last_requirement_count: usize,
    /// Ring samples merged by the last recomputation
    pub last_ring_samples: usize,
    /// Predictive samples merged by the last recomputation
    pub last_predictive_samples: usize,
}

/// Output of one recomputation pass
#[derive(Clone, Debug, Default)]
pub struct Computation {
    pub requirements: Vec<ChunkRequirement>,
    pub ring_samples: usize,
    pub predictive_samples: usize,
}

/// Compute the merged, priority-ordered requirement list for a set of
/// observers. Inactive observers are skipped.
///
/// Pure: reads only its arguments, so it can run without holding any lock
/// on the observer map.
pub fn compute_requirements<'a, I>(observers: I, config: &StreamingConfig) -> Computation
where
    I: IntoIterator<Item = &'a ObserverState>,
{
    let mapper = config.mapper();
    let thresholds = config.thresholds();
    let mut demand = RequirementMap::with_capacity(disc_len(config.unload_radius.min(64)));
    let mut ring_samples = 0;
    let mut predictive_samples = 0;

    for observer in observers.into_iter().filter(|o| o.active) {
        let center = mapper.world_to_chunk(observer.position);
        let heading = observer.heading();

        // Ring pass: detail by Chebyshev radius
        for radius in 0..=config.unload_radius {
            let level = thresholds.level_for_radius(radius);
            if !level.is_required() {
                continue;
            }

            for_each_in_ring(center, radius, |coord| {
                let priority = ring_priority(radius, level, heading, center.delta_to(coord));
                if demand.merge(coord, level, priority) {
                    ring_samples += 1;
                }
            });
        }

        // Predictive pass: detail by Euclidean distance along the heading
        let Some(heading) = heading else { continue };
        let step_dir = IVec2::new(heading.x.round() as i32, heading.y.round() as i32);
        if step_dir == IVec2::ZERO {
            continue;
        }

        for step in 1..=config.predictive_distance {
            let (dx, dz) = (step_dir.x as i64 * step as i64, step_dir.y as i64 * step as i64);
            // Samples past the edge of the grid are dropped
            let Some(coord) = center.checked_offset(dx, dz) else { break };
            let distance = (step as f32) * step_dir.as_vec2().length();
            let level = thresholds.level_for_distance(distance);
            if demand.merge(coord, level, predictive_priority(step)) {
                predictive_samples += 1;
            }
        }
    }

    Computation {
        requirements: demand.into_sorted(),
        ring_samples,
        predictive_samples,
    }
}

/// Tracks observers and maintains the chunk requirement list
pub struct ObserverTracker {
    config: StreamingConfig,
    mapper: ChunkMapper,
    observers: ObserverSet,
    requirements: Arc<[ChunkRequirement]>,
    timer: IntervalTimer,
    stats: TrackerStats,
}

impl ObserverTracker {
    /// Create a tracker with no observers and an empty requirement list
    pub fn new(config: StreamingConfig) -> Self {
        Self {
            mapper: config.mapper(),
            timer: IntervalTimer::new(config.recompute_interval_secs),
            config,
            observers: ObserverSet::new(),
            requirements: Arc::from(Vec::new()),
            stats: TrackerStats::default(),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &StreamingConfig {
        &self.config
    }

    // --- Observer bookkeeping ---

    /// Report an observer's position and velocity.
    ///
    /// Creates the observer on first sight and marks it active. Does not
    /// touch the requirement list; that only changes on recompute.
    pub fn update_position(&mut self, id: ObserverId, position: Vec3, velocity: Vec3) {
        self.observers.update_position(&self.mapper, id, position, velocity);
    }

    /// Stop tracking an observer. Unknown ids are a no-op.
    pub fn remove_observer(&mut self, id: ObserverId) {
        self.observers.remove(id);
    }

    /// Mark an observer active or inactive without forgetting it.
    /// Returns false if the observer is unknown.
    pub fn set_active(&mut self, id: ObserverId, active: bool) -> bool {
        self.observers.set_active(id, active)
    }

    /// Look up an observer's state
    pub fn observer(&self, id: ObserverId) -> Option<&ObserverState> {
        self.observers.get(id)
    }

    /// Iterate over every tracked observer
    pub fn observers(&self) -> impl Iterator<Item = &ObserverState> {
        self.observers.iter()
    }

    /// Number of active observers
    pub fn active_observer_count(&self) -> usize {
        self.observers.active_count()
    }

    /// Chebyshev distance from the nearest active observer's chunk to
    /// `coord`; `f32::INFINITY` if there are no active observers.
    pub fn min_distance_to_chunk(&self, coord: ChunkCoord) -> f32 {
        self.observers.min_distance_to_chunk(&self.mapper, coord)
    }

    // --- Recomputation ---

    /// Advance the recompute timer. Returns true if the list was rebuilt.
    pub fn tick(&mut self, delta_secs: f32) -> bool {
        if self.timer.tick(delta_secs) {
            self.recompute();
            true
        } else {
            false
        }
    }

    /// Rebuild the requirement list immediately
    pub fn recompute(&mut self) {
        let computation = compute_requirements(self.observers.iter(), &self.config);

        self.stats = TrackerStats {
            recomputes: self.stats.recomputes + 1,
            last_observer_count: self.observers.active_count(),
            last_requirement_count: computation.requirements.len(),
            last_ring_samples: computation.ring_samples,
            last_predictive_samples: computation.predictive_samples,
        };
        self.requirements = Arc::from(computation.requirements);

        log::trace!(
            "Recomputed {} chunk requirements for {} observers ({} ring, {} predictive samples)",
            self.stats.last_requirement_count,
            self.stats.last_observer_count,
            self.stats.last_ring_samples,
            self.stats.last_predictive_samples,
        );
    }

    // --- Queries ---

    /// Snapshot of the current requirement list, highest priority first.
    ///
    /// The returned list never changes; a later recompute installs a new one.
    pub fn required_chunks(&self) -> Arc<[ChunkRequirement]> {
        Arc::clone(&self.requirements)
    }

    /// Current requirement for one coordinate, if any
    pub fn requirement_for(&self, coord: ChunkCoord) -> Option<ChunkRequirement> {
        self.requirements.iter().find(|r| r.coord == coord).copied()
    }

    /// Counters from the last recomputation
    pub fn stats(&self) -> TrackerStats {
        self.stats
    }
}

impl Default for ObserverTracker {
    fn default() -> Self {
        Self::new(StreamingConfig::default())
    }
}
