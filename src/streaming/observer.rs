//! Per-observer kinematic state

use std::collections::HashMap;
use std::fmt;

use glam::{Vec2, Vec3};

use super::coord::{ChunkCoord, ChunkMapper};
use super::priority::MOVEMENT_EPSILON;

/// Stable identifier of an observer (a player, a camera, a spectator...)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(pub u64);

impl fmt::Display for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "observer#{}", self.0)
    }
}

impl From<u64> for ObserverId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Tracked state of one observer
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObserverState {
    pub id: ObserverId,
    pub position: Vec3,
    /// World units per second, may be zero
    pub velocity: Vec3,
    /// Chunk at the last reported position. Only used for change logging.
    pub last_chunk: ChunkCoord,
    pub active: bool,
}

impl ObserverState {
    /// Whether the observer moves fast enough for heading-based sampling
    pub fn is_moving(&self) -> bool {
        self.velocity.length() > MOVEMENT_EPSILON
    }

    /// Unit direction of travel on the (x, z) plane.
    ///
    /// `None` when stationary, or when all motion is vertical.
    pub fn heading(&self) -> Option<Vec2> {
        if !self.is_moving() {
            return None;
        }
        Vec2::new(self.velocity.x, self.velocity.z).try_normalize()
    }
}

/// Observer records keyed by id
///
/// Records are only created by position updates and only removed
/// explicitly; silence never deactivates an observer.
#[derive(Clone, Debug, Default)]
pub struct ObserverSet {
    observers: HashMap<ObserverId, ObserverState>,
}

impl ObserverSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a position report, creating the observer if unseen.
    ///
    /// Always marks the observer active.
    pub fn update_position(&mut self, mapper: &ChunkMapper, id: ObserverId, position: Vec3, velocity: Vec3) {
        let chunk = mapper.world_to_chunk(position);

        match self.observers.get_mut(&id) {
            Some(state) => {
                state.position = position;
                state.velocity = velocity;
                state.active = true;
                if state.last_chunk != chunk {
                    log::debug!(
                        "{} moved from chunk ({}, {}) to ({}, {})",
                        id, state.last_chunk.x, state.last_chunk.z, chunk.x, chunk.z
                    );
                    state.last_chunk = chunk;
                }
            }
            None => {
                log::info!("Tracking {} at chunk ({}, {})", id, chunk.x, chunk.z);
                self.observers.insert(id, ObserverState {
                    id,
                    position,
                    velocity,
                    last_chunk: chunk,
                    active: true,
                });
            }
        }
    }

    /// Forget an observer. Unknown ids are ignored.
    pub fn remove(&mut self, id: ObserverId) -> Option<ObserverState> {
        let removed = self.observers.remove(&id);
        if removed.is_some() {
            log::info!("Stopped tracking {}", id);
        }
        removed
    }

    /// Set the activity flag. Returns false if the observer is unknown.
    pub fn set_active(&mut self, id: ObserverId, active: bool) -> bool {
        match self.observers.get_mut(&id) {
            Some(state) => {
                if state.active != active {
                    log::debug!("{} is now {}", id, if active { "active" } else { "inactive" });
                }
                state.active = active;
                true
            }
            None => false,
        }
    }

    /// Look up one observer
    pub fn get(&self, id: ObserverId) -> Option<&ObserverState> {
        self.observers.get(&id)
    }

    /// Iterate over all observers, active or not
    pub fn iter(&self) -> impl Iterator<Item = &ObserverState> {
        self.observers.values()
    }

    /// Iterate over active observers only
    pub fn active(&self) -> impl Iterator<Item = &ObserverState> {
        self.observers.values().filter(|o| o.active)
    }

    /// Number of tracked observers, active or not
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Check if no observers are tracked
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Number of active observers
    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    /// Smallest Chebyshev distance from any active observer's chunk to
    /// `coord`, or `f32::INFINITY` if nobody is active.
    pub fn min_distance_to_chunk(&self, mapper: &ChunkMapper, coord: ChunkCoord) -> f32 {
        self.active()
            .map(|o| mapper.world_to_chunk(o.position).chebyshev_distance(coord) as f32)
            .fold(f32::INFINITY, f32::min)
    }

    /// Copy out the active observers
    pub fn snapshot_active(&self) -> Vec<ObserverState> {
        self.active().copied().collect()
    }
}
