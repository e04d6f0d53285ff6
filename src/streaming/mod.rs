//! Observer-driven chunk requirement tracking

pub mod coord;
pub mod lod;
pub mod ring;
pub mod priority;
pub mod observer;
pub mod config;
pub mod tracker;
pub mod shared;

pub use coord::{ChunkCoord, ChunkMapper, world_to_chunk, chunk_origin, DEFAULT_CHUNK_SIZE};
pub use lod::{DetailLevel, LodThresholds};
pub use ring::{ring_coords, for_each_in_ring, ring_len, disc_len};
pub use priority::{
    ChunkRequirement, RequirementMap,
    ring_priority, predictive_priority, heading_bonus, sort_by_priority,
    MOVEMENT_EPSILON,
};
pub use observer::{ObserverId, ObserverSet, ObserverState};
pub use config::StreamingConfig;
pub use tracker::{ObserverTracker, TrackerStats, Computation, compute_requirements};
pub use shared::SharedObserverTracker;
