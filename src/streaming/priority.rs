//! Priority scoring and merging of chunk requirements

use std::cmp::Ordering;
use std::collections::HashMap;

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::coord::ChunkCoord;
use super::lod::DetailLevel;

/// Speed (world units/second) below which an observer counts as stationary
pub const MOVEMENT_EPSILON: f32 = 0.1;

/// Priority numerator for ring samples: `BASE_PRIORITY / max(radius, 1)`
pub const BASE_PRIORITY: f32 = 100.0;

/// Scale of the bonus for chunks lying ahead of the observer
pub const HEADING_BONUS: f32 = 20.0;

/// Minimum cosine between heading and chunk direction to earn the bonus (~60 degrees)
pub const HEADING_COS_THRESHOLD: f32 = 0.5;

/// Flat priority of every predictive sample
pub const PREDICTIVE_BASE_PRIORITY: f32 = 50.0;

/// Extra priority for predictive samples, divided by the step count
pub const PREDICTIVE_STEP_BONUS: f32 = 10.0;

/// A chunk the world should currently contain
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChunkRequirement {
    pub coord: ChunkCoord,
    pub level: DetailLevel,
    pub priority: f32, // Higher = more urgent
}

/// Bonus for a candidate chunk lying ahead of the direction of travel.
///
/// `heading` must be a unit (x, z) vector; `offset` points from the
/// observer's chunk to the candidate. Returns 0 unless the candidate lies
/// within roughly 60 degrees of the heading.
pub fn heading_bonus(heading: Vec2, offset: IVec2) -> f32 {
    let toward = offset.as_vec2().normalize_or_zero();
    let dot = heading.dot(toward);
    if dot > HEADING_COS_THRESHOLD {
        HEADING_BONUS * dot
    } else {
        0.0
    }
}

/// Priority of a ring sample
///
/// # Arguments
/// * `radius` - Ring the candidate sits on
/// * `level` - Detail level assigned to that ring
/// * `heading` - Unit (x, z) direction of travel, `None` when stationary
/// * `offset` - Offset from the observer's chunk to the candidate
///
/// # Examples
/// ```
/// use glam::IVec2;
/// use terrastream::streaming::lod::DetailLevel;
/// use terrastream::streaming::priority::ring_priority;
///
/// // Center chunk: 100 base + 30 high-detail bonus
/// assert_eq!(ring_priority(0, DetailLevel::High, None, IVec2::ZERO), 130.0);
/// // Two rings out at medium detail: 50 + 15
/// assert_eq!(ring_priority(2, DetailLevel::Medium, None, IVec2::new(2, 0)), 65.0);
/// ```
pub fn ring_priority(radius: u32, level: DetailLevel, heading: Option<Vec2>, offset: IVec2) -> f32 {
    let mut priority = BASE_PRIORITY / radius.max(1) as f32;

    if let Some(heading) = heading {
        priority += heading_bonus(heading, offset);
    }

    priority + level.priority_bonus()
}

/// Priority of the predictive sample `step` chunks ahead of an observer
pub fn predictive_priority(step: u32) -> f32 {
    PREDICTIVE_BASE_PRIORITY + PREDICTIVE_STEP_BONUS / step.max(1) as f32
}

/// Sort requirements by descending priority.
///
/// Equal priorities fall back to coordinate order so the result does not
/// depend on hash iteration order.
pub fn sort_by_priority(requirements: &mut [ChunkRequirement]) {
    requirements.sort_by(|a, b| {
        b.priority
            .total_cmp(&a.priority)
            .then_with(|| a.coord.cmp(&b.coord))
    });
}

#[derive(Clone, Copy, Debug)]
struct Demand {
    level: DetailLevel,
    priority: f32,
}

/// Accumulates demands keyed by coordinate, one entry per chunk.
///
/// Merging keeps the finest detail level and the highest priority seen for
/// a coordinate, independently of which contribution supplied each.
#[derive(Debug, Default)]
pub struct RequirementMap {
    demands: HashMap<ChunkCoord, Demand>,
}

impl RequirementMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty map sized for roughly `capacity` coordinates
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            demands: HashMap::with_capacity(capacity),
        }
    }

    /// Record a demand for `coord`. Returns false if it was dropped.
    ///
    /// Demands at [`DetailLevel::None`] are never inserted.
    pub fn merge(&mut self, coord: ChunkCoord, level: DetailLevel, priority: f32) -> bool {
        if !level.is_required() {
            return false;
        }

        self.demands
            .entry(coord)
            .and_modify(|d| {
                d.level = d.level.finest(level);
                d.priority = d.priority.max(priority);
            })
            .or_insert(Demand { level, priority });
        true
    }

    /// Current merged demand for a coordinate
    pub fn get(&self, coord: ChunkCoord) -> Option<ChunkRequirement> {
        self.demands.get(&coord).map(|d| ChunkRequirement {
            coord,
            level: d.level,
            priority: d.priority,
        })
    }

    /// Number of distinct coordinates demanded
    pub fn len(&self) -> usize {
        self.demands.len()
    }

    /// Check if nothing has been demanded
    pub fn is_empty(&self) -> bool {
        self.demands.is_empty()
    }

    /// Flatten into a list ordered by descending priority
    pub fn into_sorted(self) -> Vec<ChunkRequirement> {
        let mut requirements: Vec<_> = self
            .demands
            .into_iter()
            .map(|(coord, d)| ChunkRequirement {
                coord,
                level: d.level,
                priority: d.priority,
            })
            .collect();
        sort_by_priority(&mut requirements);
        requirements
    }
}

impl ChunkRequirement {
    /// Compare by urgency (higher priority is greater)
    pub fn cmp_priority(&self, other: &Self) -> Ordering {
        self.priority.total_cmp(&other.priority)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_priority_stationary() {
        assert_eq!(ring_priority(0, DetailLevel::High, None, IVec2::ZERO), 130.0);
        assert_eq!(ring_priority(1, DetailLevel::High, None, IVec2::new(1, 1)), 130.0);
        assert_eq!(ring_priority(4, DetailLevel::Medium, None, IVec2::new(0, 4)), 40.0);
        assert_eq!(ring_priority(5, DetailLevel::Low, None, IVec2::new(-5, 2)), 25.0);
    }

    #[test]
    fn test_heading_bonus_straight_ahead() {
        let heading = Vec2::X;
        let bonus = heading_bonus(heading, IVec2::new(3, 0));
        assert!((bonus - 20.0).abs() < 1e-5);
    }

    #[test]
    fn test_heading_bonus_cone() {
        let heading = Vec2::X;

        // 45 degrees off: cos = 0.707 > 0.5
        let diagonal = heading_bonus(heading, IVec2::new(2, 2));
        assert!((diagonal - 20.0 * std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-4);

        // 90 degrees and behind earn nothing
        assert_eq!(heading_bonus(heading, IVec2::new(0, 3)), 0.0);
        assert_eq!(heading_bonus(heading, IVec2::new(-3, 0)), 0.0);

        // Exactly 60 degrees is not strictly inside the cone
        let edge = Vec2::new(0.5, 0.75f32.sqrt());
        assert_eq!(heading_bonus(Vec2::X, IVec2::ZERO), 0.0);
        assert!(heading_bonus(edge, IVec2::new(1, 0)) <= 1e-3);
    }

    #[test]
    fn test_heading_bonus_center_is_zero() {
        assert_eq!(heading_bonus(Vec2::Y, IVec2::ZERO), 0.0);
    }

    #[test]
    fn test_predictive_priority() {
        assert_eq!(predictive_priority(1), 60.0);
        assert_eq!(predictive_priority(2), 55.0);
        assert!((predictive_priority(3) - 53.333_332).abs() < 1e-4);
        // Clamped, never divides by zero
        assert_eq!(predictive_priority(0), 60.0);
    }

    #[test]
    fn test_merge_keeps_finest_level_and_highest_priority() {
        let mut map = RequirementMap::new();
        let coord = ChunkCoord::new(3, 1);

        assert!(map.merge(coord, DetailLevel::High, 40.0));
        assert!(map.merge(coord, DetailLevel::Low, 90.0));

        let merged = map.get(coord).unwrap();
        assert_eq!(merged.level, DetailLevel::High);
        assert_eq!(merged.priority, 90.0);
        assert_eq!(map.len(), 1);

        // Order of arrival does not matter
        let mut reversed = RequirementMap::new();
        reversed.merge(coord, DetailLevel::Low, 90.0);
        reversed.merge(coord, DetailLevel::High, 40.0);
        assert_eq!(reversed.get(coord), Some(merged));
    }

    #[test]
    fn test_merge_drops_none() {
        let mut map = RequirementMap::new();
        assert!(!map.merge(ChunkCoord::new(0, 0), DetailLevel::None, 1000.0));
        assert!(map.is_empty());
        assert!(map.get(ChunkCoord::new(0, 0)).is_none());
    }

    #[test]
    fn test_into_sorted_descending() {
        let mut map = RequirementMap::with_capacity(4);
        map.merge(ChunkCoord::new(0, 0), DetailLevel::High, 130.0);
        map.merge(ChunkCoord::new(5, 0), DetailLevel::Low, 25.0);
        map.merge(ChunkCoord::new(2, 0), DetailLevel::Medium, 65.0);

        let sorted = map.into_sorted();
        let priorities: Vec<f32> = sorted.iter().map(|r| r.priority).collect();
        assert_eq!(priorities, vec![130.0, 65.0, 25.0]);
    }

    #[test]
    fn test_sort_ties_by_coordinate() {
        let mut list = vec![
            ChunkRequirement { coord: ChunkCoord::new(1, 0), level: DetailLevel::High, priority: 80.0 },
            ChunkRequirement { coord: ChunkCoord::new(-1, 2), level: DetailLevel::High, priority: 80.0 },
            ChunkRequirement { coord: ChunkCoord::new(-1, -1), level: DetailLevel::High, priority: 80.0 },
            ChunkRequirement { coord: ChunkCoord::new(9, 9), level: DetailLevel::High, priority: 90.0 },
        ];
        sort_by_priority(&mut list);

        let coords: Vec<_> = list.iter().map(|r| r.coord).collect();
        assert_eq!(
            coords,
            vec![
                ChunkCoord::new(9, 9),
                ChunkCoord::new(-1, -1),
                ChunkCoord::new(-1, 2),
                ChunkCoord::new(1, 0),
            ]
        );
    }

    #[test]
    fn test_cmp_priority() {
        let a = ChunkRequirement { coord: ChunkCoord::new(0, 0), level: DetailLevel::High, priority: 10.0 };
        let b = ChunkRequirement { coord: ChunkCoord::new(1, 0), level: DetailLevel::Low, priority: 20.0 };
        assert_eq!(a.cmp_priority(&b), Ordering::Less);
        assert_eq!(b.cmp_priority(&a), Ordering::Greater);
    }
}
