//! Level of Detail (LOD) tiers for required chunks
//!
//! Chunks are requested at one of three detail tiers depending on how many
//! rings away from an observer they sit. Anything beyond the last tier maps
//! to [`DetailLevel::None`] and is never requested.

use serde::{Deserialize, Serialize};

/// Detail tier a chunk should be built at
///
/// Ordered by decreasing detail: `High < Medium < Low < None`. When two
/// demands meet, the smaller value wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DetailLevel {
    High,
    Medium,
    Low,
    /// Not required
    None,
}

impl DetailLevel {
    /// Priority bonus granted to a chunk requested at this level
    ///
    /// # Examples
    /// ```
    /// use terrastream::streaming::lod::DetailLevel;
    ///
    /// assert_eq!(DetailLevel::High.priority_bonus(), 30.0);
    /// assert_eq!(DetailLevel::None.priority_bonus(), 0.0);
    /// ```
    pub fn priority_bonus(self) -> f32 {
        match self {
            DetailLevel::High => 30.0,
            DetailLevel::Medium => 15.0,
            DetailLevel::Low => 5.0,
            DetailLevel::None => 0.0,
        }
    }

    /// The more detailed of two levels
    pub fn finest(self, other: DetailLevel) -> DetailLevel {
        self.min(other)
    }

    /// Whether a chunk at this level should exist at all
    pub fn is_required(self) -> bool {
        self != DetailLevel::None
    }
}

/// Ring-count thresholds separating the detail tiers
///
/// Each threshold is inclusive: a chunk `r` rings away is `High` while
/// `r <= high`, and so on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LodThresholds {
    pub high: u32,
    pub medium: u32,
    pub low: u32,
}

impl Default for LodThresholds {
    fn default() -> Self {
        Self {
            high: 2,
            medium: 4,
            low: 6,
        }
    }
}

impl LodThresholds {
    /// Detail level for a chunk `radius` rings from the observer
    ///
    /// # Examples
    /// ```
    /// use terrastream::streaming::lod::{DetailLevel, LodThresholds};
    ///
    /// let t = LodThresholds { high: 2, medium: 4, low: 6 };
    /// assert_eq!(t.level_for_radius(0), DetailLevel::High);
    /// assert_eq!(t.level_for_radius(3), DetailLevel::Medium);
    /// assert_eq!(t.level_for_radius(6), DetailLevel::Low);
    /// assert_eq!(t.level_for_radius(7), DetailLevel::None);
    /// ```
    pub fn level_for_radius(&self, radius: u32) -> DetailLevel {
        if radius <= self.high {
            DetailLevel::High
        } else if radius <= self.medium {
            DetailLevel::Medium
        } else if radius <= self.low {
            DetailLevel::Low
        } else {
            DetailLevel::None
        }
    }

    /// Detail level for a Euclidean distance measured in chunks
    ///
    /// Used by the predictive pass, where sample offsets can be diagonal.
    pub fn level_for_distance(&self, distance: f32) -> DetailLevel {
        if distance.is_nan() {
            DetailLevel::None
        } else if distance <= self.high as f32 {
            DetailLevel::High
        } else if distance <= self.medium as f32 {
            DetailLevel::Medium
        } else if distance <= self.low as f32 {
            DetailLevel::Low
        } else {
            DetailLevel::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_level_ordering() {
        assert!(DetailLevel::High < DetailLevel::Medium);
        assert!(DetailLevel::Medium < DetailLevel::Low);
        assert!(DetailLevel::Low < DetailLevel::None);
    }

    #[test]
    fn test_finest() {
        assert_eq!(DetailLevel::Low.finest(DetailLevel::High), DetailLevel::High);
        assert_eq!(DetailLevel::Medium.finest(DetailLevel::None), DetailLevel::Medium);
        assert_eq!(DetailLevel::Low.finest(DetailLevel::Low), DetailLevel::Low);
    }

    #[test]
    fn test_priority_bonus() {
        assert_eq!(DetailLevel::High.priority_bonus(), 30.0);
        assert_eq!(DetailLevel::Medium.priority_bonus(), 15.0);
        assert_eq!(DetailLevel::Low.priority_bonus(), 5.0);
        assert_eq!(DetailLevel::None.priority_bonus(), 0.0);
    }

    #[test]
    fn test_level_for_radius_boundaries() {
        let t = LodThresholds::default();
        let expected = [
            (0, DetailLevel::High),
            (1, DetailLevel::High),
            (2, DetailLevel::High),
            (3, DetailLevel::Medium),
            (4, DetailLevel::Medium),
            (5, DetailLevel::Low),
            (6, DetailLevel::Low),
            (7, DetailLevel::None),
            (100, DetailLevel::None),
        ];

        for (radius, level) in expected {
            assert_eq!(t.level_for_radius(radius), level, "radius {}", radius);
        }
    }

    #[test]
    fn test_level_for_distance() {
        let t = LodThresholds::default();
        assert_eq!(t.level_for_distance(0.0), DetailLevel::High);
        assert_eq!(t.level_for_distance(2.0), DetailLevel::High);
        assert_eq!(t.level_for_distance(2.83), DetailLevel::Medium);
        assert_eq!(t.level_for_distance(5.66), DetailLevel::Low);
        assert_eq!(t.level_for_distance(6.01), DetailLevel::None);
        assert_eq!(t.level_for_distance(f32::NAN), DetailLevel::None);
    }

    #[test]
    fn test_zero_thresholds_only_center() {
        let t = LodThresholds { high: 0, medium: 0, low: 0 };
        assert_eq!(t.level_for_radius(0), DetailLevel::High);
        assert_eq!(t.level_for_radius(1), DetailLevel::None);
    }

    #[test]
    fn test_is_required() {
        assert!(DetailLevel::Low.is_required());
        assert!(!DetailLevel::None.is_required());
    }
}
