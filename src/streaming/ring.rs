//! Ring enumeration on the chunk grid
//!
//! A ring of radius `r` is the set of coordinates at exactly Chebyshev
//! distance `r` from a center: the boundary of a `(2r+1)x(2r+1)` square.

use super::coord::ChunkCoord;

/// Number of coordinates in a ring of the given radius
///
/// # Examples
/// ```
/// use terrastream::streaming::ring::ring_len;
///
/// assert_eq!(ring_len(0), 1);
/// assert_eq!(ring_len(1), 8);
/// assert_eq!(ring_len(5), 40);
/// ```
pub fn ring_len(radius: u32) -> usize {
    if radius == 0 { 1 } else { 8 * radius as usize }
}

/// Number of coordinates in all rings `0..=max_radius`
pub fn disc_len(max_radius: u32) -> usize {
    let side = 2 * max_radius as usize + 1;
    side * side
}

/// Collect every coordinate exactly `radius` rings from `center`.
///
/// The top and bottom edges span the full `-r..=r` range on x; the left and
/// right edges span the open range `-r+1..=r-1` on z so corners appear once.
pub fn ring_coords(center: ChunkCoord, radius: u32) -> Vec<ChunkCoord> {
    let mut coords = Vec::with_capacity(ring_len(radius));
    for_each_in_ring(center, radius, |coord| coords.push(coord));
    coords
}

/// Visit every coordinate exactly `radius` rings from `center`
/// without allocating.
///
/// Near the edge of the `i32` grid, coordinates that would fall off it are
/// skipped, so such rings are shorter than `8r`.
pub fn for_each_in_ring(center: ChunkCoord, radius: u32, mut visit: impl FnMut(ChunkCoord)) {
    if radius == 0 {
        visit(center);
        return;
    }

    let r = radius as i64;
    let mut visit_at = |dx: i64, dz: i64| {
        if let Some(coord) = center.checked_offset(dx, dz) {
            visit(coord);
        }
    };

    // Top and bottom edges, corners included
    for dx in -r..=r {
        visit_at(dx, -r);
        visit_at(dx, r);
    }

    // Left and right edges, corners excluded
    for dz in (-r + 1)..r {
        visit_at(-r, dz);
        visit_at(r, dz);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_radius_zero_is_center() {
        let center = ChunkCoord::new(5, -3);
        assert_eq!(ring_coords(center, 0), vec![center]);
    }

    #[test]
    fn test_ring_sizes_and_uniqueness() {
        let center = ChunkCoord::new(-2, 7);

        for radius in 1..=12 {
            let coords = ring_coords(center, radius);
            assert_eq!(coords.len(), 8 * radius as usize, "radius {}", radius);

            let unique: HashSet<_> = coords.iter().copied().collect();
            assert_eq!(unique.len(), coords.len(), "duplicates at radius {}", radius);
            assert!(!unique.contains(&center));

            for coord in &coords {
                assert_eq!(center.chebyshev_distance(*coord), radius);
            }
        }
    }

    #[test]
    fn test_rings_tile_the_square() {
        let center = ChunkCoord::new(0, 0);
        let max_radius = 6;

        let mut all = HashSet::new();
        for radius in 0..=max_radius {
            for coord in ring_coords(center, radius) {
                assert!(all.insert(coord), "{:?} visited twice", coord);
            }
        }

        assert_eq!(all.len(), disc_len(max_radius));
        for x in -6..=6 {
            for z in -6..=6 {
                assert!(all.contains(&ChunkCoord::new(x, z)));
            }
        }
    }

    #[test]
    fn test_corners_present_once() {
        let coords = ring_coords(ChunkCoord::new(0, 0), 2);
        for corner in [(-2, -2), (2, -2), (-2, 2), (2, 2)] {
            let hits = coords
                .iter()
                .filter(|c| (c.x, c.z) == corner)
                .count();
            assert_eq!(hits, 1, "corner {:?}", corner);
        }
    }

    #[test]
    fn test_ring_at_grid_corner_skips_off_grid() {
        let corner = ChunkCoord::new(i32::MAX, i32::MAX);
        let coords = ring_coords(corner, 1);

        // Only the three neighbours inside the grid remain
        let unique: HashSet<_> = coords.iter().copied().collect();
        assert_eq!(coords.len(), 3);
        assert_eq!(unique.len(), 3);
        for coord in &coords {
            assert_eq!(corner.chebyshev_distance(*coord), 1);
        }
    }

    #[test]
    fn test_ring_len_helpers() {
        assert_eq!(ring_len(0), 1);
        assert_eq!(ring_len(3), 24);
        assert_eq!(disc_len(0), 1);
        assert_eq!(disc_len(2), 25);
        assert_eq!((0..=4).map(ring_len).sum::<usize>(), disc_len(4));
    }
}
