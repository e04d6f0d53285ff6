//! Chunk addressing: mapping continuous world positions onto the chunk grid

use glam::{IVec2, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Default chunk footprint in world units along each horizontal axis
pub const DEFAULT_CHUNK_SIZE: f32 = 32.0;

/// Integer coordinate identifying a chunk column in the world grid
///
/// Chunks are addressed on the horizontal (x, z) plane only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoord {
    /// Create a new chunk coordinate
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Coordinate displaced by an integer offset, clamped to the grid edge
    pub fn offset(self, delta: IVec2) -> Self {
        Self::new(self.x.saturating_add(delta.x), self.z.saturating_add(delta.y))
    }

    /// Coordinate displaced by (dx, dz), or `None` if it falls off the grid
    pub fn checked_offset(self, dx: i64, dz: i64) -> Option<Self> {
        let x = i32::try_from(self.x as i64 + dx).ok()?;
        let z = i32::try_from(self.z as i64 + dz).ok()?;
        Some(Self::new(x, z))
    }

    /// Offset from `self` to `other` as (dx, dz)
    ///
    /// Components that do not fit in an `i32` are clamped; the sign is kept.
    pub fn delta_to(self, other: ChunkCoord) -> IVec2 {
        IVec2::new(other.x.saturating_sub(self.x), other.z.saturating_sub(self.z))
    }

    /// Chessboard distance to another coordinate
    pub fn chebyshev_distance(self, other: ChunkCoord) -> u32 {
        let dx = (other.x as i64 - self.x as i64).unsigned_abs();
        let dz = (other.z as i64 - self.z as i64).unsigned_abs();
        // Two i32 values are at most u32::MAX apart
        dx.max(dz) as u32
    }
}

impl From<IVec2> for ChunkCoord {
    fn from(v: IVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<ChunkCoord> for IVec2 {
    fn from(c: ChunkCoord) -> Self {
        IVec2::new(c.x, c.z)
    }
}

/// Convert a world position to the chunk containing it.
///
/// Each axis is floored independently, so negative positions land in the
/// correct chunk rather than being truncated towards zero. The y axis is
/// ignored.
///
/// # Examples
/// ```
/// use glam::{Vec2, Vec3};
/// use terrastream::streaming::coord::{world_to_chunk, ChunkCoord};
///
/// let size = Vec2::splat(32.0);
/// assert_eq!(world_to_chunk(Vec3::new(10.0, 0.0, 40.0), size), ChunkCoord::new(0, 1));
/// assert_eq!(world_to_chunk(Vec3::new(-0.5, 0.0, -32.0), size), ChunkCoord::new(-1, -1));
/// ```
pub fn world_to_chunk(position: Vec3, chunk_size: Vec2) -> ChunkCoord {
    ChunkCoord {
        x: (position.x / chunk_size.x).floor() as i32,
        z: (position.z / chunk_size.y).floor() as i32,
    }
}

/// World-space origin (minimum x/z corner) of a chunk at height 0
pub fn chunk_origin(coord: ChunkCoord, chunk_size: Vec2) -> Vec3 {
    Vec3::new(
        coord.x as f32 * chunk_size.x,
        0.0,
        coord.z as f32 * chunk_size.y,
    )
}

/// Coordinate mapper bound to a fixed chunk footprint
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChunkMapper {
    chunk_size: Vec2,
}

impl ChunkMapper {
    /// Create a mapper for chunks of `chunk_size` world units (x, z)
    pub fn new(chunk_size: Vec2) -> Self {
        Self { chunk_size }
    }

    /// Footprint of one chunk (x, z)
    pub fn chunk_size(&self) -> Vec2 {
        self.chunk_size
    }

    /// See [`world_to_chunk`]
    pub fn world_to_chunk(&self, position: Vec3) -> ChunkCoord {
        world_to_chunk(position, self.chunk_size)
    }

    /// World position of the chunk's center at height 0
    pub fn chunk_center(&self, coord: ChunkCoord) -> Vec3 {
        chunk_origin(coord, self.chunk_size)
            + Vec3::new(self.chunk_size.x * 0.5, 0.0, self.chunk_size.y * 0.5)
    }
}

impl Default for ChunkMapper {
    fn default() -> Self {
        Self::new(Vec2::splat(DEFAULT_CHUNK_SIZE))
    }
}
