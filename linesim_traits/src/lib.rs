pub mod angle;
pub mod line;

pub use angle::{angle_diff, rotate, wrap_bearing};
pub use glam::DVec2;
pub use line::Line;

/// A square cell of track geometry.
///
/// Line points are stored in tile-local coordinates, where `(0, 0)` is the
/// tile's `position()` and `(size, size)` is the opposite corner.
pub trait Tile {
    fn lines(&self) -> &[Line];
    fn position(&self) -> DVec2;
    fn size(&self) -> f64;

    /// True when `world_pos` lies inside the closed tile square.
    fn contains(&self, world_pos: DVec2) -> bool {
        let p = self.position();
        let s = self.size();
        world_pos.x >= p.x && world_pos.y >= p.y && world_pos.x <= p.x + s && world_pos.y <= p.y + s
    }

    /// Convert a world-frame point into this tile's local frame.
    fn to_local(&self, world_pos: DVec2) -> DVec2 {
        world_pos - self.position()
    }
}

/// Anything that can answer "which tile is under this point".
pub trait TileProvider {
    fn tile_at(&self, world_pos: DVec2) -> Option<&dyn Tile>;

    /// Thickness of every line drawn in this world.
    fn line_thickness(&self) -> f64;
}
