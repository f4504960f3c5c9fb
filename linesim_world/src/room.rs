//! A rectangular grid of tiles.

use crate::WorldError;
use crate::catalog::TileKind;
use glam::DVec2;
use linesim_core::config::WorldCfg;
use linesim_traits::{Line, Tile, TileProvider};

/// One placed tile: its kind plus the generated lines.
#[derive(Debug, Clone)]
pub struct SimTile {
    kind: TileKind,
    position: DVec2,
    size: f64,
    lines: Vec<Line>,
}

impl SimTile {
    pub fn new(kind: TileKind, position: DVec2, world: &WorldCfg) -> Self {
        Self {
            kind,
            position,
            size: world.tile_size,
            lines: kind.lines(world.tile_size, world.max_line_point_gap()),
        }
    }

    pub fn kind(&self) -> TileKind {
        self.kind
    }
}

impl Tile for SimTile {
    fn lines(&self) -> &[Line] {
        &self.lines
    }

    fn position(&self) -> DVec2 {
        self.position
    }

    fn size(&self) -> f64 {
        self.size
    }
}

/// `nx × ny` tiles laid out row by row from `origin`.
///
/// Tile `(ix, iy)` covers `origin + [ix, ix + 1) × [iy, iy + 1)` in tile
/// units. Points on a shared edge belong to the tile with the larger index.
#[derive(Debug, Clone)]
pub struct GridRoom {
    origin: DVec2,
    nx: usize,
    ny: usize,
    world: WorldCfg,
    tiles: Vec<SimTile>,
}

impl GridRoom {
    /// All-blank room.
    #[allow(clippy::cast_precision_loss)]
    pub fn new(origin: DVec2, nx: usize, ny: usize, world: WorldCfg) -> Self {
        let tiles = (0..ny)
            .flat_map(|iy| (0..nx).map(move |ix| (ix, iy)))
            .map(|(ix, iy)| {
                let pos = origin + DVec2::new(ix as f64, iy as f64) * world.tile_size;
                SimTile::new(TileKind::Blank, pos, &world)
            })
            .collect();
        Self {
            origin,
            nx,
            ny,
            world,
            tiles,
        }
    }

    /// Build from rows of kinds; `rows[iy][ix]`. Short rows are padded blank.
    pub fn from_rows(origin: DVec2, rows: &[&[TileKind]], world: WorldCfg) -> Self {
        let nx = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        let mut room = Self::new(origin, nx, rows.len(), world);
        for (iy, row) in rows.iter().enumerate() {
            for (ix, kind) in row.iter().enumerate() {
                room.place(ix, iy, *kind);
            }
        }
        room
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    pub fn origin(&self) -> DVec2 {
        self.origin
    }

    pub fn tile_size(&self) -> f64 {
        self.world.tile_size
    }

    /// Replace the tile at `(ix, iy)`.
    pub fn set_tile(&mut self, ix: usize, iy: usize, kind: TileKind) -> Result<(), WorldError> {
        if ix >= self.nx || iy >= self.ny {
            return Err(WorldError::TileOutOfBounds {
                ix,
                iy,
                nx: self.nx,
                ny: self.ny,
            });
        }
        self.place(ix, iy, kind);
        Ok(())
    }

    fn place(&mut self, ix: usize, iy: usize, kind: TileKind) {
        let i = iy * self.nx + ix;
        let pos = self.tiles[i].position;
        self.tiles[i] = SimTile::new(kind, pos, &self.world);
    }

    pub fn kind_at(&self, ix: usize, iy: usize) -> Option<TileKind> {
        (ix < self.nx && iy < self.ny).then(|| self.tiles[iy * self.nx + ix].kind)
    }

    /// Grid index of the tile under `world_pos`, if any.
    pub fn index_of(&self, world_pos: DVec2) -> Option<(usize, usize)> {
        let local = (world_pos - self.origin) / self.world.tile_size;
        let (fx, fy) = (local.x.floor(), local.y.floor());
        if !(fx.is_finite() && fy.is_finite()) || fx < 0.0 || fy < 0.0 {
            return None;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let (ix, iy) = (fx as usize, fy as usize);
        (ix < self.nx && iy < self.ny).then_some((ix, iy))
    }
}

impl TileProvider for GridRoom {
    fn tile_at(&self, world_pos: DVec2) -> Option<&dyn Tile> {
        let (ix, iy) = self.index_of(world_pos)?;
        Some(&self.tiles[iy * self.nx + ix])
    }

    fn line_thickness(&self) -> f64 {
        self.world.line_thickness
    }
}
