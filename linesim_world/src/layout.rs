//! Built-in tracks.

use crate::WorldError;
use crate::catalog::TileKind::{
    self, Blank, Cross, GapHorizontal, Horizontal, QuarterCircleDownLeft as ArcDL,
    QuarterCircleDownRight as ArcDR, QuarterCircleUpLeft as ArcUL,
    QuarterCircleUpRight as ArcUR, TDown, TLeft, TRight, TUp, Vertical,
};
use crate::room::GridRoom;
use glam::DVec2;
use linesim_core::config::WorldCfg;

pub const LAYOUT_NAMES: [&str; 3] = ["oval", "cross", "gap"];

/// A room plus the pose the robot starts from.
#[derive(Debug, Clone)]
pub struct Layout {
    pub name: &'static str,
    pub room: GridRoom,
    pub start: DVec2,
    pub start_bearing: f64,
}

const OVAL: [&[TileKind]; 3] = [
    &[ArcDR, Horizontal, ArcDL],
    &[Vertical, Blank, Vertical],
    &[ArcUR, Horizontal, ArcUL],
];

const CROSS: [&[TileKind]; 3] = [
    &[ArcDR, TDown, ArcDL],
    &[TRight, Cross, TLeft],
    &[ArcUR, TUp, ArcUL],
];

const GAP: [&[TileKind]; 3] = [
    &[ArcDR, GapHorizontal, ArcDL],
    &[Vertical, Blank, Vertical],
    &[ArcUR, GapHorizontal, ArcUL],
];

/// Build a named layout. Start positions are given in tile units so they
/// scale with `world.tile_size`.
pub fn build(name: &str, world: &WorldCfg) -> Result<Layout, WorldError> {
    let (name, rows, start) = match name {
        "oval" => ("oval", OVAL, DVec2::new(0.5, 1.25)),
        "cross" => ("cross", CROSS, DVec2::new(1.5, 1.0)),
        "gap" => ("gap", GAP, DVec2::new(0.5, 1.25)),
        other => return Err(WorldError::UnknownLayout(other.to_string())),
    };
    tracing::debug!(layout = name, tile_size = world.tile_size, "building layout");
    Ok(Layout {
        name,
        room: GridRoom::from_rows(DVec2::ZERO, &rows, world.clone()),
        start: start * world.tile_size,
        start_bearing: 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use linesim_traits::TileProvider;

    #[test]
    fn every_named_layout_builds() {
        for name in LAYOUT_NAMES {
            let l = build(name, &WorldCfg::default()).expect("known layout");
            assert_eq!(l.name, name);
            assert_eq!((l.room.nx(), l.room.ny()), (3, 3));
            assert!(l.room.tile_at(l.start).is_some());
        }
    }

    #[test]
    fn unknown_layout_is_an_error() {
        assert_eq!(
            build("figure-eight", &WorldCfg::default()).expect_err("unknown"),
            WorldError::UnknownLayout("figure-eight".into())
        );
    }

    #[test]
    fn start_scales_with_tile_size() {
        let world = WorldCfg {
            tile_size: 100.0,
            line_thickness: 10.0,
        };
        let l = build("oval", &world).expect("oval");
        assert_eq!(l.start, DVec2::new(50.0, 125.0));
        assert_eq!(l.room.kind_at(1, 1), Some(Blank));
    }
}
