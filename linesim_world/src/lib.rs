#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Tile-based track world and the kinematic robot that drives through it.
//!
//! Tiles are generated from a small [`catalog`] of unit-square templates.
//! A [`GridRoom`] implements `linesim_traits::TileProvider` so the sensor
//! array can read it directly, and a [`Robot`] closes the loop: sense,
//! steer, integrate.

pub mod catalog;
pub mod layout;
pub mod robot;
pub mod room;
pub mod scenario;

pub use catalog::TileKind;
pub use layout::{LAYOUT_NAMES, Layout};
pub use robot::{Robot, TickReport};
pub use room::{GridRoom, SimTile};
pub use scenario::{RunSummary, Scenario};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WorldError {
    #[error("tile ({ix}, {iy}) is outside the {nx}x{ny} room")]
    TileOutOfBounds {
        ix: usize,
        iy: usize,
        nx: usize,
        ny: usize,
    },
    #[error("unknown layout '{0}' (expected one of: oval, cross, gap)")]
    UnknownLayout(String),
    #[error("unknown tile kind '{0}'")]
    UnknownTile(String),
}
