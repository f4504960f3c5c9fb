//! Named tile layouts built from unit-square templates.
//!
//! Templates live in `[0, 1]²` with `y = 0` as the "up" edge. Each kind is a
//! set of templates run through flips, then scaled to the tile size and
//! densified so neighbouring points stay within `line_thickness / 4`.

use glam::DVec2;
use linesim_traits::Line;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flip {
    /// x -> 1 - x
    Vertical,
    /// y -> 1 - y
    Horizontal,
    /// swap x and y
    Diagonal,
}

impl Flip {
    fn apply(self, p: DVec2) -> DVec2 {
        match self {
            Flip::Vertical => DVec2::new(1.0 - p.x, p.y),
            Flip::Horizontal => DVec2::new(p.x, 1.0 - p.y),
            Flip::Diagonal => DVec2::new(p.y, p.x),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Template {
    Vertical,
    HalfUp,
    QuarterUp,
    DiagonalUpRight,
    QuarterCircleUpLeft,
}

impl Template {
    fn points(self) -> Vec<DVec2> {
        match self {
            Template::Vertical => vec![DVec2::new(0.5, 0.0), DVec2::new(0.5, 1.0)],
            Template::HalfUp => vec![DVec2::new(0.5, 0.0), DVec2::new(0.5, 0.5)],
            Template::QuarterUp => vec![DVec2::new(0.5, 0.0), DVec2::new(0.5, 0.25)],
            Template::DiagonalUpRight => vec![DVec2::new(0.5, 0.0), DVec2::new(1.0, 0.5)],
            // centred on the (0, 0) corner, radius one half
            Template::QuarterCircleUpLeft => (0..=9)
                .map(|i| {
                    let a = f64::from(i) / 9.0 * std::f64::consts::FRAC_PI_2;
                    DVec2::new(0.5 * a.cos(), 0.5 * a.sin())
                })
                .collect(),
        }
    }
}

/// One line of a tile: a template and the flips applied to it, in order.
type Piece = (Template, &'static [Flip]);

use Flip::{Diagonal as D, Horizontal as H, Vertical as V};

const VERTICAL: Piece = (Template::Vertical, &[]);
const HORIZONTAL: Piece = (Template::Vertical, &[D]);
const HALF_UP: Piece = (Template::HalfUp, &[]);
const HALF_DOWN: Piece = (Template::HalfUp, &[H]);
const HALF_RIGHT: Piece = (Template::HalfUp, &[H, D]);
const HALF_LEFT: Piece = (Template::HalfUp, &[H, D, V]);
const QUARTER_UP: Piece = (Template::QuarterUp, &[]);
const QUARTER_DOWN: Piece = (Template::QuarterUp, &[H]);
const QUARTER_RIGHT: Piece = (Template::QuarterUp, &[H, D]);
const QUARTER_LEFT: Piece = (Template::QuarterUp, &[H, D, V]);
const DIAG_UP_RIGHT: Piece = (Template::DiagonalUpRight, &[]);
const DIAG_UP_LEFT: Piece = (Template::DiagonalUpRight, &[V]);
const DIAG_DOWN_LEFT: Piece = (Template::DiagonalUpRight, &[V, H]);
const DIAG_DOWN_RIGHT: Piece = (Template::DiagonalUpRight, &[H]);
const ARC_UP_LEFT: Piece = (Template::QuarterCircleUpLeft, &[]);
const ARC_UP_RIGHT: Piece = (Template::QuarterCircleUpLeft, &[V]);
const ARC_DOWN_RIGHT: Piece = (Template::QuarterCircleUpLeft, &[V, H]);
const ARC_DOWN_LEFT: Piece = (Template::QuarterCircleUpLeft, &[H]);

/// Every tile the simulator can place.
///
/// Direction words name tile edges: `Up` is the `y = 0` edge, `Left` the
/// `x = 0` edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TileKind {
    #[default]
    Blank,
    Vertical,
    Horizontal,
    Cross,
    HalfUp,
    HalfDown,
    HalfLeft,
    HalfRight,
    /// Two quarter lines with a half-tile gap between them.
    GapVertical,
    GapHorizontal,
    CornerUpLeft,
    CornerUpRight,
    CornerDownLeft,
    CornerDownRight,
    TUp,
    TDown,
    TLeft,
    TRight,
    DiagonalUpRight,
    DiagonalUpLeft,
    DiagonalDownLeft,
    DiagonalDownRight,
    QuarterCircleUpLeft,
    QuarterCircleUpRight,
    QuarterCircleDownLeft,
    QuarterCircleDownRight,
}

impl TileKind {
    pub const ALL: [TileKind; 26] = [
        TileKind::Blank,
        TileKind::Vertical,
        TileKind::Horizontal,
        TileKind::Cross,
        TileKind::HalfUp,
        TileKind::HalfDown,
        TileKind::HalfLeft,
        TileKind::HalfRight,
        TileKind::GapVertical,
        TileKind::GapHorizontal,
        TileKind::CornerUpLeft,
        TileKind::CornerUpRight,
        TileKind::CornerDownLeft,
        TileKind::CornerDownRight,
        TileKind::TUp,
        TileKind::TDown,
        TileKind::TLeft,
        TileKind::TRight,
        TileKind::DiagonalUpRight,
        TileKind::DiagonalUpLeft,
        TileKind::DiagonalDownLeft,
        TileKind::DiagonalDownRight,
        TileKind::QuarterCircleUpLeft,
        TileKind::QuarterCircleUpRight,
        TileKind::QuarterCircleDownLeft,
        TileKind::QuarterCircleDownRight,
    ];

    fn pieces(self) -> &'static [Piece] {
        match self {
            TileKind::Blank => &[],
            TileKind::Vertical => &[VERTICAL],
            TileKind::Horizontal => &[HORIZONTAL],
            TileKind::Cross => &[HORIZONTAL, VERTICAL],
            TileKind::HalfUp => &[HALF_UP],
            TileKind::HalfDown => &[HALF_DOWN],
            TileKind::HalfLeft => &[HALF_LEFT],
            TileKind::HalfRight => &[HALF_RIGHT],
            TileKind::GapVertical => &[QUARTER_UP, QUARTER_DOWN],
            TileKind::GapHorizontal => &[QUARTER_RIGHT, QUARTER_LEFT],
            TileKind::CornerUpLeft => &[HALF_UP, HALF_LEFT],
            TileKind::CornerUpRight => &[HALF_UP, HALF_RIGHT],
            TileKind::CornerDownLeft => &[HALF_DOWN, HALF_LEFT],
            TileKind::CornerDownRight => &[HALF_DOWN, HALF_RIGHT],
            TileKind::TUp => &[HALF_UP, HORIZONTAL],
            TileKind::TDown => &[HALF_DOWN, HORIZONTAL],
            TileKind::TLeft => &[HALF_LEFT, VERTICAL],
            TileKind::TRight => &[HALF_RIGHT, VERTICAL],
            TileKind::DiagonalUpRight => &[DIAG_UP_RIGHT],
            TileKind::DiagonalUpLeft => &[DIAG_UP_LEFT],
            TileKind::DiagonalDownLeft => &[DIAG_DOWN_LEFT],
            TileKind::DiagonalDownRight => &[DIAG_DOWN_RIGHT],
            TileKind::QuarterCircleUpLeft => &[ARC_UP_LEFT],
            TileKind::QuarterCircleUpRight => &[ARC_UP_RIGHT],
            TileKind::QuarterCircleDownLeft => &[ARC_DOWN_LEFT],
            TileKind::QuarterCircleDownRight => &[ARC_DOWN_RIGHT],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TileKind::Blank => "blank",
            TileKind::Vertical => "vertical",
            TileKind::Horizontal => "horizontal",
            TileKind::Cross => "cross",
            TileKind::HalfUp => "half-up",
            TileKind::HalfDown => "half-down",
            TileKind::HalfLeft => "half-left",
            TileKind::HalfRight => "half-right",
            TileKind::GapVertical => "gap-vertical",
            TileKind::GapHorizontal => "gap-horizontal",
            TileKind::CornerUpLeft => "corner-up-left",
            TileKind::CornerUpRight => "corner-up-right",
            TileKind::CornerDownLeft => "corner-down-left",
            TileKind::CornerDownRight => "corner-down-right",
            TileKind::TUp => "t-up",
            TileKind::TDown => "t-down",
            TileKind::TLeft => "t-left",
            TileKind::TRight => "t-right",
            TileKind::DiagonalUpRight => "diagonal-up-right",
            TileKind::DiagonalUpLeft => "diagonal-up-left",
            TileKind::DiagonalDownLeft => "diagonal-down-left",
            TileKind::DiagonalDownRight => "diagonal-down-right",
            TileKind::QuarterCircleUpLeft => "quarter-circle-up-left",
            TileKind::QuarterCircleUpRight => "quarter-circle-up-right",
            TileKind::QuarterCircleDownLeft => "quarter-circle-down-left",
            TileKind::QuarterCircleDownRight => "quarter-circle-down-right",
        }
    }

    /// Lines in tile-local coordinates for a tile of edge `size`.
    pub fn lines(self, size: f64, max_point_gap: f64) -> Vec<Line> {
        self.pieces()
            .iter()
            .map(|(template, flips)| {
                Line::new(template.points())
                    .map_points(|p| flips.iter().fold(p, |q, f| f.apply(q)) * size)
                    .densified(max_point_gap)
            })
            .collect()
    }
}

impl std::fmt::Display for TileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for TileKind {
    type Err = crate::WorldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TileKind::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| crate::WorldError::UnknownTile(s.to_string()))
    }
}
