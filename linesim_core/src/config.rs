//! Configuration types for the simulation core.
//!
//! These are the runtime configuration structs used by the sensor array and
//! the controllers. They are separate from the TOML-deserialized config in
//! `linesim_config`; see `conversions` for the mapping.

use glam::DVec2;
use std::f64::consts::{FRAC_PI_4, PI};

/// Default tile edge length in world units.
pub const DEFAULT_TILE_SIZE: f64 = 200.0;

/// Track geometry shared by every tile.
#[derive(Debug, Clone)]
pub struct WorldCfg {
    pub tile_size: f64,
    /// Thickness of every drawn line. Default: a tenth of the tile.
    pub line_thickness: f64,
}

impl Default for WorldCfg {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            line_thickness: DEFAULT_TILE_SIZE / 10.0,
        }
    }
}

impl WorldCfg {
    /// Maximum distance between consecutive line points after densifying.
    pub fn max_line_point_gap(&self) -> f64 {
        self.line_thickness / 4.0
    }
}

/// Analog sensors average their buffer; digital ones add a Schmitt trigger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensorKindCfg {
    Analog,
    Digital { threshold_up: f64, threshold_down: f64 },
}

/// Sensor array layout.
#[derive(Debug, Clone)]
pub struct SensorCfg {
    /// Body-frame offsets, one per sensor, in construction order.
    pub offsets: Vec<DVec2>,
    /// Detection circle radius per sensor.
    pub radii: Vec<f64>,
    pub kinds: Vec<SensorKindCfg>,
    /// Ring buffer length used for smoothing (>= 1).
    pub buffer_len: usize,
}

impl Default for SensorCfg {
    fn default() -> Self {
        let world = WorldCfg::default();
        let spacing = 0.25 * world.tile_size;
        let radius = 0.5 * world.line_thickness + 1.0;
        Self {
            offsets: vec![
                DVec2::new(-spacing, 0.0),
                DVec2::ZERO,
                DVec2::new(spacing, 0.0),
            ],
            radii: vec![radius; 3],
            kinds: vec![SensorKindCfg::Analog; 3],
            buffer_len: 1,
        }
    }
}

/// Steady-state PD tracking.
#[derive(Debug, Clone)]
pub struct PdCfg {
    pub forward_vel: f64,
    pub kp: f64,
    pub kd: f64,
    /// Errors above this slow the robot down.
    pub sharp_turn_error: f64,
    /// Forward speed = gain * (1 - error) while turning sharply.
    pub sharp_turn_speed_gain: f64,
    /// Outer sensors below this count towards an intersection.
    pub intersection_outer: f64,
    /// Centre sensor below this counts towards an intersection.
    pub intersection_center: f64,
    /// Signed error below this with a white centre sensor means a gap.
    pub gap_error: f64,
    pub gap_center_white: f64,
}

impl Default for PdCfg {
    fn default() -> Self {
        Self {
            forward_vel: 0.5 * DEFAULT_TILE_SIZE,
            kp: 12.0,
            kd: 0.0,
            sharp_turn_error: 0.35,
            sharp_turn_speed_gain: 0.15 * DEFAULT_TILE_SIZE,
            intersection_outer: 0.25,
            intersection_center: 0.15,
            gap_error: 0.05,
            gap_center_white: 0.995,
        }
    }
}

/// Junction handling: advance, swing to the scan start, sweep, turn to pick.
#[derive(Debug, Clone)]
pub struct IntersectionCfg {
    pub forward_vel: f64,
    /// Ticks spent driving forward before scanning.
    pub forward_ticks: u32,
    /// The sweep covers `forward ± scan_half_angle`.
    pub scan_half_angle: f64,
    /// Rotation rate used to reach the scan start and the final bearing.
    pub turn_rate: f64,
    /// Slower rotation rate used while sampling.
    pub scan_rate: f64,
    pub bearing_tolerance: f64,
    /// Centre readings below this are "on line" during the sweep.
    pub on_line_threshold: f64,
}

impl Default for IntersectionCfg {
    fn default() -> Self {
        Self {
            forward_vel: 0.4 * DEFAULT_TILE_SIZE,
            forward_ticks: 38,
            scan_half_angle: 100f64.to_radians(),
            turn_rate: 2.0,
            scan_rate: 1.0,
            bearing_tolerance: 0.05,
            on_line_threshold: 0.5,
        }
    }
}

/// Which recovery state the PD follower hands over to when the line vanishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GapStrategy {
    #[default]
    Search,
    Straight,
}

/// Gap crossing and line reacquisition.
#[derive(Debug, Clone)]
pub struct GapCfg {
    pub strategy: GapStrategy,
    pub forward_vel: f64,
    /// Any sensor below this ends the gap.
    pub detection_threshold: f64,
    /// Search rotation rate (rad/s).
    pub search_rate: f64,
    pub initial_half_angle: f64,
    /// Growth of the half-angle after each failed cycle.
    pub widen_factor: f64,
    /// Ticks driven straight per cycle.
    pub forward_ticks: u32,
    pub side_tolerance: f64,
    pub forward_tolerance: f64,
}

impl Default for GapCfg {
    fn default() -> Self {
        Self {
            strategy: GapStrategy::Search,
            forward_vel: 0.4 * DEFAULT_TILE_SIZE,
            detection_threshold: 0.95,
            search_rate: 120f64.to_radians(),
            initial_half_angle: FRAC_PI_4,
            widen_factor: 1.25,
            forward_ticks: 40,
            side_tolerance: 0.1,
            forward_tolerance: 0.05,
        }
    }
}

/// Everything the three-sensor follower states need to build one another.
#[derive(Debug, Clone, Default)]
pub struct FollowCfg {
    pub pd: PdCfg,
    pub intersection: IntersectionCfg,
    pub gap: GapCfg,
}

/// Kinematic limits and body geometry of the simulated robot.
#[derive(Debug, Clone)]
pub struct RobotCfg {
    pub size: f64,
    /// Sensor array centre relative to the robot centre, body frame.
    pub sensor_array_offset: DVec2,
    pub max_vel: f64,
    pub max_rotation_rate: f64,
}

impl Default for RobotCfg {
    fn default() -> Self {
        let size = 0.5 * DEFAULT_TILE_SIZE;
        Self {
            size,
            sensor_array_offset: DVec2::new(0.0, 0.5 * size),
            max_vel: 2.0 * DEFAULT_TILE_SIZE,
            max_rotation_rate: 1.5 * PI,
        }
    }
}
