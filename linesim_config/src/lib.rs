#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema for the line-follower simulator.
//!
//! - `Config` and its sections are deserialized from TOML and validated.
//! - Every section except `[simulation]` may be omitted and falls back to
//!   the defaults below.
use glam::DVec2;
use serde::Deserialize;
use std::f64::consts::{FRAC_PI_4, PI};

const TILE: f64 = 200.0;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct WorldCfg {
    pub tile_size: f64,
    pub line_thickness: f64,
}

impl Default for WorldCfg {
    fn default() -> Self {
        Self {
            tile_size: TILE,
            line_thickness: TILE / 10.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SensorKind {
    #[default]
    Analog,
    Digital,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SensorsCfg {
    /// Body-frame offsets as `[x, y]` pairs. Sensor 0 is the left-most.
    pub offsets: Vec<DVec2>,
    pub radii: Vec<f64>,
    /// Applied to every sensor unless `kinds` is given.
    pub kind: SensorKind,
    /// Optional per-sensor kinds, same length as `offsets`.
    pub kinds: Option<Vec<SensorKind>>,
    /// Schmitt-trigger thresholds for digital sensors.
    pub threshold_up: f64,
    pub threshold_down: f64,
    /// Readings averaged per sensor (>= 1).
    pub buffer_len: usize,
}

impl Default for SensorsCfg {
    fn default() -> Self {
        let spacing = 0.25 * TILE;
        Self {
            offsets: vec![
                DVec2::new(-spacing, 0.0),
                DVec2::ZERO,
                DVec2::new(spacing, 0.0),
            ],
            radii: vec![TILE / 20.0 + 1.0; 3],
            kind: SensorKind::Analog,
            kinds: None,
            threshold_up: 0.65,
            threshold_down: 0.35,
            buffer_len: 1,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RobotCfg {
    pub size: f64,
    /// Sensor array centre relative to the robot centre, `[x, y]`.
    pub sensor_array_offset: DVec2,
    pub max_vel: f64,
    /// rad/s
    pub max_rotation_rate: f64,
    /// Starting position; the layout's own start is used when absent.
    pub start: Option<DVec2>,
    /// Starting bearing in degrees.
    pub start_bearing: Option<f64>,
}

impl Default for RobotCfg {
    fn default() -> Self {
        let size = 0.5 * TILE;
        Self {
            size,
            sensor_array_offset: DVec2::new(0.0, 0.5 * size),
            max_vel: 2.0 * TILE,
            max_rotation_rate: 1.5 * PI,
            start: None,
            start_bearing: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PdCfg {
    pub forward_vel: f64,
    pub kp: f64,
    pub kd: f64,
    pub sharp_turn_error: f64,
    pub sharp_turn_speed_gain: f64,
    pub intersection_outer: f64,
    pub intersection_center: f64,
    pub gap_error: f64,
    pub gap_center_white: f64,
}

impl Default for PdCfg {
    fn default() -> Self {
        Self {
            forward_vel: 0.5 * TILE,
            kp: 12.0,
            kd: 0.0,
            sharp_turn_error: 0.35,
            sharp_turn_speed_gain: 0.15 * TILE,
            intersection_outer: 0.25,
            intersection_center: 0.15,
            gap_error: 0.05,
            gap_center_white: 0.995,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct IntersectionCfg {
    pub forward_vel: f64,
    pub forward_ticks: u32,
    /// Degrees.
    pub scan_half_angle_deg: f64,
    pub turn_rate: f64,
    pub scan_rate: f64,
    pub bearing_tolerance: f64,
    pub on_line_threshold: f64,
}

impl Default for IntersectionCfg {
    fn default() -> Self {
        Self {
            forward_vel: 0.4 * TILE,
            forward_ticks: 38,
            scan_half_angle_deg: 100.0,
            turn_rate: 2.0,
            scan_rate: 1.0,
            bearing_tolerance: 0.05,
            on_line_threshold: 0.5,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GapStrategy {
    #[default]
    Search,
    Straight,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GapCfg {
    pub strategy: GapStrategy,
    pub forward_vel: f64,
    pub detection_threshold: f64,
    /// Degrees per second.
    pub search_rate_deg: f64,
    /// Radians.
    pub initial_half_angle: f64,
    pub widen_factor: f64,
    pub forward_ticks: u32,
    pub side_tolerance: f64,
    pub forward_tolerance: f64,
}

impl Default for GapCfg {
    fn default() -> Self {
        Self {
            strategy: GapStrategy::Search,
            forward_vel: 0.4 * TILE,
            detection_threshold: 0.95,
            search_rate_deg: 120.0,
            initial_half_angle: FRAC_PI_4,
            widen_factor: 1.25,
            forward_ticks: 40,
            side_tolerance: 0.1,
            forward_tolerance: 0.05,
        }
    }
}

/// Which steering algorithm drives the robot.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ControllerKind {
    Idle,
    Straight,
    OneSensor,
    TwoSensor,
    #[default]
    ThreeSensor,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SimulationCfg {
    /// Seconds per tick.
    pub dt: f64,
    pub ticks: u64,
    /// Built-in track layout name.
    #[serde(default = "default_layout")]
    pub layout: String,
    #[serde(default)]
    pub controller: ControllerKind,
}

fn default_layout() -> String {
    "oval".to_string()
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Logging {
    /// JSON-lines log file; stderr only when absent.
    pub file: Option<String>,
    /// Filter directive, e.g. "info" or "linesim_core=trace".
    pub level: Option<String>,
    /// "never" | "daily" | "hourly"
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub world: WorldCfg,
    #[serde(default)]
    pub sensors: SensorsCfg,
    #[serde(default)]
    pub robot: RobotCfg,
    #[serde(default)]
    pub pd: PdCfg,
    #[serde(default)]
    pub intersection: IntersectionCfg,
    #[serde(default)]
    pub gap: GapCfg,
    pub simulation: SimulationCfg,
    #[serde(default)]
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

fn in_unit(v: f64) -> bool {
    (0.0..=1.0).contains(&v)
}

fn positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

fn non_negative(v: f64) -> bool {
    v.is_finite() && v >= 0.0
}

impl Config {
    /// Per-sensor kinds, expanding `sensors.kind` when `sensors.kinds` is absent.
    pub fn sensor_kinds(&self) -> Vec<SensorKind> {
        self.sensors
            .kinds
            .clone()
            .unwrap_or_else(|| vec![self.sensors.kind; self.sensors.offsets.len()])
    }

    pub fn validate(&self) -> eyre::Result<()> {
        // World
        if !positive(self.world.tile_size) {
            eyre::bail!("world.tile_size must be > 0");
        }
        if !positive(self.world.line_thickness) {
            eyre::bail!("world.line_thickness must be > 0");
        }
        if self.world.line_thickness >= self.world.tile_size {
            eyre::bail!("world.line_thickness must be smaller than world.tile_size");
        }

        // Sensors
        let n = self.sensors.offsets.len();
        if n == 0 {
            eyre::bail!("sensors.offsets must list at least one sensor");
        }
        if self.sensors.radii.len() != n {
            eyre::bail!(
                "sensors.radii has {} entries but sensors.offsets has {}",
                self.sensors.radii.len(),
                n
            );
        }
        if let Some(kinds) = &self.sensors.kinds
            && kinds.len() != n
        {
            eyre::bail!(
                "sensors.kinds has {} entries but sensors.offsets has {}",
                kinds.len(),
                n
            );
        }
        if !self.sensors.radii.iter().all(|r| positive(*r)) {
            eyre::bail!("sensors.radii must all be > 0");
        }
        if self.sensors.buffer_len == 0 {
            eyre::bail!("sensors.buffer_len must be >= 1");
        }
        if !in_unit(self.sensors.threshold_up) || !in_unit(self.sensors.threshold_down) {
            eyre::bail!("sensors.threshold_up and sensors.threshold_down must be in [0.0, 1.0]");
        }

        // Robot
        if !positive(self.robot.size) {
            eyre::bail!("robot.size must be > 0");
        }
        if !non_negative(self.robot.max_vel) {
            eyre::bail!("robot.max_vel must be >= 0");
        }
        if !non_negative(self.robot.max_rotation_rate) {
            eyre::bail!("robot.max_rotation_rate must be >= 0");
        }

        // PD
        if !(self.pd.kp.is_finite() && self.pd.kd.is_finite()) {
            eyre::bail!("pd.kp and pd.kd must be finite");
        }
        if !non_negative(self.pd.forward_vel) {
            eyre::bail!("pd.forward_vel must be >= 0");
        }
        for (name, v) in [
            ("pd.sharp_turn_error", self.pd.sharp_turn_error),
            ("pd.intersection_outer", self.pd.intersection_outer),
            ("pd.intersection_center", self.pd.intersection_center),
            ("pd.gap_center_white", self.pd.gap_center_white),
            ("intersection.on_line_threshold", self.intersection.on_line_threshold),
            ("gap.detection_threshold", self.gap.detection_threshold),
        ] {
            if !in_unit(v) {
                eyre::bail!("{name} must be in [0.0, 1.0]");
            }
        }

        // Intersection
        if !non_negative(self.intersection.forward_vel) {
            eyre::bail!("intersection.forward_vel must be >= 0");
        }
        if !positive(self.intersection.scan_half_angle_deg)
            || self.intersection.scan_half_angle_deg > 180.0
        {
            eyre::bail!("intersection.scan_half_angle_deg must be in (0, 180]");
        }
        if !(positive(self.intersection.turn_rate) && positive(self.intersection.scan_rate)) {
            eyre::bail!("intersection.turn_rate and intersection.scan_rate must be > 0");
        }
        if !positive(self.intersection.bearing_tolerance) {
            eyre::bail!("intersection.bearing_tolerance must be > 0");
        }

        // Gap
        if !non_negative(self.gap.forward_vel) {
            eyre::bail!("gap.forward_vel must be >= 0");
        }
        if !positive(self.gap.search_rate_deg) {
            eyre::bail!("gap.search_rate_deg must be > 0");
        }
        if !(self.gap.widen_factor.is_finite() && self.gap.widen_factor > 1.0) {
            eyre::bail!("gap.widen_factor must be > 1.0");
        }
        if !positive(self.gap.initial_half_angle) || self.gap.initial_half_angle > PI {
            eyre::bail!("gap.initial_half_angle must be in (0, pi]");
        }
        if !(positive(self.gap.side_tolerance) && positive(self.gap.forward_tolerance)) {
            eyre::bail!("gap.side_tolerance and gap.forward_tolerance must be > 0");
        }

        // Simulation
        if !positive(self.simulation.dt) {
            eyre::bail!("simulation.dt must be > 0");
        }
        if self.simulation.ticks == 0 {
            eyre::bail!("simulation.ticks must be >= 1");
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never, daily, hourly");
        }

        Ok(())
    }
}
