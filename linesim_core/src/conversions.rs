//! `From` implementations bridging `linesim_config` types to runtime types.

use crate::config::{
    FollowCfg, GapCfg, GapStrategy, IntersectionCfg, PdCfg, RobotCfg, SensorCfg, SensorKindCfg,
    WorldCfg,
};

// ── WorldCfg ─────────────────────────────────────────────────────────────────

impl From<&linesim_config::WorldCfg> for WorldCfg {
    fn from(c: &linesim_config::WorldCfg) -> Self {
        Self {
            tile_size: c.tile_size,
            line_thickness: c.line_thickness,
        }
    }
}

// ── SensorCfg ────────────────────────────────────────────────────────────────

/// Needs the whole config: kinds may come from `sensors.kind` or `sensors.kinds`.
impl From<&linesim_config::Config> for SensorCfg {
    fn from(c: &linesim_config::Config) -> Self {
        let s = &c.sensors;
        let kinds = c
            .sensor_kinds()
            .into_iter()
            .map(|k| match k {
                linesim_config::SensorKind::Analog => SensorKindCfg::Analog,
                linesim_config::SensorKind::Digital => SensorKindCfg::Digital {
                    threshold_up: s.threshold_up,
                    threshold_down: s.threshold_down,
                },
            })
            .collect();
        Self {
            offsets: s.offsets.clone(),
            radii: s.radii.clone(),
            kinds,
            buffer_len: s.buffer_len,
        }
    }
}

// ── RobotCfg ─────────────────────────────────────────────────────────────────

impl From<&linesim_config::RobotCfg> for RobotCfg {
    fn from(c: &linesim_config::RobotCfg) -> Self {
        Self {
            size: c.size,
            sensor_array_offset: c.sensor_array_offset,
            max_vel: c.max_vel,
            max_rotation_rate: c.max_rotation_rate,
        }
    }
}

// ── PdCfg ────────────────────────────────────────────────────────────────────

impl From<&linesim_config::PdCfg> for PdCfg {
    fn from(c: &linesim_config::PdCfg) -> Self {
        Self {
            forward_vel: c.forward_vel,
            kp: c.kp,
            kd: c.kd,
            sharp_turn_error: c.sharp_turn_error,
            sharp_turn_speed_gain: c.sharp_turn_speed_gain,
            intersection_outer: c.intersection_outer,
            intersection_center: c.intersection_center,
            gap_error: c.gap_error,
            gap_center_white: c.gap_center_white,
        }
    }
}

// ── IntersectionCfg ──────────────────────────────────────────────────────────

impl From<&linesim_config::IntersectionCfg> for IntersectionCfg {
    fn from(c: &linesim_config::IntersectionCfg) -> Self {
        Self {
            forward_vel: c.forward_vel,
            forward_ticks: c.forward_ticks,
            scan_half_angle: c.scan_half_angle_deg.to_radians(),
            turn_rate: c.turn_rate,
            scan_rate: c.scan_rate,
            bearing_tolerance: c.bearing_tolerance,
            on_line_threshold: c.on_line_threshold,
        }
    }
}

// ── GapCfg ───────────────────────────────────────────────────────────────────

impl From<linesim_config::GapStrategy> for GapStrategy {
    fn from(s: linesim_config::GapStrategy) -> Self {
        match s {
            linesim_config::GapStrategy::Search => GapStrategy::Search,
            linesim_config::GapStrategy::Straight => GapStrategy::Straight,
        }
    }
}

impl From<&linesim_config::GapCfg> for GapCfg {
    fn from(c: &linesim_config::GapCfg) -> Self {
        Self {
            strategy: c.strategy.into(),
            forward_vel: c.forward_vel,
            detection_threshold: c.detection_threshold,
            search_rate: c.search_rate_deg.to_radians(),
            initial_half_angle: c.initial_half_angle,
            widen_factor: c.widen_factor,
            forward_ticks: c.forward_ticks,
            side_tolerance: c.side_tolerance,
            forward_tolerance: c.forward_tolerance,
        }
    }
}

// ── FollowCfg ────────────────────────────────────────────────────────────────

impl From<&linesim_config::Config> for FollowCfg {
    fn from(c: &linesim_config::Config) -> Self {
        Self {
            pd: (&c.pd).into(),
            intersection: (&c.intersection).into(),
            gap: (&c.gap).into(),
        }
    }
}
