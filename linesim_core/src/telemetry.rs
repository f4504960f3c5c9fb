//! Per-tick controller input and output.

use glam::DVec2;

/// Snapshot of the robot handed to a controller once per tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Telemetry {
    pub position: DVec2,
    /// Heading in radians.
    pub bearing: f64,
    /// Forward speed applied during the previous tick.
    pub velocity: f64,
    /// Rotation rate applied during the previous tick (rad/s).
    pub rotation_rate: f64,
    /// Sensor readings in sensor-array order.
    pub sensor_values: Vec<f64>,
    /// Length of the tick this command will be applied for, seconds.
    /// Zero when the caller does not integrate with a fixed step.
    pub dt: f64,
}

impl Telemetry {
    /// Reading `i`, or white when the array is shorter than expected.
    #[inline]
    pub fn sensor(&self, i: usize) -> f64 {
        self.sensor_values
            .get(i)
            .copied()
            .unwrap_or(crate::sensor::WHITE)
    }

    /// Limit a turn of magnitude `rate` so that one tick does not rotate
    /// further than `remaining` radians. Without a known `dt` the rate is
    /// returned unchanged.
    #[inline]
    pub fn turn_limit(&self, rate: f64, remaining: f64) -> f64 {
        let rate = rate.abs();
        if self.dt > 0.0 {
            rate.min(remaining.abs() / self.dt)
        } else {
            rate
        }
    }
}

/// Effector command produced by a controller.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotionCommand {
    /// Signed forward speed in world units per second.
    pub forward_speed: f64,
    /// Signed rotation rate in radians per second.
    pub rotation_rate: f64,
}

impl MotionCommand {
    pub const STOP: Self = Self {
        forward_speed: 0.0,
        rotation_rate: 0.0,
    };

    #[inline]
    pub const fn new(forward_speed: f64, rotation_rate: f64) -> Self {
        Self {
            forward_speed,
            rotation_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_limit_stops_on_target() {
        let t = Telemetry {
            dt: 0.1,
            ..Telemetry::default()
        };
        assert_eq!(t.turn_limit(2.0, 1.0), 2.0);
        assert!((t.turn_limit(2.0, 0.05) - 0.5).abs() < 1e-12);
        assert!((t.turn_limit(-2.0, -0.05) - 0.5).abs() < 1e-12);
        assert_eq!(Telemetry::default().turn_limit(2.0, 0.05), 2.0);
    }
}
