//! Kinematic robot: pose integration around a sensor array and a controller.

use glam::DVec2;
use linesim_core::config::RobotCfg;
use linesim_core::{LineFollow, MotionCommand, SensorArray, Telemetry};
use linesim_traits::{TileProvider, rotate, wrap_bearing};

/// What happened during one [`Robot::tick`].
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Pose after integration.
    pub position: DVec2,
    pub bearing: f64,
    /// Sensor readings the controller saw.
    pub readings: Vec<f64>,
    /// Command actually applied, after clamping.
    pub command: MotionCommand,
    /// Controller state after this tick.
    pub state: &'static str,
}

pub struct Robot {
    position: DVec2,
    bearing: f64,
    cfg: RobotCfg,
    sensors: SensorArray,
    controller: Box<dyn LineFollow>,
    last: MotionCommand,
}

impl core::fmt::Debug for Robot {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Robot")
            .field("position", &self.position)
            .field("bearing", &self.bearing)
            .field("controller", &self.controller.name())
            .finish_non_exhaustive()
    }
}

impl Robot {
    pub fn new(
        position: DVec2,
        bearing: f64,
        cfg: RobotCfg,
        sensors: SensorArray,
        controller: Box<dyn LineFollow>,
    ) -> Self {
        let mut robot = Self {
            position,
            bearing: wrap_bearing(bearing),
            cfg,
            sensors,
            controller,
            last: MotionCommand::STOP,
        };
        robot.place_sensors();
        robot
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn bearing(&self) -> f64 {
        self.bearing
    }

    pub fn sensors(&self) -> &SensorArray {
        &self.sensors
    }

    pub fn controller_name(&self) -> &'static str {
        self.controller.name()
    }

    /// Last applied command.
    pub fn command(&self) -> MotionCommand {
        self.last
    }

    /// Teleport, keeping the controller state.
    pub fn set_pose(&mut self, position: DVec2, bearing: f64) {
        self.position = position;
        self.bearing = wrap_bearing(bearing);
        self.place_sensors();
    }

    fn place_sensors(&mut self) {
        let centre = self.position + rotate(self.cfg.sensor_array_offset, self.bearing);
        self.sensors.set_pose(centre, self.bearing);
    }

    /// Sense, decide, clamp, then integrate bearing before position.
    pub fn tick<P: TileProvider + ?Sized>(&mut self, world: &P, dt: f64) -> TickReport {
        self.place_sensors();
        let readings = self.sensors.read(world);
        let telemetry = Telemetry {
            position: self.position,
            bearing: self.bearing,
            velocity: self.last.forward_speed,
            rotation_rate: self.last.rotation_rate,
            sensor_values: readings.clone(),
            dt,
        };

        let wanted = self.controller.follow(&telemetry);
        let command = MotionCommand::new(
            clamp_abs(wanted.forward_speed, self.cfg.max_vel),
            clamp_abs(wanted.rotation_rate, self.cfg.max_rotation_rate),
        );
        if command != wanted {
            tracing::trace!(?wanted, ?command, "command clamped");
        }

        self.bearing = wrap_bearing(self.bearing + command.rotation_rate * dt);
        self.position += rotate(DVec2::new(0.0, command.forward_speed * dt), self.bearing);
        self.last = command;

        TickReport {
            position: self.position,
            bearing: self.bearing,
            readings,
            command,
            state: self.controller.name(),
        }
    }
}

/// Clamp to `[-limit, limit]`; NaN becomes 0.
fn clamp_abs(v: f64, limit: f64) -> f64 {
    if v.is_nan() {
        return 0.0;
    }
    let limit = limit.abs();
    v.max(-limit).min(limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use linesim_core::controller::{Curve, Straight};
    use linesim_core::sensor_array::SensorArrayBuilder;
    use linesim_core::config::SensorCfg;
    use std::f64::consts::{FRAC_PI_2, PI};

    struct Empty;

    impl TileProvider for Empty {
        fn tile_at(&self, _p: DVec2) -> Option<&dyn linesim_traits::Tile> {
            None
        }

        fn line_thickness(&self) -> f64 {
            20.0
        }
    }

    fn robot(controller: Box<dyn LineFollow>) -> Robot {
        let sensors = SensorArrayBuilder::from_cfg(&SensorCfg::default())
            .try_build()
            .expect("default sensors");
        Robot::new(DVec2::ZERO, 0.0, RobotCfg::default(), sensors, controller)
    }

    #[test]
    fn straight_moves_along_plus_y() {
        let mut r = robot(Box::new(Straight { vel: 100.0 }));
        let rep = r.tick(&Empty, 0.5);
        assert!((rep.position - DVec2::new(0.0, 50.0)).length() < 1e-9);
        assert_eq!(rep.readings, vec![1.0; 3]);
        assert_eq!(rep.state, "straight");
    }

    #[test]
    fn bearing_is_integrated_before_position() {
        let mut r = robot(Box::new(Curve {
            vel: 100.0,
            rate: 1.0,
        }));
        let rep = r.tick(&Empty, FRAC_PI_2);
        assert!((rep.bearing - FRAC_PI_2).abs() < 1e-12);
        // heading -x after a quarter turn towards sensor 0
        let moved = 100.0 * FRAC_PI_2;
        assert!((rep.position - DVec2::new(-moved, 0.0)).length() < 1e-9, "{}", rep.position);
    }

    #[test]
    fn commands_are_clamped_keeping_sign() {
        let mut r = robot(Box::new(Curve {
            vel: -1.0e6,
            rate: -100.0,
        }));
        let rep = r.tick(&Empty, 0.01);
        let cfg = RobotCfg::default();
        assert_eq!(rep.command.forward_speed, -cfg.max_vel);
        assert_eq!(rep.command.rotation_rate, -cfg.max_rotation_rate);
        assert!(rep.bearing > PI, "wrapped into [0, 2pi): {}", rep.bearing);
        assert_eq!(r.command(), rep.command);
    }

    #[test]
    fn sensor_array_follows_the_body_offset() {
        let mut r = robot(Box::new(Straight { vel: 0.0 }));
        r.set_pose(DVec2::new(10.0, 10.0), FRAC_PI_2);
        let offset = RobotCfg::default().sensor_array_offset;
        let expected = DVec2::new(10.0, 10.0) + rotate(offset, FRAC_PI_2);
        assert!((r.sensors().position() - expected).length() < 1e-9);
        assert_eq!(r.sensors().bearing(), FRAC_PI_2);
    }

    #[test]
    fn nan_commands_become_zero() {
        assert_eq!(clamp_abs(f64::NAN, 3.0), 0.0);
        assert_eq!(clamp_abs(2.0, 3.0), 2.0);
        assert_eq!(clamp_abs(-4.0, 3.0), -3.0);
    }
}
