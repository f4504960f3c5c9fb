//! Line-follow controllers.
//!
//! Every controller consumes one [`Telemetry`] per tick and produces one
//! [`MotionCommand`]. The simple algorithms here are stateless or carry a
//! single value; [`ThreeSensorFollow`] is the full state machine built on
//! [`crate::fsm::Manager`].
//!
//! Sensor order is left to right in the body frame: sensor 0 sits on the side
//! a positive rotation rate turns towards.

pub mod gap;
pub mod intersection;
pub mod pd;
pub mod three_sensor;

pub use gap::{CrossGapSearch, CrossGapStraightLine, SearchDirection};
pub use intersection::{LineIntersection, Run, ScanDecision, ScanSample, decide, simplify};
pub use pd::PdLineFollow;
pub use three_sensor::{FollowState, ThreeSensorFollow, ThreeSensorFollowBuilder};

use crate::telemetry::{MotionCommand, Telemetry};

/// A per-tick steering algorithm.
pub trait LineFollow {
    /// Identifier of the algorithm, or of its active state for stateful ones.
    fn name(&self) -> &'static str;

    fn follow(&mut self, telemetry: &Telemetry) -> MotionCommand;
}

impl<T: LineFollow + ?Sized> LineFollow for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn follow(&mut self, telemetry: &Telemetry) -> MotionCommand {
        (**self).follow(telemetry)
    }
}

/// Stands still.
#[derive(Debug, Clone, Copy, Default)]
pub struct Idle;

impl LineFollow for Idle {
    fn name(&self) -> &'static str {
        "idle"
    }

    fn follow(&mut self, _telemetry: &Telemetry) -> MotionCommand {
        MotionCommand::STOP
    }
}

/// Drives straight ahead, ignoring the sensors.
#[derive(Debug, Clone, Copy)]
pub struct Straight {
    pub vel: f64,
}

impl LineFollow for Straight {
    fn name(&self) -> &'static str {
        "straight"
    }

    fn follow(&mut self, _telemetry: &Telemetry) -> MotionCommand {
        MotionCommand::new(self.vel, 0.0)
    }
}

/// Constant forward speed and rotation rate.
#[derive(Debug, Clone, Copy)]
pub struct Curve {
    pub vel: f64,
    pub rate: f64,
}

impl LineFollow for Curve {
    fn name(&self) -> &'static str {
        "curve"
    }

    fn follow(&mut self, _telemetry: &Telemetry) -> MotionCommand {
        MotionCommand::new(self.vel, self.rate)
    }
}

/// Bang-bang edge follower on sensor 0.
///
/// Turns with `rate` while the sensor sees the line and with `-rate` while it
/// does not, so the robot wiggles along the line edge.
#[derive(Debug, Clone, Copy)]
pub struct OneSensorFollow {
    pub vel: f64,
    pub rate: f64,
}

impl Default for OneSensorFollow {
    fn default() -> Self {
        Self {
            vel: 0.5 * crate::config::DEFAULT_TILE_SIZE,
            rate: -1.2,
        }
    }
}

impl LineFollow for OneSensorFollow {
    fn name(&self) -> &'static str {
        "one_sensor"
    }

    fn follow(&mut self, telemetry: &Telemetry) -> MotionCommand {
        let rate = if telemetry.sensor(0) < 0.5 {
            -self.rate
        } else {
            self.rate
        };
        MotionCommand::new(self.vel, rate)
    }
}

/// PD over two sensors straddling the line.
#[derive(Debug, Clone, Copy)]
pub struct TwoSensorFollow {
    pub vel: f64,
    pub kp: f64,
    pub kd: f64,
    /// Forward speed = `slow_gain * (1 - error)` once the error passes 0.35.
    pub slow_gain: f64,
    prev_error: f64,
}

impl TwoSensorFollow {
    pub fn new(vel: f64, kp: f64, kd: f64, slow_gain: f64) -> Self {
        Self {
            vel,
            kp,
            kd,
            slow_gain,
            prev_error: 0.0,
        }
    }
}

impl LineFollow for TwoSensorFollow {
    fn name(&self) -> &'static str {
        "two_sensor"
    }

    fn follow(&mut self, telemetry: &Telemetry) -> MotionCommand {
        let error = telemetry.sensor(1) - telemetry.sensor(0);
        let rate = self.kp * error + self.kd * (self.prev_error - error);
        self.prev_error = error;
        let vel = if error > 0.35 {
            self.slow_gain * (1.0 - error)
        } else {
            self.vel
        };
        MotionCommand::new(vel, rate)
    }
}
