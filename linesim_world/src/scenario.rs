//! Everything needed to run a simulation, assembled from a [`Config`].

use crate::layout::{self, Layout};
use crate::robot::{Robot, TickReport};
use crate::room::GridRoom;
use glam::DVec2;
use linesim_config::{Config, ControllerKind};
use linesim_core::config::{FollowCfg, RobotCfg, SensorCfg, WorldCfg};
use linesim_core::controller::{Idle, OneSensorFollow, Straight, TwoSensorFollow};
use linesim_core::{LineFollow, Result, SensorArrayBuilder, ThreeSensorFollow};

/// A room, a robot in it and the step size.
#[derive(Debug)]
pub struct Scenario {
    pub layout: &'static str,
    pub room: GridRoom,
    pub robot: Robot,
    pub dt: f64,
    pub ticks: u64,
}

/// Steering algorithm named by `simulation.controller`.
pub fn controller_from(kind: ControllerKind, follow: FollowCfg) -> Result<Box<dyn LineFollow>> {
    let vel = follow.pd.forward_vel;
    Ok(match kind {
        ControllerKind::Idle => Box::new(Idle),
        ControllerKind::Straight => Box::new(Straight { vel }),
        ControllerKind::OneSensor => Box::new(OneSensorFollow {
            vel,
            ..OneSensorFollow::default()
        }),
        ControllerKind::TwoSensor => Box::new(TwoSensorFollow::new(
            vel,
            follow.pd.kp,
            follow.pd.kd,
            follow.pd.sharp_turn_speed_gain,
        )),
        ControllerKind::ThreeSensor => Box::new(
            ThreeSensorFollow::builder()
                .pd(follow.pd)
                .intersection(follow.intersection)
                .gap(follow.gap)
                .try_build()?,
        ),
    })
}

impl Scenario {
    /// Build the layout named in `simulation.layout`.
    ///
    /// Expects a validated config; builder errors surface as `BuildError`,
    /// an unknown layout as `WorldError`.
    pub fn from_config(cfg: &Config) -> Result<Self> {
        Self::with_layout(cfg, &cfg.simulation.layout)
    }

    pub fn with_layout(cfg: &Config, layout_name: &str) -> Result<Self> {
        let world = WorldCfg::from(&cfg.world);
        let Layout {
            name,
            room,
            start,
            start_bearing,
        } = layout::build(layout_name, &world)?;

        let sensors = SensorArrayBuilder::from_cfg(&SensorCfg::from(cfg)).try_build()?;
        let controller = controller_from(cfg.simulation.controller, FollowCfg::from(cfg))?;
        let start = cfg.robot.start.unwrap_or(start);
        let bearing = cfg
            .robot
            .start_bearing
            .map_or(start_bearing, f64::to_radians);
        let robot = Robot::new(
            start,
            bearing,
            RobotCfg::from(&cfg.robot),
            sensors,
            controller,
        );
        tracing::info!(
            layout = name,
            controller = robot.controller_name(),
            x = start.x,
            y = start.y,
            bearing,
            "scenario ready"
        );
        Ok(Self {
            layout: name,
            room,
            robot,
            dt: cfg.simulation.dt,
            ticks: cfg.simulation.ticks,
        })
    }

    pub fn step(&mut self) -> TickReport {
        self.robot.tick(&self.room, self.dt)
    }

    /// Run `ticks` steps, handing every report to `on_tick`.
    pub fn run(&mut self, ticks: u64, mut on_tick: impl FnMut(u64, &TickReport)) -> RunSummary {
        let mut summary = RunSummary {
            start: self.robot.position(),
            ..RunSummary::default()
        };
        let mut state = self.robot.controller_name();
        for i in 0..ticks {
            let rep = self.step();
            if rep.state != state {
                tracing::debug!(tick = i, from = state, to = rep.state, "controller state changed");
                summary.transitions += 1;
                state = rep.state;
            }
            if rep.readings.iter().any(|&v| v < 0.5) {
                summary.ticks_on_line += 1;
            }
            summary.ticks += 1;
            summary.distance += rep.command.forward_speed.abs() * self.dt;
            on_tick(i, &rep);
        }
        summary.end = self.robot.position();
        summary.bearing = self.robot.bearing();
        summary.state = self.robot.controller_name();
        summary
    }
}

/// Totals over one [`Scenario::run`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub ticks: u64,
    pub start: DVec2,
    pub end: DVec2,
    pub bearing: f64,
    pub state: &'static str,
    /// Controller state changes seen between ticks.
    pub transitions: u64,
    /// Ticks where at least one sensor read darker than 0.5.
    pub ticks_on_line: u64,
    pub distance: f64,
}
