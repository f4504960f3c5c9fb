//! Recovery states used when the line disappears under every sensor.

use super::pd::PdLineFollow;
use super::three_sensor::FollowState;
use crate::config::FollowCfg;
use crate::fsm::Step;
use crate::telemetry::{MotionCommand, Telemetry};
use linesim_traits::{angle_diff, wrap_bearing};
use std::f64::consts::PI;
use std::sync::Arc;

/// True when any sensor dips below the reacquisition threshold.
fn line_found(cfg: &FollowCfg, t: &Telemetry) -> bool {
    t.sensor_values
        .iter()
        .any(|&v| v < cfg.gap.detection_threshold)
}

fn resume(cfg: &Arc<FollowCfg>) -> Step<FollowState, MotionCommand> {
    tracing::info!("line reacquired");
    Step::transition(
        MotionCommand::new(cfg.gap.forward_vel, 0.0),
        FollowState::PdLineFollow(PdLineFollow::new(Arc::clone(cfg))),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDirection {
    Left,
    Right,
    Forwards,
}

/// Searches left, then right, then drives on along the original heading.
///
/// Each cycle that ends without finding the line widens the search by
/// `widen_factor`, up to a half-angle of π.
#[derive(Debug, Clone)]
pub struct CrossGapSearch {
    cfg: Arc<FollowCfg>,
    direction: SearchDirection,
    forward: Option<f64>,
    half_angle: f64,
    forward_ticks: u32,
}

impl CrossGapSearch {
    pub fn new(cfg: Arc<FollowCfg>) -> Self {
        let half_angle = cfg.gap.initial_half_angle;
        Self {
            cfg,
            direction: SearchDirection::Forwards,
            forward: None,
            half_angle,
            forward_ticks: 0,
        }
    }

    pub(crate) fn reset(&mut self) {
        self.direction = SearchDirection::Forwards;
        self.forward = None;
        self.half_angle = self.cfg.gap.initial_half_angle;
        self.forward_ticks = 0;
    }

    pub fn direction(&self) -> SearchDirection {
        self.direction
    }

    pub fn half_angle(&self) -> f64 {
        self.half_angle
    }

    pub fn forward_bearing(&self) -> Option<f64> {
        self.forward
    }

    fn left_bearing(&self, forward: f64) -> f64 {
        wrap_bearing(forward + self.half_angle)
    }

    fn right_bearing(&self, forward: f64) -> f64 {
        wrap_bearing(forward - self.half_angle)
    }

    pub(crate) fn step(&mut self, t: &Telemetry) -> Step<FollowState, MotionCommand> {
        if line_found(&self.cfg, t) {
            return resume(&self.cfg);
        }

        let gap = &self.cfg.gap;
        let rate = gap.search_rate;
        let forward = *self.forward.get_or_insert(t.bearing);

        let cmd = match self.direction {
            SearchDirection::Left => {
                let target = self.left_bearing(forward);
                if angle_diff(target, t.bearing).abs() < gap.side_tolerance {
                    tracing::debug!("gap search: left side done");
                    self.direction = SearchDirection::Right;
                    MotionCommand::new(0.0, -rate)
                } else {
                    // counter-clockwise distance still to cover
                    let remaining = wrap_bearing(target - t.bearing);
                    MotionCommand::new(0.0, t.turn_limit(rate, remaining))
                }
            }
            SearchDirection::Right => {
                let target = self.right_bearing(forward);
                if angle_diff(target, t.bearing).abs() < gap.side_tolerance {
                    tracing::debug!("gap search: right side done");
                    self.direction = SearchDirection::Forwards;
                    MotionCommand::new(0.0, 0.5 * rate)
                } else {
                    let remaining = wrap_bearing(t.bearing - target);
                    MotionCommand::new(0.0, -t.turn_limit(rate, remaining))
                }
            }
            SearchDirection::Forwards => {
                let diff = angle_diff(forward, t.bearing);
                if diff.abs() > gap.forward_tolerance {
                    MotionCommand::new(0.0, t.turn_limit(0.5 * rate, diff).copysign(diff))
                } else {
                    self.forward_ticks += 1;
                    if self.forward_ticks > gap.forward_ticks {
                        self.forward_ticks = 0;
                        self.half_angle = (self.half_angle * gap.widen_factor).min(PI);
                        self.direction = SearchDirection::Left;
                        tracing::debug!(half_angle = self.half_angle, "gap search widened");
                    }
                    MotionCommand::new(gap.forward_vel, 0.0)
                }
            }
        };
        Step::stay(cmd)
    }
}

/// Drives straight until any sensor sees the line again.
#[derive(Debug, Clone)]
pub struct CrossGapStraightLine {
    cfg: Arc<FollowCfg>,
}

impl CrossGapStraightLine {
    pub fn new(cfg: Arc<FollowCfg>) -> Self {
        Self { cfg }
    }

    pub(crate) fn step(&mut self, t: &Telemetry) -> Step<FollowState, MotionCommand> {
        if line_found(&self.cfg, t) {
            return resume(&self.cfg);
        }
        Step::stay(MotionCommand::new(self.cfg.gap.forward_vel, 0.0))
    }
}
