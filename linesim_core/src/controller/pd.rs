use super::gap::{CrossGapSearch, CrossGapStraightLine};
use super::intersection::LineIntersection;
use super::three_sensor::FollowState;
use crate::config::{FollowCfg, GapStrategy};
use crate::fsm::Step;
use crate::telemetry::{MotionCommand, Telemetry};
use std::sync::Arc;

/// Steady-state PD tracking over the outer sensors.
///
/// `error = s2 - s0`, so a darker sensor 2 gives a negative error and a
/// negative rotation rate, turning towards sensor 2.
#[derive(Debug, Clone)]
pub struct PdLineFollow {
    cfg: Arc<FollowCfg>,
    prev_error: f64,
}

impl PdLineFollow {
    pub fn new(cfg: Arc<FollowCfg>) -> Self {
        Self {
            cfg,
            prev_error: 0.0,
        }
    }

    pub fn prev_error(&self) -> f64 {
        self.prev_error
    }

    pub(crate) fn reset(&mut self) {
        self.prev_error = 0.0;
    }

    /// True when at least two sensors are below their junction thresholds.
    pub fn at_intersection(&self, s: [f64; 3]) -> bool {
        let pd = &self.cfg.pd;
        let dark = [
            s[0] < pd.intersection_outer,
            s[1] < pd.intersection_center,
            s[2] < pd.intersection_outer,
        ];
        dark.iter().filter(|&&d| d).count() >= 2
    }

    pub(crate) fn step(&mut self, t: &Telemetry) -> Step<FollowState, MotionCommand> {
        let s = [t.sensor(0), t.sensor(1), t.sensor(2)];

        if self.at_intersection(s) {
            tracing::info!(?s, "intersection detected");
            let out = MotionCommand::new(self.cfg.intersection.forward_vel, 0.0);
            let next = LineIntersection::new(Arc::clone(&self.cfg));
            return Step::transition(out, FollowState::LineIntersection(next));
        }

        let pd = &self.cfg.pd;
        let error = s[2] - s[0];
        let p = pd.kp * error;
        let d = pd.kd * (self.prev_error - error);
        let rate = p + d;
        tracing::trace!(error, p, d, "pd terms");
        self.prev_error = error;

        let mut vel = pd.forward_vel;
        if error > pd.sharp_turn_error {
            vel = pd.sharp_turn_speed_gain * (1.0 - error);
            tracing::debug!(error, vel, "sharp turn slowdown");
        }

        if error < pd.gap_error && s[1] > pd.gap_center_white {
            let gap = &self.cfg.gap;
            tracing::info!(strategy = ?gap.strategy, "line lost, crossing gap");
            let out = MotionCommand::new(gap.forward_vel, rate);
            let next = match gap.strategy {
                GapStrategy::Search => {
                    FollowState::CrossGapSearch(CrossGapSearch::new(Arc::clone(&self.cfg)))
                }
                GapStrategy::Straight => FollowState::CrossGapStraightLine(
                    CrossGapStraightLine::new(Arc::clone(&self.cfg)),
                ),
            };
            return Step::transition(out, next);
        }

        Step::stay(MotionCommand::new(vel, rate))
    }
}
