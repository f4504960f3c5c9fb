use super::LineFollow;
use super::gap::{CrossGapSearch, CrossGapStraightLine};
use super::intersection::LineIntersection;
use super::pd::PdLineFollow;
use crate::config::{FollowCfg, GapCfg, GapStrategy, IntersectionCfg, PdCfg};
use crate::error::{BuildError, Report, Result};
use crate::fsm::{ControlState, Manager, Step};
use crate::telemetry::{MotionCommand, Telemetry};
use std::f64::consts::PI;
use std::sync::Arc;

/// States of the three-sensor follower. Initial state is `PdLineFollow`.
#[derive(Debug, Clone)]
pub enum FollowState {
    PdLineFollow(PdLineFollow),
    LineIntersection(LineIntersection),
    CrossGapSearch(CrossGapSearch),
    CrossGapStraightLine(CrossGapStraightLine),
}

impl ControlState for FollowState {
    type Input = Telemetry;
    type Output = MotionCommand;

    fn name(&self) -> &'static str {
        match self {
            FollowState::PdLineFollow(_) => "pd_line_follow",
            FollowState::LineIntersection(_) => "line_intersection",
            FollowState::CrossGapSearch(_) => "cross_gap_search",
            FollowState::CrossGapStraightLine(_) => "cross_gap_straight_line",
        }
    }

    fn enter(&mut self) {
        match self {
            FollowState::PdLineFollow(s) => s.reset(),
            FollowState::LineIntersection(s) => s.reset(),
            FollowState::CrossGapSearch(s) => s.reset(),
            FollowState::CrossGapStraightLine(_) => {}
        }
    }

    fn handle(&mut self, input: &Telemetry) -> Step<Self, MotionCommand> {
        match self {
            FollowState::PdLineFollow(s) => s.step(input),
            FollowState::LineIntersection(s) => s.step(input),
            FollowState::CrossGapSearch(s) => s.step(input),
            FollowState::CrossGapStraightLine(s) => s.step(input),
        }
    }

    fn exit(&mut self) {}
}

/// PD line follower with junction and gap handling.
pub struct ThreeSensorFollow {
    manager: Manager<FollowState>,
}

impl core::fmt::Debug for ThreeSensorFollow {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ThreeSensorFollow")
            .field("state", &self.state_name())
            .finish()
    }
}

impl Default for ThreeSensorFollow {
    fn default() -> Self {
        Self::new(FollowCfg::default())
    }
}

impl ThreeSensorFollow {
    /// Start in `PdLineFollow` without validating `cfg`.
    pub fn new(cfg: FollowCfg) -> Self {
        let start = FollowState::PdLineFollow(PdLineFollow::new(Arc::new(cfg)));
        Self {
            manager: Manager::new(start),
        }
    }

    pub fn builder() -> ThreeSensorFollowBuilder {
        ThreeSensorFollowBuilder::default()
    }

    pub fn state_name(&self) -> &'static str {
        self.manager.state().name()
    }

    pub fn state(&self) -> &FollowState {
        self.manager.state()
    }

    /// Called with `(old, new, triggering telemetry)` on every transition.
    pub fn on_transition<F>(&mut self, callback: F)
    where
        F: FnMut(&FollowState, &FollowState, Option<&Telemetry>) + 'static,
    {
        self.manager.add_state_change_callback(callback);
    }

    /// Force a state, running the usual exit/callback/enter sequence.
    pub fn set_state(&mut self, state: FollowState) {
        self.manager.set_state(state);
    }
}

impl LineFollow for ThreeSensorFollow {
    fn name(&self) -> &'static str {
        self.state_name()
    }

    fn follow(&mut self, telemetry: &Telemetry) -> MotionCommand {
        self.manager.handle(telemetry.clone())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ThreeSensorFollowBuilder {
    cfg: FollowCfg,
}

impl ThreeSensorFollowBuilder {
    pub fn pd(mut self, pd: PdCfg) -> Self {
        self.cfg.pd = pd;
        self
    }

    pub fn intersection(mut self, intersection: IntersectionCfg) -> Self {
        self.cfg.intersection = intersection;
        self
    }

    pub fn gap(mut self, gap: GapCfg) -> Self {
        self.cfg.gap = gap;
        self
    }

    pub fn gap_strategy(mut self, strategy: GapStrategy) -> Self {
        self.cfg.gap.strategy = strategy;
        self
    }

    pub fn gains(mut self, kp: f64, kd: f64) -> Self {
        self.cfg.pd.kp = kp;
        self.cfg.pd.kd = kd;
        self
    }

    pub fn try_build(self) -> Result<ThreeSensorFollow> {
        let FollowCfg {
            pd,
            intersection,
            gap,
        } = &self.cfg;

        if !(pd.kp.is_finite() && pd.kd.is_finite()) {
            return Err(Report::new(BuildError::InvalidConfig(
                "pd gains must be finite",
            )));
        }
        if pd.forward_vel.is_sign_negative() || intersection.forward_vel.is_sign_negative() {
            return Err(Report::new(BuildError::InvalidConfig(
                "forward velocities must be >= 0",
            )));
        }
        if gap.forward_vel.is_sign_negative() {
            return Err(Report::new(BuildError::InvalidConfig(
                "gap forward_vel must be >= 0",
            )));
        }
        let unit = 0.0..=1.0;
        let thresholds = [
            pd.sharp_turn_error,
            pd.intersection_outer,
            pd.intersection_center,
            pd.gap_center_white,
            intersection.on_line_threshold,
            gap.detection_threshold,
        ];
        if thresholds.iter().any(|t| !unit.contains(t)) {
            return Err(Report::new(BuildError::InvalidConfig(
                "sensor thresholds must be within [0, 1]",
            )));
        }
        if !(intersection.scan_half_angle > 0.0 && intersection.scan_half_angle <= PI) {
            return Err(Report::new(BuildError::InvalidConfig(
                "scan_half_angle must be in (0, pi]",
            )));
        }
        if intersection.turn_rate <= 0.0 || intersection.scan_rate <= 0.0 {
            return Err(Report::new(BuildError::InvalidConfig(
                "intersection turn rates must be > 0",
            )));
        }
        if intersection.bearing_tolerance <= 0.0 {
            return Err(Report::new(BuildError::InvalidConfig(
                "bearing_tolerance must be > 0",
            )));
        }
        if gap.search_rate <= 0.0 {
            return Err(Report::new(BuildError::InvalidConfig(
                "gap search_rate must be > 0",
            )));
        }
        if gap.widen_factor <= 1.0 {
            return Err(Report::new(BuildError::InvalidConfig(
                "gap widen_factor must be > 1",
            )));
        }
        if !(gap.initial_half_angle > 0.0 && gap.initial_half_angle <= PI) {
            return Err(Report::new(BuildError::InvalidConfig(
                "gap initial_half_angle must be in (0, pi]",
            )));
        }
        if gap.side_tolerance <= 0.0 || gap.forward_tolerance <= 0.0 {
            return Err(Report::new(BuildError::InvalidConfig(
                "gap tolerances must be > 0",
            )));
        }

        tracing::debug!(kp = pd.kp, kd = pd.kd, strategy = ?gap.strategy, "three-sensor follower built");
        Ok(ThreeSensorFollow::new(self.cfg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn tel(values: [f64; 3]) -> Telemetry {
        Telemetry {
            sensor_values: values.to_vec(),
            ..Telemetry::default()
        }
    }

    #[test]
    fn starts_in_pd() {
        let f = ThreeSensorFollow::default();
        assert_eq!(f.state_name(), "pd_line_follow");
        assert_eq!(f.name(), "pd_line_follow");
    }

    #[test]
    fn transitions_reach_callbacks() {
        let mut f = ThreeSensorFollow::default();
        let seen: Rc<RefCell<Vec<(&'static str, &'static str)>>> = Rc::default();
        let s = Rc::clone(&seen);
        f.on_transition(move |old, new, input| {
            assert!(input.is_some());
            s.borrow_mut().push((old.name(), new.name()));
        });
        let _ = f.follow(&tel([1.0, 1.0, 1.0]));
        let _ = f.follow(&tel([1.0, 0.5, 1.0]));
        assert_eq!(
            *seen.borrow(),
            vec![
                ("pd_line_follow", "cross_gap_search"),
                ("cross_gap_search", "pd_line_follow")
            ]
        );
    }

    #[test]
    fn builder_rejects_bad_values() {
        let err = ThreeSensorFollow::builder()
            .gains(f64::NAN, 0.0)
            .try_build()
            .expect_err("nan gain");
        assert_eq!(
            err.downcast_ref::<BuildError>(),
            Some(&BuildError::InvalidConfig("pd gains must be finite"))
        );

        let gap = GapCfg {
            widen_factor: 1.0,
            ..GapCfg::default()
        };
        let err = ThreeSensorFollow::builder()
            .gap(gap)
            .try_build()
            .expect_err("no widening");
        assert!(matches!(
            err.downcast_ref::<BuildError>(),
            Some(BuildError::InvalidConfig(_))
        ));
    }

    #[test]
    fn builder_accepts_defaults_and_strategy() {
        let mut f = ThreeSensorFollow::builder()
            .gap_strategy(GapStrategy::Straight)
            .try_build()
            .expect("defaults are valid");
        let _ = f.follow(&tel([1.0, 1.0, 1.0]));
        assert_eq!(f.state_name(), "cross_gap_straight_line");
    }
}
