//! Junction resolution.
//!
//! The robot drives past the junction centre, swings to `forward -
//! scan_half_angle`, sweeps slowly through `2 * scan_half_angle` while sampling
//! the centre sensor, picks a branch from the samples and turns to it.

use super::pd::PdLineFollow;
use super::three_sensor::FollowState;
use crate::config::FollowCfg;
use crate::fsm::Step;
use crate::telemetry::{MotionCommand, Telemetry};
use linesim_traits::{angle_diff, wrap_bearing};
use std::sync::Arc;

/// One centre-sensor sample taken during the sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanSample {
    pub bearing: f64,
    pub on_line: bool,
}

/// A maximal run of equal `on_line` samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Run {
    pub on_line: bool,
    /// Bearing of the first sample in the run.
    pub start: f64,
    pub len: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanDecision {
    pub line_count: usize,
    pub bearing: f64,
}

/// Collapse consecutive equal samples into runs.
pub fn simplify(samples: &[ScanSample]) -> Vec<Run> {
    let mut runs: Vec<Run> = Vec::new();
    for s in samples {
        match runs.last_mut() {
            Some(r) if r.on_line == s.on_line => r.len += 1,
            _ => runs.push(Run {
                on_line: s.on_line,
                start: s.bearing,
                len: 1,
            }),
        }
    }
    runs
}

/// Pick the bearing to leave the junction on.
///
/// One line: that line. Two: the later one in scan order. Three: the middle
/// one. Anything else, including no line at all, keeps `forward`.
pub fn decide(samples: &[ScanSample], forward: f64) -> ScanDecision {
    let lines: Vec<f64> = simplify(samples)
        .into_iter()
        .filter(|r| r.on_line)
        .map(|r| r.start)
        .collect();
    let bearing = match lines.as_slice() {
        [only] => *only,
        [_, later] => *later,
        [_, middle, _] => *middle,
        _ => forward,
    };
    ScanDecision {
        line_count: lines.len(),
        bearing,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Advance { ticks: u32 },
    TurnToScanStart { target: f64 },
    Sweep { swept: f64, last: Option<f64> },
    TurnToFinal { target: f64 },
}

#[derive(Debug, Clone)]
pub struct LineIntersection {
    cfg: Arc<FollowCfg>,
    phase: Phase,
    forward: Option<f64>,
    samples: Vec<ScanSample>,
    decision: Option<ScanDecision>,
}

impl LineIntersection {
    pub fn new(cfg: Arc<FollowCfg>) -> Self {
        Self {
            cfg,
            phase: Phase::Advance { ticks: 0 },
            forward: None,
            samples: Vec::new(),
            decision: None,
        }
    }

    pub(crate) fn reset(&mut self) {
        self.phase = Phase::Advance { ticks: 0 };
        self.forward = None;
        self.samples.clear();
        self.decision = None;
    }

    pub fn phase_name(&self) -> &'static str {
        match self.phase {
            Phase::Advance { .. } => "advance",
            Phase::TurnToScanStart { .. } => "turn_to_scan_start",
            Phase::Sweep { .. } => "sweep",
            Phase::TurnToFinal { .. } => "turn_to_final",
        }
    }

    pub fn samples(&self) -> &[ScanSample] {
        &self.samples
    }

    pub fn decision(&self) -> Option<ScanDecision> {
        self.decision
    }

    /// Rotation towards `target`, or `None` once within tolerance.
    ///
    /// The last tick of a turn is shortened so the heading lands on `target`
    /// instead of stepping over the tolerance window.
    fn turn_towards(&self, target: f64, t: &Telemetry) -> Option<MotionCommand> {
        let diff = angle_diff(target, t.bearing);
        if diff.abs() < self.cfg.intersection.bearing_tolerance {
            return None;
        }
        let rate = t
            .turn_limit(self.cfg.intersection.turn_rate, diff)
            .copysign(diff);
        Some(MotionCommand::new(0.0, rate))
    }

    pub(crate) fn step(&mut self, t: &Telemetry) -> Step<FollowState, MotionCommand> {
        let cfg = Arc::clone(&self.cfg);
        let ic = &cfg.intersection;
        let forward = *self.forward.get_or_insert(t.bearing);

        // Phases that finish on this tick fall through to the next one.
        loop {
            match self.phase {
                Phase::Advance { ticks } => {
                    if ticks < ic.forward_ticks {
                        self.phase = Phase::Advance { ticks: ticks + 1 };
                        return Step::stay(MotionCommand::new(ic.forward_vel, 0.0));
                    }
                    let target = wrap_bearing(forward - ic.scan_half_angle);
                    tracing::debug!(target, "junction reached, turning to scan start");
                    self.phase = Phase::TurnToScanStart { target };
                }
                Phase::TurnToScanStart { target } => {
                    if let Some(cmd) = self.turn_towards(target, t) {
                        return Step::stay(cmd);
                    }
                    self.phase = Phase::Sweep {
                        swept: 0.0,
                        last: None,
                    };
                }
                Phase::Sweep { swept, last } => {
                    let swept = swept + last.map_or(0.0, |l| angle_diff(t.bearing, l).abs());
                    self.samples.push(ScanSample {
                        bearing: t.bearing,
                        on_line: t.sensor(1) < ic.on_line_threshold,
                    });
                    if swept < 2.0 * ic.scan_half_angle {
                        self.phase = Phase::Sweep {
                            swept,
                            last: Some(t.bearing),
                        };
                        return Step::stay(MotionCommand::new(0.0, ic.scan_rate));
                    }
                    let decision = decide(&self.samples, forward);
                    tracing::info!(
                        line_count = decision.line_count,
                        bearing = decision.bearing,
                        samples = self.samples.len(),
                        "intersection decision"
                    );
                    self.decision = Some(decision);
                    self.phase = Phase::TurnToFinal {
                        target: decision.bearing,
                    };
                }
                Phase::TurnToFinal { target } => {
                    if let Some(cmd) = self.turn_towards(target, t) {
                        return Step::stay(cmd);
                    }
                    let out = MotionCommand::new(cfg.pd.forward_vel, 0.0);
                    let next = PdLineFollow::new(Arc::clone(&cfg));
                    return Step::transition(out, FollowState::PdLineFollow(next));
                }
            }
        }
    }
}
