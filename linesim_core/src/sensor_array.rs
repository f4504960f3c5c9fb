//! A rigid group of light sensors sharing one pose.

use crate::config::SensorCfg;
use crate::error::{BuildError, Report, Result};
use crate::sensor::{LightSensor, SensorKind};
use glam::DVec2;
use linesim_traits::{TileProvider, rotate};

/// Sensors placed at fixed body-frame offsets around the array centre.
///
/// World position of sensor `i` is `rotate(offset[i], bearing) + position`.
/// Every pose change updates all sensors immediately.
#[derive(Debug, Clone)]
pub struct SensorArray {
    sensors: Vec<LightSensor>,
    offsets: Vec<DVec2>,
    position: DVec2,
    bearing: f64,
}

impl SensorArray {
    /// Build `count` sensors with buffer length 1.
    ///
    /// Fails if `count` is zero or any list does not hold exactly `count`
    /// entries.
    pub fn try_new(
        count: usize,
        position: DVec2,
        offsets: Vec<DVec2>,
        radii: &[f64],
        kinds: &[SensorKind],
    ) -> Result<Self> {
        Self::assemble(count, position, offsets, radii, kinds, 1)
    }

    /// Like [`try_new`](Self::try_new) but panics on a count mismatch.
    ///
    /// # Panics
    /// If `count` is zero or `offsets`, `radii` or `kinds` do not hold
    /// `count` entries.
    pub fn new(
        count: usize,
        position: DVec2,
        offsets: Vec<DVec2>,
        radii: &[f64],
        kinds: &[SensorKind],
    ) -> Self {
        match Self::try_new(count, position, offsets, radii, kinds) {
            Ok(a) => a,
            Err(e) => panic!("invalid sensor array: {e}"),
        }
    }

    fn assemble(
        count: usize,
        position: DVec2,
        offsets: Vec<DVec2>,
        radii: &[f64],
        kinds: &[SensorKind],
        buffer_len: usize,
    ) -> Result<Self> {
        if count == 0 {
            return Err(Report::new(BuildError::NoSensors));
        }
        let lengths = [
            ("offsets", offsets.len()),
            ("radii", radii.len()),
            ("kinds", kinds.len()),
        ];
        if let Some(&(what, got)) = lengths.iter().find(|(_, n)| *n != count) {
            return Err(Report::new(BuildError::SensorCount {
                what,
                expected: count,
                got,
            }));
        }
        if radii.iter().any(|r| !(r.is_finite() && *r > 0.0)) {
            return Err(Report::new(BuildError::InvalidConfig(
                "sensor radii must be finite and > 0",
            )));
        }

        let sensors = offsets
            .iter()
            .zip(radii)
            .zip(kinds)
            .map(|((off, &r), &kind)| LightSensor::new(r, *off + position, buffer_len, kind))
            .collect();
        tracing::debug!(count = offsets.len(), buffer_len, "sensor array built");
        Ok(Self {
            sensors,
            offsets,
            position,
            bearing: 0.0,
        })
    }

    pub fn builder() -> SensorArrayBuilder {
        SensorArrayBuilder::default()
    }

    pub fn len(&self) -> usize {
        self.sensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn bearing(&self) -> f64 {
        self.bearing
    }

    pub fn set_pos(&mut self, position: DVec2) {
        self.position = position;
        self.place_sensors();
    }

    pub fn set_bearing(&mut self, bearing: f64) {
        self.bearing = bearing;
        self.place_sensors();
    }

    /// Move and turn in one step.
    pub fn set_pose(&mut self, position: DVec2, bearing: f64) {
        self.position = position;
        self.bearing = bearing;
        self.place_sensors();
    }

    /// Replace the body-frame offsets.
    ///
    /// # Panics
    /// If the count differs from the sensor count.
    pub fn set_relative_positions(&mut self, offsets: Vec<DVec2>) {
        if let Err(e) = self.try_set_relative_positions(offsets) {
            panic!("invalid sensor offsets: {e}");
        }
    }

    pub fn try_set_relative_positions(&mut self, offsets: Vec<DVec2>) -> Result<()> {
        if offsets.len() != self.sensors.len() {
            return Err(Report::new(BuildError::SensorCount {
                what: "offsets",
                expected: self.sensors.len(),
                got: offsets.len(),
            }));
        }
        self.offsets = offsets;
        self.place_sensors();
        Ok(())
    }

    pub fn offsets(&self) -> &[DVec2] {
        &self.offsets
    }

    pub fn sensors(&self) -> &[LightSensor] {
        &self.sensors
    }

    /// Current world positions of every sensor, in construction order.
    pub fn positions(&self) -> Vec<DVec2> {
        self.sensors.iter().map(LightSensor::position).collect()
    }

    /// Read every sensor against the tile under it, in construction order.
    pub fn read<P: TileProvider + ?Sized>(&mut self, world: &P) -> Vec<f64> {
        let thickness = world.line_thickness();
        let values: Vec<f64> = self
            .sensors
            .iter_mut()
            .map(|s| {
                let tile = world.tile_at(s.position());
                s.read(tile, thickness)
            })
            .collect();
        tracing::trace!(?values, "sensor array read");
        values
    }

    /// Values from the most recent [`read`](Self::read).
    pub fn last_values(&self) -> Vec<f64> {
        self.sensors.iter().map(LightSensor::last_value).collect()
    }

    fn place_sensors(&mut self) {
        for (s, off) in self.sensors.iter_mut().zip(&self.offsets) {
            s.set_position(rotate(*off, self.bearing) + self.position);
        }
    }
}

/// Builder for arrays with per-sensor kinds and smoothing.
#[derive(Debug, Clone, Default)]
pub struct SensorArrayBuilder {
    position: DVec2,
    offsets: Vec<DVec2>,
    radii: Vec<f64>,
    kinds: Option<Vec<SensorKind>>,
    buffer_len: Option<usize>,
}

impl SensorArrayBuilder {
    pub fn position(mut self, position: DVec2) -> Self {
        self.position = position;
        self
    }

    /// Append one sensor.
    pub fn sensor(mut self, offset: DVec2, radius: f64) -> Self {
        self.offsets.push(offset);
        self.radii.push(radius);
        self
    }

    /// Per-sensor kinds; defaults to all analog.
    pub fn kinds(mut self, kinds: Vec<SensorKind>) -> Self {
        self.kinds = Some(kinds);
        self
    }

    pub fn buffer_len(mut self, n: usize) -> Self {
        self.buffer_len = Some(n);
        self
    }

    /// Take offsets, radii, kinds and buffer length from a config block.
    pub fn from_cfg(cfg: &SensorCfg) -> Self {
        Self {
            position: DVec2::ZERO,
            offsets: cfg.offsets.clone(),
            radii: cfg.radii.clone(),
            kinds: Some(cfg.kinds.iter().copied().map(SensorKind::from).collect()),
            buffer_len: Some(cfg.buffer_len),
        }
    }

    pub fn try_build(self) -> Result<SensorArray> {
        let buffer_len = self.buffer_len.unwrap_or(1);
        if buffer_len == 0 {
            return Err(Report::new(BuildError::InvalidConfig(
                "buffer_len must be >= 1",
            )));
        }
        let kinds = self
            .kinds
            .unwrap_or_else(|| vec![SensorKind::Analog; self.offsets.len()]);
        let count = self.offsets.len();
        SensorArray::assemble(
            count,
            self.position,
            self.offsets,
            &self.radii,
            &kinds,
            buffer_len,
        )
    }
}
