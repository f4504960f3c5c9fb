//! Analytic light sensor model.
//!
//! A sensor is a circle of radius `r` looking down at a tile. The line under
//! it is a band of thickness `T` around the closest point of the closest
//! polyline. The reading is the fraction of the circle that is *not* covered
//! by that band: 1 is white (no line), 0 is black (fully on the line).
//!
//! Partial coverage is computed from circular-segment areas. For a chord at
//! distance `h` from the centre the segment area is `0.5·r²·(a − sin a)` with
//! `a = 2·acos(h / r)`; [`segment_value`] returns the fraction of the circle
//! outside that segment.

use crate::config::SensorKindCfg;
use glam::DVec2;
use linesim_traits::Tile;
use std::f64::consts::PI;

pub const WHITE: f64 = 1.0;
pub const BLACK: f64 = 0.0;

/// Fraction of a circle of radius `r` lying outside the segment cut off by a
/// chord at distance `h` from the centre.
#[inline]
pub fn segment_value(h: f64, r: f64) -> f64 {
    let a = 2.0 * (h / r).clamp(-1.0, 1.0).acos();
    let circle_area = PI * r * r;
    let segment_area = 0.5 * r * r * (a - a.sin());
    (circle_area - segment_area) / circle_area
}

/// How a sensor circle overlaps the line band.
///
/// `d` is the distance from the sensor centre to the line centre, `r` the
/// sensor radius, `T` the line thickness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Overlap {
    /// `d >= r + T/2`.
    Clear,
    /// `d + r <= T/2`.
    Covered,
    /// Centre off the line, the line cuts one segment into the circle.
    /// `small` when the sensor is narrower than the line.
    OneSegmentIn { h: f64, small: bool },
    /// Centre on the line, one segment of the circle sticks out.
    /// `small` when the sensor diameter is below the line thickness.
    OneSegmentOut { h: f64, small: bool },
    /// The line crosses the circle with both edges inside it.
    TwoSegmentsOut { near: f64, far: f64, centred: bool },
}

impl Overlap {
    pub fn classify(d: f64, r: f64, thickness: f64) -> Self {
        let half = 0.5 * thickness;
        if d >= r + half {
            return Overlap::Clear;
        }
        if d + r <= half {
            return Overlap::Covered;
        }
        if d >= half {
            // centre beside the band; is the far edge still inside the circle?
            if d + half >= r {
                Overlap::OneSegmentIn {
                    h: d - half,
                    small: r < thickness,
                }
            } else {
                Overlap::TwoSegmentsOut {
                    near: d - half,
                    far: d + half,
                    centred: false,
                }
            }
        } else if d + half >= r {
            Overlap::OneSegmentOut {
                h: half - d,
                small: 2.0 * r < thickness,
            }
        } else {
            Overlap::TwoSegmentsOut {
                near: half - d,
                far: half + d,
                centred: true,
            }
        }
    }

    /// Brightness in `[0, 1]` for a sensor of radius `r`.
    pub fn brightness(&self, r: f64) -> f64 {
        let v = match *self {
            Overlap::Clear => WHITE,
            Overlap::Covered => BLACK,
            Overlap::OneSegmentIn { h, .. } => segment_value(h, r),
            Overlap::OneSegmentOut { h, .. } => WHITE - segment_value(h, r),
            Overlap::TwoSegmentsOut {
                near,
                far,
                centred: true,
            } => (WHITE - segment_value(near, r)) + (WHITE - segment_value(far, r)),
            Overlap::TwoSegmentsOut {
                near,
                far,
                centred: false,
            } => segment_value(near, r) + (WHITE - segment_value(far, r)),
        };
        v.clamp(BLACK, WHITE)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Overlap::Clear => "clear",
            Overlap::Covered => "covered",
            Overlap::OneSegmentIn { small: true, .. } => "small one segment in",
            Overlap::OneSegmentIn { small: false, .. } => "big one segment in",
            Overlap::OneSegmentOut { small: true, .. } => "small one segment out",
            Overlap::OneSegmentOut { small: false, .. } => "medium one segment out",
            Overlap::TwoSegmentsOut { centred: true, .. } => "two segments out, centred",
            Overlap::TwoSegmentsOut { centred: false, .. } => "two segments out, off centre",
        }
    }
}

/// Fixed-capacity circular buffer of raw readings, pre-filled with white.
#[derive(Debug, Clone)]
pub struct RingBuffer {
    slots: Vec<f64>,
    index: usize,
}

impl RingBuffer {
    /// A requested capacity of 0 is treated as 1.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![WHITE; capacity.max(1)],
            index: 0,
        }
    }

    /// Overwrite the oldest slot.
    pub fn push(&mut self, v: f64) {
        self.slots[self.index] = v;
        self.index = (self.index + 1) % self.slots.len();
    }

    pub fn mean(&self) -> f64 {
        self.slots.iter().sum::<f64>() / self.slots.len() as f64
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}

/// Schmitt-trigger thresholds, always with `down <= up`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hysteresis {
    up: f64,
    down: f64,
}

impl Hysteresis {
    pub const DEFAULT_UP: f64 = 0.65;
    pub const DEFAULT_DOWN: f64 = 0.35;

    /// Clamp both thresholds to `[0, 1]` and swap them if out of order.
    pub fn new(up: f64, down: f64) -> Self {
        let up = up.clamp(BLACK, WHITE);
        let down = down.clamp(BLACK, WHITE);
        if down > up {
            Self { up: down, down: up }
        } else {
            Self { up, down }
        }
    }

    pub fn up(&self) -> f64 {
        self.up
    }

    pub fn down(&self) -> f64 {
        self.down
    }

    /// Next digital value given the previous one and a fresh analog value.
    #[inline]
    pub fn update(&self, previous: f64, analog: f64) -> f64 {
        if previous == WHITE && analog < self.down {
            BLACK
        } else if previous == BLACK && analog > self.up {
            WHITE
        } else {
            previous
        }
    }
}

impl Default for Hysteresis {
    fn default() -> Self {
        Self::new(Self::DEFAULT_UP, Self::DEFAULT_DOWN)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensorKind {
    Analog,
    Digital(Hysteresis),
}

impl From<SensorKindCfg> for SensorKind {
    fn from(c: SensorKindCfg) -> Self {
        match c {
            SensorKindCfg::Analog => SensorKind::Analog,
            SensorKindCfg::Digital {
                threshold_up,
                threshold_down,
            } => SensorKind::Digital(Hysteresis::new(threshold_up, threshold_down)),
        }
    }
}

/// One circular light sensor.
#[derive(Debug, Clone)]
pub struct LightSensor {
    radius: f64,
    position: DVec2,
    buffer: RingBuffer,
    kind: SensorKind,
    digital: f64,
    last_value: f64,
    closest_line_point: Option<DVec2>,
}

impl LightSensor {
    /// `radius` must be positive; callers own that precondition.
    pub fn new(radius: f64, position: DVec2, buffer_len: usize, kind: SensorKind) -> Self {
        debug_assert!(radius > 0.0, "sensor radius must be > 0, got {radius}");
        Self {
            radius,
            position,
            buffer: RingBuffer::new(buffer_len),
            kind,
            digital: WHITE,
            last_value: WHITE,
            closest_line_point: None,
        }
    }

    pub fn analog(radius: f64, position: DVec2) -> Self {
        Self::new(radius, position, 1, SensorKind::Analog)
    }

    pub fn set_position(&mut self, position: DVec2) {
        self.position = position;
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn set_radius(&mut self, radius: f64) {
        debug_assert!(radius > 0.0, "sensor radius must be > 0, got {radius}");
        self.radius = radius;
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn kind(&self) -> SensorKind {
        self.kind
    }

    /// Value returned by the most recent [`read`](Self::read); white before any read.
    pub fn last_value(&self) -> f64 {
        self.last_value
    }

    /// World-frame closest line point from the most recent raw read, if any line was consulted.
    pub fn closest_line_point(&self) -> Option<DVec2> {
        self.closest_line_point
    }

    /// Unsmoothed brightness against `tile`; does not touch the buffer.
    pub fn read_raw(&mut self, tile: Option<&dyn Tile>, line_thickness: f64) -> f64 {
        self.closest_line_point = None;
        let Some(tile) = tile else {
            return WHITE;
        };
        if !tile.contains(self.position) {
            return WHITE;
        }

        let local = tile.to_local(self.position);
        let closest = tile
            .lines()
            .iter()
            .filter_map(|line| line.closest_point(local))
            .min_by(|a, b| a.1.total_cmp(&b.1));
        let Some((point, dist)) = closest else {
            return WHITE;
        };
        self.closest_line_point = Some(point + tile.position());

        let overlap = Overlap::classify(dist, self.radius, line_thickness);
        let value = overlap.brightness(self.radius);
        tracing::trace!(dist, case = overlap.name(), value, "light sensor overlap");
        value
    }

    /// Read, smooth through the ring buffer, and apply the digital trigger if any.
    pub fn read(&mut self, tile: Option<&dyn Tile>, line_thickness: f64) -> f64 {
        let raw = self.read_raw(tile, line_thickness);
        self.buffer.push(raw);
        let analog = self.buffer.mean();
        self.last_value = match self.kind {
            SensorKind::Analog => analog,
            SensorKind::Digital(h) => {
                self.digital = h.update(self.digital, analog);
                self.digital
            }
        };
        self.last_value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linesim_traits::Line;
    use rstest::rstest;

    struct OneLine {
        lines: Vec<Line>,
        pos: DVec2,
    }

    impl Tile for OneLine {
        fn lines(&self) -> &[Line] {
            &self.lines
        }
        fn position(&self) -> DVec2 {
            self.pos
        }
        fn size(&self) -> f64 {
            200.0
        }
    }

    fn vertical_tile(pos: DVec2) -> OneLine {
        OneLine {
            lines: vec![Line::new(vec![DVec2::new(100.0, 0.0), DVec2::new(100.0, 200.0)])],
            pos,
        }
    }

    #[test]
    fn segment_value_limits() {
        // chord through the centre removes half the circle
        assert!((segment_value(0.0, 5.0) - 0.5).abs() < 1e-12);
        // chord at the rim removes nothing
        assert!((segment_value(5.0, 5.0) - 1.0).abs() < 1e-12);
        // chord beyond the opposite rim removes everything
        assert!(segment_value(-5.0, 5.0).abs() < 1e-12);
    }

    #[rstest]
    #[case(30.0, 5.0, 20.0, "clear")]
    #[case(2.0, 5.0, 20.0, "covered")]
    #[case(12.0, 5.0, 20.0, "small one segment in")]
    #[case(18.0, 15.0, 10.0, "big one segment in")]
    #[case(8.0, 4.0, 20.0, "small one segment out")]
    #[case(8.0, 12.0, 20.0, "medium one segment out")]
    #[case(1.0, 15.0, 10.0, "two segments out, centred")]
    #[case(7.0, 15.0, 10.0, "two segments out, off centre")]
    fn classification_covers_every_case(
        #[case] d: f64,
        #[case] r: f64,
        #[case] t: f64,
        #[case] expect: &str,
    ) {
        let o = Overlap::classify(d, r, t);
        assert_eq!(o.name(), expect, "{o:?}");
        let b = o.brightness(r);
        assert!((0.0..=1.0).contains(&b));
    }

    #[test]
    fn sensor_straddling_edge_reads_half() {
        // centre exactly on the band edge: half the circle is on the line
        let o = Overlap::classify(10.0, 4.0, 20.0);
        assert!((o.brightness(4.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn wide_sensor_centred_on_line_sees_band_fraction() {
        let r = 15.0;
        let b = Overlap::classify(0.0, r, 10.0).brightness(r);
        // a 10-wide band through the centre of a 30-wide circle covers a bit
        // over a third of it
        assert!(b > 0.5 && b < 0.7, "{b}");
    }

    #[test]
    fn outside_tile_reads_white_without_touching_lines() {
        let tile = vertical_tile(DVec2::ZERO);
        let mut s = LightSensor::analog(11.0, DVec2::new(-1.0, 100.0));
        assert_eq!(s.read(Some(&tile), 20.0), WHITE);
        assert!(s.closest_line_point().is_none());
    }

    #[test]
    fn missing_tile_and_empty_lines_read_white() {
        let mut s = LightSensor::analog(11.0, DVec2::new(100.0, 100.0));
        assert_eq!(s.read(None, 20.0), WHITE);
        let empty = OneLine {
            lines: vec![Line::default()],
            pos: DVec2::ZERO,
        };
        assert_eq!(s.read(Some(&empty), 20.0), WHITE);
    }

    #[test]
    fn on_line_reads_black_and_uses_tile_offset() {
        let tile = vertical_tile(DVec2::new(400.0, 200.0));
        let mut s = LightSensor::analog(8.0, DVec2::new(500.0, 300.0));
        assert_eq!(s.read(Some(&tile), 20.0), BLACK);
        assert_eq!(s.closest_line_point(), Some(DVec2::new(500.0, 300.0)));
    }

    #[test]
    fn buffer_averages_recent_reads() {
        let tile = vertical_tile(DVec2::ZERO);
        let mut s = LightSensor::new(8.0, DVec2::new(100.0, 100.0), 4, SensorKind::Analog);
        // three white slots, one black
        assert!((s.read(Some(&tile), 20.0) - 0.75).abs() < 1e-12);
        assert!((s.read(Some(&tile), 20.0) - 0.5).abs() < 1e-12);
        s.set_position(DVec2::new(150.0, 100.0));
        // oldest slot (white) replaced by white
        assert!((s.read(Some(&tile), 20.0) - 0.5).abs() < 1e-12);
        assert!((s.last_value() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn zero_length_buffer_behaves_as_one() {
        let rb = RingBuffer::new(0);
        assert_eq!(rb.capacity(), 1);
        assert_eq!(rb.mean(), WHITE);
    }

    #[test]
    fn hysteresis_orders_and_clamps() {
        let h = Hysteresis::new(0.2, 1.7);
        assert_eq!(h.down(), 0.2);
        assert_eq!(h.up(), 1.0);
    }

    #[test]
    fn digital_sensor_needs_to_cross_both_thresholds() {
        let h = Hysteresis::new(0.65, 0.35);
        assert_eq!(h.update(WHITE, 0.5), WHITE);
        assert_eq!(h.update(WHITE, 0.3), BLACK);
        assert_eq!(h.update(BLACK, 0.5), BLACK);
        assert_eq!(h.update(BLACK, 0.7), WHITE);
    }

    #[test]
    fn digital_sensor_flips_through_buffer_mean() {
        let tile = vertical_tile(DVec2::ZERO);
        let kind = SensorKind::Digital(Hysteresis::default());
        let mut s = LightSensor::new(8.0, DVec2::new(100.0, 100.0), 2, kind);
        // mean 0.5: not below 0.35, stays white
        assert_eq!(s.read(Some(&tile), 20.0), WHITE);
        // mean 0.0
        assert_eq!(s.read(Some(&tile), 20.0), BLACK);
        s.set_position(DVec2::new(180.0, 100.0));
        // mean 0.5: not above 0.65, stays black
        assert_eq!(s.read(Some(&tile), 20.0), BLACK);
        assert_eq!(s.read(Some(&tile), 20.0), WHITE);
    }
}
