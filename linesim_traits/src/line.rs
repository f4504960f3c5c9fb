//! Polyline track segments.

use glam::DVec2;

/// An ordered polyline in tile-local coordinates.
///
/// Producers are expected to keep consecutive points close together (see
/// [`Line::densified`]); consumers treat the line as the union of the straight
/// segments between consecutive points.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Line {
    points: Vec<DVec2>,
}

impl Line {
    pub fn new(points: Vec<DVec2>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[DVec2] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Insert midpoints until no two consecutive points are more than
    /// `2 * max_gap` apart.
    pub fn densified(mut self, max_gap: f64) -> Self {
        if !(max_gap.is_finite() && max_gap > 0.0) {
            return self;
        }
        let thresh = 2.0 * max_gap;
        let mut again = true;
        while again {
            again = false;
            let mut out = Vec::with_capacity(self.points.len() * 2);
            for pair in self.points.windows(2) {
                out.push(pair[0]);
                if pair[0].distance(pair[1]) > thresh {
                    out.push((pair[0] + pair[1]) * 0.5);
                    again = true;
                }
            }
            if let Some(last) = self.points.last() {
                out.push(*last);
            }
            self.points = out;
        }
        self
    }

    /// Apply `f` to every point, returning the transformed line.
    pub fn map_points(mut self, f: impl Fn(DVec2) -> DVec2) -> Self {
        for p in &mut self.points {
            *p = f(*p);
        }
        self
    }

    /// Closest point on the polyline to `p` and its distance.
    ///
    /// Scans every consecutive pair with the projection clamped to the
    /// segment. `None` for an empty line.
    pub fn closest_point(&self, p: DVec2) -> Option<(DVec2, f64)> {
        match self.points.as_slice() {
            [] => None,
            [only] => Some((*only, only.distance(p))),
            pts => pts
                .windows(2)
                .map(|w| {
                    let c = closest_on_segment(w[0], w[1], p);
                    (c, c.distance(p))
                })
                .min_by(|a, b| a.1.total_cmp(&b.1)),
        }
    }
}

#[inline]
fn closest_on_segment(a: DVec2, b: DVec2, p: DVec2) -> DVec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_line_has_no_closest_point() {
        assert!(Line::default().closest_point(DVec2::ZERO).is_none());
    }

    #[test]
    fn closest_point_projects_between_vertices() {
        let line = Line::new(vec![DVec2::new(0.0, 0.0), DVec2::new(10.0, 0.0)]);
        let (c, d) = line.closest_point(DVec2::new(4.0, 3.0)).unwrap();
        assert!((c - DVec2::new(4.0, 0.0)).length() < 1e-12);
        assert!((d - 3.0).abs() < 1e-12);
    }

    #[test]
    fn closest_point_clamps_to_endpoints() {
        let line = Line::new(vec![DVec2::new(0.0, 0.0), DVec2::new(10.0, 0.0)]);
        let (c, d) = line.closest_point(DVec2::new(13.0, 4.0)).unwrap();
        assert_eq!(c, DVec2::new(10.0, 0.0));
        assert!((d - 5.0).abs() < 1e-12);
    }

    #[test]
    fn densify_bounds_gaps() {
        let line = Line::new(vec![DVec2::new(0.0, 0.0), DVec2::new(0.0, 100.0)]).densified(5.0);
        assert!(line.points().len() > 2);
        for w in line.points().windows(2) {
            assert!(w[0].distance(w[1]) <= 10.0 + 1e-9);
        }
        assert_eq!(line.points().first(), Some(&DVec2::new(0.0, 0.0)));
        assert_eq!(line.points().last(), Some(&DVec2::new(0.0, 100.0)));
    }

    #[test]
    fn single_point_line() {
        let line = Line::new(vec![DVec2::new(1.0, 1.0)]);
        let (c, d) = line.closest_point(DVec2::new(4.0, 5.0)).unwrap();
        assert_eq!(c, DVec2::new(1.0, 1.0));
        assert!((d - 5.0).abs() < 1e-12);
    }
}
