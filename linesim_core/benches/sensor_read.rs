use criterion::{Criterion, black_box, criterion_group, criterion_main};
use linesim_core::{SensorArray, SensorKind};
use linesim_traits::{DVec2, Line, Tile, TileProvider};

// A single tile holding a densified quarter circle, the worst case for the
// closest-point scan.
struct QuarterCircle {
    lines: Vec<Line>,
}

impl QuarterCircle {
    fn new() -> Self {
        let pts = (0..=16)
            .map(|i| {
                let a = f64::from(i) / 16.0 * std::f64::consts::FRAC_PI_2;
                DVec2::new(100.0 * a.cos(), 100.0 * a.sin())
            })
            .collect();
        Self {
            lines: vec![Line::new(pts).densified(5.0)],
        }
    }
}

impl Tile for QuarterCircle {
    fn lines(&self) -> &[Line] {
        &self.lines
    }
    fn position(&self) -> DVec2 {
        DVec2::ZERO
    }
    fn size(&self) -> f64 {
        200.0
    }
}

impl TileProvider for QuarterCircle {
    fn tile_at(&self, world_pos: DVec2) -> Option<&dyn Tile> {
        self.contains(world_pos).then_some(self as &dyn Tile)
    }
    fn line_thickness(&self) -> f64 {
        20.0
    }
}

fn bench_array_read(c: &mut Criterion) {
    let world = QuarterCircle::new();
    let mut array = SensorArray::new(
        3,
        DVec2::new(70.0, 70.0),
        vec![DVec2::new(-50.0, 0.0), DVec2::ZERO, DVec2::new(50.0, 0.0)],
        &[11.0, 11.0, 11.0],
        &[SensorKind::Analog; 3],
    );
    let mut bearing = 0.0;
    c.bench_function("sensor_array_read_quarter_circle", |b| {
        b.iter(|| {
            bearing += 0.01;
            array.set_bearing(bearing);
            black_box(array.read(black_box(&world)))
        });
    });
}

criterion_group!(benches, bench_array_read);
criterion_main!(benches);
