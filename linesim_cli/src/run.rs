//! Subcommand bodies.

use eyre::{Result, WrapErr};
use linesim_config::Config;
use linesim_core::LightSensor;
use linesim_traits::{DVec2, TileProvider};
use linesim_world::{Scenario, TickReport, layout};
use serde_json::json;

fn tick_json(tick: u64, rep: &TickReport) -> serde_json::Value {
    json!({
        "tick": tick,
        "x": rep.position.x,
        "y": rep.position.y,
        "bearing": rep.bearing,
        "readings": rep.readings,
        "forward_speed": rep.command.forward_speed,
        "rotation_rate": rep.command.rotation_rate,
        "state": rep.state,
    })
}

pub fn run_sim(
    cfg: &Config,
    ticks: Option<u64>,
    layout_name: Option<&str>,
    json: bool,
) -> Result<()> {
    let name = layout_name.unwrap_or(&cfg.simulation.layout);
    let ticks = ticks.unwrap_or(cfg.simulation.ticks);
    let mut scenario = Scenario::with_layout(cfg, name)?;

    let started = std::time::Instant::now();
    let summary = scenario.run(ticks, |i, rep| {
        if json {
            println!("{}", tick_json(i, rep));
        }
    });
    tracing::info!(
        ticks = summary.ticks,
        transitions = summary.transitions,
        elapsed_ms = started.elapsed().as_millis(),
        "run finished"
    );

    if json {
        let s = json!({
            "summary": {
                "layout": scenario.layout,
                "ticks": summary.ticks,
                "x": summary.end.x,
                "y": summary.end.y,
                "bearing": summary.bearing,
                "state": summary.state,
                "transitions": summary.transitions,
                "ticks_on_line": summary.ticks_on_line,
                "distance": summary.distance,
            }
        });
        println!("{s}");
    } else {
        println!("layout: {}", scenario.layout);
        println!("ticks: {}", summary.ticks);
        println!(
            "final pose: ({:.1}, {:.1}) bearing {:.1} deg",
            summary.end.x,
            summary.end.y,
            summary.bearing.to_degrees()
        );
        println!("controller state: {}", summary.state);
        println!("state transitions: {}", summary.transitions);
        println!("ticks on line: {}", summary.ticks_on_line);
        println!("distance: {:.1}", summary.distance);
    }
    Ok(())
}

pub fn probe(
    cfg: &Config,
    x: f64,
    y: f64,
    radius: Option<f64>,
    layout_name: Option<&str>,
    json: bool,
) -> Result<()> {
    let world = linesim_core::config::WorldCfg::from(&cfg.world);
    let name = layout_name.unwrap_or(&cfg.simulation.layout);
    let layout = layout::build(name, &world)?;
    let radius = radius
        .or_else(|| cfg.sensors.radii.first().copied())
        .ok_or_else(|| eyre::eyre!("no sensor radius configured"))?;
    if !(radius.is_finite() && radius > 0.0) {
        eyre::bail!("probe radius must be > 0");
    }

    let at = DVec2::new(x, y);
    let mut sensor = LightSensor::analog(radius, at);
    let room = &layout.room;
    let value = sensor.read(room.tile_at(at), room.line_thickness());
    let tile = room
        .index_of(at)
        .and_then(|(ix, iy)| room.kind_at(ix, iy))
        .map(|k| k.name());

    if json {
        let closest = sensor.closest_line_point().map(|p| [p.x, p.y]);
        println!(
            "{}",
            json!({ "x": x, "y": y, "radius": radius, "tile": tile, "brightness": value, "closest": closest })
        );
    } else {
        println!(
            "brightness at ({x:.1}, {y:.1}) r={radius}: {value:.4} [{}]",
            tile.unwrap_or("outside")
        );
    }
    Ok(())
}

pub fn self_check(cfg: &Config, json: bool) -> Result<()> {
    let mut built = Vec::new();
    for name in linesim_world::LAYOUT_NAMES {
        let s = Scenario::with_layout(cfg, name)
            .wrap_err_with(|| format!("building layout '{name}'"))?;
        tracing::debug!(layout = name, sensors = s.robot.sensors().len(), "self-check built");
        built.push(name);
    }
    if json {
        println!("{}", json!({ "status": "ok", "layouts": built }));
    } else {
        println!("OK: config valid, built layouts {}", built.join(", "));
    }
    Ok(())
}
