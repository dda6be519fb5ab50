//! Advanced tracking demonstration
//!
//! Replays a recorded walk toward a beacon through a tracking session and
//! plots what the renderer would see.
//!
//! Features demonstrated:
//! - Custom session settings (window sizes and alignment thresholds)
//! - Listener-driven consumption of snapshots
//! - Magnetic heading fallback when true heading is unavailable
//! - Arrival deadzone driven by live GPS accuracy
//! - Structured logging via `tracing` (set `RUST_LOG=lighthouse_nav=debug`)
//!
//! Run with: `cargo run --example advanced`

use std::cell::RefCell;
use std::error::Error;
use std::rc::Rc;

use lighthouse_nav::{
    AlignmentBand, AlignmentThresholds, Coordinate, Permission, RawFix, RawHeadingSample,
    SensorHub, SpatialSnapshot, Subscription, TrackingSession, TrackingSettings,
};
use plotters::prelude::*;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

const TRACE_PATH: &str = "tests/data/walk_trace.csv";
const BEACON: Coordinate = Coordinate::new(50.0009, -4.0);

#[derive(Debug, Deserialize)]
struct TraceRow {
    kind: String,
    time_ms: u64,
    latitude: Option<f64>,
    longitude: Option<f64>,
    accuracy_meters: Option<f64>,
    true_heading: Option<f64>,
    magnetic_heading: Option<f64>,
    accuracy_degrees: Option<f64>,
}

struct Handle;

impl Subscription for Handle {
    fn remove(&mut self) {}
}

struct ReplaySensors;

impl SensorHub for ReplaySensors {
    fn watch_position(&mut self) -> Box<dyn Subscription> {
        Box::new(Handle)
    }

    fn watch_heading(&mut self) -> Box<dyn Subscription> {
        Box::new(Handle)
    }
}

/// One plotted point per emitted snapshot
struct Sample {
    time: f64,
    raw_heading: Option<f64>,
    snapshot: SpatialSnapshot,
}

/// Map a compass heading onto (-180, 180] so headings around north plot without a jump
fn signed(degrees: f64) -> f64 {
    if degrees > 180.0 { degrees - 360.0 } else { degrees }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("Advanced tracking example - replaying a walk toward a beacon");

    let mut reader = csv::Reader::from_path(TRACE_PATH)?;
    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: TraceRow = result?;
        rows.push(row);
    }

    let settings = TrackingSettings {
        gps_sample_size: 5,
        heading_sample_size: 8,
        thresholds: AlignmentThresholds {
            aligned_degrees: 15.0,
            approaching_degrees: 45.0,
            haptic_degrees: 5.0, // only pulse when nearly dead ahead
            ..Default::default()
        },
    };
    let mut session = TrackingSession::with_settings(settings)?;

    let emitted = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&emitted);
    session.add_listener(Box::new(move |snapshot: &SpatialSnapshot| {
        sink.borrow_mut().push(*snapshot);
    }));

    session.start(Permission::Granted, &mut ReplaySensors)?;
    session.set_target(Some(BEACON));
    emitted.borrow_mut().clear();

    println!("Processing {} sensor events...", rows.len());

    let mut samples = Vec::with_capacity(rows.len());
    for row in &rows {
        let time = row.time_ms as f64 / 1000.0;
        let (raw_heading, snapshot) = match row.kind.as_str() {
            "fix" => {
                let (Some(latitude), Some(longitude)) = (row.latitude, row.longitude) else {
                    continue;
                };
                let fix = RawFix::new(
                    Coordinate::new(latitude, longitude),
                    row.accuracy_meters,
                    row.time_ms,
                );
                (None, session.on_fix(fix))
            }
            "heading" => {
                let (Some(true_heading), Some(magnetic), Some(accuracy)) =
                    (row.true_heading, row.magnetic_heading, row.accuracy_degrees)
                else {
                    continue;
                };
                let sample = RawHeadingSample::new(true_heading, magnetic, accuracy);
                (Some(sample.resolved_degrees()), session.on_heading(sample))
            }
            _ => continue,
        };

        if let Some(snapshot) = snapshot {
            samples.push(Sample {
                time,
                raw_heading,
                snapshot,
            });
        }
    }

    let arrived_at = samples
        .iter()
        .find(|sample| sample.snapshot.is_arrived())
        .map(|sample| sample.time);
    let haptic_pulses = samples
        .iter()
        .filter(|sample| sample.snapshot.alignment.is_some_and(|a| a.haptic_cue))
        .count();

    println!("Listener received {} snapshots", emitted.borrow().len());
    println!("Haptic pulses fired: {}", haptic_pulses);
    match arrived_at {
        Some(time) => println!("Arrived at beacon after {:.0} s", time),
        None => println!("Did not reach the beacon"),
    }

    session.teardown();

    println!("Generating tracking plots...");
    create_tracking_plots(&samples)?;

    println!("✓ Plots saved to tracking_plots.png");
    Ok(())
}

/// Create a three-panel plot:
/// 1. Raw vs smoothed heading, with bearing to the beacon
/// 2. Reported distance (drops to 0 inside the deadzone)
/// 3. Alignment band
fn create_tracking_plots(samples: &[Sample]) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new("tracking_plots.png", (1000, 900)).into_drawing_area();
    root.fill(&WHITE)?;

    let panels = root.split_evenly((3, 1));
    let end = samples.last().map_or(1.0, |sample| sample.time);
    let time_range = 0f64..end;

    // 1. Heading
    let mut heading_chart = ChartBuilder::on(&panels[0])
        .caption("Heading, Distance and Alignment", ("sans-serif", 20))
        .margin(5)
        .x_label_area_size(0)
        .y_label_area_size(50)
        .build_cartesian_2d(time_range.clone(), -30f64..30f64)?;

    heading_chart.configure_mesh().y_desc("Degrees").draw()?;

    heading_chart
        .draw_series(
            samples
                .iter()
                .filter_map(|s| s.raw_heading.map(|h| (s.time, signed(h))))
                .map(|point| Circle::new(point, 2, RED.mix(0.4).filled())),
        )?
        .label("Raw heading")
        .legend(|(x, y)| Circle::new((x + 5, y), 2, RED.filled()));

    heading_chart
        .draw_series(LineSeries::new(
            samples
                .iter()
                .filter_map(|s| s.snapshot.heading.map(|h| (s.time, signed(h.degrees)))),
            &BLUE,
        ))?
        .label("Smoothed heading")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], BLUE));

    heading_chart
        .draw_series(LineSeries::new(
            samples
                .iter()
                .filter(|s| !s.snapshot.is_arrived())
                .filter_map(|s| s.snapshot.bearing.map(|b| (s.time, signed(b)))),
            &GREEN,
        ))?
        .label("Bearing to beacon")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], GREEN));

    heading_chart.configure_series_labels().draw()?;

    // 2. Distance
    let mut distance_chart = ChartBuilder::on(&panels[1])
        .margin(5)
        .x_label_area_size(0)
        .y_label_area_size(50)
        .build_cartesian_2d(time_range.clone(), 0f64..110f64)?;

    distance_chart.configure_mesh().y_desc("Meters").draw()?;

    distance_chart
        .draw_series(LineSeries::new(
            samples
                .iter()
                .filter_map(|s| s.snapshot.distance_meters.map(|d| (s.time, d))),
            &MAGENTA,
        ))?
        .label("Distance")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], MAGENTA));

    distance_chart
        .draw_series(LineSeries::new(
            samples.iter().filter_map(|s| {
                s.snapshot
                    .location
                    .and_then(|l| l.accuracy_meters)
                    .map(|a| (s.time, a))
            }),
            &BLACK.mix(0.5),
        ))?
        .label("GPS accuracy")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], BLACK));

    distance_chart.configure_series_labels().draw()?;

    // 3. Alignment band
    let mut band_chart = ChartBuilder::on(&panels[2])
        .margin(5)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(time_range, -0.2f64..2.2f64)?;

    band_chart
        .configure_mesh()
        .x_desc("Time (s)")
        .y_label_formatter(&|y| match y.round() as i32 {
            0 => "Off course".to_string(),
            1 => "Approaching".to_string(),
            2 => "Aligned".to_string(),
            _ => String::new(),
        })
        .draw()?;

    band_chart
        .draw_series(LineSeries::new(
            samples.iter().filter_map(|s| {
                s.snapshot.alignment.map(|a| {
                    let level = match a.band {
                        AlignmentBand::OffCourse => 0.0,
                        AlignmentBand::Approaching => 1.0,
                        AlignmentBand::Aligned => 2.0,
                    };
                    (s.time, level)
                })
            }),
            &CYAN,
        ))?
        .label("Alignment")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], CYAN));

    band_chart.configure_series_labels().draw()?;

    root.present()?;
    Ok(())
}
