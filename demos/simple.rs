use lighthouse_nav::{
    Coordinate, Permission, RawFix, RawHeadingSample, SensorHub, Subscription, TrackingSession,
};

const FIX_PERIOD_MS: u64 = 1000; // one fix per second

// Stand-in for the platform's sensor registration
struct Handle(&'static str);

impl Subscription for Handle {
    fn remove(&mut self) {
        println!("unsubscribed from {}", self.0);
    }
}

struct Sensors;

impl SensorHub for Sensors {
    fn watch_position(&mut self) -> Box<dyn Subscription> {
        Box::new(Handle("position"))
    }

    fn watch_heading(&mut self) -> Box<dyn Subscription> {
        Box::new(Handle("heading"))
    }
}

fn main() {
    let mut session = TrackingSession::new();
    session
        .start(Permission::Granted, &mut Sensors)
        .expect("permission was granted");

    // Beacon ~110 m north-east of the start
    session.set_target(Some(Coordinate::new(50.0007, -3.9990)));

    for i in 0..10 {
        // this loop should run whenever the platform delivers sensor events
        let step = i as f64 * 1e-5;
        let fix = RawFix::new(
            Coordinate::new(50.0 + step, -4.0 + step),
            Some(5.0),
            i * FIX_PERIOD_MS,
        ); // replace this with the platform's position fix
        let sample = RawHeadingSample::true_north(40.0 + i as f64, 8.0); // replace with compass data

        session.on_fix(fix);
        let snapshot = session.on_heading(sample).unwrap_or_default();

        println!(
            "Heading: {:.1}, Bearing: {:.1}, Distance: {:.1} m, Alignment: {}",
            snapshot.heading.map_or(f64::NAN, |h| h.degrees),
            snapshot.bearing.unwrap_or(f64::NAN),
            snapshot.distance_meters.unwrap_or(f64::NAN),
            snapshot
                .alignment
                .map_or("--".to_string(), |a| a.band.to_string())
        );
    }

    session.teardown();
}
