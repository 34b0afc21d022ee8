use beacon_trilateration::core::{FAR_FIELD_COEFFICIENT, FAR_FIELD_EXPONENT, FAR_FIELD_OFFSET, NEAR_FIELD_EXPONENT};
use beacon_trilateration::{
    init_logging, CallbackPositioningApi, ConfigurationManager, CsvFormatter, MockSampleSource,
    NonBlockingPositioningApi, Point, PositionUpdate, PositioningConfig, PositioningEngine, SignalSample,
    TextFormatter,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Waypoints of the scripted walk through the default beacon triangle
const DEMO_WALK: [Point; 5] = [
    Point::new(2.5, 1.5),
    Point::new(3.0, 2.0),
    Point::new(2.5, 3.0),
    Point::new(1.5, 2.0),
    Point::new(2.0, 1.0),
];

/// Signal strength the distance model maps back to `distance`
fn synthetic_signal_strength(reference_signal_strength: f64, distance: f64) -> f64 {
    let ratio = if distance < 1.0 {
        distance.powf(1.0 / NEAR_FIELD_EXPONENT)
    } else {
        ((distance - FAR_FIELD_OFFSET) / FAR_FIELD_COEFFICIENT).powf(1.0 / FAR_FIELD_EXPONENT)
    };
    (reference_signal_strength * ratio).round()
}

/// One scan round per waypoint, every beacon heard once per round
fn scripted_scan(config: &PositioningConfig) -> MockSampleSource {
    let mut source = MockSampleSource::new();
    for waypoint in DEMO_WALK {
        for beacon in &config.beacons {
            let range = ((beacon.position.x - waypoint.x).powi(2) + (beacon.position.y - waypoint.y).powi(2)).sqrt();
            source.push(
                beacon.identifier.clone(),
                synthetic_signal_strength(beacon.reference_signal_strength, range),
            );
        }
    }
    source
}

fn load_samples(path: &str) -> Result<MockSampleSource, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    let samples: Vec<SignalSample> = serde_json::from_str(&content)?;
    let mut source = MockSampleSource::new();
    for sample in samples {
        source.push(sample.beacon_identifier, sample.signal_strength);
    }
    Ok(source)
}

fn run_callback(config: &PositioningConfig, mut source: MockSampleSource, csv: bool) -> Result<(), Box<dyn std::error::Error>> {
    let engine = PositioningEngine::from_config(config)?;
    let mut api = CallbackPositioningApi::new(engine);

    let updates: Arc<Mutex<Vec<PositionUpdate>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&updates);
    let text = TextFormatter::new();
    api.register_position_callback(Box::new(move |update: &PositionUpdate| {
        if !csv {
            println!("{}", text.format_location(update));
        }
        if let Ok(mut updates) = sink.lock() {
            updates.push(*update);
        }
    }));

    let processed = api.process(&mut source);

    if csv {
        let updates = updates.lock().map_err(|_| "update sink poisoned")?;
        print!("{}", CsvFormatter::new().format_all(&updates));
    } else {
        println!();
        print!("{}", TextFormatter::new().format_diagnostics(&api.engine().diagnostics()));
        let state = api.system_state();
        println!(
            "Processed {} samples ({} rejected), {} positions ({} centroid fallbacks)",
            processed, state.samples_rejected, state.positions_calculated, state.fallback_positions
        );
    }
    Ok(())
}

fn run_threaded(config: &PositioningConfig, mut source: MockSampleSource) -> Result<(), Box<dyn std::error::Error>> {
    use beacon_trilateration::SampleSource;

    let api = NonBlockingPositioningApi::spawn(PositioningEngine::from_config(config)?)?;
    let sender = api.sender();
    let producer = std::thread::spawn(move || {
        while let Some(sample) = source.next_sample() {
            if sender.send(sample).is_err() {
                break;
            }
        }
    });
    producer.join().map_err(|_| "sample producer panicked")?;

    let text = TextFormatter::verbose();
    while let Some(update) = api.recv_update_timeout(Duration::from_millis(100))? {
        println!("{}", text.format_location(&update));
    }

    let engine = api.shutdown()?;
    let state = engine.system_state();
    println!(
        "Processed {} samples, {} positions",
        state.samples_processed, state.positions_calculated
    );
    Ok(())
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} [--config <file>] [--samples <file>] [--csv | --threaded]", program);
    eprintln!("   or: {} --write-config <file>", program);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map_or("beacon-trilateration", |s| s.as_str());

    let mut config_path = None;
    let mut samples_path = None;
    let mut csv = false;
    let mut threaded = false;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => config_path = iter.next().cloned(),
            "--samples" => samples_path = iter.next().cloned(),
            "--csv" => csv = true,
            "--threaded" => threaded = true,
            "--write-config" => {
                let path = iter.next().ok_or("--write-config needs a path")?;
                let mut manager = ConfigurationManager::new();
                manager.save_to_file(path)?;
                println!("Wrote default configuration to {}", path);
                return Ok(());
            }
            _ => {
                print_usage(program);
                return Err(format!("unexpected argument '{}'", arg).into());
            }
        }
    }

    let manager = match &config_path {
        Some(path) => ConfigurationManager::from_file(path)?,
        None => ConfigurationManager::new(),
    };
    let config = manager.config();
    init_logging(&config.logging);
    tracing::debug!(config = ?manager.config_file_path(), "configuration loaded");

    let source = match &samples_path {
        Some(path) => load_samples(path)?,
        None => scripted_scan(config),
    };

    if threaded {
        run_threaded(config, source)
    } else {
        run_callback(config, source, csv)
    }
}
