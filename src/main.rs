use std::fs::File;
use std::io::BufReader;
use std::process;

use getopts::Options;
use log::{debug, error, info, warn, LevelFilter};
use simplelog::{Config, SimpleLogger};

use waypoint_nav::navigation::NavigationSession;
use waypoint_nav::position_tracker::Ingest;
use waypoint_nav::telemetry::TimedSample;
use waypoint_nav::waypoint_generator::Arrival;
use waypoint_nav::{NavError, NavigationConfig, PathListRecord, SampleFeed};


struct Settings {
    paths_file: String,
    samples_file: String,
    config_file: Option<String>,
    index: usize,
}


fn main() {
    let settings = match handle_opts() {
        Some(settings) => settings,
        None => return,
    };
    info!("Starting up");

    if let Err(e) = run(&settings) {
        error!("{}", e);
        process::exit(1);
    }

    info!("Shutting down");
}


fn run(settings: &Settings) -> Result<(), NavError> {
    let config = match settings.config_file {
        Some(ref file_name) => NavigationConfig::load(file_name)?,
        None => NavigationConfig::default(),
    };
    debug!("Using {:?}", config);

    let list = PathListRecord::load(&settings.paths_file)?;
    let collection = list.to_collection(settings.paths_file.as_str(), config.coincidence_threshold)?;
    let path = match collection.get(settings.index) {
        Some(path) => path,
        None => {
            return Err(NavError::PathIndexOutOfRange {
                index: settings.index,
                len: collection.len(),
            })
        }
    };
    info!("Navigating '{}': {}", path.name(), path.summary());

    let samples_file = File::open(&settings.samples_file)?;
    let mut feed = SampleFeed::new(BufReader::new(samples_file)).peekable();
    let start_time = match feed.peek() {
        Some(&Ok(ref sample)) => sample.timestamp,
        Some(&Err(_)) => {
            // Surface the parse error below
            chrono::Utc::now()
        }
        None => {
            warn!("No samples in {}", settings.samples_file);
            return Ok(());
        }
    };

    let mut session = NavigationSession::starting_at(path, start_time, &config);
    let mut rejected = 0;
    for sample in feed {
        let sample = sample?;
        let update = session.update(&sample.sample);
        match update.ingest {
            Ingest::Rejected => {
                rejected += 1;
                continue;
            }
            Ingest::Accepted => (),
        }
        match update.arrival {
            Some(Arrival::WaypointReached(_)) => info!("You have reached the next waypoint."),
            Some(Arrival::DestinationReached) => info!("You have reached the destination!"),
            None => (),
        }
        if session.is_imprecise() {
            warn!("GPS is inaccurate ({:.1} m)", sample.sample.accuracy);
        }
        report(&session, &sample);
    }

    info!(
        "Travelled {:.2} m, {} samples ignored, route {}",
        session.travelled(),
        rejected,
        if session.is_complete() { "complete" } else { "not complete" }
    );
    Ok(())
}


fn report(session: &NavigationSession, sample: &TimedSample) {
    let now = sample.timestamp;
    let meters = |value: Option<f64>| match value {
        Some(value) => format!("{:.2} m", value),
        None => "None".to_string(),
    };
    let speed = match session.average_speed_at(now) {
        Some(speed) => format!("{:.2} m/s", speed),
        None => "None".to_string(),
    };
    let eta = if session.is_complete() {
        "None".to_string()
    } else {
        match session.remaining_time_at(now) {
            Some(seconds) => format!("{:.2} mins", seconds / 60.0),
            None => "NaN".to_string(),
        }
    };
    let direction = match session.turn_direction() {
        Some(direction) => format!("{:?}", direction),
        None => "Straight".to_string(),
    };

    info!(
        "{} waypoint {} | to waypoint {} | travelled {:.2} m | speed {} | remaining {} | eta {} | {}",
        now.format("%H:%M:%S%.3f"),
        session.waypoint_index() + 1,
        meters(session.distance_to_next()),
        session.travelled(),
        speed,
        meters(session.remaining_distance()),
        eta,
        direction
    );
}


fn handle_opts() -> Option<Settings> {
    let mut opts = Options::new();
    opts.optopt("p", "paths", "Stored path list to navigate.", "FILE");
    opts.optopt("i", "index", "Which path in the list to follow, from 0.", "N");
    opts.optopt("s", "samples", "Recorded samples: timestamp_ms,lat,lng,accuracy.", "FILE");
    opts.optopt("c", "config", "JSON file overriding the thresholds.", "FILE");
    opts.optflag("v", "verbose", "Prints extra logging.");
    opts.optflag("h", "help", "Print this help menu.");
    let matches = match opts.parse(std::env::args().skip(1)) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Unable to parse options: {}", e);
            print_usage(&opts);
            process::exit(2);
        }
    };
    if matches.opt_present("h") {
        print_usage(&opts);
        return None;
    }

    let level = if matches.opt_present("v") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    if let Err(e) = SimpleLogger::init(level, Config::default()) {
        eprintln!("Unable to initialize logger: {}", e);
        process::exit(2);
    }

    let (paths_file, samples_file) = match (matches.opt_str("p"), matches.opt_str("s")) {
        (Some(paths_file), Some(samples_file)) => (paths_file, samples_file),
        _ => {
            error!("Both --paths and --samples are required");
            print_usage(&opts);
            process::exit(2);
        }
    };
    let index = match matches.opt_str("i") {
        Some(index) => match index.parse::<usize>() {
            Ok(index) => index,
            Err(e) => {
                error!("Invalid path index '{}': {}", index, e);
                process::exit(2);
            }
        },
        None => 0,
    };

    Some(Settings {
        paths_file,
        samples_file,
        config_file: matches.opt_str("c"),
        index,
    })
}


fn print_usage(opts: &Options) {
    let brief = "Usage: waypoint-nav --paths FILE --samples FILE [options]";
    print!("{}", opts.usage(brief));
}
