use anyhow::{Context, Result, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;

use frontline::api::fetch_scenario;
use frontline::config::FileConfig;
use frontline::domain::{GeoPoint, Scenario};
use frontline::geometry::{distance_meters, format_distance};
use frontline::render::write_geojson;
use frontline::simulation::{DivisionOrder, Severity, Simulation};

/// Run a front-line scenario for a number of ticks and export it as GeoJSON
///
/// Examples:
///   # Run the built-in theatre for 10 ticks
///   frontline
///
///   # Launch the northern and central offensives and run at double speed
///   frontline --launch north --launch center --speed 2 --ticks 24
///
///   # Load a scenario file and include band triangles in the output
///   frontline --scenario my-theatre.toml --triangles -o theatre.geojson
///
///   # Pull a division back into reserve before running
///   frontline --order 1pz=fallback --ticks 5
///
///   # Measure the ground distance between two points
///   frontline --measure 52.23,21.01 50.45,30.52
#[derive(Parser, Debug)]
#[command(name = "frontline")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to config file (optional, auto-searches frontline.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Scenario file, TOML or JSON by extension (defaults to the built-in theatre)
    #[arg(short = 's', long, conflicts_with = "url")]
    scenario: Option<PathBuf>,

    /// Fetch the scenario as JSON from this URL
    #[arg(long)]
    url: Option<String>,

    /// Number of simulation ticks to run
    #[arg(short = 't', long, default_value = "10")]
    ticks: u32,

    /// Simulation speed multiplier (0.5, 1 or 2 in the usual UI)
    #[arg(long, default_value = "1.0")]
    speed: f64,

    /// Launch an offensive on this front before the first tick (repeatable)
    #[arg(short = 'l', long = "launch", value_name = "FRONT_ID")]
    launch: Vec<String>,

    /// Give a division an order before the first tick: airstrike, support,
    /// fallback or resupply (repeatable)
    #[arg(long = "order", value_name = "DIVISION=ORDER", value_parser = parse_order)]
    order: Vec<(String, DivisionOrder)>,

    /// Output GeoJSON file path (defaults to frontline.geojson)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Add earcut triangles of each band to the GeoJSON output
    #[arg(long)]
    triangles: bool,

    /// Print the distance between two LAT,LNG points
    #[arg(
        long,
        num_args = 2,
        value_names = ["FROM", "TO"],
        value_parser = parse_lat_lng,
        allow_hyphen_values = true
    )]
    measure: Option<Vec<GeoPoint>>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let total_start = Instant::now();

    let file_config = match args.config {
        Some(ref config_path) if !config_path.exists() => {
            bail!("Config file not found: {}", config_path.display());
        }
        Some(ref config_path) => Some(FileConfig::from_file(config_path)?),
        None => FileConfig::load(),
    };

    let source = scenario_source(&args, file_config.as_ref());
    let ticks = if args.ticks != 10 {
        args.ticks
    } else {
        file_config.as_ref().map(|c| c.ticks).unwrap_or(10)
    };
    let speed = if (args.speed - 1.0).abs() > f64::EPSILON {
        args.speed
    } else {
        file_config.as_ref().map(|c| c.speed).unwrap_or(1.0)
    };
    let verbose = args.verbose || file_config.as_ref().map(|c| c.verbose).unwrap_or(false);
    let triangles = args.triangles || file_config.as_ref().map(|c| c.triangles).unwrap_or(false);
    let output_path = args
        .output
        .clone()
        .or_else(|| file_config.as_ref().and_then(|c| c.output.clone()))
        .unwrap_or_else(|| PathBuf::from("frontline.geojson"));

    let fetch_config = file_config
        .as_ref()
        .and_then(|c| c.fetch.clone())
        .unwrap_or_default();
    let simulation_config = file_config
        .as_ref()
        .and_then(|c| c.simulation.clone())
        .unwrap_or_default();

    if let Some(points) = &args.measure {
        if let [from, to] = points.as_slice() {
            println!(
                "Distance ({:.4}, {:.4}) -> ({:.4}, {:.4}): {}",
                from.latitude,
                from.longitude,
                to.latitude,
                to.longitude,
                format_distance(distance_meters(*from, *to))
            );
        }
        return Ok(());
    }

    println!("frontline - Front Line Simulator");
    println!("================================");
    println!();

    if verbose {
        println!("Configuration:");
        match &source {
            ScenarioSource::Url(u) => println!("  Scenario URL: {}", u),
            ScenarioSource::File(p) => println!("  Scenario file: {}", p.display()),
            ScenarioSource::Builtin => println!("  Scenario: built-in"),
        }
        println!("  Ticks: {}", ticks);
        println!("  Speed: {}x", speed);
        println!("  Base momentum: {}", simulation_config.base_momentum);
        println!("  Minutes per tick: {}", simulation_config.tick_minutes);
        println!(
            "  Triangles: {}",
            if triangles { "enabled" } else { "disabled" }
        );
        println!("  Output: {}", output_path.display());
        println!("  Fetch mirrors: {}", fetch_config.urls.len());
        println!();
    }

    let spinner = create_spinner("Loading scenario...");
    let start = Instant::now();
    let scenario = match &source {
        ScenarioSource::Url(u) => {
            fetch_scenario(u, &fetch_config).context("Failed to fetch scenario")?
        }
        ScenarioSource::File(p) => Scenario::load(p)?,
        ScenarioSource::Builtin => {
            Scenario::builtin().context("Failed to load built-in scenario")?
        }
    };
    scenario.validate().context("Invalid scenario")?;
    spinner.finish_with_message(format!(
        "Loaded {} fronts and {} divisions [{:.1}s]",
        scenario.fronts.len(),
        scenario.divisions.len(),
        start.elapsed().as_secs_f32()
    ));

    for id in scenario.dangling_assignments() {
        eprintln!(
            "Warning: division {} is assigned to an unknown front, it stays at its position",
            id
        );
    }

    let mut simulation = Simulation::new(scenario, simulation_config);
    simulation
        .set_speed(speed)
        .context("Invalid --speed value")?;

    for front_id in &args.launch {
        let launched = simulation
            .launch_offensive(front_id)
            .with_context(|| format!("Failed to launch offensive on {}", front_id))?;
        if !launched {
            eprintln!(
                "Warning: {} lacks readiness or supply, the offensive stalled",
                front_id
            );
        }
    }

    for (division_id, order) in &args.order {
        let applied = simulation
            .order_division(division_id, *order)
            .with_context(|| format!("Failed to order division {}", division_id))?;
        if !applied {
            eprintln!(
                "Warning: {:?} does not apply to division {}, order ignored",
                order, division_id
            );
        }
    }

    let start = Instant::now();
    let progress = create_progress_bar(ticks as u64);
    for _ in 0..ticks {
        let moved = simulation.tick();
        simulation.advance_clock();
        if verbose && !moved.is_empty() {
            progress.println(format!(
                "  {} advanced: {}",
                simulation.clock().format("%H:%M"),
                moved.join(", ")
            ));
        }
        progress.inc(1);
    }
    progress.finish_with_message(format!(
        "Ran {} ticks, game time {} [{:.1}s]",
        ticks,
        simulation.clock().format("%Y-%m-%d %H:%M"),
        start.elapsed().as_secs_f32()
    ));

    let spinner = create_spinner("Writing GeoJSON...");
    let start = Instant::now();
    let snapshot = simulation.snapshot();
    let features = write_geojson(&output_path, &snapshot, triangles)
        .context("Failed to write GeoJSON file")?;
    spinner.finish_with_message(format!(
        "Wrote {} features [{:.1}s]",
        features,
        start.elapsed().as_secs_f32()
    ));

    println!();
    print_fronts(&simulation);
    print_summary(&simulation);
    print_battle_log(&simulation);

    println!(
        "Done! Total time: {:.1}s",
        total_start.elapsed().as_secs_f32()
    );
    println!();
    println!("Output: {}", output_path.display());

    Ok(())
}

/// Where the scenario comes from
#[derive(Debug, Clone, PartialEq)]
enum ScenarioSource {
    Url(String),
    File(PathBuf),
    Builtin,
}

/// Pick the scenario source as a unit: command line first, then config file
fn scenario_source(args: &Args, file_config: Option<&FileConfig>) -> ScenarioSource {
    if let Some(ref u) = args.url {
        return ScenarioSource::Url(u.clone());
    }
    if let Some(ref p) = args.scenario {
        return ScenarioSource::File(p.clone());
    }
    match file_config {
        Some(FileConfig { url: Some(u), .. }) => ScenarioSource::Url(u.clone()),
        Some(FileConfig { scenario: Some(p), .. }) => ScenarioSource::File(p.clone()),
        _ => ScenarioSource::Builtin,
    }
}

fn print_fronts(simulation: &Simulation) {
    println!("Fronts");
    println!("======");
    for front in simulation.fronts() {
        println!(
            "  {:<28} {:<11} progress {:>3.0}%  readiness {:>3.0}%  supply {:>3.0}%",
            front.display_name(),
            format!("{:?}", front.state),
            front.progress * 100.0,
            front.readiness,
            front.supply
        );
    }
    println!();
}

fn print_summary(simulation: &Simulation) {
    let summary = simulation.summary();
    println!("Summary");
    println!("=======");
    println!(
        "  Divisions: {} friendly, {} enemy",
        summary.friendly_divisions, summary.enemy_divisions
    );
    println!(
        "  Average friendly strength: {}%",
        summary.average_friendly_strength
    );
    println!("  Average readiness: {}%", summary.average_readiness);
    println!("  Average supply: {}%", summary.average_supply);
    println!();
}

fn print_battle_log(simulation: &Simulation) {
    println!("Battle log");
    println!("==========");
    for entry in simulation.log().entries() {
        let marker = match entry.severity {
            Severity::Info => " ",
            Severity::Success => "+",
            Severity::Warning => "!",
        };
        println!("  {} [{}] {}", marker, entry.time, entry.message);
    }
    println!();
}

/// Parse `LAT,LNG` into a point
fn parse_lat_lng(value: &str) -> Result<GeoPoint, String> {
    let (lat, lng) = value
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LNG, got `{}`", value))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| format!("invalid latitude `{}`", lat.trim()))?;
    let lng: f64 = lng
        .trim()
        .parse()
        .map_err(|_| format!("invalid longitude `{}`", lng.trim()))?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(format!("coordinates out of range: {}", value));
    }
    Ok(GeoPoint::new(lat, lng))
}

/// Parse `DIVISION=ORDER`
fn parse_order(value: &str) -> Result<(String, DivisionOrder), String> {
    let (division, order) = value
        .split_once('=')
        .ok_or_else(|| format!("expected DIVISION=ORDER, got `{}`", value))?;
    let division = division.trim();
    if division.is_empty() {
        return Err(format!("missing division id in `{}`", value));
    }
    let order: DivisionOrder = order.trim().parse().map_err(|e| format!("{}", e))?;
    Ok((division.to_string(), order))
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}

fn create_progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::with_template("{bar:30.green/white} {pos}/{len} ticks {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    pb
}
