use aco_tsp::{sweep, Colony, ColonyConfig, DistanceMatrix, SweepPoint, Variant};
use anyhow::{anyhow, Context, Result};
use clap::{arg, value_parser, ArgMatches, Command};
use std::{fs, path::PathBuf};
use tracing::info;

fn cli() -> Command {
    Command::new("aco-tsp")
        .about("Searches for short closed tours with ant colony optimization")
        .arg_required_else_help(true)
        .subcommand(colony_args(
            Command::new("run").about("Runs one colony and prints the best tour as JSON"),
        ))
        .subcommand(
            colony_args(
                Command::new("sweep").about("Runs one colony per decay rate and prints the results"),
            )
            .arg(
                arg!(--"decay-rates" <RATES> "Comma-separated decay rates to try")
                    .value_delimiter(',')
                    .value_parser(value_parser!(f64)),
            ),
        )
}

fn colony_args(command: Command) -> Command {
    command
        .arg(
            arg!(<MATRIX> "Path to a JSON distance matrix (an array of rows)")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            arg!(--config [CONFIG] "Path to a JSON colony configuration")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            arg!(--variant [VARIANT] "Pheromone update strategy")
                .value_parser(["uniform", "elitist", "min-max"]),
        )
        .arg(arg!(--seed [SEED] "Random seed").value_parser(value_parser!(u64)))
        .arg(arg!(--ants [ANTS] "Population size").value_parser(value_parser!(usize)))
        .arg(arg!(--iterations [ITERATIONS] "Iteration budget").value_parser(value_parser!(usize)))
        .arg(arg!(--decay [DECAY] "Pheromone decay rate").value_parser(value_parser!(f64)))
        .arg(arg!(--scatter "Start every ant at a random city"))
}

fn main() {
    init_tracing();
    let matches = cli().get_matches();

    if let Err(e) = match matches.subcommand() {
        Some(("run", sub_m)) => run(sub_m),
        Some(("sweep", sub_m)) => run_sweep(sub_m),
        _ => Err(anyhow!("Invalid subcommand")),
    } {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(matches: &ArgMatches) -> Result<()> {
    let distances = load_matrix(matches)?;
    let config = load_config(matches)?;
    let seed = seed(matches);

    let mut rng = fastrand::Rng::with_seed(seed);
    let mut colony = Colony::new(distances, config, &mut rng)?;
    let outcome = colony.run(&mut rng)?;

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

fn run_sweep(matches: &ArgMatches) -> Result<()> {
    let distances = load_matrix(matches)?;
    let config = load_config(matches)?;
    let seed = seed(matches);

    let points: Vec<SweepPoint> = matches
        .get_many::<f64>("decay-rates")
        .ok_or_else(|| anyhow!("--decay-rates is required"))?
        .map(|&rate| SweepPoint::decay(rate))
        .collect();

    let results = sweep(distances, &config, &points, seed)?;
    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

fn load_matrix(matches: &ArgMatches) -> Result<DistanceMatrix> {
    let path = matches
        .get_one::<PathBuf>("MATRIX")
        .ok_or_else(|| anyhow!("Missing distance matrix path"))?;
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read distance matrix {}", path.display()))?;
    let distances: DistanceMatrix = serde_json::from_str(&json)
        .with_context(|| format!("Invalid distance matrix {}", path.display()))?;
    info!(cities = distances.len(), path = %path.display(), "Loaded distance matrix");
    Ok(distances)
}

fn load_config(matches: &ArgMatches) -> Result<ColonyConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            serde_json::from_str(&json)
                .with_context(|| format!("Invalid config {}", path.display()))?
        }
        None => ColonyConfig::default(),
    };

    if let Some(variant) = matches.get_one::<String>("variant") {
        config.variant = match variant.as_str() {
            "uniform" => Variant::Uniform,
            "elitist" => Variant::elitist(),
            "min-max" => Variant::min_max(),
            other => return Err(anyhow!("Unknown variant {other}")),
        };
    }
    if let Some(&ants) = matches.get_one::<usize>("ants") {
        config.population_size = ants;
    }
    if let Some(&iterations) = matches.get_one::<usize>("iterations") {
        config.iteration_budget = iterations;
    }
    if let Some(&decay) = matches.get_one::<f64>("decay") {
        config.decay_rate = decay;
    }
    if matches.get_flag("scatter") {
        config.scatter_start_positions = true;
    }

    config.validate().context("Invalid colony configuration")?;
    Ok(config)
}

fn seed(matches: &ArgMatches) -> u64 {
    let seed = matches
        .get_one::<u64>("seed")
        .copied()
        .unwrap_or_else(|| fastrand::u64(..));
    info!(seed, "Seeded random source");
    seed
}
