use std::io::Read;

use clap::Parser;
use ship_packer::parse::{DEMO_INVENTORY, parse_inventory};
use ship_packer::render;
use ship_packer::solver::Solver;
use ship_packer::types::{PackingConfig, PlacementPolicy, ScoringWeights, SortOrder, SplitPolicy};
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "ship_packer",
    about = "Split a ship inventory into volume- and value-limited packages"
)]
struct Cli {
    /// Tab-separated inventory with Type, Count, Volume, Value columns ("-" for stdin).
    /// Uses a built-in sample hangar when omitted.
    #[arg(long)]
    input: Option<String>,

    /// Max volume per package (m3)
    #[arg(long, default_value_t = 350_000.0)]
    volume_limit: f64,

    /// Max value per package (0 = unlimited)
    #[arg(long, default_value_t = 0.0)]
    value_limit: f64,

    /// Max chunks a single stack may be split into
    #[arg(long, default_value_t = 10)]
    max_splits: u32,

    /// Max value per chunk (0 = unlimited)
    #[arg(long, default_value_t = 0.0)]
    max_stack_value: f64,

    /// Chunk order: volume, density, composite, value, or input
    #[arg(long, default_value = "volume", value_parser = parse_order)]
    order: SortOrder,

    /// Placement: first-fit, best-fit, value-balance, or modified-first-fit
    #[arg(long, default_value = "first-fit", value_parser = parse_policy)]
    policy: PlacementPolicy,

    /// What to do when a stack needs more splits than allowed: hard or soft
    #[arg(long, default_value = "hard", value_parser = parse_split_policy)]
    split_policy: SplitPolicy,

    /// Weight of value density in composite and best-fit scores
    #[arg(long, default_value_t = 1.0)]
    alpha: f64,

    /// Weight of volume (composite) or existing value (best-fit)
    #[arg(long, default_value_t = 0.0)]
    beta: f64,

    /// Local improvement sweeps (0 disables)
    #[arg(long, default_value_t = 50)]
    improve_iterations: usize,

    /// Print the solution as JSON
    #[arg(long)]
    json: bool,

    /// Log packing decisions to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn parse_order(s: &str) -> Result<SortOrder, String> {
    match s {
        "volume" => Ok(SortOrder::Volume),
        "density" => Ok(SortOrder::Density),
        "composite" => Ok(SortOrder::Composite),
        "value" => Ok(SortOrder::Value),
        "input" => Ok(SortOrder::Input),
        _ => Err(format!(
            "invalid order '{}', expected: volume, density, composite, value, or input",
            s
        )),
    }
}

fn parse_policy(s: &str) -> Result<PlacementPolicy, String> {
    match s {
        "first-fit" => Ok(PlacementPolicy::FirstFit),
        "best-fit" => Ok(PlacementPolicy::BestFit),
        "value-balance" => Ok(PlacementPolicy::ValueBalance),
        "modified-first-fit" => Ok(PlacementPolicy::ModifiedFirstFit),
        _ => Err(format!(
            "invalid policy '{}', expected: first-fit, best-fit, value-balance, or modified-first-fit",
            s
        )),
    }
}

fn parse_split_policy(s: &str) -> Result<SplitPolicy, String> {
    match s {
        "hard" => Ok(SplitPolicy::Hard),
        "soft" => Ok(SplitPolicy::Soft),
        _ => Err(format!("invalid split policy '{}', expected: hard or soft", s)),
    }
}

fn read_input(path: Option<&str>) -> Result<String, String> {
    match path {
        None => Ok(DEMO_INVENTORY.to_string()),
        Some("-") => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| format!("failed to read stdin: {}", e))?;
            Ok(buf)
        }
        Some(path) => {
            std::fs::read_to_string(path).map_err(|e| format!("failed to read '{}': {}", path, e))
        }
    }
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let text = read_input(cli.input.as_deref()).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let stacks = parse_inventory(&text).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let config = PackingConfig {
        volume_limit: cli.volume_limit,
        value_limit: cli.value_limit,
        max_splits_per_stack: cli.max_splits,
        max_stack_value: cli.max_stack_value,
        weights: ScoringWeights {
            alpha: cli.alpha,
            beta: cli.beta,
        },
        order: cli.order,
        policy: cli.policy,
        split_policy: cli.split_policy,
        max_improve_iterations: cli.improve_iterations,
    };

    let solution = Solver::new(config, stacks).solve().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    if cli.json {
        match serde_json::to_string_pretty(&solution) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        for (i, package) in solution.packages.iter().enumerate() {
            print!(
                "{}",
                render::render_package(i, package, solution.volume_limit)
            );
            println!();
        }
        for warning in &solution.warnings {
            eprintln!("Warning: {}", warning);
        }
        print!("{}", render::render_summary(&solution));
    }

    let errors = solution.errors();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("Error: {}", e);
        }
        std::process::exit(2);
    }
}
