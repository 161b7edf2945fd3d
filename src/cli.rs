use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use itertools::Itertools;

use crate::config::{ApproxConfig, ExactConfig, Preset};
use crate::display::{
    allocation_table, print_error, print_section, ranked_table, sparkline, summary_table,
};
use crate::engine::{solve_approximate, solve_exact, ApproxReport, ExactReport};
use crate::error::{BlottoError, BlottoResult};

#[derive(Parser)]
#[command(name = "blotto", version = "1.0.0", about = "Colonel Blotto solver: exact enumeration and regret-matching equilibria.")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum PresetArg {
    Base,
    Extended,
}

impl From<PresetArg> for Preset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Base => Preset::Base,
            PresetArg::Extended => Preset::Extended,
        }
    }
}

/// Game flags shared by both solvers. Each one overrides the preset or
/// config file.
#[derive(clap::Args)]
struct GameArgs {
    /// Load the run configuration from a JSON file
    #[arg(long, conflicts_with = "preset")]
    config: Option<PathBuf>,
    /// Start from a built-in game
    #[arg(long)]
    preset: Option<PresetArg>,
    /// Attacker budget (units)
    #[arg(short, long, allow_negative_numbers = true)]
    attacker: Option<i64>,
    /// Defender budget (units)
    #[arg(short, long, allow_negative_numbers = true)]
    defender: Option<i64>,
    /// Per-battlefield capacities, comma separated (e.g. 4,3,6,4,3)
    #[arg(short, long, value_delimiter = ',', allow_negative_numbers = true)]
    capacities: Option<Vec<i64>>,
    /// Print the report as JSON instead of tables
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Enumerate every allocation and rank defender strategies (majority rule)
    Exact {
        #[command(flatten)]
        game: GameArgs,
        /// Number of defender strategies to show
        #[arg(short = 'k', long = "top")]
        top: Option<usize>,
        /// Refuse to enumerate more allocations than this per player
        #[arg(long)]
        max_strategies: Option<u64>,
    },
    /// Approximate an equilibrium on sampled pools with regret matching
    Approx {
        #[command(flatten)]
        game: GameArgs,
        /// Per-battlefield values, comma separated (e.g. 2,3,4,2,3)
        #[arg(short = 'w', long, value_delimiter = ',', allow_negative_numbers = true)]
        values: Option<Vec<f64>>,
        /// Allocations sampled per player
        #[arg(short, long)]
        pool_size: Option<usize>,
        /// Regret-matching iterations
        #[arg(short, long)]
        iterations: Option<usize>,
        /// Random seed for reproducible pools
        #[arg(short, long)]
        seed: Option<u64>,
        /// Stop once the summed average regret drops to this value
        #[arg(long)]
        tolerance: Option<f64>,
        /// Moving-average window for the payoff summary
        #[arg(long, default_value = "200")]
        smoothing: usize,
    },
}

pub fn run() {
    let cli = Cli::parse();
    if let Err(e) = dispatch(cli) {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}

/// Parse `args` (program name first) and run the command. Failures,
/// including argument errors, are returned rather than ending the process.
pub fn run_with_args(args: Vec<String>) -> BlottoResult<()> {
    let cli = Cli::try_parse_from(args)
        .map_err(|e| BlottoError::InvalidConfiguration(e.to_string()))?;
    dispatch(cli)
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .try_init();
}

fn dispatch(cli: Cli) -> BlottoResult<()> {
    init_logging(cli.verbose);

    match cli.command {
        Commands::Exact {
            game,
            top,
            max_strategies,
        } => cmd_exact(game, top, max_strategies),
        Commands::Approx {
            game,
            values,
            pool_size,
            iterations,
            seed,
            tolerance,
            smoothing,
        } => cmd_approx(game, values, pool_size, iterations, seed, tolerance, smoothing),
    }
}

fn exact_config(
    game: &GameArgs,
    top: Option<usize>,
    max_strategies: Option<u64>,
) -> BlottoResult<ExactConfig> {
    let mut config = match (&game.config, game.preset) {
        (Some(path), _) => ExactConfig::from_json_file(path)?,
        (None, preset) => ExactConfig::from_preset(preset.map_or(Preset::Base, Preset::from)),
    };

    if let Some(a) = game.attacker {
        config.game.attacker_budget = a;
    }
    if let Some(d) = game.defender {
        config.game.defender_budget = d;
    }
    if let Some(c) = &game.capacities {
        config.game.capacities = c.clone();
        // Values are ignored by the majority rule.
        config.game.values = None;
    }
    if let Some(k) = top {
        config.top_k = k;
    }
    if let Some(m) = max_strategies {
        config.max_strategies = m;
    }
    Ok(config)
}

fn approx_config(
    game: &GameArgs,
    values: Option<Vec<f64>>,
    pool_size: Option<usize>,
    iterations: Option<usize>,
    seed: Option<u64>,
    tolerance: Option<f64>,
) -> BlottoResult<ApproxConfig> {
    let mut config = match (&game.config, game.preset) {
        (Some(path), _) => ApproxConfig::from_json_file(path)?,
        (None, preset) => ApproxConfig::from_preset(preset.map_or(Preset::Extended, Preset::from)),
    };

    if let Some(a) = game.attacker {
        config.game.attacker_budget = a;
    }
    if let Some(d) = game.defender {
        config.game.defender_budget = d;
    }
    if let Some(c) = &game.capacities {
        config.game.capacities = c.clone();
        if values.is_none() {
            config.game.values = None;
        }
    }
    if values.is_some() {
        config.game.values = values;
    }
    if let Some(p) = pool_size {
        config.pool_size = p;
    }
    if let Some(i) = iterations {
        config.iterations = i;
    }
    if seed.is_some() {
        config.seed = seed;
    }
    if tolerance.is_some() {
        config.regret_tolerance = tolerance;
    }
    Ok(config)
}

fn cmd_exact(game: GameArgs, top: Option<usize>, max_strategies: Option<u64>) -> BlottoResult<()> {
    let config = exact_config(&game, top, max_strategies)?;

    if !game.json {
        println!();
        println!(
            "  {} Exact enumeration | defender {} vs attacker {} | capacities [{}]",
            "BLOTTO".bold(),
            config.game.defender_budget,
            config.game.attacker_budget,
            config.game.capacities.iter().join(", "),
        );
    }

    let report = solve_exact(&config)?;

    if game.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_exact(&report);
    }
    Ok(())
}

fn print_exact(report: &ExactReport) {
    println!(
        "  {} defender allocations x {} attacker allocations",
        report.defender_strategies, report.attacker_strategies
    );
    println!();
    println!(
        "  {}",
        format!("Top {} defender strategies", report.ranked.len()).bold()
    );
    println!("{}", ranked_table(report));
    println!();
}

fn cmd_approx(
    game: GameArgs,
    values: Option<Vec<f64>>,
    pool_size: Option<usize>,
    iterations: Option<usize>,
    seed: Option<u64>,
    tolerance: Option<f64>,
    smoothing: usize,
) -> BlottoResult<()> {
    let config = approx_config(&game, values, pool_size, iterations, seed, tolerance)?;

    if !game.json {
        println!();
        println!(
            "  {} Regret matching | defender {} vs attacker {} | {} strategies per pool | {} iterations",
            "BLOTTO".bold(),
            config.game.defender_budget,
            config.game.attacker_budget,
            config.pool_size,
            config.iterations,
        );
    }

    let report = solve_approximate(&config)?;

    if game.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_approx(&report, smoothing);
    }
    Ok(())
}

fn print_approx(report: &ApproxReport, smoothing: usize) {
    if let Some(seed) = report.seed {
        println!("  seed {}", seed.to_string().dimmed());
    }

    println!();
    println!("{}", summary_table(report, smoothing));

    print_section("Attacker payoff", &sparkline(&report.payoff_history, 60));

    println!();
    println!("  {}", "Expected allocations (time-averaged strategies)".bold());
    println!("{}", allocation_table(report));

    for (name, support) in [
        ("Attacker support", &report.attacker_support),
        ("Defender support", &report.defender_support),
    ] {
        let lines = support
            .iter()
            .map(|w| format!("{}  {:.1}%", w.allocation, w.probability * 100.0))
            .join("\n  ");
        print_section(name, &lines);
    }
    println!();
}
