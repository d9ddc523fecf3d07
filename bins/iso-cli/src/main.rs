//! iso-cli — Inspect recipes and decay chains from the command line.
//!
//! Loads a recipe book, then lists recipes, decays one through the memoized
//! cache, or writes every recipe to a JSON-lines state file.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};

use iso_core::traits::{DecaySolver, PersistenceSink};
use iso_decay::{HalfLifeSolver, HalfLifeTable, NoDecay};
use iso_recipe::{JsonLinesSink, NullSink, RecipeBook};
use iso_vector::IsoContext;

/// Isotopic recipe and decay-chain inspector.
#[derive(Parser, Debug)]
#[command(name = "iso-cli", version, about = "Isotopic recipes and decay chains")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// Recipe book (JSON). Defaults to <config dir>/isovec/recipes.json
    #[arg(long, global = true)]
    recipes: Option<PathBuf>,

    /// Half-life table (JSON). Without it compositions do not decay
    #[arg(long, global = true)]
    half_lives: Option<PathBuf>,

    /// Write logged compositions to this JSON-lines file
    #[arg(long, global = true)]
    records: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Log output format ("text" or "json")
    #[arg(long, global = true, default_value = "text")]
    log_format: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List loaded recipes with their state ids and mass fractions.
    List,
    /// Decay a recipe repeatedly and print each daughter.
    Decay(DecayArgs),
    /// Load recipes and exit; with --records, writes them out.
    Record,
}

#[derive(Args, Debug)]
struct DecayArgs {
    /// Recipe to decay.
    #[arg(long)]
    recipe: String,

    /// Elapsed time per step.
    #[arg(long)]
    time: i64,

    /// Number of decay steps.
    #[arg(long, default_value_t = 1)]
    steps: u32,

    /// Log each daughter through the recorder.
    #[arg(long)]
    record: bool,
}

impl GlobalArgs {
    fn recipes_path(&self) -> PathBuf {
        self.recipes.clone().unwrap_or_else(|| {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("isovec")
                .join("recipes.json")
        })
    }

    fn solver(&self) -> Result<Arc<dyn DecaySolver>> {
        match &self.half_lives {
            Some(path) => {
                let table = HalfLifeTable::from_path(path)
                    .with_context(|| format!("loading half-lives from {}", path.display()))?;
                Ok(Arc::new(HalfLifeSolver::new(&table)?))
            }
            None => Ok(Arc::new(NoDecay)),
        }
    }

    fn sink(&self) -> Result<Arc<dyn PersistenceSink>> {
        match &self.records {
            Some(path) => Ok(Arc::new(JsonLinesSink::create(path)?)),
            None => Ok(Arc::new(NullSink)),
        }
    }

    fn build_context(&self) -> Result<IsoContext> {
        let ctx = IsoContext::new(self.solver()?, self.sink()?);
        let path = self.recipes_path();
        let book = RecipeBook::from_path(&path)
            .with_context(|| format!("loading recipes from {}", path.display()))?;
        ctx.load_book(&book)?;
        Ok(ctx)
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.global.log_level, &cli.global.log_format);

    if let Err(e) = run(cli) {
        error!("{e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let ctx = cli.global.build_context()?;

    match cli.command {
        Commands::List => {
            for (name, composition) in ctx.registry().entries() {
                println!("{name} (state {})", composition.state_id());
                print!("{}", composition.detail());
            }
        }
        Commands::Decay(args) => decay(&ctx, &args)?,
        Commands::Record => {
            info!(recipes = ctx.registry().count(), "recipes recorded");
        }
    }

    ctx.flush()?;
    Ok(())
}

fn decay(ctx: &IsoContext, args: &DecayArgs) -> Result<()> {
    if args.time < 0 {
        bail!("--time must be non-negative, got {}", args.time);
    }
    let mut vector = ctx.recipe(&args.recipe)?;
    for step in 1..=args.steps {
        ctx.decay(&mut vector, args.time)?;
        if args.record {
            ctx.record(&vector)?;
        }
        println!("step {step}: {vector}");
        print!("{}", vector.detail());
    }
    info!(
        solves = ctx.cache().solve_count(),
        chains = ctx.cache().chain_count(),
        "decay finished"
    );
    Ok(())
}

/// Initialize tracing subscriber with the given log level and output format.
///
/// Pass `format = "json"` for structured JSON output. Any other value
/// defaults to human-readable text.
fn init_logging(level_str: &str, format: &str) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_str));

    if format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr))
            .init();
    }
}
