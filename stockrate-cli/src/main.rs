//! StockRate CLI — rate a symbol list and build symbol lists.
//!
//! Commands:
//! - `rate` — load symbols, fetch ratings, print and save the table, optionally plot
//! - `universe` — write a symbol list from a named group of security codes

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use stockrate_chart::RenderOptions;
use stockrate_core::data::universe::{to_symbols, write_symbol_list, CORE30_GROUP, TOKYO_SUFFIX};
use stockrate_core::data::{
    fetch_all, LogProgress, QuoteProvider, StaticProvider, SymbolLoader, Universe, YahooProvider,
};
use stockrate_core::{save_successful_symbols, tabulate_outcomes, PersistStatus, ReportConfig};

#[derive(Parser)]
#[command(
    name = "stockrate",
    about = "StockRate — analyst recommendation ratings for a list of symbols"
)]
struct Cli {
    /// Log at debug level (RUST_LOG takes precedence).
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch ratings for every symbol in a list and save the successful ones.
    Rate(RateArgs),
    /// Write a symbol list for one universe group.
    Universe {
        /// Universe TOML file. Defaults to the built-in TOPIX Core30 list.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Group to export.
        #[arg(long, default_value = CORE30_GROUP)]
        group: String,

        /// Exchange suffix appended to each code.
        #[arg(long, default_value = TOKYO_SUFFIX)]
        suffix: String,

        /// Output CSV path.
        #[arg(long, default_value = "data/topix_core30.csv")]
        out: PathBuf,
    },
}

#[derive(clap::Args)]
struct RateArgs {
    /// Symbol list (first CSV column). Defaults to `[input] path` from the config.
    symbol_file: Option<PathBuf>,

    /// Path to a TOML report config.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Rank ascending by rate.
    #[arg(long, conflicts_with = "no_sort")]
    sort: bool,

    /// Keep the symbol-list order.
    #[arg(long)]
    no_sort: bool,

    /// Show a bar chart after tabulating.
    #[arg(long)]
    plot: bool,

    /// Save the chart as a dated PNG instead of showing it (implies --plot).
    #[arg(long)]
    save_plot: bool,

    /// Directory for the successful-symbols CSV.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// File name of the successful-symbols CSV.
    #[arg(long)]
    output_file: Option<String>,

    /// Directory for saved charts.
    #[arg(long)]
    results_dir: Option<PathBuf>,

    /// Bar width as a fraction of a category slot.
    #[arg(long)]
    bar_width: Option<f64>,

    /// Chart font size in points.
    #[arg(long)]
    font_size: Option<f64>,

    /// Resolution of saved charts.
    #[arg(long)]
    dpi: Option<u32>,

    /// Read quotes from a JSON fixture instead of the network.
    #[arg(long)]
    offline: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Rate(args) => run_rate(args),
        Commands::Universe {
            config,
            group,
            suffix,
            out,
        } => run_universe(config.as_deref(), &group, &suffix, &out),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn run_rate(args: RateArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => ReportConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ReportConfig::default(),
    };
    apply_overrides(&mut config, &args);
    config.validate()?;

    let provider: Box<dyn QuoteProvider> = match &args.offline {
        Some(fixture) => Box::new(
            StaticProvider::from_json_file(fixture)
                .with_context(|| format!("loading fixture {}", fixture.display()))?,
        ),
        None => Box::new(YahooProvider::new(&config.provider)?),
    };

    let symbols = SymbolLoader::new().load(&config.input.path);
    log::info!(
        "Rating {} symbols from {} via {}",
        symbols.len(),
        config.input.path.display(),
        provider.name()
    );

    let outcomes = fetch_all(provider.as_ref(), &symbols, &LogProgress);
    let table = tabulate_outcomes(&outcomes, config.output.sort);

    if table.is_empty() {
        println!("No ratings were retrieved; nothing to save or plot.");
        return Ok(());
    }
    println!("{table}");

    if let PersistStatus::Written { path, rows } =
        save_successful_symbols(&config.output.dir, &config.output.filename, table.records())
    {
        println!("Saved {rows} ratings to {}", path.display());
    }

    if config.plot.enabled {
        let opts = RenderOptions::from(&config.plot);
        match stockrate_chart::render(&table, &opts) {
            Ok(Some(path)) => println!("Chart saved to {}", path.display()),
            Ok(None) => {}
            Err(e) => log::error!("Plotting failed: {e}"),
        }
    }

    Ok(())
}

fn apply_overrides(config: &mut ReportConfig, args: &RateArgs) {
    if let Some(path) = &args.symbol_file {
        config.input.path = path.clone();
    }
    if args.sort {
        config.output.sort = true;
    }
    if args.no_sort {
        config.output.sort = false;
    }
    if let Some(dir) = &args.output_dir {
        config.output.dir = dir.clone();
    }
    if let Some(name) = &args.output_file {
        config.output.filename = name.clone();
    }

    let plot = &mut config.plot;
    if args.plot || args.save_plot {
        plot.enabled = true;
    }
    if args.save_plot {
        plot.save = true;
    }
    if let Some(dir) = &args.results_dir {
        plot.results_dir = dir.clone();
    }
    if let Some(w) = args.bar_width {
        plot.bar_width = w;
    }
    if let Some(pt) = args.font_size {
        plot.font_size = pt;
    }
    if let Some(dpi) = args.dpi {
        plot.dpi = dpi;
    }
}

fn run_universe(config: Option<&Path>, group: &str, suffix: &str, out: &Path) -> Result<()> {
    let universe = match config {
        Some(path) => Universe::from_file(path).map_err(|e| anyhow!(e))?,
        None => Universe::default_core30(),
    };

    let codes = universe.group_codes(group).ok_or_else(|| {
        anyhow!(
            "group '{group}' not found; available: {}",
            universe.group_names().join(", ")
        )
    })?;

    let symbols = to_symbols(codes, suffix);
    write_symbol_list(out, &symbols)
        .with_context(|| format!("writing symbol list {}", out.display()))?;

    println!("Wrote {} symbols to {}", symbols.len(), out.display());
    Ok(())
}
