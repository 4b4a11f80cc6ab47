mod commands;
mod config;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::LarderConfig;
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(
    name = "larder",
    version,
    about = "Ingredient demand ledger built from daily point-of-sale recaps"
)]
struct Cli {
    /// TOML config file (default: ./larder.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log every pipeline stage to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a sales recap (CSV or XLSX) and upsert the day's demand row
    Ingest {
        /// Path to the exported sales recap
        input_file: PathBuf,

        /// Processing date, YYYY-MM-DD
        #[arg(short, long)]
        date: String,

        /// Custom JSON rule table (default: builtin "warung" preset)
        #[arg(short, long = "rules", value_name = "FILE")]
        rules: Option<PathBuf>,

        /// Historical ledger CSV (default: ingredients_historical.csv)
        #[arg(short, long, value_name = "FILE")]
        store: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum)]
        output: Option<OutputFormat>,
    },
    /// Classify a sales recap and show the demand row without storing it
    Classify {
        /// Path to the exported sales recap
        input_file: PathBuf,

        /// Processing date, YYYY-MM-DD
        #[arg(short, long)]
        date: String,

        /// Custom JSON rule table (default: builtin "warung" preset)
        #[arg(short, long = "rules", value_name = "FILE")]
        rules: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum)]
        output: Option<OutputFormat>,
    },
    /// Show the rows of the historical ledger
    History {
        /// Historical ledger CSV (default: ingredients_historical.csv)
        #[arg(short, long, value_name = "FILE")]
        store: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum)]
        output: Option<OutputFormat>,
    },
    /// Manage and inspect rule tables
    Rules {
        #[command(subcommand)]
        action: RulesAction,
    },
    /// Render a saved forecast payload as CSV
    Weather {
        /// Forecast timeline response (JSON)
        payload: PathBuf,

        /// Location the forecast was requested for
        #[arg(short, long)]
        location: String,

        /// First forecast day, YYYY-MM-DD
        #[arg(long)]
        start: String,

        /// Last forecast day, YYYY-MM-DD
        #[arg(long)]
        end: String,

        /// Write the CSV to a file instead of stdout
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum RulesAction {
    /// List predefined rule tables
    List,
    /// Explain a rule table in plain language
    Explain {
        /// Preset name (e.g., "warung")
        preset: String,
    },
    /// Print the JSON schema with field descriptions and example
    Schema,
    /// Validate a custom rule table file
    Validate {
        /// Path to JSON rule table
        file: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = LarderConfig::discover(cli.config.as_deref()).and_then(|config| match cli.command {
        Commands::Ingest {
            input_file,
            date,
            rules,
            store,
            output,
        } => commands::ingest::run(
            &input_file,
            &date,
            config.rules_path(rules).as_deref(),
            &config.store_path(store),
            config.output_format(output),
        ),
        Commands::Classify {
            input_file,
            date,
            rules,
            output,
        } => commands::classify::run(
            &input_file,
            &date,
            config.rules_path(rules).as_deref(),
            config.output_format(output),
        ),
        Commands::History { store, output } => {
            commands::history::run(&config.store_path(store), config.output_format(output))
        }
        Commands::Rules { action } => match action {
            RulesAction::List => commands::rules::list(),
            RulesAction::Explain { preset } => commands::rules::explain(&preset),
            RulesAction::Schema => commands::rules::schema(),
            RulesAction::Validate { file } => commands::rules::validate(&file),
        },
        Commands::Weather {
            payload,
            location,
            start,
            end,
            out,
        } => commands::weather::run(&payload, &location, &start, &end, out.as_deref()),
    });

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
