use anyhow::Result;
use clap::Parser;

use cadenza_remote::Config;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "cadenza", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Catalog API root (default: from config, else the public catalog)
    #[arg(long, global = true)]
    catalog_url: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Search the performance catalog
    ///
    /// Sends the query to the catalog and prints the results after smart
    /// sorting:
    ///
    /// - When more than three results come from an album matching the query
    ///   and Spotify credentials are configured, the album's tracks are
    ///   listed in album order, followed by everything else.
    /// - Otherwise results are grouped by song, with unapproved performances
    ///   first and the newest recording first within each group.
    ///
    /// When nothing matches, a hint is printed based on the known artists
    /// and songs.
    Search {
        /// Search terms
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Print the ranked results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show autocomplete suggestions for a partial query
    ///
    /// Loads the full catalog once to build the artist, song, album, and
    /// genre label sets, then prints up to five matching labels.
    Suggest {
        /// Partial query (at least two characters)
        #[arg(required = true, num_args = 1..)]
        partial: Vec<String>,

        /// Follow the rotating suggestion for this many rotations
        #[arg(long, value_name = "N")]
        rotate: Option<usize>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, clap::Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Print the config file path
    Path,
    /// Print an example config file
    Example,
    /// Create the config file with defaults
    Init,
    /// Print one value, or the whole file
    Get {
        key: Option<String>,
    },
    /// Set a value in the config file
    Set {
        key: String,
        value: String,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn load_config(catalog_url: Option<String>) -> Result<Config> {
    let config = match catalog_url {
        Some(url) => Config::load_with_catalog_url(url)?,
        None => Config::load()?,
    };
    log::debug!(
        "Catalog {} (timeout {}s)",
        config.catalog_base_url,
        config.request_timeout_secs
    );
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Search { query, json } => {
            let config = load_config(cli.catalog_url)?;
            commands::run_search(&config, &query.join(" "), json).await?;
        }
        Commands::Suggest { partial, rotate } => {
            let config = load_config(cli.catalog_url)?;
            commands::run_suggest(&config, &partial.join(" "), rotate).await?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show_config()?,
            ConfigAction::Path => commands::config::show_path(),
            ConfigAction::Example => commands::config::show_example(),
            ConfigAction::Init => commands::config::init_config()?,
            ConfigAction::Get { key } => commands::config::get_config(key)?,
            ConfigAction::Set { key, value } => commands::config::set_config(&key, &value)?,
        },
    }

    Ok(())
}
