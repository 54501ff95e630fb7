//! Boost emblem fetcher
//!
//! Loads the emblem page in a headless browser and saves the embedded JSON.
//! Without arguments it reads https://unite-db.com/boost-emblems into ./data.json.
//! With `--optimize` it also searches the catalogue for the best ten-emblem set.

use anyhow::Context;
use boost_emblems::browser::normalize_url;
use boost_emblems::distribution::DEFAULT_GENERATIONS;
use boost_emblems::pipeline::{self, DEFAULT_OUTPUT, DEFAULT_SELECTOR, DEFAULT_URL};
use boost_emblems::{
    BrowserSession, Catalog, Color, ConnectionOptions, LaunchOptions, Optimizer, OutputFormat, Pool, ScrapeConfig,
    Statistic, Targets, read_document,
};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "boost-emblems")]
#[command(version)]
#[command(about = "Fetch the boost emblem catalogue and save it as JSON", long_about = None)]
struct Cli {
    /// Page to load
    #[arg(long, default_value = DEFAULT_URL)]
    url: String,

    /// CSS selector of the element holding the JSON
    #[arg(long, default_value = DEFAULT_SELECTOR)]
    selector: String,

    /// File to write, replaced on every run
    #[arg(long, short = 'o', value_name = "PATH", default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Indent the written JSON
    #[arg(long)]
    pretty: bool,

    /// Seconds to wait for the selector to match
    #[arg(long, value_name = "SECS", default_value = "20")]
    timeout: u64,

    /// Launch browser in headed mode (default: headless)
    #[arg(long, short = 'H')]
    headed: bool,

    /// Path to custom browser executable
    #[arg(long, value_name = "PATH")]
    executable_path: Option<PathBuf>,

    /// Persistent browser profile directory
    #[arg(long, value_name = "DIR")]
    user_data_dir: Option<PathBuf>,

    /// Disable the Chrome sandbox (needed when running as root in containers)
    #[arg(long)]
    no_sandbox: bool,

    /// WebSocket endpoint of a running browser to use instead of launching one
    #[arg(long, value_name = "URL")]
    ws_endpoint: Option<String>,

    /// Log a summary of the emblems after saving
    #[arg(long)]
    summary: bool,

    /// Use a previously saved catalogue instead of loading the page
    #[arg(long, value_name = "PATH")]
    from_file: Option<PathBuf>,

    /// Search for the best ten-emblem set and print it
    #[arg(long)]
    optimize: bool,

    /// Stats to improve, comma separated (hp, atk, def, sp_atk, sp_def, crit_chance, mv_speed, cd_reduction)
    #[arg(long, value_delimiter = ',', default_value = "hp,mv_speed")]
    stats: Vec<Statistic>,

    /// Colours to stack, comma separated
    #[arg(long, value_delimiter = ',', default_value = "white,yellow")]
    colors: Vec<Color>,

    /// Generations to evolve
    #[arg(long, default_value_t = DEFAULT_GENERATIONS)]
    generations: usize,

    /// Seed for a reproducible search
    #[arg(long)]
    seed: Option<u64>,
}

impl Cli {
    fn scrape_config(&self) -> ScrapeConfig {
        ScrapeConfig::new()
            .url(normalize_url(&self.url))
            .selector(self.selector.as_str())
            .output(self.output.as_path())
            .format(if self.pretty { OutputFormat::Pretty } else { OutputFormat::Compact })
            .element_timeout(Duration::from_secs(self.timeout))
    }

    fn launch_options(&self) -> LaunchOptions {
        let mut options = LaunchOptions::new().headless(!self.headed).sandbox(!self.no_sandbox);

        if let Some(path) = &self.executable_path {
            options = options.chrome_path(path);
        }

        if let Some(dir) = &self.user_data_dir {
            options = options.user_data_dir(dir);
        }

        options
    }
}

/// Load the page (or the saved file) and return the decoded document
fn load_document(cli: &Cli) -> anyhow::Result<Value> {
    if let Some(path) = &cli.from_file {
        log::info!("Reading {}", path.display());
        return Ok(read_document(path)?);
    }

    let config = cli.scrape_config();
    let result = match &cli.ws_endpoint {
        Some(endpoint) => BrowserSession::connect(ConnectionOptions::new(endpoint))
            .and_then(|session| pipeline::run(&session, &config)),
        None => pipeline::fetch(cli.launch_options(), &config),
    };

    let report = match result {
        Ok(report) => report,
        Err(e) if e.is_lookup_failure() => {
            return Err(e).with_context(|| {
                format!("'{}' did not match on {}; the page layout may have changed", config.selector, config.url)
            });
        }
        Err(e) => return Err(e.into()),
    };

    log::info!(
        "Fetched {} ({} bytes of markup) in {:.2?}",
        report.url,
        report.fragment_len,
        report.elapsed
    );

    Ok(report.document)
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let document = load_document(&cli)?;
    let catalog = Catalog::from_document(&document);

    if cli.summary {
        match &catalog {
            Some(catalog) => log::info!("{}", catalog.summary()),
            None => log::info!("Document is not an emblem list, no summary available"),
        }
    }

    if cli.optimize {
        let catalog = catalog.context("Document is not an emblem list, nothing to optimize")?;
        let targets = Targets { stats: cli.stats.clone(), colors: cli.colors.clone() };
        let optimizer = Optimizer::new(Pool::gold(&catalog), targets).generations(cli.generations);

        let mut rng = match cli.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        log::info!("Optimizing over {} gold emblems", optimizer.pool().len());
        let distribution = optimizer.run(&mut rng)?;
        println!("{}", distribution);
    }

    Ok(())
}
