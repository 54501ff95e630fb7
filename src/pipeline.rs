//! The fetch pipeline: load the page, extract the fragment, decode it, write it.
//!
//! Every step returns a [`Result`]; a failure before the write step leaves the
//! output file untouched.

use crate::browser::{BrowserSession, LaunchOptions, PageSource};
use crate::error::Result;
use crate::extract::{decode, extract_fragment};
use crate::output::{OutputFormat, write_document};
use serde_json::Value;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Page that lists the boost emblems
pub const DEFAULT_URL: &str = "https://unite-db.com/boost-emblems";

/// Element holding the emblem data as JSON text
pub const DEFAULT_SELECTOR: &str = "section.content > div:first-child";

pub const DEFAULT_OUTPUT: &str = "data.json";

pub const DEFAULT_ELEMENT_TIMEOUT: Duration = Duration::from_secs(20);

/// What to fetch and where to put it
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub url: String,
    pub selector: String,
    pub output: PathBuf,
    pub format: OutputFormat,

    /// How long to wait for the selector to match after the page has loaded
    pub element_timeout: Duration,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            selector: DEFAULT_SELECTOR.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            format: OutputFormat::default(),
            element_timeout: DEFAULT_ELEMENT_TIMEOUT,
        }
    }
}

impl ScrapeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = selector.into();
        self
    }

    pub fn output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn element_timeout(mut self, timeout: Duration) -> Self {
        self.element_timeout = timeout;
        self
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub url: String,
    pub selector: String,
    pub output: PathBuf,
    pub fragment_len: usize,
    pub bytes_written: u64,
    pub elapsed: Duration,
    pub document: Value,
}

/// Run the pipeline against an already opened page source
pub fn run<S: PageSource>(source: &S, config: &ScrapeConfig) -> Result<RunReport> {
    let started = Instant::now();

    log::info!("Loading {}", config.url);
    source.load(&config.url)?;

    let fragment = extract_fragment(source, &config.selector, config.element_timeout)?;
    let document = decode(&fragment)?;

    let bytes_written = write_document(&config.output, &document, config.format)?;
    log::info!("Saved {} bytes to {}", bytes_written, config.output.display());

    Ok(RunReport {
        url: config.url.clone(),
        selector: config.selector.clone(),
        output: config.output.clone(),
        fragment_len: fragment.len(),
        bytes_written,
        elapsed: started.elapsed(),
        document,
    })
}

/// Launch a browser, run the pipeline and release the browser again.
///
/// The session is dropped on every path, including failures.
pub fn fetch(launch: LaunchOptions, config: &ScrapeConfig) -> Result<RunReport> {
    let session = BrowserSession::launch(launch)?;
    let report = run(&session, config);

    if let Err(e) = session.close() {
        log::warn!("{}", e);
    }

    report
}
