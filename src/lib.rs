//! # boost-emblems
//!
//! Fetches the boost emblem catalogue from <https://unite-db.com/boost-emblems>
//! through a Chrome/Chromium instance driven over the DevTools protocol (CDP),
//! and saves the JSON embedded in the page to a local file.
//!
//! ## Pipeline
//!
//! 1. [`BrowserSession`] launches (or attaches to) a browser
//! 2. the page is loaded and the target element awaited
//! 3. the element's inner markup is read as a [`Fragment`]
//! 4. the fragment is decoded as JSON
//! 5. the document is written to disk, replacing the previous file
//! 6. the session is released, also when an earlier step failed
//!
//! ## Usage
//!
//! ```rust,no_run
//! use boost_emblems::{LaunchOptions, ScrapeConfig, pipeline};
//!
//! # fn main() -> boost_emblems::Result<()> {
//! let report = pipeline::fetch(LaunchOptions::default(), &ScrapeConfig::default())?;
//! println!("Saved {} bytes to {}", report.bytes_written, report.output.display());
//! # Ok(())
//! # }
//! ```
//!
//! The saved catalogue can then be searched for the best emblem set:
//!
//! ```rust,no_run
//! use boost_emblems::{Catalog, Optimizer, Pool, Targets, read_document};
//!
//! # fn main() -> boost_emblems::Result<()> {
//! let document = read_document(std::path::Path::new("data.json"))?;
//! let catalog = Catalog::from_document(&document).expect("emblem list");
//! let best = Optimizer::new(Pool::gold(&catalog), Targets::default()).run(&mut rand::thread_rng())?;
//! println!("{}", best);
//! # Ok(())
//! # }
//! ```
//!
//! Anything implementing [`PageSource`] can stand in for the browser:
//!
//! ```rust,no_run
//! use boost_emblems::{BrowserSession, ConnectionOptions, ScrapeConfig, pipeline};
//!
//! # fn main() -> boost_emblems::Result<()> {
//! let session = BrowserSession::connect(ConnectionOptions::new("ws://127.0.0.1:9222/devtools/browser/id"))?;
//! pipeline::run(&session, &ScrapeConfig::default().output("emblems.json"))?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`browser`]: browser session management and configuration
//! - [`extract`]: fragment extraction and JSON decoding
//! - [`output`]: writing the document to disk
//! - [`pipeline`]: the end to end run
//! - [`emblem`]: typed view of the emblem catalogue for run summaries
//! - [`distribution`]: genetic search for the best ten-emblem set
//! - [`error`]: error types and result alias

pub mod browser;
pub mod distribution;
pub mod emblem;
pub mod error;
pub mod extract;
pub mod output;
pub mod pipeline;

pub use browser::{BrowserSession, ConnectionOptions, LaunchOptions, PageSource};
pub use distribution::{Distribution, Optimizer, Pool, Statistic, Targets};
pub use emblem::{Catalog, Color, Emblem, Grade, Stats, Summary};
pub use error::{Result, ScrapeError};
pub use extract::{Fragment, decode, extract_fragment};
pub use output::{OutputFormat, read_document, write_document};
pub use pipeline::{RunReport, ScrapeConfig};
