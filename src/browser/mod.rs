//! Browser session management
//!
//! A [`BrowserSession`] owns one Chrome/Chromium instance driven over the DevTools
//! protocol. The pipeline only sees it through the [`PageSource`] trait.

pub mod config;
pub mod session;
pub mod source;
pub mod utils;

pub use config::{ConnectionOptions, LaunchOptions};
pub use session::BrowserSession;
pub use source::PageSource;
pub use utils::normalize_url;
