use crate::error::Result;
use std::time::Duration;

/// Something a page fragment can be read from.
///
/// [`BrowserSession`](super::BrowserSession) is the real implementation; tests use
/// an in-memory page instead.
pub trait PageSource {
    /// Load `url` and block until the document is ready to be queried
    fn load(&self, url: &str) -> Result<()>;

    /// Inner markup of the first element matching `selector`, waiting up to `timeout`
    /// for it to appear
    fn inner_html(&self, selector: &str, timeout: Duration) -> Result<String>;
}
