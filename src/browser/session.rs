use crate::browser::config::{ConnectionOptions, LaunchOptions};
use crate::browser::source::PageSource;
use crate::error::{Result, ScrapeError};
use headless_chrome::{Browser, Tab};
use std::{ffi::OsStr, sync::Arc, time::Duration};

/// Returns the element's inner markup; evaluated with the element bound to `this`
const INNER_HTML_FN: &str = "function() { return this.innerHTML; }";

/// Browser session that owns a Chrome/Chromium instance and the tab it works in.
///
/// The tab is closed when the session is dropped, and dropping the underlying
/// [`Browser`] terminates a process this session launched, so the browser is
/// released on every exit path.
pub struct BrowserSession {
    browser: Browser,
    tab: Arc<Tab>,
    closed: bool,
}

impl BrowserSession {
    /// Launch a new browser instance with the given options
    pub fn launch(options: LaunchOptions) -> Result<Self> {
        let mut launch_opts = headless_chrome::LaunchOptions::default();

        // Some sites serve a different page to automated browsers
        launch_opts.ignore_default_args.push(OsStr::new("--enable-automation"));
        launch_opts.args.push(OsStr::new("--disable-blink-features=AutomationControlled"));

        launch_opts.headless = options.headless;
        launch_opts.sandbox = options.sandbox;
        launch_opts.window_size = Some((options.window_width, options.window_height));
        launch_opts.idle_browser_timeout = options.idle_timeout;
        launch_opts.path = options.chrome_path;
        launch_opts.user_data_dir = options.user_data_dir;

        let browser = Browser::new(launch_opts).map_err(|e| ScrapeError::LaunchFailed(format!("{:#}", e)))?;

        let tab = browser
            .new_tab()
            .map_err(|e| ScrapeError::LaunchFailed(format!("Failed to create tab: {:#}", e)))?;

        log::debug!("Browser launched (headless: {})", options.headless);

        Ok(Self { browser, tab, closed: false })
    }

    /// Connect to an existing browser instance via WebSocket.
    ///
    /// The session works in a tab of its own and only closes that tab on teardown.
    pub fn connect(options: ConnectionOptions) -> Result<Self> {
        let browser =
            Browser::connect(options.ws_url.clone()).map_err(|e| ScrapeError::ConnectionFailed(format!("{:#}", e)))?;

        let tab = browser
            .new_tab()
            .map_err(|e| ScrapeError::ConnectionFailed(format!("Failed to create tab: {:#}", e)))?;

        log::debug!("Connected to browser at {}", options.ws_url);

        Ok(Self { browser, tab, closed: false })
    }

    /// Get the tab this session works in
    pub fn tab(&self) -> &Arc<Tab> {
        &self.tab
    }

    /// Get the underlying Browser instance
    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    /// Navigate to a URL and wait for the navigation to complete
    pub fn navigate(&self, url: &str) -> Result<()> {
        self.tab
            .navigate_to(url)
            .map_err(|e| ScrapeError::NavigationFailed(format!("Failed to navigate to {}: {:#}", url, e)))?;

        self.tab
            .wait_until_navigated()
            .map_err(|e| ScrapeError::NavigationFailed(format!("Navigation to {} did not complete: {:#}", url, e)))?;

        Ok(())
    }

    /// Wait until an element matching the CSS selector exists
    pub fn wait_for_element(&self, css_selector: &str, timeout: Duration) -> Result<headless_chrome::Element<'_>> {
        self.tab
            .wait_for_element_with_custom_timeout(css_selector, timeout)
            .map_err(|e| ScrapeError::ElementNotFound(format!("Element '{}' not found: {:#}", css_selector, e)))
    }

    /// Read the inner markup of the first element matching the CSS selector
    pub fn inner_html(&self, css_selector: &str, timeout: Duration) -> Result<String> {
        let element = self.wait_for_element(css_selector, timeout)?;

        let result = element
            .call_js_fn(INNER_HTML_FN, vec![], false)
            .map_err(|e| ScrapeError::EvaluationFailed(format!("{:#}", e)))?;

        match result.value {
            Some(serde_json::Value::String(html)) => Ok(html),
            other => Err(ScrapeError::EvaluationFailed(format!(
                "Expected innerHTML of '{}' to be a string, got {:?}",
                css_selector, other
            ))),
        }
    }

    /// Close the session's tab. Dropping the session does the same.
    pub fn close(mut self) -> Result<()> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        self.tab
            .close(false)
            .map_err(|e| ScrapeError::TabOperationFailed(format!("Failed to close tab: {:#}", e)))?;

        log::debug!("Browser session closed");
        Ok(())
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            log::warn!("{}", e);
        }
    }
}

impl PageSource for BrowserSession {
    fn load(&self, url: &str) -> Result<()> {
        self.navigate(url)
    }

    fn inner_html(&self, selector: &str, timeout: Duration) -> Result<String> {
        BrowserSession::inner_html(self, selector, timeout)
    }
}
