use std::time::Duration;

use anyhow::Context as _;
use async_trait::async_trait;
use thirtyfour::prelude::*;

use crate::error::ScrapeError;

const READY_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// What the harvester needs from a controllable browser.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    async fn current_url(&self) -> anyhow::Result<String>;

    /// Loads `url` and waits until the document body exists.
    async fn navigate(&mut self, url: &str) -> anyhow::Result<()>;

    /// Rendered markup of the current page.
    async fn page_source(&self) -> anyhow::Result<String>;

    /// Releases the browser. Calling it again is a no-op.
    async fn close(&mut self) -> anyhow::Result<()>;
}

#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub webdriver_url: String,
    pub headless: bool,
    pub ready_timeout: Duration,
}

/// Chrome driven over WebDriver.
pub struct ChromeSession {
    driver: Option<WebDriver>,
    ready_timeout: Duration,
}

impl ChromeSession {
    pub async fn launch(options: &LaunchOptions) -> anyhow::Result<Self> {
        let mut caps = DesiredCapabilities::chrome();
        caps.add_arg("--start-maximized")
            .context("set chrome start-maximized")?;
        if options.headless {
            caps.set_headless().context("set chrome headless")?;
        }

        tracing::info!(webdriver = %options.webdriver_url, headless = options.headless, "launching browser");
        let driver = WebDriver::new(options.webdriver_url.as_str(), caps)
            .await
            .with_context(|| format!("connect to webdriver: {}", options.webdriver_url))?;

        Ok(Self {
            driver: Some(driver),
            ready_timeout: options.ready_timeout,
        })
    }

    fn driver(&self) -> anyhow::Result<&WebDriver> {
        self.driver
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("browser session already closed"))
    }
}

#[async_trait]
impl BrowserSession for ChromeSession {
    async fn current_url(&self) -> anyhow::Result<String> {
        let url = self
            .driver()?
            .current_url()
            .await
            .context("read current url")?;
        Ok(url.to_string())
    }

    async fn navigate(&mut self, url: &str) -> anyhow::Result<()> {
        let timeout = self.ready_timeout;
        let driver = self.driver()?;
        driver
            .goto(url)
            .await
            .with_context(|| format!("navigate: {url}"))?;

        driver
            .query(By::Tag("body"))
            .wait(timeout, READY_POLL_INTERVAL)
            .first()
            .await
            .map_err(|err| ScrapeError::NavigationTimeout {
                url: url.to_owned(),
                timeout_secs: timeout.as_secs(),
                reason: err.to_string(),
            })?;

        Ok(())
    }

    async fn page_source(&self) -> anyhow::Result<String> {
        self.driver()?.source().await.context("read page source")
    }

    async fn close(&mut self) -> anyhow::Result<()> {
        if let Some(driver) = self.driver.take() {
            driver.quit().await.context("quit browser")?;
            tracing::info!("browser closed");
        }
        Ok(())
    }
}
