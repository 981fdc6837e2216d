use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use url::Url;

use crate::browser::{BrowserSession, ChromeSession, LaunchOptions};
use crate::cli::Cli;
use crate::extract::{self, Selectors};
use crate::formats::ScrapedRecord;
use crate::images::ImageFetcher;
use crate::layout::{self, OutputLayout};
use crate::ledger::LinkLedger;
use crate::prompt::{self, Confirm, StdinConfirm};
use crate::rating::{self, RandomRating, RatingSource};
use crate::sheet::SheetWriter;

pub const START_PROMPT: &str =
    "Navigate to the desired page in the browser and press Enter to start scraping...";
pub const NEXT_PAGE_PROMPT: &str = "Navigate to the next page in the browser and press Enter...";

#[derive(Debug, Clone)]
pub struct HarvestConfig {
    pub category: String,
    pub origin: Url,
    pub layout: OutputLayout,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestSummary {
    /// Records produced this run.
    pub records: usize,
    /// Links skipped because the ledger already had them.
    pub skipped: usize,
    /// Listing pages that had a listing container.
    pub pages: usize,
    /// True when the loop ended on an error instead of running out of pages.
    pub aborted: bool,
}

enum Phase {
    /// Waiting for the person to put the browser on a listing page.
    Listing { prompt: &'static str },
    /// Visiting the unseen links of the current listing page.
    Harvesting,
    Done,
}

/// Mutable state of one run.
struct Run<'a> {
    config: &'a HarvestConfig,
    selectors: Selectors,
    fetcher: &'a ImageFetcher,
    ledger: LinkLedger,
    sheet: SheetWriter,
    records: Vec<ScrapedRecord>,
    summary: HarvestSummary,
}

pub async fn run(args: Cli) -> anyhow::Result<()> {
    let origin = Url::parse(&args.origin).context("parse --origin")?;
    if origin.scheme() != "http" && origin.scheme() != "https" {
        anyhow::bail!("--origin must be http/https: {origin}");
    }

    let category = match args.category {
        Some(category) if !category.trim().is_empty() => category.trim().to_owned(),
        Some(_) => anyhow::bail!("--category must not be empty"),
        None => prompt::ask_category().context("read category")?,
    };

    let config = HarvestConfig {
        category,
        origin: origin.clone(),
        layout: OutputLayout::new(PathBuf::from(&args.out)),
    };
    let fetcher = ImageFetcher::new(origin)?;

    let mut browser = ChromeSession::launch(&LaunchOptions {
        webdriver_url: args.webdriver,
        headless: args.headless,
        ready_timeout: Duration::from_secs(args.page_timeout_secs),
    })
    .await
    .context("launch browser")?;

    let summary = harvest(
        &config,
        &mut browser,
        &fetcher,
        &mut StdinConfirm,
        &mut RandomRating::new(),
    )
    .await?;

    println!(
        "Scraped {} new item(s); data saved to {} and {}",
        summary.records,
        config.layout.sheet_path(&config.category).display(),
        config.layout.json_path(&config.category).display(),
    );
    Ok(())
}

/// Runs the interactive harvest for one category.
///
/// The browser is closed and whatever was accumulated is persisted however
/// the loop ends. Errors inside the loop are logged and reported through
/// `HarvestSummary::aborted`; only setup and spreadsheet failures are returned.
pub async fn harvest(
    config: &HarvestConfig,
    browser: &mut dyn BrowserSession,
    fetcher: &ImageFetcher,
    confirm: &mut dyn Confirm,
    rating: &mut dyn RatingSource,
) -> anyhow::Result<HarvestSummary> {
    let prepared = prepare(config, fetcher);
    let mut run = match prepared {
        Ok(run) => run,
        Err(err) => {
            close_browser(browser).await;
            return Err(err);
        }
    };

    let outcome = run.pages(browser, confirm, rating).await;
    if let Err(err) = &outcome {
        run.summary.aborted = true;
        tracing::error!(error = %format!("{err:#}"), "harvest stopped on error");
    }

    close_browser(browser).await;

    let category = &config.category;
    crate::sink::persist(
        &mut run.sheet,
        &config.layout.sheet_path(category),
        &run.records,
        &config.layout.json_path(category),
    )?;

    tracing::info!(
        records = run.summary.records,
        skipped = run.summary.skipped,
        pages = run.summary.pages,
        aborted = run.summary.aborted,
        "harvest finished"
    );
    Ok(run.summary)
}

fn prepare<'a>(config: &'a HarvestConfig, fetcher: &'a ImageFetcher) -> anyhow::Result<Run<'a>> {
    let category = &config.category;
    let ledger = LinkLedger::load(config.layout.ledger_path(category))?;

    let image_dir = config.layout.category_image_dir(category);
    std::fs::create_dir_all(&image_dir)
        .with_context(|| format!("create image dir: {}", image_dir.display()))?;

    Ok(Run {
        config,
        selectors: Selectors::new()?,
        fetcher,
        ledger,
        sheet: SheetWriter::new()?,
        records: Vec::new(),
        summary: HarvestSummary::default(),
    })
}

async fn close_browser(browser: &mut dyn BrowserSession) {
    if let Err(err) = browser.close().await {
        tracing::warn!(error = %format!("{err:#}"), "browser did not close cleanly");
    }
}

impl Run<'_> {
    async fn pages(
        &mut self,
        browser: &mut dyn BrowserSession,
        confirm: &mut dyn Confirm,
        rating: &mut dyn RatingSource,
    ) -> anyhow::Result<()> {
        let mut phase = Phase::Listing {
            prompt: START_PROMPT,
        };

        loop {
            phase = match phase {
                Phase::Listing { prompt } => {
                    confirm.confirm(prompt).context("wait for confirmation")?;
                    Phase::Harvesting
                }
                Phase::Harvesting => {
                    if self.listing_page(browser, rating).await? {
                        Phase::Listing {
                            prompt: NEXT_PAGE_PROMPT,
                        }
                    } else {
                        Phase::Done
                    }
                }
                Phase::Done => return Ok(()),
            };
        }
    }

    /// Harvests the page the browser is on. Returns false when the page has
    /// no listing container.
    async fn listing_page(
        &mut self,
        browser: &mut dyn BrowserSession,
        rating: &mut dyn RatingSource,
    ) -> anyhow::Result<bool> {
        let page_url = browser.current_url().await?;
        tracing::info!(url = %page_url, "scraping listing page");
        browser.navigate(&page_url).await?;
        let html = browser.page_source().await?;

        let Some(hrefs) = extract::listing_links(&html, &self.selectors) else {
            tracing::info!(url = %page_url, "no more content to scrape");
            return Ok(false);
        };
        self.summary.pages += 1;
        tracing::info!(links = hrefs.len(), "extracted links");

        for href in hrefs {
            let link = match extract::resolve_link(&self.config.origin, &href) {
                Ok(url) => url.to_string(),
                Err(err) => {
                    tracing::warn!(href = %href, error = %format!("{err:#}"), "skipping unresolvable link");
                    self.summary.skipped += 1;
                    continue;
                }
            };
            if self.ledger.contains(&link) {
                tracing::info!(url = %link, "skipping already scraped link");
                self.summary.skipped += 1;
                continue;
            }
            self.item(browser, rating, link).await?;
        }

        Ok(true)
    }

    async fn item(
        &mut self,
        browser: &mut dyn BrowserSession,
        rating: &mut dyn RatingSource,
        link: String,
    ) -> anyhow::Result<()> {
        tracing::info!(url = %link, "opening item");
        browser.navigate(&link).await?;
        let html = browser.page_source().await?;
        let detail = extract::detail_page(&html, &self.selectors);

        let category = &self.config.category;
        let folder = layout::sanitize_title(&detail.title);
        let dest_dir = self.config.layout.item_image_dir(category, &folder);

        let mut gallery = Vec::new();
        for (index, image_url) in detail.image_urls.iter().enumerate() {
            let file_name = layout::image_file_name(index);
            if self
                .fetcher
                .fetch(image_url, &dest_dir, &file_name)
                .await
                .is_some()
            {
                gallery.push(layout::public_image_path(category, &folder, &file_name));
            }
        }

        let record = ScrapedRecord {
            id: self.records.len() as u64 + 1,
            title: detail.title,
            category: category.clone(),
            description: detail.description,
            src_url: gallery.first().cloned(),
            gallery,
            rating: rating::normalize_rating(rating.next_rating()),
            link,
        };

        self.sheet.append(&record)?;
        let link = record.link.clone();
        tracing::info!(id = record.id, url = %link, "saved item");
        self.records.push(record);
        self.summary.records += 1;

        self.ledger.record(&link)?;
        Ok(())
    }
}
