use anyhow::Context as _;
use scraper::{ElementRef, Html, Selector};
use url::Url;

pub const TITLE_NOT_FOUND: &str = "Title not found";
pub const DESCRIPTION_NOT_FOUND: &str = "Description not found";

const LISTING_CONTAINER: &str =
    "div.grid.grid--uniform.grid--scattered-large-4.grid--scattered-small-1";
const LISTING_LINK: &str = "a[href]";
const DETAIL_TITLE: &str = "h1.product-single__title";
const DETAIL_DESCRIPTION: &str = "div.collapsible-content__inner.rte";
const DETAIL_GALLERY: &str = "div.product__main-photos.aos-init.aos-animate";
const GALLERY_IMAGE: &str = "img[src]";

/// Compiled selectors for the product site's markup.
#[derive(Debug)]
pub struct Selectors {
    listing_container: Selector,
    listing_link: Selector,
    title: Selector,
    description: Selector,
    gallery: Selector,
    gallery_image: Selector,
}

impl Selectors {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            listing_container: parse_selector(LISTING_CONTAINER)?,
            listing_link: parse_selector(LISTING_LINK)?,
            title: parse_selector(DETAIL_TITLE)?,
            description: parse_selector(DETAIL_DESCRIPTION)?,
            gallery: parse_selector(DETAIL_GALLERY)?,
            gallery_image: parse_selector(GALLERY_IMAGE)?,
        })
    }
}

fn parse_selector(css: &str) -> anyhow::Result<Selector> {
    Selector::parse(css).map_err(|err| anyhow::anyhow!("parse selector {css:?}: {err}"))
}

/// Fields read from a product detail page. Missing title or description
/// fall back to placeholder text rather than failing the item.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailPage {
    pub title: String,
    pub description: String,
    pub image_urls: Vec<String>,
}

/// Hrefs inside the listing container in document order, duplicates kept.
/// `None` means the page has no listing container, i.e. nothing left to harvest.
pub fn listing_links(html: &str, selectors: &Selectors) -> Option<Vec<String>> {
    let document = Html::parse_document(html);
    let container = document.select(&selectors.listing_container).next()?;

    let links = container
        .select(&selectors.listing_link)
        .filter_map(|anchor| anchor.value().attr("href"))
        .map(str::to_owned)
        .collect();
    Some(links)
}

pub fn detail_page(html: &str, selectors: &Selectors) -> DetailPage {
    let document = Html::parse_document(html);

    let title = document
        .select(&selectors.title)
        .next()
        .map(|element| stripped_text(element, ""))
        .unwrap_or_else(|| TITLE_NOT_FOUND.to_owned());

    let description = document
        .select(&selectors.description)
        .next()
        .map(|element| stripped_text(element, "\n"))
        .unwrap_or_else(|| DESCRIPTION_NOT_FOUND.to_owned());

    let image_urls = document
        .select(&selectors.gallery)
        .next()
        .map(|gallery| {
            gallery
                .select(&selectors.gallery_image)
                .filter_map(|img| img.value().attr("src"))
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default();

    DetailPage {
        title,
        description,
        image_urls,
    }
}

/// Resolves an href from the site against its origin.
pub fn resolve_link(origin: &Url, href: &str) -> anyhow::Result<Url> {
    origin
        .join(href.trim())
        .with_context(|| format!("resolve link {href:?} against {origin}"))
}

fn stripped_text(element: ElementRef<'_>, separator: &str) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}
