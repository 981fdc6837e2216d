use serde::{Deserialize, Serialize};

pub const SHEET_HEADER: [&str; 7] = [
    "ID", "Title", "Category", "SrcUrl", "Gallery", "Rating", "Link",
];

/// One harvested product. Built once per new link and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedRecord {
    pub id: u64,
    pub title: String,
    pub category: String,
    pub description: String,
    pub src_url: Option<String>,
    pub gallery: Vec<String>,
    pub rating: f64,
    pub link: String,
}

/// Positional projection of a record into spreadsheet columns.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow {
    pub id: u64,
    pub title: String,
    pub category: String,
    pub src_url: String,
    pub gallery: String,
    pub rating: f64,
    pub link: String,
}

impl From<&ScrapedRecord> for SheetRow {
    fn from(record: &ScrapedRecord) -> Self {
        Self {
            id: record.id,
            title: record.title.clone(),
            category: record.category.clone(),
            src_url: record.src_url.clone().unwrap_or_default(),
            gallery: record.gallery.join(", "),
            rating: record.rating,
            link: record.link.clone(),
        }
    }
}
