use std::fs::File;
use std::io::{BufWriter, Write as _};
use std::path::Path;

use anyhow::Context as _;
use serde::Serialize as _;

use crate::error::ScrapeError;
use crate::formats::ScrapedRecord;
use crate::sheet::SheetWriter;

/// Writes the spreadsheet and then the JSON document.
///
/// A JSON failure is logged and swallowed. A spreadsheet failure is returned,
/// but only after the JSON has been attempted.
pub fn persist(
    sheet: &mut SheetWriter,
    sheet_path: &Path,
    records: &[ScrapedRecord],
    json_path: &Path,
) -> anyhow::Result<()> {
    let sheet_result = sheet.save(sheet_path);
    match &sheet_result {
        Ok(()) => tracing::info!(path = %sheet_path.display(), rows = sheet.data_rows(), "spreadsheet saved"),
        Err(err) => tracing::error!(error = %format!("{err:#}"), "spreadsheet not saved"),
    }

    match write_json(records, json_path) {
        Ok(()) => tracing::info!(path = %json_path.display(), records = records.len(), "json saved"),
        Err(err) => tracing::error!(error = %err, "json not saved"),
    }

    sheet_result
}

/// Pretty-printed JSON array with four-space indentation.
pub fn write_json(records: &[ScrapedRecord], path: &Path) -> Result<(), ScrapeError> {
    encode_json(records, path).map_err(|err| ScrapeError::Persistence {
        path: path.to_path_buf(),
        reason: format!("{err:#}"),
    })
}

fn encode_json(records: &[ScrapedRecord], path: &Path) -> anyhow::Result<()> {
    let file = File::create(path).context("create json file")?;
    let mut out = BufWriter::new(file);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    records
        .serialize(&mut serializer)
        .context("serialize records")?;
    out.flush().context("flush json file")?;
    Ok(())
}
