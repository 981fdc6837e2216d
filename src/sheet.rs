use std::path::Path;

use anyhow::Context as _;
use rust_xlsxwriter::Workbook;

use crate::formats::{SHEET_HEADER, ScrapedRecord, SheetRow};

const SHEET_NAME: &str = "Scraped Data";

/// Single-sheet workbook that accumulates one row per record.
pub struct SheetWriter {
    workbook: Workbook,
    data_rows: u32,
}

impl SheetWriter {
    pub fn new() -> anyhow::Result<Self> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_NAME).context("name worksheet")?;
        for (col, title) in (0_u16..).zip(SHEET_HEADER) {
            sheet
                .write_string(0, col, title)
                .context("write header cell")?;
        }

        Ok(Self {
            workbook,
            data_rows: 0,
        })
    }

    pub fn data_rows(&self) -> u32 {
        self.data_rows
    }

    pub fn append(&mut self, record: &ScrapedRecord) -> anyhow::Result<()> {
        let row = SheetRow::from(record);
        let line = self.data_rows + 1;
        let sheet = self
            .workbook
            .worksheet_from_index(0)
            .context("get worksheet")?;

        // Ids stay far below 2^53, so the f64 cell is exact.
        sheet.write_number(line, 0, row.id as f64)?;
        sheet.write_string(line, 1, &row.title)?;
        sheet.write_string(line, 2, &row.category)?;
        sheet.write_string(line, 3, &row.src_url)?;
        sheet.write_string(line, 4, &row.gallery)?;
        sheet.write_number(line, 5, row.rating)?;
        sheet.write_string(line, 6, &row.link)?;

        self.data_rows += 1;
        Ok(())
    }

    pub fn save(&mut self, path: &Path) -> anyhow::Result<()> {
        self.workbook
            .save(path)
            .with_context(|| format!("save spreadsheet: {}", path.display()))
    }
}
