//! Inventory spreadsheet ingestion.
//!
//! `.csv` uploads go through the CSV reader; everything else is handed to the
//! workbook reader, which sniffs xlsx/xlsm/xlsb/xls/ods from the bytes.

mod csv;
mod workbook;

use thiserror::Error;

use cyclecount_inventory::{InventoryItemCandidate, InventoryRow};

/// UTF-8 BOM bytes.
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("uploaded file is empty")]
    Empty,

    #[error("invalid CSV: {0}")]
    Csv(String),

    #[error("invalid spreadsheet: {0}")]
    Workbook(String),

    #[error("spreadsheet has no worksheets")]
    NoWorksheet,
}

/// Accepted rows plus the number of non-blank rows dropped for lacking
/// identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedInventory {
    pub items: Vec<InventoryItemCandidate>,
    pub skipped: usize,
}

impl FromIterator<InventoryRow> for ParsedInventory {
    fn from_iter<T: IntoIterator<Item = InventoryRow>>(rows: T) -> Self {
        let mut parsed = ParsedInventory::default();
        for row in rows {
            match InventoryItemCandidate::from_row(row) {
                Ok(item) => parsed.items.push(item),
                Err(_) => parsed.skipped += 1,
            }
        }
        parsed
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UploadFormat {
    Csv,
    Workbook,
}

impl UploadFormat {
    pub fn from_file_name(file_name: &str) -> Self {
        if file_name.to_ascii_lowercase().ends_with(".csv") {
            UploadFormat::Csv
        } else {
            UploadFormat::Workbook
        }
    }
}

/// Parse an uploaded inventory file into normalized item candidates.
pub fn parse_upload(file_name: &str, data: &[u8]) -> Result<ParsedInventory, IngestError> {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    if data.is_empty() {
        return Err(IngestError::Empty);
    }

    let rows = match UploadFormat::from_file_name(file_name) {
        UploadFormat::Csv => csv::read_rows(data)?,
        UploadFormat::Workbook => workbook::read_rows(data)?,
    };

    // Blank rows are layout, not data; neither reader counts them as skipped.
    Ok(rows.into_iter().filter(|row| !row.is_blank()).collect())
}
