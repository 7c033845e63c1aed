//! xlsx rendering of a [`DiscrepancyReport`].
//!
//! Layout: a `Summary` sheet followed by `Shortages`, `Overages` and
//! `Wrong Locations`, each with one bold grey header row.

use chrono::{DateTime, Utc};
use rust_xlsxwriter::{Color, Format, Workbook, Worksheet, XlsxError};
use thiserror::Error;

use cyclecount_inventory::DiscrepancyReport;

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub const SUMMARY_SHEET: &str = "Summary";
pub const SHORTAGES_SHEET: &str = "Shortages";
pub const OVERAGES_SHEET: &str = "Overages";
pub const WRONG_LOCATIONS_SHEET: &str = "Wrong Locations";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const HEADER_FILL: u32 = 0xCCCCCC;
const SHORTAGE_FILL: u32 = 0xFFCCCC;
const OVERAGE_FILL: u32 = 0xFFFFCC;
const WRONG_LOCATION_FILL: u32 = 0xFFE5CC;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to render report workbook: {0}")]
    Xlsx(#[from] XlsxError),
}

/// `inventory_report_YYYYMMDD_HHMMSS.xlsx`
pub fn report_file_name(now: DateTime<Utc>) -> String {
    format!("inventory_report_{}.xlsx", now.format("%Y%m%d_%H%M%S"))
}

pub fn render_workbook(
    report: &DiscrepancyReport,
    generated_at: DateTime<Utc>,
) -> Result<Vec<u8>, ReportError> {
    let header = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(HEADER_FILL));

    let mut workbook = Workbook::new();
    workbook.push_worksheet(summary_sheet(report, generated_at)?);
    workbook.push_worksheet(shortages_sheet(report, &header)?);
    workbook.push_worksheet(overages_sheet(report, &header)?);
    workbook.push_worksheet(wrong_locations_sheet(report, &header)?);

    Ok(workbook.save_to_buffer()?)
}

fn summary_sheet(report: &DiscrepancyReport, generated_at: DateTime<Utc>) -> Result<Worksheet, XlsxError> {
    let mut sheet = Worksheet::new();
    sheet.set_name(SUMMARY_SHEET)?;
    sheet.set_column_width(0, 24)?;

    let title = Format::new().set_bold().set_font_size(14);
    sheet.write_string_with_format(0, 0, "Inventory Cycle Count Report", &title)?;
    sheet.write_string(1, 0, format!("Generated: {}", generated_at.format(TIMESTAMP_FORMAT)))?;

    let summary = &report.summary;
    let rows: [(&str, u64, Option<u32>); 5] = [
        ("Total Inventory Items:", summary.total_items, None),
        ("Items Scanned:", summary.matched_scans, None),
        ("Shortages:", summary.shortages, Some(SHORTAGE_FILL)),
        ("Overages:", summary.overages, Some(OVERAGE_FILL)),
        ("Wrong Locations:", summary.wrong_locations, Some(WRONG_LOCATION_FILL)),
    ];

    for (offset, (label, value, fill)) in rows.into_iter().enumerate() {
        let row = 3 + offset as u32;
        sheet.write_string(row, 0, label)?;
        match fill {
            Some(rgb) => {
                let format = Format::new().set_background_color(Color::RGB(rgb));
                sheet.write_number_with_format(row, 1, value as f64, &format)?;
            }
            None => {
                sheet.write_number(row, 1, value as f64)?;
            }
        }
    }

    Ok(sheet)
}

fn table_sheet(name: &str, headers: &[&str], header: &Format) -> Result<Worksheet, XlsxError> {
    let mut sheet = Worksheet::new();
    sheet.set_name(name)?;
    for (col, title) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, header)?;
        sheet.set_column_width(col as u16, 22)?;
    }
    Ok(sheet)
}

/// Writes a row of optional text cells; `None` leaves the cell blank.
fn write_row(sheet: &mut Worksheet, row: u32, cells: &[Option<&str>]) -> Result<(), XlsxError> {
    for (col, cell) in cells.iter().enumerate() {
        if let Some(text) = cell {
            sheet.write_string(row, col as u16, *text)?;
        }
    }
    Ok(())
}

fn shortages_sheet(report: &DiscrepancyReport, header: &Format) -> Result<Worksheet, XlsxError> {
    let mut sheet = table_sheet(
        SHORTAGES_SHEET,
        &["Instrument Number", "Manufacturer's Serial", "Description", "Expected Location"],
        header,
    )?;

    for (idx, item) in report.shortages.iter().enumerate() {
        write_row(
            &mut sheet,
            idx as u32 + 1,
            &[
                item.instrument_number.as_deref(),
                item.manufacturer_serial.as_deref(),
                Some(item.description.as_str()),
                Some(item.location.as_str()),
            ],
        )?;
    }
    Ok(sheet)
}

fn overages_sheet(report: &DiscrepancyReport, header: &Format) -> Result<Worksheet, XlsxError> {
    let mut sheet = table_sheet(OVERAGES_SHEET, &["Barcode", "Actual Location", "Scanned At"], header)?;

    for (idx, scan) in report.overages.iter().enumerate() {
        let scanned_at = scan.scanned_at().format(TIMESTAMP_FORMAT).to_string();
        write_row(
            &mut sheet,
            idx as u32 + 1,
            &[Some(scan.barcode()), scan.actual_location(), Some(scanned_at.as_str())],
        )?;
    }
    Ok(sheet)
}

fn wrong_locations_sheet(report: &DiscrepancyReport, header: &Format) -> Result<Worksheet, XlsxError> {
    let mut sheet = table_sheet(
        WRONG_LOCATIONS_SHEET,
        &[
            "Instrument Number",
            "Manufacturer's Serial",
            "Description",
            "Expected Location",
            "Actual Location",
            "Scanned At",
        ],
        header,
    )?;

    for (idx, entry) in report.wrong_locations.iter().enumerate() {
        let scanned_at = entry.scan.scanned_at().format(TIMESTAMP_FORMAT).to_string();
        write_row(
            &mut sheet,
            idx as u32 + 1,
            &[
                entry.item.instrument_number.as_deref(),
                entry.item.manufacturer_serial.as_deref(),
                Some(entry.item.description.as_str()),
                entry.scan.expected_location(),
                entry.scan.actual_location(),
                Some(scanned_at.as_str()),
            ],
        )?;
    }
    Ok(sheet)
}
