use std::io::Cursor;

use calamine::{Data, DataType, Reader, open_workbook_auto_from_rs};

use cyclecount_inventory::InventoryRow;

use super::IngestError;

/// Date cells read as `YYYY-MM-DD HH:MM:SS`, matching how the sheets were
/// previously exported to text.
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Column positions of the recognized headers in the first row.
#[derive(Debug, Default)]
struct HeaderMap {
    instrument_number: Option<usize>,
    manufacturer_serial: Option<usize>,
    description: Option<usize>,
    location: Option<usize>,
}

impl HeaderMap {
    fn from_cells(cells: &[Data]) -> Self {
        let mut map = HeaderMap::default();
        for (idx, cell) in cells.iter().enumerate() {
            let Some(name) = cell_text(cell) else { continue };
            // First occurrence wins on repeated headers.
            let slot = match name.as_str() {
                InventoryRow::INSTRUMENT_NUMBER => &mut map.instrument_number,
                InventoryRow::MANUFACTURER_SERIAL => &mut map.manufacturer_serial,
                InventoryRow::DESCRIPTION => &mut map.description,
                InventoryRow::LOCATION => &mut map.location,
                _ => continue,
            };
            slot.get_or_insert(idx);
        }
        map
    }

    fn row(&self, cells: &[Data]) -> InventoryRow {
        let get = |col: Option<usize>| col.and_then(|c| cells.get(c)).and_then(cell_text);
        InventoryRow {
            instrument_number: get(self.instrument_number),
            manufacturer_serial: get(self.manufacturer_serial),
            description: get(self.description),
            location: get(self.location),
        }
    }
}

/// Read the first worksheet; row one is the header.
pub(super) fn read_rows(data: &[u8]) -> Result<Vec<InventoryRow>, IngestError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(data.to_vec()))
        .map_err(|e| IngestError::Workbook(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(IngestError::NoWorksheet)?
        .map_err(|e| IngestError::Workbook(e.to_string()))?;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(Vec::new());
    };
    let headers = HeaderMap::from_cells(header);

    Ok(rows.map(|cells| headers.row(cells)).collect())
}

/// Render a cell the way it reads in the sheet; blank and error cells are absent.
fn cell_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty | Data::Error(_) => return None,
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        // Identifier columns typed as numbers come back as floats.
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::DateTime(serial) => match cell.as_datetime() {
            Some(datetime) => datetime.format(DATETIME_FORMAT).to_string(),
            None => serial.as_f64().to_string(),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
        other => other.to_string().trim().to_string(),
    };
    (!text.is_empty()).then_some(text)
}
