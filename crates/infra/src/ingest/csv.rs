use cyclecount_inventory::InventoryRow;

use super::IngestError;

/// Read CSV rows keyed by header name. Unknown columns are ignored and
/// missing ones read as absent.
pub(super) fn read_rows(data: &[u8]) -> Result<Vec<InventoryRow>, IngestError> {
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(::csv::Trim::All)
        .from_reader(data);

    reader
        .deserialize::<InventoryRow>()
        .enumerate()
        .map(|(idx, row)| {
            // Header is line 1.
            row.map_err(|e| IngestError::Csv(format!("line {}: {e}", idx + 2)))
        })
        .collect()
}
