//! Table definitions. Every statement is idempotent.

pub const CREATE_INVENTORY: &str = r#"
CREATE TABLE IF NOT EXISTS inventory (
    id BIGSERIAL PRIMARY KEY,
    instrument_number TEXT,
    manufacturer_serial TEXT,
    description TEXT NOT NULL DEFAULT '',
    location TEXT NOT NULL DEFAULT '',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

pub const CREATE_SCANS: &str = r#"
CREATE TABLE IF NOT EXISTS scans (
    id BIGSERIAL PRIMARY KEY,
    barcode TEXT NOT NULL,
    matched BOOLEAN NOT NULL,
    inventory_id BIGINT REFERENCES inventory(id),
    expected_location TEXT,
    actual_location TEXT,
    status TEXT NOT NULL,
    scanned_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

pub const CREATE_INDEXES: [&str; 3] = [
    "CREATE INDEX IF NOT EXISTS inventory_instrument_number_idx ON inventory (instrument_number)",
    "CREATE INDEX IF NOT EXISTS inventory_manufacturer_serial_idx ON inventory (manufacturer_serial)",
    "CREATE INDEX IF NOT EXISTS scans_inventory_id_idx ON scans (inventory_id)",
];

/// Statements in dependency order (scans references inventory).
pub fn statements() -> impl Iterator<Item = &'static str> {
    [CREATE_INVENTORY, CREATE_SCANS]
        .into_iter()
        .chain(CREATE_INDEXES)
}
