use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cyclecount_core::{DomainError, DomainResult, Entity, InventoryItemId};

/// One row of an uploaded inventory spreadsheet, before normalization.
///
/// Every column is optional; the serde names are the spreadsheet headers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InventoryRow {
    #[serde(rename = "Instrument Number", default)]
    pub instrument_number: Option<String>,
    #[serde(rename = "Manufacturer's Serial", default)]
    pub manufacturer_serial: Option<String>,
    #[serde(rename = "Description", default)]
    pub description: Option<String>,
    #[serde(rename = "Location", default)]
    pub location: Option<String>,
}

impl InventoryRow {
    pub const INSTRUMENT_NUMBER: &'static str = "Instrument Number";
    pub const MANUFACTURER_SERIAL: &'static str = "Manufacturer's Serial";
    pub const DESCRIPTION: &'static str = "Description";
    pub const LOCATION: &'static str = "Location";

    /// True when every recognized column is absent or whitespace.
    pub fn is_blank(&self) -> bool {
        [
            &self.instrument_number,
            &self.manufacturer_serial,
            &self.description,
            &self.location,
        ]
        .into_iter()
        .all(|field| field.as_deref().is_none_or(|s| s.trim().is_empty()))
    }
}

/// A validated inventory row, ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryItemCandidate {
    instrument_number: Option<String>,
    manufacturer_serial: Option<String>,
    description: String,
    location: String,
}

impl InventoryItemCandidate {
    /// Normalize a raw row: trim every field, treat blanks as absent.
    ///
    /// Rows carrying neither an instrument number nor a manufacturer's serial
    /// cannot be matched by any scan and are rejected.
    pub fn from_row(row: InventoryRow) -> DomainResult<Self> {
        let instrument_number = non_blank(row.instrument_number);
        let manufacturer_serial = non_blank(row.manufacturer_serial);

        if instrument_number.is_none() && manufacturer_serial.is_none() {
            return Err(DomainError::validation(
                "row has neither an instrument number nor a manufacturer's serial",
            ));
        }

        Ok(Self {
            instrument_number,
            manufacturer_serial,
            description: non_blank(row.description).unwrap_or_default(),
            location: non_blank(row.location).unwrap_or_default(),
        })
    }

    pub fn instrument_number(&self) -> Option<&str> {
        self.instrument_number.as_deref()
    }

    pub fn manufacturer_serial(&self) -> Option<&str> {
        self.manufacturer_serial.as_deref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Attach store-assigned identity.
    pub fn into_item(self, id: InventoryItemId, created_at: DateTime<Utc>) -> InventoryItem {
        InventoryItem {
            id,
            instrument_number: self.instrument_number,
            manufacturer_serial: self.manufacturer_serial,
            description: self.description,
            location: self.location,
            created_at,
        }
    }
}

/// An expected inventory item (one row of the baseline).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryItem {
    pub id: InventoryItemId,
    pub instrument_number: Option<String>,
    pub manufacturer_serial: Option<String>,
    pub description: String,
    /// Expected location; empty when none is recorded.
    pub location: String,
    pub created_at: DateTime<Utc>,
}

impl InventoryItem {
    /// Exact, case-sensitive match on either identifier.
    pub fn is_identified_by(&self, barcode: &str) -> bool {
        self.instrument_number.as_deref() == Some(barcode)
            || self.manufacturer_serial.as_deref() == Some(barcode)
    }

    pub fn has_location(&self) -> bool {
        !self.location.is_empty()
    }
}

impl Entity for InventoryItem {
    type Id = InventoryItemId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(instrument: &str, serial: &str, description: &str, location: &str) -> InventoryRow {
        let opt = |s: &str| Some(s.to_string());
        InventoryRow {
            instrument_number: opt(instrument),
            manufacturer_serial: opt(serial),
            description: opt(description),
            location: opt(location),
        }
    }

    #[test]
    fn blank_rows_are_recognized() {
        assert!(InventoryRow::default().is_blank());
        assert!(row("", " ", "", "\t").is_blank());
        assert!(!row("", "", "", "Room1").is_blank());
        assert!(!row("", "", "Orphan", "").is_blank());
    }

    #[test]
    fn fields_are_trimmed_and_blanks_dropped() {
        let c = InventoryItemCandidate::from_row(row("  I-100 ", "   ", " Scope ", " Lab 2 ")).unwrap();
        assert_eq!(c.instrument_number(), Some("I-100"));
        assert_eq!(c.manufacturer_serial(), None);
        assert_eq!(c.description(), "Scope");
        assert_eq!(c.location(), "Lab 2");
    }

    #[test]
    fn missing_description_and_location_become_empty() {
        let c = InventoryItemCandidate::from_row(InventoryRow {
            manufacturer_serial: Some("SN-9".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(c.description(), "");
        assert_eq!(c.location(), "");
    }

    #[test]
    fn row_without_identifiers_is_rejected() {
        let err = InventoryItemCandidate::from_row(row(" ", "", "orphan", "Room1")).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn identifier_match_is_exact() {
        let item = InventoryItemCandidate::from_row(row("I1", "S1", "", ""))
            .unwrap()
            .into_item(InventoryItemId::new(1), Utc::now());

        assert!(item.is_identified_by("I1"));
        assert!(item.is_identified_by("S1"));
        assert!(!item.is_identified_by("i1"));
        assert!(!item.is_identified_by("I1 "));
        assert!(!item.has_location());
    }
}
