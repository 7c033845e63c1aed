use serde::{Deserialize, Serialize};

use cyclecount_inventory::{ScanOutcome, ScanStatus};

/// Shown in place of an empty expected location.
pub const NO_LOCATION_IN_SYSTEM: &str = "No location in system";

// -------------------------
// Request DTOs
// -------------------------

/// Both fields are optional on the wire; a missing barcode is rejected by
/// validation, not by deserialization.
#[derive(Debug, Default, Deserialize)]
pub struct ScanRequestBody {
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub count: usize,
    pub skipped: usize,
}

impl UploadResponse {
    pub fn loaded(count: usize, skipped: usize) -> Self {
        Self {
            success: true,
            message: format!("Successfully loaded {count} inventory items"),
            count,
            skipped,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: &'static str,
}

impl MessageResponse {
    pub fn ok(message: &'static str) -> Self {
        Self { success: true, message }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ScanResponse {
    Matched {
        matched: bool,
        status: ScanStatus,
        instrument_number: Option<String>,
        manufacturer_serial: Option<String>,
        description: String,
        expected_location: String,
        actual_location: String,
    },
    Overage {
        matched: bool,
        status: ScanStatus,
        message: &'static str,
        barcode: String,
        actual_location: String,
    },
}

impl From<ScanOutcome> for ScanResponse {
    fn from(outcome: ScanOutcome) -> Self {
        let actual_location = outcome.actual_location.unwrap_or_default();
        match outcome.item {
            Some(item) => {
                let expected_location = if item.location.is_empty() {
                    NO_LOCATION_IN_SYSTEM.to_string()
                } else {
                    item.location
                };
                ScanResponse::Matched {
                    matched: true,
                    status: outcome.status,
                    instrument_number: item.instrument_number,
                    manufacturer_serial: item.manufacturer_serial,
                    description: item.description,
                    expected_location,
                    actual_location,
                }
            }
            None => ScanResponse::Overage {
                matched: false,
                status: outcome.status,
                message: "Item not found in inventory",
                barcode: outcome.barcode,
                actual_location,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy",
            database: Some("connected"),
            error: None,
        }
    }

    pub fn unhealthy(error: String) -> Self {
        Self {
            status: "unhealthy",
            database: None,
            error: Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use cyclecount_core::InventoryItemId;
    use cyclecount_inventory::{InventoryItem, ScanRequest, reconcile};
    use serde_json::json;

    fn item(location: &str) -> InventoryItem {
        InventoryItem {
            id: InventoryItemId::new(1),
            instrument_number: None,
            manufacturer_serial: Some("S2".into()),
            description: "DescB".into(),
            location: location.into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn matched_scan_with_empty_expected_location_uses_placeholder() {
        let req = ScanRequest::new("S2", Some("Room9")).unwrap();
        let body = serde_json::to_value(ScanResponse::from(reconcile(&req, Some(&item(""))))).unwrap();

        assert_eq!(
            body,
            json!({
                "matched": true,
                "status": "NO_LOCATION_IN_SYSTEM",
                "instrument_number": null,
                "manufacturer_serial": "S2",
                "description": "DescB",
                "expected_location": NO_LOCATION_IN_SYSTEM,
                "actual_location": "Room9",
            })
        );
    }

    #[test]
    fn overage_scan_carries_message_and_blank_location() {
        let req = ScanRequest::new("ZZZ", None).unwrap();
        let body = serde_json::to_value(ScanResponse::from(reconcile(&req, None))).unwrap();

        assert_eq!(body["matched"], false);
        assert_eq!(body["status"], "OVERAGE");
        assert_eq!(body["message"], "Item not found in inventory");
        assert_eq!(body["barcode"], "ZZZ");
        assert_eq!(body["actual_location"], "");
    }

    #[test]
    fn upload_message_names_count() {
        let body = serde_json::to_value(UploadResponse::loaded(2, 1)).unwrap();
        assert_eq!(body["message"], "Successfully loaded 2 inventory items");
        assert_eq!(body["skipped"], 1);
    }
}
