//! Prescription repeat-request history records.

use serde::{Deserialize, Serialize};

/// Repeat-request lifecycle status.
///
/// The pending → completed transition belongs to the practice's
/// fulfillment process, not to the patient-facing flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Completed,
}

impl RequestStatus {
    /// Stored string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Completed => "completed",
        }
    }

    /// Parse the stored string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(RequestStatus::Pending),
            "completed" => Some(RequestStatus::Completed),
            _ => None,
        }
    }
}

/// One requested medication, with name and purpose copied from the catalog
/// at submission time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationSnapshot {
    pub medication_id: String,
    pub name: String,
    pub purpose: String,
    pub quantity: u32,
}

/// A submitted repeat-prescription request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrescriptionRequest {
    /// Unique id, assigned at submission
    pub id: String,
    /// Requested medications, in selection order
    pub medications: Vec<MedicationSnapshot>,
    /// Delivery method id
    pub delivery: String,
    /// Delivery method display name
    pub delivery_name: String,
    /// Urgency id
    pub urgency: String,
    /// Urgency display name
    pub urgency_name: String,
    /// Free-text notes for the practice
    pub notes: String,
    /// Lifecycle status
    pub status: RequestStatus,
    /// Submission timestamp (RFC 3339)
    pub submitted_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [RequestStatus::Pending, RequestStatus::Completed] {
            assert_eq!(RequestStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(RequestStatus::parse("rejected"), None);
    }

    #[test]
    fn test_snapshot_serde_round_trip() {
        let snapshot = MedicationSnapshot {
            medication_id: "med_1".into(),
            name: "Metformin 500mg".into(),
            purpose: "Diabetes management".into(),
            quantity: 2,
        };

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: MedicationSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
