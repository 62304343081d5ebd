//! In-progress booking and repeat-request drafts.
//!
//! A draft is filled in step by step as the patient moves through the
//! flow, so every field is optional. Merging a patch overwrites only the
//! fields the patch carries (last write wins per field). Each flow has its
//! own completeness predicate; commit refuses an incomplete draft.

use serde::{Deserialize, Serialize};

/// Booking draft: one per session, keyed under the booking storage id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingDraft {
    /// Appointment type id
    pub appointment_type: Option<String>,
    /// Practitioner id
    pub practitioner: Option<String>,
    /// Chosen date, `YYYY-MM-DD`
    pub date: Option<String>,
    /// Chosen slot, `HH:MM`
    pub time: Option<String>,
}

impl BookingDraft {
    /// Merge a patch into this draft, field-wise.
    pub fn merge(&mut self, patch: BookingDraft) {
        if patch.appointment_type.is_some() {
            self.appointment_type = patch.appointment_type;
        }
        if patch.practitioner.is_some() {
            self.practitioner = patch.practitioner;
        }
        if patch.date.is_some() {
            self.date = patch.date;
        }
        if patch.time.is_some() {
            self.time = patch.time;
        }
    }

    /// All four steps filled in.
    pub fn is_complete(&self) -> bool {
        self.appointment_type.is_some()
            && self.practitioner.is_some()
            && self.date.is_some()
            && self.time.is_some()
    }
}

/// One medication picked during a repeat request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationSelection {
    pub medication_id: String,
    pub quantity: u32,
}

/// Repeat-request draft: one per session, keyed under the request
/// storage id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestDraft {
    /// Selected medications; replaced wholesale on update
    pub selected_medications: Option<Vec<MedicationSelection>>,
    /// Delivery method id
    pub delivery: Option<String>,
    /// Urgency id
    pub urgency: Option<String>,
    /// Free-text notes
    pub notes: Option<String>,
}

impl RequestDraft {
    /// Merge a patch into this draft, field-wise.
    pub fn merge(&mut self, patch: RequestDraft) {
        if patch.selected_medications.is_some() {
            self.selected_medications = patch.selected_medications;
        }
        if patch.delivery.is_some() {
            self.delivery = patch.delivery;
        }
        if patch.urgency.is_some() {
            self.urgency = patch.urgency;
        }
        if patch.notes.is_some() {
            self.notes = patch.notes;
        }
    }

    /// At least one medication plus delivery and urgency chosen.
    pub fn is_complete(&self) -> bool {
        self.selected_medications
            .as_ref()
            .is_some_and(|meds| !meds.is_empty())
            && self.delivery.is_some()
            && self.urgency.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_merge_last_write_wins() {
        let mut draft = BookingDraft::default();
        draft.merge(BookingDraft {
            appointment_type: Some("standard".into()),
            practitioner: Some("wilson".into()),
            ..Default::default()
        });
        draft.merge(BookingDraft {
            practitioner: Some("chen".into()),
            date: Some("2026-03-04".into()),
            ..Default::default()
        });

        assert_eq!(draft.appointment_type.as_deref(), Some("standard"));
        assert_eq!(draft.practitioner.as_deref(), Some("chen"));
        assert_eq!(draft.date.as_deref(), Some("2026-03-04"));
        assert_eq!(draft.time, None);
    }

    #[test]
    fn test_booking_completeness() {
        let mut draft = BookingDraft {
            appointment_type: Some("standard".into()),
            practitioner: Some("wilson".into()),
            date: Some("2026-03-04".into()),
            time: None,
        };
        assert!(!draft.is_complete());

        draft.time = Some("09:00".into());
        assert!(draft.is_complete());
    }

    #[test]
    fn test_request_completeness_needs_nonempty_selection() {
        let mut draft = RequestDraft {
            selected_medications: Some(vec![]),
            delivery: Some("email".into()),
            urgency: Some("routine".into()),
            notes: None,
        };
        assert!(!draft.is_complete());

        draft.selected_medications = Some(vec![MedicationSelection {
            medication_id: "med_1".into(),
            quantity: 1,
        }]);
        assert!(draft.is_complete());
    }

    #[test]
    fn test_request_merge_replaces_selection_wholesale() {
        let mut draft = RequestDraft {
            selected_medications: Some(vec![
                MedicationSelection {
                    medication_id: "med_1".into(),
                    quantity: 1,
                },
                MedicationSelection {
                    medication_id: "med_2".into(),
                    quantity: 1,
                },
            ]),
            ..Default::default()
        };

        draft.merge(RequestDraft {
            selected_medications: Some(vec![MedicationSelection {
                medication_id: "med_3".into(),
                quantity: 2,
            }]),
            ..Default::default()
        });

        let meds = draft.selected_medications.unwrap();
        assert_eq!(meds.len(), 1);
        assert_eq!(meds[0].medication_id, "med_3");
    }
}
