//! Commit flows: turn a completed draft into a durable history record.
//!
//! Validation happens entirely before the write, so a failed commit
//! leaves both the history store and the draft untouched. Catalog
//! references are resolved fail-closed: an id the catalog does not know
//! is an error, never a silent skip.

use chrono::{Local, NaiveDateTime, Utc};
use thiserror::Error;

use crate::availability::Availability;
use crate::catalog::Catalog;
use crate::db::{Database, DbError};
use crate::models::{
    Appointment, BookingDraft, MedicationSnapshot, PrescriptionRequest, RequestDraft,
    RequestStatus,
};
use crate::timeutil;

/// Commit-flow errors.
#[derive(Error, Debug)]
pub enum FlowError {
    #[error("incomplete booking draft")]
    IncompleteBooking,

    #[error("no medications selected")]
    NoMedicationsSelected,

    #[error("no delivery method selected")]
    NoDeliveryMethod,

    #[error("no urgency level selected")]
    NoUrgency,

    #[error("unknown appointment type: {0}")]
    UnknownAppointmentType(String),

    #[error("unknown practitioner: {0}")]
    UnknownPractitioner(String),

    #[error("unknown medication: {0}")]
    UnknownMedication(String),

    #[error("unknown delivery method: {0}")]
    UnknownDeliveryMethod(String),

    #[error("unknown urgency level: {0}")]
    UnknownUrgency(String),

    #[error("invalid date or time in draft: {0}")]
    InvalidDateTime(String),

    #[error("slot is no longer available: {0}")]
    SlotTaken(String),

    #[error("database error: {0}")]
    Db(#[from] DbError),
}

pub type FlowResult<T> = Result<T, FlowError>;

/// Booking commit flow.
pub struct BookingFlow<'a> {
    db: &'a Database,
    catalog: &'a Catalog,
    now: NaiveDateTime,
}

impl<'a> BookingFlow<'a> {
    /// Commit against the wall clock.
    pub fn new(db: &'a Database, catalog: &'a Catalog) -> Self {
        Self::at(db, catalog, Local::now().naive_local())
    }

    /// Commit against a pinned clock.
    pub fn at(db: &'a Database, catalog: &'a Catalog, now: NaiveDateTime) -> Self {
        Self { db, catalog, now }
    }

    /// Materialize a confirmed appointment from a complete draft.
    ///
    /// The requested slot is re-checked against history right before the
    /// write, so a draft that went stale while the patient deliberated is
    /// rejected with [`FlowError::SlotTaken`] instead of double-booking.
    pub fn complete(&self, draft: &BookingDraft, reason: &str) -> FlowResult<Appointment> {
        let (Some(type_id), Some(practitioner_id), Some(date_str), Some(time_str)) = (
            draft.appointment_type.as_deref(),
            draft.practitioner.as_deref(),
            draft.date.as_deref(),
            draft.time.as_deref(),
        ) else {
            return Err(FlowError::IncompleteBooking);
        };

        let appointment_type = self
            .catalog
            .appointment_type(type_id)
            .ok_or_else(|| FlowError::UnknownAppointmentType(type_id.to_string()))?;
        let practitioner = self
            .catalog
            .practitioner(practitioner_id)
            .ok_or_else(|| FlowError::UnknownPractitioner(practitioner_id.to_string()))?;

        let date = timeutil::parse_iso_date(date_str)
            .ok_or_else(|| FlowError::InvalidDateTime(date_str.to_string()))?;
        let time = timeutil::parse_slot_time(time_str)
            .ok_or_else(|| FlowError::InvalidDateTime(time_str.to_string()))?;

        let availability = Availability::at(self.db, self.catalog, self.now);
        if availability.slot_conflicts(
            practitioner_id,
            date,
            time,
            appointment_type.duration_minutes,
        )? {
            return Err(FlowError::SlotTaken(format!("{date_str} {time_str}")));
        }

        let appointment = Appointment::new(
            date.and_time(time),
            appointment_type,
            practitioner,
            reason,
            self.catalog.practice().clone(),
        );
        self.db.insert_appointment(&appointment)?;

        tracing::info!(
            id = %appointment.id,
            practitioner = %appointment.practitioner_id,
            "booking committed"
        );
        Ok(appointment)
    }
}

/// Repeat-request commit flow.
pub struct RequestFlow<'a> {
    db: &'a Database,
    catalog: &'a Catalog,
}

impl<'a> RequestFlow<'a> {
    pub fn new(db: &'a Database, catalog: &'a Catalog) -> Self {
        Self { db, catalog }
    }

    /// Materialize a pending repeat request from a complete draft.
    pub fn submit(&self, draft: &RequestDraft) -> FlowResult<PrescriptionRequest> {
        let selections = draft
            .selected_medications
            .as_deref()
            .filter(|meds| !meds.is_empty())
            .ok_or(FlowError::NoMedicationsSelected)?;
        let delivery_id = draft.delivery.as_deref().ok_or(FlowError::NoDeliveryMethod)?;
        let urgency_id = draft.urgency.as_deref().ok_or(FlowError::NoUrgency)?;

        let delivery = self
            .catalog
            .delivery_option(delivery_id)
            .ok_or_else(|| FlowError::UnknownDeliveryMethod(delivery_id.to_string()))?;
        let urgency = self
            .catalog
            .urgency_option(urgency_id)
            .ok_or_else(|| FlowError::UnknownUrgency(urgency_id.to_string()))?;

        let medications = selections
            .iter()
            .map(|selection| {
                let medication = self
                    .catalog
                    .medication(&selection.medication_id)
                    .ok_or_else(|| {
                        FlowError::UnknownMedication(selection.medication_id.clone())
                    })?;
                Ok(MedicationSnapshot {
                    medication_id: medication.id.clone(),
                    name: medication.name.clone(),
                    purpose: medication.purpose.clone(),
                    quantity: selection.quantity,
                })
            })
            .collect::<FlowResult<Vec<_>>>()?;

        let request = PrescriptionRequest {
            id: timeutil::generate_id("rx"),
            medications,
            delivery: delivery.id.clone(),
            delivery_name: delivery.name.clone(),
            urgency: urgency.id.clone(),
            urgency_name: urgency.name.clone(),
            notes: draft.notes.clone().unwrap_or_default(),
            status: RequestStatus::Pending,
            submitted_at: Utc::now().to_rfc3339(),
        };
        self.db.insert_request(&request)?;

        tracing::info!(id = %request.id, medications = request.medications.len(), "repeat request submitted");
        Ok(request)
    }
}
