//! Your GP Patient Portal - Core Engine
//!
//! Availability and booking-state engine for a browser-style patient
//! portal: appointment booking and prescription repeat requests, with no
//! server behind them. The UI layer is an external collaborator - it
//! feeds plain id/date/time strings in and renders the records that come
//! back out.
//!
//! # Architecture
//!
//! ```text
//!  UI picks (type, practitioner, date, time / meds, delivery, urgency)
//!                             │
//!                    [Draft State Store]          session-scoped JSON
//!                             │
//!            Availability Engine ◄── Catalog Store (read-only fixtures)
//!                 │                        │
//!                 └── reads ───► [History Store] ◄── Commit Flows append
//!                                      │
//!                     upcoming / past / pending / completed views
//! ```
//!
//! # Core invariants
//!
//! - A 30-minute appointment reserves two 15-minute cells; slot queries
//!   never offer a start whose successor is taken or absent.
//! - Commit is all-or-nothing: validation failures leave history and the
//!   draft untouched.
//! - History records snapshot catalog display fields at commit time, so
//!   later catalog edits never rewrite history.
//! - Cancellation is a status transition, never a deletion.
//!
//! # Modules
//!
//! - [`catalog`]: read-only reference data (types, practitioners, medications)
//! - [`models`]: domain types (Appointment, PrescriptionRequest, drafts)
//! - [`db`]: SQLite-backed durable history store
//! - [`session`]: session-scoped draft storage
//! - [`availability`]: open-date and open-slot queries
//! - [`commit`]: booking and repeat-request commit flows

pub mod availability;
pub mod catalog;
pub mod commit;
pub mod db;
pub mod models;
pub mod session;
pub mod timeutil;

// Re-export commonly used types
pub use availability::{master_slots, Availability, DEFAULT_WINDOW_DAYS};
pub use catalog::Catalog;
pub use commit::{BookingFlow, FlowError, FlowResult, RequestFlow};
pub use db::{Database, DbError, DbResult};
pub use models::{
    Appointment, AppointmentStatus, AppointmentType, BookingDraft, DeliveryOption, Medication,
    MedicationSelection, MedicationSnapshot, Mode, PracticeInfo, Practitioner,
    PrescriptionRequest, RequestDraft, RequestStatus, UrgencyOption,
};
pub use session::{MemorySessionStore, SessionStore, BOOKING_DRAFT_KEY, REQUEST_DRAFT_KEY};

use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};
use std::path::Path;

/// Top-level portal errors.
#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    #[error("flow error: {0}")]
    Flow(#[from] FlowError),

    #[error("storage error: {0}")]
    Db(#[from] DbError),
}

/// Main API object: owns the durable store, the catalog, and the
/// session-scoped draft store.
pub struct Portal {
    db: Database,
    catalog: Catalog,
    session: Box<dyn SessionStore>,
}

impl Portal {
    /// Open or create the durable store at the given path, with the demo
    /// catalog and a fresh in-memory session.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, PortalError> {
        Ok(Self::with_parts(
            Database::open(path)?,
            Catalog::demo(),
            Box::new(MemorySessionStore::new()),
        ))
    }

    /// Fully in-memory portal (for testing).
    pub fn open_in_memory() -> Result<Self, PortalError> {
        Ok(Self::with_parts(
            Database::open_in_memory()?,
            Catalog::demo(),
            Box::new(MemorySessionStore::new()),
        ))
    }

    /// Assemble a portal from explicit parts (custom catalog or session
    /// backend).
    pub fn with_parts(db: Database, catalog: Catalog, session: Box<dyn SessionStore>) -> Self {
        Self {
            db,
            catalog,
            session,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    // =========================================================================
    // Booking draft
    // =========================================================================

    /// Current booking draft; empty when no booking is in progress.
    pub fn booking_draft(&self) -> BookingDraft {
        session::load_draft(self.session.as_ref(), BOOKING_DRAFT_KEY)
    }

    /// Merge a patch into the booking draft and persist it.
    pub fn update_booking_draft(&mut self, patch: BookingDraft) -> BookingDraft {
        let mut draft = self.booking_draft();
        draft.merge(patch);
        session::save_draft(self.session.as_mut(), BOOKING_DRAFT_KEY, &draft);
        draft
    }

    /// Abandon the in-progress booking.
    pub fn clear_booking_draft(&mut self) {
        self.session.remove(BOOKING_DRAFT_KEY);
    }

    /// Commit the booking draft as a confirmed appointment. The draft is
    /// cleared only on success.
    pub fn complete_booking(&mut self, reason: &str) -> Result<Appointment, PortalError> {
        let draft = self.booking_draft();
        let appointment = BookingFlow::new(&self.db, &self.catalog).complete(&draft, reason)?;
        self.clear_booking_draft();
        Ok(appointment)
    }

    // =========================================================================
    // Repeat-request draft
    // =========================================================================

    /// Current repeat-request draft; empty when no request is in progress.
    pub fn request_draft(&self) -> RequestDraft {
        session::load_draft(self.session.as_ref(), REQUEST_DRAFT_KEY)
    }

    /// Merge a patch into the repeat-request draft and persist it.
    pub fn update_request_draft(&mut self, patch: RequestDraft) -> RequestDraft {
        let mut draft = self.request_draft();
        draft.merge(patch);
        session::save_draft(self.session.as_mut(), REQUEST_DRAFT_KEY, &draft);
        draft
    }

    /// Abandon the in-progress repeat request.
    pub fn clear_request_draft(&mut self) {
        self.session.remove(REQUEST_DRAFT_KEY);
    }

    /// Submit the repeat-request draft. The draft is cleared only on
    /// success.
    pub fn submit_request(&mut self) -> Result<PrescriptionRequest, PortalError> {
        let draft = self.request_draft();
        let request = RequestFlow::new(&self.db, &self.catalog).submit(&draft)?;
        self.clear_request_draft();
        Ok(request)
    }

    // =========================================================================
    // Availability
    // =========================================================================

    pub fn available_dates(
        &self,
        practitioner_id: &str,
        start: NaiveDate,
        num_days: u32,
    ) -> Vec<NaiveDate> {
        Availability::new(&self.db, &self.catalog).available_dates(practitioner_id, start, num_days)
    }

    pub fn available_slots(
        &self,
        practitioner_id: &str,
        date: NaiveDate,
        duration_minutes: u32,
    ) -> Result<Vec<NaiveTime>, PortalError> {
        Ok(Availability::new(&self.db, &self.catalog).available_slots(
            practitioner_id,
            date,
            duration_minutes,
        )?)
    }

    pub fn next_available_date(
        &self,
        practitioner_id: &str,
    ) -> Result<Option<NaiveDate>, PortalError> {
        Ok(Availability::new(&self.db, &self.catalog).next_available_date(practitioner_id)?)
    }

    pub fn next_date_with_slots(
        &self,
        practitioner_id: &str,
    ) -> Result<Option<NaiveDate>, PortalError> {
        Ok(Availability::new(&self.db, &self.catalog).next_date_with_slots(practitioner_id)?)
    }

    /// Availability queries against a pinned clock.
    pub fn availability_at(&self, now: NaiveDateTime) -> Availability<'_> {
        Availability::at(&self.db, &self.catalog, now)
    }

    // =========================================================================
    // History
    // =========================================================================

    pub fn appointments(&self) -> Result<Vec<Appointment>, PortalError> {
        Ok(self.db.list_appointments()?)
    }

    pub fn appointment(&self, id: &str) -> Result<Option<Appointment>, PortalError> {
        Ok(self.db.get_appointment(id)?)
    }

    pub fn upcoming_appointments(&self) -> Result<Vec<Appointment>, PortalError> {
        Ok(self.db.upcoming_appointments(Local::now().naive_local())?)
    }

    pub fn past_appointments(&self) -> Result<Vec<Appointment>, PortalError> {
        Ok(self.db.past_appointments(Local::now().naive_local())?)
    }

    /// Soft-cancel an appointment; false when the id is unknown.
    pub fn cancel_appointment(&self, id: &str, reason: &str) -> Result<bool, PortalError> {
        Ok(self.db.cancel_appointment(id, reason)?)
    }

    pub fn requests(&self) -> Result<Vec<PrescriptionRequest>, PortalError> {
        Ok(self.db.list_requests()?)
    }

    pub fn pending_requests(&self) -> Result<Vec<PrescriptionRequest>, PortalError> {
        Ok(self.db.pending_requests()?)
    }

    pub fn completed_requests(&self) -> Result<Vec<PrescriptionRequest>, PortalError> {
        Ok(self.db.completed_requests()?)
    }

    // =========================================================================
    // Demo data
    // =========================================================================

    /// Seed two demo appointments into an empty history store. Returns
    /// false (and writes nothing) when history already has entries.
    pub fn seed_demo_appointments(&self) -> Result<bool, PortalError> {
        if !self.db.list_appointments()?.is_empty() {
            return Ok(false);
        }

        let (Some(standard), Some(tele_long), Some(wilson), Some(chen)) = (
            self.catalog.appointment_type("standard"),
            self.catalog.appointment_type("telehealth-long"),
            self.catalog.practitioner("wilson"),
            self.catalog.practitioner("chen"),
        ) else {
            return Ok(false);
        };

        let today = Local::now().date_naive();
        let tomorrow =
            (today + Duration::days(1)).and_time(NaiveTime::from_hms_opt(9, 30, 0).unwrap_or_default());
        let next_week =
            (today + Duration::days(7)).and_time(NaiveTime::from_hms_opt(14, 0, 0).unwrap_or_default());

        self.db.insert_appointment(&Appointment::new(
            tomorrow,
            standard,
            wilson,
            "Follow-up on blood test results",
            self.catalog.practice().clone(),
        ))?;
        self.db.insert_appointment(&Appointment::new(
            next_week,
            tele_long,
            chen,
            "",
            self.catalog.practice().clone(),
        ))?;

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_updates_accumulate_and_clear() {
        let mut portal = Portal::open_in_memory().unwrap();
        assert_eq!(portal.booking_draft(), BookingDraft::default());

        portal.update_booking_draft(BookingDraft {
            appointment_type: Some("standard".into()),
            ..Default::default()
        });
        let draft = portal.update_booking_draft(BookingDraft {
            practitioner: Some("wilson".into()),
            ..Default::default()
        });

        assert_eq!(draft.appointment_type.as_deref(), Some("standard"));
        assert_eq!(draft.practitioner.as_deref(), Some("wilson"));
        assert_eq!(portal.booking_draft(), draft);

        portal.clear_booking_draft();
        assert_eq!(portal.booking_draft(), BookingDraft::default());
    }

    #[test]
    fn test_booking_and_request_drafts_are_independent() {
        let mut portal = Portal::open_in_memory().unwrap();

        portal.update_booking_draft(BookingDraft {
            practitioner: Some("wilson".into()),
            ..Default::default()
        });
        portal.update_request_draft(RequestDraft {
            delivery: Some("email".into()),
            ..Default::default()
        });

        portal.clear_booking_draft();
        assert_eq!(portal.request_draft().delivery.as_deref(), Some("email"));
    }

    #[test]
    fn test_complete_booking_clears_draft() {
        let mut portal = Portal::open_in_memory().unwrap();
        let date = Local::now().date_naive() + Duration::days(7);

        portal.update_booking_draft(BookingDraft {
            appointment_type: Some("standard".into()),
            practitioner: Some("wilson".into()),
            date: Some(timeutil::format_iso_date(date)),
            time: Some("09:00".into()),
        });

        let appointment = portal.complete_booking("check-up").unwrap();
        assert_eq!(appointment.practitioner_id, "wilson");
        assert_eq!(portal.booking_draft(), BookingDraft::default());
        assert_eq!(portal.appointments().unwrap().len(), 1);
    }

    #[test]
    fn test_failed_booking_keeps_draft() {
        let mut portal = Portal::open_in_memory().unwrap();

        portal.update_booking_draft(BookingDraft {
            appointment_type: Some("standard".into()),
            ..Default::default()
        });

        assert!(portal.complete_booking("").is_err());
        assert_eq!(
            portal.booking_draft().appointment_type.as_deref(),
            Some("standard")
        );
        assert!(portal.appointments().unwrap().is_empty());
    }

    #[test]
    fn test_seed_demo_appointments_once() {
        let portal = Portal::open_in_memory().unwrap();

        assert!(portal.seed_demo_appointments().unwrap());
        assert_eq!(portal.appointments().unwrap().len(), 2);

        // Second call is a no-op.
        assert!(!portal.seed_demo_appointments().unwrap());
        assert_eq!(portal.appointments().unwrap().len(), 2);
    }
}
