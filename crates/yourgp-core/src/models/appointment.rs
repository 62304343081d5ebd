//! Appointment history records.

use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::catalog::{AppointmentType, Mode, PracticeInfo, Practitioner};
use crate::timeutil;

/// Appointment lifecycle status.
///
/// Cancellation is the only transition; a cancelled appointment never
/// reverts to confirmed and is never removed from storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Confirmed,
    Cancelled,
}

impl AppointmentStatus {
    /// Stored string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    /// Parse the stored string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "confirmed" => Some(AppointmentStatus::Confirmed),
            "cancelled" => Some(AppointmentStatus::Cancelled),
            _ => None,
        }
    }
}

/// A committed appointment.
///
/// Type and practitioner display fields are snapshotted at commit time so
/// later catalog edits leave history unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    /// Unique id, assigned at commit
    pub id: String,
    /// Scheduled date and time, local wall clock
    pub date_time: NaiveDateTime,
    /// Appointment type id
    pub type_id: String,
    /// Appointment type display name
    pub type_name: String,
    /// Length in minutes (15 or 30)
    pub duration_minutes: u32,
    /// In-person or telehealth
    pub mode: Mode,
    /// Practitioner id
    pub practitioner_id: String,
    /// Practitioner display name
    pub practitioner_name: String,
    /// Practitioner title
    pub practitioner_title: String,
    /// Practitioner avatar initials
    pub practitioner_initials: String,
    /// Practitioner avatar color
    pub practitioner_color: String,
    /// Free-text reason given by the patient
    pub reason: String,
    /// Practice details at booking time
    pub location: PracticeInfo,
    /// Lifecycle status
    pub status: AppointmentStatus,
    /// Cancellation reason, present only once cancelled
    pub cancel_reason: Option<String>,
    /// Cancellation timestamp (RFC 3339), present only once cancelled
    pub cancelled_at: Option<String>,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
}

impl Appointment {
    /// Build a confirmed appointment from catalog snapshots, assigning a
    /// fresh id and creation timestamp.
    pub fn new(
        date_time: NaiveDateTime,
        appointment_type: &AppointmentType,
        practitioner: &Practitioner,
        reason: &str,
        location: PracticeInfo,
    ) -> Self {
        Self {
            id: timeutil::generate_id("apt"),
            date_time,
            type_id: appointment_type.id.clone(),
            type_name: appointment_type.name.clone(),
            duration_minutes: appointment_type.duration_minutes,
            mode: appointment_type.mode,
            practitioner_id: practitioner.id.clone(),
            practitioner_name: practitioner.name.clone(),
            practitioner_title: practitioner.title.clone(),
            practitioner_initials: practitioner.initials.clone(),
            practitioner_color: practitioner.color.clone(),
            reason: reason.to_string(),
            location,
            status: AppointmentStatus::Confirmed,
            cancel_reason: None,
            cancelled_at: None,
            created_at: Utc::now().to_rfc3339(),
        }
    }

    /// Whether this appointment still occupies its slot.
    pub fn is_active(&self) -> bool {
        self.status != AppointmentStatus::Cancelled
    }
}
