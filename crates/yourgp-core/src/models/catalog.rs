//! Reference-data models: appointment types, practitioners, medications,
//! delivery and urgency options.

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// How an appointment is conducted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// At the practice.
    InPerson,
    /// Video consultation.
    Telehealth,
}

impl Mode {
    /// Stored string form (`in-person` / `telehealth`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::InPerson => "in-person",
            Mode::Telehealth => "telehealth",
        }
    }

    /// Parse the stored string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "in-person" => Some(Mode::InPerson),
            "telehealth" => Some(Mode::Telehealth),
            _ => None,
        }
    }
}

/// A bookable appointment type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentType {
    /// Unique identifier (e.g. `standard`, `telehealth-long`)
    pub id: String,
    /// Display name
    pub name: String,
    /// Length in minutes: 15, or 30 for long consultations
    pub duration_minutes: u32,
    /// In-person or telehealth
    pub mode: Mode,
    /// Short description shown during booking
    pub description: String,
}

/// A practitioner patients can book with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Practitioner {
    /// Unique identifier (e.g. `wilson`)
    pub id: String,
    /// Display name
    pub name: String,
    /// Role title (e.g. `General Practitioner`)
    pub title: String,
    /// Initials shown in the avatar badge
    pub initials: String,
    /// Avatar badge color (hex)
    pub color: String,
    /// Weekdays this practitioner consults
    pub working_days: Vec<Weekday>,
}

impl Practitioner {
    /// Whether this practitioner consults on the given weekday.
    pub fn works_on(&self, day: Weekday) -> bool {
        self.working_days.contains(&day)
    }
}

/// A medication on the patient's current list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    /// Unique identifier (e.g. `med_1`)
    pub id: String,
    /// Name and strength (e.g. `Metformin 500mg`)
    pub name: String,
    /// What it is prescribed for
    pub purpose: String,
    /// Dosage directions
    pub directions: String,
    /// Repeats left on the current script
    pub repeats_remaining: u32,
    /// Date the script was last issued
    pub last_prescribed: NaiveDate,
    /// Controlled substances cannot be requested through the portal
    pub controlled: bool,
}

/// A way to receive a repeat prescription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryOption {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// How quickly a repeat request should be processed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrgencyOption {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// Practice contact details, snapshotted into each appointment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticeInfo {
    pub name: String,
    pub address: String,
    pub suburb: String,
    pub phone: String,
}
