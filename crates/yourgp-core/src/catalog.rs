//! Read-only reference data: the catalog of appointment types,
//! practitioners, medications, and request options.
//!
//! Loaded once per process. The demo fixtures stand in for a future
//! practice-management API; nothing in the core writes back to them.

use chrono::{NaiveDate, Weekday};

use crate::models::{
    AppointmentType, DeliveryOption, Medication, Mode, PracticeInfo, Practitioner, UrgencyOption,
};

/// The catalog store. All lookups are exact-id.
#[derive(Debug, Clone)]
pub struct Catalog {
    appointment_types: Vec<AppointmentType>,
    practitioners: Vec<Practitioner>,
    medications: Vec<Medication>,
    delivery_options: Vec<DeliveryOption>,
    urgency_options: Vec<UrgencyOption>,
    practice: PracticeInfo,
}

impl Catalog {
    /// The hardcoded demo dataset.
    pub fn demo() -> Self {
        Self {
            appointment_types: demo_appointment_types(),
            practitioners: demo_practitioners(),
            medications: demo_medications(),
            delivery_options: demo_delivery_options(),
            urgency_options: demo_urgency_options(),
            practice: PracticeInfo {
                name: "Your GP".into(),
                address: "123 Example Street".into(),
                suburb: "Canberra ACT 2600".into(),
                phone: "(02) 6123 4567".into(),
            },
        }
    }

    pub fn appointment_types(&self) -> &[AppointmentType] {
        &self.appointment_types
    }

    pub fn practitioners(&self) -> &[Practitioner] {
        &self.practitioners
    }

    pub fn medications(&self) -> &[Medication] {
        &self.medications
    }

    pub fn delivery_options(&self) -> &[DeliveryOption] {
        &self.delivery_options
    }

    pub fn urgency_options(&self) -> &[UrgencyOption] {
        &self.urgency_options
    }

    /// Practice contact details, snapshotted into each appointment.
    pub fn practice(&self) -> &PracticeInfo {
        &self.practice
    }

    pub fn appointment_type(&self, id: &str) -> Option<&AppointmentType> {
        self.appointment_types.iter().find(|t| t.id == id)
    }

    pub fn practitioner(&self, id: &str) -> Option<&Practitioner> {
        self.practitioners.iter().find(|p| p.id == id)
    }

    pub fn medication(&self, id: &str) -> Option<&Medication> {
        self.medications.iter().find(|m| m.id == id)
    }

    pub fn delivery_option(&self, id: &str) -> Option<&DeliveryOption> {
        self.delivery_options.iter().find(|d| d.id == id)
    }

    pub fn urgency_option(&self, id: &str) -> Option<&UrgencyOption> {
        self.urgency_options.iter().find(|u| u.id == id)
    }

    /// Medications requestable through the portal.
    pub fn available_medications(&self) -> Vec<&Medication> {
        self.medications.iter().filter(|m| !m.controlled).collect()
    }

    /// Controlled medications, listed so the UI can explain why they are
    /// not requestable.
    pub fn controlled_medications(&self) -> Vec<&Medication> {
        self.medications.iter().filter(|m| m.controlled).collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::demo()
    }
}

fn demo_appointment_types() -> Vec<AppointmentType> {
    vec![
        AppointmentType {
            id: "standard".into(),
            name: "Standard Consultation".into(),
            duration_minutes: 15,
            mode: Mode::InPerson,
            description: "General health concerns, follow-ups, quick questions".into(),
        },
        AppointmentType {
            id: "long".into(),
            name: "Long Consultation".into(),
            duration_minutes: 30,
            mode: Mode::InPerson,
            description: "Complex issues, multiple concerns, mental health".into(),
        },
        AppointmentType {
            id: "telehealth-standard".into(),
            name: "Standard Telehealth".into(),
            duration_minutes: 15,
            mode: Mode::Telehealth,
            description: "Video consultation from home".into(),
        },
        AppointmentType {
            id: "telehealth-long".into(),
            name: "Long Telehealth".into(),
            duration_minutes: 30,
            mode: Mode::Telehealth,
            description: "Extended video consultation".into(),
        },
    ]
}

fn demo_practitioners() -> Vec<Practitioner> {
    use Weekday::*;

    vec![
        Practitioner {
            id: "wilson".into(),
            name: "Dr. James Wilson".into(),
            title: "General Practitioner".into(),
            initials: "JW".into(),
            color: "#32373c".into(),
            working_days: vec![Mon, Tue, Wed, Thu, Fri],
        },
        Practitioner {
            id: "chen".into(),
            name: "Dr. Emily Chen".into(),
            title: "General Practitioner".into(),
            initials: "EC".into(),
            color: "#7c3aed".into(),
            working_days: vec![Mon, Wed, Fri],
        },
        Practitioner {
            id: "park".into(),
            name: "Dr. Sarah Park".into(),
            title: "General Practitioner".into(),
            initials: "SP".into(),
            color: "#0891b2".into(),
            working_days: vec![Tue, Thu],
        },
        Practitioner {
            id: "nurse".into(),
            name: "Nurse Rebecca Torres".into(),
            title: "Practice Nurse".into(),
            initials: "RT".into(),
            color: "#059669".into(),
            working_days: vec![Mon, Tue, Wed, Thu, Fri],
        },
    ]
}

fn demo_medications() -> Vec<Medication> {
    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap_or_default()
    }

    vec![
        Medication {
            id: "med_1".into(),
            name: "Metformin 500mg".into(),
            purpose: "Diabetes management".into(),
            directions: "Take twice daily with meals".into(),
            repeats_remaining: 4,
            last_prescribed: d(2026, 1, 5),
            controlled: false,
        },
        Medication {
            id: "med_2".into(),
            name: "Lisinopril 10mg".into(),
            purpose: "Blood pressure control".into(),
            directions: "Take once daily".into(),
            repeats_remaining: 2,
            last_prescribed: d(2026, 1, 12),
            controlled: false,
        },
        Medication {
            id: "med_3".into(),
            name: "Atorvastatin 20mg".into(),
            purpose: "Cholesterol management".into(),
            directions: "Take once daily at night".into(),
            repeats_remaining: 0,
            last_prescribed: d(2025, 12, 1),
            controlled: false,
        },
        Medication {
            id: "med_4".into(),
            name: "Temazepam 10mg".into(),
            purpose: "Sleep aid".into(),
            directions: "Take as needed for sleep".into(),
            repeats_remaining: 1,
            last_prescribed: d(2025, 11, 15),
            controlled: true,
        },
        Medication {
            id: "med_5".into(),
            name: "Panadeine Forte".into(),
            purpose: "Pain relief".into(),
            directions: "Take as directed for pain".into(),
            repeats_remaining: 0,
            last_prescribed: d(2025, 10, 20),
            controlled: true,
        },
    ]
}

fn demo_delivery_options() -> Vec<DeliveryOption> {
    vec![
        DeliveryOption {
            id: "pickup".into(),
            name: "Pick-up at clinic".into(),
            description: "Collect from our reception".into(),
        },
        DeliveryOption {
            id: "email".into(),
            name: "Email".into(),
            description: "Sent to your registered email".into(),
        },
        DeliveryOption {
            id: "sms".into(),
            name: "SMS".into(),
            description: "Sent via text message".into(),
        },
    ]
}

fn demo_urgency_options() -> Vec<UrgencyOption> {
    vec![
        UrgencyOption {
            id: "routine".into(),
            name: "Routine".into(),
            description: "2-3 business days".into(),
        },
        UrgencyOption {
            id: "urgent".into(),
            name: "Urgent".into(),
            description: "Same day if possible".into(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookups() {
        let catalog = Catalog::demo();

        assert_eq!(
            catalog.appointment_type("long").unwrap().duration_minutes,
            30
        );
        assert_eq!(
            catalog.practitioner("chen").unwrap().working_days,
            vec![Weekday::Mon, Weekday::Wed, Weekday::Fri]
        );
        assert_eq!(
            catalog.medication("med_2").unwrap().name,
            "Lisinopril 10mg"
        );
        assert_eq!(catalog.delivery_option("email").unwrap().name, "Email");
        assert_eq!(catalog.urgency_option("routine").unwrap().name, "Routine");

        assert!(catalog.appointment_type("walk-in").is_none());
        assert!(catalog.practitioner("house").is_none());
    }

    #[test]
    fn test_available_vs_controlled_split() {
        let catalog = Catalog::demo();

        let available: Vec<&str> = catalog
            .available_medications()
            .iter()
            .map(|m| m.id.as_str())
            .collect();
        let controlled: Vec<&str> = catalog
            .controlled_medications()
            .iter()
            .map(|m| m.id.as_str())
            .collect();

        assert_eq!(available, vec!["med_1", "med_2", "med_3"]);
        assert_eq!(controlled, vec!["med_4", "med_5"]);
    }

    #[test]
    fn test_telehealth_types_flagged() {
        let catalog = Catalog::demo();
        assert_eq!(
            catalog.appointment_type("telehealth-long").unwrap().mode,
            Mode::Telehealth
        );
        assert_eq!(
            catalog.appointment_type("standard").unwrap().mode,
            Mode::InPerson
        );
    }
}
