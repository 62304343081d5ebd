//! Appointment history operations.

use chrono::{NaiveDate, NaiveDateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{Appointment, AppointmentStatus, Mode, PracticeInfo};
use crate::timeutil;

const COLUMNS: &str = "id, date_time, type_id, type_name, duration_minutes, mode, \
     practitioner_id, practitioner_name, practitioner_title, practitioner_initials, \
     practitioner_color, reason, location, status, cancel_reason, cancelled_at, created_at";

impl Database {
    /// Append a committed appointment.
    pub fn insert_appointment(&self, apt: &Appointment) -> DbResult<()> {
        let location_json = serde_json::to_string(&apt.location)?;

        self.conn.execute(
            r#"
            INSERT INTO appointments (
                id, date_time, type_id, type_name, duration_minutes, mode,
                practitioner_id, practitioner_name, practitioner_title,
                practitioner_initials, practitioner_color, reason, location,
                status, cancel_reason, cancelled_at, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)
            "#,
            params![
                apt.id,
                timeutil::format_stored_datetime(apt.date_time),
                apt.type_id,
                apt.type_name,
                apt.duration_minutes,
                apt.mode.as_str(),
                apt.practitioner_id,
                apt.practitioner_name,
                apt.practitioner_title,
                apt.practitioner_initials,
                apt.practitioner_color,
                apt.reason,
                location_json,
                apt.status.as_str(),
                apt.cancel_reason,
                apt.cancelled_at,
                apt.created_at,
            ],
        )?;
        Ok(())
    }

    /// Get an appointment by id.
    pub fn get_appointment(&self, id: &str) -> DbResult<Option<Appointment>> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM appointments WHERE id = ?"),
                [id],
                map_row,
            )
            .optional()?;

        match row {
            None => Ok(None),
            Some(row) => match Appointment::try_from(row) {
                Ok(apt) => Ok(Some(apt)),
                Err(e) => {
                    tracing::warn!(id, error = %e, "skipping unreadable appointment row");
                    Ok(None)
                }
            },
        }
    }

    /// All appointments in insertion order.
    pub fn list_appointments(&self) -> DbResult<Vec<Appointment>> {
        self.query_appointments(
            &format!("SELECT {COLUMNS} FROM appointments ORDER BY rowid"),
            params![],
        )
    }

    /// Future, non-cancelled appointments, soonest first.
    pub fn upcoming_appointments(&self, now: NaiveDateTime) -> DbResult<Vec<Appointment>> {
        self.query_appointments(
            &format!(
                "SELECT {COLUMNS} FROM appointments \
                 WHERE date_time > ?1 AND status != 'cancelled' \
                 ORDER BY date_time ASC"
            ),
            params![timeutil::format_stored_datetime(now)],
        )
    }

    /// Past or cancelled appointments, most recent first.
    ///
    /// A cancelled appointment counts as past even when its date is still
    /// in the future, so it disappears from the upcoming view.
    pub fn past_appointments(&self, now: NaiveDateTime) -> DbResult<Vec<Appointment>> {
        self.query_appointments(
            &format!(
                "SELECT {COLUMNS} FROM appointments \
                 WHERE date_time <= ?1 OR status = 'cancelled' \
                 ORDER BY date_time DESC"
            ),
            params![timeutil::format_stored_datetime(now)],
        )
    }

    /// Non-cancelled appointments for one practitioner on one calendar day.
    pub fn appointments_for_practitioner_on(
        &self,
        practitioner_id: &str,
        date: NaiveDate,
    ) -> DbResult<Vec<Appointment>> {
        self.query_appointments(
            &format!(
                "SELECT {COLUMNS} FROM appointments \
                 WHERE practitioner_id = ?1 AND status != 'cancelled' \
                   AND date(date_time) = ?2 \
                 ORDER BY date_time ASC"
            ),
            params![practitioner_id, timeutil::format_iso_date(date)],
        )
    }

    /// Soft-cancel an appointment. Returns false when the id is unknown;
    /// the row itself is never removed.
    pub fn cancel_appointment(&self, id: &str, reason: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE appointments SET
                status = 'cancelled',
                cancel_reason = ?2,
                cancelled_at = ?3
            WHERE id = ?1
            "#,
            params![id, reason, Utc::now().to_rfc3339()],
        )?;
        Ok(rows_affected > 0)
    }

    fn query_appointments(
        &self,
        sql: &str,
        query_params: &[&dyn rusqlite::ToSql],
    ) -> DbResult<Vec<Appointment>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(query_params, map_row)?;

        let mut appointments = Vec::new();
        for row in rows {
            let row = row?;
            let id = row.id.clone();
            match Appointment::try_from(row) {
                Ok(apt) => appointments.push(apt),
                Err(e) => {
                    tracing::warn!(id = %id, error = %e, "skipping unreadable appointment row")
                }
            }
        }
        Ok(appointments)
    }
}

/// Intermediate row struct for database mapping.
struct AppointmentRow {
    id: String,
    date_time: String,
    type_id: String,
    type_name: String,
    duration_minutes: u32,
    mode: String,
    practitioner_id: String,
    practitioner_name: String,
    practitioner_title: String,
    practitioner_initials: String,
    practitioner_color: String,
    reason: String,
    location: String,
    status: String,
    cancel_reason: Option<String>,
    cancelled_at: Option<String>,
    created_at: String,
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<AppointmentRow> {
    Ok(AppointmentRow {
        id: row.get(0)?,
        date_time: row.get(1)?,
        type_id: row.get(2)?,
        type_name: row.get(3)?,
        duration_minutes: row.get(4)?,
        mode: row.get(5)?,
        practitioner_id: row.get(6)?,
        practitioner_name: row.get(7)?,
        practitioner_title: row.get(8)?,
        practitioner_initials: row.get(9)?,
        practitioner_color: row.get(10)?,
        reason: row.get(11)?,
        location: row.get(12)?,
        status: row.get(13)?,
        cancel_reason: row.get(14)?,
        cancelled_at: row.get(15)?,
        created_at: row.get(16)?,
    })
}

impl TryFrom<AppointmentRow> for Appointment {
    type Error = DbError;

    fn try_from(row: AppointmentRow) -> Result<Self, Self::Error> {
        let date_time = timeutil::parse_stored_datetime(&row.date_time)?;
        let mode = Mode::parse(&row.mode)
            .ok_or_else(|| DbError::Constraint(format!("unknown mode: {}", row.mode)))?;
        let status = AppointmentStatus::parse(&row.status)
            .ok_or_else(|| DbError::Constraint(format!("unknown status: {}", row.status)))?;
        let location: PracticeInfo = serde_json::from_str(&row.location)?;

        Ok(Appointment {
            id: row.id,
            date_time,
            type_id: row.type_id,
            type_name: row.type_name,
            duration_minutes: row.duration_minutes,
            mode,
            practitioner_id: row.practitioner_id,
            practitioner_name: row.practitioner_name,
            practitioner_title: row.practitioner_title,
            practitioner_initials: row.practitioner_initials,
            practitioner_color: row.practitioner_color,
            reason: row.reason,
            location,
            status,
            cancel_reason: row.cancel_reason,
            cancelled_at: row.cancelled_at,
            created_at: row.created_at,
        })
    }
}
