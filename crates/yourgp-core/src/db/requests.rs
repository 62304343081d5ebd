//! Prescription repeat-request history operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{MedicationSnapshot, PrescriptionRequest, RequestStatus};

const COLUMNS: &str = "id, medications, delivery, delivery_name, urgency, urgency_name, \
     notes, status, submitted_at";

impl Database {
    /// Append a submitted repeat request.
    pub fn insert_request(&self, request: &PrescriptionRequest) -> DbResult<()> {
        let medications_json = serde_json::to_string(&request.medications)?;

        self.conn.execute(
            r#"
            INSERT INTO prescription_requests (
                id, medications, delivery, delivery_name, urgency, urgency_name,
                notes, status, submitted_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                request.id,
                medications_json,
                request.delivery,
                request.delivery_name,
                request.urgency,
                request.urgency_name,
                request.notes,
                request.status.as_str(),
                request.submitted_at,
            ],
        )?;
        Ok(())
    }

    /// Get a request by id.
    pub fn get_request(&self, id: &str) -> DbResult<Option<PrescriptionRequest>> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM prescription_requests WHERE id = ?"),
                [id],
                map_row,
            )
            .optional()?;

        match row {
            None => Ok(None),
            Some(row) => match PrescriptionRequest::try_from(row) {
                Ok(request) => Ok(Some(request)),
                Err(e) => {
                    tracing::warn!(id, error = %e, "skipping unreadable request row");
                    Ok(None)
                }
            },
        }
    }

    /// All requests in submission order.
    pub fn list_requests(&self) -> DbResult<Vec<PrescriptionRequest>> {
        self.query_requests(
            &format!("SELECT {COLUMNS} FROM prescription_requests ORDER BY rowid"),
            params![],
        )
    }

    /// Requests awaiting fulfillment, in submission order.
    pub fn pending_requests(&self) -> DbResult<Vec<PrescriptionRequest>> {
        self.query_requests(
            &format!(
                "SELECT {COLUMNS} FROM prescription_requests \
                 WHERE status = 'pending' ORDER BY rowid"
            ),
            params![],
        )
    }

    /// Fulfilled requests, in submission order.
    pub fn completed_requests(&self) -> DbResult<Vec<PrescriptionRequest>> {
        self.query_requests(
            &format!(
                "SELECT {COLUMNS} FROM prescription_requests \
                 WHERE status = 'completed' ORDER BY rowid"
            ),
            params![],
        )
    }

    /// Mark a request completed. The transition belongs to the practice's
    /// fulfillment process, not the patient-facing flows.
    pub fn mark_request_completed(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE prescription_requests SET status = 'completed' WHERE id = ?",
            [id],
        )?;
        Ok(rows_affected > 0)
    }

    fn query_requests(
        &self,
        sql: &str,
        query_params: &[&dyn rusqlite::ToSql],
    ) -> DbResult<Vec<PrescriptionRequest>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(query_params, map_row)?;

        let mut requests = Vec::new();
        for row in rows {
            let row = row?;
            let id = row.id.clone();
            match PrescriptionRequest::try_from(row) {
                Ok(request) => requests.push(request),
                Err(e) => {
                    tracing::warn!(id = %id, error = %e, "skipping unreadable request row")
                }
            }
        }
        Ok(requests)
    }
}

/// Intermediate row struct for database mapping.
struct RequestRow {
    id: String,
    medications: String,
    delivery: String,
    delivery_name: String,
    urgency: String,
    urgency_name: String,
    notes: String,
    status: String,
    submitted_at: String,
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<RequestRow> {
    Ok(RequestRow {
        id: row.get(0)?,
        medications: row.get(1)?,
        delivery: row.get(2)?,
        delivery_name: row.get(3)?,
        urgency: row.get(4)?,
        urgency_name: row.get(5)?,
        notes: row.get(6)?,
        status: row.get(7)?,
        submitted_at: row.get(8)?,
    })
}

impl TryFrom<RequestRow> for PrescriptionRequest {
    type Error = DbError;

    fn try_from(row: RequestRow) -> Result<Self, Self::Error> {
        let medications: Vec<MedicationSnapshot> = serde_json::from_str(&row.medications)?;
        let status = RequestStatus::parse(&row.status)
            .ok_or_else(|| DbError::Constraint(format!("unknown status: {}", row.status)))?;

        Ok(PrescriptionRequest {
            id: row.id,
            medications,
            delivery: row.delivery,
            delivery_name: row.delivery_name,
            urgency: row.urgency,
            urgency_name: row.urgency_name,
            notes: row.notes,
            status,
            submitted_at: row.submitted_at,
        })
    }
}
