//! SQLite schema definition.

/// Complete database schema for the portal history store.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Appointments (durable history - soft-cancel only, rows are never deleted)
-- ============================================================================

CREATE TABLE IF NOT EXISTS appointments (
    id TEXT PRIMARY KEY,
    date_time TEXT NOT NULL,                      -- local wall clock, %Y-%m-%dT%H:%M:%S
    type_id TEXT NOT NULL,
    type_name TEXT NOT NULL,
    duration_minutes INTEGER NOT NULL,
    mode TEXT NOT NULL,                           -- in-person, telehealth
    practitioner_id TEXT NOT NULL,
    practitioner_name TEXT NOT NULL,
    practitioner_title TEXT NOT NULL,
    practitioner_initials TEXT NOT NULL,
    practitioner_color TEXT NOT NULL,
    reason TEXT NOT NULL DEFAULT '',
    location TEXT NOT NULL DEFAULT '{}',          -- JSON practice snapshot
    status TEXT NOT NULL DEFAULT 'confirmed',     -- confirmed, cancelled
    cancel_reason TEXT,
    cancelled_at TEXT,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_appointments_practitioner_date
    ON appointments(practitioner_id, date_time);
CREATE INDEX IF NOT EXISTS idx_appointments_status ON appointments(status);

-- ============================================================================
-- Prescription repeat requests (durable history)
-- ============================================================================

CREATE TABLE IF NOT EXISTS prescription_requests (
    id TEXT PRIMARY KEY,
    medications TEXT NOT NULL DEFAULT '[]',       -- JSON array of MedicationSnapshot
    delivery TEXT NOT NULL,
    delivery_name TEXT NOT NULL,
    urgency TEXT NOT NULL,
    urgency_name TEXT NOT NULL,
    notes TEXT NOT NULL DEFAULT '',
    status TEXT NOT NULL DEFAULT 'pending',       -- pending, completed
    submitted_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_requests_status ON prescription_requests(status);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_valid() {
        let conn = Connection::open_in_memory().unwrap();
        let result = conn.execute_batch(SCHEMA);
        assert!(result.is_ok(), "Schema should be valid SQL: {:?}", result);
    }

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        conn.execute_batch(SCHEMA).unwrap();
    }

    #[test]
    fn test_datetime_text_ordering() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        // Fixed-width ISO text must sort chronologically.
        for (id, dt) in [
            ("b", "2026-03-02T14:00:00"),
            ("a", "2026-03-02T09:15:00"),
            ("c", "2026-03-11T08:00:00"),
        ] {
            conn.execute(
                "INSERT INTO appointments (
                    id, date_time, type_id, type_name, duration_minutes, mode,
                    practitioner_id, practitioner_name, practitioner_title,
                    practitioner_initials, practitioner_color, created_at
                ) VALUES (?1, ?2, 't', 't', 15, 'in-person', 'p', 'p', 'p', 'P', '#000', '')",
                [id, dt],
            )
            .unwrap();
        }

        let ids: Vec<String> = conn
            .prepare("SELECT id FROM appointments ORDER BY date_time ASC")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}
