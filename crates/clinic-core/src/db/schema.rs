//! SQLite schema definition.

/// Complete database schema for clinic-core.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Doctors
-- ============================================================================

CREATE TABLE IF NOT EXISTS doctors (
    doctor_id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    speciality TEXT,
    fee INTEGER NOT NULL CHECK (fee >= 0),
    available INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- ============================================================================
-- Slot Index
-- ============================================================================

-- One row per occupied (doctor, date, time) key. The primary key turns
-- occupy into a single-statement compare-and-set; deleting an absent row
-- is a no-op, which makes release idempotent.
CREATE TABLE IF NOT EXISTS booked_slots (
    doctor_id TEXT NOT NULL REFERENCES doctors(doctor_id),
    slot_date TEXT NOT NULL,
    slot_time TEXT NOT NULL,
    booked_at TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (doctor_id, slot_date, slot_time)
);

-- ============================================================================
-- Appointment Ledger (append-mostly; rows are never deleted)
-- ============================================================================

CREATE TABLE IF NOT EXISTS appointments (
    appointment_id TEXT PRIMARY KEY,
    patient_id TEXT NOT NULL,
    doctor_id TEXT NOT NULL REFERENCES doctors(doctor_id),
    slot_date TEXT NOT NULL,
    slot_time TEXT NOT NULL,
    amount INTEGER NOT NULL CHECK (amount >= 0),
    cancelled INTEGER NOT NULL DEFAULT 0,
    is_completed INTEGER NOT NULL DEFAULT 0,
    payment INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_appointments_patient ON appointments(patient_id);
CREATE INDEX IF NOT EXISTS idx_appointments_doctor ON appointments(doctor_id);

-- At most one live (non-cancelled) appointment per slot key.
CREATE UNIQUE INDEX IF NOT EXISTS idx_appointments_live_slot
    ON appointments(doctor_id, slot_date, slot_time)
    WHERE cancelled = 0;
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn setup_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        conn.execute(
            "INSERT INTO doctors (doctor_id, name, fee) VALUES ('doc-1', 'Dr. Rao', 50)",
            [],
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_schema_valid() {
        let conn = Connection::open_in_memory().unwrap();
        let result = conn.execute_batch(SCHEMA);
        assert!(result.is_ok(), "Schema should be valid SQL: {:?}", result);
    }

    #[test]
    fn test_booked_slots_key_unique() {
        let conn = setup_conn();

        conn.execute(
            "INSERT INTO booked_slots (doctor_id, slot_date, slot_time) VALUES ('doc-1', '2024-01-10', '10:00 AM')",
            [],
        )
        .unwrap();

        // Same key again must be rejected
        let result = conn.execute(
            "INSERT INTO booked_slots (doctor_id, slot_date, slot_time) VALUES ('doc-1', '2024-01-10', '10:00 AM')",
            [],
        );
        assert!(result.is_err());

        // Different time on the same date is fine
        conn.execute(
            "INSERT INTO booked_slots (doctor_id, slot_date, slot_time) VALUES ('doc-1', '2024-01-10', '11:00 AM')",
            [],
        )
        .unwrap();
    }

    #[test]
    fn test_live_slot_invariant() {
        let conn = setup_conn();

        conn.execute(
            "INSERT INTO appointments (appointment_id, patient_id, doctor_id, slot_date, slot_time, amount, created_at)
             VALUES ('appt-1', 'pat-1', 'doc-1', '2024-01-10', '10:00 AM', 50, '2024-01-01T00:00:00+00:00')",
            [],
        )
        .unwrap();

        // Second live appointment on the same slot key is rejected
        let result = conn.execute(
            "INSERT INTO appointments (appointment_id, patient_id, doctor_id, slot_date, slot_time, amount, created_at)
             VALUES ('appt-2', 'pat-2', 'doc-1', '2024-01-10', '10:00 AM', 50, '2024-01-01T00:00:01+00:00')",
            [],
        );
        assert!(result.is_err());

        // After cancelling the first, the key is reusable
        conn.execute(
            "UPDATE appointments SET cancelled = 1 WHERE appointment_id = 'appt-1'",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO appointments (appointment_id, patient_id, doctor_id, slot_date, slot_time, amount, created_at)
             VALUES ('appt-2', 'pat-2', 'doc-1', '2024-01-10', '10:00 AM', 50, '2024-01-01T00:00:01+00:00')",
            [],
        )
        .unwrap();
    }

    #[test]
    fn test_appointments_require_doctor() {
        let conn = setup_conn();

        let result = conn.execute(
            "INSERT INTO appointments (appointment_id, patient_id, doctor_id, slot_date, slot_time, amount, created_at)
             VALUES ('appt-1', 'pat-1', 'doc-unknown', '2024-01-10', '10:00 AM', 50, '2024-01-01T00:00:00+00:00')",
            [],
        );
        assert!(result.is_err());
    }
}
