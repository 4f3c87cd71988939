use crate::domain::{CertificateRecord, RecordStatus};
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database error: {0}")]
    SqliteError(#[from] rusqlite::Error),

    #[error("Record not found")]
    NotFound,
}

pub trait RecordRepository: Send {
    /// All records, newest first. Verification reads the registry only
    /// through this method.
    fn list(&self) -> Result<Vec<CertificateRecord>, Box<dyn Error>>;
    fn save(&self, record: &CertificateRecord) -> Result<(), Box<dyn Error>>;
    fn find_by_id(&self, id: &str) -> Result<CertificateRecord, Box<dyn Error>>;
    fn delete(&self, id: &str) -> Result<(), Box<dyn Error>>;
    fn count(&self) -> Result<usize, Box<dyn Error>>;
}

pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    pub fn new(path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Registry contents live only as long as the process, matching the
    /// original deployment model. This is the production default.
    pub fn new_in_memory() -> Result<Self, Box<dyn Error>> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self { conn })
    }

    fn init_schema(conn: &Connection) -> Result<(), Box<dyn Error>> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS records (
                id TEXT PRIMARY KEY,
                certificate_id TEXT NOT NULL,
                student_name TEXT NOT NULL,
                degree_name TEXT NOT NULL,
                institution TEXT NOT NULL,
                graduation_year INTEGER NOT NULL,
                issue_date TEXT NOT NULL,
                status TEXT NOT NULL,
                semester TEXT,
                total_marks TEXT,
                result_status TEXT
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_certificate_id ON records(certificate_id)",
            [],
        )?;

        Ok(())
    }

    fn row_to_record(row: &rusqlite::Row) -> Result<CertificateRecord, rusqlite::Error> {
        let status: String = row.get(7)?;
        Ok(CertificateRecord {
            id: row.get(0)?,
            certificate_id: row.get(1)?,
            student_name: row.get(2)?,
            degree_name: row.get(3)?,
            institution: row.get(4)?,
            graduation_year: row.get(5)?,
            issue_date: row.get(6)?,
            status: if status == "revoked" {
                RecordStatus::Revoked
            } else {
                RecordStatus::Active
            },
            semester: row.get(8)?,
            total_marks: row.get(9)?,
            result_status: row.get(10)?,
        })
    }

    fn status_str(status: RecordStatus) -> &'static str {
        match status {
            RecordStatus::Active => "active",
            RecordStatus::Revoked => "revoked",
        }
    }
}

const SELECT_COLUMNS: &str = "id, certificate_id, student_name, degree_name, institution,
     graduation_year, issue_date, status, semester, total_marks, result_status";

impl RecordRepository for SqliteRepository {
    fn list(&self) -> Result<Vec<CertificateRecord>, Box<dyn Error>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM records ORDER BY rowid DESC",
            SELECT_COLUMNS
        ))?;

        let rows = stmt.query_map([], Self::row_to_record)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    fn save(&self, record: &CertificateRecord) -> Result<(), Box<dyn Error>> {
        self.conn.execute(
            "INSERT INTO records (id, certificate_id, student_name, degree_name, institution,
                graduation_year, issue_date, status, semester, total_marks, result_status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                &record.id,
                &record.certificate_id,
                &record.student_name,
                &record.degree_name,
                &record.institution,
                &record.graduation_year,
                &record.issue_date,
                Self::status_str(record.status),
                &record.semester,
                &record.total_marks,
                &record.result_status,
            ],
        )?;
        Ok(())
    }

    fn find_by_id(&self, id: &str) -> Result<CertificateRecord, Box<dyn Error>> {
        let record = self
            .conn
            .query_row(
                &format!("SELECT {} FROM records WHERE id = ?1", SELECT_COLUMNS),
                params![id],
                Self::row_to_record,
            )
            .optional()?;

        record.ok_or_else(|| Box::new(DatabaseError::NotFound) as Box<dyn Error>)
    }

    fn delete(&self, id: &str) -> Result<(), Box<dyn Error>> {
        let affected = self
            .conn
            .execute("DELETE FROM records WHERE id = ?1", params![id])?;

        if affected == 0 {
            return Err(Box::new(DatabaseError::NotFound));
        }
        Ok(())
    }

    fn count(&self) -> Result<usize, Box<dyn Error>> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?;

        Ok(count as usize)
    }
}
