use rusqlite::{params, Connection};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Result;
use crate::models::DocumentReport;

pub struct Storage {
    conn: Connection,
}

impl Storage {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let storage = Self { conn };
        storage.init_db()?;
        Ok(storage)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let storage = Self { conn };
        storage.init_db()?;
        Ok(storage)
    }

    fn init_db(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                id INTEGER PRIMARY KEY,
                file TEXT UNIQUE NOT NULL,
                kind TEXT NOT NULL,
                content_hash TEXT NOT NULL,
                industry TEXT,
                processed_at TEXT NOT NULL,
                report_json TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS skill_results (
                id INTEGER PRIMARY KEY,
                document_id INTEGER NOT NULL REFERENCES documents(id),
                name TEXT NOT NULL,
                proficiency TEXT NOT NULL,
                confidence REAL NOT NULL,
                is_technical INTEGER NOT NULL,
                is_backed INTEGER NOT NULL,
                backing_certificate TEXT,
                UNIQUE(document_id, name)
            );

            CREATE INDEX IF NOT EXISTS idx_skill_results_document_id ON skill_results(document_id);
            CREATE INDEX IF NOT EXISTS idx_skill_results_name ON skill_results(name);
            "#,
        )?;

        Ok(())
    }

    /// Inserts or replaces the stored result for `report.file`.
    pub fn save_report(&self, report: &DocumentReport, content_hash: &str) -> Result<()> {
        let report_json = serde_json::to_string(report)?;
        self.conn.execute(
            r#"
            INSERT INTO documents (file, kind, content_hash, industry, processed_at, report_json)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(file) DO UPDATE SET
                kind = excluded.kind,
                content_hash = excluded.content_hash,
                industry = excluded.industry,
                processed_at = excluded.processed_at,
                report_json = excluded.report_json
            "#,
            params![
                report.file,
                report.kind.to_string(),
                content_hash,
                report.industry,
                report.processed_at.to_rfc3339(),
                report_json,
            ],
        )?;

        let document_id: i64 = self.conn.query_row(
            "SELECT id FROM documents WHERE file = ?1",
            params![report.file],
            |row| row.get(0),
        )?;

        // Clear existing skill results for this document
        self.conn.execute(
            "DELETE FROM skill_results WHERE document_id = ?1",
            params![document_id],
        )?;

        for skill in &report.skills {
            self.conn.execute(
                r#"
                INSERT OR REPLACE INTO skill_results
                    (document_id, name, proficiency, confidence, is_technical, is_backed, backing_certificate)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
                params![
                    document_id,
                    skill.name,
                    skill.proficiency.to_string(),
                    skill.confidence,
                    skill.is_technical,
                    skill.is_backed,
                    skill.backing_certificate,
                ],
            )?;
        }

        Ok(())
    }

    pub fn get_report(&self, file: &str) -> Result<Option<DocumentReport>> {
        let result = self.conn.query_row(
            "SELECT report_json FROM documents WHERE file = ?1",
            params![file],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn cached_report(&self, file: &str, content_hash: &str) -> Result<Option<DocumentReport>> {
        let result = self.conn.query_row(
            "SELECT report_json FROM documents WHERE file = ?1 AND content_hash = ?2",
            params![file, content_hash],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn list_reports(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT file FROM documents ORDER BY processed_at DESC, file ASC")?;

        let files = stmt.query_map([], |row| row.get(0))?;
        files.collect::<std::result::Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn backed_skill_counts(&self) -> Result<BTreeMap<String, u32>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT name, COUNT(DISTINCT document_id)
            FROM skill_results
            WHERE is_backed = 1
            GROUP BY name
            "#,
        )?;

        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, u32>(1)?)))?;
        rows.collect::<std::result::Result<BTreeMap<_, _>, _>>().map_err(Into::into)
    }
}
