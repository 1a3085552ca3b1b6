//! SQLite-backed [`MatchStore`]

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use tracing::{info, warn};

use super::schema::{Schema, SCHEMA_VERSION};
use crate::error::{MatchError, PersistenceError, Result};
use crate::feature::{Feature, FeatureVector, PreferenceVector};
use crate::profile::{EvaluationRecord, EvaluationScope};
use crate::store::{CatalogEntry, MatchStore, PreferenceUpdate, StoredPreferences, Subject};

/// Repository for persisting profmatch state
pub struct Repository {
    conn: Mutex<Connection>,
}

impl Repository {
    /// Open (or create) a database at the given path
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// Create an in-memory repository (for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        Self::initialize(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Initialize the database schema
    fn initialize(conn: &Connection) -> Result<()> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        let current_version = Self::get_schema_version(conn).unwrap_or(0);

        if current_version == 0 {
            conn.execute_batch(Schema::create_tables())?;
            Self::set_schema_version(conn, SCHEMA_VERSION)?;
        } else if current_version < SCHEMA_VERSION {
            for version in current_version..SCHEMA_VERSION {
                if let Some(migration) = Schema::migration(version, version + 1) {
                    conn.execute_batch(migration).map_err(|e| {
                        PersistenceError::Migration(format!("{} -> {}: {}", version, version + 1, e))
                    })?;
                }
            }
            Self::set_schema_version(conn, SCHEMA_VERSION)?;
        } else if current_version > SCHEMA_VERSION {
            return Err(PersistenceError::Migration(format!(
                "database schema {} is newer than supported {}",
                current_version, SCHEMA_VERSION
            ))
            .into());
        }

        Ok(())
    }

    fn get_schema_version(conn: &Connection) -> Option<u32> {
        conn.query_row(
            "SELECT version FROM schema_version ORDER BY rowid DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .ok()
    }

    fn set_schema_version(conn: &Connection, version: u32) -> Result<()> {
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            [version],
        )?;
        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| {
            MatchError::from(PersistenceError::Database(format!(
                "connection mutex poisoned: {}",
                e
            )))
        })
    }

    // ==================== Catalog ====================

    /// Populate the feature catalog from the canonical feature list.
    ///
    /// Idempotent; returns the number of catalog entries afterwards.
    pub fn install_feature_catalog(&self) -> Result<usize> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        for feature in Feature::ALL {
            let group = question_group(feature);
            tx.execute(
                "INSERT OR IGNORE INTO preference_types (name) VALUES (?1)",
                [group],
            )?;
            tx.execute(
                r#"
                INSERT OR IGNORE INTO preference_options (name, type_id, feature_column)
                SELECT ?1, id, ?2 FROM preference_types WHERE name = ?3
                "#,
                params![feature.label(), feature.name(), group],
            )?;
        }

        let count: i64 =
            tx.query_row("SELECT COUNT(*) FROM preference_options", [], |row| row.get(0))?;
        tx.commit()?;

        info!(entries = count, "Installed feature catalog");
        Ok(count as usize)
    }

    // ==================== Reference data ====================

    pub fn add_student(&self, registration: &str, name: &str) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO students (registration, name) VALUES (?1, ?2)",
            [registration, name],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn add_professor(&self, name: &str) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute("INSERT INTO professors (name) VALUES (?1)", [name])?;
        Ok(conn.last_insert_rowid())
    }

    pub fn add_course(&self, name: &str) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute("INSERT INTO courses (name) VALUES (?1)", [name])?;
        Ok(conn.last_insert_rowid())
    }

    pub fn add_subject(&self, name: &str, course_id: Option<i64>) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO subjects (name, course_id) VALUES (?1, ?2)",
            params![name, course_id],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Add a class: one offering of `subject_id` taught by `professor_id`.
    pub fn add_class(
        &self,
        name: &str,
        term: &str,
        professor_id: i64,
        subject_id: i64,
    ) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO classes (name, term, professor_id, subject_id) VALUES (?1, ?2, ?3, ?4)",
            params![name, term, professor_id, subject_id],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Record a student's evaluation of a class.
    pub fn record_evaluation(
        &self,
        student_id: i64,
        class_id: i64,
        term: &str,
        scores: &FeatureVector<u8>,
    ) -> Result<i64> {
        let columns: Vec<&str> = Feature::ALL.iter().map(|f| f.name()).collect();

        let mut values: Vec<Value> = vec![
            Value::Integer(student_id),
            Value::Integer(class_id),
            Value::Text(term.to_string()),
        ];
        values.extend(scores.values().iter().map(|&s| Value::Integer(i64::from(s))));

        let placeholders: Vec<String> = (1..=values.len()).map(|i| format!("?{}", i)).collect();
        let sql = format!(
            "INSERT INTO evaluations (student_id, class_id, term, {}) VALUES ({})",
            columns.join(", "),
            placeholders.join(", ")
        );

        let conn = self.conn()?;
        conn.execute(&sql, params_from_iter(values.iter()))?;
        Ok(conn.last_insert_rowid())
    }

    fn evaluation_query(filter: &str) -> String {
        let columns: Vec<String> = Feature::ALL
            .iter()
            .map(|f| format!("e.{}", f.name()))
            .collect();
        format!(
            r#"
            SELECT p.id, p.name, c.subject_id, c.id, {}
            FROM evaluations e
            JOIN classes c ON c.id = e.class_id
            JOIN professors p ON p.id = c.professor_id
            WHERE {}
            ORDER BY p.id, e.id
            "#,
            columns.join(", "),
            filter
        )
    }

    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<EvaluationRecord> {
        let mut scores = FeatureVector::<u8>::zeros();
        for feature in Feature::ALL {
            scores.set(feature, row.get(4 + feature.index())?);
        }

        Ok(EvaluationRecord {
            professor_id: row.get(0)?,
            professor_name: row.get(1)?,
            subject_id: row.get(2)?,
            class_id: row.get(3)?,
            scores,
        })
    }
}

impl MatchStore for Repository {
    fn feature_catalog(&self) -> Result<Vec<CatalogEntry>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT id, feature_column, name FROM preference_options ORDER BY id")?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut catalog = Vec::with_capacity(rows.len());
        for (option_id, column, label) in rows {
            match Feature::from_name(&column) {
                Some(feature) => catalog.push(CatalogEntry {
                    option_id,
                    feature,
                    label,
                }),
                None => warn!(option_id, column = %column, "Catalog option maps to unknown feature"),
            }
        }
        Ok(catalog)
    }

    fn replace_preferences(
        &self,
        student_id: i64,
        update: PreferenceUpdate<'_>,
    ) -> Result<StoredPreferences> {
        let now = Utc::now();
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let student_exists: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM students WHERE id = ?1)",
            [student_id],
            |row| row.get(0),
        )?;
        if !student_exists {
            return Err(MatchError::NotFound(format!("student {}", student_id)));
        }

        tx.execute(
            r#"
            INSERT INTO preference_profiles (student_id, course, term, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(student_id) DO UPDATE SET
                course = excluded.course,
                term = excluded.term,
                updated_at = excluded.updated_at
            "#,
            params![student_id, update.course, update.term, now],
        )?;
        let profile_id: i64 = tx.query_row(
            "SELECT id FROM preference_profiles WHERE student_id = ?1",
            [student_id],
            |row| row.get(0),
        )?;

        tx.execute(
            "DELETE FROM preference_weights WHERE profile_id = ?1",
            [profile_id],
        )?;

        for (feature, weight) in update.weights.iter() {
            let inserted = tx.execute(
                r#"
                INSERT INTO preference_weights (profile_id, option_id, weight)
                SELECT ?1, id, ?2 FROM preference_options WHERE feature_column = ?3
                "#,
                params![profile_id, weight, feature.name()],
            )?;
            if inserted == 0 {
                return Err(MatchError::Unconfigured(format!(
                    "no catalog option for feature {}",
                    feature
                )));
            }
        }

        tx.commit()?;

        Ok(StoredPreferences {
            profile_id,
            student_id,
            course: update.course.to_string(),
            term: update.term.to_string(),
            weights: *update.weights,
            updated_at: now,
        })
    }

    fn preferences(&self, student_id: i64) -> Result<Option<StoredPreferences>> {
        let conn = self.conn()?;

        let header = conn
            .query_row(
                "SELECT id, course, term, updated_at FROM preference_profiles WHERE student_id = ?1",
                [student_id],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, DateTime<Utc>>(3)?,
                    ))
                },
            )
            .optional()?;

        let Some((profile_id, course, term, updated_at)) = header else {
            return Ok(None);
        };

        let mut stmt = conn.prepare(
            r#"
            SELECT o.feature_column, w.weight
            FROM preference_weights w
            JOIN preference_options o ON o.id = w.option_id
            WHERE w.profile_id = ?1
            "#,
        )?;
        let rows = stmt
            .query_map([profile_id], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, u8>(1)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        if rows.is_empty() {
            return Ok(None);
        }

        let weights = PreferenceVector::from_pairs(
            rows.into_iter()
                .filter_map(|(column, weight)| Feature::from_name(&column).map(|f| (f, weight))),
        );

        Ok(Some(StoredPreferences {
            profile_id,
            student_id,
            course,
            term,
            weights,
            updated_at,
        }))
    }

    fn evaluations(&self, scope: &EvaluationScope) -> Result<Vec<EvaluationRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&Self::evaluation_query(
            "(?1 IS NULL OR c.subject_id = ?1)",
        ))?;

        let records = stmt
            .query_map([scope.subject_id], Self::row_to_record)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }

    fn professor_evaluations(
        &self,
        professor_id: i64,
        scope: &EvaluationScope,
    ) -> Result<Vec<EvaluationRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&Self::evaluation_query(
            "p.id = ?1 AND (?2 IS NULL OR c.subject_id = ?2)",
        ))?;

        let records = stmt
            .query_map(params![professor_id, scope.subject_id], Self::row_to_record)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }

    fn subjects(&self) -> Result<Vec<Subject>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT s.id, s.name, c.name
            FROM subjects s
            LEFT JOIN courses c ON c.id = s.course_id
            ORDER BY s.name
            "#,
        )?;

        let subjects = stmt
            .query_map([], |row| {
                Ok(Subject {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    course: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(subjects)
    }
}

/// Questionnaire group each feature's catalog option belongs to.
fn question_group(feature: Feature) -> &'static str {
    match feature {
        Feature::SlideUsage | Feature::BoardUsage => "Teaching style",
        Feature::Pace => "Class pace",
        Feature::Engagement => "Participation",
        Feature::ExamFocus | Feature::AssignmentFocus | Feature::ProjectFocus => "Assessment",
    }
}
