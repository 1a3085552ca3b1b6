//! SQLite schema for profmatch storage

/// Schema version for migrations
pub const SCHEMA_VERSION: u32 = 1;

/// SQLite schema definition
pub struct Schema;

impl Schema {
    /// Get the complete schema SQL
    pub fn create_tables() -> &'static str {
        r#"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS students (
    id INTEGER PRIMARY KEY,
    registration TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS professors (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS courses (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS subjects (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    course_id INTEGER REFERENCES courses(id)
);

-- One offering of a subject, taught by one professor in one term
CREATE TABLE IF NOT EXISTS classes (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    term TEXT NOT NULL,
    professor_id INTEGER NOT NULL REFERENCES professors(id),
    subject_id INTEGER NOT NULL REFERENCES subjects(id)
);

CREATE INDEX IF NOT EXISTS idx_classes_professor ON classes(professor_id);
CREATE INDEX IF NOT EXISTS idx_classes_subject ON classes(subject_id);

-- One row per student evaluating a class; one column per feature
CREATE TABLE IF NOT EXISTS evaluations (
    id INTEGER PRIMARY KEY,
    term TEXT NOT NULL,
    class_id INTEGER NOT NULL REFERENCES classes(id),
    student_id INTEGER NOT NULL REFERENCES students(id),
    slide INTEGER NOT NULL DEFAULT 0 CHECK (slide BETWEEN 0 AND 7),
    quadro INTEGER NOT NULL DEFAULT 0 CHECK (quadro BETWEEN 0 AND 7),
    velocidade_aula INTEGER NOT NULL DEFAULT 0 CHECK (velocidade_aula BETWEEN 0 AND 7),
    provas INTEGER NOT NULL DEFAULT 0 CHECK (provas BETWEEN 0 AND 7),
    trabalhos INTEGER NOT NULL DEFAULT 0 CHECK (trabalhos BETWEEN 0 AND 7),
    projetos INTEGER NOT NULL DEFAULT 0 CHECK (projetos BETWEEN 0 AND 7),
    interacao INTEGER NOT NULL DEFAULT 0 CHECK (interacao BETWEEN 0 AND 7),
    UNIQUE (student_id, class_id)
);

CREATE INDEX IF NOT EXISTS idx_evaluations_class ON evaluations(class_id);

-- Feature catalog: question groups and the options mapped onto features
CREATE TABLE IF NOT EXISTS preference_types (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS preference_options (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    type_id INTEGER NOT NULL REFERENCES preference_types(id),
    feature_column TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS preference_profiles (
    id INTEGER PRIMARY KEY,
    student_id INTEGER NOT NULL UNIQUE REFERENCES students(id),
    course TEXT NOT NULL DEFAULT '',
    term TEXT NOT NULL DEFAULT '',
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS preference_weights (
    id INTEGER PRIMARY KEY,
    profile_id INTEGER NOT NULL REFERENCES preference_profiles(id) ON DELETE CASCADE,
    option_id INTEGER NOT NULL REFERENCES preference_options(id),
    weight INTEGER NOT NULL DEFAULT 0 CHECK (weight BETWEEN 0 AND 7),
    UNIQUE (profile_id, option_id)
);
"#
    }

    /// Get migration SQL for a specific version
    pub fn migration(from_version: u32, to_version: u32) -> Option<&'static str> {
        match (from_version, to_version) {
            // (1, 2) => Some("ALTER TABLE ..."),
            _ => None,
        }
    }
}
