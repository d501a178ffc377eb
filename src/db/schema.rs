//! Database schema and migrations for Droply.
//!
//! Migrations are applied sequentially when the database is first opened
//! or upgraded.

/// Database migrations.
///
/// Each migration is a SQL script that will be executed in order.
/// The schema_version table tracks which migrations have been applied.
pub const MIGRATIONS: &[&str] = &[
    // v1: files table holding both files and folders
    r#"
CREATE TABLE files (
    id                TEXT PRIMARY KEY,
    name              TEXT NOT NULL,
    path              TEXT NOT NULL,
    size              INTEGER NOT NULL DEFAULT 0,
    file_type         TEXT NOT NULL,
    file_url          TEXT NOT NULL,
    thumbnail_url     TEXT,
    remote_object_id  TEXT,                           -- NULL for folders and unfinished uploads
    owner_id          TEXT NOT NULL,
    parent_id         TEXT,                           -- NULL for top-level nodes
    is_folder         INTEGER NOT NULL DEFAULT 0,
    is_starred        INTEGER NOT NULL DEFAULT 0,
    is_trash          INTEGER NOT NULL DEFAULT 0,
    created_at        TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at        TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_files_owner_parent ON files(owner_id, parent_id);
"#,
    // v2: trash listing
    r#"
CREATE INDEX idx_files_owner_trash ON files(owner_id, is_trash);
"#,
];
