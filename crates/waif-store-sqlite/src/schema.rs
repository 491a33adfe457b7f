//! SQL schema for the Waif SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `PRAGMA user_version` number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id     TEXT PRIMARY KEY,
    email       TEXT NOT NULL UNIQUE,  -- case-sensitive match key
    first_name  TEXT NOT NULL,
    last_name   TEXT NOT NULL,
    role        TEXT NOT NULL,         -- 'user' | 'admin'
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS reports (
    report_id        TEXT PRIMARY KEY,
    report_type      TEXT NOT NULL,    -- 'lost' | 'found'; immutable
    location         TEXT NOT NULL,
    item_name        TEXT NOT NULL,
    category         TEXT NOT NULL,
    date             TEXT NOT NULL,    -- ISO 8601 calendar date
    description      TEXT NOT NULL,
    images           TEXT NOT NULL,    -- JSON array of ingested URLs
    user_id          TEXT NOT NULL REFERENCES users(user_id),
    claimed_by       TEXT,             -- claimant email; NULL = unclaimed
    read             INTEGER NOT NULL DEFAULT 0,
    response_message TEXT,
    created_at       TEXT NOT NULL     -- ISO 8601 UTC; server-assigned
);

CREATE INDEX IF NOT EXISTS reports_user_idx    ON reports(user_id);
CREATE INDEX IF NOT EXISTS reports_claimed_idx ON reports(claimed_by);

PRAGMA user_version = 1;
";
