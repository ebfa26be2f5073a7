use anyhow::{anyhow, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::warn;

pub mod models;
use models::*;

use crate::league::{MatchRecord, RosterEntry, SetScore, Sport, TennisFormat, User};

/// Thread-safe SQLite connection pool (single connection with mutex)
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) the SQLite database at the given path.
    /// `":memory:"` gives a throwaway in-memory store.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        let db = Database {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("database connection mutex poisoned"))
    }

    /// Run schema migrations (idempotent)
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(())
    }

    // ── Users ────────────────────────────────────────────────────────────────

    /// Insert a new user. Returns `false` without touching anything when the phone
    /// number is already registered.
    pub fn insert_user(&self, user: &User) -> Result<bool> {
        let conn = self.conn()?;
        let inserted = conn.execute(
            "INSERT INTO users (phone, first_name, last_name, created_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(phone) DO NOTHING",
            params![user.phone, user.first_name, user.last_name, Utc::now()],
        )?;
        Ok(inserted == 1)
    }

    /// Look up a user by phone number
    pub fn find_user(&self, phone: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                "SELECT phone, first_name, last_name FROM users WHERE phone = ?1",
                params![phone],
                map_user,
            )
            .optional()?;
        Ok(user)
    }

    /// Number of registered users
    pub fn count_users(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM users", [], |r| r.get(0))?;
        Ok(count)
    }

    /// List all users in signup order
    pub fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT phone, first_name, last_name FROM users ORDER BY created_at, rowid",
        )?;
        let users = stmt
            .query_map([], map_user)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(users)
    }

    // ── League membership ────────────────────────────────────────────────────

    /// Add `user` to `league`, or refresh the stored names if the phone is already in it
    pub fn join_league(&self, league: &str, user: &User) -> Result<JoinOutcome> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE league_members SET first_name = ?1, last_name = ?2
             WHERE league = ?3 AND phone = ?4",
            params![user.first_name, user.last_name, league, user.phone],
        )?;
        if updated > 0 {
            return Ok(JoinOutcome::Updated);
        }
        conn.execute(
            "INSERT INTO league_members (league, phone, first_name, last_name, joined_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![league, user.phone, user.first_name, user.last_name, Utc::now()],
        )?;
        Ok(JoinOutcome::Added)
    }

    /// Leagues the phone number has joined
    pub fn list_user_leagues(&self, phone: &str) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT league FROM league_members WHERE phone = ?1 ORDER BY id",
        )?;
        let leagues = stmt
            .query_map(params![phone], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(leagues)
    }

    /// Members of a league in join order
    pub fn list_league_members(&self, league: &str) -> Result<Vec<LeagueMember>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT league, phone, first_name, last_name, joined_at
             FROM league_members WHERE league = ?1 ORDER BY id",
        )?;
        let members = stmt
            .query_map(params![league], map_member)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(members)
    }

    /// Leaderboard roster of a league
    pub fn league_roster(&self, league: &str) -> Result<Vec<RosterEntry>> {
        Ok(self
            .list_league_members(league)?
            .iter()
            .map(LeagueMember::roster_entry)
            .collect())
    }

    // ── Matches ──────────────────────────────────────────────────────────────

    /// Store a match under `league`, stamping it with the current time.
    /// Any `recorded_at` already on the record is ignored.
    pub fn insert_match(&self, league: &str, m: &MatchRecord) -> Result<i64> {
        let scores = serde_json::to_string(&m.scores)?;
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO matches (
                league, sport, tennis_format, player1, player2,
                scores, played_on, recorded_at
             ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8)",
            params![
                league,
                m.sport.as_str(),
                m.tennis_format.map(|f| f.as_str()),
                m.player1,
                m.player2,
                scores,
                m.date,
                Utc::now(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Matches of a league, most recent first: by match date, then by submission order
    pub fn list_league_matches(&self, league: &str) -> Result<Vec<MatchRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, league, sport, tennis_format, player1, player2,
                    scores, played_on, recorded_at
             FROM matches WHERE league = ?1
             ORDER BY played_on DESC, id DESC",
        )?;
        let matches = stmt
            .query_map(params![league], map_match)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(matches)
    }
}

// ── SQL helpers ────────────────────────────────────────────────────────────────

fn map_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
    Ok(User {
        phone: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
    })
}

fn map_member(row: &rusqlite::Row) -> rusqlite::Result<LeagueMember> {
    Ok(LeagueMember {
        league: row.get(0)?,
        phone: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        joined_at: row.get(4)?,
    })
}

fn map_match(row: &rusqlite::Row) -> rusqlite::Result<MatchRecord> {
    let id: i64 = row.get(0)?;
    let sport: String = row.get(2)?;
    let sport = Sport::parse(&sport).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            rusqlite::types::Type::Text,
            format!("unknown sport '{sport}'").into(),
        )
    })?;
    let tennis_format: Option<String> = row.get(3)?;
    let raw_scores: String = row.get(6)?;
    let scores = serde_json::from_str::<BTreeMap<String, SetScore>>(&raw_scores)
        .unwrap_or_else(|e| {
            warn!("Match {} has unreadable scores, treating as empty: {}", id, e);
            BTreeMap::new()
        });

    Ok(MatchRecord {
        id: Some(id),
        league: row.get(1)?,
        player1: row.get(4)?,
        player2: row.get(5)?,
        sport,
        tennis_format: tennis_format.as_deref().and_then(TennisFormat::parse),
        scores,
        date: row.get(7)?,
        recorded_at: row.get(8)?,
    })
}

/// SQLite schema (idempotent CREATE IF NOT EXISTS)
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    phone       TEXT    PRIMARY KEY,
    first_name  TEXT    NOT NULL,
    last_name   TEXT    NOT NULL,
    created_at  TEXT    NOT NULL
);

CREATE TABLE IF NOT EXISTS league_members (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    league      TEXT    NOT NULL,
    phone       TEXT    NOT NULL,
    first_name  TEXT    NOT NULL,
    last_name   TEXT    NOT NULL,
    joined_at   TEXT    NOT NULL,
    UNIQUE (league, phone)
);

CREATE TABLE IF NOT EXISTS matches (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    league        TEXT    NOT NULL,
    sport         TEXT    NOT NULL,
    tennis_format TEXT,
    player1       TEXT    NOT NULL,
    player2       TEXT    NOT NULL,
    scores        TEXT    NOT NULL DEFAULT '{}',
    played_on     TEXT    NOT NULL,
    recorded_at   TEXT    NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_league_members_phone ON league_members(phone);
CREATE INDEX IF NOT EXISTS idx_matches_league ON matches(league, played_on);
"#;
