use crate::error::HighscoreError;
use crate::models::account::AccountVariant;
use crate::models::clue::{ClueSolution, CrypticSolution};
use crate::models::snapshot::Snapshot;
use crate::models::tracked::TrackedAccount;
use rusqlite::{params, Connection, OptionalExtension, Result};
use std::path::{Path, PathBuf};

const DB_SCHEMA_VERSION: i64 = 2;

pub fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA foreign_keys = ON;
         PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;",
    )?;

    let mut version: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

    if version < 1 {
        apply_migration_1(conn)?;
        version = 1;
        conn.pragma_update(None, "user_version", version)?;
    }

    if version < 2 {
        apply_migration_2(conn)?;
        version = 2;
        conn.pragma_update(None, "user_version", version)?;
    }

    if version > DB_SCHEMA_VERSION {
        log::warn!("database schema version {version} is newer than {DB_SCHEMA_VERSION}");
    }

    Ok(())
}

fn apply_migration_1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS tracked_players (
            username TEXT PRIMARY KEY,
            display_name TEXT NOT NULL,
            account_type TEXT NOT NULL DEFAULT 'normal',
            stats_json TEXT NOT NULL,
            combat_level INTEGER NOT NULL DEFAULT 0,
            saved_at INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS anagrams (
            anagram TEXT PRIMARY KEY,
            solution TEXT NOT NULL,
            location TEXT NOT NULL,
            challenge_answer TEXT,
            puzzle TEXT
        );

        CREATE TABLE IF NOT EXISTS ciphers (
            cipher TEXT PRIMARY KEY,
            solution TEXT NOT NULL,
            location TEXT NOT NULL,
            challenge_answer TEXT,
            puzzle TEXT
        );

        CREATE TABLE IF NOT EXISTS cryptics (
            cryptic TEXT PRIMARY KEY,
            solution TEXT NOT NULL,
            image TEXT
        );
        ",
    )
}

fn apply_migration_2(conn: &Connection) -> Result<()> {
    add_column_if_missing(conn, "tracked_players", "old_names TEXT NOT NULL DEFAULT '[]'")?;
    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_tracked_players_account_type ON tracked_players(account_type);",
    )
}

fn add_column_if_missing(conn: &Connection, table: &str, column_def: &str) -> Result<()> {
    let column_name = column_def
        .split_whitespace()
        .next()
        .unwrap_or(column_def)
        .to_string();

    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let exists = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .filter_map(|res| res.ok())
        .any(|name| name == column_name);

    if !exists {
        conn.execute(&format!("ALTER TABLE {table} ADD COLUMN {column_def}"), [])?;
    }

    Ok(())
}

pub fn database_path(data_dir: &str) -> PathBuf {
    Path::new(data_dir).join(".osrs_helper").join("state.db")
}

/// Open the store. The `.osrs_helper` directory must already exist; loading
/// settings creates it.
pub fn get_db_connection(data_dir: &str) -> Result<Connection> {
    let conn = Connection::open(database_path(data_dir))?;
    initialize_schema(&conn)?;
    Ok(conn)
}

/// Insert a new tracked account. Returns `false` when the username is taken.
pub fn insert_tracked_account(
    conn: &Connection,
    account: &TrackedAccount,
) -> std::result::Result<bool, HighscoreError> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO tracked_players (username, display_name, account_type, stats_json, combat_level, saved_at, old_names)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            account.username,
            account.display_name,
            account.account_variant.as_tag(),
            serde_json::to_string(&account.snapshot)?,
            account.combat_level,
            account.saved_at,
            serde_json::to_string(&account.old_names)?,
        ],
    )?;
    Ok(changed == 1)
}

pub fn upsert_tracked_account(
    conn: &Connection,
    account: &TrackedAccount,
) -> std::result::Result<(), HighscoreError> {
    conn.execute(
        "
        INSERT INTO tracked_players (
            username,
            display_name,
            account_type,
            stats_json,
            combat_level,
            saved_at,
            old_names
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        ON CONFLICT(username) DO UPDATE SET
            display_name = excluded.display_name,
            account_type = excluded.account_type,
            stats_json = excluded.stats_json,
            combat_level = excluded.combat_level,
            saved_at = excluded.saved_at,
            old_names = excluded.old_names
        ",
        params![
            account.username,
            account.display_name,
            account.account_variant.as_tag(),
            serde_json::to_string(&account.snapshot)?,
            account.combat_level,
            account.saved_at,
            serde_json::to_string(&account.old_names)?,
        ],
    )?;

    Ok(())
}

struct TrackedRow {
    username: String,
    display_name: String,
    account_type: String,
    stats_json: String,
    combat_level: i64,
    saved_at: i64,
    old_names: String,
}

pub fn load_tracked_account(
    conn: &Connection,
    username: &str,
) -> std::result::Result<Option<TrackedAccount>, HighscoreError> {
    let row = conn
        .query_row(
            "SELECT username, display_name, account_type, stats_json, combat_level, saved_at, old_names
             FROM tracked_players WHERE username = ?1",
            params![TrackedAccount::key(username)],
            |row| {
                Ok(TrackedRow {
                    username: row.get(0)?,
                    display_name: row.get(1)?,
                    account_type: row.get(2)?,
                    stats_json: row.get(3)?,
                    combat_level: row.get(4)?,
                    saved_at: row.get(5)?,
                    old_names: row.get(6)?,
                })
            },
        )
        .optional()?;

    let Some(row) = row else {
        return Ok(None);
    };

    // A stored snapshot that no longer decodes must not turn into an empty one.
    let snapshot: Snapshot = serde_json::from_str(&row.stats_json).map_err(|e| {
        HighscoreError::MalformedData(format!("stored stats of {}: {e}", row.username))
    })?;
    let old_names: Vec<String> = serde_json::from_str(&row.old_names).map_err(|e| {
        HighscoreError::MalformedData(format!("stored old names of {}: {e}", row.username))
    })?;

    Ok(Some(TrackedAccount {
        username: row.username,
        display_name: row.display_name,
        account_variant: AccountVariant::from_tag(&row.account_type)?,
        snapshot,
        combat_level: row.combat_level,
        saved_at: row.saved_at,
        old_names,
    }))
}

pub fn delete_tracked_account(conn: &Connection, username: &str) -> Result<bool> {
    let changed = conn.execute(
        "DELETE FROM tracked_players WHERE username = ?1",
        params![TrackedAccount::key(username)],
    )?;
    Ok(changed == 1)
}

/// Move a tracked account to a new name, remembering the old one.
pub fn rename_tracked_account(
    conn: &Connection,
    old_name: &str,
    new_name: &str,
) -> std::result::Result<TrackedAccount, HighscoreError> {
    let mut account = load_tracked_account(conn, old_name)?.ok_or_else(|| {
        HighscoreError::NotTracked {
            username: old_name.to_string(),
        }
    })?;

    let new_key = TrackedAccount::key(new_name);
    if new_key != account.username && load_tracked_account(conn, new_name)?.is_some() {
        return Err(HighscoreError::AlreadyTracked {
            username: new_name.to_string(),
        });
    }

    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "DELETE FROM tracked_players WHERE username = ?1",
        params![account.username],
    )?;

    account.old_names.push(account.display_name.clone());
    account.username = new_key;
    account.display_name = new_name.trim().to_string();
    upsert_tracked_account(&tx, &account)?;
    tx.commit()?;

    Ok(account)
}

/// Clue tables searched by exact name first, then by prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClueTable {
    Anagrams,
    Ciphers,
}

impl ClueTable {
    fn table(self) -> &'static str {
        match self {
            Self::Anagrams => "anagrams",
            Self::Ciphers => "ciphers",
        }
    }

    fn key_column(self) -> &'static str {
        match self {
            Self::Anagrams => "anagram",
            Self::Ciphers => "cipher",
        }
    }
}

pub fn insert_clue_solution(
    conn: &Connection,
    table: ClueTable,
    clue: &ClueSolution,
) -> Result<()> {
    conn.execute(
        &format!(
            "INSERT OR REPLACE INTO {} ({}, solution, location, challenge_answer, puzzle) VALUES (?1, ?2, ?3, ?4, ?5)",
            table.table(),
            table.key_column()
        ),
        params![
            clue.clue,
            clue.solution,
            clue.location,
            clue.challenge_answer.as_deref(),
            clue.puzzle.as_deref(),
        ],
    )?;
    Ok(())
}

pub fn find_clue_solutions(
    conn: &Connection,
    table: ClueTable,
    search: &str,
) -> Result<Vec<ClueSolution>> {
    let select = format!(
        "SELECT {key}, solution, location, challenge_answer, puzzle FROM {table}",
        key = table.key_column(),
        table = table.table()
    );

    let exact = query_clues(
        conn,
        &format!("{select} WHERE {} = ?1 COLLATE NOCASE", table.key_column()),
        search,
    )?;
    if !exact.is_empty() {
        return Ok(exact);
    }

    query_clues(
        conn,
        &format!(
            "{select} WHERE {} LIKE ?1 ESCAPE '\\' ORDER BY {}",
            table.key_column(),
            table.key_column()
        ),
        &like_prefix(search),
    )
}

pub fn find_anagrams(conn: &Connection, search: &str) -> Result<Vec<ClueSolution>> {
    find_clue_solutions(conn, ClueTable::Anagrams, search)
}

pub fn find_ciphers(conn: &Connection, search: &str) -> Result<Vec<ClueSolution>> {
    find_clue_solutions(conn, ClueTable::Ciphers, search)
}

fn query_clues(conn: &Connection, sql: &str, arg: &str) -> Result<Vec<ClueSolution>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params![arg], |row| {
        Ok(ClueSolution {
            clue: row.get(0)?,
            solution: row.get(1)?,
            location: row.get(2)?,
            challenge_answer: row.get(3)?,
            puzzle: row.get(4)?,
        })
    })?;
    rows.collect()
}

pub fn insert_cryptic(conn: &Connection, cryptic: &CrypticSolution) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO cryptics (cryptic, solution, image) VALUES (?1, ?2, ?3)",
        params![cryptic.cryptic, cryptic.solution, cryptic.image.as_deref()],
    )?;
    Ok(())
}

pub fn find_cryptics(conn: &Connection, search: &str) -> Result<Vec<CrypticSolution>> {
    let mut stmt = conn.prepare(
        "SELECT cryptic, solution, image FROM cryptics WHERE cryptic LIKE ?1 ESCAPE '\\' ORDER BY cryptic",
    )?;
    let rows = stmt.query_map(params![like_prefix(search)], |row| {
        Ok(CrypticSolution {
            cryptic: row.get(0)?,
            solution: row.get(1)?,
            image: row.get(2)?,
        })
    })?;
    rows.collect()
}

fn like_prefix(search: &str) -> String {
    let escaped = search
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("{escaped}%")
}
