use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use hitfactor_core::{Division, ResolvedHhf, ScoreRecord};
use rusqlite::{Connection, Row, Transaction, params};

use super::{ScoreStore, StoreError};

const SHOT_DATE_FORMAT: &str = "%Y-%m-%d";

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS scores (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    classifier TEXT NOT NULL,
    sd TEXT NOT NULL,
    shot_date TEXT,
    club_id TEXT NOT NULL,
    club_name TEXT NOT NULL,
    percent REAL,
    hit_factor REAL,
    code TEXT,
    source TEXT NOT NULL,
    member_number TEXT NOT NULL,
    division TEXT NOT NULL,
    hhf REAL,
    rec_hhf REAL
);
CREATE INDEX IF NOT EXISTS scores_classifier_division ON scores (classifier, division);
CREATE INDEX IF NOT EXISTS scores_member_number ON scores (member_number);";

/// SQLite-backed [`ScoreStore`].
///
/// HHF fields use the same numeric encoding as JSON output: `-1` for not
/// applicable, `NULL` for unknown.
#[derive(Debug)]
pub struct SqliteScoreStore {
    connection: Connection,
    path: Option<PathBuf>,
}

impl SqliteScoreStore {
    /// Open (or create) the database at `path`.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let connection = Connection::open(path).map_err(|source| StoreError::Sqlite {
            operation: "open database",
            source,
        })?;
        Self::initialise(connection, Some(path.to_path_buf()))
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let connection = Connection::open_in_memory().map_err(|source| StoreError::Sqlite {
            operation: "open in-memory database",
            source,
        })?;
        Self::initialise(connection, None)
    }

    /// Database file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn initialise(connection: Connection, path: Option<PathBuf>) -> Result<Self, StoreError> {
        connection
            .execute_batch(SCHEMA)
            .map_err(|source| StoreError::Sqlite {
                operation: "initialise schema",
                source,
            })?;
        Ok(Self { connection, path })
    }

    fn begin(&mut self) -> Result<Transaction<'_>, StoreError> {
        self.connection
            .transaction()
            .map_err(|source| StoreError::Sqlite {
                operation: "begin score transaction",
                source,
            })
    }
}

impl ScoreStore for SqliteScoreStore {
    fn clear(&mut self) -> Result<(), StoreError> {
        self.connection
            .execute("DELETE FROM scores", [])
            .map_err(|source| StoreError::Sqlite {
                operation: "clear scores",
                source,
            })?;
        Ok(())
    }

    fn insert_many(&mut self, records: &[ScoreRecord]) -> Result<(), StoreError> {
        if records.is_empty() {
            return Ok(());
        }
        let transaction = self.begin()?;
        insert_records(&transaction, records)?;
        commit(transaction)
    }

    fn replace_all(&mut self, records: &[ScoreRecord]) -> Result<(), StoreError> {
        let transaction = self.begin()?;
        transaction
            .execute("DELETE FROM scores", [])
            .map_err(|source| StoreError::Sqlite {
                operation: "clear scores",
                source,
            })?;
        insert_records(&transaction, records)?;
        commit(transaction)
    }

    fn load_all(&self) -> Result<Vec<ScoreRecord>, StoreError> {
        let mut select = self
            .connection
            .prepare(
                "SELECT id, classifier, sd, shot_date, club_id, club_name, percent, hit_factor,
                        code, source, member_number, division, hhf, rec_hhf
                 FROM scores ORDER BY id",
            )
            .map_err(|source| StoreError::Sqlite {
                operation: "prepare load scores",
                source,
            })?;
        let rows = select
            .query_map([], StoredRow::from_row)
            .map_err(|source| StoreError::Sqlite {
                operation: "load scores",
                source,
            })?;
        rows.map(|row| {
            row.map_err(|source| StoreError::Sqlite {
                operation: "read score row",
                source,
            })
            .and_then(StoredRow::into_record)
        })
        .collect()
    }
}

fn insert_records(transaction: &Transaction<'_>, records: &[ScoreRecord]) -> Result<(), StoreError> {
    let mut insert = transaction
        .prepare_cached(
            "INSERT INTO scores (
                classifier, sd, shot_date, club_id, club_name, percent, hit_factor,
                code, source, member_number, division, hhf, rec_hhf
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        )
        .map_err(|source| StoreError::Sqlite {
            operation: "prepare insert score",
            source,
        })?;
    for record in records {
        let hhf: Option<f64> = record.hhf.into();
        let rec_hhf: Option<f64> = record.rec_hhf.into();
        insert
            .execute(params![
                record.classifier,
                record.sd,
                record
                    .shot_date
                    .map(|date| date.format(SHOT_DATE_FORMAT).to_string()),
                record.club_id,
                record.club_name,
                record.percent,
                record.hit_factor,
                record.code,
                record.source,
                record.member_number,
                record.division.short_code(),
                hhf,
                rec_hhf,
            ])
            .map_err(|source| StoreError::Sqlite {
                operation: "insert score",
                source,
            })?;
    }
    Ok(())
}

fn commit(transaction: Transaction<'_>) -> Result<(), StoreError> {
    transaction.commit().map_err(|source| StoreError::Sqlite {
        operation: "commit score transaction",
        source,
    })
}

struct StoredRow {
    id: i64,
    classifier: String,
    sd: String,
    shot_date: Option<String>,
    club_id: String,
    club_name: String,
    percent: Option<f64>,
    hit_factor: Option<f64>,
    code: Option<String>,
    source: String,
    member_number: String,
    division: String,
    hhf: Option<f64>,
    rec_hhf: Option<f64>,
}

impl StoredRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            classifier: row.get(1)?,
            sd: row.get(2)?,
            shot_date: row.get(3)?,
            club_id: row.get(4)?,
            club_name: row.get(5)?,
            percent: row.get(6)?,
            hit_factor: row.get(7)?,
            code: row.get(8)?,
            source: row.get(9)?,
            member_number: row.get(10)?,
            division: row.get(11)?,
            hhf: row.get(12)?,
            rec_hhf: row.get(13)?,
        })
    }

    fn into_record(self) -> Result<ScoreRecord, StoreError> {
        let division: Division = self.division.parse().map_err(|err| StoreError::Corrupt {
            row: self.id,
            message: format!("{err}"),
        })?;
        let shot_date = self
            .shot_date
            .map(|raw| {
                NaiveDate::parse_from_str(&raw, SHOT_DATE_FORMAT).map_err(|err| {
                    StoreError::Corrupt {
                        row: self.id,
                        message: format!("shot date {raw:?}: {err}"),
                    }
                })
            })
            .transpose()?;
        Ok(ScoreRecord {
            classifier: self.classifier,
            sd: self.sd,
            shot_date,
            club_id: self.club_id,
            club_name: self.club_name,
            percent: self.percent,
            hit_factor: self.hit_factor,
            code: self.code,
            source: self.source,
            member_number: self.member_number,
            division,
            hhf: ResolvedHhf::from(self.hhf),
            rec_hhf: ResolvedHhf::from(self.rec_hhf),
        })
    }
}
