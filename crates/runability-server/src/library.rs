//! Song library — scored tracks saved by clients, backed by SQLite.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, ErrorCode};
use serde::{Deserialize, Serialize};

/// A saved song.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongRecord {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub duration: String,
    pub runability_score: f64,
    pub created_at: DateTime<Utc>,
}

/// Request body for adding a song. Every field is optional at the wire
/// level so that missing fields can be reported with a single message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewSong {
    pub id: Option<String>,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub duration: Option<String>,
    #[serde(alias = "runnability_score")]
    pub runability_score: Option<f64>,
}

/// A `NewSong` with every required field present.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidSong {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub duration: String,
    pub runability_score: f64,
}

impl NewSong {
    /// Check required fields, generating an id when none was given.
    /// Returns `None` when a required field is missing or blank.
    pub fn validate(self) -> Option<ValidSong> {
        fn present(field: Option<String>) -> Option<String> {
            field.filter(|s| !s.trim().is_empty())
        }

        let score = self.runability_score.filter(|s| s.is_finite())?;
        Some(ValidSong {
            id: present(self.id).unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            title: present(self.title)?,
            artist: present(self.artist)?,
            duration: present(self.duration)?,
            runability_score: score,
        })
    }
}

/// Outcome of an insert.
#[derive(Debug)]
pub enum AddOutcome {
    Added(SongRecord),
    /// A song with this id is already stored.
    Duplicate(String),
}

/// SQLite-backed song store.
pub struct SongLibrary {
    db: Connection,
}

impl SongLibrary {
    /// Open or create a library at `path`. Parent directories are created.
    pub fn open(path: &str) -> Result<Self> {
        if path == crate::config::IN_MEMORY_DB {
            return Self::open_in_memory();
        }

        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }

        let db = Connection::open(path)
            .with_context(|| format!("failed to open song library: {path}"))?;
        Self::init(db)
    }

    /// Open a library that lives only as long as this value.
    pub fn open_in_memory() -> Result<Self> {
        let db = Connection::open_in_memory().context("failed to open in-memory library")?;
        Self::init(db)
    }

    fn init(db: Connection) -> Result<Self> {
        db.execute_batch(
            "CREATE TABLE IF NOT EXISTS songs (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                artist TEXT NOT NULL,
                duration TEXT NOT NULL,
                runability_score REAL NOT NULL,
                created_at TEXT NOT NULL
            );",
        )
        .context("failed to create songs table")?;

        Ok(Self { db })
    }

    /// Insert a song, stamping it with the current time.
    pub fn add(&self, song: ValidSong) -> Result<AddOutcome> {
        let record = SongRecord {
            id: song.id,
            title: song.title,
            artist: song.artist,
            duration: song.duration,
            runability_score: song.runability_score,
            created_at: Utc::now(),
        };

        let inserted = self.db.execute(
            "INSERT INTO songs (id, title, artist, duration, runability_score, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                record.id,
                record.title,
                record.artist,
                record.duration,
                record.runability_score,
                record.created_at.to_rfc3339_opts(SecondsFormat::Nanos, true),
            ],
        );

        match inserted {
            Ok(_) => Ok(AddOutcome::Added(record)),
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                Ok(AddOutcome::Duplicate(record.id))
            }
            Err(e) => Err(anyhow::Error::new(e).context("failed to insert song")),
        }
    }

    /// All songs, newest first.
    pub fn list(&self) -> Result<Vec<SongRecord>> {
        let mut stmt = self.db.prepare(
            "SELECT id, title, artist, duration, runability_score, created_at
             FROM songs ORDER BY created_at DESC, rowid DESC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, f64>(4)?,
                row.get::<_, String>(5)?,
            ))
        })?;

        let mut songs = Vec::new();
        for row in rows {
            let (id, title, artist, duration, runability_score, created_at) = row?;
            let created_at = DateTime::parse_from_rfc3339(&created_at)
                .with_context(|| format!("bad created_at for song {id}"))?
                .with_timezone(&Utc);
            songs.push(SongRecord {
                id,
                title,
                artist,
                duration,
                runability_score,
                created_at,
            });
        }
        Ok(songs)
    }

    pub fn count(&self) -> Result<usize> {
        let n: i64 = self
            .db
            .query_row("SELECT COUNT(*) FROM songs", [], |row| row.get(0))?;
        Ok(n as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn new_song(id: Option<&str>, title: &str) -> NewSong {
        NewSong {
            id: id.map(String::from),
            title: Some(title.into()),
            artist: Some("Taylor Swift".into()),
            duration: Some("3:21".into()),
            runability_score: Some(0.7875),
        }
    }

    #[test]
    fn test_validate_requires_fields() {
        assert!(new_song(None, "Anti-Hero").validate().is_some());
        assert!(new_song(None, "  ").validate().is_none());

        let mut missing_score = new_song(None, "Anti-Hero");
        missing_score.runability_score = None;
        assert!(missing_score.validate().is_none());

        let mut nan_score = new_song(None, "Anti-Hero");
        nan_score.runability_score = Some(f64::NAN);
        assert!(nan_score.validate().is_none());
    }

    #[test]
    fn test_zero_score_is_a_valid_score() {
        let mut song = new_song(None, "Slow Song");
        song.runability_score = Some(0.0);
        assert!(song.validate().is_some());
    }

    #[test]
    fn test_id_generated_when_absent() {
        let a = new_song(None, "x").validate().unwrap();
        let b = new_song(None, "x").validate().unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(new_song(Some("fixed"), "x").validate().unwrap().id, "fixed");
    }

    #[test]
    fn test_add_and_list() {
        let lib = SongLibrary::open_in_memory().unwrap();
        assert_eq!(lib.count().unwrap(), 0);

        lib.add(new_song(Some("1"), "First").validate().unwrap()).unwrap();
        lib.add(new_song(Some("2"), "Second").validate().unwrap()).unwrap();

        let songs = lib.list().unwrap();
        assert_eq!(songs.len(), 2);
        assert_eq!(songs[0].title, "Second");
        assert_eq!(songs[1].title, "First");
        assert_eq!(songs[1].runability_score, 0.7875);
    }

    #[test]
    fn test_duplicate_id() {
        let lib = SongLibrary::open_in_memory().unwrap();
        let song = new_song(Some("dup"), "Song").validate().unwrap();
        assert!(matches!(lib.add(song.clone()).unwrap(), AddOutcome::Added(_)));
        assert!(matches!(lib.add(song).unwrap(), AddOutcome::Duplicate(id) if id == "dup"));
        assert_eq!(lib.count().unwrap(), 1);
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("songs.db");
        let path = path.to_str().unwrap();

        {
            let lib = SongLibrary::open(path).unwrap();
            lib.add(new_song(Some("a"), "Kept").validate().unwrap()).unwrap();
        }

        let lib = SongLibrary::open(path).unwrap();
        let songs = lib.list().unwrap();
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].id, "a");
    }

    #[test]
    fn test_legacy_field_name_accepted() {
        let song: NewSong = serde_json::from_str(
            r#"{"title":"t","artist":"a","duration":"1:00","runnability_score":0.5}"#,
        )
        .unwrap();
        assert_eq!(song.runability_score, Some(0.5));
    }
}
