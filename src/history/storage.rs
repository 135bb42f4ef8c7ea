use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::path::Path;

use super::types::Session;
use crate::scoring::ScoringError;
use crate::store::KeyValueStore;

/// Store key holding the JSON array of sessions
pub const SESSIONS_KEY: &str = "@paf_pft_sessions";

/// Load saved sessions in the order they were saved
///
/// A key that was never written means an empty history.
pub fn load_sessions(store: &impl KeyValueStore) -> Result<Vec<Session>> {
    match store.get(SESSIONS_KEY)? {
        None => Ok(Vec::new()),
        Some(json) => serde_json::from_str(&json).context("Failed to parse saved sessions"),
    }
}

pub fn save_sessions(store: &mut impl KeyValueStore, sessions: &[Session]) -> Result<()> {
    let json = serde_json::to_string(sessions).context("Failed to serialize sessions")?;
    store.set(SESSIONS_KEY, &json)
}

/// Append a session to the history. Returns the new number of sessions.
pub fn append_session(store: &mut impl KeyValueStore, session: Session) -> Result<usize> {
    let mut sessions = load_sessions(store)?;
    sessions.push(session);
    save_sessions(store, &sessions)?;
    tracing::info!(count = sessions.len(), "session saved");
    Ok(sessions.len())
}

/// Delete the session at a 1-based index, as shown by `history`.
///
/// An index outside the saved history is an `InvalidInput` error.
pub fn delete_session(store: &mut impl KeyValueStore, index: usize) -> Result<Session> {
    let mut sessions = load_sessions(store)?;
    if sessions.is_empty() {
        return Err(ScoringError::invalid("index", "no sessions saved yet").into());
    }
    if index < 1 || index > sessions.len() {
        return Err(ScoringError::invalid(
            "index",
            format!("{} is not between 1 and {}", index, sessions.len()),
        )
        .into());
    }

    let removed = sessions.remove(index - 1);
    save_sessions(store, &sessions)?;
    tracing::info!(index, remaining = sessions.len(), "session deleted");
    Ok(removed)
}

/// Write sessions to a standalone JSON file atomically
///
/// The file is never left half-written.
pub fn export_sessions(path: &Path, sessions: &[Session]) -> Result<()> {
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, sessions).context("Failed to serialize sessions")?;

    file.commit()
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{CacacheStore, MemoryStore};
    use chrono::{TimeZone, Utc};

    fn session(day: u32, total_score: f64) -> Session {
        Session {
            date: Utc.with_ymd_and_hms(2024, 10, day, 7, 30, 0).unwrap(),
            push_ups: 40,
            sit_ups: 45,
            run_time: "15m 30s".to_string(),
            total_score,
            push_up_points: Some(80.0),
            sit_up_points: Some(82.0),
            run_points: Some(90.0),
        }
    }

    #[test]
    fn test_load_missing_returns_empty() {
        let store = MemoryStore::new();
        assert!(load_sessions(&store).unwrap().is_empty());
    }

    #[test]
    fn test_load_corrupt_json_errors() {
        let mut store = MemoryStore::new();
        store.set(SESSIONS_KEY, "{not json").unwrap();
        assert!(load_sessions(&store).is_err());
    }

    #[test]
    fn test_append_keeps_order() {
        let mut store = MemoryStore::new();
        assert_eq!(append_session(&mut store, session(1, 70.0)).unwrap(), 1);
        assert_eq!(append_session(&mut store, session(2, 75.0)).unwrap(), 2);

        let sessions = load_sessions(&store).unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].total_score, 70.0);
        assert_eq!(sessions[1].total_score, 75.0);
    }

    #[test]
    fn test_appends_to_legacy_history() {
        let mut store = MemoryStore::new();
        store
            .set(
                SESSIONS_KEY,
                r#"[{"date":"2024-09-01T07:30:00.000Z","pushUpScore":30,"sitUpScore":32,"runTime":"19m 5s","totalScore":66.5}]"#,
            )
            .unwrap();

        append_session(&mut store, session(1, 70.0)).unwrap();
        let sessions = load_sessions(&store).unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].push_ups, 30);
        assert_eq!(sessions[0].run_seconds(), Some(19 * 60 + 5));
    }

    #[test]
    fn test_loads_history_with_fractional_and_negative_reps() {
        let mut store = MemoryStore::new();
        store
            .set(
                SESSIONS_KEY,
                r#"[{"date":"2024-09-01T07:30:00.000Z","pushUpScore":12.5,"sitUpScore":-3,"runTime":"19m 5s","totalScore":66.5},
                    {"date":"2024-09-02T07:30:00.000Z","pushUpScore":null,"sitUpScore":4294967296,"runTime":"19m 0s","totalScore":67.0}]"#,
            )
            .unwrap();

        let sessions = load_sessions(&store).unwrap();
        assert_eq!(sessions[0].push_ups, 12);
        assert_eq!(sessions[0].sit_ups, 0);
        assert_eq!(sessions[1].push_ups, 0);
        assert_eq!(sessions[1].sit_ups, u32::MAX);

        assert_eq!(append_session(&mut store, session(3, 70.0)).unwrap(), 3);
        assert_eq!(delete_session(&mut store, 1).unwrap().push_ups, 12);
    }

    #[test]
    fn test_delete_session() {
        let mut store = MemoryStore::new();
        for (day, score) in [(1, 70.0), (2, 75.0), (3, 80.0)] {
            append_session(&mut store, session(day, score)).unwrap();
        }

        let removed = delete_session(&mut store, 2).unwrap();
        assert_eq!(removed.total_score, 75.0);

        let sessions = load_sessions(&store).unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].total_score, 70.0);
        assert_eq!(sessions[1].total_score, 80.0);
    }

    fn is_invalid_index(err: &anyhow::Error) -> bool {
        matches!(
            err.downcast_ref::<ScoringError>(),
            Some(ScoringError::InvalidInput { field: "index", .. })
        )
    }

    #[test]
    fn test_delete_out_of_range() {
        let mut store = MemoryStore::new();
        append_session(&mut store, session(1, 70.0)).unwrap();

        let err = delete_session(&mut store, 0).unwrap_err();
        assert!(is_invalid_index(&err));
        let err = delete_session(&mut store, 2).unwrap_err();
        assert!(is_invalid_index(&err));
        assert_eq!(err.to_string(), "invalid index: 2 is not between 1 and 1");
        assert_eq!(load_sessions(&store).unwrap().len(), 1);
    }

    #[test]
    fn test_delete_from_empty_history() {
        let mut store = MemoryStore::new();
        let err = delete_session(&mut store, 1).unwrap_err();
        assert!(is_invalid_index(&err));
        assert_eq!(err.to_string(), "invalid index: no sessions saved yet");
    }

    #[test]
    fn test_sessions_persist_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = CacacheStore::new(dir.path());
        append_session(&mut store, session(1, 70.0)).unwrap();

        let reopened = CacacheStore::new(dir.path());
        let sessions = load_sessions(&reopened).unwrap();
        assert_eq!(sessions, vec![session(1, 70.0)]);
    }

    #[test]
    fn test_export_sessions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        let sessions = vec![session(1, 70.0), session(2, 72.5)];

        export_sessions(&path, &sessions).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<Session> = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1].total_score, 72.5);
    }
}
