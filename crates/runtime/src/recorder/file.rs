//! File-backed session recorder.
//!
//! Layout of a session directory:
//!
//! ```text
//! {base_dir}/{game_name}_{yyyymmdd_HHMMSS}/
//!   config.json      resolved configuration copy
//!   game_log.jsonl   interleaved snapshot + event records
//!   chat_log.jsonl   agent interactions
//!   results.json     final results (written once, terminal)
//! ```

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use parlour_core::{GameConfig, ResultsDocument, StateSnapshot};
use serde::{Serialize, de::DeserializeOwned};

use crate::events::EngineEvent;

use super::{ChatEntry, LogRecord, RecorderError, SessionRecorder, generate_session_id};

/// Generic append-only newline-delimited JSON log.
///
/// One serialized record per line. Creation refuses to reuse an existing
/// file so a session can never silently overwrite an earlier run's log.
pub struct JsonlLog<T> {
    path: PathBuf,
    writer: BufWriter<File>,
    records: u64,
    _phantom: PhantomData<T>,
}

impl<T> JsonlLog<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Create a new log file. Fails if the file already exists.
    pub fn create(dir: &Path, filename: &str) -> Result<Self, RecorderError> {
        let path = dir.join(filename);
        let file = OpenOptions::new().create_new(true).write(true).open(&path)?;
        tracing::debug!(target: "runtime::recorder", path = %path.display(), "created log");
        Ok(Self {
            path,
            writer: BufWriter::new(file),
            records: 0,
            _phantom: PhantomData,
        })
    }

    /// Append one record. Returns the zero-based record index.
    pub fn append(&mut self, record: &T) -> Result<u64, RecorderError> {
        let line = serde_json::to_string(record)?;
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        let index = self.records;
        self.records += 1;
        Ok(index)
    }

    pub fn flush(&mut self) -> Result<(), RecorderError> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn len(&self) -> u64 {
        self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records == 0
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record back from a log file.
    pub fn read_all(path: &Path) -> Result<Vec<T>, RecorderError> {
        let reader = BufReader::new(File::open(path)?);
        let mut records = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            records.push(serde_json::from_str(&line)?);
        }
        Ok(records)
    }
}

impl<T> Drop for JsonlLog<T> {
    fn drop(&mut self) {
        if let Err(e) = self.writer.flush() {
            tracing::warn!(
                target: "runtime::recorder",
                path = %self.path.display(),
                "failed to flush log on drop: {e}"
            );
        }
    }
}

/// Session recorder writing to a per-session directory.
pub struct FileRecorder {
    session_id: String,
    dir: PathBuf,
    game_log: JsonlLog<LogRecord>,
    chat_log: JsonlLog<ChatEntry>,
    results_saved: bool,
}

impl FileRecorder {
    /// Create a fresh session directory under `base_dir`.
    pub fn create(base_dir: impl AsRef<Path>, game_name: &str) -> Result<Self, RecorderError> {
        let session_id = generate_session_id(game_name);
        let dir = base_dir.as_ref().join(&session_id);
        if dir.exists() {
            return Err(RecorderError::SessionAlreadyExists(
                dir.display().to_string(),
            ));
        }
        std::fs::create_dir_all(&dir)?;

        let game_log = JsonlLog::create(&dir, "game_log.jsonl")?;
        let chat_log = JsonlLog::create(&dir, "chat_log.jsonl")?;
        tracing::info!(
            target: "runtime::recorder",
            session = %session_id,
            dir = %dir.display(),
            "session created"
        );
        Ok(Self {
            session_id,
            dir,
            game_log,
            chat_log,
            results_saved: false,
        })
    }

    /// The session directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the final results file.
    pub fn results_path(&self) -> PathBuf {
        self.dir.join("results.json")
    }
}

impl SessionRecorder for FileRecorder {
    fn session_id(&self) -> &str {
        &self.session_id
    }

    fn save_config(&mut self, config: &GameConfig) -> Result<(), RecorderError> {
        let json = serde_json::to_string_pretty(config)?;
        std::fs::write(self.dir.join("config.json"), json)?;
        Ok(())
    }

    fn save_snapshot(&mut self, snapshot: &StateSnapshot) -> Result<u64, RecorderError> {
        let record_id = self.game_log.len();
        self.game_log.append(&LogRecord::Snapshot {
            session_id: self.session_id.clone(),
            record_id,
            snapshot: snapshot.clone(),
        })
    }

    fn save_event(&mut self, event: &EngineEvent) -> Result<u64, RecorderError> {
        let record_id = self.game_log.len();
        self.game_log.append(&LogRecord::Event {
            session_id: self.session_id.clone(),
            record_id,
            timestamp: super::now_rfc3339(),
            event: event.clone(),
        })
    }

    fn save_chat(&mut self, entry: &ChatEntry) -> Result<(), RecorderError> {
        self.chat_log.append(entry)?;
        Ok(())
    }

    fn save_results(&mut self, results: &ResultsDocument) -> Result<(), RecorderError> {
        if self.results_saved || self.results_path().exists() {
            return Err(RecorderError::ResultsAlreadySaved(self.session_id.clone()));
        }
        let json = serde_json::to_string_pretty(results)?;
        std::fs::write(self.results_path(), json)?;
        self.results_saved = true;
        self.flush()
    }

    fn flush(&mut self) -> Result<(), RecorderError> {
        self.game_log.flush()?;
        self.chat_log.flush()
    }
}
