//! In-memory session recorder, mainly for tests and embedding.

use parlour_core::{GameConfig, ResultsDocument, StateSnapshot};

use crate::events::EngineEvent;

use super::{ChatEntry, LogRecord, RecorderError, SessionRecorder, generate_session_id};

/// Recorder that keeps everything in process memory.
///
/// Mirrors [`super::FileRecorder`] semantics (record ids index the combined
/// log, results are terminal) without touching the filesystem.
pub struct MemoryRecorder {
    session_id: String,
    config: Option<GameConfig>,
    records: Vec<LogRecord>,
    chat: Vec<ChatEntry>,
    results: Option<ResultsDocument>,
}

impl MemoryRecorder {
    pub fn new(game_name: &str) -> Self {
        Self {
            session_id: generate_session_id(game_name),
            config: None,
            records: Vec::new(),
            chat: Vec::new(),
            results: None,
        }
    }

    pub fn config(&self) -> Option<&GameConfig> {
        self.config.as_ref()
    }

    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    /// Snapshots in the order they were recorded.
    pub fn snapshots(&self) -> impl Iterator<Item = &StateSnapshot> + '_ {
        self.records.iter().filter_map(|r| match r {
            LogRecord::Snapshot { snapshot, .. } => Some(snapshot),
            LogRecord::Event { .. } => None,
        })
    }

    /// Events in the order they were recorded.
    pub fn events(&self) -> impl Iterator<Item = &EngineEvent> + '_ {
        self.records.iter().filter_map(|r| match r {
            LogRecord::Event { event, .. } => Some(event),
            LogRecord::Snapshot { .. } => None,
        })
    }

    pub fn chat(&self) -> &[ChatEntry] {
        &self.chat
    }

    pub fn results(&self) -> Option<&ResultsDocument> {
        self.results.as_ref()
    }
}

impl SessionRecorder for MemoryRecorder {
    fn session_id(&self) -> &str {
        &self.session_id
    }

    fn save_config(&mut self, config: &GameConfig) -> Result<(), RecorderError> {
        self.config = Some(config.clone());
        Ok(())
    }

    fn save_snapshot(&mut self, snapshot: &StateSnapshot) -> Result<u64, RecorderError> {
        let record_id = self.records.len() as u64;
        self.records.push(LogRecord::Snapshot {
            session_id: self.session_id.clone(),
            record_id,
            snapshot: snapshot.clone(),
        });
        Ok(record_id)
    }

    fn save_event(&mut self, event: &EngineEvent) -> Result<u64, RecorderError> {
        let record_id = self.records.len() as u64;
        self.records.push(LogRecord::Event {
            session_id: self.session_id.clone(),
            record_id,
            timestamp: super::now_rfc3339(),
            event: event.clone(),
        });
        Ok(record_id)
    }

    fn save_chat(&mut self, entry: &ChatEntry) -> Result<(), RecorderError> {
        self.chat.push(entry.clone());
        Ok(())
    }

    fn save_results(&mut self, results: &ResultsDocument) -> Result<(), RecorderError> {
        if self.results.is_some() {
            return Err(RecorderError::ResultsAlreadySaved(self.session_id.clone()));
        }
        self.results = Some(results.clone());
        Ok(())
    }

    fn flush(&mut self) -> Result<(), RecorderError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_ids_index_the_combined_log() {
        let mut recorder = MemoryRecorder::new("mem");
        let id = recorder
            .save_event(&EngineEvent::PhaseStart {
                phase_id: "decision".to_string(),
                round: 1,
            })
            .unwrap();
        assert_eq!(id, 0);
        let id = recorder
            .save_event(&EngineEvent::PhaseEnd {
                phase_id: "decision".to_string(),
                round: 1,
                condition: true,
            })
            .unwrap();
        assert_eq!(id, 1);
        assert_eq!(recorder.events().count(), 2);
    }
}
