use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::MatchId;
use super::error::LogConflict;
use super::types::{BoardId, Outcome, Position};

/// One accepted move as it is persisted. Fields stay raw so that a corrupted
/// store is caught by reconstruction instead of being unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub board_id: u8,
    pub position: u8,
    pub value: Outcome,
    pub sequence: u64,
}

/// A cell to be written: a mini-board mark or a main-board outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogEntry {
    pub board: BoardId,
    pub position: Position,
    pub value: Outcome,
}

pub trait MoveLog {
    fn read_all(&self, match_id: &MatchId) -> Vec<MoveRecord>;

    /// Writes every entry or none of them. A conflict on any entry leaves
    /// the log as it was.
    fn append_all(
        &mut self,
        match_id: &MatchId,
        entries: &[LogEntry],
    ) -> Result<Vec<MoveRecord>, LogConflict>;

    fn append(
        &mut self,
        match_id: &MatchId,
        board: BoardId,
        position: Position,
        value: Outcome,
    ) -> Result<MoveRecord, LogConflict> {
        let records = self.append_all(match_id, &[LogEntry { board, position, value }])?;
        records
            .into_iter()
            .next()
            .ok_or(LogConflict { board, position })
    }
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryMoveLog {
    moves: HashMap<MatchId, Vec<MoveRecord>>,
    next_sequence: u64,
}

impl InMemoryMoveLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a record as-is, bypassing every check. Used to load existing
    /// data and to model damaged stores.
    pub fn insert_raw(&mut self, match_id: &MatchId, record: MoveRecord) {
        self.next_sequence = self.next_sequence.max(record.sequence + 1);
        self.moves.entry(match_id.clone()).or_default().push(record);
    }
}

impl MoveLog for InMemoryMoveLog {
    fn read_all(&self, match_id: &MatchId) -> Vec<MoveRecord> {
        self.moves.get(match_id).cloned().unwrap_or_default()
    }

    fn append_all(
        &mut self,
        match_id: &MatchId,
        entries: &[LogEntry],
    ) -> Result<Vec<MoveRecord>, LogConflict> {
        let moves = self.moves.entry(match_id.clone()).or_default();
        for (index, entry) in entries.iter().enumerate() {
            let same_cell = |board: u8, position: u8| {
                board == entry.board.value() && position == entry.position.value()
            };
            let taken = moves.iter().any(|m| same_cell(m.board_id, m.position))
                || entries[..index]
                    .iter()
                    .any(|e| same_cell(e.board.value(), e.position.value()));
            if taken {
                return Err(LogConflict { board: entry.board, position: entry.position });
            }
        }

        let mut records = Vec::with_capacity(entries.len());
        for entry in entries {
            let record = MoveRecord {
                board_id: entry.board.value(),
                position: entry.position.value(),
                value: entry.value,
                sequence: self.next_sequence,
            };
            self.next_sequence += 1;
            moves.push(record);
            records.push(record);
        }
        Ok(records)
    }
}
