use prost::Message;
use serde::{Deserialize, Serialize};

use super::error::InvalidInput;
use super::move_log::MoveRecord;
use super::types::{Mark, MiniBoardId, Outcome, Position};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration, Serialize, Deserialize,
)]
#[repr(i32)]
pub enum WireValue {
    Unspecified = 0,
    Cross = 1,
    Circle = 2,
    Draw = 3,
}

impl From<Outcome> for WireValue {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Cross => WireValue::Cross,
            Outcome::Circle => WireValue::Circle,
            Outcome::Draw => WireValue::Draw,
        }
    }
}

impl From<Mark> for WireValue {
    fn from(mark: Mark) -> Self {
        WireValue::from(Outcome::from(mark))
    }
}

#[derive(Clone, PartialEq, Message, Serialize, Deserialize)]
pub struct MoveRequest {
    #[prost(uint32, tag = "1")]
    pub board: u32,
    #[prost(uint32, tag = "2")]
    pub position: u32,
}

impl MoveRequest {
    pub fn new(board: u32, position: u32) -> Self {
        Self { board, position }
    }

    pub fn from_move(board: MiniBoardId, position: Position) -> Self {
        Self::new(u32::from(board.value()), u32::from(position.value()))
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.encode_to_vec()
    }

    pub fn decode_from(bytes: &[u8]) -> Result<Self, InvalidInput> {
        Self::decode(bytes).map_err(|e| InvalidInput::Undecodable(e.to_string()))
    }

    /// Both fields must be in 1..=9; the main board is never a valid target.
    pub fn validate(&self) -> Result<(MiniBoardId, Position), InvalidInput> {
        let board = u8::try_from(self.board)
            .ok()
            .and_then(MiniBoardId::new)
            .ok_or(InvalidInput::BoardOutOfRange(self.board))?;
        let position = u8::try_from(self.position)
            .ok()
            .and_then(Position::new)
            .ok_or(InvalidInput::PositionOutOfRange(self.position))?;
        Ok((board, position))
    }
}

#[derive(Clone, PartialEq, Message, Serialize, Deserialize)]
pub struct MoveEntry {
    #[prost(uint32, tag = "1")]
    pub board: u32,
    #[prost(uint32, tag = "2")]
    pub position: u32,
    #[prost(enumeration = "WireValue", tag = "3")]
    pub value: i32,
}

impl From<&MoveRecord> for MoveEntry {
    fn from(record: &MoveRecord) -> Self {
        Self {
            board: record.board_id as u32,
            position: record.position as u32,
            value: WireValue::from(record.value) as i32,
        }
    }
}

/// Everything a player needs to draw the match: the accepted moves in order,
/// the result if any, and which mark the requesting player holds.
#[derive(Clone, PartialEq, Message, Serialize, Deserialize)]
pub struct GameStateView {
    #[prost(message, repeated, tag = "1")]
    pub moves: Vec<MoveEntry>,
    #[prost(enumeration = "WireValue", optional, tag = "2")]
    pub result: Option<i32>,
    #[prost(enumeration = "WireValue", optional, tag = "3")]
    pub your_mark: Option<i32>,
}

impl GameStateView {
    pub fn build(records: &[MoveRecord], result: Option<Outcome>, your_mark: Option<Mark>) -> Self {
        Self {
            moves: records.iter().map(MoveEntry::from).collect(),
            result: result.map(|r| WireValue::from(r) as i32),
            your_mark: your_mark.map(|m| WireValue::from(m) as i32),
        }
    }
}
