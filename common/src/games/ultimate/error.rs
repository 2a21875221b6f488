use std::fmt;

use crate::PlayerId;
use super::types::{BoardId, Mark, MiniBoardId, Outcome, Position};

/// The request never reached the rules: a field is missing, undecodable or out of range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidInput {
    Undecodable(String),
    BoardOutOfRange(u32),
    PositionOutOfRange(u32),
}

impl fmt::Display for InvalidInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidInput::Undecodable(e) => write!(f, "Invalid input: {}", e),
            InvalidInput::BoardOutOfRange(v) => write!(f, "Invalid input: board {} is not in 1..=9", v),
            InvalidInput::PositionOutOfRange(v) => {
                write!(f, "Invalid input: position {} is not in 1..=9", v)
            }
        }
    }
}

impl std::error::Error for InvalidInput {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleViolation {
    UnknownPlayer(PlayerId),
    MatchFinished(Outcome),
    InvalidBoard(BoardId),
    InvalidMark { expected: Mark, given: Mark },
    WrongBoard { expected: MiniBoardId, given: MiniBoardId },
    BoardFilled(MiniBoardId),
    PositionOccupied { board: MiniBoardId, position: Position },
}

impl fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleViolation::UnknownPlayer(player) => {
                write!(f, "Player {} is not in this match", player)
            }
            RuleViolation::MatchFinished(result) => {
                write!(f, "Match is already finished with result {}", result)
            }
            RuleViolation::InvalidBoard(board) => {
                write!(f, "Board {} is not a mini-board", board)
            }
            RuleViolation::InvalidMark { expected, given } => {
                write!(f, "Not your turn: {} to move, got {}", expected, given)
            }
            RuleViolation::WrongBoard { expected, given } => {
                write!(f, "Wrong mini-board: expected {}, got {}", expected, given)
            }
            RuleViolation::BoardFilled(board) => {
                write!(f, "Wrong mini-board, board nr: {} is filled", board)
            }
            RuleViolation::PositionOccupied { board, position } => {
                write!(f, "Position {} on board {} is already taken", position, board)
            }
        }
    }
}

impl std::error::Error for RuleViolation {}

/// A persisted move log that no sequence of accepted moves could have produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedLogError {
    BoardOutOfRange { sequence: u64, board: u8 },
    PositionOutOfRange { sequence: u64, position: u8 },
    DuplicateCell { sequence: u64, board: u8, position: u8 },
    DrawOnMiniBoard { sequence: u64, board: u8 },
    SequenceNotIncreasing { previous: u64, found: u64 },
    TurnOutOfOrder { sequence: u64, expected: Mark, found: Mark },
}

impl fmt::Display for MalformedLogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedLogError::BoardOutOfRange { sequence, board } => {
                write!(f, "Move #{}: unexpected board {}", sequence, board)
            }
            MalformedLogError::PositionOutOfRange { sequence, position } => {
                write!(f, "Move #{}: unexpected position {}", sequence, position)
            }
            MalformedLogError::DuplicateCell { sequence, board, position } => {
                write!(f, "Move #{}: board {} position {} recorded twice", sequence, board, position)
            }
            MalformedLogError::DrawOnMiniBoard { sequence, board } => {
                write!(f, "Move #{}: DRAW recorded on mini-board {}", sequence, board)
            }
            MalformedLogError::SequenceNotIncreasing { previous, found } => {
                write!(f, "Move sequence went from {} to {}", previous, found)
            }
            MalformedLogError::TurnOutOfOrder { sequence, expected, found } => {
                write!(f, "Move #{}: expected {}, found {}", sequence, expected, found)
            }
        }
    }
}

impl std::error::Error for MalformedLogError {}

/// Raised by a move log when (match, board, position) already exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConflict {
    pub board: BoardId,
    pub position: Position,
}

impl fmt::Display for LogConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board {} position {} is already in the log", self.board, self.position)
    }
}

impl std::error::Error for LogConflict {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityFault {
    MalformedLog(MalformedLogError),
    LogConflict(LogConflict),
    PropagationConflict { board: MiniBoardId, outcome: Outcome },
    ResultAlreadySet { existing: Outcome, attempted: Outcome },
}

impl fmt::Display for IntegrityFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityFault::MalformedLog(e) => write!(f, "Malformed move log: {}", e),
            IntegrityFault::LogConflict(e) => write!(f, "Move log conflict: {}", e),
            IntegrityFault::PropagationConflict { board, outcome } => write!(
                f,
                "Main board refused result {} of mini-board {}",
                outcome, board
            ),
            IntegrityFault::ResultAlreadySet { existing, attempted } => write!(
                f,
                "Match result {} cannot be replaced with {}",
                existing, attempted
            ),
        }
    }
}

impl std::error::Error for IntegrityFault {}

impl From<MalformedLogError> for IntegrityFault {
    fn from(e: MalformedLogError) -> Self {
        IntegrityFault::MalformedLog(e)
    }
}

impl From<LogConflict> for IntegrityFault {
    fn from(e: LogConflict) -> Self {
        IntegrityFault::LogConflict(e)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    InvalidInput(InvalidInput),
    Rejected(RuleViolation),
    Integrity(IntegrityFault),
    Busy,
}

impl MoveError {
    /// Only a lock timeout or a corrected request is worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, MoveError::Busy | MoveError::InvalidInput(_))
    }

    pub fn rule_violation(&self) -> Option<&RuleViolation> {
        match self {
            MoveError::Rejected(violation) => Some(violation),
            _ => None,
        }
    }
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::InvalidInput(e) => write!(f, "{}", e),
            MoveError::Rejected(e) => write!(f, "{}", e),
            MoveError::Integrity(e) => write!(f, "Integrity fault: {}", e),
            MoveError::Busy => write!(f, "Match is busy, try again"),
        }
    }
}

impl std::error::Error for MoveError {}

impl From<InvalidInput> for MoveError {
    fn from(e: InvalidInput) -> Self {
        MoveError::InvalidInput(e)
    }
}

impl From<RuleViolation> for MoveError {
    fn from(e: RuleViolation) -> Self {
        MoveError::Rejected(e)
    }
}

impl From<IntegrityFault> for MoveError {
    fn from(e: IntegrityFault) -> Self {
        MoveError::Integrity(e)
    }
}

impl From<MalformedLogError> for MoveError {
    fn from(e: MalformedLogError) -> Self {
        MoveError::Integrity(e.into())
    }
}

impl From<LogConflict> for MoveError {
    fn from(e: LogConflict) -> Self {
        MoveError::Integrity(e.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairingError {
    SelfInvite(PlayerId),
    MatchInProgress,
}

impl fmt::Display for PairingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PairingError::SelfInvite(player) => write!(f, "Player {} cannot invite themselves", player),
            PairingError::MatchInProgress => write!(f, "Previous match is not finished yet"),
        }
    }
}

impl std::error::Error for PairingError {}
