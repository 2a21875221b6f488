use std::fmt;

use ultimate_common::games::ultimate::{InvalidInput, MoveError, PairingError};
use ultimate_common::{MatchId, PairingId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    UnknownPairing(PairingId),
    UnknownMatch(MatchId),
    Pairing(PairingError),
    Move(MoveError),
    Bot(String),
}

impl ServiceError {
    pub fn move_error(&self) -> Option<&MoveError> {
        match self {
            ServiceError::Move(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::UnknownPairing(id) => write!(f, "Pairing {} not found", id),
            ServiceError::UnknownMatch(id) => write!(f, "Match {} not found", id),
            ServiceError::Pairing(e) => write!(f, "{}", e),
            ServiceError::Move(e) => write!(f, "{}", e),
            ServiceError::Bot(reason) => write!(f, "Bot failed: {}", reason),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<PairingError> for ServiceError {
    fn from(e: PairingError) -> Self {
        ServiceError::Pairing(e)
    }
}

impl From<MoveError> for ServiceError {
    fn from(e: MoveError) -> Self {
        ServiceError::Move(e)
    }
}

impl From<InvalidInput> for ServiceError {
    fn from(e: InvalidInput) -> Self {
        ServiceError::Move(e.into())
    }
}
