use chrono::{DateTime, Local};

use crate::{MatchId, PairingId, PlayerId};
use super::error::PairingError;
use super::game::Match;

/// Two players who play a series of matches against each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pairing {
    pub id: PairingId,
    first: PlayerId,
    second: PlayerId,
}

impl Pairing {
    /// Players are stored sorted, so inviting in either direction yields the same pair.
    pub fn new(id: PairingId, host: PlayerId, guest: PlayerId) -> Result<Self, PairingError> {
        if host == guest {
            return Err(PairingError::SelfInvite(host));
        }
        let (first, second) = canonical_pair(host, guest);
        Ok(Self { id, first, second })
    }

    pub fn first(&self) -> &PlayerId {
        &self.first
    }

    pub fn second(&self) -> &PlayerId {
        &self.second
    }

    pub fn key(&self) -> (PlayerId, PlayerId) {
        (self.first.clone(), self.second.clone())
    }

    /// The first match gives cross to the first player; every later match swaps
    /// the marks of the one before it.
    pub fn next_match(
        &self,
        previous: Option<&Match>,
        id: MatchId,
        now: DateTime<Local>,
    ) -> Result<Match, PairingError> {
        let (cross, circle) = match previous {
            Some(game) if !game.is_finished() => return Err(PairingError::MatchInProgress),
            Some(game) => (game.circle_player.clone(), game.cross_player.clone()),
            None => (self.first.clone(), self.second.clone()),
        };
        Ok(Match::new(id, self.id.clone(), cross, circle, now))
    }
}

pub fn canonical_pair(a: PlayerId, b: PlayerId) -> (PlayerId, PlayerId) {
    if a <= b { (a, b) } else { (b, a) }
}
