use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};

use ultimate_common::games::ultimate::{InMemoryMoveLog, Match, MoveError, Pairing, PairingError};
use ultimate_common::id_generator::generate_external_id;
use ultimate_common::{MatchId, PairingId, PlayerId, log};
use crate::service_error::ServiceError;

/// A match and its accepted moves, always locked together.
#[derive(Debug)]
pub struct MatchEntry {
    pub game: Match,
    pub log: InMemoryMoveLog,
}

pub type MatchHandle = Arc<Mutex<MatchEntry>>;

#[derive(Debug, Default)]
struct PairingTable {
    by_id: HashMap<PairingId, Pairing>,
    by_players: HashMap<(PlayerId, PlayerId), PairingId>,
    current_match: HashMap<PairingId, MatchId>,
}

/// Every map here is locked only briefly and never across a match lock wait.
#[derive(Debug, Clone, Default)]
pub struct MatchRegistry {
    pairings: Arc<Mutex<PairingTable>>,
    matches: Arc<Mutex<HashMap<MatchId, MatchHandle>>>,
}

impl MatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the pairing of the two players, creating it on first use.
    pub async fn find_or_create_pairing(
        &self,
        host: PlayerId,
        guest: PlayerId,
    ) -> Result<PairingId, PairingError> {
        let mut table = self.pairings.lock().await;
        let pairing = Pairing::new(PairingId::new(generate_external_id()), host, guest)?;

        if let Some(existing) = table.by_players.get(&pairing.key()) {
            return Ok(existing.clone());
        }

        let id = pairing.id.clone();
        log!(
            "[pairing:{}] Created for {} and {}",
            id,
            pairing.first(),
            pairing.second()
        );
        table.by_players.insert(pairing.key(), id.clone());
        table.by_id.insert(id.clone(), pairing);
        Ok(id)
    }

    pub async fn pairing(&self, id: &PairingId) -> Option<Pairing> {
        self.pairings.lock().await.by_id.get(id).cloned()
    }

    pub async fn current_match_id(&self, pairing: &PairingId) -> Option<MatchId> {
        self.pairings.lock().await.current_match.get(pairing).cloned()
    }

    /// Makes `game` the current match of its pairing, provided the current
    /// match is still `expected_previous`. A concurrent start that got there
    /// first leaves an unfinished match behind, so the loser sees `MatchInProgress`.
    pub async fn install_match(
        &self,
        expected_previous: Option<&MatchId>,
        game: Match,
    ) -> Result<MatchId, PairingError> {
        let mut table = self.pairings.lock().await;
        if table.current_match.get(&game.pairing) != expected_previous {
            return Err(PairingError::MatchInProgress);
        }

        let id = game.id.clone();
        table.current_match.insert(game.pairing.clone(), id.clone());
        let entry = MatchEntry {
            game,
            log: InMemoryMoveLog::new(),
        };
        self.matches
            .lock()
            .await
            .insert(id.clone(), Arc::new(Mutex::new(entry)));
        Ok(id)
    }

    pub async fn handle(&self, id: &MatchId) -> Option<MatchHandle> {
        self.matches.lock().await.get(id).cloned()
    }

    /// Exclusive access to one match. Waiting longer than `timeout` gives
    /// `Busy`; the caller decides whether to retry.
    pub async fn get_for_update(
        &self,
        id: &MatchId,
        timeout: Duration,
    ) -> Result<OwnedMutexGuard<MatchEntry>, ServiceError> {
        let handle = self
            .handle(id)
            .await
            .ok_or_else(|| ServiceError::UnknownMatch(id.clone()))?;

        tokio::time::timeout(timeout, handle.lock_owned())
            .await
            .map_err(|_| ServiceError::Move(MoveError::Busy))
    }
}
