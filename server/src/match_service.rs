use std::sync::Arc;
use std::time::Duration;
use chrono::Local;
use tokio::sync::Mutex;

use ultimate_common::games::SessionRng;
use ultimate_common::games::ultimate::{
    Accepted, BotInput, GameBoards, GameStateView, Match, MoveError, MoveLog, MoveRequest,
    RuleViolation, calculate_move, submit_move,
};
use ultimate_common::id_generator::generate_external_id;
use ultimate_common::{MatchId, PairingId, PlayerId, log, log_error};
use crate::match_registry::{MatchEntry, MatchRegistry};
use crate::service_error::ServiceError;

/// Read-only copy of a match taken under its lock.
#[derive(Debug, Clone)]
pub struct MatchSnapshot {
    pub game: Match,
    pub boards: GameBoards,
}

#[derive(Clone)]
pub struct MatchService {
    registry: MatchRegistry,
    lock_timeout: Duration,
    rng: Arc<Mutex<SessionRng>>,
}

impl MatchService {
    pub fn new(lock_timeout: Duration, rng: SessionRng) -> Self {
        Self {
            registry: MatchRegistry::new(),
            lock_timeout,
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    pub async fn invite(&self, host: PlayerId, guest: PlayerId) -> Result<PairingId, ServiceError> {
        Ok(self.registry.find_or_create_pairing(host, guest).await?)
    }

    /// Starts the next match of the pairing with the marks swapped. Fails while
    /// the current match is unfinished.
    pub async fn start_match(&self, pairing_id: &PairingId) -> Result<MatchId, ServiceError> {
        let pairing = self
            .registry
            .pairing(pairing_id)
            .await
            .ok_or_else(|| ServiceError::UnknownPairing(pairing_id.clone()))?;

        let previous_id = self.registry.current_match_id(pairing_id).await;
        let previous = match &previous_id {
            Some(id) => Some(self.lock(id).await?.game.clone()),
            None => None,
        };

        let next = pairing.next_match(
            previous.as_ref(),
            MatchId::new(generate_external_id()),
            Local::now(),
        )?;
        let id = self
            .registry
            .install_match(previous_id.as_ref(), next)
            .await?;

        log!("[pairing:{}] Match {} started", pairing_id, id);
        Ok(id)
    }

    pub async fn current_match(&self, pairing_id: &PairingId) -> Result<Option<MatchId>, ServiceError> {
        if self.registry.pairing(pairing_id).await.is_none() {
            return Err(ServiceError::UnknownPairing(pairing_id.clone()));
        }
        Ok(self.registry.current_match_id(pairing_id).await)
    }

    /// Input shape is checked before the match lock is requested.
    pub async fn submit_move(
        &self,
        match_id: &MatchId,
        player: &PlayerId,
        request: &MoveRequest,
    ) -> Result<Accepted, ServiceError> {
        let (board, position) = request.validate()?;

        let mut entry = self.lock(match_id).await?;
        let MatchEntry { game, log } = &mut *entry;
        Ok(submit_move(log, game, player, board.board_id(), position)?)
    }

    pub async fn submit_encoded_move(
        &self,
        match_id: &MatchId,
        player: &PlayerId,
        bytes: &[u8],
    ) -> Result<Accepted, ServiceError> {
        let request = MoveRequest::decode_from(bytes)?;
        self.submit_move(match_id, player, &request).await
    }

    /// Searches and submits a move for `bot` while holding the match lock, so
    /// the position cannot change between the search and the submission.
    pub async fn play_bot_move(&self, match_id: &MatchId, bot: &PlayerId) -> Result<Accepted, ServiceError> {
        let mut entry = self.lock(match_id).await?;

        if entry.game.mark_of(bot).is_none() {
            return Err(MoveError::from(RuleViolation::UnknownPlayer(bot.clone())).into());
        }
        if let Some(result) = entry.game.result() {
            return Err(MoveError::from(RuleViolation::MatchFinished(result)).into());
        }

        let boards = GameBoards::reconstruct(&entry.log.read_all(match_id)).map_err(|e| {
            log_error!("[match:{}] Move log cannot be replayed: {}", match_id, e);
            MoveError::from(e)
        })?;
        let bot_input = BotInput::from_game_boards(&boards);
        let mut bot_rng = self.rng.lock().await.fork();

        let chosen = tokio::task::spawn_blocking(move || calculate_move(&bot_input, &mut bot_rng))
            .await
            .map_err(|e| ServiceError::Bot(e.to_string()))?;
        let Some((board, position)) = chosen else {
            return Err(ServiceError::Bot(format!("no move found in match {}", match_id)));
        };

        let MatchEntry { game, log } = &mut *entry;
        Ok(submit_move(log, game, bot, board.board_id(), position)?)
    }

    pub async fn game_state(&self, match_id: &MatchId, player: &PlayerId) -> Result<GameStateView, ServiceError> {
        let entry = self.lock(match_id).await?;
        let records = entry.log.read_all(match_id);
        Ok(GameStateView::build(
            &records,
            entry.game.result(),
            entry.game.mark_of(player),
        ))
    }

    /// The player whose turn it is, or `None` once the match is finished.
    pub async fn next_player(&self, match_id: &MatchId) -> Result<Option<PlayerId>, ServiceError> {
        let snapshot = self.snapshot(match_id).await?;
        if snapshot.game.is_finished() {
            return Ok(None);
        }
        let mark = snapshot.boards.next_mark();
        Ok(Some(snapshot.game.player_of(mark).clone()))
    }

    pub async fn snapshot(&self, match_id: &MatchId) -> Result<MatchSnapshot, ServiceError> {
        let entry = self.lock(match_id).await?;
        let boards = GameBoards::reconstruct(&entry.log.read_all(match_id)).map_err(MoveError::from)?;
        Ok(MatchSnapshot {
            game: entry.game.clone(),
            boards,
        })
    }

    async fn lock(&self, match_id: &MatchId) -> Result<tokio::sync::OwnedMutexGuard<MatchEntry>, ServiceError> {
        self.registry.get_for_update(match_id, self.lock_timeout).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;
    use ultimate_common::games::ultimate::{InvalidInput, Mark, MiniBoardId, Outcome, WireValue};

    const MAX_MOVES: usize = 81;

    fn player(name: &str) -> PlayerId {
        PlayerId::new(name.to_string())
    }

    fn service(seed: u64) -> MatchService {
        ultimate_common::logger::init_logger(Some("test".to_string()));
        MatchService::new(Duration::from_millis(50), SessionRng::new(seed))
    }

    async fn new_match(service: &MatchService) -> (PairingId, MatchId) {
        let pairing = service.invite(player("ann"), player("bob")).await.unwrap();
        let game = service.start_match(&pairing).await.unwrap();
        (pairing, game)
    }

    async fn play_out(service: &MatchService, match_id: &MatchId) -> Outcome {
        for _ in 0..MAX_MOVES {
            match service.next_player(match_id).await.unwrap() {
                Some(next) => {
                    service.play_bot_move(match_id, &next).await.unwrap();
                }
                None => break,
            }
        }
        service.snapshot(match_id).await.unwrap().game.result().unwrap()
    }

    #[tokio::test]
    async fn test_invite_is_idempotent() {
        let service = service(1);
        let first = service.invite(player("ann"), player("bob")).await.unwrap();
        let second = service.invite(player("bob"), player("ann")).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(service.current_match(&first).await, Ok(None));
    }

    #[tokio::test]
    async fn test_unknown_pairing_and_match() {
        let service = service(1);
        let pairing = PairingId::new("missing".to_string());
        assert_eq!(
            service.start_match(&pairing).await,
            Err(ServiceError::UnknownPairing(pairing.clone()))
        );
        let game = MatchId::new("missing".to_string());
        assert_eq!(
            service.next_player(&game).await,
            Err(ServiceError::UnknownMatch(game.clone()))
        );
    }

    #[tokio::test]
    async fn test_second_start_blocked_until_finished() {
        let service = service(2);
        let (pairing, _) = new_match(&service).await;
        assert_eq!(
            service.start_match(&pairing).await,
            Err(ServiceError::Pairing(ultimate_common::games::ultimate::PairingError::MatchInProgress))
        );
    }

    #[tokio::test]
    async fn test_submit_move_and_read_state() {
        let service = service(3);
        let (_, game) = new_match(&service).await;
        let cross = service.next_player(&game).await.unwrap().unwrap();
        assert_eq!(cross, player("ann"));

        let accepted = service
            .submit_move(&game, &cross, &MoveRequest::new(5, 5))
            .await
            .unwrap();
        assert_eq!(accepted.mark, Mark::Cross);

        let view = service.game_state(&game, &player("bob")).await.unwrap();
        assert_eq!(view.moves.len(), 1);
        assert_eq!(view.moves[0].value(), WireValue::Cross);
        assert_eq!(view.your_mark(), WireValue::Circle);
        assert_eq!(view.result, None);
        assert_eq!(service.next_player(&game).await.unwrap(), Some(player("bob")));
    }

    #[tokio::test]
    async fn test_invalid_wire_input_leaves_log_unchanged() {
        let service = service(4);
        let (_, game) = new_match(&service).await;

        let err = service
            .submit_move(&game, &player("ann"), &MoveRequest::new(0, 5))
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::Move(MoveError::InvalidInput(InvalidInput::BoardOutOfRange(0))));

        let err = service
            .submit_encoded_move(&game, &player("ann"), &[0xff, 0xff, 0xff])
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Move(MoveError::InvalidInput(InvalidInput::Undecodable(_)))));

        let encoded = MoveRequest::new(1, 9).encode_to_vec();
        service
            .submit_encoded_move(&game, &player("ann"), &encoded)
            .await
            .unwrap();
        assert_eq!(service.game_state(&game, &player("ann")).await.unwrap().moves.len(), 1);
    }

    #[tokio::test]
    async fn test_held_lock_reports_busy() {
        let service = service(5);
        let (_, game) = new_match(&service).await;

        let guard = service.registry.get_for_update(&game, Duration::from_millis(50)).await.unwrap();
        let err = service
            .submit_move(&game, &player("ann"), &MoveRequest::new(5, 5))
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::Move(MoveError::Busy));
        assert!(err.move_error().is_some_and(MoveError::is_retryable));
        drop(guard);

        service
            .submit_move(&game, &player("ann"), &MoveRequest::new(5, 5))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_concurrent_submissions_accept_one() {
        let service = service(6);
        let (_, game) = new_match(&service).await;

        let left = service.clone();
        let right = service.clone();
        let (game_left, game_right) = (game.clone(), game.clone());
        let first = tokio::spawn(async move {
            left.submit_move(&game_left, &player("ann"), &MoveRequest::new(5, 5)).await
        });
        let second = tokio::spawn(async move {
            right.submit_move(&game_right, &player("ann"), &MoveRequest::new(1, 1)).await
        });
        let results = [first.await.unwrap(), second.await.unwrap()];

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        let rejected = results.iter().find_map(|r| r.as_ref().err()).unwrap();
        assert_eq!(
            rejected,
            &ServiceError::Move(MoveError::Rejected(RuleViolation::InvalidMark {
                expected: Mark::Circle,
                given: Mark::Cross,
            }))
        );
        assert_eq!(service.game_state(&game, &player("ann")).await.unwrap().moves.len(), 1);
    }

    #[tokio::test]
    async fn test_bot_game_finishes_with_only_accepted_moves() {
        let service = service(7);
        let (_, game) = new_match(&service).await;
        let result = play_out(&service, &game).await;

        let snapshot = service.snapshot(&game).await.unwrap();
        assert_eq!(snapshot.boards.outcome(), Some(result));
        assert_eq!(service.next_player(&game).await.unwrap(), None);

        let err = service.play_bot_move(&game, &player("ann")).await.unwrap_err();
        assert_eq!(err, ServiceError::Move(MoveError::Rejected(RuleViolation::MatchFinished(result))));
    }

    #[tokio::test]
    async fn test_bot_follows_forced_board() {
        let service = service(8);
        let (_, game) = new_match(&service).await;
        service
            .submit_move(&game, &player("ann"), &MoveRequest::new(2, 7))
            .await
            .unwrap();

        let accepted = service.play_bot_move(&game, &player("bob")).await.unwrap();
        assert_eq!(accepted.board, MiniBoardId::new(7).unwrap());
        assert_eq!(accepted.mark, Mark::Circle);
    }

    #[tokio::test]
    async fn test_bot_out_of_turn_is_rejected() {
        let service = service(9);
        let (_, game) = new_match(&service).await;
        let err = service.play_bot_move(&game, &player("bob")).await.unwrap_err();
        assert_eq!(
            err,
            ServiceError::Move(MoveError::Rejected(RuleViolation::InvalidMark {
                expected: Mark::Cross,
                given: Mark::Circle,
            }))
        );
        assert_eq!(
            service.play_bot_move(&game, &player("eve")).await.unwrap_err(),
            ServiceError::Move(MoveError::Rejected(RuleViolation::UnknownPlayer(player("eve"))))
        );
    }

    #[tokio::test]
    async fn test_marks_swap_for_next_match() {
        let service = service(10);
        let (pairing, first) = new_match(&service).await;
        play_out(&service, &first).await;

        let second = service.start_match(&pairing).await.unwrap();
        assert_ne!(first, second);
        assert_eq!(service.current_match(&pairing).await, Ok(Some(second.clone())));

        let snapshot = service.snapshot(&second).await.unwrap();
        assert_eq!(snapshot.game.cross_player, player("bob"));
        assert_eq!(snapshot.game.circle_player, player("ann"));
        assert_eq!(service.next_player(&second).await.unwrap(), Some(player("bob")));
    }

    #[tokio::test]
    async fn test_same_seed_replays_same_game() {
        let mut results = Vec::new();
        for _ in 0..2 {
            let service = service(11);
            let (_, game) = new_match(&service).await;
            play_out(&service, &game).await;
            results.push(service.game_state(&game, &player("ann")).await.unwrap().moves);
        }
        assert_eq!(results[0], results[1]);
    }
}
