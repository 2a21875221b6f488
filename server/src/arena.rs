use tokio::task::JoinSet;

use ultimate_common::games::SessionRng;
use ultimate_common::games::ultimate::{Accepted, MoveError, MoveRequest, Outcome, PairingError, render_grid};
use ultimate_common::id_generator::generate_player_name;
use ultimate_common::{MatchId, PlayerId, log, log_error, log_warn};
use crate::match_service::MatchService;
use crate::service_error::ServiceError;

/// One mini move per cell at most.
const MAX_MOVES_PER_MATCH: usize = 81;
const MAX_BUSY_RETRIES: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchReport {
    pub match_id: MatchId,
    pub cross: PlayerId,
    pub circle: PlayerId,
    pub result: Outcome,
    pub moves: usize,
}

impl MatchReport {
    pub fn winner(&self) -> Option<&PlayerId> {
        match self.result {
            Outcome::Cross => Some(&self.cross),
            Outcome::Circle => Some(&self.circle),
            Outcome::Draw => None,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ArenaSummary {
    pub cross_wins: usize,
    pub circle_wins: usize,
    pub draws: usize,
    pub failed_pairings: usize,
}

impl ArenaSummary {
    fn record(&mut self, report: &MatchReport) {
        match report.result {
            Outcome::Cross => self.cross_wins += 1,
            Outcome::Circle => self.circle_wins += 1,
            Outcome::Draw => self.draws += 1,
        }
    }

    pub fn matches(&self) -> usize {
        self.cross_wins + self.circle_wins + self.draws
    }
}

/// Runs every pairing on its own task; matches within a pairing run in order.
pub async fn run(
    service: &MatchService,
    mut rng: SessionRng,
    pairings: usize,
    matches_per_pairing: usize,
) -> ArenaSummary {
    let mut tasks = JoinSet::new();
    for index in 0..pairings {
        let service = service.clone();
        let mut pairing_rng = rng.fork();
        tasks.spawn(async move { play_pairing(&service, index, matches_per_pairing, &mut pairing_rng).await });
    }

    let mut summary = ArenaSummary::default();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Ok(reports)) => reports.iter().for_each(|report| summary.record(report)),
            Ok(Err(e)) => {
                log_error!("Pairing failed: {}", e);
                summary.failed_pairings += 1;
            }
            Err(e) => {
                log_error!("Pairing task panicked: {}", e);
                summary.failed_pairings += 1;
            }
        }
    }
    summary
}

pub async fn play_pairing(
    service: &MatchService,
    index: usize,
    matches: usize,
    rng: &mut SessionRng,
) -> Result<Vec<MatchReport>, ServiceError> {
    let host = PlayerId::new(format!("{} #{}", generate_player_name(), index * 2 + 1));
    let guest = PlayerId::new(format!("{} #{}", generate_player_name(), index * 2 + 2));
    let pairing = service.invite(host, guest).await?;

    let mut reports = Vec::with_capacity(matches);
    for _ in 0..matches {
        let match_id = service.start_match(&pairing).await?;
        if service.current_match(&pairing).await?.as_ref() != Some(&match_id) {
            return Err(PairingError::MatchInProgress.into());
        }
        reports.push(play_match(service, &match_id, rng).await?);
    }
    Ok(reports)
}

/// The opening move arrives encoded, the way a client sends it; the bots
/// play every move after it.
pub async fn play_match(
    service: &MatchService,
    match_id: &MatchId,
    rng: &mut SessionRng,
) -> Result<MatchReport, ServiceError> {
    play_opening(service, match_id, rng).await?;
    let mut moves = 1;
    while let Some(next) = service.next_player(match_id).await? {
        if moves == MAX_MOVES_PER_MATCH {
            return Err(ServiceError::Bot(format!("match {} did not finish", match_id)));
        }
        play_bot_turn(service, match_id, &next).await?;
        moves += 1;
    }

    let snapshot = service.snapshot(match_id).await?;
    let result = snapshot
        .game
        .result()
        .ok_or_else(|| ServiceError::Bot(format!("match {} has no result", match_id)))?;
    let report = MatchReport {
        match_id: match_id.clone(),
        cross: snapshot.game.cross_player.clone(),
        circle: snapshot.game.circle_player.clone(),
        result,
        moves,
    };
    let state = service.game_state(match_id, &report.cross).await?;

    match report.winner() {
        Some(winner) => log!(
            "[match:{}] {} wins as {} after {} moves, {} log records ({} vs {})\n{}",
            match_id,
            winner,
            result,
            moves,
            state.moves.len(),
            report.cross,
            report.circle,
            render_grid(&snapshot.boards)
        ),
        None => log!(
            "[match:{}] Draw after {} moves, {} log records ({} vs {})\n{}",
            match_id,
            moves,
            state.moves.len(),
            report.cross,
            report.circle,
            render_grid(&snapshot.boards)
        ),
    }
    Ok(report)
}

async fn play_opening(
    service: &MatchService,
    match_id: &MatchId,
    rng: &mut SessionRng,
) -> Result<Accepted, ServiceError> {
    let snapshot = service.snapshot(match_id).await?;
    let legal = snapshot.boards.legal_moves();
    if legal.is_empty() {
        return Err(ServiceError::Bot(format!("match {} has no legal opening", match_id)));
    }
    let (board, position) = legal[rng.random_range(0..legal.len())];
    let opener = snapshot.game.player_of(snapshot.boards.next_mark());
    let bytes = MoveRequest::from_move(board, position).to_bytes();
    service.submit_encoded_move(match_id, opener, &bytes).await
}

async fn play_bot_turn(service: &MatchService, match_id: &MatchId, bot: &PlayerId) -> Result<Accepted, ServiceError> {
    let mut attempt = 0;
    loop {
        match service.play_bot_move(match_id, bot).await {
            Err(e) if e.move_error() == Some(&MoveError::Busy) && attempt < MAX_BUSY_RETRIES => {
                attempt += 1;
                log_warn!(
                    "[match:{}] Busy, retrying move of {} ({}/{})",
                    match_id,
                    bot,
                    attempt,
                    MAX_BUSY_RETRIES
                );
            }
            result => return result,
        }
    }
}
