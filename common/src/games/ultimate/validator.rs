use crate::{PlayerId, log, log_error};
use super::error::{IntegrityFault, MoveError, RuleViolation};
use super::game::Match;
use super::game_boards::GameBoards;
use super::move_log::{LogEntry, MoveLog};
use super::types::{BoardId, Mark, MiniBoardId, Outcome, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accepted {
    pub mark: Mark,
    pub board: MiniBoardId,
    pub position: Position,
    pub mini_outcome: Option<Outcome>,
    pub match_outcome: Option<Outcome>,
}

/// Validates one move against the current log and, if legal, records it.
///
/// The caller must hold the match exclusively for the whole call: `game` is
/// taken mutably so that only the owner of the match lock can submit. Every
/// rejection returns before the log is written. The mini move and the
/// main-board entry of a board it resolves go to the log as one batch, so a
/// store that refuses either entry leaves the log untouched.
pub fn submit_move<L: MoveLog>(
    log: &mut L,
    game: &mut Match,
    player: &PlayerId,
    board: BoardId,
    position: Position,
) -> Result<Accepted, MoveError> {
    let mark = game
        .mark_of(player)
        .ok_or_else(|| RuleViolation::UnknownPlayer(player.clone()))?;

    if let Some(result) = game.result() {
        return Err(RuleViolation::MatchFinished(result).into());
    }

    let mini = board.as_mini().ok_or(RuleViolation::InvalidBoard(board))?;

    let boards = GameBoards::reconstruct(&log.read_all(&game.id)).map_err(|e| {
        log_error!("[match:{}] Move log cannot be replayed: {}", game.id, e);
        MoveError::from(e)
    })?;

    let expected = boards.next_mark();
    if mark != expected {
        return Err(RuleViolation::InvalidMark { expected, given: mark }.into());
    }

    if let Some(required) = boards.forced_board() {
        if required != mini {
            return Err(RuleViolation::WrongBoard { expected: required, given: mini }.into());
        }
    }

    if boards.is_resolved(mini) {
        return Err(RuleViolation::BoardFilled(mini).into());
    }

    if !boards.mini(mini).is_empty_at(position) {
        return Err(RuleViolation::PositionOccupied { board: mini, position }.into());
    }

    let mini_outcome = boards.mini(mini).with(position, mark).evaluate();
    let match_outcome = mini_outcome
        .and_then(|outcome| boards.main().with(mini.cell(), outcome).evaluate());

    let mut entries = vec![LogEntry { board, position, value: Outcome::from(mark) }];
    if let Some(outcome) = mini_outcome {
        entries.push(LogEntry { board: BoardId::MAIN, position: mini.cell(), value: outcome });
    }

    log.append_all(&game.id, &entries).map_err(|conflict| {
        let fault = match mini_outcome {
            Some(outcome) if conflict.board.is_main() => {
                IntegrityFault::PropagationConflict { board: mini, outcome }
            }
            _ => conflict.into(),
        };
        integrity(game, fault)
    })?;

    if let Some(outcome) = mini_outcome {
        log!("[match:{}] Mini-board {} resolved: {}", game.id, mini, outcome);
    }

    if let Some(result) = match_outcome {
        game.set_result(result).map_err(|e| integrity(game, e))?;
        log!("[match:{}] Match finished: {}", game.id, result);
    }

    Ok(Accepted {
        mark,
        board: mini,
        position,
        mini_outcome,
        match_outcome,
    })
}

fn integrity(game: &Match, fault: IntegrityFault) -> MoveError {
    log_error!("[match:{}] {}", game.id, fault);
    MoveError::Integrity(fault)
}
