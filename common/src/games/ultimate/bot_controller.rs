use crate::games::SessionRng;
use super::board::{Board, CellValue};
use super::game_boards::GameBoards;
use super::types::{CELL_COUNT, Mark, MiniBoardId, Position};

pub struct BotInput {
    pub boards: GameBoards,
    pub bot_mark: Mark,
    pub forced_board: Option<MiniBoardId>,
}

impl BotInput {
    pub fn from_game_boards(boards: &GameBoards) -> Self {
        Self {
            boards: boards.clone(),
            bot_mark: boards.next_mark(),
            forced_board: boards.forced_board(),
        }
    }
}

pub fn calculate_move(input: &BotInput, rng: &mut SessionRng) -> Option<(MiniBoardId, Position)> {
    choose_move(&input.boards, input.bot_mark, input.forced_board, rng)
}

/// Picks the mini board (unless the opponent forced one) and then the cell.
pub fn choose_move(
    boards: &GameBoards,
    bot_mark: Mark,
    forced_board: Option<MiniBoardId>,
    rng: &mut SessionRng,
) -> Option<(MiniBoardId, Position)> {
    if boards.outcome().is_some() {
        return None;
    }

    let board = match forced_board.filter(|board| boards.is_playable(*board)) {
        Some(board) => board,
        None => {
            let main = boards.main();
            let cell = minimax(main, main.empty_count(), bot_mark, bot_mark, rng).position?;
            MiniBoardId::from(cell)
        }
    };

    let mini = boards.mini(board);
    let position = minimax(mini, mini.empty_count(), bot_mark, bot_mark, rng).position?;
    Some((board, position))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scored {
    pub score: i32,
    pub position: Option<Position>,
}

/// Exhaustive minimax over a single 3x3 board.
///
/// `depth` is the number of empty cells left. A finished line scores
/// `depth + 1` for the bot and `-(depth + 1)` against it, so quicker wins and
/// slower losses rank higher. An entirely empty board is answered with a
/// random cell instead of a search.
pub fn minimax<V: CellValue>(
    board: &Board<V>,
    depth: usize,
    turn: Mark,
    bot_mark: Mark,
    rng: &mut SessionRng,
) -> Scored {
    if let Some(winner) = board.line_winner() {
        let score = depth as i32 + 1;
        return Scored {
            score: if winner == bot_mark { score } else { -score },
            position: None,
        };
    }

    if depth == 0 {
        return Scored { score: 0, position: None };
    }

    if depth == CELL_COUNT {
        let index = rng.random_range(0..CELL_COUNT);
        return Scored { score: 0, position: Position::new(index as u8 + 1) };
    }

    let maximizing = turn == bot_mark;
    let mut best: Option<Scored> = None;

    for position in board.empty_positions() {
        let child = board.with(position, V::from(turn));
        let score = minimax(&child, depth - 1, turn.opponent(), bot_mark, rng).score;

        let better = match best {
            None => true,
            Some(current) if maximizing => score > current.score,
            Some(current) => score < current.score,
        };
        if better {
            best = Some(Scored { score, position: Some(position) });
        }
    }

    best.unwrap_or(Scored { score: 0, position: None })
}
