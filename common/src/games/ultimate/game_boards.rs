use super::board::{MainBoard, MiniBoard};
use super::error::MalformedLogError;
use super::move_log::MoveRecord;
use super::types::{BoardId, Mark, MiniBoardId, Outcome, Position};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MiniMove {
    pub board: MiniBoardId,
    pub position: Position,
    pub mark: Mark,
}

/// The nine mini boards and the main board, rebuilt from a match's move log.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct GameBoards {
    main: MainBoard,
    minis: [MiniBoard; 9],
    last_mini_move: Option<MiniMove>,
    mini_move_count: usize,
}

impl GameBoards {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reconstruct(moves: &[MoveRecord]) -> Result<Self, MalformedLogError> {
        let mut boards = Self::new();
        let mut previous_sequence: Option<u64> = None;

        for record in moves {
            if let Some(previous) = previous_sequence {
                if record.sequence <= previous {
                    return Err(MalformedLogError::SequenceNotIncreasing {
                        previous,
                        found: record.sequence,
                    });
                }
            }
            previous_sequence = Some(record.sequence);

            let board = BoardId::new(record.board_id).ok_or(MalformedLogError::BoardOutOfRange {
                sequence: record.sequence,
                board: record.board_id,
            })?;
            let position =
                Position::new(record.position).ok_or(MalformedLogError::PositionOutOfRange {
                    sequence: record.sequence,
                    position: record.position,
                })?;
            let duplicate = MalformedLogError::DuplicateCell {
                sequence: record.sequence,
                board: record.board_id,
                position: record.position,
            };

            match board.as_mini() {
                None => {
                    if !boards.main.is_empty_at(position) {
                        return Err(duplicate);
                    }
                    boards.main.set(position, record.value);
                }
                Some(mini) => {
                    let mark = record.value.winner().ok_or(MalformedLogError::DrawOnMiniBoard {
                        sequence: record.sequence,
                        board: record.board_id,
                    })?;
                    let expected = boards.next_mark();
                    if mark != expected {
                        return Err(MalformedLogError::TurnOutOfOrder {
                            sequence: record.sequence,
                            expected,
                            found: mark,
                        });
                    }
                    if !boards.minis[mini.index()].is_empty_at(position) {
                        return Err(duplicate);
                    }
                    boards.minis[mini.index()].set(position, mark);
                    boards.last_mini_move = Some(MiniMove { board: mini, position, mark });
                    boards.mini_move_count += 1;
                }
            }
        }

        Ok(boards)
    }

    pub fn main(&self) -> &MainBoard {
        &self.main
    }

    pub fn mini(&self, board: MiniBoardId) -> &MiniBoard {
        &self.minis[board.index()]
    }

    pub fn last_mini_move(&self) -> Option<MiniMove> {
        self.last_mini_move
    }

    pub fn mini_move_count(&self) -> usize {
        self.mini_move_count
    }

    /// Main-board moves record outcomes and do not count towards the turn.
    pub fn next_mark(&self) -> Mark {
        if self.mini_move_count % 2 == 0 {
            Mark::Cross
        } else {
            Mark::Circle
        }
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.main.evaluate()
    }

    pub fn is_resolved(&self, board: MiniBoardId) -> bool {
        !self.main.is_empty_at(board.cell())
    }

    pub fn is_playable(&self, board: MiniBoardId) -> bool {
        let mini = self.mini(board);
        !self.is_resolved(board) && mini.evaluate().is_none()
    }

    /// The mini board the previous move sends the next player to, if it is still open.
    pub fn forced_board(&self) -> Option<MiniBoardId> {
        let last = self.last_mini_move?;
        let target = MiniBoardId::from(last.position);
        if self.is_resolved(target) {
            None
        } else {
            Some(target)
        }
    }

    pub fn legal_moves(&self) -> Vec<(MiniBoardId, Position)> {
        if self.outcome().is_some() {
            return Vec::new();
        }
        let boards: Vec<MiniBoardId> = match self.forced_board() {
            Some(board) => vec![board],
            None => MiniBoardId::all().filter(|b| self.is_playable(*b)).collect(),
        };
        boards
            .into_iter()
            .flat_map(|board| self.mini(board).empty_positions().map(move |p| (board, p)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(sequence: u64, board_id: u8, position: u8, value: Outcome) -> MoveRecord {
        MoveRecord { board_id, position, value, sequence }
    }

    fn board(value: u8) -> MiniBoardId {
        MiniBoardId::new(value).unwrap()
    }

    #[test]
    fn test_empty_log_gives_fresh_boards() {
        let boards = GameBoards::reconstruct(&[]).unwrap();
        assert_eq!(boards.next_mark(), Mark::Cross);
        assert_eq!(boards.forced_board(), None);
        assert_eq!(boards.legal_moves().len(), 81);
        assert_eq!(boards.outcome(), None);
    }

    #[test]
    fn test_partitions_moves_by_board() {
        let moves = [
            record(1, 5, 5, Outcome::Cross),
            record(2, 5, 2, Outcome::Circle),
            record(3, 2, 5, Outcome::Cross),
        ];
        let boards = GameBoards::reconstruct(&moves).unwrap();
        assert_eq!(boards.mini(board(5)).get(Position::new(5).unwrap()), Some(Mark::Cross));
        assert_eq!(boards.mini(board(5)).get(Position::new(2).unwrap()), Some(Mark::Circle));
        assert_eq!(boards.mini(board(2)).get(Position::new(5).unwrap()), Some(Mark::Cross));
        assert_eq!(boards.mini_move_count(), 3);
        assert_eq!(boards.next_mark(), Mark::Circle);
        assert_eq!(boards.forced_board(), Some(board(5)));
    }

    #[test]
    fn test_main_board_moves_do_not_count_as_turns() {
        let moves = [
            record(1, 1, 1, Outcome::Cross),
            record(2, 0, 4, Outcome::Draw),
        ];
        let boards = GameBoards::reconstruct(&moves).unwrap();
        assert_eq!(boards.mini_move_count(), 1);
        assert_eq!(boards.next_mark(), Mark::Circle);
        assert!(boards.is_resolved(board(4)));
    }

    #[test]
    fn test_forced_board_released_when_target_resolved() {
        let moves = [
            record(1, 1, 3, Outcome::Cross),
            record(2, 0, 3, Outcome::Circle),
        ];
        let boards = GameBoards::reconstruct(&moves).unwrap();
        assert_eq!(boards.forced_board(), None);
        assert!(!boards.is_playable(board(3)));
        assert!(boards.legal_moves().iter().all(|(b, _)| *b != board(3)));
    }

    #[test]
    fn test_rejects_board_out_of_range() {
        let err = GameBoards::reconstruct(&[record(1, 10, 1, Outcome::Cross)]).unwrap_err();
        assert_eq!(err, MalformedLogError::BoardOutOfRange { sequence: 1, board: 10 });
    }

    #[test]
    fn test_rejects_position_out_of_range() {
        for position in [0, 10] {
            let err = GameBoards::reconstruct(&[record(1, 2, position, Outcome::Cross)]).unwrap_err();
            assert_eq!(err, MalformedLogError::PositionOutOfRange { sequence: 1, position });
        }
    }

    #[test]
    fn test_rejects_duplicate_cells() {
        let mini = [record(1, 2, 2, Outcome::Cross), record(2, 2, 2, Outcome::Circle)];
        assert!(matches!(
            GameBoards::reconstruct(&mini),
            Err(MalformedLogError::DuplicateCell { board: 2, position: 2, .. })
        ));

        let main = [record(1, 0, 2, Outcome::Cross), record(2, 0, 2, Outcome::Draw)];
        assert!(matches!(
            GameBoards::reconstruct(&main),
            Err(MalformedLogError::DuplicateCell { board: 0, position: 2, .. })
        ));
    }

    #[test]
    fn test_rejects_draw_on_mini_board() {
        let err = GameBoards::reconstruct(&[record(1, 4, 4, Outcome::Draw)]).unwrap_err();
        assert_eq!(err, MalformedLogError::DrawOnMiniBoard { sequence: 1, board: 4 });
    }

    #[test]
    fn test_rejects_out_of_order_sequence() {
        let moves = [record(5, 1, 1, Outcome::Cross), record(5, 1, 2, Outcome::Circle)];
        assert_eq!(
            GameBoards::reconstruct(&moves).unwrap_err(),
            MalformedLogError::SequenceNotIncreasing { previous: 5, found: 5 }
        );
    }

    #[test]
    fn test_rejects_repeated_mark() {
        let moves = [record(1, 1, 1, Outcome::Cross), record(2, 1, 2, Outcome::Cross)];
        assert_eq!(
            GameBoards::reconstruct(&moves).unwrap_err(),
            MalformedLogError::TurnOutOfOrder {
                sequence: 2,
                expected: Mark::Circle,
                found: Mark::Cross,
            }
        );
    }
}
