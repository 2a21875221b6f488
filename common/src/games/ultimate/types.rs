use std::fmt;

use serde::{Deserialize, Serialize};

pub const CELL_COUNT: usize = 9;
pub const MIN_POSITION: u8 = 1;
pub const MAX_POSITION: u8 = 9;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    Cross,
    Circle,
}

impl Mark {
    pub fn opponent(&self) -> Mark {
        match self {
            Mark::Cross => Mark::Circle,
            Mark::Circle => Mark::Cross,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Mark::Cross => 'X',
            Mark::Circle => 'O',
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mark::Cross => write!(f, "CROSS"),
            Mark::Circle => write!(f, "CIRCLE"),
        }
    }
}

/// Outcome of a single board or of a whole match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Cross,
    Circle,
    Draw,
}

impl Outcome {
    pub fn winner(&self) -> Option<Mark> {
        match self {
            Outcome::Cross => Some(Mark::Cross),
            Outcome::Circle => Some(Mark::Circle),
            Outcome::Draw => None,
        }
    }
}

impl From<Mark> for Outcome {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::Cross => Outcome::Cross,
            Mark::Circle => Outcome::Circle,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Cross => write!(f, "CROSS"),
            Outcome::Circle => write!(f, "CIRCLE"),
            Outcome::Draw => write!(f, "DRAW"),
        }
    }
}

/// Cell address inside a 3x3 board, 1..=9 in row-major order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position(u8);

impl Position {
    pub fn new(value: u8) -> Option<Self> {
        if (MIN_POSITION..=MAX_POSITION).contains(&value) {
            Some(Self(value))
        } else {
            None
        }
    }

    pub fn all() -> impl Iterator<Item = Position> {
        (MIN_POSITION..=MAX_POSITION).map(Position)
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub(crate) fn index(&self) -> usize {
        (self.0 - 1) as usize
    }

    pub(crate) fn from_index(index: usize) -> Self {
        debug_assert!(index < CELL_COUNT);
        Self(index as u8 + 1)
    }

    pub fn row(&self) -> usize {
        self.index() / 3
    }

    pub fn col(&self) -> usize {
        self.index() % 3
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Any board address: 0 is the main board, 1..=9 are the mini boards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BoardId(u8);

impl BoardId {
    pub const MAIN: BoardId = BoardId(0);
    pub const MAX: u8 = 9;

    pub fn new(value: u8) -> Option<Self> {
        if value <= Self::MAX {
            Some(Self(value))
        } else {
            None
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn is_main(&self) -> bool {
        self.0 == 0
    }

    pub fn as_mini(&self) -> Option<MiniBoardId> {
        MiniBoardId::new(self.0)
    }
}

impl fmt::Display for BoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One of the nine mini boards. Mini board N sits on main-board cell N.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MiniBoardId(Position);

impl MiniBoardId {
    pub fn new(value: u8) -> Option<Self> {
        Position::new(value).map(Self)
    }

    pub fn all() -> impl Iterator<Item = MiniBoardId> {
        Position::all().map(Self)
    }

    pub fn value(&self) -> u8 {
        self.0.value()
    }

    /// The main-board cell this mini board occupies.
    pub fn cell(&self) -> Position {
        self.0
    }

    pub fn board_id(&self) -> BoardId {
        BoardId(self.0.value())
    }

    pub(crate) fn index(&self) -> usize {
        self.0.index()
    }
}

impl From<Position> for MiniBoardId {
    fn from(position: Position) -> Self {
        Self(position)
    }
}

impl From<MiniBoardId> for BoardId {
    fn from(board: MiniBoardId) -> Self {
        board.board_id()
    }
}

impl fmt::Display for MiniBoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_bounds() {
        assert!(Position::new(0).is_none());
        assert!(Position::new(10).is_none());
        assert_eq!(Position::new(1).unwrap().value(), 1);
        assert_eq!(Position::all().count(), CELL_COUNT);
    }

    #[test]
    fn test_position_row_and_col() {
        let pos = Position::new(6).unwrap();
        assert_eq!(pos.row(), 1);
        assert_eq!(pos.col(), 2);
    }

    #[test]
    fn test_board_id_main_is_not_mini() {
        assert!(BoardId::MAIN.is_main());
        assert!(BoardId::MAIN.as_mini().is_none());
        assert!(BoardId::new(10).is_none());
        assert_eq!(BoardId::new(7).unwrap().as_mini().unwrap().value(), 7);
    }

    #[test]
    fn test_mini_board_maps_to_main_cell() {
        let board = MiniBoardId::new(4).unwrap();
        assert_eq!(board.cell(), Position::new(4).unwrap());
        assert_eq!(MiniBoardId::from(Position::new(4).unwrap()), board);
    }

    #[test]
    fn test_outcome_from_mark() {
        assert_eq!(Outcome::from(Mark::Circle), Outcome::Circle);
        assert_eq!(Outcome::Draw.winner(), None);
        assert_eq!(Mark::Cross.opponent(), Mark::Circle);
    }
}
