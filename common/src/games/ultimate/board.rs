use super::types::{CELL_COUNT, Mark, Outcome, Position};

pub const LINES: [[usize; 3]; 8] = [
    [1, 2, 3],
    [4, 5, 6],
    [7, 8, 9],
    [1, 4, 7],
    [2, 5, 8],
    [3, 6, 9],
    [1, 5, 9],
    [3, 5, 7],
];

/// A value that can sit in a board cell.
///
/// Only tokens that name a mark can take part in a line; a drawn mini board
/// still fills its main-board cell but never completes a line for anyone.
pub trait CellValue: Copy + PartialEq + From<Mark> {
    fn line_mark(&self) -> Option<Mark>;
}

impl CellValue for Mark {
    fn line_mark(&self) -> Option<Mark> {
        Some(*self)
    }
}

impl CellValue for Outcome {
    fn line_mark(&self) -> Option<Mark> {
        self.winner()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Board<V> {
    cells: [Option<V>; CELL_COUNT],
}

pub type MiniBoard = Board<Mark>;
pub type MainBoard = Board<Outcome>;

impl<V: CellValue> Default for Board<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: CellValue> Board<V> {
    pub fn new() -> Self {
        Self {
            cells: [None; CELL_COUNT],
        }
    }

    pub fn from_cells<I>(cells: I) -> Self
    where
        I: IntoIterator<Item = (Position, V)>,
    {
        let mut board = Self::new();
        for (position, value) in cells {
            board.set(position, value);
        }
        board
    }

    pub fn get(&self, position: Position) -> Option<V> {
        self.cells[position.index()]
    }

    pub fn is_empty_at(&self, position: Position) -> bool {
        self.get(position).is_none()
    }

    pub(crate) fn set(&mut self, position: Position, value: V) {
        self.cells[position.index()] = Some(value);
    }

    /// Copy of this board with one more cell filled.
    pub fn with(&self, position: Position, value: V) -> Self {
        let mut next = *self;
        next.set(position, value);
        next
    }

    pub fn empty_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(index, _)| Position::from_index(index))
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_none()).count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    pub fn line_winner(&self) -> Option<Mark> {
        LINES.iter().find_map(|&[a, b, c]| {
            let mark = self.cells[a - 1]?.line_mark()?;
            let same = |index: usize| {
                self.cells[index - 1].and_then(|value| value.line_mark()) == Some(mark)
            };
            if same(b) && same(c) { Some(mark) } else { None }
        })
    }

    pub fn evaluate(&self) -> Option<Outcome> {
        if let Some(mark) = self.line_winner() {
            return Some(Outcome::from(mark));
        }
        if self.is_full() {
            return Some(Outcome::Draw);
        }
        None
    }

    pub fn cells(&self) -> impl Iterator<Item = (Position, Option<V>)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(index, cell)| (Position::from_index(index), *cell))
    }
}
