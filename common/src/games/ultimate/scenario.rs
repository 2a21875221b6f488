//! Text fixtures for whole games.
//!
//! A scenario is the 9x9 grid of all mini boards, one text line per grid row:
//!
//! ```text
//! ...|...|...*...|...|...*...|...|...
//! ...|...|...*...|X01|...*...|...|...
//! ...|...|...*O02|...|...*...|...|...
//! *** *** *** *** *** *** *** *** ***
//! ```
//!
//! `...` is an empty cell, `X05` is the fifth move of the game played by
//! cross. `|` separates cells, `*` separates mini boards and lines without a
//! `|` separate the rows of mini boards.

use std::fmt;

use super::game_boards::GameBoards;
use super::types::{Mark, MiniBoardId, Position};

const EMPTY_FIELD: &str = "...";
const FIELD_SEP: char = '|';
const MINI_BOARD_SEP: char = '*';
const GRID_SIZE: usize = 9;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioStep {
    pub code: String,
    pub mark: Mark,
    pub order: u32,
    pub board: MiniBoardId,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenarioError {
    BadField { row: usize, text: String },
    TooManyCells { row: usize },
    TooManyRows { row: usize },
    OrderGap { expected: u32, code: String },
    MarkOutOfTurn { code: String },
}

impl fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioError::BadField { row, text } => {
                write!(f, "Row {}: cannot read field '{}'", row, text)
            }
            ScenarioError::TooManyCells { row } => write!(f, "Row {} has more than 9 cells", row),
            ScenarioError::TooManyRows { row } => write!(f, "Row {} is past the 9 rows of the grid", row),
            ScenarioError::OrderGap { expected, code } => {
                write!(f, "Invalid order in step {}: expected move {}", code, expected)
            }
            ScenarioError::MarkOutOfTurn { code } => write!(f, "Invalid symbol in step {}", code),
        }
    }
}

impl std::error::Error for ScenarioError {}

/// Mini board and position of a cell of the 9x9 grid, both 0-based.
pub fn board_position_at(row: usize, col: usize) -> (MiniBoardId, Position) {
    let board = Position::from_index(row / 3 * 3 + col / 3);
    let position = Position::from_index(row % 3 * 3 + col % 3);
    (MiniBoardId::from(board), position)
}

/// Inverse of [`board_position_at`].
pub fn grid_cell_of(board: MiniBoardId, position: Position) -> (usize, usize) {
    let cell = board.cell();
    (cell.row() * 3 + position.row(), cell.col() * 3 + position.col())
}

pub fn parse_steps(text: &str, ensure_valid: bool) -> Result<Vec<ScenarioStep>, ScenarioError> {
    let mut steps = Vec::new();

    let rows = text
        .split_whitespace()
        .filter(|line| line.contains(FIELD_SEP));

    for (row, line) in rows.enumerate() {
        if row >= GRID_SIZE {
            return Err(ScenarioError::TooManyRows { row });
        }
        let fields = line.split([FIELD_SEP, MINI_BOARD_SEP]);
        for (col, field) in fields.enumerate() {
            if col >= GRID_SIZE {
                return Err(ScenarioError::TooManyCells { row });
            }
            if field == EMPTY_FIELD {
                continue;
            }
            let (mark, order) = parse_field(field).ok_or_else(|| ScenarioError::BadField {
                row,
                text: field.to_string(),
            })?;
            let (board, position) = board_position_at(row, col);
            steps.push(ScenarioStep {
                code: field.to_string(),
                mark,
                order,
                board,
                position,
            });
        }
    }

    steps.sort_by_key(|step| step.order);

    if ensure_valid {
        check_order(&steps)?;
        check_interleaved_marks(&steps)?;
    }

    Ok(steps)
}

fn parse_field(field: &str) -> Option<(Mark, u32)> {
    let mut chars = field.chars();
    let mark = match chars.next()? {
        'X' => Mark::Cross,
        'O' => Mark::Circle,
        _ => return None,
    };
    let order = chars.as_str().parse().ok()?;
    Some((mark, order))
}

fn check_order(steps: &[ScenarioStep]) -> Result<(), ScenarioError> {
    for (expected, step) in (1..).zip(steps) {
        if step.order != expected {
            return Err(ScenarioError::OrderGap {
                expected,
                code: step.code.clone(),
            });
        }
    }
    Ok(())
}

fn check_interleaved_marks(steps: &[ScenarioStep]) -> Result<(), ScenarioError> {
    let Some(first) = steps.first() else {
        return Ok(());
    };
    let mut mark = first.mark;
    for step in steps {
        if step.mark != mark {
            return Err(ScenarioError::MarkOutOfTurn {
                code: step.code.clone(),
            });
        }
        mark = mark.opponent();
    }
    Ok(())
}

/// Draws the position in scenario layout, marks without move numbers.
pub fn render_grid(boards: &GameBoards) -> String {
    let mut out = String::new();
    for row in 0..GRID_SIZE {
        if row > 0 && row % 3 == 0 {
            out.push_str(&vec!["***"; GRID_SIZE].join(" "));
            out.push('\n');
        }
        for col in 0..GRID_SIZE {
            if col > 0 {
                out.push(if col % 3 == 0 { MINI_BOARD_SEP } else { FIELD_SEP });
            }
            let (board, position) = board_position_at(row, col);
            match boards.mini(board).get(position) {
                Some(mark) => {
                    out.push(' ');
                    out.push(mark.symbol());
                    out.push(' ');
                }
                None => out.push_str(EMPTY_FIELD),
            }
        }
        out.push('\n');
    }
    out
}
