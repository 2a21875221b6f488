//! Ultimate tic-tac-toe: nine mini boards whose results fill a main board.
//!
//! The accepted-move log is the only source of truth. Every decision starts
//! by rebuilding [`GameBoards`] from it.

pub mod board;
pub mod bot_controller;
pub mod error;
pub mod game;
pub mod game_boards;
pub mod move_log;
pub mod pairing;
pub mod scenario;
pub mod types;
pub mod validator;
pub mod wire;

pub use board::{Board, CellValue, MainBoard, MiniBoard};
pub use bot_controller::{BotInput, calculate_move, choose_move};
pub use error::{
    IntegrityFault, InvalidInput, LogConflict, MalformedLogError, MoveError, PairingError,
    RuleViolation,
};
pub use game::Match;
pub use game_boards::{GameBoards, MiniMove};
pub use move_log::{InMemoryMoveLog, LogEntry, MoveLog, MoveRecord};
pub use pairing::Pairing;
pub use scenario::{ScenarioError, ScenarioStep, parse_steps, render_grid};
pub use types::{BoardId, Mark, MiniBoardId, Outcome, Position};
pub use validator::{Accepted, submit_move};
pub use wire::{GameStateView, MoveEntry, MoveRequest, WireValue};
