//! Falling-block puzzle engine with a terminal frontend
//!
//! The engine is synchronous and clock-free: a [`Session`] is driven by
//! [`Session::tick`] and [`Session::handle_input`] with timestamps supplied by
//! the frame driver. Finished games go to a [`ScoreReporter`], which talks to
//! a `zenoh_leaderboard::ScoreSink` in the background.

pub mod clock;
pub mod game;
pub mod generator;
pub mod gravity;
pub mod grid;
pub mod line_clear;
pub mod movement;
pub mod piece;
pub mod profile;
pub mod reporter;
pub mod state;
pub mod term_render;

pub use game::{GameResult, GameStatus, Input, Session, StepResult};
pub use generator::{PieceGenerator, RandomPieces, SequencePieces};
pub use grid::{Cell, Grid, COLS, ROWS};
pub use line_clear::Scoring;
pub use movement::is_valid_move;
pub use piece::{Color, Piece, PieceKind, Shape};
pub use profile::Profile;
pub use reporter::{LeaderboardUpdate, ScoreReporter};
pub use state::GameSnapshot;
pub use term_render::{AnsiTermStyle, GameScreen, PlainTermStyle, TermRender};
