//! Game loop controller
//!
//! A [`Session`] is one player's game: the grid, the falling piece, the
//! preview and hold slots, the score and the `Running` / `Paused` /
//! `GameOver` state machine. It never reads a clock itself: every call that
//! can affect timing takes the frame driver's monotonic `now_ms`.

use serde::{Deserialize, Serialize};

use crate::clock::PlayClock;
use crate::generator::PieceGenerator;
use crate::gravity::DropTimer;
use crate::grid::Grid;
use crate::line_clear::{settle, Scoring};
use crate::movement::{drop_to_floor, is_valid_move, try_rotate, try_translate};
use crate::piece::{Piece, PieceKind};
use crate::state::GameSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    Running,
    Paused,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Input {
    MoveLeft,
    MoveRight,
    MoveDown,
    Rotate,
    HardDrop,
    Hold,
}

/// What a call to [`Session::tick`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    /// Not running, or the drop interval has not elapsed yet
    Idle,
    /// Gravity moved the piece one row down
    Moved,
    /// The piece settled and the next one spawned
    Landed { lines_cleared: usize },
    /// The piece settled and the next one had no room
    GameOver,
}

/// Final numbers of a finished game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    /// Game number within this session, starting at 1
    pub game_id: u64,
    pub score: u64,
    pub lines: u32,
    pub level: u32,
    pub play_time_ms: u64,
}

pub struct Session {
    grid: Grid,
    generator: Box<dyn PieceGenerator>,
    current: Piece,
    next: Piece,
    hold: Option<PieceKind>,
    can_hold: bool,
    scoring: Scoring,
    status: GameStatus,
    timer: DropTimer,
    clock: PlayClock,
    game_id: u64,
    result: Option<GameResult>,
}

impl Session {
    /// New game on an empty 20 x 10 grid
    pub fn new(generator: Box<dyn PieceGenerator>, now_ms: u64) -> Self {
        Self::with_grid(Grid::default(), generator, now_ms)
    }

    /// New game on a pre-filled grid
    ///
    /// If the first piece has no room the session starts in `GameOver`
    /// and the grid is left as given.
    pub fn with_grid(grid: Grid, mut generator: Box<dyn PieceGenerator>, now_ms: u64) -> Self {
        let current = generator.generate(grid.cols());
        let next = generator.generate(grid.cols());
        let mut session = Self {
            grid,
            generator,
            current,
            next,
            hold: None,
            can_hold: true,
            scoring: Scoring::default(),
            status: GameStatus::Running,
            timer: DropTimer::new(),
            clock: PlayClock::start(now_ms),
            game_id: 1,
            result: None,
        };
        if !session.current_fits() {
            session.enter_game_over(now_ms);
        }
        session
    }

    /// Advance gravity to `now_ms`
    pub fn tick(&mut self, now_ms: u64) -> StepResult {
        if self.status != GameStatus::Running {
            return StepResult::Idle;
        }
        if !self.timer.advance(now_ms, self.scoring.drop_interval_ms) {
            return StepResult::Idle;
        }
        if try_translate(&self.grid, &mut self.current, 0, 1) {
            StepResult::Moved
        } else {
            self.land(now_ms)
        }
    }

    /// Apply a player input; returns whether anything changed
    pub fn handle_input(&mut self, input: Input, now_ms: u64) -> bool {
        if self.status != GameStatus::Running {
            return false;
        }
        match input {
            Input::MoveLeft => try_translate(&self.grid, &mut self.current, -1, 0),
            Input::MoveRight => try_translate(&self.grid, &mut self.current, 1, 0),
            Input::MoveDown => try_translate(&self.grid, &mut self.current, 0, 1),
            Input::Rotate => try_rotate(&self.grid, &mut self.current),
            Input::HardDrop => {
                drop_to_floor(&self.grid, &mut self.current);
                self.land(now_ms);
                true
            }
            Input::Hold => self.hold(now_ms),
        }
    }

    pub fn pause(&mut self, now_ms: u64) {
        if self.status == GameStatus::Running {
            self.status = GameStatus::Paused;
            self.clock.pause(now_ms);
            tracing::debug!("Game {} paused", self.game_id);
        }
    }

    pub fn resume(&mut self, now_ms: u64) {
        if self.status == GameStatus::Paused {
            self.status = GameStatus::Running;
            self.clock.resume(now_ms);
            self.timer.rearm();
            tracing::debug!("Game {} resumed", self.game_id);
        }
    }

    pub fn toggle_pause(&mut self, now_ms: u64) {
        match self.status {
            GameStatus::Running => self.pause(now_ms),
            GameStatus::Paused => self.resume(now_ms),
            GameStatus::GameOver => {}
        }
    }

    /// Start a new game after `GameOver`
    ///
    /// Ignored in any other state, and while the finished game's result has
    /// not been taken yet.
    pub fn restart(&mut self, now_ms: u64) -> bool {
        if self.status != GameStatus::GameOver || self.result.is_some() {
            return false;
        }
        let cols = self.grid.cols();
        self.grid = Grid::new(self.grid.rows(), cols);
        self.current = self.generator.generate(cols);
        self.next = self.generator.generate(cols);
        self.hold = None;
        self.can_hold = true;
        self.scoring = Scoring::default();
        self.status = GameStatus::Running;
        self.timer.reset();
        self.clock = PlayClock::start(now_ms);
        self.game_id += 1;
        tracing::info!("Game {} started", self.game_id);
        true
    }

    /// Result of the finished game, handed out once
    pub fn take_result(&mut self) -> Option<GameResult> {
        self.result.take()
    }

    pub fn play_time_ms(&self, now_ms: u64) -> u64 {
        self.clock.elapsed_ms(now_ms)
    }

    pub fn snapshot(&self, now_ms: u64) -> GameSnapshot {
        let mut well = self.grid.clone();
        if self.status == GameStatus::Running {
            well.merge(&self.current);
        }
        GameSnapshot {
            game_id: self.game_id,
            well,
            next: self.next.kind,
            hold: self.hold,
            can_hold: self.can_hold,
            score: self.scoring.score,
            lines: self.scoring.lines,
            level: self.scoring.level,
            drop_interval_ms: self.scoring.drop_interval_ms,
            status: self.status,
            play_time_ms: self.play_time_ms(now_ms),
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_game_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn current(&self) -> &Piece {
        &self.current
    }

    pub fn next(&self) -> &Piece {
        &self.next
    }

    pub fn held(&self) -> Option<PieceKind> {
        self.hold
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    pub fn scoring(&self) -> &Scoring {
        &self.scoring
    }

    pub fn game_id(&self) -> u64 {
        self.game_id
    }

    fn current_fits(&self) -> bool {
        is_valid_move(&self.grid, &self.current, 0, 0, None)
    }

    /// Settle the current piece and bring in the next one
    fn land(&mut self, now_ms: u64) -> StepResult {
        let lines_cleared = settle(&mut self.grid, &self.current, &mut self.scoring);
        if lines_cleared > 0 {
            tracing::debug!(
                "Cleared {} line(s), score {}, level {}",
                lines_cleared,
                self.scoring.score,
                self.scoring.level
            );
        }
        let cols = self.grid.cols();
        self.current = std::mem::replace(&mut self.next, self.generator.generate(cols));
        self.can_hold = true;
        if self.current_fits() {
            StepResult::Landed { lines_cleared }
        } else {
            self.enter_game_over(now_ms);
            StepResult::GameOver
        }
    }

    fn hold(&mut self, now_ms: u64) -> bool {
        if !self.can_hold {
            return false;
        }
        let cols = self.grid.cols();
        let stashed = self.current.kind;
        self.current = match self.hold.replace(stashed) {
            Some(kind) => Piece::spawn(kind, cols),
            None => std::mem::replace(&mut self.next, self.generator.generate(cols)),
        };
        self.can_hold = false;
        if !self.current_fits() {
            self.enter_game_over(now_ms);
        }
        true
    }

    fn enter_game_over(&mut self, now_ms: u64) {
        self.status = GameStatus::GameOver;
        self.clock.stop(now_ms);
        let result = GameResult {
            game_id: self.game_id,
            score: self.scoring.score,
            lines: self.scoring.lines,
            level: self.scoring.level,
            play_time_ms: self.clock.elapsed_ms(now_ms),
        };
        tracing::info!(
            "Game {} over: score {}, lines {}, level {}",
            result.game_id,
            result.score,
            result.lines,
            result.level
        );
        self.result = Some(result);
    }
}
