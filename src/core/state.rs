//! Turn loop state types

use crate::planner::{Swipe, TapPlan};
use crate::vision::{BoardLocation, PieceLocation};

/// Lifecycle of the turn loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    /// Turns are being played
    Running,
    /// Stopped by interrupt or turn limit
    Terminated,
}

/// Everything measured and decided during one turn
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReport {
    /// 1-based turn counter
    pub turn: u64,
    pub piece: Option<PieceLocation>,
    pub board: Option<BoardLocation>,
    pub game_over: bool,
    pub plan: TapPlan,
    pub swipe: Swipe,
    /// Whether the device accepted the swipe
    pub delivered: bool,
}

impl TurnReport {
    /// Piece x, or 0 when no piece was located
    pub fn piece_x(&self) -> f64 {
        self.piece.map(|p| p.x).unwrap_or(0.0)
    }

    /// Board x, or 0 when no board was located
    pub fn board_x(&self) -> f64 {
        self.board.map(|b| b.x).unwrap_or(0.0)
    }
}

/// Counters over a whole session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub turns: u64,
    pub jumps: u64,
    pub retries: u64,
    /// Turns aborted because no screenshot could be acquired
    pub failed: u64,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a completed turn
    pub fn record(&mut self, report: &TurnReport) {
        self.turns += 1;
        if report.game_over {
            self.retries += 1;
        } else {
            self.jumps += 1;
        }
    }

    /// Count an aborted turn
    pub fn record_failure(&mut self) {
        self.turns += 1;
        self.failed += 1;
    }
}

/// A turn is a game over when either coordinate is missing or zero
pub fn is_game_over(piece: Option<&PieceLocation>, board: Option<&BoardLocation>) -> bool {
    let piece_x = piece.map(|p| p.x).unwrap_or(0.0);
    let board_x = board.map(|b| b.x).unwrap_or(0.0);
    piece_x == 0.0 || board_x == 0.0
}
