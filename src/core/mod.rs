//! Turn loop
//!
//! - `TurnController` - plays turns against a device
//! - `TurnReport` - what happened during one turn
//! - `RunStats` - counters for a session

mod runner;
mod state;

pub use runner::{TurnController, CONNECTION_HINT};
pub use state::{is_game_over, RunStats, TurnReport, TurnState};
