//! Autojump
//!
//! Plays a tap-timing jump game on an Android phone. Each turn takes a
//! screenshot over adb, finds the player piece and the next platform, and
//! presses the screen for a time proportional to the distance between them.
//!
//! This crate can be used as:
//! - A library, driving any [`device::DeviceController`]
//! - The `autojump` binary, driving a phone through adb

pub mod config;
pub mod core;
pub mod device;
pub mod error;
pub mod planner;
pub mod vision;

// Re-export commonly used types
pub use config::{AdbConfig, BoardScanConfig, JumpConfig, NoiseModel, PressConfig};
pub use crate::core::{RunStats, TurnController, TurnReport, TurnState};
pub use device::{AdbController, DeviceController, ReplayController};
pub use error::{Error, Result};
pub use planner::{Point, Swipe, TapPlan, TapPlanner};
pub use vision::{BoardLocation, PieceLocation, Screenshot, Template};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
