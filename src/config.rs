//! Configuration types for the autopilot
//!
//! Every field has a default matching the tuned constants for 9:16 phones, so an
//! empty TOML file (or no file at all) yields a working configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::Result;

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JumpConfig {
    /// Reference image of the player piece
    #[serde(default = "default_template_path")]
    pub template_path: PathBuf,
    #[serde(default)]
    pub adb: AdbConfig,
    #[serde(default)]
    pub scan: BoardScanConfig,
    #[serde(default)]
    pub press: PressConfig,
    #[serde(default)]
    pub noise: NoiseModel,
}

fn default_template_path() -> PathBuf {
    PathBuf::from("image/character.png")
}

impl Default for JumpConfig {
    fn default() -> Self {
        Self {
            template_path: default_template_path(),
            adb: AdbConfig::default(),
            scan: BoardScanConfig::default(),
            press: PressConfig::default(),
            noise: NoiseModel::default(),
        }
    }
}

impl JumpConfig {
    /// Load a configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = toml::from_str(&text)?;
        log::debug!("Loaded configuration from {:?}", path.as_ref());
        Ok(config)
    }

    /// Set the template path
    pub fn with_template(mut self, path: impl Into<PathBuf>) -> Self {
        self.template_path = path.into();
        self
    }

    /// Target a specific device serial
    pub fn with_serial(mut self, serial: impl Into<String>) -> Self {
        self.adb.serial = Some(serial.into());
        self
    }

    /// Use a different adb executable
    pub fn with_adb_program(mut self, program: impl Into<String>) -> Self {
        self.adb.program = program.into();
        self
    }

    /// Replace the noise model
    pub fn with_noise(mut self, noise: NoiseModel) -> Self {
        self.noise = noise;
        self
    }
}

/// How to reach the device through adb
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdbConfig {
    #[serde(default = "default_adb_program")]
    pub program: String,
    /// Device serial passed as `-s`, if several devices are attached
    #[serde(default)]
    pub serial: Option<String>,
    /// Screenshot path on the device
    #[serde(default = "default_remote_path")]
    pub remote_path: String,
    /// Where the screenshot is pulled to
    #[serde(default = "default_local_path")]
    pub local_path: PathBuf,
}

fn default_adb_program() -> String {
    "adb".to_string()
}

fn default_remote_path() -> String {
    "/sdcard/autojump.png".to_string()
}

fn default_local_path() -> PathBuf {
    PathBuf::from("autojump.png")
}

impl Default for AdbConfig {
    fn default() -> Self {
        Self {
            program: default_adb_program(),
            serial: None,
            remote_path: default_remote_path(),
            local_path: default_local_path(),
        }
    }
}

/// Parameters of the background-color board scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardScanConfig {
    /// Piece width is estimated as `screen_width / piece_width_divisor`
    #[serde(default = "default_piece_width_divisor")]
    pub piece_width_divisor: u32,
    /// Only every n-th row is scanned
    #[serde(default = "default_row_step")]
    pub row_step: u32,
    /// Minimum summed channel difference from the row background
    #[serde(default = "default_color_threshold")]
    pub color_threshold: u32,
    /// The scan stops once more than this many points were collected
    #[serde(default = "default_min_points")]
    pub min_points: usize,
}

fn default_piece_width_divisor() -> u32 {
    14
}

fn default_row_step() -> u32 {
    4
}

fn default_color_threshold() -> u32 {
    10
}

fn default_min_points() -> usize {
    10
}

impl Default for BoardScanConfig {
    fn default() -> Self {
        Self {
            piece_width_divisor: default_piece_width_divisor(),
            row_step: default_row_step(),
            color_threshold: default_color_threshold(),
            min_points: default_min_points(),
        }
    }
}

/// Distance to press-time conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PressConfig {
    /// Press time needed to jump across the short screen edge
    #[serde(default = "default_full_width_ms")]
    pub full_width_ms: u32,
    /// Floor for any non-zero press
    #[serde(default = "default_min_press_ms")]
    pub min_press_ms: u32,
}

fn default_full_width_ms() -> u32 {
    1700
}

fn default_min_press_ms() -> u32 {
    200
}

impl Default for PressConfig {
    fn default() -> Self {
        Self {
            full_width_ms: default_full_width_ms(),
            min_press_ms: default_min_press_ms(),
        }
    }
}

/// Randomness applied to taps and pacing so turns look less mechanical
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseModel {
    /// Maximum swipe end-point offset per axis, in pixels
    #[serde(default = "default_jitter_px")]
    pub jitter_px: u32,
    /// Pacing delay is `random()^pace_exponent * pace_spread_secs + pace_base_secs`
    #[serde(default = "default_pace_exponent")]
    pub pace_exponent: f64,
    #[serde(default = "default_pace_spread_secs")]
    pub pace_spread_secs: f64,
    #[serde(default = "default_pace_base_secs")]
    pub pace_base_secs: f64,
    /// Pick a random in-play tap point instead of the centre of the tap area
    #[serde(default = "default_randomize_target")]
    pub randomize_target: bool,
}

fn default_jitter_px() -> u32 {
    10
}

fn default_pace_exponent() -> f64 {
    5.0
}

fn default_pace_spread_secs() -> f64 {
    5.0
}

fn default_pace_base_secs() -> f64 {
    2.0
}

fn default_randomize_target() -> bool {
    true
}

impl Default for NoiseModel {
    fn default() -> Self {
        Self {
            jitter_px: default_jitter_px(),
            pace_exponent: default_pace_exponent(),
            pace_spread_secs: default_pace_spread_secs(),
            pace_base_secs: default_pace_base_secs(),
            randomize_target: default_randomize_target(),
        }
    }
}

impl NoiseModel {
    /// A model without any randomness in tap placement
    pub fn quiet() -> Self {
        Self {
            jitter_px: 0,
            randomize_target: false,
            ..Self::default()
        }
    }
}
