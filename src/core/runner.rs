//! Turn loop

use rand::Rng;
use std::thread;
use std::time::Duration;

use super::state::{is_game_over, RunStats, TurnReport, TurnState};
use crate::config::{BoardScanConfig, JumpConfig, NoiseModel};
use crate::device::DeviceController;
use crate::planner::TapPlanner;
use crate::vision::{locate_board, locate_piece, Template};
use crate::{Error, Result};

/// Shown whenever no screenshot could be taken
pub const CONNECTION_HINT: &str =
    "Make sure the phone is connected, USB debugging is enabled and adb is available";

/// Plays turns: screenshot, measure, press, wait
pub struct TurnController<'t, D, R> {
    device: D,
    /// Shared by every turn, never modified
    template: &'t Template,
    scan: BoardScanConfig,
    planner: TapPlanner,
    noise: NoiseModel,
    rng: R,
    /// Turns started so far
    turn: u64,
    stats: RunStats,
    state: TurnState,
}

impl<'t, D: DeviceController, R: Rng> TurnController<'t, D, R> {
    pub fn new(device: D, template: &'t Template, config: &JumpConfig, rng: R) -> Self {
        Self {
            device,
            template,
            scan: config.scan,
            planner: TapPlanner::new(config.press, config.noise),
            noise: config.noise,
            rng,
            turn: 0,
            stats: RunStats::new(),
            state: TurnState::Terminated,
        }
    }

    /// `Running` only while [`TurnController::run`] is looping
    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn into_device(self) -> D {
        self.device
    }

    /// Take one screenshot to check the device is reachable
    pub fn check_connection(&mut self) -> bool {
        match self.device.screenshot() {
            Ok(screenshot) => {
                log::info!(
                    "Device screen is {}x{}",
                    screenshot.width(),
                    screenshot.height()
                );
                true
            }
            Err(e) => {
                report_error(&e);
                false
            }
        }
    }

    /// Play a single turn
    ///
    /// Fails only when no screenshot could be acquired; in that case nothing
    /// is sent to the device. A swipe the device rejects is logged, not
    /// treated as failure.
    pub fn run_turn(&mut self) -> Result<TurnReport> {
        self.turn += 1;
        log::info!("--- Turn {}", self.turn);

        let screenshot = self.device.screenshot()?;
        let (width, height) = (screenshot.width(), screenshot.height());

        let piece = locate_piece(&screenshot, self.template);
        let piece_x = piece.map(|p| p.x).unwrap_or(0.0);
        let board = locate_board(&screenshot, piece_x, &self.scan);
        let board_x = board.map(|b| b.x).unwrap_or(0.0);
        drop(screenshot);

        let game_over = is_game_over(piece.as_ref(), board.as_ref());
        if game_over {
            log::info!("Game over, tapping retry");
        }

        let plan = self
            .planner
            .plan(piece_x, board_x, width, height, game_over, &mut self.rng);
        let swipe = self.planner.gesture(&plan, &mut self.rng);

        let delivered = match self.device.swipe(&swipe) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Swipe may not have been delivered: {}", e);
                false
            }
        };

        Ok(TurnReport {
            turn: self.turn,
            piece,
            board,
            game_over,
            plan,
            swipe,
            delivered,
        })
    }

    /// Pause before the next turn, mostly short with a rare long tail
    pub fn next_delay(&mut self) -> Duration {
        let r: f64 = self.rng.random();
        let secs = r.powf(self.noise.pace_exponent) * self.noise.pace_spread_secs
            + self.noise.pace_base_secs;
        Duration::from_secs_f64(secs.max(0.0))
    }

    /// Play turns until `max_turns` turns have been started, or forever
    ///
    /// An interrupt ends the process directly; nothing is drained.
    pub fn run(&mut self, max_turns: Option<u64>) -> RunStats {
        self.state = TurnState::Running;
        let limit_reached = |turn: u64| max_turns.is_some_and(|max| turn >= max);

        while !limit_reached(self.turn) {
            match self.run_turn() {
                Ok(report) => self.stats.record(&report),
                Err(e) => {
                    self.stats.record_failure();
                    report_error(&e);
                }
            }

            if limit_reached(self.turn) {
                break;
            }

            let wait = self.next_delay();
            log::info!("Wait {:.3} s...", wait.as_secs_f64());
            thread::sleep(wait);
        }

        self.state = TurnState::Terminated;
        log::info!(
            "Played {} turns: {} jumps, {} retries, {} failed",
            self.stats.turns,
            self.stats.jumps,
            self.stats.retries,
            self.stats.failed
        );
        self.stats
    }
}

fn report_error(error: &Error) {
    if error.is_acquisition() {
        log::error!("Could not get a screenshot: {}", error);
        log::warn!("{}", CONNECTION_HINT);
    } else {
        log::error!("Turn failed: {}", error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::device::ReplayController;

    fn template() -> Template {
        Template::new(RgbImage::from_pixel(2, 2, Rgb([0, 0, 0])))
    }

    #[test]
    fn test_pacing_range() {
        let template = template();
        let device = ReplayController::from_frames(Vec::new(), false);
        let mut controller = TurnController::new(
            device,
            &template,
            &JumpConfig::default(),
            StdRng::seed_from_u64(3),
        );

        for _ in 0..500 {
            let wait = controller.next_delay().as_secs_f64();
            assert!((2.0..=7.0).contains(&wait), "wait {}", wait);
        }
    }

    #[test]
    fn test_pacing_biased_short() {
        let template = template();
        let device = ReplayController::from_frames(Vec::new(), false);
        let mut controller = TurnController::new(
            device,
            &template,
            &JumpConfig::default(),
            StdRng::seed_from_u64(11),
        );

        let short = (0..1000)
            .filter(|_| controller.next_delay() < Duration::from_secs(3))
            .count();
        // P(r^5 < 0.2) = 0.2^(1/5) ~ 0.72
        assert!(short > 600, "only {} short waits", short);
    }

    #[test]
    fn test_failed_acquisition_sends_nothing() {
        let template = template();
        let device = ReplayController::from_frames(Vec::new(), false);
        let config = JumpConfig::default().with_noise(NoiseModel {
            pace_spread_secs: 0.0,
            pace_base_secs: 0.0,
            ..NoiseModel::default()
        });
        let mut controller =
            TurnController::new(device, &template, &config, StdRng::seed_from_u64(1));

        assert!(!controller.check_connection());
        let stats = controller.run(Some(3));
        assert_eq!(stats.turns, 3);
        assert_eq!(stats.failed, 3);
        assert!(controller.device().swipes().is_empty());
        assert_eq!(controller.state(), TurnState::Terminated);
    }

    #[test]
    fn test_state_outside_run() {
        let template = template();
        let device = ReplayController::from_frames(Vec::new(), false);
        let mut controller = TurnController::new(
            device,
            &template,
            &JumpConfig::default(),
            StdRng::seed_from_u64(2),
        );
        assert_eq!(controller.state(), TurnState::Terminated);

        let stats = controller.run(Some(0));
        assert_eq!(stats, RunStats::new());
        assert_eq!(controller.state(), TurnState::Terminated);
    }
}
