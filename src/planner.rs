//! Turning measurements into a press
//!
//! The press time is proportional to the horizontal distance between piece and
//! platform, measured against the short screen edge. Where the finger goes
//! depends on whether the game is still running.

use rand::Rng;
use std::fmt;

use crate::config::{NoiseModel, PressConfig};

/// A screen coordinate in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// The action chosen for one turn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TapPlan {
    pub press_duration_ms: u32,
    pub tap: Point,
    /// Horizontal distance between piece and board
    pub distance: f64,
    /// `distance` relative to the short screen edge
    pub fraction: f64,
    pub short_edge: u32,
    pub game_over: bool,
}

/// A swipe gesture as sent to the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swipe {
    pub start: Point,
    pub end: Point,
    pub duration_ms: u32,
}

impl Swipe {
    /// Arguments for `input swipe`
    pub fn args(&self) -> [String; 5] {
        [
            self.start.x.to_string(),
            self.start.y.to_string(),
            self.end.x.to_string(),
            self.end.y.to_string(),
            self.duration_ms.to_string(),
        ]
    }
}

impl fmt::Display for Swipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "input swipe {}", self.args().join(" "))
    }
}

/// Convert a horizontal distance into a press duration
///
/// Zero distance gives a zero press; anything else is floored at
/// `min_press_ms`. Rounding is half-to-even.
pub fn press_duration(distance: f64, short_edge: u32, press: &PressConfig) -> u32 {
    if short_edge == 0 {
        return 0;
    }
    let fraction = distance.abs() / f64::from(short_edge);
    let raw = (f64::from(press.full_width_ms) * fraction).round_ties_even();
    if raw <= 0.0 {
        0
    } else {
        (raw as u32).max(press.min_press_ms)
    }
}

/// Center of the "play again" button
///
/// The game UI is laid out for 9:16; taller screens letterbox it vertically,
/// with 2px tolerance before a screen counts as taller.
pub fn retry_button(width: u32, height: u32) -> Point {
    let ui_height = if height / 16 > width / 9 + 2 {
        (f64::from(width) / 9.0 * 16.0) as u32
    } else {
        height
    };
    let top = f64::from(height - ui_height.min(height)) / 2.0 + f64::from(ui_height) * 0.825;
    Point::new(width / 2, top as u32)
}

/// Tap point while playing: somewhere in the lower right area, away from the
/// button in the lower left corner
pub fn play_target<R: Rng>(
    width: u32,
    height: u32,
    noise: &NoiseModel,
    rng: &mut R,
) -> Point {
    let (x_lo, x_hi) = span(width / 4, width.saturating_sub(20));
    let (y_lo, y_hi) = span(height * 3 / 4, height.saturating_sub(20));

    if noise.randomize_target {
        Point::new(rng.random_range(x_lo..=x_hi), rng.random_range(y_lo..=y_hi))
    } else {
        Point::new(x_lo + (x_hi - x_lo) / 2, y_lo + (y_hi - y_lo) / 2)
    }
}

fn span(lo: u32, hi: u32) -> (u32, u32) {
    (lo, hi.max(lo))
}

/// Plans the press and tap point for each turn
#[derive(Debug, Clone, Copy, Default)]
pub struct TapPlanner {
    press: PressConfig,
    noise: NoiseModel,
}

impl TapPlanner {
    pub fn new(press: PressConfig, noise: NoiseModel) -> Self {
        Self { press, noise }
    }

    /// Plan a turn from the piece and board x coordinates
    ///
    /// On game over the tap goes to the retry button regardless of the
    /// measured distance.
    pub fn plan<R: Rng>(
        &self,
        piece_x: f64,
        board_x: f64,
        width: u32,
        height: u32,
        game_over: bool,
        rng: &mut R,
    ) -> TapPlan {
        let distance = (board_x - piece_x).abs();
        let short_edge = width.min(height);
        let fraction = if short_edge == 0 {
            0.0
        } else {
            distance / f64::from(short_edge)
        };
        let press_duration_ms = press_duration(distance, short_edge, &self.press);

        let tap = if game_over {
            retry_button(width, height)
        } else {
            play_target(width, height, &self.noise, rng)
        };

        log::info!(
            "Distance: {:.2}% ({}/{}) | Press: {}ms",
            fraction * 100.0,
            distance,
            short_edge,
            press_duration_ms
        );

        TapPlan {
            press_duration_ms,
            tap,
            distance,
            fraction,
            short_edge,
            game_over,
        }
    }

    /// Build the swipe for a plan, moving the end point a little
    pub fn gesture<R: Rng>(&self, plan: &TapPlan, rng: &mut R) -> Swipe {
        let jitter = i64::from(self.noise.jitter_px);
        let mut shift = |v: u32| -> u32 {
            if jitter == 0 {
                return v;
            }
            let offset = rng.random_range(-jitter..=jitter);
            (i64::from(v) + offset).clamp(0, i64::from(u32::MAX)) as u32
        };
        let end = Point::new(shift(plan.tap.x), shift(plan.tap.y));

        Swipe {
            start: plan.tap,
            end,
            duration_ms: plan.press_duration_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_press_scenarios() {
        let press = PressConfig::default();
        assert_eq!(press_duration(270.0, 1080, &press), 425);
        assert_eq!(press_duration(0.0, 1080, &press), 0);
        // 16ms raw, floored
        assert_eq!(press_duration(10.0, 1080, &press), 200);
        assert_eq!(press_duration(1080.0, 1080, &press), 1700);
    }

    #[test]
    fn test_press_rounds_half_to_even() {
        let press = PressConfig {
            full_width_ms: 1024,
            min_press_ms: 0,
        };
        assert_eq!(press_duration(212.5, 1024, &press), 212);
        assert_eq!(press_duration(213.5, 1024, &press), 214);
    }

    #[test]
    fn test_tiny_distance_rounding_to_zero() {
        // 1700 * 0.2 / 1080 = 0.31 -> rounds to 0, no floor
        assert_eq!(press_duration(0.2, 1080, &PressConfig::default()), 0);
    }

    #[test]
    fn test_press_never_between_zero_and_floor() {
        let press = PressConfig::default();
        let mut last = 0;
        for d in 0..=1200 {
            let ms = press_duration(f64::from(d), 1080, &press);
            assert!(ms == 0 || ms >= 200, "distance {} gave {}ms", d, ms);
            assert!(ms >= last, "not monotonic at distance {}", d);
            last = ms;
        }
    }

    #[test]
    fn test_retry_button_16_9() {
        assert_eq!(retry_button(1080, 1920), Point::new(540, 1584));
    }

    #[test]
    fn test_retry_button_tall_screen() {
        // 1080x2340: ui height 1920, letterbox 210 on top
        assert_eq!(retry_button(1080, 2340), Point::new(540, 1794));
    }

    #[test]
    fn test_retry_button_within_tolerance() {
        // 1080x1952: 1952/16 = 122, 1080/9 + 2 = 122, not tall
        assert_eq!(retry_button(1080, 1952), Point::new(540, 1610));
    }

    #[test]
    fn test_play_target_area() {
        let noise = NoiseModel::default();
        let mut rng = rng();
        for _ in 0..200 {
            let p = play_target(1080, 1920, &noise, &mut rng);
            assert!((270..=1060).contains(&p.x), "x {}", p.x);
            assert!((1440..=1900).contains(&p.y), "y {}", p.y);
        }
    }

    #[test]
    fn test_play_target_without_randomness() {
        let p = play_target(1080, 1920, &NoiseModel::quiet(), &mut rng());
        assert_eq!(p, Point::new(665, 1670));
    }

    #[test]
    fn test_play_target_tiny_screen() {
        let p = play_target(16, 16, &NoiseModel::default(), &mut rng());
        assert_eq!(p, Point::new(4, 12));
    }

    #[test]
    fn test_plan_in_play() {
        let planner = TapPlanner::default();
        let plan = planner.plan(540.0, 810.0, 1080, 1920, false, &mut rng());

        assert_eq!(plan.press_duration_ms, 425);
        assert_eq!(plan.distance, 270.0);
        assert_eq!(plan.fraction, 0.25);
        assert_eq!(plan.short_edge, 1080);
        assert!(!plan.game_over);
        assert!(plan.tap.y >= 1440);
    }

    #[test]
    fn test_plan_game_over_targets_retry() {
        let planner = TapPlanner::default();
        let plan = planner.plan(540.0, 0.0, 1080, 1920, true, &mut rng());
        assert_eq!(plan.tap, Point::new(540, 1584));
        assert!(plan.game_over);
    }

    #[test]
    fn test_plan_duration_ignores_noise() {
        let planner = TapPlanner::default();
        let a = planner.plan(200.0, 210.0, 1080, 1920, false, &mut StdRng::seed_from_u64(1));
        let b = planner.plan(200.0, 210.0, 1080, 1920, false, &mut StdRng::seed_from_u64(99));
        assert_eq!(a.press_duration_ms, 200);
        assert_eq!(a.press_duration_ms, b.press_duration_ms);
    }

    #[test]
    fn test_zero_distance_plan() {
        let plan = TapPlanner::default().plan(540.0, 540.0, 1080, 1920, false, &mut rng());
        assert_eq!(plan.press_duration_ms, 0);
        assert_eq!(plan.fraction, 0.0);
    }

    #[test]
    fn test_gesture_jitter_bounds() {
        let planner = TapPlanner::default();
        let plan = planner.plan(540.0, 810.0, 1080, 1920, false, &mut rng());
        let mut rng = rng();
        for _ in 0..100 {
            let swipe = planner.gesture(&plan, &mut rng);
            assert_eq!(swipe.start, plan.tap);
            assert_eq!(swipe.duration_ms, 425);
            assert!(swipe.end.x.abs_diff(swipe.start.x) <= 10);
            assert!(swipe.end.y.abs_diff(swipe.start.y) <= 10);
        }
    }

    #[test]
    fn test_gesture_without_jitter() {
        let planner = TapPlanner::new(PressConfig::default(), NoiseModel::quiet());
        let plan = planner.plan(540.0, 540.0, 1080, 1920, true, &mut rng());
        let swipe = planner.gesture(&plan, &mut rng());
        assert_eq!(swipe.start, swipe.end);
        assert_eq!(swipe.to_string(), "input swipe 540 1584 540 1584 0");
    }

    #[test]
    fn test_gesture_saturates_at_origin() {
        let planner = TapPlanner::default();
        let plan = TapPlan {
            press_duration_ms: 300,
            tap: Point::new(0, 0),
            distance: 0.0,
            fraction: 0.0,
            short_edge: 0,
            game_over: false,
        };
        let mut rng = rng();
        for _ in 0..50 {
            let swipe = planner.gesture(&plan, &mut rng);
            assert!(swipe.end.x <= 10 && swipe.end.y <= 10);
        }
    }
}
