//! Next-platform detection by background-color scanning
//!
//! Platforms differ in how their top looks from above: a square one shows a
//! single corner point first, a round one a short horizontal line. Averaging the
//! first cluster of off-background pixels lands near the centre in both cases.

use image::Rgb;

use super::capture::Screenshot;
use crate::config::BoardScanConfig;

/// Where the next platform was found
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardLocation {
    /// Mean x of all qualifying pixels
    pub x: f64,
    /// Number of qualifying pixels averaged
    pub samples: usize,
    /// Row on which the scan stopped
    pub row: u32,
}

/// Find the horizontal centre of the next platform's top
///
/// Only the screen half opposite the piece is scanned, rows inside the centred
/// square play field are visited top to bottom every `row_step` rows, and the
/// scan stops at the first row after which more than `min_points` pixels have
/// qualified. Returns `None` when the whole band is scanned without that.
pub fn locate_board(
    screenshot: &Screenshot,
    piece_x: f64,
    scan: &BoardScanConfig,
) -> Option<BoardLocation> {
    let width = screenshot.width();
    let height = screenshot.height();
    if width == 0 || height == 0 {
        return None;
    }

    let piece_width = f64::from(width / scan.piece_width_divisor.max(1));

    // The layout is symmetric around the screen centre; decorations on the
    // piece's own side produce false positives.
    let (x_start, x_end) = if piece_x < f64::from(width) / 2.0 {
        (width / 2, width)
    } else {
        (0, width / 2)
    };

    let (w, h) = (i64::from(width), i64::from(height));
    let y_start = (h - w).div_euclid(2).max(0) as u32;
    let y_end = (h + w).div_euclid(2).min(h) as u32;

    let mut points: Vec<u32> = Vec::new();

    for y in (y_start..y_end).step_by(scan.row_step.max(1) as usize) {
        let Some(background) = screenshot.pixel(0, y) else {
            break;
        };

        for x in x_start..x_end {
            if (f64::from(x) - piece_x).abs() < piece_width {
                continue;
            }
            let Some(pixel) = screenshot.pixel(x, y) else {
                continue;
            };
            if color_distance(pixel, background) > scan.color_threshold {
                points.push(x);
            }
        }

        if points.len() > scan.min_points {
            let sum: u64 = points.iter().map(|&x| u64::from(x)).sum();
            let location = BoardLocation {
                x: sum as f64 / points.len() as f64,
                samples: points.len(),
                row: y,
            };
            log::info!("target_x: {:.1}", location.x);
            log::debug!("board found on row {} from {} samples", y, points.len());
            return Some(location);
        }
    }

    log::debug!(
        "No board found: {} samples in rows {}..{}",
        points.len(),
        y_start,
        y_end
    );
    None
}

/// Sum of absolute per-channel differences
fn color_distance(a: Rgb<u8>, b: Rgb<u8>) -> u32 {
    a.0.iter()
        .zip(b.0.iter())
        .map(|(&p, &q)| u32::from(p.abs_diff(q)))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    const BACKGROUND: Rgb<u8> = Rgb([200, 200, 210]);
    const PLATFORM: Rgb<u8> = Rgb([120, 90, 60]);

    /// 100x160 scene: the scanned band is rows 30..130
    fn scene(rects: &[(u32, u32, u32, u32)]) -> Screenshot {
        let mut image = RgbImage::from_pixel(100, 160, BACKGROUND);
        for &(x0, y0, x1, y1) in rects {
            for y in y0..y1 {
                for x in x0..x1 {
                    image.put_pixel(x, y, PLATFORM);
                }
            }
        }
        Screenshot::new(image)
    }

    #[test]
    fn test_color_distance() {
        assert_eq!(color_distance(Rgb([10, 20, 30]), Rgb([13, 16, 30])), 7);
        assert_eq!(color_distance(Rgb([0, 0, 0]), Rgb([255, 255, 255])), 765);
    }

    #[test]
    fn test_finds_platform_on_opposite_half() {
        // 12 pixels wide on row 40, centred at 75.5
        let shot = scene(&[(70, 40, 82, 60)]);
        let board = locate_board(&shot, 20.0, &BoardScanConfig::default()).unwrap();

        assert_eq!(board.row, 42);
        assert_eq!(board.samples, 12);
        assert_eq!(board.x, 75.5);
    }

    #[test]
    fn test_ignores_piece_half() {
        // Only something on the piece's own (right) half
        let shot = scene(&[(70, 40, 90, 60)]);
        assert!(locate_board(&shot, 80.0, &BoardScanConfig::default()).is_none());
    }

    #[test]
    fn test_excludes_band_around_piece() {
        // Piece at 48 (left half) so the right half is scanned; piece width is
        // 100 / 14 = 7, so x in 50..55 is skipped and only 55..60 count.
        let shot = scene(&[(50, 42, 60, 43)]);
        assert!(locate_board(&shot, 48.0, &BoardScanConfig::default()).is_none());

        let shot = scene(&[(50, 42, 66, 43)]);
        let board = locate_board(&shot, 48.0, &BoardScanConfig::default()).unwrap();
        assert_eq!(board.samples, 11);
        assert_eq!(board.x, 60.0);
    }

    #[test]
    fn test_exactly_min_points_is_not_enough() {
        // One scanned row with exactly 10 qualifying pixels
        let shot = scene(&[(70, 42, 80, 43)]);
        assert!(locate_board(&shot, 20.0, &BoardScanConfig::default()).is_none());
    }

    #[test]
    fn test_accumulates_across_rows() {
        // A thin point-like top: 3 pixels per scanned row
        let shot = scene(&[(70, 30, 73, 130)]);
        let board = locate_board(&shot, 20.0, &BoardScanConfig::default()).unwrap();

        // rows 30, 34, 38, 42 -> 12 samples
        assert_eq!(board.samples, 12);
        assert_eq!(board.row, 42);
        assert_eq!(board.x, 71.0);
    }

    #[test]
    fn test_first_window_wins() {
        // A faint wide ledge above a big platform still decides the result
        let shot = scene(&[(52, 34, 64, 35), (80, 60, 100, 120)]);
        let board = locate_board(&shot, 10.0, &BoardScanConfig::default()).unwrap();
        assert_eq!(board.row, 34);
        assert_eq!(board.x, 57.5);
    }

    #[test]
    fn test_rows_outside_band_ignored() {
        // Score area above the square field
        let shot = scene(&[(60, 0, 100, 29)]);
        assert!(locate_board(&shot, 10.0, &BoardScanConfig::default()).is_none());
    }

    #[test]
    fn test_small_color_shift_ignored() {
        let mut image = RgbImage::from_pixel(100, 160, BACKGROUND);
        for x in 60..100 {
            image.put_pixel(x, 50, Rgb([203, 203, 214]));
        }
        let shot = Screenshot::new(image);
        assert!(locate_board(&shot, 10.0, &BoardScanConfig::default()).is_none());
    }

    #[test]
    fn test_background_gradient_follows_row() {
        // Each row has its own background; only the platform differs from it
        let mut image = RgbImage::from_fn(100, 160, |_, y| Rgb([100 + (y / 2) as u8, 150, 200]));
        for x in 70..85 {
            image.put_pixel(x, 50, PLATFORM);
        }
        let board =
            locate_board(&Screenshot::new(image), 10.0, &BoardScanConfig::default()).unwrap();
        assert_eq!(board.row, 50);
        assert_eq!(board.x, 77.0);
    }

    #[test]
    fn test_landscape_screen_scans_all_rows() {
        let mut image = RgbImage::from_pixel(160, 100, BACKGROUND);
        for x in 120..140 {
            image.put_pixel(x, 0, PLATFORM);
        }
        let board =
            locate_board(&Screenshot::new(image), 10.0, &BoardScanConfig::default()).unwrap();
        assert_eq!(board.row, 0);
        assert_eq!(board.x, 129.5);
    }
}
