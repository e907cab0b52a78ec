//! Piece detection using template matching
//!
//! The search is exhaustive over every template position, scored by the sum of
//! squared differences over all three color channels. A cheap match on
//! downscaled luminance picks a candidate whose exact score bounds the search;
//! any window whose partial sum exceeds the best exact score seen so far is
//! abandoned. Windows are never skipped unscored, so the result is the same as
//! the naive search, ties going to the first window in row-major order.

use image::imageops::{self, FilterType};
use image::RgbImage;
use imageproc::template_matching::{find_extremes, match_template_parallel, MatchTemplateMethod};
use rayon::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};

use super::capture::{Screenshot, Template};

/// Downscale factor of the bounding pass
const COARSE_FACTOR: u32 = 4;

/// Where the piece was found
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieceLocation {
    /// Horizontal centre of the best match
    pub x: f64,
    /// Top edge of the best match
    pub top: u32,
    /// Sum of squared differences at the best match (lower is better)
    pub score: u64,
}

/// Find the piece's horizontal centre in `screenshot`
///
/// The best match is always accepted, however poor. Returns `None` only when
/// the template does not fit in the screenshot.
pub fn locate_piece(screenshot: &Screenshot, template: &Template) -> Option<PieceLocation> {
    let (width, height) = (screenshot.width(), screenshot.height());
    let (tw, th) = (template.width(), template.height());

    if tw == 0 || th == 0 || tw > width || th > height {
        log::debug!(
            "Template {}x{} does not fit screenshot {}x{}",
            tw,
            th,
            width,
            height
        );
        return None;
    }

    let image = screenshot.image();
    let template = template.image();
    let bound = coarse_bound(image, template);
    let (score, top, x) = best_window(image, template, bound);

    let location = PieceLocation {
        x: f64::from(x) + f64::from(tw) / 2.0,
        top,
        score,
    };
    log::debug!(
        "piece_x: {:.1} (match at {},{} score {})",
        location.x,
        x,
        top,
        location.score
    );
    Some(location)
}

/// Exact score of a window near the best downscaled match
///
/// Any exact window score is an upper bound on the minimum; a good candidate
/// only makes pruning start earlier.
fn coarse_bound(image: &RgbImage, template: &RgbImage) -> u64 {
    let (cw, ch) = (image.width() / COARSE_FACTOR, image.height() / COARSE_FACTOR);
    let (ctw, cth) = (
        template.width() / COARSE_FACTOR,
        template.height() / COARSE_FACTOR,
    );
    if ctw == 0 || cth == 0 || ctw > cw || cth > ch {
        return u64::MAX;
    }

    let small_image = imageops::resize(&imageops::grayscale(image), cw, ch, FilterType::Triangle);
    let small_template = imageops::resize(
        &imageops::grayscale(template),
        ctw,
        cth,
        FilterType::Triangle,
    );
    let scores = match_template_parallel(
        &small_image,
        &small_template,
        MatchTemplateMethod::SumOfSquaredErrors,
    );
    let (cx, cy) = find_extremes(&scores).min_value_location;

    let max_x = image.width() - template.width();
    let max_y = image.height() - template.height();
    let (x0, y0) = ((cx * COARSE_FACTOR).min(max_x), (cy * COARSE_FACTOR).min(max_y));

    let mut bound = u64::MAX;
    for y in y0.saturating_sub(COARSE_FACTOR)..=(y0 + COARSE_FACTOR).min(max_y) {
        for x in x0.saturating_sub(COARSE_FACTOR)..=(x0 + COARSE_FACTOR).min(max_x) {
            if let Some(score) = window_sse(image, template, x, y, bound) {
                bound = bound.min(score);
            }
        }
    }
    bound
}

/// Minimum `(score, y, x)` over all windows
fn best_window(image: &RgbImage, template: &RgbImage, bound: u64) -> (u64, u32, u32) {
    let max_x = image.width() - template.width();
    let max_y = image.height() - template.height();
    let best = AtomicU64::new(bound);

    (0..=max_y)
        .into_par_iter()
        .filter_map(|y| {
            let mut row_best: Option<(u64, u32)> = None;
            for x in 0..=max_x {
                let limit = best.load(Ordering::Relaxed);
                if let Some(score) = window_sse(image, template, x, y, limit) {
                    if row_best.map_or(true, |(s, _)| score < s) {
                        row_best = Some((score, x));
                    }
                    best.fetch_min(score, Ordering::Relaxed);
                }
            }
            row_best.map(|(score, x)| (score, y, x))
        })
        .min()
        // The minimum window never exceeds any bound, so some row reports it
        .unwrap_or((bound, 0, 0))
}

/// Sum of squared channel differences of the window at (x, y)
///
/// Gives up with `None` as soon as the running sum exceeds `limit`.
fn window_sse(image: &RgbImage, template: &RgbImage, x: u32, y: u32, limit: u64) -> Option<u64> {
    let stride = image.width() as usize * 3;
    let row_len = template.width() as usize * 3;
    let pixels = image.as_raw();
    let reference = template.as_raw();

    let mut sum = 0u64;
    for (ty, expected) in reference.chunks_exact(row_len).enumerate() {
        let start = (y as usize + ty) * stride + x as usize * 3;
        let actual = &pixels[start..start + row_len];
        sum += actual
            .iter()
            .zip(expected)
            .map(|(&a, &b)| {
                let d = u64::from(a.abs_diff(b));
                d * d
            })
            .sum::<u64>();
        if sum > limit {
            return None;
        }
    }
    Some(sum)
}
