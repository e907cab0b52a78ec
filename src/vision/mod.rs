//! Screenshot analysis for one turn
//!
//! A turn's measurements are two horizontal coordinates: the centre of the
//! player piece, found by template matching, and the centre of the next
//! platform's top, found by scanning rows for off-background pixels.
//!
//! # Example
//!
//! ```ignore
//! use autojump::vision::{locate_board, locate_piece, Screenshot, Template};
//!
//! let template = Template::load("image/character.png")?;
//! let screenshot = Screenshot::open("autojump.png")?;
//! let piece = locate_piece(&screenshot, &template);
//! let board = piece.and_then(|p| locate_board(&screenshot, p.x, &Default::default()));
//! ```

pub mod board;
pub mod capture;
pub mod detector;

pub use board::{locate_board, BoardLocation};
pub use capture::{Screenshot, Template};
pub use detector::{locate_piece, PieceLocation};
