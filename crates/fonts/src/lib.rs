//! Font metrics for the folio PDF engine.
//!
//! - [`standard`]: the built-in PDF base fonts (Helvetica, Times, Courier),
//!   which need no font program
//! - [`truetype`]: TrueType programs parsed with `ttf-parser` and embedded
//!   into the output
//! - [`encoding`]: the WinAnsi single-byte encoding used for base-font text
//! - [`wrap`]: line splitting driven by the same metrics used for measuring

pub mod encoding;
pub mod standard;
pub mod truetype;
pub mod wrap;

pub use encoding::{encode_win_ansi, win_ansi_char, win_ansi_code};
pub use standard::{StandardFont, StandardMetrics};
pub use truetype::TrueTypeMetrics;
pub use wrap::split_lines;
