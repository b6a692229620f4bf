//! Calculator core.
//!
//! This module provides:
//! - The evaluation engine (immediate and operator-precedence modes)
//! - Conversion between integers and their base 2/8/10/16 text
//! - Digit grouping for the decimal display
//! - Clipboard access for copy and paste

pub mod base;
mod clipboard;
mod engine;
mod evaluation;
mod grouping;
mod operator;

pub use base::{Base, ConversionError};
pub use clipboard::{ClipboardError, copy_to_clipboard, paste_from_clipboard};
pub use engine::Engine;
pub use evaluation::{EvaluationMode, SoftError, fold_with_precedence, format_value};
pub use grouping::group_digits;
pub use operator::Operator;
