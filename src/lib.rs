//! zcalc: a standard and programmer calculator.
//!
//! The [`calculator`] module holds the evaluation engine and base conversion;
//! [`session`] wires it to memory and persisted [`settings`]; [`input`] turns
//! typed words into actions for the command-line front end.

pub mod calculator;
pub mod input;
pub mod memory;
pub mod session;
pub mod settings;

pub use calculator::{Base, Engine, Operator};
pub use session::{Action, BaseViews, Session};
pub use settings::{CalculatorMode, Settings};
