//! One calculator session: the engine plus memory, settings and the
//! standard/programmer keypad state.
//!
//! Front ends translate their input events into [`Action`]s and read back
//! [`Session::display`] and, in programmer mode, [`Session::base_views`].

use tracing::debug;

use crate::calculator::{self, Base, Engine, Operator, base};
use crate::memory::MemoryList;
use crate::settings::{CalculatorMode, Settings};

/// A primitive user action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Digit(char),
    DecimalPoint,
    Operator(Operator),
    Evaluate,
    Percentage,
    Reciprocal,
    Square,
    SquareRoot,
    Negate,
    Clear,
    ClearEntry,
    Backspace,
    MemoryStore,
    MemoryRecall,
    MemoryRecallAt(usize),
    MemoryClear,
    MemoryAdd,
    MemorySubtract,
    SetBase(Base),
    SetMode(CalculatorMode),
    TogglePrecedence,
    ToggleDigitGrouping,
}

/// The current value rendered in every base, as the programmer panel shows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseViews {
    pub hex: String,
    pub dec: String,
    pub oct: String,
    pub bin: String,
}

impl BaseViews {
    pub fn for_value(value: i64) -> Self {
        Self {
            hex: base::render(value, Base::Hexadecimal),
            dec: base::render(value, Base::Decimal),
            oct: base::render(value, Base::Octal),
            bin: base::render(value, Base::Binary),
        }
    }

    /// Shown when the current value has no integer form.
    pub fn fallback() -> Self {
        Self {
            hex: "0x0".to_string(),
            dec: "0".to_string(),
            oct: "00".to_string(),
            bin: "0000".to_string(),
        }
    }

    pub fn get(&self, base: Base) -> &str {
        match base {
            Base::Hexadecimal => &self.hex,
            Base::Decimal => &self.dec,
            Base::Octal => &self.oct,
            Base::Binary => &self.bin,
        }
    }
}

pub struct Session {
    engine: Engine,
    memory: MemoryList,
    settings: Settings,
    mode: CalculatorMode,
    base: Base,
}

impl Session {
    /// Start a session configured from `settings`.
    pub fn new(settings: Settings) -> Self {
        let mut session = Self {
            engine: Engine::with_precedence(settings.use_operator_precedence()),
            memory: MemoryList::new(),
            settings,
            mode: CalculatorMode::Standard,
            base: Base::Decimal,
        };
        if session.settings.calculator_mode() == CalculatorMode::Programmer {
            session.switch_mode(CalculatorMode::Programmer);
        }
        session
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn memory(&self) -> &MemoryList {
        &self.memory
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn mode(&self) -> CalculatorMode {
        self.mode
    }

    pub fn base(&self) -> Base {
        self.base
    }

    /// Apply one action.
    pub fn apply(&mut self, action: Action) {
        debug!(?action, "Applying action");
        match action {
            Action::Digit(digit) => {
                if self.is_valid_digit(digit) {
                    self.engine
                        .append_digit(&digit.to_ascii_uppercase().to_string());
                } else {
                    debug!(%digit, base = %self.base, "Digit not valid in current base");
                }
            }
            Action::DecimalPoint => {
                if self.base == Base::Decimal {
                    self.engine.append_decimal_point();
                }
            }
            Action::Operator(op) => self.engine.set_operator(op),
            Action::Evaluate => self.engine.evaluate(),
            Action::Percentage => self.engine.percentage(),
            Action::Reciprocal => self.engine.reciprocal(),
            Action::Square => self.engine.square(),
            Action::SquareRoot => self.engine.square_root(),
            Action::Negate => self.engine.negate(),
            Action::Clear => self.engine.clear(),
            Action::ClearEntry => self.engine.clear_entry(),
            Action::Backspace => self.engine.backspace(),
            Action::MemoryStore => self.memory.store(self.engine.current_value()),
            Action::MemoryRecall => {
                if self.memory.has_memory() {
                    self.engine.set_value(self.memory.recall());
                }
            }
            Action::MemoryRecallAt(index) => {
                if let Some(value) = self.memory.recall_at(index) {
                    self.engine.set_value(value);
                }
            }
            Action::MemoryClear => self.memory.clear(),
            Action::MemoryAdd => self.memory.add(self.engine.current_value()),
            Action::MemorySubtract => self.memory.subtract(self.engine.current_value()),
            Action::SetBase(base) => self.set_number_base(base),
            Action::SetMode(mode) => self.switch_mode(mode),
            Action::TogglePrecedence => {
                let enabled = !self.engine.precedence_enabled();
                self.engine.set_precedence_mode(enabled);
                self.settings.set_use_operator_precedence(enabled);
            }
            Action::ToggleDigitGrouping => {
                let enabled = !self.settings.use_digit_grouping();
                self.settings.set_use_digit_grouping(enabled);
            }
        }
    }

    /// Apply a sequence of actions.
    pub fn apply_all(&mut self, actions: impl IntoIterator<Item = Action>) {
        for action in actions {
            self.apply(action);
        }
    }

    /// The main display, with digit grouping when enabled in decimal.
    pub fn display(&self) -> String {
        let text = self.engine.display();
        if self.settings.use_digit_grouping() && self.base == Base::Decimal {
            calculator::group_digits(text)
        } else {
            text.to_string()
        }
    }

    /// The current value in all four bases, truncated toward zero.
    pub fn base_views(&self) -> BaseViews {
        let value = self.engine.current_value();
        if value.is_finite() {
            BaseViews::for_value(value.trunc() as i64)
        } else {
            BaseViews::fallback()
        }
    }

    /// Whether a keypad digit may be typed in the current base.
    pub fn is_valid_digit(&self, digit: char) -> bool {
        self.base.accepts_digit(digit)
    }

    /// Text to put on the clipboard for copy: exactly what is displayed.
    pub fn copy_text(&self) -> String {
        self.display()
    }

    /// Text to put on the clipboard for cut; clears the calculator.
    pub fn cut_text(&mut self) -> String {
        let text = self.copy_text();
        self.engine.clear();
        text
    }

    /// Paste `text` as the current value. Returns false if it is not a number.
    pub fn paste_text(&mut self, text: &str) -> bool {
        let text = text.trim();
        let value = match self.base {
            Base::Decimal => text
                .replace(',', "")
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite()),
            other => base::parse(text, other).ok().map(|value| value as f64),
        };

        match value {
            Some(value) => {
                self.engine.set_value(value);
                true
            }
            None => {
                debug!(text, "Ignoring non-numeric paste");
                false
            }
        }
    }

    fn set_number_base(&mut self, base: Base) {
        if self.mode != CalculatorMode::Programmer {
            debug!(%base, "Base selection needs programmer mode");
            return;
        }
        self.base = base;
        self.engine.set_input_base(base);
        self.settings.set_number_base(base);
    }

    fn switch_mode(&mut self, mode: CalculatorMode) {
        self.mode = mode;
        match mode {
            CalculatorMode::Programmer => {
                let base = self.settings.base();
                self.set_number_base(base);
            }
            CalculatorMode::Standard => {
                self.base = Base::Decimal;
                self.engine.set_input_base(Base::Decimal);
            }
        }
        self.settings.set_calculator_mode(mode);
    }
}
