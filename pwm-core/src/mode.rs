//! Blink-Modus-Automat
//!
//! Rot → Grün → Blau → RGB (Halten für N Zyklen) → Rot

use crate::types::{BlinkMode, ModeChange};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeMachine {
    mode: BlinkMode,
    hold_remaining: u8,
    hold_cycles: u8,
}

impl ModeMachine {
    /// Startzustand: Rot, Halte-Zähler = `hold_cycles`
    pub const fn new(hold_cycles: u8) -> Self {
        Self {
            mode: BlinkMode::Red,
            hold_remaining: hold_cycles,
            hold_cycles,
        }
    }

    pub fn mode(&self) -> BlinkMode {
        self.mode
    }

    /// Verbleibende Halte-Zyklen (nur im RGB-Modus relevant)
    pub fn hold_remaining(&self) -> u8 {
        self.hold_remaining
    }

    /// Schaltet den Modus weiter
    ///
    /// Im RGB-Modus wird zuerst der Halte-Zähler bis 0 heruntergezählt.
    /// Bei `ModeChange::Wrapped` steht der Automat bereits wieder auf Rot;
    /// das Zurücksetzen der Kanäle ist Sache des Aufrufers.
    pub fn advance(&mut self) -> ModeChange {
        if self.mode == BlinkMode::Rgb && self.hold_remaining > 0 {
            self.hold_remaining -= 1;
            return ModeChange::Held {
                remaining: self.hold_remaining,
            };
        }

        match self.mode.next() {
            Some(next) => {
                if next == BlinkMode::Rgb {
                    self.hold_remaining = self.hold_cycles;
                }
                self.mode = next;
                ModeChange::Entered(next)
            }
            None => {
                self.mode = BlinkMode::Red;
                self.hold_remaining = self.hold_cycles;
                ModeChange::Wrapped
            }
        }
    }
}
