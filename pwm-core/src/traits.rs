//! Hardware Abstraction Traits
//!
//! Diese Traits definieren Schnittstellen für PWM-Register und Timer
//! ohne konkrete Implementierung.

use crate::types::{RegisterHandle, TimerToken};

/// Fehler-Typ für Timer-Operationen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerError {
    /// Keine Timer-Ressourcen mehr verfügbar
    Exhausted,
}

/// Trait für PWM-Register-Zugriff
///
/// # Implementierungen
/// - **Production:** LedcRegisterWriter (ESP32 LEDC Peripheral)
/// - **Testing:** MockRegisterWriter (in-memory Mock)
pub trait PwmRegisterWriter {
    /// Aktiviert das PWM-Modul (einmalig vor dem Start der Timer)
    fn enable(&mut self) {}

    /// Schreibt einen Duty-Cycle auf ein Register
    ///
    /// Fire-and-forget: das Schreiben gilt immer als erfolgreich.
    fn write(&mut self, register: RegisterHandle, duty: u8);
}

/// One-Shot-Timer eines Kanals, der nach jedem Feuern neu gestartet wird
///
/// Abbruch bedeutet einfach: `rearm()` wird nicht mehr aufgerufen.
pub trait RecurringTimer {
    /// Identitäts-Token, mit dem der Timer erzeugt wurde
    fn token(&self) -> TimerToken;

    /// Startet den Timer erneut, Ablauf nach `period_ms`
    fn rearm(&mut self, period_ms: u32);
}

/// Timer-Dienst, der Kanal-Timer erzeugt und startet
pub trait TimerService {
    type Timer: RecurringTimer;

    /// Erzeugt einen Timer
    ///
    /// # Fehlerbehandlung
    /// Gibt `TimerError::Exhausted` zurück wenn keine Timer mehr frei sind
    fn create(&mut self, period_ms: u32, token: TimerToken) -> Result<Self::Timer, TimerError>;

    /// Startet einen Timer zum ersten Mal
    fn start(&mut self, timer: &mut Self::Timer, initial_delay_ms: u32);
}
