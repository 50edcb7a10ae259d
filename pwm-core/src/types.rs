//! Core Types für die PWM-Rampen-Steuerung
//!
//! Datenstrukturen ohne Hardware-Dependencies

use rgb::RGB8;

/// Farbkanal innerhalb einer RGB-Einheit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelId {
    Red,
    Green,
    Blue,
}

impl ChannelId {
    /// Alle Kanäle einer Einheit in fester Reihenfolge
    pub const ALL: [ChannelId; 3] = [ChannelId::Red, ChannelId::Green, ChannelId::Blue];

    pub fn name(self) -> &'static str {
        match self {
            ChannelId::Red => "Rot",
            ChannelId::Green => "Grün",
            ChannelId::Blue => "Blau",
        }
    }
}

/// Rampen-Richtung eines Kanals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RampDirection {
    Ascending,
    Descending,
}

/// Blink-Modus einer Einheit: Rot → Grün → Blau → RGB → Rot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlinkMode {
    Red,
    Green,
    Blue,
    /// Alle drei Kanäle aktiv (Halte-Modus)
    Rgb,
}

impl BlinkMode {
    /// Nächster Modus im Zyklus
    ///
    /// `None` bedeutet: Ende des Zyklus erreicht (nach RGB), die Einheit
    /// muss komplett zurückgesetzt werden.
    pub fn next(self) -> Option<BlinkMode> {
        match self {
            BlinkMode::Red => Some(BlinkMode::Green),
            BlinkMode::Green => Some(BlinkMode::Blue),
            BlinkMode::Blue => Some(BlinkMode::Rgb),
            BlinkMode::Rgb => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BlinkMode::Red => "Rot",
            BlinkMode::Green => "Grün",
            BlinkMode::Blue => "Blau",
            BlinkMode::Rgb => "RGB",
        }
    }
}

/// Opaker Hardware-Handle eines PWM-Registers
///
/// Wird nur vom `PwmRegisterWriter` interpretiert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterHandle(pub u8);

/// Identitäts-Token eines Kanal-Timers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerToken(pub u32);

// ============================================================================
// Statische Konfiguration
// ============================================================================

/// Konfiguration eines Kanals (zur Startzeit festgelegt)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelConfig {
    /// PWM-Register, auf das der Duty-Cycle geschrieben wird
    pub register: RegisterHandle,
    /// Timer-Periode in Millisekunden
    pub period_ms: u32,
    /// Erwartetes Token des feuernden Timers
    pub timer_token: TimerToken,
    /// Nur dieser Kanal darf im RGB-Modus den Modus weiterschalten
    pub is_mode_progress_owner: bool,
}

/// Fehler bei ungültiger Einheiten-Konfiguration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    ZeroMaxDuty,
    ZeroPeriod(ChannelId),
    NoProgressOwner,
    MultipleProgressOwners,
    DuplicateRegister,
    DuplicateToken,
}

/// Konfiguration einer RGB-Einheit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnitConfig {
    /// Maximaler Duty-Cycle (Scheitelpunkt der Rampe)
    pub max_duty: u8,
    /// Anzahl zusätzlicher Zyklen im RGB-Modus (N)
    pub hold_cycles: u8,
    pub red: ChannelConfig,
    pub green: ChannelConfig,
    pub blue: ChannelConfig,
}

impl UnitConfig {
    /// Explizite Zuordnung Kanal → Konfiguration
    pub fn channel(&self, id: ChannelId) -> &ChannelConfig {
        match id {
            ChannelId::Red => &self.red,
            ChannelId::Green => &self.green,
            ChannelId::Blue => &self.blue,
        }
    }

    /// Teilt alle Kanal-Perioden durch `divisor` (z.B. 2 für doppelte Geschwindigkeit)
    pub fn with_period_divisor(mut self, divisor: u32) -> Self {
        let divisor = divisor.max(1);
        self.red.period_ms /= divisor;
        self.green.period_ms /= divisor;
        self.blue.period_ms /= divisor;
        self
    }

    /// Prüft die statische Topologie einer Einheit
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_duty == 0 {
            return Err(ConfigError::ZeroMaxDuty);
        }

        for id in ChannelId::ALL {
            if self.channel(id).period_ms == 0 {
                return Err(ConfigError::ZeroPeriod(id));
            }
        }

        let owners = ChannelId::ALL
            .iter()
            .filter(|id| self.channel(**id).is_mode_progress_owner)
            .count();
        match owners {
            0 => return Err(ConfigError::NoProgressOwner),
            1 => {}
            _ => return Err(ConfigError::MultipleProgressOwners),
        }

        let (r, g, b) = (&self.red, &self.green, &self.blue);
        if r.register == g.register || r.register == b.register || g.register == b.register {
            return Err(ConfigError::DuplicateRegister);
        }
        if r.timer_token == g.timer_token
            || r.timer_token == b.timer_token
            || g.timer_token == b.timer_token
        {
            return Err(ConfigError::DuplicateToken);
        }

        Ok(())
    }
}

// ============================================================================
// Laufzeit-Zustand
// ============================================================================

/// Veränderlicher Zustand eines Kanals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelState {
    pub duty: u8,
    pub direction: RampDirection,
}

impl ChannelState {
    /// Startzustand: Duty 0, aufsteigend
    pub const fn new() -> Self {
        Self {
            duty: 0,
            direction: RampDirection::Ascending,
        }
    }
}

impl Default for ChannelState {
    fn default() -> Self {
        Self::new()
    }
}

/// Ergebnis eines Rampen-Schritts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RampStep {
    /// Duty-Cycle nach dem Schritt
    pub duty: u8,
    /// Scheitelpunkt erreicht, Richtung wechselt auf absteigend
    pub peaked: bool,
    /// Absteigend bei 0 angekommen: voller Auf-/Ab-Zyklus abgeschlossen
    pub completed: bool,
}

/// Ergebnis von `ModeMachine::advance()`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModeChange {
    /// Im RGB-Modus geblieben, Halte-Zähler dekrementiert
    Held { remaining: u8 },
    /// In einen neuen Modus gewechselt
    Entered(BlinkMode),
    /// Zyklus-Ende: zurück auf Rot mit vollständigem Reset
    Wrapped,
}

/// Ergebnis eines Kanal-Ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickOutcome {
    /// Kanal im aktuellen Modus inaktiv, nichts geschrieben
    Skipped,
    /// Kanal geschrieben und um einen Schritt weitergeschaltet
    Driven {
        /// Auf das Register geschriebener Wert (vor dem Schritt)
        written: u8,
        step: RampStep,
        mode_change: Option<ModeChange>,
    },
}

/// Momentaufnahme einer Einheit (für Status-Ausgaben)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitSnapshot {
    pub mode: BlinkMode,
    pub hold_remaining: u8,
    pub red: ChannelState,
    pub green: ChannelState,
    pub blue: ChannelState,
}

impl UnitSnapshot {
    /// Aktuelle Duty-Cycles als RGB-Farbe
    pub fn color(&self) -> RGB8 {
        RGB8 {
            r: self.red.duty,
            g: self.green.duty,
            b: self.blue.duty,
        }
    }
}

// ============================================================================
// defmt::Format Implementations (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for UnitSnapshot {
    fn format(&self, fmt: defmt::Formatter) {
        let color = self.color();
        defmt::write!(
            fmt,
            "UnitSnapshot {{ mode: {}, hold: {}, duty: ({}, {}, {}) }}",
            self.mode.name(),
            self.hold_remaining,
            color.r,
            color.g,
            color.b
        )
    }
}
