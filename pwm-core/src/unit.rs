//! Unit Coordinator: eine RGB-Einheit mit drei Kanälen
//!
//! `Unit` enthält die reine Tick-Logik, `SharedUnit` legt sie in einen
//! Blocking-Mutex, damit die Timer-Callbacks aller drei Kanäle sie
//! gefahrlos aufrufen können. Jede Einheit hat ihren eigenen Mutex.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::logic::{advance_ramp, is_active, may_progress};
use crate::mode::ModeMachine;
use crate::traits::PwmRegisterWriter;
use crate::types::{
    ChannelId, ChannelState, ConfigError, ModeChange, TickOutcome, UnitConfig, UnitSnapshot,
};

/// Zustand einer RGB-Einheit inklusive ihres Register-Writers
pub struct Unit<W> {
    config: UnitConfig,
    red: ChannelState,
    green: ChannelState,
    blue: ChannelState,
    machine: ModeMachine,
    writer: W,
}

impl<W: PwmRegisterWriter> Unit<W> {
    /// Erstellt eine Einheit im Startzustand (Rot, alle Kanäle Duty 0)
    ///
    /// # Fehlerbehandlung
    /// Gibt `ConfigError` zurück wenn die Konfiguration ungültig ist
    pub fn new(config: UnitConfig, writer: W) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            red: ChannelState::new(),
            green: ChannelState::new(),
            blue: ChannelState::new(),
            machine: ModeMachine::new(config.hold_cycles),
            writer,
        })
    }

    pub fn mode_machine(&self) -> &ModeMachine {
        &self.machine
    }

    pub fn channel(&self, id: ChannelId) -> &ChannelState {
        match id {
            ChannelId::Red => &self.red,
            ChannelId::Green => &self.green,
            ChannelId::Blue => &self.blue,
        }
    }

    fn channel_mut(&mut self, id: ChannelId) -> &mut ChannelState {
        match id {
            ChannelId::Red => &mut self.red,
            ChannelId::Green => &mut self.green,
            ChannelId::Blue => &mut self.blue,
        }
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Aktiviert das PWM-Modul des Writers
    pub fn enable(&mut self) {
        self.writer.enable();
    }

    /// Ein Timer-Tick für `id`
    ///
    /// Reihenfolge: erst aktuellen Duty-Cycle schreiben, dann Rampe
    /// weiterschalten. Ein abgeschlossener Zyklus schaltet den Modus nur
    /// weiter, wenn der Kanal dazu berechtigt ist.
    pub fn tick(&mut self, id: ChannelId) -> TickOutcome {
        let mode = self.machine.mode();
        if !is_active(mode, id) {
            return TickOutcome::Skipped;
        }

        let channel_config = *self.config.channel(id);
        let max_duty = self.config.max_duty;

        let written = self.channel(id).duty;
        self.writer.write(channel_config.register, written);
        let step = advance_ramp(self.channel_mut(id), max_duty);

        let mode_change = if step.completed
            && may_progress(mode, channel_config.is_mode_progress_owner)
        {
            let change = self.machine.advance();
            if change == ModeChange::Wrapped {
                self.blackout();
            }
            Some(change)
        } else {
            None
        };

        TickOutcome::Driven {
            written,
            step,
            mode_change,
        }
    }

    /// Zyklus-Ende: alle Kanäle auf 0 / aufsteigend und sofort 0 schreiben
    fn blackout(&mut self) {
        for id in ChannelId::ALL {
            *self.channel_mut(id) = ChannelState::new();
            let register = self.config.channel(id).register;
            self.writer.write(register, 0);
        }
    }

    pub fn snapshot(&self) -> UnitSnapshot {
        UnitSnapshot {
            mode: self.machine.mode(),
            hold_remaining: self.machine.hold_remaining(),
            red: self.red,
            green: self.green,
            blue: self.blue,
        }
    }
}

/// Einheit hinter einem Blocking-Mutex
///
/// # Typ-Parameter
/// - `M`: Raw-Mutex, eine Instanz pro Einheit (z.B. `NoopRawMutex` auf
///   einem einzelnen Executor). Ein globaler Lock wie `CriticalSectionRawMutex`
///   würde die Ticks aller Einheiten gegenseitig sperren.
/// - `W`: Register-Writer der Einheit
pub struct SharedUnit<M: RawMutex, W> {
    // Kopie der Konfiguration: wird nach `Unit::new` nie verändert
    config: UnitConfig,
    inner: Mutex<M, RefCell<Unit<W>>>,
}

impl<M: RawMutex, W: PwmRegisterWriter> SharedUnit<M, W> {
    pub fn new(unit: Unit<W>) -> Self {
        Self {
            config: unit.config,
            inner: Mutex::new(RefCell::new(unit)),
        }
    }

    /// Statische Konfiguration (lesbar ohne Lock)
    pub fn config(&self) -> &UnitConfig {
        &self.config
    }

    /// Führt einen Tick als einen kritischen Abschnitt aus
    pub fn tick(&self, id: ChannelId) -> TickOutcome {
        self.inner.lock(|unit| unit.borrow_mut().tick(id))
    }

    pub fn enable(&self) {
        self.inner.lock(|unit| unit.borrow_mut().enable())
    }

    pub fn snapshot(&self) -> UnitSnapshot {
        self.inner.lock(|unit| unit.borrow().snapshot())
    }

    /// Zugriff auf die Einheit unter dem Lock (z.B. für Assertions auf den Writer)
    pub fn with_unit<R>(&self, f: impl FnOnce(&mut Unit<W>) -> R) -> R {
        self.inner.lock(|unit| f(&mut unit.borrow_mut()))
    }
}
