//! Dispatch Shim: Timer-Callback → Unit-Tick → Rearm
//!
//! Jeder Kanal hat einen eigenen `ChannelDriver`. Pro Feuern des Timers
//! wird genau ein Tick ausgeführt und der Timer genau einmal neu gestartet.

use core::sync::atomic::{AtomicBool, Ordering};

use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::traits::{PwmRegisterWriter, RecurringTimer, TimerError, TimerService};
use crate::types::{ChannelId, TickOutcome, TimerToken};
use crate::unit::SharedUnit;

/// Ergebnis eines Timer-Callbacks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DispatchReport {
    pub channel: ChannelId,
    /// `false` wenn das Token des feuernden Timers nicht passt (nur Diagnose)
    pub identity_ok: bool,
    pub outcome: TickOutcome,
    pub rearmed: bool,
}

/// Verbindet einen Kanal-Timer mit seiner Einheit
pub struct ChannelDriver<'a, M: RawMutex, W> {
    unit: &'a SharedUnit<M, W>,
    channel: ChannelId,
    expected_token: TimerToken,
    period_ms: u32,
    running: AtomicBool,
}

impl<'a, M: RawMutex, W: PwmRegisterWriter> ChannelDriver<'a, M, W> {
    pub fn new(unit: &'a SharedUnit<M, W>, channel: ChannelId) -> Self {
        let config = unit.config().channel(channel);
        Self {
            unit,
            channel,
            expected_token: config.timer_token,
            period_ms: config.period_ms,
            running: AtomicBool::new(true),
        }
    }

    pub fn channel(&self) -> ChannelId {
        self.channel
    }

    pub fn period_ms(&self) -> u32 {
        self.period_ms
    }

    /// Callback beim Ablauf des Kanal-Timers
    ///
    /// Ein falsches Token wird nur gemeldet, der Tick läuft trotzdem.
    /// Der Timer wird unabhängig vom Tick-Ergebnis neu gestartet,
    /// außer der Treiber wurde mit `stop()` angehalten.
    pub fn on_fire<T: RecurringTimer>(&self, timer: &mut T) -> DispatchReport {
        let identity_ok = timer.token() == self.expected_token;
        let outcome = self.unit.tick(self.channel);

        let rearmed = self.is_running();
        if rearmed {
            timer.rearm(self.period_ms);
        }

        DispatchReport {
            channel: self.channel,
            identity_ok,
            outcome,
            rearmed,
        }
    }

    /// Nach dem nächsten Feuern nicht mehr neu starten
    pub fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }
}

/// Kanal-Treiber und zugehöriger Timer
pub type ArmedChannel<'a, M, W, T> = (ChannelDriver<'a, M, W>, T);

/// Bring-up einer Einheit: PWM aktivieren, drei Timer erzeugen und starten
///
/// Alle Timer werden erzeugt bevor einer startet. Schlägt ein `create`
/// fehl, läuft kein Timer dieser Einheit.
///
/// # Fehlerbehandlung
/// Gibt `TimerError::Exhausted` weiter wenn der Timer-Dienst keine
/// Ressourcen mehr hat
pub fn arm_unit<'a, M, W, S>(
    unit: &'a SharedUnit<M, W>,
    service: &mut S,
) -> Result<[ArmedChannel<'a, M, W, S::Timer>; 3], TimerError>
where
    M: RawMutex,
    W: PwmRegisterWriter,
    S: TimerService,
{
    unit.enable();

    let mut create = |channel: ChannelId| -> Result<ArmedChannel<'a, M, W, S::Timer>, TimerError> {
        let driver = ChannelDriver::new(unit, channel);
        let timer = service.create(driver.period_ms(), unit.config().channel(channel).timer_token)?;
        Ok((driver, timer))
    };

    let mut armed = [create(ChannelId::Red)?, create(ChannelId::Green)?, create(ChannelId::Blue)?];

    for (_, timer) in armed.iter_mut() {
        service.start(timer, 0);
    }

    Ok(armed)
}
