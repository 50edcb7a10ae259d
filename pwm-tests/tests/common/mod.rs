//! Gemeinsame Test-Helfer: Mock-Register-Writer und simulierter Timer-Dienst
#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Mutex;

use pwm_core::{
    ChannelConfig, ChannelDriver, DispatchReport, PwmRegisterWriter, RecurringTimer,
    RegisterHandle, TimerError, TimerService, TimerToken, UnitConfig,
};
use embassy_sync::blocking_mutex::raw::{NoopRawMutex, RawMutex};

pub const MAX_DUTY: u8 = 0x30;
pub const HOLD_CYCLES: u8 = 10;

/// Ticks für einen vollen Auf-/Ab-Zyklus
pub const CYCLE_TICKS: usize = 2 * MAX_DUTY as usize;

pub const RED_REGISTER: RegisterHandle = RegisterHandle(3);
pub const GREEN_REGISTER: RegisterHandle = RegisterHandle(2);
pub const BLUE_REGISTER: RegisterHandle = RegisterHandle(1);

// ============================================================================
// Raw-Mutex pro Instanz (Host)
// ============================================================================

/// Raw-Mutex auf Basis von `std::sync::Mutex`
///
/// Im Gegensatz zu `CriticalSectionRawMutex` sperrt jede Instanz nur sich
/// selbst, so wie ein Mutex pro Einheit auf der Firmware.
pub struct StdRawMutex {
    inner: Mutex<()>,
}

unsafe impl RawMutex for StdRawMutex {
    #[allow(clippy::declare_interior_mutable_const)]
    const INIT: Self = Self {
        inner: Mutex::new(()),
    };

    fn lock<R>(&self, f: impl FnOnce() -> R) -> R {
        // Panics in anderen Threads sollen nicht alle Folge-Tests vergiften
        let _guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        f()
    }
}

// ============================================================================
// Mock Register Writer
// ============================================================================

#[derive(Default)]
pub struct MockRegisterWriter {
    /// Alle Schreibzugriffe in Reihenfolge
    pub writes: Vec<(RegisterHandle, u8)>,
    pub enable_count: usize,
}

impl MockRegisterWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Alle auf `register` geschriebenen Werte
    pub fn values(&self, register: RegisterHandle) -> Vec<u8> {
        self.writes
            .iter()
            .filter(|(r, _)| *r == register)
            .map(|(_, v)| *v)
            .collect()
    }

    pub fn last(&self, register: RegisterHandle) -> Option<u8> {
        self.values(register).last().copied()
    }
}

impl PwmRegisterWriter for MockRegisterWriter {
    fn enable(&mut self) {
        self.enable_count += 1;
    }

    fn write(&mut self, register: RegisterHandle, duty: u8) {
        self.writes.push((register, duty));
    }
}

// ============================================================================
// Konfiguration
// ============================================================================

/// Referenz-Topologie: Rot 50 ms, Grün 40 ms, Blau 30 ms, Blau ist Besitzer
pub fn reference_config() -> UnitConfig {
    UnitConfig {
        max_duty: MAX_DUTY,
        hold_cycles: HOLD_CYCLES,
        red: ChannelConfig {
            register: RED_REGISTER,
            period_ms: 50,
            timer_token: TimerToken(3),
            is_mode_progress_owner: false,
        },
        green: ChannelConfig {
            register: GREEN_REGISTER,
            period_ms: 40,
            timer_token: TimerToken(2),
            is_mode_progress_owner: false,
        },
        blue: ChannelConfig {
            register: BLUE_REGISTER,
            period_ms: 30,
            timer_token: TimerToken(1),
            is_mode_progress_owner: true,
        },
    }
}

/// Gleiche Topologie, aber mit eigenen Registern (zweite Einheit)
pub fn second_unit_config() -> UnitConfig {
    let mut config = reference_config().with_period_divisor(2);
    config.red.register = RegisterHandle(6);
    config.green.register = RegisterHandle(5);
    config.blue.register = RegisterHandle(4);
    config
}

// ============================================================================
// Simulierter Timer-Dienst (virtuelle Uhr)
// ============================================================================

pub struct SimTimer {
    token: TimerToken,
    now: Rc<Cell<u64>>,
    pub deadline: Option<u64>,
    pub rearm_count: usize,
    pub start_count: usize,
}

impl SimTimer {
    /// Timer mit beliebigem Token (z.B. für Identitäts-Fehler)
    pub fn detached(token: TimerToken) -> Self {
        Self {
            token,
            now: Rc::new(Cell::new(0)),
            deadline: None,
            rearm_count: 0,
            start_count: 0,
        }
    }
}

impl RecurringTimer for SimTimer {
    fn token(&self) -> TimerToken {
        self.token
    }

    fn rearm(&mut self, period_ms: u32) {
        self.rearm_count += 1;
        self.deadline = Some(self.now.get() + period_ms as u64);
    }
}

pub struct SimTimerService {
    pub now: Rc<Cell<u64>>,
    /// Maximale Anzahl Timer (None = unbegrenzt)
    pub capacity: Option<usize>,
    pub created: usize,
    pub periods: Vec<(TimerToken, u32)>,
}

impl SimTimerService {
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(0)),
            capacity: None,
            created: 0,
            periods: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::new()
        }
    }
}

impl TimerService for SimTimerService {
    type Timer = SimTimer;

    fn create(&mut self, period_ms: u32, token: TimerToken) -> Result<SimTimer, TimerError> {
        if self.capacity.is_some_and(|capacity| self.created >= capacity) {
            return Err(TimerError::Exhausted);
        }
        self.created += 1;
        self.periods.push((token, period_ms));
        Ok(SimTimer {
            token,
            now: self.now.clone(),
            deadline: None,
            rearm_count: 0,
            start_count: 0,
        })
    }

    fn start(&mut self, timer: &mut SimTimer, initial_delay_ms: u32) {
        timer.start_count += 1;
        timer.deadline = Some(self.now.get() + initial_delay_ms as u64);
    }
}

pub type SimDriver<'a> = ChannelDriver<'a, NoopRawMutex, MockRegisterWriter>;

/// Führt abgelaufene Timer in Deadline-Reihenfolge aus
pub struct Simulation<'a> {
    now: Rc<Cell<u64>>,
    channels: Vec<(SimDriver<'a>, SimTimer)>,
}

impl<'a> Simulation<'a> {
    pub fn new(service: &SimTimerService) -> Self {
        Self {
            now: service.now.clone(),
            channels: Vec::new(),
        }
    }

    pub fn add(&mut self, armed: [(SimDriver<'a>, SimTimer); 3]) {
        self.channels.extend(armed);
    }

    pub fn now(&self) -> u64 {
        self.now.get()
    }

    pub fn channels(&self) -> &[(SimDriver<'a>, SimTimer)] {
        &self.channels
    }

    /// Feuert den nächsten fälligen Timer (bei Gleichstand: Reihenfolge des Hinzufügens)
    pub fn step(&mut self) -> Option<DispatchReport> {
        let (index, deadline) = self
            .channels
            .iter()
            .enumerate()
            .filter_map(|(i, (_, timer))| timer.deadline.map(|d| (i, d)))
            .min_by_key(|(i, d)| (*d, *i))?;

        self.now.set(deadline);
        let (driver, timer) = &mut self.channels[index];
        timer.deadline = None;
        Some(driver.on_fire(timer))
    }

    /// Läuft bis zur virtuellen Zeit `end_ms` (inklusive)
    pub fn run_until(&mut self, end_ms: u64) -> Vec<DispatchReport> {
        let mut reports = Vec::new();
        while let Some(next) = self.next_deadline() {
            if next > end_ms {
                break;
            }
            if let Some(report) = self.step() {
                reports.push(report);
            }
        }
        reports
    }

    fn next_deadline(&self) -> Option<u64> {
        self.channels.iter().filter_map(|(_, t)| t.deadline).min()
    }
}
