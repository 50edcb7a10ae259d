// Timer-Dienst auf Basis von embassy-time
//
// Ein Kanal-Timer ist ein One-Shot: `rearm()` setzt die nächste Deadline
// relativ zu jetzt. Der Kanal-Task wartet auf die Deadline und ruft dann
// den Dispatch Shim auf. Ohne Rearm endet der Task.

use embassy_time::{Duration, Instant};

use pwm_core::{RecurringTimer, TimerError, TimerService, TimerToken};

use crate::config::MAX_CHANNEL_TIMERS;

/// One-Shot-Timer eines Kanals
pub struct EmbassyChannelTimer {
    token: TimerToken,
    deadline: Option<Instant>,
}

impl EmbassyChannelTimer {
    /// Nächste Deadline entnehmen (None = Timer nicht mehr gestartet)
    pub fn take_deadline(&mut self) -> Option<Instant> {
        self.deadline.take()
    }
}

impl RecurringTimer for EmbassyChannelTimer {
    fn token(&self) -> TimerToken {
        self.token
    }

    fn rearm(&mut self, period_ms: u32) {
        self.deadline = Some(Instant::now() + Duration::from_millis(u64::from(period_ms)));
    }
}

/// Erzeugt Kanal-Timer, begrenzt auf die Task-Pool-Größe
#[derive(Default)]
pub struct EmbassyTimerService {
    created: usize,
}

impl EmbassyTimerService {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TimerService for EmbassyTimerService {
    type Timer = EmbassyChannelTimer;

    fn create(&mut self, _period_ms: u32, token: TimerToken) -> Result<Self::Timer, TimerError> {
        if self.created >= MAX_CHANNEL_TIMERS {
            return Err(TimerError::Exhausted);
        }
        self.created += 1;
        Ok(EmbassyChannelTimer {
            token,
            deadline: None,
        })
    }

    fn start(&mut self, timer: &mut Self::Timer, initial_delay_ms: u32) {
        timer.deadline = Some(Instant::now() + Duration::from_millis(u64::from(initial_delay_ms)));
    }
}
