// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen
//
// Die Topologie (Perioden, Kanäle, Register) steht zur Startzeit fest
// und wird zur Laufzeit nicht verändert.

use pwm_core::{ChannelConfig, RegisterHandle, TimerToken, UnitConfig};

// ============================================================================
// LEDC (PWM) Konfiguration
// ============================================================================

/// PWM-Frequenz des LEDC-Timers in kHz
pub const LEDC_FREQUENCY_KHZ: u32 = 24;

/// Maximaler Duty-Cycle der Rampe (bei 8 Bit Auflösung → gedimmt)
pub const MAX_DUTY: u8 = 0x30;

// ============================================================================
// Blink-Konfiguration
// ============================================================================

/// Zusätzliche Zyklen im RGB-Modus (Einheit 0)
pub const HOLD_CYCLES: u8 = 10;

/// Einheit 1 hält den RGB-Modus nur halb so lange
pub const UNIT1_HOLD_CYCLES: u8 = HOLD_CYCLES / 2;

/// Timer-Perioden pro Kanal in Millisekunden (Einheit 0)
pub const RED_PERIOD_MS: u32 = 50;
pub const GREEN_PERIOD_MS: u32 = 40;
pub const BLUE_PERIOD_MS: u32 = 30;

/// Einheit 1 läuft mit halber Periode (doppelte Geschwindigkeit)
pub const UNIT1_PERIOD_DIVISOR: u32 = 2;

/// Identitäts-Token der Kanal-Timer (für beide Einheiten gleich)
pub const BLUE_TIMER_TOKEN: TimerToken = TimerToken(1);
pub const GREEN_TIMER_TOKEN: TimerToken = TimerToken(2);
pub const RED_TIMER_TOKEN: TimerToken = TimerToken(3);

/// Maximale Anzahl Kanal-Timer (2 Einheiten × 3 Kanäle)
/// Muss zur `pool_size` von `channel_timer_task` passen
pub const MAX_CHANNEL_TIMERS: usize = 6;

/// Intervall der Status-Ausgabe in Sekunden
pub const STATUS_INTERVAL_SECS: u64 = 1;

// ============================================================================
// Register-Zuordnung (LEDC Channel-Nummer)
// ============================================================================
//
// Einheit 0: Rot = GPIO0, Grün = GPIO1, Blau = GPIO2
// Einheit 1: Rot = GPIO3, Grün = GPIO6, Blau = GPIO7

pub const UNIT0_RED_REGISTER: RegisterHandle = RegisterHandle(0);
pub const UNIT0_GREEN_REGISTER: RegisterHandle = RegisterHandle(1);
pub const UNIT0_BLUE_REGISTER: RegisterHandle = RegisterHandle(2);
pub const UNIT1_RED_REGISTER: RegisterHandle = RegisterHandle(3);
pub const UNIT1_GREEN_REGISTER: RegisterHandle = RegisterHandle(4);
pub const UNIT1_BLUE_REGISTER: RegisterHandle = RegisterHandle(5);

fn channel(register: RegisterHandle, period_ms: u32, timer_token: TimerToken) -> ChannelConfig {
    ChannelConfig {
        register,
        period_ms,
        timer_token,
        // Blau ist der einzige Kanal, der im RGB-Modus weiterschalten darf
        is_mode_progress_owner: timer_token == BLUE_TIMER_TOKEN,
    }
}

/// Konfiguration der ersten RGB-LED
pub fn unit0_config() -> UnitConfig {
    UnitConfig {
        max_duty: MAX_DUTY,
        hold_cycles: HOLD_CYCLES,
        red: channel(UNIT0_RED_REGISTER, RED_PERIOD_MS, RED_TIMER_TOKEN),
        green: channel(UNIT0_GREEN_REGISTER, GREEN_PERIOD_MS, GREEN_TIMER_TOKEN),
        blue: channel(UNIT0_BLUE_REGISTER, BLUE_PERIOD_MS, BLUE_TIMER_TOKEN),
    }
}

/// Konfiguration der zweiten RGB-LED (halbe Periode, kürzeres Halten)
pub fn unit1_config() -> UnitConfig {
    UnitConfig {
        max_duty: MAX_DUTY,
        hold_cycles: UNIT1_HOLD_CYCLES,
        red: channel(UNIT1_RED_REGISTER, RED_PERIOD_MS, RED_TIMER_TOKEN),
        green: channel(UNIT1_GREEN_REGISTER, GREEN_PERIOD_MS, GREEN_TIMER_TOKEN),
        blue: channel(UNIT1_BLUE_REGISTER, BLUE_PERIOD_MS, BLUE_TIMER_TOKEN),
    }
    .with_period_divisor(UNIT1_PERIOD_DIVISOR)
}
