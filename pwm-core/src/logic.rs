//! Pure Business Logic Functions
//!
//! Funktionen ohne Hardware-Dependencies (testbar!)

use crate::types::{BlinkMode, ChannelId, ChannelState, RampDirection, RampStep};

/// Schaltet den Duty-Cycle eines Kanals um einen Schritt weiter
///
/// Die Rampe ist ein geschlossener Sägezahn in `[0, max_duty]`:
/// aufsteigend bis `max_duty`, dann absteigend bis 0.
///
/// # Beispiele
///
/// ```
/// # use pwm_core::{advance_ramp, ChannelState, RampDirection};
/// let mut channel = ChannelState { duty: 1, direction: RampDirection::Descending };
/// let step = advance_ramp(&mut channel, 0x30);
/// assert_eq!(step.duty, 0);
/// assert!(step.completed);
/// assert_eq!(channel.direction, RampDirection::Ascending);
/// ```
pub fn advance_ramp(channel: &mut ChannelState, max_duty: u8) -> RampStep {
    let mut peaked = false;
    let mut completed = false;

    match channel.direction {
        RampDirection::Ascending => {
            channel.duty = channel.duty.saturating_add(1).min(max_duty);
            if channel.duty >= max_duty {
                channel.direction = RampDirection::Descending;
                peaked = true;
            }
        }
        RampDirection::Descending => {
            channel.duty = channel.duty.saturating_sub(1);
            if channel.duty == 0 {
                channel.direction = RampDirection::Ascending;
                completed = true;
            }
        }
    }

    RampStep {
        duty: channel.duty,
        peaked,
        completed,
    }
}

/// Soll der Kanal im aktuellen Modus geschrieben und weitergeschaltet werden?
pub fn is_active(mode: BlinkMode, channel: ChannelId) -> bool {
    matches!(
        (mode, channel),
        (BlinkMode::Rgb, _)
            | (BlinkMode::Red, ChannelId::Red)
            | (BlinkMode::Green, ChannelId::Green)
            | (BlinkMode::Blue, ChannelId::Blue)
    )
}

/// Darf ein abgeschlossener Zyklus dieses Kanals den Modus weiterschalten?
///
/// Im RGB-Modus nur der Besitzer-Kanal, sonst jeder (es ist ohnehin nur
/// ein Kanal aktiv).
pub fn may_progress(mode: BlinkMode, is_mode_progress_owner: bool) -> bool {
    mode != BlinkMode::Rgb || is_mode_progress_owner
}
