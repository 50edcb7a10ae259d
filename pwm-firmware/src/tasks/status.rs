// Status Task - gibt periodisch den Zustand aller Einheiten aus
use defmt::info;
use embassy_time::{Duration, Timer};

use crate::FirmwareUnit;
use crate::config::STATUS_INTERVAL_SECS;

/// Status Task - läuft mit niedriger Priorität neben den Timer-Tasks
///
/// Die eigentliche Arbeit machen die Kanal-Timer. Dieser Task liest
/// nur Momentaufnahmen (unter dem Mutex der jeweiligen Einheit).
///
/// # Parameter
/// - `units`: Alle RGB-Einheiten
#[embassy_executor::task]
pub async fn status_task(units: [&'static FirmwareUnit; 2]) {
    loop {
        Timer::after(Duration::from_secs(STATUS_INTERVAL_SECS)).await;

        for (index, unit) in units.iter().enumerate() {
            info!("Unit {}: {}", index, unit.snapshot());
        }
    }
}
