// Kanal-Timer Task - Dispatch Shim für einen Farbkanal
use defmt::{debug, info, warn};
use embassy_time::Timer;

use crate::hal::EmbassyChannelTimer;
use crate::{FirmwareDriver, TickOutcome};

/// Kanal-Timer Task - läuft parallel für jeden Farbkanal
///
/// Wartet auf die Deadline des Kanal-Timers und ruft dann den
/// `ChannelDriver` auf (Identität prüfen → Tick → Rearm).
/// Der Task endet erst, wenn der Timer nicht mehr neu gestartet wird.
///
/// # Parameter
/// - `unit_index`: Nummer der RGB-Einheit (nur für Logs)
/// - `driver`: Kanal-Treiber der Einheit
/// - `timer`: Bereits gestarteter Kanal-Timer
#[embassy_executor::task(pool_size = 6)]
pub async fn channel_timer_task(
    unit_index: usize,
    driver: FirmwareDriver,
    mut timer: EmbassyChannelTimer,
) {
    info!(
        "Unit {}: {} timer started ({} ms)",
        unit_index,
        driver.channel().name(),
        driver.period_ms()
    );

    while let Some(deadline) = timer.take_deadline() {
        Timer::at(deadline).await;

        let report = driver.on_fire(&mut timer);

        if !report.identity_ok {
            warn!(
                "Unit {}: {} timer identity mismatch",
                unit_index,
                driver.channel().name()
            );
        }

        if let TickOutcome::Driven {
            mode_change: Some(change),
            ..
        } = report.outcome
        {
            debug!("Unit {}: {}", unit_index, change);
        }
    }

    info!(
        "Unit {}: {} timer stopped",
        unit_index,
        driver.channel().name()
    );
}
