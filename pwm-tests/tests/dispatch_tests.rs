//! Integration Tests für den Dispatch Shim und den Timer-Bring-up
//!
//! Die Timer laufen auf einer virtuellen Uhr (SimTimerService)

mod common;

use common::*;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use pwm_core::{
    BlinkMode, ChannelDriver, ChannelId, ModeChange, SharedUnit, TickOutcome, TimerError,
    TimerToken, Unit, arm_unit,
};

type TestUnit = SharedUnit<NoopRawMutex, MockRegisterWriter>;

fn shared_unit(config: pwm_core::UnitConfig) -> TestUnit {
    SharedUnit::new(Unit::new(config, MockRegisterWriter::new()).unwrap())
}

// ============================================================================
// Tests: Bring-up
// ============================================================================

#[test]
fn test_arm_unit_enables_pwm_and_starts_three_timers() {
    let unit = shared_unit(reference_config());
    let mut service = SimTimerService::new();

    let armed = arm_unit(&unit, &mut service).unwrap();

    assert_eq!(unit.with_unit(|u| u.writer().enable_count), 1);
    assert_eq!(
        service.periods,
        vec![(TimerToken(3), 50), (TimerToken(2), 40), (TimerToken(1), 30)]
    );
    for (driver, timer) in &armed {
        assert!(driver.is_running());
        assert_eq!(timer.start_count, 1);
        assert_eq!(timer.deadline, Some(0));
    }
    assert_eq!(armed[0].0.channel(), ChannelId::Red);
    assert_eq!(armed[2].0.channel(), ChannelId::Blue);
}

#[test]
fn test_arm_unit_exhausted_starts_nothing() {
    let unit = shared_unit(reference_config());
    let mut service = SimTimerService::with_capacity(2);

    let result = arm_unit(&unit, &mut service);

    assert!(matches!(result, Err(TimerError::Exhausted)));
    assert_eq!(service.created, 2);
}

#[test]
fn test_second_unit_runs_at_half_period() {
    let unit = shared_unit(second_unit_config());
    let mut service = SimTimerService::new();
    arm_unit(&unit, &mut service).unwrap();
    assert_eq!(
        service.periods,
        vec![(TimerToken(3), 25), (TimerToken(2), 20), (TimerToken(1), 15)]
    );
}

// ============================================================================
// Tests: Callback-Semantik
// ============================================================================

#[test]
fn test_every_fire_rearms_exactly_once() {
    let unit = shared_unit(reference_config());
    let mut service = SimTimerService::new();
    let mut sim = Simulation::new(&service);
    sim.add(arm_unit(&unit, &mut service).unwrap());

    let reports = sim.run_until(2_000);

    for (driver, timer) in sim.channels() {
        let fires = reports
            .iter()
            .filter(|r| r.channel == driver.channel())
            .count();
        assert_eq!(timer.rearm_count, fires);
        assert!(timer.deadline.is_some());
    }
    assert!(reports.iter().all(|r| r.identity_ok && r.rearmed));
}

#[test]
fn test_skipped_tick_is_still_rearmed() {
    let unit = shared_unit(reference_config());
    let driver = ChannelDriver::new(&unit, ChannelId::Green);
    let mut timer = SimTimer::detached(TimerToken(2));

    let report = driver.on_fire(&mut timer);

    assert_eq!(report.outcome, TickOutcome::Skipped);
    assert!(report.rearmed);
    assert_eq!(timer.rearm_count, 1);
    assert_eq!(timer.deadline, Some(40));
}

#[test]
fn test_identity_mismatch_is_diagnostic_only() {
    let unit = shared_unit(reference_config());
    let driver = ChannelDriver::new(&unit, ChannelId::Red);
    let mut timer = SimTimer::detached(TimerToken(99));

    let report = driver.on_fire(&mut timer);

    assert!(!report.identity_ok);
    assert!(matches!(report.outcome, TickOutcome::Driven { written: 0, .. }));
    assert!(report.rearmed);
    assert_eq!(unit.snapshot().red.duty, 1);
}

#[test]
fn test_stopped_driver_does_not_rearm() {
    let unit = shared_unit(reference_config());
    let mut service = SimTimerService::new();
    let mut sim = Simulation::new(&service);
    sim.add(arm_unit(&unit, &mut service).unwrap());

    sim.run_until(100);
    sim.channels()[0].0.stop();
    let reports = sim.run_until(1_000);

    let red_fires = reports
        .iter()
        .filter(|r| r.channel == ChannelId::Red)
        .collect::<Vec<_>>();
    assert_eq!(red_fires.len(), 1);
    assert!(!red_fires[0].rearmed);
    assert_eq!(sim.channels()[0].1.deadline, None);

    let duty_after_stop = unit.snapshot().red.duty;
    sim.run_until(2_000);
    assert_eq!(unit.snapshot().red.duty, duty_after_stop);
}

// ============================================================================
// Tests: Ablauf über die Zeit
// ============================================================================

#[test]
fn test_full_program_mode_sequence() {
    let unit = shared_unit(reference_config());
    let mut service = SimTimerService::new();
    let mut sim = Simulation::new(&service);
    sim.add(arm_unit(&unit, &mut service).unwrap());

    // Rot 4.8 s + Grün 3.84 s + Blau 2.88 s + RGB 11 × 2.88 s ≈ 43.2 s
    let reports = sim.run_until(60_000);

    let changes: Vec<(ChannelId, ModeChange)> = reports
        .iter()
        .filter_map(|r| match r.outcome {
            TickOutcome::Driven {
                mode_change: Some(change),
                ..
            } => Some((r.channel, change)),
            _ => None,
        })
        .collect();

    let mut expected = vec![
        (ChannelId::Red, ModeChange::Entered(BlinkMode::Green)),
        (ChannelId::Green, ModeChange::Entered(BlinkMode::Blue)),
        (ChannelId::Blue, ModeChange::Entered(BlinkMode::Rgb)),
    ];
    for remaining in (0..HOLD_CYCLES).rev() {
        expected.push((ChannelId::Blue, ModeChange::Held { remaining }));
    }
    expected.push((ChannelId::Blue, ModeChange::Wrapped));

    assert!(changes.len() >= expected.len());
    assert_eq!(&changes[..expected.len()], &expected[..]);
    // Danach beginnt der Zyklus von vorn
    assert_eq!(
        changes.get(expected.len()),
        Some(&(ChannelId::Red, ModeChange::Entered(BlinkMode::Green)))
    );
}

#[test]
fn test_units_are_independent() {
    // Einheit 0 allein
    let solo = shared_unit(reference_config());
    let mut solo_service = SimTimerService::new();
    let mut solo_sim = Simulation::new(&solo_service);
    solo_sim.add(arm_unit(&solo, &mut solo_service).unwrap());
    solo_sim.run_until(20_000);

    // Einheit 0 zusammen mit Einheit 1 (halbe Periode)
    let unit0 = shared_unit(reference_config());
    let unit1 = shared_unit(second_unit_config());
    let mut service = SimTimerService::new();
    let mut sim = Simulation::new(&service);
    sim.add(arm_unit(&unit0, &mut service).unwrap());
    sim.add(arm_unit(&unit1, &mut service).unwrap());
    sim.run_until(20_000);

    assert_eq!(unit0.snapshot(), solo.snapshot());
    assert_eq!(
        unit0.with_unit(|u| u.writer().writes.clone()),
        solo.with_unit(|u| u.writer().writes.clone())
    );

    // Einheit 1 ist doppelt so schnell und schon weiter im Zyklus
    assert_eq!(unit0.snapshot().mode, BlinkMode::Rgb);
    let unit1_writes = unit1.with_unit(|u| u.writer().writes.len());
    let unit0_writes = unit0.with_unit(|u| u.writer().writes.len());
    assert!(unit1_writes > unit0_writes);
}
