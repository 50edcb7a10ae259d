// Keine Standard-Bibliothek verwenden (Embedded System)
#![no_std]
// Kein normaler main() Einstiegspunkt (wird von esp_rtos bereitgestellt)
#![no_main]
// Verbiete mem::forget - gefährlich bei ESP HAL Types
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
// Verbiete große Stack-Frames (Stack ist auf Embedded Systemen begrenzt)
#![deny(clippy::large_stack_frames)]

// Embassy Async Runtime
use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};

// ESP32-C6 HAL
use esp_hal::clock::CpuClock;
use esp_hal::ledc::channel::Number;
use esp_hal::ledc::timer::Timer as LedcTimer;
use esp_hal::ledc::{LSGlobalClkSource, Ledc, LowSpeed};
use esp_hal::timer::timg::TimerGroup;

// Backtrace bei Panic und println!() Support
use {esp_backtrace as _, esp_println as _};

use defmt::info;
use static_cell::StaticCell;

// Projekt-Module und Konfiguration
use rgb_pwm_led::config::*;
use rgb_pwm_led::hal::{
    EmbassyTimerService, LedcRegisterWriter, configure_channel, configure_pwm_timer,
};
use rgb_pwm_led::tasks::{channel_timer_task, status_task};
use rgb_pwm_led::{FirmwareUnit, SharedUnit, Unit, arm_unit};

// ESP-IDF App Descriptor - erforderlich für den Bootloader!
// Ohne diesen schlägt das Flashen mit "ESP-IDF App Descriptor missing" fehl
esp_bootloader_esp_idf::esp_app_desc!();

/// Main Entry Point
///
/// Initialisiert Hardware, LEDC und beide RGB-Einheiten, startet die
/// Kanal-Timer und spawnt Tasks. Danach schläft main() - alle Arbeit
/// läuft in den Timer-Tasks.
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    info!("RGB LED PWM Demo für ESP32-C6");

    // ESP32-C6 Konfiguration: CPU auf maximale Taktfrequenz (160 MHz)
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    // Embassy Runtime initialisieren (Timer + Software Interrupt)
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_interrupt =
        esp_hal::interrupt::software::SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_interrupt.software_interrupt0);

    // LEDC (PWM) initialisieren: ein Timer für alle sechs Kanäle
    let mut ledc = Ledc::new(peripherals.LEDC);
    ledc.set_global_slow_clock(LSGlobalClkSource::APBClk);

    static PWM_TIMER: StaticCell<LedcTimer<'static, LowSpeed>> = StaticCell::new();
    let pwm_timer =
        &*PWM_TIMER.init(configure_pwm_timer(&ledc).expect("Failed to configure LEDC timer"));

    // Einheit 0: GPIO0/1/2
    let unit0_writer = LedcRegisterWriter::new([
        (
            UNIT0_RED_REGISTER,
            configure_channel(&ledc, Number::Channel0, peripherals.GPIO0, pwm_timer)
                .expect("Failed to configure LEDC channel 0"),
        ),
        (
            UNIT0_GREEN_REGISTER,
            configure_channel(&ledc, Number::Channel1, peripherals.GPIO1, pwm_timer)
                .expect("Failed to configure LEDC channel 1"),
        ),
        (
            UNIT0_BLUE_REGISTER,
            configure_channel(&ledc, Number::Channel2, peripherals.GPIO2, pwm_timer)
                .expect("Failed to configure LEDC channel 2"),
        ),
    ]);

    // Einheit 1: GPIO3/6/7
    let unit1_writer = LedcRegisterWriter::new([
        (
            UNIT1_RED_REGISTER,
            configure_channel(&ledc, Number::Channel3, peripherals.GPIO3, pwm_timer)
                .expect("Failed to configure LEDC channel 3"),
        ),
        (
            UNIT1_GREEN_REGISTER,
            configure_channel(&ledc, Number::Channel4, peripherals.GPIO6, pwm_timer)
                .expect("Failed to configure LEDC channel 4"),
        ),
        (
            UNIT1_BLUE_REGISTER,
            configure_channel(&ledc, Number::Channel5, peripherals.GPIO7, pwm_timer)
                .expect("Failed to configure LEDC channel 5"),
        ),
    ]);

    // Einheiten müssen 'static sein für die Timer-Tasks
    static UNIT0: StaticCell<FirmwareUnit> = StaticCell::new();
    let unit0 = &*UNIT0.init(SharedUnit::new(
        Unit::new(unit0_config(), unit0_writer).expect("Invalid configuration for unit 0"),
    ));

    static UNIT1: StaticCell<FirmwareUnit> = StaticCell::new();
    let unit1 = &*UNIT1.init(SharedUnit::new(
        Unit::new(unit1_config(), unit1_writer).expect("Invalid configuration for unit 1"),
    ));

    // Kanal-Timer erzeugen und starten (Ressourcen-Mangel ist fatal)
    let mut timer_service = EmbassyTimerService::new();
    for (unit_index, unit) in [unit0, unit1].into_iter().enumerate() {
        let armed = arm_unit(unit, &mut timer_service).expect("Failed to create channel timers");
        info!("Unit {}: PWM enabled, timers armed", unit_index);

        for (driver, timer) in armed {
            spawner
                .spawn(channel_timer_task(unit_index, driver, timer))
                .unwrap();
        }
    }

    // Spawn Status Task (periodische Momentaufnahmen)
    spawner.spawn(status_task([unit0, unit1])).unwrap();

    // Main-Loop: schläft (alle Arbeit läuft in Tasks)
    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}
