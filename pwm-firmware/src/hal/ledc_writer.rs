// PWM Register Writer für das ESP32 LEDC Peripheral
//
// Jede RGB-Einheit besitzt einen eigenen Writer mit ihren drei LEDC-Kanälen.
// Die Zuordnung RegisterHandle → Kanal ist explizit im Writer hinterlegt.

use defmt::warn;
use esp_hal::gpio::DriveMode;
use esp_hal::gpio::interconnect::PeripheralOutput;
use esp_hal::ledc::channel::{self, Channel, ChannelHW, ChannelIFace};
use esp_hal::ledc::timer::{self, TimerIFace};
use esp_hal::ledc::{Ledc, LowSpeed};
use esp_hal::time::Rate;

use pwm_core::{PwmRegisterWriter, RegisterHandle};

use crate::config::LEDC_FREQUENCY_KHZ;

/// Konfiguriert den gemeinsamen LEDC-Timer (8 Bit Auflösung)
///
/// # Parameter
/// - `ledc`: LEDC-Treiber (globaler Slow-Clock bereits gesetzt)
pub fn configure_pwm_timer(
    ledc: &Ledc<'static>,
) -> Result<timer::Timer<'static, LowSpeed>, timer::Error> {
    let mut pwm_timer = ledc.timer::<LowSpeed>(timer::Number::Timer0);
    pwm_timer.configure(timer::config::Config {
        duty: timer::config::Duty::Duty8Bit,
        clock_source: timer::LSClockSource::APBClk,
        frequency: Rate::from_khz(LEDC_FREQUENCY_KHZ),
    })?;
    Ok(pwm_timer)
}

/// Konfiguriert einen LEDC-Kanal auf einem GPIO (Start mit Duty 0)
///
/// # Parameter
/// - `number`: LEDC Channel-Nummer
/// - `pin`: GPIO für den Farbkanal
/// - `pwm_timer`: Gemeinsamer LEDC-Timer (muss 'static sein)
pub fn configure_channel(
    ledc: &Ledc<'static>,
    number: channel::Number,
    pin: impl PeripheralOutput<'static>,
    pwm_timer: &'static timer::Timer<'static, LowSpeed>,
) -> Result<Channel<'static, LowSpeed>, channel::Error> {
    let mut output = ledc.channel(number, pin);
    output.configure(channel::config::Config {
        timer: pwm_timer,
        duty_pct: 0,
        drive_mode: DriveMode::PushPull,
    })?;
    Ok(output)
}

/// LEDC-basierter Register Writer einer RGB-Einheit
pub struct LedcRegisterWriter {
    outputs: [(RegisterHandle, Channel<'static, LowSpeed>); 3],
}

impl LedcRegisterWriter {
    /// Erstellt einen Writer aus drei konfigurierten Kanälen
    ///
    /// Jeder Kanal wird mit dem RegisterHandle verknüpft, unter dem
    /// die Einheit ihn anspricht.
    pub fn new(outputs: [(RegisterHandle, Channel<'static, LowSpeed>); 3]) -> Self {
        Self { outputs }
    }
}

impl PwmRegisterWriter for LedcRegisterWriter {
    fn enable(&mut self) {
        // PWM-Modul aktiv: alle Ausgänge definiert auf 0
        for (_, output) in &self.outputs {
            output.set_duty_hw(0);
        }
    }

    fn write(&mut self, register: RegisterHandle, duty: u8) {
        match self.outputs.iter().find(|(handle, _)| *handle == register) {
            Some((_, output)) => output.set_duty_hw(u32::from(duty)),
            None => warn!("LEDC: unknown register {}", register),
        }
    }
}
