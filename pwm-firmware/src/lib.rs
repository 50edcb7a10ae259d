// Library-Root: Wiederverwendbare Logik und Module
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

// Module
pub mod config;
pub mod hal;
pub mod tasks;

// Re-exports von pwm-core
pub use pwm_core::{ChannelDriver, SharedUnit, TickOutcome, Unit, arm_unit};

use embassy_sync::blocking_mutex::raw::NoopRawMutex;

use crate::hal::LedcRegisterWriter;

// ============================================================================
// Type-Aliase
// ============================================================================
//
// Statt:  SharedUnit<NoopRawMutex, LedcRegisterWriter>
// Nutze:  FirmwareUnit

/// RGB-Einheit mit eigenem Mutex
///
/// Alle Timer-Tasks laufen auf demselben (kooperativen) Executor, daher
/// reicht `NoopRawMutex`. Der Lock sperrt nur diese Einheit, nicht die andere
/// und keine Interrupts.
pub type FirmwareUnit = SharedUnit<NoopRawMutex, LedcRegisterWriter>;

/// Kanal-Treiber einer `FirmwareUnit`
pub type FirmwareDriver = ChannelDriver<'static, NoopRawMutex, LedcRegisterWriter>;
