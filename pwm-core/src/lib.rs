//! PWM Core - Platform-agnostic Logic and Traits
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Sie definiert Traits, Typen und die Rampen-/Modus-Logik einer RGB-Einheit.

#![no_std]

pub mod dispatch;
pub mod logic;
pub mod mode;
pub mod traits;
pub mod types;
pub mod unit;

// Re-exports für einfachen Zugriff
pub use dispatch::{ArmedChannel, ChannelDriver, DispatchReport, arm_unit};
pub use logic::{advance_ramp, is_active, may_progress};
pub use mode::ModeMachine;
pub use traits::{PwmRegisterWriter, RecurringTimer, TimerError, TimerService};
pub use types::{
    BlinkMode, ChannelConfig, ChannelId, ChannelState, ConfigError, ModeChange, RampDirection,
    RampStep, RegisterHandle, TickOutcome, TimerToken, UnitConfig, UnitSnapshot,
};
pub use unit::{SharedUnit, Unit};
