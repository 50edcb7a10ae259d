// Hardware Abstraction Layer (HAL) Module
//
// Dieses Modul kapselt Hardware-Zugriffe hinter den Traits aus pwm-core,
// um Testbarkeit und Wartbarkeit zu verbessern.

pub mod ledc_writer;
pub mod timer;

pub use ledc_writer::{LedcRegisterWriter, configure_channel, configure_pwm_timer};
pub use timer::{EmbassyChannelTimer, EmbassyTimerService};
