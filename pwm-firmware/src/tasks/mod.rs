// Task-Modul: Enthält alle Embassy Tasks
//
// Pro Farbkanal läuft ein Timer-Task, dazu ein Status-Task.
// Die Tasks teilen sich nur die FirmwareUnit (eigener Mutex pro Einheit).

pub mod channel_timer;
pub mod status;

// Re-export Tasks für einfachen Import
pub use channel_timer::channel_timer_task;
pub use status::status_task;
