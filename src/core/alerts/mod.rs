// Alert subsystem: level state machine and actuator patterns.
//
// Architecture:
// - model.rs: Actuator output types (tone, LEDs, haptic, vibrator)
// - patterns.rs: Pure per-level time patterns
// - engine.rs: Alert controller owning the system state and escalation

pub mod engine;
pub mod model;
pub mod patterns;

pub use engine::{AlertController, EscalationConfig};
