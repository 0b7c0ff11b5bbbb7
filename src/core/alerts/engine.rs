// Alert controller - owns the level state machine and drives the actuators.

use serde::{Deserialize, Serialize};

use super::model::ActuatorState;
use super::patterns;
use crate::core::haptic::HapticDriver;
use crate::core::model::{AlertLevel, Message, SystemState};
use crate::core::panel::Panel;

/// Emergency escalation timing - persisted in settings.json
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationConfig {
    /// Time in Emergency before the first escalation (exclusive)
    #[serde(default = "default_threshold")]
    pub threshold_ms: u64,
    /// Minimum spacing between escalations
    #[serde(default = "default_interval")]
    pub interval_ms: u64,
}

fn default_threshold() -> u64 {
    10_000
}

fn default_interval() -> u64 {
    3_000
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            threshold_ms: default_threshold(),
            interval_ms: default_interval(),
        }
    }
}

/// Which actuator channels an update may touch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    All,
    /// LEDs, haptic and vibrator; the buzzer is left to the tick loop
    Indicators,
}

pub struct AlertController<H: HapticDriver, P: Panel> {
    state: SystemState,
    escalation: EscalationConfig,
    haptic: H,
    /// False after a failed handshake; haptic effects are skipped
    haptic_ready: bool,
    panel: P,
    /// Last state written to the hardware
    applied: ActuatorState,
}

impl<H: HapticDriver, P: Panel> AlertController<H, P> {
    /// Power-on: handshake with the haptic device and force every actuator off.
    /// A failed handshake is logged and the controller runs without haptics.
    pub fn new(mut haptic: H, panel: P, escalation: EscalationConfig) -> Self {
        let haptic_ready = match haptic.initialize() {
            Ok(()) => {
                log::info!("Haptic driver ready");
                true
            }
            Err(e) => {
                log::warn!(
                    "Haptic driver unavailable (status {}): {}. Continuing without haptics.",
                    e.code(),
                    e
                );
                false
            }
        };

        let mut controller = Self {
            state: SystemState::default(),
            escalation,
            haptic,
            haptic_ready,
            panel,
            applied: ActuatorState::OFF,
        };
        controller.force(ActuatorState::OFF);
        controller
    }

    pub fn state(&self) -> &SystemState {
        &self.state
    }

    pub fn haptic_ready(&self) -> bool {
        self.haptic_ready
    }

    pub fn haptic(&self) -> &H {
        &self.haptic
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    /// Current actuator state as last written
    pub fn outputs(&self) -> ActuatorState {
        self.applied
    }

    /// Enter the active Normal state and light the ready indicator.
    pub fn initialize(&mut self, now: u64) {
        self.state = SystemState::started(now);
        let ready = patterns::render(AlertLevel::Normal, 0).resolve(now);
        self.apply(ready, Scope::All);
        log::info!("Alert system initialized");
    }

    /// Switch to level `value` (0-3). Out-of-range values and calls while
    /// inactive are ignored. Returns whether the request was accepted.
    ///
    /// Re-setting the current level keeps its entry time.
    pub fn set_level(&mut self, value: i64, now: u64) -> bool {
        let Some(level) = AlertLevel::from_index(value) else {
            log::debug!("Ignoring out-of-range alert level {}", value);
            return false;
        };
        if !self.state.active {
            log::debug!("Ignoring alert level {} while inactive", value);
            return false;
        }

        if level != self.state.level {
            log::info!(
                "Alert level {} -> {}",
                self.state.level.display_name(),
                level.display_name()
            );
            self.state.level_entered_at = now;
            self.state.last_escalation_at = None;
        }
        self.state.level = level;
        self.state.emergency_active = level == AlertLevel::Emergency;

        // Immediate feedback, not waiting for the next tick
        let elapsed = self.state.elapsed(now);
        let target = patterns::render(level, elapsed).resolve(now);
        self.apply(target, Scope::Indicators);
        true
    }

    /// Evaluate the current pattern and apply it. Returns the urgent message
    /// when an escalation fired on this tick.
    pub fn tick(&mut self, now: u64) -> Option<Message> {
        if !self.state.active {
            return None;
        }

        let level = self.state.level;
        let elapsed = self.state.elapsed(now);
        let mut target = patterns::render(level, elapsed).resolve(now);
        let mut urgent = None;

        if level == AlertLevel::Emergency && elapsed > self.escalation.threshold_ms {
            let due = match self.state.last_escalation_at {
                Some(last) => now.saturating_sub(last) >= self.escalation.interval_ms,
                None => true,
            };
            if due {
                self.state.last_escalation_at = Some(now);
                target = patterns::escalation().resolve(now);
                urgent = Some(Message::emergency());
                log::warn!("Emergency escalation after {} ms", elapsed);
            }
        }

        self.apply(target, Scope::All);
        urgent
    }

    /// Deactivate and de-assert every actuator regardless of the last written state.
    pub fn shutdown(&mut self) {
        self.state = SystemState::default();
        self.force(ActuatorState::OFF);
        log::info!("Alert system shut down");
    }

    pub fn record_heartbeat(&mut self, now: u64) {
        self.state.last_heartbeat_at = now;
    }

    /// Write only the channels that differ from what is already applied.
    fn apply(&mut self, target: ActuatorState, scope: Scope) {
        let previous = self.applied;

        if scope == Scope::All && previous.tone != target.tone {
            self.panel.set_tone(target.tone);
            self.applied.tone = target.tone;
        }
        if previous.leds != target.leds {
            self.panel.set_leds(target.leds);
            self.applied.leds = target.leds;
        }
        if previous.vibrator != target.vibrator {
            self.panel.set_vibrator(target.vibrator);
            self.applied.vibrator = target.vibrator;
        }
        if previous.haptic != target.haptic {
            self.drive_haptic(target.haptic);
            self.applied.haptic = target.haptic;
        }
    }

    fn force(&mut self, target: ActuatorState) {
        self.panel.set_tone(target.tone);
        self.panel.set_leds(target.leds);
        self.panel.set_vibrator(target.vibrator);
        self.drive_haptic(target.haptic);
        self.applied = target;
    }

    fn drive_haptic(&mut self, intensity: Option<u8>) {
        if !self.haptic_ready {
            return;
        }
        match intensity {
            Some(value) => self.haptic.activate(value),
            None => self.haptic.deactivate(),
        }
    }
}
