use super::alerts::AlertController;
use super::clock::Clock;
use super::haptic::HapticDriver;
use super::interpreter;
use super::model::Message;
use super::panel::Panel;
use super::parser;
use super::telemetry::TelemetryEmitter;

pub struct CoordinatorOutput {
    /// Outbound lines for the host, in emission order
    pub messages: Vec<Message>,
}

/// One cooperative scheduling step per loop iteration: at most one command,
/// then the pattern tick and the heartbeat check.
pub struct Coordinator<C: Clock, H: HapticDriver, P: Panel> {
    clock: C,
    controller: AlertController<H, P>,
    telemetry: TelemetryEmitter,
}

impl<C: Clock, H: HapticDriver, P: Panel> Coordinator<C, H, P> {
    pub fn new(clock: C, controller: AlertController<H, P>, telemetry: TelemetryEmitter) -> Self {
        Self {
            clock,
            controller,
            telemetry,
        }
    }

    pub fn controller(&self) -> &AlertController<H, P> {
        &self.controller
    }

    pub fn step(&mut self, line: Option<&str>) -> CoordinatorOutput {
        // Single time sample for everything decided in this step
        let now = self.clock.now_ms();
        let mut messages = Vec::new();

        // 1. Inbound command
        if let Some(command) = line.and_then(parser::parse_line) {
            messages.extend(interpreter::dispatch(
                command,
                &mut self.controller,
                &mut self.telemetry,
                now,
            ));
        }

        // 2. Pattern tick and heartbeat
        if self.controller.state().active {
            messages.extend(self.controller.tick(now));

            if self.telemetry.heartbeat_due(self.controller.state(), now) {
                messages.push(self.telemetry.emit_heartbeat(self.controller.state(), now));
                self.controller.record_heartbeat(now);
            }
        }

        CoordinatorOutput { messages }
    }

    /// Host link lost or process interrupted: behave as if SHUTDOWN arrived.
    pub fn shutdown(&mut self) -> CoordinatorOutput {
        let now = self.clock.now_ms();
        let reply = interpreter::dispatch(
            parser::Command::Shutdown,
            &mut self.controller,
            &mut self.telemetry,
            now,
        );
        CoordinatorOutput {
            messages: reply.into_iter().collect(),
        }
    }
}
