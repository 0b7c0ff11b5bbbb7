use super::alerts::AlertController;
use super::haptic::HapticDriver;
use super::model::{LinkState, Message};
use super::panel::Panel;
use super::parser::Command;
use super::telemetry::TelemetryEmitter;

/// Apply one command. The command is fully applied (state and immediate
/// actuator update) before this returns. Never fails; bad input is a no-op
/// at most answered with a diagnostic echo.
pub fn dispatch<H: HapticDriver, P: Panel>(
    command: Command,
    controller: &mut AlertController<H, P>,
    telemetry: &mut TelemetryEmitter,
    now: u64,
) -> Option<Message> {
    match command {
        Command::Init => {
            controller.initialize(now);
            Some(Message::Status {
                state: LinkState::Ready,
            })
        }
        Command::Alert(Some(value)) => {
            controller.set_level(value, now);
            None
        }
        Command::Alert(None) => {
            log::debug!("Ignoring ALERT with missing or non-numeric level");
            None
        }
        Command::VitalsRequest => Some(telemetry.emit_vitals(controller.state().level, now)),
        Command::Shutdown => {
            controller.shutdown();
            Some(Message::Status {
                state: LinkState::Shutdown,
            })
        }
        Command::Unknown(line) => {
            log::debug!("Unknown command: {}", line);
            Some(Message::Unknown { command: line })
        }
    }
}
