/// One inbound host command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Init,
    /// `ALERT:<n>`. None when the suffix is missing or not an integer.
    Alert(Option<i64>),
    /// `BP_REQUEST:<n>`. The suffix is accepted but carries no meaning.
    VitalsRequest,
    Shutdown,
    Unknown(String),
}

const ALERT_PREFIX: &str = "ALERT:";
const VITALS_PREFIX: &str = "BP_REQUEST:";

/// Parse one line from the host. Matching is case-sensitive on the trimmed line.
/// Blank lines yield None.
pub fn parse_line(line: &str) -> Option<Command> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    let command = match trimmed {
        "INIT" => Command::Init,
        "SHUTDOWN" => Command::Shutdown,
        _ => {
            if let Some(value) = trimmed.strip_prefix(ALERT_PREFIX) {
                Command::Alert(value.trim().parse().ok())
            } else if trimmed.starts_with(VITALS_PREFIX) {
                Command::VitalsRequest
            } else {
                Command::Unknown(trimmed.to_string())
            }
        }
    };
    Some(command)
}
