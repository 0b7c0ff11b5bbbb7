// Shared data types: alert levels, controller state and the outbound telemetry records.
//
// NOTE: The outbound JSON shapes are consumed by the host-side inference process.
// Keep the field names in sync with the host parser when modifying them.

use serde::{Serialize, Serializer};

/// Fixed text of the urgent message sent on every escalation.
pub const EMERGENCY_MESSAGE: &str = "DRIVER UNRESPONSIVE - IMMEDIATE INTERVENTION REQUIRED";

/// Severity classification produced by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum AlertLevel {
    #[default]
    Normal = 0,
    Warning = 1,
    Critical = 2,
    Emergency = 3,
}

impl AlertLevel {
    /// Map a raw wire value to a level. Values outside 0..=3 are rejected, never clamped.
    pub fn from_index(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::Normal),
            1 => Some(Self::Warning),
            2 => Some(Self::Critical),
            3 => Some(Self::Emergency),
            _ => None,
        }
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Warning => "WARNING",
            Self::Critical => "CRITICAL",
            Self::Emergency => "EMERGENCY",
        }
    }

    #[cfg(test)]
    pub fn all() -> &'static [AlertLevel] {
        &[Self::Normal, Self::Warning, Self::Critical, Self::Emergency]
    }
}

impl Serialize for AlertLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.index())
    }
}

/// Process-wide controller state. Owned exclusively by the alert controller;
/// everyone else only ever sees a shared reference.
///
/// Timestamps are milliseconds on the injected monotonic clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SystemState {
    pub active: bool,
    pub level: AlertLevel,
    /// Reset only when `level` changes value
    pub level_entered_at: u64,
    /// Always equal to `level == Emergency`
    pub emergency_active: bool,
    /// None until the first escalation of the current Emergency episode
    pub last_escalation_at: Option<u64>,
    pub last_heartbeat_at: u64,
}

impl SystemState {
    /// Fresh active state as set up by `INIT`.
    pub fn started(now: u64) -> Self {
        Self {
            active: true,
            level: AlertLevel::Normal,
            level_entered_at: now,
            emergency_active: false,
            last_escalation_at: None,
            last_heartbeat_at: now,
        }
    }

    /// Time spent in the current level
    pub fn elapsed(&self, now: u64) -> u64 {
        now.saturating_sub(self.level_entered_at)
    }
}

/// Synthetic vital-sign sample, computed fresh for every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetrySample {
    pub systolic: i32,
    pub diastolic: i32,
    pub heart_rate: i32,
    pub timestamp: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeartbeatRecord {
    #[serde(rename = "alertLevel")]
    pub level: AlertLevel,
    pub uptime: u64,
    pub emergency: bool,
}

/// Link state reported back to the host after INIT / SHUTDOWN
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkState {
    Ready,
    Shutdown,
}

/// One outbound line to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Message {
    Bp(TelemetrySample),
    Heartbeat(HeartbeatRecord),
    Emergency { message: String },
    Status { state: LinkState },
    /// Diagnostic echo of a line we did not understand
    Unknown { command: String },
}

impl Message {
    pub fn emergency() -> Self {
        Self::Emergency {
            message: EMERGENCY_MESSAGE.to_string(),
        }
    }

    /// Serialize as a single JSON line (without the trailing newline)
    pub fn to_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_rejects_out_of_range() {
        assert_eq!(AlertLevel::from_index(-1), None);
        assert_eq!(AlertLevel::from_index(4), None);
        assert_eq!(AlertLevel::from_index(i64::MAX), None);
        for level in AlertLevel::all() {
            assert_eq!(AlertLevel::from_index(i64::from(level.index())), Some(*level));
        }
    }

    #[test]
    fn test_levels_are_ordered() {
        assert!(AlertLevel::Normal < AlertLevel::Warning);
        assert!(AlertLevel::Warning < AlertLevel::Critical);
        assert!(AlertLevel::Critical < AlertLevel::Emergency);
    }

    #[test]
    fn test_wire_format() {
        let bp = Message::Bp(TelemetrySample {
            systolic: 121,
            diastolic: 79,
            heart_rate: 70,
            timestamp: 1500,
        });
        assert_eq!(
            bp.to_line().unwrap(),
            r#"{"type":"bp","systolic":121,"diastolic":79,"heartRate":70,"timestamp":1500}"#
        );

        let heartbeat = Message::Heartbeat(HeartbeatRecord {
            level: AlertLevel::Critical,
            uptime: 5001,
            emergency: false,
        });
        assert_eq!(
            heartbeat.to_line().unwrap(),
            r#"{"type":"heartbeat","alertLevel":2,"uptime":5001,"emergency":false}"#
        );

        assert_eq!(
            Message::emergency().to_line().unwrap(),
            r#"{"type":"emergency","message":"DRIVER UNRESPONSIVE - IMMEDIATE INTERVENTION REQUIRED"}"#
        );

        let status = Message::Status { state: LinkState::Ready };
        assert_eq!(status.to_line().unwrap(), r#"{"type":"status","state":"ready"}"#);
    }
}
