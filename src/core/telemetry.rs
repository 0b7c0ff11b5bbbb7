// Outbound health telemetry: periodic heartbeat and simulated vital signs.
//
// Vital signs are synthetic. They are derived from the current alert level so
// the host sees numbers that move with the driver's state; nothing is measured.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::model::{AlertLevel, HeartbeatRecord, Message, SystemState, TelemetrySample};

pub const BASELINE_SYSTOLIC: i32 = 120;
pub const BASELINE_DIASTOLIC: i32 = 80;
pub const BASELINE_HEART_RATE: i32 = 72;

/// Inclusive offsets from the baselines for one alert level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VitalOffsets {
    pub systolic: (i32, i32),
    pub diastolic: (i32, i32),
    pub heart_rate: (i32, i32),
}

/// Indexed by `AlertLevel::index()`
const OFFSETS: [VitalOffsets; 4] = [
    VitalOffsets {
        systolic: (-5, 5),
        diastolic: (-3, 3),
        heart_rate: (-5, 5),
    },
    VitalOffsets {
        systolic: (5, 14),
        diastolic: (3, 7),
        heart_rate: (5, 14),
    },
    VitalOffsets {
        systolic: (15, 24),
        diastolic: (8, 14),
        heart_rate: (15, 24),
    },
    VitalOffsets {
        systolic: (25, 39),
        diastolic: (15, 24),
        heart_rate: (25, 39),
    },
];

pub fn offsets(level: AlertLevel) -> VitalOffsets {
    OFFSETS[usize::from(level.index())]
}

pub struct TelemetryEmitter {
    rng: StdRng,
    heartbeat_interval_ms: u64,
}

impl TelemetryEmitter {
    /// `seed` makes the vitals sequence reproducible; None draws from OS entropy.
    pub fn new(heartbeat_interval_ms: u64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            heartbeat_interval_ms,
        }
    }

    /// A heartbeat is due once the interval has strictly passed, and only while active.
    pub fn heartbeat_due(&self, state: &SystemState, now: u64) -> bool {
        state.active && now.saturating_sub(state.last_heartbeat_at) > self.heartbeat_interval_ms
    }

    /// Build the heartbeat record. The caller records `now` as the last heartbeat.
    pub fn emit_heartbeat(&self, state: &SystemState, now: u64) -> Message {
        Message::Heartbeat(HeartbeatRecord {
            level: state.level,
            uptime: now,
            emergency: state.emergency_active,
        })
    }

    pub fn sample_vitals(&mut self, level: AlertLevel, now: u64) -> TelemetrySample {
        let range = offsets(level);
        TelemetrySample {
            systolic: BASELINE_SYSTOLIC + self.draw(range.systolic),
            diastolic: BASELINE_DIASTOLIC + self.draw(range.diastolic),
            heart_rate: BASELINE_HEART_RATE + self.draw(range.heart_rate),
            timestamp: now,
        }
    }

    pub fn emit_vitals(&mut self, level: AlertLevel, now: u64) -> Message {
        Message::Bp(self.sample_vitals(level, now))
    }

    fn draw(&mut self, (low, high): (i32, i32)) -> i32 {
        self.rng.gen_range(low..=high)
    }
}
