// Deterministic time patterns for each alert level.
//
// Every pattern is a pure function of the time spent in the level. Phases are
// derived with modulo arithmetic, so nothing is retained between ticks and a
// pattern restarts cleanly whenever the level is re-entered.

use super::model::{LedMode, LedPattern, Outputs};
use crate::core::model::AlertLevel;

pub const WARNING_PERIOD_MS: u64 = 2000;
/// Separate cycle for the Warning haptic nudge, also measured from level entry
pub const WARNING_HAPTIC_PERIOD_MS: u64 = 5000;
pub const CRITICAL_PERIOD_MS: u64 = 1500;
pub const EMERGENCY_PERIOD_MS: u64 = 800;

type PatternFn = fn(u64) -> Outputs;

/// Indexed by `AlertLevel::index()`
const PATTERNS: [PatternFn; 4] = [normal, warning, critical, emergency];

/// Actuator outputs for `level` after `elapsed` ms in that level.
pub fn render(level: AlertLevel, elapsed: u64) -> Outputs {
    PATTERNS[usize::from(level.index())](elapsed)
}

/// Forced maximum output used by emergency escalation
pub fn escalation() -> Outputs {
    Outputs {
        tone: Some(4000),
        leds: solid_red(),
        haptic: Some(100),
        vibrator: true,
    }
}

fn normal(_elapsed: u64) -> Outputs {
    Outputs {
        tone: None,
        leds: LedPattern {
            green: LedMode::On,
            ..LedPattern::default()
        },
        haptic: None,
        vibrator: false,
    }
}

fn warning(elapsed: u64) -> Outputs {
    let tone = (elapsed % WARNING_PERIOD_MS < 400).then_some(2500);
    let haptic = (elapsed % WARNING_HAPTIC_PERIOD_MS < 200).then_some(30);
    Outputs {
        tone,
        leds: LedPattern {
            yellow: LedMode::On,
            ..LedPattern::default()
        },
        haptic,
        vibrator: false,
    }
}

fn critical(elapsed: u64) -> Outputs {
    // Haptic starts with the first beep and holds until the silent tail.
    let (tone, haptic) = match elapsed % CRITICAL_PERIOD_MS {
        0..=399 => (Some(3000), Some(50)),
        400..=499 => (None, Some(50)),
        500..=899 => (Some(3200), Some(50)),
        _ => (None, None),
    };
    Outputs {
        tone,
        leds: solid_red(),
        haptic,
        vibrator: false,
    }
}

fn emergency(elapsed: u64) -> Outputs {
    let (tone, haptic, vibrator) = if elapsed % EMERGENCY_PERIOD_MS < 400 {
        (4000, 100, true)
    } else {
        (3800, 80, false)
    };
    Outputs {
        tone: Some(tone),
        leds: LedPattern {
            red: LedMode::Flash,
            ..LedPattern::default()
        },
        haptic: Some(haptic),
        vibrator,
    }
}

fn solid_red() -> LedPattern {
    LedPattern {
        red: LedMode::On,
        ..LedPattern::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_is_quiet_green() {
        for elapsed in [0, 399, 5_000, 123_456] {
            let out = render(AlertLevel::Normal, elapsed);
            assert_eq!(out.tone, None);
            assert_eq!(out.haptic, None);
            assert!(!out.vibrator);
            assert_eq!(out.leds.green, LedMode::On);
            assert_eq!(out.leds.yellow, LedMode::Off);
            assert_eq!(out.leds.red, LedMode::Off);
        }
    }

    #[test]
    fn test_warning_beep_window() {
        assert_eq!(render(AlertLevel::Warning, 100).tone, Some(2500));
        assert_eq!(render(AlertLevel::Warning, 399).tone, Some(2500));
        assert_eq!(render(AlertLevel::Warning, 400).tone, None);
        assert_eq!(render(AlertLevel::Warning, 1000).tone, None);
        assert_eq!(render(AlertLevel::Warning, 2100).tone, Some(2500));
        assert_eq!(render(AlertLevel::Warning, 0).leds.yellow, LedMode::On);
    }

    #[test]
    fn test_warning_haptic_uses_its_own_cycle() {
        assert_eq!(render(AlertLevel::Warning, 0).haptic, Some(30));
        assert_eq!(render(AlertLevel::Warning, 199).haptic, Some(30));
        assert_eq!(render(AlertLevel::Warning, 200).haptic, None);
        // Buzzer cycle restarts at 2000 but the haptic cycle does not
        assert_eq!(render(AlertLevel::Warning, 2100).haptic, None);
        assert_eq!(render(AlertLevel::Warning, 4100).haptic, None);
        assert_eq!(render(AlertLevel::Warning, 5100).haptic, Some(30));
        // 6000 is a buzzer-cycle start inside a haptic-off window
        assert_eq!(render(AlertLevel::Warning, 6000).tone, Some(2500));
        assert_eq!(render(AlertLevel::Warning, 6000).haptic, None);
    }

    #[test]
    fn test_critical_double_beep() {
        let first = render(AlertLevel::Critical, 300);
        assert_eq!(first.tone, Some(3000));
        assert_eq!(first.haptic, Some(50));

        assert_eq!(render(AlertLevel::Critical, 450).tone, None);
        assert_eq!(render(AlertLevel::Critical, 700).tone, Some(3200));
        assert_eq!(render(AlertLevel::Critical, 1500 + 100).tone, Some(3000));
    }

    #[test]
    fn test_critical_tail_is_silent_from_900() {
        // The second beep ends at 900; the rest of the 1500 ms period is quiet.
        for elapsed in [900, 1000, 1499] {
            let tail = render(AlertLevel::Critical, elapsed);
            assert_eq!(tail.tone, None, "tone at {}", elapsed);
            assert_eq!(tail.haptic, None, "haptic at {}", elapsed);
            assert_eq!(tail.leds.red, LedMode::On);
        }
        assert_eq!(render(AlertLevel::Critical, 899).tone, Some(3200));
    }

    #[test]
    fn test_critical_second_beep_after_wrap() {
        assert_eq!(render(AlertLevel::Critical, 2100).tone, Some(3200));
        assert_eq!(render(AlertLevel::Critical, 2100).haptic, Some(50));
        assert_eq!(render(AlertLevel::Critical, 2450).haptic, None);
    }

    #[test]
    fn test_emergency_alternation() {
        let high = render(AlertLevel::Emergency, 100);
        assert_eq!(high.tone, Some(4000));
        assert_eq!(high.haptic, Some(100));
        assert!(high.vibrator);

        let low = render(AlertLevel::Emergency, 600);
        assert_eq!(low.tone, Some(3800));
        assert_eq!(low.haptic, Some(80));
        assert!(!low.vibrator);

        assert_eq!(render(AlertLevel::Emergency, 800).tone, Some(4000));
        assert_eq!(high.leds.red, LedMode::Flash);
    }

    #[test]
    fn test_escalation_is_emergency_maximum() {
        let out = escalation();
        assert_eq!(out.tone, Some(4000));
        assert_eq!(out.haptic, Some(100));
        assert!(out.vibrator);
        assert_eq!(out.leds.red, LedMode::On);
    }
}
