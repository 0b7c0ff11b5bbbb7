// Actuator output types produced by the pattern generator and consumed by the controller.

/// Period of the Emergency red LED flash. Runs on wall-clock time, not level-entry time.
pub const FLASH_PERIOD_MS: u64 = 500;

/// How a single LED should behave for the current instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LedMode {
    #[default]
    Off,
    On,
    /// 50% duty square wave on `FLASH_PERIOD_MS`
    Flash,
}

impl LedMode {
    pub fn resolve(self, now: u64) -> bool {
        match self {
            Self::Off => false,
            Self::On => true,
            Self::Flash => now % FLASH_PERIOD_MS < FLASH_PERIOD_MS / 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LedPattern {
    pub green: LedMode,
    pub yellow: LedMode,
    pub red: LedMode,
}

impl LedPattern {
    pub fn resolve(&self, now: u64) -> LedStates {
        LedStates {
            green: self.green.resolve(now),
            yellow: self.yellow.resolve(now),
            red: self.red.resolve(now),
        }
    }
}

/// Concrete on/off state of the three indicator LEDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LedStates {
    pub green: bool,
    pub yellow: bool,
    pub red: bool,
}

impl LedStates {
    pub const OFF: Self = Self {
        green: false,
        yellow: false,
        red: false,
    };
}

/// Pattern output for one instant of an alert level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Outputs {
    /// Buzzer frequency in Hz, None for silence
    pub tone: Option<u32>,
    pub leds: LedPattern,
    /// Haptic intensity 0-100, None for off
    pub haptic: Option<u8>,
    pub vibrator: bool,
}

impl Outputs {
    /// Resolve time-dependent LED modes against the current clock reading.
    pub fn resolve(&self, now: u64) -> ActuatorState {
        ActuatorState {
            tone: self.tone,
            leds: self.leds.resolve(now),
            haptic: self.haptic,
            vibrator: self.vibrator,
        }
    }
}

/// What is physically written to the actuators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActuatorState {
    pub tone: Option<u32>,
    pub leds: LedStates,
    pub haptic: Option<u8>,
    pub vibrator: bool,
}

impl ActuatorState {
    /// Everything de-asserted
    pub const OFF: Self = Self {
        tone: None,
        leds: LedStates::OFF,
        haptic: None,
        vibrator: false,
    };
}
