// Haptic actuator access.
//
// The controller only sees the `HapticDriver` capability. `Drv2605` is the
// register-level adapter over a `RegisterBus`.

use thiserror::Error;

/// Default 7-bit bus address of the haptic controller
pub const DEFAULT_ADDRESS: u8 = 0x5A;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HapticError {
    #[error("no haptic device answering at address {address:#04x}")]
    NotPresent { address: u8 },
    #[error("unexpected device id {found} at address {address:#04x}")]
    UnexpectedDevice { address: u8, found: u8 },
    #[error("register bus fault: {0}")]
    Bus(String),
}

impl HapticError {
    /// Numeric handshake status reported in the start-up log
    pub fn code(&self) -> u8 {
        match self {
            Self::NotPresent { .. } => 2,
            Self::Bus(_) => 4,
            Self::UnexpectedDevice { .. } => 5,
        }
    }
}

/// Capability interface for the vibration/feedback actuator.
///
/// `activate` and `deactivate` are fire-and-forget: they never report failure
/// to the caller.
pub trait HapticDriver {
    /// Device handshake. A failure leaves the driver unusable but must not stop start-up.
    fn initialize(&mut self) -> Result<(), HapticError>;
    /// Intensity 0-100
    fn activate(&mut self, intensity: u8);
    fn deactivate(&mut self);
}

/// Register-addressed transport (I2C-like)
pub trait RegisterBus {
    fn write_register(&mut self, address: u8, register: u8, value: u8) -> Result<(), HapticError>;
    fn read_register(&mut self, address: u8, register: u8) -> Result<u8, HapticError>;
}

mod registers {
    pub const STATUS: u8 = 0x00;
    pub const MODE: u8 = 0x01;
    pub const RTP_INPUT: u8 = 0x02;

    pub const MODE_RTP: u8 = 0x05;
    pub const MODE_STANDBY: u8 = 0x40;

    pub const DEVICE_ID_SHIFT: u8 = 5;
}

/// Scale 0-100 to the device's native 0-255 range. Inputs above 100 saturate.
pub fn scale_intensity(intensity: u8) -> u8 {
    let scaled = u16::from(intensity.min(100)) * 255 / 100;
    u8::try_from(scaled).unwrap_or(u8::MAX)
}

/// DRV2605-style driver in real-time-playback mode
pub struct Drv2605<B: RegisterBus> {
    bus: B,
    address: u8,
}

impl<B: RegisterBus> Drv2605<B> {
    pub fn new(bus: B, address: u8) -> Self {
        Self { bus, address }
    }

    #[cfg(test)]
    pub fn bus(&self) -> &B {
        &self.bus
    }

    fn write(&mut self, register: u8, value: u8) {
        // One shot, no retry. A lost write is corrected by the next pattern change.
        if let Err(e) = self.bus.write_register(self.address, register, value) {
            log::debug!("haptic write {:#04x}={:#04x} dropped: {}", register, value, e);
        }
    }
}

impl<B: RegisterBus> HapticDriver for Drv2605<B> {
    fn initialize(&mut self) -> Result<(), HapticError> {
        let status = self.bus.read_register(self.address, registers::STATUS)?;
        let device_id = status >> registers::DEVICE_ID_SHIFT;
        if device_id == 0 {
            return Err(HapticError::UnexpectedDevice {
                address: self.address,
                found: device_id,
            });
        }
        self.bus
            .write_register(self.address, registers::MODE, registers::MODE_STANDBY)?;
        log::debug!("haptic device id {} ready at {:#04x}", device_id, self.address);
        Ok(())
    }

    fn activate(&mut self, intensity: u8) {
        self.write(registers::MODE, registers::MODE_RTP);
        self.write(registers::RTP_INPUT, scale_intensity(intensity));
    }

    fn deactivate(&mut self) {
        self.write(registers::MODE, registers::MODE_STANDBY);
    }
}

/// Register file standing in for the device on a host build.
/// Writes are logged at trace level.
pub struct SimulatedBus {
    registers: [u8; 256],
    present: bool,
}

impl SimulatedBus {
    /// A bus with a DRV2605L answering
    pub fn new() -> Self {
        let mut file = [0; 256];
        file[usize::from(registers::STATUS)] = 7 << registers::DEVICE_ID_SHIFT;
        Self {
            registers: file,
            present: true,
        }
    }

    /// A bus with nothing attached; every transfer is NACKed
    pub fn detached() -> Self {
        Self {
            registers: [0; 256],
            present: false,
        }
    }

    #[cfg(test)]
    pub fn register(&self, register: u8) -> u8 {
        self.registers[usize::from(register)]
    }
}

impl Default for SimulatedBus {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterBus for SimulatedBus {
    fn write_register(&mut self, address: u8, register: u8, value: u8) -> Result<(), HapticError> {
        if !self.present {
            return Err(HapticError::NotPresent { address });
        }
        log::trace!("bus {:#04x}: [{:#04x}] <- {:#04x}", address, register, value);
        self.registers[usize::from(register)] = value;
        Ok(())
    }

    fn read_register(&mut self, address: u8, register: u8) -> Result<u8, HapticError> {
        if !self.present {
            return Err(HapticError::NotPresent { address });
        }
        Ok(self.registers[usize::from(register)])
    }
}

#[cfg(test)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HapticCall {
    Activate(u8),
    Deactivate,
}

#[cfg(test)]
/// In-memory driver that records every call
#[derive(Debug, Default)]
pub struct RecordingHaptic {
    pub calls: Vec<HapticCall>,
    handshake_error: Option<HapticError>,
}

#[cfg(test)]
impl RecordingHaptic {
    pub fn new() -> Self {
        Self::default()
    }

    /// A driver whose handshake fails with `error`
    pub fn failing(error: HapticError) -> Self {
        Self {
            calls: Vec::new(),
            handshake_error: Some(error),
        }
    }

    pub fn last(&self) -> Option<HapticCall> {
        self.calls.last().copied()
    }
}

#[cfg(test)]
impl HapticDriver for RecordingHaptic {
    fn initialize(&mut self) -> Result<(), HapticError> {
        match &self.handshake_error {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    fn activate(&mut self, intensity: u8) {
        self.calls.push(HapticCall::Activate(intensity));
    }

    fn deactivate(&mut self) {
        self.calls.push(HapticCall::Deactivate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_intensity() {
        assert_eq!(scale_intensity(0), 0);
        assert_eq!(scale_intensity(30), 76);
        assert_eq!(scale_intensity(50), 127);
        assert_eq!(scale_intensity(100), 255);
        assert_eq!(scale_intensity(200), 255);
    }

    #[test]
    fn test_drv2605_handshake_and_playback() {
        let mut driver = Drv2605::new(SimulatedBus::new(), DEFAULT_ADDRESS);
        assert!(driver.initialize().is_ok());
        assert_eq!(driver.bus().register(registers::MODE), registers::MODE_STANDBY);

        driver.activate(80);
        assert_eq!(driver.bus().register(registers::MODE), registers::MODE_RTP);
        assert_eq!(driver.bus().register(registers::RTP_INPUT), 204);

        driver.deactivate();
        assert_eq!(driver.bus().register(registers::MODE), registers::MODE_STANDBY);
    }

    #[test]
    fn test_detached_bus_fails_handshake_but_writes_are_silent() {
        let mut driver = Drv2605::new(SimulatedBus::detached(), DEFAULT_ADDRESS);
        let err = driver.initialize().unwrap_err();
        assert_eq!(err, HapticError::NotPresent { address: DEFAULT_ADDRESS });
        assert_eq!(err.code(), 2);

        // Fire-and-forget: no panic, no error surfaced
        driver.activate(100);
        driver.deactivate();
    }

    #[test]
    fn test_wrong_device_id_rejected() {
        let mut bus = SimulatedBus::new();
        bus.write_register(DEFAULT_ADDRESS, registers::STATUS, 0).unwrap();
        let mut driver = Drv2605::new(bus, DEFAULT_ADDRESS);
        assert!(matches!(
            driver.initialize(),
            Err(HapticError::UnexpectedDevice { found: 0, .. })
        ));
    }

    #[test]
    fn test_recording_double() {
        let mut haptic = RecordingHaptic::new();
        assert!(haptic.initialize().is_ok());
        haptic.activate(30);
        haptic.deactivate();
        assert_eq!(haptic.calls, vec![HapticCall::Activate(30), HapticCall::Deactivate]);

        let mut broken = RecordingHaptic::failing(HapticError::Bus("nack".into()));
        assert_eq!(broken.initialize().unwrap_err().code(), 4);
    }
}
